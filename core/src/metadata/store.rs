use crate::imageid::frame_info;
use crate::metadata::modules::{
    GeneralSeriesModule, MultiframeModule, PatientStudyModule, PetImageModule, PetIsotopeModule,
    PetSeriesModule,
};
use crate::metadata::SanitizedAttributes;
use crate::types::ImageId;
use std::collections::HashMap;

/// Module-scoped metadata lookup keyed by image identifier
///
/// The seam between the pipeline and whatever holds per-instance
/// attributes; [`InstanceMetadataManager`] is the in-crate
/// implementation, test doubles provide canned modules.
pub trait MetadataStore {
    fn multiframe(&self, image_id: &ImageId) -> Option<MultiframeModule>;
    fn pet_isotope(&self, image_id: &ImageId) -> Option<PetIsotopeModule>;
    fn general_series(&self, image_id: &ImageId) -> Option<GeneralSeriesModule>;
    fn patient_study(&self, image_id: &ImageId) -> Option<PatientStudyModule>;
    fn pet_series(&self, image_id: &ImageId) -> Option<PetSeriesModule>;
    fn pet_image(&self, image_id: &ImageId) -> Option<PetImageModule>;
}

/// Per-instance attribute store backing [`MetadataStore`]
///
/// Attributes are keyed by the frameless URI of the identifier they were
/// registered under, so every per-frame identifier of a multiframe
/// instance resolves to the same instance attributes.
#[derive(Debug, Default)]
pub struct InstanceMetadataManager {
    state: HashMap<String, SanitizedAttributes>,
}

impl InstanceMetadataManager {
    /// Creates an empty manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the attributes of the instance behind an identifier
    pub fn add(&mut self, image_id: &ImageId, attrs: SanitizedAttributes) {
        self.state.insert(Self::key_for(image_id), attrs);
    }

    /// Returns the instance attributes behind an identifier
    pub fn get(&self, image_id: &ImageId) -> Option<&SanitizedAttributes> {
        self.state.get(&Self::key_for(image_id))
    }

    /// Number of registered instances
    pub fn len(&self) -> usize {
        self.state.len()
    }

    /// Whether the manager holds no instances
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    // Frameless form first (dialect detection needs the protocol
    // prefix), then the URI form of that
    fn key_for(image_id: &ImageId) -> String {
        ImageId::new(frame_info(image_id.as_str()).frameless).to_uri()
    }
}

impl MetadataStore for InstanceMetadataManager {
    fn multiframe(&self, image_id: &ImageId) -> Option<MultiframeModule> {
        self.get(image_id).map(MultiframeModule::from_attributes)
    }

    fn pet_isotope(&self, image_id: &ImageId) -> Option<PetIsotopeModule> {
        self.get(image_id).and_then(PetIsotopeModule::from_attributes)
    }

    fn general_series(&self, image_id: &ImageId) -> Option<GeneralSeriesModule> {
        self.get(image_id).map(GeneralSeriesModule::from_attributes)
    }

    fn patient_study(&self, image_id: &ImageId) -> Option<PatientStudyModule> {
        self.get(image_id).map(PatientStudyModule::from_attributes)
    }

    fn pet_series(&self, image_id: &ImageId) -> Option<PetSeriesModule> {
        self.get(image_id).map(PetSeriesModule::from_attributes)
    }

    fn pet_image(&self, image_id: &ImageId) -> Option<PetImageModule> {
        self.get(image_id).map(PetImageModule::from_attributes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attrs(entries: serde_json::Value) -> SanitizedAttributes {
        entries.as_object().unwrap().clone()
    }

    #[test]
    fn test_all_frames_resolve_to_instance_attributes() {
        let mut manager = InstanceMetadataManager::new();
        let base = ImageId::new("wadors:http://host/studies/1/series/2/instances/3/frames/1");
        manager.add(
            &base,
            attrs(json!({
                "00280008": { "vr": "IS", "Value": ["4"] }
            })),
        );

        for frame in 1..=4 {
            let id = ImageId::new(format!(
                "wadors:http://host/studies/1/series/2/instances/3/frames/{frame}"
            ));
            let module = manager.multiframe(&id).unwrap();
            assert_eq!(module.number_of_frames, Some(4));
        }
    }

    #[test]
    fn test_unknown_identifier_has_no_modules() {
        let manager = InstanceMetadataManager::new();
        let id = ImageId::new("wadors:http://host/studies/1/series/2/instances/3/frames/1");
        assert!(manager.multiframe(&id).is_none());
        assert!(manager.pet_isotope(&id).is_none());
    }

    #[test]
    fn test_distinct_instances_are_isolated() {
        let mut manager = InstanceMetadataManager::new();
        let a = ImageId::new("wadors:http://host/studies/1/series/2/instances/3/frames/1");
        let b = ImageId::new("wadors:http://host/studies/1/series/2/instances/4/frames/1");
        manager.add(&a, attrs(json!({ "00280008": { "vr": "IS", "Value": ["2"] } })));
        manager.add(&b, attrs(json!({ "00280008": { "vr": "IS", "Value": ["7"] } })));

        assert_eq!(manager.multiframe(&a).unwrap().number_of_frames, Some(2));
        assert_eq!(manager.multiframe(&b).unwrap().number_of_frames, Some(7));
    }
}
