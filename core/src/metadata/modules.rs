//! Module-scoped views over instance attributes
//!
//! Mirrors the module granularity of viewer metadata providers: each
//! struct carries the fields one consumer needs, extracted from the
//! DICOM JSON attribute dictionary. Fields are optional here; required-
//! field validation happens in the PET resolver.

use crate::metadata::tags::{
    get_f64_value, get_multi_string_value, get_sequence_items, get_string_value, get_u32_value,
    ACQUISITION_DATE, ACQUISITION_TIME, ACTUAL_FRAME_DURATION, CORRECTED_IMAGE, DECAY_CORRECTION,
    FRAME_REFERENCE_TIME, MODALITY, NUMBER_OF_FRAMES, PATIENT_SEX, PATIENT_SIZE, PATIENT_WEIGHT,
    RADIONUCLIDE_HALF_LIFE, RADIONUCLIDE_TOTAL_DOSE, RADIOPHARMACEUTICAL_INFORMATION_SEQUENCE,
    RADIOPHARMACEUTICAL_START_DATE_TIME, RADIOPHARMACEUTICAL_START_TIME, SERIES_DATE, SERIES_TIME,
    UNITS,
};
use crate::metadata::SanitizedAttributes;
use crate::types::{DateValue, TimeValue};

/// Multiframe organization of one instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MultiframeModule {
    pub number_of_frames: Option<u32>,
}

/// Radiopharmaceutical administration attributes from the isotope
/// information sequence
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RadiopharmaceuticalInfo {
    pub radiopharmaceutical_start_date_time: Option<DateValue>,
    pub radiopharmaceutical_start_time: Option<TimeValue>,
    pub radionuclide_total_dose: Option<f64>,
    pub radionuclide_half_life: Option<f64>,
}

/// PET isotope module; absent entirely when the instance carries no
/// radiopharmaceutical information sequence
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PetIsotopeModule {
    pub radiopharmaceutical_info: RadiopharmaceuticalInfo,
}

/// General series timing and modality attributes
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeneralSeriesModule {
    pub modality: Option<String>,
    pub series_date: Option<DateValue>,
    pub series_time: Option<TimeValue>,
    pub acquisition_date: Option<DateValue>,
    pub acquisition_time: Option<TimeValue>,
}

/// Patient study attributes used for SUV normalization
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PatientStudyModule {
    pub patient_weight: Option<f64>,
    pub patient_sex: Option<String>,
    pub patient_size: Option<f64>,
}

/// The CorrectedImage attribute as it arrives from the source
///
/// Some servers deliver the multi-valued attribute as one
/// backslash-packed string; the PET resolver splits that shape.
#[derive(Debug, Clone, PartialEq)]
pub enum CorrectedImageValue {
    /// Proper multi-valued sequence of correction codes
    Sequence(Vec<String>),
    /// Single backslash-delimited string
    Packed(String),
}

/// PET series attributes
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PetSeriesModule {
    pub corrected_image: Option<CorrectedImageValue>,
    pub units: Option<String>,
    pub decay_correction: Option<String>,
}

/// PET image timing attributes
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PetImageModule {
    pub frame_reference_time: Option<f64>,
    pub actual_frame_duration: Option<f64>,
}

impl MultiframeModule {
    pub fn from_attributes(attrs: &SanitizedAttributes) -> Self {
        Self {
            number_of_frames: get_u32_value(attrs, NUMBER_OF_FRAMES),
        }
    }
}

impl PetIsotopeModule {
    /// Builds the module from the first radiopharmaceutical information
    /// sequence item, or `None` when the sequence is absent or empty
    pub fn from_attributes(attrs: &SanitizedAttributes) -> Option<Self> {
        let items = get_sequence_items(attrs, RADIOPHARMACEUTICAL_INFORMATION_SEQUENCE)?;
        let item = items.first()?;
        Some(Self {
            radiopharmaceutical_info: RadiopharmaceuticalInfo {
                radiopharmaceutical_start_date_time:
                    get_string_value(item, RADIOPHARMACEUTICAL_START_DATE_TIME)
                        .map(DateValue::Formatted),
                radiopharmaceutical_start_time: get_string_value(
                    item,
                    RADIOPHARMACEUTICAL_START_TIME,
                )
                .map(TimeValue::Formatted),
                radionuclide_total_dose: get_f64_value(item, RADIONUCLIDE_TOTAL_DOSE),
                radionuclide_half_life: get_f64_value(item, RADIONUCLIDE_HALF_LIFE),
            },
        })
    }
}

impl GeneralSeriesModule {
    pub fn from_attributes(attrs: &SanitizedAttributes) -> Self {
        Self {
            modality: get_string_value(attrs, MODALITY),
            series_date: get_string_value(attrs, SERIES_DATE).map(DateValue::Formatted),
            series_time: get_string_value(attrs, SERIES_TIME).map(TimeValue::Formatted),
            acquisition_date: get_string_value(attrs, ACQUISITION_DATE).map(DateValue::Formatted),
            acquisition_time: get_string_value(attrs, ACQUISITION_TIME).map(TimeValue::Formatted),
        }
    }
}

impl PatientStudyModule {
    pub fn from_attributes(attrs: &SanitizedAttributes) -> Self {
        Self {
            patient_weight: get_f64_value(attrs, PATIENT_WEIGHT),
            patient_sex: get_string_value(attrs, PATIENT_SEX),
            patient_size: get_f64_value(attrs, PATIENT_SIZE),
        }
    }
}

impl PetSeriesModule {
    pub fn from_attributes(attrs: &SanitizedAttributes) -> Self {
        let corrected_image = get_multi_string_value(attrs, CORRECTED_IMAGE).map(|values| {
            // A single element holding backslashes is the packed shape
            if values.len() == 1 && values[0].contains('\\') {
                CorrectedImageValue::Packed(values[0].clone())
            } else {
                CorrectedImageValue::Sequence(values)
            }
        });
        Self {
            corrected_image,
            units: get_string_value(attrs, UNITS),
            decay_correction: get_string_value(attrs, DECAY_CORRECTION),
        }
    }
}

impl PetImageModule {
    pub fn from_attributes(attrs: &SanitizedAttributes) -> Self {
        Self {
            frame_reference_time: get_f64_value(attrs, FRAME_REFERENCE_TIME),
            actual_frame_duration: get_f64_value(attrs, ACTUAL_FRAME_DURATION),
        }
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
    fn test_multiframe_module() {
        let map = attrs(json!({
            "00280008": { "vr": "IS", "Value": ["5"] }
        }));
        assert_eq!(
            MultiframeModule::from_attributes(&map).number_of_frames,
            Some(5)
        );
        assert_eq!(
            MultiframeModule::from_attributes(&SanitizedAttributes::new()).number_of_frames,
            None
        );
    }

    #[test]
    fn test_pet_isotope_module_absent_without_sequence() {
        let map = attrs(json!({
            "00080060": { "vr": "CS", "Value": ["PT"] }
        }));
        assert!(PetIsotopeModule::from_attributes(&map).is_none());
    }

    #[test]
    fn test_pet_isotope_module_fields() {
        let map = attrs(json!({
            "00540016": { "vr": "SQ", "Value": [{
                "00181074": { "vr": "DS", "Value": ["4.2e8"] },
                "00181075": { "vr": "DS", "Value": ["6586.2"] },
                "00181072": { "vr": "TM", "Value": ["100000.00"] }
            }]}
        }));
        let module = PetIsotopeModule::from_attributes(&map).unwrap();
        let info = module.radiopharmaceutical_info;
        assert_eq!(info.radionuclide_total_dose, Some(4.2e8));
        assert_eq!(info.radionuclide_half_life, Some(6586.2));
        assert_eq!(
            info.radiopharmaceutical_start_time,
            Some(TimeValue::Formatted("100000.00".to_string()))
        );
        assert_eq!(info.radiopharmaceutical_start_date_time, None);
    }

    #[test]
    fn test_pet_series_module_packed_corrected_image() {
        let map = attrs(json!({
            "00280051": { "vr": "CS", "Value": ["DECY\\ATTN\\SCAT"] }
        }));
        let module = PetSeriesModule::from_attributes(&map);
        assert_eq!(
            module.corrected_image,
            Some(CorrectedImageValue::Packed("DECY\\ATTN\\SCAT".to_string()))
        );
    }

    #[test]
    fn test_pet_series_module_sequence_corrected_image() {
        let map = attrs(json!({
            "00280051": { "vr": "CS", "Value": ["DECY", "ATTN"] }
        }));
        let module = PetSeriesModule::from_attributes(&map);
        assert_eq!(
            module.corrected_image,
            Some(CorrectedImageValue::Sequence(vec![
                "DECY".to_string(),
                "ATTN".to_string()
            ]))
        );
    }
}
