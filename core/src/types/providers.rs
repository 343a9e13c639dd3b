use crate::types::{CalibrationRecord, ImageId, ScalingFactor};
use std::collections::HashMap;

/// Metadata kind answered by [`CalibrationProvider::get`]
pub const CALIBRATED_PIXEL_SPACING: &str = "calibratedPixelSpacing";

/// Metadata kind answered by [`ScalingProvider::get`]
pub const SCALING_MODULE: &str = "scalingModule";

/// Session-scoped store of calibrated pixel spacing per image identifier
///
/// Keys are the URI form of the identifier so that lookups succeed
/// regardless of the loader prefix. Entries are written once per
/// identifier and never pruned; eviction is the owner's concern.
#[derive(Debug, Default)]
pub struct CalibrationProvider {
    state: HashMap<String, CalibrationRecord>,
}

impl CalibrationProvider {
    /// Creates an empty provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the calibration record for an image identifier
    pub fn add(&mut self, image_id: &ImageId, record: CalibrationRecord) {
        self.state.insert(image_id.to_uri(), record);
    }

    /// Returns the record for an identifier, for the
    /// `calibratedPixelSpacing` metadata kind only
    pub fn get(&self, kind: &str, image_id: &ImageId) -> Option<&CalibrationRecord> {
        if kind == CALIBRATED_PIXEL_SPACING {
            self.state.get(&image_id.to_uri())
        } else {
            None
        }
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.state.len()
    }

    /// Whether the provider holds no records
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }
}

/// Session-scoped store of SUV scaling factors per image identifier
///
/// Same key/lifecycle contract as [`CalibrationProvider`]; additionally
/// preserves insertion order, which mirrors identifier order within a
/// batch.
#[derive(Debug, Default)]
pub struct ScalingProvider {
    state: HashMap<String, ScalingFactor>,
    order: Vec<String>,
}

impl ScalingProvider {
    /// Creates an empty provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the scaling factors for an image identifier
    pub fn add_instance(&mut self, image_id: &ImageId, scaling: ScalingFactor) {
        let uri = image_id.to_uri();
        if !self.state.contains_key(&uri) {
            self.order.push(uri.clone());
        }
        self.state.insert(uri, scaling);
    }

    /// Returns the scaling factors for an identifier, for the
    /// `scalingModule` metadata kind only
    pub fn get(&self, kind: &str, image_id: &ImageId) -> Option<&ScalingFactor> {
        if kind == SCALING_MODULE {
            self.state.get(&image_id.to_uri())
        } else {
            None
        }
    }

    /// Iterates stored entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ScalingFactor)> {
        self.order
            .iter()
            .filter_map(|uri| self.state.get(uri).map(|s| (uri.as_str(), s)))
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.state.len()
    }

    /// Whether the provider holds no entries
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }
}
