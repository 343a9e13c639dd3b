use crate::metadata::tags::{
    get_f64_value, get_sequence_items, get_string_value, get_values,
    ESTIMATED_RADIOGRAPHIC_MAGNIFICATION_FACTOR, IMAGER_PIXEL_SPACING, PHYSICAL_DELTA_X,
    PHYSICAL_DELTA_Y, PIXEL_SPACING, PIXEL_SPACING_CALIBRATION_DESCRIPTION,
    PIXEL_SPACING_CALIBRATION_TYPE, SEQUENCE_OF_ULTRASOUND_REGIONS, SOP_CLASS_UID,
};
use crate::metadata::SanitizedAttributes;
use crate::types::PixelSpacing;
use dicom_core::Tag;
use serde_json::Value;

/// One entry of the ultrasound region sequence
///
/// Physical deltas are in cm per pixel, as stored in the attribute.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UltrasoundRegion {
    pub physical_delta_x: Option<f64>,
    pub physical_delta_y: Option<f64>,
}

/// Name-keyed typed view of the attributes consumed by the pixel
/// spacing calibrator
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NaturalizedInstance {
    pub pixel_spacing: Option<PixelSpacing>,
    pub imager_pixel_spacing: Option<PixelSpacing>,
    pub sop_class_uid: Option<String>,
    pub pixel_spacing_calibration_type: Option<String>,
    pub pixel_spacing_calibration_description: Option<String>,
    pub estimated_radiographic_magnification_factor: Option<f64>,
    pub ultrasound_regions: Option<Vec<UltrasoundRegion>>,
}

/// Converts sanitized tag-keyed attributes into the name-keyed typed
/// dataset consumed by the spacing calibrator
pub fn naturalize(attrs: &SanitizedAttributes) -> NaturalizedInstance {
    NaturalizedInstance {
        pixel_spacing: get_spacing_pair(attrs, PIXEL_SPACING),
        imager_pixel_spacing: get_spacing_pair(attrs, IMAGER_PIXEL_SPACING),
        sop_class_uid: get_string_value(attrs, SOP_CLASS_UID),
        pixel_spacing_calibration_type: get_string_value(attrs, PIXEL_SPACING_CALIBRATION_TYPE),
        pixel_spacing_calibration_description: get_string_value(
            attrs,
            PIXEL_SPACING_CALIBRATION_DESCRIPTION,
        ),
        estimated_radiographic_magnification_factor: get_f64_value(
            attrs,
            ESTIMATED_RADIOGRAPHIC_MAGNIFICATION_FACTOR,
        ),
        ultrasound_regions: get_ultrasound_regions(attrs),
    }
}

/// Reads a two-component spacing attribute
///
/// Servers serialize DS pairs either as two `Value` elements (numbers or
/// decimal strings) or as a single backslash-joined string; both shapes
/// are accepted.
fn get_spacing_pair(attrs: &SanitizedAttributes, tag: Tag) -> Option<PixelSpacing> {
    let values = get_values(attrs, tag)?;
    match values.as_slice() {
        [a, b] => {
            let row = value_as_f64(a)?;
            let col = value_as_f64(b)?;
            Some(PixelSpacing::new(row, col))
        }
        [Value::String(packed)] => PixelSpacing::parse(packed).ok(),
        _ => None,
    }
}

fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn get_ultrasound_regions(attrs: &SanitizedAttributes) -> Option<Vec<UltrasoundRegion>> {
    let items = get_sequence_items(attrs, SEQUENCE_OF_ULTRASOUND_REGIONS)?;
    Some(
        items
            .into_iter()
            .map(|item| UltrasoundRegion {
                physical_delta_x: get_f64_value(item, PHYSICAL_DELTA_X),
                physical_delta_y: get_f64_value(item, PHYSICAL_DELTA_Y),
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attrs(entries: serde_json::Value) -> SanitizedAttributes {
        entries.as_object().unwrap().clone()
    }

    #[test]
    fn test_naturalize_spacing_pair_from_numbers() {
        let map = attrs(json!({
            "00280030": { "vr": "DS", "Value": [0.5, 0.75] }
        }));
        let instance = naturalize(&map);
        assert_eq!(instance.pixel_spacing, Some(PixelSpacing::new(0.5, 0.75)));
    }

    #[test]
    fn test_naturalize_spacing_pair_from_strings() {
        let map = attrs(json!({
            "00181164": { "vr": "DS", "Value": ["1.2", "1.2"] }
        }));
        let instance = naturalize(&map);
        assert_eq!(
            instance.imager_pixel_spacing,
            Some(PixelSpacing::new(1.2, 1.2))
        );
    }

    #[test]
    fn test_naturalize_spacing_pair_from_packed_string() {
        let map = attrs(json!({
            "00280030": { "vr": "DS", "Value": ["0.194\\0.194"] }
        }));
        let instance = naturalize(&map);
        assert_eq!(
            instance.pixel_spacing,
            Some(PixelSpacing::new(0.194, 0.194))
        );
    }

    #[test]
    fn test_naturalize_ultrasound_regions() {
        let map = attrs(json!({
            "00186011": { "vr": "SQ", "Value": [
                { "0018602C": { "vr": "FD", "Value": [0.02] },
                  "0018602E": { "vr": "FD", "Value": [0.03] } }
            ]}
        }));
        let instance = naturalize(&map);
        let regions = instance.ultrasound_regions.unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].physical_delta_x, Some(0.02));
        assert_eq!(regions[0].physical_delta_y, Some(0.03));
    }

    #[test]
    fn test_naturalize_empty_attributes() {
        let instance = naturalize(&SanitizedAttributes::new());
        assert_eq!(instance, NaturalizedInstance::default());
    }
}
