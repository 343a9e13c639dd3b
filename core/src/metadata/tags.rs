use crate::metadata::RawInstanceAttributes;
use dicom_core::Tag;
use serde_json::Value;

// Identification Tags
pub const SOP_CLASS_UID: Tag = Tag(0x0008, 0x0016);
pub const SOP_INSTANCE_UID: Tag = Tag(0x0008, 0x0018);
pub const MODALITY: Tag = Tag(0x0008, 0x0060);
pub const SERIES_INSTANCE_UID: Tag = Tag(0x0020, 0x000E);

// Series/Acquisition Timing Tags
pub const SERIES_DATE: Tag = Tag(0x0008, 0x0021);
pub const ACQUISITION_DATE: Tag = Tag(0x0008, 0x0022);
pub const SERIES_TIME: Tag = Tag(0x0008, 0x0031);
pub const ACQUISITION_TIME: Tag = Tag(0x0008, 0x0032);

// Patient Tags
pub const PATIENT_SEX: Tag = Tag(0x0010, 0x0040);
pub const PATIENT_SIZE: Tag = Tag(0x0010, 0x1020);
pub const PATIENT_WEIGHT: Tag = Tag(0x0010, 0x1030);

// Image Geometry Tags
pub const NUMBER_OF_FRAMES: Tag = Tag(0x0028, 0x0008);
pub const PIXEL_SPACING: Tag = Tag(0x0028, 0x0030);
pub const IMAGER_PIXEL_SPACING: Tag = Tag(0x0018, 0x1164);
pub const ESTIMATED_RADIOGRAPHIC_MAGNIFICATION_FACTOR: Tag = Tag(0x0018, 0x1114);
pub const PIXEL_SPACING_CALIBRATION_TYPE: Tag = Tag(0x0028, 0x0A02);
pub const PIXEL_SPACING_CALIBRATION_DESCRIPTION: Tag = Tag(0x0028, 0x0A04);

// Ultrasound Region Tags
pub const SEQUENCE_OF_ULTRASOUND_REGIONS: Tag = Tag(0x0018, 0x6011);
pub const PHYSICAL_DELTA_X: Tag = Tag(0x0018, 0x602C);
pub const PHYSICAL_DELTA_Y: Tag = Tag(0x0018, 0x602E);

// PET Tags
pub const CORRECTED_IMAGE: Tag = Tag(0x0028, 0x0051);
pub const UNITS: Tag = Tag(0x0054, 0x1001);
pub const DECAY_CORRECTION: Tag = Tag(0x0054, 0x1102);
pub const FRAME_REFERENCE_TIME: Tag = Tag(0x0054, 0x1300);
pub const ACTUAL_FRAME_DURATION: Tag = Tag(0x0018, 0x1242);
pub const RADIOPHARMACEUTICAL_INFORMATION_SEQUENCE: Tag = Tag(0x0054, 0x0016);
pub const RADIOPHARMACEUTICAL_START_TIME: Tag = Tag(0x0018, 0x1072);
pub const RADIONUCLIDE_TOTAL_DOSE: Tag = Tag(0x0018, 0x1074);
pub const RADIONUCLIDE_HALF_LIFE: Tag = Tag(0x0018, 0x1075);
pub const RADIOPHARMACEUTICAL_START_DATE_TIME: Tag = Tag(0x0018, 0x1078);

/// Renders a tag as its 8-hex-digit DICOM JSON key, e.g. `00080060`
pub fn tag_key(tag: Tag) -> String {
    format!("{:04X}{:04X}", tag.group(), tag.element())
}

/// Returns the `Value` array of a DICOM JSON attribute, if present
pub fn get_values(attrs: &RawInstanceAttributes, tag: Tag) -> Option<&Vec<Value>> {
    attrs.get(&tag_key(tag))?.get("Value")?.as_array()
}

fn first_value(attrs: &RawInstanceAttributes, tag: Tag) -> Option<&Value> {
    get_values(attrs, tag)?.first()
}

/// Helper to get a string value from a DICOM JSON attribute
///
/// Numeric payloads are rendered to their decimal string form, since
/// servers serialize DS/IS attributes inconsistently.
pub fn get_string_value(attrs: &RawInstanceAttributes, tag: Tag) -> Option<String> {
    match first_value(attrs, tag)? {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Helper to get a float value from a DICOM JSON attribute
///
/// Accepts native JSON numbers and decimal strings.
pub fn get_f64_value(attrs: &RawInstanceAttributes, tag: Tag) -> Option<f64> {
    match first_value(attrs, tag)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Helper to get an unsigned integer value from a DICOM JSON attribute
pub fn get_u32_value(attrs: &RawInstanceAttributes, tag: Tag) -> Option<u32> {
    match first_value(attrs, tag)? {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Helper to get a multi-valued string attribute
///
/// Returns one entry per `Value` element; a single backslash-packed
/// string is NOT split here, so callers can distinguish servers that
/// pack multiple values into one string from those that do not.
pub fn get_multi_string_value(attrs: &RawInstanceAttributes, tag: Tag) -> Option<Vec<String>> {
    let values = get_values(attrs, tag)?;
    let strings: Vec<String> = values
        .iter()
        .filter_map(|v| match v {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect();
    if strings.is_empty() {
        None
    } else {
        Some(strings)
    }
}

/// Returns the items of a sequence attribute as attribute maps
pub fn get_sequence_items(
    attrs: &RawInstanceAttributes,
    tag: Tag,
) -> Option<Vec<&RawInstanceAttributes>> {
    let values = get_values(attrs, tag)?;
    Some(values.iter().filter_map(|v| v.as_object()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attrs(entries: Value) -> RawInstanceAttributes {
        entries.as_object().unwrap().clone()
    }

    #[test]
    fn test_tag_key_rendering() {
        assert_eq!(tag_key(MODALITY), "00080060");
        assert_eq!(tag_key(SERIES_INSTANCE_UID), "0020000E");
        assert_eq!(tag_key(PIXEL_SPACING_CALIBRATION_TYPE), "00280A02");
    }

    #[test]
    fn test_get_string_value() {
        let map = attrs(json!({
            "00080060": { "vr": "CS", "Value": ["PT"] }
        }));
        assert_eq!(get_string_value(&map, MODALITY), Some("PT".to_string()));
        assert_eq!(get_string_value(&map, SOP_CLASS_UID), None);
    }

    #[test]
    fn test_get_f64_value_accepts_strings_and_numbers() {
        let map = attrs(json!({
            "00101030": { "vr": "DS", "Value": ["72.5"] },
            "00181075": { "vr": "DS", "Value": [6586.2] }
        }));
        assert_eq!(get_f64_value(&map, PATIENT_WEIGHT), Some(72.5));
        assert_eq!(get_f64_value(&map, RADIONUCLIDE_HALF_LIFE), Some(6586.2));
    }

    #[test]
    fn test_get_multi_string_value_keeps_packed_string_intact() {
        let map = attrs(json!({
            "00280051": { "vr": "CS", "Value": ["DECY\\ATTN\\SCAT"] }
        }));
        assert_eq!(
            get_multi_string_value(&map, CORRECTED_IMAGE),
            Some(vec!["DECY\\ATTN\\SCAT".to_string()])
        );
    }

    #[test]
    fn test_get_sequence_items() {
        let map = attrs(json!({
            "00540016": { "vr": "SQ", "Value": [
                { "00181074": { "vr": "DS", "Value": [4.2e8] } }
            ]}
        }));
        let items = get_sequence_items(&map, RADIOPHARMACEUTICAL_INFORMATION_SEQUENCE).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(get_f64_value(items[0], RADIONUCLIDE_TOTAL_DOSE), Some(4.2e8));
    }
}
