use crate::types::{CalibrationProvider, ImageId, ScalingProvider};
use serde_json::json;
use std::fmt;

/// Text report formatter for a resolved series
pub struct SeriesReport<'a> {
    image_ids: &'a [ImageId],
    calibration: &'a CalibrationProvider,
    scaling: &'a ScalingProvider,
}

impl<'a> SeriesReport<'a> {
    /// Creates a report over a pipeline's output
    pub fn new(
        image_ids: &'a [ImageId],
        calibration: &'a CalibrationProvider,
        scaling: &'a ScalingProvider,
    ) -> Self {
        Self {
            image_ids,
            calibration,
            scaling,
        }
    }

    /// Renders the report as a JSON value
    pub fn to_json(&self) -> serde_json::Value {
        let entries: Vec<serde_json::Value> = self
            .image_ids
            .iter()
            .map(|id| {
                json!({
                    "imageId": id.as_str(),
                    "calibratedPixelSpacing": self.calibration.get("calibratedPixelSpacing", id),
                    "scalingModule": self.scaling.get("scalingModule", id),
                })
            })
            .collect();
        json!({
            "imageIds": entries,
            "calibrationEntries": self.calibration.len(),
            "scalingEntries": self.scaling.len(),
        })
    }
}

impl<'a> fmt::Display for SeriesReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Series Resolution")?;
        writeln!(f, "=================")?;
        writeln!(f)?;
        writeln!(f, "Identifiers:     {}", self.image_ids.len())?;
        writeln!(f, "Calibrated:      {}", self.calibration.len())?;
        writeln!(f, "Scaling Entries: {}", self.scaling.len())?;
        writeln!(f)?;

        for image_id in self.image_ids {
            writeln!(f, "{image_id}")?;
            if let Some(record) = self.calibration.get("calibratedPixelSpacing", image_id) {
                let classification = record
                    .calibration_type
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "unclassified".to_string());
                writeln!(
                    f,
                    "  spacing: {} x {} mm ({classification})",
                    record.row_spacing, record.column_spacing
                )?;
            }
            if let Some(scaling) = self.scaling.get("scalingModule", image_id) {
                writeln!(f, "  suv bw scale factor: {}", scaling.suv_bw_scale_factor)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PixelSpacing, ScalingFactor, SpacingResolution};

    fn sample() -> (Vec<ImageId>, CalibrationProvider, ScalingProvider) {
        let ids = vec![
            ImageId::new("wadors:http://host/instances/1/frames/1"),
            ImageId::new("wadors:http://host/instances/2/frames/1"),
        ];
        let mut calibration = CalibrationProvider::new();
        calibration.add(
            &ids[0],
            SpacingResolution::Detector {
                spacing: PixelSpacing::new(0.5, 0.5),
            }
            .to_record()
            .unwrap(),
        );
        let mut scaling = ScalingProvider::new();
        scaling.add_instance(
            &ids[1],
            ScalingFactor {
                suv_bw_scale_factor: 0.000172,
                suv_lbm_scale_factor: None,
                suv_bsa_scale_factor: None,
            },
        );
        (ids, calibration, scaling)
    }

    #[test]
    fn test_text_report_lists_identifiers_and_records() {
        let (ids, calibration, scaling) = sample();
        let text = SeriesReport::new(&ids, &calibration, &scaling).to_string();
        assert!(text.contains("Identifiers:     2"));
        assert!(text.contains("0.5 x 0.5 mm (DETECTOR)"));
        assert!(text.contains("suv bw scale factor: 0.000172"));
    }

    #[test]
    fn test_json_report_shape() {
        let (ids, calibration, scaling) = sample();
        let value = SeriesReport::new(&ids, &calibration, &scaling).to_json();
        assert_eq!(value["imageIds"].as_array().unwrap().len(), 2);
        assert_eq!(value["calibrationEntries"], 1);
        assert_eq!(value["scalingEntries"], 1);
        assert!(value["imageIds"][0]["calibratedPixelSpacing"].is_object());
        assert!(value["imageIds"][0]["scalingModule"].is_null());
    }
}
