use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

/// Pixel spacing in millimeters (row, column)
///
/// Represents the physical spacing between adjacent pixel centers,
/// measured in mm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PixelSpacing {
    pub row: f64,
    pub col: f64,
}

impl PixelSpacing {
    /// Creates a new PixelSpacing
    pub fn new(row: f64, col: f64) -> Self {
        Self { row, col }
    }

    /// Parses pixel spacing from a decimal-string pair
    ///
    /// Accepts formats like:
    /// - "0.1\\0.1" (DICOM DS multi-value)
    /// - "0.1 0.1"
    /// - "[0.1, 0.1]"
    /// - Exponential notation: "1.5e-4 1.5e-4"
    ///
    /// # Errors
    ///
    /// Returns an error if two numeric components cannot be found
    pub fn parse(s: &str) -> Result<Self, String> {
        static REGEX: OnceLock<Regex> = OnceLock::new();
        let re = REGEX.get_or_init(|| {
            Regex::new(r"[-+]?\d*\.?\d+(?:[eE][-+]?\d+)?").expect("Failed to compile regex")
        });

        let mut numbers = re.find_iter(s).map(|m| m.as_str());
        let row_str = numbers
            .next()
            .ok_or_else(|| format!("Failed to parse PixelSpacing from '{}'", s))?;
        let col_str = numbers
            .next()
            .ok_or_else(|| format!("Failed to parse PixelSpacing from '{}'", s))?;

        let row: f64 = row_str
            .parse()
            .map_err(|e| format!("Failed to parse row value: {}", e))?;

        let col: f64 = col_str
            .parse()
            .map_err(|e| format!("Failed to parse col value: {}", e))?;

        Ok(PixelSpacing { row, col })
    }
}

impl fmt::Display for PixelSpacing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {} mm", self.row, self.col)
    }
}

/// Classification of how physical pixel spacing was obtained
/// for a projection radiograph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CalibrationType {
    /// Spacing semantics do not apply (non-projection image)
    NotApplicable,
    /// Only PixelSpacing present on a projection image; meaning unknown
    Unknown,
    /// PixelSpacing differs from ImagerPixelSpacing; calibrated in some
    /// (possibly undescribed) manner
    Calibrated,
    /// PixelSpacing equals ImagerPixelSpacing; measurements are at the
    /// detector plane
    Detector,
}

impl CalibrationType {
    /// Returns the DICOM-style name for display
    pub fn simple_name(&self) -> &'static str {
        match self {
            CalibrationType::NotApplicable => "NOT_APPLICABLE",
            CalibrationType::Unknown => "UNKNOWN",
            CalibrationType::Calibrated => "CALIBRATED",
            CalibrationType::Detector => "DETECTOR",
        }
    }
}

impl fmt::Display for CalibrationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.simple_name())
    }
}

/// Outcome of the pixel spacing decision table
///
/// One variant per branch, so downstream code matches on the branch
/// instead of probing optional fields. Variants that carry no spacing
/// (`MultiRegionUltrasound`, `Unresolved`) mean measurements stay in
/// pixel units; that is a valid terminal outcome, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum SpacingResolution {
    /// Not a projection radiograph; raw PixelSpacing passed through
    /// with no calibration classification
    NonProjection { spacing: Option<PixelSpacing> },
    /// Projection image without ImagerPixelSpacing; PixelSpacing is
    /// used but its meaning is unknown
    Unknown { spacing: Option<PixelSpacing> },
    /// PixelSpacing and ImagerPixelSpacing agree; detector plane
    Detector { spacing: PixelSpacing },
    /// PixelSpacing and ImagerPixelSpacing disagree; calibrated
    Calibrated {
        spacing: PixelSpacing,
        calibration_type: Option<String>,
        calibration_description: Option<String>,
    },
    /// Only ImagerPixelSpacing present; corrected by the estimated
    /// radiographic magnification factor when available
    Magnified {
        spacing: PixelSpacing,
        corrected: bool,
    },
    /// Single ultrasound region; spacing from its physical deltas
    Ultrasound { spacing: PixelSpacing },
    /// Multiple ultrasound regions; unsupported, no spacing returned
    MultiRegionUltrasound,
    /// Non-projection image without ImagerPixelSpacing
    NotApplicable { spacing: Option<PixelSpacing> },
    /// No rule matched; no spacing can be determined
    Unresolved,
}

impl SpacingResolution {
    /// Converts the resolution into a provider payload, when it carries
    /// a numeric spacing
    pub fn to_record(&self) -> Option<CalibrationRecord> {
        match self {
            SpacingResolution::NonProjection { spacing } => {
                spacing.map(|s| CalibrationRecord::new(s, None, false))
            }
            SpacingResolution::Unknown { spacing } => {
                spacing.map(|s| CalibrationRecord::new(s, Some(CalibrationType::Unknown), true))
            }
            SpacingResolution::Detector { spacing } => Some(CalibrationRecord::new(
                *spacing,
                Some(CalibrationType::Detector),
                true,
            )),
            SpacingResolution::Calibrated {
                spacing,
                calibration_description,
                ..
            } => {
                let mut record =
                    CalibrationRecord::new(*spacing, Some(CalibrationType::Calibrated), true);
                record.calibration_description = calibration_description.clone();
                Some(record)
            }
            SpacingResolution::Magnified { spacing, .. } => {
                Some(CalibrationRecord::new(*spacing, None, true))
            }
            SpacingResolution::Ultrasound { spacing } => {
                Some(CalibrationRecord::new(*spacing, None, false))
            }
            SpacingResolution::NotApplicable { spacing } => spacing.map(|s| {
                CalibrationRecord::new(s, Some(CalibrationType::NotApplicable), false)
            }),
            SpacingResolution::MultiRegionUltrasound | SpacingResolution::Unresolved => None,
        }
    }

    /// Returns the numeric spacing carried by this resolution, if any
    pub fn spacing(&self) -> Option<PixelSpacing> {
        match self {
            SpacingResolution::NonProjection { spacing }
            | SpacingResolution::Unknown { spacing }
            | SpacingResolution::NotApplicable { spacing } => *spacing,
            SpacingResolution::Detector { spacing }
            | SpacingResolution::Calibrated { spacing, .. }
            | SpacingResolution::Magnified { spacing, .. }
            | SpacingResolution::Ultrasound { spacing } => Some(*spacing),
            SpacingResolution::MultiRegionUltrasound | SpacingResolution::Unresolved => None,
        }
    }
}

/// Calibrated pixel spacing stored per image identifier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalibrationRecord {
    /// Calibration classification, when the decision table assigned one
    pub calibration_type: Option<CalibrationType>,
    /// Physical spacing between rows, in mm
    pub row_spacing: f64,
    /// Physical spacing between columns, in mm
    pub column_spacing: f64,
    /// Whether the source image is a projection radiograph
    pub is_projection: bool,
    /// Free-text description of the calibration, when present
    pub calibration_description: Option<String>,
}

impl CalibrationRecord {
    fn new(spacing: PixelSpacing, calibration_type: Option<CalibrationType>, is_projection: bool) -> Self {
        Self {
            calibration_type,
            row_spacing: spacing.row,
            column_spacing: spacing.col,
            is_projection,
            calibration_description: None,
        }
    }
}
