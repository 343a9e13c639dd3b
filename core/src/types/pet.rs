use serde::Serialize;
use std::fmt;

/// Structured calendar date, as delivered by some metadata sources
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateParts {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

/// Structured time of day
///
/// Absent components default to zero during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeParts {
    pub hours: Option<u8>,
    pub minutes: Option<u8>,
    pub seconds: Option<u8>,
    pub fractional_seconds: Option<u32>,
}

/// A date attribute as received from a metadata source
///
/// Sources are inconsistent: some deliver pre-formatted `YYYYMMDD`
/// strings, others structured records. The variant is decided once at
/// ingestion; [`DateValue::normalize`] produces the fixed-width string
/// form either way.
#[derive(Debug, Clone, PartialEq)]
pub enum DateValue {
    /// Already in `YYYYMMDD` form; passed through untouched
    Formatted(String),
    /// Structured record requiring normalization
    Parts(DateParts),
}

impl DateValue {
    /// Returns the fixed-width `YYYYMMDD` string form
    pub fn normalize(&self) -> String {
        match self {
            DateValue::Formatted(s) => s.clone(),
            DateValue::Parts(p) => format!("{}{:02}{:02}", p.year, p.month, p.day),
        }
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.normalize())
    }
}

/// A time attribute as received from a metadata source
#[derive(Debug, Clone, PartialEq)]
pub enum TimeValue {
    /// Already in `HHMMSS.ffffff` form; passed through untouched
    Formatted(String),
    /// Structured record requiring normalization
    Parts(TimeParts),
}

impl TimeValue {
    /// Returns the fixed-width `HHMMSS.ffffff` string form
    ///
    /// Fractional seconds are right-padded with zeros to six digits.
    pub fn normalize(&self) -> String {
        match self {
            TimeValue::Formatted(s) => s.clone(),
            TimeValue::Parts(p) => {
                let fractional = match p.fractional_seconds {
                    Some(f) => format!("{:0<6}", f),
                    None => "000000".to_string(),
                };
                format!(
                    "{:02}{:02}{:02}.{}",
                    p.hours.unwrap_or(0),
                    p.minutes.unwrap_or(0),
                    p.seconds.unwrap_or(0),
                    fractional
                )
            }
        }
    }
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.normalize())
    }
}

/// The attribute subset required to compute SUV scaling for one
/// PET instance
///
/// Construction is validated: every non-`Option` field was present in
/// the source metadata, and date/time fields are already normalized to
/// their fixed-width forms.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PetInstanceMetadata {
    /// Correction codes applied to the image (e.g. DECY, ATTN, SCAT)
    pub corrected_image: Vec<String>,
    /// Pixel value units (e.g. BQML)
    pub units: String,
    /// Radionuclide half life, in seconds
    pub radionuclide_half_life: f64,
    /// Injected dose, in Bq
    pub radionuclide_total_dose: f64,
    /// Decay correction reference (e.g. START, ADMIN)
    pub decay_correction: String,
    /// Patient weight, in kg
    pub patient_weight: f64,
    /// Series date, `YYYYMMDD`
    pub series_date: String,
    /// Series time, `HHMMSS.ffffff`
    pub series_time: String,
    /// Acquisition date, `YYYYMMDD`
    pub acquisition_date: String,
    /// Acquisition time, `HHMMSS.ffffff`
    pub acquisition_time: String,
    /// Radiopharmaceutical administration datetime, when present
    pub radiopharmaceutical_start_date_time: Option<String>,
    /// Radiopharmaceutical administration time, when present
    pub radiopharmaceutical_start_time: Option<String>,
    /// Frame reference time in ms, when present
    pub frame_reference_time: Option<f64>,
    /// Actual frame duration in ms, when present
    pub actual_frame_duration: Option<f64>,
    /// Patient sex, when present
    pub patient_sex: Option<String>,
    /// Patient height in m, when present
    pub patient_size: Option<f64>,
}

/// Per-instance SUV scaling factors produced by the scaling calculator
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScalingFactor {
    /// Body-weight SUV scale factor
    pub suv_bw_scale_factor: f64,
    /// Lean-body-mass SUV scale factor, when computable
    pub suv_lbm_scale_factor: Option<f64>,
    /// Body-surface-area SUV scale factor, when computable
    pub suv_bsa_scale_factor: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_parts_zero_padded() {
        let date = DateValue::Parts(DateParts {
            year: 2023,
            month: 4,
            day: 7,
        });
        assert_eq!(date.normalize(), "20230407");
    }

    #[test]
    fn test_formatted_date_untouched() {
        let date = DateValue::Formatted("20230407".to_string());
        assert_eq!(date.normalize(), "20230407");
    }

    #[test]
    fn test_time_parts_zero_padded_with_fraction() {
        let time = TimeValue::Parts(TimeParts {
            hours: Some(9),
            minutes: Some(5),
            seconds: Some(3),
            fractional_seconds: Some(12),
        });
        assert_eq!(time.normalize(), "090503.120000");
    }

    #[test]
    fn test_time_parts_missing_components_default_to_zero() {
        let time = TimeValue::Parts(TimeParts::default());
        assert_eq!(time.normalize(), "000000.000000");
    }

    #[test]
    fn test_formatted_time_untouched() {
        let time = TimeValue::Formatted("101530.500000".to_string());
        assert_eq!(time.normalize(), "101530.500000");
    }
}
