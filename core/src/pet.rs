//! PET instance metadata resolution
//!
//! Collects the attribute subset required for SUV computation from the
//! module-scoped metadata views, validates presence, and normalizes
//! date/time representations to their fixed-width string forms.

use crate::error::{Result, WadocatError};
use crate::metadata::{CorrectedImageValue, MetadataStore};
use crate::types::{ImageId, PetInstanceMetadata};

fn require<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| WadocatError::RequiredMetadataMissing(field.to_string()))
}

/// Resolves the PET metadata of one image identifier
///
/// # Errors
///
/// Returns [`WadocatError::RequiredMetadataMissing`] when the PET isotope
/// module is absent, when any required field of the SUV input set is
/// missing, or when no radiopharmaceutical start anchor exists at all
/// (neither a start datetime, nor a series date, nor a start time).
/// The last condition intentionally repeats the series-date test from
/// the required-field set; the redundancy is preserved as-is pending
/// clarification of the intended fallback rule.
pub fn resolve_pet_instance<S: MetadataStore>(
    store: &S,
    image_id: &ImageId,
) -> Result<PetInstanceMetadata> {
    let isotope = require(store.pet_isotope(image_id), "petIsotopeModule")?;
    let info = isotope.radiopharmaceutical_info;

    let general_series = store.general_series(image_id).unwrap_or_default();
    let patient_study = store.patient_study(image_id).unwrap_or_default();
    let pet_series = store.pet_series(image_id).unwrap_or_default();
    let pet_image = store.pet_image(image_id).unwrap_or_default();

    // series_date participates in the start-anchor condition below too
    let series_date = require(general_series.series_date.clone(), "seriesDate")?;
    let series_time = require(general_series.series_time, "seriesTime")?;
    let patient_weight = require(patient_study.patient_weight, "patientWeight")?;
    let acquisition_date = require(general_series.acquisition_date, "acquisitionDate")?;
    let acquisition_time = require(general_series.acquisition_time, "acquisitionTime")?;
    let corrected_image = require(pet_series.corrected_image, "correctedImage")?;
    let units = require(pet_series.units, "units")?;
    let decay_correction = require(pet_series.decay_correction, "decayCorrection")?;
    let radionuclide_total_dose = require(info.radionuclide_total_dose, "radionuclideTotalDose")?;
    let radionuclide_half_life = require(info.radionuclide_half_life, "radionuclideHalfLife")?;

    if info.radiopharmaceutical_start_date_time.is_none()
        && general_series.series_date.is_none()
        && info.radiopharmaceutical_start_time.is_none()
    {
        return Err(WadocatError::RequiredMetadataMissing(
            "radiopharmaceuticalStartDateTime".to_string(),
        ));
    }

    // Some servers pack the multi-valued attribute into one string
    let corrected_image = match corrected_image {
        CorrectedImageValue::Sequence(values) => values,
        CorrectedImageValue::Packed(packed) => {
            packed.split('\\').map(str::to_string).collect()
        }
    };

    Ok(PetInstanceMetadata {
        corrected_image,
        units,
        radionuclide_half_life,
        radionuclide_total_dose,
        decay_correction,
        patient_weight,
        series_date: series_date.normalize(),
        series_time: series_time.normalize(),
        acquisition_date: acquisition_date.normalize(),
        acquisition_time: acquisition_time.normalize(),
        radiopharmaceutical_start_date_time: info
            .radiopharmaceutical_start_date_time
            .map(|d| d.normalize()),
        radiopharmaceutical_start_time: info
            .radiopharmaceutical_start_time
            .map(|t| t.normalize()),
        frame_reference_time: pet_image.frame_reference_time,
        actual_frame_duration: pet_image.actual_frame_duration,
        patient_sex: patient_study.patient_sex,
        patient_size: patient_study.patient_size,
    })
}
