//! Batch pipeline over a retrieved series
//!
//! Sequences identifier construction, multiframe expansion, spacing
//! calibration and (for PET series) SUV scaling over the instance
//! attribute dictionaries returned by the retrieval client. Each stage
//! consumes the full output of the previous one; only retrieval failure
//! aborts a batch.

use crate::error::Result;
use crate::imageid::{build_image_id, expand_multiframe};
use crate::metadata::tags::{
    get_string_value, MODALITY, SERIES_INSTANCE_UID, SOP_INSTANCE_UID,
};
use crate::metadata::{naturalize, sanitize, InstanceMetadataManager, RawInstanceAttributes};
use crate::pet::resolve_pet_instance;
use crate::spacing::resolve_pixel_spacing;
use crate::types::{
    CalibrationProvider, ImageId, PetInstanceMetadata, ScalingFactor, ScalingProvider,
};
use log::{debug, error, warn};

/// Series metadata retrieval collaborator
///
/// Returns one raw attribute dictionary per instance of the series.
/// Network concerns (retries, timeouts) are the implementor's contract;
/// a returned error is fatal to the batch.
pub trait RetrieveClient {
    fn retrieve_series_metadata(
        &self,
        study_instance_uid: &str,
        series_instance_uid: &str,
    ) -> Result<Vec<RawInstanceAttributes>>;
}

/// SUV scaling calculation collaborator
///
/// Pure function over the batched per-instance metadata; the result has
/// the same length and order as the input. Failure is recovered by the
/// pipeline and never affects identifier resolution.
pub trait SuvCalculator {
    fn compute(&self, instances: &[PetInstanceMetadata]) -> Result<Vec<ScalingFactor>>;
}

/// Coordinates of one series to resolve
#[derive(Debug, Clone)]
pub struct SeriesRequest {
    pub study_instance_uid: String,
    pub series_instance_uid: String,
    /// Restricts the batch to a single SOP instance when set
    pub sop_instance_uid: Option<String>,
    /// Root used when building web-resource identifiers
    pub wado_rs_root: String,
}

/// Per-session pipeline producing browsable per-frame identifiers plus
/// calibration and scaling lookups
///
/// The providers and the attribute manager live as long as the pipeline
/// and accumulate across batches; their contents are keyed by identifier
/// URI and never pruned here.
pub struct ImageIdPipeline<C, S> {
    client: C,
    suv_calculator: S,
    /// Instance attributes behind every produced identifier
    pub metadata: InstanceMetadataManager,
    /// Calibrated pixel spacing per identifier
    pub calibration: CalibrationProvider,
    /// SUV scaling factors per identifier
    pub scaling: ScalingProvider,
}

impl<C: RetrieveClient, S: SuvCalculator> ImageIdPipeline<C, S> {
    /// Creates a pipeline over the given collaborators with empty
    /// providers
    pub fn new(client: C, suv_calculator: S) -> Self {
        Self {
            client,
            suv_calculator,
            metadata: InstanceMetadataManager::new(),
            calibration: CalibrationProvider::new(),
            scaling: ScalingProvider::new(),
        }
    }

    /// Resolves one series into an ordered per-frame identifier list
    ///
    /// Populates the calibration provider for every identifier whose
    /// spacing resolves, and, when the series modality is PT, the
    /// scaling provider for every instance whose PET metadata resolves.
    /// An empty series yields an empty list, not an error.
    ///
    /// # Errors
    ///
    /// Fails only when the retrieval client fails.
    pub fn create_image_ids(&mut self, request: &SeriesRequest) -> Result<Vec<ImageId>> {
        let mut instances = self.client.retrieve_series_metadata(
            &request.study_instance_uid,
            &request.series_instance_uid,
        )?;

        if let Some(sop_filter) = &request.sop_instance_uid {
            instances.retain(|instance| {
                get_string_value(instance, SOP_INSTANCE_UID).as_deref() == Some(sop_filter)
            });
        }

        if instances.is_empty() {
            debug!(
                "series {} has no instances to resolve",
                request.series_instance_uid
            );
            return Ok(Vec::new());
        }

        let modality = get_string_value(&instances[0], MODALITY);

        let mut image_ids = Vec::with_capacity(instances.len());
        for instance in &instances {
            let series_uid = get_string_value(instance, SERIES_INSTANCE_UID)
                .unwrap_or_else(|| request.series_instance_uid.clone());
            let sop_uid = request
                .sop_instance_uid
                .clone()
                .or_else(|| get_string_value(instance, SOP_INSTANCE_UID))
                .unwrap_or_default();

            let image_id = build_image_id(
                &request.wado_rs_root,
                &request.study_instance_uid,
                &series_uid,
                &sop_uid,
                1,
            );
            self.metadata.add(&image_id, sanitize(instance));
            image_ids.push(image_id);
        }

        let image_ids = expand_multiframe(image_ids, &self.metadata);

        for image_id in &image_ids {
            if let Some(attrs) = self.metadata.get(image_id) {
                let instance = naturalize(attrs);
                if let Some(record) = resolve_pixel_spacing(&instance).to_record() {
                    self.calibration.add(image_id, record);
                }
            }
        }

        if modality.as_deref() == Some("PT") {
            self.compute_suv_scaling(&image_ids);
        }

        Ok(image_ids)
    }

    /// Resolves PET metadata per identifier and runs one batched scaling
    /// call; instances with missing required metadata are skipped and a
    /// calculator failure leaves the scaling provider untouched
    fn compute_suv_scaling(&mut self, image_ids: &[ImageId]) {
        let mut resolved_ids = Vec::with_capacity(image_ids.len());
        let mut pet_instances = Vec::with_capacity(image_ids.len());

        for image_id in image_ids {
            match resolve_pet_instance(&self.metadata, image_id) {
                Ok(metadata) => {
                    resolved_ids.push(image_id);
                    pet_instances.push(metadata);
                }
                Err(err) => {
                    warn!("skipping PET metadata for {image_id}: {err}");
                }
            }
        }

        if pet_instances.is_empty() {
            return;
        }

        match self.suv_calculator.compute(&pet_instances) {
            Ok(scaling_factors) => {
                for (image_id, scaling) in resolved_ids.iter().zip(scaling_factors) {
                    self.scaling.add_instance(image_id, scaling);
                }
            }
            Err(err) => {
                error!("SUV scaling computation failed: {err}");
            }
        }
    }
}
