//! Attribute-level metadata handling
//!
//! Raw attribute dictionaries arrive from the retrieval client in DICOM
//! JSON form: tag key (8 hex digits) to a `{ "vr": .., "Value": [..] }`
//! wrapper. This module sanitizes those dictionaries, naturalizes them
//! into typed views, and exposes module-scoped lookups over them.

pub mod modules;
pub mod naturalize;
pub mod sanitize;
pub mod store;
pub mod tags;

/// Attribute dictionary as returned by the retrieval client; may contain
/// null entries
pub type RawInstanceAttributes = serde_json::Map<String, serde_json::Value>;

/// Attribute dictionary with null entries removed
pub type SanitizedAttributes = serde_json::Map<String, serde_json::Value>;

pub use modules::{
    CorrectedImageValue, GeneralSeriesModule, MultiframeModule, PatientStudyModule,
    PetImageModule, PetIsotopeModule, PetSeriesModule, RadiopharmaceuticalInfo,
};
pub use naturalize::{naturalize, NaturalizedInstance, UltrasoundRegion};
pub use sanitize::sanitize;
pub use store::{InstanceMetadataManager, MetadataStore};
