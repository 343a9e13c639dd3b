//! Core type definitions for image identifier and metadata resolution
//!
//! This module provides the fundamental types used throughout the wadocat
//! library:
//! - [`ImageId`]: per-frame image identifier token
//! - [`PixelSpacing`] / [`SpacingResolution`] / [`CalibrationRecord`]:
//!   pixel spacing calibration results
//! - [`PetInstanceMetadata`] / [`ScalingFactor`]: PET SUV scaling inputs
//!   and outputs
//! - [`CalibrationProvider`] / [`ScalingProvider`]: session-scoped
//!   per-identifier metadata stores

mod image_id;
mod pet;
mod providers;
mod spacing;

pub use image_id::ImageId;
pub use pet::{DateParts, DateValue, PetInstanceMetadata, ScalingFactor, TimeParts, TimeValue};
pub use providers::{
    CalibrationProvider, ScalingProvider, CALIBRATED_PIXEL_SPACING, SCALING_MODULE,
};
pub use spacing::{CalibrationRecord, CalibrationType, PixelSpacing, SpacingResolution};
