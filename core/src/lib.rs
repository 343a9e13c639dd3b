pub mod cli;
pub mod error;
pub mod imageid;
pub mod metadata;
pub mod pet;
pub mod pipeline;
pub mod spacing;
pub mod types;

pub use error::{Result, WadocatError};
pub use imageid::{build_image_id, expand_multiframe, frame_info, FrameInfo};
pub use pet::resolve_pet_instance;
pub use pipeline::{ImageIdPipeline, RetrieveClient, SeriesRequest, SuvCalculator};
pub use spacing::resolve_pixel_spacing;
pub use types::*;
