//! Image identifier codec and multiframe expansion
//!
//! Two identifier dialects are recognized: the web-resource dialect
//! (`wadors:` prefix, `/frames/N` suffix) and the legacy dialect
//! (`&frame=N` suffix). Construction and parsing are deterministic and
//! never fail on malformed-but-present input.

use crate::metadata::MetadataStore;
use crate::types::ImageId;

const WADORS_MARKER: &str = "wadors:";
const FRAMES_SUFFIX: &str = "/frames/";
const LEGACY_FRAME_SUFFIX: &str = "&frame=";

/// Position of the frame marker and the frameless form of an identifier
///
/// The frameless form retains the frame marker itself, ready for a frame
/// number to be appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameInfo {
    /// Byte offset of the frame marker, when one was found
    pub frame_index: Option<usize>,
    /// Identifier with the frame number stripped, marker retained
    pub frameless: String,
}

/// Splits an identifier into its frame marker position and frameless form
///
/// Web-resource identifiers use the `/frames/` suffix; anything else is
/// treated as the legacy dialect with an `&frame=` suffix, which is
/// appended empty when missing so the result is always suffixable.
pub fn frame_info(image_id: &str) -> FrameInfo {
    if image_id.contains(WADORS_MARKER) {
        let frame_index = image_id.find(FRAMES_SUFFIX);
        let frameless = match frame_index {
            Some(idx) => image_id[..idx + FRAMES_SUFFIX.len()].to_string(),
            None => image_id.to_string(),
        };
        FrameInfo {
            frame_index,
            frameless,
        }
    } else {
        let frame_index = image_id.find(LEGACY_FRAME_SUFFIX);
        let mut frameless = match frame_index {
            Some(idx) => image_id[..idx + LEGACY_FRAME_SUFFIX.len()].to_string(),
            None => image_id.to_string(),
        };
        if !frameless.contains(LEGACY_FRAME_SUFFIX) {
            frameless.push_str(LEGACY_FRAME_SUFFIX);
        }
        FrameInfo {
            frame_index,
            frameless,
        }
    }
}

/// Builds a web-resource identifier from study/series/instance UIDs and
/// a frame number
pub fn build_image_id(
    wado_rs_root: &str,
    study_instance_uid: &str,
    series_instance_uid: &str,
    sop_instance_uid: &str,
    frame: u32,
) -> ImageId {
    ImageId::new(format!(
        "{WADORS_MARKER}{wado_rs_root}/studies/{study_instance_uid}/series/{series_instance_uid}/instances/{sop_instance_uid}/frames/{frame}"
    ))
}

/// Expands multiframe instance identifiers into one identifier per frame
///
/// For each identifier whose instance declares a frame count above one,
/// emits that many identifiers built from the frameless form with frame
/// numbers `1..=count`; all other identifiers pass through unchanged.
/// Output preserves input instance order. Already-expanded identifiers
/// are left alone because their frame-count lookup reports at most one.
pub fn expand_multiframe<S: MetadataStore>(image_ids: Vec<ImageId>, store: &S) -> Vec<ImageId> {
    let mut expanded = Vec::with_capacity(image_ids.len());
    for image_id in image_ids {
        let frames = store
            .multiframe(&image_id)
            .and_then(|m| m.number_of_frames)
            .unwrap_or(1);
        if frames > 1 {
            let frameless = frame_info(image_id.as_str()).frameless;
            for frame in 1..=frames {
                expanded.push(ImageId::new(format!("{frameless}{frame}")));
            }
        } else {
            expanded.push(image_id);
        }
    }
    expanded
}
