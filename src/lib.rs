//! Av1an scene lists from Dolby Vision scene cuts.
//!
//! The scene cuts stored in a Dolby Vision RPU are turned into an Av1an
//! `--scenes` file. Long scenes are split at near-regular intervals while
//! every original cut is kept.

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use tracing::info;

pub mod cuts;
mod error;
pub mod level5;
pub mod options;
pub mod scenes;
pub mod source;
pub mod split;
pub mod tools;

pub use error::SceneError;
pub use options::SceneOptions;
pub use scenes::{Scene, SceneDocument};
pub use source::{CutSource, FrameCounter};
pub use split::split_long_scenes;

/// `path` with `suffix` appended to its final component, e.g. `a.rpu` -> `a.rpu-scenes.txt`.
pub(crate) fn append_to_path(path: &Path, suffix: &str) -> PathBuf {
    let mut path = OsString::from(path);
    path.push(suffix);
    PathBuf::from(path)
}

/// Build the scene document for one video.
pub fn build_scene_document(
    cuts: &dyn CutSource,
    counter: &dyn FrameCounter,
    max_scene_len: usize,
) -> Result<SceneDocument, SceneError> {
    let total_frames = counter.total_frames()?;
    let cut_frames = cuts.cut_frames()?;
    info!(total_frames, cuts = cut_frames.len(), "scene cuts loaded");
    let boundaries = split_long_scenes(&cut_frames, total_frames, max_scene_len)?;
    SceneDocument::from_boundaries(&boundaries, total_frames)
}
