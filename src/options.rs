use std::path::{Path, PathBuf};

use crate::{append_to_path, SceneError};

/// Parse a maximum scene length in frames. Empty means no limit (0).
pub fn parse_max_scene_len(value: &str) -> Result<usize, SceneError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(0);
    }
    value.parse::<usize>().map_err(|_| {
        SceneError::Configuration(format!(
            "max scene length must be a non-negative number of frames, got \"{value}\""
        ))
    })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SceneOptions {
    /// Maximum scene length in frames, 0 for no limit
    pub max_scene_len: usize,
    pub max_scene_secs: Option<u32>,
    /// Frame rate as numerator and denominator
    pub fps: Option<(u32, u32)>,
}

impl SceneOptions {
    /// Maximum scene length in frames: the frame limit or the seconds limit,
    /// whichever is smaller. 0 means no limit.
    pub fn effective_max_scene_len(&self) -> Result<usize, SceneError> {
        let secs_limit = match (self.max_scene_secs, self.fps) {
            (Some(_), None) => {
                return Err(SceneError::Configuration(
                    "a maximum scene length in seconds needs --fps-num and --fps-den".to_owned(),
                ))
            }
            (Some(_), Some((_, 0))) => {
                return Err(SceneError::Configuration(
                    "fps denominator must not be zero".to_owned(),
                ))
            }
            (Some(0), _) | (Some(_), Some((0, _))) => {
                return Err(SceneError::Configuration(
                    "a maximum scene length in seconds must be at least one frame long".to_owned(),
                ))
            }
            (Some(secs), Some((num, den))) => {
                let fps = num as f64 / den as f64;
                Some((fps * secs as f64).ceil() as usize)
            }
            (None, _) => None,
        };

        Ok(match secs_limit {
            Some(limit) if self.max_scene_len == 0 => limit,
            Some(limit) => limit.min(self.max_scene_len),
            None => self.max_scene_len,
        })
    }
}

/// RPU path used for a video when none is given: `<video>.rpu`.
pub fn default_rpu_path(video: &Path) -> PathBuf {
    append_to_path(video, ".rpu")
}

/// `<rpu>-av1an-scenes.json`, or `<rpu>-av1an-scenes-max<N>.json` with a limit.
pub fn scenes_output_path(rpu: &Path, max_scene_len: usize) -> PathBuf {
    if max_scene_len > 0 {
        append_to_path(rpu, &format!("-av1an-scenes-max{max_scene_len}.json"))
    } else {
        append_to_path(rpu, "-av1an-scenes.json")
    }
}
