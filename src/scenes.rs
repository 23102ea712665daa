use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::SceneError;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Scene {
    pub start_frame: usize,
    // end_frame is *exclusive*
    pub end_frame: usize,
    pub zone_overrides: Option<serde_json::Value>,
}

/// The scenes file read by Av1an's `--scenes` option.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SceneDocument {
    pub scenes: Vec<Scene>,
    pub frames: usize,
}

impl SceneDocument {
    /// Pair up consecutive boundaries into scenes.
    ///
    /// Fails when fewer than two boundaries are given or when a boundary is
    /// smaller than the one before it.
    pub fn from_boundaries(boundaries: &[usize], total_frames: usize) -> Result<Self, SceneError> {
        if boundaries.len() < 2 {
            return Err(SceneError::InvalidInput(format!(
                "at least two scene boundaries are needed to form a scene, got {}",
                boundaries.len()
            )));
        }

        let mut scenes = Vec::with_capacity(boundaries.len() - 1);
        for pair in boundaries.windows(2) {
            let (start_frame, end_frame) = (pair[0], pair[1]);
            if end_frame < start_frame {
                return Err(SceneError::InvalidInput(format!(
                    "scene would end at frame {end_frame} before it starts at frame {start_frame}"
                )));
            }
            if end_frame == start_frame {
                warn!(frame = start_frame, "duplicate scene boundary produces an empty scene");
            }
            scenes.push(Scene {
                start_frame,
                end_frame,
                zone_overrides: None,
            });
        }

        Ok(Self {
            scenes,
            frames: total_frames,
        })
    }

    pub fn to_json(&self) -> Result<String, SceneError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the document as two-space indented JSON.
    pub fn write_json(&self, path: &Path) -> Result<(), SceneError> {
        let file = File::create(path).map_err(|e| SceneError::io(path, e))?;
        let mut writer = BufWriter::new(file);

        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush().map_err(|e| SceneError::io(path, e))?;

        info!(scenes = self.scenes.len(), "scenes JSON written to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene(start_frame: usize, end_frame: usize) -> Scene {
        Scene {
            start_frame,
            end_frame,
            zone_overrides: None,
        }
    }

    #[test]
    fn test_from_boundaries() {
        let doc = SceneDocument::from_boundaries(&[0, 100, 250], 250).unwrap();
        assert_eq!(doc.scenes, vec![scene(0, 100), scene(100, 250)]);
        assert_eq!(doc.frames, 250);
    }

    #[test]
    fn test_scenes_are_contiguous() {
        let doc = SceneDocument::from_boundaries(&[0, 125, 250, 400, 401], 401).unwrap();
        for pair in doc.scenes.windows(2) {
            assert_eq!(pair[0].end_frame, pair[1].start_frame);
        }
        assert_eq!(doc.scenes.last().unwrap().end_frame, 401);
    }

    #[test]
    fn test_single_boundary_rejected() {
        let err = SceneDocument::from_boundaries(&[500], 500).unwrap_err();
        assert!(matches!(err, SceneError::InvalidInput(_)));

        let err = SceneDocument::from_boundaries(&[], 0).unwrap_err();
        assert!(matches!(err, SceneError::InvalidInput(_)));
    }

    #[test]
    fn test_backwards_scene_rejected() {
        let err = SceneDocument::from_boundaries(&[0, 300, 250], 250).unwrap_err();
        assert!(matches!(err, SceneError::InvalidInput(_)));
    }

    #[test]
    fn test_empty_scene_kept() {
        let doc = SceneDocument::from_boundaries(&[0, 50, 50, 100], 100).unwrap();
        assert_eq!(doc.scenes[1], scene(50, 50));
    }

    #[test]
    fn test_json_layout() {
        let doc = SceneDocument::from_boundaries(&[0, 100], 100).unwrap();
        let expected = r#"{
  "scenes": [
    {
      "start_frame": 0,
      "end_frame": 100,
      "zone_overrides": null
    }
  ],
  "frames": 100
}"#;
        assert_eq!(doc.to_json().unwrap(), expected);
    }

    #[test]
    fn test_write_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scenes.json");

        let doc = SceneDocument::from_boundaries(&[0, 100, 200, 300], 300).unwrap();
        doc.write_json(&path).unwrap();

        let read: SceneDocument =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(read, doc);
    }
}
