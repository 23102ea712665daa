//! Where the scene cuts and the total frame count come from.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use tracing::info;

use crate::{cuts::read_cut_frames, level5::read_level5_total_frames, tools, SceneError};

pub trait CutSource {
    fn cut_frames(&self) -> Result<Vec<usize>, SceneError>;
}

pub trait FrameCounter {
    fn total_frames(&self) -> Result<usize, SceneError>;
}

/// An existing cut list, one frame number per line.
#[derive(Debug, Clone)]
pub struct SceneFile(pub PathBuf);

impl CutSource for SceneFile {
    fn cut_frames(&self) -> Result<Vec<usize>, SceneError> {
        read_cut_frames(&self.0)
    }
}

/// Scene cuts exported from an RPU by `dovi_tool`.
#[derive(Debug, Clone)]
pub struct DoviScenes(pub PathBuf);

impl CutSource for DoviScenes {
    fn cut_frames(&self) -> Result<Vec<usize>, SceneError> {
        let scenes = tools::export_scenes(&self.0)?;
        let cuts = read_cut_frames(&scenes)?;
        info!(cuts = cuts.len(), "read scene cuts from {}", scenes.display());
        Ok(cuts)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedFrameCount(pub usize);

impl FrameCounter for FixedFrameCount {
    fn total_frames(&self) -> Result<usize, SceneError> {
        Ok(self.0)
    }
}

/// Frame count from the level 5 metadata of an RPU.
#[derive(Debug, Clone)]
pub struct Level5FrameCount(pub PathBuf);

impl FrameCounter for Level5FrameCount {
    fn total_frames(&self) -> Result<usize, SceneError> {
        let l5 = tools::export_level5(&self.0)?;
        read_level5_total_frames(&l5)
    }
}

/// Frame count from the packets of the video stream.
#[derive(Debug, Clone)]
pub struct FfprobeFrameCount(pub PathBuf);

impl FrameCounter for FfprobeFrameCount {
    fn total_frames(&self) -> Result<usize, SceneError> {
        tools::ffprobe_frame_count(&self.0)
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FrameCountMethod {
    /// Last frame of the RPU's level 5 metadata
    #[default]
    Level5,
    /// Packet count of the video stream (requires --video)
    Ffprobe,
}

impl FrameCountMethod {
    pub fn counter(
        self,
        rpu: &Path,
        video: Option<&Path>,
    ) -> Result<Box<dyn FrameCounter>, SceneError> {
        match self {
            Self::Level5 => Ok(Box::new(Level5FrameCount(rpu.to_path_buf()))),
            Self::Ffprobe => video
                .map(|video| Box::new(FfprobeFrameCount(video.to_path_buf())) as Box<dyn FrameCounter>)
                .ok_or_else(|| {
                    SceneError::Configuration(
                        "counting frames with ffprobe requires a video source".to_owned(),
                    )
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_scene_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scenes.txt");
        fs::write(&path, "0\n240\n\n913\n").unwrap();

        assert_eq!(SceneFile(path).cut_frames().unwrap(), vec![0, 240, 913]);
    }

    #[test]
    fn test_fixed_frame_count() {
        assert_eq!(FixedFrameCount(1440).total_frames().unwrap(), 1440);
    }

    #[test]
    fn test_ffprobe_needs_video() {
        let err = FrameCountMethod::Ffprobe.counter(Path::new("a.rpu"), None).err().unwrap();
        assert!(matches!(err, SceneError::Configuration(_)));

        assert!(FrameCountMethod::Ffprobe
            .counter(Path::new("a.rpu"), Some(Path::new("a.mkv")))
            .is_ok());
        assert!(FrameCountMethod::Level5.counter(Path::new("a.rpu"), None).is_ok());
    }
}
