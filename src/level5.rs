//! Total frame count from a Dolby Vision level 5 (active area) export.
//!
//! `dovi_tool export -d level5=...` writes an object whose `edits` keys are
//! inclusive `first-last` frame ranges. The last frame of the final range
//! plus one is the length of the video.

use std::{collections::BTreeMap, fs, path::Path};

use serde::Deserialize;

use crate::SceneError;

#[derive(Deserialize, Debug)]
struct Level5Export {
    #[serde(default)]
    edits: BTreeMap<String, serde_json::Value>,
}

fn last_frame(key: &str) -> Result<usize, SceneError> {
    let unexpected = || SceneError::InvalidInput(format!("unexpected L5 edit key \"{key}\""));

    let mut fields = key.split('-');
    let (Some(first), Some(last)) = (fields.next(), fields.next()) else {
        return Err(unexpected());
    };
    first.trim().parse::<usize>().map_err(|_| unexpected())?;
    last.trim().parse::<usize>().map_err(|_| unexpected())
}

pub fn parse_level5_total_frames(json: &str) -> Result<usize, SceneError> {
    let export: Level5Export = serde_json::from_str(json)?;
    if export.edits.is_empty() {
        return Err(SceneError::InvalidInput("no edits found in L5 JSON".to_owned()));
    }

    let mut total = 0;
    for key in export.edits.keys() {
        let frames = last_frame(key)?.checked_add(1).ok_or_else(|| {
            SceneError::InvalidInput(format!("L5 edit key \"{key}\" is out of range"))
        })?;
        total = total.max(frames);
    }
    Ok(total)
}

pub fn read_level5_total_frames(path: &Path) -> Result<usize, SceneError> {
    let json = fs::read_to_string(path).map_err(|e| SceneError::io(path, e))?;
    parse_level5_total_frames(&json)
}
