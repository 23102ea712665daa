//! Reading the scene cut list exported by `dovi_tool` (one frame number per line).

use std::{fs, path::Path};

use crate::SceneError;

pub fn parse_cut_frames(text: &str) -> Result<Vec<usize>, SceneError> {
    text.lines()
        .enumerate()
        .map(|(n, line)| (n + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .map(|(line_number, line)| {
            line.parse::<usize>().map_err(|_| {
                SceneError::InvalidInput(format!(
                    "line {line_number} \"{line}\" is not a frame number"
                ))
            })
        })
        .collect()
}

pub fn read_cut_frames(path: &Path) -> Result<Vec<usize>, SceneError> {
    let text = fs::read_to_string(path).map_err(|e| SceneError::io(path, e))?;
    parse_cut_frames(&text)
}
