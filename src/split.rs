//! Scene boundary interpolation.
//!
//! Turns the scene cuts reported by `dovi_tool` into the boundary list used
//! for chunked encoding. Every detected cut is kept, the list always ends at
//! the total frame count, and intervals that are at least twice the maximum
//! scene length get evenly spaced synthetic boundaries.

use tracing::debug;

use crate::SceneError;

/// Split long scenes into smaller chunks at near-regular intervals.
///
/// `cuts` must be non-decreasing. Duplicates are kept as they are. When the
/// last cut is not `total_frames`, `total_frames` is appended as the final
/// boundary, even if it is smaller than the last cut.
///
/// An interval of `diff` frames gets `floor(diff / max_scene_len) - 1`
/// synthetic boundaries placed at `start + floor(step * j)`, where
/// `step = diff / (count + 1)`. Truncation means the sub-intervals are only
/// approximately equal; `[0, 250]` with a limit of 100 becomes
/// `[0, 125, 250]`. A `max_scene_len` of 0 disables splitting.
pub fn split_long_scenes(
    cuts: &[usize],
    total_frames: usize,
    max_scene_len: usize,
) -> Result<Vec<usize>, SceneError> {
    if let Some(i) = cuts.windows(2).position(|pair| pair[1] < pair[0]) {
        return Err(SceneError::InvalidInput(format!(
            "scene cuts must be in ascending order, but {} follows {}",
            cuts[i + 1],
            cuts[i]
        )));
    }

    let mut numbers = cuts.to_vec();
    if numbers.last() != Some(&total_frames) {
        numbers.push(total_frames);
    }

    if max_scene_len == 0 {
        return Ok(numbers);
    }

    let mut result = Vec::with_capacity(numbers.len());
    let mut inserted = 0;

    for pair in numbers.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        result.push(start);

        let scene_len = end.saturating_sub(start);
        let splits = (scene_len / max_scene_len).saturating_sub(1);
        if splits > 0 {
            let step = scene_len as f64 / (splits + 1) as f64;
            result.extend((1..=splits).map(|j| start + (step * j as f64) as usize));
            inserted += splits;
        }
    }

    // windows() only yields left endpoints
    result.extend(numbers.last().copied());

    debug!(
        cuts = cuts.len(),
        inserted,
        boundaries = result.len(),
        "interpolated scene boundaries"
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_subsequence(needle: &[usize], haystack: &[usize]) -> bool {
        let mut rest = haystack.iter();
        needle.iter().all(|n| rest.any(|h| h == n))
    }

    #[test]
    fn test_no_limit_keeps_cuts() {
        let result = split_long_scenes(&[0, 100, 250], 250, 0).unwrap();
        assert_eq!(result, vec![0, 100, 250]);
    }

    #[test]
    fn test_no_limit_appends_total_frames() {
        let result = split_long_scenes(&[0, 100], 250, 0).unwrap();
        assert_eq!(result, vec![0, 100, 250]);
    }

    #[test]
    fn test_empty_cuts_yield_total_frames_only() {
        assert_eq!(split_long_scenes(&[], 500, 0).unwrap(), vec![500]);
        assert_eq!(split_long_scenes(&[], 500, 100).unwrap(), vec![500]);
    }

    #[test]
    fn test_even_split() {
        // 300 frames, max 100 -> two synthetic boundaries, step 100
        let result = split_long_scenes(&[0, 300], 300, 100).unwrap();
        assert_eq!(result, vec![0, 100, 200, 300]);
    }

    #[test]
    fn test_truncated_split_is_uneven() {
        // 250 frames, max 100 -> one synthetic boundary at floor(125)
        let result = split_long_scenes(&[0, 250], 250, 100).unwrap();
        assert_eq!(result, vec![0, 125, 250]);
    }

    #[test]
    fn test_scene_below_twice_limit_is_kept() {
        let result = split_long_scenes(&[0], 400, 250).unwrap();
        assert_eq!(result, vec![0, 400]);
    }

    #[test]
    fn test_multiple_splits() {
        // 1000 frames, max 300 -> 2 synthetic boundaries, step 333.33
        let result = split_long_scenes(&[0], 1000, 300).unwrap();
        assert_eq!(result, vec![0, 333, 666, 1000]);
    }

    #[test]
    fn test_mixed() {
        let result = split_long_scenes(&[0, 100, 600], 900, 200).unwrap();
        // Scene 0-100: 100 frames, no split
        // Scene 100-600: 500 frames, one boundary at 100 + 250
        // Scene 600-900: 300 frames, below twice the limit
        assert_eq!(result, vec![0, 100, 350, 600, 900]);
    }

    #[test]
    fn test_first_cut_need_not_be_zero() {
        let result = split_long_scenes(&[24, 48], 300, 100).unwrap();
        assert_eq!(result, vec![24, 48, 174, 300]);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let result = split_long_scenes(&[0, 50, 50], 100, 0).unwrap();
        assert_eq!(result, vec![0, 50, 50, 100]);
    }

    #[test]
    fn test_total_below_last_cut_is_appended() {
        let result = split_long_scenes(&[0, 300], 250, 100).unwrap();
        assert_eq!(result, vec![0, 100, 200, 300, 250]);
    }

    #[test]
    fn test_descending_cuts_rejected() {
        let err = split_long_scenes(&[0, 200, 100], 300, 0).unwrap_err();
        assert!(matches!(err, SceneError::InvalidInput(_)));
    }

    #[test]
    fn test_invariants_hold() {
        let cuts = [0, 17, 480, 481, 1999, 2400];
        for max in [1, 7, 24, 100, 250, 1000, 10_000] {
            let result = split_long_scenes(&cuts, 5003, max).unwrap();

            assert!(is_subsequence(&cuts, &result), "max {max}: cuts not preserved");
            assert_eq!(result.last(), Some(&5003));
            for pair in result.windows(2) {
                assert!(pair[0] <= pair[1], "max {max}: {pair:?} out of order");
                assert!(pair[1] - pair[0] < 2 * max, "max {max}: gap {pair:?} too long");
            }

            let again = split_long_scenes(&result, 5003, max).unwrap();
            assert_eq!(again, result, "max {max}: re-interpolation changed the list");
        }
    }
}
