use crate::lyrics::track::LyricTrack;

/// How soon after a cue (seconds, exclusive) a run of lines sharing that exact
/// cue still resolves to the first line of the run.
pub const CUE_CLUSTER_WINDOW: f64 = 0.5;

/// Index of the line to highlight at `current_time`, or `None` for no highlight.
///
/// Timestamped tracks pick the last line whose cue has passed. Untimed tracks
/// spread their lines evenly over `duration`, and highlight nothing when the
/// duration is unknown.
pub fn resolve_active_line(
    track: &LyricTrack,
    current_time: f64,
    duration: Option<f64>,
) -> Option<usize> {
    if track.has_timestamps() {
        resolve_by_cue(track, current_time)
    } else {
        resolve_by_ratio(track.len(), current_time, duration)
    }
}

fn resolve_by_cue(track: &LyricTrack, current_time: f64) -> Option<usize> {
    let lines = track.lines();
    // NaN compares false here, which lands in the "before first cue" case.
    let passed = lines.partition_point(|line| line.time <= current_time);
    if passed == 0 {
        return None;
    }
    let mut idx = passed - 1;
    if current_time - lines[idx].time < CUE_CLUSTER_WINDOW {
        while idx > 0 && lines[idx - 1].time == lines[idx].time {
            idx -= 1;
        }
    }
    Some(idx)
}

fn resolve_by_ratio(count: usize, current_time: f64, duration: Option<f64>) -> Option<usize> {
    let duration = duration.filter(|d| d.is_finite() && *d > 0.0)?;
    if count == 0 || current_time.is_nan() {
        return None;
    }
    let ratio = current_time / duration;
    let idx = (ratio * count as f64).floor();
    Some(idx.clamp(0.0, (count - 1) as f64) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lyrics::types::LyricLine;

    fn track(lines: &[(f64, &str)]) -> LyricTrack {
        LyricTrack::from_lines(lines.iter().map(|(t, s)| LyricLine::new(*t, *s)).collect())
    }

    #[test]
    fn tied_cues_light_the_first_line() {
        let t = track(&[(0.0, "A"), (0.0, "B"), (5.0, "C")]);
        assert_eq!(resolve_active_line(&t, 0.2, None), Some(0));
    }

    #[test]
    fn tied_run_resolves_to_last_after_window() {
        let t = track(&[(1.0, "A"), (3.0, "B"), (3.0, "C"), (3.0, "D"), (9.0, "E")]);
        assert_eq!(resolve_active_line(&t, 3.0, None), Some(1));
        assert_eq!(resolve_active_line(&t, 3.49, None), Some(1));
        assert_eq!(resolve_active_line(&t, 3.5, None), Some(3));
    }

    #[test]
    fn close_but_distinct_cues_are_not_merged() {
        let t = track(&[(1.0, "A"), (1.1, "B"), (5.0, "C")]);
        assert_eq!(resolve_active_line(&t, 1.2, None), Some(1));
    }

    #[test]
    fn before_first_cue_is_none() {
        let t = track(&[(10.0, "X")]);
        assert_eq!(resolve_active_line(&t, 5.0, None), None);
        assert_eq!(resolve_active_line(&t, f64::NAN, None), None);
    }

    #[test]
    fn last_passed_cue_wins() {
        let t = track(&[(1.0, "a"), (2.0, "b"), (4.0, "c")]);
        assert_eq!(resolve_active_line(&t, 1.0, None), Some(0));
        assert_eq!(resolve_active_line(&t, 3.9, None), Some(1));
        assert_eq!(resolve_active_line(&t, 400.0, None), Some(2));
    }

    #[test]
    fn idempotent_and_monotone() {
        let t = track(&[(0.0, "a"), (0.0, "b"), (1.0, "c"), (1.0, "d"), (2.5, "e"), (7.0, "f")]);
        let mut prev: Option<usize> = None;
        let mut time = -1.0;
        while time < 10.0 {
            let idx = resolve_active_line(&t, time, None);
            assert_eq!(idx, resolve_active_line(&t, time, None));
            assert!(prev <= idx, "regressed at {time}: {prev:?} -> {idx:?}");
            prev = idx;
            time += 0.05;
        }
    }

    #[test]
    fn proportional_fallback() {
        let t = track(&[(0.0, "a"), (0.0, "b"), (0.0, "c"), (0.0, "d")]);
        assert_eq!(resolve_active_line(&t, 50.0, Some(100.0)), Some(2));
        assert_eq!(resolve_active_line(&t, 0.0, Some(100.0)), Some(0));
        assert_eq!(resolve_active_line(&t, 100.0, Some(100.0)), Some(3));
        assert_eq!(resolve_active_line(&t, 250.0, Some(100.0)), Some(3));
        assert_eq!(resolve_active_line(&t, -3.0, Some(100.0)), Some(0));
    }

    #[test]
    fn proportional_without_duration_is_none() {
        let t = track(&[(0.0, "a"), (0.0, "b")]);
        assert_eq!(resolve_active_line(&t, 10.0, None), None);
        assert_eq!(resolve_active_line(&t, 10.0, Some(0.0)), None);
        assert_eq!(resolve_active_line(&t, 10.0, Some(f64::NAN)), None);
        assert_eq!(resolve_active_line(&t, f64::NAN, Some(60.0)), None);
    }
}
