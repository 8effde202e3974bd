use crate::lyrics::{LyricTrack, resolve_active_line};
use crate::ui::util::{format_time, line_role};
use std::fmt::Write as _;

/// Render the whole track as it would look at `position`: one row per line
/// with its role marker and cue, long lines wrapped to `width` columns.
pub fn render_snapshot(
    track: &LyricTrack,
    position: f64,
    duration: Option<f64>,
    width: usize,
) -> String {
    let active = resolve_active_line(track, position, duration);
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} / {}{}",
        format_time(position),
        duration.map(format_time).unwrap_or_else(|| "--:--".to_string()),
        if track.has_timestamps() { "" } else { " (untimed)" }
    );

    // marker + space + cue column + space
    let indent = " ".repeat(3 + 6);
    let text_width = width.saturating_sub(indent.len()).max(10);
    for (i, line) in track.lines().iter().enumerate() {
        let role = line_role(i, active);
        let cue = if track.has_timestamps() {
            format_time(line.time)
        } else {
            String::new()
        };
        for (n, chunk) in textwrap::wrap(&line.text, text_width).iter().enumerate() {
            if n == 0 {
                let _ = writeln!(out, "{} {:>5} {}", role.marker(), cue, chunk);
            } else {
                let _ = writeln!(out, "{}{}", indent, chunk);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_active_line() {
        let track = LyricTrack::parse_text("[00:01.00]one\n[00:05.00]two\n[00:09.00]three");
        let out = render_snapshot(&track, 5.2, Some(12.0), 80);
        let rows: Vec<&str> = out.lines().collect();
        assert_eq!(rows[0], "0:05 / 0:12");
        assert_eq!(rows[1], " -  0:01 one");
        assert_eq!(rows[2], ">>  0:05 two");
        assert_eq!(rows[3], " -  0:09 three");
    }

    #[test]
    fn untimed_without_duration_highlights_nothing() {
        let track = LyricTrack::parse_text("alpha\nbeta");
        let out = render_snapshot(&track, 30.0, None, 80);
        assert!(out.starts_with("0:30 / --:-- (untimed)\n"));
        assert!(!out.contains(">>"));
    }

    #[test]
    fn wraps_long_lines() {
        let track = LyricTrack::parse_text("a very long lyric line that will not fit in the width");
        let out = render_snapshot(&track, 0.0, None, 30);
        assert!(out.lines().count() > 2);
    }
}
