//! LRC generation by forced alignment.
//!
//! Lyric lines as written by the author are matched against timed
//! transcription segments (speech-to-text output), so the final file keeps the
//! author's wording and borrows only the timing from the transcript.
//!
//! ```text
//! lines + segments ──▶ similarity DP ──▶ drop regressions ──▶ interpolate ──▶ strictly increasing ──▶ LRC
//! ```

use crate::lyrics::similarity::ratio;
use serde::Deserialize;
use std::fmt::Write as _;

/// Minimum gap between two accepted matched cues.
const MIN_CUE_GAP: f64 = 0.1;
/// Spacing used when there is no later known cue to interpolate towards.
const TRAILING_STEP: f64 = 3.0;
/// Lower bound on the span shared out across a run of unknown cues.
const MIN_INTERPOLATION_SPAN: f64 = 0.5;

/// One timed chunk of a transcript.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Segment {
    pub start: f64,
    #[serde(default)]
    pub text: String,
}

/// Lyric lines of a Markdown lyric page, headings excluded.
///
/// Only a `#` in the first column marks a heading; an indented `#` line is
/// kept as lyrics.
pub fn original_lines(markdown: &str) -> Vec<String> {
    markdown
        .lines()
        .filter(|l| !l.starts_with('#'))
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

fn rounded(x: f64) -> i64 {
    (x * 100_000.0).round() as i64
}

/// Match each line to at most one segment, keeping order on both sides and
/// maximizing the summed similarity. Returns the segment index per line.
pub fn match_segments(lines: &[String], segments: &[Segment]) -> Vec<Option<usize>> {
    let n = lines.len();
    let m = segments.len();
    let mut mapping = vec![None; n];
    if n == 0 || m == 0 {
        return mapping;
    }

    let mut sim = vec![vec![0.0; m]; n];
    for (i, line) in lines.iter().enumerate() {
        for (j, seg) in segments.iter().enumerate() {
            sim[i][j] = ratio(line, seg.text.trim());
        }
    }

    let mut dp = vec![vec![0.0f64; m + 1]; n + 1];
    for i in 1..=n {
        for j in 1..=m {
            let score_match = dp[i - 1][j - 1] + sim[i - 1][j - 1];
            dp[i][j] = score_match.max(dp[i - 1][j]).max(dp[i][j - 1]);
        }
    }

    let (mut i, mut j) = (n, m);
    while i > 0 && j > 0 {
        let score_match = dp[i - 1][j - 1] + sim[i - 1][j - 1];
        if rounded(dp[i][j]) == rounded(score_match) {
            mapping[i - 1] = Some(j - 1);
            i -= 1;
            j -= 1;
        } else if rounded(dp[i][j]) == rounded(dp[i - 1][j]) {
            i -= 1;
        } else {
            j -= 1;
        }
    }
    mapping
}

/// Turn partially known cues into a complete, strictly increasing sequence.
pub fn repair_timestamps(mut cues: Vec<Option<f64>>) -> Vec<f64> {
    // Duplicates and regressions are discarded and re-derived below.
    let mut last_valid = -1.0;
    for cue in cues.iter_mut() {
        if let Some(t) = *cue {
            if t <= last_valid + MIN_CUE_GAP {
                *cue = None;
            } else {
                last_valid = t;
            }
        }
    }

    let n = cues.len();
    let mut out = Vec::with_capacity(n);
    let mut last_t = 0.0;
    for idx in 0..n {
        let t = match cues[idx] {
            Some(t) => t,
            None => {
                let next = cues[idx + 1..]
                    .iter()
                    .enumerate()
                    .find_map(|(k, c)| c.map(|t| (idx + 1 + k, t)));
                match next {
                    Some((next_idx, next_t)) => {
                        let gap = (next_idx - idx + 1) as f64;
                        last_t + (next_t - last_t).max(MIN_INTERPOLATION_SPAN) / gap
                    }
                    None => last_t + TRAILING_STEP,
                }
            }
        };
        out.push(t);
        last_t = t;
    }

    let mut current_min = -MIN_CUE_GAP;
    for t in out.iter_mut() {
        if *t <= current_min {
            *t = current_min + MIN_CUE_GAP;
        }
        current_min = *t;
    }
    out
}

/// `[mm:ss.cc]` tag for a cue in seconds.
pub fn format_tag(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let minutes = (seconds / 60.0).floor();
    let rest = seconds - minutes * 60.0;
    format!("[{:02}:{:05.2}]", minutes as u64, rest)
}

/// Render `(cue, text)` pairs as LRC, one line each.
pub fn write_lrc<'a, I>(entries: I) -> String
where
    I: IntoIterator<Item = (f64, &'a str)>,
{
    let mut out = String::new();
    for (cue, text) in entries {
        let _ = writeln!(out, "{} {}", format_tag(cue), text);
    }
    out
}

/// Build an LRC file for `markdown` using the cues of `segments`.
///
/// Returns `None` when there are no lyric lines or no segments to align to.
pub fn generate_lrc(markdown: &str, segments: &[Segment]) -> Option<String> {
    let lines = original_lines(markdown);
    if lines.is_empty() || segments.is_empty() {
        return None;
    }
    let mapping = match_segments(&lines, segments);
    let matched = mapping.iter().filter(|m| m.is_some()).count();
    tracing::debug!(lines = lines.len(), segments = segments.len(), matched, "Aligned lyrics");

    let cues = mapping
        .iter()
        .map(|m| m.map(|j| segments[j].start))
        .collect();
    let cues = repair_timestamps(cues);
    Some(write_lrc(
        cues.iter().copied().zip(lines.iter().map(String::as_str)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lyrics::parse::parse_synced_lyrics;

    fn seg(start: f64, text: &str) -> Segment {
        Segment { start, text: text.to_string() }
    }

    #[test]
    fn tag_formatting() {
        assert_eq!(format_tag(0.0), "[00:00.00]");
        assert_eq!(format_tag(62.5), "[01:02.50]");
        assert_eq!(format_tag(605.256), "[10:05.26]");
    }

    #[test]
    fn original_lines_skip_headings_and_blanks() {
        let lines = original_lines("# Song\n\nline one\n  \n## Chorus\nline two\n");
        assert_eq!(lines, vec!["line one", "line two"]);
    }

    #[test]
    fn indented_hash_is_a_lyric_line() {
        let lines = original_lines("# Song\n  # number one\nline two");
        assert_eq!(lines, vec!["# number one", "line two"]);
    }

    #[test]
    fn matching_follows_similarity_in_order() {
        let lines: Vec<String> = ["walking in the rain", "under city lights", "home again"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let segments = vec![
            seg(1.0, "uh"),
            seg(2.0, "walking in the rain"),
            seg(5.0, "under the city light"),
            seg(9.0, "home again"),
        ];
        assert_eq!(
            match_segments(&lines, &segments),
            vec![Some(1), Some(2), Some(3)]
        );
    }

    #[test]
    fn repair_interpolates_gaps() {
        let cues = repair_timestamps(vec![Some(2.0), None, Some(8.0)]);
        // 2 + (8 - 2) / (2 - 1 + 1)
        assert_eq!(cues, vec![2.0, 5.0, 8.0]);
    }

    #[test]
    fn repair_drops_regressions_and_extends_tail() {
        let cues = repair_timestamps(vec![Some(5.0), Some(4.0), Some(5.05), None]);
        assert_eq!(cues.len(), 4);
        assert_eq!(cues[0], 5.0);
        assert!(cues.windows(2).all(|w| w[0] < w[1]), "{cues:?}");
        assert_eq!(cues[3], cues[2] + 3.0);
    }

    #[test]
    fn repair_with_nothing_known() {
        let cues = repair_timestamps(vec![None, None]);
        assert_eq!(cues, vec![3.0, 6.0]);
    }

    #[test]
    fn generated_lrc_parses_back_in_order() {
        let md = "# Title\nfirst line here\nsecond line here\nthird line here\n";
        let segments = vec![
            seg(3.2, "first line here"),
            seg(7.9, "second line here"),
            seg(12.4, "third line here"),
        ];
        let lrc = generate_lrc(md, &segments).expect("lrc");
        assert_eq!(
            lrc,
            "[00:03.20] first line here\n[00:07.90] second line here\n[00:12.40] third line here\n"
        );
        let parsed = parse_synced_lyrics(&lrc);
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[2].text, "third line here");
    }

    #[test]
    fn nothing_to_align() {
        assert!(generate_lrc("# only a heading", &[seg(1.0, "x")]).is_none());
        assert!(generate_lrc("a line", &[]).is_none());
    }
}
