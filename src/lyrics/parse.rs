use crate::lyrics::types::{LegacyLine, LyricLine};
use once_cell::sync::Lazy;
use regex::Regex;

static SYNCED_LYRICS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(\d{2}):(\d{2}\.\d{2,3})\]").unwrap());

static HEADING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#+\s*").unwrap());

/// Parse time-synced lyrics into LyricLine structs, sorted by time.
///
/// Lines without a `[mm:ss.xx]` tag, or with nothing left after the tags, are
/// dropped. Every tag on a line produces its own entry.
pub fn parse_synced_lyrics(synced: &str) -> Vec<LyricLine> {
    let re = &SYNCED_LYRICS_RE;
    let mut lines = Vec::new();
    for line in synced.lines() {
        let matches: Vec<_> = re.captures_iter(line).collect();
        if matches.is_empty() {
            continue;
        }
        let text = re.replace_all(line, "").trim().to_string();
        if text.is_empty() {
            continue;
        }
        for cap in matches {
            let min = cap
                .get(1)
                .and_then(|m| m.as_str().parse::<u32>().ok())
                .unwrap_or(0);
            let sec = cap
                .get(2)
                .and_then(|s| s.as_str().parse::<f64>().ok())
                .unwrap_or(0.0);
            lines.push(LyricLine {
                time: min as f64 * 60.0 + sec,
                text: text.clone(),
            });
        }
    }
    // Stable, so lines sharing a cue keep their file order.
    lines.sort_by(|a, b| a.time.total_cmp(&b.time));
    lines
}

/// Split untimed text into lines at time 0, skipping blank ones.
pub fn parse_plain_lyrics(text: &str) -> Vec<LyricLine> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|l| LyricLine::new(0.0, l))
        .collect()
}

/// Like [`parse_plain_lyrics`], for lyric pages written in Markdown.
pub fn parse_markdown_lyrics(text: &str) -> Vec<LyricLine> {
    text.lines()
        .map(|l| l.replace('\u{a0}', " "))
        .filter(|l| !l.trim().is_empty())
        .map(|l| HEADING_RE.replace(l.trim(), "").trim().to_string())
        .filter(|l| !l.is_empty())
        .map(|l| LyricLine::new(0.0, l))
        .collect()
}

/// Convert legacy `{time, text}` records. Non-finite times are dropped and
/// negative ones clamp to zero.
pub fn parse_legacy_lyrics(records: &[LegacyLine]) -> Vec<LyricLine> {
    let mut lines: Vec<LyricLine> = records
        .iter()
        .filter(|r| r.time.is_finite())
        .filter_map(|r| {
            let text = r.text.trim();
            if text.is_empty() {
                None
            } else {
                Some(LyricLine::new(r.time.max(0.0), text))
            }
        })
        .collect();
    lines.sort_by(|a, b| a.time.total_cmp(&b.time));
    lines
}
