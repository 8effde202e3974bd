use crate::lyrics::parse::{
    parse_legacy_lyrics, parse_markdown_lyrics, parse_plain_lyrics, parse_synced_lyrics,
};
use crate::lyrics::types::{LyricLine, LyricSource, SENTINEL_TEXT};

/// The parsed lyric lines of one track.
///
/// Never empty and always sorted by cue time. Built once per track load and
/// replaced, never edited, when the track changes.
#[derive(Debug, Clone, PartialEq)]
pub struct LyricTrack {
    lines: Vec<LyricLine>,
    has_timestamps: bool,
}

impl LyricTrack {
    /// Build a track from already-parsed lines, substituting the sentinel line
    /// when `lines` is empty.
    pub fn from_lines(mut lines: Vec<LyricLine>) -> Self {
        if lines.is_empty() {
            return Self::sentinel();
        }
        lines.sort_by(|a, b| a.time.total_cmp(&b.time));
        let has_timestamps = lines.iter().any(|l| l.time > 0.0);
        Self { lines, has_timestamps }
    }

    pub fn sentinel() -> Self {
        Self {
            lines: vec![LyricLine::new(0.0, SENTINEL_TEXT)],
            has_timestamps: false,
        }
    }

    /// Try each source in order and keep the first that yields lines.
    ///
    /// An LRC source only counts when at least one timestamped line was
    /// recovered, so callers usually follow it with the same text as
    /// `Plain` or `Markdown`.
    pub fn parse<I>(sources: I) -> Self
    where
        I: IntoIterator<Item = LyricSource>,
    {
        for source in sources {
            let lines = match &source {
                LyricSource::Lrc(text) => parse_synced_lyrics(text),
                LyricSource::Plain(text) => parse_plain_lyrics(text),
                LyricSource::Markdown(text) => parse_markdown_lyrics(text),
                LyricSource::Legacy(records) => parse_legacy_lyrics(records),
            };
            if lines.is_empty() {
                tracing::debug!(source = source.kind(), "Lyric source yielded no lines");
                continue;
            }
            tracing::debug!(source = source.kind(), lines = lines.len(), "Parsed lyrics");
            return Self::from_lines(lines);
        }
        Self::sentinel()
    }

    /// Parse raw text as LRC, falling back to plain lines.
    pub fn parse_text(text: &str) -> Self {
        Self::parse([
            LyricSource::Lrc(text.to_string()),
            LyricSource::Plain(text.to_string()),
        ])
    }

    pub fn lines(&self) -> &[LyricLine] {
        &self.lines
    }

    pub fn get(&self, index: usize) -> Option<&LyricLine> {
        self.lines.get(index)
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True iff at least one line has a cue after 0.
    pub fn has_timestamps(&self) -> bool {
        self.has_timestamps
    }

    pub fn is_sentinel(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].time == 0.0 && self.lines[0].text == SENTINEL_TEXT
    }

    /// Cue of the last line, used as a fallback length when no duration is known.
    pub fn last_cue(&self) -> f64 {
        self.lines.last().map(|l| l.time).unwrap_or(0.0)
    }
}

impl Default for LyricTrack {
    fn default() -> Self {
        Self::sentinel()
    }
}
