use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Text shown when no source produced a single usable line.
pub const SENTINEL_TEXT: &str = "No lyrics available";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LyricLine {
    /// Cue in seconds from the start of the track (0 for untimed lines).
    pub time: f64,
    pub text: String,
}

impl LyricLine {
    pub fn new(time: f64, text: impl Into<String>) -> Self {
        Self { time, text: text.into() }
    }
}

/// Record shape of the older structured lyric lists (`[{"time": 1.5, "text": "..."}]`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LegacyLine {
    #[serde(default)]
    pub time: f64,
    #[serde(default)]
    pub text: String,
}

/// One candidate lyric payload for a track, tried in priority order by
/// [`LyricTrack::parse`](crate::lyrics::LyricTrack::parse).
#[derive(Debug, Clone, PartialEq)]
pub enum LyricSource {
    /// `[mm:ss.xx]text` lines.
    Lrc(String),
    /// Newline-delimited text without timestamps.
    Plain(String),
    /// Like `Plain`, but heading markers and non-breaking spaces are cleaned up.
    Markdown(String),
    Legacy(Vec<LegacyLine>),
}

impl LyricSource {
    pub fn kind(&self) -> &'static str {
        match self {
            LyricSource::Lrc(_) => "lrc",
            LyricSource::Plain(_) => "plain",
            LyricSource::Markdown(_) => "markdown",
            LyricSource::Legacy(_) => "legacy",
        }
    }
}

#[derive(Error, Debug)]
pub enum LyricsError {
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("JSON error in {path:?}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Not found: {0}")]
    NotFound(String),
}

impl LyricsError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LyricsError::Io { path: path.into(), source }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        LyricsError::Json { path: path.into(), source }
    }

    /// True when the underlying cause is a missing file.
    pub fn is_missing(&self) -> bool {
        matches!(self, LyricsError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}
