//! Local lyric library.
//!
//! Resolves a song against a site directory laid out like the portfolio's
//! static assets and loads loose lyric files from disk. Both produce an
//! ordered list of [`LyricSource`] candidates for [`LyricTrack::parse`].
//!
//! # Layout
//!
//! - `assets/data/music.json`: songs (`id`, `lyricText`, `lyricId`, ...)
//! - `assets/data/lyrics.json`: lyric pages (`id`, `contentPath`, `order`, ...)
//! - `assets/lyrics/<id>.lrc`: generated timed lyrics
//!
//! # Lookup order
//!
//! ```text
//! <id>.lrc ──────────────────────────────────────────▶ Lrc
//! song.lyricText ─────────────────────────────────────▶ Plain
//!    │ unset
//!    ▼
//! song.lyricId ─▶ lyrics.json entry ─▶ contentPath ─▶ Markdown
//! ```
//!
//! The LRC candidate comes first; the static text is only used when the LRC
//! file is missing or has no usable cue.

use crate::lyrics::track::LyricTrack;
use crate::lyrics::types::{LegacyLine, LyricSource, LyricsError};
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;

// ============================================================================
// Catalogue Types
// ============================================================================

/// A playable song from `music.json`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    /// Inline untimed lyrics.
    #[serde(default)]
    pub lyric_text: Option<String>,
    /// Reference into `lyrics.json`.
    #[serde(default, deserialize_with = "opt_id_string")]
    pub lyric_id: Option<String>,
}

/// A lyric page from `lyrics.json`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LyricEntry {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content_path: Option<String>,
    #[serde(default)]
    pub audio_path: Option<String>,
    #[serde(default)]
    pub order: Option<i64>,
}

// Ids in the site data are sometimes numbers.
fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!("expected string or number id, got {other}"))),
    }
}

fn opt_id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(de::Error::custom(format!("expected string or number id, got {other}"))),
    }
}

fn id_matches(a: &str, b: &str) -> bool {
    a.trim() == b.trim()
}

#[derive(Debug, Clone)]
pub struct Library {
    root: PathBuf,
}

impl Library {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn music_path(&self) -> PathBuf {
        self.root.join("assets").join("data").join("music.json")
    }

    fn catalogue_path(&self) -> PathBuf {
        self.root.join("assets").join("data").join("lyrics.json")
    }

    fn lrc_path(&self, song_id: &str) -> PathBuf {
        self.root
            .join("assets")
            .join("lyrics")
            .join(format!("{}.lrc", song_id.trim()))
    }

    pub async fn songs(&self) -> Result<Vec<Song>, LyricsError> {
        read_json(&self.music_path()).await
    }

    /// Lyric pages sorted by their `order` field (unordered entries last).
    pub async fn entries(&self) -> Result<Vec<LyricEntry>, LyricsError> {
        let mut entries: Vec<LyricEntry> = read_json(&self.catalogue_path()).await?;
        entries.sort_by_key(|e| e.order.unwrap_or(i64::MAX));
        Ok(entries)
    }

    /// Candidate sources for `song_id`, highest priority first.
    ///
    /// Every failure along the way is logged and skipped; an empty result
    /// means no lyrics are available for the song.
    pub async fn sources_for(&self, song_id: &str) -> Vec<LyricSource> {
        let mut sources = Vec::new();
        let lrc_path = self.lrc_path(song_id);
        match read_text(&lrc_path).await {
            Ok(text) => sources.push(LyricSource::Lrc(text)),
            Err(e) if e.is_missing() => {
                tracing::debug!(path = %lrc_path.display(), "No LRC file for song");
            }
            Err(e) => {
                tracing::warn!(path = %lrc_path.display(), error = %e, "Failed to read LRC file");
            }
        }

        let songs = match self.songs().await {
            Ok(songs) => songs,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load song list");
                return sources;
            }
        };
        let Some(song) = songs.into_iter().find(|s| id_matches(&s.id, song_id)) else {
            tracing::warn!(song = song_id, "Unknown song id");
            return sources;
        };

        tracing::debug!(
            song = song_id,
            title = song.title.as_deref().unwrap_or(""),
            artist = song.artist.as_deref().unwrap_or(""),
            "Resolving static lyrics"
        );
        if let Some(text) = song.lyric_text.filter(|t| !t.trim().is_empty()) {
            sources.push(LyricSource::Plain(text));
        } else if let Some(lyric_id) = song.lyric_id {
            match self.entry_markdown(&lyric_id).await {
                Ok(text) => sources.push(LyricSource::Markdown(text)),
                Err(e) => {
                    tracing::warn!(song = song_id, lyric = %lyric_id, error = %e, "Failed to load lyric page");
                }
            }
        }
        sources
    }

    async fn entry_markdown(&self, lyric_id: &str) -> Result<String, LyricsError> {
        let entries = self.entries().await?;
        let entry = entries
            .into_iter()
            .find(|e| id_matches(&e.id, lyric_id))
            .ok_or_else(|| LyricsError::NotFound(format!("lyric page {lyric_id}")))?;
        let content = entry
            .content_path
            .ok_or_else(|| LyricsError::NotFound(format!("content of lyric page {lyric_id}")))?;
        read_text(&self.root.join(content.trim_start_matches('/'))).await
    }

    /// Load and parse the lyrics for `song_id`, degrading to the sentinel track.
    pub async fn load_track(&self, song_id: &str) -> LyricTrack {
        let sources = self.sources_for(song_id).await;
        if sources.is_empty() {
            tracing::info!(song = song_id, "No lyric source found");
        }
        LyricTrack::parse(sources)
    }
}

// ============================================================================
// Loose Files
// ============================================================================

/// Candidate sources for a single lyric file, chosen by extension.
pub async fn sources_from_file(path: &Path) -> Result<Vec<LyricSource>, LyricsError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if ext == "json" {
        let records: Vec<LegacyLine> = read_json(path).await?;
        return Ok(vec![LyricSource::Legacy(records)]);
    }
    let text = read_text(path).await?;
    let fallback = match ext.as_str() {
        "md" | "markdown" => LyricSource::Markdown(text.clone()),
        _ => LyricSource::Plain(text.clone()),
    };
    Ok(vec![LyricSource::Lrc(text), fallback])
}

/// Load a lyric file, degrading to the sentinel track when it can't be read.
pub async fn load_file(path: &Path) -> LyricTrack {
    match sources_from_file(path).await {
        Ok(sources) => LyricTrack::parse(sources),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to load lyrics");
            LyricTrack::sentinel()
        }
    }
}

// ============================================================================
// File I/O
// ============================================================================

pub async fn read_text(path: &Path) -> Result<String, LyricsError> {
    fs::read_to_string(path)
        .await
        .map_err(|e| LyricsError::io(path, e))
}

pub async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, LyricsError> {
    let text = read_text(path).await?;
    serde_json::from_str(&text).map_err(|e| LyricsError::json(path, e))
}
