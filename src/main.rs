mod lyrics;
mod state;
mod timer;
mod ui;

use crate::lyrics::align::{Segment, generate_lrc};
use crate::lyrics::library::{self, Library};
use crate::lyrics::LyricTrack;
use clap::{Args, Parser, Subcommand};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Application configuration from CLI
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Time-synced lyric display and LRC tooling")]
pub struct Config {
    /// Enable backend logging to stderr
    #[arg(long, global = true)]
    pub debug_log: bool,
    /// Site root holding `assets/` (falls back to LYRICSYNC_SITE, then ".")
    #[arg(long, global = true)]
    pub site: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print every lyric line as it looks at one instant
    Show {
        #[command(flatten)]
        source: SourceArgs,
        /// Playback position in seconds
        #[arg(long, default_value_t = 0.0)]
        at: f64,
        /// Track length in seconds (needed to place untimed lyrics)
        #[arg(long)]
        duration: Option<f64>,
        /// Wrap width for long lines
        #[arg(long, default_value_t = 80)]
        width: usize,
    },
    /// Play lyrics against a local clock, printing each line as it becomes active
    Play {
        #[command(flatten)]
        source: SourceArgs,
        /// Start position in seconds
        #[arg(long, default_value_t = 0.0)]
        start: f64,
        /// Track length in seconds
        #[arg(long)]
        duration: Option<f64>,
        /// Milliseconds between position updates
        #[arg(long, default_value_t = 250)]
        tick_ms: u64,
        /// Playback speed multiplier
        #[arg(long, default_value_t = 1.0)]
        rate: f64,
    },
    /// Generate an LRC file from a Markdown lyric page and timed transcript segments
    Align {
        /// Markdown lyric page
        markdown: PathBuf,
        /// JSON array of `{"start": secs, "text": "..."}` segments
        segments: PathBuf,
        /// Output path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the lyric pages of the site, in display order
    List,
}

/// Where to take lyrics from: a loose file or a song of the site.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Lyric file (.lrc, .md, .txt or legacy .json)
    #[arg(required_unless_present = "song", conflicts_with = "song")]
    pub file: Option<PathBuf>,
    /// Song id from assets/data/music.json
    #[arg(long)]
    pub song: Option<String>,
}

fn site_from_env_if_empty(cli: &mut Config) {
    if cli.site.is_none()
        && let Ok(s) = std::env::var("LYRICSYNC_SITE")
    {
        let s = s.trim();
        if !s.is_empty() {
            cli.site = Some(PathBuf::from(s));
        }
    }
}

fn init_logging(debug_log: bool) {
    let filter = if debug_log {
        EnvFilter::new("lyricsync=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn load_track(source: &SourceArgs, site: &Path) -> (String, LyricTrack) {
    let (title, track) = match (&source.file, &source.song) {
        (Some(path), _) => (path.display().to_string(), library::load_file(path).await),
        (None, Some(id)) => (id.clone(), Library::new(site).load_track(id).await),
        (None, None) => (String::new(), LyricTrack::sentinel()),
    };
    if track.is_sentinel() {
        tracing::info!(source = %title, "Showing placeholder lyrics");
    }
    (title, track)
}

async fn run(cfg: Config) -> Result<(), Box<dyn Error + Send + Sync>> {
    let site = cfg.site.clone().unwrap_or_else(|| PathBuf::from("."));
    match cfg.command {
        Command::Show { source, at, duration, width } => {
            let (_, track) = load_track(&source, &site).await;
            print!("{}", ui::render_snapshot(&track, at, duration, width));
        }
        Command::Play { source, start, duration, tick_ms, rate } => {
            let (title, track) = load_track(&source, &site).await;
            let opts = ui::PlayOptions {
                title,
                start,
                duration,
                tick: Duration::from_millis(tick_ms.max(1)),
                rate,
            };
            ui::display_lyrics_pipe(track, opts, &mut std::io::stdout()).await?;
        }
        Command::Align { markdown, segments, output } => {
            let text = library::read_text(&markdown).await?;
            let segments: Vec<Segment> = library::read_json(&segments).await?;
            let Some(lrc) = generate_lrc(&text, &segments) else {
                return Err(format!("nothing to align in {}", markdown.display()).into());
            };
            match output {
                Some(path) => {
                    tokio::fs::write(&path, lrc)
                        .await
                        .map_err(|e| lyrics::LyricsError::io(&path, e))?;
                    tracing::info!(path = %path.display(), "Wrote LRC");
                }
                None => print!("{lrc}"),
            }
        }
        Command::List => {
            for entry in Library::new(&site).entries().await? {
                let audio = if entry.audio_path.is_some() { " [audio]" } else { "" };
                println!(
                    "{}\t{}{}",
                    entry.id,
                    entry.title.as_deref().unwrap_or("(untitled)"),
                    audio
                );
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let mut cfg = Config::parse();
    site_from_env_if_empty(&mut cfg);
    init_logging(cfg.debug_log);

    // Print error if any, for better diagnostics
    if let Err(e) = run(cfg).await {
        eprintln!("Error: {}", e);
        return Err(e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_show_with_file() {
        let cfg = Config::try_parse_from(["lyricsync", "show", "song.lrc", "--at", "12.5"]).unwrap();
        match cfg.command {
            Command::Show { source, at, duration, .. } => {
                assert_eq!(source.file, Some(PathBuf::from("song.lrc")));
                assert_eq!(at, 12.5);
                assert_eq!(duration, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn play_needs_file_or_song() {
        assert!(Config::try_parse_from(["lyricsync", "play"]).is_err());
        assert!(Config::try_parse_from(["lyricsync", "play", "a.lrc", "--song", "x"]).is_err());
        let cfg = Config::try_parse_from(["lyricsync", "--debug-log", "play", "--song", "rain"]).unwrap();
        assert!(cfg.debug_log);
    }

    #[test]
    fn explicit_site_beats_env() {
        let mut cfg =
            Config::try_parse_from(["lyricsync", "list", "--site", "/srv/site"]).unwrap();
        site_from_env_if_empty(&mut cfg);
        assert_eq!(cfg.site, Some(PathBuf::from("/srv/site")));
    }
}
