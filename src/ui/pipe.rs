use crate::lyrics::LyricTrack;
use crate::state::StateBundle;
use crate::timer::PlaybackTimer;
use std::io::Write;
use std::time::Duration;

/// Seconds to keep running past the last cue when the duration is unknown.
const TAIL_AFTER_LAST_CUE: f64 = 5.0;

/// Options for a simulated playback run.
#[derive(Debug, Clone)]
pub struct PlayOptions {
    pub title: String,
    pub start: f64,
    pub duration: Option<f64>,
    pub tick: Duration,
    pub rate: f64,
}

/// Play `track` against a local clock and write each newly active line to
/// `out` (stdout only, for scripting).
pub async fn display_lyrics_pipe<W: Write>(
    track: LyricTrack,
    opts: PlayOptions,
    out: &mut W,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let end = opts
        .duration
        .filter(|d| d.is_finite() && *d > 0.0)
        .unwrap_or_else(|| track.last_cue() + TAIL_AFTER_LAST_CUE);
    let mut state = StateBundle::new();
    state.load_track(&opts.title, track, opts.duration);

    let mut timer = PlaybackTimer::new(opts.start, opts.rate);
    timer.play();
    let mut ticker = tokio::time::interval(opts.tick);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    tracing::debug!(
        title = %state.player_state.title,
        start = opts.start,
        end,
        "Starting playback"
    );
    loop {
        ticker.tick().await;
        let position = timer.position().min(end);
        state.update_playback(true, position);
        if state.update_index() {
            let upd = state.snapshot();
            tracing::debug!(index = ?upd.index, position = upd.position, version = upd.version, "Active line changed");
            if let Some(line) = upd.index.and_then(|idx| upd.track.get(idx)) {
                writeln!(out, "{}", line.text)?;
                out.flush()?;
            }
        }
        if position >= end {
            break;
        }
    }
    timer.pause();
    tracing::debug!(position = timer.position(), "Playback finished");
    Ok(())
}
