// state.rs: State data structures for lyrics and playback

use crate::lyrics::{LyricTrack, resolve_active_line};
use crate::timer::sanitize_position;
use std::sync::Arc;

/// Represents a UI update for lyrics and player state.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub track: Arc<LyricTrack>,
    pub index: Option<usize>,
    pub position: f64,
    pub version: u64, // Incremented on any state change
}

/// Playback facts supplied by whatever drives the audio.
#[derive(Debug, Default, PartialEq)]
pub struct PlayerState {
    pub title: String,
    pub playing: bool,
    pub position: f64,
    /// Total length in seconds, when known.
    pub duration: Option<f64>,
}

impl PlayerState {
    pub fn load(&mut self, title: &str, duration: Option<f64>) {
        self.title = title.to_string();
        self.duration = duration.filter(|d| d.is_finite() && *d > 0.0);
        self.position = 0.0;
        self.playing = false;
    }
    pub fn update_playback(&mut self, playing: bool, position: f64) {
        self.playing = playing;
        self.position = sanitize_position(position);
    }
}

/// Holds the current lyric track and the highlighted line.
#[derive(Debug, Default)]
pub struct LyricState {
    pub track: Arc<LyricTrack>,
    pub index: Option<usize>,
}

impl LyricState {
    pub fn get_index(&self, position: f64, duration: Option<f64>) -> Option<usize> {
        resolve_active_line(&self.track, position, duration)
    }
    pub fn replace_track(&mut self, track: LyricTrack) {
        self.index = None;
        self.track = Arc::new(track);
    }
    pub fn update_index(&mut self, new_index: Option<usize>) -> bool {
        if new_index != self.index {
            self.index = new_index;
            true
        } else {
            false
        }
    }
}

/// Bundles all state for the player and lyrics, plus versioning.
#[derive(Debug, Default)]
pub struct StateBundle {
    pub lyric_state: LyricState,
    pub player_state: PlayerState,
    pub version: u64, // Incremented on any state change
}

impl StateBundle {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn load_track(&mut self, title: &str, track: LyricTrack, duration: Option<f64>) {
        self.lyric_state.replace_track(track);
        self.player_state.load(title, duration);
        self.version += 1;
    }
    pub fn update_playback(&mut self, playing: bool, position: f64) {
        if self.player_state.playing != playing
            || (self.player_state.position - position).abs() > f64::EPSILON
        {
            self.version += 1;
        }
        self.player_state.update_playback(playing, position);
    }
    /// Re-resolve the active line for the current position.
    pub fn update_index(&mut self) -> bool {
        let new_index = self
            .lyric_state
            .get_index(self.player_state.position, self.player_state.duration);
        let changed = self.lyric_state.update_index(new_index);
        if changed {
            self.version += 1;
        }
        changed
    }
    pub fn snapshot(&self) -> Update {
        Update {
            track: Arc::clone(&self.lyric_state.track),
            index: self.lyric_state.index,
            position: self.player_state.position,
            version: self.version,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_changes_are_reported_once() {
        let mut state = StateBundle::new();
        state.load_track("t", LyricTrack::parse_text("[00:01.00]a\n[00:03.00]b"), None);
        assert_eq!(state.lyric_state.index, None);

        state.update_playback(true, 1.5);
        assert!(state.update_index());
        assert_eq!(state.lyric_state.index, Some(0));
        assert!(!state.update_index());

        state.update_playback(true, 3.2);
        assert!(state.update_index());
        assert_eq!(state.snapshot().index, Some(1));
    }

    #[test]
    fn new_track_resets_index_and_position() {
        let mut state = StateBundle::new();
        state.load_track("a", LyricTrack::parse_text("[00:01.00]a"), Some(10.0));
        state.update_playback(true, 5.0);
        state.update_index();
        let before = state.version;

        state.load_track("b", LyricTrack::parse_text("x\ny"), Some(f64::NAN));
        assert!(state.version > before);
        assert_eq!(state.lyric_state.index, None);
        assert_eq!(state.player_state.position, 0.0);
        assert_eq!(state.player_state.duration, None);
        assert!(!state.update_index());
    }

    #[test]
    fn playback_position_is_sanitized() {
        let mut player = PlayerState::default();
        player.update_playback(true, f64::NAN);
        assert_eq!(player.position, 0.0);
        player.load("x", Some(-3.0));
        assert_eq!(player.duration, None);
        assert!(!player.playing);
    }
}
