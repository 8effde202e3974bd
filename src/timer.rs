use std::time::Instant;

/// Monotonic playback clock: an anchor position plus the instant it was taken.
#[derive(Debug, PartialEq, Default)]
pub struct PlaybackTimer {
    /// Anchor position in seconds (finite, >= 0).
    anchor_position: f64,
    /// Set while playing; elapsed time since it is added to the anchor.
    anchor_instant: Option<Instant>,
    /// Playback speed multiplier.
    rate: f64,
}

impl PlaybackTimer {
    pub fn new(position: f64, rate: f64) -> Self {
        Self {
            anchor_position: sanitize_position(position),
            anchor_instant: None,
            rate: sanitize_rate(rate),
        }
    }
    pub fn play(&mut self) {
        if self.anchor_instant.is_none() {
            self.anchor_instant = Some(Instant::now());
        }
    }
    pub fn pause(&mut self) {
        // Fold the elapsed time into the anchor so resuming continues from here.
        self.anchor_position = self.position();
        self.anchor_instant = None;
    }
    pub fn position(&self) -> f64 {
        let base = self.anchor_position;
        match self.anchor_instant {
            Some(inst) => {
                let val = base + inst.elapsed().as_secs_f64() * self.rate;
                if val.is_finite() { val } else { base }
            }
            None => base,
        }
    }
}

pub fn sanitize_position(p: f64) -> f64 {
    if !p.is_finite() || p < 0.0 { 0.0 } else { p }
}

fn sanitize_rate(rate: f64) -> f64 {
    if rate.is_finite() && rate > 0.0 { rate } else { 1.0 }
}
