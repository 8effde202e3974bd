//! Presentation helpers shared by the renderers.
//!
//! Lines are styled by their distance from the active line, the way the
//! player fades lyrics out above and below the one being sung.

/// Display role of one lyric line relative to the active line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRole {
    Active,
    NearPrev,
    NearNext,
    FarPrev,
    FarNext,
}

impl LineRole {
    /// Short marker printed in front of the line.
    pub fn marker(self) -> &'static str {
        match self {
            LineRole::Active => ">>",
            LineRole::NearPrev | LineRole::NearNext => " -",
            LineRole::FarPrev | LineRole::FarNext => "  ",
        }
    }
}

/// Role of line `index` given the active line.
///
/// With nothing active the whole track counts as upcoming, and the first line
/// sits right next to the (not yet reached) active slot.
pub fn line_role(index: usize, active: Option<usize>) -> LineRole {
    let Some(active) = active else {
        return if index == 0 { LineRole::NearNext } else { LineRole::FarNext };
    };
    if index == active {
        LineRole::Active
    } else if index + 1 == active {
        LineRole::NearPrev
    } else if index == active + 1 {
        LineRole::NearNext
    } else if index < active {
        LineRole::FarPrev
    } else {
        LineRole::FarNext
    }
}

/// `m:ss`, with `0:00` for anything that isn't a positive finite time.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0:00".to_string();
    }
    let total = seconds.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
