// lyrics/mod.rs - lyric parsing, active-line lookup and LRC tooling
pub mod align;
pub mod library;
pub mod parse;
pub mod similarity;
pub mod sync;
pub mod track;
pub mod types;

pub use sync::resolve_active_line;
pub use track::LyricTrack;
pub use types::LyricsError;
