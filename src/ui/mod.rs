pub mod pipe;
pub mod snapshot;
pub mod util;

pub use pipe::{PlayOptions, display_lyrics_pipe};
pub use snapshot::render_snapshot;
