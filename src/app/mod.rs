mod app;
mod audio;

pub use app::*;
pub use audio::*;
