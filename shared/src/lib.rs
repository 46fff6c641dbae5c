//! Simulation core of the fireworks show: particles, shells, their six burst patterns and the frame driver.
//!
//! Nothing in here touches the browser. Drawing goes through [`Canvas`] and sound through [`AudioSink`], so the
//! whole show runs and is tested on the host.

mod audio;
pub use audio::*;

mod canvas;
pub use canvas::*;

mod color;
pub use color::*;

mod command;
pub use command::*;

mod config;
pub use config::*;

mod dice;
pub use dice::*;

mod firework;
pub use firework::*;

mod particle;
pub use particle::*;

mod pattern;
pub use pattern::*;

mod shake;
pub use shake::*;

mod show;
pub use show::*;

#[cfg(test)]
mod testing;
