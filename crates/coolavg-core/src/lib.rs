//! Coolavg core: a manually stepped moving average with a zero-triggered cooldown.

pub mod clock;
pub mod config;
pub mod cooldown;
pub mod source;
pub mod unit;
pub mod window;

pub use clock::*;
pub use crate::config::*;
pub use cooldown::*;
pub use source::*;
pub use unit::*;
pub use window::*;

#[cfg(test)]
mod tests_config;
