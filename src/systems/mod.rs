//! Systems - the per-cell kernels of one sub-step and the display pass
//!
//! Each kernel reads one buffer and writes another, row-parallel when the
//! `parallel` feature is enabled.

pub mod collision;
pub mod streaming;
pub mod visualization;

pub use collision::collide;
pub use streaming::{stream, StreamConfig};
pub use visualization::{colorize, compute_moments, ColorConfig, Rgb};
