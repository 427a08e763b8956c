//! Domain - what the kernels are configured with
//!
//! - params   - Parameters, VisualizationMode, ParamError
//! - barrier  - obstacle mask and brush strokes
//! - mask     - image to obstacle mask rasterization

pub mod params;
pub mod barrier;
pub mod mask;

pub use barrier::BarrierField;
pub use params::{ParamError, Parameters, VisualizationMode};
