//! Windtunnel Engine - real-time 2D lattice Boltzmann wind tunnel in WASM
//!
//! Architecture:
//! - core/        - D2Q9 lattice constants, distribution buffers, console macros
//! - domain/      - parameters, obstacle field, image masks
//! - systems/     - collision, streaming and visualization kernels
//! - simulation/  - sub-step orchestration and the JS facade

// Console macros must be exported before any module that logs.
#[macro_use]
pub mod core;
pub mod domain;
pub mod systems;
pub mod simulation;

use wasm_bindgen::prelude::*;

// Re-export wasm-bindgen-rayon for thread pool initialization
#[cfg(all(feature = "parallel", target_arch = "wasm32"))]
pub use wasm_bindgen_rayon::init_thread_pool;

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

// Better error messages in debug mode
#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Initialize the engine
#[wasm_bindgen]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    set_panic_hook();

    console_log!("windtunnel engine {} initialized", env!("CARGO_PKG_VERSION"));
}

/// Get engine version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// Re-export main types
pub use domain::{BarrierField, ParamError, Parameters, VisualizationMode};
pub use simulation::{FluidSim, FrameLayout, PerfStats, Simulation};

/// Mode id for `FluidSim::set_visualization_mode`
#[wasm_bindgen]
pub fn mode_density() -> u8 { VisualizationMode::Density.id() }
#[wasm_bindgen]
pub fn mode_speed() -> u8 { VisualizationMode::Speed.id() }
#[wasm_bindgen]
pub fn mode_curl() -> u8 { VisualizationMode::Curl.id() }
#[wasm_bindgen]
pub fn mode_schlieren() -> u8 { VisualizationMode::Schlieren.id() }
