use wasm_bindgen::prelude::*;

/// Snapshot of the last frame. All zeros while perf metrics are disabled.
#[wasm_bindgen]
#[derive(Clone, Default)]
pub struct PerfStats {
    pub(super) frame_ms: f64,
    pub(super) collision_ms: f64,
    pub(super) streaming_ms: f64,
    pub(super) render_ms: f64,
    pub(super) substeps: u32,
    pub(super) cells: u32,
    pub(super) barrier_cells: u32,
    pub(super) total_density: f64,
    pub(super) max_speed: f32,
}

impl PerfStats {
    pub(crate) fn reset(&mut self) {
        *self = PerfStats::default();
    }
}

#[wasm_bindgen]
impl PerfStats {
    #[wasm_bindgen(getter)]
    pub fn frame_ms(&self) -> f64 { self.frame_ms }
    #[wasm_bindgen(getter)]
    pub fn collision_ms(&self) -> f64 { self.collision_ms }
    #[wasm_bindgen(getter)]
    pub fn streaming_ms(&self) -> f64 { self.streaming_ms }
    #[wasm_bindgen(getter)]
    pub fn render_ms(&self) -> f64 { self.render_ms }
    #[wasm_bindgen(getter)]
    pub fn substeps(&self) -> u32 { self.substeps }
    #[wasm_bindgen(getter)]
    pub fn cells(&self) -> u32 { self.cells }
    #[wasm_bindgen(getter)]
    pub fn barrier_cells(&self) -> u32 { self.barrier_cells }
    #[wasm_bindgen(getter)]
    pub fn total_density(&self) -> f64 { self.total_density }
    #[wasm_bindgen(getter)]
    pub fn max_speed(&self) -> f32 { self.max_speed }
}
