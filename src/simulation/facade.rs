use wasm_bindgen::prelude::*;

use crate::domain::params::ParamError;

use super::perf_stats::PerfStats;
use super::Simulation;

fn js_err(err: ParamError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Where the renderer finds this frame's buffers in wasm memory
#[wasm_bindgen]
pub struct FrameLayout {
    width: u32,
    height: u32,
    colors_ptr: u32,
    colors_len_elements: u32,
    colors_len_bytes: u32,
    rgb_ptr: u32,
    rgb_len_elements: u32,
    rgb_len_bytes: u32,
    barrier_ptr: u32,
    barrier_len_elements: u32,
    barrier_len_bytes: u32,
}

#[wasm_bindgen]
impl FrameLayout {
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 { self.width }
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 { self.height }

    #[wasm_bindgen(getter)]
    pub fn colors_ptr(&self) -> u32 { self.colors_ptr }
    #[wasm_bindgen(getter)]
    pub fn colors_len_elements(&self) -> u32 { self.colors_len_elements }
    #[wasm_bindgen(getter)]
    pub fn colors_len_bytes(&self) -> u32 { self.colors_len_bytes }

    #[wasm_bindgen(getter)]
    pub fn rgb_ptr(&self) -> u32 { self.rgb_ptr }
    #[wasm_bindgen(getter)]
    pub fn rgb_len_elements(&self) -> u32 { self.rgb_len_elements }
    #[wasm_bindgen(getter)]
    pub fn rgb_len_bytes(&self) -> u32 { self.rgb_len_bytes }

    #[wasm_bindgen(getter)]
    pub fn barrier_ptr(&self) -> u32 { self.barrier_ptr }
    #[wasm_bindgen(getter)]
    pub fn barrier_len_elements(&self) -> u32 { self.barrier_len_elements }
    #[wasm_bindgen(getter)]
    pub fn barrier_len_bytes(&self) -> u32 { self.barrier_len_bytes }
}

#[wasm_bindgen]
pub struct FluidSim {
    core: Simulation,
}

#[wasm_bindgen]
impl FluidSim {
    /// Create a wind tunnel with the given grid and default parameters
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            core: Simulation::new(width, height),
        }
    }

    /// Reserve buffers for the largest grid the UI can ask for
    #[wasm_bindgen(js_name = withCapacity)]
    pub fn with_capacity(width: u32, height: u32, max_width: u32, max_height: u32) -> Self {
        Self {
            core: Simulation::with_capacity(width, height, max_width, max_height),
        }
    }

    #[wasm_bindgen(js_name = fromParamsJson)]
    pub fn from_params_json(json: String) -> Result<FluidSim, JsValue> {
        let params = crate::domain::Parameters::from_json(&json).map_err(js_err)?;
        let core = Simulation::from_parameters(params).map_err(js_err)?;
        Ok(Self { core })
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 { self.core.width() }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 { self.core.height() }

    #[wasm_bindgen(getter)]
    pub fn frame(&self) -> u64 { self.core.frame() }

    #[wasm_bindgen(getter)]
    pub fn substep(&self) -> u64 { self.core.substep() }

    #[wasm_bindgen(getter)]
    pub fn paused(&self) -> bool { self.core.is_paused() }

    /// Enable or disable per-frame perf metrics (adds timing overhead when enabled)
    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        self.core.enable_perf_metrics(enabled);
    }

    /// Get last frame perf snapshot (zeros when perf disabled)
    pub fn get_perf_stats(&self) -> PerfStats {
        self.core.get_perf_stats()
    }

    // === SETTINGS ===

    pub fn set_tau(&mut self, tau: f32) -> Result<(), JsValue> {
        self.core.set_tau(tau).map_err(js_err)
    }

    /// tau = 3 * viscosity + 0.5
    pub fn set_viscosity(&mut self, viscosity: f32) -> Result<(), JsValue> {
        self.core.set_viscosity(viscosity).map_err(js_err)
    }

    pub fn set_inflow_velocity(&mut self, inflow: f32) -> Result<(), JsValue> {
        self.core.set_inflow_velocity(inflow).map_err(js_err)
    }

    pub fn set_no_slip(&mut self, no_slip: bool) {
        self.core.set_no_slip(no_slip);
    }

    /// 0 density, 1 speed, 2 curl, 3 schlieren
    pub fn set_visualization_mode(&mut self, mode: u8) -> Result<(), JsValue> {
        self.core.set_visualization_mode_id(mode).map_err(js_err)
    }

    pub fn set_steps_per_frame(&mut self, steps: u32) -> Result<(), JsValue> {
        self.core.set_steps_per_frame(steps).map_err(js_err)
    }

    pub fn load_params(&mut self, json: String) -> Result<(), JsValue> {
        self.core.load_params_json(&json).map_err(js_err)
    }

    pub fn get_params_json(&self) -> String {
        self.core.params_json()
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.core.set_paused(paused);
    }

    // === OBSTACLES ===

    pub fn toggle_barrier(&mut self, x: i32, y: i32) {
        self.core.toggle_barrier(x, y);
    }

    pub fn begin_stroke(&mut self) {
        self.core.begin_stroke();
    }

    pub fn paint_barrier(&mut self, x: i32, y: i32) {
        self.core.paint_barrier(x, y);
    }

    pub fn paint_barriers_in_radius(&mut self, cx: i32, cy: i32, radius: i32) {
        self.core.paint_barriers_in_radius(cx, cy, radius);
    }

    pub fn end_stroke(&mut self) {
        self.core.end_stroke();
    }

    pub fn clear_barriers(&mut self) {
        self.core.clear_barriers();
    }

    /// Grid-space mask, row 0 = bottom, non-zero = obstacle
    pub fn replace_barriers(&mut self, mask: Vec<u8>) -> Result<(), JsValue> {
        self.core.replace_barriers(&mask).map_err(js_err)
    }

    /// RGBA pixels as delivered by `getImageData` (row 0 = top)
    pub fn replace_barriers_from_image(
        &mut self,
        rgba: Vec<u8>,
        image_width: u32,
        image_height: u32,
        threshold: u8,
    ) -> Result<(), JsValue> {
        self.core
            .replace_barriers_from_rgba(&rgba, image_width, image_height, threshold)
            .map_err(js_err)
    }

    // === LIFECYCLE ===

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), JsValue> {
        self.core.resize(width, height).map_err(js_err)
    }

    pub fn resize_with_barriers(&mut self, width: u32, height: u32, mask: Vec<u8>) -> Result<(), JsValue> {
        self.core.resize_with_barriers(width, height, &mask).map_err(js_err)
    }

    pub fn reset(&mut self) {
        self.core.reset();
    }

    /// Advance one frame: `steps_per_frame` sub-steps, then a render
    pub fn step(&mut self) {
        self.core.step_frame();
    }

    /// Re-render without advancing the flow
    pub fn render(&mut self) {
        self.core.render();
    }

    // === OUTPUT ===

    /// ABGR colors, canvas order (for JS rendering)
    pub fn colors_ptr(&self) -> *const u32 {
        self.core.colors_ptr()
    }

    pub fn colors_len(&self) -> usize {
        self.core.cell_count()
    }

    /// RGB float triples, grid order
    pub fn rgb_ptr(&self) -> *const f32 {
        self.core.rgb_ptr()
    }

    pub fn barrier_ptr(&self) -> *const u8 {
        self.core.barrier_ptr()
    }

    pub fn density_at(&self, x: u32, y: u32) -> f32 {
        self.core.density_at(x, y).unwrap_or(0.0)
    }

    pub fn total_density(&self) -> f64 {
        self.core.total_density()
    }

    pub fn max_speed(&self) -> f32 {
        self.core.max_speed()
    }

    pub fn frame_layout(&self) -> FrameLayout {
        let data = self.core.frame_layout_data();
        FrameLayout {
            width: self.core.width(),
            height: self.core.height(),
            colors_ptr: data.colors_ptr as u32,
            colors_len_elements: data.colors_len_elements as u32,
            colors_len_bytes: data.colors_len_bytes as u32,
            rgb_ptr: data.rgb_ptr as u32,
            rgb_len_elements: data.rgb_len_elements as u32,
            rgb_len_bytes: data.rgb_len_bytes as u32,
            barrier_ptr: data.barrier_ptr as u32,
            barrier_len_elements: data.barrier_len_elements as u32,
            barrier_len_bytes: data.barrier_len_bytes as u32,
        }
    }
}
