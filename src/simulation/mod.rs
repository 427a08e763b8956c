//! Simulation - the sub-step loop
//!
//! One frame = `steps_per_frame` sub-steps of collision + streaming,
//! followed by one visualization pass over the latest generation.
//!
//! The simulation only orchestrates; the kernels live in systems/:
//! - collision.rs      - BGK relaxation, obstacle bounce-back
//! - streaming.rs      - propagation and tunnel boundaries
//! - visualization.rs  - per-cell color
//!
//! External edits (parameters, obstacles) are staged and take effect at the
//! next sub-step boundary, never in the middle of a stage.

use crate::core::lattice::{Generation, LatticeState};
use crate::domain::barrier::BarrierField;
use crate::domain::params::Parameters;
use crate::domain::{ParamError, VisualizationMode};
use crate::systems::Rgb;

#[path = "perf/perf_timer.rs"]
mod perf_timer;
#[path = "perf/perf_stats.rs"]
mod perf_stats;
#[path = "init/init.rs"]
mod init;
#[path = "init/settings.rs"]
mod settings;
#[path = "commands/commands.rs"]
mod commands;
#[path = "step/step.rs"]
mod step;
#[path = "render/render_extract.rs"]
mod render_extract;
mod facade;

pub use commands::BarrierEdit;
pub use facade::{FluidSim, FrameLayout};
pub use perf_stats::PerfStats;

use perf_timer::PerfTimer;

/// Scratch and output buffers of the visualization pass
pub(crate) struct RenderBuffers {
    moments: Vec<[f32; 3]>,
    rgb: Vec<Rgb>,
    colors: Vec<u32>, // ABGR, top row first
}

pub(crate) struct FrameLayoutData {
    pub(crate) colors_ptr: *const u32,
    pub(crate) colors_len_elements: usize,
    pub(crate) colors_len_bytes: usize,
    pub(crate) rgb_ptr: *const f32,
    pub(crate) rgb_len_elements: usize,
    pub(crate) rgb_len_bytes: usize,
    pub(crate) barrier_ptr: *const u8,
    pub(crate) barrier_len_elements: usize,
    pub(crate) barrier_len_bytes: usize,
}

pub struct Simulation {
    lattice: LatticeState,
    barrier: BarrierField,

    // Settings: `params` is the snapshot the kernels read,
    // `staged` collects external edits until the next boundary.
    params: Parameters,
    staged: Parameters,
    pending_edits: Vec<BarrierEdit>,

    // State
    substep: u64,
    frame: u64,
    paused: bool,

    render: RenderBuffers,

    // Perf metrics
    perf_enabled: bool,
    perf_stats: PerfStats,
}

impl Simulation {
    /// Create a simulation for a `width x height` grid with default parameters
    pub fn new(width: u32, height: u32) -> Self {
        init::create_simulation(Parameters::with_grid(width, height), width, height)
    }

    /// Reserve buffers for a `max_width x max_height` grid up front so later
    /// resizes inside it never reallocate
    pub fn with_capacity(width: u32, height: u32, max_width: u32, max_height: u32) -> Self {
        init::create_simulation(Parameters::with_grid(width, height), max_width, max_height)
    }

    pub fn from_parameters(params: Parameters) -> Result<Self, ParamError> {
        params.validate()?;
        let (w, h) = (params.grid_width, params.grid_height);
        Ok(init::create_simulation(params, w, h))
    }

    pub fn width(&self) -> u32 { self.lattice.width() }

    pub fn height(&self) -> u32 { self.lattice.height() }

    pub fn cell_count(&self) -> usize { self.lattice.cell_count() }

    pub fn capacity(&self) -> usize { self.lattice.capacity() }

    pub fn frame(&self) -> u64 { self.frame }

    /// Sub-steps run since the last (re)initialization
    pub fn substep(&self) -> u64 { self.substep }

    /// Generation holding the latest distributions
    pub fn current_generation(&self) -> Generation {
        Generation::for_substep(self.substep)
    }

    pub fn lattice(&self) -> &LatticeState { &self.lattice }

    pub fn barrier(&self) -> &BarrierField { &self.barrier }

    /// Parameters the kernels are currently running with
    pub fn params(&self) -> &Parameters { &self.params }

    /// Parameters as edited, applied at the next sub-step boundary
    pub fn staged_params(&self) -> &Parameters { &self.staged }

    pub fn is_paused(&self) -> bool { self.paused }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Enable or disable per-frame perf metrics (adds timing overhead when enabled)
    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        settings::enable_perf_metrics(self, enabled);
    }

    /// Get last frame perf snapshot (zeros when perf disabled)
    pub fn get_perf_stats(&self) -> PerfStats {
        settings::get_perf_stats(self)
    }

    // === SETTINGS (staged) ===

    pub fn set_tau(&mut self, tau: f32) -> Result<(), ParamError> {
        settings::set_tau(self, tau)
    }

    pub fn set_viscosity(&mut self, viscosity: f32) -> Result<(), ParamError> {
        settings::set_viscosity(self, viscosity)
    }

    pub fn set_inflow_velocity(&mut self, inflow: f32) -> Result<(), ParamError> {
        settings::set_inflow_velocity(self, inflow)
    }

    pub fn set_no_slip(&mut self, no_slip: bool) {
        settings::set_no_slip(self, no_slip);
    }

    pub fn set_visualization_mode(&mut self, mode: VisualizationMode) {
        settings::set_visualization_mode(self, mode);
    }

    pub fn set_visualization_mode_id(&mut self, id: u8) -> Result<(), ParamError> {
        settings::set_visualization_mode_id(self, id)
    }

    pub fn set_steps_per_frame(&mut self, steps: u32) -> Result<(), ParamError> {
        settings::set_steps_per_frame(self, steps)
    }

    /// Stage every field from a JSON document. A different grid size
    /// reinitializes immediately.
    pub fn load_params_json(&mut self, json: &str) -> Result<(), ParamError> {
        settings::load_params_json(self, json)
    }

    pub fn params_json(&self) -> String {
        self.staged.to_json()
    }

    // === OBSTACLE EDITS (queued) ===

    /// Flip one cell
    pub fn toggle_barrier(&mut self, x: i32, y: i32) {
        commands::toggle_barrier(self, x, y);
    }

    /// Start a brush stroke; its first contact decides draw vs erase
    pub fn begin_stroke(&mut self) {
        commands::begin_stroke(self);
    }

    pub fn paint_barrier(&mut self, x: i32, y: i32) {
        commands::paint_barrier(self, x, y);
    }

    pub fn paint_barriers_in_radius(&mut self, cx: i32, cy: i32, radius: i32) {
        commands::paint_barriers_in_radius(self, cx, cy, radius);
    }

    pub fn end_stroke(&mut self) {
        commands::end_stroke(self);
    }

    pub fn clear_barriers(&mut self) {
        commands::clear_barriers(self);
    }

    /// Replace the whole mask (grid space, row 0 = bottom)
    pub fn replace_barriers(&mut self, mask: &[u8]) -> Result<(), ParamError> {
        commands::replace_barriers(self, mask)
    }

    /// Threshold an RGBA image (row 0 = top) into the mask
    pub fn replace_barriers_from_rgba(
        &mut self,
        rgba: &[u8],
        image_width: u32,
        image_height: u32,
        threshold: u8,
    ) -> Result<(), ParamError> {
        commands::replace_barriers_from_rgba(self, rgba, image_width, image_height, threshold)
    }

    /// Number of queued obstacle edits
    pub fn pending_edit_count(&self) -> usize {
        self.pending_edits.len()
    }

    /// Promote staged parameters and drain queued obstacle edits
    pub fn apply_pending_edits(&mut self) {
        commands::apply_pending_edits(self);
    }

    // === LIFECYCLE ===

    /// Change resolution. Reinitializes the flow and clears the mask.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), ParamError> {
        init::resize(self, width, height, None)
    }

    /// Change resolution and install a new mask in the same request
    pub fn resize_with_barriers(
        &mut self,
        width: u32,
        height: u32,
        mask: &[u8],
    ) -> Result<(), ParamError> {
        init::resize(self, width, height, Some(mask))
    }

    /// Reseed to the inflow equilibrium and clear the mask
    pub fn reset(&mut self) {
        init::reset(self);
    }

    // === STEPPING ===

    /// One collision + streaming sub-step
    pub fn substep_once(&mut self) {
        step::substep(self);
    }

    /// Run a full frame: sub-steps (unless paused), then visualization
    pub fn step_frame(&mut self) {
        step::step_frame(self);
    }

    /// Visualization pass only
    pub fn render(&mut self) {
        step::render(self);
    }

    // === OUTPUT ===

    /// Float colors of the last render, grid order (row 0 = bottom)
    pub fn rgb(&self) -> &[Rgb] {
        render_extract::rgb(self)
    }

    /// ABGR colors of the last render, canvas order (row 0 = top)
    pub fn colors(&self) -> &[u32] {
        render_extract::colors(self)
    }

    pub fn colors_ptr(&self) -> *const u32 {
        self.render.colors.as_ptr()
    }

    pub fn rgb_ptr(&self) -> *const f32 {
        self.render.rgb.as_ptr() as *const f32
    }

    pub fn barrier_ptr(&self) -> *const u8 {
        self.barrier.as_ptr()
    }

    pub(crate) fn frame_layout_data(&self) -> FrameLayoutData {
        render_extract::frame_layout_data(self)
    }

    // === DIAGNOSTICS ===

    /// Density at (x, y) in the latest generation
    pub fn density_at(&self, x: u32, y: u32) -> Option<f32> {
        render_extract::moments_at(self, x, y).map(|(rho, _, _)| rho)
    }

    /// Velocity at (x, y) in the latest generation
    pub fn velocity_at(&self, x: u32, y: u32) -> Option<(f32, f32)> {
        render_extract::moments_at(self, x, y).map(|(_, ux, uy)| (ux, uy))
    }

    /// Σρ over the grid
    pub fn total_density(&self) -> f64 {
        render_extract::total_density(self)
    }

    /// Largest |u| over fluid cells
    pub fn max_speed(&self) -> f32 {
        render_extract::max_speed(self)
    }
}

#[cfg(test)]
#[path = "tests/tests.rs"]
mod tests;
