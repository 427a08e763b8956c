use crate::domain::params::{
    check_inflow, check_steps_per_frame, check_tau, tau_from_viscosity, ParamError, Parameters,
    VisualizationMode,
};

use super::perf_stats::PerfStats;
use super::Simulation;

pub(super) fn enable_perf_metrics(sim: &mut Simulation, enabled: bool) {
    sim.perf_enabled = enabled;
}

pub(super) fn get_perf_stats(sim: &Simulation) -> PerfStats {
    sim.perf_stats.clone()
}

fn rejected(err: ParamError) -> ParamError {
    console_warn!("parameter edit rejected: {}", err);
    err
}

pub(super) fn set_tau(sim: &mut Simulation, tau: f32) -> Result<(), ParamError> {
    check_tau(tau).map_err(rejected)?;
    sim.staged.tau = tau;
    Ok(())
}

pub(super) fn set_viscosity(sim: &mut Simulation, viscosity: f32) -> Result<(), ParamError> {
    if !viscosity.is_finite() || viscosity <= 0.0 {
        return Err(rejected(ParamError::InvalidViscosity(viscosity)));
    }
    set_tau(sim, tau_from_viscosity(viscosity))
}

pub(super) fn set_inflow_velocity(sim: &mut Simulation, inflow: f32) -> Result<(), ParamError> {
    check_inflow(inflow).map_err(rejected)?;
    sim.staged.inflow_velocity = inflow;
    Ok(())
}

pub(super) fn set_no_slip(sim: &mut Simulation, no_slip: bool) {
    sim.staged.no_slip = no_slip;
}

pub(super) fn set_visualization_mode(sim: &mut Simulation, mode: VisualizationMode) {
    sim.staged.visualization_mode = mode;
}

pub(super) fn set_visualization_mode_id(sim: &mut Simulation, id: u8) -> Result<(), ParamError> {
    let mode = VisualizationMode::from_id(id).ok_or_else(|| rejected(ParamError::UnknownMode(id)))?;
    set_visualization_mode(sim, mode);
    Ok(())
}

pub(super) fn set_steps_per_frame(sim: &mut Simulation, steps: u32) -> Result<(), ParamError> {
    check_steps_per_frame(steps).map_err(rejected)?;
    sim.staged.steps_per_frame = steps;
    Ok(())
}

pub(super) fn load_params_json(sim: &mut Simulation, json: &str) -> Result<(), ParamError> {
    let params = Parameters::from_json(json).map_err(rejected)?;
    let resized = params.grid_width != sim.lattice.width() || params.grid_height != sim.lattice.height();
    let (width, height) = (params.grid_width, params.grid_height);
    sim.staged = params;
    if resized {
        super::init::resize(sim, width, height, None)?;
    }
    Ok(())
}
