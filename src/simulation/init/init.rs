use crate::core::lattice::LatticeState;
use crate::domain::barrier::BarrierField;
use crate::domain::params::{check_grid, ParamError, Parameters};

use super::perf_stats::PerfStats;
use super::{RenderBuffers, Simulation};

impl RenderBuffers {
    fn with_capacity(cells: usize, capacity: usize) -> Self {
        let mut buffers = RenderBuffers {
            moments: Vec::with_capacity(capacity),
            rgb: Vec::with_capacity(capacity),
            colors: Vec::with_capacity(capacity),
        };
        buffers.reshape(cells);
        buffers
    }

    fn reshape(&mut self, cells: usize) {
        self.moments.clear();
        self.moments.resize(cells, [0.0; 3]);
        self.rgb.clear();
        self.rgb.resize(cells, [0.0; 3]);
        self.colors.clear();
        self.colors.resize(cells, 0xFF00_0000);
    }
}

pub(super) fn create_simulation(params: Parameters, max_width: u32, max_height: u32) -> Simulation {
    let (width, height) = (params.grid_width, params.grid_height);
    let max_cells = (max_width as usize) * (max_height as usize);

    let mut lattice = LatticeState::with_capacity(width, height, max_cells);
    lattice.seed_equilibrium(1.0, params.inflow_velocity, 0.0);
    let capacity = lattice.capacity();
    let cells = lattice.cell_count();

    Simulation {
        lattice,
        barrier: BarrierField::with_capacity(width, height, capacity),
        staged: params.clone(),
        params,
        pending_edits: Vec::with_capacity(256),
        substep: 0,
        frame: 0,
        paused: false,
        render: RenderBuffers::with_capacity(cells, capacity),
        perf_enabled: false,
        perf_stats: PerfStats::default(),
    }
}

/// Change the grid and reinitialize. Shrinking (or growing inside the
/// reserved capacity) reuses the buffers; growing past it reallocates all
/// of them. The mask, when given, is installed after the reset.
pub(super) fn resize(
    sim: &mut Simulation,
    width: u32,
    height: u32,
    mask: Option<&[u8]>,
) -> Result<(), ParamError> {
    check_grid(width, height)?;
    let cells = (width as usize) * (height as usize);
    if let Some(mask) = mask {
        if mask.len() != cells {
            return Err(ParamError::MaskSize {
                expected: cells,
                actual: mask.len(),
            });
        }
    }

    if sim.lattice.reshape(width, height) {
        sim.barrier.reshape(width, height);
        sim.render.reshape(cells);
    } else {
        console_warn!(
            "grid {}x{} exceeds capacity of {} cells, reallocating",
            width,
            height,
            sim.lattice.capacity()
        );
        sim.lattice = LatticeState::new(width, height);
        sim.barrier = BarrierField::new(width, height);
        sim.render = RenderBuffers::with_capacity(cells, cells);
    }

    sim.staged.grid_width = width;
    sim.staged.grid_height = height;
    reinitialize(sim);

    if let Some(mask) = mask {
        sim.barrier.replace(mask)?;
    }
    Ok(())
}

pub(super) fn reset(sim: &mut Simulation) {
    reinitialize(sim);
}

/// Reseed both generations to the inflow equilibrium of the requested
/// velocity and clear the mask. Queued obstacle edits are dropped.
fn reinitialize(sim: &mut Simulation) {
    sim.params = sim.staged.clone();
    sim.pending_edits.clear();
    sim.barrier.clear();
    sim.lattice
        .seed_equilibrium(1.0, sim.params.inflow_velocity, 0.0);
    sim.substep = 0;

    console_log!(
        "lattice reinitialized: {}x{}, inflow {}",
        sim.lattice.width(),
        sim.lattice.height(),
        sim.params.inflow_velocity
    );
}
