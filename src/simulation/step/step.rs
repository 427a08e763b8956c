use crate::systems::{colorize, compute_moments, collide, stream, ColorConfig, StreamConfig};

use super::render_extract::pack_canvas;
use super::{PerfTimer, Simulation};

pub(super) fn step_frame(sim: &mut Simulation) {
    let perf_on = sim.perf_enabled;
    if perf_on {
        sim.perf_stats.reset();
    }
    let frame_start = if perf_on { Some(PerfTimer::start()) } else { None };

    // Pausing only takes effect between frames: a frame either runs all of
    // its sub-steps or none.
    if !sim.paused {
        sim.apply_pending_edits();
        let steps = sim.params.steps_per_frame;
        for _ in 0..steps {
            substep(sim);
        }
        if perf_on {
            sim.perf_stats.substeps = steps;
        }
    }

    if perf_on {
        let t0 = PerfTimer::start();
        render(sim);
        sim.perf_stats.render_ms = t0.elapsed_ms();
    } else {
        render(sim);
    }

    if perf_on {
        sim.perf_stats.cells = sim.lattice.cell_count() as u32;
        sim.perf_stats.barrier_cells = sim.barrier.count() as u32;
        sim.perf_stats.total_density = sim.total_density();
        sim.perf_stats.max_speed = sim.max_speed();
        if let Some(start) = frame_start {
            sim.perf_stats.frame_ms = start.elapsed_ms();
        }
    }

    sim.frame += 1;
}

/// Collision into the post-collision buffer, then streaming into the other
/// generation. The generation that was just written becomes current.
pub(super) fn substep(sim: &mut Simulation) {
    sim.apply_pending_edits();

    let perf_on = sim.perf_enabled;
    let current = sim.current_generation();
    let width = sim.lattice.width();
    let height = sim.lattice.height();

    let t0 = if perf_on { Some(PerfTimer::start()) } else { None };
    {
        let (src, post) = sim.lattice.collision_buffers(current);
        collide(src, sim.barrier.as_slice(), width, sim.params.tau, post);
    }
    if let Some(t0) = t0 {
        sim.perf_stats.collision_ms += t0.elapsed_ms();
    }

    let config = StreamConfig {
        width,
        height,
        inflow_velocity: sim.params.inflow_velocity,
        no_slip: sim.params.no_slip,
    };
    let t0 = if perf_on { Some(PerfTimer::start()) } else { None };
    {
        let (post, next) = sim.lattice.streaming_buffers(current);
        stream(post, sim.barrier.as_slice(), &config, next);
    }
    if let Some(t0) = t0 {
        sim.perf_stats.streaming_ms += t0.elapsed_ms();
    }

    sim.substep += 1;
}

/// Visualization pass over the latest generation
pub(super) fn render(sim: &mut Simulation) {
    sim.apply_pending_edits();

    let gen = sim.current_generation();
    let field = sim.lattice.generation(gen);
    compute_moments(field, &mut sim.render.moments);

    let config = ColorConfig {
        width: sim.lattice.width(),
        height: sim.lattice.height(),
        mode: sim.params.visualization_mode,
        inflow_velocity: sim.params.inflow_velocity,
    };
    colorize(&sim.render.moments, sim.barrier.as_slice(), &config, &mut sim.render.rgb);

    pack_canvas(&sim.render.rgb, config.width, &mut sim.render.colors);
}
