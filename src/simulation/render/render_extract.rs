use crate::core::d2q9::{moments, Q};
use crate::systems::visualization::pack_abgr;
use crate::systems::Rgb;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::{FrameLayoutData, Simulation};

/// Pack grid-order colors (row 0 = bottom) into canvas order (row 0 = top)
pub(super) fn pack_canvas(rgb: &[Rgb], width: u32, colors: &mut [u32]) {
    let width = width as usize;
    if width == 0 {
        return;
    }
    let height = colors.len() / width;

    #[cfg(feature = "parallel")]
    {
        colors.par_chunks_mut(width).enumerate().for_each(|(row, dst)| {
            let src = &rgb[(height - 1 - row) * width..(height - row) * width];
            for (d, s) in dst.iter_mut().zip(src.iter()) {
                *d = pack_abgr(*s);
            }
        });
    }

    #[cfg(not(feature = "parallel"))]
    {
        for (row, dst) in colors.chunks_mut(width).enumerate() {
            let src = &rgb[(height - 1 - row) * width..(height - row) * width];
            for (d, s) in dst.iter_mut().zip(src.iter()) {
                *d = pack_abgr(*s);
            }
        }
    }
}

pub(super) fn rgb(sim: &Simulation) -> &[Rgb] {
    &sim.render.rgb
}

pub(super) fn colors(sim: &Simulation) -> &[u32] {
    &sim.render.colors
}

pub(super) fn frame_layout_data(sim: &Simulation) -> FrameLayoutData {
    let cells = sim.lattice.cell_count();
    FrameLayoutData {
        colors_ptr: sim.colors_ptr(),
        colors_len_elements: cells,
        colors_len_bytes: cells * std::mem::size_of::<u32>(),
        rgb_ptr: sim.rgb_ptr(),
        rgb_len_elements: cells * 3,
        rgb_len_bytes: cells * std::mem::size_of::<Rgb>(),
        barrier_ptr: sim.barrier_ptr(),
        barrier_len_elements: cells,
        barrier_len_bytes: cells,
    }
}

pub(super) fn moments_at(sim: &Simulation, x: u32, y: u32) -> Option<(f32, f32, f32)> {
    sim.lattice
        .cell(sim.current_generation(), x, y)
        .map(moments)
}

pub(super) fn total_density(sim: &Simulation) -> f64 {
    sim.lattice
        .generation(sim.current_generation())
        .iter()
        .map(|&f| f as f64)
        .sum()
}

pub(super) fn max_speed(sim: &Simulation) -> f32 {
    let field = sim.lattice.generation(sim.current_generation());
    let barrier = sim.barrier.as_slice();
    field
        .chunks_exact(Q)
        .zip(barrier.iter())
        .filter(|(_, solid)| **solid == 0)
        .map(|(f, _)| {
            let (_, ux, uy) = moments(f);
            (ux * ux + uy * uy).sqrt()
        })
        .fold(0.0, f32::max)
}
