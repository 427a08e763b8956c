//! VisualizationStage - per-cell display color from a settled generation
//!
//! Two passes: `compute_moments` derives (ρ, ux, uy) per cell, then
//! `colorize` maps them to RGB for the selected mode. Curl and schlieren
//! read neighbor moments, which is why the first pass has to finish before
//! the second starts.
//!
//! Colors are display-only floats and are not clamped here; packing for the
//! canvas saturates them (see `pack_abgr`).

use crate::core::d2q9::{moments, Q};
use crate::domain::params::VisualizationMode;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

pub type Rgb = [f32; 3];

/// Obstacles in density mode
pub const OBSTACLE_BLACK: Rgb = [0.0, 0.0, 0.0];
/// Obstacles in every other mode
pub const OBSTACLE_HIGHLIGHT: Rgb = [1.0, 0.8, 0.0];

/// Visual gain of the curl estimate (no cell-spacing normalization)
pub const CURL_GAIN: f32 = 50.0;
/// Visual gain of the density gradient magnitude
pub const SCHLIEREN_GAIN: f32 = 100.0;

/// (v, 1 - |v - 0.5|, 1 - v), unclamped
#[inline]
pub fn ramp_color(v: f32) -> Rgb {
    [v, 1.0 - (v - 0.5).abs(), 1.0 - v]
}

#[inline]
fn gray(v: f32) -> Rgb {
    [v, v, v]
}

/// Fill `out[cell] = (ρ, ux, uy)` for every cell of `field`
pub fn compute_moments(field: &[f32], out: &mut [[f32; 3]]) {
    #[cfg(feature = "parallel")]
    {
        out.par_iter_mut()
            .zip(field.par_chunks(Q))
            .for_each(|(m, f)| {
                let (rho, ux, uy) = moments(f);
                *m = [rho, ux, uy];
            });
    }

    #[cfg(not(feature = "parallel"))]
    {
        for (m, f) in out.iter_mut().zip(field.chunks(Q)) {
            let (rho, ux, uy) = moments(f);
            *m = [rho, ux, uy];
        }
    }
}

/// Settings the color pass needs
#[derive(Clone, Copy, Debug)]
pub struct ColorConfig {
    pub width: u32,
    pub height: u32,
    pub mode: VisualizationMode,
    pub inflow_velocity: f32,
}

/// Map moments to one color per cell
pub fn colorize(moments: &[[f32; 3]], barrier: &[u8], config: &ColorConfig, out: &mut [Rgb]) {
    let width = config.width as usize;
    if width == 0 {
        return;
    }

    #[cfg(feature = "parallel")]
    {
        out.par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| colorize_row(moments, barrier, config, y, row));
    }

    #[cfg(not(feature = "parallel"))]
    {
        for (y, row) in out.chunks_mut(width).enumerate() {
            colorize_row(moments, barrier, config, y, row);
        }
    }
}

fn colorize_row(moments: &[[f32; 3]], barrier: &[u8], config: &ColorConfig, y: usize, row: &mut [Rgb]) {
    let width = config.width as usize;
    let height = config.height as usize;
    let obstacle = match config.mode {
        VisualizationMode::Density => OBSTACLE_BLACK,
        _ => OBSTACLE_HIGHLIGHT,
    };

    for x in 0..width {
        let cell = y * width + x;
        if barrier[cell] != 0 {
            row[x] = obstacle;
            continue;
        }

        let [rho, ux, uy] = moments[cell];
        // Missing neighbors at the edges fall back to the cell itself.
        let west = if x > 0 { cell - 1 } else { cell };
        let east = if x + 1 < width { cell + 1 } else { cell };
        let south = if y > 0 { cell - width } else { cell };
        let north = if y + 1 < height { cell + width } else { cell };

        row[x] = match config.mode {
            VisualizationMode::Density => ramp_color(1.5 * rho - 1.0),
            VisualizationMode::Speed => {
                let speed = (ux * ux + uy * uy).sqrt();
                ramp_color(2.0 * speed - config.inflow_velocity)
            }
            VisualizationMode::Curl => {
                let duy_dx = moments[east][2] - moments[west][2];
                let dux_dy = moments[north][1] - moments[south][1];
                gray(((duy_dx - dux_dy) * CURL_GAIN).abs())
            }
            VisualizationMode::Schlieren => {
                let gx = moments[east][0] - moments[west][0];
                let gy = moments[north][0] - moments[south][0];
                gray((gx * gx + gy * gy).sqrt() * SCHLIEREN_GAIN)
            }
        };
    }
}

/// Pack to 0xAABBGGRR (little-endian RGBA bytes), saturating each channel
#[inline]
pub fn pack_abgr(rgb: Rgb) -> u32 {
    let channel = |c: f32| -> u32 {
        if c.is_nan() {
            return 0;
        }
        (c.clamp(0.0, 1.0) * 255.0).round() as u32
    };
    0xFF00_0000 | (channel(rgb[2]) << 16) | (channel(rgb[1]) << 8) | channel(rgb[0])
}
