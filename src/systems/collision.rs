//! CollisionStage - BGK relaxation and in-place obstacle bounce-back
//!
//! Reads one generation, writes the post-collision buffer. Rows are
//! independent, so they run in parallel with Rayon when the feature is on.

use crate::core::d2q9::{equilibrium, moments, OPP, Q};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Run collision over the whole grid.
///
/// `current` and `post` hold `width * height * Q` values, `barrier` holds
/// `width * height` flags.
pub fn collide(current: &[f32], barrier: &[u8], width: u32, tau: f32, post: &mut [f32]) {
    let width = width as usize;
    let row_len = width * Q;
    if row_len == 0 {
        return;
    }
    let omega = 1.0 / tau;

    #[cfg(feature = "parallel")]
    {
        post.par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| collide_row(current, barrier, width, y, omega, row));
    }

    #[cfg(not(feature = "parallel"))]
    {
        for (y, row) in post.chunks_mut(row_len).enumerate() {
            collide_row(current, barrier, width, y, omega, row);
        }
    }
}

#[inline]
fn collide_row(current: &[f32], barrier: &[u8], width: usize, y: usize, omega: f32, row: &mut [f32]) {
    for x in 0..width {
        let cell = y * width + x;
        let src = &current[cell * Q..cell * Q + Q];
        let dst = &mut row[x * Q..x * Q + Q];
        if barrier[cell] != 0 {
            bounce_back(src, dst);
        } else {
            relax(src, dst, omega);
        }
    }
}

/// f_post[d] = f[d] - (f[d] - f_eq[d]) * omega, with omega = 1 / tau
#[inline(always)]
pub fn relax(src: &[f32], dst: &mut [f32], omega: f32) {
    let (rho, ux, uy) = moments(src);
    for d in 0..Q {
        let feq = equilibrium(d, rho, ux, uy);
        dst[d] = src[d] - (src[d] - feq) * omega;
    }
}

/// Full bounce-back: every distribution is sent back the way it came
#[inline(always)]
pub fn bounce_back(src: &[f32], dst: &mut [f32]) {
    for d in 0..Q {
        dst[d] = src[OPP[d]];
    }
}
