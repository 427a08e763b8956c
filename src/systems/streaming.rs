//! StreamingStage - pull-based propagation with the tunnel boundary policy
//!
//! Cell (x, y) pulls direction d from its upstream neighbor
//! (x - ex[d], y - ey[d]) in the post-collision buffer:
//!
//! - upstream x off-grid: inflow equilibrium (ρ = 1, u = (inflow, 0))
//! - upstream y off-grid: bounce-back from the cell itself when no-slip is
//!   on, otherwise the same inflow equilibrium
//! - otherwise: copy of the neighbor's value, obstacles included (their
//!   post-collision state is already reflected by the collision pass)
//!
//! Obstacle cells keep their own post-collision values and never receive
//! mass from neighbors. Every written value is clamped to [F_MIN, F_MAX];
//! the clamp bounds the state, it does not make unstable settings physical.

use crate::core::d2q9::{equilibrium_cell, E, F_MAX, F_MIN, OPP, Q};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Grid and boundary settings for one streaming pass
#[derive(Clone, Copy, Debug)]
pub struct StreamConfig {
    pub width: u32,
    pub height: u32,
    pub inflow_velocity: f32,
    pub no_slip: bool,
}

/// Run streaming over the whole grid, writing `next`.
pub fn stream(post: &[f32], barrier: &[u8], config: &StreamConfig, next: &mut [f32]) {
    let width = config.width as usize;
    let row_len = width * Q;
    if row_len == 0 {
        return;
    }
    let inflow = equilibrium_cell(1.0, config.inflow_velocity, 0.0);

    #[cfg(feature = "parallel")]
    {
        next.par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| stream_row(post, barrier, config, &inflow, y, row));
    }

    #[cfg(not(feature = "parallel"))]
    {
        for (y, row) in next.chunks_mut(row_len).enumerate() {
            stream_row(post, barrier, config, &inflow, y, row);
        }
    }
}

#[inline]
fn stream_row(
    post: &[f32],
    barrier: &[u8],
    config: &StreamConfig,
    inflow: &[f32; Q],
    y: usize,
    row: &mut [f32],
) {
    let width = config.width as i32;
    let height = config.height as i32;
    let yi = y as i32;

    for x in 0..width {
        let cell = (yi * width + x) as usize;
        let own = &post[cell * Q..cell * Q + Q];
        let dst = &mut row[(x as usize) * Q..(x as usize) * Q + Q];

        if barrier[cell] != 0 {
            for d in 0..Q {
                dst[d] = clamp_stable(own[d]);
            }
            continue;
        }

        for d in 0..Q {
            let sx = x - E[d][0];
            let sy = yi - E[d][1];

            let value = if sx < 0 || sx >= width {
                inflow[d]
            } else if sy < 0 || sy >= height {
                if config.no_slip {
                    own[OPP[d]]
                } else {
                    inflow[d]
                }
            } else {
                let src = (sy * width + sx) as usize;
                post[src * Q + d]
            };

            dst[d] = clamp_stable(value);
        }
    }
}

/// Clamp to [F_MIN, F_MAX]; NaN collapses to F_MIN
#[inline(always)]
pub fn clamp_stable(value: f32) -> f32 {
    if value >= F_MIN {
        value.min(F_MAX)
    } else {
        F_MIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::d2q9::equilibrium;

    fn config(width: u32, height: u32, no_slip: bool) -> StreamConfig {
        StreamConfig {
            width,
            height,
            inflow_velocity: 0.1,
            no_slip,
        }
    }

    /// Every cell gets distinct, recognizable values: 0.001 * (cell + 1) + 0.01 * d
    fn tagged(cells: usize) -> Vec<f32> {
        let mut buf = vec![0.0; cells * Q];
        for cell in 0..cells {
            for d in 0..Q {
                buf[cell * Q + d] = 0.001 * (cell + 1) as f32 + 0.01 * d as f32;
            }
        }
        buf
    }

    #[test]
    fn interior_cell_pulls_from_upstream_neighbors() {
        let post = tagged(9);
        let barrier = vec![0u8; 9];
        let mut next = vec![0.0; 9 * Q];
        stream(&post, &barrier, &config(3, 3, false), &mut next);

        let center = 4;
        for d in 0..Q {
            let sx = 1 - E[d][0];
            let sy = 1 - E[d][1];
            let src = (sy * 3 + sx) as usize;
            assert_eq!(next[center * Q + d], post[src * Q + d]);
        }
    }

    #[test]
    fn left_edge_receives_inflow_equilibrium() {
        let post = tagged(12);
        let barrier = vec![0u8; 12];
        let mut next = vec![0.0; 12 * Q];
        stream(&post, &barrier, &config(4, 3, true), &mut next);

        // (0, 1): directions 1, 5, 8 come from x = -1
        let cell = 4;
        for d in [1, 5, 8] {
            let expected = equilibrium(d, 1.0, 0.1, 0.0);
            assert!((next[cell * Q + d] - expected).abs() < 1e-7);
        }
    }

    #[test]
    fn no_slip_walls_bounce_back_from_the_cell_itself() {
        let post = tagged(12);
        let barrier = vec![0u8; 12];
        let mut next = vec![0.0; 12 * Q];
        stream(&post, &barrier, &config(4, 3, true), &mut next);

        // Bottom row (1, 0): directions 2, 5, 6 come from y = -1
        let cell = 1;
        for d in [2, 5, 6] {
            assert_eq!(next[cell * Q + d], post[cell * Q + OPP[d]]);
        }
        // Top row (2, 2): directions 4, 7, 8 come from y = 3
        let cell = 10;
        for d in [4, 7, 8] {
            assert_eq!(next[cell * Q + d], post[cell * Q + OPP[d]]);
        }
    }

    #[test]
    fn open_walls_substitute_inflow_equilibrium() {
        let post = tagged(12);
        let barrier = vec![0u8; 12];
        let mut next = vec![0.0; 12 * Q];
        stream(&post, &barrier, &config(4, 3, false), &mut next);

        let cell = 2; // (2, 0)
        for d in [2, 5, 6] {
            let expected = equilibrium(d, 1.0, 0.1, 0.0);
            assert!((next[cell * Q + d] - expected).abs() < 1e-7);
        }
    }

    #[test]
    fn obstacles_keep_their_state_and_pass_on_reflected_values() {
        let post = tagged(9);
        let mut barrier = vec![0u8; 9];
        barrier[4] = 1;
        let mut next = vec![0.0; 9 * Q];
        stream(&post, &barrier, &config(3, 3, false), &mut next);

        // Obstacle keeps its own post-collision state.
        assert_eq!(&next[4 * Q..5 * Q], &post[4 * Q..5 * Q]);
        // East neighbor (2, 1) pulls direction 1 straight from the obstacle.
        assert_eq!(next[5 * Q + 1], post[4 * Q + 1]);
        // North neighbor (1, 2) pulls direction 2 from it too.
        assert_eq!(next[7 * Q + 2], post[4 * Q + 2]);
    }

    #[test]
    fn collision_bounce_back_reaches_fluid_neighbors() {
        use crate::systems::collision::collide;

        // Obstacle at (1, 1) holds a rightward-heavy state; after collision it
        // points left, so the west neighbor receives the reflected population.
        let mut current = tagged(9);
        for d in 0..Q {
            current[4 * Q + d] = 0.02;
        }
        current[4 * Q + 1] = 0.3;
        let mut barrier = vec![0u8; 9];
        barrier[4] = 1;

        let mut post = vec![0.0; 9 * Q];
        collide(&current, &barrier, 3, 0.6, &mut post);
        let mut next = vec![0.0; 9 * Q];
        stream(&post, &barrier, &config(3, 3, false), &mut next);

        // (0, 1) pulls direction 3 from (1, 1): the reflected direction 1.
        assert_eq!(next[3 * Q + 3], 0.3);
    }

    #[test]
    fn output_is_clamped_for_adversarial_input() {
        let cells = 16;
        let mut post = vec![0.0; cells * Q];
        for (i, v) in post.iter_mut().enumerate() {
            *v = match i % 4 {
                0 => -3.0,
                1 => 7.5,
                2 => f32::NAN,
                _ => f32::INFINITY,
            };
        }
        let mut barrier = vec![0u8; cells];
        barrier[5] = 1;
        let mut next = vec![0.0; cells * Q];
        stream(&post, &barrier, &config(4, 4, true), &mut next);

        assert!(next.iter().all(|&v| (F_MIN..=F_MAX).contains(&v)));
    }
}
