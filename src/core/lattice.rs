//! LatticeState - two distribution generations plus the post-collision buffer
//!
//! Collision reads generation `current` and writes `post`; streaming reads
//! `post` and writes `current.other()`. No stage ever reads and writes the
//! same buffer, so every cell of a stage can run in parallel.
//!
//! Buffers are allocated for a maximum cell count. The logical grid may
//! shrink inside that allocation; growing past it needs a new `LatticeState`.

use super::d2q9::{equilibrium_cell, Q};

/// Which of the two generations holds the latest distributions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Generation {
    A,
    B,
}

impl Generation {
    /// Generation that is "current" before sub-step `substep` runs.
    /// Sub-step 0 reads A and writes B, sub-step 1 reads B and writes A, ...
    #[inline]
    pub fn for_substep(substep: u64) -> Self {
        if substep & 1 == 0 {
            Generation::A
        } else {
            Generation::B
        }
    }

    #[inline]
    pub fn other(self) -> Self {
        match self {
            Generation::A => Generation::B,
            Generation::B => Generation::A,
        }
    }
}

pub struct LatticeState {
    width: u32,
    height: u32,
    capacity: usize, // cells

    gen_a: Vec<f32>,
    gen_b: Vec<f32>,
    post: Vec<f32>,
}

impl LatticeState {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_capacity(width, height, (width as usize) * (height as usize))
    }

    /// Allocate for `max_cells` cells, using `width * height` of them.
    pub fn with_capacity(width: u32, height: u32, max_cells: usize) -> Self {
        let cells = (width as usize) * (height as usize);
        let capacity = max_cells.max(cells);
        Self {
            width,
            height,
            capacity,
            gen_a: vec![0.0; capacity * Q],
            gen_b: vec![0.0; capacity * Q],
            post: vec![0.0; capacity * Q],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 { self.width }

    #[inline]
    pub fn height(&self) -> u32 { self.height }

    #[inline]
    pub fn cell_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Maximum cell count the buffers can hold without reallocation
    #[inline]
    pub fn capacity(&self) -> usize { self.capacity }

    /// True when a `width x height` grid fits in the current allocation
    #[inline]
    pub fn fits(&self, width: u32, height: u32) -> bool {
        (width as usize) * (height as usize) <= self.capacity
    }

    /// Change the logical grid inside the existing allocation.
    /// Returns false (and leaves the state untouched) when it does not fit.
    pub fn reshape(&mut self, width: u32, height: u32) -> bool {
        if !self.fits(width, height) {
            return false;
        }
        self.width = width;
        self.height = height;
        true
    }

    /// Fill both generations and the post-collision buffer with the
    /// equilibrium of a uniform flow.
    pub fn seed_equilibrium(&mut self, rho: f32, ux: f32, uy: f32) {
        let feq = equilibrium_cell(rho, ux, uy);
        let len = self.cell_count() * Q;
        for buf in [&mut self.gen_a, &mut self.gen_b, &mut self.post] {
            for cell in buf[..len].chunks_exact_mut(Q) {
                cell.copy_from_slice(&feq);
            }
        }
    }

    #[inline]
    fn active_len(&self) -> usize {
        self.cell_count() * Q
    }

    /// Distributions of one generation (active grid only)
    pub fn generation(&self, gen: Generation) -> &[f32] {
        let len = self.active_len();
        match gen {
            Generation::A => &self.gen_a[..len],
            Generation::B => &self.gen_b[..len],
        }
    }

    pub fn generation_mut(&mut self, gen: Generation) -> &mut [f32] {
        let len = self.active_len();
        match gen {
            Generation::A => &mut self.gen_a[..len],
            Generation::B => &mut self.gen_b[..len],
        }
    }

    /// Output of the last collision pass
    pub fn post_collision(&self) -> &[f32] {
        &self.post[..self.active_len()]
    }

    pub fn post_collision_mut(&mut self) -> &mut [f32] {
        let len = self.active_len();
        &mut self.post[..len]
    }

    /// (read: current generation, write: post-collision)
    pub fn collision_buffers(&mut self, current: Generation) -> (&[f32], &mut [f32]) {
        let len = self.active_len();
        let src = match current {
            Generation::A => &self.gen_a[..len],
            Generation::B => &self.gen_b[..len],
        };
        (src, &mut self.post[..len])
    }

    /// (read: post-collision, write: the generation that is not `current`)
    pub fn streaming_buffers(&mut self, current: Generation) -> (&[f32], &mut [f32]) {
        let len = self.active_len();
        let dst = match current.other() {
            Generation::A => &mut self.gen_a[..len],
            Generation::B => &mut self.gen_b[..len],
        };
        (&self.post[..len], dst)
    }

    #[inline]
    pub fn cell_index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    /// The 9 distributions of cell (x, y); None outside the grid
    pub fn cell(&self, gen: Generation, x: u32, y: u32) -> Option<&[f32]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let base = self.cell_index(x, y) * Q;
        Some(&self.generation(gen)[base..base + Q])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::d2q9::equilibrium;

    #[test]
    fn generation_alternates_with_substep() {
        assert_eq!(Generation::for_substep(0), Generation::A);
        assert_eq!(Generation::for_substep(1), Generation::B);
        assert_eq!(Generation::for_substep(2), Generation::A);
        assert_eq!(Generation::for_substep(7), Generation::B);
        assert_eq!(Generation::A.other(), Generation::B);
    }

    #[test]
    fn seed_fills_every_buffer_with_equilibrium() {
        let mut lattice = LatticeState::new(5, 3);
        lattice.seed_equilibrium(1.0, 0.1, 0.0);

        let expected = equilibrium(1, 1.0, 0.1, 0.0);
        for gen in [Generation::A, Generation::B] {
            let cell = lattice.cell(gen, 4, 2).unwrap();
            assert!((cell[1] - expected).abs() < 1e-7);
        }
        assert!((lattice.post_collision()[Q + 1] - expected).abs() < 1e-7);
    }

    #[test]
    fn reshape_shrinks_in_place_but_refuses_growth() {
        let mut lattice = LatticeState::with_capacity(8, 8, 100);
        assert_eq!(lattice.capacity(), 100);

        assert!(lattice.reshape(10, 10));
        assert_eq!(lattice.generation(Generation::A).len(), 100 * Q);

        assert!(lattice.reshape(4, 4));
        assert_eq!(lattice.generation(Generation::B).len(), 16 * Q);

        assert!(!lattice.reshape(20, 6));
        assert_eq!((lattice.width(), lattice.height()), (4, 4));
    }

    #[test]
    fn stage_buffers_never_alias() {
        let mut lattice = LatticeState::new(2, 2);
        lattice.generation_mut(Generation::A).fill(0.25);
        lattice.generation_mut(Generation::B).fill(0.5);

        let (src, post) = lattice.collision_buffers(Generation::A);
        assert_eq!(src[0], 0.25);
        post.fill(0.75);

        let (post, dst) = lattice.streaming_buffers(Generation::A);
        assert_eq!(post[0], 0.75);
        assert_eq!(dst[0], 0.5); // B is the write target when A is current
    }

    #[test]
    fn cell_outside_grid_is_none() {
        let lattice = LatticeState::new(3, 3);
        assert!(lattice.cell(Generation::A, 3, 0).is_none());
        assert!(lattice.cell(Generation::A, 0, 3).is_none());
    }
}
