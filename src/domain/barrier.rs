//! BarrierField - one obstacle flag per cell
//!
//! Edited only through point edits, brush strokes and bulk replacement;
//! the compute stages see it as a read-only `&[u8]` (0 = fluid, 1 = solid).
//!
//! Brush strokes use first-contact-sets-mode: the first cell a stroke touches
//! decides whether the whole stroke draws or erases.

use super::params::ParamError;

pub struct BarrierField {
    width: u32,
    height: u32,
    cells: Vec<u8>,
    stroke_mode: Option<bool>,
}

impl BarrierField {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_capacity(width, height, (width as usize) * (height as usize))
    }

    pub fn with_capacity(width: u32, height: u32, max_cells: usize) -> Self {
        let size = (width as usize) * (height as usize);
        let mut cells = Vec::with_capacity(max_cells.max(size));
        cells.resize(size, 0);
        Self {
            width,
            height,
            cells,
            stroke_mode: None,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 { self.width }

    #[inline]
    pub fn height(&self) -> u32 { self.height }

    #[inline]
    pub fn size(&self) -> usize { self.cells.len() }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    /// Obstacle flag at (x, y); cells outside the grid are fluid
    #[inline]
    pub fn is_barrier(&self, x: i32, y: i32) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        self.cells[self.index(x as u32, y as u32)] != 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.cells
    }

    pub fn as_ptr(&self) -> *const u8 {
        self.cells.as_ptr()
    }

    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != 0).count()
    }

    /// Set one cell. Returns false outside the grid.
    pub fn set(&mut self, x: i32, y: i32, solid: bool) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        let idx = self.index(x as u32, y as u32);
        self.cells[idx] = solid as u8;
        true
    }

    /// Flip one cell. Returns false outside the grid.
    pub fn toggle(&mut self, x: i32, y: i32) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        let idx = self.index(x as u32, y as u32);
        self.cells[idx] ^= 1;
        true
    }

    pub fn begin_stroke(&mut self) {
        self.stroke_mode = None;
    }

    pub fn end_stroke(&mut self) {
        self.stroke_mode = None;
    }

    /// Draw or erase mode of the running stroke, once decided
    pub fn stroke_mode(&self) -> Option<bool> {
        self.stroke_mode
    }

    /// Paint one cell with the stroke's mode. The first contact of a stroke
    /// picks the mode: touching fluid draws, touching an obstacle erases.
    pub fn paint(&mut self, x: i32, y: i32) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        let mode = match self.stroke_mode {
            Some(mode) => mode,
            None => {
                let mode = !self.is_barrier(x, y);
                self.stroke_mode = Some(mode);
                mode
            }
        };
        self.set(x, y, mode)
    }

    /// Paint a disc. The center is painted first so it decides the mode.
    /// Only cells inside the grid are visited, whatever the radius.
    pub fn paint_radius(&mut self, cx: i32, cy: i32, radius: i32) {
        if radius < 0 || self.cells.is_empty() {
            return;
        }
        self.paint(cx, cy);

        let (cx, cy, r) = (cx as i64, cy as i64, radius as i64);
        // Centers far off-grid make the squares exceed i64.
        let r2 = (r as i128) * (r as i128);
        let y0 = (cy - r).max(0);
        let y1 = (cy + r).min(self.height as i64 - 1);
        let x0 = (cx - r).max(0);
        let x1 = (cx + r).min(self.width as i64 - 1);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let (dx, dy) = ((x - cx) as i128, (y - cy) as i128);
                if (dx != 0 || dy != 0) && dx * dx + dy * dy <= r2 {
                    self.paint(x as i32, y as i32);
                }
            }
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(0);
        self.stroke_mode = None;
    }

    /// Bulk replacement with a grid-space mask (row 0 = bottom).
    /// Any non-zero byte marks an obstacle.
    pub fn replace(&mut self, mask: &[u8]) -> Result<(), ParamError> {
        if mask.len() != self.cells.len() {
            return Err(ParamError::MaskSize {
                expected: self.cells.len(),
                actual: mask.len(),
            });
        }
        for (dst, &src) in self.cells.iter_mut().zip(mask.iter()) {
            *dst = (src != 0) as u8;
        }
        self.stroke_mode = None;
        Ok(())
    }

    /// Resize to a new grid and clear every flag.
    /// Stays inside the existing allocation when it fits.
    pub fn reshape(&mut self, width: u32, height: u32) {
        let size = (width as usize) * (height as usize);
        self.width = width;
        self.height = height;
        self.cells.clear();
        self.cells.resize(size, 0);
        self.stroke_mode = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_twice_restores_occupancy() {
        let mut field = BarrierField::new(8, 8);
        field.set(3, 3, true);

        for (x, y) in [(2, 2), (3, 3)] {
            let before = field.is_barrier(x, y);
            assert!(field.toggle(x, y));
            assert_ne!(field.is_barrier(x, y), before);
            assert!(field.toggle(x, y));
            assert_eq!(field.is_barrier(x, y), before);
        }
    }

    #[test]
    fn first_contact_decides_stroke_mode() {
        let mut field = BarrierField::new(8, 8);
        field.set(4, 4, true);

        // Starting on fluid draws, even across an existing obstacle.
        field.begin_stroke();
        field.paint(3, 4);
        field.paint(4, 4);
        field.paint(5, 4);
        field.end_stroke();
        assert!(field.is_barrier(3, 4));
        assert!(field.is_barrier(4, 4));
        assert!(field.is_barrier(5, 4));

        // Starting on an obstacle erases.
        field.begin_stroke();
        field.paint(4, 4);
        field.paint(1, 1);
        field.paint(5, 4);
        field.end_stroke();
        assert!(field.is_barrier(3, 4));
        assert!(!field.is_barrier(4, 4));
        assert!(!field.is_barrier(1, 1));
        assert!(!field.is_barrier(5, 4));
    }

    #[test]
    fn two_single_cell_strokes_restore_untouched_cell() {
        let mut field = BarrierField::new(4, 4);
        for _ in 0..2 {
            field.begin_stroke();
            field.paint(1, 2);
            field.end_stroke();
        }
        assert!(!field.is_barrier(1, 2));
        assert_eq!(field.count(), 0);
    }

    #[test]
    fn out_of_grid_edits_are_ignored() {
        let mut field = BarrierField::new(4, 4);
        assert!(!field.toggle(-1, 0));
        assert!(!field.paint(0, 4));
        assert!(!field.set(4, 0, true));
        assert!(!field.is_barrier(9, 9));
        assert_eq!(field.count(), 0);
    }

    #[test]
    fn paint_radius_draws_a_disc() {
        let mut field = BarrierField::new(16, 16);
        field.begin_stroke();
        field.paint_radius(8, 8, 2);
        field.end_stroke();
        // 13 lattice points satisfy dx^2 + dy^2 <= 4
        assert_eq!(field.count(), 13);
        assert!(field.is_barrier(8, 10));
        assert!(!field.is_barrier(10, 10));
    }

    #[test]
    fn huge_radius_covers_the_grid_without_overflow() {
        let mut field = BarrierField::new(8, 8);
        field.paint_radius(4, 4, 50_000);
        assert_eq!(field.count(), 64);

        let mut field = BarrierField::new(8, 8);
        field.paint_radius(i32::MAX, i32::MIN, i32::MAX);
        field.paint_radius(-3, -3, 5);
        assert!(field.is_barrier(0, 0));
        assert!(field.is_barrier(1, 0));
        assert!(!field.is_barrier(2, 2));
    }

    #[test]
    fn replace_checks_mask_size() {
        let mut field = BarrierField::new(3, 2);
        assert!(field.replace(&[0, 1, 0, 2, 0, 0]).is_ok());
        assert_eq!(field.as_slice(), &[0, 1, 0, 1, 0, 0]);

        let err = field.replace(&[1, 1]).unwrap_err();
        assert_eq!(err, ParamError::MaskSize { expected: 6, actual: 2 });
    }

    #[test]
    fn reshape_clears_and_resizes() {
        let mut field = BarrierField::with_capacity(4, 4, 64);
        field.set(1, 1, true);
        field.reshape(2, 3);
        assert_eq!(field.size(), 6);
        assert_eq!(field.count(), 0);
    }
}
