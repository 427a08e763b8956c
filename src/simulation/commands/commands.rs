use crate::domain::barrier::BarrierField;
use crate::domain::mask::rasterize_rgba_mask;
use crate::domain::params::ParamError;

use super::Simulation;

/// Obstacle edit waiting for the next sub-step boundary
#[derive(Clone, Debug, PartialEq)]
pub enum BarrierEdit {
    Toggle { x: i32, y: i32 },
    BeginStroke,
    Paint { x: i32, y: i32 },
    PaintRadius { cx: i32, cy: i32, radius: i32 },
    EndStroke,
    Clear,
    Replace(Vec<u8>),
}

impl BarrierEdit {
    fn apply(self, barrier: &mut BarrierField) {
        match self {
            BarrierEdit::Toggle { x, y } => {
                barrier.toggle(x, y);
            }
            BarrierEdit::BeginStroke => barrier.begin_stroke(),
            BarrierEdit::Paint { x, y } => {
                barrier.paint(x, y);
            }
            BarrierEdit::PaintRadius { cx, cy, radius } => barrier.paint_radius(cx, cy, radius),
            BarrierEdit::EndStroke => barrier.end_stroke(),
            BarrierEdit::Clear => barrier.clear(),
            BarrierEdit::Replace(mask) => {
                // Size was checked when queued and the grid cannot change
                // without flushing the queue.
                let replaced = barrier.replace(&mask);
                debug_assert!(replaced.is_ok(), "queued mask no longer fits: {:?}", replaced);
            }
        }
    }
}

pub(super) fn toggle_barrier(sim: &mut Simulation, x: i32, y: i32) {
    sim.pending_edits.push(BarrierEdit::Toggle { x, y });
}

pub(super) fn begin_stroke(sim: &mut Simulation) {
    sim.pending_edits.push(BarrierEdit::BeginStroke);
}

pub(super) fn paint_barrier(sim: &mut Simulation, x: i32, y: i32) {
    sim.pending_edits.push(BarrierEdit::Paint { x, y });
}

pub(super) fn paint_barriers_in_radius(sim: &mut Simulation, cx: i32, cy: i32, radius: i32) {
    if radius < 0 {
        return;
    }
    sim.pending_edits.push(BarrierEdit::PaintRadius { cx, cy, radius });
}

pub(super) fn end_stroke(sim: &mut Simulation) {
    sim.pending_edits.push(BarrierEdit::EndStroke);
}

pub(super) fn clear_barriers(sim: &mut Simulation) {
    sim.pending_edits.push(BarrierEdit::Clear);
}

pub(super) fn replace_barriers(sim: &mut Simulation, mask: &[u8]) -> Result<(), ParamError> {
    let expected = sim.lattice.cell_count();
    if mask.len() != expected {
        console_warn!("obstacle mask rejected: {} cells for a {}-cell grid", mask.len(), expected);
        return Err(ParamError::MaskSize {
            expected,
            actual: mask.len(),
        });
    }
    sim.pending_edits.push(BarrierEdit::Replace(mask.to_vec()));
    Ok(())
}

pub(super) fn replace_barriers_from_rgba(
    sim: &mut Simulation,
    rgba: &[u8],
    image_width: u32,
    image_height: u32,
    threshold: u8,
) -> Result<(), ParamError> {
    let mask = rasterize_rgba_mask(
        rgba,
        image_width,
        image_height,
        sim.lattice.width(),
        sim.lattice.height(),
        threshold,
    )?;
    sim.pending_edits.push(BarrierEdit::Replace(mask));
    Ok(())
}

/// Sub-step boundary: staged parameters become the active snapshot and
/// queued obstacle edits are applied in the order they were made.
pub(super) fn apply_pending_edits(sim: &mut Simulation) {
    sim.params = sim.staged.clone();

    if sim.pending_edits.is_empty() {
        return;
    }
    let mut edits = std::mem::take(&mut sim.pending_edits);
    for edit in edits.drain(..) {
        edit.apply(&mut sim.barrier);
    }
    sim.pending_edits = edits;
}
