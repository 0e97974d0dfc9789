// paint.rs - Pre-run cell painting from pointer input

use crate::grid::{CellState, Grid, RenderSink};

/// Bit of `PointerEvent::buttons` for the primary (usually left) button.
pub const PRIMARY_BUTTON: u8 = 1;

/// Pointer position relative to the grid's top-left pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub offset_x: f32,
    pub offset_y: f32,
    pub buttons: u8,
}

impl PointerEvent {
    pub fn new(offset_x: f32, offset_y: f32, buttons: u8) -> Self {
        Self { offset_x, offset_y, buttons }
    }

    pub fn primary_held(&self) -> bool {
        self.buttons & PRIMARY_BUTTON != 0
    }
}

/// Applies one paint value along a drag.
///
/// The value is sampled on pointer-down as the inverse of the cell under
/// the pointer, so a drag that starts on a dead cell draws and one that
/// starts on a live cell erases.
#[derive(Debug, Default)]
pub struct PaintController {
    paint_value: CellState,
}

impl PaintController {
    pub fn paint_value(&self) -> CellState {
        self.paint_value
    }

    /// Cell under a pixel position, if it lies on the grid.
    pub fn cell_at(grid: &Grid, offset_x: f32, offset_y: f32) -> Option<(usize, usize)> {
        let size = grid.cell_size() as f32;
        if !(offset_x >= 0.0 && offset_y >= 0.0) {
            return None;
        }
        let x = (offset_x / size).floor() as usize;
        let y = (offset_y / size).floor() as usize;
        (x < grid.cols() && y < grid.rows()).then_some((x, y))
    }

    /// Sample the paint value from the targeted cell, then paint it.
    pub fn pointer_down(
        &mut self,
        grid: &mut Grid,
        event: PointerEvent,
        sink: &mut dyn RenderSink,
    ) -> bool {
        if !event.primary_held() {
            return false;
        }
        let Some((x, y)) = Self::cell_at(grid, event.offset_x, event.offset_y) else {
            return false;
        };
        self.paint_value = grid.get(x as isize, y as isize).toggled();
        self.paint(grid, event, sink)
    }

    /// Write the current paint value under the pointer.
    ///
    /// Paint writes are unconditional: the touched cell is redrawn even if
    /// it already holds the paint value.
    pub fn paint(&mut self, grid: &mut Grid, event: PointerEvent, sink: &mut dyn RenderSink) -> bool {
        if !event.primary_held() {
            return false;
        }
        match Self::cell_at(grid, event.offset_x, event.offset_y) {
            Some((x, y)) => {
                grid.write(x as isize, y as isize, self.paint_value, sink);
                true
            }
            None => false,
        }
    }
}
