// grid.rs - Toroidal cell field with per-cell change notification

use tokio::sync::mpsc::UnboundedSender;

use crate::config::{ConfigError, check_dimensions, pixel_extent};

/// State of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellState {
    #[default]
    Dead,
    Alive,
}

impl CellState {
    pub fn is_alive(self) -> bool {
        self == CellState::Alive
    }

    pub fn toggled(self) -> Self {
        match self {
            CellState::Dead => CellState::Alive,
            CellState::Alive => CellState::Dead,
        }
    }
}

impl From<bool> for CellState {
    fn from(alive: bool) -> Self {
        if alive { CellState::Alive } else { CellState::Dead }
    }
}

/// Drawing commands emitted towards whoever renders the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderEvent {
    Cell { pixel_x: u32, pixel_y: u32, state: CellState },
    Clear,
}

/// Receives a notification for every cell write that has to be redrawn.
///
/// Coordinates are in pixel space: the top-left corner of the cell, i.e.
/// `(x * cell_size, y * cell_size)`.
pub trait RenderSink: Send {
    fn cell_changed(&mut self, pixel_x: u32, pixel_y: u32, state: CellState);

    /// Wipe all rendered cells. Grid lines are the renderer's business.
    fn clear(&mut self);
}

// A host that dropped its receiver simply stops seeing updates.
impl RenderSink for UnboundedSender<RenderEvent> {
    fn cell_changed(&mut self, pixel_x: u32, pixel_y: u32, state: CellState) {
        let _ = self.send(RenderEvent::Cell { pixel_x, pixel_y, state });
    }

    fn clear(&mut self) {
        let _ = self.send(RenderEvent::Clear);
    }
}

/// Sink that discards everything, for headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn cell_changed(&mut self, _pixel_x: u32, _pixel_y: u32, _state: CellState) {}
    fn clear(&mut self) {}
}

/// Fixed-size field whose edges wrap around onto each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cols: usize,
    rows: usize,
    cell_size: u32,
    cells: Vec<CellState>, // row-major
}

impl Grid {
    /// All-dead grid, or the reason the shape is unusable.
    pub fn try_new(cols: usize, rows: usize, cell_size: u32) -> Result<Self, ConfigError> {
        check_dimensions(cols, rows, cell_size)?;
        Ok(Self {
            cols,
            rows,
            cell_size,
            cells: vec![CellState::Dead; cols * rows],
        })
    }

    /// All-dead grid.
    ///
    /// # Panics
    ///
    /// If a dimension or `cell_size` is zero, or if the grid's pixel extent
    /// does not fit in `u32`. A config that passed
    /// [`SimulationConfig::validate`](crate::SimulationConfig::validate) never panics here.
    pub fn new(cols: usize, rows: usize, cell_size: u32) -> Self {
        Self::try_new(cols, rows, cell_size).unwrap_or_else(|err| panic!("invalid grid: {err}"))
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    /// Map an arbitrary coordinate pair onto the torus.
    pub fn normalize(&self, x: isize, y: isize) -> (usize, usize) {
        (
            x.rem_euclid(self.cols as isize) as usize,
            y.rem_euclid(self.rows as isize) as usize,
        )
    }

    pub fn get(&self, x: isize, y: isize) -> CellState {
        let (x, y) = self.normalize(x, y);
        self.cells[self.index(x, y)]
    }

    /// Diff-gated write: stores and notifies only if `value` differs from
    /// the current state. Returns whether the cell changed.
    pub fn set(&mut self, x: isize, y: isize, value: CellState, sink: &mut dyn RenderSink) -> bool {
        let (x, y) = self.normalize(x, y);
        let idx = self.index(x, y);
        if self.cells[idx] == value {
            return false;
        }
        self.cells[idx] = value;
        self.notify(x, y, value, sink);
        true
    }

    /// Unconditional write: always stores and always notifies.
    pub fn write(&mut self, x: isize, y: isize, value: CellState, sink: &mut dyn RenderSink) {
        let (x, y) = self.normalize(x, y);
        let idx = self.index(x, y);
        self.cells[idx] = value;
        self.notify(x, y, value, sink);
    }

    pub fn live_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_alive()).count()
    }

    /// Coordinates of every live cell, row by row.
    pub fn live_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_alive())
            .map(|(i, _)| (i % self.cols, i / self.cols))
    }

    fn index(&self, x: usize, y: usize) -> usize {
        y * self.cols + x
    }

    fn notify(&self, x: usize, y: usize, value: CellState, sink: &mut dyn RenderSink) {
        sink.cell_changed(self.pixel(x), self.pixel(y), value);
    }

    // x, y < cols, rows, whose extent was checked in `try_new`
    fn pixel(&self, cell: usize) -> u32 {
        pixel_extent(cell, self.cell_size).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Records every notification it receives.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingSink {
        pub events: Vec<RenderEvent>,
    }

    impl RenderSink for RecordingSink {
        fn cell_changed(&mut self, pixel_x: u32, pixel_y: u32, state: CellState) {
            self.events.push(RenderEvent::Cell { pixel_x, pixel_y, state });
        }

        fn clear(&mut self) {
            self.events.push(RenderEvent::Clear);
        }
    }

    #[test]
    fn new_grid_is_all_dead() {
        let grid = Grid::new(4, 3, 10);
        assert_eq!(grid.live_count(), 0);
        assert_eq!(grid.cols(), 4);
        assert_eq!(grid.rows(), 3);
    }

    #[test]
    fn degenerate_shapes_are_refused() {
        assert_eq!(
            Grid::try_new(0, 3, 10),
            Err(ConfigError::EmptyGrid { cols: 0, rows: 3 })
        );
        assert_eq!(Grid::try_new(3, 3, 0), Err(ConfigError::ZeroCellSize));
        assert!(matches!(
            Grid::try_new(100_000, 1, 50_000),
            Err(ConfigError::CanvasTooLarge { .. })
        ));
    }

    #[test]
    #[should_panic(expected = "invalid grid")]
    fn new_panics_on_empty_grid() {
        let _ = Grid::new(0, 4, 1);
    }

    #[test]
    fn far_corner_of_the_largest_canvas_notifies_exact_pixels() {
        // 65_535 * 65_537 == u32::MAX, so the last column starts at u32::MAX - 65_536
        let mut grid = Grid::try_new(65_535, 1, 65_537).expect("fits u32 pixel space");
        let mut sink = RecordingSink::default();

        assert!(grid.set(-1, 0, CellState::Alive, &mut sink));
        assert_eq!(
            sink.events,
            vec![RenderEvent::Cell {
                pixel_x: u32::MAX - 65_536,
                pixel_y: 0,
                state: CellState::Alive
            }]
        );
    }

    #[test]
    fn coordinates_wrap_in_both_directions() {
        let grid = Grid::new(5, 4, 1);
        assert_eq!(grid.normalize(-1, -1), (4, 3));
        assert_eq!(grid.normalize(5, 4), (0, 0));
        assert_eq!(grid.normalize(12, -9), (2, 3));
    }

    #[test]
    fn set_notifies_only_on_change() {
        let mut grid = Grid::new(3, 3, 15);
        let mut sink = RecordingSink::default();

        assert!(grid.set(1, 2, CellState::Alive, &mut sink));
        assert!(!grid.set(1, 2, CellState::Alive, &mut sink));
        assert!(!grid.set(0, 0, CellState::Dead, &mut sink));

        assert_eq!(
            sink.events,
            vec![RenderEvent::Cell { pixel_x: 15, pixel_y: 30, state: CellState::Alive }]
        );
        assert_eq!(grid.get(1, 2), CellState::Alive);
    }

    #[test]
    fn write_always_notifies() {
        let mut grid = Grid::new(3, 3, 2);
        let mut sink = RecordingSink::default();

        grid.write(0, 0, CellState::Dead, &mut sink);
        grid.write(0, 0, CellState::Dead, &mut sink);
        assert_eq!(sink.events.len(), 2);
    }

    #[test]
    fn set_through_wrapped_coordinate_notifies_normalized_pixels() {
        let mut grid = Grid::new(4, 4, 10);
        let mut sink = RecordingSink::default();

        grid.set(-1, 4, CellState::Alive, &mut sink);
        assert_eq!(grid.get(3, 0), CellState::Alive);
        assert_eq!(
            sink.events,
            vec![RenderEvent::Cell { pixel_x: 30, pixel_y: 0, state: CellState::Alive }]
        );
    }

    #[test]
    fn live_cells_reports_coordinates() {
        let mut grid = Grid::new(4, 4, 1);
        let mut sink = NullSink;
        grid.set(3, 0, CellState::Alive, &mut sink);
        grid.set(1, 2, CellState::Alive, &mut sink);
        assert_eq!(grid.live_cells().collect::<Vec<_>>(), vec![(3, 0), (1, 2)]);
    }

    #[test]
    fn channel_sink_forwards_events() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut sink = tx;
        sink.cell_changed(1, 2, CellState::Alive);
        sink.clear();
        assert_eq!(
            rx.try_recv().ok(),
            Some(RenderEvent::Cell { pixel_x: 1, pixel_y: 2, state: CellState::Alive })
        );
        assert_eq!(rx.try_recv().ok(), Some(RenderEvent::Clear));
    }
}
