// neighbors.rs - Wraparound 8-neighbour live count

use crate::grid::Grid;

/// Relative neighbour positions: diagonals first, then orthogonals.
pub const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1), (1, -1), (-1, 1), (1, 1),
    (0, -1), (-1, 0), (1, 0), (0, 1),
];

/// Single-step wrap, valid for offsets in -1..=1 only.
fn wrap(value: isize, dimension: usize) -> isize {
    if value < 0 {
        dimension as isize - 1
    } else if value >= dimension as isize {
        0
    } else {
        value
    }
}

/// Number of live neighbours of `(cx, cy)` in `0..=8`.
///
/// With `limit` set, counting stops as soon as the sum exceeds it, so the
/// result is then only meaningful as "more than `limit`".
pub fn count(grid: &Grid, cx: usize, cy: usize, limit: Option<u8>) -> u8 {
    let mut live = 0u8;
    for (dx, dy) in NEIGHBOR_OFFSETS {
        let x = wrap(cx as isize + dx, grid.cols());
        let y = wrap(cy as isize + dy, grid.rows());
        if grid.get(x, y).is_alive() {
            live += 1;
            if limit.is_some_and(|limit| live > limit) {
                break;
            }
        }
    }
    live
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{CellState, NullSink};

    fn grid_with(cols: usize, rows: usize, live: &[(isize, isize)]) -> Grid {
        let mut grid = Grid::new(cols, rows, 1);
        for &(x, y) in live {
            grid.set(x, y, CellState::Alive, &mut NullSink);
        }
        grid
    }

    #[test]
    fn corner_wraps_to_opposite_corner() {
        let grid = grid_with(3, 3, &[(0, 0)]);
        assert_eq!(count(&grid, 2, 2, None), 1);
        assert_eq!(count(&grid, 0, 0, None), 0);
    }

    #[test]
    fn edges_see_cells_on_the_far_side() {
        let grid = grid_with(6, 5, &[(5, 0), (0, 4), (5, 4)]);
        // (0, 0) touches all three through the wrap
        assert_eq!(count(&grid, 0, 0, None), 3);
        // (5, 2) sees nothing: the live cells are two rows away
        assert_eq!(count(&grid, 5, 2, None), 0);
    }

    #[test]
    fn every_neighbour_is_counted_once() {
        let mut live = Vec::new();
        for (dx, dy) in NEIGHBOR_OFFSETS {
            live.push((2 + dx, 2 + dy));
        }
        let grid = grid_with(5, 5, &live);
        assert_eq!(count(&grid, 2, 2, None), 8);
    }

    #[test]
    fn early_exit_stops_past_the_limit() {
        let mut live = Vec::new();
        for (dx, dy) in NEIGHBOR_OFFSETS {
            live.push((2 + dx, 2 + dy));
        }
        let grid = grid_with(5, 5, &live);
        assert_eq!(count(&grid, 2, 2, Some(3)), 4);
    }

    #[test]
    fn early_exit_below_limit_is_exact() {
        let grid = grid_with(5, 5, &[(1, 1), (3, 3)]);
        assert_eq!(count(&grid, 2, 2, Some(3)), 2);
    }
}
