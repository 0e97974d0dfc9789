// stepper.rs - One synchronous generation: scan, diff, apply

use std::fmt;

use crate::grid::{CellState, Grid, RenderSink};
use crate::neighbors;
use crate::rules::RuleThresholds;

/// A cell whose next state differs from its current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellChange {
    pub x: usize,
    pub y: usize,
    pub state: CellState,
}

/// How a run ended once a generation produced no changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// No live cell is left.
    Extinct,
    /// Live cells remain in a fixed configuration.
    Harmony,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Extinct => f.write_str("Extinct"),
            Outcome::Harmony => f.write_str("Harmony"),
        }
    }
}

/// Diff between the current grid and the next generation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Generation {
    pub changes: Vec<CellChange>,
    pub has_life: bool,
}

impl Generation {
    pub fn is_fixed_point(&self) -> bool {
        self.changes.is_empty()
    }

    /// Terminal outcome, if this generation is a fixed point.
    pub fn outcome(&self) -> Option<Outcome> {
        if !self.is_fixed_point() {
            None
        } else if self.has_life {
            Some(Outcome::Harmony)
        } else {
            Some(Outcome::Extinct)
        }
    }
}

/// Scan every cell against the unmodified grid and collect the diff.
pub fn compute(grid: &Grid, rules: &RuleThresholds) -> Generation {
    let limit = rules.early_exit_limit();
    let mut generation = Generation::default();

    for y in 0..grid.rows() {
        for x in 0..grid.cols() {
            let current = grid.get(x as isize, y as isize);
            let next = rules.next_state(current, neighbors::count(grid, x, y, limit));

            if next.is_alive() {
                generation.has_life = true;
            }
            if next != current {
                generation.changes.push(CellChange { x, y, state: next });
            }
        }
    }
    generation
}

/// Write a computed diff back, one notification per changed cell.
pub fn apply(grid: &mut Grid, generation: &Generation, sink: &mut dyn RenderSink) {
    for change in &generation.changes {
        grid.set(change.x as isize, change.y as isize, change.state, sink);
    }
}

/// Advance `grid` by one generation and return the applied diff.
pub fn step(grid: &mut Grid, rules: &RuleThresholds, sink: &mut dyn RenderSink) -> Generation {
    let generation = compute(grid, rules);
    apply(grid, &generation, sink);
    generation
}
