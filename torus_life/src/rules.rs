// rules.rs - Birth/survival thresholds and the per-cell transition rule

use serde::{Deserialize, Serialize};

use crate::grid::CellState;

/// Thresholds of a classic Life-like rule.
///
/// A live cell dies when its neighbour count is above `overpopulation` or
/// below `underpopulation`; a dead cell comes alive on exactly `newborn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleThresholds {
    pub overpopulation: u8,
    pub underpopulation: u8,
    pub newborn: u8,
}

impl Default for RuleThresholds {
    fn default() -> Self {
        Self::CONWAY
    }
}

impl RuleThresholds {
    /// B3/S23
    pub const CONWAY: Self = Self {
        overpopulation: 3,
        underpopulation: 2,
        newborn: 3,
    };

    pub fn next_state(&self, current: CellState, neighbors: u8) -> CellState {
        match current {
            CellState::Alive
                if neighbors > self.overpopulation || neighbors < self.underpopulation =>
            {
                CellState::Dead
            }
            CellState::Dead if neighbors == self.newborn => CellState::Alive,
            unchanged => unchanged,
        }
    }

    /// Count at which neighbour counting may stop.
    ///
    /// Past `overpopulation` a live cell is dead regardless of the exact
    /// number, and a dead cell can only be born at `newborn`; stopping is
    /// only sound while `newborn <= overpopulation`.
    pub fn early_exit_limit(&self) -> Option<u8> {
        (self.newborn <= self.overpopulation).then_some(self.overpopulation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conway_rule_table() {
        let rules = RuleThresholds::default();
        for count in 0..=8u8 {
            let survives = matches!(count, 2 | 3);
            assert_eq!(
                rules.next_state(CellState::Alive, count),
                CellState::from(survives),
                "alive cell with {count} neighbours"
            );
            assert_eq!(
                rules.next_state(CellState::Dead, count),
                CellState::from(count == 3),
                "dead cell with {count} neighbours"
            );
        }
    }

    #[test]
    fn custom_thresholds_are_respected() {
        // B2/S34
        let rules = RuleThresholds {
            overpopulation: 4,
            underpopulation: 3,
            newborn: 2,
        };
        assert_eq!(rules.next_state(CellState::Alive, 2), CellState::Dead);
        assert_eq!(rules.next_state(CellState::Alive, 4), CellState::Alive);
        assert_eq!(rules.next_state(CellState::Alive, 5), CellState::Dead);
        assert_eq!(rules.next_state(CellState::Dead, 2), CellState::Alive);
        assert_eq!(rules.next_state(CellState::Dead, 3), CellState::Dead);
    }

    #[test]
    fn early_exit_disabled_when_newborn_exceeds_overpopulation() {
        assert_eq!(RuleThresholds::CONWAY.early_exit_limit(), Some(3));

        let rules = RuleThresholds {
            overpopulation: 3,
            underpopulation: 2,
            newborn: 6,
        };
        assert_eq!(rules.early_exit_limit(), None);
    }
}
