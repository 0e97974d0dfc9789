//! Game of Life on a torus, stepped at a fixed rate and synchronised to the
//! host's display refresh.
//!
//! The host supplies a [`RenderSink`] (per-cell redraw notifications), an
//! [`OutcomeSink`] (how a run ended), pointer events for painting, and calls
//! [`FrameSignal::frame`] once per rendered frame.

pub mod config;
pub mod grid;
pub mod neighbors;
pub mod paint;
pub mod patterns;
pub mod rules;
pub mod scheduler;
pub mod simulation;
pub mod stepper;

pub use config::{ConfigError, SimulationConfig};
pub use grid::{CellState, Grid, NullSink, RenderEvent, RenderSink};
pub use paint::{PRIMARY_BUTTON, PaintController, PointerEvent};
pub use patterns::{PATTERNS, Pattern};
pub use rules::RuleThresholds;
pub use scheduler::{FrameSignal, Phase, Scheduler, Tick};
pub use simulation::{OutcomeSink, RunState, Simulation};
pub use stepper::{CellChange, Generation, Outcome};
