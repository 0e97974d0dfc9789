// simulation.rs - Owns the grid, painting and the step loop behind one lock

use std::ops::ControlFlow;
use std::sync::{Arc, Mutex};

use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

use crate::config::{ConfigError, SimulationConfig};
use crate::grid::{CellState, Grid, RenderSink};
use crate::paint::{PaintController, PointerEvent};
use crate::patterns::Pattern;
use crate::scheduler::{FrameSignal, Phase, Scheduler, Tick, lock};
use crate::stepper::{self, Outcome};

/// Lifecycle of a simulation. Painting is only accepted while not running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Painting,
    Running,
    Stopped(Outcome),
}

impl RunState {
    pub fn accepts_paint(self) -> bool {
        matches!(self, RunState::Idle | RunState::Painting)
    }

    /// Whether a host should offer Start. A settled run needs a reset first.
    pub fn can_start(self) -> bool {
        matches!(self, RunState::Idle | RunState::Painting)
    }
}

/// Receives the terminal outcome of each completed run, exactly once.
pub trait OutcomeSink: Send {
    fn report(&mut self, outcome: Outcome);
}

impl OutcomeSink for UnboundedSender<Outcome> {
    fn report(&mut self, outcome: Outcome) {
        let _ = self.send(outcome);
    }
}

struct Engine {
    config: SimulationConfig,
    grid: Grid,
    paint: PaintController,
    state: RunState,
    phase: Phase,
    epoch: u64,
    generation: u64,
    last_outcome: Option<Outcome>,
    render: Box<dyn RenderSink>,
    outcomes: Box<dyn OutcomeSink>,
}

impl Engine {
    fn fresh_grid(config: &SimulationConfig) -> Grid {
        Grid::new(config.cols, config.rows, config.cell_size)
    }

    fn finish(&mut self, outcome: Outcome) {
        info!(%outcome, generation = self.generation, live = self.grid.live_count(), "simulation settled");
        self.state = RunState::Stopped(outcome);
        self.phase = Phase::Idle;
        self.last_outcome = Some(outcome);
        self.outcomes.report(outcome);

        if outcome == Outcome::Extinct && self.config.reset_on_extinction {
            self.reset();
        }
    }

    fn reset(&mut self) {
        self.epoch += 1;
        self.phase = Phase::Idle;
        self.render.clear();
        self.grid = Self::fresh_grid(&self.config);
        self.paint = PaintController::default();
        self.generation = 0;
        self.state = RunState::Idle;
    }
}

impl Tick for Engine {
    fn epoch(&self) -> u64 {
        self.epoch
    }

    fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    fn tick(&mut self) -> ControlFlow<()> {
        let generation = stepper::step(&mut self.grid, &self.config.thresholds, self.render.as_mut());
        match generation.outcome() {
            None => {
                self.generation += 1;
                debug!(
                    generation = self.generation,
                    changes = generation.changes.len(),
                    "advanced generation"
                );
                ControlFlow::Continue(())
            }
            Some(outcome) => {
                self.finish(outcome);
                ControlFlow::Break(())
            }
        }
    }
}

/// A toroidal Life simulation wired to its render and outcome collaborators.
///
/// Grid writes happen either through painting (while idle) or through the
/// step loop (while running), never both: every entry point checks the
/// [`RunState`] under the same lock the loop takes.
pub struct Simulation {
    engine: Arc<Mutex<Engine>>,
    scheduler: Scheduler,
}

impl Simulation {
    /// Build a simulation whose step loop runs on `runtime`.
    pub fn new(
        config: SimulationConfig,
        render: impl RenderSink + 'static,
        outcomes: impl OutcomeSink + 'static,
        runtime: Handle,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let scheduler = Scheduler::new(runtime, config.step_interval());
        let engine = Engine {
            grid: Engine::fresh_grid(&config),
            config,
            paint: PaintController::default(),
            state: RunState::Idle,
            phase: Phase::Idle,
            epoch: 0,
            generation: 0,
            last_outcome: None,
            render: Box::new(render),
            outcomes: Box::new(outcomes),
        };
        Ok(Self {
            engine: Arc::new(Mutex::new(engine)),
            scheduler,
        })
    }

    /// Signal the host raises on every rendered frame.
    pub fn frame_signal(&self) -> FrameSignal {
        self.scheduler.frames().clone()
    }

    /// Begin stepping. Returns `false` if a run is already in progress.
    pub fn start(&mut self) -> bool {
        let epoch = {
            let mut engine = lock(&self.engine);
            if engine.state == RunState::Running {
                return false;
            }
            engine.state = RunState::Running;
            engine.epoch += 1;
            info!(
                live = engine.grid.live_count(),
                interval_ms = self.scheduler.interval().as_millis() as u64,
                "simulation started"
            );
            engine.epoch
        };
        self.scheduler.launch(Arc::clone(&self.engine), epoch);
        true
    }

    /// Cancel any pending step, wipe the grid and return to `Idle`.
    pub fn reset(&mut self) {
        self.scheduler.cancel();
        lock(&self.engine).reset();
        info!("simulation reset");
    }

    pub fn pointer_down(&self, event: PointerEvent) -> bool {
        let mut guard = lock(&self.engine);
        let engine = &mut *guard;
        if !engine.state.accepts_paint() {
            return false;
        }
        let painted = engine
            .paint
            .pointer_down(&mut engine.grid, event, engine.render.as_mut());
        if painted {
            engine.state = RunState::Painting;
        }
        painted
    }

    pub fn pointer_move(&self, event: PointerEvent) -> bool {
        let mut guard = lock(&self.engine);
        let engine = &mut *guard;
        if !engine.state.accepts_paint() {
            return false;
        }
        if !event.primary_held() {
            engine.state = RunState::Idle;
            return false;
        }
        let painted = engine
            .paint
            .paint(&mut engine.grid, event, engine.render.as_mut());
        if painted {
            engine.state = RunState::Painting;
        }
        painted
    }

    pub fn pointer_up(&self) {
        let mut engine = lock(&self.engine);
        if engine.state == RunState::Painting {
            engine.state = RunState::Idle;
        }
    }

    /// Replace the idle grid's contents with `pattern`, centred.
    pub fn load_pattern(&self, pattern: &Pattern) -> bool {
        let mut guard = lock(&self.engine);
        let engine = &mut *guard;
        if engine.state != RunState::Idle {
            return false;
        }
        let live: Vec<_> = engine.grid.live_cells().collect();
        for (x, y) in live {
            engine
                .grid
                .set(x as isize, y as isize, CellState::Dead, engine.render.as_mut());
        }

        let origin_x = (engine.grid.cols() as isize - pattern.width() as isize) / 2;
        let origin_y = (engine.grid.rows() as isize - pattern.height() as isize) / 2;
        for (dx, dy) in pattern.cells() {
            engine.grid.set(
                origin_x + dx as isize,
                origin_y + dy as isize,
                CellState::Alive,
                engine.render.as_mut(),
            );
        }
        debug!(pattern = pattern.name, "loaded pattern");
        true
    }

    pub fn config(&self) -> SimulationConfig {
        lock(&self.engine).config.clone()
    }

    pub fn run_state(&self) -> RunState {
        lock(&self.engine).state
    }

    pub fn phase(&self) -> Phase {
        lock(&self.engine).phase
    }

    /// Generations advanced since the last reset.
    pub fn generation(&self) -> u64 {
        lock(&self.engine).generation
    }

    pub fn last_outcome(&self) -> Option<Outcome> {
        lock(&self.engine).last_outcome
    }

    pub fn live_count(&self) -> usize {
        lock(&self.engine).grid.live_count()
    }

    /// Copy of the current grid.
    pub fn grid(&self) -> Grid {
        lock(&self.engine).grid.clone()
    }
}
