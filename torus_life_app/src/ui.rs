// ui.rs - egui front end: canvas, pointer wiring, start/reset controls

use std::collections::HashSet;

use anyhow::Result;
use eframe::egui;
use egui::{Color32, Pos2, Rect, Stroke, Vec2};
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};
use torus_life::{
    FrameSignal, Outcome, PATTERNS, PRIMARY_BUTTON, PointerEvent, RenderEvent, RunState,
    Simulation, SimulationConfig,
};
use tracing::debug;

pub struct LifeApp {
    sim: Simulation,
    frames: FrameSignal,
    render_events: UnboundedReceiver<RenderEvent>,
    outcomes: UnboundedReceiver<Outcome>,
    // dropped after `sim` so its loop is aborted before the runtime goes away
    _runtime: tokio::runtime::Runtime,

    /// Top-left pixel of every cell currently drawn alive.
    lit: HashSet<(u32, u32)>,
    cols: usize,
    rows: usize,
    cell_size: f32,
    selected_pattern: usize,
    announcement: Option<Outcome>,
    live_color: Color32,
    dead_color: Color32,
}

impl LifeApp {
    pub fn new(config: SimulationConfig, runtime: tokio::runtime::Runtime) -> Result<Self> {
        let (render_tx, render_events) = unbounded_channel();
        let (outcome_tx, outcomes) = unbounded_channel();
        let sim = Simulation::new(config.clone(), render_tx, outcome_tx, runtime.handle().clone())?;

        Ok(Self {
            frames: sim.frame_signal(),
            sim,
            render_events,
            outcomes,
            _runtime: runtime,
            lit: HashSet::new(),
            cols: config.cols,
            rows: config.rows,
            cell_size: config.cell_size as f32,
            selected_pattern: 0,
            announcement: None,
            live_color: Color32::from_rgb(0, 200, 0),
            dead_color: Color32::from_rgb(40, 40, 40),
        })
    }

    /// Fold pending redraw notifications into the pixel cache.
    fn drain_events(&mut self) -> bool {
        let mut any = false;
        while let Ok(event) = self.render_events.try_recv() {
            any = true;
            match event {
                RenderEvent::Cell { pixel_x, pixel_y, state } => {
                    if state.is_alive() {
                        self.lit.insert((pixel_x, pixel_y));
                    } else {
                        self.lit.remove(&(pixel_x, pixel_y));
                    }
                }
                RenderEvent::Clear => self.lit.clear(),
            }
        }
        while let Ok(outcome) = self.outcomes.try_recv() {
            debug!(%outcome, "run finished");
            self.announcement = Some(outcome);
        }
        any
    }

    fn draw_grid(&mut self, ui: &mut egui::Ui) {
        let size = Vec2::new(self.cols as f32 * self.cell_size, self.rows as f32 * self.cell_size);
        let (response, painter) = ui.allocate_painter(size, egui::Sense::click_and_drag());
        let origin = response.rect.min;

        painter.rect_filled(response.rect, 0.0, self.dead_color);

        for &(px, py) in &self.lit {
            let rect = Rect::from_min_size(
                origin + Vec2::new(px as f32, py as f32),
                Vec2::splat(self.cell_size),
            );
            painter.rect_filled(rect, 0.0, self.live_color);
        }

        // Grid lines
        let line = Stroke::new(0.5, Color32::from_gray(70));
        for col in 0..=self.cols {
            let x = origin.x + col as f32 * self.cell_size;
            painter.line_segment([Pos2::new(x, origin.y), Pos2::new(x, origin.y + size.y)], line);
        }
        for row in 0..=self.rows {
            let y = origin.y + row as f32 * self.cell_size;
            painter.line_segment([Pos2::new(origin.x, y), Pos2::new(origin.x + size.x, y)], line);
        }

        // Pointer -> painting; the simulation ignores it while running
        let (pressed, down, released, pos) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_down(),
                i.pointer.primary_released(),
                i.pointer.interact_pos(),
            )
        });
        if let Some(pos) = pos {
            let offset = pos - origin;
            let buttons = if down { PRIMARY_BUTTON } else { 0 };
            let event = PointerEvent::new(offset.x, offset.y, buttons);
            let over = response.hovered();
            if pressed && over {
                self.sim.pointer_down(event);
            } else if down && over {
                self.sim.pointer_move(event);
            }
        }
        if released {
            self.sim.pointer_up();
        }
    }
}

impl eframe::App for LifeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // This repaint is the refresh the step loop waits on
        self.frames.frame();
        let redrawn = self.drain_events();
        let state = self.sim.run_state();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Toroidal Game of Life");

            // Controls
            ui.horizontal(|ui| {
                if ui.add_enabled(state.can_start(), egui::Button::new("▶ Start")).clicked() {
                    self.sim.start();
                }

                if ui.button("⏹ Reset").clicked() {
                    self.sim.reset();
                    self.announcement = None;
                }

                ui.separator();

                ui.label("Pattern:");
                egui::ComboBox::from_id_source("pattern_selector")
                    .selected_text(PATTERNS[self.selected_pattern].name)
                    .show_ui(ui, |ui| {
                        for (i, pattern) in PATTERNS.iter().enumerate() {
                            ui.selectable_value(&mut self.selected_pattern, i, pattern.name);
                        }
                    });

                let idle = state == RunState::Idle;
                if ui.add_enabled(idle, egui::Button::new("Apply Pattern")).clicked() {
                    self.sim.load_pattern(&PATTERNS[self.selected_pattern]);
                }

                ui.separator();

                ui.label(format!("Generation: {}", self.sim.generation()));
            });

            ui.separator();

            ui.horizontal(|ui| {
                ui.label("Live:");
                ui.color_edit_button_srgba(&mut self.live_color);
                ui.label("Dead:");
                ui.color_edit_button_srgba(&mut self.dead_color);
                ui.separator();
                ui.label(match state {
                    RunState::Idle => "Click or drag to paint cells, then press Start.".to_owned(),
                    RunState::Painting => "Painting...".to_owned(),
                    RunState::Running => "Running. Reset to edit the grid again.".to_owned(),
                    RunState::Stopped(outcome) => format!("Stopped: {outcome}"),
                });
            });

            ui.separator();

            self.draw_grid(ui);

            ui.separator();

            let total = self.cols * self.rows;
            let live = self.lit.len();
            ui.horizontal(|ui| {
                ui.label(format!("Live cells: {live}"));
                ui.label(format!("Dead cells: {}", total - live.min(total)));
                ui.label(format!("Population: {:.1}%", live as f32 / total as f32 * 100.0));
            });
        });

        if let Some(outcome) = self.announcement {
            let mut dismissed = false;
            egui::Window::new("Simulation finished")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, Vec2::ZERO)
                .show(ctx, |ui| {
                    ui.label(match outcome {
                        Outcome::Extinct => "Extinct: no living cell is left.",
                        Outcome::Harmony => "Harmony: the colony has stopped changing.",
                    });
                    dismissed = ui.button("OK").clicked();
                });
            if dismissed {
                self.announcement = None;
            }
        }

        // Keep frames coming while a loop may be waiting on one
        if state == RunState::Running || redrawn {
            ctx.request_repaint();
        }
    }
}
