// main.rs - Desktop host for the toroidal Game of Life

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;
use torus_life::SimulationConfig;
use tracing::info;

mod ui;

use ui::LifeApp;

#[derive(Parser, Debug)]
#[command(name = "torus-life", version, about = "Game of Life on a torus")]
struct Cli {
    /// TOML file with simulation settings; missing keys use defaults.
    #[arg(short, long, env = "TORUS_LIFE_CONFIG")]
    config: Option<PathBuf>,
    /// Grid width in cells.
    #[arg(long)]
    cols: Option<usize>,
    /// Grid height in cells.
    #[arg(long)]
    rows: Option<usize>,
    /// Cell edge length in pixels.
    #[arg(long)]
    cell_size: Option<u32>,
    /// Generations per second.
    #[arg(long)]
    fps: Option<u32>,
}

impl Cli {
    fn load_config(&self) -> Result<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                toml::from_str(&text)
                    .with_context(|| format!("failed to parse {}", path.display()))?
            }
            None => SimulationConfig::default(),
        };
        if let Some(cols) = self.cols {
            config.cols = cols;
        }
        if let Some(rows) = self.rows {
            config.rows = rows;
        }
        if let Some(cell_size) = self.cell_size {
            config.cell_size = cell_size;
        }
        if let Some(fps) = self.fps {
            config.fps = fps;
        }
        config.validate().context("invalid simulation settings")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = cli.load_config()?;

    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    let app = LifeApp::new(config.clone(), runtime)?;
    info!(cols = config.cols, rows = config.rows, fps = config.fps, "opening window");

    let (width, height) = config.pixel_size();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([width as f32 + 40.0, height as f32 + 160.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Toroidal Game of Life",
        options,
        Box::new(|_cc| Box::new(app)),
    )
    .map_err(|err| anyhow::anyhow!("window closed with an error: {err}"))
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
