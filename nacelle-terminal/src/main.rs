//! Nacelle - articulated ship demo in the terminal
//!
//! Controls:
//!   - W/S, A/D, R/F: Move the camera
//!   - Arrow keys: Look around
//!   - J/L: Turn the ship
//!   - Space: Power the engines up or down
//!   - Q/ESC: Quit
use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use nacelle_core::{Ship, ShipAssets};
use nacelle_terminal::cli::Cli;
use nacelle_terminal::{AppConfig, TerminalApp};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let assets = ShipAssets::from_dir(&cli.assets);
    let ship = Ship::load(&assets, cli.status.into())
        .with_context(|| format!("failed to load ship assets from {}", cli.assets.display()))?;
    info!("assets loaded from {}", cli.assets.display());

    let config = AppConfig {
        fps: cli.fps,
        camera_distance: cli.distance,
        projection: cli.projection(),
    };
    let mut app = TerminalApp::new(ship, config).context("failed to query terminal size")?;
    app.run().context("terminal renderer failed")?;

    Ok(())
}
