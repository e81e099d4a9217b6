//! Command-line configuration
use clap::{Parser, ValueEnum};
use nacelle_core::{ProjectionMode, Status};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "nacelle")]
#[command(about = "Articulated ship demo rendered in the terminal", long_about = None)]
pub struct Cli {
    /// Directory holding mainBody.obj, nacelle_body.obj and nacelle_front.obj
    #[arg(long, default_value = "assets")]
    pub assets: PathBuf,

    /// Target frame rate
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..=240))]
    pub fps: u32,

    /// Engine status at startup
    #[arg(long, value_enum, default_value_t = StartStatus::Off)]
    pub status: StartStatus,

    /// Initial distance between camera and ship
    #[arg(long, default_value_t = 8.0)]
    pub distance: f32,

    /// Use an orthographic projection instead of perspective
    #[arg(long)]
    pub ortho: bool,
}

impl Cli {
    pub fn projection(&self) -> ProjectionMode {
        if self.ortho {
            ProjectionMode::Orthographic
        } else {
            ProjectionMode::Perspective
        }
    }
}

/// Steady states the ship may start in
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartStatus {
    Off,
    On,
}

impl From<StartStatus> for Status {
    fn from(start: StartStatus) -> Self {
        match start {
            StartStatus::Off => Status::Off,
            StartStatus::On => Status::On,
        }
    }
}
