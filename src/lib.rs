#![allow(clippy::collapsible_if)]
#![allow(clippy::collapsible_else_if)]

// Core modules
pub mod app;
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod models;
pub mod ui;
pub mod utils;

pub use app::{App, build_io_runtime, build_live_engine};
pub use data::Endpoints;
pub use engine::LiveEngine;

// CLI argument parsing
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Backend base URL; the stream endpoint is derived from it (http -> ws, https -> wss)
    #[arg(long, env = "SIGNAL_DESK_SERVER", default_value = config::DEFAULT_SERVER_URL)]
    pub server: String,
}

/// Main application entry point - creates the GUI app
pub fn run_app(cc: &eframe::CreationContext<'_>, args: Cli) -> anyhow::Result<App> {
    App::new(cc, args)
}
