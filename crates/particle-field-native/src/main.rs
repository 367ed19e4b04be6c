// Native-only binary - not compiled for WASM
#![cfg(not(target_arch = "wasm32"))]

mod app;
mod cli;

use clap::Parser;
use eframe::{egui, NativeOptions};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::app::ParticleFieldApp;
use crate::cli::Cli;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = match cli.field_config() {
        Ok(config) => config,
        Err(err) => {
            log::error!("{err}");
            std::process::exit(2);
        }
    };
    let rng = cli.seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
    let size = [cli.width.round().max(1.0) as usize, cli.height.round().max(1.0) as usize];

    let native_options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Particle Field")
            .with_inner_size([cli.width, cli.height]),
        ..Default::default()
    };
    eframe::run_native(
        "Particle Field",
        native_options,
        Box::new(move |_cc| Ok(Box::new(ParticleFieldApp::new(config, rng, size)))),
    )
}
