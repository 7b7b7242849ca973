#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod audio_engine;
mod audio_io;
mod config;
mod controls;
mod fx_components;
mod mapping;
mod playback;
mod settings;

use crate::app::MurmurApp;

fn main() -> anyhow::Result<()> {
    // Log to stderr; override with `RUST_LOG=debug`.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([380.0, 260.0])
            .with_resizable(false),
        ..Default::default()
    };

    let run_result = eframe::run_native(
        "Murmur",
        native_options,
        Box::new(|cc| Ok(Box::new(MurmurApp::new(cc)))),
    );

    if let Err(e) = run_result {
        return Err(anyhow::anyhow!("Eframe run error: {}", e));
    }

    Ok(())
}
