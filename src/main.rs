mod app;
mod color;
mod state;
mod ui;

use std::path::PathBuf;

use app::LinearRegressorApp;
use eframe::egui;
use linear_regressor::Separator;

fn main() -> eframe::Result {
    env_logger::init();

    // Optional data file to open at startup, then an optional separator for it.
    let mut args = std::env::args_os().skip(1);
    let initial_file = args.next().map(PathBuf::from);
    let separator = match args.next() {
        Some(arg) => arg.to_string_lossy().parse().unwrap_or_else(|e| {
            log::warn!("Ignoring separator argument: {e:#}");
            Separator::default()
        }),
        None => Separator::default(),
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 720.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Linear Regressor – Simple Linear Regression",
        options,
        Box::new(move |_cc| Ok(Box::new(LinearRegressorApp::new(initial_file, separator)))),
    )
}
