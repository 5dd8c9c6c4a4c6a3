use std::path::PathBuf;

use eframe::egui;
use linear_regressor::Separator;

use crate::color::SeriesColors;
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct LinearRegressorApp {
    pub state: AppState,
    pub colors: SeriesColors,
}

impl LinearRegressorApp {
    /// Create the app, loading `initial_file` with `separator` when one was
    /// given on the command line.
    pub fn new(initial_file: Option<PathBuf>, separator: Separator) -> Self {
        let mut app = Self::default();
        app.state.separator = separator;
        if let Some(path) = initial_file {
            app.state.load_path(&path);
        }
        app
    }
}

impl eframe::App for LinearRegressorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: columns, metrics, prediction ----
        egui::SidePanel::left("regression_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::central_plot(ui, &self.state, &self.colors);
        });

        panels::help_window(ctx, &mut self.state);
    }
}
