use eframe::egui::{self, Color32, RichText, Ui};
use linear_regressor::{EngineState, Separator};

use crate::state::{AppState, PlotView, StatusMessage};

// ---------------------------------------------------------------------------
// Left side panel – columns, metrics, prediction
// ---------------------------------------------------------------------------

/// Render the left regression panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Regression");
    ui.separator();

    if state.engine.state() == EngineState::Empty {
        ui.label("No dataset loaded.");
        return;
    }

    // ---- Column pickers ----
    let columns = state.engine.column_names();
    if let Some(col) = column_picker(ui, "X column", "x_column", &columns, state.x_column.as_deref()) {
        state.set_x_column(col);
    }
    if let Some(col) = column_picker(ui, "Y column", "y_column", &columns, state.y_column.as_deref()) {
        state.set_y_column(col);
    }

    ui.add_space(4.0);
    if ui.button("Run regression").clicked() {
        state.run_regression();
    }
    ui.separator();

    // ---- Metrics ----
    let (correlation, r_squared) = state.metric_labels();
    ui.label(correlation);
    ui.label(r_squared);
    if let (Some(model), Some(metrics)) = (state.engine.model(), state.engine.metrics()) {
        ui.label(format!(
            "ŷ = {:.4} · x + {:.4}",
            model.slope, model.intercept
        ));
        ui.label(format!(
            "{} rows used, {} dropped, RMSE {}",
            metrics.n_samples, metrics.dropped_rows, metrics.rmse
        ));
    }
    if let Some(label) = state.largest_residual_label() {
        ui.label(label);
    }
    ui.separator();

    // ---- Chart selector ----
    ui.strong("Show");
    ui.horizontal(|ui: &mut Ui| {
        ui.radio_value(&mut state.view, PlotView::Regression, "Regression");
        ui.radio_value(&mut state.view, PlotView::Residuals, "Residuals");
    });
    ui.separator();

    // ---- Prediction ----
    let has_model = state.engine.has_model();
    ui.strong("Prediction");
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Value of X:");
        let edit = ui.add_enabled(
            has_model,
            egui::TextEdit::singleline(&mut state.predict_input).desired_width(80.0),
        );
        let submitted = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if ui.add_enabled(has_model, egui::Button::new("Predict")).clicked() || submitted {
            state.predict();
        }
    });
    if let Some((x, y)) = state.last_prediction {
        ui.label(RichText::new(format!("For X = {x}, predicted Y = {y:.2}")).strong());
    }
    ui.separator();

    if ui
        .add_enabled(has_model, egui::Button::new("Copy summary (JSON)"))
        .clicked()
    {
        match state.summary_json() {
            Ok(json) => {
                ui.ctx().copy_text(json);
                state.status_message = Some(StatusMessage::Info("Summary copied".into()));
            }
            Err(e) => {
                log::error!("Failed to build summary: {e:#}");
                state.status_message = Some(StatusMessage::Error(format!("{e:#}")));
            }
        }
    }
}

/// Combo box over the dataset columns; returns the newly picked column.
fn column_picker(
    ui: &mut Ui,
    label: &str,
    id: &str,
    columns: &[String],
    current: Option<&str>,
) -> Option<String> {
    let mut picked = None;
    ui.horizontal(|ui: &mut Ui| {
        ui.label(label);
        egui::ComboBox::from_id_salt(id)
            .selected_text(current.unwrap_or_default())
            .show_ui(ui, |ui: &mut Ui| {
                for col in columns {
                    let is_current = current == Some(col.as_str());
                    if ui.selectable_label(is_current, col).clicked() && !is_current {
                        picked = Some(col.clone());
                    }
                }
            });
    });
    picked
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Quit").clicked() {
                ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });
        if ui.button("Help").clicked() {
            state.show_help = true;
        }

        ui.separator();

        ui.label("Separator:");
        egui::ComboBox::from_id_salt("separator")
            .selected_text(state.separator.label())
            .show_ui(ui, |ui: &mut Ui| {
                for sep in Separator::ALL {
                    ui.selectable_value(&mut state.separator, sep, sep.label());
                }
            });

        ui.separator();

        if let (Some(name), Some(ds)) = (&state.source_name, state.engine.dataset()) {
            ui.label(format!(
                "{name}: {} rows, {} columns",
                ds.len(),
                ds.columns().len()
            ));
            ui.separator();
        }

        match &state.status_message {
            Some(StatusMessage::Info(msg)) => {
                ui.label(RichText::new(msg).color(Color32::DARK_GREEN));
            }
            Some(StatusMessage::Error(msg)) => {
                ui.label(RichText::new(msg).color(Color32::RED));
            }
            None => {}
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open data file")
        .add_filter("Supported files", &["csv", "txt", "tsv", "dat", "json", "parquet", "pq"])
        .add_filter("Delimited text", &["csv", "txt", "tsv", "dat"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}

// ---------------------------------------------------------------------------
// Help window
// ---------------------------------------------------------------------------

pub fn help_window(ctx: &egui::Context, state: &mut AppState) {
    egui::Window::new("Help – Simple Linear Regression")
        .open(&mut state.show_help)
        .resizable(false)
        .collapsible(false)
        .show(ctx, |ui: &mut Ui| {
            ui.heading("How to use");
            ui.label("1. Pick the field separator, then File → Open… to load a data file.");
            ui.label("2. Choose the X (predictor) and Y (response) columns. The fit and its metrics update on every change.");
            ui.label("3. Switch between the regression chart and the residuals chart.");
            ui.label("4. Type a value of X and press Predict to extrapolate along the fitted line.");
            ui.add_space(6.0);
            ui.label("Rows with a missing value in either selected column are left out of the fit.");
        });
}
