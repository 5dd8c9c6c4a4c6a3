use eframe::egui::Ui;
use egui_plot::{HLine, Legend, Line, MarkerShape, Plot, PlotPoints, Points};
use linear_regressor::{EngineState, RegressionEngine};

use crate::color::SeriesColors;
use crate::state::{AppState, PlotView};

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the selected chart, or a hint when there is nothing to draw yet.
pub fn central_plot(ui: &mut Ui, state: &AppState, colors: &SeriesColors) {
    let hint = match state.engine.state() {
        EngineState::Empty => Some("Open a file to start  (File → Open…)"),
        EngineState::Loaded | EngineState::ColumnsSelected => {
            Some("Pick numeric X and Y columns to fit a line")
        }
        EngineState::Fitted => None,
    };
    if let Some(hint) = hint {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading(hint);
        });
        return;
    }

    let (x_label, y_label) = state
        .engine
        .selection()
        .map(|s| (s.x.clone(), s.y.clone()))
        .unwrap_or_default();

    match state.view {
        PlotView::Regression => regression_plot(ui, state, colors, &x_label, &y_label),
        PlotView::Residuals => residual_plot(ui, &state.engine, colors, &x_label),
    }
}

// ---------------------------------------------------------------------------
// Scatter + fitted line
// ---------------------------------------------------------------------------

fn regression_plot(
    ui: &mut Ui,
    state: &AppState,
    colors: &SeriesColors,
    x_label: &str,
    y_label: &str,
) {
    let engine = &state.engine;
    let (Ok(samples), Ok(endpoints)) = (engine.sample_points(), engine.fitted_line_endpoints())
    else {
        return;
    };

    let sample_points: PlotPoints = samples.collect();
    let line_points: PlotPoints = endpoints.into_iter().collect();

    Plot::new("regression_plot")
        .legend(Legend::default())
        .x_axis_label(x_label)
        .y_axis_label(y_label)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.points(
                Points::new(sample_points)
                    .name("Samples")
                    .color(colors.samples)
                    .radius(3.0),
            );
            plot_ui.line(
                Line::new(line_points)
                    .name("Fitted line")
                    .color(colors.fitted_line)
                    .width(2.0),
            );
            if let Some((x, y)) = state.last_prediction {
                plot_ui.points(
                    Points::new(vec![[x, y]])
                        .name("Prediction")
                        .shape(MarkerShape::Diamond)
                        .color(colors.prediction)
                        .radius(6.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Residuals
// ---------------------------------------------------------------------------

fn residual_plot(ui: &mut Ui, engine: &RegressionEngine, colors: &SeriesColors, x_label: &str) {
    let Ok(residuals) = engine.residuals() else {
        return;
    };
    let (above, below): (Vec<[f64; 2]>, Vec<[f64; 2]>) = residuals.partition(|p| p[1] >= 0.0);

    Plot::new("residual_plot")
        .legend(Legend::default())
        .x_axis_label(x_label)
        .y_axis_label("Residual (y − ŷ)")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.hline(HLine::new(0.0).color(colors.fitted_line).width(1.5));
            plot_ui.points(
                Points::new(above)
                    .name("Above the line")
                    .color(colors.residual(1.0))
                    .radius(3.0),
            );
            plot_ui.points(
                Points::new(below)
                    .name("Below the line")
                    .color(colors.residual(-1.0))
                    .radius(3.0),
            );
        });
}
