use chrono::DateTime;
use eframe::egui::Ui;
use egui_plot::{Line, Plot, PlotPoints};

use crate::data::model::{ColumnData, Dataset};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Trend plot (central panel)
// ---------------------------------------------------------------------------

/// X coordinate per row: seconds since the epoch when a date column was
/// detected, the row index otherwise.
fn x_axis(dataset: &Dataset, date_column: Option<&str>) -> Vec<Option<f64>> {
    let dates = date_column
        .and_then(|name| dataset.column(name))
        .and_then(|col| match &col.data {
            ColumnData::Temporal(values) => Some(values),
            _ => None,
        });

    match dates {
        Some(values) => values
            .iter()
            .map(|d| d.map(|d| d.and_utc().timestamp() as f64))
            .collect(),
        None => (0..dataset.len()).map(|i| Some(i as f64)).collect(),
    }
}

/// Render one line per selected numeric column.
pub fn trend_plot(ui: &mut Ui, state: &AppState) {
    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Upload CSV, Excel, JSON, or Parquet data  (File → Open…)");
            });
            return;
        }
    };

    if dataset.is_empty() {
        ui.label("The dataset has no rows.");
        return;
    }

    let has_dates = state.date_column.is_some();
    let xs = x_axis(dataset, state.date_column.as_deref());

    let mut plot = Plot::new("trend_plot")
        .legend(egui_plot::Legend::default())
        .y_axis_label("Value")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);
    if has_dates {
        plot = plot.x_axis_formatter(|mark, _range| {
            DateTime::from_timestamp(mark.value as i64, 0)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default()
        });
    } else {
        plot = plot.x_axis_label("Row");
    }

    plot.show(ui, |plot_ui| {
        for (name, values) in dataset.numeric_columns() {
            if !state.plotted.contains(name) {
                continue;
            }
            let color = state
                .color_map
                .as_ref()
                .map(|cm| cm.color_for(name))
                .unwrap_or(eframe::egui::Color32::LIGHT_BLUE);

            let points: PlotPoints = xs
                .iter()
                .zip(values.iter())
                .filter_map(|(x, y)| Some([(*x)?, (*y)?]))
                .collect();

            let line = Line::new(points).name(name).color(color).width(1.5);
            plot_ui.line(line);
        }
    });
}
