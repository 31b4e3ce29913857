use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui::{self, Color32, RichText, ScrollArea, TextEdit, Ui};

use crate::insights::InsightReport;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – dataset overview, notes, actions
// ---------------------------------------------------------------------------

/// Render the left panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Dataset");
    ui.separator();

    match &state.dataset {
        Some(ds) => {
            if let Some(domain) = state.domain {
                ui.label(RichText::new(format!("Detected domain: {domain}")).strong());
            }
            let date_label = state.date_column.as_deref().unwrap_or("none found");
            ui.label(format!("Date column: {date_label}"));
            ui.label(format!("{} rows × {} columns", ds.len(), ds.columns().len()));
        }
        None => {
            ui.label("No dataset loaded.");
        }
    }

    ui.add_space(8.0);
    ui.strong("OR paste summary data (optional)");
    ui.add(
        TextEdit::multiline(&mut state.notes)
            .hint_text("Paste summary notes or KPIs here")
            .desired_rows(5)
            .desired_width(f32::INFINITY),
    );

    ui.add_space(8.0);
    let can_generate = state.dataset.is_some() || !state.notes.is_empty();
    if ui
        .add_enabled(can_generate, egui::Button::new("Generate Insights"))
        .clicked()
    {
        state.generate_insights();
    }

    ui.separator();
    plot_toggles(ui, state);
}

/// Checkboxes selecting which numeric columns appear in the trend plot.
fn plot_toggles(ui: &mut Ui, state: &mut AppState) {
    let Some(ds) = &state.dataset else {
        return;
    };
    let columns: Vec<String> = ds
        .numeric_columns()
        .map(|(name, _)| name.to_string())
        .collect();
    if columns.is_empty() {
        return;
    }

    ui.strong("Plot");
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for col in &columns {
                let mut text = RichText::new(col);
                if let Some(cm) = &state.color_map {
                    text = text.color(cm.color_for(col));
                }
                let mut checked = state.plotted.contains(col);
                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle_plotted(col);
                }
            }
        });
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
            let has_report = state.report.is_some();
            if ui
                .add_enabled(has_report, egui::Button::new("Export report…"))
                .clicked()
            {
                export_report_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!("{} rows loaded", ds.len()));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Upload business data")
        .add_filter("Supported files", &["csv", "xlsx", "xls", "ods", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("Spreadsheet", &["xlsx", "xls", "ods"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} rows with columns {:?}",
                    dataset.len(),
                    dataset.column_names()
                );
                state.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

pub fn export_report_dialog(state: &mut AppState) {
    let Some(report) = &state.report else {
        return;
    };
    let file = rfd::FileDialog::new()
        .set_title("Export insight report")
        .add_filter("JSON", &["json"])
        .set_file_name("insight_report.json")
        .save_file();

    if let Some(path) = file {
        if let Err(e) = write_report(&path, report) {
            log::error!("Failed to export report: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        } else {
            log::info!("Report written to {}", path.display());
        }
    }
}

fn write_report(path: &Path, report: &InsightReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("serialising report")?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))
}
