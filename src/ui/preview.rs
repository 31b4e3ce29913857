use eframe::egui::{Color32, Frame, RichText, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::model::CellValue;
use crate::state::AppState;

/// Rows shown in the data preview.
const PREVIEW_ROWS: usize = 5;

// ---------------------------------------------------------------------------
// Data preview table
// ---------------------------------------------------------------------------

/// Render the first rows of the loaded dataset.
pub fn data_preview(ui: &mut Ui, state: &AppState) {
    let Some(ds) = &state.dataset else {
        return;
    };

    ui.heading("Data Preview");
    let names = ds.column_names();
    let rows = ds.head(PREVIEW_ROWS);

    ui.push_id("data_preview", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .vscroll(false)
            .columns(TableColumn::auto().at_least(60.0), names.len())
            .header(20.0, |mut header| {
                for name in &names {
                    header.col(|ui: &mut Ui| {
                        ui.strong(*name);
                    });
                }
            })
            .body(|mut body| {
                for row in &rows {
                    body.row(18.0, |mut table_row| {
                        for cell in row {
                            table_row.col(|ui: &mut Ui| {
                                match cell {
                                    CellValue::Null => ui.weak("—"),
                                    other => ui.label(other.to_string()),
                                };
                            });
                        }
                    });
                }
            });
    });
}

// ---------------------------------------------------------------------------
// Management summary
// ---------------------------------------------------------------------------

/// Render the generated narrative, if there is one.
pub fn summary(ui: &mut Ui, state: &AppState) {
    let Some(text) = &state.summary else {
        return;
    };

    ui.heading("Management Insight Summary");
    Frame::group(ui.style())
        .fill(Color32::from_rgb(0xe6, 0xf4, 0xea))
        .show(ui, |ui: &mut Ui| {
            ui.label(RichText::new(text).color(Color32::from_rgb(0x1e, 0x4d, 0x2b)));
        });
}
