use eframe::egui::{self, Ui};

use crate::state::AppState;
use crate::ui::{panels, plot, preview};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct InsightAgentApp {
    pub state: AppState,
}

impl eframe::App for InsightAgentApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: dataset overview, notes, actions ----
        egui::SidePanel::left("dataset_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: management summary ----
        if self.state.summary.is_some() {
            egui::TopBottomPanel::bottom("summary_panel")
                .resizable(true)
                .show(ctx, |ui| {
                    preview::summary(ui, &self.state);
                });
        }

        // ---- Central panel: preview + trend plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical(|ui: &mut Ui| {
                preview::data_preview(ui, &self.state);
                ui.separator();
                plot::trend_plot(ui, &self.state);
            });
        });
    }
}
