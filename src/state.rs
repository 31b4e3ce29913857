use std::collections::BTreeSet;

use crate::color::ColorMap;
use crate::data::model::Dataset;
use crate::insights::domain::{self, Domain};
use crate::insights::{self, InsightReport, narrative, schema};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset (None until user loads a file).
    pub dataset: Option<Dataset>,

    /// Column that coerced to timestamps on load, if any.
    pub date_column: Option<String>,

    /// Domain the loaded dataset classifies as.
    pub domain: Option<Domain>,

    /// Result of the last "Generate Insights" run.
    pub report: Option<InsightReport>,

    /// Text shown under "Management Insight Summary".
    pub summary: Option<String>,

    /// Free-text notes pasted by the user.
    pub notes: String,

    /// Numeric columns currently drawn in the trend plot.
    pub plotted: BTreeSet<String>,

    /// One colour per numeric column.
    pub color_map: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Ingest a newly loaded dataset: upgrade its date column, classify it
    /// and reset everything derived from the previous one.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        let (dataset, date_column) = schema::upgrade_temporal(dataset);
        let names = dataset.column_names();
        let numeric: Vec<String> = dataset
            .numeric_columns()
            .map(|(name, _)| name.to_string())
            .collect();

        self.domain = Some(domain::classify(&names));
        self.color_map = Some(ColorMap::new(&numeric));
        self.plotted = numeric.into_iter().collect();
        self.date_column = date_column;
        self.report = None;
        self.summary = None;
        self.status_message = None;
        self.dataset = Some(dataset);
    }

    /// Run the insight engine on the loaded dataset, or fall back to the
    /// pasted notes when nothing is loaded.
    pub fn generate_insights(&mut self) {
        let Some(dataset) = &self.dataset else {
            self.summary = narrative::summarize_notes(&self.notes).map(str::to_string);
            return;
        };

        // set_dataset already upgraded the date column.
        match insights::generate(dataset, self.date_column.clone()) {
            Ok(report) => {
                self.summary = Some(report.narrative.clone());
                self.report = Some(report);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Insight generation failed: {e}");
                self.report = None;
                self.summary = None;
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Show or hide a column in the trend plot.
    pub fn toggle_plotted(&mut self, column: &str) {
        if !self.plotted.remove(column) {
            self.plotted.insert(column.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Column, ColumnKind};

    fn dataset() -> Dataset {
        Dataset::from_columns(vec![
            Column::text("date", vec![Some("2024-01-01".into()), Some("2024-02-01".into())]),
            Column::numeric("leads", vec![Some(10.0), Some(20.0)]),
            Column::numeric("conversion", vec![Some(0.5), Some(0.3)]),
        ])
        .unwrap()
    }

    #[test]
    fn loading_upgrades_and_classifies() {
        let mut state = AppState::default();
        state.set_dataset(dataset());

        assert_eq!(state.domain, Some(Domain::Marketing));
        assert_eq!(state.date_column.as_deref(), Some("date"));
        let ds = state.dataset.as_ref().unwrap();
        assert_eq!(ds.column("date").unwrap().kind(), ColumnKind::Temporal);
        assert_eq!(state.plotted.len(), 2);
    }

    #[test]
    fn generate_fills_summary() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        state.generate_insights();

        let report = state.report.as_ref().unwrap();
        assert_eq!(report.date_column.as_deref(), Some("date"));
        assert_eq!(state.summary.as_deref(), Some(report.narrative.as_str()));
    }

    #[test]
    fn generate_keeps_the_date_column_found_on_load() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        state.date_column = None;
        state.generate_insights();

        let report = state.report.as_ref().unwrap();
        assert_eq!(report.date_column, None);
        assert_eq!(
            state.dataset.as_ref().unwrap().column("date").unwrap().kind(),
            ColumnKind::Temporal
        );
    }

    #[test]
    fn notes_fallback_without_dataset() {
        let mut state = AppState::default();
        state.generate_insights();
        assert_eq!(state.summary, None);

        state.notes = "Revenue up in Q3".into();
        state.generate_insights();
        assert_eq!(state.summary.as_deref(), Some(narrative::NOTES_FALLBACK));
    }

    #[test]
    fn generation_errors_become_status() {
        let mut state = AppState::default();
        state.set_dataset(
            Dataset::from_columns(vec![
                Column::numeric("leads", vec![Some(1.0)]),
                Column::text("conversion", vec![Some("high".into())]),
            ])
            .unwrap(),
        );
        state.generate_insights();
        assert!(state.summary.is_none());
        assert!(state.status_message.is_some());
    }

    #[test]
    fn toggle_plotted_flips_membership() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        state.toggle_plotted("leads");
        assert!(!state.plotted.contains("leads"));
        state.toggle_plotted("leads");
        assert!(state.plotted.contains("leads"));
    }
}
