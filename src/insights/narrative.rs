use super::domain::Domain;
use super::rules::Insight;

pub const NO_SIGNAL_FALLBACK: &str = "No significant patterns or changes were detected in the data.";

/// Shown when the user pastes notes instead of loading a dataset.
pub const NOTES_FALLBACK: &str = "Based on the provided summary, performance trends indicate notable changes. \
     Key drivers should be reviewed to assess sustainability and corrective actions.";

/// Assemble the management summary: insights in engine order, joined by a
/// space, inside the domain's framing sentence.
pub fn synthesize(insights: &[Insight], domain: Domain) -> String {
    if insights.is_empty() {
        return NO_SIGNAL_FALLBACK.to_string();
    }

    let joined = insights
        .iter()
        .map(Insight::as_str)
        .collect::<Vec<_>>()
        .join(" ");

    match domain {
        Domain::Finance => format!(
            "Financial performance analysis shows that {joined} \
             Overall results indicate key areas impacting profitability and cost structure."
        ),
        Domain::Marketing => format!(
            "Marketing performance analysis indicates that {joined} \
             These trends highlight opportunities to improve acquisition efficiency and retention."
        ),
    }
}

/// Summary for pasted notes; nothing when the notes are empty.
pub fn summarize_notes(notes: &str) -> Option<&'static str> {
    (!notes.is_empty()).then_some(NOTES_FALLBACK)
}
