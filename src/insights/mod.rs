//! Insight engine: dataset in, management narrative out.
//!
//! Pipeline:
//! ```text
//!   Dataset
//!      │
//!      ├──► schema    first temporal column (informational)
//!      ├──► domain    keyword scores → Finance | Marketing
//!      ▼
//!   ┌───────┐   metrics: growth rate, z-score outliers
//!   │ rules │◄──────────────────────────────────────────
//!   └───────┘
//!      │  ordered Vec<Insight>
//!      ▼
//!   narrative  domain template or fallback → String
//! ```

pub mod domain;
pub mod metrics;
pub mod narrative;
pub mod rules;
pub mod schema;

use serde::Serialize;

use crate::data::model::{DataError, Dataset};

use domain::{Domain, DomainScores};
use rules::{Insight, rules_for};

/// Everything one run of the engine produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightReport {
    pub domain: Domain,
    pub scores: DomainScores,
    pub date_column: Option<String>,
    pub insights: Vec<Insight>,
    pub narrative: String,
}

/// Classify, evaluate the domain's rules and write the narrative for a
/// dataset whose temporal column (if any) has already been upgraded.
pub fn generate(dataset: &Dataset, date_column: Option<String>) -> Result<InsightReport, DataError> {
    let scores = domain::score_columns(&dataset.column_names());
    let domain = scores.domain();
    log::info!(
        "Domain {domain} (finance score {}, marketing score {})",
        scores.finance,
        scores.marketing
    );

    let rules = rules_for(domain);
    log::debug!("Evaluating {} rule set", rules.domain());
    let insights = rules.evaluate(dataset)?;
    log::info!("{} insight(s) detected", insights.len());
    for insight in &insights {
        log::debug!("insight: {insight}");
    }

    let narrative = narrative::synthesize(&insights, domain);
    Ok(InsightReport {
        domain,
        scores,
        date_column,
        insights,
        narrative,
    })
}
