use crate::data::model::{DataError, Dataset};
use crate::insights::domain::Domain;
use crate::insights::metrics::growth_rate_raw;

use super::{Insight, RuleSet};

const TRAFFIC_THRESHOLD_PCT: f64 = 10.0;
const CHURN_THRESHOLD_PCT: f64 = 5.0;

/// Marketing heuristics: funnel conversion, traffic and churn.
///
/// Columns are looked up by their exact lowercase name.
pub struct MarketingRules;

impl RuleSet for MarketingRules {
    fn domain(&self) -> Domain {
        Domain::Marketing
    }

    fn evaluate(&self, dataset: &Dataset) -> Result<Vec<Insight>, DataError> {
        let mut insights = Vec::new();

        if dataset.has_column("leads") && dataset.has_column("conversion") {
            let conversion = dataset.numeric("conversion")?;
            if let (Some(Some(start)), Some(Some(end))) = (conversion.first(), conversion.last()) {
                if end < start {
                    insights.push(Insight::new(
                        "Conversion rates declined, indicating funnel efficiency issues.",
                    ));
                }
            }
        }

        if dataset.has_column("traffic") {
            match growth_rate_raw(dataset.numeric("traffic")?) {
                Some(g) if g > TRAFFIC_THRESHOLD_PCT => insights.push(Insight::new(
                    "Website traffic increased strongly, suggesting effective acquisition efforts.",
                )),
                Some(g) if g < -TRAFFIC_THRESHOLD_PCT => insights.push(Insight::new(
                    "Website traffic declined significantly, requiring channel review.",
                )),
                _ => {}
            }
        }

        if dataset.has_column("churn") {
            if let Some(g) = growth_rate_raw(dataset.numeric("churn")?) {
                if g > CHURN_THRESHOLD_PCT {
                    insights.push(Insight::new(
                        "Customer churn increased, particularly among sensitive segments.",
                    ));
                }
            }
        }

        Ok(insights)
    }
}
