use crate::data::model::{DataError, Dataset};
use crate::insights::domain::Domain;
use crate::insights::metrics::{growth_rate_raw, sample_column};

use super::{Insight, RuleSet, title_case};

/// Growth beyond +/- this many percent is worth a sentence.
const GROWTH_THRESHOLD_PCT: f64 = 5.0;

/// Finance heuristics: per-column growth and volatility, then margin pressure.
pub struct FinanceRules;

impl RuleSet for FinanceRules {
    fn domain(&self) -> Domain {
        Domain::Finance
    }

    fn evaluate(&self, dataset: &Dataset) -> Result<Vec<Insight>, DataError> {
        let mut insights = Vec::new();

        for (name, values) in dataset.numeric_columns() {
            let Some(sample) = sample_column(name, values) else {
                log::debug!("Skipping '{name}': fewer than two values");
                continue;
            };
            let label = title_case(name);

            match sample.growth_rate {
                Some(g) if g > GROWTH_THRESHOLD_PCT => insights.push(Insight::new(format!(
                    "{label} increased by {g:.1}% over the period."
                ))),
                Some(g) if g < -GROWTH_THRESHOLD_PCT => insights.push(Insight::new(format!(
                    "{label} declined by {:.1}% over the period.",
                    g.abs()
                ))),
                _ => {}
            }

            if !sample.outliers.is_empty() {
                insights.push(Insight::new(format!(
                    "{label} showed unusual spikes or drops, indicating volatility."
                )));
            }
        }

        if dataset.has_column("revenue") && dataset.has_column("cost") {
            let revenue_growth = growth_rate_raw(dataset.numeric("revenue")?);
            let cost_growth = growth_rate_raw(dataset.numeric("cost")?);
            if let (Some(cost), Some(revenue)) = (cost_growth, revenue_growth) {
                if cost > revenue {
                    insights.push(Insight::new(
                        "Costs grew faster than revenue, leading to margin pressure.",
                    ));
                }
            }
        }

        Ok(insights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Column;

    fn numeric(name: &str, values: &[f64]) -> Column {
        Column::numeric(name, values.iter().copied().map(Some).collect())
    }

    fn run(columns: Vec<Column>) -> Vec<String> {
        let ds = Dataset::from_columns(columns).unwrap();
        FinanceRules
            .evaluate(&ds)
            .unwrap()
            .into_iter()
            .map(|i| i.to_string())
            .collect()
    }

    #[test]
    fn revenue_down_cost_up_reports_margin_pressure() {
        let insights = run(vec![
            numeric("revenue", &[100.0, 80.0]),
            numeric("cost", &[50.0, 70.0]),
        ]);
        assert_eq!(
            insights,
            vec![
                "Revenue declined by 20.0% over the period.",
                "Cost increased by 40.0% over the period.",
                "Costs grew faster than revenue, leading to margin pressure.",
            ]
        );
    }

    #[test]
    fn growth_inside_band_is_silent() {
        let insights = run(vec![
            numeric("sales", &[100.0, 105.0]),
            numeric("profit", &[100.0, 95.0]),
        ]);
        assert!(insights.is_empty());
    }

    #[test]
    fn rise_and_fall_are_exclusive() {
        let up = run(vec![numeric("sales", &[100.0, 106.0])]);
        assert_eq!(up, vec!["Sales increased by 6.0% over the period."]);

        let down = run(vec![numeric("sales", &[100.0, 94.0])]);
        assert_eq!(down, vec!["Sales declined by 6.0% over the period."]);
    }

    #[test]
    fn growth_and_volatility_can_both_fire() {
        let insights = run(vec![numeric(
            "operating expense",
            &[10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 100.0, 20.0],
        )]);
        assert_eq!(
            insights,
            vec![
                "Operating Expense increased by 100.0% over the period.",
                "Operating Expense showed unusual spikes or drops, indicating volatility.",
            ]
        );
    }

    #[test]
    fn zero_start_gives_no_growth_sentence() {
        let insights = run(vec![numeric("profit", &[0.0, 50.0])]);
        assert!(insights.is_empty());
    }

    #[test]
    fn text_columns_are_not_analysed() {
        let insights = run(vec![Column::text(
            "notes",
            vec![Some("up".into()), Some("down".into())],
        )]);
        assert!(insights.is_empty());
    }

    #[test]
    fn margin_pressure_needs_cost_to_outgrow_revenue() {
        let insights = run(vec![
            numeric("revenue", &[100.0, 103.0]),
            numeric("cost", &[100.0, 103.0]),
        ]);
        assert!(insights.is_empty());

        let insights = run(vec![
            numeric("revenue", &[100.0, 104.0]),
            numeric("cost", &[100.0, 102.0]),
        ]);
        assert!(insights.is_empty());
    }

    #[test]
    fn margin_pressure_uses_stored_ends() {
        // The per-column rule ignores the missing first cell, the margin rule does not.
        let ds = Dataset::from_columns(vec![
            Column::numeric("revenue", vec![None, Some(100.0), Some(100.0)]),
            numeric("cost", &[100.0, 100.0, 300.0]),
        ])
        .unwrap();
        let insights = FinanceRules.evaluate(&ds).unwrap();
        assert_eq!(
            insights,
            vec![Insight::new("Cost increased by 200.0% over the period.")]
        );
    }

    #[test]
    fn margin_rule_is_case_sensitive() {
        let insights = run(vec![
            numeric("Revenue", &[100.0, 101.0]),
            numeric("Cost", &[100.0, 104.0]),
        ]);
        assert!(insights.is_empty());
    }

    #[test]
    fn text_revenue_column_is_an_error() {
        let ds = Dataset::from_columns(vec![
            Column::text("revenue", vec![Some("n/a".into()), Some("n/a".into())]),
            numeric("cost", &[1.0, 2.0]),
        ])
        .unwrap();
        assert!(matches!(
            FinanceRules.evaluate(&ds),
            Err(DataError::NotNumeric { .. })
        ));
    }
}
