//! Rule engine: one flat, ordered rule set per domain.

pub mod finance;
pub mod marketing;

use std::fmt;

use serde::Serialize;

use crate::data::model::{DataError, Dataset};

use super::domain::Domain;

pub use finance::FinanceRules;
pub use marketing::MarketingRules;

/// One sentence describing a detected condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Insight(String);

impl Insight {
    pub fn new(text: impl Into<String>) -> Self {
        Insight(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A domain's heuristics. Insights come back in evaluation order, which is
/// also narrative order.
pub trait RuleSet {
    fn domain(&self) -> Domain;
    fn evaluate(&self, dataset: &Dataset) -> Result<Vec<Insight>, DataError>;
}

/// The single rule set that handles `domain`.
pub fn rules_for(domain: Domain) -> &'static dyn RuleSet {
    match domain {
        Domain::Finance => &FinanceRules,
        Domain::Marketing => &MarketingRules,
    }
}

/// Capitalise the first letter of every word and lowercase the rest. Any
/// non-letter starts a new word, so `net_revenue` becomes `Net_Revenue`.
pub fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_is_letter = false;
    for ch in name.chars() {
        if ch.is_alphabetic() {
            if prev_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(ch);
            prev_is_letter = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case_matches_dataframe_labels() {
        assert_eq!(title_case("revenue"), "Revenue");
        assert_eq!(title_case("net revenue"), "Net Revenue");
        assert_eq!(title_case("net_REVENUE"), "Net_Revenue");
        assert_eq!(title_case("q1sales"), "Q1Sales");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn each_domain_has_its_own_rule_set() {
        assert_eq!(rules_for(Domain::Finance).domain(), Domain::Finance);
        assert_eq!(rules_for(Domain::Marketing).domain(), Domain::Marketing);
    }
}
