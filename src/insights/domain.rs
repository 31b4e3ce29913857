use std::fmt;

use serde::Serialize;

pub const FINANCE_KEYWORDS: &[&str] = &[
    "revenue", "sales", "profit", "margin", "cost", "expense", "ebitda",
];
pub const MARKETING_KEYWORDS: &[&str] = &[
    "leads", "conversion", "ctr", "cac", "traffic", "churn", "retention",
];

/// Business area a dataset is analysed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Domain {
    Finance,
    Marketing,
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Finance => "Finance",
            Domain::Marketing => "Marketing",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of columns that matched each keyword set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DomainScores {
    pub finance: usize,
    pub marketing: usize,
}

impl DomainScores {
    /// Finance wins ties, including the all-zero case.
    pub fn domain(&self) -> Domain {
        if self.finance >= self.marketing {
            Domain::Finance
        } else {
            Domain::Marketing
        }
    }
}

fn mentions_any(column: &str, keywords: &[&str]) -> bool {
    let lower = column.to_lowercase();
    keywords.iter().any(|k| lower.contains(k))
}

/// Score column names against both keyword sets. A column adds at most one
/// point to each score.
pub fn score_columns<S: AsRef<str>>(columns: &[S]) -> DomainScores {
    columns
        .iter()
        .fold(DomainScores::default(), |mut scores, col| {
            let col = col.as_ref();
            if mentions_any(col, FINANCE_KEYWORDS) {
                scores.finance += 1;
            }
            if mentions_any(col, MARKETING_KEYWORDS) {
                scores.marketing += 1;
            }
            scores
        })
}

pub fn classify<S: AsRef<str>>(columns: &[S]) -> Domain {
    score_columns(columns).domain()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_matches_falls_back_to_finance() {
        assert_eq!(classify(&["id", "name"]), Domain::Finance);
    }

    #[test]
    fn matching_is_case_insensitive_substring() {
        let scores = score_columns(&["Total_Revenue", "Web Traffic", "CTR_pct"]);
        assert_eq!(scores, DomainScores { finance: 1, marketing: 2 });
        assert_eq!(scores.domain(), Domain::Marketing);
    }

    #[test]
    fn column_counts_once_per_set() {
        // "sales_cost_margin" hits three finance keywords but scores one point.
        let scores = score_columns(&["sales_cost_margin", "leads", "churn"]);
        assert_eq!(scores, DomainScores { finance: 1, marketing: 2 });
    }

    #[test]
    fn column_can_score_for_both_sets() {
        let scores = score_columns(&["cost_per_lead_cac"]);
        assert_eq!(scores, DomainScores { finance: 1, marketing: 1 });
        assert_eq!(scores.domain(), Domain::Finance);
    }

    #[test]
    fn column_order_does_not_matter() {
        let cols = ["leads", "revenue", "conversion", "notes", "cost", "traffic"];
        let expected = score_columns(&cols);
        let mut rotated = cols;
        for _ in 0..cols.len() {
            rotated.rotate_left(1);
            assert_eq!(score_columns(&rotated), expected);
        }
        let mut reversed = cols;
        reversed.reverse();
        assert_eq!(classify(&reversed), classify(&cols));
    }
}
