use serde::{Deserialize, Serialize};

/// One raw line of the uploaded statement: a free-text label and the values
/// for the prior and current year, in spreadsheet order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub label: String,
    pub prior_value: f64,
    pub current_value: f64,
}

impl LineItem {
    pub fn new(label: impl Into<String>, prior_value: f64, current_value: f64) -> Self {
        Self {
            label: label.into(),
            prior_value,
            current_value,
        }
    }
}

/// A line item augmented with the derived ratio columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialRow {
    pub label: String,
    pub prior_value: f64,
    pub current_value: f64,
    /// Year-over-year change, in percent.
    pub growth_pct: f64,
    /// Share of prior-year total assets, in percent.
    pub prior_share: f64,
    /// Share of current-year total assets, in percent.
    pub current_share: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub prior: f64,
    pub current: f64,
}

/// Output of the ratio calculator. Row order follows the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedTable {
    pub rows: Vec<FinancialRow>,
    pub total_assets: Totals,
    /// Set when more than one label matched the total-assets marker.
    pub total_assets_ambiguous: bool,
}

impl AnalyzedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|row| row.label.as_str())
    }
}

/// Current ratio for both years.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LiquidityRatio {
    pub prior: f64,
    pub current: f64,
}

impl LiquidityRatio {
    pub fn delta(&self) -> f64 {
        self.current - self.prior
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}
