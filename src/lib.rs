//! # Financial Ratio Analyst
//!
//! Turns a two-year financial statement (one label column, a prior-year and a
//! current-year value column) into growth and composition ratios plus the
//! current ratio, and feeds the result to a language model for a written
//! assessment or a question-and-answer session.
//!
//! ## Core Concepts
//!
//! - **Line items**: raw rows in spreadsheet order, labels are free text
//! - **Markers**: fixed label fragments (total assets, short-term assets,
//!   short-term liabilities) found by case-insensitive substring search
//! - **Growth / share**: per-row percentages; zero denominators are replaced
//!   by a tiny epsilon so the computation never fails on them
//! - **Current ratio**: best-effort; missing rows make it unavailable, not fatal
//!
//! ## Example
//!
//! ```rust,ignore
//! use financial_ratio_analyst::*;
//!
//! let items = vec![
//!     LineItem::new("TỔNG CỘNG TÀI SẢN", 1000.0, 1200.0),
//!     LineItem::new("TÀI SẢN NGẮN HẠN", 400.0, 600.0),
//!     LineItem::new("NỢ NGẮN HẠN", 200.0, 300.0),
//! ];
//!
//! let mut analyzer = Analyzer::new();
//! let analysis = analyzer.analyze(&items).unwrap();
//! assert_eq!(analysis.liquidity.unwrap().current, 2.0);
//! ```

pub mod calculator;
pub mod config;
pub mod error;
pub mod ingestion;
pub mod liquidity;
pub mod llm;
pub mod markers;
pub mod render;
pub mod schema;

pub use calculator::{compute_ratios, growth_pct, share_pct, RatioCache, EPSILON};
pub use config::{SecretStore, Settings};
pub use error::{AnalysisError, Result};
pub use ingestion::read_statement;
pub use liquidity::current_ratio;
pub use markers::{Marker, MarkerMatch};
pub use schema::*;

use log::{debug, info, warn};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

/// Everything shown for one statement: the augmented table, the current
/// ratio when it could be computed, and non-fatal warnings.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub table: Arc<AnalyzedTable>,
    pub liquidity: Option<LiquidityRatio>,
    pub warnings: Vec<String>,
}

/// Runs the pipeline, keeping ratio results memoized across calls.
#[derive(Debug, Default)]
pub struct Analyzer {
    cache: RatioCache,
}

impl Analyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn analyze(&mut self, items: &[LineItem]) -> Result<Analysis> {
        info!("Analyzing statement with {} line items", items.len());

        let table = self.cache.compute(items)?;
        let mut warnings = Vec::new();

        if table.total_assets_ambiguous {
            warnings.push(format!(
                "Several rows contain '{}'; the first one was used as total assets.",
                Marker::TotalAssets
            ));
        }

        let liquidity = match current_ratio(&table) {
            Ok(ratio) => {
                debug!(
                    "Current ratio: prior {:.2}, current {:.2}",
                    ratio.prior, ratio.current
                );
                Some(ratio)
            }
            Err(AnalysisError::MissingMetric { markers }) => {
                warn!("Current ratio unavailable, missing {:?}", markers);
                warnings.push(format!(
                    "Missing '{}' to compute the current ratio.",
                    markers.join("' / '")
                ));
                None
            }
            Err(e) => return Err(e),
        };

        Ok(Analysis {
            table,
            liquidity,
            warnings,
        })
    }

    pub fn analyze_file(&mut self, path: &Path) -> Result<Analysis> {
        let items = read_statement(path)?;
        self.analyze(&items)
    }

    pub fn cache(&self) -> &RatioCache {
        &self.cache
    }
}

pub fn analyze_statement(items: &[LineItem]) -> Result<Analysis> {
    Analyzer::new().analyze(items)
}
