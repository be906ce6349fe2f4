use crate::error::{AnalysisError, Result};
use crate::markers::{classify, Marker};
use crate::schema::{AnalyzedTable, FinancialRow, LineItem, Totals};
use log::{debug, warn};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Stand-in for a zero denominator in growth and share calculations.
pub const EPSILON: f64 = 1e-9;

fn non_zero(value: f64) -> f64 {
    if value == 0.0 {
        EPSILON
    } else {
        value
    }
}

/// Year-over-year change in percent. A zero prior value is replaced by
/// [`EPSILON`], so growth from nothing is a very large finite number.
pub fn growth_pct(prior: f64, current: f64) -> f64 {
    (current - prior) / non_zero(prior) * 100.0
}

/// `value` as a percentage of `total`, with the same zero substitution.
pub fn share_pct(value: f64, total: f64) -> f64 {
    value / non_zero(total) * 100.0
}

/// Derives growth and composition columns for every line item.
///
/// Fails with [`AnalysisError::DataShape`] when no label contains the
/// total-assets marker. With several matches the first row is used and the
/// table is flagged as ambiguous.
pub fn compute_ratios(items: &[LineItem]) -> Result<AnalyzedTable> {
    let hit = classify(items.iter().map(|i| i.label.as_str()), Marker::TotalAssets);

    let total_idx = hit.first().ok_or_else(|| {
        AnalysisError::DataShape(format!(
            "No line item labelled '{}' was found. Check the uploaded statement.",
            Marker::TotalAssets
        ))
    })?;

    if hit.is_ambiguous() {
        warn!(
            "{} rows match '{}'; using row {} ('{}')",
            hit.count(),
            Marker::TotalAssets,
            total_idx,
            items[total_idx].label
        );
    }

    let total_assets = Totals {
        prior: items[total_idx].prior_value,
        current: items[total_idx].current_value,
    };

    debug!(
        "Total assets: prior {} / current {}",
        total_assets.prior, total_assets.current
    );

    let rows = items
        .iter()
        .map(|item| FinancialRow {
            label: item.label.clone(),
            prior_value: item.prior_value,
            current_value: item.current_value,
            growth_pct: growth_pct(item.prior_value, item.current_value),
            prior_share: share_pct(item.prior_value, total_assets.prior),
            current_share: share_pct(item.current_value, total_assets.current),
        })
        .collect();

    Ok(AnalyzedTable {
        rows,
        total_assets,
        total_assets_ambiguous: hit.is_ambiguous(),
    })
}

/// Content fingerprint of a statement, used as the memoization key.
pub fn fingerprint(items: &[LineItem]) -> u64 {
    let mut hasher = DefaultHasher::new();
    items.len().hash(&mut hasher);
    for item in items {
        item.label.hash(&mut hasher);
        item.prior_value.to_bits().hash(&mut hasher);
        item.current_value.to_bits().hash(&mut hasher);
    }
    hasher.finish()
}

/// Memoizes [`compute_ratios`] for the most recent input, so re-rendering
/// the same statement does not redo the work. Only one statement is held;
/// a different input replaces it. Failures are not cached.
#[derive(Debug, Default)]
pub struct RatioCache {
    last: Option<CachedTable>,
    hits: usize,
}

#[derive(Debug)]
struct CachedTable {
    key: u64,
    items: Vec<LineItem>,
    table: Arc<AnalyzedTable>,
}

impl RatioCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compute(&mut self, items: &[LineItem]) -> Result<Arc<AnalyzedTable>> {
        let key = fingerprint(items);

        if let Some(cached) = &self.last {
            if cached.key == key && cached.items.as_slice() == items {
                self.hits += 1;
                debug!("Ratio cache hit for {} rows", items.len());
                return Ok(Arc::clone(&cached.table));
            }
        }

        let table = Arc::new(compute_ratios(items)?);
        self.last = Some(CachedTable {
            key,
            items: items.to_vec(),
            table: Arc::clone(&table),
        });
        Ok(table)
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn len(&self) -> usize {
        usize::from(self.last.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.last.is_none()
    }

    pub fn clear(&mut self) {
        self.last = None;
    }
}
