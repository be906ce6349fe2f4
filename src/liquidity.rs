use crate::error::{AnalysisError, Result};
use crate::markers::{classify, Marker};
use crate::schema::{AnalyzedTable, LiquidityRatio};
use log::warn;

/// Ratio where a zero denominator yields 0 rather than an epsilon blow-up.
fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Current ratio (short-term assets / short-term liabilities) for both years.
///
/// Uses the first row matching each marker. When either marker is absent the
/// result is [`AnalysisError::MissingMetric`] naming what was not found; this
/// metric is best-effort and callers are expected to continue without it.
pub fn current_ratio(table: &AnalyzedTable) -> Result<LiquidityRatio> {
    let assets = classify(table.labels(), Marker::ShortTermAssets);
    let liabilities = classify(table.labels(), Marker::ShortTermLiabilities);

    let (assets_idx, liabilities_idx) = match (assets.first(), liabilities.first()) {
        (Some(a), Some(l)) => (a, l),
        _ => {
            let markers = [
                (Marker::ShortTermAssets, assets.is_found()),
                (Marker::ShortTermLiabilities, liabilities.is_found()),
            ]
            .into_iter()
            .filter(|(_, found)| !found)
            .map(|(marker, _)| marker.label().to_string())
            .collect();
            return Err(AnalysisError::MissingMetric { markers });
        }
    };

    for (marker, hit) in [
        (Marker::ShortTermAssets, &assets),
        (Marker::ShortTermLiabilities, &liabilities),
    ] {
        if hit.is_ambiguous() {
            warn!("{} rows match '{}'; using the first", hit.count(), marker);
        }
    }

    let a = &table.rows[assets_idx];
    let l = &table.rows[liabilities_idx];

    Ok(LiquidityRatio {
        prior: ratio_or_zero(a.prior_value, l.prior_value),
        current: ratio_or_zero(a.current_value, l.current_value),
    })
}
