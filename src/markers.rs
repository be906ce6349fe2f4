//! Locating well-known line items inside free-text row labels.
//!
//! Statements arrive with whatever wording the preparer used, so the few rows
//! the calculations depend on are found by a case-insensitive substring search
//! for a fixed marker. Lookups report every hit so callers can tell a clean
//! match from an ambiguous one instead of silently taking the first row.

use serde::{Deserialize, Serialize};

pub const TOTAL_ASSETS: &str = "TỔNG CỘNG TÀI SẢN";
pub const SHORT_TERM_ASSETS: &str = "TÀI SẢN NGẮN HẠN";
pub const SHORT_TERM_LIABILITIES: &str = "NỢ NGẮN HẠN";

/// Line items the analyst knows how to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Marker {
    TotalAssets,
    ShortTermAssets,
    ShortTermLiabilities,
}

impl Marker {
    pub fn label(&self) -> &'static str {
        match self {
            Marker::TotalAssets => TOTAL_ASSETS,
            Marker::ShortTermAssets => SHORT_TERM_ASSETS,
            Marker::ShortTermLiabilities => SHORT_TERM_LIABILITIES,
        }
    }

    pub fn matches(&self, label: &str) -> bool {
        contains_ignore_case(label, self.label())
    }
}

impl std::fmt::Display for Marker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Every row index whose label contains the marker, in row order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MarkerMatch {
    pub indices: Vec<usize>,
}

impl MarkerMatch {
    /// The row calculations use: the first one in spreadsheet order.
    pub fn first(&self) -> Option<usize> {
        self.indices.first().copied()
    }

    pub fn count(&self) -> usize {
        self.indices.len()
    }

    pub fn is_found(&self) -> bool {
        !self.indices.is_empty()
    }

    pub fn is_ambiguous(&self) -> bool {
        self.indices.len() > 1
    }
}

pub fn classify<'a, I>(labels: I, marker: Marker) -> MarkerMatch
where
    I: IntoIterator<Item = &'a str>,
{
    let indices = labels
        .into_iter()
        .enumerate()
        .filter(|(_, label)| marker.matches(label))
        .map(|(idx, _)| idx)
        .collect();

    MarkerMatch { indices }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_regardless_of_case() {
        assert!(Marker::TotalAssets.matches("Tổng cộng tài sản"));
        assert!(Marker::TotalAssets.matches("270. TỔNG CỘNG TÀI SẢN (270 = 100 + 200)"));
        assert!(!Marker::TotalAssets.matches("Tổng cộng nguồn vốn"));
    }

    #[test]
    fn test_short_term_markers_do_not_overlap() {
        assert!(Marker::ShortTermAssets.matches("A. TÀI SẢN NGẮN HẠN"));
        assert!(!Marker::ShortTermLiabilities.matches("A. TÀI SẢN NGẮN HẠN"));
        assert!(Marker::ShortTermLiabilities.matches("I. Nợ ngắn hạn"));
        assert!(!Marker::ShortTermAssets.matches("I. Nợ ngắn hạn"));
    }

    #[test]
    fn test_classify_reports_all_hits() {
        let labels = [
            "TÀI SẢN NGẮN HẠN",
            "Tiền",
            "TỔNG CỘNG TÀI SẢN",
            "Tổng cộng tài sản (restated)",
        ];

        let hit = classify(labels.iter().copied(), Marker::TotalAssets);
        assert_eq!(hit.first(), Some(2));
        assert_eq!(hit.count(), 2);
        assert!(hit.is_ambiguous());

        let single = classify(labels.iter().copied(), Marker::ShortTermAssets);
        assert_eq!(single.first(), Some(0));
        assert!(!single.is_ambiguous());

        let none = classify(labels.iter().copied(), Marker::ShortTermLiabilities);
        assert!(!none.is_found());
        assert_eq!(none.first(), None);
    }
}
