//! Cumulative-frequency (Pareto) computation.
//!
//! Sort descending by frequency, accumulate percentages, and tag each
//! row "80%" while the cumulative share is at or below the threshold,
//! "20%" after. Ties keep their input order (stable sort); the 80.00
//! boundary is decided on integers, so a row landing exactly on it is
//! always part of the "80%" group.

use serde::{Deserialize, Serialize};

use crate::catalog::{category_of, Category};

/// The Pareto threshold, in percent.
const THRESHOLD_PCT: u64 = 80;

/// One descriptor with its observed frequency, as submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyEntry {
    /// Descriptor label, ideally from the catalog.
    pub label: String,
    /// Observed count; non-positive entries are discarded.
    pub frequency: i64,
}

/// Which side of the 80/20 split a row falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Segment {
    /// Cumulative share at or below 80.00%.
    #[serde(rename = "80%")]
    Eighty,
    /// The residual rows.
    #[serde(rename = "20%")]
    Twenty,
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Segment::Eighty => f.write_str("80%"),
            Segment::Twenty => f.write_str("20%"),
        }
    }
}

/// One computed row of the Pareto table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParetoRow {
    /// Descriptor label.
    pub label: String,
    /// Observed frequency.
    pub frequency: u64,
    /// Share of the total, in percent.
    pub pct: f64,
    /// Running share of the total, in percent.
    pub cum_pct: f64,
    /// 80/20 tag.
    pub segment: Segment,
    /// Catalog category of the label.
    pub category: Category,
}

/// The computed table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParetoTable {
    /// Rows, descending by frequency.
    pub rows: Vec<ParetoRow>,
    /// Sum of all kept frequencies.
    pub total: u64,
}

impl ParetoTable {
    /// Rows tagged "80%".
    pub fn vital_few(&self) -> impl Iterator<Item = &ParetoRow> {
        self.rows.iter().filter(|r| r.segment == Segment::Eighty)
    }

    /// Total frequency per category, in catalog category order.
    pub fn category_totals(&self) -> Vec<(Category, u64)> {
        Category::ALL
            .iter()
            .map(|category| {
                let total = self
                    .rows
                    .iter()
                    .filter(|r| r.category == *category)
                    .map(|r| r.frequency)
                    .sum();
                (*category, total)
            })
            .collect()
    }
}

/// Compute the Pareto table for a frequency list.
///
/// Non-positive frequencies are discarded. An empty or all-discarded
/// input yields a well-formed empty table rather than an error.
pub fn compute(entries: &[FrequencyEntry]) -> ParetoTable {
    let mut kept: Vec<(String, u64)> = entries
        .iter()
        .filter(|e| e.frequency > 0)
        .map(|e| (e.label.clone(), e.frequency as u64))
        .collect();
    if kept.is_empty() {
        log::debug!("pareto input empty after discarding non-positive entries");
        return ParetoTable::default();
    }

    // Stable: equal frequencies keep their submitted order.
    kept.sort_by(|a, b| b.1.cmp(&a.1));
    let total: u64 = kept.iter().map(|(_, f)| f).sum();

    let mut running: u64 = 0;
    let rows = kept
        .into_iter()
        .map(|(label, frequency)| {
            running += frequency;
            // Integer form of `cum_pct <= 80.00`, immune to float drift.
            let segment = if running * 100 <= THRESHOLD_PCT * total {
                Segment::Eighty
            } else {
                Segment::Twenty
            };
            ParetoRow {
                category: category_of(&label),
                pct: frequency as f64 * 100.0 / total as f64,
                cum_pct: running as f64 * 100.0 / total as f64,
                label,
                frequency,
                segment,
            }
        })
        .collect();

    ParetoTable { rows, total }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn entries(pairs: &[(&str, i64)]) -> Vec<FrequencyEntry> {
        pairs
            .iter()
            .map(|(label, frequency)| FrequencyEntry {
                label: label.to_string(),
                frequency: *frequency,
            })
            .collect()
    }

    #[test]
    fn test_classic_segmentation() {
        // The canonical case: cumulative 50 / 80 / 100.
        let table = compute(&entries(&[("A", 50), ("B", 30), ("C", 20)]));
        assert_eq!(table.total, 100);

        assert_eq!(table.rows[0].label, "A");
        assert_eq!(table.rows[0].cum_pct, 50.0);
        assert_eq!(table.rows[0].segment, Segment::Eighty);

        // Exactly 80.00 cumulative is still the "80%" group.
        assert_eq!(table.rows[1].label, "B");
        assert_eq!(table.rows[1].cum_pct, 80.0);
        assert_eq!(table.rows[1].segment, Segment::Eighty);

        assert_eq!(table.rows[2].label, "C");
        assert_eq!(table.rows[2].cum_pct, 100.0);
        assert_eq!(table.rows[2].segment, Segment::Twenty);
    }

    #[test]
    fn test_sorted_descending() {
        let table = compute(&entries(&[("low", 1), ("high", 9), ("mid", 5)]));
        let labels: Vec<_> = table.rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["high", "mid", "low"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let table = compute(&entries(&[("z", 5), ("a", 5), ("m", 5)]));
        let labels: Vec<_> = table.rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_non_positive_discarded() {
        let table = compute(&entries(&[("keep", 3), ("zero", 0), ("neg", -2)]));
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.total, 3);
        assert_eq!(table.rows[0].pct, 100.0);
    }

    #[test]
    fn test_empty_input_is_well_formed() {
        let table = compute(&[]);
        assert!(table.rows.is_empty());
        assert_eq!(table.total, 0);
    }

    #[test]
    fn test_all_zero_input_is_well_formed() {
        let table = compute(&entries(&[("a", 0), ("b", 0)]));
        assert!(table.rows.is_empty());
        assert_eq!(table.total, 0);
    }

    #[test]
    fn test_single_entry_is_twenty_percent_free() {
        // One row is 100% cumulative: past the threshold.
        let table = compute(&entries(&[("only", 7)]));
        assert_eq!(table.rows[0].segment, Segment::Twenty);
    }

    #[test]
    fn test_categories_from_catalog() {
        let table = compute(&entries(&[
            ("Homicidio", 4),
            ("Deserción escolar", 3),
            ("inventado", 1),
        ]));
        assert_eq!(table.rows[0].category, Category::Delito);
        assert_eq!(table.rows[1].category, Category::RiesgoSocial);
        assert_eq!(table.rows[2].category, Category::OtrosFactores);
    }

    #[test]
    fn test_category_totals() {
        let table = compute(&entries(&[
            ("Homicidio", 4),
            ("Extorsión", 2),
            ("Deserción escolar", 3),
        ]));
        let totals = table.category_totals();
        assert_eq!(totals[0], (Category::Delito, 6));
        assert_eq!(totals[1], (Category::RiesgoSocial, 3));
        assert_eq!(totals[2], (Category::OtrosFactores, 0));
    }

    #[test]
    fn test_vital_few() {
        let table = compute(&entries(&[("A", 50), ("B", 30), ("C", 20)]));
        let vital: Vec<_> = table.vital_few().map(|r| r.label.as_str()).collect();
        assert_eq!(vital, vec!["A", "B"]);
    }

    #[test]
    fn test_segment_serde_tags() {
        assert_eq!(serde_json::to_string(&Segment::Eighty).unwrap(), "\"80%\"");
        assert_eq!(serde_json::to_string(&Segment::Twenty).unwrap(), "\"20%\"");
    }

    proptest! {
        #[test]
        fn prop_cumulative_is_monotone_and_ends_at_100(
            freqs in proptest::collection::vec(1i64..1000, 1..40)
        ) {
            let input: Vec<FrequencyEntry> = freqs
                .iter()
                .enumerate()
                .map(|(i, f)| FrequencyEntry { label: format!("d{i}"), frequency: *f })
                .collect();
            let table = compute(&input);

            let mut last = 0.0;
            for row in &table.rows {
                prop_assert!(row.cum_pct >= last);
                last = row.cum_pct;
            }
            prop_assert!((last - 100.0).abs() < 1e-9);
        }

        #[test]
        fn prop_segments_are_a_prefix_then_suffix(
            freqs in proptest::collection::vec(1i64..1000, 1..40)
        ) {
            let input: Vec<FrequencyEntry> = freqs
                .iter()
                .enumerate()
                .map(|(i, f)| FrequencyEntry { label: format!("d{i}"), frequency: *f })
                .collect();
            let table = compute(&input);

            // Once a row is tagged "20%", every later row is too.
            let mut seen_twenty = false;
            for row in &table.rows {
                if row.segment == Segment::Twenty {
                    seen_twenty = true;
                } else {
                    prop_assert!(!seen_twenty);
                }
            }
        }
    }
}
