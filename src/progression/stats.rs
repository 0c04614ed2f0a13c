//! Fridge statistics: how much of the catalog is fresh, wilting or rotten.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::FreshnessConfig;
use crate::domain::{Freshness, WordItem};

use super::freshness::freshness;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FreshnessPercentages {
    pub fresh: f64,
    pub warning: f64,
    pub rotten: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatsSummary {
    pub total_items: usize,
    pub fresh_count: usize,
    pub warning_count: usize,
    pub rotten_count: usize,
    pub percentages: FreshnessPercentages,
}

fn percentage(count: usize, total: usize) -> f64 {
    if total > 0 {
        count as f64 * 100.0 / total as f64
    } else {
        0.0
    }
}

/// Summarize a catalog snapshot against a single `now`
pub fn stats(items: &[WordItem], now: DateTime<Utc>, config: &FreshnessConfig) -> StatsSummary {
    let mut summary = StatsSummary {
        total_items: items.len(),
        ..StatsSummary::default()
    };

    for item in items {
        match freshness(item, now, config) {
            Freshness::Fresh => summary.fresh_count += 1,
            Freshness::Warning => summary.warning_count += 1,
            Freshness::Rotten => summary.rotten_count += 1,
        }
    }

    summary.percentages = FreshnessPercentages {
        fresh: percentage(summary.fresh_count, summary.total_items),
        warning: percentage(summary.warning_count, summary.total_items),
        rotten: percentage(summary.rotten_count, summary.total_items),
    };
    summary
}
