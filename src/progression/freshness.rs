//! Freshness clock: how stale a word has become since its last review.
//!
//! Freshness is never stored. It is recomputed from `last_reviewed_at` and
//! `proficiency_level` against a caller-supplied `now`, so the same inputs
//! always give the same answer and time alone can only make a word staler.

use chrono::{DateTime, Utc};

use crate::config::FreshnessConfig;
use crate::domain::{Freshness, WordItem};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Fractional days between the last review and `now`, never negative
pub fn elapsed_days(last_reviewed_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
  let millis = (now - last_reviewed_at).num_milliseconds().max(0);
  millis as f64 / MILLIS_PER_DAY
}

/// Whole days since the last review (floored, never negative)
pub fn days_since_review(item: &WordItem, now: DateTime<Utc>) -> i64 {
  (now - item.last_reviewed_at).num_days().max(0)
}

/// Window multiplier for a proficiency level
pub fn widening(config: &FreshnessConfig, proficiency_level: u32) -> f64 {
  1.0 + config.level_widening * proficiency_level as f64
}

/// Classify an elapsed time for a given proficiency level
pub fn classify(elapsed_days: f64, proficiency_level: u32, config: &FreshnessConfig) -> Freshness {
  let widen = widening(config, proficiency_level);
  if elapsed_days < config.fresh_days * widen {
    Freshness::Fresh
  } else if elapsed_days < config.rotten_days * widen {
    Freshness::Warning
  } else {
    Freshness::Rotten
  }
}

pub fn freshness(item: &WordItem, now: DateTime<Utc>, config: &FreshnessConfig) -> Freshness {
  classify(
    elapsed_days(item.last_reviewed_at, now),
    item.proficiency_level,
    config,
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::NewWord;
  use chrono::Duration;

  fn item_reviewed(level: u32, ago: Duration, now: DateTime<Utc>) -> WordItem {
    let details = NewWord::new("Apple").normalize().unwrap();
    let mut item = WordItem::from_details(1, &details, now - ago);
    item.proficiency_level = level;
    item
  }

  #[test]
  fn test_just_reviewed_is_fresh() {
    let now = Utc::now();
    let config = FreshnessConfig::default();
    assert_eq!(freshness(&item_reviewed(0, Duration::zero(), now), now, &config), Freshness::Fresh);
  }

  #[test]
  fn test_default_windows_at_level_zero() {
    let now = Utc::now();
    let config = FreshnessConfig::default();

    let cases = [
      (Duration::days(6), Freshness::Fresh),
      (Duration::days(7), Freshness::Warning),
      (Duration::days(10), Freshness::Warning),
      (Duration::days(29), Freshness::Warning),
      (Duration::days(30), Freshness::Rotten),
      (Duration::days(31), Freshness::Rotten),
    ];
    for (ago, expected) in cases {
      assert_eq!(
        freshness(&item_reviewed(0, ago, now), now, &config),
        expected,
        "{} days ago",
        ago.num_days()
      );
    }
  }

  #[test]
  fn test_level_widens_windows() {
    let now = Utc::now();
    let config = FreshnessConfig::default();

    // level 2 => 2x windows: fresh < 14d, warning < 60d
    assert_eq!(freshness(&item_reviewed(2, Duration::days(10), now), now, &config), Freshness::Fresh);
    assert_eq!(freshness(&item_reviewed(2, Duration::days(40), now), now, &config), Freshness::Warning);
    assert_eq!(freshness(&item_reviewed(2, Duration::days(60), now), now, &config), Freshness::Rotten);
  }

  #[test]
  fn test_zero_widening_ignores_level() {
    let now = Utc::now();
    let config = FreshnessConfig {
      level_widening: 0.0,
      ..FreshnessConfig::default()
    };
    assert_eq!(freshness(&item_reviewed(10, Duration::days(8), now), now, &config), Freshness::Warning);
  }

  #[test]
  fn test_review_in_future_counts_as_fresh() {
    let now = Utc::now();
    let config = FreshnessConfig::default();
    let item = item_reviewed(0, Duration::days(-3), now);

    assert_eq!(elapsed_days(item.last_reviewed_at, now), 0.0);
    assert_eq!(days_since_review(&item, now), 0);
    assert_eq!(freshness(&item, now, &config), Freshness::Fresh);
  }

  #[test]
  fn test_monotonic_in_elapsed_time() {
    let now = Utc::now();
    let config = FreshnessConfig::default();

    for level in 0..8 {
      let mut previous = Freshness::Fresh;
      for hours in (0..24 * 200).step_by(7) {
        let state = freshness(&item_reviewed(level, Duration::hours(hours), now), now, &config);
        assert!(
          state >= previous,
          "level {} got fresher at {}h: {:?} -> {:?}",
          level,
          hours,
          previous,
          state
        );
        previous = state;
      }
      assert_eq!(previous, Freshness::Rotten);
    }
  }

  #[test]
  fn test_idempotent() {
    let now = Utc::now();
    let config = FreshnessConfig::default();
    let item = item_reviewed(1, Duration::days(9), now);

    let first = freshness(&item, now, &config);
    for _ in 0..10 {
      assert_eq!(freshness(&item, now, &config), first);
    }
  }

  #[test]
  fn test_days_since_review_floors() {
    let now = Utc::now();
    let item = item_reviewed(0, Duration::hours(47), now);
    assert_eq!(days_since_review(&item, now), 1);
  }
}
