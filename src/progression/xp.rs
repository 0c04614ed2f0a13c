//! Experience points and rank titles.

use serde::Serialize;

use crate::config::{Rank, XpConfig};
use crate::domain::WordItem;

/// Where the catalog stands on the rank ladder
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankSummary {
  pub total_xp: u64,
  pub current_title: String,
  pub next_title: String,
  pub current_level_xp: u64,
  pub next_level_xp: u64,
  /// 0.0 to 100.0
  pub progress_percentage: f64,
}

pub fn total_xp(items: &[WordItem], config: &XpConfig) -> u64 {
  let levels: u64 = items.iter().map(|i| i.proficiency_level as u64).sum();
  config.base_xp_per_item * items.len() as u64 + config.per_level_xp * levels
}

/// XP gained by a review commit that adds `delta` levels
pub fn xp_for_levels(delta: u32, config: &XpConfig) -> u64 {
  config.per_level_xp * delta as u64
}

/// Place an XP total on the ladder.
///
/// `ranks` must be sorted by threshold and start at 0 (checked when the
/// configuration is loaded).
pub fn rank_for(total_xp: u64, ranks: &[Rank]) -> RankSummary {
  let Some(first) = ranks.first() else {
    return RankSummary {
      total_xp,
      current_title: String::new(),
      next_title: String::new(),
      current_level_xp: 0,
      next_level_xp: 0,
      progress_percentage: 100.0,
    };
  };

  let current_idx = ranks.iter().rposition(|r| r.threshold <= total_xp).unwrap_or(0);
  let current = ranks.get(current_idx).unwrap_or(first);

  match ranks.get(current_idx + 1) {
    Some(next) => {
      let span = next.threshold.saturating_sub(current.threshold);
      let gained = total_xp.saturating_sub(current.threshold);
      let progress = if span > 0 {
        gained as f64 / span as f64 * 100.0
      } else {
        100.0
      };
      RankSummary {
        total_xp,
        current_title: current.title.clone(),
        next_title: next.title.clone(),
        current_level_xp: current.threshold,
        next_level_xp: next.threshold,
        progress_percentage: progress.clamp(0.0, 100.0),
      }
    }
    // Top of the ladder
    None => RankSummary {
      total_xp,
      current_title: current.title.clone(),
      next_title: current.title.clone(),
      current_level_xp: current.threshold,
      next_level_xp: current.threshold,
      progress_percentage: 100.0,
    },
  }
}

pub fn summarize(items: &[WordItem], config: &XpConfig) -> RankSummary {
  rank_for(total_xp(items, config), &config.ranks)
}
