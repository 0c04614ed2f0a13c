pub mod freshness;
pub mod stats;
pub mod xp;

pub use freshness::{days_since_review, freshness};
pub use stats::{stats, FreshnessPercentages, StatsSummary};
pub use xp::{rank_for, summarize as rank_summary, total_xp, xp_for_levels, RankSummary};
