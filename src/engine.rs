//! Progression engine: the facade the calling layer talks to.
//!
//! Wraps an injected [`WordStore`] and the progression configuration. Reads
//! derive freshness, XP and stats from a catalog snapshot and a single `now`;
//! the only write is the review commit behind a correct quiz answer.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;

use crate::config::ProgressionConfig;
use crate::domain::{
  AnswerOutcome, Freshness, NewWord, QuizChallenge, ReviewUpdate, WordItem, WordView,
};
use crate::error::{EngineError, EngineResult};
use crate::progression::{self, FreshnessPercentages, RankSummary, StatsSummary};
use crate::quiz;
use crate::store::WordStore;

/// Extra compare-and-set attempts after the first one loses a race
const COMMIT_RETRIES: usize = 1;

/// Profile numbers shown on the stats screen
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserStats {
  pub current_title: String,
  pub next_title: String,
  pub total_xp: u64,
  pub next_level_xp: u64,
  pub progress_percentage: f64,
  pub total_items: usize,
  pub fresh_count: usize,
  pub warning_count: usize,
  pub rotten_count: usize,
  pub percentages: FreshnessPercentages,
}

impl UserStats {
  fn new(rank: RankSummary, stats: StatsSummary) -> Self {
    Self {
      current_title: rank.current_title,
      next_title: rank.next_title,
      total_xp: rank.total_xp,
      next_level_xp: rank.next_level_xp,
      progress_percentage: rank.progress_percentage,
      total_items: stats.total_items,
      fresh_count: stats.fresh_count,
      warning_count: stats.warning_count,
      rotten_count: stats.rotten_count,
      percentages: stats.percentages,
    }
  }
}

pub struct ProgressionEngine<S> {
  store: S,
  config: ProgressionConfig,
}

impl<S: WordStore> ProgressionEngine<S> {
  pub fn new(store: S, config: ProgressionConfig) -> Self {
    Self { store, config }
  }

  pub fn store(&self) -> &S {
    &self.store
  }

  pub fn config(&self) -> &ProgressionConfig {
    &self.config
  }

  // ==================== Reads ====================

  pub fn freshness_status(&self, item: &WordItem, now: DateTime<Utc>) -> Freshness {
    progression::freshness(item, now, &self.config.freshness)
  }

  pub fn view(&self, item: &WordItem, now: DateTime<Utc>) -> WordView {
    WordView::new(
      item,
      self.freshness_status(item, now),
      progression::days_since_review(item, now),
    )
  }

  /// Snapshot of the whole catalog
  pub fn catalog(&self) -> EngineResult<Vec<WordItem>> {
    Ok(self.store.list_all()?)
  }

  /// Every word with its current freshness, stalest first
  pub fn list_items(&self, now: DateTime<Utc>) -> EngineResult<Vec<WordView>> {
    let mut items = self.catalog()?;
    items.sort_by(|a, b| {
      a.last_reviewed_at
        .cmp(&b.last_reviewed_at)
        .then(a.word_id.cmp(&b.word_id))
    });
    Ok(items.iter().map(|item| self.view(item, now)).collect())
  }

  pub fn get_item(&self, word_id: i64, now: DateTime<Utc>) -> EngineResult<WordView> {
    let item = self
      .store
      .get_by_id(word_id)?
      .ok_or(EngineError::NotFound(word_id))?;
    Ok(self.view(&item, now))
  }

  pub fn stats(&self, catalog: &[WordItem], now: DateTime<Utc>) -> StatsSummary {
    progression::stats(catalog, now, &self.config.freshness)
  }

  pub fn rank(&self, catalog: &[WordItem]) -> RankSummary {
    progression::rank_summary(catalog, &self.config.xp)
  }

  /// Stats and rank computed from one snapshot
  pub fn user_stats(&self, now: DateTime<Utc>) -> EngineResult<UserStats> {
    let catalog = self.catalog()?;
    Ok(UserStats::new(self.rank(&catalog), self.stats(&catalog, now)))
  }

  // ==================== Capture ====================

  /// Add a captured word, or refresh the translation of an already known label.
  pub fn capture(&self, new_word: &NewWord, now: DateTime<Utc>) -> EngineResult<WordItem> {
    let details = new_word.normalize().map_err(EngineError::Validation)?;

    let (item, created) = self.store.insert_or_refresh(&details, now)?;
    if created {
      tracing::info!("Captured '{}' as word {}", item.label_en, item.word_id);
    } else {
      tracing::info!("Refreshed details for '{}' (word {})", item.label_en, item.word_id);
    }
    Ok(item)
  }

  // ==================== Quiz ====================

  /// Build a quiz for `target_id` from a catalog snapshot.
  /// `option_count` falls back to the configured default.
  pub fn generate_quiz<R: Rng + ?Sized>(
    &self,
    catalog: &[WordItem],
    target_id: i64,
    option_count: Option<usize>,
    rng: &mut R,
  ) -> EngineResult<QuizChallenge> {
    let k = option_count.unwrap_or(self.config.quiz.option_count);
    quiz::generate_quiz(catalog, target_id, k, rng)
  }

  /// Same as [`generate_quiz`](Self::generate_quiz), snapshotting the store first.
  pub fn generate_quiz_for<R: Rng + ?Sized>(
    &self,
    target_id: i64,
    option_count: Option<usize>,
    rng: &mut R,
  ) -> EngineResult<QuizChallenge> {
    let catalog = self.catalog()?;
    self.generate_quiz(&catalog, target_id, option_count, rng)
  }

  /// Check an answer. A correct one commits the review; a wrong one writes nothing.
  pub fn submit_answer(
    &self,
    challenge: &QuizChallenge,
    selected_word_id: i64,
    now: DateTime<Utc>,
  ) -> EngineResult<AnswerOutcome> {
    if !challenge.is_correct(selected_word_id) {
      tracing::debug!(
        "Wrong answer for word {}: picked {}",
        challenge.correct_id,
        selected_word_id
      );
      return Ok(AnswerOutcome::wrong());
    }

    let updated = self.commit_review(challenge, now)?;
    let gained_levels = updated.proficiency_level.saturating_sub(challenge.issued_level);
    let xp_delta = progression::xp_for_levels(gained_levels, &self.config.xp);

    tracing::info!(
      "Word {} reviewed: level {} -> {}, +{} XP",
      updated.word_id,
      challenge.issued_level,
      updated.proficiency_level,
      xp_delta
    );

    Ok(AnswerOutcome {
      correct: true,
      xp_delta,
      updated_item: Some(self.view(&updated, now)),
    })
  }

  /// Advance level and reset the review clock with compare-and-set.
  ///
  /// The stored review state must still match what the challenge was issued
  /// against; otherwise another commit already credited this word.
  fn commit_review(&self, challenge: &QuizChallenge, now: DateTime<Utc>) -> EngineResult<WordItem> {
    let word_id = challenge.correct_id;

    for attempt in 0..=COMMIT_RETRIES {
      let current = self
        .store
        .get_by_id(word_id)?
        .ok_or(EngineError::NotFound(word_id))?;

      if current.proficiency_level != challenge.issued_level
        || current.last_reviewed_at != challenge.issued_reviewed_at
      {
        tracing::warn!("Word {} was already reviewed since this quiz was issued", word_id);
        return Err(EngineError::ConcurrentModification(word_id));
      }

      // review_count is bumped by the store alongside the version
      let update = ReviewUpdate {
        proficiency_level: current
          .proficiency_level
          .saturating_add(self.config.quiz.proficiency_delta),
        last_reviewed_at: now,
      };

      if let Some(updated) = self.store.compare_and_set(word_id, current.version, &update)? {
        return Ok(updated);
      }
      tracing::debug!(
        "Review commit for word {} lost a version race (attempt {})",
        word_id,
        attempt + 1
      );
    }

    tracing::warn!("Giving up on review commit for word {} after retry", word_id);
    Err(EngineError::ConcurrentModification(word_id))
  }
}
