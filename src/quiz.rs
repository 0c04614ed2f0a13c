//! Multiple choice quiz generation.
//!
//! A quiz has one correct option (the target word) and `k - 1` distractors
//! drawn uniformly without replacement from the rest of the catalog. All
//! options are shuffled so the answer cannot be inferred from position.
//! Randomness is always passed in so callers can seed it.

use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use std::collections::HashSet;

use crate::domain::{QuizChallenge, QuizOption, WordItem};
use crate::error::{EngineError, EngineResult};

/// Question text shown for a word: its emoji and English label
pub fn prompt_for(item: &WordItem) -> String {
  let emoji = item.emoji.trim();
  if emoji.is_empty() {
    item.label_en.clone()
  } else {
    format!("{} {}", emoji, item.label_en)
  }
}

/// Build a `k`-option challenge for `target_id` from a catalog snapshot.
pub fn generate_quiz<R: Rng + ?Sized>(
  catalog: &[WordItem],
  target_id: i64,
  k: usize,
  rng: &mut R,
) -> EngineResult<QuizChallenge> {
  if k == 0 {
    return Err(EngineError::InvalidOptionCount(k));
  }

  let target = catalog
    .iter()
    .find(|w| w.word_id == target_id)
    .ok_or(EngineError::NotFound(target_id))?;

  // Distinct distractor pool: never the target, never the same id twice
  let mut seen = HashSet::from([target_id]);
  let pool: Vec<&WordItem> = catalog.iter().filter(|w| seen.insert(w.word_id)).collect();

  let available = pool.len() + 1;
  if available < k {
    return Err(EngineError::InsufficientCatalog {
      required: k,
      available,
    });
  }

  let mut options = Vec::with_capacity(k);
  options.push(QuizOption::for_item(target));
  options.extend(
    pool
      .choose_multiple(rng, k - 1)
      .map(|w| QuizOption::for_item(w)),
  );
  options.shuffle(rng);

  Ok(QuizChallenge {
    correct_id: target.word_id,
    prompt: prompt_for(target),
    options,
    issued_level: target.proficiency_level,
    issued_reviewed_at: target.last_reviewed_at,
  })
}
