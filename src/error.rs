//! Error types for the progression engine and its catalog stores.
//!
//! Store failures are kept separate from domain failures so the engine can
//! tell a lost compare-and-set race apart from a broken database.

use thiserror::Error;

/// Failures raised by a [`WordStore`](crate::store::WordStore) adapter.
#[derive(Debug, Error)]
pub enum StoreError {
  #[error("database error: {0}")]
  Database(#[from] rusqlite::Error),

  /// The store's lock was poisoned by a thread that panicked while holding it.
  #[error("database unavailable")]
  Unavailable,
}

/// Failures surfaced by [`ProgressionEngine`](crate::engine::ProgressionEngine).
#[derive(Debug, Error)]
pub enum EngineError {
  /// A quiz was requested but the catalog cannot supply enough distinct words.
  #[error("quiz needs {required} distinct words but the fridge only holds {available}")]
  InsufficientCatalog { required: usize, available: usize },

  #[error("word {0} not found")]
  NotFound(i64),

  /// The review commit lost its compare-and-set race, even after one retry.
  #[error("word {0} was modified concurrently, try again")]
  ConcurrentModification(i64),

  #[error("a quiz needs at least one option, got {0}")]
  InvalidOptionCount(usize),

  /// Malformed capture payload.
  #[error("invalid word: {0}")]
  Validation(String),

  #[error(transparent)]
  Store(#[from] StoreError),
}

impl EngineError {
  /// Returns `true` if retrying the same request later may succeed.
  pub fn is_transient(&self) -> bool {
    matches!(
      self,
      EngineError::ConcurrentModification(_) | EngineError::Store(StoreError::Unavailable)
    )
  }
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_transient_classification() {
    assert!(EngineError::ConcurrentModification(1).is_transient());
    assert!(EngineError::Store(StoreError::Unavailable).is_transient());
    assert!(!EngineError::NotFound(1).is_transient());
    assert!(!EngineError::InsufficientCatalog { required: 4, available: 3 }.is_transient());
  }

  #[test]
  fn test_insufficient_catalog_message() {
    let err = EngineError::InsufficientCatalog { required: 4, available: 3 };
    assert_eq!(
      err.to_string(),
      "quiz needs 4 distinct words but the fridge only holds 3"
    );
  }

  #[test]
  fn test_store_error_converts() {
    let err: EngineError = StoreError::Unavailable.into();
    assert!(matches!(err, EngineError::Store(StoreError::Unavailable)));
    assert_eq!(err.to_string(), "database unavailable");
  }
}
