//! Test utilities for database setup and catalog fixtures.
//!
//! Reuses the authoritative schema initialization so tests never carry
//! their own copy of the table definitions.

use chrono::{DateTime, Duration, Utc};
use std::path::Path;
use tempfile::TempDir;

use crate::db::{self, DbPool};
use crate::domain::{NewWord, WordItem};
use crate::store::SqliteWordStore;

/// On-disk fridge database in a temporary directory.
///
/// The directory (and database) is removed when this is dropped.
pub struct TestEnv {
  /// Temporary directory (kept alive for database file persistence)
  pub temp: TempDir,
  pub pool: DbPool,
  pub store: SqliteWordStore,
}

impl TestEnv {
  /// Create a test environment with `fridge.db` initialized via `db::init_db()`.
  pub fn new() -> rusqlite::Result<Self> {
    let temp =
      TempDir::new().map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

    let pool = db::init_db(&temp.path().join("fridge.db"))?;
    let store = SqliteWordStore::new(pool.clone());

    Ok(Self { temp, pool, store })
  }

  /// Get the temporary directory path for creating test files.
  pub fn path(&self) -> &Path {
    self.temp.path()
  }
}

/// A word with the given level, last reviewed `days_ago` before `now`.
pub fn word_reviewed(
  word_id: i64,
  label: &str,
  native: &str,
  level: u32,
  days_ago: i64,
  now: DateTime<Utc>,
) -> WordItem {
  let mut word = NewWord::new(label);
  word.native_definition = Some(native.to_string());
  let details = word.normalize().expect("fixture labels are non-empty");

  let mut item = WordItem::from_details(word_id, &details, now - Duration::days(days_ago));
  item.proficiency_level = level;
  item
}

/// The four-word fridge used across engine tests:
/// A rotten, B fresh thanks to its level, C wilting, D just captured.
pub fn scenario_catalog(now: DateTime<Utc>) -> Vec<WordItem> {
  vec![
    word_reviewed(1, "Apple", "사과", 0, 31, now),
    word_reviewed(2, "Banana", "바나나", 5, 1, now),
    word_reviewed(3, "Cabbage", "양배추", 0, 10, now),
    word_reviewed(4, "Tomato", "토마토", 0, 0, now),
  ]
}
