//! Catalog store abstraction.
//!
//! The engine never touches a database directly: it receives a [`WordStore`]
//! and only uses snapshot reads plus a single-row compare-and-set. Two
//! adapters ship with the crate: [`SqliteWordStore`] over the shared rusqlite
//! connection and [`MemoryWordStore`] for tests and demos.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::db::{self, DbPool};
use crate::domain::{ReviewUpdate, WordDetails, WordItem};
use crate::error::StoreError;

pub trait WordStore: Send + Sync {
  /// Snapshot of the whole catalog
  fn list_all(&self) -> Result<Vec<WordItem>, StoreError>;

  fn get_by_id(&self, word_id: i64) -> Result<Option<WordItem>, StoreError>;

  /// Case-insensitive lookup by English label
  fn find_by_label(&self, label_en: &str) -> Result<Option<WordItem>, StoreError>;

  fn insert(&self, details: &WordDetails, now: DateTime<Utc>) -> Result<WordItem, StoreError>;

  /// Insert, or refresh the word already holding this label, as one step.
  ///
  /// The flag is `true` when a new word was created.
  fn insert_or_refresh(
    &self,
    details: &WordDetails,
    now: DateTime<Utc>,
  ) -> Result<(WordItem, bool), StoreError>;

  /// Refresh translation fields, bumping the version. `None` if the word is gone.
  fn update_details(&self, word_id: i64, details: &WordDetails) -> Result<Option<WordItem>, StoreError>;

  /// Apply `update` only if the stored version still equals `expected_version`.
  ///
  /// Returns the updated item, or `None` on a version mismatch or missing word.
  fn compare_and_set(
    &self,
    word_id: i64,
    expected_version: i64,
    update: &ReviewUpdate,
  ) -> Result<Option<WordItem>, StoreError>;
}

// ============================================================================
// SQLite
// ============================================================================

#[derive(Clone)]
pub struct SqliteWordStore {
  pool: DbPool,
}

impl SqliteWordStore {
  pub fn new(pool: DbPool) -> Self {
    Self { pool }
  }

  pub fn pool(&self) -> &DbPool {
    &self.pool
  }
}

impl WordStore for SqliteWordStore {
  fn list_all(&self) -> Result<Vec<WordItem>, StoreError> {
    let conn = db::try_lock(&self.pool)?;
    Ok(db::list_words(&conn)?)
  }

  fn get_by_id(&self, word_id: i64) -> Result<Option<WordItem>, StoreError> {
    let conn = db::try_lock(&self.pool)?;
    Ok(db::get_word_by_id(&conn, word_id)?)
  }

  fn find_by_label(&self, label_en: &str) -> Result<Option<WordItem>, StoreError> {
    let conn = db::try_lock(&self.pool)?;
    Ok(db::find_word_by_label(&conn, label_en)?)
  }

  fn insert(&self, details: &WordDetails, now: DateTime<Utc>) -> Result<WordItem, StoreError> {
    let conn = db::try_lock(&self.pool)?;
    Ok(db::insert_word(&conn, details, now)?)
  }

  fn insert_or_refresh(
    &self,
    details: &WordDetails,
    now: DateTime<Utc>,
  ) -> Result<(WordItem, bool), StoreError> {
    let conn = db::try_lock(&self.pool)?;
    Ok(db::upsert_word(&conn, details, now)?)
  }

  fn update_details(&self, word_id: i64, details: &WordDetails) -> Result<Option<WordItem>, StoreError> {
    let conn = db::try_lock(&self.pool)?;
    Ok(db::update_word_details(&conn, word_id, details)?)
  }

  fn compare_and_set(
    &self,
    word_id: i64,
    expected_version: i64,
    update: &ReviewUpdate,
  ) -> Result<Option<WordItem>, StoreError> {
    let conn = db::try_lock(&self.pool)?;
    Ok(db::compare_and_set_review(&conn, word_id, expected_version, update)?)
  }
}

// ============================================================================
// In-memory
// ============================================================================

#[derive(Default)]
struct MemoryCatalog {
  words: BTreeMap<i64, WordItem>,
  last_id: i64,
}

#[derive(Default)]
pub struct MemoryWordStore {
  catalog: Mutex<MemoryCatalog>,
}

impl MemoryWordStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Seed a store with ready-made items, keeping their ids.
  pub fn with_items(items: impl IntoIterator<Item = WordItem>) -> Self {
    let mut catalog = MemoryCatalog::default();
    for item in items {
      catalog.last_id = catalog.last_id.max(item.word_id);
      catalog.words.insert(item.word_id, item);
    }
    Self {
      catalog: Mutex::new(catalog),
    }
  }

  fn lock(&self) -> Result<MutexGuard<'_, MemoryCatalog>, StoreError> {
    self.catalog.lock().map_err(|_| StoreError::Unavailable)
  }
}

impl WordStore for MemoryWordStore {
  fn list_all(&self) -> Result<Vec<WordItem>, StoreError> {
    Ok(self.lock()?.words.values().cloned().collect())
  }

  fn get_by_id(&self, word_id: i64) -> Result<Option<WordItem>, StoreError> {
    Ok(self.lock()?.words.get(&word_id).cloned())
  }

  fn find_by_label(&self, label_en: &str) -> Result<Option<WordItem>, StoreError> {
    Ok(
      self
        .lock()?
        .words
        .values()
        .find(|w| w.label_en.eq_ignore_ascii_case(label_en))
        .cloned(),
    )
  }

  fn insert(&self, details: &WordDetails, now: DateTime<Utc>) -> Result<WordItem, StoreError> {
    let mut catalog = self.lock()?;
    catalog.last_id += 1;
    let item = WordItem::from_details(catalog.last_id, details, now);
    catalog.words.insert(item.word_id, item.clone());
    Ok(item)
  }

  fn insert_or_refresh(
    &self,
    details: &WordDetails,
    now: DateTime<Utc>,
  ) -> Result<(WordItem, bool), StoreError> {
    let mut catalog = self.lock()?;
    let existing = catalog
      .words
      .values_mut()
      .find(|w| w.label_en.eq_ignore_ascii_case(&details.label_en));
    if let Some(item) = existing {
      item.apply_details(details);
      item.version += 1;
      return Ok((item.clone(), false));
    }

    catalog.last_id += 1;
    let item = WordItem::from_details(catalog.last_id, details, now);
    catalog.words.insert(item.word_id, item.clone());
    Ok((item, true))
  }

  fn update_details(&self, word_id: i64, details: &WordDetails) -> Result<Option<WordItem>, StoreError> {
    let mut catalog = self.lock()?;
    Ok(catalog.words.get_mut(&word_id).map(|item| {
      item.apply_details(details);
      item.version += 1;
      item.clone()
    }))
  }

  fn compare_and_set(
    &self,
    word_id: i64,
    expected_version: i64,
    update: &ReviewUpdate,
  ) -> Result<Option<WordItem>, StoreError> {
    let mut catalog = self.lock()?;
    Ok(
      catalog
        .words
        .get_mut(&word_id)
        .filter(|item| item.version == expected_version)
        .map(|item| {
          item.apply_review(update);
          item.version += 1;
          item.clone()
        }),
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::NewWord;
  use crate::testing::TestEnv;

  fn details(label: &str) -> WordDetails {
    NewWord::new(label).normalize().unwrap()
  }

  /// Exercises the trait contract against any adapter
  fn check_contract(store: &dyn WordStore) {
    let now = Utc::now();
    let apple = store.insert(&details("Apple"), now).unwrap();
    let banana = store.insert(&details("Banana"), now).unwrap();
    assert_ne!(apple.word_id, banana.word_id);

    assert_eq!(store.list_all().unwrap().len(), 2);
    assert_eq!(store.get_by_id(apple.word_id).unwrap(), Some(apple.clone()));
    assert!(store.get_by_id(9_999).unwrap().is_none());
    assert_eq!(
      store.find_by_label("BANANA").unwrap().map(|w| w.word_id),
      Some(banana.word_id)
    );

    let update = ReviewUpdate {
      proficiency_level: 1,
      last_reviewed_at: now,
    };
    let reviewed = store
      .compare_and_set(apple.word_id, apple.version, &update)
      .unwrap()
      .unwrap();
    assert_eq!(reviewed.proficiency_level, 1);
    assert_eq!(reviewed.review_count, 1);
    assert_eq!(reviewed.version, apple.version + 1);

    // Stale version: rejected, nothing written
    let stale = ReviewUpdate {
      proficiency_level: 9,
      last_reviewed_at: now,
    };
    assert!(store
      .compare_and_set(apple.word_id, apple.version, &stale)
      .unwrap()
      .is_none());
    assert_eq!(store.get_by_id(apple.word_id).unwrap(), Some(reviewed.clone()));

    let refreshed = store
      .update_details(apple.word_id, &details("Apple"))
      .unwrap()
      .unwrap();
    assert_eq!(refreshed.version, reviewed.version + 1);
    assert_eq!(refreshed.proficiency_level, 1);

    assert!(store.update_details(9_999, &details("Ghost")).unwrap().is_none());

    let (same, created) = store.insert_or_refresh(&details("apple"), now).unwrap();
    assert!(!created);
    assert_eq!(same.word_id, apple.word_id);
    assert_eq!(same.review_count, 1);
    let (cherry, created) = store.insert_or_refresh(&details("Cherry"), now).unwrap();
    assert!(created);
    assert_eq!(store.list_all().unwrap().len(), 3);
    assert_eq!(store.find_by_label("cherry").unwrap(), Some(cherry));
    assert!(store.compare_and_set(9_999, 0, &update).unwrap().is_none());
  }

  #[test]
  fn test_memory_store_contract() {
    check_contract(&MemoryWordStore::new());
  }

  #[test]
  fn test_sqlite_store_contract() {
    let env = TestEnv::new().unwrap();
    check_contract(&env.store);
  }

  #[test]
  fn test_with_items_keeps_ids_and_continues_numbering() {
    let now = Utc::now();
    let seeded = WordItem::from_details(10, &details("Apple"), now);
    let store = MemoryWordStore::with_items([seeded]);

    let next = store.insert(&details("Banana"), now).unwrap();
    assert_eq!(next.word_id, 11);
    assert!(store.get_by_id(10).unwrap().is_some());
  }
}
