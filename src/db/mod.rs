pub mod schema;
pub mod words;

use rusqlite::{Connection, Result};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::StoreError;

// Re-export all public items from submodules
pub use schema::run_migrations;
pub use words::*;

pub type DbPool = Arc<Mutex<Connection>>;

/// Extension trait for logging errors before discarding them
pub trait LogOnError<T> {
    /// Log the error at warn level and return None
    fn log_warn(self, context: &str) -> Option<T>;
    /// Log the error at warn level and return the default
    fn log_warn_default(self, context: &str) -> T
    where
        T: Default;
}

impl<T, E: std::fmt::Display> LogOnError<T> for std::result::Result<T, E> {
    fn log_warn(self, context: &str) -> Option<T> {
        match self {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!("{}: {}", context, e);
                None
            }
        }
    }

    fn log_warn_default(self, context: &str) -> T
    where
        T: Default,
    {
        match self {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("{}: {}", context, e);
                T::default()
            }
        }
    }
}

/// Try to acquire the database lock, returning an error if poisoned
pub fn try_lock(pool: &DbPool) -> std::result::Result<MutexGuard<'_, Connection>, StoreError> {
  pool.lock().map_err(|_: PoisonError<_>| {
    tracing::error!("Database mutex poisoned - a thread panicked while holding the lock");
    StoreError::Unavailable
  })
}

pub fn init_db(path: &Path) -> Result<DbPool> {
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent).ok();
  }

  // Create backup before migrations if database exists
  if path.exists() {
    let backup_path = path.with_extension("db.backup");
    if let Err(e) = std::fs::copy(path, &backup_path) {
      tracing::warn!("Could not create database backup: {}", e);
    }
  }

  let conn = Connection::open(path)?;
  run_migrations(&conn)?;
  Ok(Arc::new(Mutex::new(conn)))
}

/// In-memory database with the full schema, for tests and throwaway runs
pub fn init_memory_db() -> Result<DbPool> {
  let conn = Connection::open_in_memory()?;
  run_migrations(&conn)?;
  Ok(Arc::new(Mutex::new(conn)))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::TestEnv;

  #[test]
  fn test_init_db_creates_parent_and_schema() {
    let env = TestEnv::new().unwrap();
    let path = env.path().join("nested/dir/fridge.db");

    let pool = init_db(&path).unwrap();
    assert!(path.exists());
    let conn = try_lock(&pool).unwrap();
    assert_eq!(count_words(&conn).unwrap(), 0);
  }

  #[test]
  fn test_init_db_backs_up_existing_file() {
    let env = TestEnv::new().unwrap();
    let path = env.path().join("fridge.db");

    drop(init_db(&path).unwrap());
    drop(init_db(&path).unwrap());
    assert!(path.with_extension("db.backup").exists());
  }

  #[test]
  fn test_try_lock_reports_poisoned_mutex() {
    let pool = init_memory_db().unwrap();
    let poisoner = pool.clone();
    let _ = std::thread::spawn(move || {
      let _guard = poisoner.lock().unwrap();
      panic!("poison the pool");
    })
    .join();

    assert!(matches!(try_lock(&pool), Err(StoreError::Unavailable)));
  }

  #[test]
  fn test_log_warn_helpers() {
    let ok: std::result::Result<i32, String> = Ok(3);
    assert_eq!(ok.log_warn("ctx"), Some(3));

    let err: std::result::Result<i32, String> = Err("boom".into());
    assert_eq!(err.log_warn_default("ctx"), 0);
  }
}
