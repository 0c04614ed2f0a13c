use rusqlite::{Connection, Result};

pub fn run_migrations(conn: &Connection) -> Result<()> {
  // Create tables with COMPLETE schema for new databases
  // Migrations below handle upgrades for existing databases
  conn.execute_batch(
    r#"
    CREATE TABLE IF NOT EXISTS words (
      word_id INTEGER PRIMARY KEY AUTOINCREMENT,
      label_en TEXT NOT NULL UNIQUE COLLATE NOCASE,
      native_definition TEXT NOT NULL,
      language_code TEXT NOT NULL DEFAULT 'en',
      translated_word TEXT NOT NULL,
      example_sentence TEXT NOT NULL,
      emoji TEXT NOT NULL DEFAULT '📦',
      image_path TEXT,
      proficiency_level INTEGER NOT NULL DEFAULT 0 CHECK (proficiency_level >= 0),
      review_count INTEGER NOT NULL DEFAULT 0,
      last_reviewed_at TEXT NOT NULL,
      created_at TEXT NOT NULL,
      version INTEGER NOT NULL DEFAULT 0
    );

    -- Indexes
    CREATE INDEX IF NOT EXISTS idx_words_last_reviewed_at ON words(last_reviewed_at);
    "#,
  )?;

  // ============================================================
  // MIGRATIONS FOR EXISTING DATABASES
  // These are no-ops for new databases (columns already exist)
  // ============================================================

  // Migration: image_path arrived with photo capture
  add_column_if_missing(conn, "words", "image_path", "TEXT")?;

  // Migration: version column for compare-and-set review commits
  add_column_if_missing(conn, "words", "version", "INTEGER NOT NULL DEFAULT 0")?;

  // Migration: per-word review counter
  add_column_if_missing(conn, "words", "review_count", "INTEGER NOT NULL DEFAULT 0")?;

  Ok(())
}

/// Check if a column exists in a table
fn column_exists(conn: &Connection, table: &str, column: &str) -> bool {
  conn
    .prepare(&format!("SELECT {} FROM {} LIMIT 1", column, table))
    .is_ok()
}

/// Add a column if it doesn't already exist
fn add_column_if_missing(conn: &Connection, table: &str, column: &str, column_def: &str) -> Result<()> {
  if !column_exists(conn, table, column) {
    conn.execute(
      &format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, column_def),
      [],
    )?;
  }
  Ok(())
}
