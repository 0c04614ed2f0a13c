//! Word catalog row operations

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Result};

use crate::domain::{ReviewUpdate, WordDetails, WordItem};

const WORD_COLUMNS: &str = r#"
    word_id, label_en, native_definition, language_code, translated_word, example_sentence,
    emoji, image_path, proficiency_level, last_reviewed_at, created_at, version, review_count
"#;

pub fn insert_word(conn: &Connection, details: &WordDetails, now: DateTime<Utc>) -> Result<WordItem> {
    let now_str = now.to_rfc3339();
    conn.execute(
        r#"
    INSERT INTO words (label_en, native_definition, language_code, translated_word, example_sentence,
                       emoji, image_path, proficiency_level, last_reviewed_at, created_at, version)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, ?8, ?8, 0)
    "#,
        params![
            details.label_en,
            details.native_definition,
            details.language_code,
            details.translated_word,
            details.example_sentence,
            details.emoji,
            details.image_path,
            now_str,
        ],
    )?;
    Ok(WordItem::from_details(conn.last_insert_rowid(), details, now))
}

pub fn get_word_by_id(conn: &Connection, word_id: i64) -> Result<Option<WordItem>> {
    let query = format!("SELECT {} FROM words WHERE word_id = ?1", WORD_COLUMNS);
    conn.query_row(&query, params![word_id], row_to_word).optional()
}

/// Labels are unique case-insensitively
pub fn find_word_by_label(conn: &Connection, label_en: &str) -> Result<Option<WordItem>> {
    let query = format!(
        "SELECT {} FROM words WHERE label_en = ?1 COLLATE NOCASE",
        WORD_COLUMNS
    );
    conn.query_row(&query, params![label_en], row_to_word).optional()
}

pub fn list_words(conn: &Connection) -> Result<Vec<WordItem>> {
    let query = format!("SELECT {} FROM words ORDER BY word_id ASC", WORD_COLUMNS);
    let mut stmt = conn.prepare(&query)?;
    let words = stmt
        .query_map([], row_to_word)?
        .collect::<Result<Vec<_>>>()?;
    Ok(words)
}

pub fn count_words(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM words", [], |row| row.get(0))
}

/// Refresh translation fields of an existing word. Review state is untouched.
pub fn update_word_details(
    conn: &Connection,
    word_id: i64,
    details: &WordDetails,
) -> Result<Option<WordItem>> {
    let updated = conn.execute(
        r#"
    UPDATE words
    SET native_definition = ?1, language_code = ?2, translated_word = ?3,
        example_sentence = ?4, emoji = ?5, image_path = COALESCE(?6, image_path),
        version = version + 1
    WHERE word_id = ?7
    "#,
        params![
            details.native_definition,
            details.language_code,
            details.translated_word,
            details.example_sentence,
            details.emoji,
            details.image_path,
            word_id,
        ],
    )?;

    if updated == 0 {
        return Ok(None);
    }
    get_word_by_id(conn, word_id)
}

/// Write a review only if the row still carries `expected_version`.
///
/// Returns `None` when the version moved on (or the word is gone).
pub fn compare_and_set_review(
    conn: &Connection,
    word_id: i64,
    expected_version: i64,
    update: &ReviewUpdate,
) -> Result<Option<WordItem>> {
    let updated = conn.execute(
        r#"
    UPDATE words
    SET proficiency_level = ?1, last_reviewed_at = ?2,
        review_count = review_count + 1, version = version + 1
    WHERE word_id = ?3 AND version = ?4
    "#,
        params![
            update.proficiency_level,
            update.last_reviewed_at.to_rfc3339(),
            word_id,
            expected_version,
        ],
    )?;

    if updated == 0 {
        return Ok(None);
    }
    get_word_by_id(conn, word_id)
}

/// Insert a new word, or refresh the details of the word already holding
/// this label. Returns the stored item and whether it was newly created.
///
/// The caller must hold the connection for the whole call so no other
/// capture can slip in between the lookup and the write.
pub fn upsert_word(
    conn: &Connection,
    details: &WordDetails,
    now: DateTime<Utc>,
) -> Result<(WordItem, bool)> {
    match find_word_by_label(conn, &details.label_en)? {
        Some(existing) => {
            let refreshed = update_word_details(conn, existing.word_id, details)?
                .ok_or(rusqlite::Error::QueryReturnedNoRows)?;
            Ok((refreshed, false))
        }
        None => Ok((insert_word(conn, details, now)?, true)),
    }
}

fn parse_timestamp(row: &rusqlite::Row, idx: usize) -> Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Convert a database row to WordItem
fn row_to_word(row: &rusqlite::Row) -> Result<WordItem> {
    Ok(WordItem {
        word_id: row.get(0)?,
        label_en: row.get(1)?,
        native_definition: row.get(2)?,
        language_code: row.get(3)?,
        translated_word: row.get(4)?,
        example_sentence: row.get(5)?,
        emoji: row.get(6)?,
        image_path: row.get(7)?,
        proficiency_level: row.get(8)?,
        last_reviewed_at: parse_timestamp(row, 9)?,
        created_at: parse_timestamp(row, 10)?,
        version: row.get(11)?,
        review_count: row.get(12)?,
    })
}
