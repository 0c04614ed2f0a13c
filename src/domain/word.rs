use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Emoji shown when the capture service did not supply one
pub const DEFAULT_EMOJI: &str = "📦";

/// Example sentence used when the capture service returned none
pub const DEFAULT_EXAMPLE_SENTENCE: &str = "No example available.";

/// Language code used when the capture payload omits one
pub const DEFAULT_LANGUAGE_CODE: &str = "en";

/// Staleness of a word, ordered from best to worst.
///
/// Never stored: always derived from `last_reviewed_at` and
/// `proficiency_level` at read time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Freshness {
  Fresh,
  Warning,
  Rotten,
}

impl Freshness {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Fresh => "FRESH",
      Self::Warning => "WARNING",
      Self::Rotten => "ROTTEN",
    }
  }

  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "FRESH" => Some(Self::Fresh),
      "WARNING" => Some(Self::Warning),
      "ROTTEN" => Some(Self::Rotten),
      _ => None,
    }
  }
}

/// A captured vocabulary entry as held by the catalog store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordItem {
  pub word_id: i64,
  pub label_en: String,
  pub native_definition: String,
  pub language_code: String,
  pub translated_word: String,
  pub example_sentence: String,
  pub emoji: String,
  pub image_path: Option<String>,
  pub proficiency_level: u32,
  /// Successful review commits so far
  pub review_count: u32,
  pub last_reviewed_at: DateTime<Utc>,
  pub created_at: DateTime<Utc>,
  /// Bumped on every write; the compare-and-set token for conditional updates
  pub version: i64,
}

impl WordItem {
  /// Build a fresh, never-reviewed item from normalized capture details.
  pub fn from_details(word_id: i64, details: &WordDetails, now: DateTime<Utc>) -> Self {
    Self {
      word_id,
      label_en: details.label_en.clone(),
      native_definition: details.native_definition.clone(),
      language_code: details.language_code.clone(),
      translated_word: details.translated_word.clone(),
      example_sentence: details.example_sentence.clone(),
      emoji: details.emoji.clone(),
      image_path: details.image_path.clone(),
      proficiency_level: 0,
      review_count: 0,
      last_reviewed_at: now,
      created_at: now,
      version: 0,
    }
  }

  /// Overwrite the translation fields. Review state is left untouched, and
  /// an existing image is kept when the refresh carries none.
  pub fn apply_details(&mut self, details: &WordDetails) {
    self.native_definition = details.native_definition.clone();
    self.language_code = details.language_code.clone();
    self.translated_word = details.translated_word.clone();
    self.example_sentence = details.example_sentence.clone();
    self.emoji = details.emoji.clone();
    if details.image_path.is_some() {
      self.image_path = details.image_path.clone();
    }
  }

  pub fn apply_review(&mut self, update: &ReviewUpdate) {
    self.proficiency_level = update.proficiency_level;
    self.last_reviewed_at = update.last_reviewed_at;
    self.review_count = self.review_count.saturating_add(1);
  }
}

/// New review state written by a review commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewUpdate {
  pub proficiency_level: u32,
  pub last_reviewed_at: DateTime<Utc>,
}

/// Capture payload as produced by the external capture flow.
///
/// Everything except the English label is optional; gaps are filled with
/// defaults by [`NewWord::normalize`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewWord {
  pub label_en: String,
  #[serde(default)]
  pub native_definition: Option<String>,
  #[serde(default)]
  pub language_code: Option<String>,
  #[serde(default)]
  pub translated_word: Option<String>,
  #[serde(default)]
  pub example_sentence: Option<String>,
  #[serde(default)]
  pub emoji: Option<String>,
  #[serde(default)]
  pub image_path: Option<String>,
}

/// Capture payload after trimming and defaulting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordDetails {
  pub label_en: String,
  pub native_definition: String,
  pub language_code: String,
  pub translated_word: String,
  pub example_sentence: String,
  pub emoji: String,
  pub image_path: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<String> {
  value
    .as_deref()
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(str::to_string)
}

impl NewWord {
  pub fn new(label_en: impl Into<String>) -> Self {
    Self {
      label_en: label_en.into(),
      ..Self::default()
    }
  }

  /// Validate the payload and fill in defaults for missing fields.
  pub fn normalize(&self) -> Result<WordDetails, String> {
    let label_en = self.label_en.trim();
    if label_en.is_empty() {
      return Err("label_en must not be empty".to_string());
    }

    Ok(WordDetails {
      label_en: label_en.to_string(),
      native_definition: non_blank(&self.native_definition).unwrap_or_else(|| label_en.to_string()),
      language_code: non_blank(&self.language_code)
        .map(|code| code.to_lowercase())
        .unwrap_or_else(|| DEFAULT_LANGUAGE_CODE.to_string()),
      translated_word: non_blank(&self.translated_word).unwrap_or_else(|| label_en.to_string()),
      example_sentence: non_blank(&self.example_sentence)
        .unwrap_or_else(|| DEFAULT_EXAMPLE_SENTENCE.to_string()),
      emoji: non_blank(&self.emoji).unwrap_or_else(|| DEFAULT_EMOJI.to_string()),
      image_path: non_blank(&self.image_path),
    })
  }
}

/// Read model returned to callers: the item plus its derived freshness.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordView {
  pub word_id: i64,
  pub label_en: String,
  pub proficiency_level: u32,
  pub review_count: u32,
  pub freshness: Freshness,
  pub days_since_review: i64,
  pub native_definition: String,
  pub language_code: String,
  pub translated_word: String,
  pub example_sentence: String,
  pub emoji: String,
  pub image_path: Option<String>,
  pub last_reviewed_at: DateTime<Utc>,
  pub created_at: DateTime<Utc>,
}

impl WordView {
  pub fn new(item: &WordItem, freshness: Freshness, days_since_review: i64) -> Self {
    Self {
      word_id: item.word_id,
      label_en: item.label_en.clone(),
      proficiency_level: item.proficiency_level,
      review_count: item.review_count,
      freshness,
      days_since_review,
      native_definition: item.native_definition.clone(),
      language_code: item.language_code.clone(),
      translated_word: item.translated_word.clone(),
      example_sentence: item.example_sentence.clone(),
      emoji: item.emoji.clone(),
      image_path: item.image_path.clone(),
      last_reviewed_at: item.last_reviewed_at,
      created_at: item.created_at,
    }
  }
}
