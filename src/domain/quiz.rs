use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{WordItem, WordView};

/// One selectable answer in a multiple choice quiz
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOption {
  pub word_id: i64,
  pub text: String,
}

impl QuizOption {
  /// Options show the native definition, or the English label if it is blank.
  pub fn for_item(item: &WordItem) -> Self {
    let text = if item.native_definition.trim().is_empty() {
      item.label_en.clone()
    } else {
      item.native_definition.clone()
    };
    Self {
      word_id: item.word_id,
      text,
    }
  }
}

/// A generated quiz, including the answer key.
///
/// Only [`QuizView`] is meant to leave the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizChallenge {
  pub correct_id: i64,
  pub prompt: String,
  pub options: Vec<QuizOption>,
  /// Target's proficiency level when the quiz was generated
  pub issued_level: u32,
  /// Target's last review time when the quiz was generated
  pub issued_reviewed_at: DateTime<Utc>,
}

impl QuizChallenge {
  pub fn is_correct(&self, selected_word_id: i64) -> bool {
    selected_word_id == self.correct_id
  }

  pub fn view(&self, challenge_id: &str) -> QuizView {
    QuizView {
      challenge_id: challenge_id.to_string(),
      question: self.prompt.clone(),
      options: self.options.clone(),
    }
  }
}

/// Client-facing quiz: no answer key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizView {
  pub challenge_id: String,
  pub question: String,
  pub options: Vec<QuizOption>,
}

/// Result of submitting an answer to a challenge
#[derive(Debug, Clone, Serialize)]
pub struct AnswerOutcome {
  pub correct: bool,
  pub xp_delta: u64,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub updated_item: Option<WordView>,
}

impl AnswerOutcome {
  pub fn wrong() -> Self {
    Self {
      correct: false,
      xp_delta: 0,
      updated_item: None,
    }
  }
}
