//! Fridge items and quizzes.

use axum::{
  extract::{
    rejection::{JsonRejection, PathRejection, QueryRejection},
    Path, Query, State,
  },
  http::StatusCode,
  response::IntoResponse,
  Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::domain::{AnswerOutcome, NewWord, QuizView, WordView};
use crate::state::AppState;

use super::ApiError;

/// GET /api/fridge/items
pub async fn list_items(State(state): State<AppState>) -> Result<Json<Vec<WordView>>, ApiError> {
  Ok(Json(state.engine.list_items(Utc::now())?))
}

/// POST /api/fridge/items
pub async fn capture_item(
  State(state): State<AppState>,
  payload: Result<Json<NewWord>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Json(new_word) = payload?;
  let now = Utc::now();
  let item = state.engine.capture(&new_word, now)?;
  Ok((StatusCode::CREATED, Json(state.engine.view(&item, now))))
}

/// GET /api/fridge/items/{word_id}
pub async fn get_item(
  State(state): State<AppState>,
  word_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<WordView>, ApiError> {
  let Path(word_id) = word_id?;
  Ok(Json(state.engine.get_item(word_id, Utc::now())?))
}

#[derive(Debug, Deserialize)]
pub struct QuizQuery {
  /// Number of options; the configured default when absent
  pub options: Option<usize>,
}

/// GET /api/fridge/quiz-by-word/{word_id}?options=k
pub async fn quiz_by_word(
  State(state): State<AppState>,
  word_id: Result<Path<i64>, PathRejection>,
  query: Result<Query<QuizQuery>, QueryRejection>,
) -> Result<Json<QuizView>, ApiError> {
  let Path(word_id) = word_id?;
  let Query(query) = query?;
  let challenge = {
    let mut rng = rand::rng();
    state.engine.generate_quiz_for(word_id, query.options, &mut rng)?
  };
  let challenge_id = state.challenges.issue(challenge.clone(), Utc::now());
  tracing::debug!("Issued quiz {} for word {}", challenge_id, word_id);
  Ok(Json(challenge.view(&challenge_id)))
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
  pub selected_word_id: i64,
}

/// POST /api/fridge/quiz/{challenge_id}/answer
///
/// Each challenge accepts exactly one answer, right or wrong.
pub async fn answer_quiz(
  State(state): State<AppState>,
  Path(challenge_id): Path<String>,
  answer: Result<Json<AnswerRequest>, JsonRejection>,
) -> Result<Json<AnswerOutcome>, ApiError> {
  let Json(answer) = answer?;
  let now = Utc::now();
  let challenge = state
    .challenges
    .redeem(&challenge_id, now)
    .ok_or(ApiError::ChallengeNotFound)?;

  let outcome = state
    .engine
    .submit_answer(&challenge, answer.selected_word_id, now)?;
  Ok(Json(outcome))
}
