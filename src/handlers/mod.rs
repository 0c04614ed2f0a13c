//! JSON HTTP surface over the progression engine.

pub mod fridge;
pub mod stats;

use axum::{
  extract::rejection::{JsonRejection, PathRejection, QueryRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
  routing::{get, post},
  Json, Router,
};
use tower_http::trace::TraceLayer;

use crate::error::EngineError;
use crate::state::AppState;

pub use fridge::{answer_quiz, capture_item, get_item, list_items, quiz_by_word};
pub use stats::user_stats;

/// Error returned by handlers, rendered as `{"error": "..."}`
#[derive(Debug)]
pub enum ApiError {
  Engine(EngineError),
  /// Challenge id unknown, already answered or expired
  ChallengeNotFound,
  /// Malformed path, query string or body
  Rejected { status: StatusCode, message: String },
}

macro_rules! impl_from_rejection {
  ($($rejection:ty),*) => {
    $(
      impl From<$rejection> for ApiError {
        fn from(rejection: $rejection) -> Self {
          ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
          }
        }
      }
    )*
  };
}

impl_from_rejection!(JsonRejection, PathRejection, QueryRejection);

impl From<EngineError> for ApiError {
  fn from(err: EngineError) -> Self {
    ApiError::Engine(err)
  }
}

impl ApiError {
  fn status(&self) -> StatusCode {
    match self {
      ApiError::ChallengeNotFound => StatusCode::NOT_FOUND,
      ApiError::Rejected { status, .. } => *status,
      ApiError::Engine(err) => match err {
        EngineError::NotFound(_) => StatusCode::NOT_FOUND,
        EngineError::InsufficientCatalog { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        EngineError::InvalidOptionCount(_) | EngineError::Validation(_) => StatusCode::BAD_REQUEST,
        EngineError::ConcurrentModification(_) => StatusCode::CONFLICT,
        EngineError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
      },
    }
  }

  fn message(&self) -> String {
    match self {
      ApiError::ChallengeNotFound => "Quiz not found or already answered".to_string(),
      ApiError::Rejected { message, .. } => message.clone(),
      // Database details stay in the logs
      ApiError::Engine(EngineError::Store(_)) => "Database error".to_string(),
      ApiError::Engine(err) => err.to_string(),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!("Request failed: {:?}", self);
    }
    (status, Json(serde_json::json!({ "error": self.message() }))).into_response()
  }
}

pub async fn health() -> &'static str {
  "ok"
}

pub fn router(state: AppState) -> Router {
  Router::new()
    .route("/health", get(health))
    .route("/api/fridge/items", get(list_items).post(capture_item))
    .route("/api/fridge/items/{word_id}", get(get_item))
    .route("/api/fridge/quiz-by-word/{word_id}", get(quiz_by_word))
    .route("/api/fridge/quiz/{challenge_id}/answer", post(answer_quiz))
    .route("/api/stats", get(user_stats))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
