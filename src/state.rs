//! Application state shared by all handlers.

use std::sync::Arc;

use crate::engine::ProgressionEngine;
use crate::session::ChallengeRegistry;
use crate::store::SqliteWordStore;

pub type FridgeEngine = ProgressionEngine<SqliteWordStore>;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<FridgeEngine>,

    /// Quizzes handed out and not yet answered
    pub challenges: Arc<ChallengeRegistry>,
}

impl AppState {
    pub fn new(engine: FridgeEngine) -> Self {
        let ttl = engine.config().quiz.challenge_ttl();
        Self {
            engine: Arc::new(engine),
            challenges: Arc::new(ChallengeRegistry::new(ttl)),
        }
    }
}
