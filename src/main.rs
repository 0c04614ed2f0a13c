use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use word_fridge::config::AppConfig;
use word_fridge::db::{self, LogOnError};
use word_fridge::engine::ProgressionEngine;
use word_fridge::handlers;
use word_fridge::state::AppState;
use word_fridge::store::SqliteWordStore;

#[tokio::main]
async fn main() -> ExitCode {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "word_fridge=debug,tower_http=debug".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let config = match AppConfig::load() {
    Ok(config) => config,
    Err(e) => {
      tracing::error!("Invalid configuration: {}", e);
      return ExitCode::FAILURE;
    }
  };

  let db_path = config.database_path();
  let pool = match db::init_db(&db_path) {
    Ok(pool) => pool,
    Err(e) => {
      tracing::error!("Failed to initialize database at {}: {}", db_path.display(), e);
      return ExitCode::FAILURE;
    }
  };

  if let Ok(conn) = db::try_lock(&pool) {
    let words = db::count_words(&conn).log_warn_default("Failed to count words");
    tracing::info!("Opened {} with {} words in the fridge", db_path.display(), words);
  }

  let engine = ProgressionEngine::new(SqliteWordStore::new(pool), config.progression());
  let app = handlers::router(AppState::new(engine));

  let bind_addr = config.server_bind_addr();
  let listener = match tokio::net::TcpListener::bind(&bind_addr).await {
    Ok(listener) => listener,
    Err(e) => {
      tracing::error!("Failed to bind to {}: {}", bind_addr, e);
      return ExitCode::FAILURE;
    }
  };

  tracing::info!("Server running on http://{}", bind_addr);

  if let Err(e) = axum::serve(listener, app).await {
    tracing::error!("Server error: {}", e);
    return ExitCode::FAILURE;
  }
  ExitCode::SUCCESS
}
