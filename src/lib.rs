use std::path::Path;

use axum::Router;
use sqlx::migrate::Migrator;
use tokio::net::TcpListener;

use crate::error::AppResult;
use crate::model::{DatabaseError, DbConnection, ModelManager};
use crate::utils::signal::shutdown_signal;
use crate::web::AppState;

pub mod config;
pub use config::{Config, ConfigError, ConfigResult};

pub mod error;
pub mod model;
pub mod ordering;
pub mod utils;
pub mod web;

static APPLICATION_NAME: &str = "syllabus";

pub async fn build_server() -> AppResult<(AppState, Router)> {
    let use_local = cfg!(debug_assertions);
    let config = config::Config::get_or_init(use_local).await;
    let db = DbConnection::connect(config.app().database_uri(), config.app().max_connections())?;

    let migrator = Migrator::new(Path::new("./migrations"))
        .await
        .map_err(DatabaseError::from)?;
    tracing::debug!("applying migrations...");
    migrator.run(db.pool()).await.map_err(DatabaseError::from)?;

    build_server_with_pool(db).await
}

pub async fn build_server_with_pool(db: DbConnection) -> AppResult<(AppState, Router)> {
    let config = config::Config::get_or_init(cfg!(debug_assertions)).await;

    let mm = ModelManager::new(db);
    let state = AppState::new(mm, config.app().uploads_dir())?;
    let app = web::routes::build_app(state.clone(), config);
    Ok((state, app))
}

#[tracing::instrument]
pub async fn setup_workers() -> AppResult<()> {
    let (_, app) = build_server().await?;
    let config = Config::get_or_init(cfg!(debug_assertions)).await;
    let listener = TcpListener::bind(config.host().bindto()).await?;

    tracing::info!("axum is starting at: {}", config.host().bindto());
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped.");
    Ok(())
}

fn setup_trace() {
    use tracing_error::ErrorLayer;
    use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

    // load .env file for RUST_LOG etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .with(ErrorLayer::default())
        .init();

    tracing::debug!("tracing initialized.");
}

#[tracing::instrument]
pub async fn run() -> AppResult<()> {
    setup_trace();
    setup_workers().await?;
    Ok(())
}
