//! HTTP surface over the sequenced matching engine.

pub mod book;
pub mod error;
pub mod layers;
pub mod orders;
pub mod users;
pub mod validation;

use crate::config;
use crate::seq::Sequencer;
use axum::routing::get;
use axum::Router;
use std::io;
use tokio::select;
use tokio::signal::unix::signal;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tracing::info;

pub async fn start(cfg: &config::ApiConfig, engine: Sequencer) -> io::Result<()> {
    let app = router(engine);

    let listener = tokio::net::TcpListener::bind((cfg.host.clone(), cfg.port)).await?;
    info!(host = %cfg.host, port = cfg.port, "API listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Assemble the full application router around a shared engine handle.
pub fn router(engine: Sequencer) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(orders::router())
        .merge(users::router())
        .merge(book::router())
        .layer(layers::tracing())
        .layer(PropagateRequestIdLayer::new(layers::REQUEST_ID_HEADER))
        .layer(SetRequestIdLayer::new(
            layers::REQUEST_ID_HEADER,
            layers::MakeRequestUuid,
        ))
        .layer(layers::cors())
        .with_state(engine)
}

async fn health() -> &'static str {
    "ok"
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    let mut terminate = signal(tokio::signal::unix::SignalKind::terminate()).expect(
        "failed to install SIGTERM handler",
    );

    select! {
        _ = ctrl_c => { },
        _ = terminate.recv() => {  }
    }

    info!("shutdown signal received, exiting")
}
