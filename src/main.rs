//! ECC Compliance Registry — risk assessment scoring and document lifecycle server.
//!
//! Scores weighted risk questionnaires into per-domain risk levels and tracks
//! policy documents through a guarded approval lifecycle with an append-only
//! audit trail and scannable verification codes.
//!
//! ## Endpoints
//!
//! - `GET  /health`                   — Health check
//! - `GET  /catalogue`                — Built-in risk question catalogue
//! - `POST /assessments`              — Score an answer set, persist per-domain records
//! - `GET  /assessments`              — List assessment records
//! - `POST /documents`                — Create a draft document
//! - `GET  /documents`                — List documents
//! - `GET  /documents/:id`            — Get one document
//! - `POST /documents/:id/submit`     — draft → pending_approval
//! - `POST /documents/:id/approve`    — pending_approval → approved
//! - `POST /documents/:id/implement`  — approved → implemented
//! - `POST /documents/:id/download`   — audit-only export
//! - `PUT  /documents/:id/content`    — edit content, bump version
//! - `POST /verify`                   — verify a scanned code

mod catalogue;
mod error;
mod handlers;
mod handlers_assessments;
mod handlers_documents;
mod lifecycle;
mod models;
mod scoring;
mod store;
mod verify;

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use store::AppState;

/// Build the full application router over a shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/catalogue", get(handlers::get_catalogue))
        .route(
            "/assessments",
            post(handlers_assessments::submit_assessment)
                .get(handlers_assessments::list_assessments),
        )
        .route(
            "/documents",
            post(handlers_documents::create_document).get(handlers_documents::list_documents),
        )
        .route("/documents/:id", get(handlers_documents::get_document))
        .route("/documents/:id/submit", post(handlers_documents::submit_document))
        .route("/documents/:id/approve", post(handlers_documents::approve_document))
        .route("/documents/:id/implement", post(handlers_documents::implement_document))
        .route("/documents/:id/download", post(handlers_documents::download_document))
        .route("/documents/:id/content", put(handlers_documents::update_document_content))
        .route("/verify", post(handlers_documents::verify_document))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "ecc_compliance_registry=debug,info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Open the record stores
    let data_dir = std::env::var("DATA_DIR").unwrap_or_else(|_| "./data".into());
    let state = Arc::new(AppState::open(&data_dir)?);

    let app = router(state);

    let addr = std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:3200".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("compliance registry listening on http://{addr}");

    axum::serve(listener, app).await?;
    Ok(())
}
