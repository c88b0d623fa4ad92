//! Service-level Axum handlers.

use crate::catalogue;
use axum::Json;
use serde_json::{json, Value};

// ── Health ────────────────────────────────────────────────────────────────────

/// `GET /health` — Health check
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "ecc-compliance-registry",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// ── Catalogue ─────────────────────────────────────────────────────────────────

/// `GET /catalogue` — The built-in risk assessment question catalogue.
pub async fn get_catalogue() -> Json<Value> {
    let questions = catalogue::builtin_catalogue();
    Json(json!({
        "count": questions.len(),
        "questions": questions,
    }))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
