//! Handlers for risk assessment submissions.
//!
//! ## Endpoints
//!
//! - `POST /assessments` — Score an answer set and persist per-domain records
//! - `GET  /assessments` — List assessment records (filterable by user_id)

use crate::{
    catalogue,
    error::ComplianceError,
    models::{AssessmentQuery, AssessmentRecord, SubmitAssessmentRequest},
    scoring,
    store::AppState,
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

// ── Submit ────────────────────────────────────────────────────────────────────

/// `POST /assessments` — Score answers against the built-in catalogue.
///
/// Body: `{ "user_id": "u-1", "answers": { "gov-1": "yes", "def-1": "partial" } }`
///
/// One record is persisted per domain; the scoring itself is pure and happens
/// before any store access, so a scoring failure persists nothing.
pub async fn submit_assessment(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SubmitAssessmentRequest>,
) -> Result<(StatusCode, Json<Value>), ComplianceError> {
    if req.user_id.trim().is_empty() {
        return Err(ComplianceError::Validation("user_id must not be empty".into()));
    }

    let questions = catalogue::builtin_catalogue();
    let scores = scoring::score_assessment(&questions, &req.answers)?;

    let completed_at = Utc::now();
    let records: Vec<AssessmentRecord> = scores
        .into_iter()
        .map(|s| AssessmentRecord {
            id: Uuid::new_v4(),
            user_id: req.user_id.clone(),
            domain: s.domain,
            score: s.score,
            risk_level: s.risk_level,
            completed_at,
        })
        .collect();

    let persisted = records.clone();
    state
        .assessments
        .mutate(move |all| {
            all.extend(records);
            Ok(())
        })
        .await?;

    tracing::info!(
        "assessment scored for {}: {} domain(s)",
        req.user_id,
        persisted.len()
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "user_id": req.user_id,
            "count": persisted.len(),
            "results": persisted,
        })),
    ))
}

// ── List ──────────────────────────────────────────────────────────────────────

/// `GET /assessments` — List stored assessment records, optionally filtered
/// by `user_id`.
pub async fn list_assessments(
    State(state): State<Arc<AppState>>,
    Query(q): Query<AssessmentQuery>,
) -> Json<Value> {
    let mut records = state.assessments.read().await;
    if let Some(user_id) = &q.user_id {
        records.retain(|r| &r.user_id == user_id);
    }

    Json(json!({
        "count": records.len(),
        "assessments": records,
    }))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use crate::store::AppState;
    use axum_test::TestServer;
    use serde_json::json;
    use std::sync::Arc;

    fn test_server() -> (TestServer, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let state = Arc::new(AppState::open(dir.path()).unwrap());
        (TestServer::new(crate::router(state)).unwrap(), dir)
    }

    #[tokio::test]
    async fn submitting_answers_persists_one_record_per_domain() {
        let (server, _dir) = test_server();

        let resp = server
            .post("/assessments")
            .json(&json!({
                "user_id": "u-1",
                "answers": { "gov-1": "yes", "gov-2": "partial", "def-1": "no" }
            }))
            .await;
        resp.assert_status(axum::http::StatusCode::CREATED);

        let body = resp.json::<serde_json::Value>();
        let results = body["results"].as_array().unwrap();
        // Every catalogue domain is scored, answered or not.
        assert_eq!(
            body["count"].as_u64().unwrap() as usize,
            results.len()
        );
        assert!(results.iter().any(|r| r["domain"] == "Governance"));

        let listed = server.get("/assessments").await.json::<serde_json::Value>();
        assert_eq!(listed["count"], body["count"]);
    }

    #[tokio::test]
    async fn listing_filters_by_user() {
        let (server, _dir) = test_server();

        for user in ["u-1", "u-2"] {
            server
                .post("/assessments")
                .json(&json!({ "user_id": user, "answers": { "gov-1": "yes" } }))
                .await
                .assert_status(axum::http::StatusCode::CREATED);
        }

        let body = server
            .get("/assessments")
            .add_query_param("user_id", "u-2")
            .await
            .json::<serde_json::Value>();
        let records = body["assessments"].as_array().unwrap();
        assert!(!records.is_empty());
        assert!(records.iter().all(|r| r["user_id"] == "u-2"));
    }

    #[tokio::test]
    async fn blank_user_id_is_rejected() {
        let (server, _dir) = test_server();
        let resp = server
            .post("/assessments")
            .json(&json!({ "user_id": "  ", "answers": {} }))
            .await;
        resp.assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);
    }
}
