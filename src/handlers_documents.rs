//! Handlers for the document lifecycle.
//!
//! ## Endpoints
//!
//! - `POST /documents`                — Create a document (status: draft)
//! - `GET  /documents`                — List documents
//! - `GET  /documents/:id`            — Get a single document
//! - `POST /documents/:id/submit`     — draft → pending_approval
//! - `POST /documents/:id/approve`    — pending_approval → approved
//! - `POST /documents/:id/implement`  — approved → implemented
//! - `POST /documents/:id/download`   — audit-only export
//! - `PUT  /documents/:id/content`    — edit content, bump version
//! - `POST /verify`                   — check a scanned verification code

use crate::{
    error::ComplianceError,
    lifecycle,
    models::{
        ActorRequest, ApproveRequest, CreateDocumentRequest, DocumentMetadata,
        UpdateContentRequest, VerificationReport, VerifyRequest,
    },
    store::AppState,
    verify,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

/// Run a fallible edit against one document inside the store's critical
/// section. Rejected edits (bad state, unknown id) leave the array untouched.
async fn with_document<R>(
    state: &AppState,
    id: Uuid,
    f: impl FnOnce(&mut DocumentMetadata) -> Result<R, ComplianceError>,
) -> Result<R, ComplianceError> {
    state
        .documents
        .mutate(|docs| {
            let doc = docs
                .iter_mut()
                .find(|d| d.id == id)
                .ok_or(ComplianceError::DocumentNotFound(id))?;
            f(doc)
        })
        .await
}

// ── Create ────────────────────────────────────────────────────────────────────

/// `POST /documents` — Create a new draft document.
///
/// Body: `{ "title", "type", "category", "content", "actor" }`
pub async fn create_document(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateDocumentRequest>,
) -> Result<(StatusCode, Json<DocumentMetadata>), ComplianceError> {
    if req.title.trim().is_empty() {
        return Err(ComplianceError::Validation("title must not be empty".into()));
    }
    if req.content.trim().is_empty() {
        return Err(ComplianceError::Validation("content must not be empty".into()));
    }

    let doc = lifecycle::create_document(req.title, req.doc_type, req.category, req.content, req.actor);
    let stored = doc.clone();
    state
        .documents
        .mutate(move |docs| {
            docs.push(stored);
            Ok(())
        })
        .await?;

    tracing::info!("document created: {} '{}'", doc.id, doc.title);
    Ok((StatusCode::CREATED, Json(doc)))
}

// ── Read ──────────────────────────────────────────────────────────────────────

/// `GET /documents` — List all documents.
pub async fn list_documents(State(state): State<Arc<AppState>>) -> Json<Value> {
    let docs = state.documents.read().await;
    Json(json!({
        "count": docs.len(),
        "documents": docs,
    }))
}

/// `GET /documents/:id` — Get a single document by id.
pub async fn get_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DocumentMetadata>, ComplianceError> {
    let doc = state
        .documents
        .read()
        .await
        .into_iter()
        .find(|d| d.id == id)
        .ok_or(ComplianceError::DocumentNotFound(id))?;
    Ok(Json(doc))
}

// ── Lifecycle transitions ─────────────────────────────────────────────────────

/// `POST /documents/:id/submit` — Send a draft to the approval queue.
pub async fn submit_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<ActorRequest>,
) -> Result<Json<Value>, ComplianceError> {
    let status = with_document(&state, id, |doc| {
        lifecycle::submit_for_approval(doc, &req.actor)?;
        Ok(doc.status)
    })
    .await?;

    tracing::info!("document {id} submitted for approval by {}", req.actor);
    Ok(Json(json!({ "id": id, "status": status })))
}

/// `POST /documents/:id/approve` — Approve a pending document.
///
/// Body: `{ "approver_role": "CEO" }`
pub async fn approve_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<ApproveRequest>,
) -> Result<Json<Value>, ComplianceError> {
    let (status, signature_hash) = with_document(&state, id, |doc| {
        lifecycle::approve(doc, &req.approver_role)?;
        Ok((doc.status, doc.signature_hash.clone()))
    })
    .await?;

    tracing::info!("document {id} approved by {}", req.approver_role);
    Ok(Json(json!({
        "id": id,
        "status": status,
        "approver": req.approver_role,
        "signature_hash": signature_hash,
    })))
}

/// `POST /documents/:id/implement` — Mark an approved document implemented.
pub async fn implement_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<ActorRequest>,
) -> Result<Json<Value>, ComplianceError> {
    let (status, effectiveness) = with_document(&state, id, |doc| {
        lifecycle::implement(doc, &req.actor)?;
        Ok((doc.status, doc.effectiveness_score))
    })
    .await?;

    tracing::info!("document {id} implemented by {}", req.actor);
    Ok(Json(json!({
        "id": id,
        "status": status,
        "implementation_progress": 100,
        "effectiveness_score": effectiveness,
    })))
}

// ── Download ──────────────────────────────────────────────────────────────────

/// `POST /documents/:id/download` — Export the content. State is unchanged;
/// the only side effect is the audit event.
pub async fn download_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<ActorRequest>,
) -> Result<Json<Value>, ComplianceError> {
    let (title, version, content) = with_document(&state, id, |doc| {
        lifecycle::record_download(doc, &req.actor);
        Ok((doc.title.clone(), doc.version, doc.content.clone()))
    })
    .await?;

    Ok(Json(json!({
        "id": id,
        "title": title,
        "version": version,
        "content": content,
    })))
}

// ── Edit ──────────────────────────────────────────────────────────────────────

/// `PUT /documents/:id/content` — Replace the content: rehash, regenerate
/// codes, bump the minor version.
pub async fn update_document_content(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateContentRequest>,
) -> Result<Json<Value>, ComplianceError> {
    if req.content.trim().is_empty() {
        return Err(ComplianceError::Validation("content must not be empty".into()));
    }

    let (version, document_hash) = with_document(&state, id, |doc| {
        lifecycle::update_content(doc, req.content.clone(), &req.actor);
        Ok((doc.version, doc.document_hash.clone()))
    })
    .await?;

    Ok(Json(json!({
        "id": id,
        "version": version,
        "document_hash": document_hash,
    })))
}

// ── Verify ────────────────────────────────────────────────────────────────────

/// `POST /verify` — Check a scanned QR/barcode string against the stored
/// records. A hash mismatch yields `authentic: false`, not an error status;
/// unreadable codes are 400 and unknown ids 404.
pub async fn verify_document(
    State(state): State<Arc<AppState>>,
    Json(req): Json<VerifyRequest>,
) -> Result<Json<VerificationReport>, ComplianceError> {
    let docs = state.documents.read().await;
    let report = verify::verify_document(&docs, &req.code)?;

    if !report.authentic {
        tracing::warn!("verification failed for document {}", report.document_id);
    }
    Ok(Json(report))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use crate::store::AppState;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn test_server() -> (TestServer, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let state = Arc::new(AppState::open(dir.path()).unwrap());
        (TestServer::new(crate::router(state)).unwrap(), dir)
    }

    async fn create_draft(server: &TestServer) -> Value {
        let resp = server
            .post("/documents")
            .json(&json!({
                "title": "Data Retention Policy",
                "type": "Policy",
                "category": "Governance",
                "content": "Retain records for seven years.",
                "actor": "alice",
            }))
            .await;
        resp.assert_status(StatusCode::CREATED);
        resp.json::<Value>()
    }

    #[tokio::test]
    async fn full_lifecycle_over_http() {
        let (server, _dir) = test_server();
        let doc = create_draft(&server).await;
        let id = doc["id"].as_str().unwrap().to_string();
        assert_eq!(doc["status"], "draft");
        assert_eq!(doc["version"], "1.0");
        assert_eq!(doc["audit_trail"].as_array().unwrap().len(), 1);

        let resp = server
            .post(&format!("/documents/{id}/submit"))
            .json(&json!({ "actor": "alice" }))
            .await;
        resp.assert_status_ok();
        assert_eq!(resp.json::<Value>()["status"], "pending_approval");

        let resp = server
            .post(&format!("/documents/{id}/approve"))
            .json(&json!({ "approver_role": "CEO" }))
            .await;
        resp.assert_status_ok();
        let body = resp.json::<Value>();
        assert_eq!(body["status"], "approved");
        assert!(!body["signature_hash"].as_str().unwrap().is_empty());

        let resp = server
            .post(&format!("/documents/{id}/implement"))
            .json(&json!({ "actor": "alice" }))
            .await;
        resp.assert_status_ok();
        let body = resp.json::<Value>();
        assert_eq!(body["status"], "implemented");
        assert_eq!(body["implementation_progress"], 100);

        let stored = server.get(&format!("/documents/{id}")).await.json::<Value>();
        assert_eq!(stored["audit_trail"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn approving_a_draft_is_a_conflict() {
        let (server, _dir) = test_server();
        let doc = create_draft(&server).await;
        let id = doc["id"].as_str().unwrap();

        let resp = server
            .post(&format!("/documents/{id}/approve"))
            .json(&json!({ "approver_role": "CEO" }))
            .await;
        resp.assert_status(StatusCode::CONFLICT);

        // Rejection must not grow the audit trail.
        let stored = server.get(&format!("/documents/{id}")).await.json::<Value>();
        assert_eq!(stored["audit_trail"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn download_keeps_hash_and_adds_audit_event() {
        let (server, _dir) = test_server();
        let doc = create_draft(&server).await;
        let id = doc["id"].as_str().unwrap();
        let hash_before = doc["document_hash"].as_str().unwrap().to_string();

        let resp = server
            .post(&format!("/documents/{id}/download"))
            .json(&json!({ "actor": "bob" }))
            .await;
        resp.assert_status_ok();
        assert_eq!(resp.json::<Value>()["content"], "Retain records for seven years.");

        let stored = server.get(&format!("/documents/{id}")).await.json::<Value>();
        assert_eq!(stored["document_hash"], hash_before.as_str());
        assert_eq!(stored["status"], "draft");
        assert_eq!(stored["audit_trail"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn content_edit_bumps_version_and_rehashes() {
        let (server, _dir) = test_server();
        let doc = create_draft(&server).await;
        let id = doc["id"].as_str().unwrap();
        let hash_before = doc["document_hash"].as_str().unwrap().to_string();

        let resp = server
            .put(&format!("/documents/{id}/content"))
            .json(&json!({ "content": "Retain records for ten years.", "actor": "alice" }))
            .await;
        resp.assert_status_ok();
        let body = resp.json::<Value>();
        assert_eq!(body["version"], "1.1");
        assert_ne!(body["document_hash"].as_str().unwrap(), hash_before);
    }

    #[tokio::test]
    async fn verify_distinguishes_authentic_mismatch_not_found_and_garbage() {
        let (server, _dir) = test_server();
        let doc = create_draft(&server).await;
        let qr = doc["qr_code"].as_str().unwrap();

        // Authentic codes — both scannable forms.
        let resp = server.post("/verify").json(&json!({ "code": qr })).await;
        resp.assert_status_ok();
        assert_eq!(resp.json::<Value>()["authentic"], true);

        let barcode = doc["barcode"].as_str().unwrap();
        let resp = server.post("/verify").json(&json!({ "code": barcode })).await;
        resp.assert_status_ok();
        assert_eq!(resp.json::<Value>()["authentic"], true);

        // Same document, wrong hash: still 200, but not authentic.
        let forged = json!({
            "id": doc["id"],
            "hash": "0000",
            "timestamp": 0,
        })
        .to_string();
        let resp = server.post("/verify").json(&json!({ "code": forged })).await;
        resp.assert_status_ok();
        assert_eq!(resp.json::<Value>()["authentic"], false);

        // Unknown id: not found.
        let stray = json!({
            "id": uuid::Uuid::new_v4(),
            "hash": doc["document_hash"],
            "timestamp": 0,
        })
        .to_string();
        let resp = server.post("/verify").json(&json!({ "code": stray })).await;
        resp.assert_status(StatusCode::NOT_FOUND);

        // Garbage: bad request, the user should rescan.
        let resp = server.post("/verify").json(&json!({ "code": "???" })).await;
        resp.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_document_is_not_found() {
        let (server, _dir) = test_server();
        let id = uuid::Uuid::new_v4();
        let resp = server
            .post(&format!("/documents/{id}/submit"))
            .json(&json!({ "actor": "alice" }))
            .await;
        resp.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn empty_title_is_rejected() {
        let (server, _dir) = test_server();
        let resp = server
            .post("/documents")
            .json(&json!({
                "title": " ",
                "type": "Policy",
                "category": "Governance",
                "content": "x",
                "actor": "alice",
            }))
            .await;
        resp.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }
}
