//! Document lifecycle state machine.
//!
//! `Draft → PendingApproval → Approved → Implemented`, one-way, no rollback.
//! Every transition validates the current state before touching the document,
//! so a rejected call leaves both the metadata and the audit trail untouched.
//! Download and content edits are allowed from any state; a download changes
//! nothing but the audit trail, an edit bumps the minor version and
//! regenerates the hash and codes.

use crate::error::ComplianceError;
use crate::models::{AuditAction, AuditEvent, DocumentMetadata, DocumentStatus, Version};
use crate::verify;
use chrono::Utc;
use uuid::Uuid;

/// Create a new document in `Draft` with its hash, codes, and the opening
/// audit event. Never fails: code rendering degrades gracefully inside
/// `verify::generate_codes`.
pub fn create_document(
    title: String,
    doc_type: String,
    category: String,
    content: String,
    creator: String,
) -> DocumentMetadata {
    let now = Utc::now();
    let id = Uuid::new_v4();
    let hash = verify::document_hash(&content, now);
    let (qr_code, barcode) = verify::generate_codes(id, &hash, now);

    let mut doc = DocumentMetadata {
        id,
        title,
        doc_type,
        category,
        content,
        version: Version::initial(),
        status: DocumentStatus::Draft,
        creator: creator.clone(),
        approver: None,
        created_at: now,
        last_modified: now,
        approved_at: None,
        implemented_at: None,
        document_hash: hash,
        signature_hash: None,
        qr_code,
        barcode,
        audit_trail: Vec::new(),
        implementation_progress: None,
        effectiveness_score: None,
    };

    append_audit(&mut doc, AuditAction::Created, &creator, "Initial draft created");
    doc
}

/// `Draft → PendingApproval`.
pub fn submit_for_approval(
    doc: &mut DocumentMetadata,
    actor: &str,
) -> Result<(), ComplianceError> {
    expect_status(doc, DocumentStatus::Draft, "submit")?;

    doc.status = DocumentStatus::PendingApproval;
    doc.last_modified = Utc::now();
    append_audit(doc, AuditAction::SubmittedForApproval, actor, "Sent to approver queue");
    Ok(())
}

/// `PendingApproval → Approved`. Records the approver and seals the approval
/// with a signature digest over the document hash.
pub fn approve(doc: &mut DocumentMetadata, approver_role: &str) -> Result<(), ComplianceError> {
    expect_status(doc, DocumentStatus::PendingApproval, "approve")?;

    let now = Utc::now();
    doc.signature_hash = Some(verify::signature_hash(&doc.document_hash, approver_role, now));
    doc.approver = Some(approver_role.to_string());
    doc.approved_at = Some(now);
    doc.status = DocumentStatus::Approved;
    doc.last_modified = now;
    append_audit(
        doc,
        AuditAction::Approved,
        approver_role,
        &format!("Approved by {approver_role}"),
    );
    Ok(())
}

/// `Approved → Implemented`. Marks progress complete and assigns the
/// effectiveness score.
pub fn implement(doc: &mut DocumentMetadata, actor: &str) -> Result<(), ComplianceError> {
    expect_status(doc, DocumentStatus::Approved, "implement")?;

    let now = Utc::now();
    doc.implemented_at = Some(now);
    doc.implementation_progress = Some(100);
    doc.effectiveness_score = Some(effectiveness_score(&doc.document_hash));
    doc.status = DocumentStatus::Implemented;
    doc.last_modified = now;
    append_audit(doc, AuditAction::ImplementationStarted, actor, "Rollout marked complete");
    Ok(())
}

/// Audit-only action, allowed from any state. The document itself is
/// unchanged — in particular the hash stays stable.
pub fn record_download(doc: &mut DocumentMetadata, actor: &str) {
    append_audit(doc, AuditAction::Downloaded, actor, "Content exported");
}

/// Replace the content from any state: rehash, regenerate codes, bump the
/// minor version. The status does not change.
pub fn update_content(doc: &mut DocumentMetadata, content: String, actor: &str) {
    let now = Utc::now();
    doc.content = content;
    // Hash salt stays the creation timestamp; only the content part moves.
    doc.document_hash = verify::document_hash(&doc.content, doc.created_at);
    let (qr, barcode) = verify::generate_codes(doc.id, &doc.document_hash, now);
    doc.qr_code = qr;
    doc.barcode = barcode;
    doc.version = doc.version.bump_minor();
    doc.last_modified = now;
    append_audit(
        doc,
        AuditAction::ContentUpdated,
        actor,
        &format!("Revised to version {}", doc.version),
    );
}

/// Effectiveness stand-in measure in [70, 100], derived from the document
/// hash so repeated runs agree.
fn effectiveness_score(hash: &str) -> u8 {
    let seed = hash.bytes().next().unwrap_or(0);
    70 + seed % 31
}

fn expect_status(
    doc: &DocumentMetadata,
    required: DocumentStatus,
    action: &'static str,
) -> Result<(), ComplianceError> {
    if doc.status != required {
        return Err(ComplianceError::InvalidTransition {
            from: doc.status,
            action,
        });
    }
    Ok(())
}

fn append_audit(doc: &mut DocumentMetadata, action: AuditAction, user: &str, details: &str) {
    doc.audit_trail.push(AuditEvent {
        id: Uuid::new_v4(),
        action,
        user: user.to_string(),
        timestamp: Utc::now(),
        details: details.to_string(),
        document_hash: doc.document_hash.clone(),
    });
}
