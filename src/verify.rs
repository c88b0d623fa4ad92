//! Document hashing and scannable verification codes.
//!
//! Every document carries a SHA-256 hash computed at creation (and recomputed
//! on content edits). The hash, the document id and a timestamp form a code
//! payload that is rendered as a QR string and a compact barcode string.
//! Verification decodes a scanned payload and compares the embedded hash to
//! the stored one by equality — it does not re-hash content. A record whose
//! stored hash was forged consistently with its content therefore passes;
//! this is a convenience check against accidental tampering, not a security
//! control, and is kept that way on purpose.

use crate::error::ComplianceError;
use crate::models::{DocumentMetadata, VerificationReport};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Payload embedded in QR and barcode representations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodePayload {
    pub id: Uuid,
    pub hash: String,
    /// Unix millis at code generation
    pub timestamp: i64,
}

fn sha256_hex(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// Hash of content salted with the creation timestamp. Two documents with
/// identical content still get distinct hashes.
pub fn document_hash(content: &str, created_at: DateTime<Utc>) -> String {
    sha256_hex(&format!("{content}{}", created_at.to_rfc3339()))
}

/// Approval signature digest: binds the document hash to the approver and
/// the moment of approval.
pub fn signature_hash(document_hash: &str, approver: &str, approved_at: DateTime<Utc>) -> String {
    sha256_hex(&format!(
        "{document_hash}{approver}{}",
        approved_at.to_rfc3339()
    ))
}

/// Render both scannable forms for a document. Encoding failures degrade to
/// empty strings with a warning — a document must never fail to exist just
/// because its code could not be rendered.
pub fn generate_codes(id: Uuid, hash: &str, now: DateTime<Utc>) -> (String, String) {
    let payload = CodePayload {
        id,
        hash: hash.to_string(),
        timestamp: now.timestamp_millis(),
    };

    let qr = match serde_json::to_vec(&payload) {
        Ok(bytes) => URL_SAFE_NO_PAD.encode(bytes),
        Err(e) => {
            tracing::warn!("QR payload encoding failed for {id}: {e}");
            String::new()
        }
    };

    // Barcode is the colon-separated form of the same payload, full hash
    // included, so either code verifies.
    let barcode = format!("{}:{hash}:{}", id.simple(), payload.timestamp);

    (qr, barcode)
}

/// Decode a scanned code string into its payload. Accepts the base64url QR
/// form, the colon-separated barcode form, or the bare JSON a scanner app
/// may have already unwrapped.
pub fn decode_code(code: &str) -> Result<CodePayload, ComplianceError> {
    let trimmed = code.trim();
    if trimmed.is_empty() {
        return Err(ComplianceError::InvalidCodePayload("empty code".into()));
    }

    if trimmed.contains(':') {
        return decode_barcode(trimmed);
    }

    let json_bytes = if trimmed.starts_with('{') {
        trimmed.as_bytes().to_vec()
    } else {
        URL_SAFE_NO_PAD
            .decode(trimmed)
            .map_err(|e| ComplianceError::InvalidCodePayload(format!("bad encoding: {e}")))?
    };

    serde_json::from_slice(&json_bytes)
        .map_err(|e| ComplianceError::InvalidCodePayload(format!("bad payload: {e}")))
}

fn decode_barcode(code: &str) -> Result<CodePayload, ComplianceError> {
    let mut parts = code.split(':');
    let (Some(id), Some(hash), Some(timestamp), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(ComplianceError::InvalidCodePayload(
            "barcode must be id:hash:timestamp".into(),
        ));
    };

    let id = Uuid::parse_str(id)
        .map_err(|e| ComplianceError::InvalidCodePayload(format!("bad barcode id: {e}")))?;
    if hash.is_empty() {
        return Err(ComplianceError::InvalidCodePayload("barcode hash is empty".into()));
    }
    let timestamp = timestamp
        .parse()
        .map_err(|_| ComplianceError::InvalidCodePayload(format!("bad barcode timestamp: {timestamp}")))?;

    Ok(CodePayload {
        id,
        hash: hash.to_string(),
        timestamp,
    })
}

/// Check a scanned payload against the stored records.
///
/// Unknown id is an error ("not found"); a hash mismatch is not — it comes
/// back as a report with `authentic: false` so the caller can tell the user
/// the document failed verification rather than that the request failed.
pub fn verify_document(
    documents: &[DocumentMetadata],
    code: &str,
) -> Result<VerificationReport, ComplianceError> {
    let payload = decode_code(code)?;

    let doc = documents
        .iter()
        .find(|d| d.id == payload.id)
        .ok_or(ComplianceError::DocumentNotFound(payload.id))?;

    let authentic = doc.document_hash == payload.hash;
    Ok(VerificationReport {
        authentic,
        document_id: doc.id,
        title: doc.title.clone(),
        status: doc.status,
        checked_at: Utc::now(),
        reason: (!authentic).then(|| "hash mismatch — document record differs from code".into()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle;

    fn sample_document() -> DocumentMetadata {
        lifecycle::create_document(
            "Access Control Policy".into(),
            "Policy".into(),
            "Cybersecurity Defence".into(),
            "All access shall be least-privilege.".into(),
            "alice".into(),
        )
    }

    #[test]
    fn document_hash_depends_on_creation_time() {
        let now = Utc::now();
        let later = now + chrono::Duration::seconds(1);
        assert_ne!(document_hash("same", now), document_hash("same", later));
    }

    #[test]
    fn generated_qr_round_trips() {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let (qr, barcode) = generate_codes(id, "abc123", now);

        assert!(!barcode.is_empty());
        let payload = decode_code(&qr).unwrap();
        assert_eq!(payload.id, id);
        assert_eq!(payload.hash, "abc123");
        assert_eq!(payload.timestamp, now.timestamp_millis());
    }

    #[test]
    fn generated_barcode_round_trips() {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let (_, barcode) = generate_codes(id, "abc123", now);

        let payload = decode_code(&barcode).unwrap();
        assert_eq!(payload.id, id);
        assert_eq!(payload.hash, "abc123");
        assert_eq!(payload.timestamp, now.timestamp_millis());
    }

    #[test]
    fn matching_hash_verifies_as_authentic() {
        let doc = sample_document();
        let report = verify_document(std::slice::from_ref(&doc), &doc.qr_code).unwrap();
        assert!(report.authentic);
        assert_eq!(report.document_id, doc.id);
        assert!(report.reason.is_none());
    }

    #[test]
    fn own_barcode_verifies_as_authentic() {
        let doc = sample_document();
        let report = verify_document(std::slice::from_ref(&doc), &doc.barcode).unwrap();
        assert!(report.authentic);
        assert_eq!(report.document_id, doc.id);
    }

    #[test]
    fn mismatched_hash_reports_failure_without_error() {
        let doc = sample_document();
        let (forged_qr, _) = generate_codes(doc.id, "deadbeef", Utc::now());

        let report = verify_document(std::slice::from_ref(&doc), &forged_qr).unwrap();
        assert!(!report.authentic);
        assert!(report.reason.is_some());
    }

    #[test]
    fn unknown_id_is_not_found_not_mismatch() {
        let doc = sample_document();
        let (stray_qr, _) = generate_codes(Uuid::new_v4(), &doc.document_hash, Utc::now());

        let err = verify_document(std::slice::from_ref(&doc), &stray_qr).unwrap_err();
        assert!(matches!(err, ComplianceError::DocumentNotFound(_)));
    }

    #[test]
    fn malformed_code_is_rejected_as_invalid_payload() {
        for junk in [
            "",
            "%%%not-base64%%%",
            "eyJub3QiOiJwYXlsb2FkIn0",
            "{\"id\": 7}",
            // Barcode variants: wrong field count, bad id, bad timestamp.
            "abc:def",
            "a:b:c:d",
            "not-a-uuid:abc123:0",
            "0191f2a0c1e07c6f8b3adadadadadada:abc123:soon",
        ] {
            let err = verify_document(&[], junk).unwrap_err();
            assert!(
                matches!(err, ComplianceError::InvalidCodePayload(_)),
                "expected invalid payload for {junk:?}"
            );
        }
    }
}
