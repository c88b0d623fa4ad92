//! Domain models for the compliance registry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ── Risk assessment ───────────────────────────────────────────────────────────

/// Qualitative impact of a control gap. Informational only — scoring math
/// uses `weight`, not impact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Impact {
    Low,
    Medium,
    High,
}

/// Three-tier risk label derived from a domain's score ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::High => write!(f, "High"),
            RiskLevel::Medium => write!(f, "Medium"),
            RiskLevel::Low => write!(f, "Low"),
        }
    }
}

/// One entry of the static question catalogue.
#[derive(Debug, Clone, Serialize)]
pub struct Question {
    /// Unique question id, e.g. `gov-1`
    pub id: String,
    /// ECC domain the question belongs to, e.g. `Governance`
    pub domain: String,
    /// Prompt shown to the user
    pub text: String,
    /// Relative importance, 1–3. Invariant: always positive.
    pub weight: u32,
    pub impact: Impact,
    /// Recommended controls, informational
    pub controls: Vec<String>,
}

/// Per-domain scoring result. Derived, not persisted by the engine itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainScore {
    pub domain: String,
    /// Integer percentage in [0, 100]
    pub score: u8,
    pub risk_level: RiskLevel,
}

/// Persisted assessment record — one per scored domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub id: Uuid,
    pub user_id: String,
    pub domain: String,
    pub score: u8,
    pub risk_level: RiskLevel,
    pub completed_at: DateTime<Utc>,
}

// ── Document lifecycle ────────────────────────────────────────────────────────

/// Lifecycle state of a policy document. Transitions are one-way and guarded;
/// see `lifecycle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Draft,
    PendingApproval,
    Approved,
    Implemented,
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DocumentStatus::Draft => "draft",
            DocumentStatus::PendingApproval => "pending_approval",
            DocumentStatus::Approved => "approved",
            DocumentStatus::Implemented => "implemented",
        };
        write!(f, "{s}")
    }
}

/// Human-readable document version, kept as integers internally so that
/// "1.9" bumps to "1.10" and still orders correctly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
}

impl Version {
    pub fn initial() -> Self {
        Version { major: 1, minor: 0 }
    }

    /// Minor bump on each content edit. Always forward, no major semantics.
    pub fn bump_minor(self) -> Self {
        Version {
            major: self.major,
            minor: self.minor + 1,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for Version {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (major, minor) = s
            .split_once('.')
            .ok_or_else(|| format!("version must be 'major.minor', got: {s}"))?;
        Ok(Version {
            major: major.parse().map_err(|_| format!("bad major in: {s}"))?,
            minor: minor.parse().map_err(|_| format!("bad minor in: {s}"))?,
        })
    }
}

impl Serialize for Version {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A material action recorded in a document's audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditAction {
    #[serde(rename = "Document Created")]
    Created,
    #[serde(rename = "Submitted for Approval")]
    SubmittedForApproval,
    #[serde(rename = "Document Approved")]
    Approved,
    #[serde(rename = "Implementation Started")]
    ImplementationStarted,
    #[serde(rename = "Document Downloaded")]
    Downloaded,
    #[serde(rename = "Content Updated")]
    ContentUpdated,
}

/// One audit trail entry. Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    pub id: Uuid,
    pub action: AuditAction,
    pub user: String,
    pub timestamp: DateTime<Utc>,
    pub details: String,
    /// Document hash at the time of the event
    pub document_hash: String,
}

/// A managed policy document with its full lifecycle state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub category: String,
    pub content: String,
    pub version: Version,
    pub status: DocumentStatus,
    pub creator: String,
    pub approver: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub implemented_at: Option<DateTime<Utc>>,
    /// SHA-256 over content + creation timestamp, hex-encoded.
    /// Deliberately not a pure function of content alone.
    pub document_hash: String,
    /// SHA-256 over document hash + approver + approval timestamp.
    /// Set once, at approval.
    pub signature_hash: Option<String>,
    /// base64url-encoded verification payload. Derived, regenerable,
    /// never authoritative. Empty if encoding failed.
    pub qr_code: String,
    /// Compact scannable form of the same payload
    pub barcode: String,
    /// Append-only. Never mutated in place.
    pub audit_trail: Vec<AuditEvent>,
    pub implementation_progress: Option<u8>,
    pub effectiveness_score: Option<u8>,
}

// ── Request / response bodies ─────────────────────────────────────────────────

/// Body for `POST /assessments`.
#[derive(Debug, Deserialize)]
pub struct SubmitAssessmentRequest {
    pub user_id: String,
    /// Question id → answer token ("yes" / "partial" / "no").
    /// Unknown ids are ignored; unrecognized tokens count as "no".
    pub answers: HashMap<String, String>,
}

/// Query string for `GET /assessments`.
#[derive(Debug, Deserialize)]
pub struct AssessmentQuery {
    pub user_id: Option<String>,
}

/// Body for `POST /documents`.
#[derive(Debug, Deserialize)]
pub struct CreateDocumentRequest {
    pub title: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub category: String,
    pub content: String,
    /// Opaque identity of the creator (auth is handled upstream)
    pub actor: String,
}

/// Body for transitions that only need an acting identity
/// (`submit`, `implement`, `download`).
#[derive(Debug, Deserialize)]
pub struct ActorRequest {
    pub actor: String,
}

/// Body for `POST /documents/:id/approve`.
#[derive(Debug, Deserialize)]
pub struct ApproveRequest {
    /// Approving role, e.g. `CEO` — recorded as the approver identity
    pub approver_role: String,
}

/// Body for `PUT /documents/:id/content`.
#[derive(Debug, Deserialize)]
pub struct UpdateContentRequest {
    pub content: String,
    pub actor: String,
}

/// Body for `POST /verify` — the raw string read off a scanned code.
#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub code: String,
}

/// Outcome of a verification check. A hash mismatch is a report, not an
/// error — the caller distinguishes it from "not found" and "unreadable code".
#[derive(Debug, Clone, Serialize)]
pub struct VerificationReport {
    pub authentic: bool,
    pub document_id: Uuid,
    pub title: String,
    pub status: DocumentStatus,
    pub checked_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}
