//! Built-in risk assessment question catalogue.
//!
//! Questions are grouped by NCA ECC domain and weighted 1–3 by relative
//! importance. The catalogue is immutable at runtime; answers reference
//! questions by id.

use crate::models::{Impact, Question};

fn q(
    id: &str,
    domain: &str,
    text: &str,
    weight: u32,
    impact: Impact,
    controls: &[&str],
) -> Question {
    Question {
        id: id.into(),
        domain: domain.into(),
        text: text.into(),
        weight,
        impact,
        controls: controls.iter().map(|c| c.to_string()).collect(),
    }
}

/// The full built-in catalogue. Order is stable: domains appear in ECC order,
/// questions in catalogue order within each domain.
pub fn builtin_catalogue() -> Vec<Question> {
    vec![
        // ── Governance ──
        q(
            "gov-1",
            "Governance",
            "Is there a documented cybersecurity strategy approved by senior management?",
            3,
            Impact::High,
            &[
                "ECC 1-1-1: Define and document a cybersecurity strategy",
                "ECC 1-1-3: Review the strategy at planned intervals",
            ],
        ),
        q(
            "gov-2",
            "Governance",
            "Is a dedicated cybersecurity function established and staffed?",
            3,
            Impact::High,
            &["ECC 1-2-1: Establish an independent cybersecurity function"],
        ),
        q(
            "gov-3",
            "Governance",
            "Are cybersecurity roles and responsibilities formally assigned?",
            2,
            Impact::Medium,
            &["ECC 1-4-1: Define and assign cybersecurity roles (RACI)"],
        ),
        q(
            "gov-4",
            "Governance",
            "Is cybersecurity awareness training delivered to all personnel periodically?",
            1,
            Impact::Medium,
            &["ECC 1-10-1: Run a cybersecurity awareness programme"],
        ),
        // ── Cybersecurity Defence ──
        q(
            "def-1",
            "Cybersecurity Defence",
            "Is multi-factor authentication enforced for remote and privileged access?",
            3,
            Impact::High,
            &[
                "ECC 2-2-1: Enforce MFA for remote access",
                "ECC 2-2-3: Restrict and monitor privileged accounts",
            ],
        ),
        q(
            "def-2",
            "Cybersecurity Defence",
            "Are systems and applications patched within defined timeframes?",
            3,
            Impact::High,
            &["ECC 2-3-1: Operate a vulnerability and patch management process"],
        ),
        q(
            "def-3",
            "Cybersecurity Defence",
            "Is malware protection deployed and centrally monitored on all endpoints?",
            2,
            Impact::Medium,
            &["ECC 2-4-1: Deploy centrally managed anti-malware"],
        ),
        q(
            "def-4",
            "Cybersecurity Defence",
            "Are security events collected centrally and reviewed for anomalies?",
            2,
            Impact::High,
            &["ECC 2-12-1: Centralise event logging and monitoring (SIEM)"],
        ),
        q(
            "def-5",
            "Cybersecurity Defence",
            "Is sensitive data encrypted at rest and in transit?",
            2,
            Impact::High,
            &["ECC 2-8-1: Apply approved cryptographic controls to sensitive data"],
        ),
        // ── Cybersecurity Resilience ──
        q(
            "res-1",
            "Cybersecurity Resilience",
            "Are backups taken, protected, and restoration-tested periodically?",
            3,
            Impact::High,
            &[
                "ECC 3-1-1: Include cybersecurity in business continuity planning",
                "ECC 2-9-1: Back up critical systems and test restoration",
            ],
        ),
        q(
            "res-2",
            "Cybersecurity Resilience",
            "Is there a documented and exercised incident response plan?",
            2,
            Impact::High,
            &["ECC 2-13-1: Establish an incident response plan and team"],
        ),
        // ── Third-Party and Cloud Computing Cybersecurity ──
        q(
            "tpc-1",
            "Third-Party and Cloud Computing Cybersecurity",
            "Are cybersecurity requirements included in third-party contracts?",
            2,
            Impact::Medium,
            &["ECC 4-1-1: Embed cybersecurity clauses in third-party agreements"],
        ),
        q(
            "tpc-2",
            "Third-Party and Cloud Computing Cybersecurity",
            "Is organisational data in cloud services hosted in compliance with location requirements?",
            2,
            Impact::High,
            &["ECC 4-2-3: Verify hosting location of cloud workloads"],
        ),
    ]
}
