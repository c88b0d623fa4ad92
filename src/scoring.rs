//! Risk assessment scoring engine.
//!
//! Pure computation: a weighted question catalogue plus a map of answers in,
//! one percentage score and risk level per domain out. Persistence of the
//! results is the caller's concern.

use crate::error::ComplianceError;
use crate::models::{DomainScore, Question, RiskLevel};
use std::collections::HashMap;

/// Ratio below this is High risk.
const MEDIUM_THRESHOLD: f64 = 0.60;
/// Ratio at or above this is Low risk.
const LOW_THRESHOLD: f64 = 0.80;

struct DomainAcc {
    domain: String,
    achieved: f64,
    total: u32,
}

/// Score an answer set against the catalogue.
///
/// Contributions: "yes" counts the full question weight, "partial" counts
/// half, anything else — including a missing answer — counts zero. The
/// lenient default keeps the total defined even with partial client state.
/// Unanswered questions still count toward the denominator: the catalogue,
/// not the answer set, drives the iteration.
///
/// Domains appear in the output in catalogue order. An empty catalogue
/// yields an empty result. A domain whose questions sum to zero weight is a
/// catalogue defect and fails with [`ComplianceError::Configuration`].
pub fn score_assessment(
    questions: &[Question],
    answers: &HashMap<String, String>,
) -> Result<Vec<DomainScore>, ComplianceError> {
    let mut accs: Vec<DomainAcc> = Vec::new();

    for question in questions {
        let contribution = match answers.get(&question.id).map(String::as_str) {
            Some("yes") => question.weight as f64,
            Some("partial") => question.weight as f64 / 2.0,
            _ => 0.0,
        };

        let idx = match accs.iter().position(|a| a.domain == question.domain) {
            Some(idx) => idx,
            None => {
                accs.push(DomainAcc {
                    domain: question.domain.clone(),
                    achieved: 0.0,
                    total: 0,
                });
                accs.len() - 1
            }
        };
        accs[idx].achieved += contribution;
        accs[idx].total += question.weight;
    }

    accs.into_iter()
        .map(|acc| {
            if acc.total == 0 {
                return Err(ComplianceError::Configuration(acc.domain));
            }
            let ratio = acc.achieved / acc.total as f64;
            Ok(DomainScore {
                domain: acc.domain,
                score: (ratio * 100.0).round() as u8,
                risk_level: risk_level(ratio),
            })
        })
        .collect()
}

/// Risk banding on the raw ratio, not the rounded score:
/// below 0.60 High, 0.60 inclusive to 0.80 exclusive Medium, 0.80 and up Low.
fn risk_level(ratio: f64) -> RiskLevel {
    if ratio < MEDIUM_THRESHOLD {
        RiskLevel::High
    } else if ratio < LOW_THRESHOLD {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}
