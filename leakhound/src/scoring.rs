//! Risk scoring: a weighted blend of sensitivity, exposure,
//! verifiability, and scope, mapped back onto a severity tier.

use crate::findings::Severity;
use crate::utils::is_test_path;

/// Weighting of the four risk factors. Sensitivity dominates.
const W_SENSITIVITY: f64 = 0.40;
const W_EXPOSURE: f64 = 0.30;
const W_VERIFIABILITY: f64 = 0.15;
const W_SCOPE: f64 = 0.15;

/// Sensitivity score for a rule's baseline severity.
#[must_use]
pub fn sensitivity_score(severity: Severity) -> u8 {
    match severity {
        Severity::Critical => 100,
        Severity::High => 80,
        Severity::Medium => 60,
        Severity::Low => 40,
        Severity::Info => 20,
    }
}

/// Exposure score for the file path where a secret was found.
///
/// Starts at a neutral 50. Credential-bearing locations raise it, test
/// fixtures lower it, production markers raise it further, and history
/// findings get a surcharge because the secret has already propagated
/// to every clone.
#[must_use]
pub fn exposure_score(path: &str, in_history: bool) -> u8 {
    let lower = path.to_lowercase();
    let mut score: i32 = 50;

    if lower.contains(".env")
        || lower.contains("secrets")
        || lower.contains("credentials")
        || lower.contains("config")
    {
        score += 30;
    } else if lower.contains("test")
        || lower.contains("spec")
        || lower.contains("mock")
        || lower.contains("example")
        || lower.contains("sample")
    {
        score -= 20;
    }

    if lower.contains("production") || lower.contains("prod") || lower.contains("live") {
        score += 45;
    }

    if in_history {
        score += 20;
    }

    score.clamp(0, 100) as u8
}

/// Detection confidence after path adjustment: rule matches in test
/// paths are half as credible, and the result is rounded to 2 decimals.
#[must_use]
pub fn adjusted_confidence(base_confidence: f64, path: &str) -> f64 {
    let confidence = if is_test_path(path) {
        base_confidence / 2.0
    } else {
        base_confidence
    };
    (confidence * 100.0).round() / 100.0
}

/// Combined risk score on a 0-100 scale.
#[must_use]
pub fn risk_score(severity: Severity, confidence: f64, path: &str, in_history: bool) -> u8 {
    let sensitivity = f64::from(sensitivity_score(severity));
    let exposure = f64::from(exposure_score(path, in_history));
    let verifiability = (confidence * 100.0).round();
    let scope = 60.0;

    let risk = W_SENSITIVITY * sensitivity
        + W_EXPOSURE * exposure
        + W_VERIFIABILITY * verifiability
        + W_SCOPE * scope;
    (risk.round() as i64).clamp(0, 100) as u8
}

/// Severity tier reported for a risk score.
#[must_use]
pub fn severity_for_risk(risk: u8) -> Severity {
    match risk {
        90..=u8::MAX => Severity::Critical,
        70..=89 => Severity::High,
        50..=69 => Severity::Medium,
        25..=49 => Severity::Low,
        _ => Severity::Info,
    }
}
