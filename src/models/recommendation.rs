use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{CooldownStatus, Priority};

/// Reasoning used when no clinical indications were supplied.
pub const GENERIC_REASONING: &str =
    "Patient may benefit from this service based on their overall clinical profile.";

/// A single recommended ancillary service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AncillaryRecommendation {
    pub ancillary_code: String,
    pub ancillary_name: String,
    pub category: String,
    /// Always within 0..=100.
    pub qualification_score: u8,
    pub qualification_reasoning: String,
    pub clinical_indications: Vec<String>,
    pub evidence_citations: Vec<String>,
    pub priority: Priority,
    pub cooldown_status: CooldownStatus,
    /// Present only when `cooldown_status` is `in_cooldown`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eligible_date: Option<NaiveDate>,
}

/// Full output of one analysis request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AIAnalysisResult {
    pub patient_uuid: Uuid,
    pub analysis_timestamp: DateTime<Utc>,
    /// Sorted by `qualification_score`, highest first.
    pub recommendations: Vec<AncillaryRecommendation>,
    pub overall_summary: String,
    pub risk_factors_identified: Vec<String>,
    pub suggested_follow_up: String,
}

impl AIAnalysisResult {
    pub fn recommendation(&self, code: &str) -> Option<&AncillaryRecommendation> {
        self.recommendations.iter().find(|r| r.ancillary_code == code)
    }

    pub fn has_recommendation(&self, code: &str) -> bool {
        self.recommendation(code).is_some()
    }
}

/// Deterministic reasoning sentence built from the clinical indications.
pub fn build_reasoning(indications: &[String]) -> String {
    let listed: Vec<&str> = indications
        .iter()
        .map(|i| i.trim())
        .filter(|i| !i.is_empty())
        .collect();
    if listed.is_empty() {
        GENERIC_REASONING.to_string()
    } else {
        format!("Patient qualifies based on: {}.", listed.join(", "))
    }
}

/// Stable sort by score, highest first. Equal scores keep their input order.
pub fn sort_by_score(recommendations: &mut [AncillaryRecommendation]) {
    recommendations.sort_by(|a, b| b.qualification_score.cmp(&a.qualification_score));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(code: &str, score: u8) -> AncillaryRecommendation {
        AncillaryRecommendation {
            ancillary_code: code.into(),
            ancillary_name: code.into(),
            category: "Test".into(),
            qualification_score: score,
            qualification_reasoning: String::new(),
            clinical_indications: vec![],
            evidence_citations: vec![],
            priority: Priority::Medium,
            cooldown_status: CooldownStatus::Eligible,
            eligible_date: None,
        }
    }

    #[test]
    fn reasoning_lists_indications() {
        let reasoning = build_reasoning(&["Hypertension".into(), "Type 2 diabetes".into()]);
        assert_eq!(
            reasoning,
            "Patient qualifies based on: Hypertension, Type 2 diabetes."
        );
    }

    #[test]
    fn reasoning_falls_back_to_generic_sentence() {
        assert_eq!(build_reasoning(&[]), GENERIC_REASONING);
        assert_eq!(build_reasoning(&["  ".into()]), GENERIC_REASONING);
    }

    #[test]
    fn sort_is_descending_and_stable() {
        let mut recs = vec![rec("A", 70), rec("B", 90), rec("C", 70), rec("D", 85)];
        sort_by_score(&mut recs);
        let codes: Vec<&str> = recs.iter().map(|r| r.ancillary_code.as_str()).collect();
        assert_eq!(codes, vec!["B", "D", "A", "C"]);
    }

    #[test]
    fn eligible_date_omitted_when_absent() {
        let json = serde_json::to_string(&rec("ECHO", 80)).unwrap();
        assert!(!json.contains("eligible_date"));
        assert!(json.contains("\"cooldown_status\":\"eligible\""));
    }
}
