//! Deterministic rule-based classifier used when the model path is unavailable.
//!
//! Flags are detected by keyword presence, then a rule table maps flags to
//! candidate services. No network access; never fails.

pub mod flags;
pub mod rules;

pub use flags::*;
pub use rules::*;

use chrono::{NaiveDate, Utc};

use crate::catalog::Catalog;
use crate::cooldown::evaluate_at;
use crate::models::{
    build_reasoning, latest_completion, sort_by_score, AIAnalysisResult, AncillaryRecommendation,
    PatientProfile, PriorAncillaryRecord,
};

pub const FALLBACK_FOLLOW_UP: &str = "Review the recommended services with the patient's care team \
and confirm clinical necessity before ordering.";

/// Classify a profile with the built-in rule table.
pub fn classify(
    profile: &PatientProfile,
    prior_ancillaries: &[PriorAncillaryRecord],
    catalog: &Catalog,
    today: NaiveDate,
) -> AIAnalysisResult {
    classify_with_rules(profile, prior_ancillaries, catalog, today, SERVICE_RULES)
}

/// Classify a profile against an explicit rule table.
pub fn classify_with_rules(
    profile: &PatientProfile,
    prior_ancillaries: &[PriorAncillaryRecord],
    catalog: &Catalog,
    today: NaiveDate,
    rules: &[ServiceRule],
) -> AIAnalysisResult {
    let risks = detect_risk_flags(profile);

    let mut recommendations: Vec<AncillaryRecommendation> = rules
        .iter()
        .filter(|rule| risks.any_of(rule.any_of))
        .filter_map(|rule| {
            let Some(service) = catalog.get(rule.code) else {
                tracing::warn!(code = rule.code, "Fallback rule targets unknown service, skipped");
                return None;
            };
            let indications: Vec<String> = rule
                .any_of
                .iter()
                .filter(|flag| risks.contains(**flag))
                .map(|flag| flag.label().to_string())
                .collect();
            let last = latest_completion(prior_ancillaries, &service.code);
            let cooldown = evaluate_at(service, profile.payor_type, last, today);

            Some(AncillaryRecommendation {
                ancillary_code: service.code.clone(),
                ancillary_name: service.name.clone(),
                category: service.category.clone(),
                qualification_score: rule.score.min(100),
                qualification_reasoning: build_reasoning(&indications),
                clinical_indications: indications,
                evidence_citations: rule.citations.iter().map(|c| c.to_string()).collect(),
                priority: rule.priority,
                cooldown_status: cooldown.status,
                eligible_date: cooldown.eligible_date,
            })
        })
        .collect();

    sort_by_score(&mut recommendations);

    tracing::debug!(
        patient_uuid = %profile.patient_uuid,
        flags = ?risks.iter().collect::<Vec<_>>(),
        candidates = recommendations.len(),
        "Fallback classification complete"
    );

    AIAnalysisResult {
        patient_uuid: profile.patient_uuid,
        analysis_timestamp: Utc::now(),
        overall_summary: format!(
            "Rule-based analysis identified {} potential ancillary service{} from the patient's \
             history, medications and notes. AI-assisted analysis was unavailable.",
            recommendations.len(),
            if recommendations.len() == 1 { "" } else { "s" }
        ),
        recommendations,
        risk_factors_identified: risks.headline_labels(),
        suggested_follow_up: FALLBACK_FOLLOW_UP.to_string(),
    }
}
