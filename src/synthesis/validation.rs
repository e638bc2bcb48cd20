// Coercion of untyped model output into typed recommendations.
// Every drop/clamp/default rule for the primary path lives here.

use chrono::NaiveDate;
use serde_json::Value;

use super::parser::string_items;
use crate::catalog::Catalog;
use crate::cooldown::evaluate_at;
use crate::models::{
    build_reasoning, latest_completion, sort_by_score, AncillaryRecommendation, PayorType,
    PriorAncillaryRecord, Priority,
};

/// Score applied when the model omits one or sends something unusable.
pub const DEFAULT_QUALIFICATION_SCORE: u8 = 75;

/// Priority applied when the model omits one or sends an unknown value.
pub const DEFAULT_PRIORITY: Priority = Priority::Medium;

/// Patient-level inputs needed to finish a recommendation.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    pub catalog: &'a Catalog,
    pub payor: PayorType,
    pub prior_ancillaries: &'a [PriorAncillaryRecord],
    pub today: NaiveDate,
}

/// Validated recommendations plus the codes that were dropped.
#[derive(Debug, Clone, Default)]
pub struct ValidationOutcome {
    pub recommendations: Vec<AncillaryRecommendation>,
    pub dropped: Vec<String>,
}

/// Validate raw recommendation objects.
///
/// Unknown or missing codes are dropped, scores clamped into 0..=100, and
/// repeated codes collapse to their highest-scoring entry. The result is
/// sorted by score, highest first.
pub fn validate_recommendations(items: &[Value], ctx: &ValidationContext<'_>) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::default();

    for item in items {
        match coerce_recommendation(item, ctx) {
            Some(rec) => merge_candidate(&mut outcome.recommendations, rec),
            None => {
                let code = item
                    .get("ancillary_code")
                    .and_then(Value::as_str)
                    .unwrap_or("<missing>")
                    .to_string();
                tracing::debug!(code = %code, "Dropping recommendation with unknown service code");
                outcome.dropped.push(code);
            }
        }
    }

    sort_by_score(&mut outcome.recommendations);
    outcome
}

/// Map one raw object to a recommendation, or `None` when its code is not catalogued.
pub fn coerce_recommendation(
    item: &Value,
    ctx: &ValidationContext<'_>,
) -> Option<AncillaryRecommendation> {
    let code = item.get("ancillary_code").and_then(Value::as_str)?;
    let service = ctx.catalog.get(code)?;

    let indications = list_field(item, "clinical_indications");
    let citations = list_field(item, "evidence_citations");
    let priority = item
        .get("priority")
        .and_then(Value::as_str)
        .and_then(Priority::parse_lenient)
        .unwrap_or(DEFAULT_PRIORITY);

    let last = latest_completion(ctx.prior_ancillaries, &service.code);
    let cooldown = evaluate_at(service, ctx.payor, last, ctx.today);

    Some(AncillaryRecommendation {
        ancillary_code: service.code.clone(),
        ancillary_name: service.name.clone(),
        category: service.category.clone(),
        qualification_score: coerce_score(item.get("qualification_score")),
        qualification_reasoning: build_reasoning(&indications),
        clinical_indications: indications,
        evidence_citations: citations,
        priority,
        cooldown_status: cooldown.status,
        eligible_date: cooldown.eligible_date,
    })
}

/// Integer, float (rounded) or numeric string, clamped into 0..=100.
pub fn coerce_score(value: Option<&Value>) -> u8 {
    let number = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match number {
        Some(n) if n.is_finite() => n.round().clamp(0.0, 100.0) as u8,
        _ => DEFAULT_QUALIFICATION_SCORE,
    }
}

fn list_field(item: &Value, key: &str) -> Vec<String> {
    match item.get(key) {
        Some(Value::Array(items)) => string_items(items),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => Vec::new(),
    }
}

/// Keep only the highest-scoring entry per code; first seen wins ties.
fn merge_candidate(recs: &mut Vec<AncillaryRecommendation>, candidate: AncillaryRecommendation) {
    match recs
        .iter_mut()
        .find(|r| r.ancillary_code == candidate.ancillary_code)
    {
        Some(existing) if candidate.qualification_score > existing.qualification_score => {
            *existing = candidate;
        }
        Some(_) => {}
        None => recs.push(candidate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CooldownStatus;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ctx<'a>(catalog: &'a Catalog, priors: &'a [PriorAncillaryRecord]) -> ValidationContext<'a> {
        ValidationContext {
            catalog,
            payor: PayorType::Ppo,
            prior_ancillaries: priors,
            today: date(2025, 7, 15),
        }
    }

    #[test]
    fn unknown_codes_are_dropped() {
        let catalog = Catalog::standard();
        let items = vec![
            json!({"ancillary_code": "ECHO", "qualification_score": 80}),
            json!({"ancillary_code": "MRI_WHOLE_BODY", "qualification_score": 99}),
            json!({"qualification_score": 50}),
        ];
        let outcome = validate_recommendations(&items, &ctx(&catalog, &[]));
        assert_eq!(outcome.recommendations.len(), 1);
        assert_eq!(outcome.recommendations[0].ancillary_code, "ECHO");
        assert_eq!(outcome.dropped, vec!["MRI_WHOLE_BODY", "<missing>"]);
    }

    #[test]
    fn scores_are_clamped() {
        assert_eq!(coerce_score(Some(&json!(150))), 100);
        assert_eq!(coerce_score(Some(&json!(-20))), 0);
        assert_eq!(coerce_score(Some(&json!(87))), 87);
    }

    #[test]
    fn missing_or_unusable_score_defaults_to_75() {
        assert_eq!(coerce_score(None), 75);
        assert_eq!(coerce_score(Some(&json!(null))), 75);
        assert_eq!(coerce_score(Some(&json!("high"))), 75);
        assert_eq!(coerce_score(Some(&json!([80]))), 75);
    }

    #[test]
    fn float_and_string_scores_are_accepted() {
        assert_eq!(coerce_score(Some(&json!(82.6))), 83);
        assert_eq!(coerce_score(Some(&json!(" 64 "))), 64);
        assert_eq!(coerce_score(Some(&json!("250"))), 100);
    }

    #[test]
    fn name_and_category_come_from_catalog() {
        let catalog = Catalog::standard();
        let item = json!({
            "ancillary_code": "ECHO",
            "ancillary_name": "Something Else",
            "category": "Made Up",
        });
        let rec = coerce_recommendation(&item, &ctx(&catalog, &[])).unwrap();
        assert_eq!(rec.ancillary_name, "Transthoracic Echocardiogram");
        assert_eq!(rec.category, "Cardiology");
    }

    #[test]
    fn reasoning_built_from_indications() {
        let catalog = Catalog::standard();
        let item = json!({
            "ancillary_code": "BRAINSCAN",
            "clinical_indications": ["Hypertension", 7, "Memory complaints"],
            "evidence_citations": ["AHA 2016"],
        });
        let rec = coerce_recommendation(&item, &ctx(&catalog, &[])).unwrap();
        assert_eq!(rec.clinical_indications, vec!["Hypertension", "Memory complaints"]);
        assert_eq!(
            rec.qualification_reasoning,
            "Patient qualifies based on: Hypertension, Memory complaints."
        );
        assert_eq!(rec.evidence_citations, vec!["AHA 2016"]);
    }

    #[test]
    fn generic_reasoning_without_indications() {
        let catalog = Catalog::standard();
        let rec =
            coerce_recommendation(&json!({"ancillary_code": "ECHO"}), &ctx(&catalog, &[])).unwrap();
        assert_eq!(rec.qualification_reasoning, crate::models::GENERIC_REASONING);
        assert_eq!(rec.qualification_score, DEFAULT_QUALIFICATION_SCORE);
        assert_eq!(rec.priority, DEFAULT_PRIORITY);
    }

    #[test]
    fn priority_parsed_leniently() {
        let catalog = Catalog::standard();
        let rec = coerce_recommendation(
            &json!({"ancillary_code": "ECHO", "priority": "HIGH"}),
            &ctx(&catalog, &[]),
        )
        .unwrap();
        assert_eq!(rec.priority, Priority::High);

        let rec = coerce_recommendation(
            &json!({"ancillary_code": "ECHO", "priority": "asap"}),
            &ctx(&catalog, &[]),
        )
        .unwrap();
        assert_eq!(rec.priority, Priority::Medium);
    }

    #[test]
    fn cooldown_attached_from_prior_records() {
        let catalog = Catalog::standard();
        let priors = vec![PriorAncillaryRecord {
            ancillary_code: "ECHO".into(),
            completed_date: date(2025, 1, 15),
        }];
        let rec =
            coerce_recommendation(&json!({"ancillary_code": "ECHO"}), &ctx(&catalog, &priors))
                .unwrap();
        assert_eq!(rec.cooldown_status, CooldownStatus::InCooldown);
        assert_eq!(rec.eligible_date, Some(date(2026, 1, 15)));
    }

    #[test]
    fn duplicate_codes_keep_highest_score() {
        let catalog = Catalog::standard();
        let items = vec![
            json!({"ancillary_code": "ECHO", "qualification_score": 60}),
            json!({"ancillary_code": "PGX", "qualification_score": 70}),
            json!({"ancillary_code": "ECHO", "qualification_score": 90}),
        ];
        let outcome = validate_recommendations(&items, &ctx(&catalog, &[]));
        assert_eq!(outcome.recommendations.len(), 2);
        assert_eq!(outcome.recommendations[0].ancillary_code, "ECHO");
        assert_eq!(outcome.recommendations[0].qualification_score, 90);
    }

    #[test]
    fn output_sorted_descending() {
        let catalog = Catalog::standard();
        let items = vec![
            json!({"ancillary_code": "MSK_US", "qualification_score": 40}),
            json!({"ancillary_code": "ECHO", "qualification_score": 95}),
            json!({"ancillary_code": "PGX"}),
        ];
        let outcome = validate_recommendations(&items, &ctx(&catalog, &[]));
        let scores: Vec<u8> = outcome
            .recommendations
            .iter()
            .map(|r| r.qualification_score)
            .collect();
        assert_eq!(scores, vec![95, 75, 40]);
    }

    #[test]
    fn non_object_items_are_dropped() {
        let catalog = Catalog::standard();
        let items = vec![json!("ECHO"), json!(42)];
        let outcome = validate_recommendations(&items, &ctx(&catalog, &[]));
        assert!(outcome.recommendations.is_empty());
        assert_eq!(outcome.dropped.len(), 2);
    }
}
