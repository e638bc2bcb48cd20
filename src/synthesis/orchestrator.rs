use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use super::parser::parse_analysis_response;
use super::prompt::{
    build_evidence_prompt, build_patient_prompt, build_system_prompt, EVIDENCE_SYSTEM_PROMPT,
};
use super::types::{GenerationOptions, LlmClient, DEFAULT_TEMPERATURE};
use super::validation::{validate_recommendations, ValidationContext};
use super::SynthesisError;
use crate::catalog::{AncillaryService, Catalog};
use crate::models::{AIAnalysisResult, PatientData, PatientProfile, PriorAncillaryRecord};

pub const DEFAULT_SUMMARY: &str = "AI analysis completed.";
pub const DEFAULT_FOLLOW_UP: &str =
    "Review the recommended services with the patient's provider before ordering.";

/// Model-backed recommendation path:
/// prompt → LLM (JSON mode) → parse → validate → cooldown → result
pub struct PrimarySynthesizer {
    llm: Box<dyn LlmClient + Send + Sync>,
    catalog: Arc<Catalog>,
    system_prompt: String,
    temperature: f32,
}

impl PrimarySynthesizer {
    pub fn new(llm: Box<dyn LlmClient + Send + Sync>, catalog: Arc<Catalog>) -> Self {
        let system_prompt = build_system_prompt(&catalog);
        Self {
            llm,
            catalog,
            system_prompt,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Run one synthesis. Any transport, parse or shape failure is returned
    /// as an error; unknown codes and bad scores are not errors.
    pub fn synthesize(
        &self,
        profile: &PatientProfile,
        patient_data: &PatientData,
        prior_ancillaries: &[PriorAncillaryRecord],
        today: NaiveDate,
    ) -> Result<AIAnalysisResult, SynthesisError> {
        let prompt = build_patient_prompt(profile, patient_data);
        let response = self.llm.generate(
            &self.system_prompt,
            &prompt,
            &GenerationOptions::json(self.temperature),
        )?;

        let raw = parse_analysis_response(&response)?;

        let ctx = ValidationContext {
            catalog: self.catalog.as_ref(),
            payor: profile.payor_type,
            prior_ancillaries,
            today,
        };
        let outcome = validate_recommendations(&raw.recommendations, &ctx);

        if !outcome.dropped.is_empty() {
            tracing::debug!(
                patient_uuid = %profile.patient_uuid,
                dropped = ?outcome.dropped,
                "Model proposed services outside the catalog"
            );
        }

        Ok(AIAnalysisResult {
            patient_uuid: profile.patient_uuid,
            analysis_timestamp: Utc::now(),
            recommendations: outcome.recommendations,
            overall_summary: raw
                .overall_summary
                .unwrap_or_else(|| DEFAULT_SUMMARY.to_string()),
            risk_factors_identified: raw.risk_factors_identified.unwrap_or_default(),
            suggested_follow_up: raw
                .suggested_follow_up
                .unwrap_or_else(|| DEFAULT_FOLLOW_UP.to_string()),
        })
    }

    /// Ask the model for a short evidence-backed justification.
    pub fn evidence_justification(
        &self,
        service: &AncillaryService,
        clinical_context: &str,
    ) -> Result<String, SynthesisError> {
        let prompt = build_evidence_prompt(service, clinical_context);
        let response = self.llm.generate(
            EVIDENCE_SYSTEM_PROMPT,
            &prompt,
            &GenerationOptions::text(self.temperature),
        )?;
        let text = response.trim();
        if text.is_empty() {
            return Err(SynthesisError::EmptyResponse);
        }
        Ok(text.to_string())
    }
}
