//! Public entry point for ancillary analysis.
//!
//! `analyze` tries the model-backed path first and substitutes the
//! rule-based classifier on any failure. Neither `analyze` nor
//! `evidence_summary` returns an error to the caller.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use thiserror::Error;
use uuid::Uuid;

use crate::catalog::{Catalog, CatalogError};
use crate::config::{ConfigError, EngineConfig};
use crate::fallback;
use crate::models::{AIAnalysisResult, PatientData, PatientProfile, PriorAncillaryRecord};
use crate::synthesis::{LlmClient, OllamaClient, PrimarySynthesizer, SynthesisError};

pub const SERVICE_NOT_FOUND: &str = "Service not found in catalog.";

/// Errors raised while assembling an [`Analyzer`].
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to build language model client: {0}")]
    Client(#[from] SynthesisError),
}

pub struct Analyzer {
    synthesizer: PrimarySynthesizer,
    catalog: Arc<Catalog>,
    reference_date: Option<NaiveDate>,
}

impl Analyzer {
    pub fn new(llm: Box<dyn LlmClient + Send + Sync>, catalog: Arc<Catalog>) -> Self {
        Self {
            synthesizer: PrimarySynthesizer::new(llm, Arc::clone(&catalog)),
            catalog,
            reference_date: None,
        }
    }

    /// Build an analyzer backed by Ollama, loading the catalog file when one
    /// is configured.
    pub fn from_config(config: &EngineConfig) -> Result<Self, EngineError> {
        let catalog = match &config.catalog_path {
            Some(path) => Catalog::load(path)?,
            None => Catalog::standard(),
        };
        let client = OllamaClient::from_config(config)?;
        tracing::info!(
            model = client.model(),
            services = catalog.len(),
            "Ancillary analyzer ready"
        );
        Ok(Self::new(Box::new(client), Arc::new(catalog)).with_temperature(config.temperature))
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.synthesizer = self.synthesizer.with_temperature(temperature);
        self
    }

    /// Pin "today" for cooldown evaluation.
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn today(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| Local::now().date_naive())
    }

    /// Recommend ancillary services for one patient.
    pub fn analyze(
        &self,
        patient_uuid: Uuid,
        profile: &PatientProfile,
        patient_data: &PatientData,
        prior_ancillaries: &[PriorAncillaryRecord],
    ) -> AIAnalysisResult {
        let span = tracing::info_span!("ancillary_analysis", patient_uuid = %patient_uuid);
        let _enter = span.enter();

        let today = self.today();
        let mut result =
            match self
                .synthesizer
                .synthesize(profile, patient_data, prior_ancillaries, today)
            {
                Ok(result) => {
                    tracing::info!(
                        recommendations = result.recommendations.len(),
                        "AI analysis complete"
                    );
                    result
                }
                Err(e) => {
                    tracing::warn!(error = %e, "AI analysis failed, using rule-based fallback");
                    fallback::classify(profile, prior_ancillaries, &self.catalog, today)
                }
            };

        result.patient_uuid = patient_uuid;
        result
    }

    /// Short evidence-backed justification for ordering `ancillary_code`.
    pub fn evidence_summary(&self, ancillary_code: &str, clinical_context: &str) -> String {
        let Some(service) = self.catalog.get(ancillary_code) else {
            tracing::debug!(code = ancillary_code, "Evidence requested for unknown service");
            return SERVICE_NOT_FOUND.to_string();
        };

        match self
            .synthesizer
            .evidence_justification(service, clinical_context)
        {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(code = %service.code, error = %e, "Evidence summary failed");
                format!(
                    "{} may be clinically indicated based on the documented findings. \
                     Evidence summary is currently unavailable; review current guidelines \
                     before ordering.",
                    service.name
                )
            }
        }
    }
}
