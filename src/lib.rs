pub mod analysis; // Entry point: primary path with rule-based fallback
pub mod catalog;
pub mod config;
pub mod cooldown;
pub mod fallback;
pub mod models;
pub mod synthesis;

pub use analysis::{Analyzer, EngineError};
pub use catalog::{AncillaryService, Catalog, CatalogError};
pub use config::EngineConfig;
pub use models::{
    AIAnalysisResult, AncillaryRecommendation, CooldownStatus, PatientData, PatientProfile,
    PayorType, PriorAncillaryRecord, Priority, RepeatPolicy,
};
pub use synthesis::{LlmClient, OllamaClient, SynthesisError};

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. Honors `RUST_LOG`.
///
/// Returns `false` when a subscriber was already installed; that one stays active.
pub fn init_tracing() -> bool {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!("{} v{} tracing initialized", config::APP_NAME, config::APP_VERSION);
    }
    installed
}
