//! Reference table of orderable ancillary services.
//!
//! Loaded once at startup (built-in table or a JSON file) and shared
//! read-only across analyses.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{PayorType, RepeatPolicy};

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog {0}: {1}")]
    Load(String, String),

    #[error("Failed to parse catalog {0}: {1}")]
    Parse(String, String),

    #[error("Duplicate service code in catalog: {0}")]
    DuplicateCode(String),

    #[error("Catalog entry with empty code: {0}")]
    EmptyCode(String),
}

/// A catalogued ancillary service definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AncillaryService {
    pub code: String,
    pub name: String,
    pub category: String,
    pub repeat_policy: RepeatPolicy,
    #[serde(default)]
    pub cooldown_months_medicare: Option<u32>,
    #[serde(default)]
    pub cooldown_months_ppo: Option<u32>,
    /// Short qualification heuristics rendered into the primary prompt.
    #[serde(default)]
    pub qualification_hints: Vec<String>,
}

impl AncillaryService {
    /// Cooldown months for a payor. Medicare uses its own column; every other
    /// payor type uses the PPO column.
    pub fn cooldown_months_for(&self, payor: PayorType) -> Option<u32> {
        match payor {
            PayorType::Medicare => self.cooldown_months_medicare,
            _ => self.cooldown_months_ppo,
        }
    }
}

/// Immutable set of services keyed by unique code.
#[derive(Debug, Clone)]
pub struct Catalog {
    services: Vec<AncillaryService>,
}

impl Catalog {
    /// Build a catalog, trimming codes and rejecting empty or duplicate ones.
    pub fn from_services(mut services: Vec<AncillaryService>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for service in &mut services {
            let code = service.code.trim();
            if code.is_empty() {
                return Err(CatalogError::EmptyCode(service.name.clone()));
            }
            if code.len() != service.code.len() {
                service.code = code.to_string();
            }
            if !seen.insert(service.code.clone()) {
                return Err(CatalogError::DuplicateCode(service.code.clone()));
            }
        }
        Ok(Self { services })
    }

    /// Load a catalog from a JSON array of services.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::Load(path.display().to_string(), e.to_string()))?;
        let services: Vec<AncillaryService> = serde_json::from_str(&json)
            .map_err(|e| CatalogError::Parse(path.display().to_string(), e.to_string()))?;
        let catalog = Self::from_services(services)?;
        tracing::info!(
            path = %path.display(),
            services = catalog.len(),
            "Loaded ancillary catalog"
        );
        Ok(catalog)
    }

    /// The built-in service table.
    pub fn standard() -> Self {
        Self {
            services: standard_services(),
        }
    }

    pub fn get(&self, code: &str) -> Option<&AncillaryService> {
        let code = code.trim();
        self.services.iter().find(|s| s.code == code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AncillaryService> {
        self.services.iter()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn service(
    code: &str,
    name: &str,
    category: &str,
    repeat_policy: RepeatPolicy,
    cooldown: Option<(u32, u32)>,
    hints: &[&str],
) -> AncillaryService {
    AncillaryService {
        code: code.into(),
        name: name.into(),
        category: category.into(),
        repeat_policy,
        cooldown_months_medicare: cooldown.map(|(medicare, _)| medicare),
        cooldown_months_ppo: cooldown.map(|(_, ppo)| ppo),
        qualification_hints: hints.iter().map(|h| h.to_string()).collect(),
    }
}

fn standard_services() -> Vec<AncillaryService> {
    use RepeatPolicy::*;
    vec![
        service(
            "BRAINSCAN",
            "EEG-Based Neurocognitive Screen",
            "Neurology",
            Cooldown,
            Some((12, 6)),
            &[
                "hypertension or diabetes (vascular risk to cognition)",
                "memory complaints, confusion, brain fog",
                "history of stroke, TIA or head injury",
                "anxiety, depression or sleep disturbance",
                "polypharmacy with CNS-active medications",
            ],
        ),
        service(
            "ANS_CARDIO",
            "Autonomic Nervous System & Cardiovascular Screen",
            "Cardiology",
            Cooldown,
            Some((12, 6)),
            &[
                "hypertension or diabetes",
                "dizziness, lightheadedness, syncope or orthostatic symptoms",
                "palpitations, known cardiac disease or arrhythmia",
                "fatigue or exercise intolerance",
                "peripheral neuropathy",
            ],
        ),
        service(
            "SUDOMOTOR",
            "Sudomotor Function & Small-Fiber Neuropathy Test",
            "Neurology",
            Cooldown,
            Some((12, 6)),
            &[
                "diabetes or prediabetes",
                "numbness, tingling or burning in hands or feet",
                "chronic kidney disease",
            ],
        ),
        service(
            "VASCULAR_ABI",
            "Ankle-Brachial Index / Peripheral Arterial Study",
            "Vascular",
            Cooldown,
            Some((12, 12)),
            &[
                "peripheral arterial disease or claudication",
                "diabetes, smoking history or hyperlipidemia",
                "hypertension with leg pain or cold extremities",
            ],
        ),
        service(
            "CAROTID_US",
            "Carotid Duplex Ultrasound",
            "Vascular",
            Cooldown,
            Some((12, 12)),
            &[
                "history of stroke or TIA",
                "hypertension with hyperlipidemia",
                "smoking history",
                "dizziness or syncope",
            ],
        ),
        service(
            "ECHO",
            "Transthoracic Echocardiogram",
            "Cardiology",
            Cooldown,
            Some((12, 12)),
            &[
                "heart failure, CAD, prior MI or arrhythmia",
                "long-standing hypertension",
                "lower-extremity edema or shortness of breath",
            ],
        ),
        service(
            "VENOUS_DUPLEX",
            "Lower Extremity Venous Duplex",
            "Vascular",
            Cooldown,
            Some((6, 6)),
            &[
                "leg swelling, edema or varicose veins",
                "history or suspicion of DVT",
            ],
        ),
        service(
            "RENAL_US",
            "Renal Ultrasound",
            "Radiology",
            Cooldown,
            Some((12, 12)),
            &[
                "chronic kidney disease or elevated creatinine",
                "resistant hypertension",
            ],
        ),
        service(
            "ABDOMINAL_US",
            "Abdominal Ultrasound / Aortic Screen",
            "Radiology",
            Cooldown,
            Some((12, 12)),
            &[
                "liver disease, fatty liver or abnormal liver enzymes",
                "smoking history (aortic aneurysm screen)",
                "obesity with metabolic syndrome",
            ],
        ),
        service(
            "SLEEP_STUDY",
            "Home Sleep Apnea Test",
            "Pulmonology",
            Cooldown,
            Some((12, 12)),
            &[
                "obesity",
                "hypertension with daytime fatigue",
                "snoring, insomnia or non-restorative sleep",
            ],
        ),
        service(
            "PGX",
            "Pharmacogenomic Testing Panel",
            "Genetics",
            OnceOnly,
            None,
            &[
                "four or more active medications",
                "anxiety or depression treated with psychotropics",
                "cardiac disease on anticoagulants or antiplatelets",
            ],
        ),
        service(
            "CARDIO_GENETIC",
            "Hereditary Cardiovascular Genetic Panel",
            "Genetics",
            OnceOnly,
            None,
            &[
                "hyperlipidemia, especially early onset",
                "premature cardiac disease or family history of it",
            ],
        ),
        service(
            "BEHAVIORAL_SCREEN",
            "Behavioral Health Screening",
            "Behavioral Health",
            NoLimit,
            None,
            &[
                "anxiety, depression, stress or mood changes",
                "cognitive complaints",
                "chronic pain",
            ],
        ),
        service(
            "MSK_US",
            "Musculoskeletal Ultrasound",
            "Orthopedics",
            NoLimit,
            None,
            &[
                "joint, back, shoulder or knee pain",
                "arthritis or tendon injury",
            ],
        ),
    ]
}
