use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::PayorType;

/// Clinical profile of a patient, owned by an external profile store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientProfile {
    pub patient_uuid: Uuid,
    #[serde(default)]
    pub medical_history: String,
    /// Conventionally one medication per line.
    #[serde(default)]
    pub medications: String,
    #[serde(default)]
    pub patient_notes: String,
    #[serde(default)]
    pub payor_type: PayorType,
}

impl PatientProfile {
    /// Number of non-blank lines in the medication list.
    pub fn medication_count(&self) -> usize {
        self.medications
            .lines()
            .filter(|line| !line.trim().is_empty())
            .count()
    }

    /// History, medications and notes joined into one lowercase blob.
    pub fn combined_text_lower(&self) -> String {
        format!(
            "{}\n{}\n{}",
            self.medical_history, self.medications, self.patient_notes
        )
        .to_lowercase()
    }
}

/// Demographics from the clinical-records API, used only for prompt context.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientData {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// As delivered upstream (usually YYYY-MM-DD).
    pub date_of_birth: Option<String>,
    pub insurance_name: Option<String>,
}

impl PatientData {
    pub fn display_name(&self) -> Option<String> {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

/// A previously completed ancillary service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorAncillaryRecord {
    pub ancillary_code: String,
    pub completed_date: NaiveDate,
}

/// Most recent completion date recorded for `code`, if any.
pub fn latest_completion(records: &[PriorAncillaryRecord], code: &str) -> Option<NaiveDate> {
    records
        .iter()
        .filter(|r| r.ancillary_code.trim() == code)
        .map(|r| r.completed_date)
        .max()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn medication_count_skips_blank_lines() {
        let profile = PatientProfile {
            medications: "Metformin 500mg\n\n  \nLisinopril 10mg\nAspirin 81mg\n".into(),
            ..Default::default()
        };
        assert_eq!(profile.medication_count(), 3);
    }

    #[test]
    fn combined_text_is_lowercase() {
        let profile = PatientProfile {
            medical_history: "Hypertension".into(),
            medications: "Metformin".into(),
            patient_notes: "Reports DIZZINESS".into(),
            ..Default::default()
        };
        let text = profile.combined_text_lower();
        assert!(text.contains("hypertension"));
        assert!(text.contains("metformin"));
        assert!(text.contains("dizziness"));
    }

    #[test]
    fn profile_deserializes_with_missing_text_fields() {
        let json = r#"{"patient_uuid":"6f1c1f4e-8f5c-4a57-9c35-1d0f6b1f2a11","payor_type":"PPO"}"#;
        let profile: PatientProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.payor_type, PayorType::Ppo);
        assert!(profile.medical_history.is_empty());
    }

    #[test]
    fn display_name_joins_present_parts() {
        let data = PatientData {
            first_name: Some("Ada".into()),
            last_name: Some(" Lovelace ".into()),
            ..Default::default()
        };
        assert_eq!(data.display_name().as_deref(), Some("Ada Lovelace"));
        assert!(PatientData::default().display_name().is_none());
    }

    #[test]
    fn latest_completion_picks_most_recent() {
        let records = vec![
            PriorAncillaryRecord {
                ancillary_code: "ECHO".into(),
                completed_date: date(2024, 1, 10),
            },
            PriorAncillaryRecord {
                ancillary_code: "ECHO".into(),
                completed_date: date(2025, 3, 2),
            },
            PriorAncillaryRecord {
                ancillary_code: "PGX".into(),
                completed_date: date(2025, 6, 1),
            },
        ];
        assert_eq!(latest_completion(&records, "ECHO"), Some(date(2025, 3, 2)));
        assert_eq!(latest_completion(&records, "PGX"), Some(date(2025, 6, 1)));
        assert_eq!(latest_completion(&records, "BRAINSCAN"), None);
    }
}
