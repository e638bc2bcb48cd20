use std::fmt::Write;

use crate::catalog::{AncillaryService, Catalog};
use crate::models::{PatientData, PatientProfile};

const ANALYSIS_INSTRUCTIONS: &str = r#"You are a clinical decision-support assistant that identifies ancillary
diagnostic and therapeutic services a patient may qualify for. Your output is
advisory and will be reviewed by a licensed clinician.

RULES:
1. Only recommend services from the AVAILABLE SERVICES list, using their exact code.
2. Be permissive: recommend a service when ANY of its qualification indicators
   is plausibly supported by the history, medications or notes.
3. Medications imply their treated conditions (e.g. metformin implies diabetes).
4. qualification_score is an integer from 0 to 100.
5. priority is one of: high, medium, low.
6. Respond with a single JSON object and nothing else."#;

const RESPONSE_FORMAT: &str = r#"RESPONSE FORMAT:
{
  "recommendations": [
    {
      "ancillary_code": "CODE",
      "qualification_score": 0,
      "clinical_indications": ["indication supported by the record"],
      "evidence_citations": ["guideline or study supporting the service"],
      "priority": "high | medium | low"
    }
  ],
  "overall_summary": "one or two sentences",
  "risk_factors_identified": ["risk factor"],
  "suggested_follow_up": "next steps for the care team"
}"#;

pub const EVIDENCE_SYSTEM_PROMPT: &str = "You are a clinical evidence assistant. Given an \
ancillary service and a patient's clinical context, write a brief, evidence-based justification \
(2-3 sentences) citing relevant clinical guidelines. Do not diagnose. Plain text only.";

/// Build the analysis system prompt from the catalog, so the service list and
/// qualification guide always match the services that can be validated.
pub fn build_system_prompt(catalog: &Catalog) -> String {
    let mut prompt = String::from(ANALYSIS_INSTRUCTIONS);
    prompt.push_str("\n\nAVAILABLE SERVICES:\n");
    for service in catalog.iter() {
        push_service_entry(&mut prompt, service);
    }
    prompt.push('\n');
    prompt.push_str(RESPONSE_FORMAT);
    prompt
}

fn push_service_entry(prompt: &mut String, service: &AncillaryService) {
    // Writing into a String cannot fail.
    let _ = writeln!(
        prompt,
        "- {} | {} | {}",
        service.code, service.name, service.category
    );
    if !service.qualification_hints.is_empty() {
        let _ = writeln!(
            prompt,
            "  Qualifies with: {}",
            service.qualification_hints.join("; ")
        );
    }
}

/// Build the per-patient user message.
pub fn build_patient_prompt(profile: &PatientProfile, data: &PatientData) -> String {
    let name = data.display_name().unwrap_or_else(|| "Unknown".into());
    let dob = data.date_of_birth.as_deref().unwrap_or("Unknown");
    let insurance = match data.insurance_name.as_deref() {
        Some(plan) if !plan.trim().is_empty() => {
            format!("{} ({})", profile.payor_type, plan.trim())
        }
        _ => profile.payor_type.to_string(),
    };

    format!(
        r#"PATIENT:
Name: {name}
Date of birth: {dob}
Payor: {insurance}

<medical_history>
{history}
</medical_history>

<medications>
{medications}
</medications>

<clinical_notes>
{notes}
</clinical_notes>

Identify every ancillary service from the list that this patient may qualify for."#,
        history = or_none(&profile.medical_history),
        medications = or_none(&profile.medications),
        notes = or_none(&profile.patient_notes),
    )
}

/// Build the evidence-summary user message.
pub fn build_evidence_prompt(service: &AncillaryService, clinical_context: &str) -> String {
    format!(
        "Service: {} ({})\nCategory: {}\n\nClinical context:\n{}\n\nProvide the justification.",
        service.name,
        service.code,
        service.category,
        or_none(clinical_context)
    )
}

fn or_none(text: &str) -> &str {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        "None documented"
    } else {
        trimmed
    }
}
