use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::models::PatientProfile;

/// Medication lists at or above this many entries count as polypharmacy.
pub const POLYPHARMACY_THRESHOLD: usize = 4;

/// Boolean risk factors detected from a patient's free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFlag {
    Hypertension,
    Diabetes,
    CardiacDisease,
    StrokeTia,
    CognitiveComplaints,
    AnxietyDepression,
    PeripheralArterialDisease,
    KidneyDisease,
    LiverDisease,
    EdemaDvt,
    Hyperlipidemia,
    Polypharmacy,
    Obesity,
    Smoking,
    MusculoskeletalPain,
    DizzinessSyncope,
    Fatigue,
    Neuropathy,
}

impl RiskFlag {
    pub const ALL: [RiskFlag; 18] = [
        Self::Hypertension,
        Self::Diabetes,
        Self::CardiacDisease,
        Self::StrokeTia,
        Self::CognitiveComplaints,
        Self::AnxietyDepression,
        Self::PeripheralArterialDisease,
        Self::KidneyDisease,
        Self::LiverDisease,
        Self::EdemaDvt,
        Self::Hyperlipidemia,
        Self::Polypharmacy,
        Self::Obesity,
        Self::Smoking,
        Self::MusculoskeletalPain,
        Self::DizzinessSyncope,
        Self::Fatigue,
        Self::Neuropathy,
    ];

    /// Flags reported in `risk_factors_identified`, in reporting order.
    pub const HEADLINE: [RiskFlag; 4] = [
        Self::Hypertension,
        Self::Diabetes,
        Self::CardiacDisease,
        Self::Hyperlipidemia,
    ];

    /// Clinician-facing label used in indications and risk factor lists.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Hypertension => "Hypertension",
            Self::Diabetes => "Diabetes",
            Self::CardiacDisease => "Cardiac disease",
            Self::StrokeTia => "History of stroke/TIA",
            Self::CognitiveComplaints => "Cognitive complaints",
            Self::AnxietyDepression => "Anxiety/depression",
            Self::PeripheralArterialDisease => "Peripheral arterial disease",
            Self::KidneyDisease => "Kidney disease",
            Self::LiverDisease => "Liver disease",
            Self::EdemaDvt => "Edema/DVT signs",
            Self::Hyperlipidemia => "Hyperlipidemia",
            Self::Polypharmacy => "Polypharmacy",
            Self::Obesity => "Obesity",
            Self::Smoking => "Smoking history",
            Self::MusculoskeletalPain => "Musculoskeletal pain",
            Self::DizzinessSyncope => "Dizziness/syncope",
            Self::Fatigue => "Fatigue",
            Self::Neuropathy => "Neuropathy",
        }
    }

    /// Lowercase stems anchored at a word start ("renal" must not hit "adrenal").
    fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Hypertension => &[
                "hypertension",
                "high blood pressure",
                "elevated blood pressure",
                "lisinopril",
                "losartan",
                "amlodipine",
                "hydrochlorothiazide",
            ],
            Self::Diabetes => &[
                "diabet",
                "prediabetes",
                "hyperglycemia",
                "metformin",
                "insulin",
                "glipizide",
                "a1c",
                "hba1c",
            ],
            Self::CardiacDisease => &[
                "heart failure",
                "coronary",
                "myocardial infarction",
                "heart attack",
                "atrial fibrillation",
                "arrhythmia",
                "angina",
                "cardiomyopathy",
                "palpitation",
                "stent",
                "heart disease",
            ],
            Self::StrokeTia => &[
                "stroke",
                "transient ischemic",
                "cerebrovascular",
            ],
            Self::CognitiveComplaints => &[
                "memory",
                "cognitive",
                "confusion",
                "forgetful",
                "dementia",
                "alzheimer",
                "brain fog",
            ],
            Self::AnxietyDepression => &[
                "anxiety",
                "anxious",
                "depression",
                "depressed",
                "panic",
                "sertraline",
                "escitalopram",
                "fluoxetine",
            ],
            Self::PeripheralArterialDisease => &[
                "peripheral arter",
                "peripheral vascular",
                "claudication",
            ],
            Self::KidneyDisease => &[
                "kidney",
                "renal",
                "creatinine",
                "nephropathy",
                "dialysis",
            ],
            Self::LiverDisease => &[
                "liver",
                "hepatic",
                "hepatitis",
                "cirrhosis",
            ],
            Self::EdemaDvt => &[
                "edema",
                "swelling",
                "deep vein",
                "thrombosis",
                "varicose",
            ],
            Self::Hyperlipidemia => &[
                "hyperlipidemia",
                "dyslipidemia",
                "cholesterol",
                "hypercholesterol",
                "triglyceride",
                "statin",
                "atorvastatin",
                "simvastatin",
                "rosuvastatin",
                "pravastatin",
                "lovastatin",
                "pitavastatin",
            ],
            Self::Polypharmacy => &[],
            Self::Obesity => &["obesity", "obese", "overweight"],
            Self::Smoking => &[
                "smoker",
                "smoking",
                "tobacco",
                "cigarette",
                "nicotine",
                "pack-year",
                "pack year",
            ],
            Self::MusculoskeletalPain => &[
                "back pain",
                "joint pain",
                "knee pain",
                "shoulder pain",
                "neck pain",
                "hip pain",
                "arthritis",
                "musculoskeletal",
                "fibromyalgia",
            ],
            Self::DizzinessSyncope => &[
                "dizz",
                "vertigo",
                "lightheaded",
                "light-headed",
                "syncope",
                "faint",
                "passed out",
                "orthostatic",
            ],
            Self::Fatigue => &[
                "fatigue",
                "tired",
                "exhaust",
                "low energy",
                "lethargy",
            ],
            Self::Neuropathy => &[
                "neuropathy",
                "polyneuropathy",
                "numbness",
                "tingling",
                "pins and needles",
                "burning feet",
                "gabapentin",
                "pregabalin",
            ],
        }
    }

    /// Short abbreviations, matched only as whole words ("tia" must not hit "initial").
    fn abbreviations(&self) -> &'static [&'static str] {
        match self {
            Self::Hypertension => &["htn"],
            Self::Diabetes => &["dm", "dm2", "t2dm", "iddm", "niddm"],
            Self::CardiacDisease => &["chf", "cad", "afib", "cabg", "mi"],
            Self::StrokeTia => &["tia", "cva"],
            Self::CognitiveComplaints => &["mci"],
            Self::AnxietyDepression => &["gad", "mdd", "ptsd"],
            Self::PeripheralArterialDisease => &["pvd"],
            Self::KidneyDisease => &["ckd", "esrd", "aki"],
            Self::LiverDisease => &["nafld", "nash"],
            Self::EdemaDvt => &["dvt"],
            Self::Hyperlipidemia => &["hld", "ldl"],
            Self::Obesity => &["bmi 3\\d", "bmi 4\\d"],
            Self::Smoking => &["copd"],
            Self::Polypharmacy
            | Self::MusculoskeletalPain
            | Self::DizzinessSyncope
            | Self::Fatigue
            | Self::Neuropathy => &[],
        }
    }
}

static FLAG_PATTERNS: LazyLock<Vec<(RiskFlag, Regex)>> = LazyLock::new(|| {
    RiskFlag::ALL
        .iter()
        .filter_map(|flag| {
            let mut branches = Vec::new();
            if !flag.keywords().is_empty() {
                let stems: Vec<String> = flag.keywords().iter().map(|k| regex::escape(k)).collect();
                branches.push(format!(r"\b(?:{})", stems.join("|")));
            }
            if !flag.abbreviations().is_empty() {
                branches.push(format!(r"\b(?:{})\b", flag.abbreviations().join("|")));
            }
            if branches.is_empty() {
                return None;
            }
            let regex = Regex::new(&branches.join("|")).expect("Invalid risk flag pattern");
            Some((*flag, regex))
        })
        .collect()
});

/// Risk flags present for one patient.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectedRisks {
    flags: Vec<RiskFlag>,
}

impl DetectedRisks {
    pub fn contains(&self, flag: RiskFlag) -> bool {
        self.flags.contains(&flag)
    }

    pub fn any_of(&self, flags: &[RiskFlag]) -> bool {
        flags.iter().any(|f| self.contains(*f))
    }

    /// Flags in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = RiskFlag> + '_ {
        self.flags.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Labels of the headline risk factors that are present.
    pub fn headline_labels(&self) -> Vec<String> {
        RiskFlag::HEADLINE
            .iter()
            .filter(|f| self.contains(**f))
            .map(|f| f.label().to_string())
            .collect()
    }
}

/// Detect risk flags from history, medications and notes.
pub fn detect_risk_flags(profile: &PatientProfile) -> DetectedRisks {
    let text = profile.combined_text_lower();
    let medication_count = profile.medication_count();

    let flags = RiskFlag::ALL
        .iter()
        .copied()
        .filter(|flag| match flag {
            RiskFlag::Polypharmacy => medication_count >= POLYPHARMACY_THRESHOLD,
            _ => matches_text(*flag, &text),
        })
        .collect();

    DetectedRisks { flags }
}

fn matches_text(flag: RiskFlag, text: &str) -> bool {
    FLAG_PATTERNS
        .iter()
        .any(|(f, regex)| *f == flag && regex.is_match(text))
}
