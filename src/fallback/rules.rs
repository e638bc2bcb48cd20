use super::flags::RiskFlag;
use crate::models::Priority;

/// One row of the fallback rule table: a service is a candidate when any of
/// `any_of` is present.
#[derive(Debug, Clone, Copy)]
pub struct ServiceRule {
    pub code: &'static str,
    pub any_of: &'static [RiskFlag],
    pub score: u8,
    pub priority: Priority,
    pub citations: &'static [&'static str],
}

use RiskFlag::*;

pub static SERVICE_RULES: &[ServiceRule] = &[
    ServiceRule {
        code: "BRAINSCAN",
        any_of: &[
            Hypertension,
            Diabetes,
            StrokeTia,
            CognitiveComplaints,
            AnxietyDepression,
            Polypharmacy,
        ],
        score: 85,
        priority: Priority::High,
        citations: &[
            "AHA/ASA Scientific Statement: Impact of Hypertension on Cognitive Function (2016)",
            "ADA Standards of Care: Older Adults, cognitive screening in diabetes",
        ],
    },
    ServiceRule {
        code: "ANS_CARDIO",
        any_of: &[
            Hypertension,
            Diabetes,
            CardiacDisease,
            DizzinessSyncope,
            Fatigue,
            Neuropathy,
        ],
        score: 82,
        priority: Priority::High,
        citations: &[
            "ADA Position Statement: Diabetic Neuropathy, cardiovascular autonomic testing (2017)",
            "Consensus Statement on Orthostatic Hypotension and Autonomic Failure (Clin Auton Res 2011)",
        ],
    },
    ServiceRule {
        code: "ECHO",
        any_of: &[CardiacDisease, EdemaDvt],
        score: 80,
        priority: Priority::High,
        citations: &["ACC/AHA Appropriate Use Criteria for Echocardiography (2011)"],
    },
    ServiceRule {
        code: "SUDOMOTOR",
        any_of: &[Diabetes, Neuropathy, KidneyDisease],
        score: 78,
        priority: Priority::Medium,
        citations: &["ADA Position Statement: Diabetic Neuropathy (2017)"],
    },
    ServiceRule {
        code: "VASCULAR_ABI",
        any_of: &[PeripheralArterialDisease, Diabetes, Smoking, Hyperlipidemia],
        score: 76,
        priority: Priority::Medium,
        citations: &["AHA/ACC Guideline on Lower Extremity Peripheral Artery Disease (2016)"],
    },
    ServiceRule {
        code: "PGX",
        any_of: &[Polypharmacy, AnxietyDepression],
        score: 75,
        priority: Priority::Medium,
        citations: &["CPIC Guidelines for gene-drug pairs (cpicpgx.org)"],
    },
    ServiceRule {
        code: "CAROTID_US",
        any_of: &[StrokeTia, Hyperlipidemia, Smoking, DizzinessSyncope],
        score: 74,
        priority: Priority::Medium,
        citations: &["ASA/ACCF/AHA Guideline on Extracranial Carotid and Vertebral Artery Disease (2011)"],
    },
    ServiceRule {
        code: "VENOUS_DUPLEX",
        any_of: &[EdemaDvt],
        score: 72,
        priority: Priority::Medium,
        citations: &["ACR Appropriateness Criteria: Suspected Lower Extremity DVT"],
    },
    ServiceRule {
        code: "RENAL_US",
        any_of: &[KidneyDisease],
        score: 70,
        priority: Priority::Medium,
        citations: &["KDIGO Clinical Practice Guideline for CKD Evaluation and Management (2012)"],
    },
    ServiceRule {
        code: "BEHAVIORAL_SCREEN",
        any_of: &[AnxietyDepression, CognitiveComplaints],
        score: 70,
        priority: Priority::Medium,
        citations: &["USPSTF Recommendation: Screening for Depression and Anxiety in Adults (2023)"],
    },
    ServiceRule {
        code: "SLEEP_STUDY",
        any_of: &[Obesity, Fatigue],
        score: 68,
        priority: Priority::Medium,
        citations: &["AASM Clinical Practice Guideline for Diagnostic Testing for Adult OSA (2017)"],
    },
    ServiceRule {
        code: "ABDOMINAL_US",
        any_of: &[LiverDisease, Smoking, Obesity],
        score: 65,
        priority: Priority::Low,
        citations: &[
            "AASLD Practice Guidance on NAFLD (2018)",
            "USPSTF Recommendation: Screening for Abdominal Aortic Aneurysm (2019)",
        ],
    },
    ServiceRule {
        code: "MSK_US",
        any_of: &[MusculoskeletalPain],
        score: 62,
        priority: Priority::Low,
        citations: &["ACR Appropriateness Criteria: Chronic Extremity Joint Pain"],
    },
    ServiceRule {
        code: "CARDIO_GENETIC",
        any_of: &[Hyperlipidemia, CardiacDisease],
        score: 60,
        priority: Priority::Low,
        citations: &["AHA Scientific Statement: Genetic Testing for Inherited Cardiovascular Diseases (2020)"],
    },
];
