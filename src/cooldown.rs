//! Repeat/cooldown gating shared by both reasoning paths.

use chrono::{Local, Months, NaiveDate};
use serde::Serialize;

use crate::catalog::AncillaryService;
use crate::models::{CooldownStatus, PayorType, RepeatPolicy};

/// Eligibility of a service for re-ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CooldownEvaluation {
    pub status: CooldownStatus,
    /// Set only for `InCooldown`.
    pub eligible_date: Option<NaiveDate>,
}

impl CooldownEvaluation {
    fn status(status: CooldownStatus) -> Self {
        Self {
            status,
            eligible_date: None,
        }
    }
}

/// Evaluate against today's local date.
pub fn evaluate(
    service: &AncillaryService,
    payor: PayorType,
    last_completed: Option<NaiveDate>,
) -> CooldownEvaluation {
    evaluate_at(service, payor, last_completed, Local::now().date_naive())
}

/// Evaluate against an explicit reference date.
pub fn evaluate_at(
    service: &AncillaryService,
    payor: PayorType,
    last_completed: Option<NaiveDate>,
    today: NaiveDate,
) -> CooldownEvaluation {
    match service.repeat_policy {
        RepeatPolicy::NoLimit => CooldownEvaluation::status(CooldownStatus::NoLimit),
        RepeatPolicy::OnceOnly => match last_completed {
            Some(_) => CooldownEvaluation::status(CooldownStatus::OnceOnlyCompleted),
            None => CooldownEvaluation::status(CooldownStatus::Eligible),
        },
        RepeatPolicy::Cooldown => {
            let Some(completed) = last_completed else {
                return CooldownEvaluation::status(CooldownStatus::Eligible);
            };
            let Some(months) = service.cooldown_months_for(payor) else {
                return CooldownEvaluation::status(CooldownStatus::Eligible);
            };
            // Overflow past chrono's max date.
            let Some(eligible_date) = completed.checked_add_months(Months::new(months)) else {
                return CooldownEvaluation::status(CooldownStatus::Eligible);
            };
            if today >= eligible_date {
                CooldownEvaluation::status(CooldownStatus::Eligible)
            } else {
                CooldownEvaluation {
                    status: CooldownStatus::InCooldown,
                    eligible_date: Some(eligible_date),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn svc(policy: RepeatPolicy, medicare: Option<u32>, ppo: Option<u32>) -> AncillaryService {
        AncillaryService {
            code: "TEST".into(),
            name: "Test Service".into(),
            category: "Testing".into(),
            repeat_policy: policy,
            cooldown_months_medicare: medicare,
            cooldown_months_ppo: ppo,
            qualification_hints: vec![],
        }
    }

    fn today() -> NaiveDate {
        date(2025, 7, 15)
    }

    #[test]
    fn no_limit_ignores_prior_completion() {
        let s = svc(RepeatPolicy::NoLimit, None, None);
        for last in [None, Some(date(2025, 7, 14)), Some(date(2001, 1, 1))] {
            let eval = evaluate_at(&s, PayorType::Medicare, last, today());
            assert_eq!(eval.status, CooldownStatus::NoLimit);
            assert!(eval.eligible_date.is_none());
        }
    }

    #[test]
    fn once_only_completed_regardless_of_age() {
        let s = svc(RepeatPolicy::OnceOnly, None, None);
        let eval = evaluate_at(&s, PayorType::Ppo, Some(date(2005, 3, 1)), today());
        assert_eq!(eval.status, CooldownStatus::OnceOnlyCompleted);
        assert!(eval.eligible_date.is_none());
    }

    #[test]
    fn once_only_eligible_without_completion() {
        let s = svc(RepeatPolicy::OnceOnly, None, None);
        let eval = evaluate_at(&s, PayorType::Ppo, None, today());
        assert_eq!(eval.status, CooldownStatus::Eligible);
    }

    #[test]
    fn cooldown_without_completion_is_eligible() {
        let s = svc(RepeatPolicy::Cooldown, Some(12), Some(12));
        let eval = evaluate_at(&s, PayorType::Ppo, None, today());
        assert_eq!(eval.status, CooldownStatus::Eligible);
    }

    #[test]
    fn ppo_six_months_ago_is_in_cooldown() {
        let s = svc(RepeatPolicy::Cooldown, None, Some(12));
        let last = date(2025, 1, 15);
        let eval = evaluate_at(&s, PayorType::Ppo, Some(last), today());
        assert_eq!(eval.status, CooldownStatus::InCooldown);
        assert_eq!(eval.eligible_date, Some(date(2026, 1, 15)));
    }

    #[test]
    fn ppo_thirteen_months_ago_is_eligible() {
        let s = svc(RepeatPolicy::Cooldown, None, Some(12));
        let eval = evaluate_at(&s, PayorType::Ppo, Some(date(2024, 6, 15)), today());
        assert_eq!(eval.status, CooldownStatus::Eligible);
        assert!(eval.eligible_date.is_none());
    }

    #[test]
    fn eligible_on_exact_eligible_date() {
        let s = svc(RepeatPolicy::Cooldown, None, Some(12));
        let eval = evaluate_at(&s, PayorType::Ppo, Some(date(2024, 7, 15)), today());
        assert_eq!(eval.status, CooldownStatus::Eligible);
    }

    #[test]
    fn day_before_eligible_date_is_in_cooldown() {
        let s = svc(RepeatPolicy::Cooldown, None, Some(12));
        let eval = evaluate_at(&s, PayorType::Ppo, Some(date(2024, 7, 16)), today());
        assert_eq!(eval.status, CooldownStatus::InCooldown);
        assert_eq!(eval.eligible_date, Some(date(2025, 7, 16)));
    }

    #[test]
    fn medicare_uses_medicare_duration() {
        let s = svc(RepeatPolicy::Cooldown, Some(12), Some(6));
        let last = Some(date(2025, 1, 1));
        let medicare = evaluate_at(&s, PayorType::Medicare, last, today());
        assert_eq!(medicare.status, CooldownStatus::InCooldown);
        assert_eq!(medicare.eligible_date, Some(date(2026, 1, 1)));

        let ppo = evaluate_at(&s, PayorType::Ppo, last, today());
        assert_eq!(ppo.status, CooldownStatus::Eligible);
    }

    #[test]
    fn non_medicare_payors_use_ppo_duration() {
        let s = svc(RepeatPolicy::Cooldown, Some(3), Some(24));
        let last = Some(date(2024, 1, 1));
        for payor in [PayorType::Medicaid, PayorType::Hmo, PayorType::Other, PayorType::Unknown] {
            let eval = evaluate_at(&s, payor, last, today());
            assert_eq!(eval.status, CooldownStatus::InCooldown, "{payor}");
            assert_eq!(eval.eligible_date, Some(date(2026, 1, 1)));
        }
    }

    #[test]
    fn missing_duration_for_payor_means_no_limit_on_timing() {
        let s = svc(RepeatPolicy::Cooldown, None, Some(12));
        let eval = evaluate_at(&s, PayorType::Medicare, Some(date(2025, 7, 1)), today());
        assert_eq!(eval.status, CooldownStatus::Eligible);
    }

    #[test]
    fn month_end_clamps() {
        let s = svc(RepeatPolicy::Cooldown, None, Some(1));
        let eval = evaluate_at(&s, PayorType::Ppo, Some(date(2025, 1, 31)), date(2025, 2, 1));
        assert_eq!(eval.status, CooldownStatus::InCooldown);
        assert_eq!(eval.eligible_date, Some(date(2025, 2, 28)));
    }

    #[test]
    fn evaluate_uses_current_date() {
        let s = svc(RepeatPolicy::Cooldown, None, Some(12));
        let yesterday = Local::now().date_naive().pred_opt().unwrap();
        assert_eq!(
            evaluate(&s, PayorType::Ppo, Some(yesterday)).status,
            CooldownStatus::InCooldown
        );
    }
}
