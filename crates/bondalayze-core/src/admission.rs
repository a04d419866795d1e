//! Quota & capability gate.
//!
//! A pure decision over already-resolved inputs. Usage counts come from the
//! caller (which asks the persistence collaborator); nothing here performs
//! I/O or keeps state, so identical inputs always produce identical decisions.

use crate::error::BondaError;
use crate::plan::Plan;

/// Why a request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    TooManyImages { requested: usize, limit: usize },
    QuotaExceeded { used: u32, limit: u32 },
}

/// Outcome of [`check_admission`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Allow,
    Deny(DenyReason),
}

impl Admission {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Admission::Allow)
    }

    /// Converts a denial into the matching [`BondaError`].
    pub fn into_result(self, plan: Plan) -> Result<(), BondaError> {
        match self {
            Admission::Allow => Ok(()),
            Admission::Deny(DenyReason::TooManyImages { requested, limit }) => {
                Err(BondaError::TooManyImages {
                    plan,
                    requested,
                    limit,
                })
            }
            Admission::Deny(DenyReason::QuotaExceeded { used, limit }) => {
                Err(BondaError::QuotaExceeded { plan, used, limit })
            }
        }
    }
}

/// Decides whether a request may enter the pipeline.
///
/// The screenshot ceiling is checked before the monthly ceiling.
pub fn check_admission(
    plan: Plan,
    requested_image_count: usize,
    used_this_month: u32,
) -> Admission {
    let limits = plan.limits();

    if requested_image_count > limits.max_screenshots {
        return Admission::Deny(DenyReason::TooManyImages {
            requested: requested_image_count,
            limit: limits.max_screenshots,
        });
    }

    if let Some(limit) = limits.monthly_analyses
        && used_this_month >= limit
    {
        return Admission::Deny(DenyReason::QuotaExceeded {
            used: used_this_month,
            limit,
        });
    }

    Admission::Allow
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_plan_rejects_third_screenshot() {
        let decision = check_admission(Plan::Free, 3, 0);
        assert_eq!(
            decision,
            Admission::Deny(DenyReason::TooManyImages {
                requested: 3,
                limit: 2
            })
        );
    }

    #[test]
    fn test_pro_plan_allows_three_screenshots() {
        assert!(check_admission(Plan::Pro, 3, 0).is_allowed());
        assert!(!check_admission(Plan::Pro, 4, 0).is_allowed());
    }

    #[test]
    fn test_free_plan_quota_boundary() {
        assert!(check_admission(Plan::Free, 0, 9).is_allowed());
        assert_eq!(
            check_admission(Plan::Free, 0, 10),
            Admission::Deny(DenyReason::QuotaExceeded {
                used: 10,
                limit: 10
            })
        );
    }

    #[test]
    fn test_pro_plan_is_never_denied_on_usage() {
        assert!(check_admission(Plan::Pro, 0, 10_000).is_allowed());
        assert!(check_admission(Plan::Pro, 1, u32::MAX).is_allowed());
    }

    #[test]
    fn test_image_ceiling_checked_before_quota() {
        let decision = check_admission(Plan::Free, 5, 50);
        assert!(matches!(
            decision,
            Admission::Deny(DenyReason::TooManyImages { .. })
        ));
    }

    #[test]
    fn test_decision_is_idempotent() {
        for plan in [Plan::Free, Plan::Pro] {
            for images in 0..5 {
                for used in [0, 9, 10, 11, 500] {
                    let first = check_admission(plan, images, used);
                    let second = check_admission(plan, images, used);
                    assert_eq!(first, second);
                }
            }
        }
    }

    #[test]
    fn test_denial_maps_to_error() {
        let err = check_admission(Plan::Free, 0, 10)
            .into_result(Plan::Free)
            .unwrap_err();
        assert_eq!(
            err,
            BondaError::QuotaExceeded {
                plan: Plan::Free,
                used: 10,
                limit: 10
            }
        );
    }
}
