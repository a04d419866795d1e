//! Subscription plans and the limits attached to each of them.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Subscription tier governing request quotas.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Plan {
    #[default]
    Free,
    Pro,
}

/// Capability ceilings for one plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlanLimits {
    /// Maximum screenshots per analysis request.
    pub max_screenshots: usize,
    /// Maximum completed analyses per calendar month; `None` means unlimited.
    pub monthly_analyses: Option<u32>,
}

pub const FREE_LIMITS: PlanLimits = PlanLimits {
    max_screenshots: 2,
    monthly_analyses: Some(10),
};

pub const PRO_LIMITS: PlanLimits = PlanLimits {
    max_screenshots: 3,
    monthly_analyses: None,
};

impl Plan {
    pub fn limits(self) -> PlanLimits {
        match self {
            Plan::Free => FREE_LIMITS,
            Plan::Pro => PRO_LIMITS,
        }
    }
}
