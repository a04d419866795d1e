//! Analysis use case.
//!
//! Wraps the pipeline with everything a signed-in request needs: resolving
//! the caller, looking up their plan and monthly usage, persisting the
//! result, and the history/space operations around it.

use bondalayze_core::error::{BondaError, Result};
use bondalayze_core::identity::{IdentityProvider, User};
use bondalayze_core::image::EncodedImage;
use bondalayze_core::plan::Plan;
use bondalayze_core::repository::{
    AnalysisQuery, AnalysisRecord, AnalysisRepository, ConversationSpace, PlanRepository,
    SpaceRepository,
};
use bondalayze_core::request::{AnalysisRequest, ApiResponse};
use bondalayze_core::usage::{UsageSummary, month_start};
use chrono::{Duration, Utc};
use std::sync::Arc;

use crate::pipeline::AnalysisPipeline;

/// Longest history window accepted by [`AnalysisUseCase::history`].
pub const MAX_HISTORY_DAYS: u32 = 365;

/// Input of one analysis as received from the client.
#[derive(Debug, Clone, Default)]
pub struct AnalyzeCommand {
    pub text: String,
    /// Plan claimed by the client. Gating always uses the stored plan.
    pub requested_plan: Option<Plan>,
    pub images: Vec<EncodedImage>,
    pub space_id: Option<String>,
}

pub struct AnalysisUseCase {
    pipeline: Arc<AnalysisPipeline>,
    identity: Arc<dyn IdentityProvider>,
    analyses: Arc<dyn AnalysisRepository>,
    plans: Arc<dyn PlanRepository>,
    spaces: Arc<dyn SpaceRepository>,
}

impl AnalysisUseCase {
    pub fn new(
        pipeline: Arc<AnalysisPipeline>,
        identity: Arc<dyn IdentityProvider>,
        analyses: Arc<dyn AnalysisRepository>,
        plans: Arc<dyn PlanRepository>,
        spaces: Arc<dyn SpaceRepository>,
    ) -> Self {
        Self {
            pipeline,
            identity,
            analyses,
            plans,
            spaces,
        }
    }

    /// Resolves the caller or fails with `Unauthorized`.
    pub async fn authenticate(&self, access_token: &str) -> Result<User> {
        self.identity
            .current_user(access_token)
            .await?
            .ok_or(BondaError::Unauthorized)
    }

    /// Runs and stores one analysis for the caller.
    pub async fn analyze(
        &self,
        access_token: &str,
        command: AnalyzeCommand,
    ) -> Result<ApiResponse> {
        let user = self.authenticate(access_token).await?;
        let plan = self.plans.get_plan(&user.id).await?;

        if let Some(requested) = command.requested_plan
            && requested != plan
        {
            tracing::warn!(
                "[AnalysisUseCase] Client claimed plan '{}' but user {} is on '{}'",
                requested,
                user.id,
                plan
            );
        }

        if let Some(space_id) = command.space_id.as_deref() {
            self.ensure_space_owned(&user.id, space_id).await?;
        }

        let used_this_month = self
            .analyses
            .count_since(&user.id, month_start(Utc::now()))
            .await?;

        let request = AnalysisRequest::new(command.text, plan, command.images);
        let response = self.pipeline.run(&request, used_this_month).await?;

        let record =
            AnalysisRecord::from_response(&user.id, command.space_id, &response, Utc::now());
        let saved = self.analyses.insert(record).await?;
        tracing::info!(
            "[AnalysisUseCase] Saved analysis {} for user {} (score {})",
            saved.id,
            user.id,
            saved.score
        );

        Ok(response)
    }

    pub async fn usage(&self, access_token: &str) -> Result<UsageSummary> {
        let user = self.authenticate(access_token).await?;
        let plan = self.plans.get_plan(&user.id).await?;
        let used = self
            .analyses
            .count_since(&user.id, month_start(Utc::now()))
            .await?;
        Ok(UsageSummary::new(plan, used))
    }

    /// Past analyses, newest first, optionally limited to the last `days`
    /// days and to one space.
    pub async fn history(
        &self,
        access_token: &str,
        days: Option<u32>,
        space_id: Option<String>,
    ) -> Result<Vec<AnalysisRecord>> {
        let user = self.authenticate(access_token).await?;

        let since = match days {
            None => None,
            Some(days) if (1..=MAX_HISTORY_DAYS).contains(&days) => {
                Some(Utc::now() - Duration::days(i64::from(days)))
            }
            Some(days) => {
                return Err(BondaError::invalid_input(format!(
                    "days must be between 1 and {MAX_HISTORY_DAYS} (got {days})"
                )));
            }
        };

        self.analyses
            .list_for_user(&user.id, &AnalysisQuery { since, space_id })
            .await
    }

    /// Removes one analysis from history. Monthly usage is unchanged.
    pub async fn delete_analysis(&self, access_token: &str, id: &str) -> Result<()> {
        let user = self.authenticate(access_token).await?;
        self.analyses.delete(&user.id, id).await?;
        tracing::info!("[AnalysisUseCase] Deleted analysis {} for user {}", id, user.id);
        Ok(())
    }

    /// Removes every analysis the caller filed under `space_id` and returns
    /// how many were removed. The space itself is kept.
    pub async fn clear_space(&self, access_token: &str, space_id: &str) -> Result<u32> {
        let user = self.authenticate(access_token).await?;
        self.ensure_space_owned(&user.id, space_id).await?;
        let removed = self.analyses.delete_in_space(&user.id, space_id).await?;
        tracing::info!(
            "[AnalysisUseCase] Cleared {} analyses from space {} for user {}",
            removed,
            space_id,
            user.id
        );
        Ok(removed)
    }

    pub async fn spaces(&self, access_token: &str) -> Result<Vec<ConversationSpace>> {
        let user = self.authenticate(access_token).await?;
        self.spaces.list_for_user(&user.id).await
    }

    pub async fn create_space(&self, access_token: &str, name: &str) -> Result<ConversationSpace> {
        let user = self.authenticate(access_token).await?;
        let name = name.trim();
        if name.is_empty() {
            return Err(BondaError::invalid_input("space name must not be empty"));
        }
        self.spaces.create(&user.id, name).await
    }

    async fn ensure_space_owned(&self, user_id: &str, space_id: &str) -> Result<()> {
        let owned = self
            .spaces
            .list_for_user(user_id)
            .await?
            .iter()
            .any(|space| space.id == space_id);
        if owned {
            Ok(())
        } else {
            Err(BondaError::not_found("space", space_id))
        }
    }
}
