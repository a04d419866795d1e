//! Persistence collaborator contracts.
//!
//! The hosted datastore owns these rows; the backend only needs insert,
//! select, delete and count-since operations over them.
//!
//! Deleting an analysis hides it from history but never returns quota:
//! usage is counted on create.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::ExtraAnalysis;
use crate::error::Result;
use crate::plan::Plan;
use crate::request::ApiResponse;

/// A completed analysis as stored per user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub space_id: Option<String>,
    /// The `used_text` the analyzer saw, stored verbatim.
    pub input_text: String,
    pub score: u8,
    pub summary: String,
    pub you_effort: u8,
    pub them_effort: u8,
    pub greens: Vec<String>,
    pub reds: Vec<String>,
    pub extra: ExtraAnalysis,
    pub created_at: DateTime<Utc>,
    /// Set when the user deletes the analysis. Deleted rows still count
    /// towards monthly usage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl AnalysisRecord {
    /// Builds a new row from a pipeline response.
    pub fn from_response(
        user_id: impl Into<String>,
        space_id: Option<String>,
        response: &ApiResponse,
        created_at: DateTime<Utc>,
    ) -> Self {
        let analysis = &response.analysis;
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            space_id,
            input_text: response.used_text.clone(),
            score: analysis.score,
            summary: analysis.summary.clone(),
            you_effort: analysis.you_effort,
            them_effort: analysis.them_effort,
            greens: analysis.greens.clone(),
            reds: analysis.reds.clone(),
            extra: analysis.extra.clone(),
            created_at,
            deleted_at: None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// A named folder for grouping analyses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSpace {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// History filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisQuery {
    pub since: Option<DateTime<Utc>>,
    pub space_id: Option<String>,
}

#[async_trait]
pub trait AnalysisRepository: Send + Sync {
    async fn insert(&self, record: AnalysisRecord) -> Result<AnalysisRecord>;

    /// Live records owned by `user_id`, newest first.
    async fn list_for_user(&self, user_id: &str, query: &AnalysisQuery)
    -> Result<Vec<AnalysisRecord>>;

    /// Deletes one record. Fails with `NotFound` if it does not exist, is
    /// already deleted or belongs to someone else.
    async fn delete(&self, user_id: &str, id: &str) -> Result<()>;

    /// Deletes every live record of `user_id` filed under `space_id` and
    /// returns how many were removed.
    async fn delete_in_space(&self, user_id: &str, space_id: &str) -> Result<u32>;

    /// Completed analyses for `user_id` created at or after `since`,
    /// deleted ones included.
    async fn count_since(&self, user_id: &str, since: DateTime<Utc>) -> Result<u32>;
}

#[async_trait]
pub trait PlanRepository: Send + Sync {
    /// The user's plan; users without a plan row are on `free`.
    async fn get_plan(&self, user_id: &str) -> Result<Plan>;
}

#[async_trait]
pub trait SpaceRepository: Send + Sync {
    async fn create(&self, user_id: &str, name: &str) -> Result<ConversationSpace>;

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<ConversationSpace>>;
}
