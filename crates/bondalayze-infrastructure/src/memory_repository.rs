//! In-process implementations of the persistence collaborator.
//!
//! The production datastore is hosted elsewhere; these back local
//! development and tests. State lives behind `tokio::sync::RwLock` so one
//! instance can be shared across concurrent requests.

use async_trait::async_trait;
use bondalayze_core::error::{BondaError, Result};
use bondalayze_core::plan::Plan;
use bondalayze_core::repository::{
    AnalysisQuery, AnalysisRecord, AnalysisRepository, ConversationSpace, PlanRepository,
    SpaceRepository,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryAnalysisRepository {
    records: RwLock<Vec<AnalysisRecord>>,
}

impl InMemoryAnalysisRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AnalysisRepository for InMemoryAnalysisRepository {
    async fn insert(&self, record: AnalysisRecord) -> Result<AnalysisRecord> {
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.id == record.id) {
            return Err(BondaError::data_access(format!(
                "duplicate analysis id '{}'",
                record.id
            )));
        }
        records.push(record.clone());
        Ok(record)
    }

    async fn list_for_user(
        &self,
        user_id: &str,
        query: &AnalysisQuery,
    ) -> Result<Vec<AnalysisRecord>> {
        let records = self.records.read().await;
        let mut matching: Vec<AnalysisRecord> = records
            .iter()
            .filter(|r| r.user_id == user_id && !r.is_deleted())
            .filter(|r| query.since.is_none_or(|since| r.created_at >= since))
            .filter(|r| {
                query
                    .space_id
                    .as_deref()
                    .is_none_or(|space| r.space_id.as_deref() == Some(space))
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }

    async fn delete(&self, user_id: &str, id: &str) -> Result<()> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|r| r.id == id && r.user_id == user_id && !r.is_deleted())
            .ok_or_else(|| BondaError::not_found("analysis", id))?;
        record.deleted_at = Some(Utc::now());
        Ok(())
    }

    async fn delete_in_space(&self, user_id: &str, space_id: &str) -> Result<u32> {
        let now = Utc::now();
        let mut records = self.records.write().await;
        let mut removed = 0u32;
        for record in records.iter_mut().filter(|r| {
            r.user_id == user_id && r.space_id.as_deref() == Some(space_id) && !r.is_deleted()
        }) {
            record.deleted_at = Some(now);
            removed = removed.saturating_add(1);
        }
        Ok(removed)
    }

    async fn count_since(&self, user_id: &str, since: DateTime<Utc>) -> Result<u32> {
        let records = self.records.read().await;
        let count = records
            .iter()
            .filter(|r| r.user_id == user_id && r.created_at >= since)
            .count();
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }
}

/// Plan rows keyed by user id. Unknown users are on `free`.
#[derive(Default)]
pub struct InMemoryPlanRepository {
    plans: RwLock<HashMap<String, Plan>>,
}

impl InMemoryPlanRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_plans(plans: impl IntoIterator<Item = (String, Plan)>) -> Self {
        Self {
            plans: RwLock::new(plans.into_iter().collect()),
        }
    }

    pub async fn set_plan(&self, user_id: impl Into<String>, plan: Plan) {
        self.plans.write().await.insert(user_id.into(), plan);
    }
}

#[async_trait]
impl PlanRepository for InMemoryPlanRepository {
    async fn get_plan(&self, user_id: &str) -> Result<Plan> {
        Ok(self
            .plans
            .read()
            .await
            .get(user_id)
            .copied()
            .unwrap_or_default())
    }
}

#[derive(Default)]
pub struct InMemorySpaceRepository {
    spaces: RwLock<Vec<ConversationSpace>>,
}

impl InMemorySpaceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SpaceRepository for InMemorySpaceRepository {
    async fn create(&self, user_id: &str, name: &str) -> Result<ConversationSpace> {
        let space = ConversationSpace {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        self.spaces.write().await.push(space.clone());
        Ok(space)
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<ConversationSpace>> {
        let spaces = self.spaces.read().await;
        let mut owned: Vec<ConversationSpace> = spaces
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(owned)
    }
}
