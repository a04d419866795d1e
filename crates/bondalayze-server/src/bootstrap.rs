//! Wiring of configuration, provider client and collaborators.

use anyhow::{Context, Result};
use bondalayze_application::{AnalysisPipeline, AnalysisUseCase};
use bondalayze_core::config::AppConfig;
use bondalayze_core::model_client::ChatModel;
use bondalayze_infrastructure::storage::ConfigStorage;
use bondalayze_infrastructure::{
    BondaPaths, InMemoryAnalysisRepository, InMemoryPlanRepository, InMemorySpaceRepository,
    StaticTokenIdentityProvider,
};
use bondalayze_interaction::OpenAIChatClient;
use std::sync::Arc;

/// Reads config.toml from the resolved config directory.
pub fn load_config(paths: &BondaPaths) -> Result<AppConfig> {
    let storage = ConfigStorage::open(paths).context("Failed to resolve config.toml location")?;
    let config = storage.load().context("Failed to load configuration")?;
    tracing::debug!("[Bootstrap] Configuration from {}", storage.path().display());
    Ok(config)
}

/// The OpenAI client configured from secret.json / environment and
/// `[provider]`.
pub fn chat_model(paths: &BondaPaths, config: &AppConfig) -> Result<Arc<dyn ChatModel>> {
    let client = OpenAIChatClient::try_from_config(paths, &config.provider)
        .context("Failed to configure the OpenAI client")?;
    tracing::info!(
        "[Bootstrap] Model provider {} (default model {})",
        config.provider.base_url,
        client.model()
    );
    Ok(Arc::new(client))
}

/// Builds the use case on in-process collaborators seeded from `[[users]]`.
pub fn build_usecase(model: Arc<dyn ChatModel>, config: &AppConfig) -> AnalysisUseCase {
    let identity = StaticTokenIdentityProvider::from_seeds(&config.users);
    if identity.is_empty() {
        tracing::warn!("[Bootstrap] No [[users]] configured; every API call will be unauthorized");
    }
    let plans = InMemoryPlanRepository::with_plans(
        config
            .users
            .iter()
            .map(|seed| (seed.id.clone(), seed.plan)),
    );

    AnalysisUseCase::new(
        Arc::new(AnalysisPipeline::from_config(model, config)),
        Arc::new(identity),
        Arc::new(InMemoryAnalysisRepository::new()),
        Arc::new(plans),
        Arc::new(InMemorySpaceRepository::new()),
    )
}
