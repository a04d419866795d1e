use anyhow::{Context, Result};
use bondalayze_application::AnalysisPipeline;
use bondalayze_core::Plan;
use bondalayze_core::request::AnalysisRequest;
use bondalayze_infrastructure::image_normalizer::{self, DEFAULT_MAX_WIDTH, DEFAULT_QUALITY};
use bondalayze_infrastructure::BondaPaths;
use bondalayze_server::bootstrap;
use std::fs;
use std::path::{Path, PathBuf};

/// One-shot analysis outside the HTTP server. Quota does not apply here;
/// the screenshot ceiling of `plan` still does.
pub async fn run(
    paths: &BondaPaths,
    text: Option<String>,
    file: Option<PathBuf>,
    images: &[PathBuf],
    plan: Plan,
) -> Result<()> {
    let typed_text = match (text, file) {
        (Some(text), _) => text,
        (None, Some(file)) => fs::read_to_string(&file)
            .with_context(|| format!("Failed to read {}", file.display()))?,
        (None, None) => String::new(),
    };

    let encoded = images
        .iter()
        .map(|path| encode(path))
        .collect::<Result<Vec<_>>>()?;

    let config = bootstrap::load_config(paths)?;
    let model = bootstrap::chat_model(paths, &config)?;
    let pipeline = AnalysisPipeline::from_config(model, &config);

    let request = AnalysisRequest::new(typed_text, plan, encoded);
    let response = pipeline.run(&request, 0).await?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn encode(path: &Path) -> Result<bondalayze_core::image::EncodedImage> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    image_normalizer::normalize(&bytes, DEFAULT_MAX_WIDTH, DEFAULT_QUALITY)
        .with_context(|| format!("Failed to normalize {}", path.display()))
}
