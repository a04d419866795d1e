use anyhow::{Context, Result};
use bondalayze_infrastructure::image_normalizer;
use std::fs;
use std::path::PathBuf;

/// Prints one data URL per input file, in order.
pub fn run(files: &[PathBuf], max_width: u32, quality: f32) -> Result<()> {
    for file in files {
        let bytes = fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
        let image = image_normalizer::normalize(&bytes, max_width, quality)
            .with_context(|| format!("Failed to normalize {}", file.display()))?;
        println!("{}", image.data_url);
    }
    Ok(())
}
