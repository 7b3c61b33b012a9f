//! Batch export command.

use std::path::{Path, PathBuf};

use anyhow::Result;
use kiln_export::ExportBuilder;

use crate::config::ConfigFile;

/// Run the batch command.
pub async fn run(
    file_config: &ConfigFile,
    input: &Path,
    output: Option<PathBuf>,
    minify: Option<bool>,
) -> Result<()> {
    tracing::info!("Exporting components from {}...", input.display());

    let config = file_config.export_config(output, &[], minify)?;
    let result = ExportBuilder::new(config).batch(input).await?;

    tracing::info!(
        "Exported {} components ({} files) in {}ms",
        result.components,
        result.artifacts,
        result.duration_ms
    );
    for (path, reason) in &result.failed {
        tracing::warn!("Skipped {}: {}", path.display(), reason);
    }

    tracing::info!("Output: {}", result.output_dir.display());

    if result.components == 0 && !result.failed.is_empty() {
        anyhow::bail!("No components exported");
    }

    Ok(())
}
