//! Initialize kiln in a project.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use kiln_core::{ComponentRegistry, ComponentStore, PropValue, StyleConfig};
use kiln_export::{artifact_filename, ExportFormat};

/// Directory the sample config is written to.
const COMPONENTS_DIR: &str = "components";

/// Run the init command.
pub async fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing kiln...");
    let root = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    if !config_path.exists() || yes {
        fs::write(config_path, DEFAULT_CONFIG)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        tracing::info!("Created {}", config_path.display());
    } else {
        tracing::warn!(
            "{} already exists. Use --yes to overwrite.",
            config_path.display()
        );
    }

    let components_dir = root.join(COMPONENTS_DIR);
    fs::create_dir_all(&components_dir).context("Failed to create components directory")?;

    let sample = sample_component()?;
    let sample_path = components_dir.join(artifact_filename("Primary Button", ExportFormat::Json));
    if !sample_path.exists() || yes {
        fs::write(&sample_path, sample)
            .with_context(|| format!("Failed to write {}", sample_path.display()))?;
        tracing::info!("Created {}", sample_path.display());
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'kiln dev' to open the builder, or 'kiln batch {}' to export.", COMPONENTS_DIR);

    Ok(())
}

/// A styled button saved the way the builder saves it.
fn sample_component() -> Result<String> {
    let mut store = ComponentStore::new(Arc::new(ComponentRegistry::builtin()));
    store.select("button");
    store.update_property("text", PropValue::Text("Get started".into()));
    store.update_style(StyleConfig::patch_from_pair("borderRadius", "999px")?);
    store.update_style(StyleConfig::patch_from_pair("hover.backgroundColor", "#2563eb")?);
    store.toggle_animation("fade");
    store.toggle_hover_effect("lift");

    let mut component = store
        .selected()
        .cloned()
        .context("Sample component was not selected")?;
    component.name = "Primary Button".to_string();

    Ok(serde_json::to_string_pretty(&component)?)
}

const DEFAULT_CONFIG: &str = r#"# kiln configuration

[export]
# Output directory for exported components
output = "dist"

# Formats written per component: css, html, tsx, json
formats = ["css", "html", "tsx", "json"]

# Minify exported CSS
minify = false

# Syntax-check generated CSS and TSX before writing
check = true

[server]
host = "127.0.0.1"
port = 7878

# Open the builder in a browser on start
open = true
"#;
