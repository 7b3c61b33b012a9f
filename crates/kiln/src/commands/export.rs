//! Export one saved component.

use std::path::{Path, PathBuf};

use anyhow::Result;
use kiln_export::{load_component, slugify, DirectorySink, ExportBuilder, StdoutSink};

use crate::config::ConfigFile;

/// Command-line overrides for a single export.
#[derive(Debug, Default)]
pub struct ExportOptions {
    pub formats: Vec<String>,
    pub output: Option<PathBuf>,
    pub stdout: bool,
    pub minify: Option<bool>,
}

/// Run the export command.
pub async fn run(file_config: &ConfigFile, input: &Path, options: ExportOptions) -> Result<()> {
    let config = file_config.export_config(options.output, &options.formats, options.minify)?;
    let component = load_component(input)?;
    tracing::info!("Exporting {} ({})", component.name, component.type_id);

    let dir = config.output_dir.join(slugify(&component.name));
    let builder = ExportBuilder::new(config);

    if options.stdout {
        builder.export_to(&component, &StdoutSink)?;
        return Ok(());
    }

    let written = builder.export_to(&component, &DirectorySink::new(&dir))?;
    tracing::info!("Wrote {} files to {}", written, dir.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn writes_requested_formats() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("cta.json");
        fs::write(
            &input,
            r##"{"id":"button_1","name":"Call To Action","type":"button","style":{"backgroundColor":"#111827"},"properties":{"text":"Buy"}}"##,
        )
        .unwrap();

        let options = ExportOptions {
            formats: vec!["css".into(), "tsx".into()],
            output: Some(temp.path().join("out")),
            ..Default::default()
        };
        run(&ConfigFile::default(), &input, options).await.unwrap();

        let dir = temp.path().join("out").join("call-to-action");
        assert!(dir.join("call-to-action.css").exists());
        assert!(dir.join("call-to-action.tsx").exists());
        assert!(!dir.join("call-to-action.html").exists());
        let tsx = fs::read_to_string(dir.join("call-to-action.tsx")).unwrap();
        assert!(tsx.contains("export default CallToAction"));
    }

    #[tokio::test]
    async fn invalid_component_fails() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("blank.json");
        fs::write(&input, r#"{"id":"x","name":"","type":"badge","style":{}}"#).unwrap();

        let options = ExportOptions {
            output: Some(temp.path().join("out")),
            ..Default::default()
        };
        let err = run(&ConfigFile::default(), &input, options).await.unwrap_err();

        assert!(err.to_string().contains("Component name is required"));
    }
}
