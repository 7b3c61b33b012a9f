//! Export builder.
//!
//! Renders artifacts for one component, or walks a directory of saved
//! configurations and exports each in parallel.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use minijinja::{context, Environment};
use rayon::prelude::*;
use serde::Serialize;
use walkdir::WalkDir;

use kiln_core::{render_preview, SelectedComponent};

use crate::artifact::{slugify, Artifact, ArtifactSink, DirectorySink, ExportFormat};
use crate::check::{check_css, check_tsx, minify_css};
use crate::css::to_css;
use crate::html::to_html;
use crate::load::{load_component, ConfigSyntax, LoadError};
use crate::tsx::to_source_component;
use crate::validate::validate_for_export;

/// Configuration for exporting components.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Output directory
    pub output_dir: PathBuf,

    /// Formats written per component
    pub formats: Vec<ExportFormat>,

    /// Minify CSS output
    pub minify: bool,

    /// Syntax-check CSS and TSX before writing
    pub check: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("dist"),
            formats: ExportFormat::ALL.to_vec(),
            minify: false,
            check: true,
        }
    }
}

/// Result of a batch export.
#[derive(Debug)]
pub struct BatchResult {
    /// Number of components exported
    pub components: usize,

    /// Number of files written
    pub artifacts: usize,

    /// Configs that could not be exported, with the reason
    pub failed: Vec<(PathBuf, String)>,

    /// Total export time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Component is not exportable: {}", .0.join(", "))]
    Invalid(Vec<String>),

    #[error("Generated CSS is invalid: {0}")]
    CssSyntax(String),

    #[error("Generated TSX is invalid: {0}")]
    TsxSyntax(String),

    #[error("Failed to serialize component: {0}")]
    Serialize(String),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("Failed to read input directory: {0}")]
    ReadError(String),

    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

/// Renders and writes export artifacts.
pub struct ExportBuilder {
    config: ExportConfig,
}

impl ExportBuilder {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Render one artifact, validating the component first.
    pub fn render(
        &self,
        component: &SelectedComponent,
        format: ExportFormat,
    ) -> Result<Artifact, ExportError> {
        let errors = validate_for_export(Some(component));
        if !errors.is_empty() {
            return Err(ExportError::Invalid(errors));
        }

        let content = match format {
            ExportFormat::Css => {
                let css = to_css(component);
                if self.config.check {
                    check_css(&css)?;
                }
                if self.config.minify {
                    minify_css(&css)?
                } else {
                    css
                }
            }
            ExportFormat::Html => to_html(component),
            ExportFormat::Tsx => {
                let source = to_source_component(component);
                if self.config.check {
                    check_tsx(&source)?;
                }
                source
            }
            ExportFormat::Json => serde_json::to_string_pretty(component)
                .map_err(|e| ExportError::Serialize(e.to_string()))?,
        };

        Ok(Artifact::new(&component.name, format, content))
    }

    /// Render every configured format.
    pub fn render_all(&self, component: &SelectedComponent) -> Result<Vec<Artifact>, ExportError> {
        self.config
            .formats
            .iter()
            .map(|format| self.render(component, *format))
            .collect()
    }

    /// Export one component into a sink. Returns the number of artifacts
    /// delivered.
    pub fn export_to(
        &self,
        component: &SelectedComponent,
        sink: &dyn ArtifactSink,
    ) -> Result<usize, ExportError> {
        let artifacts = self.render_all(component)?;
        for artifact in &artifacts {
            let outcome = sink.deliver(artifact);
            if !outcome.delivered {
                return Err(ExportError::WriteError(
                    outcome
                        .error
                        .unwrap_or_else(|| artifact.filename.clone()),
                ));
            }
        }
        Ok(artifacts.len())
    }

    /// Export every saved config under `input_dir`.
    ///
    /// Each component goes to `<output>/<slug>/`; a gallery `index.html`
    /// lists everything that exported successfully.
    pub async fn batch(&self, input_dir: &Path) -> Result<BatchResult, ExportError> {
        let start = Instant::now();

        if !input_dir.is_dir() {
            return Err(ExportError::ReadError(format!(
                "Input directory not found: {}",
                input_dir.display()
            )));
        }
        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| ExportError::WriteError(e.to_string()))?;

        let configs = discover_configs(input_dir);
        tracing::info!("Exporting {} saved components", configs.len());

        let loaded: Vec<(PathBuf, Result<SelectedComponent, LoadError>)> = configs
            .par_iter()
            .map(|path| (path.clone(), load_component(path)))
            .collect();

        let mut failed = Vec::new();
        let mut claimed: HashMap<String, PathBuf> = HashMap::new();
        let mut pending = Vec::new();
        for (path, result) in loaded {
            let component = match result {
                Ok(component) => component,
                Err(e) => {
                    tracing::warn!("Failed to load {}: {}", path.display(), e);
                    failed.push((path, e.to_string()));
                    continue;
                }
            };

            // Configs are sorted, so the first path to claim a slug keeps it.
            let slug = slugify(&component.name);
            if let Some(owner) = claimed.get(&slug) {
                let reason = format!(
                    "Output directory '{}' is already used by {}",
                    slug,
                    owner.display()
                );
                tracing::warn!("Skipping {}: {}", path.display(), reason);
                failed.push((path, reason));
                continue;
            }
            claimed.insert(slug.clone(), path.clone());
            pending.push((path, slug, component));
        }

        let results: Vec<(PathBuf, SelectedComponent, Result<usize, ExportError>)> = pending
            .into_par_iter()
            .map(|(path, slug, component)| {
                let sink = DirectorySink::new(self.config.output_dir.join(slug));
                let result = self.export_to(&component, &sink);
                (path, component, result)
            })
            .collect();

        let mut exported = Vec::new();
        let mut artifacts = 0;
        for (path, component, result) in results {
            match result {
                Ok(count) => {
                    artifacts += count;
                    exported.push(component);
                }
                Err(e) => {
                    tracing::warn!("Failed to export {}: {}", path.display(), e);
                    failed.push((path, e.to_string()));
                }
            }
        }
        failed.sort_by(|a, b| a.0.cmp(&b.0));

        if !exported.is_empty() {
            self.write_gallery(&exported)?;
        }

        Ok(BatchResult {
            components: exported.len(),
            artifacts,
            failed,
            duration_ms: start.elapsed().as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    fn write_gallery(&self, components: &[SelectedComponent]) -> Result<(), ExportError> {
        let entries: Vec<GalleryEntry> = components
            .iter()
            .map(|c| GalleryEntry {
                name: c.name.clone(),
                type_id: c.type_id.clone(),
                slug: slugify(&c.name),
                markup: render_preview(c).markup,
            })
            .collect();

        let mut env = Environment::new();
        env.add_template("gallery.html", GALLERY_TEMPLATE)
            .map_err(|e| ExportError::TemplateError(e.to_string()))?;
        let html = env
            .get_template("gallery.html")
            .and_then(|t| t.render(context! { components => entries }))
            .map_err(|e| ExportError::TemplateError(e.to_string()))?;

        fs::write(self.config.output_dir.join("index.html"), html)
            .map_err(|e| ExportError::WriteError(e.to_string()))
    }
}

#[derive(Debug, Serialize)]
struct GalleryEntry {
    name: String,
    type_id: String,
    slug: String,
    markup: String,
}

/// Saved configs under a directory, sorted by path.
fn discover_configs(dir: &Path) -> Vec<PathBuf> {
    let mut configs: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| ConfigSyntax::from_path(p).is_some())
        .collect();
    configs.sort();
    configs
}

const GALLERY_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Component gallery</title>
  {% for c in components %}<link rel="stylesheet" href="{{ c.slug }}/{{ c.slug }}.css">
  {% endfor %}
  <style>
    body { font-family: system-ui, sans-serif; margin: 2rem; background: #f9fafb; }
    .gallery { display: grid; grid-template-columns: repeat(auto-fill, minmax(280px, 1fr)); gap: 1.5rem; }
    .entry { background: #fff; border: 1px solid #e5e7eb; border-radius: 8px; padding: 1rem; }
    .entry h2 { font-size: 0.875rem; margin: 0 0 1rem; color: #6b7280; }
    .stage { display: flex; align-items: center; justify-content: center; min-height: 120px; }
  </style>
</head>
<body>
  <h1>Components</h1>
  <div class="gallery">
  {% for c in components %}
    <section class="entry">
      <h2><a href="{{ c.slug }}/">{{ c.name }}</a> <small>{{ c.type_id }}</small></h2>
      <div class="stage">{{ c.markup|safe }}</div>
    </section>
  {% endfor %}
  </div>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::StdoutSink;
    use kiln_core::{ComponentRegistry, ComponentStore};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn selected(type_id: &str) -> SelectedComponent {
        let mut store = ComponentStore::new(Arc::new(ComponentRegistry::builtin()));
        store.select(type_id).clone()
    }

    fn builder(output_dir: &Path) -> ExportBuilder {
        ExportBuilder::new(ExportConfig {
            output_dir: output_dir.to_path_buf(),
            ..Default::default()
        })
    }

    #[test]
    fn renders_all_formats() {
        let temp = TempDir::new().unwrap();
        let artifacts = builder(temp.path()).render_all(&selected("button")).unwrap();

        let names: Vec<&str> = artifacts.iter().map(|a| a.filename.as_str()).collect();
        assert_eq!(
            names,
            vec!["button.css", "button.html", "button.tsx", "button-config.json"]
        );
    }

    #[test]
    fn invalid_component_lists_errors() {
        let temp = TempDir::new().unwrap();
        let mut component = selected("button");
        component.name.clear();

        match builder(temp.path()).render(&component, ExportFormat::Css) {
            Err(ExportError::Invalid(errors)) => {
                assert_eq!(errors, vec!["Component name is required"])
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn minifies_when_configured() {
        let temp = TempDir::new().unwrap();
        let builder = ExportBuilder::new(ExportConfig {
            output_dir: temp.path().to_path_buf(),
            minify: true,
            ..Default::default()
        });

        let css = builder.render(&selected("badge"), ExportFormat::Css).unwrap();
        assert!(!css.content.contains('\n'));
        assert!(css.content.starts_with(".badge-component{"));
    }

    #[test]
    fn exports_to_directory() {
        let temp = TempDir::new().unwrap();
        let builder = builder(temp.path());
        let sink = DirectorySink::new(temp.path());

        let count = builder.export_to(&selected("card"), &sink).unwrap();

        assert_eq!(count, 4);
        assert!(temp.path().join("card.tsx").exists());
        assert!(temp.path().join("card-config.json").exists());
    }

    #[test]
    fn stdout_sink_accepts_artifacts() {
        let temp = TempDir::new().unwrap();
        let builder = ExportBuilder::new(ExportConfig {
            output_dir: temp.path().to_path_buf(),
            formats: vec![ExportFormat::Html],
            ..Default::default()
        });

        assert_eq!(builder.export_to(&selected("badge"), &StdoutSink).unwrap(), 1);
    }

    #[tokio::test]
    async fn batch_exports_saved_configs() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();

        let mut card = selected("card");
        card.name = "Hero Card".into();
        fs::write(
            input.path().join("hero-card-config.json"),
            serde_json::to_string(&card).unwrap(),
        )
        .unwrap();
        fs::create_dir(input.path().join("nested")).unwrap();
        fs::write(
            input.path().join("nested").join("badge.yaml"),
            "id: badge_1\nname: Status\ntype: badge\nstyle:\n  color: \"#fff\"\nproperties:\n  text: Online\n",
        )
        .unwrap();
        fs::write(input.path().join("broken.json"), "{").unwrap();
        fs::write(input.path().join("notes.txt"), "ignored").unwrap();

        let result = builder(output.path()).batch(input.path()).await.unwrap();

        assert_eq!(result.components, 2);
        assert_eq!(result.artifacts, 8);
        assert_eq!(result.failed.len(), 1);
        assert!(result.failed[0].0.ends_with("broken.json"));
        assert!(output.path().join("hero-card").join("hero-card.css").exists());
        assert!(output.path().join("status").join("status.tsx").exists());

        let index = fs::read_to_string(output.path().join("index.html")).unwrap();
        assert!(index.contains("<a href=\"hero-card/\">Hero Card</a>"));
        assert!(index.contains("<span class=\"kiln-preview badge-component\""));
    }

    #[tokio::test]
    async fn batch_reports_configs_sharing_an_output_directory() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();

        let mut first = selected("button");
        first.name = "Call To Action".into();
        let mut second = selected("badge");
        second.name = "call to  action".into();
        fs::write(input.path().join("a.json"), serde_json::to_string(&first).unwrap()).unwrap();
        fs::write(input.path().join("b.json"), serde_json::to_string(&second).unwrap()).unwrap();

        let result = builder(output.path()).batch(input.path()).await.unwrap();

        assert_eq!(result.components, 1);
        assert_eq!(result.artifacts, 4);
        assert_eq!(result.failed.len(), 1);
        assert!(result.failed[0].0.ends_with("b.json"));
        assert!(result.failed[0].1.contains("call-to-action"));

        let json = fs::read_to_string(
            output
                .path()
                .join("call-to-action")
                .join("call-to-action-config.json"),
        )
        .unwrap();
        assert!(json.contains("\"type\": \"button\""));

        let index = fs::read_to_string(output.path().join("index.html")).unwrap();
        assert_eq!(index.matches("<section class=\"entry\">").count(), 1);
    }

    #[tokio::test]
    async fn batch_requires_input_directory() {
        let output = TempDir::new().unwrap();

        let result = builder(output.path())
            .batch(&output.path().join("missing"))
            .await;
        assert!(matches!(result, Err(ExportError::ReadError(_))));
    }
}
