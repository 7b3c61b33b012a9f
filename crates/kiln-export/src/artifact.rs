//! Export artifacts and the sinks that deliver them.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static SEPARATORS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[\s/\\:*?"<>|[:cntrl:]]+"#).expect("Invalid separator regex")
});

/// Output format of an export artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Css,
    Html,
    Tsx,
    Json,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Css,
        ExportFormat::Html,
        ExportFormat::Tsx,
        ExportFormat::Json,
    ];

    pub fn id(self) -> &'static str {
        match self {
            ExportFormat::Css => "css",
            ExportFormat::Html => "html",
            ExportFormat::Tsx => "tsx",
            ExportFormat::Json => "json",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.id().eq_ignore_ascii_case(id))
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Css => "text/css",
            ExportFormat::Html => "text/html",
            ExportFormat::Tsx => "text/typescript",
            ExportFormat::Json => "application/json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Lowercase a display name and replace whitespace and path separator runs
/// with `-`. Leading dots are dropped so a slug is always a plain file name.
pub fn slugify(name: &str) -> String {
    let slug = SEPARATORS
        .replace_all(name.trim(), "-")
        .to_lowercase();
    let slug = slug.trim_start_matches(['.', '-']).trim_end_matches('-');
    if slug.is_empty() {
        "component".to_string()
    } else {
        slug.to_string()
    }
}

/// Download filename for a component name and format.
///
/// The JSON dump is the saved configuration: `<slug>-config.json`.
pub fn artifact_filename(name: &str, format: ExportFormat) -> String {
    let slug = slugify(name);
    match format {
        ExportFormat::Json => format!("{}-config.json", slug),
        _ => format!("{}.{}", slug, format.id()),
    }
}

/// One generated export file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub format: ExportFormat,
    pub filename: String,
    pub mime_type: &'static str,
    pub content: String,
}

impl Artifact {
    pub fn new(name: &str, format: ExportFormat, content: String) -> Self {
        Self {
            format,
            filename: artifact_filename(name, format),
            mime_type: format.mime_type(),
            content,
        }
    }
}

/// Result of handing an artifact to a sink.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryOutcome {
    pub delivered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Where the artifact ended up, when the sink has a location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<PathBuf>,
}

impl DeliveryOutcome {
    pub fn delivered(location: Option<PathBuf>) -> Self {
        Self {
            delivered: true,
            error: None,
            location,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            delivered: false,
            error: Some(error.into()),
            location: None,
        }
    }
}

/// Destination for export artifacts.
///
/// Delivery is one-shot: failures are reported in the outcome and never
/// retried.
pub trait ArtifactSink: Send + Sync {
    fn deliver(&self, artifact: &Artifact) -> DeliveryOutcome;
}

/// Writes artifacts into a directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ArtifactSink for DirectorySink {
    fn deliver(&self, artifact: &Artifact) -> DeliveryOutcome {
        if artifact.content.is_empty() {
            return DeliveryOutcome::failed("No content to write");
        }
        if let Err(e) = fs::create_dir_all(&self.dir) {
            return DeliveryOutcome::failed(format!(
                "Failed to create {}: {}",
                self.dir.display(),
                e
            ));
        }

        let path = self.dir.join(&artifact.filename);
        match fs::write(&path, &artifact.content) {
            Ok(()) => {
                tracing::debug!("Wrote {}", path.display());
                DeliveryOutcome::delivered(Some(path))
            }
            Err(e) => DeliveryOutcome::failed(format!("Failed to write {}: {}", path.display(), e)),
        }
    }
}

/// Prints artifacts to standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl ArtifactSink for StdoutSink {
    fn deliver(&self, artifact: &Artifact) -> DeliveryOutcome {
        if artifact.content.is_empty() {
            return DeliveryOutcome::failed("No content to copy");
        }
        let mut out = std::io::stdout().lock();
        match out
            .write_all(artifact.content.as_bytes())
            .and_then(|_| out.flush())
        {
            Ok(()) => DeliveryOutcome::delivered(None),
            Err(e) => DeliveryOutcome::failed(format!("Failed to write to stdout: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn slugifies_names() {
        assert_eq!(slugify("Primary Button"), "primary-button");
        assert_eq!(slugify("  My \t Fancy   Card "), "my-fancy-card");
    }

    #[test]
    fn slugs_stay_inside_the_output_directory() {
        assert_eq!(slugify("../escaped"), "escaped");
        assert_eq!(slugify("a/b\\c"), "a-b-c");
        assert_eq!(slugify(".hidden"), "hidden");
        assert_eq!(slugify("Say \"hi\"\n"), "say-hi");
        assert_eq!(slugify(" .. "), "component");
    }

    #[test]
    fn traversal_name_is_written_under_sink_dir() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("out");
        let sink = DirectorySink::new(&out);

        let outcome = sink.deliver(&Artifact::new("../escaped", ExportFormat::Css, "x".into()));

        assert!(outcome.delivered);
        assert_eq!(outcome.location, Some(out.join("escaped.css")));
        assert!(!temp.path().join("escaped.css").exists());
    }

    #[test]
    fn filenames_per_format() {
        assert_eq!(artifact_filename("My Card", ExportFormat::Css), "my-card.css");
        assert_eq!(artifact_filename("My Card", ExportFormat::Html), "my-card.html");
        assert_eq!(artifact_filename("My Card", ExportFormat::Tsx), "my-card.tsx");
        assert_eq!(
            artifact_filename("My Card", ExportFormat::Json),
            "my-card-config.json"
        );
    }

    #[test]
    fn parses_format_ids() {
        assert_eq!(ExportFormat::from_id("TSX"), Some(ExportFormat::Tsx));
        assert_eq!(ExportFormat::from_id("scss"), None);
    }

    #[test]
    fn directory_sink_writes_file() {
        let temp = TempDir::new().unwrap();
        let sink = DirectorySink::new(temp.path().join("out"));
        let artifact = Artifact::new("Card", ExportFormat::Css, ".card-component {}\n".into());

        let outcome = sink.deliver(&artifact);

        assert!(outcome.delivered);
        let path = temp.path().join("out").join("card.css");
        assert_eq!(outcome.location, Some(path.clone()));
        assert_eq!(fs::read_to_string(path).unwrap(), ".card-component {}\n");
    }

    #[test]
    fn empty_artifact_is_not_delivered() {
        let temp = TempDir::new().unwrap();
        let sink = DirectorySink::new(temp.path());
        let artifact = Artifact::new("Card", ExportFormat::Css, String::new());

        let outcome = sink.deliver(&artifact);

        assert!(!outcome.delivered);
        assert_eq!(outcome.error.as_deref(), Some("No content to write"));
    }

    #[test]
    fn unwritable_directory_reports_error() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("file");
        fs::write(&blocker, "x").unwrap();
        let sink = DirectorySink::new(blocker.join("nested"));

        let outcome = sink.deliver(&Artifact::new("Card", ExportFormat::Css, "x".into()));

        assert!(!outcome.delivered);
        assert!(outcome.error.unwrap().starts_with("Failed to create"));
    }
}
