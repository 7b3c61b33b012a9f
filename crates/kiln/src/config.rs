//! kiln.toml loading.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Deserialize;

use kiln_export::{ExportConfig, ExportFormat};
use kiln_server::DevServerConfig;

/// Configuration file structure (kiln.toml).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub export: ExportSettings,
    #[serde(default)]
    pub server: ServerSettings,
}

#[derive(Debug, Deserialize)]
pub struct ExportSettings {
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default = "default_formats")]
    pub formats: Vec<String>,
    #[serde(default)]
    pub minify: bool,
    #[serde(default = "default_check")]
    pub check: bool,
}

#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_open")]
    pub open: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            output: default_output(),
            formats: default_formats(),
            minify: false,
            check: default_check(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            open: default_open(),
        }
    }
}

fn default_output() -> String {
    "dist".to_string()
}
fn default_formats() -> Vec<String> {
    ExportFormat::ALL.iter().map(|f| f.id().to_string()).collect()
}
fn default_check() -> bool {
    true
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    7878
}
fn default_open() -> bool {
    true
}

/// Load configuration from `path` if it exists.
/// Returns an error if the config file exists but is malformed.
pub fn load(path: &Path) -> Result<ConfigFile> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        let config: ConfigFile = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
        tracing::info!("Loaded config from {}", path.display());
        return Ok(config);
    }
    Ok(ConfigFile::default())
}

/// Parse format ids, failing on the first unknown one.
pub fn parse_formats(ids: &[String]) -> Result<Vec<ExportFormat>> {
    ids.iter()
        .map(|id| {
            ExportFormat::from_id(id.trim())
                .ok_or_else(|| anyhow::anyhow!("Unknown export format: {}", id))
        })
        .collect()
}

impl ConfigFile {
    /// Export settings with command-line overrides applied.
    pub fn export_config(
        &self,
        output: Option<PathBuf>,
        formats: &[String],
        minify: Option<bool>,
    ) -> Result<ExportConfig> {
        let formats = if formats.is_empty() {
            parse_formats(&self.export.formats)?
        } else {
            parse_formats(formats)?
        };

        Ok(ExportConfig {
            output_dir: output.unwrap_or_else(|| PathBuf::from(&self.export.output)),
            formats,
            minify: minify.unwrap_or(self.export.minify),
            check: self.export.check,
        })
    }

    /// Builder server settings with command-line overrides applied.
    pub fn server_config(
        &self,
        port: Option<u16>,
        open: bool,
        watch: Option<PathBuf>,
    ) -> Result<DevServerConfig> {
        Ok(DevServerConfig {
            host: self.server.host.clone(),
            port: port.unwrap_or(self.server.port),
            open: open && self.server.open,
            watch,
            export: self.export_config(None, &[], None)?,
        })
    }
}
