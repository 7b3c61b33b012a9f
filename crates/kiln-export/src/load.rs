//! Loading saved component configurations.

use std::fs;
use std::path::Path;

use kiln_core::SelectedComponent;

/// Errors from reading a saved configuration.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unsupported config extension: {0}")]
    UnsupportedExtension(String),
}

/// Saved config syntax, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSyntax {
    Json,
    Yaml,
}

impl ConfigSyntax {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Some(ConfigSyntax::Json),
            Some("yaml" | "yml") => Some(ConfigSyntax::Yaml),
            _ => None,
        }
    }
}

/// Parse a saved instance from text.
pub fn parse_component(text: &str, syntax: ConfigSyntax) -> Result<SelectedComponent, LoadError> {
    match syntax {
        ConfigSyntax::Json => Ok(serde_json::from_str(text)?),
        ConfigSyntax::Yaml => Ok(serde_yaml::from_str(text)?),
    }
}

/// Read a saved instance from a `.json`, `.yaml`, or `.yml` file.
pub fn load_component(path: &Path) -> Result<SelectedComponent, LoadError> {
    let syntax = ConfigSyntax::from_path(path)
        .ok_or_else(|| LoadError::UnsupportedExtension(path.display().to_string()))?;
    let text = fs::read_to_string(path).map_err(|e| LoadError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    parse_component(&text, syntax)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_core::{ComponentProps, ComponentRegistry, ComponentStore, StyleConfig};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn json_save_round_trips() {
        let mut store = ComponentStore::new(Arc::new(ComponentRegistry::builtin()));
        store.select("card");
        store.update_style(StyleConfig::patch_from_pair("hover.color", "#000").unwrap());
        store.toggle_animation("fade");
        let original = store.selected().unwrap().clone();

        let temp = TempDir::new().unwrap();
        let path = temp.path().join("card-config.json");
        fs::write(&path, serde_json::to_string_pretty(&original).unwrap()).unwrap();

        let loaded = load_component(&path).unwrap();
        assert_eq!(loaded, original);
        assert_eq!(loaded.style.present_keys(), original.style.present_keys());
    }

    #[test]
    fn reads_yaml() {
        let yaml = r##"
id: badge_1
name: Status
type: badge
style:
  backgroundColor: "#10b981"
properties:
  text: Online
hoverEffects: [glow]
"##;
        let component = parse_component(yaml, ConfigSyntax::Yaml).unwrap();

        assert_eq!(component.name, "Status");
        assert_eq!(
            component.props,
            ComponentProps::Badge {
                text: "Online".into()
            }
        );
        assert_eq!(component.hover_effects.len(), 1);
    }

    #[test]
    fn rejects_unknown_style_keys() {
        let json = r#"{"id":"x","name":"X","type":"button","style":{"colour":"red"}}"#;

        assert!(matches!(
            parse_component(json, ConfigSyntax::Json),
            Err(LoadError::Json(_))
        ));
    }

    #[test]
    fn rejects_other_extensions() {
        assert!(matches!(
            load_component(Path::new("component.toml")),
            Err(LoadError::UnsupportedExtension(_))
        ));
    }

    #[test]
    fn missing_file_is_read_error() {
        let temp = TempDir::new().unwrap();

        assert!(matches!(
            load_component(&temp.path().join("missing.json")),
            Err(LoadError::Read { .. })
        ));
    }
}
