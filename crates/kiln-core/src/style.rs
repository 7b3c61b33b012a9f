//! Typed style model for component instances.
//!
//! Every recognized style attribute is an optional field. Absent fields fall
//! back to per-renderer defaults at render time, so a sparse `StyleConfig`
//! is always valid.

use serde::{Deserialize, Serialize};

/// Style overrides applied in an interaction state (`:hover`, `:focus`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct StateStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub box_shadow: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform: Option<String>,
}

/// Keys accepted inside a `hover.` or `focus.` path.
const STATE_KEYS: &[&str] = &["backgroundColor", "color", "border", "boxShadow", "transform"];

impl StateStyle {
    /// Whether no override is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Field-by-field merge: fields set in `patch` win.
    pub fn merge(&mut self, patch: StateStyle) {
        overwrite(&mut self.background_color, patch.background_color);
        overwrite(&mut self.color, patch.color);
        overwrite(&mut self.border, patch.border);
        overwrite(&mut self.box_shadow, patch.box_shadow);
        overwrite(&mut self.transform, patch.transform);
    }

    /// CSS declarations for the fields that are set, in a fixed order.
    pub fn css_properties(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        push(&mut out, "background-color", &self.background_color);
        push(&mut out, "color", &self.color);
        push(&mut out, "border", &self.border);
        push(&mut out, "box-shadow", &self.box_shadow);
        push(&mut out, "transform", &self.transform);
        out
    }
}

/// The style of a component instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct StyleConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub box_shadow: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    /// Gradient or shorthand background, layered over `background_color`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hover: Option<StateStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus: Option<StateStyle>,
}

/// Top-level keys, in JSON spelling.
const STYLE_KEYS: &[&str] = &[
    "backgroundColor",
    "color",
    "padding",
    "margin",
    "borderRadius",
    "fontSize",
    "fontWeight",
    "fontFamily",
    "border",
    "transition",
    "boxShadow",
    "width",
    "height",
    "display",
    "opacity",
    "background",
    "textAlign",
    "letterSpacing",
    "lineHeight",
];

impl StyleConfig {
    /// Whether no attribute at all is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge a partial style into this one.
    ///
    /// Top-level fields present in `patch` replace the current value. The
    /// nested `hover` and `focus` overrides are merged field by field, so a
    /// patch that only sets `hover.color` keeps an existing
    /// `hover.background_color`.
    pub fn merge(&mut self, patch: StyleConfig) {
        overwrite(&mut self.background_color, patch.background_color);
        overwrite(&mut self.color, patch.color);
        overwrite(&mut self.padding, patch.padding);
        overwrite(&mut self.margin, patch.margin);
        overwrite(&mut self.border_radius, patch.border_radius);
        overwrite(&mut self.font_size, patch.font_size);
        overwrite(&mut self.font_weight, patch.font_weight);
        overwrite(&mut self.font_family, patch.font_family);
        overwrite(&mut self.border, patch.border);
        overwrite(&mut self.transition, patch.transition);
        overwrite(&mut self.box_shadow, patch.box_shadow);
        overwrite(&mut self.width, patch.width);
        overwrite(&mut self.height, patch.height);
        overwrite(&mut self.display, patch.display);
        overwrite(&mut self.opacity, patch.opacity);
        overwrite(&mut self.background, patch.background);
        overwrite(&mut self.text_align, patch.text_align);
        overwrite(&mut self.letter_spacing, patch.letter_spacing);
        overwrite(&mut self.line_height, patch.line_height);

        merge_state(&mut self.hover, patch.hover);
        merge_state(&mut self.focus, patch.focus);
    }

    /// Names of the attributes that are set, in JSON spelling.
    pub fn present_keys(&self) -> Vec<String> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    /// CSS declarations for the top-level fields that are set, in a fixed order.
    /// Nested state overrides are not included.
    pub fn css_properties(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        push(&mut out, "background-color", &self.background_color);
        push(&mut out, "background", &self.background);
        push(&mut out, "color", &self.color);
        push(&mut out, "padding", &self.padding);
        push(&mut out, "margin", &self.margin);
        push(&mut out, "border-radius", &self.border_radius);
        push(&mut out, "font-size", &self.font_size);
        push(&mut out, "font-weight", &self.font_weight);
        push(&mut out, "font-family", &self.font_family);
        push(&mut out, "border", &self.border);
        push(&mut out, "transition", &self.transition);
        push(&mut out, "box-shadow", &self.box_shadow);
        push(&mut out, "width", &self.width);
        push(&mut out, "height", &self.height);
        push(&mut out, "display", &self.display);
        if let Some(opacity) = self.opacity {
            out.push(("opacity", opacity.to_string()));
        }
        push(&mut out, "text-align", &self.text_align);
        push(&mut out, "letter-spacing", &self.letter_spacing);
        push(&mut out, "line-height", &self.line_height);
        out
    }

    /// Build a single-attribute patch from a `key=value` style assignment.
    ///
    /// Keys use JSON spelling; `hover.` and `focus.` prefixes address the
    /// state overrides (e.g. `hover.backgroundColor`).
    pub fn patch_from_pair(key: &str, value: &str) -> Result<StyleConfig, StyleError> {
        let json = match key.split_once('.') {
            Some((state @ ("hover" | "focus"), inner)) => {
                if !STATE_KEYS.contains(&inner) {
                    return Err(StyleError::UnknownKey(key.to_string()));
                }
                serde_json::json!({ state: { inner: value } })
            }
            Some(_) => return Err(StyleError::UnknownKey(key.to_string())),
            None => {
                if !STYLE_KEYS.contains(&key) {
                    return Err(StyleError::UnknownKey(key.to_string()));
                }
                if key == "opacity" {
                    let number: f64 = value.trim().parse().map_err(|_| StyleError::InvalidValue {
                        key: key.to_string(),
                        value: value.to_string(),
                    })?;
                    serde_json::json!({ key: number })
                } else {
                    serde_json::json!({ key: value })
                }
            }
        };

        serde_json::from_value(json).map_err(|e| StyleError::InvalidValue {
            key: key.to_string(),
            value: e.to_string(),
        })
    }
}

/// Errors from parsing style assignments.
#[derive(Debug, thiserror::Error)]
pub enum StyleError {
    #[error("Unknown style attribute: {0}")]
    UnknownKey(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

fn overwrite<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

fn merge_state(slot: &mut Option<StateStyle>, patch: Option<StateStyle>) {
    let Some(patch) = patch else {
        return;
    };
    match slot {
        Some(current) => current.merge(patch),
        None => *slot = Some(patch),
    }
}

fn push(out: &mut Vec<(&'static str, String)>, name: &'static str, value: &Option<String>) {
    if let Some(v) = value {
        out.push((name, v.clone()));
    }
}
