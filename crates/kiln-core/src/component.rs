//! The selected component instance and its typed properties.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::registry::{Animation, ComponentDescriptor, HoverEffect, PropertyKind};
use crate::style::StyleConfig;

/// Known component types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Button,
    Badge,
    Avatar,
    Input,
    Textarea,
    Select,
    Card,
    Modal,
    Navbar,
    Alert,
    Progress,
    Table,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 12] = [
        ComponentKind::Button,
        ComponentKind::Badge,
        ComponentKind::Avatar,
        ComponentKind::Input,
        ComponentKind::Textarea,
        ComponentKind::Select,
        ComponentKind::Card,
        ComponentKind::Modal,
        ComponentKind::Navbar,
        ComponentKind::Alert,
        ComponentKind::Progress,
        ComponentKind::Table,
    ];

    /// Type identifier.
    pub fn id(self) -> &'static str {
        match self {
            ComponentKind::Button => "button",
            ComponentKind::Badge => "badge",
            ComponentKind::Avatar => "avatar",
            ComponentKind::Input => "input",
            ComponentKind::Textarea => "textarea",
            ComponentKind::Select => "select",
            ComponentKind::Card => "card",
            ComponentKind::Modal => "modal",
            ComponentKind::Navbar => "navbar",
            ComponentKind::Alert => "alert",
            ComponentKind::Progress => "progress",
            ComponentKind::Table => "table",
        }
    }

    /// Parse a type identifier, ignoring case.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.id().eq_ignore_ascii_case(id))
    }
}

/// A property value as entered in the customization panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl PropValue {
    /// Text form of any value.
    pub fn as_text(&self) -> String {
        self.to_string()
    }

    /// Numeric form of the value. NaN and infinities have no JSON form and
    /// are rejected.
    pub fn as_number(&self) -> Option<f64> {
        let n = match self {
            PropValue::Number(n) => Some(*n),
            PropValue::Text(s) => s.trim().parse::<f64>().ok(),
            PropValue::Bool(_) => None,
        };
        n.filter(|n| n.is_finite())
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropValue::Bool(b) => Some(*b),
            PropValue::Text(s) => match s.trim() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            PropValue::Number(_) => None,
        }
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Bool(b) => write!(f, "{}", b),
            PropValue::Number(n) => write!(f, "{}", n),
            PropValue::Text(s) => f.write_str(s),
        }
    }
}

/// Content properties, one variant per component kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentProps {
    Button { text: String, disabled: bool },
    Badge { text: String },
    Avatar { initials: String },
    Input { input_type: String, placeholder: String, label: String },
    Textarea { placeholder: String, rows: f64, label: String },
    Select { placeholder: String, options: String, label: String },
    Card { title: String, description: String, image: String },
    Modal {
        title: String,
        description: String,
        confirm_label: String,
        cancel_label: String,
    },
    Navbar { brand: String, links: String },
    Alert { message: String, variant: String },
    Progress { value: f64, show_label: bool },
    Table { striped: bool, rows: f64 },
    /// Instance of a type the registry does not know.
    Generic { text: String },
}

impl ComponentProps {
    /// Build properties for a kind from a flat map. Missing keys take empty
    /// or zero values; keys the kind does not use are ignored.
    pub fn from_map(kind: Option<ComponentKind>, map: &BTreeMap<String, PropValue>) -> Self {
        let text = |key: &str| map.get(key).map(PropValue::as_text).unwrap_or_default();
        let number = |key: &str| map.get(key).and_then(PropValue::as_number).unwrap_or(0.0);
        let flag = |key: &str| map.get(key).and_then(PropValue::as_bool).unwrap_or(false);

        match kind {
            Some(ComponentKind::Button) => ComponentProps::Button {
                text: text("text"),
                disabled: flag("disabled"),
            },
            Some(ComponentKind::Badge) => ComponentProps::Badge { text: text("text") },
            Some(ComponentKind::Avatar) => ComponentProps::Avatar {
                initials: text("initials"),
            },
            Some(ComponentKind::Input) => ComponentProps::Input {
                input_type: text("type"),
                placeholder: text("placeholder"),
                label: text("label"),
            },
            Some(ComponentKind::Textarea) => ComponentProps::Textarea {
                placeholder: text("placeholder"),
                rows: number("rows"),
                label: text("label"),
            },
            Some(ComponentKind::Select) => ComponentProps::Select {
                placeholder: text("placeholder"),
                options: text("options"),
                label: text("label"),
            },
            Some(ComponentKind::Card) => ComponentProps::Card {
                title: text("title"),
                description: text("description"),
                image: text("image"),
            },
            Some(ComponentKind::Modal) => ComponentProps::Modal {
                title: text("title"),
                description: text("description"),
                confirm_label: text("confirmLabel"),
                cancel_label: text("cancelLabel"),
            },
            Some(ComponentKind::Navbar) => ComponentProps::Navbar {
                brand: text("brand"),
                links: text("links"),
            },
            Some(ComponentKind::Alert) => ComponentProps::Alert {
                message: text("message"),
                variant: text("variant"),
            },
            Some(ComponentKind::Progress) => ComponentProps::Progress {
                value: number("value"),
                show_label: flag("showLabel"),
            },
            Some(ComponentKind::Table) => ComponentProps::Table {
                striped: flag("striped"),
                rows: number("rows"),
            },
            None => ComponentProps::Generic { text: text("text") },
        }
    }

    /// Flat key/value view, keyed by the JSON property names.
    pub fn to_map(&self) -> BTreeMap<String, PropValue> {
        let t = |s: &String| PropValue::Text(s.clone());
        let entries: Vec<(&str, PropValue)> = match self {
            ComponentProps::Button { text, disabled } => {
                vec![("text", t(text)), ("disabled", PropValue::Bool(*disabled))]
            }
            ComponentProps::Badge { text } | ComponentProps::Generic { text } => {
                vec![("text", t(text))]
            }
            ComponentProps::Avatar { initials } => vec![("initials", t(initials))],
            ComponentProps::Input {
                input_type,
                placeholder,
                label,
            } => vec![
                ("type", t(input_type)),
                ("placeholder", t(placeholder)),
                ("label", t(label)),
            ],
            ComponentProps::Textarea {
                placeholder,
                rows,
                label,
            } => vec![
                ("placeholder", t(placeholder)),
                ("rows", PropValue::Number(*rows)),
                ("label", t(label)),
            ],
            ComponentProps::Select {
                placeholder,
                options,
                label,
            } => vec![
                ("placeholder", t(placeholder)),
                ("options", t(options)),
                ("label", t(label)),
            ],
            ComponentProps::Card {
                title,
                description,
                image,
            } => vec![
                ("title", t(title)),
                ("description", t(description)),
                ("image", t(image)),
            ],
            ComponentProps::Modal {
                title,
                description,
                confirm_label,
                cancel_label,
            } => vec![
                ("title", t(title)),
                ("description", t(description)),
                ("confirmLabel", t(confirm_label)),
                ("cancelLabel", t(cancel_label)),
            ],
            ComponentProps::Navbar { brand, links } => {
                vec![("brand", t(brand)), ("links", t(links))]
            }
            ComponentProps::Alert { message, variant } => {
                vec![("message", t(message)), ("variant", t(variant))]
            }
            ComponentProps::Progress { value, show_label } => vec![
                ("value", PropValue::Number(*value)),
                ("showLabel", PropValue::Bool(*show_label)),
            ],
            ComponentProps::Table { striped, rows } => vec![
                ("striped", PropValue::Bool(*striped)),
                ("rows", PropValue::Number(*rows)),
            ],
        };

        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    /// Set one property by key. Returns false when the kind has no such key
    /// or the value cannot be read as the field's type.
    ///
    /// Numeric values are stored as given; range checks are reported by
    /// [`check_properties`], not enforced here.
    pub fn set(&mut self, key: &str, value: &PropValue) -> bool {
        fn text(slot: &mut String, value: &PropValue) -> bool {
            *slot = value.as_text();
            true
        }
        fn number(slot: &mut f64, value: &PropValue) -> bool {
            match value.as_number() {
                Some(n) => {
                    *slot = n;
                    true
                }
                None => false,
            }
        }
        fn flag(slot: &mut bool, value: &PropValue) -> bool {
            match value.as_bool() {
                Some(b) => {
                    *slot = b;
                    true
                }
                None => false,
            }
        }

        match (self, key) {
            (ComponentProps::Button { text: s, .. }, "text")
            | (ComponentProps::Badge { text: s }, "text")
            | (ComponentProps::Generic { text: s }, "text")
            | (ComponentProps::Avatar { initials: s }, "initials")
            | (ComponentProps::Input { input_type: s, .. }, "type")
            | (ComponentProps::Input { placeholder: s, .. }, "placeholder")
            | (ComponentProps::Input { label: s, .. }, "label")
            | (ComponentProps::Textarea { placeholder: s, .. }, "placeholder")
            | (ComponentProps::Textarea { label: s, .. }, "label")
            | (ComponentProps::Select { placeholder: s, .. }, "placeholder")
            | (ComponentProps::Select { options: s, .. }, "options")
            | (ComponentProps::Select { label: s, .. }, "label")
            | (ComponentProps::Card { title: s, .. }, "title")
            | (ComponentProps::Card { description: s, .. }, "description")
            | (ComponentProps::Card { image: s, .. }, "image")
            | (ComponentProps::Modal { title: s, .. }, "title")
            | (ComponentProps::Modal { description: s, .. }, "description")
            | (ComponentProps::Modal { confirm_label: s, .. }, "confirmLabel")
            | (ComponentProps::Modal { cancel_label: s, .. }, "cancelLabel")
            | (ComponentProps::Navbar { brand: s, .. }, "brand")
            | (ComponentProps::Navbar { links: s, .. }, "links")
            | (ComponentProps::Alert { message: s, .. }, "message")
            | (ComponentProps::Alert { variant: s, .. }, "variant") => text(s, value),

            (ComponentProps::Textarea { rows: n, .. }, "rows")
            | (ComponentProps::Progress { value: n, .. }, "value")
            | (ComponentProps::Table { rows: n, .. }, "rows") => number(n, value),

            (ComponentProps::Button { disabled: b, .. }, "disabled")
            | (ComponentProps::Progress { show_label: b, .. }, "showLabel")
            | (ComponentProps::Table { striped: b, .. }, "striped") => flag(b, value),

            _ => false,
        }
    }

    /// Primary text content, when the kind has one.
    pub fn primary_text(&self) -> Option<&str> {
        match self {
            ComponentProps::Button { text, .. }
            | ComponentProps::Badge { text }
            | ComponentProps::Generic { text } => Some(text),
            ComponentProps::Avatar { initials } => Some(initials),
            ComponentProps::Card { title, .. } | ComponentProps::Modal { title, .. } => Some(title),
            ComponentProps::Alert { message, .. } => Some(message),
            ComponentProps::Navbar { brand, .. } => Some(brand),
            _ => None,
        }
    }
}

/// Visual preset applied on top of the style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectPreset {
    Neumorphism,
    Glass,
    Clay,
    Glow,
}

impl EffectPreset {
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "neumorphism" => Some(EffectPreset::Neumorphism),
            "glass" => Some(EffectPreset::Glass),
            "clay" => Some(EffectPreset::Clay),
            "glow" => Some(EffectPreset::Glow),
            _ => None,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            EffectPreset::Neumorphism => "neumorphism",
            EffectPreset::Glass => "glass",
            EffectPreset::Clay => "clay",
            EffectPreset::Glow => "glow",
        }
    }

    /// Declarations the preset adds, overriding the instance style.
    pub fn declarations(self) -> &'static [(&'static str, &'static str)] {
        match self {
            EffectPreset::Neumorphism => &[
                ("box-shadow", "8px 8px 16px #d1d9e6, -8px -8px 16px #ffffff"),
                ("border", "none"),
            ],
            EffectPreset::Glass => &[
                ("background", "rgba(255, 255, 255, 0.1)"),
                ("backdrop-filter", "blur(10px)"),
                ("border", "1px solid rgba(255, 255, 255, 0.2)"),
            ],
            EffectPreset::Clay => &[
                ("background", "rgba(255, 255, 255, 0.25)"),
                ("backdrop-filter", "blur(4px)"),
                ("border", "2px solid rgba(255, 255, 255, 0.18)"),
            ],
            EffectPreset::Glow => &[
                ("box-shadow", "0 0 20px rgba(59, 130, 246, 0.5)"),
                ("border", "1px solid rgba(59, 130, 246, 0.3)"),
            ],
        }
    }
}

/// Effects shared by every kind, addressed through property keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Effects {
    pub preset: Option<EffectPreset>,
    pub background_image: Option<String>,
    pub pulse: bool,
    pub float: bool,
    pub glow_pulse: bool,
}

const EFFECT_KEYS: &[&str] = &["effect", "backgroundImage", "pulse", "float", "glowPulse"];

impl Effects {
    fn from_map(map: &BTreeMap<String, PropValue>) -> Self {
        let flag = |key: &str| map.get(key).and_then(PropValue::as_bool).unwrap_or(false);
        Self {
            preset: map
                .get("effect")
                .and_then(|v| EffectPreset::from_id(&v.as_text())),
            background_image: map
                .get("backgroundImage")
                .map(PropValue::as_text)
                .filter(|s| !s.is_empty()),
            pulse: flag("pulse"),
            float: flag("float"),
            glow_pulse: flag("glowPulse"),
        }
    }

    fn write_to(&self, map: &mut BTreeMap<String, PropValue>) {
        if let Some(preset) = self.preset {
            map.insert("effect".into(), PropValue::Text(preset.id().into()));
        }
        if let Some(url) = &self.background_image {
            map.insert("backgroundImage".into(), PropValue::Text(url.clone()));
        }
        for (key, on) in [
            ("pulse", self.pulse),
            ("float", self.float),
            ("glowPulse", self.glow_pulse),
        ] {
            if on {
                map.insert(key.into(), PropValue::Bool(true));
            }
        }
    }

    /// Quoted `url(...)` value for the background image. Quotes, backslashes
    /// and control characters cannot break out of the string.
    pub fn background_image_css(&self) -> Option<String> {
        let url = self.background_image.as_ref()?;
        let escaped: String = url
            .chars()
            .filter(|c| !c.is_control())
            .map(|c| match c {
                '"' => "%22".to_string(),
                '\\' => "%5C".to_string(),
                c => c.to_string(),
            })
            .collect();
        Some(format!("url(\"{}\")", escaped))
    }

    /// Set one effect by key. Returns false for keys that are not effects or
    /// values of the wrong type.
    fn set(&mut self, key: &str, value: &PropValue) -> bool {
        match key {
            "effect" => {
                let raw = value.as_text();
                if raw.is_empty() || raw == "none" {
                    self.preset = None;
                    return true;
                }
                match EffectPreset::from_id(&raw) {
                    Some(p) => {
                        self.preset = Some(p);
                        true
                    }
                    None => false,
                }
            }
            "backgroundImage" => {
                let url = value.as_text();
                self.background_image = (!url.is_empty()).then_some(url);
                true
            }
            "pulse" | "float" | "glowPulse" => {
                let Some(on) = value.as_bool() else {
                    return false;
                };
                match key {
                    "pulse" => self.pulse = on,
                    "float" => self.float = on,
                    _ => self.glow_pulse = on,
                }
                true
            }
            _ => false,
        }
    }

    /// Continuous animation declarations in application order.
    pub fn continuous_animations(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.pulse {
            out.push("pulse 2s infinite");
        }
        if self.float {
            out.push("float 3s infinite ease-in-out");
        }
        if self.glow_pulse {
            out.push("glowPulse 2s infinite");
        }
        out
    }
}

/// The one live component instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawComponent", into = "RawComponent")]
pub struct SelectedComponent {
    /// `<type>_<created millis>`
    pub id: String,
    pub name: String,
    /// Type identifier; may name a type the registry does not know.
    pub type_id: String,
    pub style: StyleConfig,
    pub props: ComponentProps,
    pub effects: Effects,
    pub animations: Vec<Animation>,
    pub hover_effects: Vec<HoverEffect>,
}

impl SelectedComponent {
    /// Seed an instance from a descriptor's defaults.
    pub fn from_descriptor(descriptor: &ComponentDescriptor, created_ms: u128) -> Self {
        let defaults: BTreeMap<String, PropValue> = descriptor
            .properties
            .iter()
            .map(|p| (p.key.to_string(), p.default.clone()))
            .collect();

        Self {
            id: format!("{}_{}", descriptor.id, created_ms),
            name: descriptor.name.to_string(),
            type_id: descriptor.id.to_string(),
            style: descriptor.default_style.clone(),
            props: ComponentProps::from_map(Some(descriptor.kind), &defaults),
            effects: Effects::default(),
            animations: Vec::new(),
            hover_effects: Vec::new(),
        }
    }

    /// Minimal instance for a type the registry does not know.
    pub fn fallback(type_id: &str, created_ms: u128) -> Self {
        Self {
            id: format!("{}_{}", type_id, created_ms),
            name: type_id.to_string(),
            type_id: type_id.to_string(),
            style: fallback_style(),
            props: ComponentProps::Generic {
                text: type_id.to_string(),
            },
            effects: Effects::default(),
            animations: Vec::new(),
            hover_effects: Vec::new(),
        }
    }

    /// The known kind, if any.
    pub fn kind(&self) -> Option<ComponentKind> {
        match self.props {
            ComponentProps::Generic { .. } => None,
            _ => ComponentKind::from_id(&self.type_id),
        }
    }

    /// Class shared by the preview and every export, e.g. `button-component`.
    /// Anything but ASCII letters and digits in the type id becomes `-`.
    pub fn class_name(&self) -> String {
        let mut slug: String = self
            .type_id
            .trim()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_lowercase()
                } else {
                    '-'
                }
            })
            .collect();
        if slug.is_empty() {
            slug.push_str("custom");
        }
        format!("{}-component", slug)
    }

    /// Flat property view including effect keys.
    pub fn property_map(&self) -> BTreeMap<String, PropValue> {
        let mut map = self.props.to_map();
        self.effects.write_to(&mut map);
        map
    }

    /// Set one property or effect by key. Returns whether it was applied.
    pub fn set_property(&mut self, key: &str, value: &PropValue) -> bool {
        if EFFECT_KEYS.contains(&key) {
            self.effects.set(key, value)
        } else {
            self.props.set(key, value)
        }
    }
}

fn fallback_style() -> StyleConfig {
    StyleConfig {
        background_color: Some("#f3f4f6".to_string()),
        color: Some("#374151".to_string()),
        padding: Some("16px 24px".to_string()),
        border_radius: Some("8px".to_string()),
        border: Some("1px solid #e5e7eb".to_string()),
        ..Default::default()
    }
}

/// Serialized shape of an instance: properties as a flat map.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawComponent {
    id: String,
    name: String,
    #[serde(rename = "type")]
    type_id: String,
    #[serde(default)]
    style: StyleConfig,
    #[serde(default)]
    properties: BTreeMap<String, PropValue>,
    #[serde(default)]
    animations: Vec<Animation>,
    #[serde(default)]
    hover_effects: Vec<HoverEffect>,
}

impl TryFrom<RawComponent> for SelectedComponent {
    type Error = String;

    fn try_from(raw: RawComponent) -> Result<Self, Self::Error> {
        let kind = ComponentKind::from_id(&raw.type_id);
        Ok(Self {
            props: ComponentProps::from_map(kind, &raw.properties),
            effects: Effects::from_map(&raw.properties),
            id: raw.id,
            name: raw.name,
            type_id: raw.type_id,
            style: raw.style,
            animations: raw.animations,
            hover_effects: raw.hover_effects,
        })
    }
}

impl From<SelectedComponent> for RawComponent {
    fn from(c: SelectedComponent) -> Self {
        Self {
            properties: c.property_map(),
            id: c.id,
            name: c.name,
            type_id: c.type_id,
            style: c.style,
            animations: c.animations,
            hover_effects: c.hover_effects,
        }
    }
}

/// A property value outside its declared constraints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyWarning {
    pub key: String,
    pub message: String,
}

/// Report property values outside the descriptor's min/max or option list.
/// Values are never rejected; this only lists what is out of bounds.
pub fn check_properties(
    component: &SelectedComponent,
    descriptor: &ComponentDescriptor,
) -> Vec<PropertyWarning> {
    let map = component.props.to_map();
    let mut warnings = Vec::new();

    for prop in &descriptor.properties {
        let Some(value) = map.get(prop.key) else {
            continue;
        };
        match prop.kind {
            PropertyKind::Number => {
                let Some(n) = value.as_number() else {
                    continue;
                };
                if prop.min.is_some_and(|min| n < min) || prop.max.is_some_and(|max| n > max) {
                    warnings.push(PropertyWarning {
                        key: prop.key.to_string(),
                        message: format!(
                            "{} is outside {}..{}",
                            n,
                            prop.min.unwrap_or(f64::MIN),
                            prop.max.unwrap_or(f64::MAX)
                        ),
                    });
                }
            }
            PropertyKind::Select => {
                let v = value.as_text();
                if !prop.options.contains(&v.as_str()) {
                    warnings.push(PropertyWarning {
                        key: prop.key.to_string(),
                        message: format!("'{}' is not one of {}", v, prop.options.join(", ")),
                    });
                }
            }
            PropertyKind::Text | PropertyKind::Boolean => {}
        }
    }

    warnings
}
