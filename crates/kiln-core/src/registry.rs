//! Component registry for looking up component descriptors.
//!
//! The builtin table is defined once at startup and never mutated. Lookups are
//! case-insensitive on the type identifier.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::component::{ComponentKind, PropValue};
use crate::style::StyleConfig;

/// Category a component is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Basic,
    Form,
    Layout,
    Feedback,
    Data,
}

impl Category {
    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Category::Basic => "Basic",
            Category::Form => "Form",
            Category::Layout => "Layout",
            Category::Feedback => "Feedback",
            Category::Data => "Data",
        }
    }

    /// Parse a label, ignoring case.
    pub fn from_label(label: &str) -> Option<Self> {
        [
            Category::Basic,
            Category::Form,
            Category::Layout,
            Category::Feedback,
            Category::Data,
        ]
        .into_iter()
        .find(|c| c.label().eq_ignore_ascii_case(label))
    }
}

/// Entry animation played when the component appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Animation {
    Bounce,
    Fade,
    Slide,
    Scale,
    Rotate,
    Flip,
}

impl Animation {
    pub const ALL: [Animation; 6] = [
        Animation::Bounce,
        Animation::Fade,
        Animation::Slide,
        Animation::Scale,
        Animation::Rotate,
        Animation::Flip,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Animation::Bounce => "bounce",
            Animation::Fade => "fade",
            Animation::Slide => "slide",
            Animation::Scale => "scale",
            Animation::Rotate => "rotate",
            Animation::Flip => "flip",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.id() == id)
    }

    /// Preview class applied while the animation is active.
    pub fn class_name(self) -> &'static str {
        match self {
            Animation::Bounce => "animate-bounce-in",
            Animation::Fade => "animate-fade-in-up",
            Animation::Slide => "animate-slide-in-left",
            Animation::Scale => "animate-scale-in",
            Animation::Rotate => "animate-rotate-in",
            Animation::Flip => "animate-flip-in",
        }
    }

    /// Keyframe name and timing used in exported CSS.
    pub fn keyframes(self) -> (&'static str, &'static str) {
        match self {
            Animation::Bounce => ("bounceIn", "0.6s ease-out"),
            Animation::Fade => ("fadeInUp", "0.6s ease-out"),
            Animation::Slide => ("slideInLeft", "0.5s ease-out"),
            Animation::Scale => ("scaleIn", "0.4s ease-out"),
            Animation::Rotate => ("rotateIn", "0.5s ease-out"),
            Animation::Flip => ("flipIn", "0.6s ease-out"),
        }
    }

    pub fn descriptor(self) -> EffectDescriptor {
        let (name, description) = match self {
            Animation::Bounce => ("Bounce In", "Bouncy entrance"),
            Animation::Fade => ("Fade In", "Smooth fade"),
            Animation::Slide => ("Slide In", "Slide from side"),
            Animation::Scale => ("Scale In", "Scale from center"),
            Animation::Rotate => ("Rotate In", "Spin entrance"),
            Animation::Flip => ("Flip In", "3D flip effect"),
        };
        EffectDescriptor {
            id: self.id(),
            name,
            description,
        }
    }
}

/// Effect applied while the pointer is over the component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HoverEffect {
    Lift,
    Scale,
    Rotate,
    Glow,
    Shake,
    Bounce,
}

impl HoverEffect {
    pub const ALL: [HoverEffect; 6] = [
        HoverEffect::Lift,
        HoverEffect::Scale,
        HoverEffect::Rotate,
        HoverEffect::Glow,
        HoverEffect::Shake,
        HoverEffect::Bounce,
    ];

    pub fn id(self) -> &'static str {
        match self {
            HoverEffect::Lift => "lift",
            HoverEffect::Scale => "scale",
            HoverEffect::Rotate => "rotate",
            HoverEffect::Glow => "glow",
            HoverEffect::Shake => "shake",
            HoverEffect::Bounce => "bounce",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|h| h.id() == id)
    }

    /// Preview class applied while the effect is active.
    pub fn class_name(self) -> &'static str {
        match self {
            HoverEffect::Lift => "hover-lift",
            HoverEffect::Scale => "hover-scale",
            HoverEffect::Rotate => "hover-rotate",
            HoverEffect::Glow => "hover-glow",
            HoverEffect::Shake => "hover-shake",
            HoverEffect::Bounce => "hover-bounce",
        }
    }

    pub fn descriptor(self) -> EffectDescriptor {
        let (name, description) = match self {
            HoverEffect::Lift => ("Lift Up", "Elevate on hover"),
            HoverEffect::Scale => ("Scale", "Grow larger"),
            HoverEffect::Rotate => ("Rotate", "Slight rotation"),
            HoverEffect::Glow => ("Glow", "Glowing border"),
            HoverEffect::Shake => ("Shake", "Gentle shake"),
            HoverEffect::Bounce => ("Bounce", "Bouncy effect"),
        };
        EffectDescriptor {
            id: self.id(),
            name,
            description,
        }
    }
}

/// Display metadata for an animation or hover effect.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectDescriptor {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

/// Value kind of a configurable property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    Text,
    Number,
    Boolean,
    Select,
}

/// Panel group a property is shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyGroup {
    Content,
    Layout,
    Behavior,
    Appearance,
}

/// A configurable property of a component.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescriptor {
    pub key: &'static str,
    pub kind: PropertyKind,
    pub default: PropValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<&'static str>,
    pub group: PropertyGroup,
}

impl PropertyDescriptor {
    fn text(key: &'static str, default: &str) -> Self {
        Self::new(key, PropertyKind::Text, PropValue::Text(default.to_string()))
    }

    fn boolean(key: &'static str, default: bool) -> Self {
        Self::new(key, PropertyKind::Boolean, PropValue::Bool(default)).group(PropertyGroup::Behavior)
    }

    fn number(key: &'static str, default: f64, min: f64, max: f64) -> Self {
        let mut p = Self::new(key, PropertyKind::Number, PropValue::Number(default));
        p.min = Some(min);
        p.max = Some(max);
        p.step = Some(1.0);
        p.group(PropertyGroup::Layout)
    }

    fn select(key: &'static str, default: &str, options: &[&'static str]) -> Self {
        let mut p = Self::new(key, PropertyKind::Select, PropValue::Text(default.to_string()));
        p.options = options.to_vec();
        p.group(PropertyGroup::Appearance)
    }

    fn new(key: &'static str, kind: PropertyKind, default: PropValue) -> Self {
        Self {
            key,
            kind,
            default,
            min: None,
            max: None,
            step: None,
            unit: None,
            options: Vec::new(),
            group: PropertyGroup::Content,
        }
    }

    fn group(mut self, group: PropertyGroup) -> Self {
        self.group = group;
        self
    }

    fn unit(mut self, unit: &'static str) -> Self {
        self.unit = Some(unit);
        self
    }
}

/// Immutable description of a component type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDescriptor {
    pub id: &'static str,
    pub kind: ComponentKind,
    pub name: &'static str,
    pub category: Category,
    pub description: &'static str,
    pub default_style: StyleConfig,
    pub properties: Vec<PropertyDescriptor>,
    pub animations: Vec<Animation>,
    pub hover_effects: Vec<HoverEffect>,
}

impl ComponentDescriptor {
    /// Look up a property descriptor by key.
    pub fn property(&self, key: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.key == key)
    }

    pub fn offers_animation(&self, animation: Animation) -> bool {
        self.animations.contains(&animation)
    }

    pub fn offers_hover_effect(&self, effect: HoverEffect) -> bool {
        self.hover_effects.contains(&effect)
    }

    pub fn animation_descriptors(&self) -> Vec<EffectDescriptor> {
        self.animations.iter().map(|a| a.descriptor()).collect()
    }

    pub fn hover_effect_descriptors(&self) -> Vec<EffectDescriptor> {
        self.hover_effects.iter().map(|h| h.descriptor()).collect()
    }
}

/// A registry of component descriptors.
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    /// Descriptors in registration order
    descriptors: Vec<ComponentDescriptor>,

    /// Index into `descriptors` by lowercase id
    index: HashMap<String, usize>,
}

impl ComponentRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every builtin component.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for descriptor in BUILTIN.iter() {
            // Builtin ids are unique.
            let _ = registry.register(descriptor.clone());
        }
        registry
    }

    /// Add a descriptor. Ids must be unique.
    pub fn register(&mut self, descriptor: ComponentDescriptor) -> Result<(), RegistryError> {
        let key = descriptor.id.to_lowercase();
        if self.index.contains_key(&key) {
            return Err(RegistryError::DuplicateComponent(descriptor.id.to_string()));
        }
        self.index.insert(key, self.descriptors.len());
        self.descriptors.push(descriptor);
        Ok(())
    }

    /// Look up a descriptor by type id (case-insensitive).
    pub fn get(&self, type_id: &str) -> Option<&ComponentDescriptor> {
        self.index
            .get(&type_id.to_lowercase())
            .map(|&i| &self.descriptors[i])
    }

    /// Look up a descriptor, failing when it is not registered.
    pub fn require(&self, type_id: &str) -> Result<&ComponentDescriptor, RegistryError> {
        self.get(type_id)
            .ok_or_else(|| RegistryError::ComponentNotFound(type_id.to_string()))
    }

    /// Check if a component exists.
    pub fn contains(&self, type_id: &str) -> bool {
        self.index.contains_key(&type_id.to_lowercase())
    }

    /// All descriptors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ComponentDescriptor> {
        self.descriptors.iter()
    }

    /// Descriptors in a category, in registration order.
    pub fn by_category(&self, category: Category) -> Vec<&ComponentDescriptor> {
        self.descriptors
            .iter()
            .filter(|d| d.category == category)
            .collect()
    }

    /// Distinct categories, in order of first appearance.
    pub fn categories(&self) -> Vec<Category> {
        let mut out: Vec<Category> = Vec::new();
        for d in &self.descriptors {
            if !out.contains(&d.category) {
                out.push(d.category);
            }
        }
        out
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

/// Errors that can occur with the registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Component not found: {0}")]
    ComponentNotFound(String),

    #[error("Component already registered: {0}")]
    DuplicateComponent(String),
}

fn style(pairs: &[(&str, &str)]) -> StyleConfig {
    let mut s = StyleConfig::default();
    for (key, value) in pairs {
        // Keys below are literal and known to the style model.
        if let Ok(patch) = StyleConfig::patch_from_pair(key, value) {
            s.merge(patch);
        }
    }
    s
}

static BUILTIN: LazyLock<Vec<ComponentDescriptor>> = LazyLock::new(|| {
    use Animation as A;
    use HoverEffect as H;
    use PropertyDescriptor as P;

    vec![
        // Basic
        ComponentDescriptor {
            id: "button",
            kind: ComponentKind::Button,
            name: "Button",
            category: Category::Basic,
            description: "Interactive button element",
            default_style: style(&[
                ("backgroundColor", "#3b82f6"),
                ("color", "#ffffff"),
                ("padding", "12px 24px"),
                ("borderRadius", "8px"),
                ("fontSize", "14px"),
                ("fontWeight", "500"),
                ("border", "none"),
                ("transition", "all 0.2s ease"),
            ]),
            properties: vec![P::text("text", "Click Me"), P::boolean("disabled", false)],
            animations: A::ALL.to_vec(),
            hover_effects: H::ALL.to_vec(),
        },
        ComponentDescriptor {
            id: "badge",
            kind: ComponentKind::Badge,
            name: "Badge",
            category: Category::Basic,
            description: "Small label or status indicator",
            default_style: style(&[
                ("backgroundColor", "#3b82f6"),
                ("color", "#ffffff"),
                ("padding", "4px 12px"),
                ("borderRadius", "12px"),
                ("fontSize", "12px"),
                ("fontWeight", "500"),
            ]),
            properties: vec![P::text("text", "Badge")],
            animations: vec![A::Fade, A::Scale, A::Bounce],
            hover_effects: vec![H::Scale, H::Glow],
        },
        ComponentDescriptor {
            id: "avatar",
            kind: ComponentKind::Avatar,
            name: "Avatar",
            category: Category::Basic,
            description: "User profile picture or initials",
            default_style: style(&[
                ("backgroundColor", "#e5e7eb"),
                ("color", "#6b7280"),
                ("width", "64px"),
                ("height", "64px"),
                ("borderRadius", "50%"),
                ("fontSize", "24px"),
            ]),
            properties: vec![P::text("initials", "JD")],
            animations: vec![A::Fade, A::Scale, A::Rotate],
            hover_effects: vec![H::Scale, H::Rotate, H::Glow],
        },
        // Form
        ComponentDescriptor {
            id: "input",
            kind: ComponentKind::Input,
            name: "Input",
            category: Category::Form,
            description: "Text input field",
            default_style: style(&[
                ("backgroundColor", "#ffffff"),
                ("color", "#374151"),
                ("padding", "10px 14px"),
                ("border", "1px solid #d1d5db"),
                ("borderRadius", "6px"),
                ("fontSize", "14px"),
                ("width", "240px"),
                ("focus.border", "1px solid #3b82f6"),
            ]),
            properties: vec![
                P::select("type", "text", &["text", "email", "password", "number", "search"]),
                P::text("placeholder", "Enter text..."),
                P::text("label", ""),
            ],
            animations: vec![A::Fade, A::Slide],
            hover_effects: vec![H::Glow],
        },
        ComponentDescriptor {
            id: "textarea",
            kind: ComponentKind::Textarea,
            name: "Textarea",
            category: Category::Form,
            description: "Multi-line text input",
            default_style: style(&[
                ("backgroundColor", "#ffffff"),
                ("color", "#374151"),
                ("padding", "10px 14px"),
                ("border", "1px solid #d1d5db"),
                ("borderRadius", "6px"),
                ("fontSize", "14px"),
                ("width", "320px"),
            ]),
            properties: vec![
                P::text("placeholder", "Enter your message..."),
                P::number("rows", 4.0, 1.0, 20.0),
                P::text("label", ""),
            ],
            animations: vec![A::Fade, A::Slide],
            hover_effects: vec![H::Glow],
        },
        ComponentDescriptor {
            id: "select",
            kind: ComponentKind::Select,
            name: "Select",
            category: Category::Form,
            description: "Dropdown selection",
            default_style: style(&[
                ("backgroundColor", "#ffffff"),
                ("color", "#374151"),
                ("padding", "10px 14px"),
                ("border", "1px solid #d1d5db"),
                ("borderRadius", "6px"),
                ("fontSize", "14px"),
                ("width", "240px"),
            ]),
            properties: vec![
                P::text("placeholder", "Choose an option"),
                P::text("options", "Option 1, Option 2, Option 3"),
                P::text("label", ""),
            ],
            animations: vec![A::Fade, A::Slide],
            hover_effects: vec![H::Glow],
        },
        // Layout
        ComponentDescriptor {
            id: "card",
            kind: ComponentKind::Card,
            name: "Card",
            category: Category::Layout,
            description: "Content container",
            default_style: style(&[
                ("backgroundColor", "#ffffff"),
                ("color", "#1f2937"),
                ("padding", "24px"),
                ("borderRadius", "12px"),
                ("boxShadow", "0 4px 6px rgba(0, 0, 0, 0.1)"),
                ("width", "320px"),
            ]),
            properties: vec![
                P::text("title", "Card Title"),
                P::text(
                    "description",
                    "This is a sample card description that shows how your card will look.",
                ),
                P::text("image", ""),
            ],
            animations: vec![A::Fade, A::Slide, A::Scale, A::Flip],
            hover_effects: vec![H::Lift, H::Scale, H::Glow, H::Rotate],
        },
        ComponentDescriptor {
            id: "modal",
            kind: ComponentKind::Modal,
            name: "Modal",
            category: Category::Layout,
            description: "Dialog overlay",
            default_style: style(&[
                ("backgroundColor", "#ffffff"),
                ("color", "#1f2937"),
                ("padding", "24px"),
                ("borderRadius", "12px"),
                ("boxShadow", "0 20px 25px rgba(0, 0, 0, 0.15)"),
                ("width", "400px"),
            ]),
            properties: vec![
                P::text("title", "Modal Title"),
                P::text("description", "This is a sample modal component."),
                P::text("confirmLabel", "Confirm"),
                P::text("cancelLabel", "Cancel"),
            ],
            animations: vec![A::Fade, A::Scale],
            hover_effects: vec![],
        },
        ComponentDescriptor {
            id: "navbar",
            kind: ComponentKind::Navbar,
            name: "Navbar",
            category: Category::Layout,
            description: "Navigation bar",
            default_style: style(&[
                ("backgroundColor", "#1f2937"),
                ("color", "#ffffff"),
                ("padding", "16px 24px"),
                ("display", "flex"),
                ("fontSize", "14px"),
            ]),
            properties: vec![
                P::text("brand", "Brand"),
                P::text("links", "Home, About, Contact"),
            ],
            animations: vec![A::Slide, A::Fade],
            hover_effects: vec![],
        },
        // Feedback
        ComponentDescriptor {
            id: "alert",
            kind: ComponentKind::Alert,
            name: "Alert",
            category: Category::Feedback,
            description: "Important message notification",
            default_style: style(&[
                ("backgroundColor", "#fef3c7"),
                ("color", "#92400e"),
                ("border", "1px solid #fbbf24"),
                ("padding", "16px"),
                ("borderRadius", "8px"),
            ]),
            properties: vec![
                P::text("message", "This is an alert message"),
                P::select("variant", "warning", &["info", "success", "warning", "error"]),
            ],
            animations: vec![A::Fade, A::Slide, A::Bounce],
            hover_effects: vec![H::Shake],
        },
        ComponentDescriptor {
            id: "progress",
            kind: ComponentKind::Progress,
            name: "Progress",
            category: Category::Feedback,
            description: "Progress indicator",
            default_style: style(&[
                ("backgroundColor", "#3b82f6"),
                ("color", "#374151"),
                ("borderRadius", "4px"),
                ("height", "8px"),
                ("width", "300px"),
            ]),
            properties: vec![
                P::number("value", 65.0, 0.0, 100.0)
                    .unit("%")
                    .group(PropertyGroup::Content),
                P::boolean("showLabel", true),
            ],
            animations: vec![A::Fade],
            hover_effects: vec![],
        },
        // Data
        ComponentDescriptor {
            id: "table",
            kind: ComponentKind::Table,
            name: "Table",
            category: Category::Data,
            description: "Data table with rows and columns",
            default_style: style(&[
                ("backgroundColor", "#f3f4f6"),
                ("color", "#374151"),
                ("fontSize", "14px"),
                ("borderRadius", "8px"),
            ]),
            properties: vec![
                P::boolean("striped", true),
                P::number("rows", 3.0, 1.0, 10.0),
            ],
            animations: vec![A::Fade],
            hover_effects: vec![],
        },
    ]
});
