//! Live preview rendering.
//!
//! `render_preview` is a pure function of the instance: the same snapshot
//! always yields byte-identical markup.

use serde::Serialize;

use crate::component::{ComponentProps, SelectedComponent};

/// Preview output for one instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedPreview {
    /// HTML fragment for the preview pane.
    pub markup: String,
    /// Classes on the root element, in application order.
    pub class_names: Vec<String>,
    /// Inline declarations on the root element.
    pub inline_style: Vec<(String, String)>,
}

impl RenderedPreview {
    /// Inline declarations joined into a `style` attribute value.
    pub fn style_attribute(&self) -> String {
        join_declarations(&self.inline_style)
    }
}

/// Render the preview for an instance.
pub fn render_preview(component: &SelectedComponent) -> RenderedPreview {
    let class_names = class_names(component);
    let inline_style = inline_style(component);
    let root = RootAttrs {
        class: class_names.join(" "),
        style: join_declarations(&inline_style),
    };

    let markup = match &component.props {
        ComponentProps::Button { text, disabled } => format!(
            "<button{}{}>{}</button>",
            root,
            if *disabled { " disabled" } else { "" },
            escape_html(text)
        ),
        ComponentProps::Badge { text } => format!("<span{}>{}</span>", root, escape_html(text)),
        ComponentProps::Avatar { initials } => {
            format!("<div{}>{}</div>", root, escape_html(initials))
        }
        ComponentProps::Input {
            input_type,
            placeholder,
            label,
        } => field(
            label,
            format!(
                "<input{} type=\"{}\" placeholder=\"{}\" />",
                root,
                escape_html(input_type),
                escape_html(placeholder)
            ),
        ),
        ComponentProps::Textarea {
            placeholder,
            rows,
            label,
        } => field(
            label,
            format!(
                "<textarea{} rows=\"{}\" placeholder=\"{}\"></textarea>",
                root,
                rows.max(1.0).round(),
                escape_html(placeholder)
            ),
        ),
        ComponentProps::Select {
            placeholder,
            options,
            label,
        } => {
            let mut html = format!(
                "<select{}><option value=\"\" disabled selected>{}</option>",
                root,
                escape_html(placeholder)
            );
            for option in list_items(options) {
                let option = escape_html(option);
                html.push_str(&format!("<option value=\"{0}\">{0}</option>", option));
            }
            html.push_str("</select>");
            field(label, html)
        }
        ComponentProps::Card {
            title,
            description,
            image,
        } => {
            let image = if image.is_empty() {
                String::new()
            } else {
                format!(
                    "<img class=\"kiln-card-image\" src=\"{}\" alt=\"\" />",
                    escape_html(image)
                )
            };
            format!(
                "<div{}>{}<h3>{}</h3><p>{}</p></div>",
                root,
                image,
                escape_html(title),
                escape_html(description)
            )
        }
        ComponentProps::Modal {
            title,
            description,
            confirm_label,
            cancel_label,
        } => format!(
            "<div{} role=\"dialog\"><h3>{}</h3><p>{}</p>\
             <div class=\"kiln-modal-actions\"><button>{}</button><button>{}</button></div></div>",
            root,
            escape_html(title),
            escape_html(description),
            escape_html(cancel_label),
            escape_html(confirm_label)
        ),
        ComponentProps::Navbar { brand, links } => {
            let items: String = list_items(links)
                .map(|l| format!("<li><a href=\"#\">{}</a></li>", escape_html(l)))
                .collect();
            format!(
                "<nav{}><span class=\"kiln-brand\">{}</span><ul>{}</ul></nav>",
                root,
                escape_html(brand),
                items
            )
        }
        ComponentProps::Alert { message, variant } => format!(
            "<div{} role=\"alert\" data-variant=\"{}\">{}</div>",
            root,
            escape_html(variant),
            escape_html(message)
        ),
        ComponentProps::Progress { value, show_label } => {
            // Fill width is clamped for display only.
            let fill = value.clamp(0.0, 100.0);
            let label = if *show_label {
                format!("<span class=\"kiln-progress-label\">{}%</span>", value)
            } else {
                String::new()
            };
            format!(
                "<div{} role=\"progressbar\" aria-valuenow=\"{}\">\
                 <div class=\"kiln-progress-fill\" style=\"width: {}%;\"></div>{}</div>",
                root, value, fill, label
            )
        }
        ComponentProps::Table { striped, rows } => {
            let count = rows.clamp(0.0, 100.0) as usize;
            let body: String = (1..=count)
                .map(|i| {
                    format!(
                        "<tr><td>Row {}</td><td>Active</td><td>Member</td></tr>",
                        i
                    )
                })
                .collect();
            format!(
                "<table{}{}><thead><tr><th>Name</th><th>Status</th><th>Role</th></tr></thead>\
                 <tbody>{}</tbody></table>",
                root,
                if *striped { " data-striped" } else { "" },
                body
            )
        }
        ComponentProps::Generic { .. } => format!(
            "<div{}>{} Component</div>",
            root,
            escape_html(&component.name)
        ),
    };

    RenderedPreview {
        markup,
        class_names,
        inline_style,
    }
}

/// Escape text for HTML content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn join_declarations(declarations: &[(String, String)]) -> String {
    declarations
        .iter()
        .map(|(k, v)| format!("{}: {};", k, v))
        .collect::<Vec<_>>()
        .join(" ")
}

struct RootAttrs {
    class: String,
    style: String,
}

impl std::fmt::Display for RootAttrs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, " class=\"{}\"", escape_html(&self.class))?;
        if !self.style.is_empty() {
            write!(f, " style=\"{}\"", escape_html(&self.style))?;
        }
        Ok(())
    }
}

fn class_names(component: &SelectedComponent) -> Vec<String> {
    let mut classes = vec![
        "kiln-preview".to_string(),
        component.class_name(),
    ];
    classes.extend(component.animations.iter().map(|a| a.class_name().to_string()));
    classes.extend(
        component
            .hover_effects
            .iter()
            .map(|h| h.class_name().to_string()),
    );
    classes
}

fn inline_style(component: &SelectedComponent) -> Vec<(String, String)> {
    let mut style: Vec<(String, String)> = component
        .style
        .css_properties()
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

    let effects = &component.effects;
    if let Some(preset) = effects.preset {
        for (name, value) in preset.declarations() {
            set(&mut style, name, value);
        }
    }
    if let Some(image) = effects.background_image_css() {
        set(&mut style, "background-image", &image);
        set(&mut style, "background-size", "cover");
        set(&mut style, "background-position", "center");
    }
    let continuous = effects.continuous_animations();
    if !continuous.is_empty() {
        set(&mut style, "animation", &continuous.join(", "));
    }

    style
}

fn set(style: &mut Vec<(String, String)>, name: &str, value: &str) {
    match style.iter_mut().find(|(k, _)| k == name) {
        Some((_, v)) => *v = value.to_string(),
        None => style.push((name.to_string(), value.to_string())),
    }
}

fn field(label: &str, control: String) -> String {
    if label.is_empty() {
        return control;
    }
    format!(
        "<div class=\"kiln-field\"><label>{}</label>{}</div>",
        escape_html(label),
        control
    )
}

/// Items of a comma-separated property value, blanks dropped.
pub fn list_items(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::PropValue;
    use crate::registry::{Animation, ComponentRegistry, HoverEffect};
    use crate::store::ComponentStore;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn selected(type_id: &str) -> SelectedComponent {
        let mut store = ComponentStore::new(Arc::new(ComponentRegistry::builtin()));
        store.select(type_id).clone()
    }

    #[test]
    fn renders_button_label_and_style() {
        let preview = render_preview(&selected("button"));

        assert!(preview.markup.starts_with("<button class=\"kiln-preview button-component\""));
        assert!(preview.markup.contains(">Click Me</button>"));
        assert!(preview.markup.contains("background-color: #3b82f6;"));
    }

    #[test]
    fn is_idempotent() {
        let mut card = selected("card");
        card.animations.push(Animation::Fade);
        card.hover_effects.push(HoverEffect::Lift);

        assert_eq!(render_preview(&card), render_preview(&card));
    }

    #[test]
    fn appends_effect_classes_in_order() {
        let mut card = selected("card");
        card.animations.push(Animation::Slide);
        card.hover_effects.push(HoverEffect::Glow);
        card.hover_effects.push(HoverEffect::Lift);

        assert_eq!(
            render_preview(&card).class_names,
            vec![
                "kiln-preview",
                "card-component",
                "animate-slide-in-left",
                "hover-glow",
                "hover-lift"
            ]
        );
    }

    #[test]
    fn card_maps_title_and_description() {
        let mut card = selected("card");
        card.set_property("title", &PropValue::Text("Hello <World>".into()));

        let markup = render_preview(&card).markup;
        assert!(markup.contains("<h3>Hello &lt;World&gt;</h3>"));
        assert!(markup.contains("<p>This is a sample card description"));
    }

    #[test]
    fn unknown_type_renders_generic_box() {
        let fallback = SelectedComponent::fallback("doesnotexist", 0);

        let markup = render_preview(&fallback).markup;
        assert!(markup.starts_with("<div class=\"kiln-preview doesnotexist-component\""));
        assert!(markup.ends_with(">doesnotexist Component</div>"));
    }

    #[test]
    fn preset_overrides_style_declarations() {
        let mut button = selected("button");
        button.set_property("effect", &PropValue::Text("glow".into()));
        button.set_property("float", &PropValue::Bool(true));

        let style = render_preview(&button).inline_style;
        let get = |name: &str| {
            style
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(get("border"), Some("1px solid rgba(59, 130, 246, 0.3)"));
        assert_eq!(get("animation"), Some("float 3s infinite ease-in-out"));
    }

    #[test]
    fn background_image_is_covered_and_centered() {
        let mut card = selected("card");
        card.set_property("backgroundImage", &PropValue::Text("/bg.png".into()));

        let preview = render_preview(&card);
        assert!(preview
            .style_attribute()
            .contains("background-image: url(\"/bg.png\"); background-size: cover; background-position: center;"));
    }

    #[test]
    fn background_image_cannot_add_declarations() {
        let mut card = selected("card");
        card.set_property("backgroundImage", &PropValue::Text("x.png\"); color: red".into()));

        let style = render_preview(&card).style_attribute();
        assert!(style.contains("background-image: url(\"x.png%22); color: red\");"));
        assert!(!style.contains("; color: red;"));
    }

    #[test]
    fn fallback_class_is_sanitized() {
        let widget = SelectedComponent::fallback("My Widget", 0);
        let markup = render_preview(&widget).markup;

        assert!(markup.contains("class=\"kiln-preview my-widget-component\""));
    }

    #[test]
    fn select_lists_options() {
        let markup = render_preview(&selected("select")).markup;

        assert!(markup.contains("<option value=\"Option 2\">Option 2</option>"));
    }

    #[test]
    fn progress_label_shows_unclamped_value() {
        let mut progress = selected("progress");
        progress.set_property("value", &PropValue::Number(120.0));

        let markup = render_preview(&progress).markup;
        assert!(markup.contains("width: 100%;"));
        assert!(markup.contains(">120%</span>"));
    }
}
