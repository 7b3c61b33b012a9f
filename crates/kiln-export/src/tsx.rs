//! React component source export.

use kiln_core::{ComponentProps, SelectedComponent};

use crate::css::class_name;

/// PascalCase identifier for the exported component.
///
/// Whitespace and non-alphanumeric characters are dropped; an empty result
/// or one starting with a digit falls back to `CustomComponent`.
pub fn component_name(component: &SelectedComponent) -> String {
    let name: String = component
        .name
        .split_whitespace()
        .map(|word| {
            let word: String = word.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
            let mut chars = word.chars();
            match chars.next() {
                Some(c) => c.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect();

    match name.chars().next() {
        Some(c) if c.is_ascii_alphabetic() => name,
        _ => "CustomComponent".to_string(),
    }
}

/// Generate a self-contained typed React component.
pub fn to_source_component(component: &SelectedComponent) -> String {
    let name = component_name(component);
    let class = class_name(component);
    let style = style_object(component);
    let shape = shape(component, &class);

    let fields: String = shape
        .props
        .iter()
        .map(|(field, ty, _)| format!("  {}?: {}\n", field, ty))
        .collect();
    let params: Vec<String> = shape
        .props
        .iter()
        .map(|(field, _, default)| match default {
            Some(d) => format!("  {} = {}", field, d),
            None => format!("  {}", field),
        })
        .collect();

    format!(
        r#"import React{imports} from 'react'

const style: React.CSSProperties = {style}

interface {name}Props {{
{fields}}}

const {name}: React.FC<{name}Props> = ({{
{params}
}}) => {{
{body}
}}

export default {name}
"#,
        imports = shape.imports,
        style = style,
        name = name,
        fields = fields,
        params = params.join(",\n"),
        body = shape.body,
    )
}

/// Props interface, defaults, and render body for one kind.
struct Shape {
    imports: &'static str,
    /// (field, TypeScript type, default expression)
    props: Vec<(&'static str, &'static str, Option<String>)>,
    body: String,
}

fn shape(component: &SelectedComponent, class: &str) -> Shape {
    let lit = |value: &str, fallback: &str| {
        js_string(if value.trim().is_empty() { fallback } else { value })
    };
    let children = ("children", "React.ReactNode", None);

    match &component.props {
        ComponentProps::Button { text, disabled } => Shape {
            imports: "",
            props: vec![
                ("onClick", "() => void", None),
                ("children", "React.ReactNode", Some(lit(text, "Sample Button"))),
                ("disabled", "boolean", Some(disabled.to_string())),
            ],
            body: format!(
                r#"  return (
    <button style={{style}} onClick={{onClick}} disabled={{disabled}} className="{class}">
      {{children}}
    </button>
  )"#
            ),
        },
        ComponentProps::Badge { text } => Shape {
            imports: "",
            props: vec![("children", "React.ReactNode", Some(lit(text, "Badge")))],
            body: format!(
                "  return <span style={{style}} className=\"{class}\">{{children}}</span>"
            ),
        },
        ComponentProps::Avatar { initials } => Shape {
            imports: "",
            props: vec![("initials", "string", Some(lit(initials, "JD")))],
            body: format!(
                "  return <div style={{style}} className=\"{class}\">{{initials}}</div>"
            ),
        },
        ComponentProps::Input {
            input_type,
            placeholder,
            label,
        } => Shape {
            imports: ", { useState }",
            props: vec![
                ("type", "string", Some(lit(input_type, "text"))),
                ("placeholder", "string", Some(lit(placeholder, "Enter text..."))),
                ("value", "string", None),
                ("onChange", "(value: string) => void", None),
                ("label", "string", Some(js_string(label))),
            ],
            body: controlled(
                "HTMLInputElement",
                &format!(
                    "<input type={{type}} placeholder={{placeholder}} value={{current}} onChange={{handleChange}} style={{style}} className=\"{class}\" />"
                ),
            ),
        },
        ComponentProps::Textarea {
            placeholder,
            rows,
            label,
        } => Shape {
            imports: ", { useState }",
            props: vec![
                ("placeholder", "string", Some(lit(placeholder, "Enter your message..."))),
                ("rows", "number", Some(rows.max(1.0).round().to_string())),
                ("value", "string", None),
                ("onChange", "(value: string) => void", None),
                ("label", "string", Some(js_string(label))),
            ],
            body: controlled(
                "HTMLTextAreaElement",
                &format!(
                    "<textarea rows={{rows}} placeholder={{placeholder}} value={{current}} onChange={{handleChange}} style={{style}} className=\"{class}\" />"
                ),
            ),
        },
        ComponentProps::Select {
            placeholder,
            options,
            label,
        } => {
            let items: Vec<String> = kiln_core::list_items(options).map(js_string).collect();
            Shape {
                imports: ", { useState }",
                props: vec![
                    ("placeholder", "string", Some(lit(placeholder, "Choose an option"))),
                    ("options", "string[]", Some(format!("[{}]", items.join(", ")))),
                    ("value", "string", None),
                    ("onChange", "(value: string) => void", None),
                    ("label", "string", Some(js_string(label))),
                ],
                body: controlled(
                    "HTMLSelectElement",
                    &format!(
                        r#"<select value={{current}} onChange={{handleChange}} style={{style}} className="{class}">
        <option value="" disabled>{{placeholder}}</option>
        {{options.map((option) => (
          <option key={{option}} value={{option}}>{{option}}</option>
        ))}}
      </select>"#
                    ),
                ),
            }
        }
        ComponentProps::Card {
            title,
            description,
            image,
        } => Shape {
            imports: "",
            props: vec![
                ("title", "string", Some(lit(title, "Sample Card"))),
                (
                    "description",
                    "string",
                    Some(lit(
                        description,
                        "This is a sample card component with customizable styling.",
                    )),
                ),
                ("image", "string", Some(js_string(image))),
                children,
            ],
            body: format!(
                r#"  return (
    <div style={{style}} className="{class}">
      {{children || (
        <>
          {{image && <img src={{image}} alt="" style={{{{ width: '100%', borderRadius: 'inherit' }}}} />}}
          <h3 style={{{{ margin: '0 0 12px 0', fontSize: '18px', fontWeight: '600' }}}}>{{title}}</h3>
          <p style={{{{ margin: '0', opacity: 0.8, lineHeight: 1.5 }}}}>{{description}}</p>
        </>
      )}}
    </div>
  )"#
            ),
        },
        ComponentProps::Modal {
            title,
            description,
            confirm_label,
            cancel_label,
        } => Shape {
            imports: "",
            props: vec![
                ("title", "string", Some(lit(title, "Sample Modal"))),
                (
                    "description",
                    "string",
                    Some(lit(description, "This is a sample modal component.")),
                ),
                ("confirmLabel", "string", Some(lit(confirm_label, "Confirm"))),
                ("cancelLabel", "string", Some(lit(cancel_label, "Cancel"))),
                ("onConfirm", "() => void", None),
                ("onCancel", "() => void", None),
            ],
            body: format!(
                r#"  return (
    <div className="modal-backdrop">
      <div style={{style}} className="{class}" role="dialog" aria-modal="true">
        <h3>{{title}}</h3>
        <p>{{description}}</p>
        <div className="modal-actions">
          <button className="confirm-btn" onClick={{onConfirm}}>{{confirmLabel}}</button>
          <button className="cancel-btn" onClick={{onCancel}}>{{cancelLabel}}</button>
        </div>
      </div>
    </div>
  )"#
            ),
        },
        ComponentProps::Navbar { brand, links } => {
            let items: Vec<String> = kiln_core::list_items(links).map(js_string).collect();
            Shape {
                imports: "",
                props: vec![
                    ("brand", "string", Some(lit(brand, "Brand"))),
                    ("links", "string[]", Some(format!("[{}]", items.join(", ")))),
                ],
                body: format!(
                    r##"  return (
    <nav style={{style}} className="{class}">
      <span className="navbar-brand">{{brand}}</span>
      <ul>
        {{links.map((link) => (
          <li key={{link}}><a href="#">{{link}}</a></li>
        ))}}
      </ul>
    </nav>
  )"##
                ),
            }
        }
        ComponentProps::Alert { message, variant } => Shape {
            imports: "",
            props: vec![
                ("message", "string", Some(lit(message, "Alert message"))),
                (
                    "variant",
                    "'info' | 'success' | 'warning' | 'error'",
                    Some(lit(variant, "warning")),
                ),
            ],
            body: format!(
                r#"  return (
    <div style={{style}} className="{class}" role="alert" data-variant={{variant}}>
      <span>{{message}}</span>
    </div>
  )"#
            ),
        },
        ComponentProps::Progress { value, show_label } => Shape {
            imports: "",
            props: vec![
                ("value", "number", Some(value.to_string())),
                ("showLabel", "boolean", Some(show_label.to_string())),
            ],
            body: format!(
                r#"  const fill = Math.min(100, Math.max(0, value))
  return (
    <div style={{style}} className="{class}" role="progressbar" aria-valuenow={{value}} aria-valuemin={{0}} aria-valuemax={{100}}>
      <div className="progress-fill" style={{{{ width: `${{fill}}%` }}}} />
      {{showLabel && <span className="progress-label">{{value}}%</span>}}
    </div>
  )"#
            ),
        },
        ComponentProps::Table { striped, rows } => Shape {
            imports: "",
            props: vec![
                ("striped", "boolean", Some(striped.to_string())),
                ("rows", "number", Some(rows.clamp(0.0, 100.0).round().to_string())),
            ],
            body: format!(
                r#"  return (
    <table style={{style}} className={{striped ? '{class} striped' : '{class}'}}>
      <thead>
        <tr><th>Name</th><th>Status</th><th>Role</th></tr>
      </thead>
      <tbody>
        {{Array.from({{ length: rows }}, (_, i) => (
          <tr key={{i}}><td>Row {{i + 1}}</td><td>Active</td><td>Member</td></tr>
        ))}}
      </tbody>
    </table>
  )"#
            ),
        },
        ComponentProps::Generic { .. } => Shape {
            imports: "",
            props: vec![children],
            body: format!(
                "  return <div style={{style}} className=\"{class}\">{{children || {}}}</div>",
                lit(&component.name, "Component")
            ),
        },
    }
}

/// Body for a form control with optional controlled value and a label.
fn controlled(element: &str, control: &str) -> String {
    format!(
        r#"  const [internal, setInternal] = useState('')
  const current = value !== undefined ? value : internal

  const handleChange = (e: React.ChangeEvent<{element}>) => {{
    if (onChange) {{
      onChange(e.target.value)
    }} else {{
      setInternal(e.target.value)
    }}
  }}

  return (
    <div>
      {{label && (
        <label style={{{{ display: 'block', marginBottom: '8px', fontWeight: '500' }}}}>{{label}}</label>
      )}}
      {control}
    </div>
  )"#
    )
}

/// Style object literal with camelCase keys and the same fallbacks as the
/// CSS export.
fn style_object(component: &SelectedComponent) -> String {
    let s = &component.style;
    let or = |value: &Option<String>, fallback: &str| {
        js_string(value.as_deref().unwrap_or(fallback))
    };

    let mut entries = vec![
        ("backgroundColor", or(&s.background_color, "#ffffff")),
        ("color", or(&s.color, "#374151")),
        ("padding", or(&s.padding, "12px")),
        ("borderRadius", or(&s.border_radius, "8px")),
        ("margin", or(&s.margin, "8px")),
        ("fontSize", or(&s.font_size, "14px")),
        ("fontWeight", or(&s.font_weight, "400")),
        ("fontFamily", or(&s.font_family, "Inter, system-ui, sans-serif")),
        ("border", or(&s.border, "none")),
        ("transition", or(&s.transition, "all 0.2s ease")),
        ("boxShadow", or(&s.box_shadow, "none")),
        ("cursor", js_string("pointer")),
        ("width", or(&s.width, "auto")),
        ("height", or(&s.height, "auto")),
        ("display", or(&s.display, "inline-block")),
        ("opacity", s.opacity.unwrap_or(1.0).to_string()),
    ];
    for (key, value) in [
        ("background", &s.background),
        ("textAlign", &s.text_align),
        ("letterSpacing", &s.letter_spacing),
        ("lineHeight", &s.line_height),
    ] {
        if let Some(v) = value {
            entries.push((key, js_string(v)));
        }
    }

    let body: Vec<String> = entries
        .into_iter()
        .map(|(k, v)| format!("  {}: {},", k, v))
        .collect();
    format!("{{\n{}\n}}", body.join("\n"))
}

/// Single-quoted TypeScript string literal.
fn js_string(s: &str) -> String {
    let escaped = s
        .replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', "\\n");
    format!("'{}'", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_core::{ComponentRegistry, ComponentStore, PropValue};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn selected(type_id: &str) -> SelectedComponent {
        let mut store = ComponentStore::new(Arc::new(ComponentRegistry::builtin()));
        store.select(type_id).clone()
    }

    #[test]
    fn names_components() {
        let mut c = selected("button");
        assert_eq!(component_name(&c), "Button");

        c.name = "primary call-to-action".into();
        assert_eq!(component_name(&c), "PrimaryCalltoaction");

        c.name = "!!!".into();
        assert_eq!(component_name(&c), "CustomComponent");

        c.name = "3d box".into();
        assert_eq!(component_name(&c), "CustomComponent");
    }

    #[test]
    fn escapes_literals() {
        assert_eq!(js_string("it's"), "'it\\'s'");
        assert_eq!(js_string("a\nb"), "'a\\nb'");
    }

    #[test]
    fn button_has_typed_props_and_default_export() {
        let source = to_source_component(&selected("button"));

        assert!(source.starts_with("import React from 'react'\n"));
        assert!(source.contains("interface ButtonProps {\n  onClick?: () => void\n"));
        assert!(source.contains("  children = 'Click Me',"));
        assert!(source.contains("  backgroundColor: '#3b82f6',"));
        assert!(source.trim_end().ends_with("export default Button"));
    }

    #[test]
    fn input_is_controlled() {
        let source = to_source_component(&selected("input"));

        assert!(source.starts_with("import React, { useState } from 'react'"));
        assert!(source.contains("React.ChangeEvent<HTMLInputElement>"));
        assert!(source.contains("  type = 'text',"));
    }

    #[test]
    fn select_options_become_array() {
        let source = to_source_component(&selected("select"));

        assert!(source.contains("  options = ['Option 1', 'Option 2', 'Option 3'],"));
    }

    #[test]
    fn property_text_is_escaped() {
        let mut card = selected("card");
        card.set_property("title", &PropValue::Text("Bob's card".into()));

        assert!(to_source_component(&card).contains("  title = 'Bob\\'s card',"));
    }

    #[test]
    fn unknown_type_uses_name_as_children() {
        let source = to_source_component(&SelectedComponent::fallback("widget", 0));

        assert!(source.contains("const Widget: React.FC<WidgetProps>"));
        assert!(source.contains("{children || 'widget'}"));
    }

    #[test]
    fn is_pure() {
        let card = selected("card");
        assert_eq!(to_source_component(&card), to_source_component(&card));
    }
}
