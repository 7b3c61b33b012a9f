//! HTML fragment export.

use kiln_core::{escape_html, list_items, ComponentProps, SelectedComponent};

use crate::css::class_name;

const ALERT_ICON: &str = r#"<svg class="alert-icon" fill="currentColor" viewBox="0 0 20 20">
    <path fill-rule="evenodd" d="M8.257 3.099c.765-1.36 2.722-1.36 3.486 0l5.58 9.92c.75 1.334-.213 2.98-1.742 2.98H4.42c-1.53 0-2.493-1.646-1.743-2.98l5.58-9.92zM11 13a1 1 0 11-2 0 1 1 0 012 0zm-1-8a1 1 0 00-1 1v3a1 1 0 002 0V6a1 1 0 00-1-1z" clip-rule="evenodd" />
  </svg>"#;

/// Generate a markup fragment for a component.
///
/// Empty text properties are replaced by generic placeholders.
pub fn to_html(component: &SelectedComponent) -> String {
    let class = class_name(component);
    let text = |value: &str, fallback: &str| -> String {
        if value.trim().is_empty() {
            escape_html(fallback)
        } else {
            escape_html(value)
        }
    };

    match &component.props {
        ComponentProps::Button { text: label, disabled } => format!(
            "<button class=\"{}\"{}>{}</button>",
            class,
            if *disabled { " disabled" } else { "" },
            text(label, "Sample Button")
        ),
        ComponentProps::Badge { text: label } => {
            format!("<span class=\"{}\">{}</span>", class, text(label, "Badge"))
        }
        ComponentProps::Avatar { initials } => {
            format!("<div class=\"{}\">{}</div>", class, text(initials, "JD"))
        }
        ComponentProps::Input {
            input_type,
            placeholder,
            label,
        } => {
            let control = |id: &str| {
                format!(
                    "<input type=\"{}\"{} class=\"{}\" placeholder=\"{}\" />",
                    text(input_type, "text"),
                    id,
                    class,
                    text(placeholder, "Enter text here...")
                )
            };
            labelled(component, label, control)
        }
        ComponentProps::Textarea {
            placeholder,
            rows,
            label,
        } => {
            let rows = rows.max(1.0).round();
            let control = |id: &str| {
                format!(
                    "<textarea{} class=\"{}\" rows=\"{}\" placeholder=\"{}\"></textarea>",
                    id,
                    class,
                    rows,
                    text(placeholder, "Enter your message...")
                )
            };
            labelled(component, label, control)
        }
        ComponentProps::Select {
            placeholder,
            options,
            label,
        } => {
            let mut items = vec![format!(
                "  <option value=\"\" disabled selected>{}</option>",
                text(placeholder, "Choose an option")
            )];
            items.extend(list_items(options).map(|o| {
                let o = escape_html(o);
                format!("  <option value=\"{0}\">{0}</option>", o)
            }));
            let items = items.join("\n");
            let control =
                |id: &str| format!("<select{} class=\"{}\">\n{}\n</select>", id, class, items);
            labelled(component, label, control)
        }
        ComponentProps::Card {
            title,
            description,
            image,
        } => {
            let image = if image.trim().is_empty() {
                String::new()
            } else {
                format!("  <img src=\"{}\" alt=\"\" />\n", escape_html(image))
            };
            format!(
                "<div class=\"{}\">\n{}  <h3>{}</h3>\n  <p>{}</p>\n</div>",
                class,
                image,
                text(title, "Sample Card"),
                text(
                    description,
                    "This is a sample card component with customizable styling."
                )
            )
        }
        ComponentProps::Modal {
            title,
            description,
            confirm_label,
            cancel_label,
        } => format!(
            r#"<div class="modal-backdrop">
  <div class="{}" role="dialog" aria-modal="true">
    <button class="modal-close" aria-label="Close modal">×</button>
    <h3>{}</h3>
    <p>{}</p>
    <div class="modal-actions">
      <button class="confirm-btn">{}</button>
      <button class="cancel-btn">{}</button>
    </div>
  </div>
</div>"#,
            class,
            text(title, "Sample Modal"),
            text(description, "This is a sample modal component."),
            text(confirm_label, "Confirm"),
            text(cancel_label, "Cancel")
        ),
        ComponentProps::Navbar { brand, links } => {
            let items: Vec<String> = list_items(links)
                .map(|l| format!("    <li><a href=\"#\">{}</a></li>", escape_html(l)))
                .collect();
            format!(
                "<nav class=\"{}\">\n  <span class=\"navbar-brand\">{}</span>\n  <ul>\n{}\n  </ul>\n</nav>",
                class,
                text(brand, "Brand"),
                items.join("\n")
            )
        }
        ComponentProps::Alert { message, variant } => format!(
            "<div class=\"{}\" role=\"alert\" data-variant=\"{}\">\n  {}\n  <span>{}</span>\n</div>",
            class,
            text(variant, "warning"),
            ALERT_ICON,
            text(message, "Alert message")
        ),
        ComponentProps::Progress { value, show_label } => {
            let label = if *show_label {
                format!("\n  <span class=\"progress-label\">{}%</span>", value)
            } else {
                String::new()
            };
            format!(
                "<div class=\"{}\" role=\"progressbar\" aria-valuenow=\"{}\" aria-valuemin=\"0\" aria-valuemax=\"100\">\n  <div class=\"progress-fill\" style=\"width: {}%\"></div>{}\n</div>",
                class,
                value,
                value.clamp(0.0, 100.0),
                label
            )
        }
        ComponentProps::Table { striped, rows } => {
            let count = rows.clamp(0.0, 100.0) as usize;
            let body: Vec<String> = (1..=count)
                .map(|i| {
                    format!(
                        "    <tr><td>Row {}</td><td>Active</td><td>Member</td></tr>",
                        i
                    )
                })
                .collect();
            format!(
                "<table class=\"{}{}\">\n  <thead>\n    <tr><th>Name</th><th>Status</th><th>Role</th></tr>\n  </thead>\n  <tbody>\n{}\n  </tbody>\n</table>",
                class,
                if *striped { " striped" } else { "" },
                body.join("\n")
            )
        }
        ComponentProps::Generic { .. } => format!(
            "<div class=\"{}\">{}</div>",
            class,
            text(&component.name, "Component")
        ),
    }
}

/// Wrap a form control with a `<label>` when one is set.
fn labelled(component: &SelectedComponent, label: &str, control: impl Fn(&str) -> String) -> String {
    if label.trim().is_empty() {
        return control("");
    }
    let id = format!("{}-{}", component.type_id, component.id);
    format!(
        "<label for=\"{}\">{}</label>\n{}",
        escape_html(&id),
        escape_html(label),
        control(&format!(" id=\"{}\"", escape_html(&id)))
    )
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
    fn button_uses_text_property() {
        assert_eq!(
            to_html(&selected("button")),
            "<button class=\"button-component\">Click Me</button>"
        );
    }

    #[test]
    fn empty_text_falls_back_to_placeholder() {
        let mut button = selected("button");
        button.set_property("text", &PropValue::Text(String::new()));

        assert_eq!(
            to_html(&button),
            "<button class=\"button-component\">Sample Button</button>"
        );
    }

    #[test]
    fn labelled_input_links_label() {
        let mut input = selected("input");
        input.id = "input_1".into();
        input.set_property("label", &PropValue::Text("Email".into()));
        input.set_property("type", &PropValue::Text("email".into()));

        assert_eq!(
            to_html(&input),
            "<label for=\"input-input_1\">Email</label>\n<input type=\"email\" id=\"input-input_1\" class=\"input-component\" placeholder=\"Enter text...\" />"
        );
    }

    #[test]
    fn unlabelled_input_has_no_id() {
        let html = to_html(&selected("input"));

        assert!(!html.contains("id="));
        assert!(html.starts_with("<input type=\"text\""));
    }

    #[test]
    fn card_has_heading_and_body() {
        let html = to_html(&selected("card"));

        assert!(html.starts_with("<div class=\"card-component\">"));
        assert!(html.contains("  <h3>Card Title</h3>"));
    }

    #[test]
    fn escapes_user_text() {
        let mut badge = selected("badge");
        badge.set_property("text", &PropValue::Text("<b>&</b>".into()));

        assert!(to_html(&badge).contains("&lt;b&gt;&amp;&lt;/b&gt;"));
    }

    #[test]
    fn unknown_type_is_plain_div() {
        let fallback = SelectedComponent::fallback("doesnotexist", 0);

        assert_eq!(
            to_html(&fallback),
            "<div class=\"doesnotexist-component\">doesnotexist</div>"
        );
    }

    #[test]
    fn every_kind_renders_its_class() {
        let registry = ComponentRegistry::builtin();
        for descriptor in registry.iter() {
            let html = to_html(&selected(descriptor.id));
            assert!(
                html.contains(&format!("class=\"{}-component", descriptor.id)),
                "{}",
                descriptor.id
            );
        }
    }

    #[test]
    fn is_pure() {
        let modal = selected("modal");
        assert_eq!(to_html(&modal), to_html(&modal));
    }
}
