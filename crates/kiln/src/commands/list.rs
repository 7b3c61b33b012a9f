//! List registered components.

use anyhow::Result;

use kiln_core::{Category, ComponentDescriptor, ComponentRegistry};

/// Run the list command.
pub fn run(category: Option<&str>, json: bool) -> Result<()> {
    let registry = ComponentRegistry::builtin();
    let descriptors = select(&registry, category)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&descriptors)?);
        return Ok(());
    }

    print!("{}", format_table(&descriptors));
    Ok(())
}

/// Descriptors to show, optionally limited to one category.
fn select<'a>(
    registry: &'a ComponentRegistry,
    category: Option<&str>,
) -> Result<Vec<&'a ComponentDescriptor>> {
    match category {
        Some(label) => {
            let category = Category::from_label(label)
                .ok_or_else(|| anyhow::anyhow!("Unknown category: {}", label))?;
            Ok(registry.by_category(category))
        }
        None => Ok(registry.iter().collect()),
    }
}

/// One line per component, grouped under category headings.
fn format_table(descriptors: &[&ComponentDescriptor]) -> String {
    let mut out = String::new();
    let mut current: Option<Category> = None;

    for d in descriptors {
        if current != Some(d.category) {
            if current.is_some() {
                out.push('\n');
            }
            out.push_str(d.category.label());
            out.push('\n');
            current = Some(d.category);
        }
        out.push_str(&format!("  {:<10} {}\n", d.id, d.description));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn filters_by_category() {
        let registry = ComponentRegistry::builtin();

        let feedback: Vec<&str> = select(&registry, Some("Feedback"))
            .unwrap()
            .iter()
            .map(|d| d.id)
            .collect();

        assert_eq!(feedback, vec!["alert", "progress"]);
        assert!(select(&registry, Some("charts")).is_err());
    }

    #[test]
    fn groups_under_headings() {
        let registry = ComponentRegistry::builtin();
        let all = select(&registry, None).unwrap();

        let table = format_table(&all);

        assert!(table.starts_with("Basic\n  button     "));
        assert_eq!(table.lines().filter(|l| !l.starts_with(' ') && !l.is_empty()).count(), 5);
        assert_eq!(table.lines().filter(|l| l.starts_with("  ")).count(), 12);
    }
}
