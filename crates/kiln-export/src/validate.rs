//! Pre-export validation.

use kiln_core::SelectedComponent;

/// Check that an instance can be exported.
///
/// Returns human-readable problems; an empty list means the instance is
/// valid.
pub fn validate_for_export(component: Option<&SelectedComponent>) -> Vec<String> {
    let Some(component) = component else {
        return vec!["No component provided".to_string()];
    };

    let mut errors = Vec::new();
    if component.type_id.trim().is_empty() {
        errors.push("Component type is required".to_string());
    }
    if component.name.trim().is_empty() {
        errors.push("Component name is required".to_string());
    }
    if component.style.is_empty() {
        errors.push("Component style is required".to_string());
    }
    errors
}
