//! CSS export.
//!
//! Emits one class rule for the component with a fallback for every core
//! declaration, so a sparse style still yields a complete rule. State rules,
//! the entry animation rule, and the keyframes they reference follow.

use kiln_core::{HoverEffect, SelectedComponent};

/// Class the exported rules and markup share, e.g. `button-component`.
pub fn class_name(component: &SelectedComponent) -> String {
    component.class_name()
}

/// Generate the stylesheet for a component.
pub fn to_css(component: &SelectedComponent) -> String {
    let selector = format!(".{}", class_name(component));
    let mut rules = vec![rule(&selector, &base_declarations(component))];
    let mut keyframes: Vec<&'static str> = Vec::new();

    let hover = hover_declarations(component, &mut keyframes);
    if !hover.is_empty() {
        rules.push(rule(&format!("{}:hover", selector), &hover));
    }

    if let Some(focus) = component.style.focus.as_ref().filter(|f| !f.is_empty()) {
        let declarations: Vec<(String, String)> = focus
            .css_properties()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        rules.push(rule(&format!("{}:focus", selector), &declarations));
    }

    let mut animations: Vec<String> = Vec::new();
    for animation in &component.animations {
        let (name, timing) = animation.keyframes();
        animations.push(format!("{} {}", name, timing));
        keyframes.push(name);
    }
    for continuous in component.effects.continuous_animations() {
        animations.push(continuous.to_string());
        if let Some(name) = continuous.split_whitespace().next() {
            keyframes.push(name);
        }
    }
    if !animations.is_empty() {
        rules.push(rule(
            &selector,
            &[("animation".to_string(), animations.join(", "))],
        ));
    }

    let mut seen = Vec::new();
    for name in keyframes {
        if seen.contains(&name) {
            continue;
        }
        seen.push(name);
        if let Some(body) = keyframes_body(name) {
            rules.push(format!("@keyframes {} {{\n{}\n}}", name, body));
        }
    }

    let mut css = rules.join("\n\n");
    css.push('\n');
    css
}

fn rule(selector: &str, declarations: &[(String, String)]) -> String {
    let body: Vec<String> = declarations
        .iter()
        .map(|(k, v)| format!("  {}: {};", k, v))
        .collect();
    format!("{} {{\n{}\n}}", selector, body.join("\n"))
}

fn base_declarations(component: &SelectedComponent) -> Vec<(String, String)> {
    let s = &component.style;
    let or = |value: &Option<String>, fallback: &str| {
        value.clone().unwrap_or_else(|| fallback.to_string())
    };

    let mut out: Vec<(String, String)> = vec![
        ("background-color", or(&s.background_color, "#ffffff")),
        ("color", or(&s.color, "#374151")),
        ("padding", or(&s.padding, "12px")),
        ("border-radius", or(&s.border_radius, "8px")),
        ("margin", or(&s.margin, "8px")),
        ("font-size", or(&s.font_size, "14px")),
        ("font-weight", or(&s.font_weight, "400")),
        ("font-family", or(&s.font_family, "Inter, system-ui, sans-serif")),
        ("border", or(&s.border, "none")),
        ("transition", or(&s.transition, "all 0.2s ease")),
        ("box-shadow", or(&s.box_shadow, "none")),
        ("cursor", "pointer".to_string()),
        ("width", or(&s.width, "auto")),
        ("height", or(&s.height, "auto")),
        ("display", or(&s.display, "inline-block")),
        (
            "opacity",
            s.opacity.map(|o| o.to_string()).unwrap_or_else(|| "1".into()),
        ),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();

    // Optional attributes only appear when set.
    for (name, value) in [
        ("background", &s.background),
        ("text-align", &s.text_align),
        ("letter-spacing", &s.letter_spacing),
        ("line-height", &s.line_height),
    ] {
        if let Some(v) = value {
            out.push((name.to_string(), v.clone()));
        }
    }

    let effects = &component.effects;
    if let Some(preset) = effects.preset {
        for (name, value) in preset.declarations() {
            set(&mut out, name, value);
        }
    }
    if let Some(image) = effects.background_image_css() {
        set(&mut out, "background-image", &image);
        set(&mut out, "background-size", "cover");
        set(&mut out, "background-position", "center");
    }

    out
}

fn hover_declarations(
    component: &SelectedComponent,
    keyframes: &mut Vec<&'static str>,
) -> Vec<(String, String)> {
    let mut transforms: Vec<&str> = Vec::new();
    let mut shadows: Vec<&str> = Vec::new();
    let mut animations: Vec<&str> = Vec::new();

    for effect in &component.hover_effects {
        match effect {
            HoverEffect::Lift => {
                transforms.push("translateY(-2px) scale(1.02)");
                shadows.push("0 8px 25px rgba(0, 0, 0, 0.15)");
            }
            HoverEffect::Scale => transforms.push("scale(1.05)"),
            HoverEffect::Rotate => transforms.push("rotate(3deg)"),
            HoverEffect::Glow => shadows.push("0 0 20px rgba(59, 130, 246, 0.5)"),
            HoverEffect::Shake => {
                animations.push("shake 0.5s ease-in-out");
                keyframes.push("shake");
            }
            HoverEffect::Bounce => {
                animations.push("hoverBounce 0.6s ease");
                keyframes.push("hoverBounce");
            }
        }
    }

    let mut out = Vec::new();
    if !transforms.is_empty() {
        out.push(("transform".to_string(), transforms.join(" ")));
    }
    if !shadows.is_empty() {
        out.push(("box-shadow".to_string(), shadows.join(", ")));
    }
    if !animations.is_empty() {
        out.push(("animation".to_string(), animations.join(", ")));
    }

    // Explicit hover overrides win over effect declarations.
    if let Some(state) = &component.style.hover {
        for (name, value) in state.css_properties() {
            set(&mut out, name, &value);
        }
    }
    out
}

fn set(out: &mut Vec<(String, String)>, name: &str, value: &str) {
    match out.iter_mut().find(|(k, _)| k == name) {
        Some((_, v)) => *v = value.to_string(),
        None => out.push((name.to_string(), value.to_string())),
    }
}

fn keyframes_body(name: &str) -> Option<&'static str> {
    let body = match name {
        "bounceIn" => {
            "  0% { opacity: 0; transform: scale(0.3); }\n  50% { opacity: 1; transform: scale(1.05); }\n  70% { transform: scale(0.9); }\n  100% { transform: scale(1); }"
        }
        "fadeInUp" => {
            "  from { opacity: 0; transform: translateY(20px); }\n  to { opacity: 1; transform: translateY(0); }"
        }
        "slideInLeft" => {
            "  from { opacity: 0; transform: translateX(-30px); }\n  to { opacity: 1; transform: translateX(0); }"
        }
        "scaleIn" => {
            "  from { opacity: 0; transform: scale(0.8); }\n  to { opacity: 1; transform: scale(1); }"
        }
        "rotateIn" => {
            "  from { opacity: 0; transform: rotate(-180deg); }\n  to { opacity: 1; transform: rotate(0); }"
        }
        "flipIn" => {
            "  from { opacity: 0; transform: perspective(400px) rotateY(90deg); }\n  to { opacity: 1; transform: perspective(400px) rotateY(0); }"
        }
        "pulse" => "  0%, 100% { opacity: 1; }\n  50% { opacity: 0.7; }",
        "float" => {
            "  0%, 100% { transform: translateY(0); }\n  50% { transform: translateY(-10px); }"
        }
        "glowPulse" => {
            "  0%, 100% { box-shadow: 0 0 5px rgba(59, 130, 246, 0.5); }\n  50% { box-shadow: 0 0 20px rgba(59, 130, 246, 0.8); }"
        }
        "shake" => {
            "  0%, 100% { transform: translateX(0); }\n  25% { transform: translateX(-4px); }\n  75% { transform: translateX(4px); }"
        }
        "hoverBounce" => {
            "  0%, 100% { transform: translateY(0); }\n  50% { transform: translateY(-6px); }"
        }
        _ => return None,
    };
    Some(body)
}
