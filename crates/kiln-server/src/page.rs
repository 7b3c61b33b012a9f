//! Builder page rendering.

use minijinja::{context, Environment};
use serde::Serialize;

use kiln_core::{render_preview, Category, ComponentStore, PropValue, PropertyKind};
use kiln_export::{to_css, ExportFormat};

use crate::server::ServerError;

#[derive(Debug, Serialize)]
struct CategoryView {
    label: &'static str,
    components: Vec<EntryView>,
}

#[derive(Debug, Serialize)]
struct EntryView {
    id: &'static str,
    name: &'static str,
    description: &'static str,
}

#[derive(Debug, Serialize)]
struct ToggleView {
    id: &'static str,
    name: &'static str,
    active: bool,
}

#[derive(Debug, Serialize)]
struct PropertyView {
    key: &'static str,
    kind: &'static str,
    value: String,
    options: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
struct SelectedView {
    id: String,
    name: String,
    markup: String,
    css: String,
    properties: Vec<PropertyView>,
    animations: Vec<ToggleView>,
    hover_effects: Vec<ToggleView>,
}

#[derive(Debug, Serialize)]
struct SavedView {
    id: String,
    name: String,
    type_id: String,
}

/// Render the builder page for the current store state.
pub fn render_page(store: &ComponentStore) -> Result<String, ServerError> {
    let registry = store.registry();

    let categories: Vec<CategoryView> = registry
        .categories()
        .into_iter()
        .map(|category: Category| CategoryView {
            label: category.label(),
            components: registry
                .by_category(category)
                .into_iter()
                .map(|d| EntryView {
                    id: d.id,
                    name: d.name,
                    description: d.description,
                })
                .collect(),
        })
        .collect();

    let selected = store.selected().map(|c| {
        let descriptor = store.selected_descriptor();
        let values = c.property_map();
        SelectedView {
            id: c.id.clone(),
            name: c.name.clone(),
            markup: render_preview(c).markup,
            css: to_css(c),
            properties: descriptor
                .map(|d| {
                    d.properties
                        .iter()
                        .map(|p| PropertyView {
                            key: p.key,
                            kind: kind_id(p.kind),
                            value: values
                                .get(p.key)
                                .map(PropValue::as_text)
                                .unwrap_or_default(),
                            options: p.options.clone(),
                        })
                        .collect()
                })
                .unwrap_or_default(),
            animations: descriptor
                .map(|d| {
                    d.animation_descriptors()
                        .into_iter()
                        .zip(&d.animations)
                        .map(|(e, a)| ToggleView {
                            id: e.id,
                            name: e.name,
                            active: c.animations.contains(a),
                        })
                        .collect()
                })
                .unwrap_or_default(),
            hover_effects: descriptor
                .map(|d| {
                    d.hover_effect_descriptors()
                        .into_iter()
                        .zip(&d.hover_effects)
                        .map(|(e, h)| ToggleView {
                            id: e.id,
                            name: e.name,
                            active: c.hover_effects.contains(h),
                        })
                        .collect()
                })
                .unwrap_or_default(),
        }
    });

    let saved: Vec<SavedView> = store
        .saved()
        .iter()
        .map(|c| SavedView {
            id: c.id.clone(),
            name: c.name.clone(),
            type_id: c.type_id.clone(),
        })
        .collect();

    let formats: Vec<&'static str> = ExportFormat::ALL.iter().map(|f| f.id()).collect();

    let mut env = Environment::new();
    env.add_template("builder.html", PAGE_TEMPLATE)
        .map_err(|e| ServerError::TemplateError(e.to_string()))?;
    env.get_template("builder.html")
        .and_then(|t| {
            t.render(context! {
                categories => categories,
                selected => selected,
                saved => saved,
                formats => formats,
                warnings => store.warnings(),
            })
        })
        .map_err(|e| ServerError::TemplateError(e.to_string()))
}

fn kind_id(kind: PropertyKind) -> &'static str {
    match kind {
        PropertyKind::Text => "text",
        PropertyKind::Number => "number",
        PropertyKind::Boolean => "boolean",
        PropertyKind::Select => "select",
    }
}

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>kiln</title>
  <style>
    body { font-family: system-ui, sans-serif; margin: 0; display: grid; grid-template-columns: 240px 1fr 280px; min-height: 100vh; }
    aside, main { padding: 1rem; }
    aside { background: #f9fafb; }
    #kiln-stage { display: flex; align-items: center; justify-content: center; min-height: 240px; border: 1px dashed #d1d5db; border-radius: 8px; }
    pre { background: #f5f5f5; padding: 1rem; border-radius: 0.5rem; overflow-x: auto; }
    button.active { font-weight: bold; }
  </style>
  <style id="kiln-css">{% if selected %}{{ selected.css|safe }}{% endif %}</style>
</head>
<body>
  <aside>
    {% for category in categories %}
    <h3>{{ category.label }}</h3>
    <ul>
      {% for c in category.components %}
      <li><button title="{{ c.description }}" onclick="kiln.post('/api/select', { type: '{{ c.id }}' })">{{ c.name }}</button></li>
      {% endfor %}
    </ul>
    {% endfor %}
  </aside>
  <main>
    <h2 id="kiln-selected">{% if selected %}{{ selected.name }}{% endif %}</h2>
    <div id="kiln-stage">
      {% if selected %}{{ selected.markup|safe }}{% else %}<p class="kiln-empty">Select a component to begin</p>{% endif %}
    </div>
    <ul id="kiln-warnings">
      {% for w in warnings %}<li>{{ w.key }}: {{ w.message }}</li>{% endfor %}
    </ul>
    {% if selected %}
    <p>
      {% for f in formats %}<a href="/api/export/{{ f }}">{{ f }}</a> {% endfor %}
      <button onclick="kiln.post('/api/save')">Save</button>
      <button onclick="kiln.post('/api/reset')">Reset</button>
    </p>
    {% endif %}
  </main>
  <aside>
    {% if selected %}
    <h3>Properties</h3>
    {% for p in selected.properties %}
    <label>{{ p.key }}
      {% if p.kind == "select" %}
      <select onchange="kiln.post('/api/property', { key: '{{ p.key }}', value: this.value })">
        {% for o in p.options %}<option{% if o == p.value %} selected{% endif %}>{{ o }}</option>{% endfor %}
      </select>
      {% elif p.kind == "boolean" %}
      <input type="checkbox"{% if p.value == "true" %} checked{% endif %} onchange="kiln.post('/api/property', { key: '{{ p.key }}', value: this.checked })">
      {% elif p.kind == "number" %}
      <input type="number" value="{{ p.value }}" onchange="kiln.post('/api/property', { key: '{{ p.key }}', value: Number(this.value) })">
      {% else %}
      <input value="{{ p.value }}" onchange="kiln.post('/api/property', { key: '{{ p.key }}', value: this.value })">
      {% endif %}
    </label><br>
    {% endfor %}
    <h3>Animations</h3>
    {% for a in selected.animations %}<button class="{% if a.active %}active{% endif %}" onclick="kiln.post('/api/animations/{{ a.id }}').then(() => this.classList.toggle('active'))">{{ a.name }}</button> {% endfor %}
    <h3>Hover effects</h3>
    {% for h in selected.hover_effects %}<button class="{% if h.active %}active{% endif %}" onclick="kiln.post('/api/hover-effects/{{ h.id }}').then(() => this.classList.toggle('active'))">{{ h.name }}</button> {% endfor %}
    {% endif %}
    <h3>Saved</h3>
    <ul>
      {% for s in saved %}
      <li>{{ s.name }} <small>{{ s.type_id }}</small> <button onclick="kiln.remove('/api/saved/{{ s.id }}')">Remove</button></li>
      {% endfor %}
    </ul>
    {% if saved %}<button onclick="kiln.remove('/api/saved')">Clear all</button>{% endif %}
  </aside>
  <script src="/__preview.js"></script>
</body>
</html>
"#;
