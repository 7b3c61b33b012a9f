//! JSON API over the builder's component store.

use axum::extract::{Path, Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};

use kiln_core::{
    Category, ComponentDescriptor, ComponentStore, PropValue, PropertyWarning, SelectedComponent,
    StyleConfig,
};
use kiln_export::{validate_for_export, ExportError, ExportFormat};

use crate::server::SharedState;

/// Store state returned by every mutation.
#[derive(Debug, Serialize)]
pub struct Snapshot {
    /// Whether the request changed anything
    pub changed: bool,
    pub selected: Option<SelectedComponent>,
    pub saved: Vec<SelectedComponent>,
    pub warnings: Vec<PropertyWarning>,
}

impl Snapshot {
    fn of(store: &ComponentStore, changed: bool) -> Self {
        Self {
            changed,
            selected: store.selected().cloned(),
            saved: store.saved().to_vec(),
            warnings: store.warnings(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SelectBody {
    #[serde(rename = "type")]
    pub type_id: String,
}

#[derive(Debug, Deserialize)]
pub struct PropertyBody {
    pub key: String,
    pub value: PropValue,
}

/// `GET /api/components`: registered descriptors, optionally by category.
pub async fn list_components(
    State(state): State<SharedState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<ComponentDescriptor>>, StatusCode> {
    let state = state.read().await;
    let registry = state.store.registry();

    let descriptors = match query.category.as_deref() {
        Some(label) => {
            let category = Category::from_label(label).ok_or(StatusCode::BAD_REQUEST)?;
            registry.by_category(category).into_iter().cloned().collect()
        }
        None => registry.iter().cloned().collect(),
    };
    Ok(Json(descriptors))
}

/// `GET /api/components/{type_id}`: one descriptor.
pub async fn get_component(
    State(state): State<SharedState>,
    Path(type_id): Path<String>,
) -> Result<Json<ComponentDescriptor>, StatusCode> {
    let state = state.read().await;
    state
        .store
        .registry()
        .get(&type_id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// `GET /api/state`
pub async fn get_state(State(state): State<SharedState>) -> Json<Snapshot> {
    let state = state.read().await;
    Json(Snapshot::of(&state.store, false))
}

/// `POST /api/select`: `{"type": "<id>"}`.
pub async fn select(
    State(state): State<SharedState>,
    Json(body): Json<SelectBody>,
) -> Json<Snapshot> {
    let mut state = state.write().await;
    state.store.select(&body.type_id);
    Json(Snapshot::of(&state.store, true))
}

/// `POST /api/style`: partial style merged into the selection.
pub async fn update_style(
    State(state): State<SharedState>,
    Json(patch): Json<StyleConfig>,
) -> Json<Snapshot> {
    let mut state = state.write().await;
    let changed = state.store.update_style(patch);
    Json(Snapshot::of(&state.store, changed))
}

/// `POST /api/property`: `{"key": "...", "value": ...}`.
pub async fn update_property(
    State(state): State<SharedState>,
    Json(body): Json<PropertyBody>,
) -> Json<Snapshot> {
    let mut state = state.write().await;
    let changed = state.store.update_property(&body.key, body.value);
    Json(Snapshot::of(&state.store, changed))
}

/// `POST /api/animations/{id}`
pub async fn toggle_animation(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Json<Snapshot> {
    let mut state = state.write().await;
    let changed = state.store.toggle_animation(&id);
    Json(Snapshot::of(&state.store, changed))
}

/// `POST /api/hover-effects/{id}`
pub async fn toggle_hover_effect(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Json<Snapshot> {
    let mut state = state.write().await;
    let changed = state.store.toggle_hover_effect(&id);
    Json(Snapshot::of(&state.store, changed))
}

/// `POST /api/reset`
pub async fn reset(State(state): State<SharedState>) -> Json<Snapshot> {
    let mut state = state.write().await;
    let changed = state.store.reset();
    Json(Snapshot::of(&state.store, changed))
}

/// `POST /api/save`: keep a copy of the selection.
pub async fn save(State(state): State<SharedState>) -> Json<Snapshot> {
    let mut state = state.write().await;
    let changed = state.store.save_current().is_some();
    Json(Snapshot::of(&state.store, changed))
}

/// `POST /api/load`: replace the selection with a saved config.
pub async fn load(
    State(state): State<SharedState>,
    Json(component): Json<SelectedComponent>,
) -> Json<Snapshot> {
    let mut state = state.write().await;
    state.store.load(component);
    Json(Snapshot::of(&state.store, true))
}

/// `DELETE /api/saved/{id}`
pub async fn remove_saved(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Snapshot>, StatusCode> {
    let mut state = state.write().await;
    if !state.store.remove(&id) {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(Snapshot::of(&state.store, true)))
}

/// `DELETE /api/saved`: drop every saved instance and the selection.
pub async fn clear_saved(State(state): State<SharedState>) -> Json<Snapshot> {
    let mut state = state.write().await;
    state.store.clear();
    Json(Snapshot::of(&state.store, true))
}

/// `GET /api/export/{format}`: download the selection as an attachment.
pub async fn export(State(state): State<SharedState>, Path(id): Path<String>) -> Response {
    let Some(format) = ExportFormat::from_id(&id) else {
        return (StatusCode::NOT_FOUND, format!("Unknown export format: {}", id)).into_response();
    };

    let state = state.read().await;
    let Some(component) = state.store.selected() else {
        return unprocessable(validate_for_export(None));
    };

    match state.builder.render(component, format) {
        Ok(artifact) => {
            tracing::info!("Exported {}", artifact.filename);
            (
                [
                    (CONTENT_TYPE, artifact.mime_type.to_string()),
                    (CONTENT_DISPOSITION, attachment(&artifact.filename)),
                ],
                artifact.content,
            )
                .into_response()
        }
        Err(ExportError::Invalid(errors)) => unprocessable(errors),
        Err(e) => {
            tracing::error!("Export failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

fn unprocessable(errors: Vec<String>) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(serde_json::json!({ "errors": errors })),
    )
        .into_response()
}

/// `Content-Disposition` value for a download. The quoted name is an ASCII
/// fallback; `filename*` carries the exact name percent-encoded.
fn attachment(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c == ' ' || c.is_ascii_graphic() => c,
            _ => '_',
        })
        .collect();

    if fallback == filename {
        format!("attachment; filename=\"{}\"", filename)
    } else {
        format!(
            "attachment; filename=\"{}\"; filename*=UTF-8''{}",
            fallback,
            urlencoding::encode(filename)
        )
    }
}
