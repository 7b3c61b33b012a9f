//! Builder server implementation.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use tokio::sync::{broadcast::error::RecvError, RwLock};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use kiln_core::{ComponentRegistry, ComponentStore};
use kiln_export::{load_component, ExportBuilder, ExportConfig};

use crate::api;
use crate::page::render_page;
use crate::watcher::{ConfigWatcher, WatchEvent};
use crate::websocket::{preview_client_script, HubObserver, PreviewHub, PreviewMessage};

/// Configuration for the builder server.
#[derive(Debug, Clone)]
pub struct DevServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Open browser on start
    pub open: bool,

    /// Saved config to load and reload on change
    pub watch: Option<PathBuf>,

    /// Settings for downloads and the `/exports` directory
    pub export: ExportConfig,
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7878,
            open: true,
            watch: None,
            export: ExportConfig::default(),
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid address {0}")]
    InvalidAddress(String),

    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error("File watch error: {0}")]
    WatchError(String),

    #[error("Failed to render template: {0}")]
    TemplateError(String),
}

/// Shared server state.
pub struct ServerState {
    pub config: DevServerConfig,
    pub store: ComponentStore,
    pub hub: PreviewHub,
    pub builder: ExportBuilder,
}

pub type SharedState = Arc<RwLock<ServerState>>;

impl ServerState {
    /// Create state with the builtin registry. Every store change is pushed
    /// to the hub.
    pub fn new(config: DevServerConfig) -> Self {
        let registry = Arc::new(ComponentRegistry::builtin());
        let hub = PreviewHub::new();
        let mut store = ComponentStore::new(Arc::clone(&registry));
        store.subscribe(HubObserver::new(hub.clone(), registry));

        Self {
            builder: ExportBuilder::new(config.export.clone()),
            config,
            store,
            hub,
        }
    }

    pub fn shared(self) -> SharedState {
        Arc::new(RwLock::new(self))
    }
}

/// Builder server.
pub struct DevServer {
    config: DevServerConfig,
}

impl DevServer {
    pub fn new(config: DevServerConfig) -> Self {
        Self { config }
    }

    /// Start the builder server.
    pub async fn start(self) -> Result<(), ServerError> {
        let raw = format!("{}:{}", self.config.host, self.config.port);
        let addr: SocketAddr = raw
            .parse()
            .map_err(|_| ServerError::InvalidAddress(raw.clone()))?;

        let state = ServerState::new(self.config.clone()).shared();

        if let Some(path) = &self.config.watch {
            if path.exists() {
                reload_config(&state, path).await;
            }

            let (watcher, mut rx) =
                ConfigWatcher::new(path).map_err(|e| ServerError::WatchError(e.to_string()))?;
            tracing::info!("Watching {}", path.display());

            let state_clone = Arc::clone(&state);
            tokio::spawn(async move {
                while let Some(event) = rx.recv().await {
                    handle_watch_event(&state_clone, event).await;
                }
                // Keep watcher alive
                drop(watcher);
            });
        }

        let app = router(state, &self.config.export.output_dir);

        tracing::info!("Starting builder at http://{}", addr);

        if self.config.open {
            let url = format!("http://{}", addr);
            let _ = open::that(&url);
        }

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        Ok(())
    }
}

/// Build the router for a shared state. Batch output under `exports_dir` is
/// served at `/exports`.
pub fn router(state: SharedState, exports_dir: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/__preview", get(ws_handler))
        .route("/__preview.js", get(preview_script_handler))
        .route("/api/components", get(api::list_components))
        .route("/api/components/{type_id}", get(api::get_component))
        .route("/api/state", get(api::get_state))
        .route("/api/select", post(api::select))
        .route("/api/style", post(api::update_style))
        .route("/api/property", post(api::update_property))
        .route("/api/animations/{id}", post(api::toggle_animation))
        .route("/api/hover-effects/{id}", post(api::toggle_hover_effect))
        .route("/api/reset", post(api::reset))
        .route("/api/save", post(api::save))
        .route("/api/load", post(api::load))
        .route("/api/saved", delete(api::clear_saved))
        .route("/api/saved/{id}", delete(api::remove_saved))
        .route("/api/export/{format}", get(api::export))
        .nest_service("/exports", ServeDir::new(exports_dir))
        .layer(cors)
        .with_state(state)
}

/// Handle config watch events.
async fn handle_watch_event(state: &SharedState, event: WatchEvent) {
    match event {
        WatchEvent::Changed(path) => {
            tracing::info!("Config modified: {}", path.display());
            reload_config(state, &path).await;
        }
        WatchEvent::Removed(path) => {
            tracing::warn!("Config removed: {}", path.display());
        }
    }
}

/// Load a saved config into the store, reporting failures to clients.
async fn reload_config(state: &SharedState, path: &Path) {
    match load_component(path) {
        Ok(component) => {
            state.write().await.store.load(component);
        }
        Err(e) => {
            tracing::warn!("Failed to load {}: {}", path.display(), e);
            state.read().await.hub.send(PreviewMessage::Error {
                message: e.to_string(),
            });
        }
    }
}

/// Handler for the builder page.
async fn index_handler(State(state): State<SharedState>) -> Response {
    let state = state.read().await;
    match render_page(&state.store) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("{}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Handler for the preview WebSocket endpoint.
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<SharedState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

/// Forward preview messages to one client.
async fn handle_ws(mut socket: WebSocket, state: SharedState) {
    let mut rx = {
        let state = state.read().await;
        state.hub.subscribe()
    };

    if send_message(&mut socket, &PreviewMessage::Connected)
        .await
        .is_err()
    {
        return;
    }

    loop {
        match rx.recv().await {
            Ok(msg) => {
                if send_message(&mut socket, &msg).await.is_err() {
                    break;
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::debug!("Preview client lagged by {} messages", skipped);
            }
            Err(RecvError::Closed) => break,
        }
    }
}

async fn send_message(socket: &mut WebSocket, msg: &PreviewMessage) -> Result<(), axum::Error> {
    let json = serde_json::to_string(msg).map_err(axum::Error::new)?;
    socket.send(Message::Text(json.into())).await
}

/// Handler for the preview client script.
async fn preview_script_handler() -> impl IntoResponse {
    (
        [("content-type", "application/javascript")],
        preview_client_script("/__preview"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
    use axum::http::Request;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use std::fs;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn app() -> (Router, SharedState) {
        let config = DevServerConfig::default();
        let state = ServerState::new(config.clone()).shared();
        (router(Arc::clone(&state), &config.export.output_dir), state)
    }

    async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        app.clone().oneshot(request).await.unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn creates_server_with_default_config() {
        let server = DevServer::new(DevServerConfig::default());
        assert_eq!(server.config.port, 7878);
        assert!(server.config.watch.is_none());
    }

    #[tokio::test]
    async fn lists_components() {
        let (app, _) = app();

        let all = json_body(call(&app, "GET", "/api/components", None).await).await;
        assert_eq!(all.as_array().unwrap().len(), 12);

        let forms = json_body(call(&app, "GET", "/api/components?category=form", None).await).await;
        let ids: Vec<&str> = forms
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["input", "textarea", "select"]);

        let bad = call(&app, "GET", "/api/components?category=widgets", None).await;
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_component_is_not_found() {
        let (app, _) = app();

        let response = call(&app, "GET", "/api/components/carousel", None).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn select_then_mutate() {
        let (app, state) = app();

        let selected = json_body(
            call(&app, "POST", "/api/select", Some(json!({ "type": "button" }))).await,
        )
        .await;
        assert_eq!(selected["selected"]["type"], "button");

        let styled = json_body(
            call(
                &app,
                "POST",
                "/api/style",
                Some(json!({ "hover": { "color": "#000000" } })),
            )
            .await,
        )
        .await;
        assert_eq!(styled["changed"], true);
        assert_eq!(styled["selected"]["style"]["hover"]["color"], "#000000");

        let prop = json_body(
            call(
                &app,
                "POST",
                "/api/property",
                Some(json!({ "key": "text", "value": "Go" })),
            )
            .await,
        )
        .await;
        assert_eq!(prop["selected"]["properties"]["text"], "Go");

        let toggled = json_body(call(&app, "POST", "/api/animations/fade", None).await).await;
        assert_eq!(toggled["selected"]["animations"], json!(["fade"]));

        let ignored = json_body(call(&app, "POST", "/api/animations/wobble", None).await).await;
        assert_eq!(ignored["changed"], false);

        let state = state.read().await;
        assert_eq!(state.store.selected().unwrap().animations.len(), 1);
    }

    #[tokio::test]
    async fn unknown_style_key_is_rejected() {
        let (app, _) = app();
        call(&app, "POST", "/api/select", Some(json!({ "type": "card" }))).await;

        let response = call(&app, "POST", "/api/style", Some(json!({ "colour": "red" }))).await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn export_downloads_attachment() {
        let (app, _) = app();
        call(&app, "POST", "/api/select", Some(json!({ "type": "card" }))).await;

        let response = call(&app, "GET", "/api/export/css", None).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "text/css");
        assert_eq!(
            response.headers()[CONTENT_DISPOSITION],
            "attachment; filename=\"card.css\""
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8(bytes.to_vec())
            .unwrap()
            .starts_with(".card-component {"));
    }

    #[tokio::test]
    async fn export_header_survives_non_ascii_name() {
        let (app, _) = app();
        let snapshot = json_body(
            call(&app, "POST", "/api/select", Some(json!({ "type": "badge" }))).await,
        )
        .await;
        let mut component = snapshot["selected"].clone();
        component["name"] = json!("Caf\u{e9} \"Menu\"");
        call(&app, "POST", "/api/load", Some(component)).await;

        let response = call(&app, "GET", "/api/export/css", None).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[CONTENT_DISPOSITION],
            "attachment; filename=\"caf_-menu.css\"; filename*=UTF-8''caf%C3%A9-menu.css"
        );
    }

    #[tokio::test]
    async fn export_without_selection_is_unprocessable() {
        let (app, _) = app();

        let response = call(&app, "GET", "/api/export/tsx", None).await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            json_body(response).await,
            json!({ "errors": ["No component provided"] })
        );
    }

    #[tokio::test]
    async fn export_with_blank_name_is_unprocessable() {
        let (app, _) = app();
        let component = json!({
            "id": "button_1",
            "name": "",
            "type": "button",
            "style": { "color": "#fff" }
        });
        call(&app, "POST", "/api/load", Some(component)).await;

        let response = call(&app, "GET", "/api/export/html", None).await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            json_body(response).await,
            json!({ "errors": ["Component name is required"] })
        );
    }

    #[tokio::test]
    async fn unknown_export_format_is_not_found() {
        let (app, _) = app();
        call(&app, "POST", "/api/select", Some(json!({ "type": "card" }))).await;

        let response = call(&app, "GET", "/api/export/scss", None).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn save_remove_and_clear() {
        let (app, _) = app();
        let selected = json_body(
            call(&app, "POST", "/api/select", Some(json!({ "type": "badge" }))).await,
        )
        .await;
        let id = selected["selected"]["id"].as_str().unwrap().to_string();

        let saved = json_body(call(&app, "POST", "/api/save", None).await).await;
        assert_eq!(saved["saved"].as_array().unwrap().len(), 1);

        let removed = call(&app, "DELETE", &format!("/api/saved/{}", id), None).await;
        assert_eq!(removed.status(), StatusCode::OK);
        let removed = json_body(removed).await;
        assert_eq!(removed["selected"], Value::Null);
        assert_eq!(removed["saved"], json!([]));

        let missing = call(&app, "DELETE", &format!("/api/saved/{}", id), None).await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let cleared = json_body(call(&app, "DELETE", "/api/saved", None).await).await;
        assert_eq!(cleared["changed"], true);
    }

    #[tokio::test]
    async fn renders_builder_page() {
        let (app, _) = app();
        call(&app, "POST", "/api/select", Some(json!({ "type": "alert" }))).await;

        let response = call(&app, "GET", "/", None).await;

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains(".alert-component {"));
        assert!(html.contains(r#"<script src="/__preview.js"></script>"#));
    }

    #[tokio::test]
    async fn mutations_reach_hub_subscribers() {
        let (app, state) = app();
        let mut rx = state.read().await.hub.subscribe();

        call(&app, "POST", "/api/select", Some(json!({ "type": "progress" }))).await;

        match rx.try_recv() {
            Ok(PreviewMessage::Update { component, .. }) => {
                assert_eq!(component.type_id, "progress")
            }
            other => panic!("Expected Update message, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn reloads_watched_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("hero-config.json");
        fs::write(
            &path,
            r#"{"id":"card_7","name":"Hero","type":"card","style":{"padding":"32px"}}"#,
        )
        .unwrap();
        let (_, state) = app();

        handle_watch_event(&state, WatchEvent::Changed(path.clone())).await;

        let state = state.read().await;
        assert_eq!(state.store.selected().unwrap().name, "Hero");
    }

    #[tokio::test]
    async fn broken_watched_config_reports_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.json");
        fs::write(&path, "{").unwrap();
        let (_, state) = app();
        let mut rx = state.read().await.hub.subscribe();

        handle_watch_event(&state, WatchEvent::Changed(path)).await;

        assert!(state.read().await.store.selected().is_none());
        assert!(matches!(rx.try_recv(), Ok(PreviewMessage::Error { .. })));
    }
}
