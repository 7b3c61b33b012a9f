//! Interactive builder server for kiln components.
//!
//! Serves the builder page and a JSON API over a single component store, and
//! pushes the re-rendered preview to every connected client after each
//! change. An optional saved config is watched and reloaded on edit.

pub mod api;
pub mod page;
pub mod server;
pub mod watcher;
pub mod websocket;

pub use page::render_page;
pub use server::{router, DevServer, DevServerConfig, ServerError, ServerState, SharedState};
pub use watcher::{ConfigWatcher, WatchEvent};
pub use websocket::{preview_client_script, HubObserver, PreviewHub, PreviewMessage};
