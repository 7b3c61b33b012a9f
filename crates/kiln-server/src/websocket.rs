//! WebSocket push of live previews.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::broadcast;

use kiln_core::{
    check_properties, render_preview, ComponentRegistry, PropertyWarning, RenderedPreview,
    SelectedComponent, StoreEvent, StoreObserver,
};
use kiln_export::to_css;

/// Messages sent to builder clients.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PreviewMessage {
    /// Connection established
    Connected,

    /// The selection changed and was re-rendered
    Update {
        event: StoreEvent,
        component: SelectedComponent,
        preview: RenderedPreview,
        /// Stylesheet for the current state, as exported
        css: String,
        warnings: Vec<PropertyWarning>,
    },

    /// Nothing is selected any more
    Cleared { event: StoreEvent },

    /// The watched config could not be loaded
    Error { message: String },
}

impl PreviewMessage {
    /// Build the message for a store change.
    pub fn for_change(
        registry: &ComponentRegistry,
        event: &StoreEvent,
        selected: Option<&SelectedComponent>,
    ) -> Self {
        match selected {
            Some(component) => PreviewMessage::Update {
                event: event.clone(),
                component: component.clone(),
                preview: render_preview(component),
                css: to_css(component),
                warnings: registry
                    .get(&component.type_id)
                    .map(|d| check_properties(component, d))
                    .unwrap_or_default(),
            },
            None => PreviewMessage::Cleared {
                event: event.clone(),
            },
        }
    }
}

/// Hub for broadcasting preview messages to all connected clients.
#[derive(Debug, Clone)]
pub struct PreviewHub {
    sender: broadcast::Sender<PreviewMessage>,
}

impl PreviewHub {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(100);
        Self { sender }
    }

    /// Send a message to all connected clients.
    pub fn send(&self, msg: PreviewMessage) {
        // No receivers is fine
        let _ = self.sender.send(msg);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PreviewMessage> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for PreviewHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Store observer that re-renders the selection into the hub.
pub struct HubObserver {
    hub: PreviewHub,
    registry: Arc<ComponentRegistry>,
}

impl HubObserver {
    pub fn new(hub: PreviewHub, registry: Arc<ComponentRegistry>) -> Self {
        Self { hub, registry }
    }
}

impl StoreObserver for HubObserver {
    fn on_change(&self, event: &StoreEvent, selected: Option<&SelectedComponent>) {
        // Skip rendering when nobody is listening
        if self.hub.subscriber_count() == 0 {
            return;
        }
        self.hub
            .send(PreviewMessage::for_change(&self.registry, event, selected));
    }
}

/// Client-side script that keeps the builder page in sync.
///
/// Connects to `path` on the page's own host and swaps the stage markup and
/// stylesheet on every update.
pub fn preview_client_script(path: &str) -> String {
    format!(
        r#"
(function() {{
  'use strict';

  const scheme = location.protocol === 'https:' ? 'wss://' : 'ws://';
  let attempts = 0;
  const maxAttempts = 10;

  function escape(text) {{
    const div = document.createElement('div');
    div.textContent = text;
    return div.innerHTML;
  }}

  function connect() {{
    const ws = new WebSocket(scheme + location.host + '{}');

    ws.onopen = function() {{
      attempts = 0;
    }};

    ws.onmessage = function(event) {{
      const msg = JSON.parse(event.data);
      const stage = document.getElementById('kiln-stage');
      const css = document.getElementById('kiln-css');
      const warnings = document.getElementById('kiln-warnings');

      switch (msg.type) {{
        case 'update':
          stage.innerHTML = msg.preview.markup;
          css.textContent = msg.css;
          document.getElementById('kiln-selected').textContent = msg.component.name;
          warnings.innerHTML = msg.warnings
            .map(function(w) {{ return '<li>' + escape(w.key + ': ' + w.message) + '</li>'; }})
            .join('');
          if (msg.event.event === 'saved') {{
            location.reload();
          }}
          break;

        case 'cleared':
          stage.innerHTML = '<p class="kiln-empty">Select a component to begin</p>';
          css.textContent = '';
          warnings.innerHTML = '';
          document.getElementById('kiln-selected').textContent = '';
          if (msg.event.event !== 'reset') {{
            location.reload();
          }}
          break;

        case 'error':
          console.error('[kiln]', msg.message);
          break;
      }}
    }};

    ws.onclose = function() {{
      if (attempts < maxAttempts) {{
        attempts++;
        setTimeout(connect, 1000 * attempts);
      }}
    }};
  }}

  window.kiln = {{
    post: function(url, body) {{
      return fetch(url, {{
        method: 'POST',
        headers: {{ 'content-type': 'application/json' }},
        body: JSON.stringify(body === undefined ? {{}} : body)
      }});
    }},
    remove: function(url) {{
      return fetch(url, {{ method: 'DELETE' }});
    }}
  }};

  connect();
}})();
"#,
        path
    )
}
