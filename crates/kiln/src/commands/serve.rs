//! Static preview of a batch export.

use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::services::ServeDir;

/// Run the serve command.
pub async fn run(port: u16, dir: &Path, open: bool) -> Result<()> {
    if !dir.join("index.html").exists() {
        anyhow::bail!(
            "No gallery in {}. Run 'kiln batch' first.",
            dir.display()
        );
    }

    let addr: SocketAddr = format!("127.0.0.1:{}", port)
        .parse()
        .context("Invalid address")?;

    tracing::info!(
        "Serving {} components from {} at http://{}",
        count_components(dir)?,
        dir.display(),
        addr
    );

    let app = Router::new().fallback_service(ServeDir::new(dir));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    if open {
        let _ = open::that(format!("http://{}", addr));
    }

    axum::serve(listener, app).await?;

    Ok(())
}

/// Component directories in an export, one per exported component.
fn count_components(dir: &Path) -> Result<usize> {
    let entries = fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))?;
    Ok(entries
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .count())
}
