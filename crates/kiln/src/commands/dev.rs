//! Interactive builder command.

use std::path::PathBuf;

use anyhow::Result;
use kiln_server::DevServer;

use crate::config::ConfigFile;

/// Run the builder server.
pub async fn run(
    file_config: &ConfigFile,
    port: Option<u16>,
    open: bool,
    watch: Option<PathBuf>,
) -> Result<()> {
    let config = file_config.server_config(port, open, watch)?;
    tracing::info!("Starting builder on port {}", config.port);

    DevServer::new(config).start().await?;

    Ok(())
}
