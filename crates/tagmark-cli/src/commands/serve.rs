//! Serve command handler

use anyhow::{Context, Result};

use tagmark_core::{Config, Store};

/// Run the HTTP API until the process is stopped
///
/// `--host` and `--port` win over the config file and environment.
pub async fn serve(mut config: Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }

    let store = Store::open_with_config(config).context("Failed to open bookmark store")?;
    tagmark_server::serve(store).await
}
