//! Web server CLI command

use std::path::PathBuf;

use crate::api::{self, AppState};
use crate::storage::config;

/// Find a static client directory (`public/` next to the executable or in cwd)
fn find_static_dir() -> Option<PathBuf> {
    // Try relative to current executable
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let public = exe_dir.join("public");
            if public.join("index.html").exists() {
                return Some(public);
            }
        }
    }

    // Try relative to current working directory
    let cwd_public = PathBuf::from("public");
    if cwd_public.join("index.html").exists() {
        return Some(cwd_public);
    }

    None
}

/// Execute the web server
pub async fn execute(
    port: Option<u16>,
    host: Option<String>,
    data_dir: Option<PathBuf>,
    static_dir: Option<PathBuf>,
    open: bool,
) {
    let data_dir = super::resolve_data_dir(data_dir);

    // Config file < environment < command line flags
    let mut config = config::load_config(&data_dir);
    config::apply_env_overrides(&mut config);
    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(host) = host {
        config.server.host = host;
    }
    let static_dir = static_dir
        .or_else(|| config.server.static_dir.clone())
        .or_else(find_static_dir);

    let state = match AppState::init(&data_dir, &config).await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(data_dir = %data_dir.display(), error = %e, "failed to initialise data files");
            std::process::exit(1);
        }
    };

    // Open browser after a short delay
    if open {
        let url = format!("http://localhost:{}", config.server.port);
        tokio::spawn(async move {
            tokio::time::sleep(tokio::time::Duration::from_millis(500)).await;
            tracing::info!(%url, "opening browser");
            if let Err(e) = open::that(&url) {
                tracing::warn!(error = %e, "failed to open browser");
            }
        });
    }

    if let Err(e) = api::start_server(&config.server.host, config.server.port, state, static_dir).await
    {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }
}
