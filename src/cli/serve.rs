use std::sync::Arc;

use anyhow::Result;

use crate::api::{self, AppState};
use crate::core::AppConfig;
use crate::mcp;

pub async fn run(
    config: AppConfig,
    host: String,
    port: String,
    with_mcp: bool,
    open_browser: bool,
) -> Result<()> {
    let state = Arc::new(AppState::from_config(config));

    if with_mcp {
        // Shares the calendar service, and with it the credential, with
        // the HTTP handlers
        let calendar = state.calendar.clone();
        tokio::spawn(async move {
            if let Err(e) = mcp::serve_stdio(calendar).await {
                tracing::error!("Tool server stopped: {:#}", e);
            }
        });
        tracing::info!("Tool server listening on stdio");
    }

    if open_browser {
        let url = format!("http://{}:{}/auth", host, port);
        if let Err(e) = webbrowser::open(&url) {
            tracing::warn!("Could not open a browser, visit {} to connect: {}", url, e);
        }
    }

    api::serve(&host, &port, state).await
}
