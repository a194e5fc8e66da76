use anyhow::Result;

use crate::calendar::CalendarService;
use crate::core::AppConfig;
use crate::credentials::store_from_config;
use crate::mcp;

pub async fn run(config: AppConfig) -> Result<()> {
    if config.credentials_path.is_none() {
        tracing::warn!(
            "CALBRIDGE_CREDENTIALS_PATH is not set, tool calls will fail until a credential is stored"
        );
    }
    let calendar = CalendarService::from_config(&config, store_from_config(&config));
    mcp::serve_stdio(calendar).await
}
