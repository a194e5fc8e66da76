//! MCP tool server exposing calendar listing to an agent host over stdio
use anyhow::Result;
use rmcp::{
    ErrorData as McpError, ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router,
};
use serde::Deserialize;

use crate::calendar::CalendarService;
use crate::core::ServiceError;

const NO_EVENTS: &str = "No upcoming events found.";
const CALENDAR_FAILED: &str = "Calendar request failed.";

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ListEventsArgs {
    /// Maximum number of events to return (default is 5).
    pub max_results: Option<u32>,
}

/// Tool handler over the same calendar service the HTTP API uses.
#[derive(Clone)]
pub struct CalendarTools {
    calendar: CalendarService,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl CalendarTools {
    pub fn new(calendar: CalendarService) -> Self {
        Self {
            calendar,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "List upcoming events from the connected calendar, soonest first.")]
    async fn list_events(
        &self,
        Parameters(args): Parameters<ListEventsArgs>,
    ) -> Result<CallToolResult, McpError> {
        let events = match self.calendar.list(args.max_results).await {
            Ok(events) => events,
            // Reported to the agent as a failed call rather than a protocol error
            Err(ServiceError::External(e)) => {
                tracing::error!("list_events tool failed: {:#}", e);
                return Ok(CallToolResult::error(vec![Content::text(CALENDAR_FAILED)]));
            }
            Err(e) => {
                tracing::warn!("list_events tool rejected: {}", e);
                return Ok(CallToolResult::error(vec![Content::text(e.to_string())]));
            }
        };

        if events.is_empty() {
            return Ok(CallToolResult::success(vec![Content::text(NO_EVENTS)]));
        }
        let text = serde_json::to_string_pretty(&events)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

#[tool_handler]
impl ServerHandler for CalendarTools {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(String::from(
                "Read-only access to the user's calendar. Call list_events to see what is coming up.",
            )),
            ..Default::default()
        }
    }
}

/// Run the tool server on the process's stdin and stdout until the host
/// disconnects.
pub async fn serve_stdio(calendar: CalendarService) -> Result<()> {
    tracing::info!("MCP tool server ready");
    let service = CalendarTools::new(calendar)
        .serve(rmcp::transport::stdio())
        .await?;
    let reason = service.waiting().await?;
    tracing::info!("MCP tool server stopped: {:?}", reason);
    Ok(())
}
