use std::sync::Arc;

use crate::calendar::CalendarService;
use crate::chat::{ChatDispatcher, OpenAiModel};
use crate::core::AppConfig;
use crate::credentials::store_from_config;
use crate::google::GoogleOAuth;
use crate::openai::CompletionClient;

/// Context handed to every request handler.
pub struct AppState {
    pub config: AppConfig,
    pub calendar: CalendarService,
    pub chat: ChatDispatcher,
    pub oauth: GoogleOAuth,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        calendar: CalendarService,
        chat: ChatDispatcher,
        oauth: GoogleOAuth,
    ) -> Self {
        Self {
            config,
            calendar,
            chat,
            oauth,
        }
    }

    /// Wire up the Google Calendar and OpenAI backed services.
    pub fn from_config(config: AppConfig) -> Self {
        let credentials = store_from_config(&config);
        let calendar = CalendarService::from_config(&config, credentials);

        let AppConfig {
            openai_api_hostname,
            openai_api_key,
            openai_model,
            system_message,
            ..
        } = &config;
        let model = Arc::new(OpenAiModel::new(
            CompletionClient::new(openai_api_hostname, openai_api_key, openai_model),
            system_message,
        ));
        let chat = ChatDispatcher::new(calendar.clone(), model.clone(), model);
        let oauth = GoogleOAuth::new(&config);

        Self::new(config, calendar, chat, oauth)
    }
}
