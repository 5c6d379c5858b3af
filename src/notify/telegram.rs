//! Telegram Bot API transport.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::TelegramConfig;
use crate::notify::MessageTransport;
use crate::utils::http;

/// Sends messages to one chat through `sendMessage`.
#[derive(Clone)]
pub struct TelegramTransport {
    client: Client,
    endpoint: String,
    chat_id: String,
}

impl TelegramTransport {
    pub fn new(config: &TelegramConfig) -> Result<Self> {
        Ok(Self {
            client: http::create_api_client(config)?,
            endpoint: format!(
                "{}/bot{}/sendMessage",
                config.api_base.trim_end_matches('/'),
                config.bot_token
            ),
            chat_id: config.chat_id.clone(),
        })
    }
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
    disable_web_page_preview: bool,
}

#[derive(Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

#[async_trait]
impl MessageTransport for TelegramTransport {
    async fn send(&self, text: &str) -> Result<()> {
        let payload = SendMessage {
            chat_id: &self.chat_id,
            text,
            parse_mode: "Markdown",
            disable_web_page_preview: false,
        };

        // The endpoint embeds the bot token; keep it out of error messages.
        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::Http(e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::Http(e.without_url()))?;
        let parsed: Option<ApiResponse> = serde_json::from_str(&body).ok();

        match parsed {
            Some(api) if status.is_success() && api.ok => Ok(()),
            Some(api) => Err(AppError::notify(format!(
                "{}: {}",
                status,
                api.description.unwrap_or_else(|| "no description".to_string())
            ))),
            None => Err(AppError::notify(format!("{}: unexpected response body", status))),
        }
    }
}
