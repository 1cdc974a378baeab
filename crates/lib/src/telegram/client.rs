//! Telegram Bot API client: POSTs JSON to `{api_base}/bot{token}/{method}`.

use crate::config::DEFAULT_TELEGRAM_API_BASE;
use crate::telegram::api::BotApi;
use crate::telegram::types::InlineQueryResultGame;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum TelegramError {
    #[error("telegram request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("telegram {method} failed: {detail}")]
    Api { method: &'static str, detail: String },
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Bot API client. Construct once per process and share.
#[derive(Clone)]
pub struct TelegramClient {
    api_base: String,
    token: String,
    client: reqwest::Client,
}

impl TelegramClient {
    pub fn new(token: impl Into<String>, api_base: Option<String>) -> Self {
        let api_base = api_base
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_TELEGRAM_API_BASE.to_string());
        Self {
            api_base,
            token: token.into(),
            client: reqwest::Client::new(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token, method)
    }

    async fn call(
        &self,
        method: &'static str,
        body: &serde_json::Value,
    ) -> Result<(), TelegramError> {
        let res = self
            .client
            .post(self.method_url(method))
            .json(body)
            .send()
            .await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(TelegramError::Api {
                method,
                detail: format!("{} {}", status, body),
            });
        }
        let data: ApiResponse = res.json().await?;
        if !data.ok {
            return Err(TelegramError::Api {
                method,
                detail: data
                    .description
                    .unwrap_or_else(|| "ok: false".to_string()),
            });
        }
        log::debug!("telegram {} ok", method);
        Ok(())
    }

    /// Set webhook URL (and optional secret). Telegram then POSTs updates to the URL.
    pub async fn set_webhook(&self, url: &str, secret: Option<&str>) -> Result<(), TelegramError> {
        let mut body = json!({ "url": url });
        if let Some(s) = secret {
            body["secret_token"] = serde_json::Value::String(s.to_string());
        }
        self.call("setWebhook", &body).await
    }

    /// Remove the registered webhook.
    pub async fn delete_webhook(&self) -> Result<(), TelegramError> {
        self.call("deleteWebhook", &json!({})).await
    }
}

#[async_trait]
impl BotApi for TelegramClient {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TelegramError> {
        self.call("sendMessage", &json!({ "chat_id": chat_id, "text": text }))
            .await
    }

    async fn send_game(&self, chat_id: i64, game_short_name: &str) -> Result<(), TelegramError> {
        self.call(
            "sendGame",
            &json!({ "chat_id": chat_id, "game_short_name": game_short_name }),
        )
        .await
    }

    async fn answer_inline_query(
        &self,
        inline_query_id: &str,
        results: &[InlineQueryResultGame],
    ) -> Result<(), TelegramError> {
        self.call(
            "answerInlineQuery",
            &json!({ "inline_query_id": inline_query_id, "results": results }),
        )
        .await
    }

    async fn answer_callback_query(
        &self,
        callback_query_id: &str,
        url: &str,
    ) -> Result<(), TelegramError> {
        self.call(
            "answerCallbackQuery",
            &json!({ "callback_query_id": callback_query_id, "url": url }),
        )
        .await
    }

    async fn set_game_score(
        &self,
        inline_message_id: &str,
        user_id: &str,
        score: i64,
    ) -> Result<(), TelegramError> {
        self.call(
            "setGameScore",
            &json!({
                "inline_message_id": inline_message_id,
                "user_id": user_id,
                "score": score,
            }),
        )
        .await
    }
}
