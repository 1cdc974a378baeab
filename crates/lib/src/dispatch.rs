//! Update dispatcher: one webhook body in, at most one Bot API call out, fixed acknowledgment back.
//!
//! Classification order is text command, inline query, then game callback; first match wins.

use crate::config::GameSettings;
use crate::telegram::{BotApi, InlineQueryResultGame, TelegramError, Update};
use serde::Serialize;
use std::sync::Arc;

const START_COMMAND: &str = "/start";
const GAME_COMMAND: &str = "/game";

pub const BODY_OK: &str = "OK";
pub const BODY_INVALID_REQUEST: &str = "Invalid request body";
pub const BODY_INVALID_UPDATE: &str = "Invalid update format";
pub const BODY_OUTBOUND_FAILED: &str = "Failed to process update";

/// One inbound invocation. An empty body is treated the same as a missing one.
#[derive(Debug, Clone, Default)]
pub struct WebhookEvent {
    pub body: Option<String>,
}

impl WebhookEvent {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: Some(body.into()),
        }
    }
}

/// Status code plus text body returned to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub status_code: u16,
    pub body: String,
}

impl ResponseEnvelope {
    fn new(status_code: u16, body: &str) -> Self {
        Self {
            status_code,
            body: body.to_string(),
        }
    }

    pub fn ok() -> Self {
        Self::new(200, BODY_OK)
    }
}

/// The single outbound action chosen for an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundAction {
    SendWelcomeText { chat_id: i64 },
    SendGamePrompt { chat_id: i64 },
    AnswerInlineQueryWithGame { query_id: String },
    AnswerCallbackWithGameUrl { callback_id: String, url: String },
    NoOp,
}

/// Launch URL handed back on a game callback: `{base}/#userId={user}&messageId={message}`.
pub fn game_url(base: &str, user_id: i64, inline_message_id: &str) -> String {
    format!(
        "{}/#userId={}&messageId={}",
        base.trim_end_matches('/'),
        user_id,
        inline_message_id
    )
}

/// Pick the action for an update. Pure; performs no I/O.
pub fn classify(update: &Update, game: &GameSettings) -> OutboundAction {
    if let Some(msg) = &update.message {
        if let Some(text) = msg.text.as_deref().filter(|t| !t.is_empty()) {
            let Some(chat) = &msg.chat else {
                log::debug!("message without chat, ignoring");
                return OutboundAction::NoOp;
            };
            return match text {
                START_COMMAND => OutboundAction::SendWelcomeText { chat_id: chat.id },
                GAME_COMMAND => OutboundAction::SendGamePrompt { chat_id: chat.id },
                _ => OutboundAction::NoOp,
            };
        }
    }

    if let Some(query) = &update.inline_query {
        return OutboundAction::AnswerInlineQueryWithGame {
            query_id: query.id.clone(),
        };
    }

    if let Some(cb) = &update.callback_query {
        if cb.game_short_name.as_deref() == Some(game.short_name.as_str()) {
            let Some(from) = &cb.from else {
                log::warn!("game callback {} has no sender, ignoring", cb.id);
                return OutboundAction::NoOp;
            };
            let message_id = cb.inline_message_id.as_deref().unwrap_or("");
            return OutboundAction::AnswerCallbackWithGameUrl {
                callback_id: cb.id.clone(),
                url: game_url(&game.url, from.id, message_id),
            };
        }
    }

    OutboundAction::NoOp
}

/// Dispatcher with an injected Bot API handle. Cheap to clone; holds no request state.
#[derive(Clone)]
pub struct Dispatcher {
    bot: Arc<dyn BotApi>,
    game: GameSettings,
}

impl Dispatcher {
    pub fn new(bot: Arc<dyn BotApi>, game: GameSettings) -> Self {
        Self { bot, game }
    }

    pub fn game(&self) -> &GameSettings {
        &self.game
    }

    /// Perform the outbound call for an action (awaited). `NoOp` does nothing.
    pub async fn execute(&self, action: &OutboundAction) -> Result<(), TelegramError> {
        match action {
            OutboundAction::SendWelcomeText { chat_id } => {
                self.bot.send_message(*chat_id, &self.game.welcome_text).await
            }
            OutboundAction::SendGamePrompt { chat_id } => {
                self.bot.send_game(*chat_id, &self.game.short_name).await
            }
            OutboundAction::AnswerInlineQueryWithGame { query_id } => {
                let results = [InlineQueryResultGame::new(&self.game.short_name)];
                self.bot.answer_inline_query(query_id, &results).await
            }
            OutboundAction::AnswerCallbackWithGameUrl { callback_id, url } => {
                self.bot.answer_callback_query(callback_id, url).await
            }
            OutboundAction::NoOp => Ok(()),
        }
    }

    /// Handle one webhook invocation.
    ///
    /// - no body: 400 "Invalid request body"
    /// - body is not an update: 400 "Invalid update format"
    /// - outbound call fails: 500 "Failed to process update"
    /// - anything else, no-ops included: 200 "OK"
    pub async fn handle(&self, event: &WebhookEvent) -> ResponseEnvelope {
        let Some(body) = event.body.as_deref().filter(|b| !b.is_empty()) else {
            return ResponseEnvelope::new(400, BODY_INVALID_REQUEST);
        };

        let update: Update = match serde_json::from_str(body) {
            Ok(u) => u,
            Err(e) => {
                log::warn!("failed to parse update: {}", e);
                return ResponseEnvelope::new(400, BODY_INVALID_UPDATE);
            }
        };

        let action = classify(&update, &self.game);
        log::debug!("update {:?}: {:?}", update.update_id, action);

        if let Err(e) = self.execute(&action).await {
            log::warn!("outbound call for {:?} failed: {}", action, e);
            return ResponseEnvelope::new(500, BODY_OUTBOUND_FAILED);
        }
        ResponseEnvelope::ok()
    }
}
