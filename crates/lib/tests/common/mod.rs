//! Recording Bot API stub shared by integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use snakebot::telegram::{BotApi, InlineQueryResultGame, TelegramError};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SendMessage(i64, String),
    SendGame(i64, String),
    AnswerInlineQuery(String, Vec<InlineQueryResultGame>),
    AnswerCallbackQuery(String, String),
    SetGameScore(String, String, i64),
}

/// Records every call; when `fail` is set each call is recorded and then rejected.
#[derive(Default)]
pub struct RecordingBot {
    calls: Mutex<Vec<Call>>,
    fail: bool,
}

impl RecordingBot {
    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, method: &'static str, call: Call) -> Result<(), TelegramError> {
        self.calls.lock().unwrap().push(call);
        if self.fail {
            Err(TelegramError::Api {
                method,
                detail: "502 Bad Gateway".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl BotApi for RecordingBot {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TelegramError> {
        self.record("sendMessage", Call::SendMessage(chat_id, text.to_string()))
    }

    async fn send_game(&self, chat_id: i64, game_short_name: &str) -> Result<(), TelegramError> {
        self.record("sendGame", Call::SendGame(chat_id, game_short_name.to_string()))
    }

    async fn answer_inline_query(
        &self,
        inline_query_id: &str,
        results: &[InlineQueryResultGame],
    ) -> Result<(), TelegramError> {
        self.record(
            "answerInlineQuery",
            Call::AnswerInlineQuery(inline_query_id.to_string(), results.to_vec()),
        )
    }

    async fn answer_callback_query(
        &self,
        callback_query_id: &str,
        url: &str,
    ) -> Result<(), TelegramError> {
        self.record(
            "answerCallbackQuery",
            Call::AnswerCallbackQuery(callback_query_id.to_string(), url.to_string()),
        )
    }

    async fn set_game_score(
        &self,
        inline_message_id: &str,
        user_id: &str,
        score: i64,
    ) -> Result<(), TelegramError> {
        self.record(
            "setGameScore",
            Call::SetGameScore(inline_message_id.to_string(), user_id.to_string(), score),
        )
    }
}
