//! Outbound Bot API surface used by the dispatcher and the score endpoint.

use crate::telegram::client::TelegramError;
use crate::telegram::types::InlineQueryResultGame;
use async_trait::async_trait;

/// Calls the bot makes against Telegram. Implementations hold no per-request state.
#[async_trait]
pub trait BotApi: Send + Sync {
    /// sendMessage with plain text.
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TelegramError>;

    /// sendGame: post the game invitation message into a chat.
    async fn send_game(&self, chat_id: i64, game_short_name: &str) -> Result<(), TelegramError>;

    async fn answer_inline_query(
        &self,
        inline_query_id: &str,
        results: &[InlineQueryResultGame],
    ) -> Result<(), TelegramError>;

    /// answerCallbackQuery with a URL; for game callbacks Telegram opens it in the game view.
    async fn answer_callback_query(&self, callback_query_id: &str, url: &str)
        -> Result<(), TelegramError>;

    /// setGameScore for an inline game message.
    async fn set_game_score(
        &self,
        inline_message_id: &str,
        user_id: &str,
        score: i64,
    ) -> Result<(), TelegramError>;
}
