//! Telegram Bot API: update payload types and the outbound client.
//!
//! The dispatcher only sees the [`BotApi`] trait so tests can swap in a recording stub.

mod api;
mod client;
mod types;

pub use api::BotApi;
pub use client::{TelegramClient, TelegramError};
pub use types::{CallbackQuery, Chat, InlineQuery, InlineQueryResultGame, Message, Update, User};
