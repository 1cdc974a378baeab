//! Snake 4D bot core library — Telegram webhook dispatch, score forwarding, and the HTTP gateway
//! used by the CLI.

pub mod config;
pub mod dispatch;
pub mod gateway;
pub mod score;
pub mod telegram;
