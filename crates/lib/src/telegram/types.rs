//! Subset of Telegram update types consumed by the bot.

use serde::{Deserialize, Serialize};

/// Telegram update payload (webhook POST body). Every field is optional; unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Update {
    #[serde(default)]
    pub update_id: Option<i64>,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub inline_query: Option<InlineQuery>,
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub chat: Option<Chat>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct User {
    pub id: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InlineQuery {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    #[serde(default)]
    pub game_short_name: Option<String>,
    #[serde(default)]
    pub from: Option<User>,
    #[serde(default)]
    pub inline_message_id: Option<String>,
}

/// Inline result that posts the game message into the chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineQueryResultGame {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    pub game_short_name: String,
}

impl InlineQueryResultGame {
    /// Result whose id and game are both the game short name.
    pub fn new(game_short_name: &str) -> Self {
        Self {
            kind: "game".to_string(),
            id: game_short_name.to_string(),
            game_short_name: game_short_name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_without_update_id_parses() {
        let u: Update =
            serde_json::from_str(r#"{"message":{"text":"/start","chat":{"id":42}}}"#).unwrap();
        assert_eq!(u.update_id, None);
        let msg = u.message.unwrap();
        assert_eq!(msg.text.as_deref(), Some("/start"));
        assert_eq!(msg.chat, Some(Chat { id: 42 }));
    }

    #[test]
    fn callback_query_optional_fields() {
        let u: Update =
            serde_json::from_str(r#"{"callback_query":{"id":"c1","game_short_name":"other"}}"#)
                .unwrap();
        let q = u.callback_query.unwrap();
        assert_eq!(q.id, "c1");
        assert!(q.from.is_none());
        assert!(q.inline_message_id.is_none());
    }

    #[test]
    fn inline_result_serializes_with_type_field() {
        let v = serde_json::to_value(InlineQueryResultGame::new("snake4d")).unwrap();
        assert_eq!(
            v,
            serde_json::json!({ "type": "game", "id": "snake4d", "game_short_name": "snake4d" })
        );
    }
}
