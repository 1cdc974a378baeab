//! Score reporting from the game front-end: validates the payload and forwards it to setGameScore.

use crate::telegram::BotApi;
use serde::{Deserialize, Serialize};

pub const CORS_HEADERS: [(&str, &str); 4] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Headers", "Content-Type"),
    ("Access-Control-Allow-Methods", "OPTIONS,POST"),
    ("Content-Type", "application/json"),
];

/// Body POSTed by the game page. `messageId` is the inline message id from the launch URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub message_id: String,
}

impl ScoreRequest {
    /// All three fields are required; a zero score counts as missing.
    pub fn is_complete(&self) -> bool {
        !self.user_id.is_empty() && self.score != 0 && !self.message_id.is_empty()
    }
}

#[derive(Debug, Serialize)]
struct ScoreBody<'a> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

/// Response for the score endpoint. Always sent with [`CORS_HEADERS`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreResponse {
    pub status_code: u16,
    pub body: String,
}

impl ScoreResponse {
    fn json(status_code: u16, error: Option<&str>) -> Self {
        let body = serde_json::to_string(&ScoreBody {
            success: error.is_none(),
            error,
        })
        .unwrap_or_default();
        Self { status_code, body }
    }

    fn preflight() -> Self {
        Self {
            status_code: 200,
            body: String::new(),
        }
    }
}

/// Handle one score request. `method` is the HTTP method; OPTIONS answers the CORS preflight.
pub async fn handle_score(bot: &dyn BotApi, method: &str, body: &[u8]) -> ScoreResponse {
    log::info!("score request: method {}, body length {}", method, body.len());
    if method.eq_ignore_ascii_case("OPTIONS") {
        return ScoreResponse::preflight();
    }

    let req: ScoreRequest = match serde_json::from_slice(body) {
        Ok(r) => r,
        Err(e) => {
            log::warn!("score: invalid body: {}", e);
            return ScoreResponse::json(400, Some("Invalid request body"));
        }
    };
    if !req.is_complete() {
        log::warn!(
            "score: missing fields: userId={:?} score={} messageId={:?}",
            req.user_id,
            req.score,
            req.message_id
        );
        return ScoreResponse::json(400, Some("Missing required fields"));
    }

    if let Err(e) = bot
        .set_game_score(&req.message_id, &req.user_id, req.score)
        .await
    {
        log::warn!("score: setGameScore failed: {}", e);
        let msg = format!("Failed to update score: {}", e);
        return ScoreResponse::json(500, Some(&msg));
    }
    log::info!("score updated for user {}", req.user_id);
    ScoreResponse::json(200, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completeness() {
        let full = ScoreRequest {
            user_id: "7".to_string(),
            score: 12,
            message_id: "m1".to_string(),
        };
        assert!(full.is_complete());
        assert!(!ScoreRequest { score: 0, ..full.clone() }.is_complete());
        assert!(!ScoreRequest { user_id: String::new(), ..full.clone() }.is_complete());
        assert!(!ScoreRequest { message_id: String::new(), ..full }.is_complete());
    }

    #[test]
    fn request_parses_camel_case_and_defaults() {
        let r: ScoreRequest = serde_json::from_str(r#"{"userId":"7","score":3}"#).unwrap();
        assert_eq!(r.user_id, "7");
        assert_eq!(r.score, 3);
        assert_eq!(r.message_id, "");
    }

    #[test]
    fn response_bodies() {
        assert_eq!(ScoreResponse::json(200, None).body, r#"{"success":true}"#);
        assert_eq!(
            ScoreResponse::json(400, Some("Missing required fields")).body,
            r#"{"success":false,"error":"Missing required fields"}"#
        );
    }
}
