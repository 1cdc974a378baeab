//! Dispatcher behaviour end to end against a recording Bot API stub.

mod common;

use common::{Call, RecordingBot};
use snakebot::config::GameSettings;
use snakebot::dispatch::{Dispatcher, ResponseEnvelope, WebhookEvent};
use snakebot::telegram::InlineQueryResultGame;
use std::sync::Arc;

const WELCOME: &str =
    "Welcome to the Snake 4D Game Bot! Use @snake4dbot followed by some text in any chat to start playing.";

fn dispatcher() -> (Dispatcher, Arc<RecordingBot>) {
    let bot = Arc::new(RecordingBot::default());
    (Dispatcher::new(bot.clone(), GameSettings::default()), bot)
}

fn envelope(status_code: u16, body: &str) -> ResponseEnvelope {
    ResponseEnvelope {
        status_code,
        body: body.to_string(),
    }
}

#[tokio::test]
async fn missing_body_is_rejected_without_outbound_call() {
    let (d, bot) = dispatcher();
    assert_eq!(
        d.handle(&WebhookEvent::default()).await,
        envelope(400, "Invalid request body")
    );
    assert_eq!(
        d.handle(&WebhookEvent::new("")).await,
        envelope(400, "Invalid request body")
    );
    assert!(bot.calls().is_empty());
}

#[tokio::test]
async fn start_sends_welcome_text() {
    let (d, bot) = dispatcher();
    let res = d
        .handle(&WebhookEvent::new(r#"{"message":{"text":"/start","chat":{"id":42}}}"#))
        .await;
    assert_eq!(res, ResponseEnvelope::ok());
    assert_eq!(bot.calls(), vec![Call::SendMessage(42, WELCOME.to_string())]);
}

#[tokio::test]
async fn game_command_sends_game() {
    let (d, bot) = dispatcher();
    let res = d
        .handle(&WebhookEvent::new(r#"{"message":{"text":"/game","chat":{"id":42}}}"#))
        .await;
    assert_eq!(res, envelope(200, "OK"));
    assert_eq!(bot.calls(), vec![Call::SendGame(42, "snake4d".to_string())]);
}

#[tokio::test]
async fn other_text_is_acknowledged_without_call() {
    let (d, bot) = dispatcher();
    let res = d
        .handle(&WebhookEvent::new(r#"{"message":{"text":"hello","chat":{"id":42}}}"#))
        .await;
    assert_eq!(res, envelope(200, "OK"));
    assert!(bot.calls().is_empty());
}

#[tokio::test]
async fn inline_query_answered_with_single_game_result() {
    let (d, bot) = dispatcher();
    let res = d
        .handle(&WebhookEvent::new(r#"{"inline_query":{"id":"q1"}}"#))
        .await;
    assert_eq!(res, envelope(200, "OK"));
    assert_eq!(
        bot.calls(),
        vec![Call::AnswerInlineQuery(
            "q1".to_string(),
            vec![InlineQueryResultGame {
                kind: "game".to_string(),
                id: "snake4d".to_string(),
                game_short_name: "snake4d".to_string(),
            }]
        )]
    );
}

#[tokio::test]
async fn game_callback_answered_with_launch_url() {
    let (d, bot) = dispatcher();
    let res = d
        .handle(&WebhookEvent::new(
            r#"{"callback_query":{"id":"c1","game_short_name":"snake4d","from":{"id":7},"inline_message_id":"m1"}}"#,
        ))
        .await;
    assert_eq!(res, envelope(200, "OK"));
    assert_eq!(
        bot.calls(),
        vec![Call::AnswerCallbackQuery(
            "c1".to_string(),
            "https://snake4d.netlify.app/#userId=7&messageId=m1".to_string()
        )]
    );
}

#[tokio::test]
async fn callback_for_other_game_is_ignored() {
    let (d, bot) = dispatcher();
    let res = d
        .handle(&WebhookEvent::new(
            r#"{"callback_query":{"id":"c1","game_short_name":"other"}}"#,
        ))
        .await;
    assert_eq!(res, envelope(200, "OK"));
    assert!(bot.calls().is_empty());
}

#[tokio::test]
async fn unrecognized_update_is_acknowledged() {
    let (d, bot) = dispatcher();
    let res = d
        .handle(&WebhookEvent::new(r#"{"update_id":10,"edited_message":{"text":"x"}}"#))
        .await;
    assert_eq!(res, envelope(200, "OK"));
    assert!(bot.calls().is_empty());
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let (d, bot) = dispatcher();
    let res = d.handle(&WebhookEvent::new("{not json")).await;
    assert_eq!(res, envelope(400, "Invalid update format"));
    assert!(bot.calls().is_empty());
}

#[tokio::test]
async fn outbound_failure_surfaces_as_server_error() {
    let bot = Arc::new(RecordingBot::failing());
    let d = Dispatcher::new(bot.clone(), GameSettings::default());
    let res = d
        .handle(&WebhookEvent::new(r#"{"message":{"text":"/game","chat":{"id":1}}}"#))
        .await;
    assert_eq!(res, envelope(500, "Failed to process update"));
    assert_eq!(bot.calls().len(), 1);
}

#[tokio::test]
async fn identical_input_produces_identical_calls() {
    let (d, bot) = dispatcher();
    let event = WebhookEvent::new(
        r#"{"callback_query":{"id":"c1","game_short_name":"snake4d","from":{"id":7},"inline_message_id":"m1"}}"#,
    );
    let first = d.handle(&event).await;
    let second = d.handle(&event).await;
    assert_eq!(first, second);
    let calls = bot.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], calls[1]);
}

#[tokio::test]
async fn custom_game_settings_are_used() {
    let bot = Arc::new(RecordingBot::default());
    let game = GameSettings::new("tetris", "https://tetris.example/", "@tetrisbot");
    let d = Dispatcher::new(bot.clone(), game);

    d.handle(&WebhookEvent::new(r#"{"message":{"text":"/start","chat":{"id":1}}}"#))
        .await;
    d.handle(&WebhookEvent::new(
        r#"{"callback_query":{"id":"c","game_short_name":"tetris","from":{"id":2},"inline_message_id":"im"}}"#,
    ))
    .await;
    d.handle(&WebhookEvent::new(
        r#"{"callback_query":{"id":"c","game_short_name":"snake4d","from":{"id":2}}}"#,
    ))
    .await;

    assert_eq!(
        bot.calls(),
        vec![
            Call::SendMessage(
                1,
                "Welcome to the Snake 4D Game Bot! Use @tetrisbot followed by some text in any chat to start playing."
                    .to_string()
            ),
            Call::AnswerCallbackQuery(
                "c".to_string(),
                "https://tetris.example/#userId=2&messageId=im".to_string()
            ),
        ]
    );
}
