//! Gateway HTTP server (single port).

use crate::config::Settings;
use crate::dispatch::{Dispatcher, WebhookEvent, BODY_INVALID_UPDATE};
use crate::score::{self, CORS_HEADERS};
use crate::telegram::{BotApi, TelegramClient};
use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use subtle::ConstantTimeEq;

const SECRET_HEADER: &str = "X-Telegram-Bot-Api-Secret-Token";

/// Shared state for the gateway (dispatcher, bot handle, webhook secret).
#[derive(Clone)]
pub struct GatewayState {
    pub dispatcher: Dispatcher,
    pub bot: Arc<dyn BotApi>,
    /// When Some, webhook POSTs must carry a matching secret header.
    pub webhook_secret: Option<String>,
    pub port: u16,
}

impl GatewayState {
    pub fn new(bot: Arc<dyn BotApi>, settings: &Settings) -> Self {
        Self {
            dispatcher: Dispatcher::new(bot.clone(), settings.game.clone()),
            bot,
            webhook_secret: settings.webhook_secret.clone(),
            port: settings.port,
        }
    }
}

/// Routes: `GET /` health, `POST /telegram/webhook`, `POST|OPTIONS /score`.
pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/", get(health_http))
        .route("/telegram/webhook", post(telegram_webhook))
        .route("/score", post(score_http).options(score_http))
        .with_state(state)
}

/// Run the gateway server; binds to settings.bind:settings.port.
/// Registers the webhook when `webhook_url` is set and removes it again on shutdown.
/// Blocks until shutdown (e.g. Ctrl+C).
pub async fn run_gateway(settings: Settings) -> Result<()> {
    let telegram = Arc::new(TelegramClient::new(
        settings.bot_token.clone(),
        Some(settings.api_base.clone()),
    ));

    let registered_webhook = match settings.webhook_url.as_deref() {
        Some(url) => match telegram
            .set_webhook(url, settings.webhook_secret.as_deref())
            .await
        {
            Ok(()) => {
                log::info!("telegram webhook registered: {}", url);
                true
            }
            Err(e) => {
                log::warn!("telegram set_webhook failed: {}", e);
                false
            }
        },
        None => {
            log::info!("telegram webhook url not configured; expecting an externally registered webhook");
            false
        }
    };

    let state = GatewayState::new(telegram.clone(), &settings);
    let app = build_router(state);

    let bind_addr = format!("{}:{}", settings.bind, settings.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding to {}", bind_addr))?;
    log::info!(
        "gateway listening on {} (game {})",
        bind_addr,
        settings.game.short_name
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(registered_webhook.then_some(telegram)))
        .await
        .context("gateway server exited")?;
    log::info!("gateway stopped");
    Ok(())
}

/// Future that completes when the process should shut down (SIGINT or SIGTERM).
/// Removes the webhook if this process registered it.
async fn shutdown_signal(telegram_webhook: Option<Arc<TelegramClient>>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::warn!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                log::warn!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::info!("shutdown signal received, draining connections");

    if let Some(t) = telegram_webhook {
        if let Err(e) = t.delete_webhook().await {
            log::debug!("telegram delete_webhook on shutdown: {}", e);
        }
    }
}

/// Compare the webhook secret header in constant time.
fn secret_matches(provided: &str, expected: &str) -> bool {
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}

/// POST /telegram/webhook — verifies the optional secret, then hands the body to the dispatcher.
async fn telegram_webhook(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, String) {
    if let Some(ref expected) = state.webhook_secret {
        let provided = headers
            .get(SECRET_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        if !secret_matches(provided, expected) {
            log::warn!("webhook secret mismatch");
            return (StatusCode::FORBIDDEN, "Forbidden".to_string());
        }
    }

    let event = if body.is_empty() {
        WebhookEvent::default()
    } else {
        match String::from_utf8(body.to_vec()) {
            Ok(s) => WebhookEvent::new(s),
            Err(_) => return (StatusCode::BAD_REQUEST, BODY_INVALID_UPDATE.to_string()),
        }
    };

    let res = state.dispatcher.handle(&event).await;
    let status = StatusCode::from_u16(res.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, res.body)
}

/// POST|OPTIONS /score — forwards a game score to setGameScore.
async fn score_http(State(state): State<GatewayState>, method: Method, body: Bytes) -> Response {
    let res = score::handle_score(state.bot.as_ref(), method.as_str(), &body).await;
    let status = StatusCode::from_u16(res.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, CORS_HEADERS, res.body).into_response()
}

/// GET / returns a simple health JSON (for probes).
async fn health_http(State(state): State<GatewayState>) -> Json<serde_json::Value> {
    Json(json!({
        "runtime": "running",
        "game": state.dispatcher.game().short_name,
        "port": state.port,
    }))
}
