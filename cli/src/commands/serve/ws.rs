//! # WebSocket Transport
//!
//! File: cli/src/commands/serve/ws.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! `GET /ws` upgrades to a WebSocket that speaks small JSON event envelopes,
//! shaped like the events a Socket.IO client emits:
//!
//! ```text
//! -> {"event": "user_message", "data": {"query": "take me home"}}
//! <- {"event": "bot_response", "data": {"response": "...", "route": "/"}}
//! ```
//!
//! `route` is left out of the outbound data when there is none. A text frame
//! that is not a recognizable envelope is dispatched as the query itself, and
//! every text frame gets exactly one `bot_response`, in order. Binary frames
//! are ignored; ping/pong is answered by axum.
//!
use super::handlers::peer_address;
use super::state::AppState;
use crate::common::dispatch::BotReply;
use crate::common::request_log::RequestLogEntry;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::http::Extensions;
use axum::response::Response;
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

const USER_MESSAGE: &str = "user_message";

#[derive(Debug, Deserialize)]
struct ClientEnvelope {
    event: String,
    #[serde(default)]
    data: Option<MessageData>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MessageData {
    Object {
        #[serde(default)]
        query: Option<String>,
    },
    Text(String),
}

impl MessageData {
    fn into_query(self) -> String {
        match self {
            MessageData::Object { query } => query.unwrap_or_default(),
            MessageData::Text(query) => query,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
enum ServerEvent {
    BotResponse(BotResponse),
}

#[derive(Debug, Serialize)]
struct BotResponse {
    response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    route: Option<String>,
}

impl From<BotReply> for ServerEvent {
    fn from(reply: BotReply) -> Self {
        ServerEvent::BotResponse(BotResponse {
            response: reply.response,
            route: reply.route,
        })
    }
}

/// Extracts the query from an inbound text frame.
///
/// A `user_message` envelope whose `data` or `query` is missing or null
/// yields an empty query.
fn parse_inbound(text: &str) -> String {
    match serde_json::from_str::<ClientEnvelope>(text) {
        Ok(envelope) if envelope.event == USER_MESSAGE => envelope
            .data
            .map(MessageData::into_query)
            .unwrap_or_default(),
        Ok(envelope) => {
            debug!("Unknown event '{}', using the frame as the query", envelope.event);
            text.to_string()
        }
        Err(e) => {
            debug!("Frame is not a user_message envelope ({}), using it as the query", e);
            text.to_string()
        }
    }
}

/// Records, dispatches, and serializes the reply to one inbound text frame.
async fn respond(state: &AppState, peer: &str, text: &str) -> String {
    state
        .log
        .record(RequestLogEntry::now(peer, "WS", USER_MESSAGE));
    let query = parse_inbound(text);
    let reply = state.dispatcher.handle(&query).await;
    debug!("bot_response to {} from the {} branch", peer, reply.source.as_str());
    match serde_json::to_string(&ServerEvent::from(reply)) {
        Ok(json) => json,
        Err(e) => {
            // Plain strings only; unreachable in practice.
            error!("Failed to serialize bot_response: {}", e);
            r#"{"event":"bot_response","data":{"response":""}}"#.to_string()
        }
    }
}

/// `GET /ws`
pub async fn ws_handler(
    State(state): State<AppState>,
    extensions: Extensions,
    ws: WebSocketUpgrade,
) -> Response {
    let peer = peer_address(&extensions);
    ws.on_upgrade(move |socket| handle_socket(socket, state, peer))
}

async fn handle_socket(socket: WebSocket, state: AppState, peer: String) {
    info!("Client connected: {}", peer);
    let (mut sender, mut receiver) = socket.split();

    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                let outbound = respond(&state, &peer, text.as_str()).await;
                if let Err(e) = sender.send(Message::Text(outbound.into())).await {
                    warn!("Failed to send bot_response to {}: {}", peer, e);
                    break;
                }
            }
            Ok(Message::Close(_)) => break,
            Ok(Message::Binary(_)) => debug!("Ignoring binary frame from {}", peer),
            Ok(_) => {}
            Err(e) => {
                warn!("WebSocket error from {}: {}", peer, e);
                break;
            }
        }
    }

    info!("Client disconnected: {}", peer);
}
