//! # HTTP Handlers
//!
//! File: cli/src/commands/serve/handlers.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Handlers for the plain HTTP routes and the request-recording middleware:
//!
//! - `GET /`: the diagnostic status page
//! - `GET /bot?query=...`: one dispatch, answered as JSON
//! - `record_request`: appends every inbound request to the request log
//!
//! `/bot` never answers with anything but `200`. A missing or unparseable
//! query string is treated as an empty query, which takes the fallback path.
//!
use super::state::AppState;
use crate::common::dispatch::BotReply;
use crate::common::request_log::RequestLogEntry;
use crate::core::templating::{self, StatusPage, BANNER};
use axum::extract::rejection::QueryRejection;
use axum::extract::{ConnectInfo, Query, Request, State};
use axum::http::{Extensions, StatusCode};
use axum::middleware::Next;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use std::net::SocketAddr;
use tracing::{debug, error, warn};

#[derive(Debug, Deserialize, Default)]
pub struct BotQuery {
    #[serde(default)]
    pub query: String,
}

/// Peer address recorded by `into_make_service_with_connect_info`, if present.
pub fn peer_address(extensions: &Extensions) -> String {
    extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Records method, URL, and peer of every request before passing it on.
pub async fn record_request(State(state): State<AppState>, req: Request, next: Next) -> Response {
    state.log.record(RequestLogEntry::now(
        peer_address(req.extensions()),
        req.method().as_str(),
        req.uri().to_string(),
    ));
    next.run(req).await
}

/// `GET /bot`
pub async fn bot_query(
    State(state): State<AppState>,
    query: Result<Query<BotQuery>, QueryRejection>,
) -> Json<BotReply> {
    let query = match query {
        Ok(Query(q)) => q.query,
        Err(rejection) => {
            warn!("Unreadable query string, treating as empty: {}", rejection);
            String::new()
        }
    };
    let reply = state.dispatcher.handle(&query).await;
    debug!("GET /bot answered from the {} branch", reply.source.as_str());
    Json(reply)
}

/// `GET /`
pub async fn status_page(State(state): State<AppState>) -> Response {
    let gateway = state.dispatcher.gateway();
    let page = StatusPage {
        banner: BANNER,
        engine: gateway.engine_description(),
        profile: gateway.profile().as_str(),
        total_logged: state.log.len(),
        capacity: state.log.capacity(),
        entries: state.log.recent(state.status_entries),
    };
    match templating::render_status_page(&page) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("Failed to render status page: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, BANNER).into_response()
        }
    }
}
