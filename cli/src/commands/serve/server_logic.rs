//! # hogbot HTTP Server Implementation
//!
//! File: cli/src/commands/serve/server_logic.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Builds the Axum application and runs it until Ctrl+C or SIGTERM:
//! - `/` status page, `/bot` JSON endpoint, `/ws` WebSocket events
//! - request recording into the in-memory request log
//! - request tracing and CORS (allow-list, or permissive when none is configured)
//! - graceful shutdown
//!
//! ## Architecture
//!
//! 1. Build the dispatcher (HTTP engine, gateway, tables) from `BotConfig`
//! 2. Create the router with middleware via `create_app`
//! 3. Bind the configured address (no automatic port fallback; clients expect a fixed port)
//! 4. Print the startup banner and serve with peer-address info
//!
//! ## Examples
//!
//! ```rust
//! let config = config::load_serve_config(&args)?;
//! server_logic::run_server(config).await?;
//! ```
//!
use super::handlers;
use super::state::AppState;
use super::ws;
use crate::common::request_log::RequestLog;
use crate::core::config::BotConfig;
use crate::core::error::{BotError, Result};
use anyhow::{anyhow, Context};
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::{middleware, Router};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{debug, error, info, Level};

/// # Run HTTP Server (`run_server`)
///
/// Builds the application from `config`, binds the listener, and serves
/// until a shutdown signal arrives.
///
/// ## Errors
///
/// Returns an error if the engine client cannot be created, a CORS origin
/// is unusable, the address cannot be bound, or the server fails.
pub async fn run_server(config: BotConfig) -> Result<()> {
    let dispatcher = config.build_dispatcher()?;
    let gateway = dispatcher.gateway();
    let engine = gateway.engine_description();
    let profile = gateway.profile();
    info!("Generation parameters: {:?}", gateway.params());
    debug!("Failure message: {}", gateway.failure_message());
    let state = AppState::new(dispatcher, RequestLog::new(), config.server.status_entries);
    let app = create_app(state, &config.server.cors_origins)?;

    let addr = SocketAddr::new(config.server.host, config.server.port);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind TCP listener to address {}", addr))?;

    println!("\n=================================================================");
    println!("🐗 Hogist Voice Bot Server Running");
    println!("🌐 HTTP:      http://{}/bot?query=...", addr);
    println!("🔌 WebSocket: ws://{}/ws", addr);
    println!("🧠 Engine:    {}", engine);
    println!("🎛️  Profile:   {}", profile);
    println!(
        "🔒 CORS:      {}",
        if config.server.cors_origins.is_empty() {
            "any origin".to_string()
        } else {
            config.server.cors_origins.join(", ")
        }
    );
    println!(
        "📋 Tables:    {} intents, {} knowledge entries",
        config.intents.entries().len(),
        config.knowledge.entries().len()
    );
    for source in &config.sources {
        println!("📄 Config:    {}", source.display());
    }
    println!("=================================================================\n");

    info!("Starting server on {}", addr);
    println!("Server starting! Press Ctrl+C to stop.");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| anyhow!(BotError::Server(e.to_string())))
    .context("HTTP server failed")?;

    println!("\nServer shutdown complete.");
    Ok(())
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, initiating graceful shutdown..."),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
                info!("Received SIGTERM, initiating graceful shutdown...");
            }
            Err(e) => {
                error!(
                    "Failed to install SIGTERM handler: {}. Shutdown on SIGTERM might not work.",
                    e
                );
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
}

/// Allow-list CORS, or permissive when `origins` is empty or contains `*`.
fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        info!("CORS middleware enabled (permissive).");
        return Ok(CorsLayer::permissive());
    }
    let values = origins
        .iter()
        .map(|o| {
            HeaderValue::from_str(o)
                .map_err(|_| anyhow!(BotError::Config(format!("Invalid CORS origin: '{}'.", o))))
        })
        .collect::<Result<Vec<_>>>()?;
    info!("CORS middleware enabled for {} origin(s).", values.len());
    Ok(CorsLayer::new()
        .allow_origin(values)
        .allow_methods([Method::GET])
        .allow_headers(Any))
}

/// # Create Axum Application (`create_app`)
///
/// Routes plus middleware. The recording middleware sits inside tracing and
/// CORS, so preflight requests answered by CORS are not recorded.
pub fn create_app(state: AppState, cors_origins: &[String]) -> Result<Router> {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::default().include_headers(true))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let router = Router::new()
        .route("/", get(handlers::status_page))
        .route("/bot", get(handlers::bot_query))
        .route("/ws", get(ws::ws_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            handlers::record_request,
        ))
        .layer(
            ServiceBuilder::new()
                .layer(trace_layer)
                .layer(cors_layer(cors_origins)?),
        )
        .with_state(state);
    Ok(router)
}
