//! # HTTP Generation Engine
//!
//! File: cli/src/common/generation/http.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! `HttpEngine` calls a locally hosted inference server that exposes a
//! pipeline-style endpoint:
//!
//! ```text
//! POST <endpoint>
//! {"inputs": "<prompt>", "model": "<model>", "parameters": {"max_length": 50, ...}}
//!
//! 200 OK
//! [{"generated_text": "..."}]        (or a single {"generated_text": "..."})
//! ```
//!
//! Tokenization, model execution, and sampling all happen on the server side.
//! No timeout or retry is applied: a slow engine simply makes the caller wait.
//!
use super::{GenerationError, GenerationParams, TextEngine};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Engine reached over HTTP.
pub struct HttpEngine {
    client: Client,
    endpoint: String,
    model: Option<String>,
}

#[derive(Serialize)]
struct EngineRequest<'a> {
    inputs: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    parameters: &'a GenerationParams,
}

#[derive(Deserialize)]
struct Candidate {
    generated_text: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EngineResponse {
    Many(Vec<Candidate>),
    One(Candidate),
}

impl HttpEngine {
    pub fn new(endpoint: &str, model: Option<String>) -> Result<Self, GenerationError> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            model,
        })
    }
}

#[async_trait]
impl TextEngine for HttpEngine {
    fn describe(&self) -> String {
        match &self.model {
            Some(model) => format!("{} ({})", self.endpoint, model),
            None => self.endpoint.clone(),
        }
    }

    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<Vec<String>, GenerationError> {
        let body = EngineRequest {
            inputs: prompt,
            model: self.model.as_deref(),
            parameters: params,
        };

        let response = self.client.post(&self.endpoint).json(&body).send().await?;
        let status = response.status();
        let text = response.text().await?;
        debug!(
            "Engine response ({}): {}",
            status,
            text.chars().take(500).collect::<String>()
        );

        if !status.is_success() {
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: EngineResponse =
            serde_json::from_str(&text).map_err(|e| GenerationError::Decode(e.to_string()))?;
        let candidates = match parsed {
            EngineResponse::Many(list) => list.into_iter().map(|c| c.generated_text).collect(),
            EngineResponse::One(single) => vec![single.generated_text],
        };
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::generation::{Gateway, GenerationResult, Profile};
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tokio::net::TcpListener;

    /// Serves `router` on an ephemeral local port and returns the `/generate` URL.
    async fn spawn_engine(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/generate", addr)
    }

    #[tokio::test]
    async fn test_forwards_prompt_model_and_parameters() {
        let router = Router::new().route(
            "/generate",
            post(|Json(body): Json<Value>| async move {
                let reply = format!(
                    "{}|{}|{}|{}",
                    body["inputs"].as_str().unwrap_or_default(),
                    body["model"].as_str().unwrap_or_default(),
                    body["parameters"]["max_length"],
                    body["parameters"]["pad_token_id"],
                );
                Json(json!([{ "generated_text": reply }]))
            }),
        );
        let url = spawn_engine(router).await;

        let engine = HttpEngine::new(&url, Some("./local_model".into())).unwrap();
        let out = engine
            .generate("hello", &Profile::Continuation.params())
            .await
            .unwrap();
        assert_eq!(out, vec!["hello|./local_model|50|50256".to_string()]);
    }

    #[tokio::test]
    async fn test_accepts_single_object_response() {
        let router = Router::new().route(
            "/generate",
            post(|| async { Json(json!({ "generated_text": "solo" })) }),
        );
        let url = spawn_engine(router).await;

        let engine = HttpEngine::new(&url, None).unwrap();
        let out = engine
            .generate("x", &Profile::Instruction.params())
            .await
            .unwrap();
        assert_eq!(out, vec!["solo".to_string()]);
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let router = Router::new().route(
            "/generate",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model crashed") }),
        );
        let url = spawn_engine(router).await;

        let engine = HttpEngine::new(&url, None).unwrap();
        let err = engine
            .generate("x", &Profile::Continuation.params())
            .await
            .unwrap_err();
        match err {
            GenerationError::Status { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "model crashed");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_unexpected_shape_is_decode_error() {
        let router = Router::new().route(
            "/generate",
            post(|| async { Json(json!({ "text": "wrong field" })) }),
        );
        let url = spawn_engine(router).await;

        let engine = HttpEngine::new(&url, None).unwrap();
        let err = engine
            .generate("x", &Profile::Continuation.params())
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Decode(_)));
    }

    #[tokio::test]
    async fn test_gateway_over_unreachable_engine_falls_back() {
        // Bind then drop to get a port with nothing listening.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let engine = HttpEngine::new(&format!("http://{}/generate", addr), None).unwrap();
        let gateway = Gateway::with_profile_defaults(Arc::new(engine), Profile::Instruction);
        assert_eq!(
            gateway.generate("anything").await,
            GenerationResult::Fallback(
                "Hmm... I didn't get that. Let's try something else!".into()
            )
        );
    }
}
