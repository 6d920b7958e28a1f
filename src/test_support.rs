//! Scripted transports and canned responses shared by the async tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::{
    error::{GenerationError, Result},
    inference::{InferenceCall, InferenceTransport},
    normalizer::RawApiResponse,
};

pub const TEST_KEY: &str = "hf_test_secret_key";

#[derive(Debug, Clone)]
pub enum Script {
    Respond(RawApiResponse),
    RespondAfter(Duration, RawApiResponse),
    Fail(String),
    Hang,
}

/// Answers each slot according to its script; unscripted slots get `fallback`.
pub struct ScriptedTransport {
    scripts: HashMap<usize, Script>,
    fallback: Script,
    calls: AtomicUsize,
    seen: Mutex<Vec<InferenceCall>>,
}

impl ScriptedTransport {
    pub fn new(fallback: Script) -> Self {
        Self {
            scripts: HashMap::new(),
            fallback,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn with_slot(mut self, slot: usize, script: Script) -> Self {
        self.scripts.insert(slot, script);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen_calls(&self) -> Vec<InferenceCall> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl InferenceTransport for ScriptedTransport {
    async fn send(&self, call: &InferenceCall) -> Result<RawApiResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(call.clone());

        let script = self
            .scripts
            .get(&call.slot)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone());

        match script {
            Script::Respond(response) => Ok(response),
            Script::RespondAfter(delay, response) => {
                tokio::time::sleep(delay).await;
                Ok(response)
            }
            Script::Fail(msg) => Err(GenerationError::transport(msg)),
            Script::Hang => futures::future::pending().await,
        }
    }
}

pub fn png_response() -> RawApiResponse {
    RawApiResponse::new(200, Some("image/png"), vec![0x89, b'P', b'N', b'G'])
}

pub fn base64_response(payload: &str) -> RawApiResponse {
    RawApiResponse::new(
        200,
        Some("application/json"),
        json!({ "images": [payload] }).to_string(),
    )
}

pub fn error_response(status: u16, body: &str) -> RawApiResponse {
    RawApiResponse::new(status, Some("application/json"), body)
}

pub fn malformed_json_response() -> RawApiResponse {
    RawApiResponse::new(200, Some("application/json"), "{\"images\": [")
}
