#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use clinical_summarizer::{
    backend::{GenerationBackend, GenerationOptions},
    config::Mode,
    nlp::SummarizerService,
    SummarizerError, SummarizerResult,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Scripted backend recording every prompt it receives.
#[derive(Clone, Default)]
pub struct MockBackend {
    replies: Arc<Mutex<VecDeque<Result<String, String>>>>,
    pub prompts: Arc<Mutex<Vec<String>>>,
    pub calls: Arc<AtomicUsize>,
}

impl MockBackend {
    pub fn replying<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::scripted(replies.into_iter().map(|r| Ok(r.into())))
    }

    pub fn scripted<I>(replies: I) -> Self
    where
        I: IntoIterator<Item = Result<String, String>>,
    {
        Self {
            replies: Arc::new(Mutex::new(replies.into_iter().collect())),
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn service(&self, mode: Mode) -> SummarizerService {
        SummarizerService::with_backend(mode, Box::new(self.clone()), GenerationOptions::default())
    }
}

#[async_trait]
impl GenerationBackend for MockBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn generate(
        &self,
        prompt: &str,
        _options: &GenerationOptions,
    ) -> SummarizerResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(SummarizerError::unavailable("mock", message)),
            None => Err(SummarizerError::unavailable("mock", "no scripted reply")),
        }
    }
}

/// Bind `router` on an ephemeral localhost port and return its base URL.
pub async fn spawn_server(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// Requests observed by a fake server.
#[derive(Clone, Default)]
pub struct Captured {
    pub paths: Arc<Mutex<Vec<String>>>,
    pub api_keys: Arc<Mutex<Vec<String>>>,
    pub bodies: Arc<Mutex<Vec<Value>>>,
}

#[derive(Clone)]
struct FakeState {
    status: StatusCode,
    reply: Value,
    captured: Captured,
}

/// Fake Gemini `generateContent` endpoint answering with `status` and `reply`.
pub async fn fake_gemini(status: StatusCode, reply: Value) -> (String, Captured) {
    let captured = Captured::default();
    let state = FakeState {
        status,
        reply,
        captured: captured.clone(),
    };
    let router = Router::new()
        .route("/models/:call", post(gemini_handler))
        .with_state(state);
    (spawn_server(router).await, captured)
}

/// Gemini response body carrying `text` as the single candidate.
pub fn gemini_reply(text: &str) -> Value {
    json!({
        "candidates": [
            { "content": { "role": "model", "parts": [ { "text": text } ] } }
        ]
    })
}

async fn gemini_handler(
    State(state): State<FakeState>,
    Path(call): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.captured.paths.lock().unwrap().push(call);
    if let Some(key) = headers.get("x-goog-api-key").and_then(|v| v.to_str().ok()) {
        state.captured.api_keys.lock().unwrap().push(key.to_string());
    }
    state.captured.bodies.lock().unwrap().push(body);
    (state.status, Json(state.reply.clone()))
}

/// Fake Ollama-style server listing `models` and answering generations with `reply`.
pub async fn fake_local(models: &[&str], reply: LocalReply) -> (String, Captured) {
    let captured = Captured::default();
    let tags = json!({
        "models": models.iter().map(|name| json!({ "name": name })).collect::<Vec<_>>()
    });
    let state = LocalState {
        tags,
        reply,
        captured: captured.clone(),
    };
    let router = Router::new()
        .route("/api/tags", get(local_tags))
        .route("/api/generate", post(local_generate))
        .with_state(state);
    (spawn_server(router).await, captured)
}

#[derive(Clone)]
pub enum LocalReply {
    /// Reply with this exact text.
    Text(String),
    /// Reply with the prompt followed by this continuation.
    EchoThen(String),
    /// Fail with HTTP 500.
    Error,
}

#[derive(Clone)]
struct LocalState {
    tags: Value,
    reply: LocalReply,
    captured: Captured,
}

async fn local_tags(State(state): State<LocalState>) -> Json<Value> {
    Json(state.tags.clone())
}

async fn local_generate(
    State(state): State<LocalState>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let prompt = body["prompt"].as_str().unwrap_or_default().to_string();
    state.captured.bodies.lock().unwrap().push(body);
    match &state.reply {
        LocalReply::Text(text) => (StatusCode::OK, Json(json!({ "response": text, "done": true }))),
        LocalReply::EchoThen(text) => (
            StatusCode::OK,
            Json(json!({ "response": format!("{prompt}{text}"), "done": true })),
        ),
        LocalReply::Error => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "model crashed" })),
        ),
    }
}
