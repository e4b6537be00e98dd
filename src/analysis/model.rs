//! The generative-language model the analysis endpoint forwards prompts to.

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// The Gemini REST API.
pub const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// The errors that may occur while generating text.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The model API could not be reached or answered with an error status.
    #[error("the model request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The model answered without any text.
    #[error("the model returned no text")]
    EmptyResponse,
}

/// Something that turns a prompt into text.
#[async_trait]
pub trait GenerativeModel: Send + Sync + Debug {
    /// Generate a response to `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String, ModelError>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// The text parts of the first candidate joined together.
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect();

        (!text.is_empty()).then_some(text)
    }
}

/// A client for Gemini's `generateContent` method.
#[derive(Debug, Clone)]
pub struct Gemini {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl Gemini {
    /// Create a client for `model` on the public API.
    pub fn new(model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_base_url(GEMINI_API_URL, model, api_key)
    }

    /// Send requests to `base_url` instead of the public API.
    pub fn with_base_url(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl GenerativeModel for Gemini {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let request = GenerateRequest {
            contents: [Content {
                parts: [RequestPart { text: prompt }],
            }],
        };

        let response: GenerateResponse = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        response.into_text().ok_or(ModelError::EmptyResponse)
    }
}

#[cfg(test)]
mod gemini_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json, Router,
        http::{HeaderMap, StatusCode},
        routing::post,
    };
    use serde_json::{Value, json};
    use tokio::net::TcpListener;

    use super::{Gemini, GenerativeModel, ModelError};

    async fn serve(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await });

        format!("http://{address}")
    }

    #[tokio::test]
    async fn sends_prompt_and_joins_text_parts() {
        let received = Arc::new(Mutex::new((Value::Null, None)));
        let sink = received.clone();
        let app = Router::new().route(
            "/models/{method}",
            post(move |headers: HeaderMap, Json(body): Json<Value>| async move {
                let key = headers
                    .get("x-goog-api-key")
                    .map(|value| value.to_str().unwrap().to_owned());
                *sink.lock().unwrap() = (body, key);

                Json(json!({
                    "candidates": [
                        { "content": { "parts": [{ "text": "1. Save. " }, { "text": "2. Cook." }] } },
                        { "content": { "parts": [{ "text": "ignored" }] } }
                    ]
                }))
            }),
        );
        let model = Gemini::with_base_url(serve(app).await, "gemini-2.5-flash", "secret");

        let text = model.generate("How am I doing?").await.unwrap();

        assert_eq!(text, "1. Save. 2. Cook.");
        let (body, key) = received.lock().unwrap().clone();
        assert_eq!(
            body,
            json!({ "contents": [{ "parts": [{ "text": "How am I doing?" }] }] })
        );
        assert_eq!(key.as_deref(), Some("secret"));
    }

    #[tokio::test]
    async fn no_candidates_is_an_error() {
        let app = Router::new().route(
            "/models/{method}",
            post(|| async { Json(json!({ "candidates": [] })) }),
        );
        let model = Gemini::with_base_url(serve(app).await, "gemini-2.5-flash", "secret");

        let result = model.generate("prompt").await;

        assert!(matches!(result, Err(ModelError::EmptyResponse)));
    }

    #[tokio::test]
    async fn error_status_is_an_error() {
        let app = Router::new().route(
            "/models/{method}",
            post(|| async { StatusCode::FORBIDDEN }),
        );
        let model = Gemini::with_base_url(serve(app).await, "gemini-2.5-flash", "bad key");

        let result = model.generate("prompt").await;

        assert!(matches!(result, Err(ModelError::Request(_))));
    }
}
