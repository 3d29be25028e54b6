/// LLM Client: the single point of entry for chat-completion calls.
///
/// Talks to an OpenAI-compatible `/chat/completions` endpoint (by default the
/// AI proxy configured in `Config`). One request per question, no retries:
/// an upstream failure fails the request that triggered it.
///
/// Model: gpt-4o-mini (hardcoded, the proxy only serves this model)
use async_trait::async_trait;
use reqwest::{header::HeaderMap, Client};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

pub mod prompts;

/// The model used for every completion.
pub const MODEL: &str = "gpt-4o-mini";
const TEMPERATURE: f64 = 0.2;
const MAX_TOKENS: u32 = 500;
/// Usage headers the proxy attaches to each response.
const USAGE_HEADERS: [&str; 3] = ["cost", "monthlycost", "monthlyrequests"];

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// System and user instructions for one completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

/// Anything that can turn a prompt into an answer.
///
/// Carried in `AppState` as `Arc<dyn Completer>` so handlers don't care
/// whether the answer comes from the proxy or a test stub.
#[async_trait]
pub trait Completer: Send + Sync {
    async fn complete(&self, prompt: &PromptPair) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

impl<'a> ChatCompletionRequest<'a> {
    /// System message first, then the user message.
    fn new(prompt: &'a PromptPair) -> Self {
        Self {
            model: MODEL,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatCompletionResponse {
    /// Trimmed text of the first choice.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .map(str::trim)
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Chat-completion client bound to one base URL and token.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl LlmClient {
    pub fn new(api_key: String, base_url: &str) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().build()?,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Makes one call to `/chat/completions` and returns the full response.
    pub async fn call(&self, prompt: &PromptPair) -> Result<ChatCompletionResponse, LlmError> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&ChatCompletionRequest::new(prompt))
            .send()
            .await?;

        let status = response.status();
        log_usage_headers(response.headers());
        let body = response.text().await?;

        if !status.is_success() {
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: api_error_message(body),
            });
        }

        let completion: ChatCompletionResponse = serde_json::from_str(&body)?;

        if let Some(usage) = &completion.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        Ok(completion)
    }
}

#[async_trait]
impl Completer for LlmClient {
    async fn complete(&self, prompt: &PromptPair) -> Result<String, LlmError> {
        let response = self.call(prompt).await?;
        response
            .text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }
}

/// Pulls `error.message` out of an OpenAI-style error body, else returns it raw.
fn api_error_message(body: String) -> String {
    serde_json::from_str::<ApiErrorEnvelope>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}

fn log_usage_headers(headers: &HeaderMap) {
    let value = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string()
    };
    let [cost, monthly_cost, monthly_requests] = USAGE_HEADERS.map(value);
    info!("Request cost: {cost}, monthly cost: {monthly_cost}, monthly requests: {monthly_requests}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::{HeaderMap as AxumHeaders, StatusCode},
        response::IntoResponse,
        routing::post,
        Json, Router,
    };
    use serde_json::{json, Value};

    fn prompt() -> PromptPair {
        PromptPair {
            system: "be brief".to_string(),
            user: "Question: 2+2?".to_string(),
        }
    }

    /// Serves `app` on an ephemeral port and returns its base URL.
    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn test_request_body_shape() {
        let p = prompt();
        let value = serde_json::to_value(ChatCompletionRequest::new(&p)).unwrap();
        assert_eq!(
            value,
            json!({
                "model": "gpt-4o-mini",
                "messages": [
                    {"role": "system", "content": "be brief"},
                    {"role": "user", "content": "Question: 2+2?"}
                ],
                "temperature": 0.2,
                "max_tokens": 500
            })
        );
    }

    #[test]
    fn test_response_text_is_trimmed_first_choice() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [
                {"message": {"role": "assistant", "content": "  42\n"}},
                {"message": {"role": "assistant", "content": "ignored"}}
            ]
        }))
        .unwrap();
        assert_eq!(response.text(), Some("42"));
    }

    #[test]
    fn test_response_without_choices_has_no_text() {
        let response: ChatCompletionResponse =
            serde_json::from_value(json!({"choices": []})).unwrap();
        assert_eq!(response.text(), None);
    }

    #[test]
    fn test_api_error_message_extracts_nested_message() {
        let body = r#"{"error": {"message": "quota exceeded", "type": "insufficient_quota"}}"#;
        assert_eq!(api_error_message(body.to_string()), "quota exceeded");
    }

    #[test]
    fn test_api_error_message_falls_back_to_raw_body() {
        assert_eq!(api_error_message("Bad Gateway".to_string()), "Bad Gateway");
    }

    #[tokio::test]
    async fn test_complete_round_trip_against_local_server() {
        let app = Router::new().route(
            "/chat/completions",
            post(|headers: AxumHeaders, Json(body): Json<Value>| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                let content = format!(
                    "  {auth}|{}|{}|{}  ",
                    body["model"].as_str().unwrap_or_default(),
                    body["max_tokens"],
                    body["messages"][1]["content"].as_str().unwrap_or_default()
                );
                (
                    [("cost", "0.0001")],
                    Json(json!({
                        "choices": [{"message": {"role": "assistant", "content": content}}],
                        "usage": {"prompt_tokens": 10, "completion_tokens": 3}
                    })),
                )
            }),
        );
        let base_url = serve(app).await;

        let client = LlmClient::new("test-token".to_string(), &format!("{base_url}/")).unwrap();
        let answer = client.complete(&prompt()).await.unwrap();

        assert_eq!(answer, "Bearer test-token|gpt-4o-mini|500|Question: 2+2?");
    }

    #[tokio::test]
    async fn test_complete_maps_upstream_error() {
        let app = Router::new().route(
            "/chat/completions",
            post(|| async {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"error": {"message": "Invalid token"}})),
                )
                    .into_response()
            }),
        );
        let base_url = serve(app).await;

        let client = LlmClient::new("bad".to_string(), &base_url).unwrap();
        let err = client.complete(&prompt()).await.unwrap_err();

        match err {
            LlmError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid token");
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_complete_null_content_is_empty_content() {
        let app = Router::new().route(
            "/chat/completions",
            post(|| async { Json(json!({"choices": [{"message": {"content": null}}]})) }),
        );
        let base_url = serve(app).await;

        let client = LlmClient::new("t".to_string(), &base_url).unwrap();
        let err = client.complete(&prompt()).await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyContent));
    }
}
