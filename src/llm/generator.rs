//! Core `QueryGenerator` trait and `ApiQueryGenerator` implementation.
//!
//! `ApiQueryGenerator` calls any OpenAI-compatible `/v1/chat/completions`
//! endpoint (Ollama, OpenAI, Groq, LM Studio, vLLM) and turns a complete set
//! of [`SearchCriteria`] into one SQLite `SELECT` over the `flights` table.
//! All connection details come from [`LlmConfig`].

use async_trait::async_trait;
use thiserror::Error;

use crate::booking::SearchCriteria;
use crate::config::LlmConfig;
use crate::llm::extract::extract_select;
use crate::llm::prompt::PromptBuilder;

// ---------------------------------------------------------------------------
// QueryGenError
// ---------------------------------------------------------------------------

/// Errors that can occur while generating a search query.
#[derive(Debug, Error)]
pub enum QueryGenError {
    /// Generation is switched off in the configuration.
    #[error("query generation is disabled")]
    Disabled,

    /// The booking record lacks one of the four search fields.
    #[error("search criteria incomplete, missing: {0}")]
    MissingCriteria(String),

    /// HTTP transport or connection error, or a non-success status.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("query generation timed out")]
    Timeout,

    /// The HTTP response could not be parsed as expected JSON.
    #[error("failed to parse model response: {0}")]
    Parse(String),

    /// The model returned no usable text.
    #[error("model returned an empty response")]
    EmptyResponse,

    /// The cleaned reply is not a `SELECT` statement.
    #[error("model reply is not a SELECT statement: {0}")]
    NotSelect(String),
}

impl From<reqwest::Error> for QueryGenError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            QueryGenError::Timeout
        } else {
            QueryGenError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// QueryGenerator trait
// ---------------------------------------------------------------------------

/// Async trait for turning search criteria into a read-only SQL query.
///
/// Implementors must be `Send + Sync` so they can be shared as
/// `Arc<dyn QueryGenerator>`.
#[async_trait]
pub trait QueryGenerator: Send + Sync {
    async fn generate_query(&self, criteria: &SearchCriteria) -> Result<String, QueryGenError>;
}

// ---------------------------------------------------------------------------
// ApiQueryGenerator
// ---------------------------------------------------------------------------

/// Calls an OpenAI-compatible `/v1/chat/completions` endpoint.
pub struct ApiQueryGenerator {
    client: reqwest::Client,
    config: LlmConfig,
    api_key: Option<String>,
    prompt_builder: PromptBuilder,
}

impl ApiQueryGenerator {
    /// Build a generator from application config.
    ///
    /// The HTTP client carries the per-request timeout from
    /// `config.timeout_secs`. The API key is resolved once here, see
    /// [`LlmConfig::resolved_api_key`].
    pub fn from_config(config: &LlmConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
            api_key: config.resolved_api_key(),
            prompt_builder: PromptBuilder::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl QueryGenerator for ApiQueryGenerator {
    /// Ask the model for a query matching `criteria`.
    ///
    /// The `Authorization: Bearer …` header is attached only when an API key
    /// was resolved, so local providers work without one.
    async fn generate_query(&self, criteria: &SearchCriteria) -> Result<String, QueryGenError> {
        if !self.config.enabled {
            return Err(QueryGenError::Disabled);
        }

        let (system_msg, user_msg) = self.prompt_builder.build_chat(criteria);

        let body = serde_json::json!({
            "model":       self.config.model,
            "messages": [
                { "role": "system", "content": system_msg },
                { "role": "user",   "content": user_msg   }
            ],
            "stream":      false,
            "temperature": self.config.temperature,
            "max_tokens":  512
        });

        let mut req = self.client.post(self.endpoint()).json(&body);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        log::debug!(
            "llm: requesting query for {} -> {} on {} ({})",
            criteria.origin,
            criteria.destination,
            criteria.date,
            criteria.travel_class
        );

        let response = req.send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(QueryGenError::Request(format!("status {status}: {text}")));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| QueryGenError::Parse(e.to_string()))?;

        let content = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or(QueryGenError::EmptyResponse)?;

        let sql = extract_select(content)?;
        log::info!("llm: generated query: {sql}");
        Ok(sql)
    }
}

// ---------------------------------------------------------------------------
// StaticGenerator  (test-only)
// ---------------------------------------------------------------------------

/// Returns the same query (or failure) for every request and counts calls.
#[cfg(test)]
pub struct StaticGenerator {
    query: Option<String>,
    calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl StaticGenerator {
    pub fn returning(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            query: None,
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
#[async_trait]
impl QueryGenerator for StaticGenerator {
    async fn generate_query(&self, _criteria: &SearchCriteria) -> Result<String, QueryGenError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.query.clone().ok_or(QueryGenError::EmptyResponse)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::TravelClass;
    use chrono::NaiveDate;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn make_config(base_url: &str, api_key: Option<&str>) -> LlmConfig {
        LlmConfig {
            enabled: true,
            base_url: base_url.into(),
            api_key: api_key.map(|s| s.to_string()),
            api_key_env: "FLIGHT_AGENT_TEST_KEY_UNSET".into(),
            model: "qwen2.5:3b".into(),
            temperature: 0.0,
            timeout_secs: 5,
        }
    }

    fn criteria() -> SearchCriteria {
        SearchCriteria {
            origin: "Mumbai".into(),
            destination: "Delhi".into(),
            date: NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
            travel_class: TravelClass::Economy,
        }
    }

    /// Serve one HTTP request with `status` and `body`, returning the raw
    /// request text through the join handle.
    async fn serve_once(status: &'static str, body: String) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
                let text = String::from_utf8_lossy(&buf);
                if let Some(head_end) = text.find("\r\n\r\n") {
                    let content_length = text[..head_end]
                        .lines()
                        .find_map(|l| {
                            let (name, value) = l.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if buf.len() >= head_end + 4 + content_length {
                        break;
                    }
                }
            }
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&buf).into_owned()
        });

        (url, handle)
    }

    fn completion(content: &str) -> String {
        serde_json::json!({
            "choices": [ { "message": { "role": "assistant", "content": content } } ]
        })
        .to_string()
    }

    #[tokio::test]
    async fn fenced_reply_is_cleaned() {
        let (url, server) = serve_once(
            "200 OK",
            completion("```sql\nSELECT * FROM flights WHERE origin = 'Mumbai';\n```"),
        )
        .await;
        let generator = ApiQueryGenerator::from_config(&make_config(&url, None));

        let sql = generator.generate_query(&criteria()).await.unwrap();
        assert_eq!(sql, "SELECT * FROM flights WHERE origin = 'Mumbai'");

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /v1/chat/completions"));
        assert!(request.contains("2026-10-16"));
        assert!(!request.to_ascii_lowercase().contains("authorization:"));
    }

    #[tokio::test]
    async fn api_key_is_sent_as_bearer() {
        let (url, server) = serve_once("200 OK", completion("SELECT 1")).await;
        let generator = ApiQueryGenerator::from_config(&make_config(&url, Some("sk-test-1234")));

        generator.generate_query(&criteria()).await.unwrap();

        let request = server.await.unwrap().to_ascii_lowercase();
        assert!(request.contains("authorization: bearer sk-test-1234"));
    }

    #[tokio::test]
    async fn non_select_reply_is_an_error() {
        let (url, _server) = serve_once("200 OK", completion("DROP TABLE flights;")).await;
        let generator = ApiQueryGenerator::from_config(&make_config(&url, None));

        let err = generator.generate_query(&criteria()).await.unwrap_err();
        assert!(matches!(err, QueryGenError::NotSelect(_)));
    }

    #[tokio::test]
    async fn missing_content_is_empty_response() {
        let (url, _server) = serve_once("200 OK", r#"{"choices":[]}"#.to_string()).await;
        let generator = ApiQueryGenerator::from_config(&make_config(&url, None));

        let err = generator.generate_query(&criteria()).await.unwrap_err();
        assert!(matches!(err, QueryGenError::EmptyResponse));
    }

    #[tokio::test]
    async fn error_status_is_a_request_error() {
        let (url, _server) =
            serve_once("500 Internal Server Error", r#"{"error":"boom"}"#.to_string()).await;
        let generator = ApiQueryGenerator::from_config(&make_config(&url, None));

        let err = generator.generate_query(&criteria()).await.unwrap_err();
        assert!(matches!(err, QueryGenError::Request(ref m) if m.contains("500")));
    }

    #[tokio::test]
    async fn disabled_generator_fails_without_request() {
        let mut config = make_config("http://127.0.0.1:9", None);
        config.enabled = false;
        let generator = ApiQueryGenerator::from_config(&config);

        let err = generator.generate_query(&criteria()).await.unwrap_err();
        assert!(matches!(err, QueryGenError::Disabled));
    }

    #[test]
    fn endpoint_ignores_trailing_slash() {
        let generator = ApiQueryGenerator::from_config(&make_config("http://localhost:11434/", None));
        assert_eq!(generator.endpoint(), "http://localhost:11434/v1/chat/completions");
    }

    #[test]
    fn generator_is_object_safe() {
        let generator: Box<dyn QueryGenerator> =
            Box::new(ApiQueryGenerator::from_config(&make_config("http://localhost:11434", None)));
        drop(generator);
    }
}
