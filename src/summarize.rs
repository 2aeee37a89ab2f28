use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const BASE_PROMPT: &str = "You are a YouTube video summarizer. You will be taking the transcript text \
and summarizing the entire video and providing the important summary in points.";

pub const DEFAULT_MODEL: &str = "gemini-1.5-pro";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Turns transcript text into a summary
#[async_trait]
pub trait Summarizer {
    async fn summarize(&self, transcript_text: &str) -> Result<String>;
}

/// Prompt sent for a transcript: the fixed instructions, a blank line, then the text
pub fn build_prompt(transcript_text: &str) -> String {
    format!("{BASE_PROMPT}\n\n{transcript_text}")
}

#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn endpoint(&self) -> String {
        let model = self.model.trim_start_matches("models/");
        format!(
            "{}/v1beta/models/{model}:generateContent",
            self.base_url.trim_end_matches('/')
        )
    }
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Summarizer backed by the Gemini `generateContent` endpoint
pub struct GeminiClient {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(client: reqwest::Client, config: GeminiConfig) -> Self {
        Self { client, config }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[async_trait]
impl Summarizer for GeminiClient {
    async fn summarize(&self, transcript_text: &str) -> Result<String> {
        debug!("Summarizing via Gemini with model {}", self.config.model);

        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: build_prompt(transcript_text),
                }],
            }],
        };

        let resp = self
            .client
            .post(self.config.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::summarize(e.without_url().to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::summarize(format!("Gemini API returned {status}: {body}")));
        }

        let body: GeminiResponse = resp
            .json()
            .await
            .map_err(|e| Error::summarize(format!("invalid Gemini response: {}", e.without_url())))?;
        extract_gemini_text(&body)
    }
}

fn extract_gemini_text(resp: &GeminiResponse) -> Result<String> {
    let text: String = resp
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|c| c.parts.iter().filter_map(|p| p.text.as_deref()).collect())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(Error::summarize("no content in Gemini response"));
    }
    Ok(text)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Echoes a fixed summary, or fails when `fail` is set
    pub(crate) struct FakeSummarizer {
        pub summary: String,
        pub fail: bool,
    }

    #[async_trait]
    impl Summarizer for FakeSummarizer {
        async fn summarize(&self, transcript_text: &str) -> Result<String> {
            if self.fail {
                return Err(Error::summarize("quota exceeded"));
            }
            Ok(format!("{} ({} chars)", self.summary, transcript_text.len()))
        }
    }

    fn response(json: serde_json::Value) -> GeminiResponse {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_build_prompt() {
        let prompt = build_prompt("Hi there");
        assert!(prompt.starts_with("You are a YouTube video summarizer."));
        assert!(prompt.ends_with("in points.\n\nHi there"));
    }

    #[test]
    fn test_endpoint() {
        let config = GeminiConfig::new("k").with_model("models/gemini-1.5-flash");
        assert_eq!(
            config.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
        let config = GeminiConfig {
            base_url: "http://localhost:8080/".to_string(),
            ..GeminiConfig::new("k")
        };
        assert_eq!(
            config.endpoint(),
            "http://localhost:8080/v1beta/models/gemini-1.5-pro:generateContent"
        );
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_hides_api_key() {
        let config = GeminiConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            ..GeminiConfig::new("SECRET-KEY-123")
        };
        let client = GeminiClient::new(reqwest::Client::new(), config);
        let err = client.summarize("Hi there").await.unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Error during summarization: "));
        assert!(!message.contains("SECRET-KEY-123"));
        assert!(!format!("{err:?}").contains("SECRET-KEY-123"));
    }

    #[test]
    fn test_config_debug_redacts_key() {
        let config = GeminiConfig::new("SECRET-KEY-123");
        let debug = format!("{config:?}");
        assert!(!debug.contains("SECRET-KEY-123"));
        assert!(debug.contains("gemini-1.5-pro"));
    }

    #[test]
    fn test_extract_gemini_text() {
        let resp = response(serde_json::json!({
            "candidates": [
                {"content": {"parts": [{"text": "- point one\n"}, {"text": "- point two"}], "role": "model"}}
            ]
        }));
        assert_eq!(extract_gemini_text(&resp).unwrap(), "- point one\n- point two");
    }

    #[test]
    fn test_extract_gemini_text_no_candidates() {
        let resp = response(serde_json::json!({"promptFeedback": {"blockReason": "SAFETY"}}));
        let err = extract_gemini_text(&resp).unwrap_err();
        assert!(matches!(err, Error::Summarize(_)));
    }

    #[test]
    fn test_extract_gemini_text_empty_content() {
        let resp = response(serde_json::json!({"candidates": [{"finishReason": "SAFETY"}]}));
        assert!(extract_gemini_text(&resp).is_err());
    }
}
