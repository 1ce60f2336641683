//! Gemini client for session report generation.
//!
//! One request per analysis, single best-effort attempt: no retry, no
//! queueing. The response is constrained to a fixed JSON object shape via
//! `generationConfig.responseSchema`.

use crate::insight::prompt::{build_prompt, collect_comments, prompt_averages};
use crate::models::{Feedback, Session, SessionInsight};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Failure modes of a report request.
#[derive(Debug, Error)]
pub enum InsightError {
    /// Rejected before any network call is made.
    #[error("no evaluations found for this session")]
    NoEvaluations,

    /// No key in config and GEMINI_API_KEY unset.
    #[error("Gemini API key is not configured (set GEMINI_API_KEY or [model] api_key)")]
    MissingApiKey,

    /// Network failure, non-success status, or a malformed response.
    /// The request is not retried.
    #[error("analysis engine interrupted: {0}")]
    Interrupted(String),
}

/// Configuration for the insight engine.
#[derive(Debug, Clone)]
pub struct InsightConfig {
    pub base_url: String,
    pub model_name: String,
    pub api_key: String,
    pub temperature: f32,
    pub timeout_seconds: u64,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model_name: "gemini-3-flash-preview".to_string(),
            api_key: std::env::var("GEMINI_API_KEY").unwrap_or_default(),
            temperature: 0.2,
            timeout_seconds: 120,
        }
    }
}

/// Gemini generateContent request.
#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    response_mime_type: String,
    response_schema: Value,
}

/// Gemini generateContent response.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

/// The session report engine.
pub struct InsightEngine {
    config: InsightConfig,
    http_client: reqwest::Client,
}

impl InsightEngine {
    pub fn new(config: InsightConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            http_client,
        }
    }

    /// Generate a narrative report for one session.
    ///
    /// The caller pre-filters `feedback` to the session; the relationship
    /// is not re-validated here.
    pub async fn generate_session_report(
        &self,
        session: &Session,
        feedback: &[Feedback],
    ) -> Result<SessionInsight, InsightError> {
        if feedback.is_empty() {
            return Err(InsightError::NoEvaluations);
        }
        if self.config.api_key.is_empty() {
            return Err(InsightError::MissingApiKey);
        }

        let averages = prompt_averages(feedback);
        let comments = collect_comments(feedback);
        let prompt = build_prompt(session, &averages, &comments);
        debug!("Prompt length: {} chars", prompt.len());

        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model_name
        );

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                response_mime_type: "application/json".to_string(),
                response_schema: insight_response_schema(),
            },
        };

        info!("Requesting session analysis from {}", self.config.model_name);

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    InsightError::Interrupted(format!(
                        "request timed out after {}s",
                        self.config.timeout_seconds
                    ))
                } else if e.is_connect() {
                    InsightError::Interrupted(format!(
                        "cannot reach {}",
                        self.config.base_url
                    ))
                } else {
                    InsightError::Interrupted(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(InsightError::Interrupted(format!(
                "API error {}: {}",
                status, body
            )));
        }

        let generated: GenerateResponse = response
            .json()
            .await
            .map_err(|e| InsightError::Interrupted(format!("unreadable response: {}", e)))?;

        let text = generated
            .candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<String>()
            })
            .ok_or_else(|| InsightError::Interrupted("response carried no candidates".to_string()))?;

        parse_insight(&text, &session.id)
    }
}

/// Parse the model's JSON text and re-stamp it with the caller's session
/// id, overriding whatever the service returned for that field.
fn parse_insight(text: &str, session_id: &str) -> Result<SessionInsight, InsightError> {
    let mut insight: SessionInsight = serde_json::from_str(text)
        .map_err(|e| InsightError::Interrupted(format!("malformed report JSON: {}", e)))?;

    insight.session_id = session_id.to_string();
    Ok(insight)
}

/// The fixed response schema for the report object. All fields required.
fn insight_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "sessionId": { "type": "STRING" },
            "strengths": { "type": "ARRAY", "items": { "type": "STRING" } },
            "weaknesses": { "type": "ARRAY", "items": { "type": "STRING" } },
            "recommendations": { "type": "ARRAY", "items": { "type": "STRING" } },
            "overallSummary": { "type": "STRING" },
            "categoryAnalysis": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "category": { "type": "STRING" },
                        "score": { "type": "STRING" },
                        "analysis": { "type": "STRING" },
                        "detailedRecommendation": { "type": "STRING" }
                    },
                    "required": ["category", "score", "analysis", "detailedRecommendation"]
                }
            },
            "futureImprovements": {
                "type": "OBJECT",
                "properties": {
                    "material": { "type": "STRING" },
                    "delivery": { "type": "STRING" },
                    "engagement": { "type": "STRING" }
                },
                "required": ["material", "delivery", "engagement"]
            }
        },
        "required": [
            "sessionId",
            "strengths",
            "weaknesses",
            "recommendations",
            "overallSummary",
            "categoryAnalysis",
            "futureImprovements"
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::session;

    #[tokio::test]
    async fn empty_feedback_is_rejected_before_any_call() {
        // Unroutable base URL: if a request were attempted it would fail
        // with a transport error, not the precondition error.
        let engine = InsightEngine::new(InsightConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            api_key: "test-key".to_string(),
            ..InsightConfig::default()
        });

        let result = engine.generate_session_report(&session("s1", "Ada"), &[]).await;
        assert!(matches!(result, Err(InsightError::NoEvaluations)));
    }

    #[tokio::test]
    async fn missing_api_key_is_rejected() {
        let engine = InsightEngine::new(InsightConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            api_key: String::new(),
            ..InsightConfig::default()
        });

        let fb = crate::models::test_support::feedback("f1", "s1", 5);
        let result = engine
            .generate_session_report(&session("s1", "Ada"), &[fb])
            .await;
        assert!(matches!(result, Err(InsightError::MissingApiKey)));
    }

    #[test]
    fn parse_restamps_session_id() {
        let text = r#"{
            "sessionId": "whatever-the-model-said",
            "strengths": ["clear"],
            "weaknesses": ["fast"],
            "recommendations": ["slow down"],
            "overallSummary": "Good session.",
            "categoryAnalysis": [],
            "futureImprovements": {
                "material": "m", "delivery": "d", "engagement": "e"
            }
        }"#;

        let insight = parse_insight(text, "s42").unwrap();
        assert_eq!(insight.session_id, "s42");
        assert_eq!(insight.strengths, vec!["clear"]);
    }

    #[test]
    fn parse_rejects_malformed_json() {
        let result = parse_insight("not json at all", "s1");
        assert!(matches!(result, Err(InsightError::Interrupted(_))));
    }

    #[test]
    fn schema_requires_every_field() {
        let schema = insight_response_schema();
        let required = schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 7);
        assert_eq!(schema["properties"]["categoryAnalysis"]["type"], "ARRAY");
    }
}
