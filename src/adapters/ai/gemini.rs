//! Gemini implementation of the TicketAnalyzer port.
//!
//! Sends the ticket to the `generateContent` endpoint and parses the
//! free-text reply. Every failure mode, from a missing API key to
//! unusable output, becomes `None`; the pipeline substitutes defaults.

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::config::AiConfig;
use crate::domain::analysis::{parse_analysis, TicketAnalysis};
use crate::ports::TicketAnalyzer;

/// Gemini-backed ticket analyzer.
pub struct GeminiAnalyzer {
    client: reqwest::Client,
    config: AiConfig,
}

impl GeminiAnalyzer {
    pub fn new(config: AiConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();
        Self { client, config }
    }

    fn prompt(title: &str, description: &str) -> String {
        format!(
            "You are an expert AI assistant that processes technical support tickets.\n\
             Respond ONLY in strict JSON format with keys:\n\
             summary, priority, helpfulNotes, relatedSkills.\n\n\
             Priority must be one of: low, medium, high.\n\n\
             Analyze this support ticket:\n\n\
             Title: {title}\n\
             Description: {description}\n"
        )
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    /// Joins every text part of the first candidate.
    fn text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| {
                c.parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl TicketAnalyzer for GeminiAnalyzer {
    async fn analyze(&self, title: &str, description: &str) -> Option<TicketAnalysis> {
        let api_key = match &self.config.gemini_api_key {
            Some(key) if !key.expose_secret().is_empty() => key,
            _ => {
                tracing::warn!("AI API key is missing, skipping analysis");
                return None;
            }
        };

        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        );
        let body = json!({
            "contents": [{ "parts": [{ "text": Self::prompt(title, description) }] }],
        });

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| tracing::warn!(error = %e, "AI request failed"))
            .ok()?;

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| tracing::warn!(error = %e, "AI response unreadable"))
            .ok()?;

        let raw = parsed.text();
        let analysis = parse_analysis(&raw);
        if analysis.is_none() {
            tracing::warn!("AI reply contained no usable JSON object");
        }
        analysis
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_key_yields_none_without_network() {
        let analyzer = GeminiAnalyzer::new(AiConfig::default());
        assert!(analyzer.analyze("t", "d").await.is_none());
    }

    #[test]
    fn response_text_joins_candidate_parts() {
        let response: GenerateResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "parts": [
                    { "text": "```json" },
                    { "text": "{\"summary\":\"s\"}" },
                    { "text": "```" },
                ]}
            }]
        }))
        .unwrap();
        let text = response.text();
        assert!(text.contains("\"summary\""));
        assert!(parse_analysis(&text).is_some());
    }

    #[test]
    fn empty_response_produces_empty_text() {
        let response: GenerateResponse = serde_json::from_value(json!({})).unwrap();
        assert!(response.text().is_empty());
    }

    #[test]
    fn prompt_mentions_required_keys() {
        let prompt = GeminiAnalyzer::prompt("Broken login", "Cannot sign in");
        for key in ["summary", "priority", "helpfulNotes", "relatedSkills"] {
            assert!(prompt.contains(key));
        }
        assert!(prompt.contains("Broken login"));
    }
}
