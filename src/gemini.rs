//! Gemini API integration for bullet-point summaries

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::settings::AppSettings;

#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarize `text` as bullet points focused on `matching_terms`.
    async fn summarize(&self, text: &str, matching_terms: &[String]) -> AppResult<Vec<String>>;
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct ApiRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
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
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

pub fn build_prompt(text: &str, matching_terms: &[String]) -> String {
    format!(
        r#"Please provide a comprehensive summary of the following text in bullet points. Focus on these key terms: {}.
For each bullet point:
- Start with a hyphen (-)
- Include one main concept or idea
- Explain how the terms are used and their significance
- Keep each point concise and clear

Text to analyze:
{}

Format each point starting with a hyphen (-) on a new line."#,
        matching_terms.join(", "),
        text
    )
}

/// Keep the trimmed lines that start with a hyphen.
pub fn parse_bullets(response: &str) -> Vec<String> {
    response
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with('-'))
        .map(str::to_string)
        .collect()
}

pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>, model: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_settings(settings: &AppSettings) -> Self {
        Self::new(
            settings.gemini_api_key.clone(),
            settings.model(),
            settings.gemini_base_url(),
        )
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    pub async fn generate_content(&self, prompt: &str) -> AppResult<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Config("GEMINI_API_KEY not set".to_string()))?;

        let request = ApiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Summarizer(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Summarizer(format!(
                "API error {}: {}",
                status, error_text
            )));
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| AppError::Summarizer(format!("Failed to parse response: {}", e)))?;

        response_text(api_response)
    }
}

fn response_text(api_response: ApiResponse) -> AppResult<String> {
    let text: String = api_response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(AppError::Summarizer("Empty response".to_string()));
    }
    Ok(text)
}

#[async_trait]
impl Summarizer for GeminiClient {
    async fn summarize(&self, text: &str, matching_terms: &[String]) -> AppResult<Vec<String>> {
        let prompt = build_prompt(text, matching_terms);
        log::info!(
            "Requesting summary from {} ({} chars, {} terms)",
            self.model,
            text.len(),
            matching_terms.len()
        );
        let response = self.generate_content(&prompt).await?;
        Ok(parse_bullets(&response))
    }
}
