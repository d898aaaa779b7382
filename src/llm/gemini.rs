use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::llm::parser::parse_classification;
use crate::llm::prompts::{summary_prompt, ClassificationRequest};
use crate::llm::provider::LLMProvider;
use crate::models::ClassificationRecord;

pub struct GeminiProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    error: Option<GeminiError>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Deserialize)]
struct GeminiError {
    message: String,
}

// Deterministic, short output for classification
const CLASSIFICATION_TEMPERATURE: f32 = 0.1;
const CLASSIFICATION_MAX_TOKENS: u32 = 100;

impl GeminiProvider {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            api_key: config.gemini_api_key.clone(),
            model: config.gemini_model.clone(),
            base_url: config.gemini_api_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    async fn generate(&self, prompt: String, generation_config: Option<GenerationConfig>) -> Result<String> {
        let request_body = GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart { text: Some(prompt) }],
            }],
            generation_config,
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| Error::LLMApi(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::LLMApi(format!(
                "Gemini API error ({}): {}",
                status, body
            )));
        }

        let result: GeminiResponse = response
            .json()
            .await
            .map_err(|e| Error::LLMApi(format!("Failed to parse Gemini response: {}", e)))?;

        if let Some(error) = result.error {
            return Err(Error::LLMApi(error.message));
        }

        let text = result
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(Error::LLMApi("Empty response from Gemini".to_string()));
        }

        Ok(text)
    }
}

#[async_trait]
impl LLMProvider for GeminiProvider {
    async fn classify_comment(&self, comment: &str) -> Result<ClassificationRecord> {
        let prompt = ClassificationRequest::new(comment).to_prompt();
        tracing::debug!("Classifying comment ({} chars) with {}", comment.len(), self.model);

        let text = self
            .generate(
                prompt,
                Some(GenerationConfig {
                    temperature: CLASSIFICATION_TEMPERATURE,
                    max_output_tokens: CLASSIFICATION_MAX_TOKENS,
                }),
            )
            .await?;

        parse_classification(&text)
    }

    async fn generate_summary(&self, statistics: &str) -> Result<String> {
        let text = self.generate(summary_prompt(statistics), None).await?;
        Ok(text.trim().to_string())
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn name(&self) -> &str {
        "Gemini"
    }
}
