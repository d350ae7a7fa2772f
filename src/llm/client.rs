use crate::error::NarrativeError;
use crate::llm::narrator::{NarrativeGenerator, PromptContext};
use crate::llm::types::*;
use async_trait::async_trait;
use reqwest::Client;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Narrative generator backed by Gemini's `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiNarrator {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: Option<f32>,
}

impl GeminiNarrator {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: GEMINI_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: Some(0.3),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }
}

#[async_trait]
impl NarrativeGenerator for GeminiNarrator {
    async fn generate_text(&self, prompt: &PromptContext) -> Result<String, NarrativeError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let payload = GenerateContentRequest {
            contents: vec![Content::user(prompt.user.clone())],
            system_instruction: Some(Content::user(prompt.system.clone())),
            generation_config: GenerationConfig {
                response_mime_type: "text/plain".to_string(),
                temperature: self.temperature,
            },
        };

        let res = self.client.post(&url).json(&payload).send().await?;
        let status = res.status();

        if !status.is_success() {
            let err_text = res.text().await?;
            return Err(NarrativeError::Service(format!(
                "Gemini API Error (status {}): {}",
                status, err_text
            )));
        }

        let body: GenerateContentResponse = res.json().await?;

        let part = body
            .candidates
            .ok_or(NarrativeError::Empty)?
            .into_iter()
            .next()
            .ok_or(NarrativeError::Empty)?
            .content
            .parts
            .into_iter()
            .next()
            .ok_or(NarrativeError::Empty)?;

        match part {
            Part::Text { text } => Ok(text),
        }
    }
}
