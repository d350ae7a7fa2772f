use crate::error::NarrativeError;
use async_trait::async_trait;
use log::warn;
use serde::{Deserialize, Serialize};

/// Text used in place of a narrative that could not be generated.
pub const FALLBACK_NARRATIVE: &str = "Unable to generate insight.";

/// Prompt handed to a narrative generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptContext {
    pub system: String,
    pub user: String,
}

/// Opaque text-completion capability.
#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    async fn generate_text(&self, prompt: &PromptContext) -> Result<String, NarrativeError>;
}

/// Runs the generator, substituting [`FALLBACK_NARRATIVE`] on error or blank output.
pub async fn narrate<N>(generator: &N, prompt: &PromptContext) -> String
where
    N: NarrativeGenerator + ?Sized,
{
    match generator.generate_text(prompt).await {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => {
            warn!("Narrative generator returned empty text, using fallback");
            FALLBACK_NARRATIVE.to_string()
        }
        Err(e) => {
            warn!("Narrative generation failed, using fallback: {}", e);
            FALLBACK_NARRATIVE.to_string()
        }
    }
}
