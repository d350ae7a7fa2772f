pub mod narrator;
pub mod prompts;

#[cfg(feature = "gemini")]
pub mod client;
#[cfg(feature = "gemini")]
pub mod types;

pub use narrator::*;

#[cfg(feature = "gemini")]
pub use client::GeminiNarrator;
