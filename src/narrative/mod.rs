//! Hypothesis narratives
//!
//! Turns a drug-pair comparison into a prompt for an external text-generation
//! service and returns the generated hypotheses verbatim.

pub mod client;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use client::LlmNarrativeClient;

#[derive(Error, Debug)]
pub enum NarrativeError {
    #[error("LLM API error: {0}")]
    ApiError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type NarrativeResult<T> = Result<T, NarrativeError>;

pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a senior clinical pharmacologist. Answer concisely and flag uncertainty.";

/// Input to the hypothesis text service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeRequest {
    pub drug_a: String,
    pub risk_a: f64,
    pub drug_b: String,
    pub risk_b: f64,
    pub overlap_count: usize,
    pub top_overlap_effects: Vec<String>,
}

impl NarrativeRequest {
    pub fn render_prompt(&self) -> String {
        format!(
            "As a senior pharmacologist, analyze this drug combination:\n\
             \n\
             **Drugs**: {} (Risk: {:.2}) + {} (Risk: {:.2})\n\
             **Shared Side Effects**: {}\n\
             **Key Overlaps**: {}\n\
             \n\
             Generate 3 clinically-relevant hypotheses considering:\n\
             1. Pharmacodynamic interactions\n\
             2. Metabolic pathway conflicts (CYP450, etc.)\n\
             3. Synergistic/adverse effect probabilities\n\
             \n\
             For each hypothesis, provide:\n\
             - Mechanism of Action\n\
             - Biological Plausibility (1-5)\n\
             - Clinical Significance (High/Medium/Low)\n\
             - Suggested Monitoring Protocol\n",
            self.drug_a,
            self.risk_a,
            self.drug_b,
            self.risk_b,
            self.overlap_count,
            self.top_overlap_effects.join(", "),
        )
    }
}

/// Anything that can write hypotheses for a drug pair
#[async_trait]
pub trait NarrativeService: Send + Sync {
    async fn narrate(&self, request: &NarrativeRequest) -> NarrativeResult<String>;
}
