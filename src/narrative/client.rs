//! HTTP client for hosted and local LLMs

use super::{NarrativeError, NarrativeRequest, NarrativeResult, NarrativeService, DEFAULT_SYSTEM_PROMPT};
use crate::config::{LlmProvider, NarrativeConfig};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub struct LlmNarrativeClient {
    client: Client,
    config: NarrativeConfig,
    api_base_url: String,
}

impl LlmNarrativeClient {
    pub fn new(config: &NarrativeConfig) -> NarrativeResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| NarrativeError::ConfigError(e.to_string()))?;

        let api_base_url = config.api_base_url.clone().unwrap_or_else(|| {
            match config.provider {
                LlmProvider::Gemini => "https://generativelanguage.googleapis.com/v1beta".to_string(),
                LlmProvider::OpenAI => "https://api.openai.com/v1".to_string(),
                LlmProvider::Ollama => "http://localhost:11434".to_string(),
            }
        });

        Ok(Self {
            client,
            config: config.clone(),
            api_base_url,
        })
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub async fn complete(&self, prompt: &str) -> NarrativeResult<String> {
        debug!("Requesting narrative from {:?} ({})", self.config.provider, self.config.model);
        match self.config.provider {
            LlmProvider::Gemini => self.gemini_chat(prompt).await,
            LlmProvider::OpenAI => self.openai_chat(prompt).await,
            LlmProvider::Ollama => self.ollama_chat(prompt).await,
        }
    }

    fn system_prompt(&self) -> String {
        self.config
            .system_prompt
            .clone()
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string())
    }

    async fn openai_chat(&self, prompt: &str) -> NarrativeResult<String> {
        #[derive(Serialize)]
        struct Message {
            role: String,
            content: String,
        }

        #[derive(Serialize)]
        struct Request<'a> {
            model: &'a str,
            messages: Vec<Message>,
            temperature: f32,
        }

        #[derive(Deserialize)]
        struct Response {
            choices: Vec<Choice>,
        }

        #[derive(Deserialize)]
        struct Choice {
            message: MessageContent,
        }

        #[derive(Deserialize)]
        struct MessageContent {
            content: String,
        }

        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or_else(|| NarrativeError::ConfigError("OpenAI requires API key".to_string()))?;

        let url = format!("{}/chat/completions", self.api_base_url);
        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&Request {
                model: &self.config.model,
                messages: vec![
                    Message { role: "system".to_string(), content: self.system_prompt() },
                    Message { role: "user".to_string(), content: prompt.to_string() },
                ],
                temperature: 0.2,
            })
            .send()
            .await
            .map_err(|e| NarrativeError::NetworkError(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(NarrativeError::ApiError(format!("OpenAI error: {}", resp.status())));
        }

        let result: Response = resp
            .json()
            .await
            .map_err(|e| NarrativeError::SerializationError(e.to_string()))?;
        Ok(result.choices.first().map(|c| c.message.content.clone()).unwrap_or_default())
    }

    async fn ollama_chat(&self, prompt: &str) -> NarrativeResult<String> {
        #[derive(Serialize)]
        struct Request<'a> {
            model: &'a str,
            prompt: String,
            system: String,
            stream: bool,
        }

        #[derive(Deserialize)]
        struct Response {
            response: String,
        }

        let url = format!("{}/api/generate", self.api_base_url);
        let resp = self
            .client
            .post(&url)
            .json(&Request {
                model: &self.config.model,
                prompt: prompt.to_string(),
                system: self.system_prompt(),
                stream: false,
            })
            .send()
            .await
            .map_err(|e| NarrativeError::NetworkError(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(NarrativeError::ApiError(format!("Ollama error: {}", resp.status())));
        }

        let result: Response = resp
            .json()
            .await
            .map_err(|e| NarrativeError::SerializationError(e.to_string()))?;
        Ok(result.response)
    }

    async fn gemini_chat(&self, prompt: &str) -> NarrativeResult<String> {
        #[derive(Serialize)]
        struct Request {
            contents: Vec<Content>,
            #[serde(rename = "generationConfig")]
            generation_config: GenerationConfig,
        }

        #[derive(Serialize, Deserialize)]
        struct Content {
            role: Option<String>,
            parts: Vec<Part>,
        }

        #[derive(Serialize, Deserialize)]
        struct Part {
            text: String,
        }

        #[derive(Serialize)]
        struct GenerationConfig {
            temperature: f32,
        }

        #[derive(Deserialize)]
        struct Response {
            candidates: Option<Vec<Candidate>>,
        }

        #[derive(Deserialize)]
        struct Candidate {
            content: Content,
        }

        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or_else(|| NarrativeError::ConfigError("Gemini requires API key".to_string()))?;

        // v1beta generateContent has no system turn; prepend it to the user turn
        let full_prompt = format!("{}\n\n{}", self.system_prompt(), prompt);

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.api_base_url, self.config.model, api_key
        );

        let resp = self
            .client
            .post(&url)
            .json(&Request {
                contents: vec![Content {
                    role: Some("user".to_string()),
                    parts: vec![Part { text: full_prompt }],
                }],
                generation_config: GenerationConfig { temperature: 0.2 },
            })
            .send()
            .await
            .map_err(|e| NarrativeError::NetworkError(e.to_string()))?;

        if !resp.status().is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(NarrativeError::ApiError(format!("Gemini error: {}", text)));
        }

        let result: Response = resp
            .json()
            .await
            .map_err(|e| NarrativeError::SerializationError(e.to_string()))?;

        Ok(result
            .candidates
            .and_then(|candidates| candidates.into_iter().next())
            .and_then(|first| first.content.parts.into_iter().next())
            .map(|part| part.text)
            .unwrap_or_default())
    }
}

#[async_trait]
impl NarrativeService for LlmNarrativeClient {
    async fn narrate(&self, request: &NarrativeRequest) -> NarrativeResult<String> {
        self.complete(&request.render_prompt()).await
    }
}
