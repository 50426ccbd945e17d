//! HTTP autofill backends.
//!
//! Both gateways block; the app runs them on a worker thread.

use std::sync::Arc;
use std::time::Duration;

use gridfill_core::{
    AutofillBackend, AutofillConfig, AutofillGateway, FillError, FillRequest, FillResponse,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ROUTE_ENDPOINT: &str = "http://localhost:3000/fill";
pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Build the gateway selected in the config.
pub fn from_config(config: &AutofillConfig) -> Result<Arc<dyn AutofillGateway>, FillError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| FillError::Transport(e.to_string()))?;

    Ok(match config.backend {
        AutofillBackend::Route => Arc::new(RouteGateway {
            client,
            endpoint: config
                .endpoint
                .clone()
                .unwrap_or_else(|| DEFAULT_ROUTE_ENDPOINT.to_string()),
        }),
        AutofillBackend::Gemini => Arc::new(GeminiGateway {
            client,
            endpoint: config
                .endpoint
                .clone()
                .unwrap_or_else(|| DEFAULT_GEMINI_ENDPOINT.to_string()),
            model: config.model.clone(),
            api_key: std::env::var(&config.api_key_env).ok().filter(|k| !k.is_empty()),
            api_key_env: config.api_key_env.clone(),
        }),
    })
}

/// Posts `{"content": [[...]]}` to a fill service and accepts `{"content": ...}`
/// or a bare array back.
pub struct RouteGateway {
    client: reqwest::blocking::Client,
    endpoint: String,
}

#[derive(Serialize)]
struct RouteBody {
    content: Vec<Vec<String>>,
}

impl AutofillGateway for RouteGateway {
    fn complete(&self, request: &FillRequest) -> Result<FillResponse, FillError> {
        let body = RouteBody {
            content: request.text_rows(),
        };
        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .map_err(|e| FillError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|e| FillError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(FillError::Backend {
                status: status.as_u16(),
                message: text,
            });
        }
        FillResponse::from_json(&text)
    }
}

/// Calls Gemini `generateContent` with a response schema of
/// array-of-array-of-string.
pub struct GeminiGateway {
    client: reqwest::blocking::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    api_key_env: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: serde_json::Value,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

fn table_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "ARRAY",
        "items": {
            "type": "ARRAY",
            "items": { "type": "STRING" }
        }
    })
}

fn build_prompt(request: &FillRequest) -> Result<String, FillError> {
    let data = serde_json::to_string_pretty(&request.text_rows())
        .map_err(|e| FillError::Malformed(e.to_string()))?;
    Ok(format!(
        "You are a spreadsheet autofill assistant. The data below is a block of \
         spreadsheet cells, one array per row; empty strings are blank cells. Fill in \
         the blank cells by continuing the existing pattern. Return the completed block \
         as a JSON array of arrays with the same shape.\nData:\n{data}\n"
    ))
}

impl GeminiGateway {
    fn url(&self, key: &str) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint.trim_end_matches('/'),
            self.model,
            key
        )
    }
}

impl AutofillGateway for GeminiGateway {
    fn complete(&self, request: &FillRequest) -> Result<FillResponse, FillError> {
        let key = self.api_key.as_deref().ok_or_else(|| {
            FillError::NotConfigured(format!("set {} to a Gemini API key", self.api_key_env))
        })?;

        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: build_prompt(request)?,
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: table_schema(),
            },
        };

        let response = self
            .client
            .post(self.url(key))
            .json(&body)
            .send()
            .map_err(|e| FillError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|e| FillError::Transport(e.to_string()))?;
        if !status.is_success() {
            let message = serde_json::from_str::<ApiError>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            return Err(FillError::Backend {
                status: status.as_u16(),
                message,
            });
        }

        parse_generate_response(&text)
    }
}

fn parse_generate_response(text: &str) -> Result<FillResponse, FillError> {
    let parsed: GenerateResponse =
        serde_json::from_str(text).map_err(|e| FillError::Malformed(e.to_string()))?;
    let answer = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content.parts.into_iter().next())
        .map(|p| p.text)
        .ok_or_else(|| FillError::Malformed("no candidates in response".to_string()))?;
    FillResponse::from_json(&answer)
}
