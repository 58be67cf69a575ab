use std::time::Duration;

use anyhow::Context;
use base64::Engine as _;
use serde_json::{Map, Value, json};

use crate::foundation::config::ImagenSettings;
use crate::foundation::error::{PageError, PageResult};
use crate::synth::request::GenerationRequest;
use crate::synth::service::{ImageService, ServiceError};

/// Google Imagen `:predict` endpoint over blocking HTTP.
#[derive(Debug)]
pub struct ImagenService {
    http: reqwest::blocking::Client,
    settings: ImagenSettings,
}

impl ImagenService {
    /// `request_timeout` bounds the HTTP exchange itself so detached
    /// attempt workers eventually finish.
    pub fn new(settings: ImagenSettings, request_timeout: Duration) -> PageResult<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(request_timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { http, settings })
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:predict",
            self.settings.api_base.trim_end_matches('/'),
            self.settings.model.trim().trim_start_matches("models/")
        )
    }

    fn api_key(&self) -> Option<&str> {
        self.settings
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

/// Request body for one image.
pub fn predict_payload(request: &GenerationRequest) -> Value {
    let mut parameters = Map::new();
    parameters.insert("sampleCount".to_string(), Value::Number(1.into()));
    parameters.insert(
        "aspectRatio".to_string(),
        Value::String(request.aspect_ratio.as_str().to_string()),
    );
    if let Some(guidance) = request
        .guidance_strength
        .and_then(|g| serde_json::Number::from_f64(f64::from(g)))
    {
        parameters.insert("guidanceScale".to_string(), Value::Number(guidance));
    }

    json!({
        "instances": [{ "prompt": request.full_text() }],
        "parameters": parameters,
    })
}

/// First decoded image in a `:predict` response; empty when there is none.
pub fn extract_first_image(payload: &Value) -> Result<Vec<u8>, ServiceError> {
    let predictions = payload
        .get("predictions")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    for row in predictions {
        let encoded = row
            .get("bytesBase64Encoded")
            .or_else(|| row.get("bytes_base64_encoded"))
            .or_else(|| row.get("image").and_then(|img| img.get("imageBytes")))
            .and_then(Value::as_str);
        if let Some(encoded) = encoded {
            return base64::engine::general_purpose::STANDARD
                .decode(encoded.as_bytes())
                .map_err(|err| ServiceError::Transient(format!("invalid base64 image: {err}")));
        }
    }
    Ok(Vec::new())
}

impl ImageService for ImagenService {
    fn name(&self) -> &str {
        "imagen"
    }

    fn preflight(&self) -> PageResult<()> {
        if self.api_key().is_none() {
            return Err(PageError::precondition(
                "GOOGLE_API_KEY is not set; the imagen backend needs an API key",
            ));
        }
        Ok(())
    }

    fn submit(&self, request: &GenerationRequest) -> Result<Vec<u8>, ServiceError> {
        let api_key = self
            .api_key()
            .ok_or_else(|| ServiceError::Unauthorized("missing API key".to_string()))?;
        let endpoint = self.endpoint();

        let response = self
            .http
            .post(&endpoint)
            .header("x-goog-api-key", api_key)
            .json(&predict_payload(request))
            .send()
            .map_err(|err| ServiceError::Transient(format!("request to {endpoint} failed: {err}")))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            let body = response.text().unwrap_or_default();
            return Err(ServiceError::Unauthorized(format!(
                "HTTP {}: {}",
                status.as_u16(),
                truncate(&body, 300)
            )));
        }
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ServiceError::Transient(format!(
                "HTTP {}: {}",
                status.as_u16(),
                truncate(&body, 300)
            )));
        }

        let payload: Value = response
            .json()
            .map_err(|err| ServiceError::Transient(format!("invalid JSON response: {err}")))?;
        extract_first_image(&payload)
    }
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
