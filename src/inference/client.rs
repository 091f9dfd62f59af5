// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Vision model client.
//!
//! Sends one image to an OpenAI-compatible chat completions endpoint and
//! returns the model's raw text reply. The call blocks until the service
//! answers; there is no timeout or retry.

use crate::config::InferenceConfig;
use crate::io::media::ImageHandle;
use anyhow::{anyhow, Context, Result};
use reqwest::blocking::Client as HttpClient;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

pub const SYSTEM_PROMPT: &str = "\
You are a professional bounding box generator. You see objects in a given image and generate bounding boxes. You only reply in the following format.

[x1, y1, x2, y2], [x1, y1, x2, y2], ... , [x1, y1, x2, y2]

The top-left of the image is (0,0) and the bottom-right of the image is (1,1). The x-axis is horizontal and the y-axis is vertical. (x1, y1) is the top-left corner of a box and (x2, y2) its bottom-right corner.
Each coordinate is a normalized floating point number ranging from 0 to 1. Be as precise as possible.";

pub const USER_PROMPT: &str =
    "Generate bounding boxes. Be very very precise with generating bounding boxes.";

/// Result of one inference request.
#[derive(Debug, Clone, PartialEq)]
pub enum InferenceOutcome {
    /// Raw text reply from the model.
    Success(String),
    /// Why no reply is available.
    Failure(String),
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    content: Option<String>,
}

/// Blocking client for the bounding box prompt.
pub struct PromptClient {
    config: InferenceConfig,
    http: HttpClient,
}

impl PromptClient {
    pub fn new(config: InferenceConfig) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(None::<Duration>)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { config, http })
    }

    #[cfg(test)]
    fn with_http_client(config: InferenceConfig, http: HttpClient) -> Self {
        Self { config, http }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.api_base)
    }

    /// Ask the model for bounding boxes in `image`, with an optional hint
    /// appended to the user prompt.
    ///
    /// Failures are logged and returned as [`InferenceOutcome::Failure`].
    pub fn extract_bounding_boxes(&self, image: &ImageHandle, hint: Option<&str>) -> InferenceOutcome {
        match self.request(image, hint) {
            Ok(text) => {
                log::info!("Received {} characters from {}", text.len(), self.config.model);
                InferenceOutcome::Success(text)
            }
            Err(e) => {
                log::warn!("Couldn't retrieve generated result: {:#}", e);
                InferenceOutcome::Failure(format!("{:#}", e))
            }
        }
    }

    fn request(&self, image: &ImageHandle, hint: Option<&str>) -> Result<String> {
        let body = build_request_body(&self.config.model, &image.encode_for_transport()?, hint);
        let endpoint = self.endpoint();
        log::debug!("POST {} ({}x{} image)", endpoint, image.width(), image.height());

        let response = self
            .http
            .post(&endpoint)
            .bearer_auth(&self.config.api_key)
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .with_context(|| format!("Request to {} failed", endpoint))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            return Err(anyhow!("Inference service returned {}: {}", status, detail.trim()));
        }

        let parsed: ChatResponse = response.json().context("Malformed inference response")?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| anyhow!("Inference response has no message content"))
    }
}

/// Chat completions payload carrying the prompts and the base64 PNG.
pub fn build_request_body(model: &str, encoded_png: &str, hint: Option<&str>) -> Value {
    let mut user_prompt = USER_PROMPT.to_string();
    if let Some(hint) = hint {
        user_prompt.push('\n');
        user_prompt.push_str(hint);
    }

    json!({
        "model": model,
        "messages": [
            { "role": "system", "content": SYSTEM_PROMPT },
            {
                "role": "user",
                "content": [
                    { "type": "text", "text": user_prompt },
                    {
                        "type": "image_url",
                        "image_url": { "url": format!("data:image/png;base64,{}", encoded_png) },
                    },
                ],
            },
        ],
    })
}
