use std::time::Duration;

use crate::error::{ AppError, Result };

/// Rendering options forwarded to the proxy with every request.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub js_render: bool,
    pub json_response: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            js_render: true,
            json_response: true,
        }
    }
}

/// Client for a ZenRows-style fetch/render proxy: given a target URL it
/// returns the body the proxy produced, whatever the HTTP status.
pub struct ScrapeProxy {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl ScrapeProxy {
    pub fn new(api_url: &str, api_key: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub async fn fetch(&self, target_url: &str, options: RenderOptions) -> Result<String> {
        let response = self.client
            .get(&self.api_url)
            .query(
                &[
                    ("apikey", self.api_key.as_str()),
                    ("url", target_url),
                    ("js_render", bool_param(options.js_render)),
                    ("json_response", bool_param(options.json_response)),
                ]
            )
            .send().await?;

        let status = response.status();
        let body = response.text().await?;

        tracing::debug!("Proxy responded {} ({} bytes) for {}", status, body.len(), target_url);

        Ok(body)
    }
}

fn bool_param(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}
