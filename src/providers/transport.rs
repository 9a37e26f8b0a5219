use super::types::{GenerateRequest, GenerateResponse};
use crate::error::EngineError;
use reqwest::{Client, StatusCode};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

const UNKNOWN_ERROR: &str = "Unknown error";

/// One round trip to the generation endpoint.
///
/// Implementations classify failures into [`EngineError`] variants; the retry
/// policy lives in [`super::RequestEngine`].
pub trait GenerateTransport: Send + Sync {
    fn generate<'a>(
        &'a self,
        request: &'a GenerateRequest,
    ) -> Pin<Box<dyn Future<Output = Result<GenerateResponse, EngineError>> + Send + 'a>>;
}

pub fn build_http_client(timeout_secs: u64) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .pool_idle_timeout(Duration::from_secs(90))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Posts requests to the report proxy.
pub struct ProxyClient {
    url: String,
    client: Client,
}

impl ProxyClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(url, build_http_client(120))
    }

    pub fn with_client(url: impl Into<String>, client: Client) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Pull `error.message` out of an error body, if it has one.
fn error_message(body: &str) -> String {
    serde_json::from_str::<GenerateResponse>(body)
        .ok()
        .and_then(|resp| resp.error)
        .and_then(|err| err.message)
        .filter(|msg| !msg.is_empty())
        .unwrap_or_else(|| UNKNOWN_ERROR.to_string())
}

impl GenerateTransport for ProxyClient {
    fn generate<'a>(
        &'a self,
        request: &'a GenerateRequest,
    ) -> Pin<Box<dyn Future<Output = Result<GenerateResponse, EngineError>> + Send + 'a>> {
        Box::pin(async move {
            let response = self
                .client
                .post(&self.url)
                .json(request)
                .send()
                .await
                .map_err(|e| EngineError::Transport(e.to_string()))?;

            let status = response.status();
            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(EngineError::RateLimited);
            }
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(EngineError::Status {
                    status: status.as_u16(),
                    message: error_message(&body),
                });
            }

            response
                .json::<GenerateResponse>()
                .await
                .map_err(|e| EngineError::Decode(e.to_string()))
        })
    }
}
