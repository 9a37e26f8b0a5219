use crate::providers::transport::build_http_client;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
struct CountResponse {
    count: u64,
}

#[derive(Debug, Serialize)]
struct IncrementBody<'a> {
    secret: &'a str,
    month: &'a str,
    inc: u64,
}

/// Shared counter endpoint. Every call is best effort: failures come back
/// as `None` and are only logged.
#[derive(Debug, Clone)]
pub struct SiteWideCounter {
    endpoint: String,
    secret: String,
    client: Client,
}

impl SiteWideCounter {
    pub fn new(endpoint: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            secret: secret.into(),
            client: build_http_client(10),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// `GET <endpoint>?month=YYYY-MM`.
    pub async fn fetch(&self, month: &str) -> Option<u64> {
        let result = self
            .client
            .get(&self.endpoint)
            .query(&[("month", month)])
            .send()
            .await;
        read_count(result, "fetch").await
    }

    /// `POST <endpoint>` with a plain-text JSON body so browsers skip the
    /// preflight.
    pub async fn increment(&self, month: &str, inc: u64) -> Option<u64> {
        let body = IncrementBody {
            secret: &self.secret,
            month,
            inc,
        };
        let payload = match serde_json::to_string(&body) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::debug!("Site-wide usage body failed to serialize: {e}");
                return None;
            }
        };
        let result = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "text/plain;charset=utf-8")
            .body(payload)
            .send()
            .await;
        read_count(result, "increment").await
    }
}

async fn read_count(
    result: Result<reqwest::Response, reqwest::Error>,
    action: &'static str,
) -> Option<u64> {
    let response = match result {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(action, "Site-wide usage request failed: {e}");
            return None;
        }
    };
    if !response.status().is_success() {
        tracing::warn!(
            action,
            status = response.status().as_u16(),
            "Site-wide usage request rejected"
        );
        return None;
    }
    match response.json::<CountResponse>().await {
        Ok(body) => Some(body.count),
        Err(e) => {
            tracing::warn!(action, "Site-wide usage response unreadable: {e}");
            None
        }
    }
}

/// `"This month: N/Q (site-wide)"` when the shared count is known, otherwise
/// the local count labelled `(this device)`.
pub fn display_line(site_wide: Option<u64>, local: u64, quota: u64) -> String {
    match site_wide {
        Some(count) => format!("This month: {count}/{quota} (site-wide)"),
        None => format!("This month: {local}/{quota} (this device)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefers_site_wide_count() {
        assert_eq!(
            display_line(Some(120), 3, 1500),
            "This month: 120/1500 (site-wide)"
        );
        assert_eq!(display_line(None, 3, 1500), "This month: 3/1500 (this device)");
    }

    #[test]
    fn increment_body_field_names() {
        let body = IncrementBody {
            secret: "s",
            month: "2024-02",
            inc: 1,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"secret":"s","month":"2024-02","inc":1}"#
        );
    }
}
