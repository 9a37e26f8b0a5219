use super::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const MISSING_KEY: &str = "Missing GEMINI_API_KEY on server";

/// Fields accepted from the client; anything else is dropped.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GenerateBody {
    pub(super) model: Option<String>,
    #[serde(default)]
    pub(super) contents: Option<Value>,
    pub(super) system_instruction: Option<Value>,
    pub(super) tools: Option<Value>,
    pub(super) generation_config: Option<Value>,
    pub(super) safety_settings: Option<Value>,
}

/// What goes upstream.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UpstreamPayload {
    contents: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    safety_settings: Option<Value>,
}

impl From<GenerateBody> for UpstreamPayload {
    fn from(body: GenerateBody) -> Self {
        Self {
            contents: body.contents.unwrap_or_else(|| Value::Array(Vec::new())),
            system_instruction: body.system_instruction,
            tools: body.tools,
            generation_config: body.generation_config,
            safety_settings: body.safety_settings,
        }
    }
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let body = serde_json::json!({ "error": message.into() });
    (status, Json(body)).into_response()
}

/// GET /health
pub(super) async fn handle_health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// POST /api/generate: forward to `<upstream>/v1beta/models/<model>:generateContent`
pub(super) async fn handle_generate(State(state): State<AppState>, body: Bytes) -> Response {
    let Some(api_key) = state.api_key.clone() else {
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, MISSING_KEY);
    };

    let body: GenerateBody = if body.is_empty() {
        GenerateBody::default()
    } else {
        match serde_json::from_slice(&body) {
            Ok(parsed) => parsed,
            Err(e) => return error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        }
    };

    let model = body
        .model
        .clone()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| state.default_model.to_string());
    let url = format!(
        "{}/v1beta/models/{model}:generateContent",
        state.upstream_base_url
    );
    let payload = UpstreamPayload::from(body);

    let upstream = match state
        .client
        .post(&url)
        .query(&[("key", api_key.as_ref())])
        .json(&payload)
        .send()
        .await
    {
        Ok(resp) => resp,
        Err(e) => {
            let e = e.without_url();
            tracing::warn!(model = model.as_str(), "Upstream request failed: {e}");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
        }
    };

    let status = StatusCode::from_u16(upstream.status().as_u16())
        .unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = upstream
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/json")
        .to_string();
    let bytes = match upstream.bytes().await {
        Ok(bytes) => bytes,
        Err(e) => return error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };

    if status.is_success() {
        tracing::debug!(model = model.as_str(), "Upstream call succeeded");
    } else {
        tracing::warn!(
            model = model.as_str(),
            status = status.as_u16(),
            "Upstream returned an error"
        );
    }

    (status, [(header::CONTENT_TYPE, content_type)], bytes).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_fields_are_not_forwarded() {
        let body: GenerateBody = serde_json::from_str(
            r#"{"model":"m","contents":[{"parts":[{"text":"hi"}]}],"systemInstruction":{"parts":[]},"secret":"x"}"#,
        )
        .unwrap();
        let json = serde_json::to_value(UpstreamPayload::from(body)).unwrap();

        assert!(json.get("secret").is_none());
        assert!(json.get("model").is_none());
        assert!(json.get("systemInstruction").is_some());
        assert!(json.get("tools").is_none());
    }

    #[test]
    fn missing_contents_become_empty_list() {
        let json = serde_json::to_value(UpstreamPayload::from(GenerateBody::default())).unwrap();
        assert_eq!(json["contents"], serde_json::json!([]));
    }
}
