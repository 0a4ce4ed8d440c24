// manigoal-core/src/api.rs

//! Handles the outbound call to the chat completion endpoint.

use crate::config::CompanionConfig;
use crate::errors::CompanionError;
use crate::models::chat::{ApiResponse, ChatMessage};
use crate::persona::STOP_SEQUENCES;
use reqwest::{header, Client};
use serde_json::{json, Value};
use tracing::{debug, error, trace};

/// Helper function to format headers for logging, excluding Authorization.
fn format_headers_for_log(headers: &header::HeaderMap) -> String {
    let mut formatted = String::from("{");
    for (name, value) in headers.iter() {
        if name != header::AUTHORIZATION {
            if formatted.len() > 1 {
                formatted.push_str(", ");
            }
            formatted.push_str(&format!(
                "\"{}\": \"{}\"",
                name.as_str(),
                value.to_str().unwrap_or("<invalid header value>")
            ));
        }
    }
    formatted.push('}');
    formatted
}

/// Builds the JSON body for a completion request.
pub fn build_completion_request(config: &CompanionConfig, messages: &[ChatMessage]) -> Value {
    let params = &config.parameters;
    json!({
        "model": config.model_name,
        "messages": messages,
        "temperature": params.temperature,
        "max_tokens": params.max_tokens,
        "top_p": params.top_p,
        "presence_penalty": params.presence_penalty,
        "frequency_penalty": params.frequency_penalty,
        "stream": false,
        "stop": STOP_SEQUENCES,
    })
}

/// Bearer auth plus the attribution headers OpenRouter asks for.
pub fn build_headers(config: &CompanionConfig) -> Result<header::HeaderMap, CompanionError> {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/json"),
    );
    let bearer = header::HeaderValue::from_str(&format!("Bearer {}", config.api_key()))
        .map_err(|_| CompanionError::config("API key contains characters not allowed in a header."))?;
    headers.insert(header::AUTHORIZATION, bearer);
    for (name, value) in [("http-referer", &config.referer), ("x-title", &config.app_title)] {
        let val = header::HeaderValue::from_str(value).map_err(|_| {
            CompanionError::config(format!("'{}' is not a valid value for header {}.", value, name))
        })?;
        headers.insert(header::HeaderName::from_static(name), val);
    }
    Ok(headers)
}

/// Pulls `choices[0].message.content` out of a response body.
pub fn parse_completion_text(response_body: &str) -> Result<String, CompanionError> {
    let response: ApiResponse = serde_json::from_str(response_body).map_err(|e| {
        CompanionError::invalid_response(format!("{}: {}", e, response_body))
    })?;
    response
        .first_content()
        .map(str::to_string)
        .ok_or_else(|| CompanionError::invalid_response(format!("missing completion content: {}", response_body)))
}

/// Sends one completion request and returns the raw completion text.
///
/// The whole exchange (connect, send, read body) is bounded by
/// `config.timeout`; when it elapses the request future is dropped and
/// [`CompanionError::Timeout`] is returned.
pub async fn call_chat_completion_api(
    http_client: &Client,
    config: &CompanionConfig,
    messages: &[ChatMessage],
) -> Result<String, CompanionError> {
    let endpoint = config.completions_endpoint();
    trace!(endpoint = %endpoint, model = %config.model_name, num_messages = messages.len(), "Entering call_chat_completion_api");

    let headers = build_headers(config)?;
    let payload = build_completion_request(config, messages);
    debug!(headers = %format_headers_for_log(&headers), "Prepared completion request headers.");
    trace!(payload = %serde_json::to_string_pretty(&payload).unwrap_or_else(|e| format!("Serialization error: {}", e)), "Completion request payload");

    let exchange = async {
        let response = http_client
            .post(&endpoint)
            .headers(headers)
            .json(&payload)
            .send()
            .await?;
        let status = response.status();
        let response_text = response.text().await?;
        if !status.is_success() {
            return Err(CompanionError::Status {
                status,
                body: response_text,
            });
        }
        Ok::<_, CompanionError>(response_text)
    };

    let response_text = match tokio::time::timeout(config.timeout, exchange).await {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            error!(error = %e, "API request error");
            return Err(e);
        }
        Err(_) => {
            error!(timeout = ?config.timeout, "API request timed out, aborting.");
            return Err(CompanionError::Timeout(config.timeout));
        }
    };
    trace!(body = %response_text, "Completion response body");

    parse_completion_text(&response_text).map_err(|e| {
        error!(error = %e, "API request error");
        e
    })
}
