//! Interpretation of API responses.
//!
//! Every endpoint reports failure the same way: a JSON body with
//! `success: false`, possibly on a 2xx status. Successful acknowledgements
//! may have an empty or non-JSON body, which is not a parse failure.

use crate::error::{ClientError, Result};
use estate_core::ApiFailure;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Map a reqwest transport error, separating "could not connect" from the rest
pub(crate) fn transport_error(e: reqwest::Error) -> ClientError {
    if e.is_connect() || e.is_timeout() {
        ClientError::ServerUnreachable(e.to_string())
    } else {
        ClientError::Request(e)
    }
}

/// Decode a JSON payload of type `T`, honouring the failure envelope
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
    let status = response.status();
    let body = response.text().await.map_err(transport_error)?;

    check_failure(status, &body)?;

    serde_json::from_str(&body)
        .map_err(|e| ClientError::ParseError(format!("Failed to parse {}: {}", what, e)))
}

/// Accept any successful response, whatever its body
pub(crate) async fn read_ack(response: Response) -> Result<()> {
    let status = response.status();
    let body = response.text().await.map_err(transport_error)?;

    check_failure(status, &body)
}

fn check_failure(status: StatusCode, body: &str) -> Result<()> {
    if let Some(failure) = reported_failure(body) {
        let status = if failure.status_code == 0 {
            status.as_u16()
        } else {
            failure.status_code
        };
        return Err(ClientError::Rejected {
            status,
            message: failure.message,
        });
    }

    if status.is_success() {
        return Ok(());
    }

    let message = if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string()
    } else {
        body.to_string()
    };

    Err(ClientError::ServerError {
        status: status.as_u16(),
        message,
    })
}

/// The envelope, when the body is `{"success": false, ...}`
fn reported_failure(body: &str) -> Option<ApiFailure> {
    let value: Value = serde_json::from_str(body).ok()?;
    if value.get("success") != Some(&Value::Bool(false)) {
        return None;
    }

    let status = value
        .get("statusCode")
        .and_then(Value::as_u64)
        .and_then(|s| u16::try_from(s).ok())
        .unwrap_or(0);
    let message = value
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .unwrap_or("Request failed")
        .to_string();

    Some(ApiFailure::new(status, message))
}
