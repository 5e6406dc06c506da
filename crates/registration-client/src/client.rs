//! Registration HTTP client.

use crate::error::RegistrationError;
use crate::types::{FieldErrors, RegistrationRequest};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// Client for the backend's account registration endpoint.
#[derive(Clone)]
pub struct RegistrationClient {
    client: Client,
    base_url: String,
}

impl RegistrationClient {
    /// Create a new registration client.
    ///
    /// `base_url` is the API root; the client appends `/register/`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, RegistrationError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Get the configured API root.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of the registration endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}/register/", self.base_url.trim_end_matches('/'))
    }

    /// Submit a registration.
    ///
    /// Any 2xx status is a success; the body is returned only so callers can
    /// log it and is `Value::Null` when it is not JSON.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: &RegistrationRequest) -> Result<Value, RegistrationError> {
        let response = self
            .client
            .post(self.endpoint())
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                let e = RegistrationError::from(e);
                warn!("Registration request failed: {}", e);
                e
            })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_else(|e| {
            warn!("Failed to read response body: {}", e);
            String::new()
        });

        if status.is_success() {
            debug!("Response body: {}", preview(&body));
            info!("Registration accepted ({})", status);
            Ok(serde_json::from_str(&body).unwrap_or(Value::Null))
        } else {
            Err(Self::extract_error(status, &body))
        }
    }

    /// Turn a non-2xx response into a [`RegistrationError::Rejected`].
    fn extract_error(status: StatusCode, body: &str) -> RegistrationError {
        let errors = match serde_json::from_str::<Value>(body) {
            Ok(value) => {
                let errors = FieldErrors::from_value(&value);
                if errors.is_none() {
                    warn!("Error response has no field errors: {}", value);
                }
                errors
            }
            Err(e) => {
                if !body.is_empty() {
                    error!("Error response is not JSON ({}): {}", e, preview(body));
                }
                None
            }
        };

        if let Some(errors) = &errors {
            warn!("Registration rejected ({}): {:?}", status, errors);
        }

        RegistrationError::Rejected {
            status: status.as_u16(),
            errors,
        }
    }
}

/// First 200 characters of a body, for logging.
fn preview(body: &str) -> &str {
    body.char_indices()
        .nth(200)
        .map_or(body, |(end, _)| &body[..end])
}
