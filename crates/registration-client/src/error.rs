//! Registration errors and their mapping onto displayable field errors.

use crate::types::FieldErrors;
use thiserror::Error;

/// Shown when the request went out but no response came back.
pub const UNREACHABLE_MESSAGE: &str =
    "Unable to connect to the server. Please make sure the backend server is running.";

/// Shown when nothing more specific can be extracted from a failure.
pub const GENERIC_MESSAGE: &str = "An error occurred while processing your request.";

#[derive(Error, Debug)]
pub enum RegistrationError {
    /// The server answered with a non-2xx status.
    #[error("Registration rejected: HTTP {status}")]
    Rejected {
        status: u16,
        errors: Option<FieldErrors>,
    },

    /// The request was sent but no response was received.
    #[error("No response from server: {0}")]
    Unreachable(String),

    /// The request could not be built or sent.
    #[error("Request setup failed: {0}")]
    Request(String),
}

impl RegistrationError {
    /// Convert into the error mapping shown to the user.
    ///
    /// Never returns an empty mapping.
    pub fn into_field_errors(self) -> FieldErrors {
        match self {
            RegistrationError::Rejected {
                errors: Some(errors),
                ..
            } if !errors.is_empty() => errors,
            RegistrationError::Rejected { .. } => FieldErrors::non_field(GENERIC_MESSAGE),
            RegistrationError::Unreachable(_) => FieldErrors::non_field(UNREACHABLE_MESSAGE),
            RegistrationError::Request(message) if !message.is_empty() => {
                FieldErrors::non_field(message)
            }
            RegistrationError::Request(_) => FieldErrors::non_field(GENERIC_MESSAGE),
        }
    }
}

impl From<reqwest::Error> for RegistrationError {
    fn from(e: reqwest::Error) -> Self {
        // Builder errors never leave the process; everything else failed in flight.
        if e.is_builder() {
            RegistrationError::Request(e.to_string())
        } else {
            RegistrationError::Unreachable(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_with_payload_is_verbatim() {
        let payload: FieldErrors = [("username", vec!["already taken".to_string()])]
            .into_iter()
            .collect();
        let error = RegistrationError::Rejected {
            status: 400,
            errors: Some(payload.clone()),
        };

        assert_eq!(error.into_field_errors(), payload);
    }

    #[test]
    fn test_rejected_without_payload_falls_back() {
        let error = RegistrationError::Rejected {
            status: 500,
            errors: None,
        };
        assert_eq!(
            error.into_field_errors(),
            FieldErrors::non_field(GENERIC_MESSAGE)
        );
    }

    #[test]
    fn test_rejected_with_empty_payload_falls_back() {
        let error = RegistrationError::Rejected {
            status: 400,
            errors: Some(FieldErrors::new()),
        };
        assert_eq!(
            error.into_field_errors(),
            FieldErrors::non_field(GENERIC_MESSAGE)
        );
    }

    #[test]
    fn test_unreachable_uses_fixed_message() {
        let error = RegistrationError::Unreachable("connection refused".into());
        assert_eq!(
            error.into_field_errors(),
            FieldErrors::non_field(UNREACHABLE_MESSAGE)
        );
    }

    #[test]
    fn test_request_uses_its_message() {
        let error = RegistrationError::Request("relative URL without a base".into());
        assert_eq!(
            error.into_field_errors(),
            FieldErrors::non_field("relative URL without a base")
        );
    }

    #[test]
    fn test_request_without_message_falls_back() {
        let error = RegistrationError::Request(String::new());
        assert_eq!(
            error.into_field_errors(),
            FieldErrors::non_field(GENERIC_MESSAGE)
        );
    }
}
