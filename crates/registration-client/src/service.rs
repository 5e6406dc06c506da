//! Registration backend abstraction.

use crate::client::RegistrationClient;
use crate::error::RegistrationError;
use crate::types::RegistrationRequest;
use async_trait::async_trait;
use serde_json::Value;

/// Something that can register an account.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationService: Send + Sync {
    async fn register(&self, request: &RegistrationRequest) -> Result<Value, RegistrationError>;
}

#[async_trait]
impl RegistrationService for RegistrationClient {
    async fn register(&self, request: &RegistrationRequest) -> Result<Value, RegistrationError> {
        RegistrationClient::register(self, request).await
    }
}
