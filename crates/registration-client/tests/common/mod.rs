//! Common test utilities for integration tests.

use registration_client::{RegistrationClient, RegistrationFlow};
use std::time::Duration;
use wiremock::MockServer;

/// Nothing listens on port 1 (tcpmux), so connecting is refused.
pub const CLOSED_PORT_URL: &str = "http://127.0.0.1:1";

/// Start a mock registration backend.
pub async fn mock_backend() -> MockServer {
    MockServer::start().await
}

/// Create a registration client configured for a mock server.
pub fn test_client(mock_server: &MockServer) -> RegistrationClient {
    RegistrationClient::new(mock_server.uri(), Duration::from_secs(5)).unwrap()
}

/// A flow against `client` with the form already filled in.
pub async fn filled_flow(client: RegistrationClient) -> RegistrationFlow<RegistrationClient> {
    let flow = RegistrationFlow::new(client);
    flow.set_username("alice").await;
    flow.set_email("alice@example.com").await;
    flow.set_password("correct horse battery staple").await;
    flow
}

/// Install a test subscriber so flow logs show up with `--nocapture`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("registration_client=debug")
        .try_init();
}
