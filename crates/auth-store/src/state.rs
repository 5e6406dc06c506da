//! Shared "is authenticated" flag.

use crate::error::AuthStoreError;
use crate::storage::TokenStorage;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Storage key the login flow writes the access token under.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";

/// Authentication presence flag shared by every holder of the handle.
///
/// The flag only records whether an access token was present when the
/// state was initialised. It is never re-validated against the token's
/// contents or expiry.
#[derive(Debug, Clone, Default)]
pub struct AuthState {
    logged_in: Arc<AtomicBool>,
}

impl AuthState {
    /// Create a state with the flag cleared.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the access token once and derive the flag from its presence.
    ///
    /// An empty token counts as absent. A storage read failure is logged and
    /// also counts as absent.
    pub fn initialize(storage: &dyn TokenStorage) -> Self {
        let state = Self::new();

        match storage.get_item(ACCESS_TOKEN_KEY) {
            Ok(Some(token)) if !token.is_empty() => {
                debug!("Access token found in storage");
                state.set_logged_in(true);
            }
            Ok(_) => debug!("No access token in storage"),
            Err(e) => warn!("Failed to read access token, treating as logged out: {}", e),
        }

        state
    }

    pub fn is_logged_in(&self) -> bool {
        self.logged_in.load(Ordering::Acquire)
    }

    pub fn set_logged_in(&self, logged_in: bool) {
        self.logged_in.store(logged_in, Ordering::Release);
    }

    /// Drop the stored access token and clear the flag.
    ///
    /// Returns whether a token was removed. The flag is cleared even if the
    /// storage write fails.
    pub fn sign_out(&self, storage: &dyn TokenStorage) -> Result<bool, AuthStoreError> {
        self.set_logged_in(false);
        let removed = storage.remove_item(ACCESS_TOKEN_KEY)?;
        info!("Signed out (token removed: {})", removed);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    struct FailingStorage;

    impl TokenStorage for FailingStorage {
        fn get_item(&self, _key: &str) -> Result<Option<String>, AuthStoreError> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into())
        }

        fn set_item(&self, _key: &str, _value: &str) -> Result<(), AuthStoreError> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into())
        }

        fn remove_item(&self, _key: &str) -> Result<bool, AuthStoreError> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into())
        }
    }

    #[test]
    fn test_new_state_is_logged_out() {
        assert!(!AuthState::new().is_logged_in());
    }

    #[test]
    fn test_initialize_with_token() {
        let storage = MemoryStorage::with_item(ACCESS_TOKEN_KEY, "eyJhbGciOi");
        assert!(AuthState::initialize(&storage).is_logged_in());
    }

    #[test]
    fn test_initialize_without_token() {
        let storage = MemoryStorage::new();
        assert!(!AuthState::initialize(&storage).is_logged_in());
    }

    #[test]
    fn test_initialize_with_empty_token() {
        let storage = MemoryStorage::with_item(ACCESS_TOKEN_KEY, "");
        assert!(!AuthState::initialize(&storage).is_logged_in());
    }

    #[test]
    fn test_initialize_ignores_other_keys() {
        let storage = MemoryStorage::with_item("refreshToken", "r");
        assert!(!AuthState::initialize(&storage).is_logged_in());
    }

    #[test]
    fn test_initialize_survives_read_failure() {
        assert!(!AuthState::initialize(&FailingStorage).is_logged_in());
    }

    #[test]
    fn test_initialize_reads_once() {
        let storage = MemoryStorage::new();
        let state = AuthState::initialize(&storage);

        storage.set_item(ACCESS_TOKEN_KEY, "late").unwrap();
        assert!(!state.is_logged_in());
    }

    #[test]
    fn test_setter_visible_to_clones() {
        let state = AuthState::new();
        let consumer = state.clone();

        state.set_logged_in(true);
        assert!(consumer.is_logged_in());

        consumer.set_logged_in(false);
        assert!(!state.is_logged_in());
    }

    #[test]
    fn test_sign_out_removes_token() {
        let storage = MemoryStorage::with_item(ACCESS_TOKEN_KEY, "t");
        let state = AuthState::initialize(&storage);

        assert!(state.sign_out(&storage).unwrap());
        assert!(!state.is_logged_in());
        assert_eq!(storage.get_item(ACCESS_TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_sign_out_clears_flag_on_storage_failure() {
        let state = AuthState::new();
        state.set_logged_in(true);

        assert!(state.sign_out(&FailingStorage).is_err());
        assert!(!state.is_logged_in());
    }
}
