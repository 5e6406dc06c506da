//! Client-side authentication presence.
//!
//! Holds the access token in persistent local storage and derives a single
//! "logged in" flag from it at startup. The flag is shared by handle, so any
//! component holding an [`AuthState`] can read or flip it.

mod error;
mod state;
mod storage;

pub use error::AuthStoreError;
pub use state::{AuthState, ACCESS_TOKEN_KEY};
pub use storage::{FileStorage, MemoryStorage, TokenStorage};

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_login_then_startup_is_authenticated() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("local_storage.json");

        // A login flow writes the token...
        FileStorage::new(&path)
            .set_item(ACCESS_TOKEN_KEY, "access-token")
            .unwrap();

        // ...and the next startup picks it up.
        let state = AuthState::initialize(&FileStorage::new(&path));
        assert!(state.is_logged_in());
    }

    #[test]
    fn test_sign_out_then_startup_is_anonymous() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join("local_storage.json"));
        storage.set_item(ACCESS_TOKEN_KEY, "access-token").unwrap();

        let state = AuthState::initialize(&storage);
        state.sign_out(&storage).unwrap();

        assert!(!AuthState::initialize(&storage).is_logged_in());
    }

    #[test]
    fn test_storage_usable_as_trait_object() {
        let backends: Vec<Box<dyn TokenStorage>> = vec![
            Box::new(MemoryStorage::with_item(ACCESS_TOKEN_KEY, "t")),
            Box::new(MemoryStorage::new()),
        ];

        let flags: Vec<bool> = backends
            .iter()
            .map(|s| AuthState::initialize(s.as_ref()).is_logged_in())
            .collect();
        assert_eq!(flags, vec![true, false]);
    }
}
