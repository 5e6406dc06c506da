//! Token storage errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthStoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage format error: {0}")]
    Json(#[from] serde_json::Error),
}
