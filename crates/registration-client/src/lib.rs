//! Account registration against the backend's `POST /register/` endpoint.
//!
//! [`RegistrationClient`] performs the HTTP call and sorts failures into the
//! three cases a user can act on (server validation, no response, request
//! never sent). [`RegistrationFlow`] owns the form fields and drives a single
//! submission through an explicit [`SubmissionState`].

mod client;
mod error;
mod flow;
mod service;
mod types;

pub use client::RegistrationClient;
pub use error::{RegistrationError, GENERIC_MESSAGE, UNREACHABLE_MESSAGE};
pub use flow::{RegistrationFlow, RegistrationForm, SubmissionState, SubmitOutcome};
pub use service::RegistrationService;
pub use types::*;
