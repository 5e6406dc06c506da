//! Plain-text rendering of form and session state.

use registration_client::{FieldErrors, SubmissionState, NON_FIELD_ERRORS};
use std::fmt::Write;

/// Fields shown under their own input, in form order.
const FORM_FIELDS: [&str; 3] = ["username", "email", "password"];

/// Render the submission state. `Idle` renders as nothing.
pub fn render_state(state: &SubmissionState) -> String {
    match state {
        SubmissionState::Idle => String::new(),
        SubmissionState::Submitting => "Please wait...".into(),
        SubmissionState::Succeeded => "Registration Successful".into(),
        SubmissionState::Failed(errors) => render_errors(errors),
    }
}

/// Field errors first (form fields in form order, then anything else the
/// server sent), followed by the non-field alert block.
pub fn render_errors(errors: &FieldErrors) -> String {
    let mut out = String::new();

    let extra = errors
        .iter()
        .map(|(field, _)| field)
        .filter(|field| !FORM_FIELDS.iter().any(|f| f == field) && *field != NON_FIELD_ERRORS);

    for field in FORM_FIELDS.into_iter().chain(extra) {
        for message in errors.get(field).unwrap_or_default() {
            let _ = writeln!(out, "{}: {}", field, message);
        }
    }

    if let Some(messages) = errors.non_field_errors() {
        for message in messages {
            let _ = writeln!(out, "error: {}", message);
        }
    }

    out.trim_end().to_string()
}

pub fn render_session(logged_in: bool) -> &'static str {
    if logged_in {
        "Logged in"
    } else {
        "Not logged in"
    }
}
