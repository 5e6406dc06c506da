//! Registration form state and the submission state machine.
//!
//! Transitions: `Idle` → `Submitting` → `Succeeded` | `Failed` | `Idle`
//! (cancelled). A finished submission may be submitted again. Form edits
//! never change the submission state.

use crate::service::RegistrationService;
use crate::types::{FieldErrors, RegistrationRequest};
use secrecy::SecretString;
use tokio::sync::{watch, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument};

/// Display state of a registration form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    /// Never carries an empty mapping.
    Failed(FieldErrors),
}

impl SubmissionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SubmissionState::Submitting)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionState::Succeeded)
    }

    pub fn errors(&self) -> Option<&FieldErrors> {
        match self {
            SubmissionState::Failed(errors) => Some(errors),
            _ => None,
        }
    }
}

/// Result of a call to [`RegistrationFlow::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Succeeded,
    Failed,
    /// The cancellation token fired before the server answered.
    Cancelled,
    /// Another submission was still in flight; nothing was sent.
    AlreadySubmitting,
}

/// The three registration fields.
#[derive(Debug, Clone)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    pub password: SecretString,
}

impl Default for RegistrationForm {
    fn default() -> Self {
        Self {
            username: String::new(),
            email: String::new(),
            password: SecretString::new(String::new()),
        }
    }
}

impl RegistrationForm {
    pub fn to_request(&self) -> RegistrationRequest {
        RegistrationRequest {
            username: self.username.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }
}

/// Registration form bound to a backend.
///
/// State changes are published on a watch channel; see [`Self::subscribe`].
pub struct RegistrationFlow<S> {
    service: S,
    form: RwLock<RegistrationForm>,
    state: watch::Sender<SubmissionState>,
}

impl<S: RegistrationService> RegistrationFlow<S> {
    pub fn new(service: S) -> Self {
        let (state, _) = watch::channel(SubmissionState::Idle);
        Self {
            service,
            form: RwLock::new(RegistrationForm::default()),
            state,
        }
    }

    pub async fn set_username(&self, username: impl Into<String>) {
        self.form.write().await.username = username.into();
    }

    pub async fn set_email(&self, email: impl Into<String>) {
        self.form.write().await.email = email.into();
    }

    pub async fn set_password(&self, password: impl Into<String>) {
        self.form.write().await.password = SecretString::new(password.into());
    }

    /// Snapshot of the current field values.
    pub async fn form(&self) -> RegistrationForm {
        self.form.read().await.clone()
    }

    /// Snapshot of the current submission state.
    pub fn state(&self) -> SubmissionState {
        self.state.borrow().clone()
    }

    /// Receive every subsequent state change.
    pub fn subscribe(&self) -> watch::Receiver<SubmissionState> {
        self.state.subscribe()
    }

    /// Submit the form once.
    ///
    /// While a submission is in flight further calls return
    /// [`SubmitOutcome::AlreadySubmitting`] without sending anything. If
    /// `cancel` fires, or the returned future is dropped, the state goes back
    /// to `Idle` and the pending response is discarded.
    #[instrument(skip_all)]
    pub async fn submit(&self, cancel: &CancellationToken) -> SubmitOutcome {
        let started = self.state.send_if_modified(|state| {
            if state.is_loading() {
                false
            } else {
                *state = SubmissionState::Submitting;
                true
            }
        });
        if !started {
            debug!("Submission already in flight, ignoring");
            return SubmitOutcome::AlreadySubmitting;
        }

        let guard = SubmittingGuard::new(&self.state);
        let request = self.form.read().await.to_request();
        info!("Submitting registration for '{}'", request.username);

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            result = async { self.service.register(&request).await } => Some(result),
        };

        let (next, outcome) = match result {
            None => {
                info!("Registration cancelled");
                (SubmissionState::Idle, SubmitOutcome::Cancelled)
            }
            Some(Ok(body)) => {
                debug!("Registration response: {}", body);
                info!("Registration successful");
                (SubmissionState::Succeeded, SubmitOutcome::Succeeded)
            }
            Some(Err(e)) => {
                error!("Registration error: {}", e);
                let errors = e.into_field_errors();
                debug!("Displayed errors: {:?}", errors);
                (SubmissionState::Failed(errors), SubmitOutcome::Failed)
            }
        };

        guard.finish(next);
        outcome
    }
}

/// Leaves `Submitting` on every exit path, including the submit future being dropped.
struct SubmittingGuard<'a> {
    state: &'a watch::Sender<SubmissionState>,
    finished: bool,
}

impl<'a> SubmittingGuard<'a> {
    fn new(state: &'a watch::Sender<SubmissionState>) -> Self {
        Self {
            state,
            finished: false,
        }
    }

    fn finish(mut self, next: SubmissionState) {
        self.state.send_replace(next);
        self.finished = true;
    }
}

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        self.state.send_if_modified(|state| {
            if state.is_loading() {
                *state = SubmissionState::Idle;
                true
            } else {
                false
            }
        });
    }
}
