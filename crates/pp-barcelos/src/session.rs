use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    client::{Receipt, WebhookClient},
    error::SubmitError,
    forms::Form,
};

/// Where a form is in its submit cycle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum SubmitState {
    Idle,
    Submitting,
    Submitted { receipt: Receipt },
    Failed { message: String },
}

/// One person's form, from editing to confirmation.
///
/// The form stays editable until a submission succeeds; a failure can be
/// retried by calling [`FormSession::submit`] again.
#[derive(Debug)]
pub struct FormSession<F> {
    form: F,
    state: SubmitState,
}

impl<F: Form> FormSession<F> {
    pub fn new(form: F) -> Self {
        Self {
            form,
            state: SubmitState::Idle,
        }
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    /// `None` once the form has been submitted or while it is in flight.
    pub fn form_mut(&mut self) -> Option<&mut F> {
        match self.state {
            SubmitState::Idle | SubmitState::Failed { .. } => Some(&mut self.form),
            SubmitState::Submitting | SubmitState::Submitted { .. } => None,
        }
    }

    pub fn state(&self) -> &SubmitState {
        &self.state
    }

    pub fn is_submitting(&self) -> bool {
        self.state == SubmitState::Submitting
    }

    /// Return a stuck in-flight session to `Idle`. A dropped
    /// [`FormSession::submit`] future already does this on its own.
    pub fn reset(&mut self) {
        if self.is_submitting() {
            self.state = SubmitState::Idle;
        }
    }

    pub async fn submit(&mut self, client: &WebhookClient) -> Result<Receipt, SubmitError> {
        match self.state {
            SubmitState::Submitting => return Err(SubmitError::InFlight),
            SubmitState::Submitted { .. } => return Err(SubmitError::AlreadySubmitted),
            SubmitState::Idle | SubmitState::Failed { .. } => {}
        }

        let in_flight = InFlight::start(&mut self.state);
        match client.submit(&self.form).await {
            Ok(receipt) => {
                in_flight.finish(SubmitState::Submitted {
                    receipt: receipt.clone(),
                });
                Ok(receipt)
            }
            Err(err) => {
                let form_type = F::FORM_TYPE;
                warn!(%form_type, error = %err, "submission failed");
                in_flight.finish(SubmitState::Failed {
                    message: err.user_message(form_type).to_string(),
                });
                Err(err)
            }
        }
    }
}

/// Holds a session in `Submitting`; back to `Idle` if dropped unfinished.
struct InFlight<'a> {
    state: &'a mut SubmitState,
}

impl<'a> InFlight<'a> {
    fn start(state: &'a mut SubmitState) -> Self {
        *state = SubmitState::Submitting;
        Self { state }
    }

    fn finish(self, next: SubmitState) {
        *self.state = next;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if *self.state == SubmitState::Submitting {
            debug!("submission cancelled before completion");
            *self.state = SubmitState::Idle;
        }
    }
}
