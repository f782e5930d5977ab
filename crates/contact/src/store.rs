use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
    time::Duration,
};

use relayform_shared::{Error, Result};
use tokio::task::JoinHandle;
use validator::Validate;

use crate::{
    ContactFormData, Field, PageContext, SinkConfig, SubmissionOutcome, SubmitStatus, Submitter,
};

/// Callbacks fired once a submission settles.
pub trait SubmitHooks: Send + Sync {
    fn on_success(&self, _form: &ContactFormData) {}

    fn on_error(&self, _message: &str) {}
}

impl SubmitHooks for () {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSnapshot {
    pub form: ContactFormData,
    pub status: SubmitStatus,
    pub message: String,
}

#[derive(Default)]
struct State {
    form: ContactFormData,
    status: SubmitStatus,
    message: String,
    generation: u64,
    reset_timer: Option<JoinHandle<()>>,
    closed: bool,
}

impl State {
    fn cancel_reset(&mut self) {
        if let Some(timer) = self.reset_timer.take() {
            timer.abort();
        }
    }
}

struct Inner {
    state: Mutex<State>,
    submitter: Submitter,
    config: SinkConfig,
}

fn lock(state: &Mutex<State>) -> MutexGuard<'_, State> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Form fields plus the Idle → Submitting → Success/Error → Idle machine.
///
/// Cloning yields another handle to the same form. Only the transition
/// methods below mutate it.
#[derive(Clone)]
pub struct FormStore {
    inner: Arc<Inner>,
}

impl FormStore {
    pub fn new(submitter: Submitter, config: SinkConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(State::default()),
                submitter,
                config,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        lock(&self.inner.state)
    }

    pub fn config(&self) -> &SinkConfig {
        &self.inner.config
    }

    pub fn snapshot(&self) -> FormSnapshot {
        let state = self.lock();

        FormSnapshot {
            form: state.form.clone(),
            status: state.status,
            message: state.message.clone(),
        }
    }

    pub fn form(&self) -> ContactFormData {
        self.lock().form.clone()
    }

    pub fn status(&self) -> SubmitStatus {
        self.lock().status
    }

    pub fn message(&self) -> String {
        self.lock().message.clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.status() == SubmitStatus::Submitting
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Input is locked while a submission is in flight.
    pub fn set_field(&self, field: Field, value: impl Into<String>) -> Result<()> {
        let mut state = self.lock();

        if state.closed {
            return Err(Error::Closed);
        }

        if state.status == SubmitStatus::Submitting {
            return Err(Error::SubmissionInFlight);
        }

        state.form.set_field(field, value);

        Ok(())
    }

    /// Clears fields and message and returns to Idle. Resetting an idle,
    /// empty form changes nothing.
    pub fn reset(&self) -> Result<()> {
        let mut state = self.lock();

        if state.closed {
            return Err(Error::Closed);
        }

        if state.status == SubmitStatus::Submitting {
            return Err(Error::SubmissionInFlight);
        }

        state.cancel_reset();
        state.form.clear();
        state.message.clear();
        state.status = SubmitStatus::Idle;

        Ok(())
    }

    /// Detaches the store: pending timers are aborted and results of
    /// in-flight submissions are dropped.
    pub fn close(&self) {
        let mut state = self.lock();
        state.closed = true;
        state.cancel_reset();
    }

    pub async fn submit(&self, page: &PageContext) -> Result<SubmissionOutcome> {
        self.submit_with_hooks(page, &()).await
    }

    pub async fn submit_with_hooks(
        &self,
        page: &PageContext,
        hooks: &dyn SubmitHooks,
    ) -> Result<SubmissionOutcome> {
        let (form, generation) = {
            let mut state = self.lock();

            if state.closed {
                return Err(Error::Closed);
            }

            if state.status == SubmitStatus::Submitting {
                return Err(Error::SubmissionInFlight);
            }

            state.form.validate()?;
            state.cancel_reset();
            state.generation += 1;
            state.status = SubmitStatus::Submitting;
            state.message.clear();

            (state.form.clone(), state.generation)
        };

        let mut guard = InFlight {
            inner: &self.inner,
            generation,
            settled: false,
        };

        let submission = self
            .inner
            .submitter
            .submit(&form, page, &self.inner.config)
            .await;

        guard.settled = true;
        let outcome = submission.outcome;

        {
            let mut state = self.lock();

            if state.closed || state.generation != generation {
                tracing::debug!(generation, "Dropping result of detached submission");
                return Ok(outcome);
            }

            match &outcome {
                SubmissionOutcome::Success { notice } => {
                    state.status = SubmitStatus::Success;
                    state.form.clear();
                    state.message = notice.clone().unwrap_or_default();

                    if let Some(delay) = self.inner.config.auto_reset_delay {
                        state.reset_timer = Some(self.schedule_reset(generation, delay));
                    }
                }
                SubmissionOutcome::Failure { message } => {
                    state.status = SubmitStatus::Error;
                    state.message = message.to_owned();
                }
            }
        }

        match &outcome {
            SubmissionOutcome::Success { .. } => hooks.on_success(&form),
            SubmissionOutcome::Failure { message } => hooks.on_error(message),
        }

        Ok(outcome)
    }

    fn schedule_reset(&self, generation: u64, delay: Duration) -> JoinHandle<()> {
        let inner: Weak<Inner> = Arc::downgrade(&self.inner);

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let Some(inner) = inner.upgrade() else {
                return;
            };

            let mut state = lock(&inner.state);

            if state.closed
                || state.generation != generation
                || state.status != SubmitStatus::Success
            {
                return;
            }

            state.status = SubmitStatus::Idle;
            state.message.clear();
            state.reset_timer = None;

            tracing::debug!(generation, "Form auto-reset to idle");
        })
    }
}

/// Puts the store back to Idle when a submit future is dropped before the
/// sinks settle.
struct InFlight<'a> {
    inner: &'a Arc<Inner>,
    generation: u64,
    settled: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }

        let mut state = lock(&self.inner.state);
        if state.generation == self.generation && state.status == SubmitStatus::Submitting {
            state.status = SubmitStatus::Idle;
        }
    }
}
