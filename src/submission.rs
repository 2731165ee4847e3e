use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;

use crate::domain::NewSignup;
use crate::domain::Stage;
use crate::domain::WaitlistEmail;
use crate::waitlist_client::WaitlistClient;

/// Delay before a successful form returns to idle, when auto-revert is on
pub const AUTO_REVERT: Duration = Duration::from_secs(5);

// idle --submit--> submitting --ok--> succeeded --(timer)--> idle
//                             \--err-> failed
//
// nothing is terminal; `succeeded` and `failed` both accept a fresh submit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// Optional behaviours of a form
#[derive(Debug, Clone, Copy)]
pub struct FormOptions {
    /// Single-shot revert from `Succeeded` to `Idle`
    pub auto_revert: Option<Duration>,
    /// Whether the stage text is kept and sent at all
    pub collect_stage: bool,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            auto_revert: Some(AUTO_REVERT),
            collect_stage: false,
        }
    }
}

/// What a page needs to render the form. `email` and `stage` are the current
/// contents of the input fields, not necessarily valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormSnapshot {
    pub status: Status,
    pub email: String,
    pub stage: String,
    /// Only set while `status` is `Failed`
    pub error_message: Option<String>,
}

impl Default for FormSnapshot {
    fn default() -> Self {
        Self {
            status: Status::Idle,
            email: String::new(),
            stage: String::new(),
            error_message: None,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Input did not parse; no request was made and the status is unchanged
    Invalid(String),
    /// Another submission of this form is in flight; nothing was done
    AlreadySubmitting,
    Succeeded,
    Failed(String),
}

struct FormState {
    snapshot: FormSnapshot,
    /// Bumped on every accepted submission, so a timer armed by an older
    /// success cannot revert a newer one
    attempt: u64,
    revert: Option<JoinHandle<()>>,
}

impl FormState {
    fn cancel_revert(&mut self) {
        if let Some(handle) = self.revert.take() {
            handle.abort();
        }
    }
}

fn lock(state: &Mutex<FormState>) -> MutexGuard<'_, FormState> {
    // the state is plain data, so it is still coherent after a panic elsewhere
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One waitlist form, e.g. the one on the landing page of a single tab.
///
/// At most one request is in flight per form. Dropping the form cancels a
/// pending revert timer.
pub struct WaitlistForm {
    state: Arc<Mutex<FormState>>,
    client: Arc<WaitlistClient>,
    options: FormOptions,
}

impl WaitlistForm {
    pub fn new(
        client: Arc<WaitlistClient>,
        options: FormOptions,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(FormState {
                snapshot: FormSnapshot::default(),
                attempt: 0,
                revert: None,
            })),
            client,
            options,
        }
    }

    pub fn options(&self) -> FormOptions { self.options }

    pub fn snapshot(&self) -> FormSnapshot { lock(&self.state).snapshot.clone() }

    pub fn status(&self) -> Status { lock(&self.state).snapshot.status }

    /// Inputs and submit button are disabled while a request is in flight, and
    /// while a success is being shown (if it will revert by itself).
    pub fn controls_disabled(&self) -> bool {
        match self.status() {
            Status::Submitting => true,
            Status::Succeeded => self.options.auto_revert.is_some(),
            Status::Idle | Status::Failed => false,
        }
    }

    /// Hide the error of a failed attempt. The entered email is kept.
    pub fn dismiss_error(&self) {
        let mut state = lock(&self.state);
        if state.snapshot.status == Status::Failed {
            state.snapshot.status = Status::Idle;
            state.snapshot.error_message = None;
        }
    }

    /// Validate the input, send it, and record the outcome.
    ///
    /// A no-op while a previous call on the same form is still waiting for the
    /// service. The submitting status is cleared however this call ends, even
    /// if the future is dropped half way.
    #[tracing::instrument(
        name = "Submitting waitlist form",
        skip(self, email, stage),
        fields(waitlist_email = %email)
    )]
    pub async fn submit(
        &self,
        email: String,
        stage: Option<String>,
    ) -> SubmitOutcome {
        let stage = match self.options.collect_stage {
            true => stage.unwrap_or_default(),
            false => String::new(),
        };

        let signup = {
            let mut state = lock(&self.state);
            if state.snapshot.status == Status::Submitting {
                tracing::info!("submission already in flight, ignoring");
                return SubmitOutcome::AlreadySubmitting;
            }

            let signup = match parse_signup(email.clone(), stage.clone()) {
                Ok(signup) => signup,
                Err(e) => {
                    tracing::info!(error.message = %e, "signup rejected before sending");
                    // like a browser blocking an invalid form: the text stays in
                    // the field, nothing else changes. A shown success keeps its
                    // cleared field.
                    if state.snapshot.status != Status::Succeeded {
                        state.snapshot.email = email;
                        state.snapshot.stage = stage;
                    }
                    return SubmitOutcome::Invalid(e);
                }
            };

            state.snapshot.email = email;
            state.snapshot.stage = stage;

            state.cancel_revert();
            state.attempt += 1;
            state.snapshot.status = Status::Submitting;
            state.snapshot.error_message = None;
            signup
        };

        let _submitting = SubmittingGuard(self.state.as_ref());
        let result = self.client.submit(&signup).await;

        let mut state = lock(&self.state);
        match result {
            Ok(()) => {
                tracing::info!("joined waitlist");
                state.snapshot.status = Status::Succeeded;
                state.snapshot.email.clear();
                state.snapshot.stage.clear();
                state.snapshot.error_message = None;
                if let Some(after) = self.options.auto_revert {
                    let handle = spawn_revert(&self.state, state.attempt, after);
                    state.revert = Some(handle);
                }
                SubmitOutcome::Succeeded
            }
            Err(e) => {
                tracing::warn!(
                    error.cause_chain = ?e,
                    error.message = %e,
                    "waitlist signup failed"
                );
                let message = e.to_string();
                state.snapshot.status = Status::Failed;
                state.snapshot.error_message = Some(message.clone());
                SubmitOutcome::Failed(message)
            }
        }
    }
}

impl Drop for WaitlistForm {
    fn drop(&mut self) { lock(&self.state).cancel_revert(); }
}

fn parse_signup(
    email: String,
    stage: String,
) -> Result<NewSignup, String> {
    Ok(NewSignup {
        email: WaitlistEmail::parse(email)?,
        stage: Stage::parse(stage)?,
    })
}

/// Arm the single-shot success -> idle timer. The task only holds a weak
/// reference, so it never keeps a torn-down form alive.
fn spawn_revert(
    state: &Arc<Mutex<FormState>>,
    attempt: u64,
    after: Duration,
) -> JoinHandle<()> {
    let state = Arc::downgrade(state);
    // fixed now, not when the task first gets polled
    let deadline = tokio::time::Instant::now() + after;
    tokio::spawn(async move {
        tokio::time::sleep_until(deadline).await;
        let Some(state) = state.upgrade() else {
            return;
        };
        let mut state = lock(&state);
        if state.attempt == attempt && state.snapshot.status == Status::Succeeded {
            tracing::debug!("reverting waitlist form to idle");
            state.snapshot.status = Status::Idle;
            state.revert = None;
        }
    })
}

/// Clears `Submitting` on drop if no outcome was recorded, i.e. the request
/// future was cancelled or something panicked in between.
struct SubmittingGuard<'a>(&'a Mutex<FormState>);

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        let mut state = lock(self.0);
        if state.snapshot.status == Status::Submitting {
            state.snapshot.status = Status::Idle;
        }
    }
}
