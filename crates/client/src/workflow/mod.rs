//! Confirm-with-evidence action workflows.
//!
//! Destructive admin actions (completing a payout, reviewing a
//! verification) share one shape: open a confirmation against a target
//! row, collect a draft, validate it locally, submit exactly once, then
//! refresh the owning list. [`ActionWorkflow`] is that machine; the
//! per-action pieces (draft type and validation rule) plug in through
//! [`ReviewAction`].

mod payout;
mod verification;

pub use payout::{EvidenceFile, PayoutCompletion, PayoutDraft};
pub use verification::{ReviewDraft, VerificationReview};

use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;

use crate::gateway::GatewayError;

/// Per-action plug-in: what a workflow targets, what it collects, and
/// the local rule that must hold before any network traffic.
pub trait ReviewAction {
    /// Row the action applies to.
    type Target: Clone + std::fmt::Debug + Send + Sync + 'static;
    /// User-supplied input collected while the confirmation is open.
    type Draft: Clone + std::fmt::Debug + Default + Send + Sync + 'static;

    /// Check the draft locally. An `Err` message blocks submission
    /// entirely; the backend is never contacted.
    fn validate(draft: &Self::Draft) -> Result<(), String>;
}

/// Function that performs the actual submission for an action.
pub type ActionSubmitter<A> = Arc<
    dyn Fn(
            <A as ReviewAction>::Target,
            <A as ReviewAction>::Draft,
        ) -> BoxFuture<'static, Result<(), GatewayError>>
        + Send
        + Sync,
>;

/// Hook run after a successful submission, before the outcome is
/// reported. Typically re-fetches the owning list.
pub type RefreshHook = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

/// Observable state of one workflow instance.
#[derive(Debug)]
pub enum WorkflowState<A: ReviewAction> {
    /// No confirmation is open.
    Closed,
    /// A confirmation is open against `target`.
    Open { target: A::Target, draft: A::Draft },
    /// The submission is in flight.
    Submitting { target: A::Target, draft: A::Draft },
    /// Validation or submission failed; the draft is kept for correction.
    Failed {
        target: A::Target,
        draft: A::Draft,
        message: String,
    },
}

// Derived Clone would demand `A: Clone` on the marker type itself; the
// associated types already carry the bound.
impl<A: ReviewAction> Clone for WorkflowState<A> {
    fn clone(&self) -> Self {
        match self {
            Self::Closed => Self::Closed,
            Self::Open { target, draft } => Self::Open {
                target: target.clone(),
                draft: draft.clone(),
            },
            Self::Submitting { target, draft } => Self::Submitting {
                target: target.clone(),
                draft: draft.clone(),
            },
            Self::Failed {
                target,
                draft,
                message,
            } => Self::Failed {
                target: target.clone(),
                draft: draft.clone(),
                message: message.clone(),
            },
        }
    }
}

/// Errors reported by [`ActionWorkflow::submit`].
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    /// No confirmation is open to submit.
    #[error("no confirmation is open")]
    NotOpen,
    /// The draft failed its local validation rule.
    #[error("{0}")]
    Invalid(String),
    /// The backend rejected or never received the submission.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// One confirm-and-submit cycle against a single target row.
///
/// Instances are independent; a workflow owns no list state beyond the
/// refresh hook it fires after success.
pub struct ActionWorkflow<A: ReviewAction> {
    submitter: ActionSubmitter<A>,
    refresh: Option<RefreshHook>,
    state: Mutex<WorkflowState<A>>,
}

impl<A: ReviewAction> ActionWorkflow<A> {
    /// Create a workflow that submits through `submitter`.
    #[must_use]
    pub fn new(submitter: ActionSubmitter<A>) -> Self {
        Self {
            submitter,
            refresh: None,
            state: Mutex::new(WorkflowState::Closed),
        }
    }

    /// Run `hook` after every successful submission, before the success
    /// is reported to the caller.
    #[must_use]
    pub fn with_refresh(mut self, hook: RefreshHook) -> Self {
        self.refresh = Some(hook);
        self
    }

    /// Open a confirmation against `target` with a default draft.
    ///
    /// Opening while already open replaces the previous target and draft.
    pub fn open(&self, target: A::Target) {
        self.set_state(WorkflowState::Open {
            target,
            draft: A::Draft::default(),
        });
    }

    /// Mutate the draft while the confirmation is open (or failed).
    ///
    /// A no-op when the workflow is closed or submitting.
    pub fn update_draft(&self, mutate: impl FnOnce(&mut A::Draft)) {
        if let Ok(mut state) = self.state.lock() {
            match &mut *state {
                WorkflowState::Open { draft, .. } | WorkflowState::Failed { draft, .. } => {
                    mutate(draft);
                }
                WorkflowState::Closed | WorkflowState::Submitting { .. } => {}
            }
        }
    }

    /// Dismiss the confirmation, discarding the draft. Idempotent.
    pub fn cancel(&self) {
        self.set_state(WorkflowState::Closed);
    }

    /// Current observable state.
    #[must_use]
    pub fn current_state(&self) -> WorkflowState<A> {
        self.state
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or(WorkflowState::Closed)
    }

    /// Validate the draft and submit it.
    ///
    /// Validation failure keeps the confirmation open with the draft
    /// intact and issues no request. On success the refresh hook runs
    /// before `Ok` is returned and the confirmation closes. On a gateway
    /// failure the confirmation stays open with the draft intact.
    ///
    /// # Errors
    ///
    /// [`WorkflowError::NotOpen`] if no confirmation is open,
    /// [`WorkflowError::Invalid`] when the draft fails its local rule, or
    /// [`WorkflowError::Gateway`] when the backend call fails.
    pub async fn submit(&self) -> Result<(), WorkflowError> {
        let (target, draft) = match self.current_state() {
            WorkflowState::Open { target, draft } | WorkflowState::Failed { target, draft, .. } => {
                (target, draft)
            }
            WorkflowState::Closed | WorkflowState::Submitting { .. } => {
                return Err(WorkflowError::NotOpen);
            }
        };

        if let Err(message) = A::validate(&draft) {
            tracing::debug!(%message, "Draft rejected locally");
            self.set_state(WorkflowState::Failed {
                target,
                draft,
                message: message.clone(),
            });
            return Err(WorkflowError::Invalid(message));
        }

        self.set_state(WorkflowState::Submitting {
            target: target.clone(),
            draft: draft.clone(),
        });

        match (self.submitter)(target.clone(), draft.clone()).await {
            Ok(()) => {
                if let Some(hook) = &self.refresh {
                    hook().await;
                }
                self.set_state(WorkflowState::Closed);
                Ok(())
            }
            Err(e) => {
                let message = e.user_message();
                self.set_state(WorkflowState::Failed {
                    target,
                    draft,
                    message,
                });
                Err(WorkflowError::Gateway(e))
            }
        }
    }

    fn set_state(&self, next: WorkflowState<A>) {
        if let Ok(mut guard) = self.state.lock() {
            *guard = next;
        }
    }
}
