//! Wizard controller
//!
//! Drives a single wizard session: owns the draft store, the active step and
//! its working copy, and the submission to the markets API.

use crate::clock::{Clock, SystemClock};
use crate::machine::{transition, EditTarget, Transition, WizardEvent, WizardStep};
use crate::steps::{OutcomeField, WorkingCopy};
use crate::store::DraftStore;
use crate::validation::{TextField, ValidationError};
use predictpix_api::MarketsApi;
use predictpix_core::{DraftField, Market, MarketDraft, PredictError, PredictResult, Tier};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

/// Blocking alert raised for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new("Error", message)
    }
}

fn join_fields(fields: &[DraftField]) -> String {
    fields
        .iter()
        .map(DraftField::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Wizard errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WizardError {
    #[error(transparent)]
    Gate(#[from] ValidationError),

    #[error("{event:?} is not available on {step:?}")]
    InvalidTransition { step: WizardStep, event: WizardEvent },

    #[error("{0:?} has no editable field for this input")]
    NotEditing(WizardStep),

    #[error("A submission is already in flight")]
    SubmissionInFlight,

    #[error("Market draft is incomplete: missing {}", join_fields(.0))]
    Incomplete(Vec<DraftField>),
}

/// Claim on one submission attempt
///
/// Carries the draft snapshot that was sent. A ticket whose attempt has been
/// abandoned is rejected by [`WizardController::finish_submit`].
#[derive(Debug, Clone)]
pub struct SubmissionTicket {
    epoch: u64,
    draft: MarketDraft,
}

impl SubmissionTicket {
    pub fn draft(&self) -> &MarketDraft {
        &self.draft
    }
}

/// What became of a submission response
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Market created; the wizard shows the confirmation screen
    Created(Market),
    /// Backend refused; the wizard is back on review with the draft intact
    Rejected(PredictError),
    /// The attempt was abandoned before the response arrived
    Stale,
}

/// One market creation session
pub struct WizardController<A: MarketsApi> {
    store: DraftStore,
    api: Arc<A>,
    clock: Arc<dyn Clock>,
    step: WizardStep,
    working: WorkingCopy,
    notification: Option<Notification>,
    /// Bumped on every submission attempt and whenever one is abandoned
    epoch: u64,
    created: Option<Market>,
}

impl<A: MarketsApi> WizardController<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self::with_parts(DraftStore::new(), api, Arc::new(SystemClock))
    }

    /// Build a session from an explicit store and clock
    pub fn with_parts(store: DraftStore, api: Arc<A>, clock: Arc<dyn Clock>) -> Self {
        let working = WorkingCopy::load(WizardStep::TierSelect, &store.get());
        Self {
            store,
            api,
            clock,
            step: WizardStep::TierSelect,
            working,
            notification: None,
            epoch: 0,
            created: None,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> MarketDraft {
        self.store.get()
    }

    pub fn store(&self) -> &DraftStore {
        &self.store
    }

    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    pub fn working(&self) -> &WorkingCopy {
        &self.working
    }

    /// Market returned by the last successful submission
    pub fn created_market(&self) -> Option<&Market> {
        self.created.as_ref()
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    /// Dismiss the pending alert
    pub fn take_notification(&mut self) -> Option<Notification> {
        self.notification.take()
    }

    fn notify(&mut self, notification: Notification) {
        debug!("Notification: {}: {}", notification.title, notification.message);
        self.notification = Some(notification);
    }

    fn lookup(&self, event: WizardEvent) -> Result<Transition, WizardError> {
        transition(self.step, event).ok_or(WizardError::InvalidTransition {
            step: self.step,
            event,
        })
    }

    fn enter(&mut self, step: WizardStep) {
        debug!("Wizard {:?} -> {:?}", self.step, step);
        self.step = step;
        self.working = WorkingCopy::load(step, &self.store.get());
    }

    // ------------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------------

    pub fn select_tier(&mut self, tier: Tier) -> Result<(), WizardError> {
        match &mut self.working {
            WorkingCopy::Tier(form) => {
                form.select(tier);
                Ok(())
            }
            _ => Err(WizardError::NotEditing(self.step)),
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), WizardError> {
        match &mut self.working {
            WorkingCopy::Title(form) => {
                form.set(title);
                Ok(())
            }
            _ => Err(WizardError::NotEditing(self.step)),
        }
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> Result<(), WizardError> {
        match &mut self.working {
            WorkingCopy::Description(form) => {
                form.set(description);
                Ok(())
            }
            _ => Err(WizardError::NotEditing(self.step)),
        }
    }

    pub fn set_outcome(
        &mut self,
        field: OutcomeField,
        value: impl Into<String>,
    ) -> Result<(), WizardError> {
        match &mut self.working {
            WorkingCopy::Outcomes(form) => {
                form.set(field, value);
                Ok(())
            }
            _ => Err(WizardError::NotEditing(self.step)),
        }
    }

    /// Whether the Continue button is enabled
    pub fn can_continue(&self) -> bool {
        match &self.working {
            WorkingCopy::Tier(form) => form.is_passable(),
            WorkingCopy::Title(form) => form.is_passable(),
            WorkingCopy::Description(form) => form.is_passable(),
            WorkingCopy::Outcomes(_) => true,
            WorkingCopy::Review(_) | WorkingCopy::Closed => false,
        }
    }

    // ------------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------------

    /// Run the current step's gate, merge its working copy and move on
    ///
    /// On a failed gate the draft and step are untouched. A failed title
    /// gate also raises an "Invalid Title" alert.
    pub fn continue_step(&mut self) -> Result<WizardStep, WizardError> {
        let Transition::To(next) = self.lookup(WizardEvent::Continue)? else {
            return Err(WizardError::InvalidTransition {
                step: self.step,
                event: WizardEvent::Continue,
            });
        };

        let patch = match &self.working {
            WorkingCopy::Tier(form) => form.to_patch(),
            WorkingCopy::Title(form) => form.to_patch(),
            WorkingCopy::Description(form) => form.to_patch(),
            // derived fields are anchored at the moment outcomes are confirmed
            WorkingCopy::Outcomes(form) => Ok(form.to_patch(self.clock.now())),
            WorkingCopy::Review(_) | WorkingCopy::Closed => {
                return Err(WizardError::NotEditing(self.step))
            }
        };

        let patch = match patch {
            Ok(patch) => patch,
            Err(err) => {
                debug!("Gate refused on {:?}: {}", self.step, err);
                if let ValidationError::Length {
                    field: TextField::Title,
                    ..
                } = err
                {
                    self.notify(Notification::new("Invalid Title", err.to_string()));
                }
                return Err(err.into());
            }
        };

        self.store.update(&patch);
        self.enter(next);
        Ok(next)
    }

    /// Go back one step, discarding the current working copy
    ///
    /// Leaving `Submitting` abandons the attempt: its response will be
    /// ignored.
    pub fn back(&mut self) -> Transition {
        let target = transition(self.step, WizardEvent::Back).unwrap_or(Transition::Exit);
        match target {
            Transition::To(previous) => {
                if self.step == WizardStep::Submitting {
                    self.epoch += 1;
                    warn!("Submission abandoned; its response will be ignored");
                }
                self.enter(previous);
            }
            Transition::Exit => {
                info!("Leaving market creation wizard; draft discarded");
            }
        }
        target
    }

    /// Jump from review to the step behind an edit link
    pub fn edit(&mut self, target: EditTarget) -> Result<WizardStep, WizardError> {
        match self.lookup(WizardEvent::Edit(target))? {
            Transition::To(step) => {
                self.enter(step);
                Ok(step)
            }
            Transition::Exit => Err(WizardError::InvalidTransition {
                step: self.step,
                event: WizardEvent::Edit(target),
            }),
        }
    }

    /// Discard the finished session and start a new draft
    pub fn start_new(&mut self) -> Result<WizardStep, WizardError> {
        self.lookup(WizardEvent::StartOver)?;
        self.store.reset();
        self.created = None;
        self.notification = None;
        self.enter(WizardStep::TierSelect);
        info!("Starting a new market draft");
        Ok(WizardStep::TierSelect)
    }

    // ------------------------------------------------------------------------
    // Submission
    // ------------------------------------------------------------------------

    /// Whether the Submit button is enabled
    pub fn can_submit(&self) -> bool {
        self.step == WizardStep::Review && self.store.get().is_complete()
    }

    /// Lock the wizard into `Submitting` and hand out the draft to send
    ///
    /// An incomplete draft raises an alert and never reaches the network.
    pub fn begin_submit(&mut self) -> Result<SubmissionTicket, WizardError> {
        if self.step == WizardStep::Submitting {
            return Err(WizardError::SubmissionInFlight);
        }
        self.lookup(WizardEvent::Submit)?;

        let draft = self.store.get();
        let missing = draft.missing_fields();
        if !missing.is_empty() {
            let err = WizardError::Incomplete(missing);
            warn!("Refusing to submit: {}", err);
            self.notify(Notification::error(err.to_string()));
            return Err(err);
        }

        self.epoch += 1;
        self.enter(WizardStep::Submitting);
        info!("Submitting market draft (attempt {})", self.epoch);

        Ok(SubmissionTicket {
            epoch: self.epoch,
            draft,
        })
    }

    /// Apply the backend's answer for `ticket`
    pub fn finish_submit(
        &mut self,
        ticket: SubmissionTicket,
        result: PredictResult<Market>,
    ) -> SubmitOutcome {
        if self.step != WizardStep::Submitting || ticket.epoch != self.epoch {
            warn!(
                "Ignoring stale submission response (attempt {}, current {}, step {:?})",
                ticket.epoch, self.epoch, self.step
            );
            return SubmitOutcome::Stale;
        }

        match result {
            Ok(market) => {
                info!("Market {} submitted for review", market.id);
                self.created = Some(market.clone());
                self.enter(WizardStep::Submitted);
                SubmitOutcome::Created(market)
            }
            Err(err) => {
                warn!("Market submission failed: {}", err);
                self.enter(WizardStep::SubmitFailed);
                self.notify(Notification::error(err.user_message()));
                self.enter(WizardStep::Review);
                SubmitOutcome::Rejected(err)
            }
        }
    }

    /// Submit the draft and wait for the backend
    #[instrument(skip(self))]
    pub async fn submit(&mut self) -> Result<SubmitOutcome, WizardError> {
        let ticket = self.begin_submit()?;
        let api = Arc::clone(&self.api);
        let result = api.create_market(ticket.draft()).await;
        Ok(self.finish_submit(ticket, result))
    }
}

impl<A: MarketsApi> std::fmt::Debug for WizardController<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WizardController")
            .field("step", &self.step)
            .field("epoch", &self.epoch)
            .field("revision", &self.store.revision())
            .finish()
    }
}
