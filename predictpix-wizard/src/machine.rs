//! Wizard state machine
//!
//! The step sequence as a pure transition table. Gates and side effects
//! live in the controller; this module only answers "where does this event
//! lead from here".

use std::fmt;

/// Wizard states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WizardStep {
    TierSelect,
    Title,
    Description,
    Outcomes,
    Review,
    Submitting,
    Submitted,
    SubmitFailed,
}

impl WizardStep {
    /// Position in the "Step n of 4" indicator, for the steps that show one
    pub fn progress(&self) -> Option<(u8, u8)> {
        match self {
            WizardStep::Title => Some((1, 4)),
            WizardStep::Description => Some((2, 4)),
            WizardStep::Outcomes => Some((3, 4)),
            WizardStep::Review => Some((4, 4)),
            _ => None,
        }
    }

    /// Screen heading
    pub fn screen_title(&self) -> &'static str {
        match self {
            WizardStep::TierSelect => "Choose Your Market Tier",
            WizardStep::Title | WizardStep::Description | WizardStep::Outcomes => "Create Market",
            WizardStep::Review | WizardStep::Submitting | WizardStep::SubmitFailed => {
                "Review Market"
            }
            WizardStep::Submitted => "Market Submitted",
        }
    }

    /// Steps whose working copy the creator can edit
    pub fn is_editing(&self) -> bool {
        matches!(
            self,
            WizardStep::TierSelect
                | WizardStep::Title
                | WizardStep::Description
                | WizardStep::Outcomes
        )
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.progress() {
            Some((n, of)) => write!(f, "Step {} of {}", n, of),
            None => write!(f, "{:?}", self),
        }
    }
}

/// Steps reachable from the review screen's edit links
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    Title,
    Description,
    Outcomes,
}

impl EditTarget {
    pub fn step(&self) -> WizardStep {
        match self {
            EditTarget::Title => WizardStep::Title,
            EditTarget::Description => WizardStep::Description,
            EditTarget::Outcomes => WizardStep::Outcomes,
        }
    }
}

/// Inputs that drive the wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardEvent {
    Continue,
    Back,
    Edit(EditTarget),
    Submit,
    SubmitSucceeded,
    SubmitRejected,
    /// Failure acknowledged, return to review
    Recover,
    /// "Create Another Market"
    StartOver,
}

/// Result of a legal event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    To(WizardStep),
    /// Leave the wizard; the draft is discarded
    Exit,
}

/// Look up the transition for `event` in state `from`
///
/// Returns `None` when the event is not legal there. Validation gates are
/// not checked here.
pub fn transition(from: WizardStep, event: WizardEvent) -> Option<Transition> {
    use Transition::{Exit, To};
    use WizardEvent::*;
    use WizardStep::*;

    let next = match (from, event) {
        (TierSelect, Continue) => To(Title),
        (Title, Continue) => To(Description),
        (Description, Continue) => To(Outcomes),
        (Outcomes, Continue) => To(Review),

        (TierSelect, Back) => Exit,
        (Title, Back) => To(TierSelect),
        (Description, Back) => To(Title),
        (Outcomes, Back) => To(Description),
        (Review, Back) => To(Outcomes),
        // leaving while in flight drops the pending response
        (Submitting, Back) => To(Review),
        (SubmitFailed, Back) => To(Review),
        (Submitted, Back) => Exit,

        (Review, Edit(target)) => To(target.step()),

        (Review, Submit) => To(Submitting),
        (Submitting, SubmitSucceeded) => To(Submitted),
        (Submitting, SubmitRejected) => To(SubmitFailed),
        (SubmitFailed, Recover) => To(Review),

        (Submitted, StartOver) => To(TierSelect),

        _ => return None,
    };
    Some(next)
}
