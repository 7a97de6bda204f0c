//! Market creation wizard for the PredictPIX client
//!
//! The wizard walks a creator through tier selection, title, description
//! and outcomes, accumulating a single [`predictpix_core::MarketDraft`] in a
//! [`DraftStore`], then submits it through [`predictpix_api::MarketsApi`].
//!
//! The sequence is an explicit state machine ([`machine`]) so it can be
//! driven and tested without any UI.

pub mod clock;
pub mod controller;
pub mod machine;
pub mod steps;
pub mod store;
pub mod validation;

pub use clock::{Clock, FixedClock, SystemClock};
pub use controller::{Notification, SubmissionTicket, SubmitOutcome, WizardController, WizardError};
pub use machine::{transition, EditTarget, Transition, WizardEvent, WizardStep};
pub use steps::{
    DescriptionForm, OutcomeField, OutcomesForm, ReviewSummary, TierForm, TitleForm, WorkingCopy,
};
pub use store::DraftStore;
pub use validation::{
    is_valid_description, is_valid_title, validate_description, validate_outcomes, validate_tier,
    validate_title, LengthGauge, TextField, ValidationError, DESCRIPTION_LENGTH, TITLE_LENGTH,
};
