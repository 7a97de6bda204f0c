//! Step working copies
//!
//! Each editing step keeps a local working copy, prefilled from the draft on
//! entry. Nothing reaches the draft until the step's gate passes and the
//! working copy is turned into a [`DraftPatch`].

use crate::machine::WizardStep;
use crate::validation::{
    is_valid_description, is_valid_title, validate_description, validate_tier, validate_title,
    LengthGauge, TextField, ValidationError,
};
use chrono::{DateTime, Utc};
use predictpix_core::{
    DraftPatch, FeePolicy, MarketDraft, OutcomeMetadata, Schedule, Tier, DEFAULT_NO_LABEL,
    DEFAULT_YES_LABEL,
};
use rust_decimal::Decimal;

pub const OUTCOME_DESCRIPTION_PLACEHOLDER: &str = "Add description (optional)";
pub const SOURCE_PLACEHOLDER: &str = "Enter URL or description of resolution source";

// ============================================================================
// Tier
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TierForm {
    selected: Option<Tier>,
}

impl TierForm {
    pub fn load(draft: &MarketDraft) -> Self {
        Self {
            selected: draft.tier(),
        }
    }

    pub fn select(&mut self, tier: Tier) {
        self.selected = Some(tier);
    }

    pub fn selected(&self) -> Option<Tier> {
        self.selected
    }

    pub fn is_passable(&self) -> bool {
        self.selected.is_some()
    }

    pub fn to_patch(&self) -> Result<DraftPatch, ValidationError> {
        let tier = validate_tier(self.selected)?;
        Ok(DraftPatch::new().tier(tier))
    }
}

// ============================================================================
// Title / Description
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleForm {
    text: String,
}

impl TitleForm {
    pub fn load(draft: &MarketDraft) -> Self {
        Self {
            text: draft.title().unwrap_or_default().to_string(),
        }
    }

    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn gauge(&self) -> LengthGauge {
        LengthGauge::measure(TextField::Title, &self.text)
    }

    pub fn is_passable(&self) -> bool {
        is_valid_title(&self.text)
    }

    pub fn to_patch(&self) -> Result<DraftPatch, ValidationError> {
        validate_title(&self.text)?;
        Ok(DraftPatch::new().title(self.text.clone()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptionForm {
    text: String,
}

impl DescriptionForm {
    pub fn load(draft: &MarketDraft) -> Self {
        Self {
            text: draft.description().unwrap_or_default().to_string(),
        }
    }

    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn gauge(&self) -> LengthGauge {
        LengthGauge::measure(TextField::Description, &self.text)
    }

    pub fn is_passable(&self) -> bool {
        is_valid_description(&self.text)
    }

    pub fn to_patch(&self) -> Result<DraftPatch, ValidationError> {
        validate_description(&self.text)?;
        Ok(DraftPatch::new().description(self.text.clone()))
    }
}

// ============================================================================
// Outcomes
// ============================================================================

/// Editable fields of the outcomes step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeField {
    Yes,
    YesDescription,
    No,
    NoDescription,
    Source,
}

/// Working copy of the outcomes step
///
/// Labels start at "Yes"/"No"; a stored value only replaces a default when
/// it is non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomesForm {
    pub yes: String,
    pub yes_description: String,
    pub no: String,
    pub no_description: String,
    pub source: String,
}

impl Default for OutcomesForm {
    fn default() -> Self {
        Self {
            yes: DEFAULT_YES_LABEL.to_string(),
            yes_description: String::new(),
            no: DEFAULT_NO_LABEL.to_string(),
            no_description: String::new(),
            source: String::new(),
        }
    }
}

impl OutcomesForm {
    pub fn load(draft: &MarketDraft) -> Self {
        let mut form = Self::default();
        let Some(metadata) = draft.metadata() else {
            return form;
        };

        let prefill = |slot: &mut String, stored: &Option<String>| {
            if let Some(value) = stored.as_deref().filter(|v| !v.is_empty()) {
                *slot = value.to_string();
            }
        };
        prefill(&mut form.yes, &metadata.yes);
        prefill(&mut form.yes_description, &metadata.yes_description);
        prefill(&mut form.no, &metadata.no);
        prefill(&mut form.no_description, &metadata.no_description);
        prefill(&mut form.source, &metadata.source);
        form
    }

    pub fn set(&mut self, field: OutcomeField, value: impl Into<String>) {
        let value = value.into();
        match field {
            OutcomeField::Yes => self.yes = value,
            OutcomeField::YesDescription => self.yes_description = value,
            OutcomeField::No => self.no = value,
            OutcomeField::NoDescription => self.no_description = value,
            OutcomeField::Source => self.source = value,
        }
    }

    pub fn get(&self, field: OutcomeField) -> &str {
        match field {
            OutcomeField::Yes => &self.yes,
            OutcomeField::YesDescription => &self.yes_description,
            OutcomeField::No => &self.no,
            OutcomeField::NoDescription => &self.no_description,
            OutcomeField::Source => &self.source,
        }
    }

    pub fn to_metadata(&self) -> OutcomeMetadata {
        OutcomeMetadata::complete(
            self.yes.clone(),
            self.yes_description.clone(),
            self.no.clone(),
            self.no_description.clone(),
            self.source.clone(),
        )
    }

    /// Metadata plus the fields derived when the step is confirmed at `now`
    pub fn to_patch(&self, now: DateTime<Utc>) -> DraftPatch {
        DraftPatch::new()
            .metadata(self.to_metadata())
            .schedule(Schedule::anchored_at(now))
            .fees(FeePolicy::STANDARD)
    }
}

// ============================================================================
// Review
// ============================================================================

/// Read-only view of the accumulated draft shown on the review screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSummary {
    pub tier: Option<Tier>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub yes_label: String,
    pub yes_description: Option<String>,
    pub no_label: String,
    pub no_description: Option<String>,
    pub source: Option<String>,
    pub end_time: Option<DateTime<Utc>>,
    pub resolution_time: Option<DateTime<Utc>>,
    pub creator_fee_percentage: Option<Decimal>,
    pub platform_fee_percentage: Option<Decimal>,
}

impl ReviewSummary {
    pub fn from_draft(draft: &MarketDraft) -> Self {
        let metadata = draft.metadata().cloned().unwrap_or_default();
        let non_empty = |value: Option<String>| value.filter(|v| !v.is_empty());

        Self {
            tier: draft.tier(),
            title: draft.title().map(str::to_string),
            description: draft.description().map(str::to_string),
            yes_label: metadata.yes_label().to_string(),
            no_label: metadata.no_label().to_string(),
            yes_description: non_empty(metadata.yes_description),
            no_description: non_empty(metadata.no_description),
            source: non_empty(metadata.source),
            end_time: draft.end_time(),
            resolution_time: draft.resolution_time(),
            creator_fee_percentage: draft.creator_fee_percentage(),
            platform_fee_percentage: draft.platform_fee_percentage(),
        }
    }
}

// ============================================================================
// Working copy
// ============================================================================

/// Working copy for whichever step is active
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkingCopy {
    Tier(TierForm),
    Title(TitleForm),
    Description(DescriptionForm),
    Outcomes(OutcomesForm),
    /// Review, Submitting and SubmitFailed show the draft read-only
    Review(Box<ReviewSummary>),
    Closed,
}

impl WorkingCopy {
    /// Fresh working copy for `step`, prefilled from `draft`
    pub fn load(step: WizardStep, draft: &MarketDraft) -> Self {
        match step {
            WizardStep::TierSelect => WorkingCopy::Tier(TierForm::load(draft)),
            WizardStep::Title => WorkingCopy::Title(TitleForm::load(draft)),
            WizardStep::Description => WorkingCopy::Description(DescriptionForm::load(draft)),
            WizardStep::Outcomes => WorkingCopy::Outcomes(OutcomesForm::load(draft)),
            WizardStep::Review | WizardStep::Submitting | WizardStep::SubmitFailed => {
                WorkingCopy::Review(Box::new(ReviewSummary::from_draft(draft)))
            }
            WizardStep::Submitted => WorkingCopy::Closed,
        }
    }

    pub fn review(&self) -> Option<&ReviewSummary> {
        match self {
            WorkingCopy::Review(summary) => Some(&**summary),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use predictpix_core::MergePolicy;
    use rust_decimal::Decimal;

    fn draft(patch: DraftPatch) -> MarketDraft {
        MarketDraft::new().merged(&patch, MergePolicy::Shallow)
    }

    #[test]
    fn test_tier_form_prefills_and_gates() {
        let mut form = TierForm::load(&MarketDraft::new());
        assert!(!form.is_passable());
        assert_eq!(form.to_patch(), Err(ValidationError::TierMissing));

        form.select(Tier::Partner);
        assert_eq!(form.to_patch().unwrap().tier, Some(Tier::Partner));

        let form = TierForm::load(&draft(DraftPatch::new().tier(Tier::Basic)));
        assert_eq!(form.selected(), Some(Tier::Basic));
    }

    #[test]
    fn test_title_form_prefill_and_gauge() {
        let form = TitleForm::load(&draft(DraftPatch::new().title("Stored market title")));
        assert_eq!(form.text(), "Stored market title");
        assert_eq!(form.gauge().to_string(), "19/100");
        assert!(form.is_passable());

        let mut form = TitleForm::default();
        form.set("short");
        assert!(!form.is_passable());
        assert!(form.to_patch().is_err());
    }

    #[test]
    fn test_description_form_gate() {
        let mut form = DescriptionForm::default();
        form.set("d".repeat(49));
        assert!(form.to_patch().is_err());

        form.set("d".repeat(50));
        assert_eq!(form.to_patch().unwrap().description, Some("d".repeat(50)));
    }

    #[test]
    fn test_outcomes_defaults() {
        let form = OutcomesForm::load(&MarketDraft::new());
        assert_eq!(form.yes, "Yes");
        assert_eq!(form.no, "No");
        assert!(form.source.is_empty());
    }

    #[test]
    fn test_outcomes_prefill_skips_empty_values() {
        let stored = draft(DraftPatch::new().metadata(OutcomeMetadata::complete(
            "",
            "Team A wins",
            "Draw or loss",
            "",
            "fifa.com",
        )));
        let form = OutcomesForm::load(&stored);

        assert_eq!(form.yes, "Yes");
        assert_eq!(form.yes_description, "Team A wins");
        assert_eq!(form.no, "Draw or loss");
        assert_eq!(form.get(OutcomeField::Source), "fifa.com");
    }

    #[test]
    fn test_outcomes_patch_stamps_schedule_and_fees() {
        let now = Utc.with_ymd_and_hms(2025, 3, 14, 15, 9, 26).unwrap();
        let mut form = OutcomesForm::default();
        form.set(OutcomeField::Source, "Official results page");

        let patch = form.to_patch(now);
        let schedule = patch.schedule.unwrap();
        assert_eq!(schedule.end_time() - now, Duration::days(5));
        assert_eq!(schedule.resolution_time() - now, Duration::days(7));
        assert_eq!(patch.fees, Some(FeePolicy::STANDARD));

        let metadata = patch.metadata.unwrap();
        assert_eq!(metadata.yes.as_deref(), Some("Yes"));
        assert_eq!(metadata.source.as_deref(), Some("Official results page"));
    }

    #[test]
    fn test_review_summary_reads_draft() {
        let now = Utc.with_ymd_and_hms(2025, 3, 14, 0, 0, 0).unwrap();
        let full = draft(
            DraftPatch::new()
                .tier(Tier::Trusted)
                .title("Will BTC close above 100k?")
                .metadata(OutcomeMetadata::complete("Above", "", "Below", "", ""))
                .schedule(Schedule::anchored_at(now))
                .fees(FeePolicy::STANDARD),
        );
        let summary = ReviewSummary::from_draft(&full);

        assert_eq!(summary.tier, Some(Tier::Trusted));
        assert_eq!(summary.yes_label, "Above");
        assert_eq!(summary.yes_description, None);
        assert_eq!(summary.source, None);
        assert_eq!(summary.description, None);
        assert_eq!(summary.creator_fee_percentage, Some(Decimal::ONE));
        assert_eq!(summary.end_time, Some(now + Duration::days(5)));
    }

    #[test]
    fn test_working_copy_per_step() {
        let empty = MarketDraft::new();
        assert!(matches!(
            WorkingCopy::load(WizardStep::TierSelect, &empty),
            WorkingCopy::Tier(_)
        ));
        assert!(WorkingCopy::load(WizardStep::Submitting, &empty)
            .review()
            .is_some());
        assert_eq!(
            WorkingCopy::load(WizardStep::Submitted, &empty),
            WorkingCopy::Closed
        );
    }
}
