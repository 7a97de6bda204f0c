//! The in-progress market definition built up by the creation wizard
//!
//! A [`MarketDraft`] only changes through [`MarketDraft::merged`], which
//! returns a new value. Derived fields (the schedule and the fee policy) can
//! only be written as a whole, so `end_time < resolution_time` holds for
//! every draft that carries a schedule.

use crate::tier::Tier;
use chrono::{DateTime, Duration, SubsecRound, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Days between the anchor instant and the end of trading
pub const END_OFFSET_DAYS: i64 = 5;

/// Days between the anchor instant and resolution
pub const RESOLUTION_OFFSET_DAYS: i64 = 7;

/// Default label of the YES outcome
pub const DEFAULT_YES_LABEL: &str = "Yes";

/// Default label of the NO outcome
pub const DEFAULT_NO_LABEL: &str = "No";

// ============================================================================
// Outcome metadata
// ============================================================================

/// Labels and descriptions of the two outcomes plus the resolution source
///
/// Every field is optional so that a partial metadata value can be
/// expressed. The wizard itself always writes all five.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yes_description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_description: Option<String>,

    /// How the real-world outcome will be verified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl OutcomeMetadata {
    /// Metadata with every field set
    pub fn complete(
        yes: impl Into<String>,
        yes_description: impl Into<String>,
        no: impl Into<String>,
        no_description: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            yes: Some(yes.into()),
            yes_description: Some(yes_description.into()),
            no: Some(no.into()),
            no_description: Some(no_description.into()),
            source: Some(source.into()),
        }
    }

    /// Field-by-field merge where the fields present in `other` win
    pub fn overlay(&self, other: &OutcomeMetadata) -> OutcomeMetadata {
        OutcomeMetadata {
            yes: other.yes.clone().or_else(|| self.yes.clone()),
            yes_description: other
                .yes_description
                .clone()
                .or_else(|| self.yes_description.clone()),
            no: other.no.clone().or_else(|| self.no.clone()),
            no_description: other
                .no_description
                .clone()
                .or_else(|| self.no_description.clone()),
            source: other.source.clone().or_else(|| self.source.clone()),
        }
    }

    /// YES label, falling back to the default
    pub fn yes_label(&self) -> &str {
        self.yes.as_deref().unwrap_or(DEFAULT_YES_LABEL)
    }

    /// NO label, falling back to the default
    pub fn no_label(&self) -> &str {
        self.no.as_deref().unwrap_or(DEFAULT_NO_LABEL)
    }
}

// ============================================================================
// Derived fields
// ============================================================================

/// Trading end and resolution instants derived from one anchor instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Schedule {
    end_time: DateTime<Utc>,
    resolution_time: DateTime<Utc>,
}

impl Schedule {
    /// Build the schedule for outcomes confirmed at `anchor`
    pub fn anchored_at(anchor: DateTime<Utc>) -> Self {
        // millisecond precision on the wire
        let anchor = anchor.trunc_subsecs(3);
        Self {
            end_time: anchor + Duration::days(END_OFFSET_DAYS),
            resolution_time: anchor + Duration::days(RESOLUTION_OFFSET_DAYS),
        }
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }

    pub fn resolution_time(&self) -> DateTime<Utc> {
        self.resolution_time
    }
}

/// Fee percentages fixed by platform policy, not entered by the creator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeePolicy {
    #[serde(with = "rust_decimal::serde::float")]
    creator_fee_percentage: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    platform_fee_percentage: Decimal,
}

impl FeePolicy {
    /// 1% to the creator, 2% to the platform
    pub const STANDARD: FeePolicy = FeePolicy {
        creator_fee_percentage: Decimal::ONE,
        platform_fee_percentage: Decimal::TWO,
    };

    pub fn creator_fee_percentage(&self) -> Decimal {
        self.creator_fee_percentage
    }

    pub fn platform_fee_percentage(&self) -> Decimal {
        self.platform_fee_percentage
    }
}

impl Default for FeePolicy {
    fn default() -> Self {
        FeePolicy::STANDARD
    }
}

// ============================================================================
// Draft
// ============================================================================

/// How nested `metadata` values are combined on merge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
    /// Top-level merge: a metadata patch replaces the stored metadata wholesale
    #[default]
    Shallow,
    /// Metadata sub-fields are merged individually
    DeepMetadata,
}

/// Fields of a draft, used to report what is still missing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    Tier,
    Title,
    Description,
    Metadata,
    Schedule,
    Fees,
}

impl DraftField {
    pub fn as_str(&self) -> &'static str {
        match self {
            DraftField::Tier => "tier",
            DraftField::Title => "title",
            DraftField::Description => "description",
            DraftField::Metadata => "metadata",
            DraftField::Schedule => "end_time/resolution_time",
            DraftField::Fees => "fee percentages",
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The market being assembled by the creation wizard
///
/// Serializes to the payload expected by the market creation endpoint.
/// Absent fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MarketDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    tier: Option<Tier>,

    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<OutcomeMetadata>,

    #[serde(flatten)]
    schedule: Option<Schedule>,

    #[serde(flatten)]
    fees: Option<FeePolicy>,
}

/// A partial set of draft fields to merge into the current draft
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftPatch {
    pub tier: Option<Tier>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub metadata: Option<OutcomeMetadata>,
    pub schedule: Option<Schedule>,
    pub fees: Option<FeePolicy>,
}

impl DraftPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tier(mut self, tier: Tier) -> Self {
        self.tier = Some(tier);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn metadata(mut self, metadata: OutcomeMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = Some(schedule);
        self
    }

    pub fn fees(mut self, fees: FeePolicy) -> Self {
        self.fees = Some(fees);
        self
    }

    /// True when the patch carries no fields
    pub fn is_empty(&self) -> bool {
        self == &DraftPatch::default()
    }
}

impl MarketDraft {
    /// An empty draft, as created when a wizard session starts
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a new draft with `patch` merged in
    ///
    /// Fields present in the patch replace the current ones; absent fields
    /// are kept. Fields are never removed.
    pub fn merged(&self, patch: &DraftPatch, policy: MergePolicy) -> MarketDraft {
        let metadata = match (&patch.metadata, &self.metadata, policy) {
            (Some(incoming), Some(current), MergePolicy::DeepMetadata) => {
                Some(current.overlay(incoming))
            }
            (Some(incoming), _, _) => Some(incoming.clone()),
            (None, current, _) => current.clone(),
        };

        MarketDraft {
            tier: patch.tier.or(self.tier),
            title: patch.title.clone().or_else(|| self.title.clone()),
            description: patch
                .description
                .clone()
                .or_else(|| self.description.clone()),
            metadata,
            schedule: patch.schedule.or(self.schedule),
            fees: patch.fees.or(self.fees),
        }
    }

    pub fn tier(&self) -> Option<Tier> {
        self.tier
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn metadata(&self) -> Option<&OutcomeMetadata> {
        self.metadata.as_ref()
    }

    pub fn schedule(&self) -> Option<Schedule> {
        self.schedule
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.schedule.map(|s| s.end_time())
    }

    pub fn resolution_time(&self) -> Option<DateTime<Utc>> {
        self.schedule.map(|s| s.resolution_time())
    }

    pub fn fees(&self) -> Option<FeePolicy> {
        self.fees
    }

    pub fn creator_fee_percentage(&self) -> Option<Decimal> {
        self.fees.map(|f| f.creator_fee_percentage())
    }

    pub fn platform_fee_percentage(&self) -> Option<Decimal> {
        self.fees.map(|f| f.platform_fee_percentage())
    }

    /// True when no step has written anything yet
    pub fn is_empty(&self) -> bool {
        self == &MarketDraft::default()
    }

    /// Fields that must be present before the draft can be submitted
    pub fn missing_fields(&self) -> Vec<DraftField> {
        let mut missing = Vec::new();
        if self.tier.is_none() {
            missing.push(DraftField::Tier);
        }
        if self.title.is_none() {
            missing.push(DraftField::Title);
        }
        if self.description.is_none() {
            missing.push(DraftField::Description);
        }
        if self.metadata.is_none() {
            missing.push(DraftField::Metadata);
        }
        if self.schedule.is_none() {
            missing.push(DraftField::Schedule);
        }
        if self.fees.is_none() {
            missing.push(DraftField::Fees);
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}
