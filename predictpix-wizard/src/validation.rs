//! Step gates
//!
//! Pure checks run against a step's working copy before it is merged into
//! the draft. Lengths are counted in UTF-16 code units, as the app's text
//! inputs report them.

use crate::steps::OutcomesForm;
use predictpix_core::Tier;
use std::fmt;
use std::ops::RangeInclusive;
use thiserror::Error;

/// Accepted title length, inclusive
pub const TITLE_LENGTH: RangeInclusive<usize> = 10..=100;

/// Accepted description length, inclusive
pub const DESCRIPTION_LENGTH: RangeInclusive<usize> = 50..=1000;

/// Free-text fields with a length gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Title,
    Description,
}

impl TextField {
    pub fn bounds(&self) -> RangeInclusive<usize> {
        match self {
            TextField::Title => TITLE_LENGTH,
            TextField::Description => DESCRIPTION_LENGTH,
        }
    }
}

impl fmt::Display for TextField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextField::Title => f.write_str("Title"),
            TextField::Description => f.write_str("Description"),
        }
    }
}

/// Why a step gate refused its working copy
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Select a tier to continue")]
    TierMissing,

    #[error("{field} must be between {min} and {max} characters")]
    Length {
        field: TextField,
        min: usize,
        max: usize,
        actual: usize,
    },
}

fn char_len(text: &str) -> usize {
    text.encode_utf16().count()
}

fn check_length(field: TextField, text: &str) -> Result<(), ValidationError> {
    let bounds = field.bounds();
    let actual = char_len(text);
    if bounds.contains(&actual) {
        Ok(())
    } else {
        Err(ValidationError::Length {
            field,
            min: *bounds.start(),
            max: *bounds.end(),
            actual,
        })
    }
}

pub fn is_valid_title(title: &str) -> bool {
    TITLE_LENGTH.contains(&char_len(title))
}

pub fn is_valid_description(description: &str) -> bool {
    DESCRIPTION_LENGTH.contains(&char_len(description))
}

pub fn validate_tier(selected: Option<Tier>) -> Result<Tier, ValidationError> {
    selected.ok_or(ValidationError::TierMissing)
}

pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    check_length(TextField::Title, title)
}

pub fn validate_description(description: &str) -> Result<(), ValidationError> {
    check_length(TextField::Description, description)
}

/// Outcome labels, descriptions and source are all optional
pub fn validate_outcomes(_form: &OutcomesForm) -> Result<(), ValidationError> {
    Ok(())
}

/// Character counter and "valid length" indicator shown under a text input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthGauge {
    pub len: usize,
    pub max: usize,
    pub is_valid: bool,
}

impl LengthGauge {
    pub fn measure(field: TextField, text: &str) -> Self {
        let bounds = field.bounds();
        let len = char_len(text);
        Self {
            len,
            max: *bounds.end(),
            is_valid: bounds.contains(&len),
        }
    }
}

impl fmt::Display for LengthGauge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.len, self.max)
    }
}
