//! The closed set of editable dream fields and their validation rules.
//!
//! Creation steps and the edit flow share the same rules: a field name is
//! never dispatched dynamically, it is one of these variants, and a raw
//! input string only becomes a [`FieldValue`] by passing the matching
//! validator.

use chrono::NaiveDate;
use thiserror::Error;

pub const TITLE_MAX_CHARS: usize = 255;
pub const TAGS_MAX_CHARS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DreamField {
    Title,
    Description,
    Tags,
    Notes,
    DreamDate,
}

/// A validated value, ready to be written to storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Title(String),
    Description(String),
    Tags(String),
    Notes(String),
    DreamDate(NaiveDate),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("value must not be empty")]
    Empty,
    #[error("title is limited to {TITLE_MAX_CHARS} characters")]
    TitleTooLong,
    #[error("tags are limited to {TAGS_MAX_CHARS} characters")]
    TagsTooLong,
    #[error("date must be formatted as YYYY-MM-DD")]
    InvalidDate,
}

impl FieldError {
    /// Locale key for the reprompt; the empty case depends on which step
    /// asked for input, so the caller names it.
    pub fn prompt_key(&self, empty_key: &'static str) -> &'static str {
        match self {
            FieldError::Empty => empty_key,
            FieldError::TitleTooLong => "new_dream.title_too_long",
            FieldError::TagsTooLong => "new_dream.tags_too_long",
            FieldError::InvalidDate => "new_dream.invalid_date",
        }
    }
}

impl DreamField {
    pub const ALL: [DreamField; 5] = [
        DreamField::Title,
        DreamField::Description,
        DreamField::Tags,
        DreamField::Notes,
        DreamField::DreamDate,
    ];

    /// Stable key used in `edit:<key>` callback payloads.
    pub fn callback_key(self) -> &'static str {
        match self {
            DreamField::Title => "title",
            DreamField::Description => "description",
            DreamField::Tags => "tags",
            DreamField::Notes => "notes",
            DreamField::DreamDate => "dream_date",
        }
    }

    pub fn from_callback_key(key: &str) -> Option<DreamField> {
        DreamField::ALL
            .into_iter()
            .find(|field| field.callback_key() == key)
    }

    /// Locale key of the button label in the edit field menu.
    pub fn label_key(self) -> &'static str {
        match self {
            DreamField::Title => "edit.field_title",
            DreamField::Description => "edit.field_description",
            DreamField::Tags => "edit.field_tags",
            DreamField::Notes => "edit.field_notes",
            DreamField::DreamDate => "edit.field_date",
        }
    }

    /// Locale key of the "send the new value" prompt.
    pub fn prompt_key(self) -> &'static str {
        match self {
            DreamField::Title => "edit.enter_title",
            DreamField::Description => "edit.enter_description",
            DreamField::Tags => "edit.enter_tags",
            DreamField::Notes => "edit.enter_notes",
            DreamField::DreamDate => "edit.enter_date",
        }
    }

    pub fn validate(self, input: &str) -> Result<FieldValue, FieldError> {
        match self {
            DreamField::Title => title(input).map(FieldValue::Title),
            DreamField::Description => free_text(input).map(FieldValue::Description),
            DreamField::Tags => tags(input).map(FieldValue::Tags),
            DreamField::Notes => free_text(input).map(FieldValue::Notes),
            DreamField::DreamDate => dream_date(input).map(FieldValue::DreamDate),
        }
    }
}

pub fn title(input: &str) -> Result<String, FieldError> {
    let value = input.trim();
    if value.is_empty() {
        return Err(FieldError::Empty);
    }
    if value.chars().count() > TITLE_MAX_CHARS {
        return Err(FieldError::TitleTooLong);
    }
    Ok(value.to_owned())
}

pub fn tags(input: &str) -> Result<String, FieldError> {
    let value = input.trim();
    if value.is_empty() {
        return Err(FieldError::Empty);
    }
    if value.chars().count() > TAGS_MAX_CHARS {
        return Err(FieldError::TagsTooLong);
    }
    Ok(value.to_owned())
}

pub fn free_text(input: &str) -> Result<String, FieldError> {
    let value = input.trim();
    if value.is_empty() {
        return Err(FieldError::Empty);
    }
    Ok(value.to_owned())
}

pub fn dream_date(input: &str) -> Result<NaiveDate, FieldError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| FieldError::InvalidDate)
}

/// Fields collected step by step while a new dream is being recorded.
/// Optional fields stay empty when skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DreamDraft {
    pub title: String,
    pub description: String,
    pub tags: String,
    pub notes: String,
}
