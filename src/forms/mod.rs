//! Form binding contract shared by every create and update view.
//!
//! Raw submissions are plain serde structs with one `Option<String>` per
//! field. A [`FormBinder`] owns whatever external context the form needs and
//! turns a submission into either cleaned values or a [`BoundForm`] carrying
//! per-field error messages for re-rendering.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::Serialize;
use tera::Context;
use validator::{ValidationError, ValidationErrors};

pub mod products;
pub mod reviews;

/// Key under which errors that concern the whole form are reported.
pub const NON_FIELD_ERRORS: &str = "__all__";

/// Error messages keyed by field name.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for `field`, empty when the field is valid.
    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Whole-form messages.
    pub fn non_field_errors(&self) -> &[String] {
        self.get(NON_FIELD_ERRORS)
    }
}

impl From<&ValidationErrors> for FieldErrors {
    fn from(errors: &ValidationErrors) -> Self {
        let mut result = FieldErrors::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors.iter() {
                result.add(field.to_string(), error_message(error));
            }
        }
        result
    }
}

pub(crate) fn error_message(error: &ValidationError) -> String {
    match &error.message {
        Some(message) => message.to_string(),
        None => error.code.to_string(),
    }
}

/// Build a validation error with a user-facing message.
pub(crate) fn invalid(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

/// One option of a select input.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

impl Choice {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Submitted values together with the errors found in them.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BoundForm<D> {
    pub values: D,
    pub errors: FieldErrors,
}

impl<D> BoundForm<D> {
    /// A form that has not been validated yet, e.g. for a GET request.
    pub fn unbound(values: D) -> Self {
        Self {
            values,
            errors: FieldErrors::new(),
        }
    }

    pub fn with_errors(values: D, errors: FieldErrors) -> Self {
        Self { values, errors }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Result of binding a submission.
#[derive(Debug)]
pub enum FormOutcome<D, C> {
    Valid(C),
    Invalid(BoundForm<D>),
}

impl<D, C> FormOutcome<D, C> {
    pub fn is_valid(&self) -> bool {
        matches!(self, FormOutcome::Valid(_))
    }
}

/// Raw submitted values of one form.
pub trait FormData: Serialize + Default {
    /// Take every field the submission left out from `initial`.
    fn fill_missing(self, initial: Self) -> Self;
}

/// Initial form values read back from a persisted record.
pub trait FromRecord<R> {
    fn from_record(record: &R) -> Self;
}

/// Validates and cleans one kind of submission.
///
/// Context the rules depend on (the current user, the records a choice may
/// point at) is handed to the binder when it is constructed.
pub trait FormBinder {
    type Data: FormData;
    type Cleaned;

    fn bind(&self, data: Self::Data) -> FormOutcome<Self::Data, Self::Cleaned>;

    /// Extra template values the form needs, such as the options of a select.
    fn extend_context(&self, _context: &mut Context) {}
}

/// Trim and collapse inner whitespace, dropping control characters.
pub(crate) fn sanitize_inline_text(input: &str) -> String {
    let mut sanitized = String::with_capacity(input.len());
    let mut previous_whitespace = false;

    for ch in input.trim().chars() {
        if ch.is_whitespace() {
            if !previous_whitespace {
                sanitized.push(' ');
                previous_whitespace = true;
            }
        } else if ch.is_control() {
            continue;
        } else {
            sanitized.push(ch);
            previous_whitespace = false;
        }
    }

    sanitized
}

/// Trim every line and the text as a whole, keeping at most one blank line in a row.
pub(crate) fn sanitize_multiline_text(input: &str) -> String {
    let mut result: Vec<String> = Vec::new();
    let mut previous_empty = false;

    for line in input.lines().map(sanitize_inline_text) {
        if line.is_empty() {
            if previous_empty || result.is_empty() {
                continue;
            }
            previous_empty = true;
        } else {
            previous_empty = false;
        }
        result.push(line);
    }

    while matches!(result.last(), Some(line) if line.is_empty()) {
        result.pop();
    }

    result.join("\n")
}

/// First character upper-cased, the rest lower-cased.
pub(crate) fn capitalize(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Value of an optional text field, `None` when absent or blank.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
