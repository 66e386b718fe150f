//! Pass/fail lifecycle shared by every test case.
//!
//! A [`Test`] starts without an outcome and moves to exactly one terminal
//! outcome, pass or fail, optionally with a [`Note`]. Recording twice or
//! reporting before recording are defects in the test case itself and surface
//! as [`UsageError`]s that the runner never swallows.

use crate::config::HarnessConfig;
use amatino::AmatinoError;
use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;
use tracing::{info, warn};

const PASS_TAG: &str = "[PASS] ";
const FAIL_TAG: &str = "[FAIL] ";
const NOTE_INDENT: &str = "\n       ";

/// Misuse of the [`Test`] lifecycle by a test case.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    #[error("test name must be a non-empty string")]
    InvalidName,

    #[error("Attempt to pass/fail a completed test: {name}")]
    AlreadyRecorded { name: String },

    #[error("Cannot report on incomplete test: {name}")]
    Incomplete { name: String },
}

/// Free-form detail attached to an outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note(String);

impl Note {
    /// Capture the diagnostic text of an error: its message followed by one
    /// `caused by:` line per underlying source.
    pub fn from_error(error: &(dyn StdError + 'static)) -> Self {
        let mut text = error.to_string();
        let mut source = error.source();
        while let Some(cause) = source {
            text.push_str("\ncaused by: ");
            text.push_str(&cause.to_string());
            source = cause.source();
        }
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Note {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl From<String> for Note {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<AmatinoError> for Note {
    fn from(error: AmatinoError) -> Self {
        Self::from_error(&error)
    }
}

/// Why a scenario stopped early: the API returned an error, or a returned
/// object did not match expectations.
#[derive(Error, Debug)]
pub enum Failure {
    #[error(transparent)]
    Domain(#[from] AmatinoError),

    #[error("{0}")]
    Check(String),
}

impl From<Failure> for Note {
    fn from(failure: Failure) -> Self {
        match failure {
            Failure::Domain(error) => Note::from(error),
            Failure::Check(message) => Note::from(message),
        }
    }
}

/// Fail with `message` unless `condition` holds.
pub fn ensure(condition: bool, message: impl Into<String>) -> Result<(), Failure> {
    if condition {
        Ok(())
    } else {
        Err(Failure::Check(message.into()))
    }
}

#[derive(Debug, Clone)]
pub struct Test {
    name: String,
    config: HarnessConfig,
    passed: Option<bool>,
    note: Option<Note>,
}

impl Test {
    pub fn new(name: impl Into<String>, config: HarnessConfig) -> Result<Self, UsageError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(UsageError::InvalidName);
        }

        Ok(Self {
            name,
            config,
            passed: None,
            note: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// `None` until an outcome is recorded.
    pub fn passed(&self) -> Option<bool> {
        self.passed
    }

    pub fn note(&self) -> Option<&Note> {
        self.note.as_ref()
    }

    pub fn record_success(&mut self, note: Option<Note>) -> Result<(), UsageError> {
        self.record_result(true, note)
    }

    pub fn record_failure(&mut self, note: Option<Note>) -> Result<(), UsageError> {
        self.record_result(false, note)
    }

    /// Record the outcome of a whole scenario: success without a note, or
    /// failure carrying the reason.
    pub fn conclude(&mut self, outcome: Result<(), Failure>) -> Result<(), UsageError> {
        match outcome {
            Ok(()) => self.record_success(None),
            Err(failure) => self.record_failure(Some(failure.into())),
        }
    }

    fn record_result(&mut self, passed: bool, note: Option<Note>) -> Result<(), UsageError> {
        if self.passed.is_some() {
            return Err(UsageError::AlreadyRecorded {
                name: self.name.clone(),
            });
        }

        if passed {
            info!(test = %self.name, "Test passed");
        } else {
            warn!(test = %self.name, note = ?note.as_ref().map(Note::as_str), "Test failed");
        }

        self.passed = Some(passed);
        self.note = note;
        Ok(())
    }

    pub fn report(&self) -> Result<String, UsageError> {
        let passed = self.passed.ok_or_else(|| UsageError::Incomplete {
            name: self.name.clone(),
        })?;

        let mut report = String::from(if passed { PASS_TAG } else { FAIL_TAG });
        report.push_str(&self.name);

        if let Some(note) = &self.note {
            report.push_str(NOTE_INDENT);
            report.push_str(note.as_str());
        }

        Ok(report)
    }
}
