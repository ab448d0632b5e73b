use std::error::Error;
use std::fmt::Formatter;

#[derive(Debug)]
pub struct InputError(String);

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Error for InputError {}

/// Failure while pulling modification calls out of a single record. These
/// are per-record outcomes, the record is skipped and the scan continues.
#[derive(Debug)]
pub enum RunError {
    /// The MM/ML tags could not be parsed or iterated.
    BadInput(InputError),
    /// Record cannot be used, e.g. it has no sequence.
    Skipped(String),
}

impl RunError {
    pub fn new_input_error(reason: impl Into<String>) -> Self {
        Self::BadInput(InputError(reason.into()))
    }

    pub fn new_skipped(reason: impl Into<String>) -> Self {
        Self::Skipped(reason.into())
    }
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadInput(err) => write!(f, "bad input, {err}"),
            Self::Skipped(reason) => write!(f, "skipped, {reason}"),
        }
    }
}

impl Error for RunError {}
