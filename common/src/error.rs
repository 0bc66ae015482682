use thiserror::Error;

use crate::time_point::TimeFormat;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Invalid date format: '{0}'.")]
    UnrecognizedFormat(String),

    #[error("'{input}' looks like {format} but is not a valid one.")]
    InvalidValue { input: String, format: TimeFormat },

    #[error("'{0}' does not exist in the local timezone.")]
    NonexistentLocalTime(String),

    #[error("'{0}' is before the UNIX epoch.")]
    BeforeEpoch(String),
}
