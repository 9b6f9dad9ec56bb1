use thiserror::Error;

use crate::calendar::CalendarDate;
use crate::io::store::StoreError;

/// Process-level failure: a message plus the exit code the binary returns.
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<AxisError> for AppError {
    fn from(err: AxisError) -> Self {
        let exit_code = match &err {
            AxisError::UnsupportedCalendar(_)
            | AxisError::InvalidUnits(_)
            | AxisError::UnsupportedFrequency(_) => 4,
            AxisError::Store(_) => 3,
            _ => 2,
        };
        AppError::new(exit_code, err.to_string())
    }
}

/// Per-file failures. None of these abort a batch; each one ends the
/// processing of a single file.
#[derive(Debug, Error)]
pub enum AxisError {
    /// File name does not follow `A_B_C_D_E_START-END.ext`.
    #[error("Invalid filename ({0} does not follow CMIP5 DRS)")]
    InvalidName(String),

    /// Start/end digit strings have unequal or unsupported lengths.
    #[error("Invalid number of date digits in {file} ({start_len}/{end_len} digits is not supported)")]
    InvalidPrecision {
        file: String,
        start_len: usize,
        end_len: usize,
    },

    /// A date that does not exist in the calendar in use.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid frequency ({0} is not supported)")]
    UnsupportedFrequency(String),

    #[error("Unknown calendar ({0} is not supported)")]
    UnsupportedCalendar(String),

    #[error("Invalid time units '{0}'")]
    InvalidUnits(String),

    #[error("Missing metadata: {0}")]
    MissingMetadata(String),

    /// File metadata disagrees with the batch context built from the first file.
    #[error("{attribute} '{found}' differs from batch {attribute} '{expected}'")]
    ContextMismatch {
        attribute: &'static str,
        expected: String,
        found: String,
    },

    #[error("Time axis is empty")]
    EmptyAxis,

    /// Last computed date does not match the end date in the filename.
    #[error("last timestep {computed} is inconsistent with end date filename {expected}")]
    InconsistentEndDate {
        computed: CalendarDate,
        expected: CalendarDate,
    },

    /// Stored time axis or bounds differ from the rebuilt ones.
    #[error("stored {what} differ from the rebuilt axis")]
    AxisMismatch { what: &'static str },

    #[error(transparent)]
    Store(#[from] StoreError),
}
