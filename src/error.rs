//! Error types for Trackline
//!
//! The transformation core never fails: empty input degrades to empty output.
//! Errors only exist at the boundaries, either while reading record files and
//! settings ([`ComputeError`]) or inside the health store ([`StoreError`]).

use thiserror::Error;

/// Errors raised while loading records or settings
#[derive(Debug, Error)]
pub enum ComputeError {
    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Date parse error: {0}")]
    DateParseError(String),

    #[error("Timezone {configured} does not match the store calendar {store}")]
    CalendarMismatch { configured: String, store: String },
}

/// Errors surfaced by a health store
///
/// These never reach the transformation functions; the pipeline either maps
/// them to an empty chart (`NoData`) or hands them to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Need Access to Health Data")]
    AuthorizationNotDetermined,

    #[error("Need Access to create Health Data")]
    SharingDenied { kind: String },

    #[error("No Data Found")]
    NoData,

    #[error("Invalid Value")]
    InvalidValue,

    #[error("Unable to Complete Request")]
    UnableToCompleteRequest,
}

impl StoreError {
    /// Longer explanation shown as the body of a user-facing alert
    pub fn failure_reason(&self) -> String {
        match self {
            StoreError::AuthorizationNotDetermined => {
                "You have not given access to your Health data. Please go to Settings > Health > Data Access & Devices.".to_string()
            }
            StoreError::SharingDenied { kind } => format!(
                "You have denied access to upload your {kind} data.\n\nYou can change this in Settings > Health > Data Access & Devices."
            ),
            StoreError::NoData => "There is no data for this Health statistic.".to_string(),
            StoreError::InvalidValue => {
                "Must be a numeric value with a maximum of one decimal place.".to_string()
            }
            StoreError::UnableToCompleteRequest => {
                "We are unable to complete your request at this time.\n\nPlease try again later or contact support.".to_string()
            }
        }
    }

    /// Whether the caller should route the user through permission priming
    pub fn needs_authorization(&self) -> bool {
        matches!(self, StoreError::AuthorizationNotDetermined)
    }
}
