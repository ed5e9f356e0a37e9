//! Error types and handling for the travel advisor

use chrono::NaiveDate;
use thiserror::Error;

/// Main error type for the travel advisor
#[derive(Error, Debug)]
pub enum AdvisorError {
    /// Malformed or out-of-range profile or record fields
    #[error("Invalid input: {field}: {message}")]
    Validation { field: String, message: String },

    /// The search horizon cannot hold a single trip of the requested length
    #[error(
        "No feasible travel window: {horizon_days} day horizon, {trip_length_days} day trip{}",
        anchor_suffix(.anchor, .flexibility_days)
    )]
    NoFeasibleWindow {
        horizon_days: usize,
        trip_length_days: u32,
        anchor: Option<NaiveDate>,
        flexibility_days: u32,
    },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Malformed scenario or record JSON
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

fn anchor_suffix(anchor: &Option<NaiveDate>, flexibility_days: &u32) -> String {
    match anchor {
        Some(date) => format!(" starting within {flexibility_days} day(s) of {date}"),
        None => String::new(),
    }
}

impl AdvisorError {
    /// Create a new validation error for the given field
    pub fn validation<F: Into<String>, S: Into<String>>(field: F, message: S) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Field that failed validation, if this is a validation error
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            AdvisorError::Validation { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            AdvisorError::Validation { field, message } => {
                format!("Invalid input for '{field}': {message}")
            }
            AdvisorError::NoFeasibleWindow {
                horizon_days,
                trip_length_days,
                anchor: None,
                ..
            } => format!(
                "The forecast covers {horizon_days} day(s), which is too short for a {trip_length_days} day trip."
            ),
            AdvisorError::NoFeasibleWindow {
                trip_length_days,
                anchor: Some(anchor),
                flexibility_days,
                ..
            } => format!(
                "No {trip_length_days} day trip fits the forecast when starting within {flexibility_days} day(s) of {anchor}."
            ),
            AdvisorError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            AdvisorError::Io { .. } => {
                "File operation failed. Please check the path and file permissions.".to_string()
            }
            AdvisorError::Json { source } => {
                format!("Could not read the scenario file: {source}")
            }
        }
    }
}
