//! Error module for the popcode library.
use std::error::Error;
use std::fmt;

/// Error types for the library.
#[derive(Debug, PartialEq)]
pub enum PopcodeError {
    /// Error for invalid model parameters, e.g., a non-positive tuning width or a negative firing rate.
    InvalidParameter(String),
    /// Error for mismatched array dimensions, e.g., a spike count vector shorter than the population.
    DimensionMismatch(String),
    /// Error for I/O operations.
    IOError(String),
}

impl fmt::Display for PopcodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PopcodeError::InvalidParameter(e) => write!(f, "Invalid parameter: {}", e),
            PopcodeError::DimensionMismatch(e) => write!(f, "Dimension mismatch: {}", e),
            PopcodeError::IOError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl Error for PopcodeError {}
