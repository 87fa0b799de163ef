//! Error taxonomy shared by the calculator, the validator, and the API.
//!
//! Three tiers, per the propagation policy:
//!
//! * [`ValidationError`] — malformed numeric input to the calculator;
//!   resolved locally, never reaches the network.
//! * [`InvestmentError`] — pre-flight investment checks; also resolved
//!   locally, but the same variants are produced server-side so messaging
//!   stays consistent whichever side catches the problem first.
//! * [`ServerError`] — any non-2xx response, surfaced verbatim since the
//!   server is the authority on business rules.

use thiserror::Error;

/// A calculator input that is out of range or not a finite number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// The offending input field, camelCase as on the wire.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Why an investment order cannot be placed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvestmentError {
    #[error("Please login to invest")]
    Unauthenticated,

    #[error("Minimum investment is {minimum}")]
    BelowMinimum { minimum: f64 },

    #[error("Investment amount exceeds remaining target. Maximum: {remaining}")]
    ExceedsRemaining { remaining: f64 },

    #[error("Please select a payment method")]
    MissingPaymentMethod,
}

/// A non-2xx response from the backend, carrying the server's own message.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("server error {status}: {message}")]
pub struct ServerError {
    pub status: u16,
    pub message: String,
}

impl ServerError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Fold a server rejection back into the investment taxonomy where one
    /// applies, so callers show the same message for a rule caught locally
    /// and the same rule caught in a race server-side (e.g. the funding
    /// target filling between page load and submit).
    pub fn classify(&self) -> Option<InvestmentError> {
        match self.status {
            401 => Some(InvestmentError::Unauthenticated),
            _ => None,
        }
    }

    /// Plan-entitlement rejections (403) prompt an upgrade flow rather than
    /// an inline field error.
    pub fn is_plan_restriction(&self) -> bool {
        self.status == 403
    }
}
