//! # Investment validator
//!
//! Pre-flight checks run before an investment order is submitted. On
//! success the amount passes through unchanged — nothing is rounded or
//! adjusted here. These checks are advisory: the backend re-runs the same
//! rules against the live project row, and its verdict wins (the funding
//! target can fill between page load and submit).
//!
//! The caller owns the side effects a failure implies: redirecting to login
//! on [`InvestmentError::Unauthenticated`], disabling the submit trigger
//! while a request is in flight, and so on.

use crate::errors::InvestmentError;
use crate::plan::PlanKey;
use crate::types::{PaymentMethod, Project};

/// The signed-in user, passed in explicitly instead of read from a global
/// session store so the validator is testable in isolation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContext {
    pub id: i64,
    pub plan: PlanKey,
}

/// Validate an investment order against a project's funding state.
///
/// Check order matches the submission flow: authentication first, then the
/// amount bounds, then the payment method.
pub fn validate_investment(
    user: Option<&UserContext>,
    payment_method: Option<PaymentMethod>,
    amount: f64,
    project: &Project,
) -> Result<f64, InvestmentError> {
    if user.is_none() {
        return Err(InvestmentError::Unauthenticated);
    }

    if !amount.is_finite() || amount < project.min_investment {
        return Err(InvestmentError::BelowMinimum {
            minimum: project.min_investment,
        });
    }

    let remaining = project.remaining();
    if amount > remaining {
        return Err(InvestmentError::ExceedsRemaining { remaining });
    }

    if payment_method.is_none() {
        return Err(InvestmentError::MissingPaymentMethod);
    }

    Ok(amount)
}
