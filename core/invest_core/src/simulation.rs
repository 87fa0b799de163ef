//! # Return calculator
//!
//! Simple-interest ROI simulation behind `POST /api/simulation`.
//!
//! ## Model
//!
//! The model is deliberately non-compounding: `totalReturn = amount * (1 +
//! roi/100)` regardless of duration. Duration only spreads the profit over
//! time (straight-line accrual in [`MonthlyPoint`]s) and scales the
//! annualized-rate figure (`roi * 12 / duration`, simple annualization, not
//! CAGR). These are product decisions about what investors are shown, not
//! approximations to fix.
//!
//! Two documented simplifications:
//!
//! * `dailyProfit` divides the monthly profit by a fixed 30-day month.
//! * `expectedReturnDate` uses calendar month arithmetic with the
//!   day-of-month clamped to the target month (Jan 31 + 1 month → Feb 28/29).

use chrono::{Months, NaiveDate};

use crate::errors::ValidationError;
use crate::types::{MonthlyPoint, ReturnSummary, SimulationInput, SimulationResult, Statistics};

/// Days per month used for the daily-profit figure.
const DAYS_PER_MONTH: f64 = 30.0;

/// Upper bounds mirroring the input form; anything above is a typo, not a
/// plan.
const MAX_ROI_PERCENT: f64 = 1000.0;
const MAX_DURATION_MONTHS: u32 = 120;

/// Compute a full ROI simulation.
///
/// `today` is injected rather than read from the clock so the function stays
/// a pure mapping of its inputs; the API handler passes the current date.
///
/// Fails with [`ValidationError`] naming the offending field when an input
/// is out of range; there are no other failure modes.
pub fn compute_simulation(
    input: &SimulationInput,
    today: NaiveDate,
) -> Result<SimulationResult, ValidationError> {
    validate_input(input)?;

    let amount = input.amount;
    let duration = input.duration_months;

    let total_return = amount * (1.0 + input.roi_percent / 100.0);
    let profit = total_return - amount;

    // checked_add_months clamps the day-of-month for us (Jan 31 → Feb 28);
    // it only returns None on dates far outside any representable year.
    let expected_return_date = today
        .checked_add_months(Months::new(duration))
        .ok_or_else(|| ValidationError::new("durationMonths", "duration out of range"))?;

    // Straight-line accrual: month i holds i/duration of the total profit.
    let monthly_breakdown = (1..=duration)
        .map(|month| {
            let fraction = month as f64 / duration as f64;
            MonthlyPoint {
                month,
                value: amount + profit * fraction,
                profit: profit * fraction,
            }
        })
        .collect();

    let monthly_profit = profit / duration as f64;
    let statistics = Statistics {
        monthly_profit,
        daily_profit: monthly_profit / DAYS_PER_MONTH,
        annualized_return: input.roi_percent * (12.0 / duration as f64),
    };

    Ok(SimulationResult {
        input: *input,
        results: ReturnSummary {
            initial_investment: amount,
            total_return,
            profit,
            profit_percentage: input.roi_percent,
            expected_return_date,
        },
        monthly_breakdown,
        statistics,
    })
}

fn validate_input(input: &SimulationInput) -> Result<(), ValidationError> {
    if !input.amount.is_finite() || input.amount <= 0.0 {
        return Err(ValidationError::new(
            "amount",
            "must be a positive number",
        ));
    }
    if !input.roi_percent.is_finite() || input.roi_percent < 0.0 {
        return Err(ValidationError::new(
            "roiPercent",
            "must be zero or greater",
        ));
    }
    if input.roi_percent > MAX_ROI_PERCENT {
        return Err(ValidationError::new(
            "roiPercent",
            format!("must be at most {MAX_ROI_PERCENT}"),
        ));
    }
    if input.duration_months < 1 {
        return Err(ValidationError::new(
            "durationMonths",
            "must be at least 1",
        ));
    }
    if input.duration_months > MAX_DURATION_MONTHS {
        return Err(ValidationError::new(
            "durationMonths",
            format!("must be at most {MAX_DURATION_MONTHS}"),
        ));
    }
    Ok(())
}
