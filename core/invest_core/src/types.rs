//! # Types
//!
//! Shared value objects used across the platform core and the REST backend.
//!
//! All of these are request/response-scoped: constructed from user input or
//! an API payload, consumed immediately, never persisted client-side. Wire
//! names are camelCase to match the frontend contract; Rust fields stay
//! snake_case.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Lifecycle status of an investment project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    /// Accepting investments.
    Active,
    /// Funding target reached.
    Completed,
    /// Closed by an administrator; no longer listed.
    Closed,
}

impl ProjectStatus {
    /// Short identifier string as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Closed => "closed",
        }
    }

    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }
}

/// An investment project as served to clients.
///
/// `funded_amount <= target_amount` is enforced server-side on every
/// investment; consumers only display it and pre-validate against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub min_investment: f64,
    pub roi_percent: f64,
    pub target_amount: f64,
    pub funded_amount: f64,
    pub duration_months: u32,
    pub status: ProjectStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Project {
    /// Funding still open on this project.
    pub fn remaining(&self) -> f64 {
        self.target_amount - self.funded_amount
    }
}

/// How an investor pays for an investment order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Stripe,
    Paypal,
    BankTransfer,
    Wallet,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stripe => "stripe",
            Self::Paypal => "paypal",
            Self::BankTransfer => "bank_transfer",
            Self::Wallet => "wallet",
        }
    }
}

/// Body of `POST /api/investments`. Built per submission, never stored
/// beyond the pending request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentRequest {
    pub project_id: i64,
    pub amount: f64,
    pub payment_method: PaymentMethod,
}

// ─────────────────────────────────────────────────────────
// Simulation
// ─────────────────────────────────────────────────────────

/// Input to the ROI calculator (`POST /api/simulation`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationInput {
    pub amount: f64,
    pub roi_percent: f64,
    pub duration_months: u32,
}

/// Headline figures of a simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnSummary {
    pub initial_investment: f64,
    pub total_return: f64,
    pub profit: f64,
    pub profit_percentage: f64,
    pub expected_return_date: NaiveDate,
}

/// One point on the straight-line growth curve, `month` in `1..=duration`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPoint {
    pub month: u32,
    pub value: f64,
    pub profit: f64,
}

/// Per-period statistics derived from a simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub monthly_profit: f64,
    /// Uses a fixed 30-day month; see the calculator docs.
    pub daily_profit: f64,
    pub annualized_return: f64,
}

/// Full simulation response: echoed input, headline results, the month-by-
/// month breakdown for charting, and derived statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub input: SimulationInput,
    pub results: ReturnSummary,
    pub monthly_breakdown: Vec<MonthlyPoint>,
    pub statistics: Statistics,
}

// ─────────────────────────────────────────────────────────
// Search
// ─────────────────────────────────────────────────────────

/// Sortable project columns for the advanced-sort feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    CreatedAt,
    RoiPercent,
    TargetAmount,
    FundedAmount,
    DurationMonths,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortBy {
    /// Column name used in SQL `ORDER BY`; the enum is the allow-list, so
    /// user input can never reach the query text directly.
    pub fn column(&self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::RoiPercent => "roi_percent",
            Self::TargetAmount => "target_amount",
            Self::FundedAmount => "funded_amount",
            Self::DurationMonths => "duration_months",
        }
    }
}

impl SortOrder {
    pub fn sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Body of `POST /api/projects/search`.
///
/// Every optional field is `skip_serializing_if = None`, so a query with no
/// filters set serializes to exactly `{"page": …, "limit": …}`. Fields that
/// require a gated plan feature are only ever populated by
/// [`crate::build_search_query`] when the corresponding flag is enabled.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
    #[serde(rename = "minROI", skip_serializing_if = "Option::is_none")]
    pub min_roi: Option<f64>,
    #[serde(rename = "maxROI", skip_serializing_if = "Option::is_none")]
    pub max_roi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortBy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    20
}
