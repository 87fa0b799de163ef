//! InvestHub business rules.
//!
//! Everything in this crate is a pure, synchronous function of its inputs:
//! the ROI simulation calculator, the pre-flight investment validator, the
//! subscription plan feature gate, and the plan-gated search query builder.
//! The REST backend (`backend/api`) calls into this crate as the single
//! authority on these rules; a frontend can mirror the same calculations
//! for instant feedback without risking divergence.
//!
//! Client-side validation here is a UX shortcut, never a security boundary:
//! the server re-checks every rule against live data before committing
//! anything.

pub mod errors;
pub mod format;
pub mod generation;
pub mod plan;
pub mod query;
pub mod simulation;
pub mod types;
pub mod validator;

pub use errors::{InvestmentError, ServerError, ValidationError};
pub use plan::{
    is_feature_enabled, required_plan_for, FilterFeature, PlanFeatures, PlanKey, SearchFilterFlags,
};
pub use query::{build_search_query, FilterInput};
pub use simulation::compute_simulation;
pub use types::{
    InvestmentRequest, PaymentMethod, Project, ProjectStatus, SearchQuery, SimulationInput,
    SimulationResult, SortBy, SortOrder,
};
pub use validator::{validate_investment, UserContext};
