//! Axum REST API handlers.
//!
//! Success responses wrap their payload as `{ "data": … }`; errors render
//! as `{ "message": … }` via [`ApiError`]. Both shapes match what the
//! frontend client already expects.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use invest_core::{
    compute_simulation, required_plan_for, FilterFeature, PlanFeatures, PlanKey,
    InvestmentRequest, SearchQuery, SimulationInput,
};

use crate::auth::{AdminUser, AuthUser, OptionalUser};
use crate::db::{self, NewProject};
use crate::errors::{ApiError, Result};
use crate::plans;
use crate::AppState;

// ─────────────────────────────────────────────────────────
// Health
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// ─────────────────────────────────────────────────────────
// Simulation
// ─────────────────────────────────────────────────────────

/// `POST /api/simulation`
///
/// Pure computation; the only failure mode is a 400 naming the bad field.
pub async fn simulate(Json(input): Json<SimulationInput>) -> Result<Json<Value>> {
    let result = compute_simulation(&input, Utc::now().date_naive())?;
    Ok(Json(json!({ "data": result })))
}

// ─────────────────────────────────────────────────────────
// Project search
// ─────────────────────────────────────────────────────────

/// Reject a query that uses filters the caller's plan does not unlock.
///
/// A well-behaved client never sends these (its query builder drops gated
/// fields), so hitting this path means a stale page or a hand-built
/// request; the 403 message names the plan to upgrade to.
fn check_entitlements(query: &SearchQuery, features: &PlanFeatures) -> Result<()> {
    let gated = [
        (
            query.min_roi.is_some() || query.max_roi.is_some(),
            FilterFeature::RoiRange,
            "ROI range filtering",
        ),
        (
            query.min_amount.is_some() || query.max_amount.is_some(),
            FilterFeature::AmountRange,
            "Amount range filtering",
        ),
        (
            query.min_duration.is_some() || query.max_duration.is_some(),
            FilterFeature::DurationFilter,
            "Duration filtering",
        ),
        (
            query.categories.as_ref().is_some_and(|c| !c.is_empty()),
            FilterFeature::MultipleCategories,
            "Multi-category search",
        ),
        (
            query.sort_by.is_some() || query.sort_order.is_some(),
            FilterFeature::AdvancedSort,
            "Advanced sorting",
        ),
    ];

    for (used, feature, label) in gated {
        if used && !features.allows(feature) {
            return Err(ApiError::PlanRestricted(format!(
                "{label} requires the {} plan",
                required_plan_for(feature).display_name()
            )));
        }
    }
    Ok(())
}

fn total_pages(total: i64, limit: u32) -> i64 {
    (total + limit as i64 - 1) / limit as i64
}

/// `POST /api/projects/search`
///
/// Anonymous callers search as the free tier. Every response carries the
/// caller's `planFeatures` so the client can gate its filter controls.
pub async fn search_projects(
    State(state): State<Arc<AppState>>,
    user: OptionalUser,
    Json(mut query): Json<SearchQuery>,
) -> Result<Json<Value>> {
    let features = PlanFeatures::for_plan(user.plan());
    check_entitlements(&query, &features)?;

    query.page = query.page.max(1);
    query.limit = query.limit.clamp(1, state.config.max_page_size);

    let (projects, total) = db::search_projects(&state.pool, &query).await?;

    Ok(Json(json!({
        "data": {
            "projects": projects,
            "planFeatures": features,
            "pagination": {
                "total": total,
                "totalPages": total_pages(total, query.limit),
                "page": query.page,
                "limit": query.limit,
            },
        }
    })))
}

/// `GET /api/projects/categories`
pub async fn get_categories(State(state): State<Arc<AppState>>) -> Result<Json<Value>> {
    let categories = db::list_categories(&state.pool).await?;
    Ok(Json(json!({ "data": { "categories": categories } })))
}

/// `GET /api/projects/:id`
pub async fn get_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>> {
    let project = db::get_project(&state.pool, id)
        .await?
        .ok_or(ApiError::NotFound("project"))?;
    Ok(Json(json!({ "data": { "project": project } })))
}

// ─────────────────────────────────────────────────────────
// Project administration
// ─────────────────────────────────────────────────────────

fn validate_new_project(new: &NewProject) -> Result<()> {
    let err = |msg: &str| Err(ApiError::BadRequest(msg.to_string()));
    if new.title.trim().is_empty() {
        return err("Title must not be empty");
    }
    if new.category.trim().is_empty() {
        return err("Category must not be empty");
    }
    if !new.target_amount.is_finite() || new.target_amount <= 0.0 {
        return err("Target amount must be positive");
    }
    if !new.min_investment.is_finite()
        || new.min_investment <= 0.0
        || new.min_investment > new.target_amount
    {
        return err("Minimum investment must be positive and at most the target amount");
    }
    if !new.roi_percent.is_finite() || !(0.0..=1000.0).contains(&new.roi_percent) {
        return err("ROI percent must be between 0 and 1000");
    }
    if !(1..=120).contains(&new.duration_months) {
        return err("Duration must be between 1 and 120 months");
    }
    Ok(())
}

/// `POST /api/projects` — admin only.
pub async fn create_project(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Json(new): Json<NewProject>,
) -> Result<impl IntoResponse> {
    validate_new_project(&new)?;
    let project = db::insert_project(&state.pool, &new).await?;
    tracing::info!("Admin {} created project {}", admin.id, project.id);
    Ok((
        StatusCode::CREATED,
        Json(json!({ "data": { "project": project } })),
    ))
}

// ─────────────────────────────────────────────────────────
// Investments
// ─────────────────────────────────────────────────────────

/// `POST /api/investments`
pub async fn create_investment(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(request): Json<InvestmentRequest>,
) -> Result<impl IntoResponse> {
    let (investment, project) =
        db::create_investment(&state.pool, &user.context(), &request).await?;
    tracing::info!(
        "User {} invested {} in project {}",
        user.id,
        investment.amount,
        project.id
    );
    Ok((
        StatusCode::CREATED,
        Json(json!({ "data": { "investment": investment, "project": project } })),
    ))
}

/// `GET /api/investments`
pub async fn my_investments(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<Value>> {
    let investments = db::investments_for_user(&state.pool, user.id).await?;
    Ok(Json(json!({ "data": { "investments": investments } })))
}

// ─────────────────────────────────────────────────────────
// Subscriptions
// ─────────────────────────────────────────────────────────

/// `GET /api/subscription/plans`
pub async fn get_plans() -> Json<Value> {
    Json(json!({ "data": { "plans": plans::catalog() } }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutBody {
    pub plan_key: PlanKey,
}

/// `POST /api/subscription/checkout`
pub async fn checkout_session(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(body): Json<CheckoutBody>,
) -> Result<Json<Value>> {
    let Some(price_id) = plans::price_id_of(body.plan_key) else {
        return Err(ApiError::BadRequest(
            "The free plan does not require checkout".to_string(),
        ));
    };
    if user.plan == body.plan_key {
        return Err(ApiError::BadRequest(
            "You already have this plan".to_string(),
        ));
    }

    let request = state.checkout.session_request(
        user.id,
        &user.email,
        body.plan_key,
        price_id,
        plans::price_of(body.plan_key),
    );
    let url = state.checkout.create_session(&request).await?;
    Ok(Json(json!({ "data": { "url": url } })))
}

// ─────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────
