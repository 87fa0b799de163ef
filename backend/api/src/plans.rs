//! The subscription plan catalog served by `GET /api/subscription/plans`.
//!
//! Pricing and the per-plan marketing bullet points live here; the actual
//! entitlement flags come from [`PlanFeatures::for_plan`] so this catalog
//! can never disagree with what the search endpoint enforces.

use serde::Serialize;

use invest_core::{PlanFeatures, PlanKey, SearchFilterFlags};

/// Monthly project-view allowance; `-1` means unlimited.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanLimits {
    pub projects_per_month: i32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanInfo {
    pub name: String,
    /// Monthly price in USD.
    pub price: f64,
    /// Provider price identifier; `None` for the free tier.
    pub price_id: Option<&'static str>,
    pub features: Vec<&'static str>,
    pub limits: PlanLimits,
    pub search_filters: SearchFilterFlags,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanCatalog {
    pub free: PlanInfo,
    pub basic: PlanInfo,
    pub plus: PlanInfo,
    pub premium: PlanInfo,
}

fn plan_info(plan: PlanKey, features: Vec<&'static str>, projects_per_month: i32) -> PlanInfo {
    let entitlements = PlanFeatures::for_plan(plan);
    PlanInfo {
        name: entitlements.name,
        price: price_of(plan),
        price_id: price_id_of(plan),
        features,
        limits: PlanLimits { projects_per_month },
        search_filters: entitlements.search_filters,
    }
}

/// The four-tier catalog shown on the pricing page.
pub fn catalog() -> PlanCatalog {
    PlanCatalog {
        free: plan_info(
            PlanKey::Free,
            vec![
                "Browse all projects",
                "Basic search and status filters",
                "ROI calculator",
            ],
            3,
        ),
        basic: plan_info(
            PlanKey::Basic,
            vec![
                "Everything in Free",
                "ROI range filtering",
                "Email support",
            ],
            10,
        ),
        plus: plan_info(
            PlanKey::Plus,
            vec![
                "Everything in Basic",
                "Amount and duration filters",
                "Multi-category search",
            ],
            25,
        ),
        premium: plan_info(
            PlanKey::Premium,
            vec![
                "Everything in Plus",
                "Advanced sorting",
                "Unlimited project views",
                "Priority support",
            ],
            -1,
        ),
    }
}

/// Monthly price of a plan, used by the checkout flow.
pub fn price_of(plan: PlanKey) -> f64 {
    match plan {
        PlanKey::Free => 0.0,
        PlanKey::Basic => 9.99,
        PlanKey::Plus => 19.99,
        PlanKey::Premium => 49.99,
    }
}

/// Provider price identifier; `None` for the free tier.
pub fn price_id_of(plan: PlanKey) -> Option<&'static str> {
    match plan {
        PlanKey::Free => None,
        PlanKey::Basic => Some("price_basic_monthly"),
        PlanKey::Plus => Some("price_plus_monthly"),
        PlanKey::Premium => Some("price_premium_monthly"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_prices_match_price_of() {
        let c = catalog();
        assert_eq!(c.free.price, price_of(PlanKey::Free));
        assert_eq!(c.basic.price, price_of(PlanKey::Basic));
        assert_eq!(c.plus.price, price_of(PlanKey::Plus));
        assert_eq!(c.premium.price, price_of(PlanKey::Premium));
    }

    #[test]
    fn catalog_flags_come_from_entitlement_table() {
        let c = catalog();
        assert!(!c.free.search_filters.roi_range);
        assert!(c.basic.search_filters.roi_range);
        assert!(!c.basic.search_filters.advanced_sort);
        assert!(c.premium.search_filters.advanced_sort);
    }

    #[test]
    fn free_tier_has_no_price_id() {
        let c = catalog();
        assert!(c.free.price_id.is_none());
        assert!(c.premium.price_id.is_some());
    }

    #[test]
    fn catalog_serializes_camel_case() {
        let v = serde_json::to_value(catalog()).unwrap();
        assert_eq!(v["premium"]["limits"]["projectsPerMonth"], -1);
        assert_eq!(v["plus"]["searchFilters"]["durationFilter"], true);
    }
}
