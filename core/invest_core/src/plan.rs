//! # Plan feature gate
//!
//! Subscription tiers and the search features each one unlocks.
//!
//! Two lookups live side by side on purpose:
//!
//! * [`PlanFeatures::for_plan`] — the entitlement table the backend applies
//!   when it accepts or rejects a search query. This is the enforcement
//!   point.
//! * [`required_plan_for`] — the upsell label shown next to a locked filter
//!   ("requires Plus plan"). Informational only.
//!
//! Keeping both in one module, with a test asserting they agree, prevents
//! the displayed "upgrade to X" label drifting from what the server
//! actually gates.
//!
//! On the client side the gate works off the `planFeatures` object returned
//! with every search response. Before the first response arrives there is
//! nothing to look up, and [`is_feature_enabled`] treats that as *all
//! features disabled* — absence of entitlement data never unlocks anything.

use serde::{Deserialize, Serialize};

/// Subscription tier, ordered by increasing capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanKey {
    Free,
    Basic,
    Plus,
    Premium,
}

impl PlanKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Basic => "basic",
            Self::Plus => "plus",
            Self::Premium => "premium",
        }
    }

    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "free" => Some(Self::Free),
            "basic" => Some(Self::Basic),
            "plus" => Some(Self::Plus),
            "premium" => Some(Self::Premium),
            _ => None,
        }
    }

    /// Display name used in upsell messaging ("requires Plus plan").
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Free => "Free",
            Self::Basic => "Basic",
            Self::Plus => "Plus",
            Self::Premium => "Premium",
        }
    }
}

/// A search filter capability that may be plan-gated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterFeature {
    /// Free-text search, single category, status. Available to everyone.
    BasicFilters,
    RoiRange,
    AmountRange,
    MultipleCategories,
    AdvancedSort,
    DurationFilter,
}

/// Per-feature flags for the search filters, as returned by the server with
/// every search response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilterFlags {
    pub basic_filters: bool,
    pub roi_range: bool,
    pub amount_range: bool,
    pub multiple_categories: bool,
    pub advanced_sort: bool,
    pub duration_filter: bool,
}

/// What a user's subscription unlocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanFeatures {
    pub name: String,
    pub search_filters: SearchFilterFlags,
}

impl PlanFeatures {
    /// Server-side entitlement table. Each tier is a strict superset of the
    /// one below it.
    pub fn for_plan(plan: PlanKey) -> Self {
        let search_filters = match plan {
            PlanKey::Free => SearchFilterFlags {
                basic_filters: true,
                roi_range: false,
                amount_range: false,
                multiple_categories: false,
                advanced_sort: false,
                duration_filter: false,
            },
            PlanKey::Basic => SearchFilterFlags {
                basic_filters: true,
                roi_range: true,
                amount_range: false,
                multiple_categories: false,
                advanced_sort: false,
                duration_filter: false,
            },
            PlanKey::Plus => SearchFilterFlags {
                basic_filters: true,
                roi_range: true,
                amount_range: true,
                multiple_categories: true,
                advanced_sort: false,
                duration_filter: true,
            },
            PlanKey::Premium => SearchFilterFlags {
                basic_filters: true,
                roi_range: true,
                amount_range: true,
                multiple_categories: true,
                advanced_sort: true,
                duration_filter: true,
            },
        };
        Self {
            name: plan.display_name().to_string(),
            search_filters,
        }
    }

    pub fn allows(&self, feature: FilterFeature) -> bool {
        let f = &self.search_filters;
        match feature {
            FilterFeature::BasicFilters => f.basic_filters,
            FilterFeature::RoiRange => f.roi_range,
            FilterFeature::AmountRange => f.amount_range,
            FilterFeature::MultipleCategories => f.multiple_categories,
            FilterFeature::AdvancedSort => f.advanced_sort,
            FilterFeature::DurationFilter => f.duration_filter,
        }
    }
}

/// Fail-closed feature lookup: `None` (entitlements not fetched yet) means
/// every feature is disabled.
pub fn is_feature_enabled(features: Option<&PlanFeatures>, feature: FilterFeature) -> bool {
    features.map(|f| f.allows(feature)).unwrap_or(false)
}

/// Minimum tier that unlocks `feature`. Used only for upsell labels; the
/// entitlement check itself goes through [`is_feature_enabled`].
pub fn required_plan_for(feature: FilterFeature) -> PlanKey {
    match feature {
        FilterFeature::BasicFilters => PlanKey::Free,
        FilterFeature::RoiRange => PlanKey::Basic,
        FilterFeature::AmountRange
        | FilterFeature::MultipleCategories
        | FilterFeature::DurationFilter => PlanKey::Plus,
        FilterFeature::AdvancedSort => PlanKey::Premium,
    }
}
