//! # Search query builder
//!
//! Assembles the `POST /api/projects/search` body from raw filter text,
//! respecting the plan feature gate.
//!
//! Two rules shape the output:
//!
//! * **Gated fields are dropped, not errored.** A filter the user's plan
//!   does not unlock never makes it into the query; the UI shows the upsell
//!   lock instead. The server still rejects gated fields with 403 should a
//!   stale or tampered query arrive.
//! * **Invalid numbers are dropped silently.** Filter inputs are free text;
//!   text that does not parse as a finite number simply does not narrow the
//!   results. This is permissive UX, not validation.
//!
//! The builder is a pure function: identical inputs produce a structurally
//! identical [`SearchQuery`].

use crate::plan::{is_feature_enabled, FilterFeature, PlanFeatures};
use crate::types::{SearchQuery, SortBy, SortOrder};

/// Sort applied when the user has not chosen one; an explicit choice equal
/// to this default is omitted from the query to keep payloads minimal.
pub const DEFAULT_SORT: (SortBy, SortOrder) = (SortBy::CreatedAt, SortOrder::Desc);

/// Raw filter state as entered in the UI. Numeric fields are kept as text
/// because that is what an input box holds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterInput {
    pub search: String,
    /// Single-select category; empty or "all" means no filter.
    pub category: String,
    /// Status select; empty or "all" means no filter.
    pub status: String,
    /// Multi-select categories (plan-gated).
    pub categories: Vec<String>,
    pub min_roi: String,
    pub max_roi: String,
    pub min_amount: String,
    pub max_amount: String,
    pub min_duration: String,
    pub max_duration: String,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
}

impl Default for SortBy {
    fn default() -> Self {
        DEFAULT_SORT.0
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        DEFAULT_SORT.1
    }
}

/// Build the search request body from raw filters and the user's
/// entitlements. `plan = None` (entitlements not fetched yet) gates
/// everything closed, leaving only the basic filters and pagination.
pub fn build_search_query(
    filters: &FilterInput,
    plan: Option<&PlanFeatures>,
    page: u32,
    limit: u32,
) -> SearchQuery {
    let mut query = SearchQuery {
        page,
        limit,
        ..Default::default()
    };

    // Basic filters, available to every plan.
    query.search = non_empty(&filters.search);
    query.category = selection(&filters.category);
    query.status = selection(&filters.status)
        .as_deref()
        .and_then(crate::types::ProjectStatus::from_str_opt);

    if is_feature_enabled(plan, FilterFeature::MultipleCategories) && !filters.categories.is_empty()
    {
        query.categories = Some(filters.categories.clone());
    }

    if is_feature_enabled(plan, FilterFeature::RoiRange) {
        query.min_roi = parse_f64(&filters.min_roi);
        query.max_roi = parse_f64(&filters.max_roi);
    }

    if is_feature_enabled(plan, FilterFeature::AmountRange) {
        query.min_amount = parse_f64(&filters.min_amount);
        query.max_amount = parse_f64(&filters.max_amount);
    }

    if is_feature_enabled(plan, FilterFeature::DurationFilter) {
        query.min_duration = parse_u32(&filters.min_duration);
        query.max_duration = parse_u32(&filters.max_duration);
    }

    if is_feature_enabled(plan, FilterFeature::AdvancedSort)
        && (filters.sort_by, filters.sort_order) != DEFAULT_SORT
    {
        query.sort_by = Some(filters.sort_by);
        query.sort_order = Some(filters.sort_order);
    }

    query
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Select-box value: empty and the "all" sentinel both mean unfiltered.
fn selection(s: &str) -> Option<String> {
    non_empty(s).filter(|v| !v.eq_ignore_ascii_case("all"))
}

fn parse_f64(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_u32(s: &str) -> Option<u32> {
    s.trim().parse::<u32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::PlanKey;
    use crate::types::ProjectStatus;

    fn premium() -> PlanFeatures {
        PlanFeatures::for_plan(PlanKey::Premium)
    }

    #[test]
    fn empty_filters_yield_pagination_only() {
        let q = build_search_query(&FilterInput::default(), Some(&premium()), 1, 20);
        let v = serde_json::to_value(&q).unwrap();
        let obj = v.as_object().unwrap();
        assert_eq!(obj.len(), 2, "unexpected keys: {obj:?}");
        assert_eq!(obj["page"], 1);
        assert_eq!(obj["limit"], 20);
    }

    #[test]
    fn free_plan_drops_gated_roi_filter() {
        let filters = FilterInput {
            min_roi: "5".into(),
            ..Default::default()
        };
        let free = PlanFeatures::for_plan(PlanKey::Free);
        let q = build_search_query(&filters, Some(&free), 1, 20);
        assert_eq!(q.min_roi, None);
    }

    #[test]
    fn basic_plan_keeps_roi_but_drops_amount() {
        let filters = FilterInput {
            min_roi: "5".into(),
            max_roi: "25".into(),
            min_amount: "1000".into(),
            ..Default::default()
        };
        let basic = PlanFeatures::for_plan(PlanKey::Basic);
        let q = build_search_query(&filters, Some(&basic), 1, 20);
        assert_eq!(q.min_roi, Some(5.0));
        assert_eq!(q.max_roi, Some(25.0));
        assert_eq!(q.min_amount, None);
    }

    #[test]
    fn missing_plan_gates_everything_closed() {
        let filters = FilterInput {
            search: "solar".into(),
            min_roi: "5".into(),
            min_amount: "100".into(),
            min_duration: "6".into(),
            sort_by: SortBy::RoiPercent,
            ..Default::default()
        };
        let q = build_search_query(&filters, None, 2, 10);
        assert_eq!(q.search.as_deref(), Some("solar"));
        assert_eq!(q.min_roi, None);
        assert_eq!(q.min_amount, None);
        assert_eq!(q.min_duration, None);
        assert_eq!(q.sort_by, None);
        assert_eq!(q.page, 2);
    }

    #[test]
    fn non_numeric_filter_text_is_dropped() {
        let filters = FilterInput {
            min_roi: "lots".into(),
            max_roi: "NaN".into(),
            min_amount: "1e4".into(),
            max_duration: "-3".into(),
            ..Default::default()
        };
        let q = build_search_query(&filters, Some(&premium()), 1, 20);
        assert_eq!(q.min_roi, None);
        assert_eq!(q.max_roi, None, "NaN is not a usable bound");
        assert_eq!(q.min_amount, Some(10_000.0));
        assert_eq!(q.max_duration, None);
    }

    #[test]
    fn all_sentinel_means_unfiltered() {
        let filters = FilterInput {
            category: "all".into(),
            status: "All".into(),
            ..Default::default()
        };
        let q = build_search_query(&filters, Some(&premium()), 1, 20);
        assert_eq!(q.category, None);
        assert_eq!(q.status, None);
    }

    #[test]
    fn status_select_maps_to_enum() {
        let filters = FilterInput {
            status: "completed".into(),
            ..Default::default()
        };
        let q = build_search_query(&filters, Some(&premium()), 1, 20);
        assert_eq!(q.status, Some(ProjectStatus::Completed));
    }

    #[test]
    fn default_sort_is_omitted() {
        let filters = FilterInput {
            sort_by: SortBy::CreatedAt,
            sort_order: SortOrder::Desc,
            ..Default::default()
        };
        let q = build_search_query(&filters, Some(&premium()), 1, 20);
        assert_eq!(q.sort_by, None);
        assert_eq!(q.sort_order, None);
    }

    #[test]
    fn non_default_sort_is_included_for_premium() {
        let filters = FilterInput {
            sort_by: SortBy::RoiPercent,
            sort_order: SortOrder::Asc,
            ..Default::default()
        };
        let q = build_search_query(&filters, Some(&premium()), 1, 20);
        assert_eq!(q.sort_by, Some(SortBy::RoiPercent));
        assert_eq!(q.sort_order, Some(SortOrder::Asc));

        // Same sort field with the default order still counts as non-default.
        let filters = FilterInput {
            sort_by: SortBy::CreatedAt,
            sort_order: SortOrder::Asc,
            ..Default::default()
        };
        let q = build_search_query(&filters, Some(&premium()), 1, 20);
        assert_eq!(q.sort_by, Some(SortBy::CreatedAt));
    }

    #[test]
    fn builder_is_idempotent() {
        let filters = FilterInput {
            search: "  wind  ".into(),
            category: "energy".into(),
            min_roi: "8".into(),
            categories: vec!["energy".into(), "tech".into()],
            sort_by: SortBy::FundedAmount,
            ..Default::default()
        };
        let a = build_search_query(&filters, Some(&premium()), 3, 50);
        let b = build_search_query(&filters, Some(&premium()), 3, 50);
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_value(&a).unwrap(),
            serde_json::to_value(&b).unwrap()
        );
    }
}
