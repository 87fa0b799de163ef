//! Database layer — migrations, project search, and investment writes.
//!
//! All money columns are REAL (f64) to match the wire contract; the server
//! is the authority on funding state, so every investment goes through a
//! transaction that re-checks the business rules against the current row.

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::info;

use invest_core::{
    validate_investment, InvestmentRequest, PlanKey, Project, ProjectStatus, SearchQuery, SortBy,
    SortOrder, UserContext,
};

use crate::errors::{ApiError, Result};

/// Establish a SQLite connection pool and run pending migrations.
pub async fn init_pool(database_url: &str) -> Result<SqlitePool> {
    // Make sure the file is created if it doesn't exist yet.
    let url = if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else {
        format!("sqlite:{database_url}")
    };

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database migrations applied successfully");
    Ok(pool)
}

// ─────────────────────────────────────────────────────────
// Row types
// ─────────────────────────────────────────────────────────

const PROJECT_COLUMNS: &str = "id, title, description, category, min_investment, roi_percent, \
     target_amount, funded_amount, duration_months, status, image_url";

#[derive(Debug, Clone, sqlx::FromRow)]
struct ProjectRow {
    id: i64,
    title: String,
    description: String,
    category: String,
    min_investment: f64,
    roi_percent: f64,
    target_amount: f64,
    funded_amount: f64,
    duration_months: i64,
    status: String,
    image_url: Option<String>,
}

impl ProjectRow {
    fn into_project(self) -> Project {
        Project {
            id: self.id,
            title: self.title,
            description: self.description,
            category: self.category,
            min_investment: self.min_investment,
            roi_percent: self.roi_percent,
            target_amount: self.target_amount,
            funded_amount: self.funded_amount,
            duration_months: self.duration_months as u32,
            // Unrecognised values cannot occur: the column has a CHECK
            // constraint. Fall back to Closed rather than panic.
            status: ProjectStatus::from_str_opt(&self.status).unwrap_or(ProjectStatus::Closed),
            image_url: self.image_url,
        }
    }
}

/// A stored user with their API token already verified.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: i64,
    pub email: String,
    pub plan_key: String,
    pub is_admin: bool,
}

impl UserRow {
    pub fn plan(&self) -> PlanKey {
        PlanKey::from_str_opt(&self.plan_key).unwrap_or(PlanKey::Free)
    }
}

/// Fields accepted when an administrator creates a project.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub min_investment: f64,
    pub roi_percent: f64,
    pub target_amount: f64,
    pub duration_months: u32,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// A stored investment order, echoed back to the investor.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentRecord {
    pub id: i64,
    pub project_id: i64,
    pub user_id: i64,
    pub amount: f64,
    pub payment_method: String,
    pub status: String,
    pub created_at: i64,
}

// ─────────────────────────────────────────────────────────
// Users
// ─────────────────────────────────────────────────────────

pub async fn user_by_token(pool: &SqlitePool, token: &str) -> Result<Option<UserRow>> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT id, email, plan_key, is_admin FROM users WHERE api_token = ?1",
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

// ─────────────────────────────────────────────────────────
// Projects
// ─────────────────────────────────────────────────────────

pub async fn get_project(pool: &SqlitePool, id: i64) -> Result<Option<Project>> {
    let row = sqlx::query_as::<_, ProjectRow>(&format!(
        "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(ProjectRow::into_project))
}

/// Distinct categories of projects that are still listed (not closed).
pub async fn list_categories(pool: &SqlitePool) -> Result<Vec<String>> {
    let rows: Vec<(String,)> = sqlx::query_as(
        "SELECT DISTINCT category FROM projects WHERE status != 'closed' ORDER BY category",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(|(c,)| c).collect())
}

pub async fn insert_project(pool: &SqlitePool, new: &NewProject) -> Result<Project> {
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO projects
            (title, description, category, min_investment, roi_percent,
             target_amount, duration_months, image_url)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        RETURNING id
        "#,
    )
    .bind(&new.title)
    .bind(&new.description)
    .bind(&new.category)
    .bind(new.min_investment)
    .bind(new.roi_percent)
    .bind(new.target_amount)
    .bind(new.duration_months as i64)
    .bind(&new.image_url)
    .fetch_one(pool)
    .await?;

    get_project(pool, id)
        .await?
        .ok_or(ApiError::NotFound("project"))
}

// ─────────────────────────────────────────────────────────
// Search
// ─────────────────────────────────────────────────────────

/// Append the WHERE clause for `query`'s filters.
///
/// Gated fields are assumed to have been entitlement-checked by the route
/// layer already; here they are just predicates.
fn push_filters(qb: &mut QueryBuilder<Sqlite>, query: &SearchQuery) {
    qb.push(" WHERE 1 = 1");

    if let Some(search) = &query.search {
        let pattern = format!("%{search}%");
        qb.push(" AND (title LIKE ")
            .push_bind(pattern.clone())
            .push(" OR description LIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(category) = &query.category {
        qb.push(" AND category = ").push_bind(category.clone());
    }
    if let Some(categories) = &query.categories {
        if !categories.is_empty() {
            qb.push(" AND category IN (");
            let mut sep = qb.separated(", ");
            for c in categories {
                sep.push_bind(c.clone());
            }
            qb.push(")");
        }
    }
    if let Some(status) = query.status {
        qb.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(min_roi) = query.min_roi {
        qb.push(" AND roi_percent >= ").push_bind(min_roi);
    }
    if let Some(max_roi) = query.max_roi {
        qb.push(" AND roi_percent <= ").push_bind(max_roi);
    }
    if let Some(min_amount) = query.min_amount {
        qb.push(" AND target_amount >= ").push_bind(min_amount);
    }
    if let Some(max_amount) = query.max_amount {
        qb.push(" AND target_amount <= ").push_bind(max_amount);
    }
    if let Some(min_duration) = query.min_duration {
        qb.push(" AND duration_months >= ")
            .push_bind(min_duration as i64);
    }
    if let Some(max_duration) = query.max_duration {
        qb.push(" AND duration_months <= ")
            .push_bind(max_duration as i64);
    }
}

/// Run a filtered, sorted, paginated project search.
///
/// Returns the page of projects plus the total match count (for the
/// pagination footer). `page` is 1-based; the route layer clamps `limit`.
pub async fn search_projects(
    pool: &SqlitePool,
    query: &SearchQuery,
) -> Result<(Vec<Project>, i64)> {
    let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM projects");
    push_filters(&mut count_qb, query);
    let total: i64 = count_qb.build_query_scalar().fetch_one(pool).await?;

    // Sort columns come from the SortBy enum, never from user text.
    let sort_by = query.sort_by.unwrap_or(SortBy::CreatedAt);
    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);

    let mut qb = QueryBuilder::new(format!("SELECT {PROJECT_COLUMNS} FROM projects"));
    push_filters(&mut qb, query);
    qb.push(format!(
        " ORDER BY {} {}, id DESC",
        sort_by.column(),
        sort_order.sql()
    ));

    let page = query.page.max(1);
    let offset = (page as i64 - 1) * query.limit as i64;
    qb.push(" LIMIT ")
        .push_bind(query.limit as i64)
        .push(" OFFSET ")
        .push_bind(offset);

    let rows: Vec<ProjectRow> = qb.build_query_as().fetch_all(pool).await?;
    Ok((rows.into_iter().map(ProjectRow::into_project).collect(), total))
}

// ─────────────────────────────────────────────────────────
// Investments
// ─────────────────────────────────────────────────────────

/// Place an investment order.
///
/// Inside one transaction: load the current project row, re-run the
/// pre-flight checks against it, insert the order, bump `funded_amount`,
/// and flip the project to `completed` when the target is reached. The
/// whole thing aborts if any rule fails, so a funding-target race between
/// two investors resolves to exactly one winner.
pub async fn create_investment(
    pool: &SqlitePool,
    user: &UserContext,
    request: &InvestmentRequest,
) -> Result<(InvestmentRecord, Project)> {
    let mut tx = pool.begin().await?;

    let row = sqlx::query_as::<_, ProjectRow>(&format!(
        "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?1"
    ))
    .bind(request.project_id)
    .fetch_optional(&mut *tx)
    .await?;
    let project = row.ok_or(ApiError::NotFound("project"))?.into_project();

    if project.status != ProjectStatus::Active {
        return Err(ApiError::BadRequest(
            "Project is not accepting investments".to_string(),
        ));
    }

    let amount = validate_investment(
        Some(user),
        Some(request.payment_method),
        request.amount,
        &project,
    )?;

    let record = sqlx::query_as::<_, InvestmentRecord>(
        r#"
        INSERT INTO investments (project_id, user_id, amount, payment_method)
        VALUES (?1, ?2, ?3, ?4)
        RETURNING id, project_id, user_id, amount, payment_method, status, created_at
        "#,
    )
    .bind(request.project_id)
    .bind(user.id)
    .bind(amount)
    .bind(request.payment_method.as_str())
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        UPDATE projects
        SET funded_amount = funded_amount + ?1,
            status = CASE
                WHEN funded_amount + ?1 >= target_amount THEN 'completed'
                ELSE status
            END
        WHERE id = ?2
        "#,
    )
    .bind(amount)
    .bind(request.project_id)
    .execute(&mut *tx)
    .await?;

    let updated = sqlx::query_as::<_, ProjectRow>(&format!(
        "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?1"
    ))
    .bind(request.project_id)
    .fetch_one(&mut *tx)
    .await?
    .into_project();

    tx.commit().await?;
    Ok((record, updated))
}

/// All orders a user has placed, newest first.
pub async fn investments_for_user(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<InvestmentRecord>> {
    let rows = sqlx::query_as::<_, InvestmentRecord>(
        r#"
        SELECT id, project_id, user_id, amount, payment_method, status, created_at
        FROM   investments
        WHERE  user_id = ?1
        ORDER  BY created_at DESC, id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

// ─────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use invest_core::{PaymentMethod, PlanKey};

    pub(crate) async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        pool
    }

    pub(crate) fn sample_project(title: &str, category: &str, roi: f64) -> NewProject {
        NewProject {
            title: title.to_string(),
            description: format!("{title} description"),
            category: category.to_string(),
            min_investment: 100.0,
            roi_percent: roi,
            target_amount: 10_000.0,
            duration_months: 12,
            image_url: None,
        }
    }

    pub(crate) async fn insert_user(pool: &SqlitePool, email: &str, plan: &str) -> i64 {
        sqlx::query_scalar(
            "INSERT INTO users (email, api_token, plan_key) VALUES (?1, ?2, ?3) RETURNING id",
        )
        .bind(email)
        .bind(format!("token-{email}"))
        .bind(plan)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn insert_and_get_project() {
        let pool = test_pool().await;
        let p = insert_project(&pool, &sample_project("Solar", "energy", 15.0))
            .await
            .unwrap();
        assert_eq!(p.title, "Solar");
        assert_eq!(p.funded_amount, 0.0);
        assert_eq!(p.status, ProjectStatus::Active);

        let fetched = get_project(&pool, p.id).await.unwrap().unwrap();
        assert_eq!(fetched, p);
        assert!(get_project(&pool, 9999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn categories_exclude_closed() {
        let pool = test_pool().await;
        insert_project(&pool, &sample_project("A", "energy", 10.0))
            .await
            .unwrap();
        let b = insert_project(&pool, &sample_project("B", "realestate", 8.0))
            .await
            .unwrap();
        sqlx::query("UPDATE projects SET status = 'closed' WHERE id = ?1")
            .bind(b.id)
            .execute(&pool)
            .await
            .unwrap();

        let cats = list_categories(&pool).await.unwrap();
        assert_eq!(cats, vec!["energy".to_string()]);
    }

    #[tokio::test]
    async fn search_filters_by_roi_range() {
        let pool = test_pool().await;
        insert_project(&pool, &sample_project("Low", "energy", 5.0))
            .await
            .unwrap();
        insert_project(&pool, &sample_project("Mid", "energy", 12.0))
            .await
            .unwrap();
        insert_project(&pool, &sample_project("High", "energy", 25.0))
            .await
            .unwrap();

        let query = SearchQuery {
            min_roi: Some(10.0),
            max_roi: Some(20.0),
            page: 1,
            limit: 20,
            ..Default::default()
        };
        let (projects, total) = search_projects(&pool, &query).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(projects[0].title, "Mid");
    }

    #[tokio::test]
    async fn search_matches_title_and_description() {
        let pool = test_pool().await;
        insert_project(&pool, &sample_project("Offshore wind", "energy", 10.0))
            .await
            .unwrap();
        insert_project(&pool, &sample_project("Data center", "tech", 10.0))
            .await
            .unwrap();

        let query = SearchQuery {
            search: Some("wind".into()),
            page: 1,
            limit: 20,
            ..Default::default()
        };
        let (projects, total) = search_projects(&pool, &query).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(projects[0].title, "Offshore wind");
    }

    #[tokio::test]
    async fn search_multiple_categories() {
        let pool = test_pool().await;
        insert_project(&pool, &sample_project("A", "energy", 10.0))
            .await
            .unwrap();
        insert_project(&pool, &sample_project("B", "tech", 10.0))
            .await
            .unwrap();
        insert_project(&pool, &sample_project("C", "realestate", 10.0))
            .await
            .unwrap();

        let query = SearchQuery {
            categories: Some(vec!["energy".into(), "tech".into()]),
            page: 1,
            limit: 20,
            ..Default::default()
        };
        let (_, total) = search_projects(&pool, &query).await.unwrap();
        assert_eq!(total, 2);
    }

    #[tokio::test]
    async fn search_sorts_and_paginates() {
        let pool = test_pool().await;
        for (title, roi) in [("A", 5.0), ("B", 15.0), ("C", 10.0)] {
            insert_project(&pool, &sample_project(title, "energy", roi))
                .await
                .unwrap();
        }

        let query = SearchQuery {
            sort_by: Some(SortBy::RoiPercent),
            sort_order: Some(SortOrder::Asc),
            page: 1,
            limit: 2,
            ..Default::default()
        };
        let (page1, total) = search_projects(&pool, &query).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(page1.len(), 2);
        assert_eq!(page1[0].title, "A");
        assert_eq!(page1[1].title, "C");

        let query = SearchQuery {
            page: 2,
            ..query
        };
        let (page2, _) = search_projects(&pool, &query).await.unwrap();
        assert_eq!(page2.len(), 1);
        assert_eq!(page2[0].title, "B");
    }

    #[tokio::test]
    async fn investment_updates_funding() {
        let pool = test_pool().await;
        let project = insert_project(&pool, &sample_project("Solar", "energy", 15.0))
            .await
            .unwrap();
        let user_id = insert_user(&pool, "a@example.com", "free").await;
        let user = UserContext {
            id: user_id,
            plan: PlanKey::Free,
        };

        let request = InvestmentRequest {
            project_id: project.id,
            amount: 2500.0,
            payment_method: PaymentMethod::Stripe,
        };
        let (record, updated) = create_investment(&pool, &user, &request).await.unwrap();
        assert_eq!(record.amount, 2500.0);
        assert_eq!(record.payment_method, "stripe");
        assert_eq!(updated.funded_amount, 2500.0);
        assert_eq!(updated.status, ProjectStatus::Active);

        let orders = investments_for_user(&pool, user_id).await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].id, record.id);
    }

    #[tokio::test]
    async fn investment_completes_project_at_target() {
        let pool = test_pool().await;
        let project = insert_project(&pool, &sample_project("Solar", "energy", 15.0))
            .await
            .unwrap();
        let user_id = insert_user(&pool, "a@example.com", "plus").await;
        let user = UserContext {
            id: user_id,
            plan: PlanKey::Plus,
        };

        let request = InvestmentRequest {
            project_id: project.id,
            amount: 10_000.0,
            payment_method: PaymentMethod::BankTransfer,
        };
        let (_, updated) = create_investment(&pool, &user, &request).await.unwrap();
        assert_eq!(updated.funded_amount, 10_000.0);
        assert_eq!(updated.status, ProjectStatus::Completed);

        // A completed project takes no further orders.
        let err = create_investment(&pool, &user, &request).await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn investment_rules_rechecked_against_live_row() {
        let pool = test_pool().await;
        let project = insert_project(&pool, &sample_project("Solar", "energy", 15.0))
            .await
            .unwrap();
        let user_id = insert_user(&pool, "a@example.com", "free").await;
        let user = UserContext {
            id: user_id,
            plan: PlanKey::Free,
        };

        // Below project minimum.
        let err = create_investment(
            &pool,
            &user,
            &InvestmentRequest {
                project_id: project.id,
                amount: 50.0,
                payment_method: PaymentMethod::Wallet,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Investment(_)));

        // Above remaining target.
        let err = create_investment(
            &pool,
            &user,
            &InvestmentRequest {
                project_id: project.id,
                amount: 10_000.01,
                payment_method: PaymentMethod::Wallet,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Investment(_)));

        // Unknown project.
        let err = create_investment(
            &pool,
            &user,
            &InvestmentRequest {
                project_id: 424242,
                amount: 500.0,
                payment_method: PaymentMethod::Wallet,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn token_lookup() {
        let pool = test_pool().await;
        insert_user(&pool, "a@example.com", "premium").await;

        let user = user_by_token(&pool, "token-a@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.email, "a@example.com");
        assert_eq!(user.plan(), PlanKey::Premium);
        assert!(!user.is_admin);

        assert!(user_by_token(&pool, "bogus").await.unwrap().is_none());
    }
}
