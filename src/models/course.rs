use chrono::{DateTime, Utc};
use sqlx::postgres::PgArguments;
use sqlx::types::Uuid;
use sqlx::{FromRow, Pool, Postgres};

use crate::schema::course::{CourseLevel, CourseStatus, SearchCriteria, SortBy, SortOrder};

/// Column list shared across queries to avoid repetition.
const COURSE_COLUMNS: &str = "c.id, c.title, c.slug, c.short_description, c.description, \
     c.price, c.discount_price, c.level, c.status, c.thumbnail_url, \
     c.instructor_id, c.created_at";

const SEARCH_COLUMNS: &str = "c.id, c.title, c.slug, c.short_description, c.price, \
     c.discount_price, c.level, c.thumbnail_url, \
     u.id AS instructor_id, u.name AS instructor_name, \
     (SELECT COUNT(*) FROM enrollments e WHERE e.course_id = c.id) AS enrollment_count, \
     (SELECT COUNT(*) FROM reviews r WHERE r.course_id = c.id) AS review_count";

#[derive(Debug, FromRow)]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub short_description: String,
    pub description: String,
    pub price: i32,
    pub discount_price: Option<i32>,
    pub level: CourseLevel,
    pub status: CourseStatus,
    pub thumbnail_url: Option<String>,
    pub instructor_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A course row joined with its instructor's public profile, as needed by
/// the detail view.
#[derive(Debug, FromRow)]
pub struct CourseWithInstructor {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub short_description: String,
    pub description: String,
    pub price: i32,
    pub discount_price: Option<i32>,
    pub level: CourseLevel,
    pub status: CourseStatus,
    pub thumbnail_url: Option<String>,
    pub instructor_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub instructor_name: String,
    pub instructor_email: String,
    pub instructor_image: Option<String>,
    pub instructor_bio: Option<String>,
}

/// One search hit with the embedded instructor identity and counts.
#[derive(Debug, FromRow)]
pub struct CourseSearchRow {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub short_description: String,
    pub price: i32,
    pub discount_price: Option<i32>,
    pub level: CourseLevel,
    pub thumbnail_url: Option<String>,
    pub instructor_id: Uuid,
    pub instructor_name: String,
    pub enrollment_count: i64,
    pub review_count: i64,
}

#[derive(Debug, FromRow)]
pub struct SectionRow {
    pub id: Uuid,
    pub title: String,
    pub position: i32,
}

#[derive(Debug, FromRow)]
pub struct LectureRow {
    pub id: Uuid,
    pub section_id: Uuid,
    pub title: String,
    pub is_preview: bool,
    pub duration: i32,
    pub position: i32,
    pub video_storage_info: Option<String>,
}

/// Filters for the plain listing endpoint, already validated and parsed.
#[derive(Debug, Default)]
pub struct CourseListFilter {
    pub title: Option<String>,
    pub level: Option<CourseLevel>,
    pub category_id: Option<Uuid>,
    pub skip: i64,
    pub take: Option<i64>,
}

/// Typed bind value for dynamically-built search queries.
#[derive(Debug, PartialEq)]
enum BindValue {
    Int(i32),
    BigInt(i64),
    Text(String),
    Id(Uuid),
}

/// Build a WHERE clause and bind values from the search criteria.
///
/// Returns `(where_clause, bind_values, next_bind_index)`. Only published
/// courses are candidates, so the clause is never empty. Empty-string
/// filters count as absent.
fn build_search_filter(criteria: &SearchCriteria) -> (String, Vec<BindValue>, u32) {
    let mut conditions = vec!["c.status = 'PUBLISHED'".to_string()];
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<BindValue> = Vec::new();

    if let Some(q) = criteria.q.as_deref().filter(|q| !q.is_empty()) {
        conditions.push(format!(
            "(c.title ILIKE ${bind_idx} OR u.name ILIKE ${bind_idx})"
        ));
        bind_idx += 1;
        bind_values.push(BindValue::Text(format!("%{q}%")));
    }

    if let Some(slug) = criteria.category.as_deref().filter(|s| !s.is_empty()) {
        conditions.push(format!(
            "EXISTS (SELECT 1 FROM course_categories cc \
             JOIN categories cat ON cat.id = cc.category_id \
             WHERE cc.course_id = c.id AND cat.slug = ${bind_idx})"
        ));
        bind_idx += 1;
        bind_values.push(BindValue::Text(slug.to_string()));
    }

    if let Some(range) = &criteria.price_range {
        if let Some(min) = range.min {
            conditions.push(format!("c.price >= ${bind_idx}"));
            bind_idx += 1;
            bind_values.push(BindValue::Int(min));
        }
        if let Some(max) = range.max {
            conditions.push(format!("c.price <= ${bind_idx}"));
            bind_idx += 1;
            bind_values.push(BindValue::Int(max));
        }
    }

    let where_clause = format!("WHERE {}", conditions.join(" AND "));
    (where_clause, bind_values, bind_idx)
}

/// The deterministic ordering for a result page. Price sort keeps
/// newest-first as a tie-break; everything else is newest-first so that
/// pagination stays stable across requests.
fn order_clause(criteria: &SearchCriteria) -> &'static str {
    match criteria.sort_by {
        Some(SortBy::Price) => match criteria.order {
            Some(SortOrder::Desc) => "ORDER BY c.price DESC, c.created_at DESC",
            _ => "ORDER BY c.price ASC, c.created_at DESC",
        },
        _ => "ORDER BY c.created_at DESC",
    }
}

/// Bind a slice of `BindValue` to a sqlx `QueryAs`.
fn bind_values<'q, O>(
    mut q: sqlx::query::QueryAs<'q, Postgres, O, PgArguments>,
    values: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, Postgres, O, PgArguments> {
    for val in values {
        match val {
            BindValue::Int(v) => q = q.bind(*v),
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Id(v) => q = q.bind(*v),
        }
    }
    q
}

/// Bind a slice of `BindValue` to a sqlx `QueryScalar`.
fn bind_values_scalar<'q>(
    mut q: sqlx::query::QueryScalar<'q, Postgres, i64, PgArguments>,
    values: &'q [BindValue],
) -> sqlx::query::QueryScalar<'q, Postgres, i64, PgArguments> {
    for val in values {
        match val {
            BindValue::Int(v) => q = q.bind(*v),
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Id(v) => q = q.bind(*v),
        }
    }
    q
}

/// Run the faceted search: one count query and one page query over the
/// same filter. Returns the page rows and the unpaginated total.
pub async fn search_courses(
    pool: &Pool<Postgres>,
    criteria: &SearchCriteria,
) -> Result<(Vec<CourseSearchRow>, i64), sqlx::Error> {
    let (where_clause, binds, bind_idx) = build_search_filter(criteria);

    let count_query = format!(
        "SELECT COUNT(*) FROM courses c \
         JOIN users u ON u.id = c.instructor_id {where_clause}"
    );
    let total_items = bind_values_scalar(sqlx::query_scalar(&count_query), &binds)
        .fetch_one(pool)
        .await?;

    let page_query = format!(
        "SELECT {SEARCH_COLUMNS} FROM courses c \
         JOIN users u ON u.id = c.instructor_id \
         {where_clause} {order} LIMIT ${bind_idx} OFFSET ${offset_idx}",
        order = order_clause(criteria),
        offset_idx = bind_idx + 1,
    );
    let rows = bind_values(sqlx::query_as::<_, CourseSearchRow>(&page_query), &binds)
        .bind(criteria.page_size)
        .bind(criteria.skip())
        .fetch_all(pool)
        .await?;

    Ok((rows, total_items))
}

/// Find a course by its ID.
pub async fn get_course_by_id(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<Course>, sqlx::Error> {
    let query = format!("SELECT {COURSE_COLUMNS} FROM courses c WHERE c.id = $1");
    sqlx::query_as::<_, Course>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Find a course by ID together with its instructor's public profile.
pub async fn get_course_with_instructor(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<CourseWithInstructor>, sqlx::Error> {
    let query = format!(
        "SELECT {COURSE_COLUMNS}, \
            u.name AS instructor_name, u.email AS instructor_email, \
            u.image AS instructor_image, u.bio AS instructor_bio \
         FROM courses c \
         JOIN users u ON u.id = c.instructor_id \
         WHERE c.id = $1"
    );
    sqlx::query_as::<_, CourseWithInstructor>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// All sections of a course in display order.
pub async fn get_course_sections(
    pool: &Pool<Postgres>,
    course_id: Uuid,
) -> Result<Vec<SectionRow>, sqlx::Error> {
    sqlx::query_as::<_, SectionRow>(
        "SELECT s.id, s.title, s.position FROM sections s \
         WHERE s.course_id = $1 ORDER BY s.position ASC",
    )
    .bind(course_id)
    .fetch_all(pool)
    .await
}

/// All lectures of a course, ordered by position within their section.
pub async fn get_course_lectures(
    pool: &Pool<Postgres>,
    course_id: Uuid,
) -> Result<Vec<LectureRow>, sqlx::Error> {
    sqlx::query_as::<_, LectureRow>(
        "SELECT l.id, l.section_id, l.title, l.is_preview, l.duration, \
            l.position, l.video_storage_info \
         FROM lectures l \
         JOIN sections s ON s.id = l.section_id \
         WHERE s.course_id = $1 \
         ORDER BY l.position ASC",
    )
    .bind(course_id)
    .fetch_all(pool)
    .await
}

/// Published courses matching the listing filters, newest first.
pub async fn list_courses(
    pool: &Pool<Postgres>,
    filter: &CourseListFilter,
) -> Result<Vec<Course>, sqlx::Error> {
    let mut conditions = vec!["c.status = 'PUBLISHED'".to_string()];
    let mut bind_idx = 1u32;
    let mut binds: Vec<BindValue> = Vec::new();

    if let Some(title) = filter.title.as_deref().filter(|t| !t.is_empty()) {
        conditions.push(format!("c.title ILIKE ${bind_idx}"));
        bind_idx += 1;
        binds.push(BindValue::Text(format!("%{title}%")));
    }
    if let Some(level) = filter.level {
        conditions.push(format!("c.level = ${bind_idx}::course_level"));
        bind_idx += 1;
        binds.push(BindValue::Text(level.as_str().to_string()));
    }
    if let Some(category_id) = filter.category_id {
        conditions.push(format!(
            "EXISTS (SELECT 1 FROM course_categories cc \
             WHERE cc.course_id = c.id AND cc.category_id = ${bind_idx})"
        ));
        bind_idx += 1;
        binds.push(BindValue::Id(category_id));
    }

    let mut query = format!(
        "SELECT {COURSE_COLUMNS} FROM courses c WHERE {} ORDER BY c.created_at DESC",
        conditions.join(" AND ")
    );
    if let Some(take) = filter.take {
        query.push_str(&format!(" LIMIT ${bind_idx}"));
        bind_idx += 1;
        binds.push(BindValue::BigInt(take));
    }
    query.push_str(&format!(" OFFSET ${bind_idx}"));
    binds.push(BindValue::BigInt(filter.skip));

    bind_values(sqlx::query_as::<_, Course>(&query), &binds)
        .fetch_all(pool)
        .await
}
