use sqlx::types::Uuid;
use sqlx::{FromRow, Pool, Postgres};

#[derive(Debug, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

/// A category row tagged with the course it is linked to, for attaching
/// category lists to a whole page of search results in one query.
#[derive(Debug, FromRow)]
pub struct CourseCategoryRow {
    pub course_id: Uuid,
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

/// All categories, oldest first.
pub async fn get_all_categories(pool: &Pool<Postgres>) -> Result<Vec<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>(
        "SELECT id, name, slug FROM categories ORDER BY created_at ASC",
    )
    .fetch_all(pool)
    .await
}

/// Categories linked to a single course.
pub async fn get_course_categories(
    pool: &Pool<Postgres>,
    course_id: Uuid,
) -> Result<Vec<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>(
        "SELECT cat.id, cat.name, cat.slug FROM categories cat \
         JOIN course_categories cc ON cc.category_id = cat.id \
         WHERE cc.course_id = $1 \
         ORDER BY cat.created_at ASC",
    )
    .bind(course_id)
    .fetch_all(pool)
    .await
}

/// Categories linked to any of the given courses.
pub async fn get_categories_for_courses(
    pool: &Pool<Postgres>,
    course_ids: &[Uuid],
) -> Result<Vec<CourseCategoryRow>, sqlx::Error> {
    sqlx::query_as::<_, CourseCategoryRow>(
        "SELECT cc.course_id, cat.id, cat.name, cat.slug FROM categories cat \
         JOIN course_categories cc ON cc.category_id = cat.id \
         WHERE cc.course_id = ANY($1) \
         ORDER BY cat.created_at ASC",
    )
    .bind(course_ids)
    .fetch_all(pool)
    .await
}
