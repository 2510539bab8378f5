use chrono::{DateTime, Utc};
use sqlx::types::Uuid;
use sqlx::{FromRow, Pool, Postgres};

#[derive(Debug, FromRow)]
pub struct Enrollment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub enrolled_at: DateTime<Utc>,
}

/// Whether the user holds an enrollment for the course.
pub async fn is_user_enrolled(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    course_id: Uuid,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM enrollments WHERE user_id = $1 AND course_id = $2)",
    )
    .bind(user_id)
    .bind(course_id)
    .fetch_one(pool)
    .await
}

pub async fn count_course_enrollments(
    pool: &Pool<Postgres>,
    course_id: Uuid,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM enrollments WHERE course_id = $1")
        .bind(course_id)
        .fetch_one(pool)
        .await
}

/// Insert an enrollment. Duplicates surface as a unique-constraint
/// violation from the store rather than a check-then-create race.
pub async fn enroll_user(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    course_id: Uuid,
) -> Result<Enrollment, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(
        "INSERT INTO enrollments (user_id, course_id) \
         VALUES ($1, $2) \
         RETURNING id, user_id, course_id, enrolled_at",
    )
    .bind(user_id)
    .bind(course_id)
    .fetch_one(pool)
    .await
}
