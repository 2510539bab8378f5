use chrono::{DateTime, Utc};
use sqlx::types::Uuid;
use sqlx::{FromRow, Pool, Postgres};

/// A review row joined with the reviewer's id, name and image. Nothing
/// else of the reviewer leaks into responses.
#[derive(Debug, FromRow)]
pub struct ReviewRow {
    pub id: Uuid,
    pub rating: i32,
    pub content: String,
    pub instructor_reply: Option<String>,
    pub created_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub user_name: String,
    pub user_image: Option<String>,
}

/// All reviews of a course, newest first.
pub async fn get_course_reviews(
    pool: &Pool<Postgres>,
    course_id: Uuid,
) -> Result<Vec<ReviewRow>, sqlx::Error> {
    sqlx::query_as::<_, ReviewRow>(
        "SELECT r.id, r.rating, r.content, r.instructor_reply, r.created_at, \
            u.id AS user_id, u.name AS user_name, u.image AS user_image \
         FROM reviews r \
         JOIN users u ON u.id = r.user_id \
         WHERE r.course_id = $1 \
         ORDER BY r.created_at DESC",
    )
    .bind(course_id)
    .fetch_all(pool)
    .await
}
