use sqlx::types::Uuid;
use sqlx::{FromRow, Pool, Postgres};

#[derive(Debug, FromRow)]
pub struct Favorite {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
}

/// Add a favorite. Idempotent: an existing pair is left untouched.
pub async fn add_favorite(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    course_id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO favorites (user_id, course_id) VALUES ($1, $2) \
         ON CONFLICT (user_id, course_id) DO NOTHING",
    )
    .bind(user_id)
    .bind(course_id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Remove a favorite. Idempotent: removing a missing pair is a no-op.
pub async fn remove_favorite(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    course_id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND course_id = $2")
        .bind(user_id)
        .bind(course_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn is_course_favorited(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    course_id: Uuid,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM favorites WHERE user_id = $1 AND course_id = $2)",
    )
    .bind(user_id)
    .bind(course_id)
    .fetch_one(pool)
    .await
}

pub async fn count_course_favorites(
    pool: &Pool<Postgres>,
    course_id: Uuid,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM favorites WHERE course_id = $1")
        .bind(course_id)
        .fetch_one(pool)
        .await
}

pub async fn get_user_favorites(
    pool: &Pool<Postgres>,
    user_id: Uuid,
) -> Result<Vec<Favorite>, sqlx::Error> {
    sqlx::query_as::<_, Favorite>(
        "SELECT id, user_id, course_id FROM favorites WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}
