use serde::{Deserialize, Serialize};

/// Favorite state of a course for the current viewer. `is_favorite` is
/// always false for anonymous callers.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteStatus {
    pub is_favorite: bool,
    pub favorite_count: i64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteDto {
    pub id: String,
    pub course_id: String,
}
