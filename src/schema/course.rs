use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ApiError;
use crate::schema::category::CategoryDto;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "course_level", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum CourseLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl CourseLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CourseLevel::Beginner => "BEGINNER",
            CourseLevel::Intermediate => "INTERMEDIATE",
            CourseLevel::Advanced => "ADVANCED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "course_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum CourseStatus {
    Draft,
    Published,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    Price,
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct PriceRange {
    pub min: Option<i32>,
    pub max: Option<i32>,
}

/// Search criteria as posted by the client. Optional filters AND together;
/// `page`/`pageSize` are mandatory.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCriteria {
    pub q: Option<String>,
    pub category: Option<String>,
    pub price_range: Option<PriceRange>,
    pub sort_by: Option<SortBy>,
    pub order: Option<SortOrder>,
    pub page: i64,
    pub page_size: i64,
}

impl SearchCriteria {
    /// Rejects malformed criteria before any query is issued.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.page < 1 {
            return Err(ApiError::Validation("page must be >= 1".to_string()));
        }
        if self.page_size < 1 {
            return Err(ApiError::Validation("pageSize must be >= 1".to_string()));
        }
        if let Some(range) = &self.price_range {
            if let (Some(min), Some(max)) = (range.min, range.max) {
                if min > max {
                    return Err(ApiError::Validation(
                        "priceRange.min must not exceed priceRange.max".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }

    pub fn skip(&self) -> i64 {
        (self.page - 1) * self.page_size
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_items: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn for_page(page: i64, page_size: i64, total_items: i64) -> Self {
        let total_pages = (total_items + page_size - 1) / page_size;
        Pagination {
            current_page: page,
            total_pages,
            total_items,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructorBrief {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructorProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image: Option<String>,
    pub bio: Option<String>,
}

/// One search result row. List views stay small: identity, storefront
/// fields, instructor identity, categories and the two counts only.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub short_description: String,
    pub price: i32,
    pub discount_price: Option<i32>,
    pub level: CourseLevel,
    pub thumbnail_url: Option<String>,
    pub instructor: InstructorBrief,
    pub categories: Vec<CategoryDto>,
    pub enrollment_count: i64,
    pub review_count: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub courses: Vec<CourseSummary>,
    pub pagination: Pagination,
}

/// A bare course row as returned by the listing endpoint.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDto {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub short_description: String,
    pub description: String,
    pub price: i32,
    pub discount_price: Option<i32>,
    pub level: CourseLevel,
    pub status: CourseStatus,
    pub thumbnail_url: Option<String>,
    pub instructor_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCoursesQuery {
    pub title: Option<String>,
    pub level: Option<CourseLevel>,
    pub category_id: Option<String>,
    pub skip: Option<i64>,
    pub take: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LectureDto {
    pub id: String,
    pub title: String,
    pub is_preview: bool,
    pub duration: i32,
    pub order: i32,
    pub video_storage_info: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionDto {
    pub id: String,
    pub title: String,
    pub order: i32,
    pub lectures: Vec<LectureDto>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewerDto {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDto {
    pub id: String,
    pub user: ReviewerDto,
    pub rating: i32,
    pub content: String,
    pub instructor_reply: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The full viewer-specific course representation.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDetail {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub short_description: String,
    pub description: String,
    pub price: i32,
    pub discount_price: Option<i32>,
    pub level: CourseLevel,
    pub status: CourseStatus,
    pub thumbnail_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub instructor: InstructorProfile,
    pub categories: Vec<CategoryDto>,
    pub sections: Vec<SectionDto>,
    pub reviews: Vec<ReviewDto>,
    pub is_enrolled: bool,
    pub total_enrollments: i64,
    pub average_rating: f64,
    pub total_reviews: i64,
    pub total_lectures: i64,
    pub total_duration: i64,
}
