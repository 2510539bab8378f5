use actix_web::{post, web, HttpMessage, HttpRequest, HttpResponse};

use crate::errors::ApiError;
use crate::models::{course, enrollment};
use crate::schema::course::CourseStatus;
use crate::schema::{EnrollmentResponse, Viewer};
use crate::utils::parse_uuid;
use crate::GlobalState;

#[post("/{course_id}/enroll")]
pub async fn enroll_course_handler(
    data: web::Data<GlobalState>,
    path: web::Path<String>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let viewer = req
        .extensions()
        .get::<Viewer>()
        .copied()
        .ok_or(ApiError::Unauthorized("login required"))?;

    let course_id = parse_uuid(&path.into_inner(), "course id")?;
    let pool = &data.pool;

    let course = course::get_course_by_id(pool, course_id)
        .await?
        .ok_or(ApiError::NotFound("course"))?;

    // drafts are not enrollable, and not acknowledged to exist
    if course.status != CourseStatus::Published {
        return Err(ApiError::NotFound("course"));
    }

    // the (user_id, course_id) uniqueness constraint decides duplicates,
    // not a prior existence check
    match enrollment::enroll_user(pool, viewer.id, course_id).await {
        Ok(enrollment) => {
            tracing::info!(course_id = %course_id, user_id = %viewer.id, "user enrolled");
            Ok(HttpResponse::Ok().json(EnrollmentResponse {
                id: enrollment.id.to_string(),
                message: "Enrolled Successfully".to_string(),
            }))
        }
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            Err(ApiError::Conflict("already enrolled"))
        }
        Err(e) => Err(e.into()),
    }
}
