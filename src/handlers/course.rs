use std::collections::HashMap;

use actix_web::{get, post, web, HttpMessage, HttpRequest, HttpResponse};
use futures_util::try_join;
use sqlx::types::Uuid;

use crate::errors::ApiError;
use crate::models::category::{self, Category};
use crate::models::course::{
    self, Course, CourseListFilter, CourseWithInstructor, LectureRow, SectionRow,
};
use crate::models::enrollment;
use crate::models::review::{self, ReviewRow};
use crate::schema::category::CategoryDto;
use crate::schema::course::{
    CourseDetail, CourseDto, CourseSummary, InstructorBrief, InstructorProfile, LectureDto,
    ListCoursesQuery, Pagination, ReviewDto, ReviewerDto, SearchCriteria, SearchResponse,
    SectionDto,
};
use crate::schema::Viewer;
use crate::utils::{average_rating, can_view_video, parse_uuid, total_duration};
use crate::GlobalState;

#[post("/search")]
pub async fn search_courses_handler(
    data: web::Data<GlobalState>,
    criteria: web::Json<SearchCriteria>,
) -> Result<HttpResponse, ApiError> {
    let criteria = criteria.into_inner();
    criteria.validate()?;

    let pool = &data.pool;
    let (rows, total_items) = course::search_courses(pool, &criteria).await?;

    let course_ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
    let mut categories_by_course: HashMap<Uuid, Vec<CategoryDto>> = HashMap::new();
    if !course_ids.is_empty() {
        for row in category::get_categories_for_courses(pool, &course_ids).await? {
            categories_by_course
                .entry(row.course_id)
                .or_default()
                .push(CategoryDto {
                    id: row.id.to_string(),
                    name: row.name,
                    slug: row.slug,
                });
        }
    }

    let courses = rows
        .into_iter()
        .map(|row| CourseSummary {
            id: row.id.to_string(),
            title: row.title,
            slug: row.slug,
            short_description: row.short_description,
            price: row.price,
            discount_price: row.discount_price,
            level: row.level,
            thumbnail_url: row.thumbnail_url,
            instructor: InstructorBrief {
                id: row.instructor_id.to_string(),
                name: row.instructor_name,
            },
            categories: categories_by_course.remove(&row.id).unwrap_or_default(),
            enrollment_count: row.enrollment_count,
            review_count: row.review_count,
        })
        .collect::<Vec<_>>();

    let pagination = Pagination::for_page(criteria.page, criteria.page_size, total_items);

    tracing::debug!(total = total_items, page = criteria.page, "course search served");

    Ok(HttpResponse::Ok().json(SearchResponse { courses, pagination }))
}

#[get("")]
pub async fn list_courses_handler(
    data: web::Data<GlobalState>,
    query: web::Query<ListCoursesQuery>,
) -> Result<HttpResponse, ApiError> {
    let query = query.into_inner();

    if query.skip.is_some_and(|skip| skip < 0) {
        return Err(ApiError::Validation("skip must be >= 0".to_string()));
    }
    if query.take.is_some_and(|take| take < 0) {
        return Err(ApiError::Validation("take must be >= 0".to_string()));
    }
    let category_id = match query.category_id.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => Some(parse_uuid(raw, "category id")?),
        None => None,
    };

    let filter = CourseListFilter {
        title: query.title,
        level: query.level,
        category_id,
        skip: query.skip.unwrap_or(0),
        take: query.take,
    };

    let courses = course::list_courses(&data.pool, &filter).await?;
    let parsed_courses = courses.into_iter().map(course_to_dto).collect::<Vec<_>>();

    Ok(HttpResponse::Ok().json(parsed_courses))
}

#[get("/{course_id}")]
pub async fn get_course_detail_handler(
    data: web::Data<GlobalState>,
    path: web::Path<String>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let course_id = parse_uuid(&path.into_inner(), "course id")?;
    let viewer = req.extensions().get::<Viewer>().copied();

    let pool = &data.pool;

    let found = course::get_course_with_instructor(pool, course_id)
        .await?
        .ok_or(ApiError::NotFound("course"))?;

    let (categories, sections, lectures, reviews, total_enrollments) = try_join!(
        category::get_course_categories(pool, course_id),
        course::get_course_sections(pool, course_id),
        course::get_course_lectures(pool, course_id),
        review::get_course_reviews(pool, course_id),
        enrollment::count_course_enrollments(pool, course_id),
    )?;

    let is_instructor = viewer.is_some_and(|v| v.id == found.instructor_id);

    // second dedicated lookup, never derived from the relations above
    let is_enrolled = match viewer {
        Some(v) => enrollment::is_user_enrolled(pool, v.id, course_id).await?,
        None => false,
    };

    let detail = assemble_course_detail(
        found,
        categories,
        sections,
        lectures,
        reviews,
        total_enrollments,
        is_instructor,
        is_enrolled,
    );

    Ok(HttpResponse::Ok().json(detail))
}

fn course_to_dto(course: Course) -> CourseDto {
    CourseDto {
        id: course.id.to_string(),
        title: course.title,
        slug: course.slug,
        short_description: course.short_description,
        description: course.description,
        price: course.price,
        discount_price: course.discount_price,
        level: course.level,
        status: course.status,
        thumbnail_url: course.thumbnail_url,
        instructor_id: course.instructor_id.to_string(),
        created_at: course.created_at,
    }
}

/// Shape the fetched relations into the viewer-specific detail view.
///
/// Pure over its inputs. Derived fields are computed from the row data
/// alone, and reviews are re-sorted newest-first here regardless of how
/// they were fetched.
#[allow(clippy::too_many_arguments)]
fn assemble_course_detail(
    course: CourseWithInstructor,
    categories: Vec<Category>,
    sections: Vec<SectionRow>,
    lectures: Vec<LectureRow>,
    mut reviews: Vec<ReviewRow>,
    total_enrollments: i64,
    is_instructor: bool,
    is_enrolled: bool,
) -> CourseDetail {
    reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let ratings = reviews.iter().map(|r| r.rating).collect::<Vec<_>>();
    let average = average_rating(&ratings);
    let duration = total_duration(lectures.iter().map(|l| l.duration));
    let total_lectures = lectures.len() as i64;
    let total_reviews = reviews.len() as i64;

    let mut lectures_by_section: HashMap<Uuid, Vec<LectureDto>> = HashMap::new();
    for lecture in lectures {
        let video_storage_info = if can_view_video(is_instructor, is_enrolled, lecture.is_preview)
        {
            lecture.video_storage_info
        } else {
            None
        };
        lectures_by_section
            .entry(lecture.section_id)
            .or_default()
            .push(LectureDto {
                id: lecture.id.to_string(),
                title: lecture.title,
                is_preview: lecture.is_preview,
                duration: lecture.duration,
                order: lecture.position,
                video_storage_info,
            });
    }

    let sections = sections
        .into_iter()
        .map(|section| SectionDto {
            id: section.id.to_string(),
            title: section.title,
            order: section.position,
            lectures: lectures_by_section
                .remove(&section.id)
                .unwrap_or_default(),
        })
        .collect::<Vec<_>>();

    let reviews = reviews
        .into_iter()
        .map(|r| ReviewDto {
            id: r.id.to_string(),
            user: ReviewerDto {
                id: r.user_id.to_string(),
                name: r.user_name,
                image: r.user_image,
            },
            rating: r.rating,
            content: r.content,
            instructor_reply: r.instructor_reply,
            created_at: r.created_at,
        })
        .collect::<Vec<_>>();

    CourseDetail {
        id: course.id.to_string(),
        title: course.title,
        slug: course.slug,
        short_description: course.short_description,
        description: course.description,
        price: course.price,
        discount_price: course.discount_price,
        level: course.level,
        status: course.status,
        thumbnail_url: course.thumbnail_url,
        created_at: course.created_at,
        instructor: InstructorProfile {
            id: course.instructor_id.to_string(),
            name: course.instructor_name,
            email: course.instructor_email,
            image: course.instructor_image,
            bio: course.instructor_bio,
        },
        categories: categories
            .into_iter()
            .map(|c| CategoryDto {
                id: c.id.to_string(),
                name: c.name,
                slug: c.slug,
            })
            .collect(),
        sections,
        reviews,
        is_enrolled,
        total_enrollments,
        average_rating: average,
        total_reviews,
        total_lectures,
        total_duration: duration,
    }
}
