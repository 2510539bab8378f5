use actix_web::{delete, get, post, web, HttpMessage, HttpRequest, HttpResponse};

use crate::errors::ApiError;
use crate::models::{course, favorite};
use crate::schema::favorite::{FavoriteDto, FavoriteStatus};
use crate::schema::Viewer;
use crate::utils::parse_uuid;
use crate::GlobalState;

#[post("/{course_id}/favorite")]
pub async fn add_favorite_handler(
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

    course::get_course_by_id(pool, course_id)
        .await?
        .ok_or(ApiError::NotFound("course"))?;

    favorite::add_favorite(pool, viewer.id, course_id).await?;
    let favorite_count = favorite::count_course_favorites(pool, course_id).await?;

    Ok(HttpResponse::Ok().json(FavoriteStatus {
        is_favorite: true,
        favorite_count,
    }))
}

#[delete("/{course_id}/favorite")]
pub async fn remove_favorite_handler(
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

    course::get_course_by_id(pool, course_id)
        .await?
        .ok_or(ApiError::NotFound("course"))?;

    favorite::remove_favorite(pool, viewer.id, course_id).await?;
    let favorite_count = favorite::count_course_favorites(pool, course_id).await?;

    Ok(HttpResponse::Ok().json(FavoriteStatus {
        is_favorite: false,
        favorite_count,
    }))
}

#[get("/{course_id}/favorite")]
pub async fn get_favorite_status_handler(
    data: web::Data<GlobalState>,
    path: web::Path<String>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let viewer = req.extensions().get::<Viewer>().copied();

    let course_id = parse_uuid(&path.into_inner(), "course id")?;
    let pool = &data.pool;

    course::get_course_by_id(pool, course_id)
        .await?
        .ok_or(ApiError::NotFound("course"))?;

    let favorite_count = favorite::count_course_favorites(pool, course_id).await?;
    let is_favorite = match viewer {
        Some(v) => favorite::is_course_favorited(pool, v.id, course_id).await?,
        None => false,
    };

    Ok(HttpResponse::Ok().json(FavoriteStatus {
        is_favorite,
        favorite_count,
    }))
}

#[get("")]
pub async fn get_my_favorites_handler(
    data: web::Data<GlobalState>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let viewer = req
        .extensions()
        .get::<Viewer>()
        .copied()
        .ok_or(ApiError::Unauthorized("login required"))?;

    let favorites = favorite::get_user_favorites(&data.pool, viewer.id).await?;
    let parsed_favorites = favorites
        .into_iter()
        .map(|favorite| FavoriteDto {
            id: favorite.id.to_string(),
            course_id: favorite.course_id.to_string(),
        })
        .collect::<Vec<_>>();

    Ok(HttpResponse::Ok().json(parsed_favorites))
}
