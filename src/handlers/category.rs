use actix_web::{get, web, HttpResponse};

use crate::errors::ApiError;
use crate::models::category;
use crate::schema::category::CategoryDto;
use crate::GlobalState;

/// The category taxonomy changes rarely, so the first fetch populates an
/// in-process cache and later requests are served from it.
#[get("")]
pub async fn get_categories_handler(
    data: web::Data<GlobalState>,
) -> Result<HttpResponse, ApiError> {
    if let Some(cached) = data.category_cache.get().await {
        tracing::debug!(count = cached.len(), "categories served from cache");
        return Ok(HttpResponse::Ok().json(cached));
    }

    let categories = category::get_all_categories(&data.pool).await?;
    let parsed_categories = categories
        .into_iter()
        .map(|category| CategoryDto {
            id: category.id.to_string(),
            name: category.name,
            slug: category.slug,
        })
        .collect::<Vec<_>>();

    data.category_cache.set(parsed_categories.clone()).await;

    Ok(HttpResponse::Ok().json(parsed_categories))
}
