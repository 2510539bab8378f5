use actix_web::middleware::from_fn;
use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use errors::AppError;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use tokio::sync::RwLock;
use tracing_subscriber::EnvFilter;

use schema::category::CategoryDto;

mod errors;
mod handlers;
mod middlewares;
mod models;
mod schema;
#[cfg(test)]
mod test_init_app;
mod utils;

/// Read-through cache for the category taxonomy. Populated on first use,
/// shared across requests.
#[derive(Default)]
pub struct CategoryCache {
    inner: RwLock<Option<Vec<CategoryDto>>>,
}

impl CategoryCache {
    pub async fn get(&self) -> Option<Vec<CategoryDto>> {
        self.inner.read().await.clone()
    }

    pub async fn set(&self, categories: Vec<CategoryDto>) {
        *self.inner.write().await = Some(categories);
    }
}

pub struct GlobalState {
    pool: Pool<Postgres>,
    category_cache: CategoryCache,
}

#[actix_web::main]
async fn main() -> Result<(), AppError> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "course_market=debug,actix_web=info".into()),
        )
        .init();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE URL must be set");
    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .map_err(|_e| AppError::DbConnect)?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|_e| AppError::Migrate)?;

    let global_state = GlobalState {
        pool,
        category_cache: CategoryCache::default(),
    };

    let app_data = web::Data::new(global_state);

    tracing::info!(%host, port, "the server is running");

    HttpServer::new(move || {
        App::new().service(
            web::scope("/api/v1")
                .app_data(app_data.clone())
                .service(handlers::health)
                .service(
                    web::scope("/categories")
                        .service(handlers::category::get_categories_handler),
                )
                .service(
                    web::scope("/favorites")
                        .wrap(from_fn(middlewares::viewer::optional_viewer_middleware))
                        .service(handlers::favorite::get_my_favorites_handler),
                )
                .service(
                    web::scope("/courses")
                        .wrap(from_fn(middlewares::viewer::optional_viewer_middleware))
                        // place the static routes before /{course_id}
                        .service(handlers::course::search_courses_handler)
                        .service(handlers::course::list_courses_handler)
                        .service(handlers::enrollment::enroll_course_handler)
                        .service(handlers::favorite::add_favorite_handler)
                        .service(handlers::favorite::remove_favorite_handler)
                        .service(handlers::favorite::get_favorite_status_handler)
                        .service(handlers::course::get_course_detail_handler),
                ),
        )
    })
    .bind((host.as_str(), port))
    .map_err(|_e| AppError::SocketBind)?
    .run()
    .await
    .map_err(|_e| AppError::ServerStart)?;

    Ok(())
}
