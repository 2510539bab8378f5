use actix_http::Request;
use actix_service::Service;
use actix_web::dev::ServiceResponse;
use actix_web::middleware::from_fn;
use actix_web::web::scope;
use actix_web::{test, web, App, Error};
use dotenv::dotenv;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

use crate::{handlers, middlewares, CategoryCache, GlobalState};

/// Builds the full route tree against the database from the environment.
/// Tests that call this need a reachable Postgres and are marked ignored.
pub async fn init() -> (
    impl Service<Request, Response = ServiceResponse, Error = Error>,
    Pool<Postgres>,
) {
    dotenv().ok();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE URL must be set");
    std::env::var("JWT_SECRET").expect("JWT_SECRET must be set");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Cant connect to the database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Cant apply the migrations");

    let global_state = GlobalState {
        pool: pool.clone(),
        category_cache: CategoryCache::default(),
    };

    let app_data = web::Data::new(global_state);

    let app = test::init_service(
        App::new().service(
            scope("/api/v1")
                .app_data(app_data.clone())
                .service(handlers::health)
                .service(
                    scope("/categories")
                        .service(handlers::category::get_categories_handler),
                )
                .service(
                    scope("/favorites")
                        .wrap(from_fn(middlewares::viewer::optional_viewer_middleware))
                        .service(handlers::favorite::get_my_favorites_handler),
                )
                .service(
                    scope("/courses")
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
        ),
    )
    .await;

    (app, pool)
}
