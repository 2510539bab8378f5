pub mod category;
pub mod course;
pub mod enrollment;
pub mod favorite;

use actix_web::{get, Responder};

#[get("/health")]
pub async fn health() -> impl Responder {
    "ok"
}
