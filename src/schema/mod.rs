use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;

pub mod category;
pub mod course;
pub mod favorite;

#[derive(Deserialize, Serialize, Debug)]
pub struct JWTClaims {
    pub sub: String,
    pub exp: usize,
}

/// The authenticated actor of a request, decoded from the bearer token.
/// Absent from the request extensions for anonymous callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewer {
    pub id: Uuid,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct EnrollmentResponse {
    pub id: String,
    pub message: String,
}
