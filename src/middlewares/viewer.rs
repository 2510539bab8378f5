use std::str::FromStr;

use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    Error, HttpMessage,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use sqlx::types::Uuid;

use crate::schema::{JWTClaims, Viewer};

/// Decodes the bearer token when one is present and stashes the viewer in
/// the request extensions. Anonymous requests pass through untouched;
/// handlers that need a viewer reject those themselves.
pub async fn optional_viewer_middleware(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    if let Some(viewer) = extract_viewer(&req) {
        req.extensions_mut().insert(viewer);
    }
    next.call(req).await
}

fn extract_viewer(req: &ServiceRequest) -> Option<Viewer> {
    let authorization = req.headers().get("Authorization")?;
    let header = authorization.to_str().ok()?;
    let token = header.strip_prefix("Bearer ").unwrap_or(header);

    let key = std::env::var("JWT_SECRET").ok()?;

    let decoded = decode::<JWTClaims>(
        token,
        &DecodingKey::from_secret(key.as_bytes()),
        &Validation::default(),
    )
    .ok()?;

    let id = Uuid::from_str(&decoded.claims.sub).ok()?;
    Some(Viewer { id })
}
