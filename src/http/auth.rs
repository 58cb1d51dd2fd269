use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::http::header::HeaderMap;
use actix_web::{FromRequest, HttpRequest};
use uuid::Uuid;

use super::error::ApiError;

// ============================================================================
// Caller Identity - Typed Extractors over the Auth Gateway Headers
// ============================================================================
//
// Authentication itself lives upstream: the gateway verifies the caller and
// injects identity headers. These extractors turn the headers into an
// explicit value handed to service calls, so identity is never ambient
// request state.
//
// Header contract:
//   x-auth-user-id   UUID of the caller (required)
//   x-auth-username  display name (required)
//   x-auth-email     optional
//   x-auth-roles     comma-separated roles; "admin" gates admin routes
//
// ============================================================================

pub const USER_ID_HEADER: &str = "x-auth-user-id";
pub const USERNAME_HEADER: &str = "x-auth-username";
pub const EMAIL_HEADER: &str = "x-auth-email";
pub const ROLES_HEADER: &str = "x-auth-roles";

#[derive(Debug, Clone)]
pub struct CallerIdentity {
    pub id: Uuid,
    pub username: String,
    pub email: Option<String>,
    pub is_admin: bool,
}

impl FromRequest for CallerIdentity {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(identity_from_headers(req.headers()))
    }
}

/// An authenticated caller that also holds the admin role.
#[derive(Debug, Clone)]
pub struct AdminIdentity(pub CallerIdentity);

impl FromRequest for AdminIdentity {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = identity_from_headers(req.headers()).and_then(|identity| {
            if identity.is_admin {
                Ok(AdminIdentity(identity))
            } else {
                Err(ApiError::Forbidden("Not authorized as an admin"))
            }
        });

        ready(result)
    }
}

fn identity_from_headers(headers: &HeaderMap) -> Result<CallerIdentity, ApiError> {
    let header = |name: &str| headers.get(name).and_then(|value| value.to_str().ok());

    identity_from_parts(
        header(USER_ID_HEADER),
        header(USERNAME_HEADER),
        header(EMAIL_HEADER),
        header(ROLES_HEADER),
    )
}

fn identity_from_parts(
    id: Option<&str>,
    username: Option<&str>,
    email: Option<&str>,
    roles: Option<&str>,
) -> Result<CallerIdentity, ApiError> {
    let id = id.ok_or(ApiError::Unauthorized("Not authenticated"))?;
    let id = Uuid::parse_str(id).map_err(|_| ApiError::Unauthorized("Invalid caller identity"))?;

    let username = username
        .ok_or(ApiError::Unauthorized("Not authenticated"))?
        .to_string();

    Ok(CallerIdentity {
        id,
        username,
        email: email.map(str::to_string),
        is_admin: roles.is_some_and(has_admin_role),
    })
}

fn has_admin_role(roles: &str) -> bool {
    roles
        .split(',')
        .any(|role| role.trim().eq_ignore_ascii_case("admin"))
}

// ============================================================================
// Unit Tests
// ============================================================================
