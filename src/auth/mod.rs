//! Shared access-code authentication.
//!
//! The registry uses two static shared codes rather than user accounts: one
//! handed to guests with the invitation, one kept by the administrator.
//! Comparison is constant-time to mitigate timing attacks.

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use subtle::ConstantTimeEq;

use crate::errors::{codes, ErrorDetails, ErrorResponse};

/// Header name for the access code.
pub const ACCESS_CODE_HEADER: &str = "x-access-code";

/// Auth layer for guest-tier routes. Accepts either the guest or the admin
/// code.
pub async fn guest_auth_layer(
    guest_code: Option<String>,
    admin_code: Option<String>,
    request: Request,
    next: Next,
) -> Response {
    // If no codes are configured, allow all requests (dev mode)
    if guest_code.is_none() && admin_code.is_none() {
        return next.run(request).await;
    }

    match provided_code(&request) {
        Some(code)
            if matches_code(&code, guest_code.as_deref())
                || matches_code(&code, admin_code.as_deref()) =>
        {
            next.run(request).await
        }
        Some(_) => unauthorized_response("Invalid access code"),
        None => unauthorized_response("Missing access code"),
    }
}

/// Auth layer for admin-tier routes. Accepts only the admin code.
pub async fn admin_auth_layer(
    admin_code: Option<String>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = admin_code else {
        return next.run(request).await;
    };

    match provided_code(&request) {
        Some(code) if constant_time_compare(&code, &expected) => next.run(request).await,
        Some(_) => unauthorized_response("Invalid admin code"),
        None => unauthorized_response("Missing access code"),
    }
}

/// Extract the access code from the `x-access-code` header, falling back to
/// a bearer token in the Authorization header.
fn provided_code(request: &Request) -> Option<String> {
    request
        .headers()
        .get(ACCESS_CODE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .or_else(|| {
            request
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.strip_prefix("Bearer "))
                .map(|s| s.to_string())
        })
}

fn matches_code(provided: &str, expected: Option<&str>) -> bool {
    expected.is_some_and(|e| constant_time_compare(provided, e))
}

/// Perform constant-time string comparison.
fn constant_time_compare(a: &str, b: &str) -> bool {
    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    a_bytes.ct_eq(b_bytes).into()
}

/// Create an unauthorized response.
fn unauthorized_response(message: &str) -> Response {
    let body = ErrorResponse {
        success: false,
        error: ErrorDetails {
            code: codes::UNAUTHORIZED.to_string(),
            message: message.to_string(),
            details: None,
        },
        revision_id: 0,
    };

    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_compare_equal() {
        assert!(constant_time_compare("cafecito", "cafecito"));
    }

    #[test]
    fn test_constant_time_compare_not_equal() {
        assert!(!constant_time_compare("cafecito", "cafecit0"));
    }

    #[test]
    fn test_constant_time_compare_different_lengths() {
        assert!(!constant_time_compare("short", "much-longer-code"));
    }

    #[test]
    fn test_constant_time_compare_empty() {
        assert!(constant_time_compare("", ""));
        assert!(!constant_time_compare("", "not-empty"));
    }

    #[test]
    fn test_matches_code_unset() {
        assert!(!matches_code("anything", None));
    }
}
