use axum::{middleware::Next, response::Response};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::common::Role;
use crate::domains::auth::JwtService;
use crate::server::error::ApiError;

/// Authenticated user information from JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
}

/// Optional authentication, present on every request
///
/// Public routes read it as-is; protected routes call [`MaybeUser::require`]
/// or [`MaybeUser::require_role`].
#[derive(Clone, Debug, Default)]
pub struct MaybeUser(pub Option<AuthUser>);

impl MaybeUser {
    pub fn require(&self) -> Result<&AuthUser, ApiError> {
        self.0
            .as_ref()
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))
    }

    pub fn require_role(&self, allowed: &[Role]) -> Result<&AuthUser, ApiError> {
        let user = self.require()?;
        if allowed.contains(&user.role) {
            Ok(user)
        } else {
            Err(ApiError::Forbidden(
                "Insufficient permissions".to_string(),
            ))
        }
    }
}

/// JWT authentication middleware
///
/// Extracts the token from the Authorization header, verifies it, and adds
/// MaybeUser to request extensions. Invalid or absent tokens leave the
/// request anonymous; route handlers decide whether that is acceptable.
pub async fn jwt_auth_middleware(
    jwt_service: Arc<JwtService>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let auth_user = extract_auth_user(&request, &jwt_service);

    match &auth_user {
        Some(user) => debug!(user_id = %user.user_id, role = %user.role, "Authenticated request"),
        None => debug!("Anonymous request"),
    }

    request.extensions_mut().insert(MaybeUser(auth_user));
    next.run(request).await
}

/// Extract and verify JWT token from request
fn extract_auth_user(
    request: &axum::http::Request<axum::body::Body>,
    jwt_service: &JwtService,
) -> Option<AuthUser> {
    let auth_header = request.headers().get("authorization")?;
    let auth_str = auth_header.to_str().ok()?;

    // Handle both "Bearer <token>" and raw token
    let token = auth_str.strip_prefix("Bearer ").unwrap_or(auth_str);

    let claims = jwt_service.verify_token(token).ok()?;

    Some(AuthUser {
        user_id: claims.user_id,
        email: claims.email,
        role: claims.role,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::new("test_secret", "test_issuer".to_string())
    }

    #[test]
    fn test_extract_token_with_bearer() {
        let jwt_service = service();
        let user_id = Uuid::new_v4();
        let token = jwt_service
            .create_token(user_id, "a@example.org".to_string(), Role::Citizen)
            .unwrap();

        let request = axum::http::Request::builder()
            .header("authorization", format!("Bearer {}", token))
            .body(axum::body::Body::empty())
            .unwrap();

        let auth_user = extract_auth_user(&request, &jwt_service).unwrap();
        assert_eq!(auth_user.user_id, user_id);
        assert_eq!(auth_user.role, Role::Citizen);
    }

    #[test]
    fn test_extract_token_without_bearer() {
        let jwt_service = service();
        let token = jwt_service
            .create_token(Uuid::new_v4(), "a@example.org".to_string(), Role::Ngo)
            .unwrap();

        let request = axum::http::Request::builder()
            .header("authorization", token)
            .body(axum::body::Body::empty())
            .unwrap();

        assert!(extract_auth_user(&request, &jwt_service).is_some());
    }

    #[test]
    fn test_no_auth_header() {
        let request = axum::http::Request::builder()
            .body(axum::body::Body::empty())
            .unwrap();

        assert!(extract_auth_user(&request, &service()).is_none());
    }

    #[test]
    fn test_invalid_token() {
        let request = axum::http::Request::builder()
            .header("authorization", "Bearer invalid_token")
            .body(axum::body::Body::empty())
            .unwrap();

        assert!(extract_auth_user(&request, &service()).is_none());
    }

    #[test]
    fn test_require_role_rejects_wrong_role() {
        let user = AuthUser {
            user_id: Uuid::new_v4(),
            email: "a@example.org".to_string(),
            role: Role::Citizen,
        };
        let maybe = MaybeUser(Some(user));

        assert!(maybe.require().is_ok());
        assert!(maybe.require_role(&[Role::Citizen]).is_ok());
        assert!(maybe.require_role(&[Role::Admin]).is_err());
        assert!(maybe.require_role(&[Role::Ngo, Role::Admin]).is_err());
    }

    #[test]
    fn test_require_rejects_anonymous() {
        let maybe = MaybeUser(None);
        assert!(maybe.require().is_err());
        assert!(maybe.require_role(&[Role::Citizen]).is_err());
    }
}
