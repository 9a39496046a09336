use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use super::service::Claims;
use crate::account::models::Role;
use crate::error::ApiError;
use crate::gateway::state::AppState;

/// Validates the bearer token and injects [`Claims`] into the request.
pub async fn jwt_auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("missing Authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("invalid token format".to_string()))?;

    let claims = state.auth.verify_token(token)?;
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Handler-side role gate. Ownership checks stay in the services.
pub fn require_role(claims: &Claims, role: Role) -> Result<(), ApiError> {
    if claims.role == role {
        Ok(())
    } else {
        Err(ApiError::Forbidden(format!(
            "requires {} role",
            role.as_str()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims_with_role(role: Role) -> Claims {
        Claims {
            sub: "7".to_string(),
            role,
            exp: 0,
            iat: 0,
        }
    }

    #[test]
    fn test_require_role_matches() {
        assert!(require_role(&claims_with_role(Role::Admin), Role::Admin).is_ok());
    }

    #[test]
    fn test_require_role_rejects_other_roles() {
        let err = require_role(&claims_with_role(Role::User), Role::Admin).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
        // Admin does not implicitly pass instructor-only gates.
        assert!(require_role(&claims_with_role(Role::Admin), Role::Instructor).is_err());
    }

    #[test]
    fn test_claims_user_id_parse() {
        assert_eq!(claims_with_role(Role::User).user_id().unwrap(), 7);
        let bad = Claims {
            sub: "abc".to_string(),
            role: Role::User,
            exp: 0,
            iat: 0,
        };
        assert!(bad.user_id().is_err());
    }
}
