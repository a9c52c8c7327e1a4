//! Authentication middleware
//!
//! Validates the Bearer JWT on every `/api` route (except the public ones),
//! resolves the user and attaches `CurrentUser` to the request.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, EntityTrait};
use serde_json::json;
use std::ops::Deref;

use crate::auth::jwt;
use crate::auth::role::{Capability, Role};
use crate::entity::user;
use crate::state::AppState;

/// Database connection wrapper for use in handlers via Extension
#[derive(Clone)]
pub struct DbConn(pub DatabaseConnection);

impl Deref for DbConn {
    type Target = DatabaseConnection;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Extension storing the authenticated user for the request
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub department_id: Option<i64>,
}

impl CurrentUser {
    pub fn can(&self, capability: Capability) -> bool {
        self.role.can(capability)
    }

    /// Department-scoped roles may only act on their own department
    pub fn can_access_department(&self, department_id: i64) -> bool {
        if self.role.is_department_scoped() {
            self.department_id == Some(department_id)
        } else {
            true
        }
    }
}

/// Paths that don't require authentication
fn is_public_path(path: &str) -> bool {
    path == "/api/health" || path == "/api/auth/login"
}

fn unauthorized(error: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "success": false, "message": error }))).into_response()
}

/// Pull the token out of `Authorization: Bearer <token>`
fn bearer_token(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Authentication middleware
pub async fn auth_layer(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    // All handlers access the database via Extension<DbConn>
    request.extensions_mut().insert(DbConn(state.db.clone()));

    if is_public_path(&path) {
        return next.run(request).await;
    }

    let Some(token) = bearer_token(&request) else {
        return unauthorized("missing bearer token");
    };

    let claims = match jwt::verify_token(token, &state.config.auth.jwt_secret) {
        Ok(claims) => claims,
        Err(_) => return unauthorized("invalid or expired token"),
    };

    let user_result = user::Entity::find_by_id(claims.sub).one(&state.db).await;

    match user_result {
        Ok(Some(user_model)) => {
            if !user_model.is_active {
                tracing::warn!("Rejected token for inactive user: {}", user_model.email);
                return unauthorized("account disabled");
            }

            // Tokens issued before the last password change are invalid
            if password_changed_after(user_model.password_changed_at, claims.iat) {
                tracing::warn!(
                    "Rejected stale token for user: {} (password changed)",
                    user_model.email
                );
                return unauthorized("token no longer valid");
            }

            let Some(role) = Role::parse(&user_model.role) else {
                tracing::error!(
                    "User {} has unknown role string: {}",
                    user_model.id,
                    user_model.role
                );
                return unauthorized("invalid account role");
            };

            let current_user = CurrentUser {
                id: user_model.id,
                email: user_model.email,
                full_name: user_model.full_name,
                role,
                department_id: user_model.department_id,
            };

            request.extensions_mut().insert(current_user);
            next.run(request).await
        }
        Ok(None) => {
            tracing::warn!("Token subject not found: {}", claims.sub);
            unauthorized("unknown user")
        }
        Err(e) => {
            tracing::error!("Database error during auth: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "message": "internal error" })),
            )
                .into_response()
        }
    }
}

fn password_changed_after(changed_at: Option<DateTime<Utc>>, token_iat: i64) -> bool {
    match changed_at {
        Some(changed) => changed.timestamp() > token_iat,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_user(role: Role, department_id: Option<i64>) -> CurrentUser {
        CurrentUser {
            id: 1,
            email: "hod@college.edu".to_string(),
            full_name: "Test HOD".to_string(),
            role,
            department_id,
        }
    }

    #[test]
    fn test_public_paths() {
        assert!(is_public_path("/api/health"));
        assert!(is_public_path("/api/auth/login"));
        assert!(!is_public_path("/api/departments"));
    }

    #[test]
    fn test_department_scoping() {
        let hod = sample_user(Role::DepartmentHod, Some(7));
        assert!(hod.can_access_department(7));
        assert!(!hod.can_access_department(8));

        let admin = sample_user(Role::Admin, None);
        assert!(admin.can_access_department(7));
        assert!(admin.can_access_department(8));
    }

    #[test]
    fn test_password_change_invalidation() {
        let changed = Utc.with_ymd_and_hms(2026, 1, 10, 12, 0, 0).unwrap();
        let before = changed.timestamp() - 100;
        let after = changed.timestamp() + 100;
        assert!(password_changed_after(Some(changed), before));
        assert!(!password_changed_after(Some(changed), after));
        assert!(!password_changed_after(None, before));
    }
}
