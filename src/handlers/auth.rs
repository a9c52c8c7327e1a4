//! Authentication handlers
//!
//! Login (throttled per client address) and current-user lookup.

use axum::{
    extract::{ConnectInfo, State},
    response::Json,
    Extension,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use crate::auth::{jwt, CurrentUser, DbConn, Decision};
use crate::error::{AppError, AppResult};
use crate::entity::user::{self, UserSummary};
use crate::routes::ApiResponse;
use crate::state::AppState;

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response data
#[derive(Debug, Serialize)]
pub struct LoginData {
    pub token: String,
    pub user: UserSummary,
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Extension(db): Extension<DbConn>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginData>>> {
    // Throttle before touching the database
    let key = addr.ip().to_string();
    if let Decision::Deny { retry_after_secs } = state.login_limiter.check(&key) {
        tracing::warn!("Login throttled for {}", key);
        return Err(AppError::RateLimited { retry_after_secs });
    }

    if req.email.is_empty() || req.password.is_empty() {
        return Err(AppError::BadRequest(
            "email and password are required".to_string(),
        ));
    }

    let db_user = user::Entity::find()
        .filter(user::Column::Email.eq(&req.email))
        .one(&*db)
        .await?;

    let Some(db_user) = db_user else {
        tracing::warn!("Login failed: user not found - {}", req.email);
        return Err(AppError::BadRequest("invalid email or password".to_string()));
    };

    let password_valid = bcrypt::verify(&req.password, &db_user.password).unwrap_or(false);
    if !password_valid {
        tracing::warn!("Login failed: wrong password - {}", req.email);
        return Err(AppError::BadRequest("invalid email or password".to_string()));
    }

    if !db_user.is_active {
        tracing::warn!("Login failed: user disabled - {}", req.email);
        return Err(AppError::Forbidden);
    }

    let token = jwt::issue_token(
        db_user.id,
        &state.config.auth.jwt_secret,
        state.config.auth.token_ttl_secs,
    )?;

    // Update last login; a failure here is logged but doesn't fail the login
    let summary = UserSummary::from(db_user.clone());
    let mut active_model: user::ActiveModel = db_user.into();
    active_model.last_login = Set(Some(Utc::now()));
    if let Err(e) = active_model.update(&*db).await {
        tracing::error!("Failed to update last login: {}", e);
    }

    tracing::info!("User logged in: {}", req.email);

    Ok(Json(ApiResponse::success_with_message(
        "login success",
        LoginData {
            token,
            user: summary,
        },
    )))
}

/// GET /api/auth/me
pub async fn current_user(
    Extension(user): Extension<CurrentUser>,
) -> Json<ApiResponse<serde_json::Value>> {
    Json(ApiResponse::success(serde_json::json!({
        "id": user.id,
        "email": user.email,
        "fullName": user.full_name,
        "role": user.role.as_str(),
        "departmentId": user.department_id,
    })))
}
