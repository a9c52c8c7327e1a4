use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    middleware,
    response::Json,
    routing::{get, patch, post},
    Router,
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::auth_layer;
use crate::handlers;
use crate::state::AppState;

pub mod health;

/// API response wrapper: `{success, message, data?}`
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: "success".to_string(),
            data: Some(data),
        }
    }

    pub fn success_with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn success_msg(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }
}

/// Create the main router
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API routes
    let api_routes = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Auth routes
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/me", get(handlers::auth::current_user))
        // Administrator routes
        .route(
            "/administrators",
            get(handlers::administrator::list_administrators)
                .post(handlers::administrator::create_administrator),
        )
        .route(
            "/administrators/:id",
            get(handlers::administrator::get_administrator)
                .patch(handlers::administrator::update_administrator)
                .delete(handlers::administrator::delete_administrator),
        )
        .route(
            "/administrators/:id/status",
            patch(handlers::administrator::toggle_administrator_status),
        )
        .route(
            "/administrators/:id/image",
            post(handlers::administrator::upload_administrator_image)
                .layer(DefaultBodyLimit::max(state.config.max_image_size + 64 * 1024)),
        )
        // Department routes
        .route(
            "/departments",
            get(handlers::department::list_departments)
                .post(handlers::department::create_department),
        )
        .route(
            "/departments/:id",
            get(handlers::department::get_department)
                .patch(handlers::department::update_department)
                .delete(handlers::department::delete_department),
        )
        .route(
            "/departments/:id/status",
            patch(handlers::department::toggle_department_status),
        )
        // Course category routes
        .route(
            "/course-categories",
            get(handlers::course_category::list_course_categories)
                .post(handlers::course_category::create_course_category),
        )
        .route(
            "/course-categories/:id",
            get(handlers::course_category::get_course_category)
                .patch(handlers::course_category::update_course_category)
                .delete(handlers::course_category::delete_course_category),
        )
        .route(
            "/course-categories/:id/status",
            patch(handlers::course_category::toggle_course_category_status),
        )
        // Staff profile routes
        .route(
            "/department-hod-profiles/:user_id",
            get(handlers::profile::get_hod_profile).put(handlers::profile::put_hod_profile),
        )
        .route(
            "/placement-staff-profiles/:user_id",
            get(handlers::profile::get_placement_staff_profile)
                .put(handlers::profile::put_placement_staff_profile),
        )
        // Bulk roster import
        .route("/roster/import", post(handlers::roster::import_roster));

    Router::new()
        .nest("/api", api_routes)
        .fallback(fallback)
        .layer(middleware::from_fn_with_state(state.clone(), auth_layer))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Fallback handler for 404
pub async fn fallback() -> (StatusCode, Json<ApiResponse<()>>) {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse {
            success: false,
            message: "Not Found".to_string(),
            data: None,
        }),
    )
}
