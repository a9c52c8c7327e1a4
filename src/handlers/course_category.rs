//! Course category handlers
//!
//! Implements course category CRUD operations

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::Json,
    Extension,
};
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use serde::Deserialize;

use super::{clamp_limit, sort_order, Page};
use crate::auth::{Capability, CurrentUser, DbConn};
use crate::entity::course_category;
use crate::error::{AppError, AppResult, OptionExt};
use crate::routes::ApiResponse;

/// List query parameters
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    #[serde(rename = "isActive")]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub skip: u64,
    pub limit: Option<u64>,
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    #[serde(rename = "sortDir")]
    pub sort_dir: Option<String>,
}

/// Create request
#[derive(Debug, Deserialize)]
pub struct CreateCourseCategoryRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Partial update: only supplied keys overwrite
#[derive(Debug, Default, Deserialize)]
pub struct CourseCategoryPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "isActive")]
    pub is_active: Option<bool>,
}

impl CourseCategoryPatch {
    /// Merge into an active model; absent fields stay untouched
    fn apply(self, model: course_category::Model) -> course_category::ActiveModel {
        let mut active: course_category::ActiveModel = model.into();
        if let Some(name) = self.name {
            active.name = Set(name);
        }
        if let Some(description) = self.description {
            active.description = Set(description);
        }
        if let Some(is_active) = self.is_active {
            active.is_active = Set(is_active);
        }
        active
    }
}

fn require_manage(user: &CurrentUser) -> AppResult<()> {
    if user.can(Capability::ManageCourseCategories) {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Case-insensitive name lookup, optionally excluding one id (for updates)
async fn find_by_name_ci(
    db: &sea_orm::DatabaseConnection,
    name: &str,
    exclude_id: Option<i64>,
) -> Result<Option<course_category::Model>, sea_orm::DbErr> {
    let mut query = course_category::Entity::find().filter(
        Expr::expr(Func::lower(Expr::col(course_category::Column::Name)))
            .eq(name.to_lowercase()),
    );
    if let Some(id) = exclude_id {
        query = query.filter(course_category::Column::Id.ne(id));
    }
    query.one(db).await
}

/// GET /api/course-categories
pub async fn list_course_categories(
    Extension(db): Extension<DbConn>,
    Extension(_user): Extension<CurrentUser>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Page<course_category::Model>>>> {
    let mut select = course_category::Entity::find();

    if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search.to_lowercase());
        select = select.filter(
            Condition::any()
                .add(
                    Expr::expr(Func::lower(Expr::col(course_category::Column::Name)))
                        .like(pattern.clone()),
                )
                .add(
                    Expr::expr(Func::lower(Expr::col(course_category::Column::Description)))
                        .like(pattern),
                ),
        );
    }

    if let Some(is_active) = query.is_active {
        select = select.filter(course_category::Column::IsActive.eq(is_active));
    }

    let total = select.clone().count(&*db).await?;

    let order = sort_order(query.sort_dir.as_deref());
    let sort_column = match query.sort_by.as_deref() {
        Some("name") => course_category::Column::Name,
        Some("updatedAt") => course_category::Column::UpdatedAt,
        _ => course_category::Column::CreatedAt,
    };

    let limit = clamp_limit(query.limit);
    let items = select
        .order_by(sort_column, order)
        .offset(query.skip)
        .limit(limit)
        .all(&*db)
        .await?;

    Ok(Json(ApiResponse::success(Page {
        items,
        total,
        skip: query.skip,
        limit,
    })))
}

/// GET /api/course-categories/:id
pub async fn get_course_category(
    Extension(db): Extension<DbConn>,
    Extension(_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<course_category::Model>>> {
    let category = course_category::Entity::find_by_id(id)
        .one(&*db)
        .await?
        .ok_or_not_found("Course category not found")?;

    Ok(Json(ApiResponse::success(category)))
}

/// POST /api/course-categories
pub async fn create_course_category(
    Extension(db): Extension<DbConn>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<CreateCourseCategoryRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<course_category::Model>>)> {
    require_manage(&user)?;

    let name = req.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::Validation(vec!["name is required".to_string()]));
    }

    if find_by_name_ci(&db, &name, None).await?.is_some() {
        return Err(AppError::Duplicate {
            field: "name".to_string(),
        });
    }

    let now = Utc::now();
    let new_category = course_category::ActiveModel {
        name: Set(name),
        description: Set(req.description),
        is_active: Set(true),
        created_by: Set(Some(user.id)),
        updated_by: Set(Some(user.id)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let created = new_category.insert(&*db).await?;
    tracing::info!("Course category created: {} by user {}", created.name, user.id);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message("course category created", created)),
    ))
}

/// PATCH /api/course-categories/:id
pub async fn update_course_category(
    Extension(db): Extension<DbConn>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(patch): Json<CourseCategoryPatch>,
) -> AppResult<Json<ApiResponse<course_category::Model>>> {
    require_manage(&user)?;

    let existing = course_category::Entity::find_by_id(id)
        .one(&*db)
        .await?
        .ok_or_not_found("Course category not found")?;

    // Re-validate uniqueness only when the name actually changes
    if let Some(new_name) = patch.name.as_deref() {
        if !new_name.eq_ignore_ascii_case(&existing.name)
            && find_by_name_ci(&db, new_name, Some(id)).await?.is_some()
        {
            return Err(AppError::Duplicate {
                field: "name".to_string(),
            });
        }
    }

    let mut active = patch.apply(existing);
    active.updated_by = Set(Some(user.id));
    active.updated_at = Set(Utc::now());

    let updated = active.update(&*db).await?;
    Ok(Json(ApiResponse::success(updated)))
}

/// DELETE /api/course-categories/:id
pub async fn delete_course_category(
    Extension(db): Extension<DbConn>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    require_manage(&user)?;

    let existing = course_category::Entity::find_by_id(id)
        .one(&*db)
        .await?
        .ok_or_not_found("Course category not found")?;

    course_category::Entity::delete_by_id(existing.id)
        .exec(&*db)
        .await?;

    tracing::info!("Course category deleted: {} by user {}", existing.name, user.id);
    Ok(Json(ApiResponse::success_msg("course category deleted")))
}

/// PATCH /api/course-categories/:id/status
pub async fn toggle_course_category_status(
    Extension(db): Extension<DbConn>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<course_category::Model>>> {
    require_manage(&user)?;

    let existing = course_category::Entity::find_by_id(id)
        .one(&*db)
        .await?
        .ok_or_not_found("Course category not found")?;

    let now_active = !existing.is_active;
    let mut active: course_category::ActiveModel = existing.into();
    active.is_active = Set(now_active);
    active.updated_by = Set(Some(user.id));
    active.updated_at = Set(Utc::now());

    let updated = active.update(&*db).await?;
    let message = toggle_message(now_active);
    Ok(Json(ApiResponse::success_with_message(message, updated)))
}

fn toggle_message(now_active: bool) -> &'static str {
    if now_active {
        "course category activated"
    } else {
        "course category deactivated"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(name: &str) -> course_category::Model {
        let now = Utc::now();
        course_category::Model {
            id: 1,
            name: name.to_string(),
            description: String::new(),
            is_active: true,
            created_by: Some(1),
            updated_by: Some(1),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_patch_overwrites_only_supplied_keys() {
        let model = category("Engineering");
        let patch = CourseCategoryPatch {
            description: Some("All engineering streams".to_string()),
            ..Default::default()
        };
        let active = patch.apply(model);
        // name untouched, description replaced
        assert!(!active.name.is_set());
        assert_eq!(
            active.description.clone().unwrap(),
            "All engineering streams"
        );
        assert!(!active.is_active.is_set());
    }

    #[test]
    fn test_patch_empty_is_noop() {
        let model = category("Engineering");
        let active = CourseCategoryPatch::default().apply(model);
        assert!(!active.name.is_set());
        assert!(!active.description.is_set());
        assert!(!active.is_active.is_set());
    }

    #[test]
    fn test_case_differing_name_counts_as_same() {
        // The handler skips the uniqueness re-check only for case-variants of
        // the record's own name
        assert!("Engineering".eq_ignore_ascii_case("engineering"));
        assert!(!"Engineering".eq_ignore_ascii_case("Science"));
    }

    #[test]
    fn test_toggle_messages_pair_up() {
        assert_eq!(toggle_message(true), "course category activated");
        assert_eq!(toggle_message(false), "course category deactivated");
        // Toggling twice lands back on the original value with the matching message
        let original = true;
        let once = !original;
        let twice = !once;
        assert_eq!(twice, original);
        assert_ne!(toggle_message(once), toggle_message(twice));
    }
}
