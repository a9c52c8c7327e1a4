//! Department handlers
//!
//! Implements department CRUD operations

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::Json,
    Extension,
};
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};

use super::{clamp_limit, sort_order, Page};
use crate::auth::{Capability, CurrentUser, DbConn, Role};
use crate::entity::{course_category, department, user};
use crate::error::{AppError, AppResult, OptionExt};
use crate::routes::ApiResponse;

/// List query parameters
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    #[serde(rename = "isActive")]
    pub is_active: Option<bool>,
    #[serde(rename = "courseCategoryId")]
    pub course_category_id: Option<i64>,
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
pub struct CreateDepartmentRequest {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "courseCategoryId")]
    pub course_category_id: i64,
    #[serde(rename = "placementStaffId")]
    pub placement_staff_id: Option<i64>,
}

/// Partial update: only supplied keys overwrite
#[derive(Debug, Default, Deserialize)]
pub struct DepartmentPatch {
    pub name: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "courseCategoryId")]
    pub course_category_id: Option<i64>,
    /// `Some(None)` clears the assignment; an absent key leaves it untouched
    #[serde(
        rename = "placementStaffId",
        default,
        deserialize_with = "super::double_option"
    )]
    pub placement_staff_id: Option<Option<i64>>,
    #[serde(rename = "isActive")]
    pub is_active: Option<bool>,
}

/// Department with references resolved for display
#[derive(Debug, Serialize)]
pub struct DepartmentResponse {
    #[serde(flatten)]
    pub department: department::Model,
    #[serde(rename = "courseCategoryName")]
    pub course_category_name: Option<String>,
    #[serde(rename = "placementStaffName")]
    pub placement_staff_name: Option<String>,
}

fn require_manage(user: &CurrentUser) -> AppResult<()> {
    if user.can(Capability::ManageDepartments) {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Whether a user's role string qualifies them as a department's placement staff
fn placement_staff_eligible(role: &str) -> bool {
    Role::parse(role).is_some_and(|r| r.can_be_placement_staff())
}

async fn find_by_name_ci(
    db: &DatabaseConnection,
    name: &str,
    exclude_id: Option<i64>,
) -> Result<Option<department::Model>, sea_orm::DbErr> {
    let mut query = department::Entity::find().filter(
        Expr::expr(Func::lower(Expr::col(department::Column::Name))).eq(name.to_lowercase()),
    );
    if let Some(id) = exclude_id {
        query = query.filter(department::Column::Id.ne(id));
    }
    query.one(db).await
}

async fn find_by_code(
    db: &DatabaseConnection,
    code: &str,
    exclude_id: Option<i64>,
) -> Result<Option<department::Model>, sea_orm::DbErr> {
    // Codes are stored upper-cased, so an exact match is case-insensitive
    let mut query =
        department::Entity::find().filter(department::Column::Code.eq(code.to_uppercase()));
    if let Some(id) = exclude_id {
        query = query.filter(department::Column::Id.ne(id));
    }
    query.one(db).await
}

/// Referenced course category must exist at write time. No lock spans this
/// check and the insert; a concurrent delete in between is tolerated.
async fn ensure_course_category(db: &DatabaseConnection, id: i64) -> AppResult<()> {
    course_category::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_not_found("Course category not found")?;
    Ok(())
}

/// Referenced placement staff must be a user with an eligible role
async fn ensure_placement_staff(db: &DatabaseConnection, user_id: i64) -> AppResult<()> {
    let staff = user::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_not_found("Placement staff user not found")?;

    if !placement_staff_eligible(&staff.role) {
        return Err(AppError::BadRequest(format!(
            "user {} cannot be assigned as placement staff (role is {})",
            user_id, staff.role
        )));
    }
    Ok(())
}

async fn resolve_references(
    db: &DatabaseConnection,
    dept: department::Model,
) -> AppResult<DepartmentResponse> {
    let course_category_name = course_category::Entity::find_by_id(dept.course_category_id)
        .one(db)
        .await?
        .map(|c| c.name);

    let placement_staff_name = match dept.placement_staff_id {
        Some(id) => user::Entity::find_by_id(id).one(db).await?.map(|u| u.full_name),
        None => None,
    };

    Ok(DepartmentResponse {
        department: dept,
        course_category_name,
        placement_staff_name,
    })
}

/// GET /api/departments
pub async fn list_departments(
    Extension(db): Extension<DbConn>,
    Extension(_user): Extension<CurrentUser>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Page<department::Model>>>> {
    let mut select = department::Entity::find();

    if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search.to_lowercase());
        select = select.filter(
            Condition::any()
                .add(
                    Expr::expr(Func::lower(Expr::col(department::Column::Name)))
                        .like(pattern.clone()),
                )
                .add(
                    Expr::expr(Func::lower(Expr::col(department::Column::Code)))
                        .like(pattern.clone()),
                )
                .add(
                    Expr::expr(Func::lower(Expr::col(department::Column::Description)))
                        .like(pattern),
                ),
        );
    }

    if let Some(is_active) = query.is_active {
        select = select.filter(department::Column::IsActive.eq(is_active));
    }
    if let Some(category_id) = query.course_category_id {
        select = select.filter(department::Column::CourseCategoryId.eq(category_id));
    }

    let total = select.clone().count(&*db).await?;

    let order = sort_order(query.sort_dir.as_deref());
    let sort_column = match query.sort_by.as_deref() {
        Some("name") => department::Column::Name,
        Some("code") => department::Column::Code,
        Some("updatedAt") => department::Column::UpdatedAt,
        _ => department::Column::CreatedAt,
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

/// GET /api/departments/:id
pub async fn get_department(
    Extension(db): Extension<DbConn>,
    Extension(_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<DepartmentResponse>>> {
    let dept = department::Entity::find_by_id(id)
        .one(&*db)
        .await?
        .ok_or_not_found("Department not found")?;

    let resolved = resolve_references(&db, dept).await?;
    Ok(Json(ApiResponse::success(resolved)))
}

/// POST /api/departments
pub async fn create_department(
    Extension(db): Extension<DbConn>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<CreateDepartmentRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<DepartmentResponse>>)> {
    require_manage(&user)?;

    let name = req.name.trim().to_string();
    let code = req.code.trim().to_uppercase();

    let mut problems = Vec::new();
    if name.is_empty() {
        problems.push("name is required".to_string());
    }
    if code.is_empty() {
        problems.push("code is required".to_string());
    }
    if !problems.is_empty() {
        return Err(AppError::Validation(problems));
    }

    if find_by_name_ci(&db, &name, None).await?.is_some() {
        return Err(AppError::Duplicate {
            field: "name".to_string(),
        });
    }
    if find_by_code(&db, &code, None).await?.is_some() {
        return Err(AppError::Duplicate {
            field: "code".to_string(),
        });
    }

    ensure_course_category(&db, req.course_category_id).await?;
    if let Some(staff_id) = req.placement_staff_id {
        ensure_placement_staff(&db, staff_id).await?;
    }

    let now = Utc::now();
    let new_dept = department::ActiveModel {
        name: Set(name),
        code: Set(code),
        description: Set(req.description),
        course_category_id: Set(req.course_category_id),
        placement_staff_id: Set(req.placement_staff_id),
        is_active: Set(true),
        created_by: Set(Some(user.id)),
        updated_by: Set(Some(user.id)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let created = new_dept.insert(&*db).await?;
    tracing::info!("Department created: {} by user {}", created.code, user.id);

    let resolved = resolve_references(&db, created).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message("department created", resolved)),
    ))
}

/// PATCH /api/departments/:id
pub async fn update_department(
    Extension(db): Extension<DbConn>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(patch): Json<DepartmentPatch>,
) -> AppResult<Json<ApiResponse<DepartmentResponse>>> {
    require_manage(&user)?;

    let existing = department::Entity::find_by_id(id)
        .one(&*db)
        .await?
        .ok_or_not_found("Department not found")?;

    // Uniqueness re-validated only for changed unique fields
    if let Some(new_name) = patch.name.as_deref() {
        if !new_name.eq_ignore_ascii_case(&existing.name)
            && find_by_name_ci(&db, new_name, Some(id)).await?.is_some()
        {
            return Err(AppError::Duplicate {
                field: "name".to_string(),
            });
        }
    }
    if let Some(new_code) = patch.code.as_deref() {
        if !new_code.eq_ignore_ascii_case(&existing.code)
            && find_by_code(&db, new_code, Some(id)).await?.is_some()
        {
            return Err(AppError::Duplicate {
                field: "code".to_string(),
            });
        }
    }

    // Referential checks happen before any write
    if let Some(category_id) = patch.course_category_id {
        ensure_course_category(&db, category_id).await?;
    }
    if let Some(Some(staff_id)) = patch.placement_staff_id {
        ensure_placement_staff(&db, staff_id).await?;
    }

    let mut active: department::ActiveModel = existing.into();
    if let Some(name) = patch.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(code) = patch.code {
        active.code = Set(code.trim().to_uppercase());
    }
    if let Some(description) = patch.description {
        active.description = Set(description);
    }
    if let Some(category_id) = patch.course_category_id {
        active.course_category_id = Set(category_id);
    }
    if let Some(staff_id) = patch.placement_staff_id {
        active.placement_staff_id = Set(staff_id);
    }
    if let Some(is_active) = patch.is_active {
        active.is_active = Set(is_active);
    }
    active.updated_by = Set(Some(user.id));
    active.updated_at = Set(Utc::now());

    let updated = active.update(&*db).await?;
    let resolved = resolve_references(&db, updated).await?;
    Ok(Json(ApiResponse::success(resolved)))
}

/// DELETE /api/departments/:id — admin only
pub async fn delete_department(
    Extension(db): Extension<DbConn>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    if user.role != Role::Admin {
        return Err(AppError::Forbidden);
    }

    let existing = department::Entity::find_by_id(id)
        .one(&*db)
        .await?
        .ok_or_not_found("Department not found")?;

    department::Entity::delete_by_id(existing.id)
        .exec(&*db)
        .await?;

    tracing::info!("Department deleted: {} by user {}", existing.code, user.id);
    Ok(Json(ApiResponse::success_msg("department deleted")))
}

/// PATCH /api/departments/:id/status
pub async fn toggle_department_status(
    Extension(db): Extension<DbConn>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<department::Model>>> {
    require_manage(&user)?;

    let existing = department::Entity::find_by_id(id)
        .one(&*db)
        .await?
        .ok_or_not_found("Department not found")?;

    let now_active = !existing.is_active;
    let mut active: department::ActiveModel = existing.into();
    active.is_active = Set(now_active);
    active.updated_by = Set(Some(user.id));
    active.updated_at = Set(Utc::now());

    let updated = active.update(&*db).await?;
    let message = if now_active {
        "department activated"
    } else {
        "department deactivated"
    };
    Ok(Json(ApiResponse::success_with_message(message, updated)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_staff_eligibility() {
        assert!(placement_staff_eligible("placement_staff"));
        assert!(placement_staff_eligible("placement_director"));
        assert!(!placement_staff_eligible("student"));
        assert!(!placement_staff_eligible("department_hod"));
        assert!(!placement_staff_eligible("not_a_role"));
    }

    #[test]
    fn test_patch_deserializes_partial_body() {
        let patch: DepartmentPatch = serde_json::from_str(r#"{"name": "Mechanical"}"#).unwrap();
        assert_eq!(patch.name.as_deref(), Some("Mechanical"));
        assert!(patch.code.is_none());
        assert!(patch.placement_staff_id.is_none());
    }

    #[test]
    fn test_patch_clears_placement_staff_with_null() {
        let patch: DepartmentPatch =
            serde_json::from_str(r#"{"placementStaffId": null}"#).unwrap();
        assert_eq!(patch.placement_staff_id, Some(None));
    }

    #[test]
    fn test_patch_sets_placement_staff() {
        let patch: DepartmentPatch = serde_json::from_str(r#"{"placementStaffId": 9}"#).unwrap();
        assert_eq!(patch.placement_staff_id, Some(Some(9)));
    }
}
