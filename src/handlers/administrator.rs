//! Administrator handlers
//!
//! CRUD, status toggling and profile image upload for administrator records.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};

use super::{clamp_limit, sort_order, Page};
use crate::auth::{Capability, CurrentUser, DbConn, Role};
use crate::entity::administrator::{self, RecordStatus};
use crate::entity::department;
use crate::error::{AppError, AppResult, OptionExt};
use crate::routes::ApiResponse;
use crate::state::AppState;

/// List query parameters
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub role: Option<String>,
    #[serde(rename = "departmentId")]
    pub department_id: Option<i64>,
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
#[serde(rename_all = "camelCase")]
pub struct CreateAdministratorRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub gender: String,
    pub role: String,
    pub department_id: Option<i64>,
    #[serde(default)]
    pub designation: String,
    pub employee_id: String,
    #[serde(default)]
    pub access_level: String,
    #[serde(default)]
    pub office_location: String,
    pub date_of_joining: Option<NaiveDate>,
    pub user_id: Option<i64>,
}

/// Partial update: only supplied keys overwrite
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdministratorPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub gender: Option<String>,
    pub role: Option<String>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub department_id: Option<Option<i64>>,
    pub designation: Option<String>,
    pub employee_id: Option<String>,
    pub access_level: Option<String>,
    pub office_location: Option<String>,
    pub date_of_joining: Option<NaiveDate>,
}

/// Administrator with the department resolved for display
#[derive(Debug, Serialize)]
pub struct AdministratorResponse {
    #[serde(flatten)]
    pub administrator: administrator::Model,
    #[serde(rename = "departmentName")]
    pub department_name: Option<String>,
}

fn require_manage(user: &CurrentUser) -> AppResult<()> {
    if user.can(Capability::ManageAdministrators) {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Validate the role/department pairing: department-bound roles must carry one
fn check_department_requirement(role: Role, department_id: Option<i64>) -> AppResult<()> {
    if role.requires_department() && department_id.is_none() {
        return Err(AppError::Validation(vec![format!(
            "departmentId is required for role {}",
            role
        )]));
    }
    Ok(())
}

async fn email_taken(
    db: &DatabaseConnection,
    email: &str,
    exclude_id: Option<i64>,
) -> Result<bool, sea_orm::DbErr> {
    let mut query = administrator::Entity::find().filter(
        Expr::expr(Func::lower(Expr::col(administrator::Column::Email)))
            .eq(email.to_lowercase()),
    );
    if let Some(id) = exclude_id {
        query = query.filter(administrator::Column::Id.ne(id));
    }
    Ok(query.one(db).await?.is_some())
}

async fn employee_id_taken(
    db: &DatabaseConnection,
    employee_id: &str,
    exclude_id: Option<i64>,
) -> Result<bool, sea_orm::DbErr> {
    let mut query = administrator::Entity::find()
        .filter(administrator::Column::EmployeeId.eq(employee_id));
    if let Some(id) = exclude_id {
        query = query.filter(administrator::Column::Id.ne(id));
    }
    Ok(query.one(db).await?.is_some())
}

async fn resolve_department(
    db: &DatabaseConnection,
    admin: administrator::Model,
) -> AppResult<AdministratorResponse> {
    let department_name = match admin.department_id {
        Some(id) => department::Entity::find_by_id(id).one(db).await?.map(|d| d.name),
        None => None,
    };
    Ok(AdministratorResponse {
        administrator: admin,
        department_name,
    })
}

/// GET /api/administrators
pub async fn list_administrators(
    Extension(db): Extension<DbConn>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Page<administrator::Model>>>> {
    require_manage(&user)?;

    let mut select = administrator::Entity::find();

    if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search.to_lowercase());
        let mut condition = Condition::any();
        for column in [
            administrator::Column::FirstName,
            administrator::Column::LastName,
            administrator::Column::Email,
            administrator::Column::EmployeeId,
            administrator::Column::Designation,
            administrator::Column::OfficeLocation,
        ] {
            condition =
                condition.add(Expr::expr(Func::lower(Expr::col(column))).like(pattern.clone()));
        }
        select = select.filter(condition);
    }

    if let Some(status) = query.status.as_deref() {
        select = select.filter(administrator::Column::Status.eq(status));
    }
    if let Some(role) = query.role.as_deref() {
        select = select.filter(administrator::Column::Role.eq(role));
    }
    if let Some(department_id) = query.department_id {
        select = select.filter(administrator::Column::DepartmentId.eq(department_id));
    }

    let total = select.clone().count(&*db).await?;

    let order = sort_order(query.sort_dir.as_deref());
    let sort_column = match query.sort_by.as_deref() {
        Some("firstName") => administrator::Column::FirstName,
        Some("lastName") => administrator::Column::LastName,
        Some("email") => administrator::Column::Email,
        Some("employeeId") => administrator::Column::EmployeeId,
        _ => administrator::Column::ProfileLastUpdated,
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

/// GET /api/administrators/:id
pub async fn get_administrator(
    Extension(db): Extension<DbConn>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<AdministratorResponse>>> {
    require_manage(&user)?;

    let admin = administrator::Entity::find_by_id(id)
        .one(&*db)
        .await?
        .ok_or_not_found("Administrator not found")?;

    let resolved = resolve_department(&db, admin).await?;
    Ok(Json(ApiResponse::success(resolved)))
}

/// POST /api/administrators
pub async fn create_administrator(
    Extension(db): Extension<DbConn>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<CreateAdministratorRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<AdministratorResponse>>)> {
    require_manage(&user)?;

    let mut problems = Vec::new();
    if req.first_name.trim().is_empty() {
        problems.push("firstName is required".to_string());
    }
    if req.last_name.trim().is_empty() {
        problems.push("lastName is required".to_string());
    }
    if req.email.trim().is_empty() {
        problems.push("email is required".to_string());
    }
    if req.employee_id.trim().is_empty() {
        problems.push("employeeId is required".to_string());
    }
    let role = match Role::parse(&req.role) {
        Some(role) => role,
        None => {
            problems.push(format!("unknown role '{}'", req.role));
            Role::OtherStaff
        }
    };
    if !problems.is_empty() {
        return Err(AppError::Validation(problems));
    }

    check_department_requirement(role, req.department_id)?;

    if email_taken(&db, req.email.trim(), None).await? {
        return Err(AppError::Duplicate {
            field: "email".to_string(),
        });
    }
    if employee_id_taken(&db, req.employee_id.trim(), None).await? {
        return Err(AppError::Duplicate {
            field: "employeeId".to_string(),
        });
    }

    if let Some(department_id) = req.department_id {
        department::Entity::find_by_id(department_id)
            .one(&*db)
            .await?
            .ok_or_not_found("Department not found")?;
    }

    let new_admin = administrator::ActiveModel {
        first_name: Set(req.first_name.trim().to_string()),
        last_name: Set(req.last_name.trim().to_string()),
        email: Set(req.email.trim().to_string()),
        mobile: Set(req.mobile),
        gender: Set(req.gender),
        role: Set(role.as_str().to_string()),
        department_id: Set(req.department_id),
        designation: Set(req.designation),
        employee_id: Set(req.employee_id.trim().to_string()),
        access_level: Set(req.access_level),
        office_location: Set(req.office_location),
        date_of_joining: Set(req.date_of_joining),
        status: Set(RecordStatus::Active.as_str().to_string()),
        user_id: Set(req.user_id),
        created_by: Set(Some(user.id)),
        profile_image: Set(None),
        profile_last_updated: Set(Utc::now()),
        ..Default::default()
    };

    let created = new_admin.insert(&*db).await?;
    tracing::info!(
        "Administrator created: {} ({}) by user {}",
        created.email,
        created.employee_id,
        user.id
    );

    let resolved = resolve_department(&db, created).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message("administrator created", resolved)),
    ))
}

/// PATCH /api/administrators/:id
pub async fn update_administrator(
    Extension(db): Extension<DbConn>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(patch): Json<AdministratorPatch>,
) -> AppResult<Json<ApiResponse<AdministratorResponse>>> {
    require_manage(&user)?;

    let existing = administrator::Entity::find_by_id(id)
        .one(&*db)
        .await?
        .ok_or_not_found("Administrator not found")?;

    // Uniqueness re-validated only when a unique field changes
    if let Some(new_email) = patch.email.as_deref() {
        if !new_email.eq_ignore_ascii_case(&existing.email)
            && email_taken(&db, new_email, Some(id)).await?
        {
            return Err(AppError::Duplicate {
                field: "email".to_string(),
            });
        }
    }
    if let Some(new_employee_id) = patch.employee_id.as_deref() {
        if new_employee_id != existing.employee_id
            && employee_id_taken(&db, new_employee_id, Some(id)).await?
        {
            return Err(AppError::Duplicate {
                field: "employeeId".to_string(),
            });
        }
    }

    // The role/department pairing must hold after the merge
    let merged_role = match patch.role.as_deref() {
        Some(r) => Role::parse(r)
            .ok_or_else(|| AppError::Validation(vec![format!("unknown role '{}'", r)]))?,
        None => Role::parse(&existing.role).unwrap_or(Role::OtherStaff),
    };
    let merged_department = match patch.department_id {
        Some(value) => value,
        None => existing.department_id,
    };
    check_department_requirement(merged_role, merged_department)?;

    if let Some(department_id) = merged_department {
        if patch.department_id.is_some() {
            department::Entity::find_by_id(department_id)
                .one(&*db)
                .await?
                .ok_or_not_found("Department not found")?;
        }
    }

    let mut active: administrator::ActiveModel = existing.into();
    if let Some(v) = patch.first_name {
        active.first_name = Set(v);
    }
    if let Some(v) = patch.last_name {
        active.last_name = Set(v);
    }
    if let Some(v) = patch.email {
        active.email = Set(v.trim().to_string());
    }
    if let Some(v) = patch.mobile {
        active.mobile = Set(v);
    }
    if let Some(v) = patch.gender {
        active.gender = Set(v);
    }
    if patch.role.is_some() {
        active.role = Set(merged_role.as_str().to_string());
    }
    if let Some(v) = patch.department_id {
        active.department_id = Set(v);
    }
    if let Some(v) = patch.designation {
        active.designation = Set(v);
    }
    if let Some(v) = patch.employee_id {
        active.employee_id = Set(v.trim().to_string());
    }
    if let Some(v) = patch.access_level {
        active.access_level = Set(v);
    }
    if let Some(v) = patch.office_location {
        active.office_location = Set(v);
    }
    if let Some(v) = patch.date_of_joining {
        active.date_of_joining = Set(Some(v));
    }
    active.profile_last_updated = Set(Utc::now());

    let updated = active.update(&*db).await?;
    let resolved = resolve_department(&db, updated).await?;
    Ok(Json(ApiResponse::success(resolved)))
}

/// DELETE /api/administrators/:id
///
/// Hard delete; the stored profile image is removed as a side effect
/// (best effort, a storage failure is logged and not surfaced).
pub async fn delete_administrator(
    State(state): State<AppState>,
    Extension(db): Extension<DbConn>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    require_manage(&user)?;

    let existing = administrator::Entity::find_by_id(id)
        .one(&*db)
        .await?
        .ok_or_not_found("Administrator not found")?;

    administrator::Entity::delete_by_id(existing.id)
        .exec(&*db)
        .await?;

    if let Some(image_key) = existing.profile_image.as_deref() {
        if let Err(e) = state.object_store.delete(image_key).await {
            tracing::error!("Failed to delete profile image {}: {}", image_key, e);
        }
    }

    tracing::info!("Administrator deleted: {} by user {}", existing.email, user.id);
    Ok(Json(ApiResponse::success_msg("administrator deleted")))
}

/// PATCH /api/administrators/:id/status
///
/// Flips between active and inactive; a deleted record cannot be toggled.
pub async fn toggle_administrator_status(
    Extension(db): Extension<DbConn>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<administrator::Model>>> {
    require_manage(&user)?;

    let existing = administrator::Entity::find_by_id(id)
        .one(&*db)
        .await?
        .ok_or_not_found("Administrator not found")?;

    let current = RecordStatus::parse(&existing.status)
        .ok_or_else(|| AppError::Internal(format!("bad status value: {}", existing.status)))?;

    let next = match current {
        RecordStatus::Active => RecordStatus::Inactive,
        RecordStatus::Inactive => RecordStatus::Active,
        RecordStatus::Deleted => {
            return Err(AppError::BadRequest(
                "cannot toggle a deleted administrator".to_string(),
            ))
        }
    };

    let mut active: administrator::ActiveModel = existing.into();
    active.status = Set(next.as_str().to_string());
    active.profile_last_updated = Set(Utc::now());

    let updated = active.update(&*db).await?;
    let message = if next == RecordStatus::Active {
        "administrator activated"
    } else {
        "administrator deactivated"
    };
    tracing::info!("Administrator {} {} by user {}", updated.id, message, user.id);
    Ok(Json(ApiResponse::success_with_message(message, updated)))
}

/// Allowed profile image content types, mapped to stored extensions
fn image_extension(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

/// POST /api/administrators/:id/image
pub async fn upload_administrator_image(
    State(state): State<AppState>,
    Extension(db): Extension<DbConn>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<AdministratorResponse>>> {
    require_manage(&user)?;

    let existing = administrator::Entity::find_by_id(id)
        .one(&*db)
        .await?
        .ok_or_not_found("Administrator not found")?;

    let field = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("invalid multipart body: {}", e)))?
        .ok_or_else(|| AppError::BadRequest("missing image field".to_string()))?;

    let content_type = field.content_type().unwrap_or("").to_string();
    let Some(extension) = image_extension(&content_type) else {
        return Err(AppError::BadRequest(format!(
            "unsupported image type '{}' (allowed: JPEG, PNG, WebP)",
            content_type
        )));
    };

    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(format!("failed to read upload: {}", e)))?;

    if bytes.len() > state.config.max_image_size {
        return Err(AppError::BadRequest(format!(
            "image exceeds the {} byte limit",
            state.config.max_image_size
        )));
    }

    let stored = state
        .object_store
        .put(extension, &bytes)
        .await
        .map_err(|e| AppError::Internal(format!("image store failed: {}", e)))?;

    let old_image = existing.profile_image.clone();
    let mut active: administrator::ActiveModel = existing.into();
    active.profile_image = Set(Some(stored.key.clone()));
    active.profile_last_updated = Set(Utc::now());
    let updated = active.update(&*db).await?;

    // Replace, don't leak: drop the previous image once the new one is saved
    if let Some(old_key) = old_image {
        if let Err(e) = state.object_store.delete(&old_key).await {
            tracing::error!("Failed to delete old profile image {}: {}", old_key, e);
        }
    }

    let resolved = resolve_department(&db, updated).await?;
    Ok(Json(ApiResponse::success_with_message("image uploaded", resolved)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_department_requirement() {
        assert!(check_department_requirement(Role::DepartmentHod, None).is_err());
        assert!(check_department_requirement(Role::PlacementStaff, None).is_err());
        assert!(check_department_requirement(Role::PlacementDirector, None).is_err());
        assert!(check_department_requirement(Role::DepartmentHod, Some(3)).is_ok());
        assert!(check_department_requirement(Role::Admin, None).is_ok());
    }

    #[test]
    fn test_image_extensions() {
        assert_eq!(image_extension("image/jpeg"), Some("jpg"));
        assert_eq!(image_extension("image/png"), Some("png"));
        assert_eq!(image_extension("image/webp"), Some("webp"));
        assert_eq!(image_extension("image/gif"), None);
        assert_eq!(image_extension("application/pdf"), None);
    }

    #[test]
    fn test_patch_department_clear_vs_absent() {
        let absent: AdministratorPatch = serde_json::from_str(r#"{}"#).unwrap();
        assert!(absent.department_id.is_none());

        let cleared: AdministratorPatch =
            serde_json::from_str(r#"{"departmentId": null}"#).unwrap();
        assert_eq!(cleared.department_id, Some(None));
    }
}
