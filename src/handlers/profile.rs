//! Staff profile handlers
//!
//! Read/upsert endpoints for department HOD and placement staff profiles.
//! Department-scoped roles (HOD, placement staff) may only touch profiles in
//! their own department.

use axum::{extract::Path, response::Json, Extension};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::Deserialize;
use serde_json::json;

use crate::auth::{Capability, CurrentUser, DbConn};
use crate::entity::{hod_profile, placement_staff_profile};
use crate::error::{AppError, AppResult, OptionExt};
use crate::routes::ApiResponse;

/// Full HOD profile body (PUT replaces the whole profile)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HodProfileBody {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub designation: String,
    #[serde(default)]
    pub employee_id: String,
    pub department_id: i64,
    #[serde(default)]
    pub department_head_of: String,
    #[serde(default)]
    pub office_room_no: String,
    #[serde(default)]
    pub years_as_hod: i32,
    #[serde(default)]
    pub academic_background: String,
    #[serde(default)]
    pub subjects_taught: Vec<String>,
    #[serde(default)]
    pub responsibilities: String,
    #[serde(default)]
    pub meeting_slots: Vec<String>,
    #[serde(default)]
    pub calendar_link: String,
}

/// Full placement staff profile body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementStaffProfileBody {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub designation: String,
    #[serde(default)]
    pub employee_id: String,
    pub department_id: i64,
    #[serde(default)]
    pub official_email: String,
    #[serde(default)]
    pub experience_years: i32,
    #[serde(default)]
    pub qualifications: Vec<String>,
    #[serde(default)]
    pub responsibilities_text: String,
    #[serde(default)]
    pub training_programs_handled: Vec<String>,
    #[serde(default)]
    pub languages_spoken: Vec<String>,
    #[serde(default)]
    pub availability_time_slots: Vec<String>,
}

fn require_profile_access(user: &CurrentUser, department_id: i64) -> AppResult<()> {
    if !user.can(Capability::ManageProfiles) {
        return Err(AppError::Forbidden);
    }
    if !user.can_access_department(department_id) {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

/// GET /api/department-hod-profiles/:user_id
pub async fn get_hod_profile(
    Extension(db): Extension<DbConn>,
    Extension(user): Extension<CurrentUser>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<ApiResponse<hod_profile::Model>>> {
    let profile = hod_profile::Entity::find()
        .filter(hod_profile::Column::UserId.eq(user_id))
        .one(&*db)
        .await?
        .ok_or_not_found("HOD profile not found")?;

    require_profile_access(&user, profile.department_id)?;
    Ok(Json(ApiResponse::success(profile)))
}

/// PUT /api/department-hod-profiles/:user_id (upsert)
pub async fn put_hod_profile(
    Extension(db): Extension<DbConn>,
    Extension(user): Extension<CurrentUser>,
    Path(user_id): Path<i64>,
    Json(body): Json<HodProfileBody>,
) -> AppResult<Json<ApiResponse<hod_profile::Model>>> {
    require_profile_access(&user, body.department_id)?;

    let existing = hod_profile::Entity::find()
        .filter(hod_profile::Column::UserId.eq(user_id))
        .one(&*db)
        .await?;

    let mut active = match existing {
        Some(model) => {
            // Scoped users may not reach across into another department's profile
            require_profile_access(&user, model.department_id)?;
            hod_profile::ActiveModel::from(model)
        }
        None => hod_profile::ActiveModel {
            user_id: Set(user_id),
            ..Default::default()
        },
    };

    active.first_name = Set(body.first_name);
    active.last_name = Set(body.last_name);
    active.email = Set(body.email);
    active.mobile = Set(body.mobile);
    active.designation = Set(body.designation);
    active.employee_id = Set(body.employee_id);
    active.department_id = Set(body.department_id);
    active.department_head_of = Set(body.department_head_of);
    active.office_room_no = Set(body.office_room_no);
    active.years_as_hod = Set(body.years_as_hod);
    active.academic_background = Set(body.academic_background);
    active.subjects_taught = Set(json!(body.subjects_taught));
    active.responsibilities = Set(body.responsibilities);
    active.meeting_slots = Set(json!(body.meeting_slots));
    active.calendar_link = Set(body.calendar_link);

    let saved = if matches!(active.id, sea_orm::ActiveValue::Unchanged(_)) {
        active.update(&*db).await?
    } else {
        active.insert(&*db).await?
    };

    tracing::info!("HOD profile saved for user {} by user {}", user_id, user.id);
    Ok(Json(ApiResponse::success_with_message("profile saved", saved)))
}

/// GET /api/placement-staff-profiles/:user_id
pub async fn get_placement_staff_profile(
    Extension(db): Extension<DbConn>,
    Extension(user): Extension<CurrentUser>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<ApiResponse<placement_staff_profile::Model>>> {
    let profile = placement_staff_profile::Entity::find()
        .filter(placement_staff_profile::Column::UserId.eq(user_id))
        .one(&*db)
        .await?
        .ok_or_not_found("Placement staff profile not found")?;

    require_profile_access(&user, profile.department_id)?;
    Ok(Json(ApiResponse::success(profile)))
}

/// PUT /api/placement-staff-profiles/:user_id (upsert)
pub async fn put_placement_staff_profile(
    Extension(db): Extension<DbConn>,
    Extension(user): Extension<CurrentUser>,
    Path(user_id): Path<i64>,
    Json(body): Json<PlacementStaffProfileBody>,
) -> AppResult<Json<ApiResponse<placement_staff_profile::Model>>> {
    require_profile_access(&user, body.department_id)?;

    let existing = placement_staff_profile::Entity::find()
        .filter(placement_staff_profile::Column::UserId.eq(user_id))
        .one(&*db)
        .await?;

    let mut active = match existing {
        Some(model) => {
            require_profile_access(&user, model.department_id)?;
            placement_staff_profile::ActiveModel::from(model)
        }
        None => placement_staff_profile::ActiveModel {
            user_id: Set(user_id),
            ..Default::default()
        },
    };

    active.first_name = Set(body.first_name);
    active.last_name = Set(body.last_name);
    active.email = Set(body.email);
    active.mobile = Set(body.mobile);
    active.designation = Set(body.designation);
    active.employee_id = Set(body.employee_id);
    active.department_id = Set(body.department_id);
    active.official_email = Set(body.official_email);
    active.experience_years = Set(body.experience_years);
    active.qualifications = Set(json!(body.qualifications));
    active.responsibilities_text = Set(body.responsibilities_text);
    active.training_programs_handled = Set(json!(body.training_programs_handled));
    active.languages_spoken = Set(json!(body.languages_spoken));
    active.availability_time_slots = Set(json!(body.availability_time_slots));

    let saved = if matches!(active.id, sea_orm::ActiveValue::Unchanged(_)) {
        active.update(&*db).await?
    } else {
        active.insert(&*db).await?
    };

    tracing::info!(
        "Placement staff profile saved for user {} by user {}",
        user_id,
        user.id
    );
    Ok(Json(ApiResponse::success_with_message("profile saved", saved)))
}
