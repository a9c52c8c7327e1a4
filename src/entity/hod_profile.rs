//! Department HOD profile entity
//!
//! Table: pd_hod_profile
//!
//! Shares the identity/employment shape with administrators, plus the
//! HOD-specific extension fields. List-valued fields are stored as JSON arrays.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pd_hod_profile")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Owning user account (one profile per user)
    #[sea_orm(unique)]
    pub user_id: i64,

    #[sea_orm(column_type = "String(Some(64))")]
    pub first_name: String,

    #[sea_orm(column_type = "String(Some(64))")]
    pub last_name: String,

    #[sea_orm(column_type = "String(Some(128))")]
    pub email: String,

    #[sea_orm(column_type = "String(Some(20))")]
    pub mobile: String,

    #[sea_orm(column_type = "String(Some(64))")]
    pub designation: String,

    #[sea_orm(column_type = "String(Some(32))")]
    pub employee_id: String,

    pub department_id: i64,

    /// Name of the department this user heads
    #[sea_orm(column_type = "String(Some(128))")]
    pub department_head_of: String,

    #[sea_orm(column_type = "String(Some(32))")]
    pub office_room_no: String,

    pub years_as_hod: i32,

    #[sea_orm(column_type = "Text")]
    pub academic_background: String,

    /// JSON array of subject names
    #[sea_orm(column_type = "Json")]
    pub subjects_taught: Json,

    #[sea_orm(column_type = "Text")]
    pub responsibilities: String,

    /// JSON array of weekly meeting slots
    #[sea_orm(column_type = "Json")]
    pub meeting_slots: Json,

    #[sea_orm(column_type = "String(Some(256))")]
    pub calendar_link: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
