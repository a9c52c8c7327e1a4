//! Staff member entity - target of the bulk roster import
//!
//! Table: pd_staff_member

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pd_staff_member")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    #[sea_orm(column_type = "String(Some(64))")]
    pub first_name: String,

    #[sea_orm(column_type = "String(Some(64))")]
    pub last_name: String,

    /// Upper-cased department code from the roster
    #[sea_orm(column_type = "String(Some(16))")]
    pub department_code: String,

    #[sea_orm(column_type = "String(Some(128))", unique)]
    pub email: String,

    #[sea_orm(column_type = "String(Some(32))")]
    pub role: String,

    #[sea_orm(column_type = "String(Some(64))")]
    pub designation: String,

    /// Employee id; unique when non-empty
    #[sea_orm(column_type = "String(Some(32))", nullable)]
    pub employee_id: Option<String>,

    #[sea_orm(column_type = "String(Some(20))")]
    pub phone: String,

    #[sea_orm(column_type = "Text")]
    pub admin_notes: String,

    pub is_active: bool,

    pub is_verified: bool,

    /// Roster kind this row came from: staff or student
    #[sea_orm(column_type = "String(Some(16))")]
    pub kind: String,

    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
