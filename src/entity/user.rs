//! User entity - owning account for every person in the system
//!
//! Table: pd_user

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pd_user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Login email (unique)
    #[sea_orm(column_type = "String(Some(128))", unique)]
    pub email: String,

    /// Password (bcrypt hash)
    #[sea_orm(column_type = "String(Some(128))")]
    #[serde(skip_serializing)]
    pub password: String,

    #[sea_orm(column_type = "String(Some(128))")]
    pub full_name: String,

    /// Role wire string, parsed to `auth::Role`
    #[sea_orm(column_type = "String(Some(32))")]
    pub role: String,

    /// Owning department, when the role is department-scoped
    #[sea_orm(nullable)]
    pub department_id: Option<i64>,

    pub is_active: bool,

    /// Tokens issued before this instant are invalid
    #[sea_orm(nullable)]
    pub password_changed_at: Option<DateTime<Utc>>,

    #[sea_orm(nullable)]
    pub last_login: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

// Cross-module relations are resolved by explicit queries to avoid cycles.

impl ActiveModelBehavior for ActiveModel {}

/// User summary returned by auth endpoints (never the password)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    pub email: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub role: String,
    #[serde(rename = "departmentId")]
    pub department_id: Option<i64>,
    #[serde(rename = "isActive")]
    pub is_active: bool,
}

impl From<Model> for UserSummary {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            email: m.email,
            full_name: m.full_name,
            role: m.role,
            department_id: m.department_id,
            is_active: m.is_active,
        }
    }
}
