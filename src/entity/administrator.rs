//! Administrator entity
//!
//! Table: pd_administrator

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Record status for administrator profiles
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Active,
    Inactive,
    Deleted,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Active => "active",
            RecordStatus::Inactive => "inactive",
            RecordStatus::Deleted => "deleted",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(RecordStatus::Active),
            "inactive" => Some(RecordStatus::Inactive),
            "deleted" => Some(RecordStatus::Deleted),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pd_administrator")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    #[sea_orm(column_type = "String(Some(64))")]
    pub first_name: String,

    #[sea_orm(column_type = "String(Some(64))")]
    pub last_name: String,

    /// Contact email (globally unique)
    #[sea_orm(column_type = "String(Some(128))", unique)]
    pub email: String,

    #[sea_orm(column_type = "String(Some(20))")]
    pub mobile: String,

    #[sea_orm(column_type = "String(Some(16))")]
    pub gender: String,

    /// Role wire string, parsed to `auth::Role`
    #[sea_orm(column_type = "String(Some(32))")]
    pub role: String,

    /// Required when role is placement_director, placement_staff or department_hod
    #[sea_orm(nullable)]
    pub department_id: Option<i64>,

    #[sea_orm(column_type = "String(Some(64))")]
    pub designation: String,

    /// Employee id (globally unique)
    #[sea_orm(column_type = "String(Some(32))", unique)]
    pub employee_id: String,

    #[sea_orm(column_type = "String(Some(32))")]
    pub access_level: String,

    #[sea_orm(column_type = "String(Some(64))")]
    pub office_location: String,

    #[sea_orm(nullable)]
    pub date_of_joining: Option<NaiveDate>,

    /// Record status: active, inactive, deleted
    #[sea_orm(column_type = "String(Some(16))")]
    pub status: String,

    /// Owning user account
    #[sea_orm(nullable)]
    pub user_id: Option<i64>,

    #[sea_orm(nullable)]
    pub created_by: Option<i64>,

    /// Object-store key of the profile image
    #[sea_orm(column_type = "String(Some(128))", nullable)]
    pub profile_image: Option<String>,

    pub profile_last_updated: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_status_roundtrip() {
        for status in [RecordStatus::Active, RecordStatus::Inactive, RecordStatus::Deleted] {
            assert_eq!(RecordStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(RecordStatus::parse("archived"), None);
    }
}
