//! Department entity
//!
//! Table: pd_department

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pd_department")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Department name (unique, compared case-insensitively)
    #[sea_orm(column_type = "String(Some(128))")]
    pub name: String,

    /// Department code (unique, stored upper-cased)
    #[sea_orm(column_type = "String(Some(16))")]
    pub code: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    pub course_category_id: i64,

    /// Assigned placement staff user; must hold role placement_staff or placement_director
    #[sea_orm(nullable)]
    pub placement_staff_id: Option<i64>,

    pub is_active: bool,

    #[sea_orm(nullable)]
    pub created_by: Option<i64>,

    #[sea_orm(nullable)]
    pub updated_by: Option<i64>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
