//! Course category entity
//!
//! Table: pd_course_category

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pd_course_category")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Category name (unique, compared case-insensitively)
    #[sea_orm(column_type = "String(Some(128))")]
    pub name: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

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
