//! Placement staff profile entity
//!
//! Table: pd_placement_staff_profile

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pd_placement_staff_profile")]
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

    /// Work email used for placement correspondence
    #[sea_orm(column_type = "String(Some(128))")]
    pub official_email: String,

    pub experience_years: i32,

    /// JSON array of qualification names
    #[sea_orm(column_type = "Json")]
    pub qualifications: Json,

    #[sea_orm(column_type = "Text")]
    pub responsibilities_text: String,

    /// JSON array of training program names
    #[sea_orm(column_type = "Json")]
    pub training_programs_handled: Json,

    /// JSON array of languages
    #[sea_orm(column_type = "Json")]
    pub languages_spoken: Json,

    /// JSON array of availability slots
    #[sea_orm(column_type = "Json")]
    pub availability_time_slots: Json,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
