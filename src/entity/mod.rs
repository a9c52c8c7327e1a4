//! Entity module - SeaORM entity definitions
//!
//! One module per persisted table, prefix `pd_`.

pub mod administrator;
pub mod course_category;
pub mod department;
pub mod hod_profile;
pub mod placement_staff_profile;
pub mod staff_member;
pub mod user;
