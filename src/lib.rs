//! Placedesk - a placement management back office
//!
//! REST controllers for administrators, departments and course categories,
//! staff profile endpoints, and the bulk roster import pipeline, backed by
//! a PostgreSQL document layer via SeaORM.

pub mod auth;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod notify;
pub mod roster;
pub mod routes;
pub mod state;
pub mod storage;

// Re-export commonly used types
pub use config::Config;
pub use state::AppState;
