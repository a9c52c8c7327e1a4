//! Authentication and authorization
//!
//! Bearer-JWT auth middleware, the closed role/capability model, and the
//! fixed-window login rate limiter.

pub mod jwt;
pub mod middleware;
pub mod rate_limit;
pub mod role;

pub use middleware::{auth_layer, CurrentUser, DbConn};
pub use rate_limit::{Decision, LoginRateLimiter};
pub use role::{Capability, Role};
