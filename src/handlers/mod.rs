//! Request handlers module

use sea_orm::Order;
use serde::Serialize;

pub mod administrator;
pub mod auth;
pub mod course_category;
pub mod department;
pub mod profile;
pub mod roster;

/// Default page size for list endpoints
pub const DEFAULT_LIMIT: u64 = 20;
/// Hard cap on page size
pub const MAX_LIMIT: u64 = 100;

/// One page of a list response
#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    pub items: Vec<T>,
    pub total: u64,
    pub skip: u64,
    pub limit: u64,
}

/// Clamp a requested page size into [1, MAX_LIMIT]
pub fn clamp_limit(limit: Option<u64>) -> u64 {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

/// Parse a sort direction string; anything but "asc" sorts descending
pub fn sort_order(dir: Option<&str>) -> Order {
    match dir {
        Some("asc") => Order::Asc,
        _ => Order::Desc,
    }
}

/// Distinguish "key absent" from "key present and null" in patch bodies:
/// absent stays `None` via `#[serde(default)]`, an explicit null becomes
/// `Some(None)`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(None), DEFAULT_LIMIT);
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(50)), 50);
        assert_eq!(clamp_limit(Some(10_000)), MAX_LIMIT);
    }

    #[test]
    fn test_sort_order() {
        assert_eq!(sort_order(Some("asc")), Order::Asc);
        assert_eq!(sort_order(Some("desc")), Order::Desc);
        assert_eq!(sort_order(Some("sideways")), Order::Desc);
        assert_eq!(sort_order(None), Order::Desc);
    }
}
