//! Row normalizer
//!
//! Maps one raw spreadsheet row (arbitrary header casing and whitespace) to
//! the canonical record shape. Never errors; missing values become empty
//! strings and are caught by the validator.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Canonical roster record
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedRecord {
    pub first_name: String,
    pub last_name: String,
    /// Department code, upper-cased
    pub department: String,
    pub email: String,
    /// Mapped role label (lower snake case)
    pub role: String,
    pub designation: String,
    pub employee_id: String,
    pub phone: String,
    pub admin_notes: String,
    pub is_active: bool,
    pub is_verified: bool,
}

/// Normalize one raw row keyed by spreadsheet column header
pub fn normalize_row(raw: &Map<String, Value>) -> NormalizedRecord {
    let mut record = NormalizedRecord {
        is_active: true,
        is_verified: false,
        ..Default::default()
    };

    for (header, value) in raw {
        let text = cell_text(value);
        match canonical_header(header).as_str() {
            "firstname" => record.first_name = text,
            "lastname" => record.last_name = text,
            "department" | "departmentcode" | "dept" => {
                record.department = text.to_uppercase()
            }
            "email" | "emailaddress" => record.email = text,
            "role" | "staffrole" => record.role = text,
            "designation" | "jobtitle" => record.designation = text,
            "employeeid" | "empid" => record.employee_id = text,
            "phone" | "phonenumber" | "mobile" => record.phone = text,
            "adminnotes" | "notes" => record.admin_notes = text,
            _ => {}
        }
    }

    record.role = map_role_label(&record.role);
    record
}

/// Lower-case a header and strip everything that isn't alphanumeric, so
/// "First Name", " first_name " and "FIRSTNAME" all match.
fn canonical_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Extract the trimmed text of a cell; spreadsheets frequently deliver ids
/// and phone numbers as numbers.
fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// Map a free-text role label to its wire form: "Department HOD" becomes
/// `department_hod`, "Placement Staff" becomes `placement_staff`, a blank
/// label defaults to `other_staff`, anything else is lower-snake-cased and
/// left for the validator to reject.
fn map_role_label(label: &str) -> String {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return "other_staff".to_string();
    }
    trimmed
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| part.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_header_aliases_and_trimming() {
        let raw = row(&[
            ("First Name", json!("  Priya ")),
            ("LAST_NAME", json!("Sharma")),
            ("Department", json!("cse")),
            ("E-mail", json!("priya@college.edu")),
            ("Phone Number", json!("9876543210")),
        ]);
        let record = normalize_row(&raw);
        assert_eq!(record.first_name, "Priya");
        assert_eq!(record.last_name, "Sharma");
        assert_eq!(record.department, "CSE");
        assert_eq!(record.email, "priya@college.edu");
        assert_eq!(record.phone, "9876543210");
    }

    #[test]
    fn test_numeric_cells_become_text() {
        let raw = row(&[("Employee ID", json!(10023)), ("Phone", json!(9876543210u64))]);
        let record = normalize_row(&raw);
        assert_eq!(record.employee_id, "10023");
        assert_eq!(record.phone, "9876543210");
    }

    #[test]
    fn test_role_label_mapping() {
        assert_eq!(map_role_label("Department HOD"), "department_hod");
        assert_eq!(map_role_label("Placement Staff"), "placement_staff");
        assert_eq!(map_role_label(""), "other_staff");
        assert_eq!(map_role_label("  "), "other_staff");
        assert_eq!(map_role_label("Guest Lecturer"), "guest_lecturer");
    }

    #[test]
    fn test_defaults() {
        let record = normalize_row(&Map::new());
        assert!(record.is_active);
        assert!(!record.is_verified);
        assert_eq!(record.first_name, "");
        assert_eq!(record.role, "other_staff");
    }

    #[test]
    fn test_unknown_headers_ignored() {
        let raw = row(&[("Favourite Colour", json!("blue")), ("First Name", json!("A"))]);
        let record = normalize_row(&raw);
        assert_eq!(record.first_name, "A");
    }
}
