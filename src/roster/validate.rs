//! Row validator
//!
//! Applies per-field rules in a fixed order, accumulating errors and
//! warnings rather than short-circuiting. A row with zero errors is eligible
//! for import regardless of warnings.

use serde::Serialize;
use std::collections::BTreeSet;

use super::normalize::NormalizedRecord;

/// Roles a roster row may carry after normalization
pub const ALLOWED_IMPORT_ROLES: [&str; 3] = ["department_hod", "placement_staff", "other_staff"];

/// Validation outcome for a single row. Transient; exists only for the
/// duration of one upload request.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowResult {
    /// 1-based spreadsheet row (first data row is 2, after the header)
    pub row_number: usize,
    pub data: NormalizedRecord,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub is_valid: bool,
}

/// Validate one normalized record against the known department code set
pub fn validate_row(
    record: NormalizedRecord,
    row_number: usize,
    known_codes: &BTreeSet<String>,
) -> RowResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    // 1. Required fields
    if record.first_name.is_empty() {
        errors.push("First name is required".to_string());
    }
    if record.last_name.is_empty() {
        errors.push("Last name is required".to_string());
    }
    if record.department.is_empty() {
        errors.push("Department is required".to_string());
    }
    if record.email.is_empty() {
        errors.push("Email is required".to_string());
    }

    // 2. Email shape
    if !record.email.is_empty() && !is_valid_email(&record.email) {
        errors.push(format!("Invalid email address '{}'", record.email));
    }

    // 3. Department must be a known code
    if !record.department.is_empty() && !known_codes.contains(&record.department) {
        let allowed: Vec<&str> = known_codes.iter().map(String::as_str).collect();
        errors.push(format!(
            "Unknown department code '{}' (valid codes: {})",
            record.department,
            allowed.join(", ")
        ));
    }

    // 4. Phone defects are warnings, not errors
    if !record.phone.is_empty()
        && (record.phone.len() != 10 || !record.phone.chars().all(|c| c.is_ascii_digit()))
    {
        warnings.push(format!(
            "Phone number '{}' should be exactly 10 digits",
            record.phone
        ));
    }

    // 5. Short employee ids are warnings
    if !record.employee_id.is_empty() && record.employee_id.len() < 3 {
        warnings.push(format!(
            "Employee ID '{}' is shorter than 3 characters",
            record.employee_id
        ));
    }

    // 6. Role must be one of the importable roles
    if !ALLOWED_IMPORT_ROLES.contains(&record.role.as_str()) {
        errors.push(format!(
            "Unsupported role '{}' (allowed: {})",
            record.role,
            ALLOWED_IMPORT_ROLES.join(", ")
        ));
    }

    let is_valid = errors.is_empty();
    RowResult {
        row_number,
        data: record,
        errors,
        warnings,
        is_valid,
    }
}

/// Minimal `local@domain.tld` shape check
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let Some((name, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !name.is_empty() && !tld.is_empty() && tld.chars().all(|c| c.is_ascii_alphabetic())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes() -> BTreeSet<String> {
        ["CSE", "ECE", "MECH"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn complete_record() -> NormalizedRecord {
        NormalizedRecord {
            first_name: "Priya".to_string(),
            last_name: "Sharma".to_string(),
            department: "CSE".to_string(),
            email: "priya@college.edu".to_string(),
            role: "other_staff".to_string(),
            phone: "9876543210".to_string(),
            employee_id: "EMP100".to_string(),
            is_active: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_complete_record_is_valid() {
        let result = validate_row(complete_record(), 2, &codes());
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_each_missing_required_field_one_error() {
        let record = NormalizedRecord {
            role: "other_staff".to_string(),
            ..Default::default()
        };
        let result = validate_row(record, 2, &codes());
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 4);
        assert!(result.errors.iter().any(|e| e.contains("First name")));
        assert!(result.errors.iter().any(|e| e.contains("Last name")));
        assert!(result.errors.iter().any(|e| e.contains("Department")));
        assert!(result.errors.iter().any(|e| e.contains("Email")));
    }

    #[test]
    fn test_unknown_department_lists_allowed_set() {
        let mut record = complete_record();
        record.department = "CIVIL".to_string();
        let result = validate_row(record, 3, &codes());
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("CIVIL"));
        assert!(result.errors[0].contains("CSE, ECE, MECH"));
    }

    #[test]
    fn test_malformed_phone_is_warning_only() {
        let record = NormalizedRecord {
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            department: "CSE".to_string(),
            email: "a@b.com".to_string(),
            phone: "123".to_string(),
            role: "other_staff".to_string(),
            ..Default::default()
        };
        let result = validate_row(record, 2, &codes());
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("123"));
    }

    #[test]
    fn test_short_employee_id_is_warning() {
        let mut record = complete_record();
        record.employee_id = "A1".to_string();
        let result = validate_row(record, 2, &codes());
        assert!(result.is_valid);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_unmapped_role_is_error() {
        let mut record = complete_record();
        record.role = "guest_lecturer".to_string();
        let result = validate_row(record, 2, &codes());
        assert!(!result.is_valid);
        assert!(result.errors[0].contains("guest_lecturer"));
        assert!(result.errors[0].contains("department_hod"));
    }

    #[test]
    fn test_malformed_email_is_error() {
        for email in ["no-at-sign", "a@b", "a @b.com", "@b.com", "a@b.c0m"] {
            let mut record = complete_record();
            record.email = email.to_string();
            let result = validate_row(record, 2, &codes());
            assert!(!result.is_valid, "expected '{}' to be rejected", email);
        }
    }

    #[test]
    fn test_errors_accumulate_in_order() {
        let record = NormalizedRecord {
            first_name: "A".to_string(),
            email: "bad-email".to_string(),
            department: "NOPE".to_string(),
            role: "mystery".to_string(),
            ..Default::default()
        };
        let result = validate_row(record, 5, &codes());
        assert_eq!(result.row_number, 5);
        // last name missing, bad email, unknown department, bad role
        assert_eq!(result.errors.len(), 4);
        assert!(result.errors[0].contains("Last name"));
        assert!(result.errors[1].contains("bad-email"));
        assert!(result.errors[2].contains("NOPE"));
        assert!(result.errors[3].contains("mystery"));
    }
}
