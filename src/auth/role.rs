//! Role and capability model
//!
//! Roles are a closed enum with a fixed capability table, so an unknown role
//! string fails at the parse boundary instead of leaking into comparisons.

use serde::{Deserialize, Serialize};

/// All roles known to the system
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    PlacementDirector,
    PlacementStaff,
    DepartmentHod,
    OtherStaff,
    Student,
}

/// Things a role is allowed to do
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capability {
    ManageAdministrators,
    ManageDepartments,
    ManageCourseCategories,
    ManageProfiles,
    BulkImport,
    ViewReports,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::PlacementDirector => "placement_director",
            Role::PlacementStaff => "placement_staff",
            Role::DepartmentHod => "department_hod",
            Role::OtherStaff => "other_staff",
            Role::Student => "student",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(Role::Admin),
            "placement_director" => Some(Role::PlacementDirector),
            "placement_staff" => Some(Role::PlacementStaff),
            "department_hod" => Some(Role::DepartmentHod),
            "other_staff" => Some(Role::OtherStaff),
            "student" => Some(Role::Student),
            _ => None,
        }
    }

    /// Capability table. Admin holds everything; the director everything except
    /// administrator management; HOD and placement staff manage profiles only
    /// (scoped to their own department by the middleware/handlers).
    pub fn capabilities(&self) -> &'static [Capability] {
        use Capability::*;
        match self {
            Role::Admin => &[
                ManageAdministrators,
                ManageDepartments,
                ManageCourseCategories,
                ManageProfiles,
                BulkImport,
                ViewReports,
            ],
            Role::PlacementDirector => &[
                ManageDepartments,
                ManageCourseCategories,
                ManageProfiles,
                BulkImport,
                ViewReports,
            ],
            Role::PlacementStaff => &[ManageProfiles, ViewReports],
            Role::DepartmentHod => &[ManageProfiles, ViewReports],
            Role::OtherStaff => &[],
            Role::Student => &[],
        }
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    /// Roles whose actions are restricted to their own department
    pub fn is_department_scoped(&self) -> bool {
        matches!(self, Role::DepartmentHod | Role::PlacementStaff)
    }

    /// Roles that require a department on the owning record
    pub fn requires_department(&self) -> bool {
        matches!(
            self,
            Role::PlacementDirector | Role::PlacementStaff | Role::DepartmentHod
        )
    }

    /// Roles eligible to be a department's placement staff reference
    pub fn can_be_placement_staff(&self) -> bool {
        matches!(self, Role::PlacementStaff | Role::PlacementDirector)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrip() {
        for role in [
            Role::Admin,
            Role::PlacementDirector,
            Role::PlacementStaff,
            Role::DepartmentHod,
            Role::OtherStaff,
            Role::Student,
        ] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("superuser"), None);
        assert_eq!(Role::parse("Admin"), None);
    }

    #[test]
    fn test_admin_has_everything() {
        use Capability::*;
        for cap in [
            ManageAdministrators,
            ManageDepartments,
            ManageCourseCategories,
            ManageProfiles,
            BulkImport,
            ViewReports,
        ] {
            assert!(Role::Admin.can(cap));
        }
    }

    #[test]
    fn test_director_cannot_manage_administrators() {
        assert!(!Role::PlacementDirector.can(Capability::ManageAdministrators));
        assert!(Role::PlacementDirector.can(Capability::ManageDepartments));
    }

    #[test]
    fn test_students_have_no_capabilities() {
        assert!(Role::Student.capabilities().is_empty());
        assert!(Role::OtherStaff.capabilities().is_empty());
    }

    #[test]
    fn test_department_scoping() {
        assert!(Role::DepartmentHod.is_department_scoped());
        assert!(Role::PlacementStaff.is_department_scoped());
        assert!(!Role::Admin.is_department_scoped());
    }

    #[test]
    fn test_placement_staff_eligibility() {
        assert!(Role::PlacementStaff.can_be_placement_staff());
        assert!(Role::PlacementDirector.can_be_placement_staff());
        assert!(!Role::Student.can_be_placement_staff());
        assert!(!Role::DepartmentHod.can_be_placement_staff());
    }

    #[test]
    fn test_requires_department() {
        assert!(Role::DepartmentHod.requires_department());
        assert!(Role::PlacementDirector.requires_department());
        assert!(!Role::Admin.requires_department());
        assert!(!Role::Student.requires_department());
    }
}
