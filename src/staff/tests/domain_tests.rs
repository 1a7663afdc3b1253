//! Unit tests for roles, capabilities and actors.

use crate::staff::domain::{
    Actor, Capability, CapabilitySet, DisplayName, EmployeeId, PermissionDenied, Role,
    StaffDomainError,
};
use rstest::rstest;

fn actor(id: i64, role: Role, developer_mode: bool) -> Actor {
    Actor::new(
        EmployeeId::new(id).expect("valid id"),
        DisplayName::new("Tester").expect("valid name"),
        role,
        role.capabilities(developer_mode),
    )
}

#[rstest]
#[case(0)]
#[case(-12)]
fn employee_id_rejects_non_positive_values(#[case] value: i64) {
    assert_eq!(
        EmployeeId::new(value),
        Err(StaffDomainError::InvalidEmployeeId(value))
    );
}

#[rstest]
#[case("1672989849", Some(1_672_989_849))]
#[case(" 42 ", Some(42))]
#[case("andy", None)]
#[case("-3", None)]
fn employee_id_parses_from_text(#[case] raw: &str, #[case] expected: Option<i64>) {
    let parsed = raw.parse::<EmployeeId>().ok().map(EmployeeId::value);
    assert_eq!(parsed, expected);
}

#[test]
fn display_name_is_trimmed_and_required() {
    assert_eq!(
        DisplayName::new("  Andy ").map(|name| name.as_str().to_owned()),
        Ok("Andy".to_owned())
    );
    assert_eq!(DisplayName::new("   "), Err(StaffDomainError::EmptyDisplayName));
}

#[rstest]
#[case("employee", Role::Employee)]
#[case("Director", Role::Director)]
#[case("DEV", Role::Developer)]
#[case("developer", Role::Developer)]
fn role_parses_case_insensitively(#[case] raw: &str, #[case] expected: Role) {
    assert_eq!(Role::try_from(raw), Ok(expected));
}

#[test]
fn role_rejects_unknown_names() {
    assert!(Role::try_from("generic").is_err());
}

#[rstest]
#[case(Role::Employee, false, Capability::StartJob, true)]
#[case(Role::Employee, false, Capability::UploadPhoto, true)]
#[case(Role::Employee, false, Capability::AssignJob, false)]
#[case(Role::Employee, false, Capability::OverrideTransition, false)]
#[case(Role::Director, false, Capability::OverrideTransition, true)]
#[case(Role::Director, false, Capability::ViewDashboard, true)]
#[case(Role::Developer, false, Capability::OverrideTransition, false)]
#[case(Role::Developer, false, Capability::StartJob, true)]
#[case(Role::Developer, true, Capability::OverrideTransition, true)]
#[case(Role::Developer, true, Capability::CreateJob, true)]
fn role_capabilities_follow_developer_mode(
    #[case] role: Role,
    #[case] developer_mode: bool,
    #[case] capability: Capability,
    #[case] expected: bool,
) {
    assert_eq!(
        role.capabilities(developer_mode).contains(capability),
        expected
    );
}

#[test]
fn capability_set_adds_and_removes() {
    let set = CapabilitySet::EMPTY
        .with(Capability::AddNote)
        .with(Capability::StartJob)
        .without(Capability::AddNote);
    assert!(set.contains(Capability::StartJob));
    assert!(!set.contains(Capability::AddNote));
    assert!(CapabilitySet::EMPTY.is_empty());
}

#[test]
fn require_reports_missing_capability() {
    let employee = actor(10, Role::Employee, false);
    assert_eq!(
        employee.require(Capability::CreateJob),
        Err(PermissionDenied::MissingCapability {
            employee_id: employee.employee_id(),
            capability: Capability::CreateJob,
        })
    );
    assert!(employee.require(Capability::CompleteJob).is_ok());
}

#[test]
fn employees_may_only_touch_their_own_jobs() {
    let employee = actor(10, Role::Employee, false);
    let other = EmployeeId::new(11).expect("valid id");

    assert!(employee.require_assignee(Some(employee.employee_id())).is_ok());
    assert!(employee.require_assignee(Some(other)).is_err());
    assert!(employee.require_assignee(None).is_err());
}

#[test]
fn directors_may_touch_any_job() {
    let director = actor(20, Role::Director, false);
    let other = EmployeeId::new(11).expect("valid id");

    assert!(director.require_assignee(Some(other)).is_ok());
    assert!(director.require_assignee(None).is_ok());
}
