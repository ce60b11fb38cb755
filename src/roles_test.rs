use super::*;

// =============================================================
// Ordering
// =============================================================

#[test]
fn roles_are_ordered_by_privilege() {
    assert!(Role::Student < Role::Instructor);
    assert!(Role::Instructor < Role::Director);
    assert_eq!(Role::ALL.iter().max(), Some(&Role::Director));
}

// =============================================================
// Integer encoding
// =============================================================

#[test]
fn try_from_accepts_known_values() {
    assert_eq!(Role::try_from(0), Ok(Role::Student));
    assert_eq!(Role::try_from(1), Ok(Role::Instructor));
    assert_eq!(Role::try_from(2), Ok(Role::Director));
}

#[test]
fn try_from_rejects_out_of_range() {
    assert_eq!(Role::try_from(3), Err(UnknownRole(3)));
    assert_eq!(Role::try_from(-1), Err(UnknownRole(-1)));
}

#[test]
fn serde_uses_integer_form() {
    assert_eq!(serde_json::to_string(&Role::Director).unwrap(), "2");
    assert_eq!(serde_json::from_str::<Role>("1").unwrap(), Role::Instructor);
    assert!(serde_json::from_str::<Role>("7").is_err());
}

// =============================================================
// Names and routes
// =============================================================

#[test]
fn default_route_is_slash_name() {
    for role in Role::ALL {
        assert_eq!(role.default_route(), format!("/{}", role.name()));
    }
}

#[test]
fn display_matches_name() {
    assert_eq!(Role::Instructor.to_string(), "instructor");
}
