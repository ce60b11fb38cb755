use super::*;

#[test]
fn event_names_match_wire_names() {
    let email = "a@miamioh.edu".to_owned();
    let cases = [
        (
            AnalyticsEvent::AttemptedAccess { to_route: "/director".into(), email: email.clone(), role: Role::Student },
            "attempted_access",
        ),
        (AnalyticsEvent::RouteChange { to_route: "/".into(), from_route: "/student".into() }, "route_change"),
        (AnalyticsEvent::NonInstitutionalEmail { email: email.clone() }, "non_miami_email"),
        (AnalyticsEvent::UnauthorizedUser { email: email.clone() }, "unauthorized_user"),
        (AnalyticsEvent::Login { role: Role::Student, email: email.clone() }, "student_login"),
        (AnalyticsEvent::Login { role: Role::Director, email }, "director_login"),
    ];
    for (event, name) in cases {
        assert_eq!(event.name(), name);
    }
}

#[test]
fn attempted_access_params_include_route_email_and_role() {
    let event = AnalyticsEvent::AttemptedAccess {
        to_route: "/director?tab=1".into(),
        email: "s@miamioh.edu".into(),
        role: Role::Student,
    };
    assert_eq!(
        event.params(),
        serde_json::json!({ "to_route": "/director?tab=1", "email": "s@miamioh.edu", "role": 0 })
    );
}

#[test]
fn login_params_carry_only_email() {
    let event = AnalyticsEvent::Login { role: Role::Instructor, email: "i@miamioh.edu".into() };
    assert_eq!(event.params(), serde_json::json!({ "email": "i@miamioh.edu" }));
}

#[test]
fn tracing_sink_accepts_events() {
    TracingAnalytics.log_event(AnalyticsEvent::UnauthorizedUser { email: "x@miamioh.edu".into() });
}
