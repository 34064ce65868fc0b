use saberpro_backend_lib::auth::gate::{decide, RouteDecision};
use saberpro_common::{Role, SessionClaims};
use uuid::Uuid;

fn claims(role: Role) -> SessionClaims {
    SessionClaims {
        id: Uuid::new_v4(),
        name: "Test".to_string(),
        email: "test@school.edu".to_string(),
        role,
        is_onboarded: true,
    }
}

#[test]
fn test_student_denied_admin_allowed_student_area() {
    let student = claims(Role::Student);
    assert_eq!(
        decide(Some(&student), "/admin/subjects"),
        RouteDecision::Forbidden
    );
    assert_eq!(
        decide(Some(&student), "/student/homework"),
        RouteDecision::Allow
    );
}

#[test]
fn test_anonymous_can_reach_login_and_student_check() {
    assert_eq!(decide(None, "/login"), RouteDecision::Allow);
    assert_eq!(
        decide(None, "/api/auth/check-student"),
        RouteDecision::Allow
    );
}

#[test]
fn test_anonymous_page_requests_redirect() {
    assert_eq!(decide(None, "/student/homework"), RouteDecision::RedirectToLogin);
    assert_eq!(decide(None, "/"), RouteDecision::RedirectToLogin);
}

#[test]
fn test_exemptions_precede_the_session_check() {
    // Static assets are reachable even with no session at all.
    assert_eq!(decide(None, "/_assets/logo.svg"), RouteDecision::Allow);
    assert_eq!(decide(None, "/favicon.ico"), RouteDecision::Allow);
}

#[test]
fn test_superadmin_counts_as_admin() {
    let superadmin = claims(Role::SuperAdmin);
    assert_eq!(decide(Some(&superadmin), "/admin"), RouteDecision::Allow);

    let teacher = claims(Role::Teacher);
    assert_eq!(decide(Some(&teacher), "/admin"), RouteDecision::Forbidden);
}
