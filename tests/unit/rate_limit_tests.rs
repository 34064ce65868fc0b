use saberpro_backend_lib::auth::AuthRateLimiter;
use std::time::Duration;

#[test]
fn test_lockout_engages_and_is_scoped_per_client() {
    let limiter = AuthRateLimiter::new(2, Duration::from_secs(300));

    limiter.record_failure("proxy-a");
    assert!(limiter.check("proxy-a"));
    limiter.record_failure("proxy-a");
    assert!(!limiter.check("proxy-a"));

    assert!(limiter.check("proxy-b"));
}

#[test]
fn test_successful_login_resets_the_counter() {
    let limiter = AuthRateLimiter::new(2, Duration::from_secs(300));

    limiter.record_failure("proxy-a");
    limiter.record_success("proxy-a");
    limiter.record_failure("proxy-a");
    assert!(limiter.check("proxy-a"));
}
