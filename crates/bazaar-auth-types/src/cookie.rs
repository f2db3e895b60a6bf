//! Session cookie builders.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

/// Cookie name for the session token.
pub const BAZAAR_SESSION: &str = "bazaar_session";

/// Default session lifetime in seconds (7 days).
pub const SESSION_TTL_SECS: u64 = 604800;

fn session_cookie(value: String, domain: String, max_age: Duration) -> Cookie<'static> {
    let mut builder = Cookie::build((BAZAAR_SESSION, value))
        .path("/")
        .max_age(max_age)
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax);
    if !domain.is_empty() {
        builder = builder.domain(domain);
    }
    builder.build()
}

/// Set the session cookie on the jar.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use bazaar_auth_types::cookie::{set_session_cookie, BAZAAR_SESSION};
///
/// let jar = CookieJar::new();
/// let jar = set_session_cookie(jar, "token_value".to_string(), "example.com".to_string(), 3600);
/// let cookie = jar.get(BAZAAR_SESSION).unwrap();
/// assert_eq!(cookie.path(), Some("/"));
/// assert_eq!(cookie.domain(), Some("example.com"));
/// assert_eq!(cookie.max_age(), Some(time::Duration::seconds(3600)));
/// assert!(cookie.http_only().unwrap_or(false));
/// assert!(cookie.secure().unwrap_or(false));
/// ```
pub fn set_session_cookie(jar: CookieJar, value: String, domain: String, ttl_secs: u64) -> CookieJar {
    let max_age = Duration::seconds(i64::try_from(ttl_secs).unwrap_or(i64::MAX));
    jar.add(session_cookie(value, domain, max_age))
}

/// Clear the session cookie by setting Max-Age to 0.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use bazaar_auth_types::cookie::{clear_session_cookie, set_session_cookie, BAZAAR_SESSION};
///
/// let jar = CookieJar::new();
/// let jar = set_session_cookie(jar, "a".to_string(), "example.com".to_string(), 3600);
/// let jar = clear_session_cookie(jar, "example.com".to_string());
/// let cookie = jar.get(BAZAAR_SESSION).unwrap();
/// assert_eq!(cookie.value(), "");
/// assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
/// ```
pub fn clear_session_cookie(jar: CookieJar, domain: String) -> CookieJar {
    jar.add(session_cookie(String::new(), domain, Duration::ZERO))
}
