//! Mock session helpers for router tests.
//!
//! Mints a real signed session token so requests pass through the same
//! `Identity` extractor production traffic does.

use axum::http::{HeaderMap, HeaderValue, header};
use bazaar_auth_types::cookie::BAZAAR_SESSION;
use bazaar_auth_types::token::issue_session_token;
use bazaar_domain::user::UserRole;
use uuid::Uuid;

/// Secret shared by `MockAuth` and test router state.
pub const TEST_SESSION_SECRET: &str = "bazaar-test-session-secret";

/// Configurable identity injected into test requests.
pub struct MockAuth {
    pub user_id: Uuid,
    pub role: UserRole,
}

impl MockAuth {
    pub fn new(user_id: Uuid, role: UserRole) -> Self {
        Self { user_id, role }
    }

    pub fn customer() -> Self {
        Self::new(Uuid::now_v7(), UserRole::Customer)
    }

    pub fn admin() -> Self {
        Self::new(Uuid::now_v7(), UserRole::Admin)
    }

    /// `Cookie` header value carrying a session valid for one hour.
    pub fn cookie(&self) -> String {
        let token = issue_session_token(self.user_id, self.role, 3600, TEST_SESSION_SECRET)
            .expect("failed to sign test session token");
        format!("{BAZAAR_SESSION}={token}")
    }

    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(
            header::COOKIE,
            HeaderValue::from_str(&self.cookie()).expect("cookie is a valid header value"),
        );
        map
    }
}
