//! Session cookie identity extractor.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts, OptionalFromRequestParts};
use axum_extra::extract::cookie::CookieJar;
use bazaar_domain::user::{Actor, UserRole};
use http::StatusCode;
use http::request::Parts;
use uuid::Uuid;

use crate::cookie::BAZAAR_SESSION;
use crate::token::validate_session_token;

/// HS256 secret used to validate session cookies. Pulled out of the router
/// state via [`FromRef`].
#[derive(Clone)]
pub struct SessionSecret(pub Arc<str>);

impl SessionSecret {
    pub fn new(secret: impl Into<Arc<str>>) -> Self {
        Self(secret.into())
    }
}

/// Authenticated caller, read from the `bazaar_session` cookie.
///
/// Returns 401 if the cookie is absent or fails validation. Role
/// enforcement (403) is done by use cases through [`Actor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub role: UserRole,
}

impl Identity {
    pub fn actor(&self) -> Actor {
        Actor::new(self.user_id, self.role)
    }
}

fn read_identity(parts: &Parts, secret: &SessionSecret) -> Option<Identity> {
    let jar = CookieJar::from_headers(&parts.headers);
    let value = jar.get(BAZAAR_SESSION)?.value().to_owned();
    match validate_session_token(&value, &secret.0) {
        Ok(info) => Some(Identity {
            user_id: info.user_id,
            role: info.role,
        }),
        Err(e) => {
            tracing::debug!(error = %e, "rejected session cookie");
            None
        }
    }
}

impl<S> FromRequestParts<S> for Identity
where
    SessionSecret: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    // Read synchronously, then return a 'static future (axum-core 0.5 signature).
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let identity = read_identity(parts, &SessionSecret::from_ref(state));
        async move { identity.ok_or(StatusCode::UNAUTHORIZED) }
    }
}

impl<S> OptionalFromRequestParts<S> for Identity
where
    SessionSecret: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Option<Self>, Self::Rejection>> + Send {
        let identity = read_identity(parts, &SessionSecret::from_ref(state));
        async move { Ok(identity) }
    }
}
