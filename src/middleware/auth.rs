use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, Key, PrivateCookieJar, SameSite};
use time::Duration;

use crate::error::StockroomError;

/// Name of the encrypted cookie carrying the logged-in username.
pub const SESSION_COOKIE: &str = "stockroom_session";

/// An authenticated employee. Handlers that take this extractor reject
/// requests without a valid session cookie with `401`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeSession {
    pub username: String,
}

impl EmployeeSession {
    /// Read the session from a private cookie jar, if any.
    pub fn from_jar(jar: &PrivateCookieJar) -> Option<Self> {
        jar.get(SESSION_COOKIE)
            .map(|c| c.value().to_owned())
            .filter(|username| !username.is_empty())
            .map(|username| Self { username })
    }

    /// Store this session in the jar.
    pub fn store(&self, jar: PrivateCookieJar, secure: bool) -> PrivateCookieJar {
        jar.add(build_cookie(self.username.clone(), secure))
    }

    /// Remove any session from the jar.
    pub fn clear(jar: PrivateCookieJar) -> PrivateCookieJar {
        jar.remove(Cookie::build(SESSION_COOKIE).path("/").build())
    }
}

impl<S> FromRequestParts<S> for EmployeeSession
where
    S: Send + Sync,
    Key: FromRef<S>,
{
    type Rejection = StockroomError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = PrivateCookieJar::from_headers(&parts.headers, Key::from_ref(state));
        Self::from_jar(&jar).ok_or(StockroomError::Unauthenticated)
    }
}

fn build_cookie(username: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, username))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(Duration::hours(12))
        .build()
}
