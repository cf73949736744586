//! Defines functions for storing the session token in an encrypted cookie.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};

use crate::session::SessionToken;

/// The name of the cookie that holds the session token.
pub(crate) const COOKIE_SESSION: &str = "cafego_session";

/// Add the session cookie to the cookie jar, indicating that a user is logged in.
///
/// Sessions do not expire, so the cookie lasts until the browser is closed.
///
/// Returns the cookie jar with the cookie added.
pub(crate) fn set_session_cookie(jar: PrivateCookieJar, token: &SessionToken) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_SESSION, token.as_str().to_owned()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax),
    )
}

/// Get the session token from the cookie jar.
///
/// Returns `None` if the cookie is missing or could not be decrypted.
pub(crate) fn get_session_token_from_cookies(jar: &PrivateCookieJar) -> Option<SessionToken> {
    jar.get(COOKIE_SESSION)
        .map(|cookie| SessionToken::new_unchecked(cookie.value_trimmed()))
}
