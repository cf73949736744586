//! Authentication middleware that resolves the session cookie to a user and redirects anonymous
//! clients to the log-in page.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    session::{
        cookie::get_session_token_from_cookies, db::get_user_by_session_token,
        redirect::build_log_in_redirect_url,
    },
    user::User,
};

/// The state needed for the auth middleware
#[derive(Clone)]
pub struct AuthState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AuthState> for Key {
    fn from_ref(state: &AuthState) -> Self {
        state.cookie_key.clone()
    }
}

/// Look up the user for the session cookie in `jar`.
///
/// Returns `Ok(None)` when there is no session cookie or the token does not match a session.
pub(crate) fn get_user_from_cookies(
    jar: &PrivateCookieJar,
    db_connection: &Mutex<Connection>,
) -> Result<Option<User>, Error> {
    let Some(token) = get_session_token_from_cookies(jar) else {
        return Ok(None);
    };

    let connection = db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_user_by_session_token(&token, &connection)
}

/// Middleware function that checks for a valid session cookie.
///
/// The user is placed into the request and then the request executed normally if the session is
/// valid, otherwise a redirect to the log-in page is returned.
///
/// **Note**: Route handlers can use the function argument `Extension(user): Extension<User>` to
/// receive the user.
pub async fn auth_guard(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    let log_in_redirect_url = build_log_in_redirect_url(&request);

    let (mut parts, body) = request.into_parts();
    let jar = match PrivateCookieJar::from_request_parts(&mut parts, &state).await {
        Ok(jar) => jar,
        Err(err) => {
            tracing::error!("Error getting cookie jar: {err:?}. Redirecting to log in page.");
            return Redirect::to(&log_in_redirect_url).into_response();
        }
    };

    let user = match get_user_from_cookies(&jar, &state.db_connection) {
        Ok(Some(user)) => user,
        Ok(None) => return Redirect::to(&log_in_redirect_url).into_response(),
        Err(error) => {
            tracing::error!("Could not look up session: {error}");
            return error.into_response();
        }
    };

    parts.extensions.insert(user);
    let request = Request::from_parts(parts, body);

    next.run(request).await
}
