//! This file defines the log-in operation along with the routes for displaying the log-in page and
//! handling log-in requests.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error, endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
        log_in_form_container,
    },
    session::{
        SessionToken, cookie::set_session_cookie, db::create_session,
        redirect::normalize_redirect_url,
    },
    user::{User, get_user_by_credentials},
};

/// Check `username` and `password` against the stored users and start a new session on a match.
///
/// Passwords are compared as plain text. There is no lockout after failed attempts.
///
/// Returns `Ok(None)` and creates no session if the credentials do not match a user.
///
/// # Errors
/// Returns [Error::SqlError] if the user lookup or session insert failed.
pub fn log_in(
    username: &str,
    password: &str,
    connection: &Connection,
) -> Result<Option<(User, SessionToken)>, Error> {
    let Some(user) = get_user_by_credentials(username, password, connection)? else {
        return Ok(None);
    };

    let token = SessionToken::generate();
    create_session(&token, user.id, connection)?;

    Ok(Some((user, token)))
}

fn log_in_form(username: &str, error_message: Option<&str>, redirect_url: Option<&str>) -> Markup {
    html! {
        form
            method="post"
            action=(endpoints::LOG_IN_API)
            class="space-y-4 md:space-y-6"
        {
            @if let Some(redirect_url) = redirect_url {
                input type="hidden" name="redirect_url" value=(redirect_url);
            }

            div
            {
                label for="username" class=(FORM_LABEL_STYLE) { "Username" }

                input
                    type="text"
                    name="username"
                    id="username"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required
                    autofocus
                    value=(username);
            }

            div
            {
                label for="password" class=(FORM_LABEL_STYLE) { "Password" }

                input
                    type="password"
                    name="password"
                    id="password"
                    placeholder="••••••••"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required;

                @if let Some(error_message) = error_message
                {
                    p class="text-red-500 text-base" { (error_message) }
                }
            }

            button type="submit" id="submit-button" class=(BUTTON_PRIMARY_STYLE)
            {
                "Log in"
            }
        }
    }
}

fn log_in_view(username: &str, error_message: Option<&str>, redirect_url: Option<&str>) -> Markup {
    let form = log_in_form(username, error_message, redirect_url);
    let content = log_in_form_container("Log in to your account", &form);

    base("Log In", &content)
}

fn parse_redirect_url(raw_url: Option<&str>, source: &str) -> Option<String> {
    match raw_url.and_then(normalize_redirect_url) {
        Some(redirect_url) => Some(redirect_url),
        None => {
            if let Some(redirect_url) = raw_url {
                tracing::warn!("Invalid redirect URL from {source}: {redirect_url}");
            }
            None
        }
    }
}

/// Display the log-in page.
pub async fn get_log_in_page(Query(query): Query<RedirectQuery>) -> Response {
    let redirect_url = parse_redirect_url(query.redirect_url.as_deref(), "log-in query");

    log_in_view("", None, redirect_url.as_deref()).into_response()
}

/// The state needed to perform a login.
#[derive(Debug, Clone)]
pub struct LogInState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LogInState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LogInState> for Key {
    fn from_ref(state: &LogInState) -> Self {
        state.cookie_key.clone()
    }
}

pub const INVALID_CREDENTIALS_ERROR_MSG: &str = "Incorrect username or password.";

/// Handler for log-in requests via the POST method.
///
/// On a successful log-in request, the session cookie is set and the client is redirected to the
/// page they came from, or the menu.
/// Otherwise, the form is returned with an error message explaining the problem.
pub async fn post_log_in(
    State(state): State<LogInState>,
    jar: PrivateCookieJar,
    Form(user_data): Form<LogInData>,
) -> Response {
    let redirect_url = parse_redirect_url(user_data.redirect_url.as_deref(), "log-in form");

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let (user, token) = match log_in(&user_data.username, &user_data.password, &connection) {
        Ok(Some(session)) => session,
        Ok(None) => {
            tracing::info!("Failed log-in attempt for {:?}", user_data.username);
            return (
                StatusCode::UNAUTHORIZED,
                log_in_view(
                    &user_data.username,
                    Some(INVALID_CREDENTIALS_ERROR_MSG),
                    redirect_url.as_deref(),
                ),
            )
                .into_response();
        }
        Err(error) => {
            tracing::error!("Unhandled error while logging in: {error}");
            return error.into_response();
        }
    };

    tracing::info!("User {} logged in", user.id);

    let redirect_url = redirect_url.as_deref().unwrap_or(endpoints::ROOT);

    (set_session_cookie(jar, &token), Redirect::to(redirect_url)).into_response()
}

#[derive(Deserialize)]
pub struct RedirectQuery {
    pub redirect_url: Option<String>,
}

/// The raw data entered by the user in the log-in form.
#[derive(Clone, Serialize, Deserialize)]
pub struct LogInData {
    /// Username entered during log-in.
    pub username: String,

    /// Password entered during log-in.
    pub password: String,

    /// Optional URL to redirect to after logging in.
    /// Only accepted from the log-in form submission.
    pub redirect_url: Option<String>,
}

#[cfg(test)]
mod log_in_tests {
    use crate::{
        session::db::get_user_by_session_token, test_utils::get_test_connection,
        user::get_all_users,
    };

    use super::log_in;

    fn count_sessions(connection: &rusqlite::Connection) -> i64 {
        connection
            .query_row("SELECT COUNT(*) FROM session", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn seeded_credentials_log_in() {
        let connection = get_test_connection();

        let (user, token) = log_in("zagreus", "cerberus", &connection)
            .unwrap()
            .expect("want log-in to succeed");

        assert_eq!(user.username, "zagreus");
        assert_eq!(
            get_user_by_session_token(&token, &connection),
            Ok(Some(user))
        );
    }

    #[test]
    fn each_log_in_creates_new_session() {
        let connection = get_test_connection();

        let (_, first) = log_in("melinoe", "b4d3ec1", &connection).unwrap().unwrap();
        let (_, second) = log_in("melinoe", "b4d3ec1", &connection).unwrap().unwrap();

        assert_ne!(first, second);
        assert_eq!(count_sessions(&connection), 2);
    }

    #[test]
    fn wrong_password_fails_without_session() {
        let connection = get_test_connection();

        let got = log_in("zagreus", "hunter2", &connection);

        assert_eq!(got, Ok(None));
        assert_eq!(count_sessions(&connection), 0);
    }

    #[test]
    fn unknown_username_fails_without_session() {
        let connection = get_test_connection();
        assert!(
            get_all_users(&connection)
                .unwrap()
                .iter()
                .all(|user| user.username != "thanatos")
        );

        let got = log_in("thanatos", "cerberus", &connection);

        assert_eq!(got, Ok(None));
        assert_eq!(count_sessions(&connection), 0);
    }
}

#[cfg(test)]
mod log_in_endpoint_tests {
    use axum::{
        Router,
        extract::{FromRef, Query},
        http::{StatusCode, header::CONTENT_TYPE},
        routing::post,
    };
    use axum_test::TestServer;

    use crate::{
        endpoints,
        session::cookie::COOKIE_SESSION,
        test_utils::{assert_valid_html, get_test_app_state, parse_html_document},
    };

    use super::{
        INVALID_CREDENTIALS_ERROR_MSG, LogInState, RedirectQuery, get_log_in_page, post_log_in,
    };

    fn get_test_server() -> TestServer {
        let state = LogInState::from_ref(&get_test_app_state());
        let app = Router::new()
            .route(endpoints::LOG_IN_API, post(post_log_in))
            .with_state(state);

        TestServer::new(app)
    }

    #[tokio::test]
    async fn log_in_page_displays_form() {
        let response = get_log_in_page(Query(RedirectQuery { redirect_url: None })).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response
                .headers()
                .get(CONTENT_TYPE)
                .unwrap()
                .to_str()
                .unwrap()
                .starts_with("text/html")
        );

        let document = parse_html_document(response).await;
        assert_valid_html(&document);

        let form_selector = scraper::Selector::parse("form").unwrap();
        let forms = document.select(&form_selector).collect::<Vec<_>>();
        assert_eq!(forms.len(), 1, "want 1 form, got {}", forms.len());
        let form = forms.first().unwrap();
        assert_eq!(form.value().attr("action"), Some(endpoints::LOG_IN_API));
        assert_eq!(form.value().attr("method"), Some("post"));

        for selector in [
            "input[name=username]",
            "input[type=password]",
            "button[type=submit]",
        ] {
            let input_selector = scraper::Selector::parse(selector).unwrap();
            let inputs = form.select(&input_selector).collect::<Vec<_>>();
            assert_eq!(inputs.len(), 1, "want 1 {selector}, got {}", inputs.len());
        }
    }

    #[tokio::test]
    async fn log_in_page_preserves_redirect_url() {
        let redirect_url = "/transactions".to_string();
        let response = get_log_in_page(Query(RedirectQuery {
            redirect_url: Some(redirect_url.clone()),
        }))
        .await;

        let document = parse_html_document(response).await;
        let input_selector = scraper::Selector::parse("input[name=redirect_url]").unwrap();
        let input = document
            .select(&input_selector)
            .next()
            .expect("want a redirect_url input");
        assert_eq!(input.value().attr("value"), Some(redirect_url.as_str()));
    }

    #[tokio::test]
    async fn log_in_succeeds_with_valid_credentials() {
        let server = get_test_server();
        let form = [("username", "zagreus"), ("password", "cerberus")];

        let response = server.post(endpoints::LOG_IN_API).form(&form).await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), endpoints::ROOT);
        let cookie = response.cookie(COOKIE_SESSION);
        assert_eq!(cookie.name(), "cafego_session");
        assert!(!cookie.value().is_empty());
    }

    #[tokio::test]
    async fn log_in_redirects_to_requested_url() {
        let server = get_test_server();
        let form = [
            ("username", "zagreus"),
            ("password", "cerberus"),
            ("redirect_url", endpoints::TRANSACTIONS_VIEW),
        ];

        let response = server.post(endpoints::LOG_IN_API).form(&form).await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), endpoints::TRANSACTIONS_VIEW);
    }

    #[tokio::test]
    async fn log_in_falls_back_on_invalid_redirect_url() {
        let server = get_test_server();
        let form = [
            ("username", "zagreus"),
            ("password", "cerberus"),
            ("redirect_url", "https://example.com"),
        ];

        let response = server.post(endpoints::LOG_IN_API).form(&form).await;

        assert_eq!(response.header("location"), endpoints::ROOT);
    }

    #[tokio::test]
    async fn log_in_ignores_backslash_redirect_url() {
        let server = get_test_server();
        let form = [
            ("username", "zagreus"),
            ("password", "cerberus"),
            ("redirect_url", "/\\evil.com"),
        ];

        let response = server.post(endpoints::LOG_IN_API).form(&form).await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), endpoints::ROOT);
    }

    #[tokio::test]
    async fn log_in_fails_with_incorrect_password() {
        let server = get_test_server();
        let form = [("username", "zagreus"), ("password", "wrongpassword")];

        let response = server.post(endpoints::LOG_IN_API).form(&form).await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        let text = response.text();
        let document = scraper::Html::parse_document(&text);
        let error_selector = scraper::Selector::parse("p.text-red-500.text-base").unwrap();
        let error = document
            .select(&error_selector)
            .next()
            .expect("expected error message paragraph");
        assert_eq!(
            error.text().collect::<String>().trim(),
            INVALID_CREDENTIALS_ERROR_MSG
        );
        assert!(response.maybe_cookie(COOKIE_SESSION).is_none());
    }

    #[tokio::test]
    async fn log_in_fails_with_missing_credentials() {
        let server = get_test_server();

        server
            .post(endpoints::LOG_IN_API)
            .content_type("application/x-www-form-urlencoded")
            .await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }
}
