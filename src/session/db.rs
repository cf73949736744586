//! Database operations for sessions.

use rusqlite::{Connection, OptionalExtension};

use crate::{
    Error,
    session::SessionToken,
    user::{User, UserID, map_row},
};

/// Create the session table.
///
/// A user may have any number of sessions and sessions never expire.
pub fn create_session_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS session (
            token TEXT NOT NULL,
            user_id INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_session_token ON session(token);",
    )?;

    Ok(())
}

/// Associate `token` with the user `user_id`.
///
/// # Errors
/// Returns [Error::SqlError] if the insert failed.
pub fn create_session(
    token: &SessionToken,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO session (token, user_id) VALUES (?1, ?2)",
        (token.as_str(), user_id.as_i64()),
    )?;

    Ok(())
}

/// Get the user that owns the session `token`.
///
/// Returns `Ok(None)` if the token is empty or does not belong to a session.
///
/// # Errors
/// Returns [Error::SqlError] if the query failed.
pub fn get_user_by_session_token(
    token: &SessionToken,
    connection: &Connection,
) -> Result<Option<User>, Error> {
    if token.as_str().is_empty() {
        return Ok(None);
    }

    connection
        .prepare(
            "SELECT user.id, user.username, user.password
            FROM session
            INNER JOIN user ON session.user_id = user.id
            WHERE session.token = :token
            LIMIT 1",
        )?
        .query_row(&[(":token", token.as_str())], map_row)
        .optional()
        .map_err(Error::from)
}
