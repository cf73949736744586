//! Code for creating the user table, seeding it and fetching users from the database.

use std::fmt::Display;

use rusqlite::{Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::Error;

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A customer of the cafe.
///
/// Passwords are stored and compared as plain text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The name the user logs in with.
    pub username: String,
    /// The user's password.
    pub password: String,
}

/// The users inserted into an empty database.
pub(crate) const SEED_USERS: [(&str, &str); 2] = [("zagreus", "cerberus"), ("melinoe", "b4d3ec1")];

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                username TEXT NOT NULL,
                password TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new user into the database.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn create_user(username: &str, password: &str, connection: &Connection) -> Result<User, Error> {
    connection.execute(
        "INSERT INTO user (username, password) VALUES (?1, ?2)",
        (username, password),
    )?;

    let id = UserID::new(connection.last_insert_rowid());

    Ok(User {
        id,
        username: username.to_owned(),
        password: password.to_owned(),
    })
}

/// Insert the default users if the user table is empty.
///
/// Returns the number of users inserted.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn seed_users(connection: &Connection) -> Result<usize, Error> {
    if count_users(connection)? > 0 {
        return Ok(0);
    }

    for (username, password) in SEED_USERS {
        create_user(username, password, connection)?;
    }

    Ok(SEED_USERS.len())
}

/// Get every user in database iteration order.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn get_all_users(connection: &Connection) -> Result<Vec<User>, Error> {
    connection
        .prepare("SELECT id, username, password FROM user")?
        .query_map([], map_row)?
        .map(|maybe_user| maybe_user.map_err(Error::from))
        .collect()
}

/// Get the user with the exact `username` and `password`.
///
/// Returns `Ok(None)` if no user matches.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn get_user_by_credentials(
    username: &str,
    password: &str,
    connection: &Connection,
) -> Result<Option<User>, Error> {
    connection
        .prepare(
            "SELECT id, username, password FROM user
            WHERE username = :username AND password = :password
            LIMIT 1",
        )?
        .query_row(
            &[(":username", username), (":password", password)],
            map_row,
        )
        .optional()
        .map_err(Error::from)
}

/// Get the number of users in the database.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn count_users(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM user;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Map a row of `id, username, password` to a [User].
pub(crate) fn map_row(row: &Row) -> Result<User, rusqlite::Error> {
    Ok(User {
        id: UserID::new(row.get(0)?),
        username: row.get(1)?,
        password: row.get(2)?,
    })
}
