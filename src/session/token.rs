//! Defines the opaque bearer token that identifies a logged-in session.

use std::fmt::Display;

use base64::{Engine, engine::general_purpose::STANDARD};
use rand::RngCore;

/// The number of random bytes in a session token.
const TOKEN_LENGTH_BYTES: usize = 16;

/// An unguessable token that proves the holder has logged in.
///
/// Tokens are 128 bits from the OS random number generator, encoded with standard base64.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    /// Generate a new random token.
    pub fn generate() -> Self {
        let mut bytes = [0u8; TOKEN_LENGTH_BYTES];
        rand::rng().fill_bytes(&mut bytes);

        Self(STANDARD.encode(bytes))
    }

    /// Wrap a token string received from a client.
    ///
    /// The string is not checked, unknown tokens simply do not match a session.
    pub fn new_unchecked(token: &str) -> Self {
        Self(token.to_owned())
    }

    /// The token as text, e.g. for storing in a cookie.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SessionToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
