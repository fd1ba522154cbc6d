use std::fmt;

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Body sent back once the user row is stored.
pub const USER_CREATED: &str = "User created successfully";

/// The request body could not be read as a signup payload.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct DecodeError(#[from] serde_json::Error);

/// Request body for `POST /signup`.
///
/// The body must be a JSON object. Every field is optional and defaults to
/// the empty string, `null` included. Values are not checked for emptiness or
/// format. `id`, `is_verified` and `verification_code` are accepted on the
/// wire and dropped here, like any other unknown field. A repeated key keeps
/// its last value.
#[derive(Default)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl SignupRequest {
    pub fn decode(body: &[u8]) -> Result<Self, DecodeError> {
        let mut fields: Map<String, Value> = serde_json::from_slice(body)?;
        Ok(Self {
            username: take_string(&mut fields, "username")?,
            email: take_string(&mut fields, "email")?,
            password: take_string(&mut fields, "password")?,
        })
    }
}

impl fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn take_string(fields: &mut Map<String, Value>, key: &str) -> Result<String, DecodeError> {
    match fields.remove(key) {
        Some(value) => Ok(Option::<String>::deserialize(value)?.unwrap_or_default()),
        None => Ok(String::new()),
    }
}
