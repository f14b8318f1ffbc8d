//! Data structures for authentication-related entities.
//!
//! This module defines the login and registration payloads, the role labels
//! granted by the server, and the identity response returned by the login and
//! refresh endpoints, normalized into the shape the rest of the client uses.

use crate::session::store::SessionIdentity;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use validator::Validate;

/// Login request payload
#[derive(Debug, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Registration request payload
#[derive(Debug, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    #[validate(email(message = "A valid email is required"))]
    pub email: String,
}

/// Authorization label granted to an identity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Admin,
}

impl FromStr for Role {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.to_lowercase().as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("Invalid role: {}", input)),
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

/// Parses a comma-joined role string ("user,admin") into role labels.
pub fn roles_from_joined(joined: &str) -> Result<Vec<Role>, String> {
    joined
        .split(',')
        .map(|label| label.trim())
        .filter(|label| !label.is_empty())
        .map(Role::from_str)
        .collect()
}

/// Roles as the server may deliver them: a proper array in current responses,
/// a single comma-joined string in older ones.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawRoles {
    Joined(String),
    Listed(Vec<String>),
}

pub fn deserialize_roles<'de, D>(deserializer: D) -> Result<Vec<Role>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match RawRoles::deserialize(deserializer)? {
        RawRoles::Joined(joined) => roles_from_joined(&joined).map_err(Error::custom),
        RawRoles::Listed(labels) => labels
            .iter()
            .map(|label| Role::from_str(label).map_err(Error::custom))
            .collect(),
    }
}

/// Identity payload returned by the login and refresh endpoints
#[derive(Debug, Deserialize)]
pub struct IdentityResponse {
    pub id: i64,
    pub access_token: String,
    #[serde(rename = "user")]
    pub username: String,
    #[serde(deserialize_with = "deserialize_roles")]
    pub roles: Vec<Role>,
}

impl IdentityResponse {
    pub fn into_identity(self) -> SessionIdentity {
        SessionIdentity {
            username: self.username,
            user_id: self.id,
            access_token: self.access_token,
            roles: self.roles,
        }
    }
}
