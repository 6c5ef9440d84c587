// ABOUTME: IAM principal (user name) validation.
// ABOUTME: Follows the IAM user name rules: 1-64 chars of [A-Za-z0-9+=,.@_-].

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PrincipalError {
    #[error("principal name cannot be empty")]
    Empty,

    #[error("principal name exceeds maximum length of 64 characters")]
    TooLong,

    #[error("invalid character in principal name: '{0}'")]
    InvalidChar(char),
}

/// IAM user deploy credentials are issued for unless configured otherwise.
pub const DEFAULT_PRINCIPAL: &str = "remotion-user";

/// The identity under which deploy-time credentials are issued.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Principal(String);

impl Default for Principal {
    fn default() -> Self {
        Self(DEFAULT_PRINCIPAL.to_string())
    }
}

impl Principal {
    pub fn new(value: &str) -> Result<Self, PrincipalError> {
        if value.is_empty() {
            return Err(PrincipalError::Empty);
        }

        if value.len() > 64 {
            return Err(PrincipalError::TooLong);
        }

        if let Some(c) = value
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && !"+=,.@_-".contains(*c))
        {
            return Err(PrincipalError::InvalidChar(c));
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Principal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Principal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Principal::new(&s).map_err(serde::de::Error::custom)
    }
}
