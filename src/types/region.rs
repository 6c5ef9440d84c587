// ABOUTME: Cloud region identifier validation.
// ABOUTME: Accepts identifiers shaped like "us-east-1" or "eu-central-2".

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

const MAX_LEN: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegionError {
    #[error("region cannot be empty")]
    Empty,

    #[error("region exceeds maximum length of 32 characters")]
    TooLong,

    #[error("region must start with a lowercase letter")]
    BadStart,

    #[error("region must contain at least one hyphen")]
    MissingHyphen,

    #[error("invalid character in region: '{0}'")]
    InvalidChar(char),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Region(String);

impl Region {
    pub fn new(value: &str) -> Result<Self, RegionError> {
        if value.is_empty() {
            return Err(RegionError::Empty);
        }

        if value.len() > MAX_LEN {
            return Err(RegionError::TooLong);
        }

        if !value.starts_with(|c: char| c.is_ascii_lowercase()) {
            return Err(RegionError::BadStart);
        }

        for c in value.chars() {
            if !c.is_ascii_lowercase() && !c.is_ascii_digit() && c != '-' {
                return Err(RegionError::InvalidChar(c));
            }
        }

        if !value.contains('-') {
            return Err(RegionError::MissingHyphen);
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Region {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Region {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Region::new(&s).map_err(serde::de::Error::custom)
    }
}
