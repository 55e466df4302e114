//! Sport catalog
//!
//! The closed set of sports the service tracks. A sport's lowercase name is
//! both the cache key and the path segment of its line-provider feed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A tracked sport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sport {
    Soccer,
    Football,
    Baseball,
}

/// Errors from sport name parsing
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SportError {
    /// Name is not part of the catalog
    #[error("Unknown sport: {0}")]
    Unknown(String),
}

impl Sport {
    /// Every sport in the catalog
    pub const ALL: [Sport; 3] = [Sport::Soccer, Sport::Football, Sport::Baseball];

    /// Lowercase name used as cache key and feed path segment
    pub fn as_str(&self) -> &'static str {
        match self {
            Sport::Soccer => "soccer",
            Sport::Football => "football",
            Sport::Baseball => "baseball",
        }
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sport {
    type Err = SportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "soccer" => Ok(Sport::Soccer),
            "football" => Ok(Sport::Football),
            "baseball" => Ok(Sport::Baseball),
            _ => Err(SportError::Unknown(s.to_string())),
        }
    }
}
