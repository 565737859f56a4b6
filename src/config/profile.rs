//! User profile: name, track, cohort and chosen technology

use std::fmt;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::storage::{LocalStore, keys};

/// Curriculum path chosen at sign-up
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Track {
    /// Data Analyst
    #[default]
    #[serde(rename = "DA")]
    Da,
    /// Software Development Engineer in Test
    #[serde(rename = "SDET")]
    Sdet,
    /// Developer
    #[serde(rename = "DVLPR")]
    Dvlpr,
}

impl Track {
    /// Wire code for this track
    pub fn code(&self) -> &'static str {
        match self {
            Self::Da => "DA",
            Self::Sdet => "SDET",
            Self::Dvlpr => "DVLPR",
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Da => "Data Analyst",
            Self::Sdet => "Software Development Engineer in Test",
            Self::Dvlpr => "Developer",
        }
    }

    /// Parse a track code (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "DA" => Some(Self::Da),
            "SDET" => Some(Self::Sdet),
            "DVLPR" => Some(Self::Dvlpr),
            _ => None,
        }
    }

    /// All tracks in display order
    pub fn all() -> &'static [Track] {
        &[Self::Da, Self::Sdet, Self::Dvlpr]
    }

    /// Next track in display order, wrapping
    pub fn next(&self) -> Self {
        match self {
            Self::Da => Self::Sdet,
            Self::Sdet => Self::Dvlpr,
            Self::Dvlpr => Self::Da,
        }
    }

    /// Previous track in display order, wrapping
    pub fn previous(&self) -> Self {
        match self {
            Self::Da => Self::Dvlpr,
            Self::Sdet => Self::Da,
            Self::Dvlpr => Self::Sdet,
        }
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.code(), self.display_name())
    }
}

/// Technology the daily questions are drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Technology {
    Sql,
    Python,
}

impl Technology {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Sql => "SQL",
            Self::Python => "Python",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "sql" => Some(Self::Sql),
            "python" | "py" => Some(Self::Python),
            _ => None,
        }
    }
}

/// Persisted profile record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub track: Track,
    pub batch_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technology: Option<Technology>,
}

impl UserProfile {
    pub fn new(name: impl Into<String>, track: Track, batch_code: impl Into<String>) -> Self {
        Self { name: name.into(), track, batch_code: batch_code.into(), technology: None }
    }

    /// Load the profile, if one was saved
    pub fn load(store: &LocalStore) -> Option<Self> {
        store.get_json(keys::PROFILE)
    }

    /// Overwrite the stored profile
    pub fn save(&self, store: &mut LocalStore) -> Result<()> {
        store.set_json(keys::PROFILE, self)
    }
}
