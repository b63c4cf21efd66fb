//! Enum types for CommandCenter entities
//!
//! Every enum serializes to the exact option label used by the record store,
//! so values round-trip through Airtable single-select fields unchanged.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// CLIENT CATEGORY
// ============================================================================

/// Relationship stage of a client studio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ClientCategory {
    #[serde(rename = "Previous Client")]
    PreviousClient,
    #[serde(rename = "Warm Lead")]
    WarmLead,
    #[default]
    #[serde(rename = "Cold Lead")]
    ColdLead,
}

impl ClientCategory {
    pub const ALL: [ClientCategory; 3] = [
        ClientCategory::PreviousClient,
        ClientCategory::WarmLead,
        ClientCategory::ColdLead,
    ];

    /// Convert to the label stored in the `Category` field.
    pub fn as_db_str(&self) -> &'static str {
        match self {
            ClientCategory::PreviousClient => "Previous Client",
            ClientCategory::WarmLead => "Warm Lead",
            ClientCategory::ColdLead => "Cold Lead",
        }
    }

    /// Parse from the stored label.
    pub fn from_db_str(s: &str) -> Result<Self, ParseEnumError> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_db_str() == s)
            .ok_or_else(|| ParseEnumError::new("client category", s))
    }
}

impl fmt::Display for ClientCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_db_str())
    }
}

impl FromStr for ClientCategory {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_db_str(s)
    }
}

// ============================================================================
// ALERT LEVEL
// ============================================================================

/// How overdue a client's last outreach is.
///
/// Variants are declared in severity order, so the derived `Ord` matches
/// [`AlertLevel::severity_rank`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub enum AlertLevel {
    #[default]
    None,
    #[serde(rename = "3 days")]
    ThreeDays,
    #[serde(rename = "1 week")]
    OneWeek,
    #[serde(rename = "3 weeks")]
    ThreeWeeks,
    #[serde(rename = "6 weeks")]
    SixWeeks,
}

impl AlertLevel {
    /// All alert levels, least severe first.
    pub const ALL: [AlertLevel; 5] = [
        AlertLevel::None,
        AlertLevel::ThreeDays,
        AlertLevel::OneWeek,
        AlertLevel::ThreeWeeks,
        AlertLevel::SixWeeks,
    ];

    pub fn as_db_str(&self) -> &'static str {
        match self {
            AlertLevel::None => "None",
            AlertLevel::ThreeDays => "3 days",
            AlertLevel::OneWeek => "1 week",
            AlertLevel::ThreeWeeks => "3 weeks",
            AlertLevel::SixWeeks => "6 weeks",
        }
    }

    pub fn from_db_str(s: &str) -> Result<Self, ParseEnumError> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_db_str() == s)
            .ok_or_else(|| ParseEnumError::new("alert level", s))
    }

    /// Severity rank: None=0, 3 days=1, 1 week=2, 3 weeks=3, 6 weeks=4.
    pub fn severity_rank(&self) -> u8 {
        match self {
            AlertLevel::None => 0,
            AlertLevel::ThreeDays => 1,
            AlertLevel::OneWeek => 2,
            AlertLevel::ThreeWeeks => 3,
            AlertLevel::SixWeeks => 4,
        }
    }
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_db_str())
    }
}

impl FromStr for AlertLevel {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_db_str(s)
    }
}

// ============================================================================
// INTERACTION TYPE
// ============================================================================

/// Channel used for an outreach interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum InteractionType {
    Phone,
    Email,
    Meeting,
    #[default]
    Other,
}

impl InteractionType {
    pub const ALL: [InteractionType; 4] = [
        InteractionType::Phone,
        InteractionType::Email,
        InteractionType::Meeting,
        InteractionType::Other,
    ];

    pub fn as_db_str(&self) -> &'static str {
        match self {
            InteractionType::Phone => "Phone",
            InteractionType::Email => "Email",
            InteractionType::Meeting => "Meeting",
            InteractionType::Other => "Other",
        }
    }

    pub fn from_db_str(s: &str) -> Result<Self, ParseEnumError> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_db_str() == s)
            .ok_or_else(|| ParseEnumError::new("interaction type", s))
    }
}

impl fmt::Display for InteractionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_db_str())
    }
}

impl FromStr for InteractionType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_db_str(s)
    }
}

// ============================================================================
// PARSE ERROR
// ============================================================================

/// Error when a string is not one of an enum's stored labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid {}: {}", self.kind, self.value)
    }
}

impl std::error::Error for ParseEnumError {}
