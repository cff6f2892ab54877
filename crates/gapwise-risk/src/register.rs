//! # Risk Register
//!
//! Organisation-level risks tracked independently of any assessment. Each
//! entry rates impact and likelihood on a 1–5 scale; the score is their
//! product (1–25) and the level is banded from the score:
//!
//! | Score | Level |
//! |-------|-------|
//! | 1–4 | Low |
//! | 5–9 | Medium |
//! | 10–14 | High |
//! | 15–25 | Critical |
//!
//! Score and level are derived fields. They are recomputed on every create
//! and update and cannot be set directly.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Lowest valid impact or likelihood rating.
pub const MIN_RATING: u8 = 1;
/// Highest valid impact or likelihood rating.
pub const MAX_RATING: u8 = 5;
/// Maximum title length in characters.
pub const MAX_TITLE_LEN: usize = 200;

/// Register validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegisterError {
    #[error("{field} must be between 1 and 5, got {value}")]
    RatingOutOfRange { field: &'static str, value: u8 },

    #[error("title must not be empty")]
    EmptyTitle,

    #[error("title exceeds 200 characters (got {0})")]
    TitleTooLong(usize),

    #[error("unknown risk status: {0:?}")]
    UnknownStatus(String),

    #[error("unknown risk level: {0:?}")]
    UnknownLevel(String),
}

/// Severity band of a register entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Band a 1–25 score.
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=4 => Self::Low,
            5..=9 => Self::Medium,
            10..=14 => Self::High,
            _ => Self::Critical,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = RegisterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            other => Err(RegisterError::UnknownLevel(other.to_string())),
        }
    }
}

/// Treatment status of a register entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskStatus {
    #[default]
    Open,
    Mitigating,
    Accepted,
    Closed,
}

impl RiskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Mitigating => "mitigating",
            Self::Accepted => "accepted",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for RiskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskStatus {
    type Err = RegisterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "mitigating" => Ok(Self::Mitigating),
            "accepted" => Ok(Self::Accepted),
            "closed" => Ok(Self::Closed),
            other => Err(RegisterError::UnknownStatus(other.to_string())),
        }
    }
}

/// Input for creating a register entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRisk {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    pub impact: u8,
    pub likelihood: u8,
    #[serde(default)]
    pub status: RiskStatus,
    #[serde(default)]
    pub mitigation: Option<String>,
}

/// Partial update of a register entry. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub impact: Option<u8>,
    #[serde(default)]
    pub likelihood: Option<u8>,
    #[serde(default)]
    pub status: Option<RiskStatus>,
    #[serde(default)]
    pub mitigation: Option<String>,
}

/// A stored register entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskEntry {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub owner: Option<String>,
    pub impact: u8,
    pub likelihood: u8,
    pub score: u8,
    pub level: RiskLevel,
    pub status: RiskStatus,
    pub mitigation: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn check_rating(field: &'static str, value: u8) -> Result<u8, RegisterError> {
    if (MIN_RATING..=MAX_RATING).contains(&value) {
        Ok(value)
    } else {
        Err(RegisterError::RatingOutOfRange { field, value })
    }
}

fn check_title(title: &str) -> Result<String, RegisterError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(RegisterError::EmptyTitle);
    }
    let len = trimmed.chars().count();
    if len > MAX_TITLE_LEN {
        return Err(RegisterError::TitleTooLong(len));
    }
    Ok(trimmed.to_string())
}

impl RiskEntry {
    /// Validate input and create a new entry with a fresh id.
    ///
    /// # Errors
    ///
    /// Returns [`RegisterError`] if the title is blank or too long, or a
    /// rating is outside 1–5.
    pub fn create(input: NewRisk) -> Result<Self, RegisterError> {
        let title = check_title(&input.title)?;
        let impact = check_rating("impact", input.impact)?;
        let likelihood = check_rating("likelihood", input.likelihood)?;
        let score = impact * likelihood;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            title,
            description: input.description,
            category: input.category,
            owner: input.owner,
            impact,
            likelihood,
            score,
            level: RiskLevel::from_score(score),
            status: input.status,
            mitigation: input.mitigation,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a partial update. Validation happens before any field is
    /// touched, so a rejected update leaves the entry unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`RegisterError`] on the same conditions as [`RiskEntry::create`].
    pub fn apply(&mut self, update: RiskUpdate) -> Result<(), RegisterError> {
        let title = update.title.as_deref().map(check_title).transpose()?;
        let impact = update
            .impact
            .map(|v| check_rating("impact", v))
            .transpose()?;
        let likelihood = update
            .likelihood
            .map(|v| check_rating("likelihood", v))
            .transpose()?;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(impact) = impact {
            self.impact = impact;
        }
        if let Some(likelihood) = likelihood {
            self.likelihood = likelihood;
        }
        if update.description.is_some() {
            self.description = update.description;
        }
        if update.category.is_some() {
            self.category = update.category;
        }
        if update.owner.is_some() {
            self.owner = update.owner;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if update.mitigation.is_some() {
            self.mitigation = update.mitigation;
        }
        self.score = self.impact * self.likelihood;
        self.level = RiskLevel::from_score(self.score);
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Optional filters for listing the register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RiskFilter {
    pub status: Option<RiskStatus>,
    pub level: Option<RiskLevel>,
}

impl RiskFilter {
    pub fn matches(&self, entry: &RiskEntry) -> bool {
        self.status.map_or(true, |s| entry.status == s)
            && self.level.map_or(true, |l| entry.level == l)
    }

    /// Filter `entries` and order them by score, highest first. Ties keep
    /// creation order.
    pub fn apply(&self, entries: impl IntoIterator<Item = RiskEntry>) -> Vec<RiskEntry> {
        let mut out: Vec<RiskEntry> = entries.into_iter().filter(|e| self.matches(e)).collect();
        out.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        out
    }
}
