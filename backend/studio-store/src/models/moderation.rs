use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The placeholder "current user" every action is attributed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub name: String,
}

impl Actor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Free-text evidence attached to a record. Lists of notes only grow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModNote {
    pub at: DateTime<Utc>,
    pub author: String,
    pub body: String,
}

impl ModNote {
    pub fn new(at: DateTime<Utc>, author: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            at,
            author: author.into(),
            body: body.into(),
        }
    }
}

/// Review workflow shared by livestream reports and support tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pending,
    Reviewing,
    Resolved,
    Dismissed,
    Escalated,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Reviewing => "reviewing",
            ReportStatus::Resolved => "resolved",
            ReportStatus::Dismissed => "dismissed",
            ReportStatus::Escalated => "escalated",
        }
    }

    /// Still needs someone to look at it.
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            ReportStatus::Pending | ReportStatus::Reviewing | ReportStatus::Escalated
        )
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_open()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportPriority {
    Low,
    Medium,
    High,
    Critical,
}

impl ReportPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportPriority::Low => "low",
            ReportPriority::Medium => "medium",
            ReportPriority::High => "high",
            ReportPriority::Critical => "critical",
        }
    }
}
