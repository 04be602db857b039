// src/models/complaintmodel.rs
use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Type;
use uuid::Uuid;

use super::usermodel::UserRole;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[sqlx(type_name = "complaint_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    #[default]
    Pending,
    Acknowledged,
    InProgress,
    Escalated,
    Resolved,
    Closed,
}

impl ComplaintStatus {
    pub const ALL: [ComplaintStatus; 6] = [
        ComplaintStatus::Pending,
        ComplaintStatus::Acknowledged,
        ComplaintStatus::InProgress,
        ComplaintStatus::Escalated,
        ComplaintStatus::Resolved,
        ComplaintStatus::Closed,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            ComplaintStatus::Pending => "pending",
            ComplaintStatus::Acknowledged => "acknowledged",
            ComplaintStatus::InProgress => "in_progress",
            ComplaintStatus::Escalated => "escalated",
            ComplaintStatus::Resolved => "resolved",
            ComplaintStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

impl FromStr for ComplaintStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_label(s);
        ComplaintStatus::ALL
            .into_iter()
            .find(|status| status.to_str() == normalized)
            .ok_or_else(|| format!("unknown status '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[sqlx(type_name = "complaint_priority", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ComplaintPriority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl ComplaintPriority {
    pub const ALL: [ComplaintPriority; 4] = [
        ComplaintPriority::Low,
        ComplaintPriority::Medium,
        ComplaintPriority::High,
        ComplaintPriority::Critical,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            ComplaintPriority::Low => "low",
            ComplaintPriority::Medium => "medium",
            ComplaintPriority::High => "high",
            ComplaintPriority::Critical => "critical",
        }
    }
}

impl fmt::Display for ComplaintPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

impl FromStr for ComplaintPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_label(s);
        ComplaintPriority::ALL
            .into_iter()
            .find(|priority| priority.to_str() == normalized)
            .ok_or_else(|| format!("unknown priority '{}'", s))
    }
}

// Forms send either the stored label ("in_progress") or the constant name ("IN_PROGRESS").
fn normalize_label(s: &str) -> String {
    s.trim()
        .to_ascii_lowercase()
        .replace(['-', ' '], "_")
}

pub const DEFAULT_CATEGORIES: [&str; 8] = [
    "Roads & Infrastructure",
    "Water Supply",
    "Sanitation",
    "Electricity",
    "Public Safety",
    "Healthcare",
    "Education",
    "Others",
];

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, PartialEq)]
pub struct Complaint {
    pub id: Uuid,
    pub ticket_number: String,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: Option<String>,
    pub status: ComplaintStatus,
    pub priority: ComplaintPriority,
    pub assigned_to: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub escalation_count: i32,
}

/// Fields a citizen supplies when filing a complaint.
#[derive(Debug, Clone)]
pub struct NewComplaint {
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: Option<String>,
    pub priority: ComplaintPriority,
}

/// Partial staff update; absent fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComplaintUpdate {
    pub status: Option<ComplaintStatus>,
    pub priority: Option<ComplaintPriority>,
    pub assigned_to: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, PartialEq)]
pub struct ComplaintResponse {
    pub id: Uuid,
    pub complaint_id: Uuid,
    pub responder_id: Uuid,
    pub message: String,
    pub is_internal: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ComplaintResponseWithUser {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub response: ComplaintResponse,
    pub responder_name: String,
    pub responder_role: UserRole,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComplaintWithResponses {
    pub complaint: Complaint,
    pub responses: Vec<ComplaintResponseWithUser>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parsing() {
        assert_eq!("pending".parse::<ComplaintStatus>(), Ok(ComplaintStatus::Pending));
        assert_eq!("IN_PROGRESS".parse::<ComplaintStatus>(), Ok(ComplaintStatus::InProgress));
        assert_eq!("in-progress".parse::<ComplaintStatus>(), Ok(ComplaintStatus::InProgress));
        assert_eq!("Resolved".parse::<ComplaintStatus>(), Ok(ComplaintStatus::Resolved));
        assert!("reopened".parse::<ComplaintStatus>().is_err());
        assert!("".parse::<ComplaintStatus>().is_err());
    }

    #[test]
    fn test_priority_parsing() {
        assert_eq!("MEDIUM".parse::<ComplaintPriority>(), Ok(ComplaintPriority::Medium));
        assert_eq!("critical".parse::<ComplaintPriority>(), Ok(ComplaintPriority::Critical));
        assert!("urgent".parse::<ComplaintPriority>().is_err());
    }

    #[test]
    fn test_defaults() {
        assert_eq!(ComplaintStatus::default(), ComplaintStatus::Pending);
        assert_eq!(ComplaintPriority::default(), ComplaintPriority::Medium);
    }

    #[test]
    fn test_labels_serialize_as_snake_case() {
        assert_eq!(
            serde_json::to_value(ComplaintStatus::InProgress).unwrap(),
            serde_json::json!("in_progress")
        );
        for status in ComplaintStatus::ALL {
            assert_eq!(status.to_string().parse::<ComplaintStatus>(), Ok(status));
        }
    }
}
