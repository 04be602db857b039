// src/models/reportmodel.rs
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::complaintmodel::{Complaint, ComplaintStatus};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DashboardStats {
    pub total: i64,
    pub pending: i64,
    pub in_progress: i64,
    pub resolved: i64,
}

impl DashboardStats {
    pub fn from_complaints(complaints: &[Complaint]) -> Self {
        complaints.iter().fold(DashboardStats::default(), |mut stats, complaint| {
            stats.total += 1;
            match complaint.status {
                ComplaintStatus::Pending => stats.pending += 1,
                ComplaintStatus::InProgress => stats.in_progress += 1,
                ComplaintStatus::Resolved => stats.resolved += 1,
                _ => {}
            }
            stats
        })
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminStats {
    pub total: i64,
    pub pending: i64,
    pub escalated: i64,
    /// Citizen accounts only.
    pub users: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComplaintReport {
    pub total: i64,
    pub status_counts: BTreeMap<ComplaintStatus, i64>,
    pub category_counts: Vec<CategoryCount>,
}
