// service/report_service.rs
use std::{collections::BTreeMap, sync::Arc};

use uuid::Uuid;

use crate::{
    db::{
        complaintdb::ComplaintExt,
        db::DBClient,
        reportdb::ReportExt,
        userdb::UserExt,
    },
    models::{
        complaintmodel::ComplaintStatus,
        reportmodel::{AdminStats, CategoryCount, ComplaintReport, DashboardStats},
        usermodel::UserRole,
    },
    service::error::ServiceError,
};

#[derive(Debug, Clone)]
pub struct ReportService {
    db_client: Arc<DBClient>,
}

impl ReportService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    pub async fn count_by_status(&self) -> Result<BTreeMap<ComplaintStatus, i64>, ServiceError> {
        let rows = self.db_client.count_complaints_by_status().await?;
        Ok(fill_status_counts(rows))
    }

    pub async fn count_by_category(&self) -> Result<Vec<CategoryCount>, ServiceError> {
        Ok(self.db_client.count_complaints_by_category().await?)
    }

    /// Counts over the complaints `user_id` filed.
    pub async fn dashboard_stats(&self, user_id: Uuid) -> Result<DashboardStats, ServiceError> {
        let complaints = self.db_client.get_user_complaints(user_id).await?;
        Ok(DashboardStats::from_complaints(&complaints))
    }

    pub async fn admin_stats(&self) -> Result<AdminStats, ServiceError> {
        Ok(AdminStats {
            total: self.db_client.count_complaints(None).await?,
            pending: self
                .db_client
                .count_complaints(Some(ComplaintStatus::Pending))
                .await?,
            escalated: self
                .db_client
                .count_complaints(Some(ComplaintStatus::Escalated))
                .await?,
            users: self.db_client.count_users_by_role(UserRole::Citizen).await?,
        })
    }

    pub async fn report(&self) -> Result<ComplaintReport, ServiceError> {
        let status_counts = self.count_by_status().await?;
        Ok(ComplaintReport {
            total: status_counts.values().sum(),
            status_counts,
            category_counts: self.count_by_category().await?,
        })
    }
}

/// Every status gets an entry, zero when no complaint has it.
pub fn fill_status_counts(rows: Vec<(ComplaintStatus, i64)>) -> BTreeMap<ComplaintStatus, i64> {
    let mut counts: BTreeMap<ComplaintStatus, i64> =
        ComplaintStatus::ALL.into_iter().map(|status| (status, 0)).collect();

    for (status, count) in rows {
        *counts.entry(status).or_insert(0) += count;
    }

    counts
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::complaintmodel::{Complaint, ComplaintPriority};

    #[test]
    fn test_status_counts_cover_every_status() {
        let counts = fill_status_counts(vec![]);
        assert_eq!(counts.len(), ComplaintStatus::ALL.len());
        assert!(counts.values().all(|count| *count == 0));

        let counts = fill_status_counts(vec![
            (ComplaintStatus::Pending, 4),
            (ComplaintStatus::Closed, 1),
        ]);
        assert_eq!(counts[&ComplaintStatus::Pending], 4);
        assert_eq!(counts[&ComplaintStatus::Closed], 1);
        assert_eq!(counts[&ComplaintStatus::Escalated], 0);
    }

    #[test]
    fn test_status_counts_serialize_with_labels() {
        let counts = fill_status_counts(vec![(ComplaintStatus::InProgress, 2)]);
        let json = serde_json::to_value(&counts).unwrap();
        assert_eq!(json["in_progress"], 2);
        assert_eq!(json["acknowledged"], 0);
    }

    #[test]
    fn test_dashboard_stats() {
        let owner = Uuid::new_v4();
        let now = Utc::now();
        let complaints: Vec<Complaint> = [
            ComplaintStatus::Pending,
            ComplaintStatus::Pending,
            ComplaintStatus::InProgress,
            ComplaintStatus::Resolved,
            ComplaintStatus::Closed,
            ComplaintStatus::Escalated,
        ]
        .into_iter()
        .map(|status| Complaint {
            id: Uuid::new_v4(),
            ticket_number: format!("COMP-20240101-{:06X}", rand::random::<u16>()),
            user_id: owner,
            title: "Streetlight out".to_string(),
            description: "Dark corner".to_string(),
            category: "Electricity".to_string(),
            location: None,
            status,
            priority: ComplaintPriority::Medium,
            assigned_to: None,
            created_at: now,
            updated_at: now,
            resolved_at: None,
            escalation_count: 0,
        })
        .collect();

        let stats = DashboardStats::from_complaints(&complaints);
        assert_eq!(
            stats,
            DashboardStats {
                total: 6,
                pending: 2,
                in_progress: 1,
                resolved: 1,
            }
        );
        assert_eq!(DashboardStats::from_complaints(&[]), DashboardStats::default());
    }
}
