// src/db/reportdb.rs
use async_trait::async_trait;
use sqlx::Error;

use super::db::DBClient;
use crate::models::{complaintmodel::ComplaintStatus, reportmodel::CategoryCount};

#[async_trait]
pub trait ReportExt {
    async fn count_complaints(&self, status: Option<ComplaintStatus>) -> Result<i64, Error>;

    /// Only statuses that occur at least once are returned.
    async fn count_complaints_by_status(&self) -> Result<Vec<(ComplaintStatus, i64)>, Error>;

    async fn count_complaints_by_category(&self) -> Result<Vec<CategoryCount>, Error>;
}

#[async_trait]
impl ReportExt for DBClient {
    async fn count_complaints(&self, status: Option<ComplaintStatus>) -> Result<i64, Error> {
        let count: i64 = match status {
            Some(status) => {
                sqlx::query_scalar("SELECT COUNT(*) FROM complaints WHERE status = $1")
                    .bind(status)
                    .fetch_one(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_scalar("SELECT COUNT(*) FROM complaints")
                    .fetch_one(&self.pool)
                    .await?
            }
        };

        Ok(count)
    }

    async fn count_complaints_by_status(&self) -> Result<Vec<(ComplaintStatus, i64)>, Error> {
        let rows = sqlx::query_as::<_, (ComplaintStatus, i64)>(
            r#"
            SELECT status, COUNT(*) AS count
            FROM complaints
            GROUP BY status
            "#
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn count_complaints_by_category(&self) -> Result<Vec<CategoryCount>, Error> {
        let rows = sqlx::query_as::<_, CategoryCount>(
            r#"
            SELECT category, COUNT(*) AS count
            FROM complaints
            WHERE category <> ''
            GROUP BY category
            ORDER BY category ASC
            "#
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
