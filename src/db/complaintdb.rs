// src/db/complaintdb.rs
use async_trait::async_trait;
use sqlx::{Error, Postgres};
use uuid::Uuid;

use super::db::DBClient;
use crate::models::complaintmodel::*;

#[async_trait]
pub trait ComplaintExt {
    async fn insert_complaint_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, Postgres>,
        complaint: &Complaint,
    ) -> Result<Complaint, Error>;

    async fn get_complaint(
        &self,
        complaint_id: Uuid,
    ) -> Result<Option<Complaint>, Error>;

    async fn get_complaint_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, Postgres>,
        complaint_id: Uuid,
    ) -> Result<Option<Complaint>, Error>;

    async fn save_complaint_state_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, Postgres>,
        complaint: &Complaint,
    ) -> Result<Complaint, Error>;

    async fn get_user_complaints(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Complaint>, Error>;

    async fn get_recent_complaints(
        &self,
        limit: i64,
    ) -> Result<Vec<Complaint>, Error>;

    async fn insert_response_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, Postgres>,
        response: &ComplaintResponse,
    ) -> Result<ComplaintResponse, Error>;

    async fn get_complaint_responses(
        &self,
        complaint_id: Uuid,
    ) -> Result<Vec<ComplaintResponseWithUser>, Error>;
}

#[async_trait]
impl ComplaintExt for DBClient {
    async fn insert_complaint_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, Postgres>,
        complaint: &Complaint,
    ) -> Result<Complaint, Error> {
        let complaint = sqlx::query_as::<_, Complaint>(
            r#"
            INSERT INTO complaints (
                id, ticket_number, user_id, title, description, category, location,
                status, priority, assigned_to, created_at, updated_at, resolved_at,
                escalation_count
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#
        )
        .bind(complaint.id)
        .bind(&complaint.ticket_number)
        .bind(complaint.user_id)
        .bind(&complaint.title)
        .bind(&complaint.description)
        .bind(&complaint.category)
        .bind(&complaint.location)
        .bind(complaint.status)
        .bind(complaint.priority)
        .bind(complaint.assigned_to)
        .bind(complaint.created_at)
        .bind(complaint.updated_at)
        .bind(complaint.resolved_at)
        .bind(complaint.escalation_count)
        .fetch_one(&mut **tx)
        .await?;

        Ok(complaint)
    }

    async fn get_complaint(
        &self,
        complaint_id: Uuid,
    ) -> Result<Option<Complaint>, Error> {
        let complaint = sqlx::query_as::<_, Complaint>(
            r#"
            SELECT * FROM complaints
            WHERE id = $1
            "#
        )
        .bind(complaint_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(complaint)
    }

    async fn get_complaint_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, Postgres>,
        complaint_id: Uuid,
    ) -> Result<Option<Complaint>, Error> {
        let complaint = sqlx::query_as::<_, Complaint>(
            r#"
            SELECT * FROM complaints
            WHERE id = $1
            "#
        )
        .bind(complaint_id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(complaint)
    }

    // ticket_number and ownership are never rewritten.
    async fn save_complaint_state_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, Postgres>,
        complaint: &Complaint,
    ) -> Result<Complaint, Error> {
        let complaint = sqlx::query_as::<_, Complaint>(
            r#"
            UPDATE complaints
            SET status = $1,
                priority = $2,
                assigned_to = $3,
                updated_at = $4,
                resolved_at = $5,
                escalation_count = $6
            WHERE id = $7
            RETURNING *
            "#
        )
        .bind(complaint.status)
        .bind(complaint.priority)
        .bind(complaint.assigned_to)
        .bind(complaint.updated_at)
        .bind(complaint.resolved_at)
        .bind(complaint.escalation_count)
        .bind(complaint.id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(complaint)
    }

    async fn get_user_complaints(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Complaint>, Error> {
        let complaints = sqlx::query_as::<_, Complaint>(
            r#"
            SELECT * FROM complaints
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(complaints)
    }

    async fn get_recent_complaints(
        &self,
        limit: i64,
    ) -> Result<Vec<Complaint>, Error> {
        let complaints = sqlx::query_as::<_, Complaint>(
            r#"
            SELECT * FROM complaints
            ORDER BY created_at DESC
            LIMIT $1
            "#
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(complaints)
    }

    async fn insert_response_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, Postgres>,
        response: &ComplaintResponse,
    ) -> Result<ComplaintResponse, Error> {
        let response = sqlx::query_as::<_, ComplaintResponse>(
            r#"
            INSERT INTO responses (id, complaint_id, responder_id, message, is_internal, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#
        )
        .bind(response.id)
        .bind(response.complaint_id)
        .bind(response.responder_id)
        .bind(&response.message)
        .bind(response.is_internal)
        .bind(response.created_at)
        .fetch_one(&mut **tx)
        .await?;

        Ok(response)
    }

    async fn get_complaint_responses(
        &self,
        complaint_id: Uuid,
    ) -> Result<Vec<ComplaintResponseWithUser>, Error> {
        let responses = sqlx::query_as::<_, ComplaintResponseWithUser>(
            r#"
            SELECT
                r.*,
                u.full_name as responder_name,
                u.role as responder_role
            FROM responses r
            JOIN users u ON r.responder_id = u.id
            WHERE r.complaint_id = $1
            ORDER BY r.created_at ASC
            "#
        )
        .bind(complaint_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(responses)
    }
}
