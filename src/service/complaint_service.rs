// service/complaint_service.rs
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    db::{complaintdb::ComplaintExt, db::DBClient},
    models::{
        complaintmodel::*,
        usermodel::Actor,
    },
    service::{error::ServiceError, lifecycle, policy},
    utils::ticket::TicketGenerator,
};

#[derive(Debug, Clone)]
pub struct ComplaintService {
    db_client: Arc<DBClient>,
    tickets: Arc<TicketGenerator>,
}

impl ComplaintService {
    pub fn new(db_client: Arc<DBClient>, tickets: Arc<TicketGenerator>) -> Self {
        Self { db_client, tickets }
    }

    pub async fn create(&self, owner: &Actor, input: NewComplaint) -> Result<Complaint, ServiceError> {
        let ticket_number = self.tickets.next()?;
        let complaint = lifecycle::open_complaint(owner, ticket_number, input, Utc::now());

        let result = async {
            let mut tx = self.db_client.pool.begin().await?;
            let saved = self.db_client.insert_complaint_tx(&mut tx, &complaint).await?;
            tx.commit().await?;
            Ok::<_, sqlx::Error>(saved)
        }
        .await;

        match result {
            Ok(saved) => {
                tracing::info!(
                    "Complaint {} filed by {} in '{}'",
                    saved.ticket_number,
                    owner.id,
                    saved.category
                );
                Ok(saved)
            }
            Err(e) => {
                self.tickets.forget(&complaint.ticket_number);
                Err(e.into())
            }
        }
    }

    pub async fn get(&self, complaint_id: Uuid) -> Result<Complaint, ServiceError> {
        self.db_client
            .get_complaint(complaint_id)
            .await?
            .ok_or(ServiceError::ComplaintNotFound(complaint_id))
    }

    /// Loads a complaint together with the responses `viewer` may see.
    pub async fn view(
        &self,
        complaint_id: Uuid,
        viewer: &Actor,
    ) -> Result<ComplaintWithResponses, ServiceError> {
        let complaint = self.get(complaint_id).await?;

        if !policy::can_view_complaint(viewer, &complaint) {
            return Err(ServiceError::AccessDenied(viewer.id, "view complaint"));
        }

        let responses = self.list_responses(&complaint, viewer).await?;
        Ok(ComplaintWithResponses { complaint, responses })
    }

    /// Oldest first; internal notes only for staff.
    pub async fn list_responses(
        &self,
        complaint: &Complaint,
        viewer: &Actor,
    ) -> Result<Vec<ComplaintResponseWithUser>, ServiceError> {
        let responses = self.db_client.get_complaint_responses(complaint.id).await?;
        Ok(visible_responses(viewer, responses))
    }

    pub async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<Complaint>, ServiceError> {
        Ok(self.db_client.get_user_complaints(owner_id).await?)
    }

    pub async fn recent(&self, limit: i64) -> Result<Vec<Complaint>, ServiceError> {
        Ok(self.db_client.get_recent_complaints(limit).await?)
    }

    pub async fn escalate(&self, complaint_id: Uuid, actor: &Actor) -> Result<Complaint, ServiceError> {
        let complaint = self
            .mutate(complaint_id, |complaint, now| lifecycle::escalate(complaint, actor, now))
            .await?;

        tracing::info!(
            "Complaint {} escalated by {} (escalations: {})",
            complaint.ticket_number,
            actor.id,
            complaint.escalation_count
        );
        Ok(complaint)
    }

    pub async fn apply_update(
        &self,
        complaint_id: Uuid,
        update: &ComplaintUpdate,
        actor: &Actor,
    ) -> Result<Complaint, ServiceError> {
        let complaint = self
            .mutate(complaint_id, |complaint, now| {
                lifecycle::apply_update(complaint, update, actor, now)
            })
            .await?;

        tracing::info!(
            "Complaint {} updated by {}: status={} priority={} assigned_to={:?}",
            complaint.ticket_number,
            actor.id,
            complaint.status,
            complaint.priority,
            complaint.assigned_to
        );
        Ok(complaint)
    }

    pub async fn add_response(
        &self,
        complaint_id: Uuid,
        author: &Actor,
        message: String,
        mark_internal: bool,
    ) -> Result<ComplaintResponse, ServiceError> {
        let mut tx = self.db_client.pool.begin().await?;

        let complaint = self
            .db_client
            .get_complaint_tx(&mut tx, complaint_id)
            .await?
            .ok_or(ServiceError::ComplaintNotFound(complaint_id))?;

        let response = lifecycle::compose_response(&complaint, author, message, mark_internal, Utc::now())?;
        let response = self.db_client.insert_response_tx(&mut tx, &response).await?;

        tx.commit().await?;

        tracing::info!(
            "Response added to {} by {} (internal: {})",
            complaint.ticket_number,
            author.id,
            response.is_internal
        );
        Ok(response)
    }

    /// Read, apply `change` in memory, write back, commit. Any error drops
    /// the transaction and nothing is persisted.
    async fn mutate<F>(&self, complaint_id: Uuid, change: F) -> Result<Complaint, ServiceError>
    where
        F: FnOnce(&mut Complaint, DateTime<Utc>) -> Result<(), ServiceError> + Send,
    {
        let mut tx = self.db_client.pool.begin().await?;

        let mut complaint = self
            .db_client
            .get_complaint_tx(&mut tx, complaint_id)
            .await?
            .ok_or(ServiceError::ComplaintNotFound(complaint_id))?;

        change(&mut complaint, Utc::now())?;

        let saved = self
            .db_client
            .save_complaint_state_tx(&mut tx, &complaint)
            .await
            .map_err(unknown_assignee_or_database)?;
        tx.commit().await?;

        Ok(saved)
    }
}

// `assigned_to` is the only foreign key a state save can break.
fn unknown_assignee_or_database(err: sqlx::Error) -> ServiceError {
    if ServiceError::is_foreign_key_violation(&err) {
        ServiceError::Validation("Assigned user does not exist".to_string())
    } else {
        ServiceError::Database(err)
    }
}

pub fn visible_responses(
    viewer: &Actor,
    responses: Vec<ComplaintResponseWithUser>,
) -> Vec<ComplaintResponseWithUser> {
    responses
        .into_iter()
        .filter(|r| policy::can_view_response(viewer, &r.response))
        .collect()
}
