// service/lifecycle.rs
//! Complaint state transitions. These functions only touch the in-memory
//! record; `ComplaintService` wraps them in a transaction.
//!
//! There is no transition table: staff may move a complaint from any status
//! to any other, including back out of `Resolved` or `Closed`.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    models::{
        complaintmodel::{
            Complaint, ComplaintPriority, ComplaintResponse, ComplaintStatus, ComplaintUpdate,
            NewComplaint,
        },
        usermodel::Actor,
    },
    service::{error::ServiceError, policy},
};

pub fn open_complaint(
    owner: &Actor,
    ticket_number: String,
    input: NewComplaint,
    now: DateTime<Utc>,
) -> Complaint {
    Complaint {
        id: Uuid::new_v4(),
        ticket_number,
        user_id: owner.id,
        title: input.title,
        description: input.description,
        category: input.category,
        location: input.location,
        status: ComplaintStatus::Pending,
        priority: input.priority,
        assigned_to: None,
        created_at: now,
        updated_at: now,
        resolved_at: None,
        escalation_count: 0,
    }
}

fn ensure_can_mutate(actor: &Actor, action: &'static str) -> Result<(), ServiceError> {
    if policy::can_mutate_complaint(actor) {
        Ok(())
    } else {
        Err(ServiceError::AccessDenied(actor.id, action))
    }
}

fn set_status(complaint: &mut Complaint, new_status: ComplaintStatus, now: DateTime<Utc>) {
    complaint.status = new_status;
    if new_status == ComplaintStatus::Resolved {
        complaint.resolved_at = Some(now);
    }
}

pub fn update_status(
    complaint: &mut Complaint,
    new_status: ComplaintStatus,
    actor: &Actor,
    now: DateTime<Utc>,
) -> Result<(), ServiceError> {
    ensure_can_mutate(actor, "change complaint status")?;
    set_status(complaint, new_status, now);
    complaint.updated_at = now;
    Ok(())
}

pub fn update_priority(
    complaint: &mut Complaint,
    new_priority: ComplaintPriority,
    actor: &Actor,
    now: DateTime<Utc>,
) -> Result<(), ServiceError> {
    ensure_can_mutate(actor, "change complaint priority")?;
    complaint.priority = new_priority;
    complaint.updated_at = now;
    Ok(())
}

/// The assignee's role is not checked; any user id is accepted.
pub fn assign(
    complaint: &mut Complaint,
    assignee_id: Uuid,
    actor: &Actor,
    now: DateTime<Utc>,
) -> Result<(), ServiceError> {
    ensure_can_mutate(actor, "assign complaint")?;
    complaint.assigned_to = Some(assignee_id);
    complaint.updated_at = now;
    Ok(())
}

/// Forces status to Escalated and priority to High, even from Critical.
pub fn escalate(
    complaint: &mut Complaint,
    actor: &Actor,
    now: DateTime<Utc>,
) -> Result<(), ServiceError> {
    ensure_can_mutate(actor, "escalate complaint")?;
    complaint.status = ComplaintStatus::Escalated;
    complaint.priority = ComplaintPriority::High;
    complaint.escalation_count += 1;
    complaint.updated_at = now;
    Ok(())
}

/// Applies the fields present in `update` in the order status, priority,
/// assignee. On error the caller discards the record.
pub fn apply_update(
    complaint: &mut Complaint,
    update: &ComplaintUpdate,
    actor: &Actor,
    now: DateTime<Utc>,
) -> Result<(), ServiceError> {
    ensure_can_mutate(actor, "update complaint")?;

    if let Some(status) = update.status {
        update_status(complaint, status, actor, now)?;
    }
    if let Some(priority) = update.priority {
        update_priority(complaint, priority, actor, now)?;
    }
    if let Some(assignee_id) = update.assigned_to {
        assign(complaint, assignee_id, actor, now)?;
    }

    complaint.updated_at = now;
    Ok(())
}

/// Builds a response on behalf of `author`. Citizens may only answer their
/// own complaints, and their responses are always public.
pub fn compose_response(
    complaint: &Complaint,
    author: &Actor,
    message: String,
    mark_internal: bool,
    now: DateTime<Utc>,
) -> Result<ComplaintResponse, ServiceError> {
    if !policy::can_view_complaint(author, complaint) {
        return Err(ServiceError::AccessDenied(author.id, "respond to complaint"));
    }

    let message = message.trim().to_string();
    if message.is_empty() {
        return Err(ServiceError::Validation("Message is required".to_string()));
    }

    Ok(ComplaintResponse {
        id: Uuid::new_v4(),
        complaint_id: complaint.id,
        responder_id: author.id,
        message,
        is_internal: mark_internal && policy::can_mark_internal(author),
        created_at: now,
    })
}
