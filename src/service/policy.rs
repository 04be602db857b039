// service/policy.rs
//! Role and ownership rules shared by every complaint operation.

use crate::models::{
    complaintmodel::{Complaint, ComplaintResponse},
    usermodel::Actor,
};

pub fn can_view_complaint(actor: &Actor, complaint: &Complaint) -> bool {
    actor.role.is_staff() || complaint.user_id == actor.id
}

pub fn can_mutate_complaint(actor: &Actor) -> bool {
    actor.role.is_staff()
}

pub fn can_view_response(actor: &Actor, response: &ComplaintResponse) -> bool {
    !response.is_internal || actor.role.is_staff()
}

pub fn can_mark_internal(actor: &Actor) -> bool {
    actor.role.is_staff()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::models::{
        complaintmodel::{ComplaintPriority, ComplaintStatus},
        usermodel::UserRole,
    };

    fn complaint_owned_by(owner: Uuid) -> Complaint {
        let now = Utc::now();
        Complaint {
            id: Uuid::new_v4(),
            ticket_number: "COMP-20240101-ABCDEF".to_string(),
            user_id: owner,
            title: "Pothole".to_string(),
            description: "Large pothole on Main St".to_string(),
            category: "Roads & Infrastructure".to_string(),
            location: None,
            status: ComplaintStatus::Pending,
            priority: ComplaintPriority::Medium,
            assigned_to: None,
            created_at: now,
            updated_at: now,
            resolved_at: None,
            escalation_count: 0,
        }
    }

    fn response(is_internal: bool) -> ComplaintResponse {
        ComplaintResponse {
            id: Uuid::new_v4(),
            complaint_id: Uuid::new_v4(),
            responder_id: Uuid::new_v4(),
            message: "Crew dispatched".to_string(),
            is_internal,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_citizen_sees_only_own_complaints() {
        let citizen_a = Actor::new(Uuid::new_v4(), UserRole::Citizen);
        let citizen_b = Actor::new(Uuid::new_v4(), UserRole::Citizen);
        let complaint = complaint_owned_by(citizen_a.id);

        assert!(can_view_complaint(&citizen_a, &complaint));
        assert!(!can_view_complaint(&citizen_b, &complaint));
    }

    #[test]
    fn test_staff_and_admin_see_everything() {
        let complaint = complaint_owned_by(Uuid::new_v4());
        for role in [UserRole::Staff, UserRole::Admin] {
            let actor = Actor::new(Uuid::new_v4(), role);
            assert!(can_view_complaint(&actor, &complaint));
            assert!(can_view_response(&actor, &response(true)));
        }
    }

    #[test]
    fn test_only_staff_mutate_and_mark_internal() {
        let citizen = Actor::new(Uuid::new_v4(), UserRole::Citizen);
        let staff = Actor::new(Uuid::new_v4(), UserRole::Staff);
        let admin = Actor::new(Uuid::new_v4(), UserRole::Admin);

        assert!(!can_mutate_complaint(&citizen));
        assert!(can_mutate_complaint(&staff));
        assert!(can_mutate_complaint(&admin));

        assert!(!can_mark_internal(&citizen));
        assert!(can_mark_internal(&staff));
        assert!(can_mark_internal(&admin));
    }

    #[test]
    fn test_owner_cannot_mutate_own_complaint() {
        let owner = Actor::new(Uuid::new_v4(), UserRole::Citizen);
        let complaint = complaint_owned_by(owner.id);
        assert!(can_view_complaint(&owner, &complaint));
        assert!(!can_mutate_complaint(&owner));
    }

    #[test]
    fn test_citizen_never_sees_internal_responses() {
        let citizen = Actor::new(Uuid::new_v4(), UserRole::Citizen);
        assert!(can_view_response(&citizen, &response(false)));
        assert!(!can_view_response(&citizen, &response(true)));
    }
}
