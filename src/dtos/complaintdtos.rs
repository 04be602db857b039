// src/dtos/complaintdtos.rs
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    models::{
        complaintmodel::*,
        reportmodel::{AdminStats, CategoryCount, DashboardStats},
    },
    utils::flash::Flash,
};

#[derive(Debug, Default, Clone, Deserialize, Validate)]
pub struct CreateComplaintDto {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(length(min = 1, max = 100, message = "Category is required"))]
    pub category: String,
    #[validate(length(max = 200, message = "Location must not be more than 200 characters"))]
    pub location: Option<String>,
    pub priority: Option<String>,
}

impl CreateComplaintDto {
    /// Trims every text field so whitespace-only input fails validation.
    pub fn normalized(self) -> Self {
        CreateComplaintDto {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            category: self.category.trim().to_string(),
            location: self.location.map(|location| location.trim().to_string()),
            priority: self.priority,
        }
    }

    pub fn into_new_complaint(self) -> Result<NewComplaint, String> {
        let priority = match self.priority.as_deref().map(str::trim) {
            None | Some("") => ComplaintPriority::default(),
            Some(raw) => raw.parse::<ComplaintPriority>()?,
        };

        Ok(NewComplaint {
            title: self.title,
            description: self.description,
            category: self.category,
            location: Some(self.location.unwrap_or_default()),
            priority,
        })
    }
}

/// Staff update form. Blank fields count as absent.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct UpdateComplaintDto {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub assigned_to: Option<String>,
}

impl UpdateComplaintDto {
    pub fn into_update(self) -> Result<ComplaintUpdate, String> {
        let status = present(self.status)
            .map(|raw| raw.parse::<ComplaintStatus>())
            .transpose()?;
        let priority = present(self.priority)
            .map(|raw| raw.parse::<ComplaintPriority>())
            .transpose()?;
        let assigned_to = present(self.assigned_to)
            .map(|raw| {
                Uuid::parse_str(&raw).map_err(|_| format!("invalid assignee id '{}'", raw))
            })
            .transpose()?;

        Ok(ComplaintUpdate {
            status,
            priority,
            assigned_to,
        })
    }
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Default, Clone, Deserialize, Validate)]
pub struct CreateResponseDto {
    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,
    /// Checkbox value; only "on"/"true"/"1" request an internal note.
    pub internal: Option<String>,
}

impl CreateResponseDto {
    pub fn normalized(self) -> Self {
        CreateResponseDto {
            message: self.message.trim().to_string(),
            ..self
        }
    }

    pub fn wants_internal(&self) -> bool {
        matches!(
            self.internal.as_deref().map(str::trim),
            Some("on") | Some("true") | Some("1")
        )
    }
}

#[derive(Debug, Serialize)]
pub struct DashboardResponseDto {
    pub status: &'static str,
    pub username: String,
    pub complaints: Vec<Complaint>,
    pub stats: DashboardStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash: Option<Flash>,
}

#[derive(Debug, Serialize)]
pub struct AdminDashboardResponseDto {
    pub status: &'static str,
    pub username: String,
    pub stats: AdminStats,
    pub complaints: Vec<Complaint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash: Option<Flash>,
}

#[derive(Debug, Serialize)]
pub struct ComplaintDetailResponseDto {
    pub status: &'static str,
    pub data: ComplaintWithResponses,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash: Option<Flash>,
}

#[derive(Debug, Serialize)]
pub struct NewComplaintFormDto {
    pub status: &'static str,
    pub categories: Vec<&'static str>,
    pub priorities: Vec<ComplaintPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash: Option<Flash>,
}

#[derive(Debug, Serialize)]
pub struct ReportResponseDto {
    pub status: &'static str,
    pub total: i64,
    pub status_counts: BTreeMap<ComplaintStatus, i64>,
    pub category_counts: Vec<CategoryCount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash: Option<Flash>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_defaults_to_medium() {
        let dto = CreateComplaintDto {
            title: "Overflowing bins".to_string(),
            description: "Not collected for two weeks".to_string(),
            category: "Sanitation".to_string(),
            location: None,
            priority: None,
        };
        let complaint = dto.into_new_complaint().unwrap();
        assert_eq!(complaint.priority, ComplaintPriority::Medium);
        assert_eq!(complaint.location, Some(String::new()));
    }

    #[test]
    fn test_blank_complaint_fields_rejected_after_trimming() {
        let dto = CreateComplaintDto {
            title: "   ".to_string(),
            description: "Burst pipe on 5th street".to_string(),
            category: "  ".to_string(),
            location: Some("  Market Road ".to_string()),
            priority: None,
        };
        assert!(dto.clone().validate().is_ok());

        let dto = dto.normalized();
        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("category"));
        assert!(!fields.contains_key("description"));
        assert_eq!(dto.location.as_deref(), Some("Market Road"));
    }

    #[test]
    fn test_blank_response_rejected_after_trimming() {
        let dto = CreateResponseDto {
            message: " \n ".to_string(),
            internal: None,
        };
        assert!(dto.normalized().validate().is_err());
    }

    #[test]
    fn test_unknown_priority_rejected() {
        let dto = CreateComplaintDto {
            title: "t".to_string(),
            description: "d".to_string(),
            category: "c".to_string(),
            location: None,
            priority: Some("URGENT".to_string()),
        };
        assert!(dto.into_new_complaint().is_err());
    }

    #[test]
    fn test_partial_update_form() {
        let dto: UpdateComplaintDto =
            serde_urlencoded::from_str("status=RESOLVED&priority=&assigned_to=").unwrap();
        let update = dto.into_update().unwrap();
        assert_eq!(
            update,
            ComplaintUpdate {
                status: Some(ComplaintStatus::Resolved),
                priority: None,
                assigned_to: None,
            }
        );
    }

    #[test]
    fn test_update_form_rejects_bad_values() {
        let dto = UpdateComplaintDto {
            status: Some("archived".to_string()),
            ..Default::default()
        };
        assert!(dto.into_update().is_err());

        let dto = UpdateComplaintDto {
            assigned_to: Some("42".to_string()),
            ..Default::default()
        };
        assert!(dto.into_update().is_err());
    }

    #[test]
    fn test_internal_checkbox() {
        let mut dto = CreateResponseDto {
            message: "note".to_string(),
            internal: Some("on".to_string()),
        };
        assert!(dto.wants_internal());

        dto.internal = None;
        assert!(!dto.wants_internal());

        dto.internal = Some("off".to_string());
        assert!(!dto.wants_internal());
    }
}
