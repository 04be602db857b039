// handler/complaint.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Request},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Form, Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::complaintdtos::{
        ComplaintDetailResponseDto, CreateComplaintDto, CreateResponseDto,
        NewComplaintFormDto, UpdateComplaintDto,
    },
    error::{ErrorMessage, HttpError},
    middleware::{role_check, STAFF_ROLES},
    models::complaintmodel::{ComplaintPriority, DEFAULT_CATEGORIES},
    service::error::ServiceError,
    utils::{
        flash::{take_flash, Flash, FlashRedirect},
        token::SessionUser,
    },
    AppState,
};

pub fn complaint_handler() -> Router {
    let staff_routes = Router::new()
        .route("/:complaint_id/update", post(update_complaint))
        .route("/:complaint_id/escalate", post(escalate_complaint))
        .layer(middleware::from_fn(|req: Request, next: Next| {
            role_check(req, next, &STAFF_ROLES)
        }));

    Router::new()
        .route("/new", get(new_complaint_form).post(new_complaint))
        .route("/:complaint_id", get(view_complaint))
        .route("/:complaint_id/respond", post(respond_to_complaint))
        .merge(staff_routes)
}

fn complaint_path(complaint_id: Uuid) -> String {
    format!("/complaint/{}", complaint_id)
}

pub async fn new_complaint_form(jar: CookieJar) -> impl IntoResponse {
    let (jar, flash) = take_flash(jar);
    (
        jar,
        Json(NewComplaintFormDto {
            status: "success",
            categories: DEFAULT_CATEGORIES.to_vec(),
            priorities: ComplaintPriority::ALL.to_vec(),
            flash,
        }),
    )
}

pub async fn new_complaint(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(session): Extension<SessionUser>,
    Form(body): Form<CreateComplaintDto>,
) -> FlashRedirect {
    let body = body.normalized();
    let failed = |message: String| {
        Flash::error(format!("Failed to submit complaint: {}", message))
            .redirect_to("/complaint/new")
    };

    if let Err(e) = body.validate() {
        return failed(ServiceError::from(e).user_message());
    }

    let input = match body.into_new_complaint() {
        Ok(input) => input,
        Err(message) => return failed(message),
    };

    match app_state
        .complaint_service
        .create(&session.actor(), input)
        .await
    {
        Ok(complaint) => Flash::success(format!(
            "Complaint submitted successfully! Ticket: {}",
            complaint.ticket_number
        ))
        .redirect_to("/dashboard"),
        Err(e) => {
            tracing::error!("Complaint submission by {} failed: {}", session.id, e);
            failed(e.user_message())
        }
    }
}

pub async fn view_complaint(
    jar: CookieJar,
    Path(complaint_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(session): Extension<SessionUser>,
) -> Result<Response, HttpError> {
    let data = match app_state
        .complaint_service
        .view(complaint_id, &session.actor())
        .await
    {
        Ok(data) => data,
        Err(e @ ServiceError::ComplaintNotFound(_)) | Err(e @ ServiceError::AccessDenied(_, _)) => {
            return Ok(Flash::error(e.user_message())
                .redirect_to("/dashboard")
                .into_response());
        }
        Err(e) => return Err(e.into()),
    };

    let (jar, flash) = take_flash(jar);

    Ok((
        jar,
        Json(ComplaintDetailResponseDto {
            status: "success",
            data,
            flash,
        }),
    )
        .into_response())
}

fn complaint_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": ErrorMessage::ComplaintNotFound.to_string() })),
    )
        .into_response()
}

pub async fn update_complaint(
    Path(complaint_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(session): Extension<SessionUser>,
    Form(body): Form<UpdateComplaintDto>,
) -> Response {
    let redirect = complaint_path(complaint_id);

    match app_state.complaint_service.get(complaint_id).await {
        Ok(_) => {}
        Err(ServiceError::ComplaintNotFound(_)) => return complaint_not_found(),
        Err(e) => {
            tracing::error!("Loading complaint {} failed: {}", complaint_id, e);
            return Flash::error(format!("Update failed: {}", e.user_message()))
                .redirect_to(redirect)
                .into_response();
        }
    }

    let update = match body.into_update() {
        Ok(update) => update,
        Err(message) => {
            return Flash::error(format!("Update failed: {}", message))
                .redirect_to(redirect)
                .into_response();
        }
    };

    match app_state
        .complaint_service
        .apply_update(complaint_id, &update, &session.actor())
        .await
    {
        Ok(_) => Flash::success("Complaint updated successfully!")
            .redirect_to(redirect)
            .into_response(),
        Err(ServiceError::ComplaintNotFound(_)) => complaint_not_found(),
        Err(e) => {
            tracing::error!("Updating complaint {} failed: {}", complaint_id, e);
            Flash::error(format!("Update failed: {}", e.user_message()))
                .redirect_to(redirect)
                .into_response()
        }
    }
}

pub async fn respond_to_complaint(
    Path(complaint_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(session): Extension<SessionUser>,
    Form(body): Form<CreateResponseDto>,
) -> FlashRedirect {
    let redirect = complaint_path(complaint_id);
    let body = body.normalized();

    if let Err(e) = body.validate() {
        let message = ServiceError::from(e).user_message();
        return Flash::error(format!("Failed to add response: {}", message)).redirect_to(redirect);
    }

    let mark_internal = body.wants_internal();

    match app_state
        .complaint_service
        .add_response(complaint_id, &session.actor(), body.message, mark_internal)
        .await
    {
        Ok(_) => Flash::success("Response added successfully!").redirect_to(redirect),
        Err(e @ ServiceError::ComplaintNotFound(_)) | Err(e @ ServiceError::AccessDenied(_, _)) => {
            Flash::error(e.user_message()).redirect_to("/dashboard")
        }
        Err(e) => {
            tracing::error!("Responding to complaint {} failed: {}", complaint_id, e);
            Flash::error(format!("Failed to add response: {}", e.user_message()))
                .redirect_to(redirect)
        }
    }
}

pub async fn escalate_complaint(
    Path(complaint_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(session): Extension<SessionUser>,
) -> FlashRedirect {
    let redirect = complaint_path(complaint_id);

    match app_state
        .complaint_service
        .escalate(complaint_id, &session.actor())
        .await
    {
        Ok(_) => Flash::success("Complaint escalated successfully!").redirect_to(redirect),
        Err(e @ ServiceError::ComplaintNotFound(_)) => {
            Flash::error(e.user_message()).redirect_to("/admin")
        }
        Err(e) => {
            tracing::error!("Escalating complaint {} failed: {}", complaint_id, e);
            Flash::error(format!("Escalation failed: {}", e.user_message())).redirect_to(redirect)
        }
    }
}
