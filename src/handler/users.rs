//13
use std::sync::Arc;

use axum::{
    extract::Request,
    middleware::{self, Next},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use axum_extra::extract::cookie::CookieJar;

use crate::{
    dtos::{
        complaintdtos::{AdminDashboardResponseDto, DashboardResponseDto, ReportResponseDto},
        userdtos::{FilterUserDto, UserListResponseDto},
    },
    error::HttpError,
    middleware::{role_check, STAFF_ROLES},
    utils::{flash::take_flash, token::SessionUser},
    AppState,
};

const RECENT_COMPLAINTS: i64 = 10;

pub fn dashboard_handler() -> Router {
    Router::new().route("/dashboard", get(user_dashboard))
}

pub fn admin_handler() -> Router {
    Router::new()
        .route("/", get(admin_dashboard))
        .route("/users", get(manage_users))
        .route("/reports", get(reports))
        .layer(middleware::from_fn(|req: Request, next: Next| {
            role_check(req, next, &STAFF_ROLES)
        }))
}

pub async fn user_dashboard(
    jar: CookieJar,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(session): Extension<SessionUser>,
) -> Result<impl IntoResponse, HttpError> {
    let complaints = app_state.complaint_service.list_for_owner(session.id).await?;
    let stats = app_state.report_service.dashboard_stats(session.id).await?;

    let (jar, flash) = take_flash(jar);

    Ok((
        jar,
        Json(DashboardResponseDto {
            status: "success",
            username: session.username,
            complaints,
            stats,
            flash,
        }),
    ))
}

pub async fn admin_dashboard(
    jar: CookieJar,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(session): Extension<SessionUser>,
) -> Result<impl IntoResponse, HttpError> {
    let stats = app_state.report_service.admin_stats().await?;
    let complaints = app_state.complaint_service.recent(RECENT_COMPLAINTS).await?;

    let (jar, flash) = take_flash(jar);

    Ok((
        jar,
        Json(AdminDashboardResponseDto {
            status: "success",
            username: session.username,
            stats,
            complaints,
            flash,
        }),
    ))
}

pub async fn manage_users(
    jar: CookieJar,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let users = app_state.identity_service.list_users().await?;
    let (jar, flash) = take_flash(jar);

    Ok((
        jar,
        Json(UserListResponseDto {
            status: "success".to_string(),
            results: users.len(),
            users: FilterUserDto::filter_users(&users),
            flash,
        }),
    ))
}

pub async fn reports(
    jar: CookieJar,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let report = app_state.report_service.report().await?;
    let (jar, flash) = take_flash(jar);

    Ok((
        jar,
        Json(ReportResponseDto {
            status: "success",
            total: report.total,
            status_counts: report.status_counts,
            category_counts: report.category_counts,
            flash,
        }),
    ))
}
