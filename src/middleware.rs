//9
use std::sync::Arc;

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
    Extension,
};
use axum_extra::extract::cookie::CookieJar;

use crate::{
    error::ErrorMessage,
    models::usermodel::UserRole,
    utils::{flash::{Flash, FlashRedirect}, token::{self, SessionUser}},
    AppState,
};

pub const SESSION_COOKIE: &str = "token";

pub const STAFF_ROLES: [UserRole; 2] = [UserRole::Admin, UserRole::Staff];

pub async fn auth(
    cookie_jar: CookieJar,
    Extension(app_state): Extension<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, FlashRedirect> {
    let login_required =
        || Flash::error(ErrorMessage::TokenNotProvided.to_string()).redirect_to("/login");

    let token = cookie_jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(login_required)?;

    let session = match token::decode_token(token, app_state.env.jwt_secret.as_bytes()) {
        Ok(session) => session,
        Err(e) => {
            tracing::debug!("Rejected session cookie: {}", e);
            return Err(login_required());
        }
    };

    req.extensions_mut().insert(session);

    Ok(next.run(req).await)
}

pub async fn role_check(
    req: Request,
    next: Next,
    required_roles: &'static [UserRole],
) -> Result<Response, FlashRedirect> {
    let session = req.extensions().get::<SessionUser>().ok_or_else(|| {
        Flash::error(ErrorMessage::UserNotAuthenticated.to_string()).redirect_to("/login")
    })?;

    if !required_roles.contains(&session.role) {
        tracing::info!(
            "User {} ({}) denied access to {}",
            session.username,
            session.role.to_str(),
            req.uri().path()
        );
        return Err(Flash::error(ErrorMessage::PermissionDenied.to_string()).redirect_to("/"));
    }

    Ok(next.run(req).await)
}
