//12
use std::sync::Arc;

use axum::{response::IntoResponse, routing::get, Extension, Form, Json, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use validator::Validate;

use crate::{
    dtos::userdtos::{LoginUserDto, PageResponseDto, RegisterUserDto},
    error::ErrorMessage,
    middleware::SESSION_COOKIE,
    models::usermodel::User,
    service::error::ServiceError,
    utils::{
        flash::{take_flash, Flash, FlashRedirect},
        token,
    },
    AppState,
};

pub fn auth_handler() -> Router {
    Router::new()
        .route("/", get(index))
        .route("/register", get(register_form).post(register))
        .route("/login", get(login_form).post(login))
        .route("/logout", get(logout))
}

fn page(jar: CookieJar, page: &'static str) -> impl IntoResponse {
    let (jar, flash) = take_flash(jar);
    (
        jar,
        Json(PageResponseDto {
            status: "success",
            page,
            flash,
        }),
    )
}

pub async fn index(jar: CookieJar) -> impl IntoResponse {
    page(jar, "index")
}

pub async fn register_form(jar: CookieJar) -> impl IntoResponse {
    page(jar, "register")
}

pub async fn login_form(jar: CookieJar) -> impl IntoResponse {
    page(jar, "login")
}

pub async fn register(
    Extension(app_state): Extension<Arc<AppState>>,
    Form(body): Form<RegisterUserDto>,
) -> FlashRedirect {
    let body = body.normalized();

    if let Err(e) = body.validate() {
        return registration_outcome(Err(e.into()));
    }

    registration_outcome(app_state.identity_service.register(body.into()).await)
}

fn registration_outcome(result: Result<User, ServiceError>) -> FlashRedirect {
    match result {
        Ok(_) => Flash::success("Registration successful! Please log in.").redirect_to("/login"),
        Err(ServiceError::Duplicate) => {
            Flash::error(ErrorMessage::EmailOrUsernameExist.to_string()).redirect_to("/register")
        }
        Err(e @ ServiceError::Validation(_)) => {
            Flash::error(format!("Registration failed: {}", e.user_message()))
                .redirect_to("/register")
        }
        Err(e) => {
            tracing::error!("Registration failed: {}", e);
            Flash::error(format!("Registration failed: {}", e.user_message()))
                .redirect_to("/register")
        }
    }
}

pub async fn login(
    Extension(app_state): Extension<Arc<AppState>>,
    Form(body): Form<LoginUserDto>,
) -> FlashRedirect {
    let wrong_credentials =
        || Flash::error(ErrorMessage::WrongCredentials.to_string()).redirect_to("/login");

    if body.validate().is_err() {
        return wrong_credentials();
    }

    let user = match app_state
        .identity_service
        .authenticate(&body.username, &body.password)
        .await
    {
        Ok(user) => user,
        Err(ServiceError::InvalidCredentials) => {
            tracing::info!("Failed login attempt for '{}'", body.username);
            return wrong_credentials();
        }
        Err(e) => {
            tracing::error!("Login lookup failed for '{}': {}", body.username, e);
            return wrong_credentials();
        }
    };

    let token = match token::create_token(
        &user.id.to_string(),
        &user.username,
        user.role,
        app_state.env.jwt_secret.as_bytes(),
        app_state.env.session_maxage,
    ) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("Could not sign session for {}: {}", user.id, e);
            return wrong_credentials();
        }
    };

    let cookie_duration = time::Duration::hours(app_state.env.session_maxage);
    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .max_age(cookie_duration)
        .http_only(true)
        .build();

    tracing::info!("User {} logged in as {}", user.username, user.role.to_str());

    let landing = if user.role.is_staff() { "/admin" } else { "/dashboard" };

    Flash::success(format!("Welcome back, {}!", user.full_name))
        .redirect_to(landing)
        .with_cookie(cookie)
}

pub async fn logout() -> FlashRedirect {
    let cookie = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .max_age(time::Duration::ZERO)
        .http_only(true)
        .build();

    Flash::success("You have been logged out.")
        .redirect_to("/")
        .with_cookie(cookie)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::flash::FlashLevel;

    #[test]
    fn test_duplicate_registration_returns_to_form() {
        let redirect = registration_outcome(Err(ServiceError::Duplicate));
        assert_eq!(redirect.to, "/register");
        assert_eq!(redirect.flash, Flash::error("Email or username already exists!"));
    }

    #[test]
    fn test_invalid_registration_reports_reason() {
        let redirect =
            registration_outcome(Err(ServiceError::Validation("Username is required".into())));
        assert_eq!(redirect.to, "/register");
        assert_eq!(redirect.flash.level, FlashLevel::Error);
        assert_eq!(redirect.flash.message, "Registration failed: Username is required");
    }

    #[test]
    fn test_store_failure_is_not_leaked() {
        let redirect = registration_outcome(Err(ServiceError::Database(sqlx::Error::PoolTimedOut)));
        assert_eq!(redirect.to, "/register");
        assert_eq!(redirect.flash.message, "Registration failed: An internal error occurred");
    }
}
