// utils/flash.rs
use axum::{
    http::{header, HeaderValue},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::{Deserialize, Serialize};

pub const FLASH_COOKIE: &str = "flash";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FlashLevel {
    Success,
    Error,
}

impl FlashLevel {
    fn to_str(&self) -> &'static str {
        match self {
            FlashLevel::Success => "success",
            FlashLevel::Error => "error",
        }
    }
}

/// A one-shot message shown on the next page the browser loads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Flash {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Flash {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }

    pub fn encode(&self) -> String {
        format!("{}:{}", self.level.to_str(), urlencoding::encode(&self.message))
    }

    pub fn decode(raw: &str) -> Option<Flash> {
        let (level, message) = raw.split_once(':')?;
        let level = match level {
            "success" => FlashLevel::Success,
            "error" => FlashLevel::Error,
            _ => return None,
        };
        let message = urlencoding::decode(message).ok()?.into_owned();
        Some(Flash { level, message })
    }

    pub fn redirect_to(self, to: impl Into<String>) -> FlashRedirect {
        FlashRedirect {
            flash: self,
            to: to.into(),
            cookies: Vec::new(),
        }
    }
}

/// A 303 redirect that leaves a flash message, and optionally extra cookies,
/// behind.
#[derive(Debug)]
pub struct FlashRedirect {
    pub flash: Flash,
    pub to: String,
    cookies: Vec<Cookie<'static>>,
}

impl FlashRedirect {
    pub fn with_cookie(mut self, cookie: Cookie<'static>) -> Self {
        self.cookies.push(cookie);
        self
    }
}

impl IntoResponse for FlashRedirect {
    fn into_response(self) -> Response {
        let mut response = Redirect::to(&self.to).into_response();

        let mut cookies = self.cookies;
        cookies.push(
            Cookie::build((FLASH_COOKIE, self.flash.encode()))
                .path("/")
                .http_only(true)
                .build(),
        );

        for cookie in cookies {
            match HeaderValue::from_str(&cookie.to_string()) {
                Ok(value) => {
                    response.headers_mut().append(header::SET_COOKIE, value);
                }
                Err(e) => tracing::warn!("Dropping unencodable cookie {}: {}", cookie.name(), e),
            }
        }

        response
    }
}

/// Reads and clears the pending flash message.
pub fn take_flash(jar: CookieJar) -> (CookieJar, Option<Flash>) {
    let flash = jar
        .get(FLASH_COOKIE)
        .and_then(|cookie| Flash::decode(cookie.value()));

    let jar = jar.remove(Cookie::build(FLASH_COOKIE).path("/"));
    (jar, flash)
}
