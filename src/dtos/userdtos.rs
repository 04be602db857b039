//3
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    models::usermodel::User,
    service::identity_service::Registration,
    utils::flash::Flash,
};

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct RegisterUserDto {
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,

    #[validate(length(min = 1, max = 80, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, max = 120, message = "Full name is required"))]
    pub full_name: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    #[validate(length(max = 20, message = "Phone must not be more than 20 characters"))]
    pub phone: Option<String>,

    pub address: Option<String>,
}

impl RegisterUserDto {
    /// Trims the identity fields so whitespace-only input fails validation.
    /// The password is kept verbatim.
    pub fn normalized(self) -> Self {
        RegisterUserDto {
            email: self.email.trim().to_string(),
            username: self.username.trim().to_string(),
            full_name: self.full_name.trim().to_string(),
            ..self
        }
    }
}

impl From<RegisterUserDto> for Registration {
    fn from(dto: RegisterUserDto) -> Self {
        Registration {
            email: dto.email,
            username: dto.username,
            full_name: dto.full_name,
            password: dto.password,
            phone: dto.phone,
            address: dto.address,
        }
    }
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct LoginUserDto {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FilterUserDto {
    pub id: String,
    pub email: String,
    pub username: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub role: String,
    pub is_active: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl FilterUserDto {
    pub fn filter_user(user: &User) -> Self {
        FilterUserDto {
            id: user.id.to_string(),
            email: user.email.to_owned(),
            username: user.username.to_owned(),
            full_name: user.full_name.to_owned(),
            phone: user.phone.clone(),
            address: user.address.clone(),
            role: user.role.to_str().to_string(),
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }

    pub fn filter_users(user: &[User]) -> Vec<FilterUserDto> {
        user.iter().map(FilterUserDto::filter_user).collect()
    }
}

#[derive(Debug, Serialize)]
pub struct UserListResponseDto {
    pub status: String,
    pub users: Vec<FilterUserDto>,
    pub results: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash: Option<Flash>,
}

/// Body of the public pages (landing, login, register).
#[derive(Debug, Serialize)]
pub struct PageResponseDto {
    pub status: &'static str,
    pub page: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash: Option<Flash>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> RegisterUserDto {
        RegisterUserDto {
            email: "ada@example.com".to_string(),
            username: "ada".to_string(),
            full_name: "Ada Obi".to_string(),
            password: "secret".to_string(),
            phone: None,
            address: None,
        }
    }

    #[test]
    fn test_register_validation() {
        assert!(valid().validate().is_ok());

        let mut dto = valid();
        dto.email = "not-an-email".to_string();
        assert!(dto.validate().is_err());

        let mut dto = valid();
        dto.username = String::new();
        assert!(dto.validate().is_err());

        let mut dto = valid();
        dto.password = String::new();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_blank_identity_fields_rejected_after_trimming() {
        let mut dto = valid();
        dto.username = "   ".to_string();
        dto.full_name = "  ".to_string();
        assert!(dto.clone().validate().is_ok());
        assert!(dto.normalized().validate().is_err());

        let mut dto = valid();
        dto.email = " ada@example.com ".to_string();
        dto.password = " padded ".to_string();
        let dto = dto.normalized();
        assert!(dto.validate().is_ok());
        assert_eq!(dto.email, "ada@example.com");
        assert_eq!(dto.password, " padded ");
    }

    #[test]
    fn test_register_form_decoding_with_optional_fields() {
        let dto: RegisterUserDto = serde_urlencoded::from_str(
            "email=ada%40example.com&username=ada&full_name=Ada+Obi&password=secret",
        )
        .unwrap();
        assert_eq!(dto.email, "ada@example.com");
        assert_eq!(dto.full_name, "Ada Obi");
        assert_eq!(dto.phone, None);

        let registration: Registration = dto.normalized().into();
        assert_eq!(registration.username, "ada");
    }
}
