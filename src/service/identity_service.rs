// service/identity_service.rs
use std::sync::Arc;

use crate::{
    db::{
        db::DBClient,
        userdb::{NewUserRecord, UserExt},
    },
    models::usermodel::{User, UserRole},
    service::error::ServiceError,
    utils::password,
};

pub const ADMIN_USERNAME: &str = "admin";
const ADMIN_EMAIL: &str = "admin@localgov.com";
const ADMIN_FULL_NAME: &str = "System Administrator";
const ADMIN_PHONE: &str = "0000000000";

#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub username: String,
    pub full_name: String,
    pub password: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone)]
pub struct IdentityService {
    db_client: Arc<DBClient>,
}

impl IdentityService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    /// Creates a citizen account. Email and username must both be unused.
    pub async fn register(&self, registration: Registration) -> Result<User, ServiceError> {
        let record = NewUserRecord {
            email: registration.email,
            username: registration.username,
            full_name: registration.full_name,
            password_hash: password::hash(registration.password)?,
            phone: non_empty(registration.phone),
            address: non_empty(registration.address),
            role: UserRole::Citizen,
        };

        self.insert_user(record).await
    }

    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, ServiceError> {
        let user = self
            .db_client
            .get_user(None, Some(username), None)
            .await?
            .ok_or(ServiceError::InvalidCredentials)?;

        let password_matched = password::compare(password, &user.password_hash)
            .map_err(|_| ServiceError::InvalidCredentials)?;

        if !password_matched || !user.is_active {
            return Err(ServiceError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Makes sure the `admin` account exists. Returns `true` when it had to
    /// be created.
    pub async fn ensure_admin(&self, default_password: &str) -> Result<bool, ServiceError> {
        let existing = self
            .db_client
            .get_user(None, Some(ADMIN_USERNAME), None)
            .await?;

        if existing.is_some() {
            tracing::debug!("Admin account already present");
            return Ok(false);
        }

        let record = NewUserRecord {
            email: ADMIN_EMAIL.to_string(),
            username: ADMIN_USERNAME.to_string(),
            full_name: ADMIN_FULL_NAME.to_string(),
            password_hash: password::hash(default_password)?,
            phone: Some(ADMIN_PHONE.to_string()),
            address: None,
            role: UserRole::Admin,
        };

        match self.insert_user(record).await {
            Ok(admin) => {
                tracing::warn!(
                    "Created default admin account '{}' ({}); change its password",
                    admin.username,
                    admin.id
                );
                Ok(true)
            }
            // Another instance bootstrapped it first.
            Err(ServiceError::Duplicate) => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub async fn list_users(&self) -> Result<Vec<User>, ServiceError> {
        Ok(self.db_client.get_users().await?)
    }

    async fn insert_user(&self, record: NewUserRecord) -> Result<User, ServiceError> {
        let mut tx = self.db_client.pool.begin().await?;

        let existing = self
            .db_client
            .find_user_by_email_or_username_tx(&mut tx, &record.email, &record.username)
            .await?;

        ensure_unclaimed(existing.as_ref(), &record.email, &record.username)?;

        let user = self
            .db_client
            .save_user_tx(&mut tx, record)
            .await
            .map_err(duplicate_or_database)?;

        tx.commit().await?;

        tracing::info!("Registered user {} ({:?})", user.username, user.role);
        Ok(user)
    }
}

/// Fails with `Duplicate` when `existing` already holds the email or the username.
fn ensure_unclaimed(
    existing: Option<&User>,
    email: &str,
    username: &str,
) -> Result<(), ServiceError> {
    match existing {
        Some(user) if user.email == email || user.username == username => {
            Err(ServiceError::Duplicate)
        }
        _ => Ok(()),
    }
}

// A concurrent registration can still win the race past the lookup.
fn duplicate_or_database(err: sqlx::Error) -> ServiceError {
    if ServiceError::is_unique_violation(&err) {
        ServiceError::Duplicate
    } else {
        ServiceError::Database(err)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use sqlx::{error::ErrorKind, postgres::PgPoolOptions};
    use uuid::Uuid;

    use super::*;
    use crate::service::error::database_error;

    fn registered(email: &str, username: &str) -> User {
        User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            username: username.to_string(),
            password_hash: "hash".to_string(),
            full_name: "Ada Obi".to_string(),
            phone: None,
            address: None,
            role: UserRole::Citizen,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn lazy_service() -> IdentityService {
        let pool = PgPoolOptions::new()
            .acquire_timeout(std::time::Duration::from_millis(200))
            .connect_lazy("postgres://localhost:1/unreachable")
            .unwrap();
        IdentityService::new(Arc::new(DBClient::new(pool)))
    }

    #[test]
    fn test_non_empty_contact_fields() {
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some("".to_string())), None);
        assert_eq!(non_empty(Some("   ".to_string())), None);
        assert_eq!(non_empty(Some(" 555-0100 ".to_string())), Some("555-0100".to_string()));
    }

    #[test]
    fn test_taken_email_or_username_is_duplicate() {
        let existing = registered("ada@example.com", "ada");

        let email_clash = ensure_unclaimed(Some(&existing), "ada@example.com", "ada2");
        assert!(matches!(email_clash, Err(ServiceError::Duplicate)));

        let username_clash = ensure_unclaimed(Some(&existing), "other@example.com", "ada");
        assert!(matches!(username_clash, Err(ServiceError::Duplicate)));

        let both_clash = ensure_unclaimed(Some(&existing), "ada@example.com", "ada");
        assert!(matches!(both_clash, Err(ServiceError::Duplicate)));

        assert!(ensure_unclaimed(None, "ada@example.com", "ada").is_ok());
    }

    #[test]
    fn test_unique_violation_on_insert_is_duplicate() {
        let err = duplicate_or_database(database_error(ErrorKind::UniqueViolation));
        assert!(matches!(err, ServiceError::Duplicate));
        assert_eq!(err.user_message(), "Email or username already exists!");

        let err = duplicate_or_database(database_error(ErrorKind::NotNullViolation));
        assert!(matches!(err, ServiceError::Database(_)));

        let err = duplicate_or_database(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, ServiceError::Database(_)));
    }

    #[tokio::test]
    async fn test_register_rejects_empty_password_before_touching_store() {
        let service = lazy_service();
        let err = service
            .register(Registration {
                email: "ada@example.com".to_string(),
                username: "ada".to_string(),
                full_name: "Ada Obi".to_string(),
                password: String::new(),
                phone: None,
                address: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn test_store_failure_surfaces_as_database_error() {
        let service = lazy_service();
        let err = service.authenticate("ada", "secret").await.unwrap_err();
        assert!(matches!(err, ServiceError::Database(_)));
    }
}
