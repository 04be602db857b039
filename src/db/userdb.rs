// db/userdb.rs
use async_trait::async_trait;
use sqlx::Postgres;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::usermodel::{User, UserRole};

/// Column list shared by every user query.
const USER_COLUMNS: &str = r#"
    id, email, username, password_hash, full_name, phone, address,
    role, is_active, created_at
"#;

#[derive(Debug, Clone)]
pub struct NewUserRecord {
    pub email: String,
    pub username: String,
    pub full_name: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub role: UserRole,
}

#[async_trait]
pub trait UserExt {
    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error>;

    async fn get_users(&self) -> Result<Vec<User>, sqlx::Error>;

    async fn count_users_by_role(&self, role: UserRole) -> Result<i64, sqlx::Error>;

    async fn find_user_by_email_or_username_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, Postgres>,
        email: &str,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error>;

    async fn save_user_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, Postgres>,
        user: NewUserRecord,
    ) -> Result<User, sqlx::Error>;
}

#[async_trait]
impl UserExt for DBClient {
    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error> {
        let mut user: Option<User> = None;

        if let Some(user_id) = user_id {
            user = sqlx::query_as::<_, User>(&format!(
                "SELECT {} FROM users WHERE id = $1",
                USER_COLUMNS
            ))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        } else if let Some(username) = username {
            user = sqlx::query_as::<_, User>(&format!(
                "SELECT {} FROM users WHERE username = $1",
                USER_COLUMNS
            ))
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        } else if let Some(email) = email {
            user = sqlx::query_as::<_, User>(&format!(
                "SELECT {} FROM users WHERE email = $1",
                USER_COLUMNS
            ))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        }

        Ok(user)
    }

    async fn get_users(&self) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users ORDER BY created_at DESC",
            USER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
    }

    async fn count_users_by_role(&self, role: UserRole) -> Result<i64, sqlx::Error> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = $1")
            .bind(role)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn find_user_by_email_or_username_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, Postgres>,
        email: &str,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = $1 OR username = $2 LIMIT 1",
            USER_COLUMNS
        ))
        .bind(email)
        .bind(username)
        .fetch_optional(&mut **tx)
        .await
    }

    async fn save_user_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, Postgres>,
        user: NewUserRecord,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, username, password_hash, full_name, phone, address, role)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(user.email)
        .bind(user.username)
        .bind(user.password_hash)
        .bind(user.full_name)
        .bind(user.phone)
        .bind(user.address)
        .bind(user.role)
        .fetch_one(&mut **tx)
        .await
    }
}
