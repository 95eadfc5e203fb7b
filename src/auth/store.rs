//!
//! # Identity & Session Store
//!
//! `AuthStore` owns every query touching `users`, `sessions`, and
//! `oauth_accounts`. Sessions are opaque random tokens with an absolute
//! expiry; the expiry comparison happens inside the lookup query itself so
//! a session can never pass an existence check and then expire before use.

use chrono::{DateTime, Duration, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::auth::token::generate_token;
use crate::error::AppError;
use crate::models::User;

/// Sessions live for 30 days from creation.
const SESSION_TTL_DAYS: i64 = 30;

/// A session row: an opaque bearer token bound to a user until its expiry.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub token: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

/// Store for users and sessions, constructed with an injected connection
/// pool. Cloning is cheap; the pool is internally reference-counted.
#[derive(Clone)]
pub struct AuthStore {
    pool: PgPool,
}

impl AuthStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a new user. A `None` credential hash marks an account that
    /// can only sign in through a federated identity provider.
    ///
    /// A duplicate email surfaces as `AppError::Conflict` via the unique
    /// constraint, so check-then-insert races collapse into one outcome.
    pub async fn create_user(
        &self,
        email: &str,
        password_hash: Option<&str>,
        name: &str,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (email, password_hash, name) VALUES ($1, $2, $3)
             RETURNING id, email, password_hash, name, created_at",
        )
        .bind(email)
        .bind(password_hash)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn user_by_email(&self, email: &str) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, name, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        user.ok_or_else(|| AppError::NotFound("user not found".into()))
    }

    pub async fn user_by_id(&self, id: Uuid) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, name, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        user.ok_or_else(|| AppError::NotFound("user not found".into()))
    }

    /// Issues a new session for the user: a fresh random token with an
    /// absolute expiry 30 days out.
    pub async fn create_session(&self, user_id: Uuid) -> Result<Session, AppError> {
        let session = Session {
            token: generate_token()?,
            user_id,
            expires_at: Utc::now() + Duration::days(SESSION_TTL_DAYS),
        };
        sqlx::query("INSERT INTO sessions (token, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(&session.token)
            .bind(session.user_id)
            .bind(session.expires_at)
            .execute(&self.pool)
            .await?;
        Ok(session)
    }

    /// Maps a bearer token to its user, or fails with `Unauthenticated`.
    ///
    /// The token lookup and the expiry check are one query, and a session
    /// whose user row has vanished is treated exactly like no session at
    /// all. This is the only authentication path in the system; it is
    /// read-only and re-queries on every call.
    pub async fn authenticate(&self, token: &str) -> Result<User, AppError> {
        let session = sqlx::query_as::<_, Session>(
            "SELECT token, user_id, expires_at FROM sessions
             WHERE token = $1 AND expires_at > now()",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        let session = match session {
            Some(session) => session,
            None => return Err(AppError::Unauthenticated("invalid session".into())),
        };

        match self.user_by_id(session.user_id).await {
            Ok(user) => Ok(user),
            // Orphaned session: the row outlived its user.
            Err(AppError::NotFound(_)) => {
                Err(AppError::Unauthenticated("invalid session".into()))
            }
            Err(e) => Err(e),
        }
    }

    /// Deletes a session (logout). Deleting an unknown token is a no-op.
    pub async fn delete_session(&self, token: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Removes sessions past their expiry. Expired rows are already inert
    /// (the lookup in [`authenticate`](Self::authenticate) excludes them);
    /// this is housekeeping, safe to run at any cadence.
    pub async fn delete_expired_sessions(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at < now()")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Resolves a federated identity to a local user, creating and linking
    /// rows as needed: first by (provider, provider id), then by email for
    /// users who signed up locally before linking, and finally by creating
    /// a passwordless account.
    pub async fn find_or_create_oauth_user(
        &self,
        provider: &str,
        provider_id: &str,
        email: &str,
        name: &str,
    ) -> Result<User, AppError> {
        let linked: Option<(Uuid,)> = sqlx::query_as(
            "SELECT user_id FROM oauth_accounts WHERE provider = $1 AND provider_id = $2",
        )
        .bind(provider)
        .bind(provider_id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some((user_id,)) = linked {
            return self.user_by_id(user_id).await;
        }

        match self.user_by_email(email).await {
            Ok(user) => {
                self.link_oauth_account(user.id, provider, provider_id)
                    .await?;
                Ok(user)
            }
            Err(AppError::NotFound(_)) => {
                let user = self.create_user(email, None, name).await?;
                self.link_oauth_account(user.id, provider, provider_id)
                    .await?;
                Ok(user)
            }
            Err(e) => Err(e),
        }
    }

    async fn link_oauth_account(
        &self,
        user_id: Uuid,
        provider: &str,
        provider_id: &str,
    ) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO oauth_accounts (user_id, provider, provider_id) VALUES ($1, $2, $3)",
        )
        .bind(user_id)
        .bind(provider)
        .bind(provider_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
