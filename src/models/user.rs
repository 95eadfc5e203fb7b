use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A user account as stored in the database and returned by the API.
///
/// The credential hash never leaves the server: it is skipped during
/// serialization. It is `None` for accounts created through a federated
/// identity provider, which have no local password.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip)]
    pub password_hash: Option<String>,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
