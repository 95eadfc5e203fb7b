use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A card row. `position` is zero-based and unique within its column.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Card {
    pub id: Uuid,
    pub column_id: Uuid,
    pub title: String,
    pub description: String,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

/// Input structure for creating a card. New cards are appended at the end
/// of their column.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CardInput {
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// Maximum length of 2000 characters if provided; defaults to empty.
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

/// Partial update for a card. Omitted fields keep their stored value.
/// Position is not updatable here; only the move endpoint relocates cards.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CardUpdate {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

/// Request body for relocating a card to a column and zero-based position.
/// The target column may be the card's current one.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct MoveCardRequest {
    pub column_id: Uuid,
    #[validate(range(min = 0))]
    pub position: i32,
}
