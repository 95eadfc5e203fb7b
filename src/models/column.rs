use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::models::card::Card;

/// A column row. `position` is zero-based and unique within its board.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Column {
    pub id: Uuid,
    pub board_id: Uuid,
    pub name: String,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

/// Input structure for creating a column. New columns are appended at the
/// end of the board; the position cannot be chosen at creation time.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ColumnInput {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
}

/// Partial update for a column. Each field is independently optional; an
/// omitted field leaves the stored value unchanged.
///
/// The position override writes the raw value without re-packing sibling
/// positions. The move endpoint is the safe way to reorder.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ColumnUpdate {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    #[validate(range(min = 0))]
    pub position: Option<i32>,
}

/// Request body for repositioning a column within its board.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct MoveColumnRequest {
    #[validate(range(min = 0))]
    pub position: i32,
}

/// A column with its cards, ordered by position. The card list is always
/// present; a column without cards serializes as an empty array, never null.
#[derive(Debug, Serialize, Deserialize)]
pub struct ColumnAggregate {
    #[serde(flatten)]
    pub column: Column,
    pub cards: Vec<Card>,
}
