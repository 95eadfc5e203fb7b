use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::models::column::ColumnAggregate;

/// A board row. Listing endpoints return boards bare, without their columns;
/// the nested read view is [`BoardAggregate`].
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Board {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Input structure for creating a board.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct BoardInput {
    /// Must be between 1 and 120 characters.
    #[validate(length(min = 1, max = 120))]
    pub name: String,
}

/// The single read path: a board composed with its columns and their cards,
/// both ordered by stored position (ascending).
#[derive(Debug, Serialize, Deserialize)]
pub struct BoardAggregate {
    #[serde(flatten)]
    pub board: Board,
    pub columns: Vec<ColumnAggregate>,
}
