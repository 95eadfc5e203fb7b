//!
//! # Board Store
//!
//! `BoardStore` owns every query touching `boards`, `board_columns`, and
//! `cards`: ownership checks, CRUD, and the transactional reordering that
//! keeps sibling positions dense (`0..n-1`, no duplicates, no gaps).
//!
//! Ownership checks return two states only: the entity joined down to the
//! calling user, or `NotFound`. A caller can never distinguish "exists but
//! belongs to someone else" from "does not exist".
//!
//! Every multi-step mutation runs in a single transaction. Reordering
//! starts with a `SELECT ... FOR UPDATE` on the moved row, so two
//! concurrent moves of the same entity serialize at the database; the bulk
//! `UPDATE ... WHERE` sweeps take row locks on the siblings they shift.
//! Dropping a handler future mid-flight rolls the transaction back.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Board, BoardAggregate, Card, Column, ColumnAggregate};

/// Every new board starts with these columns, in this order.
const DEFAULT_COLUMNS: [&str; 3] = ["Todo", "Doing", "Done"];

/// Store for the board → column → card hierarchy, constructed with an
/// injected connection pool. Cloning is cheap; the pool is internally
/// reference-counted.
#[derive(Clone)]
pub struct BoardStore {
    pool: PgPool,
}

impl BoardStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Boards

    /// Creates a board together with its three default columns at positions
    /// 0, 1, 2. Board row and columns commit atomically: a board with fewer
    /// than three columns is never observable.
    pub async fn create_board(&self, user_id: Uuid, name: &str) -> Result<Board, AppError> {
        let mut tx = self.pool.begin().await?;

        let board = sqlx::query_as::<_, Board>(
            "INSERT INTO boards (user_id, name) VALUES ($1, $2)
             RETURNING id, user_id, name, created_at",
        )
        .bind(user_id)
        .bind(name)
        .fetch_one(&mut *tx)
        .await?;

        for (i, column_name) in DEFAULT_COLUMNS.iter().enumerate() {
            sqlx::query("INSERT INTO board_columns (board_id, name, position) VALUES ($1, $2, $3)")
                .bind(board.id)
                .bind(column_name)
                .bind(i as i32)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(board)
    }

    /// Lists the user's boards, newest first, without columns or cards.
    pub async fn list_boards(&self, user_id: Uuid) -> Result<Vec<Board>, AppError> {
        let boards = sqlx::query_as::<_, Board>(
            "SELECT id, user_id, name, created_at FROM boards
             WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(boards)
    }

    /// Returns the board row if and only if it is owned by `user_id`.
    pub async fn board_owned(&self, board_id: Uuid, user_id: Uuid) -> Result<Board, AppError> {
        let board = sqlx::query_as::<_, Board>(
            "SELECT id, user_id, name, created_at FROM boards WHERE id = $1 AND user_id = $2",
        )
        .bind(board_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        board.ok_or_else(|| AppError::NotFound("board not found".into()))
    }

    /// The single read path: the board with its columns and their cards,
    /// both ordered by stored position ascending. Columns without cards
    /// carry an empty list.
    pub async fn board_aggregate(
        &self,
        board_id: Uuid,
        user_id: Uuid,
    ) -> Result<BoardAggregate, AppError> {
        let board = self.board_owned(board_id, user_id).await?;

        let columns = sqlx::query_as::<_, Column>(
            "SELECT id, board_id, name, position, created_at FROM board_columns
             WHERE board_id = $1 ORDER BY position",
        )
        .bind(board.id)
        .fetch_all(&self.pool)
        .await?;

        let mut nested = Vec::with_capacity(columns.len());
        for column in columns {
            let cards = self.list_cards(column.id).await?;
            nested.push(ColumnAggregate { column, cards });
        }

        Ok(BoardAggregate {
            board,
            columns: nested,
        })
    }

    /// Deletes a board owned by the user. The relational cascade removes
    /// its columns and all of their cards.
    pub async fn delete_board(&self, board_id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM boards WHERE id = $1 AND user_id = $2")
            .bind(board_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("board not found".into()));
        }
        Ok(())
    }

    // Columns

    /// Resolves a column to its board, but only when the board is owned by
    /// `user_id`. One joined query, re-run on every call.
    pub async fn column_board_owner(
        &self,
        column_id: Uuid,
        user_id: Uuid,
    ) -> Result<Uuid, AppError> {
        let board_id: Option<(Uuid,)> = sqlx::query_as(
            "SELECT bc.board_id FROM board_columns bc
             JOIN boards b ON b.id = bc.board_id
             WHERE bc.id = $1 AND b.user_id = $2",
        )
        .bind(column_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        board_id
            .map(|(id,)| id)
            .ok_or_else(|| AppError::NotFound("column not found".into()))
    }

    /// Appends a column at the end of the board: one past the current
    /// maximum position, or 0 for an empty board. Existing positions are
    /// never reused or renumbered.
    pub async fn create_column(&self, board_id: Uuid, name: &str) -> Result<Column, AppError> {
        let column = sqlx::query_as::<_, Column>(
            "INSERT INTO board_columns (board_id, name, position)
             VALUES ($1, $2, COALESCE((SELECT MAX(position) + 1 FROM board_columns WHERE board_id = $1), 0))
             RETURNING id, board_id, name, position, created_at",
        )
        .bind(board_id)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(column)
    }

    /// Partial update: omitted fields keep their stored value. The position
    /// override writes the raw value and does not re-pack siblings; callers
    /// wanting safe reordering use [`move_column`](Self::move_column).
    pub async fn update_column(
        &self,
        column_id: Uuid,
        name: Option<&str>,
        position: Option<i32>,
    ) -> Result<Column, AppError> {
        let column = sqlx::query_as::<_, Column>(
            "UPDATE board_columns SET
                name = COALESCE($2, name),
                position = COALESCE($3, position)
             WHERE id = $1
             RETURNING id, board_id, name, position, created_at",
        )
        .bind(column_id)
        .bind(name)
        .bind(position)
        .fetch_optional(&self.pool)
        .await?;
        column.ok_or_else(|| AppError::NotFound("column not found".into()))
    }

    /// Deletes a column and, in the same transaction, closes the position
    /// gap it leaves among its siblings, keeping board positions dense.
    /// The relational cascade removes the column's cards.
    pub async fn delete_column(&self, column_id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let row: Option<(Uuid, i32)> = sqlx::query_as(
            "SELECT board_id, position FROM board_columns WHERE id = $1 FOR UPDATE",
        )
        .bind(column_id)
        .fetch_optional(&mut *tx)
        .await?;
        let (board_id, position) = match row {
            Some(row) => row,
            None => return Err(AppError::NotFound("column not found".into())),
        };

        sqlx::query("DELETE FROM board_columns WHERE id = $1")
            .bind(column_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "UPDATE board_columns SET position = position - 1
             WHERE board_id = $1 AND position > $2",
        )
        .bind(board_id)
        .bind(position)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Repositions a column within its board using the same gap-close /
    /// gap-open sweep as [`move_card`](Self::move_card). Cross-board column
    /// moves are not supported.
    ///
    /// The store does not clamp `target_position`; a target past the end
    /// lands the column last in effect.
    pub async fn move_column(
        &self,
        column_id: Uuid,
        target_position: i32,
    ) -> Result<Column, AppError> {
        let mut tx = self.pool.begin().await?;

        let row: Option<(Uuid, i32)> = sqlx::query_as(
            "SELECT board_id, position FROM board_columns WHERE id = $1 FOR UPDATE",
        )
        .bind(column_id)
        .fetch_optional(&mut *tx)
        .await?;
        let (board_id, src_position) = match row {
            Some(row) => row,
            None => return Err(AppError::NotFound("column not found".into())),
        };

        // Close the gap left at the source position. The moved column may be
        // swept by the second update; its final position is written last, so
        // that is harmless.
        sqlx::query(
            "UPDATE board_columns SET position = position - 1
             WHERE board_id = $1 AND position > $2",
        )
        .bind(board_id)
        .bind(src_position)
        .execute(&mut *tx)
        .await?;

        // Open a slot at the target position
        sqlx::query(
            "UPDATE board_columns SET position = position + 1
             WHERE board_id = $1 AND position >= $2",
        )
        .bind(board_id)
        .bind(target_position)
        .execute(&mut *tx)
        .await?;

        let column = sqlx::query_as::<_, Column>(
            "UPDATE board_columns SET position = $2 WHERE id = $1
             RETURNING id, board_id, name, position, created_at",
        )
        .bind(column_id)
        .bind(target_position)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(column)
    }

    // Cards

    /// Proves the card belongs to a board owned by `user_id`, joining
    /// card → column → board → user in one query.
    pub async fn card_owner(&self, card_id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(
                SELECT 1 FROM cards c
                JOIN board_columns bc ON bc.id = c.column_id
                JOIN boards b ON b.id = bc.board_id
                WHERE c.id = $1 AND b.user_id = $2
            )",
        )
        .bind(card_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        if !exists {
            return Err(AppError::NotFound("card not found".into()));
        }
        Ok(())
    }

    async fn list_cards(&self, column_id: Uuid) -> Result<Vec<Card>, AppError> {
        let cards = sqlx::query_as::<_, Card>(
            "SELECT id, column_id, title, description, position, created_at FROM cards
             WHERE column_id = $1 ORDER BY position",
        )
        .bind(column_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(cards)
    }

    /// Appends a card at the end of the column, same rule as
    /// [`create_column`](Self::create_column).
    pub async fn create_card(
        &self,
        column_id: Uuid,
        title: &str,
        description: &str,
    ) -> Result<Card, AppError> {
        let card = sqlx::query_as::<_, Card>(
            "INSERT INTO cards (column_id, title, description, position)
             VALUES ($1, $2, $3, COALESCE((SELECT MAX(position) + 1 FROM cards WHERE column_id = $1), 0))
             RETURNING id, column_id, title, description, position, created_at",
        )
        .bind(column_id)
        .bind(title)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;
        Ok(card)
    }

    /// Partial update: omitted fields keep their stored value. Position and
    /// column are only reachable through [`move_card`](Self::move_card).
    pub async fn update_card(
        &self,
        card_id: Uuid,
        title: Option<&str>,
        description: Option<&str>,
    ) -> Result<Card, AppError> {
        let card = sqlx::query_as::<_, Card>(
            "UPDATE cards SET
                title = COALESCE($2, title),
                description = COALESCE($3, description)
             WHERE id = $1
             RETURNING id, column_id, title, description, position, created_at",
        )
        .bind(card_id)
        .bind(title)
        .bind(description)
        .fetch_optional(&self.pool)
        .await?;
        card.ok_or_else(|| AppError::NotFound("card not found".into()))
    }

    /// Deletes a card and closes the position gap among its former
    /// siblings in the same transaction.
    pub async fn delete_card(&self, card_id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let row: Option<(Uuid, i32)> =
            sqlx::query_as("SELECT column_id, position FROM cards WHERE id = $1 FOR UPDATE")
                .bind(card_id)
                .fetch_optional(&mut *tx)
                .await?;
        let (column_id, position) = match row {
            Some(row) => row,
            None => return Err(AppError::NotFound("card not found".into())),
        };

        sqlx::query("DELETE FROM cards WHERE id = $1")
            .bind(card_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "UPDATE cards SET position = position - 1 WHERE column_id = $1 AND position > $2",
        )
        .bind(column_id)
        .bind(position)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Relocates a card to `target_column_id` at `target_position`,
    /// preserving dense positions in both the source and the destination
    /// column. The destination may equal the source.
    ///
    /// One transaction, four steps: read the card's current location
    /// (locking the row), decrement every source sibling past the vacated
    /// position, increment every destination card at or past the target,
    /// then write the card's new column and position. The second sweep runs
    /// against the post-first-sweep state as live bulk updates, which is
    /// what makes the same-column case compose correctly. Any failure rolls
    /// the whole move back.
    ///
    /// `target_position` equal to the destination's card count appends; the
    /// store does not clamp larger values.
    pub async fn move_card(
        &self,
        card_id: Uuid,
        target_column_id: Uuid,
        target_position: i32,
    ) -> Result<Card, AppError> {
        let mut tx = self.pool.begin().await?;

        let row: Option<(Uuid, i32)> =
            sqlx::query_as("SELECT column_id, position FROM cards WHERE id = $1 FOR UPDATE")
                .bind(card_id)
                .fetch_optional(&mut *tx)
                .await?;
        let (src_column_id, src_position) = match row {
            Some(row) => row,
            None => return Err(AppError::NotFound("card not found".into())),
        };

        // Close the gap in the source column
        sqlx::query(
            "UPDATE cards SET position = position - 1 WHERE column_id = $1 AND position > $2",
        )
        .bind(src_column_id)
        .bind(src_position)
        .execute(&mut *tx)
        .await?;

        // Open a slot in the target column. In the same-column case this may
        // sweep the moved card too; the final write below overrides it.
        sqlx::query(
            "UPDATE cards SET position = position + 1
             WHERE column_id = $1 AND position >= $2",
        )
        .bind(target_column_id)
        .bind(target_position)
        .execute(&mut *tx)
        .await?;

        let card = sqlx::query_as::<_, Card>(
            "UPDATE cards SET column_id = $2, position = $3 WHERE id = $1
             RETURNING id, column_id, title, description, position, created_at",
        )
        .bind(card_id)
        .bind(target_column_id)
        .bind(target_position)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(card)
    }
}
