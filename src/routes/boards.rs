use crate::{
    auth::AuthenticatedUserId,
    error::AppError,
    models::{
        BoardInput, CardInput, CardUpdate, ColumnInput, ColumnUpdate, MoveCardRequest,
        MoveColumnRequest,
    },
    store::BoardStore,
};
use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use uuid::Uuid;
use validator::Validate;

// Every mutating handler below authorizes the target entity against the
// authenticated user before touching it, and the check re-queries current
// state on each request. Anything absent or owned by someone else is a 404.

/// Retrieves the authenticated user's boards, newest first.
///
/// Boards are returned bare (no columns or cards); the nested view is the
/// single-board endpoint. A user without boards gets an empty array.
///
/// ## Responses:
/// - `200 OK`: Returns a JSON array of `Board` objects.
/// - `401 Unauthorized`: If the request lacks a valid session token.
/// - `500 Internal Server Error`: For database errors or other unexpected issues.
#[get("")]
pub async fn list_boards(
    store: web::Data<BoardStore>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let boards = store.list_boards(user_id.0).await?;
    Ok(HttpResponse::Ok().json(boards))
}

/// Creates a new board for the authenticated user.
///
/// The board is created together with three default columns ("Todo",
/// "Doing", "Done") at positions 0, 1 and 2, atomically.
///
/// ## Request Body:
/// - `name`: The name of the board (required, 1-120 characters).
///
/// ## Responses:
/// - `201 Created`: Returns the newly created `Board` object as JSON.
/// - `401 Unauthorized`: If the request lacks a valid session token.
/// - `422 Unprocessable Entity`: If input validation fails.
/// - `500 Internal Server Error`: For database errors or other unexpected issues.
#[post("")]
pub async fn create_board(
    store: web::Data<BoardStore>,
    board_data: web::Json<BoardInput>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    board_data.validate()?;
    let board = store.create_board(user_id.0, &board_data.name).await?;
    Ok(HttpResponse::Created().json(board))
}

/// Retrieves a board with its columns and their cards, ordered by position.
///
/// ## Responses:
/// - `200 OK`: Returns the `BoardAggregate` as JSON.
/// - `404 Not Found`: If the board does not exist or is not owned by the caller.
#[get("/{id}")]
pub async fn get_board(
    store: web::Data<BoardStore>,
    board_id: web::Path<Uuid>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let aggregate = store
        .board_aggregate(board_id.into_inner(), user_id.0)
        .await?;
    Ok(HttpResponse::Ok().json(aggregate))
}

/// Deletes a board owned by the caller, cascading to its columns and cards.
#[delete("/{id}")]
pub async fn delete_board(
    store: web::Data<BoardStore>,
    board_id: web::Path<Uuid>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    store
        .delete_board(board_id.into_inner(), user_id.0)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Creates a column on a board owned by the caller, appended after the
/// board's existing columns.
#[post("/{id}/columns")]
pub async fn create_column(
    store: web::Data<BoardStore>,
    board_id: web::Path<Uuid>,
    column_data: web::Json<ColumnInput>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    column_data.validate()?;
    let board = store.board_owned(board_id.into_inner(), user_id.0).await?;
    let column = store.create_column(board.id, &column_data.name).await?;
    Ok(HttpResponse::Created().json(column))
}

/// Partially updates a column. Omitted fields are left unchanged.
///
/// The optional position field overwrites the stored position directly
/// without shifting sibling columns; the move endpoint is the gap-aware
/// path for reordering.
#[patch("/{id}")]
pub async fn update_column(
    store: web::Data<BoardStore>,
    column_id: web::Path<Uuid>,
    column_data: web::Json<ColumnUpdate>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    column_data.validate()?;
    let column_id = column_id.into_inner();
    store.column_board_owner(column_id, user_id.0).await?;
    let column = store
        .update_column(column_id, column_data.name.as_deref(), column_data.position)
        .await?;
    Ok(HttpResponse::Ok().json(column))
}

/// Deletes a column (and its cards), closing the position gap among the
/// board's remaining columns.
#[delete("/{id}")]
pub async fn delete_column(
    store: web::Data<BoardStore>,
    column_id: web::Path<Uuid>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let column_id = column_id.into_inner();
    store.column_board_owner(column_id, user_id.0).await?;
    store.delete_column(column_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Repositions a column within its board.
///
/// Sibling columns shift to keep positions dense, the same way card moves
/// behave. Targets past the end land the column last.
///
/// ## Responses:
/// - `200 OK`: Returns the moved `Column` as JSON.
/// - `404 Not Found`: If the column does not exist or is not owned by the caller.
/// - `422 Unprocessable Entity`: If the position is negative.
#[post("/{id}/move")]
pub async fn move_column(
    store: web::Data<BoardStore>,
    column_id: web::Path<Uuid>,
    move_data: web::Json<MoveColumnRequest>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    move_data.validate()?;
    let column_id = column_id.into_inner();
    store.column_board_owner(column_id, user_id.0).await?;
    let column = store.move_column(column_id, move_data.position).await?;
    Ok(HttpResponse::Ok().json(column))
}

/// Creates a card in a column owned by the caller, appended after the
/// column's existing cards.
#[post("/{id}/cards")]
pub async fn create_card(
    store: web::Data<BoardStore>,
    column_id: web::Path<Uuid>,
    card_data: web::Json<CardInput>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    card_data.validate()?;
    let column_id = column_id.into_inner();
    store.column_board_owner(column_id, user_id.0).await?;
    let card = store
        .create_card(
            column_id,
            &card_data.title,
            card_data.description.as_deref().unwrap_or(""),
        )
        .await?;
    Ok(HttpResponse::Created().json(card))
}

/// Partially updates a card's title and description. Omitted fields are
/// left unchanged; position is only reachable through the move endpoint.
#[patch("/{id}")]
pub async fn update_card(
    store: web::Data<BoardStore>,
    card_id: web::Path<Uuid>,
    card_data: web::Json<CardUpdate>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    card_data.validate()?;
    let card_id = card_id.into_inner();
    store.card_owner(card_id, user_id.0).await?;
    let card = store
        .update_card(
            card_id,
            card_data.title.as_deref(),
            card_data.description.as_deref(),
        )
        .await?;
    Ok(HttpResponse::Ok().json(card))
}

/// Deletes a card, closing the position gap among its former siblings.
#[delete("/{id}")]
pub async fn delete_card(
    store: web::Data<BoardStore>,
    card_id: web::Path<Uuid>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let card_id = card_id.into_inner();
    store.card_owner(card_id, user_id.0).await?;
    store.delete_card(card_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Relocates a card to a target column and zero-based position.
///
/// Both the card and the target column must belong to the caller; the
/// target column is authorized independently, so a move into another
/// user's column fails with 404 without revealing whether it exists. The
/// whole reorder is one transaction: on any failure neither the source nor
/// the destination column changes.
///
/// ## Request Body:
/// - `column_id`: The destination column (may equal the card's current one).
/// - `position`: Zero-based target slot; the destination's card count means append.
///
/// ## Responses:
/// - `200 OK`: Returns the moved `Card` as JSON.
/// - `404 Not Found`: If the card or target column is absent or not owned by the caller.
/// - `422 Unprocessable Entity`: If the position is negative.
#[post("/{id}/move")]
pub async fn move_card(
    store: web::Data<BoardStore>,
    card_id: web::Path<Uuid>,
    move_data: web::Json<MoveCardRequest>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    move_data.validate()?;
    let card_id = card_id.into_inner();
    store.card_owner(card_id, user_id.0).await?;
    // Verify target column ownership
    store
        .column_board_owner(move_data.column_id, user_id.0)
        .await?;
    let card = store
        .move_card(card_id, move_data.column_id, move_data.position)
        .await?;
    Ok(HttpResponse::Ok().json(card))
}
