//! Store-level integration tests for the board hierarchy.
//!
//! These run against the database named by DATABASE_URL (migrations are
//! applied on setup). Every test creates its own user, so fixtures never
//! collide even when tests run concurrently.

use boardforge::auth::AuthStore;
use boardforge::error::AppError;
use boardforge::models::{BoardAggregate, User};
use boardforge::store::BoardStore;
use dotenv::dotenv;
use pretty_assertions::assert_eq;
use sqlx::PgPool;
use uuid::Uuid;

async fn setup() -> (BoardStore, AuthStore) {
    dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");
    let pool = PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to test DB");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    (BoardStore::new(pool.clone()), AuthStore::new(pool))
}

async fn create_user(auth: &AuthStore, tag: &str) -> User {
    // Unique email per test run; the hash is never verified here.
    let email = format!("{}+{}@example.com", tag, Uuid::new_v4());
    auth.create_user(&email, Some("$2b$12$placeholderplaceholderplace"), "Test User")
        .await
        .expect("create user")
}

fn column_positions(aggregate: &BoardAggregate) -> Vec<(String, i32)> {
    aggregate
        .columns
        .iter()
        .map(|c| (c.column.name.clone(), c.column.position))
        .collect()
}

fn card_positions(aggregate: &BoardAggregate, column_index: usize) -> Vec<(Uuid, i32)> {
    aggregate.columns[column_index]
        .cards
        .iter()
        .map(|c| (c.id, c.position))
        .collect()
}

#[actix_rt::test]
async fn test_create_board_with_default_columns() {
    let (store, auth) = setup().await;
    let user = create_user(&auth, "board").await;

    let board = store.create_board(user.id, "My Board").await.unwrap();
    assert_eq!(board.name, "My Board");
    assert_eq!(board.user_id, user.id);

    let aggregate = store.board_aggregate(board.id, user.id).await.unwrap();
    assert_eq!(
        column_positions(&aggregate),
        vec![
            ("Todo".to_string(), 0),
            ("Doing".to_string(), 1),
            ("Done".to_string(), 2),
        ]
    );
    // Empty columns still carry a card list
    for column in &aggregate.columns {
        assert!(column.cards.is_empty());
    }
}

#[actix_rt::test]
async fn test_list_boards() {
    let (store, auth) = setup().await;
    let user = create_user(&auth, "list").await;

    assert!(store.list_boards(user.id).await.unwrap().is_empty());

    store.create_board(user.id, "Board 1").await.unwrap();
    store.create_board(user.id, "Board 2").await.unwrap();

    let boards = store.list_boards(user.id).await.unwrap();
    assert_eq!(boards.len(), 2);
}

#[actix_rt::test]
async fn test_board_aggregate_wrong_user_not_found() {
    let (store, auth) = setup().await;
    let owner = create_user(&auth, "owner").await;
    let other = create_user(&auth, "other").await;

    let board = store.create_board(owner.id, "Private Board").await.unwrap();

    match store.board_aggregate(board.id, other.id).await {
        Err(AppError::NotFound(_)) => {}
        other => panic!("expected NotFound, got {:?}", other.map(|_| ())),
    }
}

#[actix_rt::test]
async fn test_delete_board_cascades() {
    let (store, auth) = setup().await;
    let user = create_user(&auth, "cascade").await;

    let board = store.create_board(user.id, "Doomed").await.unwrap();
    let aggregate = store.board_aggregate(board.id, user.id).await.unwrap();
    let column_id = aggregate.columns[0].column.id;
    let card = store
        .create_card(column_id, "Card", "will cascade")
        .await
        .unwrap();

    store.delete_board(board.id, user.id).await.unwrap();

    assert!(matches!(
        store.board_aggregate(board.id, user.id).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        store.column_board_owner(column_id, user.id).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        store.card_owner(card.id, user.id).await,
        Err(AppError::NotFound(_))
    ));
}

#[actix_rt::test]
async fn test_delete_board_wrong_user() {
    let (store, auth) = setup().await;
    let owner = create_user(&auth, "delowner").await;
    let other = create_user(&auth, "delother").await;

    let board = store.create_board(owner.id, "Board").await.unwrap();

    assert!(matches!(
        store.delete_board(board.id, other.id).await,
        Err(AppError::NotFound(_))
    ));
    // Still intact for its owner
    assert!(store.board_aggregate(board.id, owner.id).await.is_ok());
}

#[actix_rt::test]
async fn test_create_column_appends() {
    let (store, auth) = setup().await;
    let user = create_user(&auth, "col").await;

    let board = store.create_board(user.id, "Board").await.unwrap();

    // Default board has 3 columns (pos 0,1,2), so new ones append at 3, 4
    let extra = store.create_column(board.id, "Extra").await.unwrap();
    assert_eq!(extra.position, 3);
    let another = store.create_column(board.id, "Another").await.unwrap();
    assert_eq!(another.position, 4);
}

#[actix_rt::test]
async fn test_update_column_partial() {
    let (store, auth) = setup().await;
    let user = create_user(&auth, "updcol").await;

    let board = store.create_board(user.id, "Board").await.unwrap();
    let aggregate = store.board_aggregate(board.id, user.id).await.unwrap();
    let column = &aggregate.columns[1].column;

    // Rename only: position must not change
    let renamed = store
        .update_column(column.id, Some("Renamed"), None)
        .await
        .unwrap();
    assert_eq!(renamed.name, "Renamed");
    assert_eq!(renamed.position, column.position);

    // Position only: name must not change
    let repositioned = store.update_column(column.id, None, Some(7)).await.unwrap();
    assert_eq!(repositioned.name, "Renamed");
    assert_eq!(repositioned.position, 7);
}

#[actix_rt::test]
async fn test_delete_column_closes_gap() {
    let (store, auth) = setup().await;
    let user = create_user(&auth, "delcol").await;

    let board = store.create_board(user.id, "Board").await.unwrap();
    let aggregate = store.board_aggregate(board.id, user.id).await.unwrap();
    let doing = aggregate.columns[1].column.id;

    // Cascade check: the column's card disappears with it
    store.create_card(doing, "Card in doomed column", "").await.unwrap();

    store.delete_column(doing).await.unwrap();

    let aggregate = store.board_aggregate(board.id, user.id).await.unwrap();
    assert_eq!(
        column_positions(&aggregate),
        vec![("Todo".to_string(), 0), ("Done".to_string(), 1)]
    );
}

#[actix_rt::test]
async fn test_move_column_shifts_siblings() {
    let (store, auth) = setup().await;
    let user = create_user(&auth, "movecol").await;

    let board = store.create_board(user.id, "Board").await.unwrap();
    let aggregate = store.board_aggregate(board.id, user.id).await.unwrap();
    let todo = aggregate.columns[0].column.id;

    let moved = store.move_column(todo, 2).await.unwrap();
    assert_eq!(moved.position, 2);

    let aggregate = store.board_aggregate(board.id, user.id).await.unwrap();
    assert_eq!(
        column_positions(&aggregate),
        vec![
            ("Doing".to_string(), 0),
            ("Done".to_string(), 1),
            ("Todo".to_string(), 2),
        ]
    );
}

#[actix_rt::test]
async fn test_create_card_appends() {
    let (store, auth) = setup().await;
    let user = create_user(&auth, "card").await;

    let board = store.create_board(user.id, "Board").await.unwrap();
    let aggregate = store.board_aggregate(board.id, user.id).await.unwrap();
    let column_id = aggregate.columns[0].column.id;

    let first = store
        .create_card(column_id, "My Card", "Some description")
        .await
        .unwrap();
    assert_eq!(first.title, "My Card");
    assert_eq!(first.position, 0);

    let second = store.create_card(column_id, "Card 2", "").await.unwrap();
    assert_eq!(second.position, 1);
}

#[actix_rt::test]
async fn test_update_card_partial() {
    let (store, auth) = setup().await;
    let user = create_user(&auth, "updcard").await;

    let board = store.create_board(user.id, "Board").await.unwrap();
    let aggregate = store.board_aggregate(board.id, user.id).await.unwrap();
    let column_id = aggregate.columns[0].column.id;

    let card = store
        .create_card(column_id, "Original", "Orig desc")
        .await
        .unwrap();

    // Title only
    let updated = store
        .update_card(card.id, Some("Updated"), None)
        .await
        .unwrap();
    assert_eq!(updated.title, "Updated");
    assert_eq!(updated.description, "Orig desc");

    // Description only
    let updated = store
        .update_card(card.id, None, Some("New desc"))
        .await
        .unwrap();
    assert_eq!(updated.title, "Updated");
    assert_eq!(updated.description, "New desc");
}

#[actix_rt::test]
async fn test_move_card_within_column() {
    let (store, auth) = setup().await;
    let user = create_user(&auth, "movesame").await;

    let board = store.create_board(user.id, "Board").await.unwrap();
    let aggregate = store.board_aggregate(board.id, user.id).await.unwrap();
    let column_id = aggregate.columns[0].column.id;

    let c0 = store.create_card(column_id, "Card 0", "").await.unwrap();
    let c1 = store.create_card(column_id, "Card 1", "").await.unwrap();
    let c2 = store.create_card(column_id, "Card 2", "").await.unwrap();

    // Move the first card to the end
    let moved = store.move_card(c0.id, column_id, 2).await.unwrap();
    assert_eq!(moved.position, 2);

    let aggregate = store.board_aggregate(board.id, user.id).await.unwrap();
    assert_eq!(
        card_positions(&aggregate, 0),
        vec![(c1.id, 0), (c2.id, 1), (c0.id, 2)]
    );

    // And back to the front
    store.move_card(c0.id, column_id, 0).await.unwrap();
    let aggregate = store.board_aggregate(board.id, user.id).await.unwrap();
    assert_eq!(
        card_positions(&aggregate, 0),
        vec![(c0.id, 0), (c1.id, 1), (c2.id, 2)]
    );
}

#[actix_rt::test]
async fn test_move_card_to_same_slot_is_noop() {
    let (store, auth) = setup().await;
    let user = create_user(&auth, "movenoop").await;

    let board = store.create_board(user.id, "Board").await.unwrap();
    let aggregate = store.board_aggregate(board.id, user.id).await.unwrap();
    let column_id = aggregate.columns[0].column.id;

    let c0 = store.create_card(column_id, "Card 0", "").await.unwrap();
    let c1 = store.create_card(column_id, "Card 1", "").await.unwrap();
    let c2 = store.create_card(column_id, "Card 2", "").await.unwrap();

    let moved = store.move_card(c1.id, column_id, 1).await.unwrap();
    assert_eq!(moved.position, 1);

    let aggregate = store.board_aggregate(board.id, user.id).await.unwrap();
    assert_eq!(
        card_positions(&aggregate, 0),
        vec![(c0.id, 0), (c1.id, 1), (c2.id, 2)]
    );
}

#[actix_rt::test]
async fn test_move_card_across_columns() {
    let (store, auth) = setup().await;
    let user = create_user(&auth, "moveacross").await;

    let board = store.create_board(user.id, "Board").await.unwrap();
    let aggregate = store.board_aggregate(board.id, user.id).await.unwrap();
    let src = aggregate.columns[0].column.id;
    let dst = aggregate.columns[1].column.id;

    let c0 = store.create_card(src, "Src Card 0", "").await.unwrap();
    let c1 = store.create_card(src, "Src Card 1", "").await.unwrap();
    let d0 = store.create_card(dst, "Dst Card 0", "").await.unwrap();

    let moved = store.move_card(c0.id, dst, 0).await.unwrap();
    assert_eq!(moved.column_id, dst);
    assert_eq!(moved.position, 0);

    let aggregate = store.board_aggregate(board.id, user.id).await.unwrap();
    // Source column shrank and closed the gap
    assert_eq!(card_positions(&aggregate, 0), vec![(c1.id, 0)]);
    // Destination gained the card at the requested slot
    assert_eq!(card_positions(&aggregate, 1), vec![(c0.id, 0), (d0.id, 1)]);
}

#[actix_rt::test]
async fn test_move_card_to_end_appends() {
    let (store, auth) = setup().await;
    let user = create_user(&auth, "moveend").await;

    let board = store.create_board(user.id, "Board").await.unwrap();
    let aggregate = store.board_aggregate(board.id, user.id).await.unwrap();
    let src = aggregate.columns[0].column.id;
    let dst = aggregate.columns[1].column.id;

    let c0 = store.create_card(src, "Card", "").await.unwrap();
    let d0 = store.create_card(dst, "Existing", "").await.unwrap();

    // Target equal to the destination's card count means append
    let moved = store.move_card(c0.id, dst, 1).await.unwrap();
    assert_eq!(moved.position, 1);

    let aggregate = store.board_aggregate(board.id, user.id).await.unwrap();
    assert_eq!(card_positions(&aggregate, 1), vec![(d0.id, 0), (c0.id, 1)]);
}

#[actix_rt::test]
async fn test_positions_stay_dense_after_mixed_operations() {
    let (store, auth) = setup().await;
    let user = create_user(&auth, "dense").await;

    let board = store.create_board(user.id, "Board").await.unwrap();
    let aggregate = store.board_aggregate(board.id, user.id).await.unwrap();
    let col_a = aggregate.columns[0].column.id;
    let col_b = aggregate.columns[1].column.id;

    let mut cards = Vec::new();
    for i in 0..5 {
        cards.push(
            store
                .create_card(col_a, &format!("Card {}", i), "")
                .await
                .unwrap(),
        );
    }

    store.move_card(cards[4].id, col_a, 0).await.unwrap();
    store.move_card(cards[0].id, col_b, 0).await.unwrap();
    store.move_card(cards[2].id, col_b, 1).await.unwrap();
    store.move_card(cards[1].id, col_a, 2).await.unwrap();

    let aggregate = store.board_aggregate(board.id, user.id).await.unwrap();
    for (index, expected_len) in [(0usize, 3usize), (1, 2)] {
        let mut positions: Vec<i32> = aggregate.columns[index]
            .cards
            .iter()
            .map(|c| c.position)
            .collect();
        positions.sort_unstable();
        let expected: Vec<i32> = (0..expected_len as i32).collect();
        assert_eq!(
            positions, expected,
            "column {} positions are not dense",
            index
        );
    }
}

#[actix_rt::test]
async fn test_ownership_isolation() {
    let (store, auth) = setup().await;
    let user_a = create_user(&auth, "isol-a").await;
    let user_b = create_user(&auth, "isol-b").await;

    let board = store.create_board(user_a.id, "A's Board").await.unwrap();
    let aggregate = store.board_aggregate(board.id, user_a.id).await.unwrap();
    let column_id = aggregate.columns[0].column.id;
    let card = store.create_card(column_id, "A's Card", "").await.unwrap();

    // Every authorize path answers NotFound for the non-owner
    assert!(matches!(
        store.board_owned(board.id, user_b.id).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        store.column_board_owner(column_id, user_b.id).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        store.card_owner(card.id, user_b.id).await,
        Err(AppError::NotFound(_))
    ));

    // B cannot use A's column as a move target either: the handler
    // authorizes the destination with the caller's identity, which fails
    // before the store is asked to move anything.
    assert!(matches!(
        store.column_board_owner(column_id, user_b.id).await,
        Err(AppError::NotFound(_))
    ));

    // B's own listing is unaffected
    assert!(store.list_boards(user_b.id).await.unwrap().is_empty());
}
