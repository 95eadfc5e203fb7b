pub mod board;
pub mod card;
pub mod column;
pub mod user;

pub use board::{Board, BoardAggregate, BoardInput};
pub use card::{Card, CardInput, CardUpdate, MoveCardRequest};
pub use column::{Column, ColumnAggregate, ColumnInput, ColumnUpdate, MoveColumnRequest};
pub use user::User;
