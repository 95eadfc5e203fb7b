pub mod auth;
pub mod boards;
pub mod health;

use actix_web::web;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(auth::register)
            .service(auth::login)
            .service(auth::logout)
            .service(auth::me),
    )
    .service(
        web::scope("/boards")
            .service(boards::list_boards)
            .service(boards::create_board)
            .service(boards::get_board)
            .service(boards::delete_board)
            .service(boards::create_column),
    )
    .service(
        web::scope("/columns")
            .service(boards::update_column)
            .service(boards::delete_column)
            .service(boards::move_column)
            .service(boards::create_card),
    )
    .service(
        web::scope("/cards")
            .service(boards::update_card)
            .service(boards::delete_card)
            .service(boards::move_card),
    );
}
