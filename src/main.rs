use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use sqlx::PgPool;

use boardforge::auth::{AuthMiddleware, AuthStore};
use boardforge::config::Config;
use boardforge::routes::{self, health};
use boardforge::store::BoardStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let pool = PgPool::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    let auth_store = AuthStore::new(pool.clone());
    let board_store = BoardStore::new(pool);
    let allow_origin = config.cors_allow_origin.clone();

    log::info!("Starting boardforge server at {}", config.server_url());

    HttpServer::new(move || {
        let cors = match allow_origin.as_deref() {
            Some(origin) => Cors::default()
                .allowed_origin(origin)
                .allow_any_method()
                .allow_any_header()
                .supports_credentials()
                .max_age(3600),
            None => Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600),
        };

        App::new()
            .app_data(web::Data::new(auth_store.clone()))
            .app_data(web::Data::new(board_store.clone()))
            .wrap(cors)
            .wrap(Logger::default())
            .service(health::health)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .configure(routes::config),
            )
    })
    .bind((config.server_host.clone(), config.server_port))?
    .run()
    .await
}
