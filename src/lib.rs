#![doc = "The `boardforge` library crate."]
#![doc = ""]
#![doc = "This crate contains all the core business logic, domain models, session-based"]
#![doc = "authentication, the board/column/card store with its position invariants,"]
#![doc = "routing configuration, and error handling for the BoardForge application."]
#![doc = "It is used by the main binary (`main.rs`) to construct and run the application."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;
