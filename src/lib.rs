#![doc = "The `projectforge` library crate."]
#![doc = ""]
#![doc = "Authentication (password hashing, signed session tokens, the request guard),"]
#![doc = "the project/task domain layer with its storage backends, routing and error"]
#![doc = "handling. The binary (`main.rs`) only reads configuration, opens the store"]
#![doc = "and serves [`app::AppState`]."]

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod routes;
pub mod store;

pub use app::AppState;
pub use config::Config;
pub use error::{AppError, AppResult};
