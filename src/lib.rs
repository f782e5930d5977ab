pub mod config;
pub mod observability;
pub mod routes;

pub use config::Config;
pub use routes::{AppState, router};
