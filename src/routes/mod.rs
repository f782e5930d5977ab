use axum::{
    Router,
    routing::{get, post},
};
use relayform_notification::EmailService;

mod contact;
mod health;

pub use contact::{ContactPayload, ContactResponse};

#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub email: EmailService,
}

pub fn router(app_state: AppState) -> Router {
    let contact_path = app_state.config.server.contact_path.to_owned();

    Router::new()
        .route("/health", get(health::health))
        .route(&contact_path, post(contact::action))
        .with_state(app_state)
}
