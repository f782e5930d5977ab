#![allow(dead_code)]

use relayform::{
    AppState, Config,
    config::{FormConfig, ObservabilityConfig, ServerConfig},
};
use relayform_notification::{EmailConfig, EmailService};

pub fn create_test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            contact_path: "/api/contact".to_string(),
        },
        email: EmailConfig {
            smtp_host: "localhost".to_string(),
            smtp_port: 1025,
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_address: "noreply@blueskycreations.test".to_string(),
            contact_address: "info@blueskycreations.test".to_string(),
            company_name: "BlueSky Creations".to_string(),
            require_acknowledgement: false,
        },
        form: FormConfig::default(),
        observability: ObservabilityConfig::default(),
    }
}

pub fn state_with(email: EmailService) -> AppState {
    AppState {
        config: create_test_config(),
        email,
    }
}

pub fn mock_state() -> AppState {
    let config = create_test_config();
    state_with(EmailService::new_mock(&config.email))
}

pub fn failing_state() -> AppState {
    let config = create_test_config();
    state_with(EmailService::new_failing(&config.email))
}

/// Delivers the internal alert, then bounces the acknowledgement.
pub fn bounced_acknowledgement_state(require_acknowledgement: bool) -> AppState {
    let mut config = create_test_config();
    config.email.require_acknowledgement = require_acknowledgement;
    let email = EmailService::new_failing_after(&config.email, 1);

    AppState { config, email }
}

/// Serves the router on an ephemeral port and returns its base url.
pub async fn spawn_server(state: AppState) -> anyhow::Result<String> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = relayform::router(state);

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(format!("http://{addr}"))
}
