#![allow(dead_code)]

use std::time::Duration;

use relayform_contact::{ContactFormData, Field, FormStore, PageContext, SinkConfig, Submitter};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

pub const WEBHOOK_PATH: &str = "/macros/exec";
pub const NOTIFICATION_PATH: &str = "/api/contact";

/// Nothing listens on port 1, so requests fail at connect time.
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:1/macros/exec";

pub fn form() -> ContactFormData {
    ContactFormData::new("Jane Doe", "jane@example.com", "I would like a quote.")
}

pub fn page() -> PageContext {
    PageContext::new(
        "https://blueskycreations.test/contact",
        "/contact",
        "relayform-tests/1.0",
    )
}

pub fn sinks(server: &MockServer) -> SinkConfig {
    SinkConfig::new()
        .with_webhook(
            format!("{}{WEBHOOK_PATH}", server.uri()),
            Some("s3cret".to_owned()),
        )
        .with_notification(format!("{}{NOTIFICATION_PATH}", server.uri()))
        .with_timeout(Duration::from_secs(5))
}

pub fn fill(store: &FormStore, form: &ContactFormData) {
    store.set_field(Field::Name, &form.name).unwrap();
    store.set_field(Field::Email, &form.email).unwrap();
    store.set_field(Field::Message, &form.message).unwrap();
}

pub fn filled_store(config: SinkConfig) -> FormStore {
    let store = FormStore::new(Submitter::new(), config);
    fill(&store, &form());
    store
}

pub async fn mount(server: &MockServer, at: &str, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(at))
        .respond_with(response)
        .mount(server)
        .await;
}

pub fn html_ok() -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_raw("<html><body>Saved</body></html>", "text/html")
}

pub fn json(status: u16, body: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(body)
}
