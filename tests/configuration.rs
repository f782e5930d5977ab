//! Tests for configuration system

use std::time::Duration;

use relayform::Config;
use temp_dir::TempDir;

#[test]
fn test_config_loads_defaults_without_file() {
    let config = Config::load(Some("does-not-exist.toml".to_string())).expect("Failed to load config");

    assert_eq!(config.server.port, 3000);
    assert_eq!(config.server.contact_path, "/api/contact");
    assert_eq!(config.observability.log_level, "info");
    assert!(config.form.webhook_url.is_none());
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_reads_toml_file() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("relayform.toml");

    std::fs::write(
        &path,
        r#"
[server]
host = "0.0.0.0"
port = 8080

[email]
smtp_host = "smtp.office365.com"
smtp_port = 587
from_address = "noreply@blueskycreations.test"
contact_address = "info@blueskycreations.test"
company_name = "BlueSky Creations"
require_acknowledgement = true

[form]
webhook_url = "https://script.example/macros/exec"
notification_url = "http://127.0.0.1:8080/api/contact"
auto_reset_delay_ms = 3000

[form.metadata]
category = "Sales"
"#,
    )?;

    let config = Config::load(Some(path.to_string_lossy().into_owned()))?;

    assert_eq!(config.server.port, 8080);
    assert!(config.email.require_acknowledgement);
    assert!(config.validate().is_ok());

    let sinks = config.form.sink_config();
    assert_eq!(sinks.targets().len(), 2);
    assert_eq!(sinks.auto_reset_delay, Some(Duration::from_secs(3)));
    assert_eq!(
        sinks.metadata.get("category").map(String::as_str),
        Some("Sales")
    );

    Ok(())
}
