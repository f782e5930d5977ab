use std::{collections::BTreeMap, env, time::Duration};

use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use relayform_contact::{DEFAULT_FALLBACK_URL, DEFAULT_REQUEST_TIMEOUT, SinkConfig};
use relayform_notification::EmailConfig;
use serde::Deserialize;
use validator::ValidateEmail;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub email: EmailConfig,
    #[serde(default)]
    pub form: FormConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_contact_path")]
    pub contact_path: String,
}

fn default_contact_path() -> String {
    "/api/contact".to_string()
}

/// Sinks used by the `submit` command.
#[derive(Debug, Deserialize, Clone)]
pub struct FormConfig {
    #[serde(default)]
    pub notification_url: Option<String>,
    #[serde(default)]
    pub webhook_url: Option<String>,
    #[serde(default)]
    pub shared_secret: Option<String>,
    #[serde(default = "default_fallback_url")]
    pub fallback_url: String,
    #[serde(default)]
    pub auto_reset_delay_ms: Option<u64>,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            notification_url: None,
            webhook_url: None,
            shared_secret: None,
            fallback_url: default_fallback_url(),
            auto_reset_delay_ms: None,
            request_timeout_ms: default_request_timeout_ms(),
            metadata: BTreeMap::new(),
        }
    }
}

fn default_fallback_url() -> String {
    DEFAULT_FALLBACK_URL.to_string()
}

fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT.as_millis() as u64
}

impl FormConfig {
    pub fn sink_config(&self) -> SinkConfig {
        SinkConfig {
            notification_url: self.notification_url.clone(),
            webhook_url: self.webhook_url.clone(),
            shared_secret: self.shared_secret.clone(),
            fallback_url: self.fallback_url.clone(),
            auto_reset_delay: self.auto_reset_delay_ms.map(Duration::from_millis),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            metadata: self.metadata.clone(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Legacy environment variables (EMAIL_HOST, EMAIL_PASSWORD, SHARED_SECRET, ...)
    /// 2. Environment variables (RELAYFORM__EMAIL__SMTP_HOST, etc.)
    /// 3. Config file specified by path
    /// 4. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        builder = builder
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("email.smtp_host", "localhost")?
            .set_default("email.smtp_port", 587)?
            .set_default("email.from_address", "noreply@example.com")?
            .set_default("email.contact_address", "info@example.com")?
            .set_default("email.company_name", "BlueSky Creations")?;

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        // Optional, ignored when absent
        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("RELAYFORM")
                .separator("__")
                .try_parsing(true),
        );

        if let Ok(host) = env::var("EMAIL_HOST") {
            builder = builder.set_override("email.smtp_host", host)?;
        }
        if let Ok(port) = env::var("EMAIL_PORT") {
            builder = builder.set_override("email.smtp_port", port)?;
        }
        if let Ok(user) = env::var("EMAIL_USER") {
            builder = builder
                .set_override("email.smtp_username", user.clone())?
                .set_override("email.from_address", user)?;
        }
        if let Ok(password) = env::var("EMAIL_PASSWORD") {
            builder = builder.set_override("email.smtp_password", password)?;
        }
        if let Ok(secret) = env::var("SHARED_SECRET") {
            builder = builder.set_override("form.shared_secret", secret)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }
        if !self.server.contact_path.starts_with('/') {
            return Err("Server contact_path must start with '/'".to_string());
        }
        if self.email.smtp_port == 0 {
            return Err("SMTP port must be greater than 0".to_string());
        }
        if !self.email.from_address.validate_email() {
            return Err(format!(
                "Invalid email.from_address: {}",
                self.email.from_address
            ));
        }
        if !self.email.contact_address.validate_email() {
            return Err(format!(
                "Invalid email.contact_address: {}",
                self.email.contact_address
            ));
        }
        if self.form.request_timeout_ms == 0 {
            return Err("form.request_timeout_ms must be greater than 0".to_string());
        }

        let urls = [
            ("form.notification_url", self.form.notification_url.as_deref()),
            ("form.webhook_url", self.form.webhook_url.as_deref()),
            ("form.fallback_url", Some(self.form.fallback_url.as_str())),
        ];

        for (name, url) in urls {
            let Some(url) = url.filter(|u| !u.trim().is_empty()) else {
                continue;
            };

            match url::Url::parse(url) {
                Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
                Ok(parsed) => {
                    return Err(format!("{name} must use http or https, got {}", parsed.scheme()));
                }
                Err(e) => return Err(format!("Invalid {name} '{url}': {e}")),
            }
        }

        Ok(())
    }
}
