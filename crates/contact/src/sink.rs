use std::{collections::BTreeMap, time::Duration};

use crate::{ContactFormData, SinkKind};

/// Used when neither sink is configured so a submission never silently no-ops.
pub const DEFAULT_FALLBACK_URL: &str = "http://127.0.0.1:3000/api/contact";

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Well-known pass-through metadata keys written to the spreadsheet.
pub mod metadata_keys {
    pub const CONTACT_TYPE: &str = "contactType";
    pub const CATEGORY: &str = "category";
    pub const ASSIGNED_TO: &str = "assignedTo";
    pub const STATUS: &str = "status";
    pub const INTERNAL_TAG: &str = "internalTag";
    pub const FOLLOW_UP_DATE: &str = "followUpDate";
}

/// Describes which sinks receive a submission.
///
/// Injected at call time; nothing here is global and secrets come from the
/// process configuration.
#[derive(Clone, Debug)]
pub struct SinkConfig {
    pub notification_url: Option<String>,
    pub webhook_url: Option<String>,
    pub shared_secret: Option<String>,
    pub fallback_url: String,
    pub auto_reset_delay: Option<Duration>,
    pub request_timeout: Duration,
    pub metadata: BTreeMap<String, String>,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            notification_url: None,
            webhook_url: None,
            shared_secret: None,
            fallback_url: DEFAULT_FALLBACK_URL.to_owned(),
            auto_reset_delay: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            metadata: BTreeMap::new(),
        }
    }
}

impl SinkConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_webhook(mut self, url: impl Into<String>, secret: Option<String>) -> Self {
        self.webhook_url = Some(url.into());
        self.shared_secret = secret;
        self
    }

    pub fn with_notification(mut self, url: impl Into<String>) -> Self {
        self.notification_url = Some(url.into());
        self
    }

    pub fn with_fallback(mut self, url: impl Into<String>) -> Self {
        self.fallback_url = url.into();
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn with_auto_reset(mut self, delay: Duration) -> Self {
        self.auto_reset_delay = Some(delay);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sinks to call, in declaration order: webhook first, then notification.
    pub fn targets(&self) -> Vec<SinkTarget> {
        let mut targets = Vec::with_capacity(2);

        if let Some(url) = non_empty(&self.webhook_url) {
            targets.push(SinkTarget {
                kind: SinkKind::Webhook,
                url: url.to_owned(),
            });
        }

        if let Some(url) = non_empty(&self.notification_url) {
            targets.push(SinkTarget {
                kind: SinkKind::Notification,
                url: url.to_owned(),
            });
        }

        if targets.is_empty() {
            targets.push(SinkTarget {
                kind: SinkKind::Notification,
                url: self.fallback_url.to_owned(),
            });
        }

        targets
    }

    /// Form-encoded body for one sink.
    pub fn payload(
        &self,
        kind: SinkKind,
        form: &ContactFormData,
        page: &PageContext,
    ) -> Vec<(String, String)> {
        let mut fields = vec![
            ("name".to_owned(), form.name.to_owned()),
            ("email".to_owned(), form.email.to_owned()),
            ("message".to_owned(), form.message.to_owned()),
        ];

        fields.extend(
            self.metadata
                .iter()
                .filter(|(_, value)| !value.is_empty())
                .map(|(key, value)| (key.to_owned(), value.to_owned())),
        );

        if kind == SinkKind::Webhook {
            if let Some(secret) = non_empty(&self.shared_secret) {
                fields.push(("secret".to_owned(), secret.to_owned()));
            }

            fields.push(("source".to_owned(), page.source.to_owned()));
            fields.push(("sourcePath".to_owned(), page.source_path.to_owned()));
            fields.push(("ua".to_owned(), page.user_agent.to_owned()));
        }

        fields
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SinkTarget {
    pub kind: SinkKind,
    pub url: String,
}

/// Where the form was submitted from; only the webhook records it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageContext {
    pub source: String,
    pub source_path: String,
    pub user_agent: String,
}

impl PageContext {
    pub fn new(
        source: impl Into<String>,
        source_path: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            source_path: source_path.into(),
            user_agent: user_agent.into(),
        }
    }
}
