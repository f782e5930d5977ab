use askama::Template;
use serde::Deserialize;
use validator::Validate;

use crate::{EmailService, Mail};

/// Enquiry accepted by the contact endpoint.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ContactNotice {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    pub message: String,
    pub category: Option<String>,
    pub company: Option<String>,
}

impl ContactNotice {
    /// Name and email are required; the message may be left empty.
    pub fn missing_required(&self) -> bool {
        [&self.name, &self.email]
            .iter()
            .any(|value| value.trim().is_empty())
    }
}

#[derive(Template)]
#[template(path = "contact-acknowledgement.html")]
struct AcknowledgementHtmlTemplate<'a> {
    name: &'a str,
    message: &'a str,
    company_name: &'a str,
}

#[derive(Template)]
#[template(path = "contact-acknowledgement.txt")]
struct AcknowledgementPlainTemplate<'a> {
    name: &'a str,
    message: &'a str,
    company_name: &'a str,
}

#[derive(Template)]
#[template(path = "contact-notification.html")]
struct NotificationHtmlTemplate<'a> {
    name: &'a str,
    email: &'a str,
    message: &'a str,
    company: Option<&'a str>,
    category: Option<&'a str>,
}

#[derive(Template)]
#[template(path = "contact-notification.txt")]
struct NotificationPlainTemplate<'a> {
    name: &'a str,
    email: &'a str,
    message: &'a str,
    company: Option<&'a str>,
    category: Option<&'a str>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

impl EmailService {
    /// Alerts the contact inbox, then acknowledges the sender.
    ///
    /// The internal alert decides the result. A failed acknowledgement only
    /// fails the call when `require_acknowledgement` is set.
    pub async fn send_contact(&self, notice: &ContactNotice) -> anyhow::Result<()> {
        let config = self.config();
        let company = present(&notice.company);
        let category = present(&notice.category);

        let alert = Mail {
            to: config.contact_address.to_owned(),
            from_name: "Website Contact".to_owned(),
            reply_to: Some(notice.email.to_owned()),
            subject: format!("New message from {}", notice.name),
            html: NotificationHtmlTemplate {
                name: &notice.name,
                email: &notice.email,
                message: &notice.message,
                company,
                category,
            }
            .render()?,
            plain: NotificationPlainTemplate {
                name: &notice.name,
                email: &notice.email,
                message: &notice.message,
                company,
                category,
            }
            .render()?,
        };

        if let Err(e) = self.send(alert).await {
            tracing::error!(error = %e, from = %notice.email, "Failed to deliver contact alert");
            return Err(e);
        }

        let acknowledgement = Mail {
            to: notice.email.to_owned(),
            from_name: config.company_name.to_owned(),
            reply_to: Some(config.contact_address.to_owned()),
            subject: format!("We have received your message | {}", config.company_name),
            html: AcknowledgementHtmlTemplate {
                name: &notice.name,
                message: &notice.message,
                company_name: &config.company_name,
            }
            .render()?,
            plain: AcknowledgementPlainTemplate {
                name: &notice.name,
                message: &notice.message,
                company_name: &config.company_name,
            }
            .render()?,
        };

        match self.send(acknowledgement).await {
            Ok(()) => {
                tracing::info!(to = %notice.email, "Contact acknowledgement sent");
                Ok(())
            }
            Err(e) if config.require_acknowledgement => {
                tracing::error!(error = %e, to = %notice.email, "Failed to acknowledge contact");
                Err(e)
            }
            Err(e) => {
                tracing::warn!(error = %e, to = %notice.email, "Contact acknowledgement not delivered");
                Ok(())
            }
        }
    }
}
