//! Email notification service using lettre

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use lettre::{
    Message, SmtpTransport, Transport,
    message::{Mailbox, MultiPart},
    transport::{smtp::authentication::Credentials, stub::StubTransport},
};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    #[serde(default)]
    pub smtp_username: String,
    #[serde(default)]
    pub smtp_password: String,
    pub from_address: String,
    /// Inbox receiving the internal alert; also the reply-to of acknowledgements.
    pub contact_address: String,
    pub company_name: String,
    /// Fail the request when only the acknowledgement to the sender bounced.
    #[serde(default)]
    pub require_acknowledgement: bool,
}

#[derive(Clone)]
enum Mailer {
    Smtp(SmtpTransport),
    Stub(Arc<StubTransport>),
    /// Accepts the first `accepted` messages, then refuses the rest.
    Flaky {
        ok: Arc<StubTransport>,
        refused: Arc<StubTransport>,
        accepted: usize,
        attempts: Arc<AtomicUsize>,
    },
}

impl Mailer {
    fn send(&self, message: &Message) -> anyhow::Result<()> {
        match self {
            Self::Smtp(mailer) => {
                mailer.send(message)?;
            }
            Self::Stub(mailer) => {
                mailer.send(message)?;
            }
            Self::Flaky {
                ok,
                refused,
                accepted,
                attempts,
            } => {
                if attempts.fetch_add(1, Ordering::SeqCst) < *accepted {
                    ok.send(message)?;
                } else {
                    refused.send(message)?;
                }
            }
        }

        Ok(())
    }
}

/// An outgoing mail with html and plain text alternatives.
pub struct Mail {
    pub to: String,
    pub from_name: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub html: String,
    pub plain: String,
}

/// Email service for sending notifications
#[derive(Clone)]
pub struct EmailService {
    mailer: Mailer,
    config: EmailConfig,
}

impl EmailService {
    /// Create a new email service from configuration
    pub fn new(config: &EmailConfig) -> anyhow::Result<Self> {
        let mailer = if config.smtp_username.is_empty() || config.smtp_password.is_empty() {
            tracing::info!(
                smtp_host = %config.smtp_host,
                smtp_port = config.smtp_port,
                "SMTP credentials not configured, using unauthenticated connection (e.g., MailDev)"
            );
            SmtpTransport::builder_dangerous(&config.smtp_host)
                .port(config.smtp_port)
                .build()
        } else {
            tracing::info!(
                smtp_host = %config.smtp_host,
                smtp_port = config.smtp_port,
                from = %config.from_address,
                "Email service initialized with authentication and TLS"
            );

            // STARTTLS on 587
            let creds =
                Credentials::new(config.smtp_username.clone(), config.smtp_password.clone());

            SmtpTransport::starttls_relay(&config.smtp_host)?
                .port(config.smtp_port)
                .credentials(creds)
                .build()
        };

        Ok(Self {
            mailer: Mailer::Smtp(mailer),
            config: config.clone(),
        })
    }

    /// Records messages in memory instead of talking to an SMTP server.
    pub fn new_mock(config: &EmailConfig) -> Self {
        Self::with_stub(config, StubTransport::new_ok())
    }

    /// Every send fails, as if the relay refused the message.
    pub fn new_failing(config: &EmailConfig) -> Self {
        Self::with_stub(config, StubTransport::new_error())
    }

    /// Accepts the first `accepted` sends, then fails every later one.
    pub fn new_failing_after(config: &EmailConfig, accepted: usize) -> Self {
        tracing::info!(
            from = %config.from_address,
            accepted,
            "Flaky mock email service initialized (SMTP calls skipped)"
        );

        Self {
            mailer: Mailer::Flaky {
                ok: Arc::new(StubTransport::new_ok()),
                refused: Arc::new(StubTransport::new_error()),
                accepted,
                attempts: Arc::new(AtomicUsize::new(0)),
            },
            config: config.clone(),
        }
    }

    fn with_stub(config: &EmailConfig, stub: StubTransport) -> Self {
        tracing::info!(
            from = %config.from_address,
            "Mock email service initialized (SMTP calls skipped)"
        );

        Self {
            mailer: Mailer::Stub(Arc::new(stub)),
            config: config.clone(),
        }
    }

    pub fn config(&self) -> &EmailConfig {
        &self.config
    }

    /// Raw messages accepted by a mock service, oldest first.
    pub fn sent(&self) -> Vec<String> {
        match &self.mailer {
            Mailer::Stub(stub) | Mailer::Flaky { ok: stub, .. } => {
                stub.messages().into_iter().map(|(_, raw)| raw).collect()
            }
            Mailer::Smtp(_) => Vec::new(),
        }
    }

    pub async fn send(&self, mail: Mail) -> anyhow::Result<()> {
        tracing::info!(to = %mail.to, subject = %mail.subject, "Sending email");

        let from = Mailbox::new(
            Some(mail.from_name),
            self.config.from_address.parse()?,
        );

        let mut builder = Message::builder()
            .from(from)
            .to(mail.to.parse()?)
            .subject(mail.subject);

        if let Some(reply_to) = mail.reply_to {
            builder = builder.reply_to(reply_to.parse()?);
        }

        let message = builder.multipart(MultiPart::alternative_plain_html(
            mail.plain,
            mail.html,
        ))?;

        let mailer = self.mailer.clone();
        tokio::task::spawn_blocking(move || mailer.send(&message)).await??;

        Ok(())
    }
}
