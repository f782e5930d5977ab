use anyhow::Result;
use clap::Args;
use relayform::Config;
use relayform_contact::{
    ContactFormData, Field, FormStore, PageContext, SubmitHooks, SubmitStatus, Submitter,
};

#[derive(Args)]
pub struct SubmitArgs {
    /// Sender name
    #[arg(long)]
    name: String,

    /// Sender email address
    #[arg(long)]
    email: String,

    #[arg(long, default_value = "")]
    message: String,

    /// Page URL recorded by the spreadsheet webhook
    #[arg(long, default_value = "")]
    source: String,

    #[arg(long, default_value = "")]
    source_path: String,

    #[arg(long, default_value = concat!("relayform/", env!("CARGO_PKG_VERSION")))]
    user_agent: String,
}

struct LogHooks;

impl SubmitHooks for LogHooks {
    fn on_success(&self, form: &ContactFormData) {
        tracing::info!(email = %form.email, "Contact form delivered");
    }

    fn on_error(&self, message: &str) {
        tracing::error!(error = message, "Contact form rejected by every sink");
    }
}

pub async fn submit(config: Config, args: SubmitArgs) -> Result<()> {
    let store = FormStore::new(Submitter::new(), config.form.sink_config());

    store.set_field(Field::Name, args.name)?;
    store.set_field(Field::Email, args.email)?;
    store.set_field(Field::Message, args.message)?;

    let page = PageContext::new(args.source, args.source_path, args.user_agent);
    store.submit_with_hooks(&page, &LogHooks).await?;

    let snapshot = store.snapshot();
    store.close();

    println!("status: {}", snapshot.status);
    if !snapshot.message.is_empty() {
        println!("message: {}", snapshot.message);
    }

    if snapshot.status == SubmitStatus::Error {
        anyhow::bail!("submission failed: {}", snapshot.message);
    }

    Ok(())
}
