use anyhow::Result;
use clap::{Parser, Subcommand};

mod cli {
    pub mod server;
    pub mod submit;
}

/// relayform - Contact form relay
#[derive(Parser)]
#[command(name = "relayform")]
#[command(about = "Contact form notification endpoint and dual-sink submitter", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server hosting the contact endpoint
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Submit one contact form to the configured sinks
    Submit(cli::submit::SubmitArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = relayform::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    relayform::observability::init_observability(
        "relayform",
        env!("CARGO_PKG_VERSION"),
        &config.observability.log_level,
    )?;

    match cli.command {
        Commands::Serve { host, port } => cli::server::serve(config, host, port).await,
        Commands::Submit(args) => cli::submit::submit(config, args).await,
    }
}
