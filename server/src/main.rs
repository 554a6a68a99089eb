use std::sync::Arc;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use platform_authn::Authenticator;
use platform_obs::{ObsConfig, init_tracing};
use server::{
    config::AppConfig,
    http::{self, AppState, ServeConfig},
};
use tracing::warn;

#[derive(Parser, Debug)]
#[command(
    name = "gateway-server",
    version,
    about = "Agent gateway (authentication + authorization)"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP decision service.
    Serve(ServeCommand),
}

#[derive(Args, Debug)]
struct ServeCommand {
    #[arg(long, default_value = "0.0.0.0")]
    host: std::net::IpAddr,
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

impl From<ServeCommand> for ServeConfig {
    fn from(value: ServeCommand) -> Self {
        ServeConfig::new(value.host, value.port)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing(ObsConfig::default())?;
    let cli = Cli::parse();
    let config = Arc::new(AppConfig::load()?);
    match cli.command {
        Command::Serve(cmd) => run_server(cmd, config).await,
    }
}

async fn run_server(cmd: ServeCommand, config: Arc<AppConfig>) -> Result<()> {
    let authenticator = Arc::new(Authenticator::from_env());
    if !authenticator.is_configured() {
        warn!("SUPABASE_URL / SUPABASE_ANON_KEY not set; requests will be rejected until configured");
    }
    let state = AppState {
        authenticator,
        config,
    };
    http::serve(cmd.into(), state).await
}
