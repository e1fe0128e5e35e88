//! CommonThread CLI binary entry point.

use std::sync::Arc;

use clap::Parser;
use commonthread_client::auth::{FileCredentialStore, Session};
use commonthread_client::cli::{self, Cli, Commands, StoriesCommand};
use commonthread_client::client::AuthClient;
use commonthread_client::config::ClientConfig;
use commonthread_client::error::ErrorCenter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env()?;
    let store = match &config.credentials_dir {
        Some(dir) => FileCredentialStore::new(dir.clone()),
        None => FileCredentialStore::new_default(),
    };
    let client = AuthClient::new(&config, ErrorCenter::new())?;
    let session = Session::with_store(client, Arc::new(store), cli.profile)?;

    match cli.command {
        Commands::Login(args) => cli::auth::handle_login(&session, &args.username, args.password).await,
        Commands::Signup(args) => cli::auth::handle_signup(&session, args).await,
        Commands::Stories(StoriesCommand::List(args)) => cli::stories::handle_list(&session, &args).await,
        Commands::Stories(StoriesCommand::Post(args)) => cli::stories::handle_post(&session, &args).await,
        Commands::Logout => cli::auth::handle_logout(&session),
        Commands::Status => cli::auth::handle_status(&session),
        Commands::Request(args) => {
            cli::api::handle_request(&session, &args.method, &args.path, args.body.as_deref()).await
        }
        Commands::Chat(args) => cli::api::handle_chat(&session, &args.project_id, &args.message).await,
    }
}
