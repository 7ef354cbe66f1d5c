//! Tribufu command-line client
//!
//! Thin binary over the `tribufu` SDK:
//! 1. Loads TOML config (`--config` > `CONFIG_PATH` > `tribufu.toml`)
//! 2. Builds one shared HTTP transport
//! 3. Picks the wrapper the command needs (Api, Client or Server), with
//!    credentials from `<PREFIX>_*` environment variables
//! 4. Prints results as JSON on stdout; logs go to stderr

mod command;
mod config;

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tribufu::{Api, Client, Server, Transport};

use crate::command::{Args, Command};
use crate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // JSON logs on stderr with LOG_LEVEL / RUST_LOG support
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env("LOG_LEVEL")
                .or_else(|_| EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr),
        )
        .init();

    let args = Args::parse();

    let source = Config::resolve_path(args.config);
    let config = Config::load_from(&source)
        .with_context(|| format!("failed to load config from {}", source.path().display()))?;

    info!(
        base_url = %config.api.base_url,
        timeout_secs = config.api.timeout_secs,
        env_prefix = %config.env_prefix,
        "configuration loaded"
    );

    let transport = config
        .api_options()
        .transport()
        .context("failed to build HTTP transport")?;

    run(args.command, &config, transport).await
}

async fn run(command: Command, config: &Config, transport: Arc<dyn Transport>) -> Result<()> {
    let prefix = Some(config.env_prefix.as_str());

    match command {
        Command::Games { page } => {
            let api = Api::from_env_or_default(transport, prefix);
            print_json(&api.resources().get_games(page).await)
        }
        Command::Servers { page } => {
            let api = Api::from_env_or_default(transport, prefix);
            print_json(&api.resources().get_servers(page).await)
        }
        Command::Clusters { page } => {
            let api = Api::from_env_or_default(transport, prefix);
            print_json(&api.resources().get_clusters(page).await)
        }
        Command::Server { id_or_address } => {
            let api = Api::from_env_or_default(transport, prefix);
            let server = api
                .resources()
                .get_server(&id_or_address)
                .await
                .with_context(|| format!("server not found: {id_or_address}"))?;
            print_json(&server)
        }
        Command::User { id } => {
            let api = Api::from_env_or_default(transport, prefix);
            let user = api
                .resources()
                .get_user_by_id(&id)
                .await
                .with_context(|| format!("user not found: {id}"))?;
            print_json(&user)
        }
        Command::Login { username } => {
            let mut client = Client::from_env(transport, prefix).with_context(|| {
                format!(
                    "set {p}_CLIENT_ID and {p}_CLIENT_SECRET to log in",
                    p = config.env_prefix
                )
            })?;
            let password = common::env::lookup(&config.env_prefix, "PASSWORD")
                .with_context(|| format!("set {}_PASSWORD to log in", config.env_prefix))?;

            if !client.login(&username, &password).await {
                bail!("login failed for {username}");
            }
            info!(expires_in = ?client.expires_in(), "logged in");

            let user = client
                .user_info()
                .await
                .context("logged in, but the user profile could not be fetched")?;
            print_json(&user)
        }
        Command::ServerLogin => {
            let mut server = Server::from_env(transport, prefix).with_context(|| {
                format!(
                    "set {p}_SERVER_ID, {p}_CLIENT_ID and {p}_CLIENT_SECRET to log in as a server",
                    p = config.env_prefix
                )
            })?;

            if !server.login().await {
                bail!("server login failed for server {}", server.server_id());
            }
            info!(server_id = %server.server_id(), "server logged in");

            let record = server
                .info()
                .await
                .with_context(|| format!("server not found: {}", server.server_id()))?;
            print_json(&record)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render output")?;
    println!("{rendered}");
    Ok(())
}
