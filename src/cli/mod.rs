pub mod commands;
pub mod utils;

use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::client::HttpAuthApi;
use crate::config;
use crate::session::{FileTokenStorage, MemoryTokenStorage, SessionStore, TokenStorage};

#[derive(Parser)]
#[command(name = "panel")]
#[command(about = "Admin panel CLI - menu trees, sessions and guarded navigation")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Menu tree operations")]
    Menu {
        #[command(subcommand)]
        cmd: commands::menu::MenuCommands,
    },

    #[command(about = "Authentication and token management")]
    Auth {
        #[command(flatten)]
        remote: RemoteArgs,
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Run paths through the navigation guard against a live server")]
    Navigate(commands::navigate::NavigateArgs),
}

/// Connection options shared by commands that talk to the API server
#[derive(Args, Debug, Clone)]
pub struct RemoteArgs {
    #[arg(long, env = "ADMIN_PANEL_SERVER", default_value = "http://localhost:3000", help = "API server URL")]
    pub server: String,

    #[arg(long, help = "Keep the token in memory only instead of the config directory")]
    pub ephemeral: bool,
}

impl RemoteArgs {
    pub fn api(&self) -> anyhow::Result<HttpAuthApi> {
        let timeout = Duration::from_millis(config::config().navigation.request_timeout_ms);
        Ok(HttpAuthApi::new(&self.server, timeout)?)
    }

    pub fn session(&self) -> anyhow::Result<Arc<SessionStore>> {
        let storage: Arc<dyn TokenStorage> = if self.ephemeral {
            Arc::new(MemoryTokenStorage::new())
        } else {
            Arc::new(FileTokenStorage::default_location()?)
        };
        Ok(Arc::new(SessionStore::new(storage)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Menu { cmd } => commands::menu::handle(cmd, output_format).await,
        Commands::Auth { remote, cmd } => commands::auth::handle(cmd, &remote, output_format).await,
        Commands::Navigate(args) => commands::navigate::handle(args, output_format).await,
    }
}
