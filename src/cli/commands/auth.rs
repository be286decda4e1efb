use clap::Subcommand;

use crate::cli::utils::{output_error, output_success};
use crate::cli::{OutputFormat, RemoteArgs};
use crate::client::{AuthApi, ClientError};

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login to server")]
    Login {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, env = "ADMIN_PANEL_PASSWORD", help = "Password")]
        password: String,
    },

    #[command(about = "Logout from server")]
    Logout,

    #[command(about = "Show current user information")]
    Whoami,
}

pub async fn handle(cmd: AuthCommands, remote: &RemoteArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let api = remote.api()?;
    let session = remote.session()?;

    match cmd {
        AuthCommands::Login { username, password } => {
            session.login(&api, &username, &password).await?;
            output_success(&output_format, &format!("Logged in as {}", username.trim()), None)
        }
        AuthCommands::Logout => {
            session.logout(&api).await?;
            output_success(&output_format, "Logged out", None)
        }
        AuthCommands::Whoami => {
            let Some(token) = session.token() else {
                return output_error(&output_format, "Not logged in", None);
            };

            match api.profile(&token).await {
                Ok(profile) => {
                    let message = format!("{} ({})", profile.name, profile.roles.join(", "));
                    output_success(&output_format, &message, Some(serde_json::to_value(&profile)?))
                }
                Err(e @ ClientError::SessionInvalid { .. }) => {
                    session.reset();
                    output_error(&output_format, &e.to_string(), session_code(&e))
                }
                Err(e) => Err(e.into()),
            }
        }
    }
}

fn session_code(err: &ClientError) -> Option<i64> {
    match err {
        ClientError::SessionInvalid { code, .. } | ClientError::Api { code, .. } => Some(*code),
        _ => None,
    }
}
