use std::io::{self, BufRead, Write};

use clap::Subcommand;
use serde_json::json;

use crate::cli::config::{load_environment_config, save_environment_config};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login to server")]
    Login {
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
        #[arg(long, help = "Server URL to log in to (saved for later commands)")]
        server: Option<String>,
    },

    #[command(about = "Logout from server")]
    Logout,

    #[command(about = "Show current authentication status")]
    Status,
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let mut env = load_environment_config()?;

    match cmd {
        AuthCommands::Login { email, password, server } => {
            if let Some(server) = server {
                env.server_url = server;
            }
            let password = match password {
                Some(p) => p,
                None => prompt("Password: ")?,
            };

            let mut client = env.client();
            let session = client.login(&email, &password).await?;
            let user_id = session
                .user
                .get("id")
                .and_then(|id| id.as_i64())
                .and_then(|id| i32::try_from(id).ok());
            env.set_session(session.token, email.clone(), user_id);
            save_environment_config(&env)?;

            output_success(
                &output_format,
                &format!("Logged in as {}", email),
                Some(json!({ "user": session.user, "server": env.server_url })),
            )
        }
        AuthCommands::Logout => {
            if env.token.is_some() {
                let mut client = env.client();
                // the token is dropped locally even if the server is unreachable
                if let Err(e) = client.logout().await {
                    tracing::warn!("Server logout failed: {}", e);
                }
            }
            env.clear_session();
            save_environment_config(&env)?;
            output_success(&output_format, "Logged out", None)
        }
        AuthCommands::Status => {
            let health = env.client().health().await.ok();
            let message = match &env.current_user {
                Some(user) => format!("Logged in as {} on {}", user, env.server_url),
                None => format!("Not logged in ({})", env.server_url),
            };
            output_success(
                &output_format,
                &message,
                Some(json!({
                    "server": env.server_url,
                    "user": env.current_user,
                    "logged_in_at": env.logged_in_at,
                    "server_up": health.is_some(),
                })),
            )
        }
    }
}

fn prompt(label: &str) -> anyhow::Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
