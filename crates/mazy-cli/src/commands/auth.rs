use serde::Serialize;

use mazy_core::Role;
use mazy_session::{SessionController, SessionMode};

use crate::cli::{AuthCommands, OutputFormat};
use crate::commands::{friendly, password_or_prompt};
use crate::output::output;

#[derive(Serialize)]
struct LoginResponse {
    email: String,
    name: String,
    role: Role,
    emergency: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    warning: Option<String>,
}

#[derive(Serialize)]
struct StatusResponse {
    mode: &'static str,
    logged_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<Role>,
    emergency: bool,
    directory_size: usize,
}

/// Handle `mazy auth <subcommand>`.
pub async fn handle(
    action: &AuthCommands,
    format: OutputFormat,
    controller: &SessionController,
) -> anyhow::Result<()> {
    match action {
        AuthCommands::Login { email, password } => {
            let password = password_or_prompt(password.clone(), "Password")?;
            let outcome = controller.login(email, &password).await.map_err(friendly)?;
            if let Some(warning) = &outcome.warning {
                tracing::warn!("{warning}");
            }
            output(
                &LoginResponse {
                    email: outcome.user.email,
                    name: outcome.user.name,
                    role: outcome.user.role,
                    emergency: outcome.emergency,
                    warning: outcome.warning,
                },
                format,
            )
        }
        AuthCommands::Logout => {
            controller.logout().map_err(friendly)?;
            output(&serde_json::json!({ "logged_out": true }), format)
        }
        AuthCommands::Register {
            email,
            password,
            name,
            phone,
        } => {
            let password = password_or_prompt(password.clone(), "Password")?;
            controller
                .register(email, &password, name, phone)
                .await
                .map_err(friendly)?;
            output(
                &serde_json::json!({ "registered": email, "logged_in": false }),
                format,
            )
        }
        AuthCommands::Status => {
            let state = controller.state();
            let mode = match state.mode {
                SessionMode::Local => "local",
                SessionMode::Remote => "remote",
            };
            output(
                &StatusResponse {
                    mode,
                    logged_in: state.is_logged_in(),
                    email: state.current_user.as_ref().map(|u| u.email.clone()),
                    role: state.current_user.as_ref().map(|u| u.role),
                    emergency: state.emergency,
                    directory_size: state.users.len(),
                },
                format,
            )
        }
    }
}
