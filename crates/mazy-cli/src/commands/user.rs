use mazy_core::{Role, User, UserUpdate};
use mazy_session::SessionController;

use crate::cli::{OutputFormat, UserCommands};
use crate::commands::{friendly, password_or_prompt};
use crate::output::output;

/// Handle `mazy user <subcommand>`.
pub async fn handle(
    action: &UserCommands,
    format: OutputFormat,
    controller: &SessionController,
) -> anyhow::Result<()> {
    match action {
        UserCommands::List => output(&controller.state().users, format),
        UserCommands::Add {
            email,
            password,
            name,
            phone,
            role,
        } => {
            let role: Role = role.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            let password = password_or_prompt(password.clone(), "Password")?;
            let user = User {
                email: email.clone(),
                name: name.clone(),
                phone: phone.clone(),
                role,
                expires_at: None,
            };
            controller.add_user(&user, &password).await.map_err(friendly)?;
            output(&serde_json::json!({ "added": email }), format)
        }
        UserCommands::Update {
            email,
            name,
            phone,
            role,
            clear_expiry,
        } => {
            let mut builder = UserUpdate::builder();
            if let Some(name) = name {
                builder = builder.name(name.clone());
            }
            if let Some(phone) = phone {
                builder = builder.phone(phone.clone());
            }
            if let Some(role) = role {
                let role: Role = role.parse().map_err(|e: String| anyhow::anyhow!(e))?;
                builder = builder.role(role);
            }
            if *clear_expiry {
                builder = builder.expires_at(None);
            }
            let update = builder.build();
            if update.is_empty() {
                anyhow::bail!("nothing to update: pass at least one of --name, --phone, --role, --clear-expiry");
            }
            let refreshed = controller.update_user(email, &update).await.map_err(friendly)?;
            output(&refreshed, format)
        }
        UserCommands::Delete { email } => {
            controller.delete_user(email).await.map_err(friendly)?;
            output(&serde_json::json!({ "deleted": email }), format)
        }
        UserCommands::Extend { email, days } => {
            let refreshed = controller
                .extend_subscription(email, *days)
                .await
                .map_err(friendly)?;
            output(&refreshed, format)
        }
        UserCommands::Passwd { email, password } => {
            let password = password_or_prompt(password.clone(), "New password")?;
            controller
                .update_password(email, &password)
                .await
                .map_err(friendly)?;
            output(&serde_json::json!({ "password_updated": email }), format)
        }
    }
}
