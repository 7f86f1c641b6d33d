use serde::Serialize;

use mazy_config::MazyConfig;

use crate::cli::{ConfigCommands, OutputFormat};
use crate::output::output;

#[derive(Serialize)]
struct ConfigView {
    backend_url: String,
    backend_configured: bool,
    anon_key: String,
    service_key: String,
    recovery_admin: String,
    data_dir: String,
}

/// Handle `mazy config <subcommand>`.
pub fn handle(
    action: &ConfigCommands,
    format: OutputFormat,
    config: &MazyConfig,
) -> anyhow::Result<()> {
    match action {
        ConfigCommands::Show => output(
            &ConfigView {
                backend_url: config.backend.url.clone(),
                backend_configured: config.backend.is_configured(),
                anon_key: redact(&config.backend.anon_key),
                service_key: redact(&config.backend.service_key),
                recovery_admin: config.recovery.admin_email.clone(),
                data_dir: config
                    .general
                    .data_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            },
            format,
        ),
    }
}

/// Keys are never printed; only enough to tell configured from not.
fn redact(key: &str) -> String {
    if key.is_empty() {
        return "(not set)".to_string();
    }
    // Last four characters, not bytes: keys are operator input and may
    // contain multibyte text.
    let suffix_start = key.char_indices().rev().nth(3).map_or(0, |(i, _)| i);
    format!("***{}", &key[suffix_start..])
}
