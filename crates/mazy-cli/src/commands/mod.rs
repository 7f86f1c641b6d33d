pub mod auth;
pub mod config;
pub mod user;

use std::io::Write as _;

use mazy_session::SessionError;

/// Session errors reach the operator as their translated message; the raw
/// source detail goes to the logs.
pub fn friendly(error: SessionError) -> anyhow::Error {
    tracing::debug!(%error, "session operation failed");
    anyhow::anyhow!(error.user_message())
}

/// Use the `--password` value when given, otherwise prompt on stderr and
/// read one line from stdin.
pub fn password_or_prompt(password: Option<String>, prompt: &str) -> anyhow::Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }
    eprint!("{prompt}: ");
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
