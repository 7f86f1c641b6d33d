use clap::{Parser, Subcommand, ValueEnum};

/// Shared output mode across all commands.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

/// Top-level CLI parser for the `mazy` binary.
#[derive(Debug, Parser)]
#[command(name = "mazy", version, about = "Mazylab session and user-directory tool")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, text
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Session operations: login, logout, register, status
    Auth {
        #[command(subcommand)]
        action: AuthCommands,
    },
    /// User-directory operations
    User {
        #[command(subcommand)]
        action: UserCommands,
    },
    /// Configuration inspection
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Debug, Subcommand)]
pub enum AuthCommands {
    /// Log in with email and password
    Login {
        email: String,
        /// Password; prompted on stdin when omitted
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Clear the current session
    Logout,
    /// Register a new account (does not log in)
    Register {
        email: String,
        #[arg(short, long)]
        password: Option<String>,
        #[arg(short, long)]
        name: String,
        #[arg(long)]
        phone: String,
    },
    /// Show the current session
    Status,
}

#[derive(Debug, Subcommand)]
pub enum UserCommands {
    /// List the user directory
    List,
    /// Add a user (admin operation)
    Add {
        email: String,
        #[arg(short, long)]
        password: Option<String>,
        #[arg(short, long)]
        name: String,
        #[arg(long)]
        phone: String,
        /// Role: admin, general, paid
        #[arg(short, long, default_value = "general")]
        role: String,
    },
    /// Partially update a user; omitted fields are untouched
    Update {
        email: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        /// Role: admin, general, paid
        #[arg(short, long)]
        role: Option<String>,
        /// Clear the subscription expiry
        #[arg(long)]
        clear_expiry: bool,
    },
    /// Delete a user
    Delete { email: String },
    /// Extend a subscription by N days
    Extend {
        email: String,
        #[arg(short, long, default_value_t = 30)]
        days: i64,
    },
    /// Change a user's password
    Passwd {
        email: String,
        #[arg(short, long)]
        password: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration (keys redacted)
    Show,
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::{Cli, Commands, OutputFormat, UserCommands};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from(["mazy", "--format", "json", "user", "list"])
            .expect("cli should parse");
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(
            cli.command,
            Commands::User {
                action: UserCommands::List
            }
        ));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["mazy", "user", "list", "--format", "json", "--quiet"])
            .expect("cli should parse");
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.quiet);
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        assert!(Cli::try_parse_from(["mazy", "--format", "xml", "user", "list"]).is_err());
    }

    #[test]
    fn update_flags_are_individually_optional() {
        let cli = Cli::try_parse_from(["mazy", "user", "update", "a@b.com", "--phone", "010"])
            .expect("cli should parse");
        let Commands::User {
            action:
                UserCommands::Update {
                    email,
                    name,
                    phone,
                    role,
                    clear_expiry,
                },
        } = cli.command
        else {
            panic!("expected user update");
        };
        assert_eq!(email, "a@b.com");
        assert!(name.is_none());
        assert_eq!(phone.as_deref(), Some("010"));
        assert!(role.is_none());
        assert!(!clear_expiry);
    }
}
