//! CLI argument parsing definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "gymdesk", author, version, about = "Gymdesk studio back office", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Set the log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP API
    Serve {
        /// Address to bind, overrides the configuration
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,

        /// Port to listen on, overrides the configuration
        #[arg(long, value_name = "PORT")]
        port: Option<u16>,

        /// Start without applying pending schema migrations
        #[arg(long)]
        skip_migrations: bool,
    },

    /// Schema and data maintenance
    Db {
        #[command(subcommand)]
        db_cmd: DbCommands,
    },

    /// Run read-only data quality checks
    Diagnose {
        /// table-counts, unmatched-athletes, orphan-enrollments,
        /// duplicate-members, missing-guardian-links or all
        #[arg(value_name = "CHECK", default_value = "all")]
        check: String,
    },

    /// Admin account management
    Admin {
        #[command(subcommand)]
        admin_cmd: AdminCommands,
    },

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        config_cmd: ConfigCommands,
    },
}

#[derive(Debug, Subcommand)]
pub enum DbCommands {
    /// Apply pending schema migrations
    Init,

    /// List applied and pending migrations
    Status,

    /// Execute a SQL file inside one transaction
    RunSql {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Fold legacy app_user / athlete rows into the unified member table
    ConsolidateMembers {
        /// Run every step, report, then roll back
        #[arg(long)]
        dry_run: bool,
    },

    /// Drop the legacy identity tables once consolidation has verified
    CleanupLegacy {
        /// Drop even when verification reports unmigrated rows
        #[arg(long)]
        force: bool,

        /// Confirm the drop
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum AdminCommands {
    /// Create an admin account
    Create {
        #[arg(long, value_name = "EMAIL")]
        email: String,

        #[arg(long, value_name = "NAME")]
        name: String,

        #[arg(long, value_name = "PASSWORD", env = "GYMDESK_ADMIN_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Grant the super_admin role
        #[arg(long = "super")]
        super_admin: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration with secrets masked
    Show,

    /// Validate a configuration file (defaults to --config)
    Validate {
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_consolidate_dry_run() {
        let cli = Cli::try_parse_from(["gymdesk", "db", "consolidate-members", "--dry-run"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Db {
                db_cmd: DbCommands::ConsolidateMembers { dry_run: true }
            }
        ));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "gymdesk",
            "serve",
            "--port",
            "4000",
            "--config",
            "gymdesk.yaml",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("gymdesk.yaml")));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(matches!(cli.command, Commands::Serve { port: Some(4000), .. }));
    }

    #[test]
    fn test_diagnose_defaults_to_all() {
        let cli = Cli::try_parse_from(["gymdesk", "diagnose"]).unwrap();
        assert!(matches!(cli.command, Commands::Diagnose { ref check } if check == "all"));
    }

    #[test]
    fn test_admin_password_falls_back_to_env() {
        temp_env::with_var("GYMDESK_ADMIN_PASSWORD", Some("from-the-env"), || {
            let cli = Cli::try_parse_from([
                "gymdesk", "admin", "create", "--email", "a@studio.test", "--name", "A", "--super",
            ])
            .unwrap();

            match cli.command {
                Commands::Admin {
                    admin_cmd: AdminCommands::Create {
                        password, super_admin, ..
                    },
                } => {
                    assert_eq!(password.as_deref(), Some("from-the-env"));
                    assert!(super_admin);
                }
                other => panic!("unexpected command: {:?}", other),
            }
        });
    }

    #[test]
    fn test_run_sql_requires_file() {
        assert!(Cli::try_parse_from(["gymdesk", "db", "run-sql"]).is_err());
    }
}
