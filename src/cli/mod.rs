//! CLI interface and argument parsing
//!
//! This module provides the command-line interface using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Tenant Backup - tenant-scoped workbook exports
#[derive(Parser, Debug)]
#[command(name = "tenant-backup")]
#[command(version, about, long_about = None)]
#[command(author = "Tenant Backup Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "tenant-backup.toml", env = "BACKUP_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "BACKUP_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve exports over HTTP
    Serve(commands::serve::ServeArgs),

    /// Write a full backup workbook of one tenant
    Backup(commands::backup::BackupArgs),

    /// Write the daily movement workbook of one tenant
    Movement(commands::movement::MovementArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_backup() {
        let cli = Cli::parse_from(["tenant-backup", "backup", "--tenant", "acme"]);
        assert_eq!(cli.config, "tenant-backup.toml");
        match cli.command {
            Commands::Backup(args) => {
                assert_eq!(args.tenant, "acme");
                assert_eq!(args.output_dir, std::path::PathBuf::from("."));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_movement_with_date() {
        let cli = Cli::parse_from([
            "tenant-backup",
            "--config",
            "custom.toml",
            "movement",
            "--tenant",
            "acme",
            "--date",
            "2024-03-10",
        ]);
        assert_eq!(cli.config, "custom.toml");
        match cli.command {
            Commands::Movement(args) => assert_eq!(args.date.as_deref(), Some("2024-03-10")),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["tenant-backup", "--log-level", "debug", "serve"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
        assert!(matches!(cli.command, Commands::Serve(_)));
    }

    #[test]
    fn test_cli_requires_tenant_for_exports() {
        assert!(Cli::try_parse_from(["tenant-backup", "backup"]).is_err());
    }

    #[test]
    fn test_cli_parse_validate_config_and_init() {
        let cli = Cli::parse_from(["tenant-backup", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
        let cli = Cli::parse_from(["tenant-backup", "init", "--force"]);
        assert!(matches!(cli.command, Commands::Init(args) if args.force));
    }
}
