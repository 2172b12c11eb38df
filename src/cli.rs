use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "scrutineye")]
#[command(about = "Terminal dashboard for marketplace compliance investigations", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub run: RunArgs,
}

/// Options shared by every subcommand. Flags may appear before or after
/// the subcommand name.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Configuration file (skips discovery)
    #[arg(long, env = "SCRUTINEYE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// JSON fixture to load instead of the built-in sample data
    #[arg(long, env = "SCRUTINEYE_DATA", global = true)]
    pub data: Option<PathBuf>,

    /// View to open first (dashboard, workspace, seller-intel, reports, rules-engine)
    #[arg(long, global = true)]
    pub view: Option<String>,

    /// Start in dark mode
    #[arg(long, global = true)]
    pub dark: bool,

    /// Write logs to this file (the terminal is used by the dashboard)
    #[arg(long = "log-file", global = true)]
    pub log_file: Option<PathBuf>,

    /// Increase log verbosity (can be repeated: -v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the interactive dashboard (default)
    Run,

    /// Check the fixture given by --data (or the built-in sample data)
    /// without opening the dashboard
    Validate,

    /// Initialize configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Print the built-in sample data as JSON
    DumpSeed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_runs_dashboard() {
        let cli = Cli::try_parse_from(["scrutineye", "--view", "reports", "--dark"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.run.view.as_deref(), Some("reports"));
        assert!(cli.run.dark);
    }

    #[test]
    fn test_verbosity_counts() {
        let cli = Cli::try_parse_from(["scrutineye", "run", "-vv", "--view", "workspace"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Run)));
        assert_eq!(cli.run.verbosity, 2);
        assert_eq!(cli.run.view.as_deref(), Some("workspace"));
    }

    #[test]
    fn test_validate_takes_data_path() {
        let cli = Cli::try_parse_from(["scrutineye", "validate", "--data", "f.json"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Validate)));
        assert_eq!(cli.run.data, Some(PathBuf::from("f.json")));
    }

    #[test]
    fn test_init_force_flag() {
        let cli = Cli::try_parse_from(["scrutineye", "init", "--force"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Init { force: true })));
    }
}
