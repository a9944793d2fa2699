//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// dashsync - offline tooling for reconciled dashboard configs
#[derive(Parser, Debug)]
#[command(name = "dashsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file (TOML); environment variables override it
    #[arg(long, global = true, env = "DASHSYNC_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Print the canonical form of a dashboard config
    ///
    /// Examples:
    ///   dashsync normalize dashboard.json
    ///   dashsync normalize dashboard.json --sha256
    Normalize {
        /// Dashboard JSON file, `-` for stdin
        file: PathBuf,

        /// Print the SHA-256 digest instead of the canonical JSON
        #[arg(long)]
        sha256: bool,
    },

    /// Compare a dashboard config with its last-applied state
    Diff {
        /// Dashboard JSON file, `-` for stdin
        file: PathBuf,

        /// State file written by a previous session
        #[arg(long)]
        state: PathBuf,

        /// Name of the dashboard in the state file
        #[arg(long)]
        name: String,

        /// Desired folder reference (uid or numeric id)
        #[arg(long)]
        folder: Option<String>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// List the dashboards recorded in a state file
    Show {
        /// State file written by a previous session
        #[arg(long)]
        state: PathBuf,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_normalize() {
        let cli = Cli::parse_from(["dashsync", "normalize", "board.json", "--sha256"]);
        assert_eq!(
            cli.command,
            Commands::Normalize {
                file: PathBuf::from("board.json"),
                sha256: true,
            }
        );
    }

    #[test]
    fn parse_diff() {
        let cli = Cli::parse_from([
            "dashsync", "diff", "board.json", "--state", "state.toml", "--name", "main",
        ]);
        assert_eq!(
            cli.command,
            Commands::Diff {
                file: PathBuf::from("board.json"),
                state: PathBuf::from("state.toml"),
                name: "main".to_string(),
                folder: None,
                json: false,
            }
        );
    }

    #[test]
    fn verbose_is_global() {
        let cli = Cli::parse_from(["dashsync", "show", "--state", "s.toml", "-v"]);
        assert!(cli.verbose);
    }
}
