//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - add/done: create trackers and record completions
//! - list/show: ranked listing and single-tracker detail
//! - rename/sigma/amend/forget/delete: edit trackers and histories
//! - export/import: JSON backup round-trip

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// trakr - A recurring-task tracker that forecasts when tasks come due
#[derive(Parser, Debug)]
#[command(name = "trakr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new tracker
    Add {
        /// Display name for the tracker
        name: String,

        /// Confidence multiplier (defaults to forecast.default-sigma)
        #[arg(short, long)]
        sigma: Option<f64>,
    },

    /// Record a completion
    Done {
        /// Tracker id or exact name
        tracker: String,

        /// When it was done: "now", a date/time, optionally ", <adjustment>"
        completion: Option<String>,
    },

    /// List trackers with their forecasts
    List {
        /// Sort key (due, last, name, id)
        #[arg(short, long, default_value = "due")]
        sort: String,

        /// Reverse the sort order
        #[arg(short, long)]
        reverse: bool,
    },

    /// Show one tracker in full
    Show {
        /// Tracker id or exact name
        tracker: String,
    },

    /// Rename a tracker
    Rename {
        /// Tracker id or exact name
        tracker: String,

        /// New display name
        name: String,
    },

    /// Change a tracker's confidence multiplier
    Sigma {
        /// Tracker id or exact name
        tracker: String,

        /// New sigma value (>= 0)
        value: f64,
    },

    /// Replace a completion by its displayed index
    Amend {
        /// Tracker id or exact name
        tracker: String,

        /// 1-based index into the history listing
        index: usize,

        /// Replacement completion expression
        completion: String,
    },

    /// Remove a completion by its displayed index
    Forget {
        /// Tracker id or exact name
        tracker: String,

        /// 1-based index into the history listing
        index: usize,
    },

    /// Delete a tracker and its history
    Delete {
        /// Tracker id or exact name
        tracker: String,
    },

    /// Write a JSON backup of all trackers
    Export {
        /// Destination file
        path: PathBuf,
    },

    /// Import trackers from a JSON backup
    Import {
        /// Backup file to read
        path: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse_no_args() {
        // No args should result in None command (TUI mode)
        let cli = Cli::try_parse_from(["trakr"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_verbose_flag() {
        let cli = Cli::try_parse_from(["trakr", "-v"]).unwrap();
        assert!(cli.is_verbose());
    }

    #[test]
    fn test_cli_config_option() {
        let cli = Cli::try_parse_from(["trakr", "-c", "/path/to/trakr.yml"]).unwrap();
        assert_eq!(cli.config.as_ref(), Some(&PathBuf::from("/path/to/trakr.yml")));
    }

    #[test]
    fn test_add_command() {
        let cli = Cli::try_parse_from(["trakr", "add", "water plants"]).unwrap();
        match cli.command {
            Some(Commands::Add { name, sigma }) => {
                assert_eq!(name, "water plants");
                assert!(sigma.is_none());
            }
            _ => panic!("Expected add command"),
        }
    }

    #[test]
    fn test_add_with_sigma() {
        let cli = Cli::try_parse_from(["trakr", "add", "water plants", "--sigma", "3.5"]).unwrap();
        match cli.command {
            Some(Commands::Add { sigma, .. }) => {
                assert_eq!(sigma, Some(3.5));
            }
            _ => panic!("Expected add command"),
        }
    }

    #[test]
    fn test_done_defaults_to_now() {
        let cli = Cli::try_parse_from(["trakr", "done", "water plants"]).unwrap();
        match cli.command {
            Some(Commands::Done { tracker, completion }) => {
                assert_eq!(tracker, "water plants");
                assert!(completion.is_none());
            }
            _ => panic!("Expected done command"),
        }
    }

    #[test]
    fn test_done_with_completion() {
        let cli = Cli::try_parse_from(["trakr", "done", "7", "2025-06-14 09:30, -2h"]).unwrap();
        match cli.command {
            Some(Commands::Done { tracker, completion }) => {
                assert_eq!(tracker, "7");
                assert_eq!(completion, Some("2025-06-14 09:30, -2h".to_string()));
            }
            _ => panic!("Expected done command"),
        }
    }

    #[test]
    fn test_list_command() {
        let cli = Cli::try_parse_from(["trakr", "list"]).unwrap();
        match cli.command {
            Some(Commands::List { sort, reverse }) => {
                assert_eq!(sort, "due");
                assert!(!reverse);
            }
            _ => panic!("Expected list command"),
        }
    }

    #[test]
    fn test_list_with_sort_and_reverse() {
        let cli = Cli::try_parse_from(["trakr", "list", "-s", "name", "-r"]).unwrap();
        match cli.command {
            Some(Commands::List { sort, reverse }) => {
                assert_eq!(sort, "name");
                assert!(reverse);
            }
            _ => panic!("Expected list command"),
        }
    }

    #[test]
    fn test_show_command() {
        let cli = Cli::try_parse_from(["trakr", "show", "3"]).unwrap();
        match cli.command {
            Some(Commands::Show { tracker }) => {
                assert_eq!(tracker, "3");
            }
            _ => panic!("Expected show command"),
        }
    }

    #[test]
    fn test_rename_command() {
        let cli = Cli::try_parse_from(["trakr", "rename", "3", "water garden"]).unwrap();
        match cli.command {
            Some(Commands::Rename { tracker, name }) => {
                assert_eq!(tracker, "3");
                assert_eq!(name, "water garden");
            }
            _ => panic!("Expected rename command"),
        }
    }

    #[test]
    fn test_sigma_command() {
        let cli = Cli::try_parse_from(["trakr", "sigma", "water plants", "1.5"]).unwrap();
        match cli.command {
            Some(Commands::Sigma { tracker, value }) => {
                assert_eq!(tracker, "water plants");
                assert_eq!(value, 1.5);
            }
            _ => panic!("Expected sigma command"),
        }
    }

    #[test]
    fn test_sigma_rejects_non_numeric() {
        assert!(Cli::try_parse_from(["trakr", "sigma", "water plants", "lots"]).is_err());
    }

    #[test]
    fn test_amend_command() {
        let cli = Cli::try_parse_from(["trakr", "amend", "3", "2", "250610T0900, +1h"]).unwrap();
        match cli.command {
            Some(Commands::Amend { tracker, index, completion }) => {
                assert_eq!(tracker, "3");
                assert_eq!(index, 2);
                assert_eq!(completion, "250610T0900, +1h");
            }
            _ => panic!("Expected amend command"),
        }
    }

    #[test]
    fn test_forget_command() {
        let cli = Cli::try_parse_from(["trakr", "forget", "3", "1"]).unwrap();
        match cli.command {
            Some(Commands::Forget { tracker, index }) => {
                assert_eq!(tracker, "3");
                assert_eq!(index, 1);
            }
            _ => panic!("Expected forget command"),
        }
    }

    #[test]
    fn test_delete_command() {
        let cli = Cli::try_parse_from(["trakr", "delete", "water plants"]).unwrap();
        match cli.command {
            Some(Commands::Delete { tracker }) => {
                assert_eq!(tracker, "water plants");
            }
            _ => panic!("Expected delete command"),
        }
    }

    #[test]
    fn test_export_import_commands() {
        let cli = Cli::try_parse_from(["trakr", "export", "/tmp/backup.json"]).unwrap();
        match cli.command {
            Some(Commands::Export { path }) => {
                assert_eq!(path, PathBuf::from("/tmp/backup.json"));
            }
            _ => panic!("Expected export command"),
        }

        let cli = Cli::try_parse_from(["trakr", "import", "/tmp/backup.json"]).unwrap();
        match cli.command {
            Some(Commands::Import { path }) => {
                assert_eq!(path, PathBuf::from("/tmp/backup.json"));
            }
            _ => panic!("Expected import command"),
        }
    }

    #[test]
    fn test_help_works() {
        // Verify help doesn't panic
        Cli::command().debug_assert();
    }

    #[test]
    fn test_version_flag() {
        let result = Cli::try_parse_from(["trakr", "--version"]);
        // Version flag causes early exit with error (expected)
        assert!(result.is_err());
    }
}
