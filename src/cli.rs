//! Command-line interface for tmux-cluster.
//!
//! Parses arguments using clap and provides the [`Cli`] struct containing
//! all user-specified options.

use crate::error::{ClusterError, Result};
use clap::{ArgAction, CommandFactory, Parser};
use std::path::PathBuf;

/// What to do with the resolved cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Print the hosts on one line.
    DumpHosts,
    /// Print the tmux directives, one per line.
    DumpCommands,
    /// Run the directives against tmux.
    Execute,
}

/// Command-line arguments for tmux-cluster.
///
/// # Examples
///
/// ```bash
/// # Open one pane per host of the "web" cluster
/// tmux-cluster web
///
/// # Same, skipping a host and everything tagged "canary"
/// tmux-cluster -x "web3 canary" web
///
/// # Ad-hoc cluster, as a new window of the current session
/// tmux-cluster -w -c "tmp db1 db2"
///
/// # Show what would be run
/// tmux-cluster -p prod
/// ```
#[derive(Parser, Debug, Default)]
#[command(name = "tmux-cluster")]
#[command(version)]
#[command(about = "Open a synchronized tmux pane per host of a cluster")]
#[command(long_about = "tmux-cluster resolves a cluster from ~/.config/tmux-cluster/{clusters,tags}\n\
    into a list of hosts and opens one tmux pane per host running ssh,\n\
    with synchronize-panes enabled so keystrokes reach every host.")]
pub struct Cli {
    /// Cluster or tag to open.
    #[arg(value_name = "CLUSTER")]
    pub cluster: Option<String>,

    /// Define and open an ad-hoc cluster: "name host [host...]".
    ///
    /// The name must not already be defined in the config files.
    #[arg(short = 'c', long, value_name = "LINE")]
    pub cluster_line: Option<String>,

    /// Space-separated hosts, clusters or tags to leave out.
    #[arg(short = 'x', long, value_name = "HOSTS")]
    pub exclude: Option<String>,

    /// Print the resolved hosts and exit.
    #[arg(short = 'd', long)]
    pub dump_hosts: bool,

    /// Print the tmux commands instead of running them.
    #[arg(short = 'p', long)]
    pub dump_commands: bool,

    /// Open the panes in a new window of the current session (inside tmux only).
    #[arg(short = 'w', long)]
    pub new_window: bool,

    /// Directory holding `clusters`, `tags` and `config.toml`.
    #[arg(short = 'C', long, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Check flag combinations clap cannot express on its own.
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError::ArgConflict`] when:
    /// - `--dump-hosts` and `--dump-commands` are both set
    /// - both or neither of `CLUSTER` and `--cluster-line` are given
    /// - `--new-window` is used outside tmux
    pub fn validate(&self, in_tmux: bool) -> Result<()> {
        if self.dump_hosts && self.dump_commands {
            return Err(ClusterError::ArgConflict(
                "--dump-hosts and --dump-commands cannot be used together".into(),
            ));
        }
        match (&self.cluster, &self.cluster_line) {
            (Some(_), Some(_)) => {
                return Err(ClusterError::ArgConflict(
                    "CLUSTER and --cluster-line cannot be used together".into(),
                ));
            }
            (None, None) => {
                return Err(ClusterError::ArgConflict(
                    "a CLUSTER or --cluster-line is required".into(),
                ));
            }
            _ => {}
        }
        if self.new_window && !in_tmux {
            return Err(ClusterError::ArgConflict(
                "--new-window only works inside a tmux session".into(),
            ));
        }
        Ok(())
    }

    /// The requested output mode.
    pub fn output_mode(&self) -> OutputMode {
        if self.dump_hosts {
            OutputMode::DumpHosts
        } else if self.dump_commands {
            OutputMode::DumpCommands
        } else {
            OutputMode::Execute
        }
    }

    /// Hosts, clusters or tags passed to `--exclude`.
    pub fn excluded(&self) -> Vec<String> {
        self.exclude
            .as_deref()
            .map(crate::resolver::split_hosts)
            .unwrap_or_default()
    }

    /// The one-line usage synopsis shown with setup errors.
    pub fn usage() -> String {
        Cli::command().render_usage().to_string()
    }

    /// Default log filter for the verbosity level.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("tmux-cluster").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_flags() {
        let cli = parse(&["-d", "-x", "a b", "-vv", "web"]);
        assert_eq!(cli.cluster.as_deref(), Some("web"));
        assert_eq!(cli.output_mode(), OutputMode::DumpHosts);
        assert_eq!(cli.excluded(), ["a", "b"]);
        assert_eq!(cli.log_level(), "debug");
        assert!(cli.validate(false).is_ok());
    }

    #[test]
    fn test_dump_flags_conflict() {
        let cli = parse(&["-d", "-p", "web"]);
        assert!(matches!(cli.validate(false), Err(ClusterError::ArgConflict(_))));
    }

    #[test]
    fn test_cluster_and_line_conflict() {
        let cli = parse(&["-c", "tmp h1", "web"]);
        assert!(matches!(cli.validate(false), Err(ClusterError::ArgConflict(_))));
        let none = parse(&[]);
        assert!(matches!(none.validate(false), Err(ClusterError::ArgConflict(_))));
    }

    #[test]
    fn test_usage_names_the_binary() {
        let usage = Cli::usage();
        assert!(usage.starts_with("Usage: tmux-cluster"));
        assert!(usage.contains("[CLUSTER]"));
    }

    #[test]
    fn test_new_window_needs_tmux() {
        let cli = parse(&["-w", "web"]);
        assert!(matches!(cli.validate(false), Err(ClusterError::ArgConflict(_))));
        assert!(cli.validate(true).is_ok());
        assert_eq!(cli.output_mode(), OutputMode::Execute);
    }
}
