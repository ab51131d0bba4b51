//! Error types for tmux-cluster.
//!
//! All errors are represented by [`ClusterError`]. Every variant is fatal for
//! the current invocation; [`ClusterError::exit_code`] picks the process exit
//! status reported by the binary.

use thiserror::Error;

/// A required external program is missing.
pub const EXIT_MISSING_DEPENDENCY: i32 = 69;
/// Configuration is missing or invalid.
pub const EXIT_CONFIG: i32 = 78;
/// Arguments conflict or are used out of context.
pub const EXIT_USAGE: i32 = 64;
/// Resolution produced no hosts.
pub const EXIT_NO_HOSTS: i32 = 65;

/// All possible errors that can occur in tmux-cluster.
#[derive(Error, Debug)]
pub enum ClusterError {
    /// A required program (tmux, tput, ...) is not on `PATH`.
    #[error("Required program not found: {0}")]
    MissingDependency(String),

    /// Neither a config directory nor an ad-hoc cluster line was supplied.
    #[error("No configuration found: create ~/.config/tmux-cluster/clusters or pass --cluster-line")]
    ConfigMissing,

    /// The ad-hoc cluster name is already defined by the config files.
    #[error("Cluster name already defined in configuration: {0}")]
    NameCollision(String),

    /// Mutually exclusive flags, or a flag used outside its context.
    #[error("{0}")]
    ArgConflict(String),

    /// Resolution (after exclusions) left nothing to connect to.
    #[error("No hosts to connect to for: {0}")]
    NoHosts(String),

    /// An ad-hoc cluster line that does not name a cluster.
    #[error("Invalid cluster line: {0:?}")]
    InvalidLine(String),

    /// Failed to read a file from disk.
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// `config.toml` could not be parsed.
    #[error("Failed to parse settings: {0}")]
    Settings(#[from] toml::de::Error),

    /// A tmux command failed to execute.
    #[error("Tmux error: {0}")]
    Tmux(String),
}

impl ClusterError {
    /// Whether the operator should be shown the usage line with this error.
    pub fn shows_usage(&self) -> bool {
        matches!(
            self,
            ClusterError::MissingDependency(_)
                | ClusterError::ConfigMissing
                | ClusterError::NameCollision(_)
                | ClusterError::ArgConflict(_)
        )
    }

    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            ClusterError::MissingDependency(_) => EXIT_MISSING_DEPENDENCY,
            ClusterError::ConfigMissing
            | ClusterError::NameCollision(_)
            | ClusterError::InvalidLine(_)
            | ClusterError::Io(_)
            | ClusterError::Settings(_) => EXIT_CONFIG,
            ClusterError::ArgConflict(_) => EXIT_USAGE,
            ClusterError::NoHosts(_) => EXIT_NO_HOSTS,
            ClusterError::Tmux(_) => 1,
        }
    }
}

/// Convenient Result type alias for tmux-cluster operations.
pub type Result<T> = std::result::Result<T, ClusterError>;
