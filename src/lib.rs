//! # tmux-cluster
//!
//! Opens one tmux pane per host of a cluster, runs ssh in each, and turns on
//! `synchronize-panes` so typing reaches every host at once.
//!
//! Clusters are defined in plain text files and may refer to other clusters
//! and to tags, recursively. A cluster is resolved into a flat,
//! duplicate-free host list before any pane is created.
//!
//! ## Quick Example
//!
//! ```text
//! # ~/.config/tmux-cluster/clusters
//! web   web1 web2
//! prod  web db1
//!
//! # ~/.config/tmux-cluster/tags
//! web3  web canary
//! ```
//!
//! ```bash
//! tmux-cluster prod              # panes for web1 web2 web3 db1
//! tmux-cluster -x canary prod    # ... without web3
//! ```
//!
//! ## Architecture
//!
//! - [`registry`]: cluster/tag name to member mapping
//! - [`resolver`]: breadth-first expansion and exclusion
//! - [`config`]: `clusters`/`tags` line format and `config.toml` settings
//! - [`loader`]: config directory discovery and registry loading
//! - [`tmux`]: directive script generation and tmux invocation
//! - [`ssh`]: per-pane connect command
//! - [`interpolate`]: `{host}`, `{user}`, `{hostname}` placeholders
//! - [`cli`]: command-line argument parsing with clap
//! - [`error`]: error types and exit codes

pub mod cli;
pub mod config;
pub mod error;
pub mod interpolate;
pub mod loader;
pub mod registry;
pub mod resolver;
pub mod ssh;
pub mod tmux;

pub use config::Settings;
pub use error::{ClusterError, Result};
pub use registry::{DefinitionId, Registry};
pub use tmux::{ClientContext, Directive, Geometry, SessionMode};
