//! tmux-cluster CLI entry point.
//!
//! This binary provides the `tmux-cluster` command: resolve a cluster, then
//! print its hosts, print the tmux script, or run it.

use clap::Parser;
use tmux_cluster::cli::{Cli, OutputMode};
use tmux_cluster::error::{EXIT_USAGE, Result};
use tmux_cluster::tmux::{self, ClientContext, SessionMode};
use tmux_cluster::{ClusterError, loader, resolver};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(EXIT_USAGE);
        }
        Err(e) => e.exit(),
    };

    init_logging(&cli);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        if e.shows_usage() {
            eprintln!("\n{}", Cli::usage());
            eprintln!("For more information, try '--help'.");
        }
        std::process::exit(e.exit_code());
    }
}

/// Log to stderr, filtered by `TMUX_CLUSTER_LOG` or the `-v` count.
fn init_logging(cli: &Cli) {
    let filter = EnvFilter::try_from_env("TMUX_CLUSTER_LOG")
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Main application logic.
fn run(cli: &Cli) -> Result<()> {
    let context = ClientContext::detect();
    cli.validate(context == ClientContext::Inside)?;

    let config_dir = loader::find_config_dir(cli.config_dir.as_deref());
    let settings = loader::load_settings(config_dir.as_deref())?;

    if cli.output_mode() == OutputMode::Execute {
        tmux::ensure_available(&settings.tmux)?;
    }

    let (registry, adhoc) =
        loader::build_registry(config_dir.as_deref(), cli.cluster_line.as_deref())?;

    let cluster = match adhoc.or_else(|| cli.cluster.clone()) {
        Some(cluster) => cluster,
        None => return Err(ClusterError::ArgConflict("a CLUSTER is required".into())),
    };

    let resolved = resolver::resolve(&registry, &[cluster.as_str()]);
    let hosts = resolver::exclude(&registry, &resolved, &cli.excluded());
    info!(%cluster, resolved = resolved.len(), hosts = hosts.len(), "resolved cluster");

    if hosts.is_empty() {
        return Err(ClusterError::NoHosts(cluster));
    }

    if cli.output_mode() == OutputMode::DumpHosts {
        println!("{}", hosts.join(" "));
        return Ok(());
    }

    let mode = if cli.new_window {
        SessionMode::ExistingWindow
    } else {
        let name = tmux::session_name(&settings.session_prefix, &cluster, |n| {
            cli.output_mode() == OutputMode::Execute && tmux::has_session(&settings.tmux, n)
        });
        SessionMode::NewSession(name)
    };
    debug!(?mode, "session mode");

    let geometry = match mode {
        SessionMode::NewSession(_) if cli.output_mode() == OutputMode::Execute => {
            tmux::window_geometry(&settings.tmux, context)
        }
        _ => None,
    };

    let script = tmux::generate(&hosts, &mode, geometry, context, &settings.ssh_command)?;

    match cli.output_mode() {
        OutputMode::DumpCommands => {
            for directive in &script {
                println!("{}", directive);
            }
            Ok(())
        }
        _ => tmux::execute(&settings.tmux, &script),
    }
}
