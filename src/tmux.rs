//! Tmux session script generation and execution.
//!
//! [`generate`] turns a resolved host list into a list of [`Directive`]s: one
//! pane per host, a tiled layout, synchronized input, and a final attach or
//! switch. The directives are either printed (one per line) or run with
//! [`execute`] as a single tmux invocation.
//!
//! # Targets
//!
//! In [`SessionMode::NewSession`] every directive after the first addresses
//! the new session by name. In [`SessionMode::ExistingWindow`] they carry no
//! target and act on the current window.

use crate::error::{ClusterError, Result};
use crate::interpolate::shell_quote;
use crate::ssh;
use std::fmt;
use std::process::Command;
use tracing::{debug, info};

/// How the first pane is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionMode {
    /// Create a detached session with this name.
    NewSession(String),
    /// Create a new window in the current session.
    ExistingWindow,
}

impl SessionMode {
    fn target(&self) -> Option<&str> {
        match self {
            SessionMode::NewSession(name) => Some(name),
            SessionMode::ExistingWindow => None,
        }
    }
}

/// Whether we were started from inside a tmux client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientContext {
    /// Not attached to any tmux client.
    Outside,
    /// Running inside a tmux pane (`$TMUX` is set).
    Inside,
}

impl ClientContext {
    /// Detect the context from the environment.
    pub fn detect() -> Self {
        if in_tmux() {
            ClientContext::Inside
        } else {
            ClientContext::Outside
        }
    }
}

/// Window size in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub cols: u32,
    pub rows: u32,
}

/// A single tmux command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `new-session -d -s NAME [-x COLS -y ROWS] COMMAND`
    NewSession {
        name: String,
        geometry: Option<Geometry>,
        command: String,
    },
    /// `new-window COMMAND`
    NewWindow { command: String },
    /// `split-window [-t TARGET] COMMAND`
    SplitWindow {
        target: Option<String>,
        command: String,
    },
    /// `select-layout [-t TARGET] tiled`
    SelectLayout { target: Option<String> },
    /// `set-window-option [-t TARGET] synchronize-panes on`
    SynchronizePanes { target: Option<String> },
    /// `attach-session -t TARGET`
    AttachSession { target: String },
    /// `switch-client -t TARGET`
    SwitchClient { target: String },
}

fn push_target(args: &mut Vec<String>, target: &Option<String>) {
    if let Some(t) = target {
        args.push("-t".to_string());
        args.push(t.clone());
    }
}

impl Directive {
    /// The tmux argument vector for this directive.
    pub fn args(&self) -> Vec<String> {
        let mut args: Vec<String> = Vec::new();
        match self {
            Directive::NewSession {
                name,
                geometry,
                command,
            } => {
                args.extend(words(&["new-session", "-d", "-s", name]));
                if let Some(g) = geometry {
                    args.extend(words(&["-x", &g.cols.to_string(), "-y", &g.rows.to_string()]));
                }
                args.push(command.clone());
            }
            Directive::NewWindow { command } => {
                args.extend(words(&["new-window", command]));
            }
            Directive::SplitWindow { target, command } => {
                args.push("split-window".to_string());
                push_target(&mut args, target);
                args.push(command.clone());
            }
            Directive::SelectLayout { target } => {
                args.push("select-layout".to_string());
                push_target(&mut args, target);
                args.push("tiled".to_string());
            }
            Directive::SynchronizePanes { target } => {
                args.push("set-window-option".to_string());
                push_target(&mut args, target);
                args.extend(words(&["synchronize-panes", "on"]));
            }
            Directive::AttachSession { target } => {
                args.extend(words(&["attach-session", "-t", target]));
            }
            Directive::SwitchClient { target } => {
                args.extend(words(&["switch-client", "-t", target]));
            }
        }
        args
    }
}

fn words(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|p| p.to_string()).collect()
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let words: Vec<String> = self.args().iter().map(|a| quote_word(a)).collect();
        write!(f, "{}", words.join(" "))
    }
}

fn quote_word(word: &str) -> String {
    let plain = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./@%+=:,".contains(c));
    if plain {
        word.to_string()
    } else {
        shell_quote(word)
    }
}

/// Build the directive script for `hosts`.
///
/// `ssh_template` is the connect command template, see [`ssh::connect_command`].
///
/// # Errors
///
/// Returns [`ClusterError::NoHosts`] if `hosts` is empty.
pub fn generate(
    hosts: &[String],
    mode: &SessionMode,
    geometry: Option<Geometry>,
    context: ClientContext,
    ssh_template: &str,
) -> Result<Vec<Directive>> {
    let (first, rest) = hosts.split_first().ok_or_else(|| {
        ClusterError::NoHosts(mode.target().unwrap_or("current window").to_string())
    })?;
    let target = mode.target().map(str::to_string);
    let mut script = Vec::with_capacity(2 * hosts.len() + 3);

    let command = ssh::connect_command(ssh_template, first);
    script.push(match mode {
        SessionMode::NewSession(name) => Directive::NewSession {
            name: name.clone(),
            geometry,
            command,
        },
        SessionMode::ExistingWindow => Directive::NewWindow { command },
    });

    // tmux does not rebalance existing panes on split, so re-tile every time.
    for host in rest {
        script.push(Directive::SplitWindow {
            target: target.clone(),
            command: ssh::connect_command(ssh_template, host),
        });
        script.push(Directive::SelectLayout {
            target: target.clone(),
        });
    }

    script.push(Directive::SynchronizePanes {
        target: target.clone(),
    });

    match (mode, context) {
        (SessionMode::NewSession(name), ClientContext::Outside) => {
            script.push(Directive::AttachSession {
                target: name.clone(),
            });
        }
        (SessionMode::NewSession(name), ClientContext::Inside) => {
            script.push(Directive::SwitchClient {
                target: name.clone(),
            });
        }
        (SessionMode::ExistingWindow, _) => {}
    }

    // Attaching or switching can leave a stale layout.
    script.push(Directive::SelectLayout { target });

    debug!(directives = script.len(), hosts = hosts.len(), "generated script");
    Ok(script)
}

/// Pick a session name not reported as taken by `exists`.
///
/// The name is `prefix` followed by `cluster`, with `.` and `:` replaced
/// because tmux rejects them in session names, and `;` replaced because tmux
/// reads an argument ending in `;` as a command separator. A `-2`, `-3`, ... suffix is
/// appended until `exists` returns false.
pub fn session_name(prefix: &str, cluster: &str, exists: impl Fn(&str) -> bool) -> String {
    let base: String = format!("{}{}", prefix, cluster)
        .chars()
        .map(|c| if matches!(c, '.' | ':' | ';') { '_' } else { c })
        .collect();
    if !exists(&base) {
        return base;
    }
    (2u32..)
        .map(|n| format!("{}-{}", base, n))
        .find(|candidate| !exists(candidate))
        .unwrap_or(base)
}

/// Check if we're running inside a tmux session.
///
/// Checks for the `TMUX` environment variable, which tmux sets when active.
pub fn in_tmux() -> bool {
    std::env::var("TMUX").is_ok()
}

/// Fail with [`ClusterError::MissingDependency`] unless `program` is on `PATH`.
pub fn ensure_available(program: &str) -> Result<()> {
    which::which(program)
        .map(|path| debug!(program, path = %path.display(), "found"))
        .map_err(|_| ClusterError::MissingDependency(program.to_string()))
}

/// Whether a session called `name` already exists.
///
/// Errors while asking tmux (e.g. no server running) count as "no".
pub fn has_session(tmux: &str, name: &str) -> bool {
    Command::new(tmux)
        .args(["has-session", "-t", &format!("={}", name)])
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Size of the terminal the new session should match.
///
/// Inside tmux this is the current window; outside it is the terminal as
/// reported by `tput`. Returns `None` if the size cannot be determined.
pub fn window_geometry(tmux: &str, context: ClientContext) -> Option<Geometry> {
    let geometry = match context {
        ClientContext::Inside => {
            let out = capture(tmux, &["display-message", "-p", "#{window_width} #{window_height}"])?;
            parse_geometry(&out)
        }
        ClientContext::Outside => {
            let cols = capture("tput", &["cols"])?;
            let rows = capture("tput", &["lines"])?;
            parse_geometry(&format!("{} {}", cols.trim(), rows.trim()))
        }
    };
    debug!(?geometry, "window geometry");
    geometry
}

fn capture(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Parse `"COLS ROWS"`.
pub fn parse_geometry(s: &str) -> Option<Geometry> {
    let mut parts = s.split_whitespace();
    let cols = parts.next()?.parse().ok()?;
    let rows = parts.next()?.parse().ok()?;
    if parts.next().is_some() || cols == 0 || rows == 0 {
        return None;
    }
    Some(Geometry { cols, rows })
}

/// Join directives into a single tmux argument list separated by `;`.
pub fn chain_args(script: &[Directive]) -> Vec<String> {
    let mut args = Vec::new();
    for (i, directive) in script.iter().enumerate() {
        if i > 0 {
            args.push(";".to_string());
        }
        args.extend(directive.args());
    }
    args
}

/// Run `script` against the tmux server in one invocation.
///
/// The invocation inherits the terminal so `attach-session` can take it over.
///
/// # Errors
///
/// Returns [`ClusterError::Tmux`] if tmux cannot be started or exits non-zero.
pub fn execute(tmux: &str, script: &[Directive]) -> Result<()> {
    info!(directives = script.len(), "running tmux");
    let status = Command::new(tmux)
        .args(chain_args(script))
        .status()
        .map_err(|e| ClusterError::Tmux(e.to_string()))?;

    if !status.success() {
        return Err(ClusterError::Tmux(format!("tmux exited with {}", status)));
    }

    Ok(())
}
