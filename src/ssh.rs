//! Remote shell command for a pane.
//!
//! Each pane runs the connect command built here. When ssh exits with 255
//! (connection refused, dropped, or rejected) the pane stays open until Enter
//! is pressed, so the failure remains visible.

use crate::interpolate::{interpolate, shell_quote};

/// Exit status ssh uses for connection-level errors.
pub const SSH_CONNECTION_ERROR: i32 = 255;

/// Build the shell command that connects to `host`.
///
/// # Example
///
/// ```
/// use tmux_cluster::ssh::connect_command;
///
/// let cmd = connect_command("ssh {host}", "web1");
/// assert!(cmd.starts_with("ssh 'web1'; if [ $? -eq 255 ]"));
/// ```
pub fn connect_command(template: &str, host: &str) -> String {
    let prompt = format!("Connection to {} failed. Press enter to close.", host);
    format!(
        "{}; if [ $? -eq {} ]; then printf '%s\\n' {}; read _; fi",
        interpolate(template, host),
        SSH_CONNECTION_ERROR,
        shell_quote(&prompt)
    )
}
