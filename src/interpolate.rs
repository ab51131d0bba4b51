//! Placeholder expansion for the connect command template.
//!
//! The template from [`Settings::ssh_command`](crate::config::Settings) may use:
//!
//! - `{host}`: the host exactly as resolved, e.g. `admin@10.0.0.1`
//! - `{user}`: the part before `@`, empty when there is none
//! - `{hostname}`: the part after `@`, or the whole host
//!
//! Substituted values are shell-quoted.
//!
//! # Example
//!
//! ```
//! use tmux_cluster::interpolate::interpolate;
//!
//! let cmd = interpolate("ssh -l {user} {hostname}", "admin@10.0.0.1");
//! assert_eq!(cmd, "ssh -l 'admin' '10.0.0.1'");
//! ```

/// Split a host string into its optional user and hostname.
///
/// # Examples
///
/// ```
/// use tmux_cluster::interpolate::parse_host;
///
/// assert_eq!(parse_host("admin@192.168.1.1"), (Some("admin"), "192.168.1.1"));
/// assert_eq!(parse_host("web1"), (None, "web1"));
/// ```
pub fn parse_host(host: &str) -> (Option<&str>, &str) {
    match host.split_once('@') {
        Some((user, hostname)) => (Some(user), hostname),
        None => (None, host),
    }
}

/// Fill `{host}`, `{user}` and `{hostname}` in `template`.
///
/// A template without any placeholder gets the host appended.
pub fn interpolate(template: &str, host: &str) -> String {
    let (user, hostname) = parse_host(host);
    if !["{host}", "{user}", "{hostname}"]
        .iter()
        .any(|p| template.contains(p))
    {
        return format!("{} {}", template, shell_quote(host));
    }
    template
        .replace("{host}", &shell_quote(host))
        .replace("{user}", &shell_quote(user.unwrap_or("")))
        .replace("{hostname}", &shell_quote(hostname))
}

/// Quote `s` for a POSIX shell using single quotes.
pub fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}
