//! Configuration formats.
//!
//! The config directory holds up to three files:
//!
//! - `clusters`: one cluster per line, `name member [member...]`
//! - `tags`: one host per line, `host tag [tag...]`
//! - `config.toml`: optional [`Settings`]
//!
//! In `clusters` and `tags`, blank lines and lines starting with `#` (after
//! optional spaces) are ignored. Members are separated by any whitespace.
//!
//! # Example
//!
//! ```text
//! # ~/.config/tmux-cluster/clusters
//! web   web1.example.com web2.example.com
//! prod  web db1.example.com
//! ```
//!
//! ```text
//! # ~/.config/tmux-cluster/tags
//! web3.example.com  web canary
//! ```
//!
//! ```toml
//! # ~/.config/tmux-cluster/config.toml
//! ssh_command = "ssh -o ConnectTimeout=5 {host}"
//! session_prefix = "cluster-"
//! ```

use serde::Deserialize;

/// Default connect command template.
pub const DEFAULT_SSH_COMMAND: &str = "ssh {host}";
/// Default prefix of new session names.
pub const DEFAULT_SESSION_PREFIX: &str = "cluster-";

/// One parsed definition line: the leading word and the words that follow.
pub type DefinitionLine = (String, Vec<String>);

/// Parse a single `name word [word...]` line.
///
/// Returns `None` for blank lines and comments.
///
/// # Examples
///
/// ```
/// use tmux_cluster::config::parse_line;
///
/// assert_eq!(
///     parse_line("web  w1 w2"),
///     Some(("web".to_string(), vec!["w1".to_string(), "w2".to_string()]))
/// );
/// assert_eq!(parse_line("   # comment"), None);
/// assert_eq!(parse_line(""), None);
/// ```
pub fn parse_line(line: &str) -> Option<DefinitionLine> {
    let trimmed = line.trim_start();
    if trimmed.starts_with('#') {
        return None;
    }
    let mut words = trimmed.split_whitespace();
    let name = words.next()?.to_string();
    Some((name, words.map(str::to_string).collect()))
}

/// Parse every definition line of a `clusters` or `tags` file.
pub fn parse_definitions(text: &str) -> Vec<DefinitionLine> {
    text.lines().filter_map(parse_line).collect()
}

/// Settings read from `config.toml`. Every field is optional.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Command run in each pane. See [`crate::interpolate`] for placeholders.
    pub ssh_command: String,
    /// Prefix for new session names.
    pub session_prefix: String,
    /// Name or path of the tmux binary.
    pub tmux: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ssh_command: DEFAULT_SSH_COMMAND.to_string(),
            session_prefix: DEFAULT_SESSION_PREFIX.to_string(),
            tmux: "tmux".to_string(),
        }
    }
}

impl Settings {
    /// Parse settings from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `toml::de::Error` if the TOML is malformed or has unknown keys.
    pub fn from_str(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_name_only() {
        assert_eq!(parse_line("  lonely  "), Some(("lonely".to_string(), vec![])));
    }

    #[test]
    fn test_parse_line_tabs() {
        let (name, members) = parse_line("db\td1\t d2").unwrap();
        assert_eq!(name, "db");
        assert_eq!(members, ["d1", "d2"]);
    }

    #[test]
    fn test_hash_inside_line_is_kept() {
        let (_, members) = parse_line("x a#b").unwrap();
        assert_eq!(members, ["a#b"]);
    }

    #[test]
    fn test_parse_definitions() {
        let text = "# clusters\n\nweb w1 w2\n   # indented comment\ndb d1\n";
        let defs = parse_definitions(text);
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].0, "web");
        assert_eq!(defs[1].1, ["d1"]);
    }

    #[test]
    fn test_settings_defaults() {
        let s = Settings::from_str("").unwrap();
        assert_eq!(s, Settings::default());
        assert_eq!(s.ssh_command, "ssh {host}");
    }

    #[test]
    fn test_settings_partial() {
        let s = Settings::from_str("session_prefix = \"c-\"").unwrap();
        assert_eq!(s.session_prefix, "c-");
        assert_eq!(s.tmux, "tmux");
    }

    #[test]
    fn test_settings_unknown_key() {
        assert!(Settings::from_str("sshcommand = \"x\"").is_err());
    }
}
