//! Config directory discovery and registry loading.
//!
//! The config directory is searched in this order:
//!
//! 1. `--config-dir` on the command line
//! 2. `$TMUX_CLUSTER_CONFIG_DIR`
//! 3. `$XDG_CONFIG_HOME/tmux-cluster`
//! 4. `~/.config/tmux-cluster`
//! 5. Platform default (e.g., `~/Library/Application Support` on macOS)
//!
//! The first directory that exists wins. Inside it, `clusters`, `tags` and
//! `config.toml` are each optional.

use crate::config::{self, Settings};
use crate::error::{ClusterError, Result};
use crate::registry::Registry;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Directory name used under the various config roots.
pub const APP_DIR: &str = "tmux-cluster";
/// File holding cluster definitions.
pub const CLUSTERS_FILE: &str = "clusters";
/// File holding host tags.
pub const TAGS_FILE: &str = "tags";
/// File holding [`Settings`].
pub const SETTINGS_FILE: &str = "config.toml";

/// Find the config directory.
///
/// An explicit directory is returned when it exists, otherwise the default
/// locations are checked. Returns `None` when nothing exists, including when
/// no default location can be determined at all.
pub fn find_config_dir(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(dir) => first_existing(vec![dir.to_path_buf()]),
        None => first_existing(candidate_dirs()),
    }
}

fn first_existing(candidates: Vec<PathBuf>) -> Option<PathBuf> {
    candidates.into_iter().find(|p| p.is_dir())
}

fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs_found = Vec::new();
    if let Ok(dir) = std::env::var("TMUX_CLUSTER_CONFIG_DIR") {
        dirs_found.push(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        dirs_found.push(PathBuf::from(xdg).join(APP_DIR));
    }
    if let Some(home) = dirs::home_dir() {
        dirs_found.push(home.join(".config").join(APP_DIR));
    }
    if let Some(config_dir) = dirs::config_dir() {
        dirs_found.push(config_dir.join(APP_DIR));
    }
    dirs_found
}

/// Build a registry from the `clusters` and `tags` files in `dir`.
///
/// Cluster lines define `name` with their members. Tag lines add the host to
/// each tag named on the line. A name seen again accumulates members.
pub fn load_registry(dir: &Path) -> Result<Registry> {
    let mut registry = Registry::new();

    if let Some(text) = read_optional(&dir.join(CLUSTERS_FILE))? {
        add_clusters(&mut registry, &text);
    }
    if let Some(text) = read_optional(&dir.join(TAGS_FILE))? {
        add_tags(&mut registry, &text);
    }

    info!(dir = %dir.display(), definitions = registry.len(), "loaded registry");
    Ok(registry)
}

/// Add every line of a `clusters` file to `registry`.
pub fn add_clusters(registry: &mut Registry, text: &str) {
    for (name, members) in config::parse_definitions(text) {
        let id = registry.define(&name);
        registry.add_members(id, members);
    }
}

/// Add every line of a `tags` file to `registry`.
pub fn add_tags(registry: &mut Registry, text: &str) {
    for (host, tags) in config::parse_definitions(text) {
        for tag in tags {
            let id = registry.define(&tag);
            registry.add_members(id, [host.as_str()]);
        }
    }
}

/// Define one extra cluster from a `name member...` line.
///
/// Returns the cluster name.
///
/// # Errors
///
/// - [`ClusterError::InvalidLine`] if the line is blank or a comment
/// - [`ClusterError::NameCollision`] if the name is already defined
pub fn register_adhoc(registry: &mut Registry, line: &str) -> Result<String> {
    let (name, members) =
        config::parse_line(line).ok_or_else(|| ClusterError::InvalidLine(line.to_string()))?;

    if registry.contains(&name) {
        return Err(ClusterError::NameCollision(name));
    }

    debug!(%name, members = members.len(), "registering ad-hoc cluster");
    let id = registry.define(&name);
    registry.add_members(id, members);
    Ok(name)
}

/// Build the registry for one invocation.
///
/// Loads `dir` when present, then registers `cluster_line` on top of it.
/// Returns the registry and the ad-hoc cluster name, if any.
///
/// # Errors
///
/// - [`ClusterError::ConfigMissing`] if there is neither a directory nor a line
/// - any error of [`load_registry`] or [`register_adhoc`]
pub fn build_registry(
    dir: Option<&Path>,
    cluster_line: Option<&str>,
) -> Result<(Registry, Option<String>)> {
    let mut registry = match (dir, cluster_line) {
        (Some(dir), _) => load_registry(dir)?,
        (None, Some(_)) => Registry::new(),
        (None, None) => return Err(ClusterError::ConfigMissing),
    };
    let adhoc = cluster_line
        .map(|line| register_adhoc(&mut registry, line))
        .transpose()?;
    Ok((registry, adhoc))
}

/// Load `config.toml` from `dir`, or defaults when absent.
///
/// # Errors
///
/// - [`ClusterError::Io`] if reading fails
/// - [`ClusterError::Settings`] if TOML parsing fails
pub fn load_settings(dir: Option<&Path>) -> Result<Settings> {
    let Some(dir) = dir else {
        return Ok(Settings::default());
    };
    match read_optional(&dir.join(SETTINGS_FILE))? {
        Some(text) => Ok(Settings::from_str(&text)?),
        None => Ok(Settings::default()),
    }
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        debug!(path = %path.display(), "not present");
        return Ok(None);
    }
    debug!(path = %path.display(), "reading");
    Ok(Some(std::fs::read_to_string(path)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_accumulate_across_lines() {
        let mut reg = Registry::new();
        add_tags(&mut reg, "h1 web canary\nh2 web\n# h3 web\n");
        assert_eq!(reg.members("web").unwrap(), ["h1", "h2"]);
        assert_eq!(reg.members("canary").unwrap(), ["h1"]);
        assert!(!reg.contains("h1"));
    }

    #[test]
    fn test_cluster_lines_accumulate() {
        let mut reg = Registry::new();
        add_clusters(&mut reg, "web w1\nweb w2 w3\n");
        assert_eq!(reg.members("web").unwrap(), ["w1", "w2", "w3"]);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_clusters_and_tags_share_namespace() {
        let mut reg = Registry::new();
        add_clusters(&mut reg, "web w1\n");
        add_tags(&mut reg, "w2 web\n");
        assert_eq!(reg.members("web").unwrap(), ["w1", "w2"]);
    }

    #[test]
    fn test_adhoc_collision() {
        let mut reg = Registry::new();
        add_tags(&mut reg, "h1 web\n");
        let err = register_adhoc(&mut reg, "web x y").unwrap_err();
        assert!(matches!(err, ClusterError::NameCollision(n) if n == "web"));
        assert_eq!(reg.members("web").unwrap(), ["h1"]);
    }

    #[test]
    fn test_adhoc_defines_cluster() {
        let mut reg = Registry::new();
        let name = register_adhoc(&mut reg, "tmp a b").unwrap();
        assert_eq!(name, "tmp");
        assert_eq!(reg.members("tmp").unwrap(), ["a", "b"]);
    }

    #[test]
    fn test_adhoc_blank_line() {
        let mut reg = Registry::new();
        assert!(matches!(
            register_adhoc(&mut reg, "   "),
            Err(ClusterError::InvalidLine(_))
        ));
    }

    #[test]
    fn test_load_registry_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CLUSTERS_FILE), "prod web d1\n").unwrap();
        std::fs::write(dir.path().join(TAGS_FILE), "w1 web\nw2 web\n").unwrap();

        let reg = load_registry(dir.path()).unwrap();
        assert_eq!(reg.names().collect::<Vec<_>>(), ["prod", "web"]);
        assert_eq!(reg.members("web").unwrap(), ["w1", "w2"]);
    }

    #[test]
    fn test_missing_files_are_empty() {
        let dir = tempfile::tempdir().unwrap();
        let reg = load_registry(dir.path()).unwrap();
        assert!(reg.is_empty());
        assert_eq!(load_settings(Some(dir.path())).unwrap(), Settings::default());
    }

    #[test]
    fn test_bad_settings() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), "ssh_command = [").unwrap();
        assert!(matches!(
            load_settings(Some(dir.path())),
            Err(ClusterError::Settings(_))
        ));
    }

    #[test]
    fn test_explicit_dir_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert_eq!(find_config_dir(Some(&missing)), None);
        assert_eq!(
            find_config_dir(Some(dir.path())),
            Some(dir.path().to_path_buf())
        );
    }

    #[test]
    fn test_no_candidate_roots_is_not_an_error() {
        assert_eq!(first_existing(Vec::new()), None);
        let (reg, name) = build_registry(None, Some("tmp a b")).unwrap();
        assert_eq!(name.as_deref(), Some("tmp"));
        assert_eq!(reg.members("tmp").unwrap(), ["a", "b"]);
    }

    #[test]
    fn test_no_dir_no_line_is_config_missing() {
        assert!(matches!(
            build_registry(None, None),
            Err(ClusterError::ConfigMissing)
        ));
    }

    #[test]
    fn test_adhoc_only_registry() {
        let (reg, name) = build_registry(None, Some("tmp a b")).unwrap();
        assert_eq!(name.as_deref(), Some("tmp"));
        assert_eq!(reg.names().collect::<Vec<_>>(), ["tmp"]);
    }

    #[test]
    fn test_build_registry_collision_with_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CLUSTERS_FILE), "web w1\n").unwrap();
        let err = build_registry(Some(dir.path()), Some("web x")).unwrap_err();
        assert!(matches!(err, ClusterError::NameCollision(n) if n == "web"));

        let (reg, name) = build_registry(Some(dir.path()), None).unwrap();
        assert_eq!(name, None);
        assert_eq!(reg.members("web").unwrap(), ["w1"]);
    }
}
