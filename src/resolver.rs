//! Cluster expansion.
//!
//! Turns cluster/tag names into a flat list of hosts. Definitions may refer to
//! each other freely, including in cycles; every string is expanded at most
//! once per call.
//!
//! # Ordering
//!
//! Expansion is breadth-first in rounds: all items of one round are handled
//! before any member they expand to. Hosts appear in the order they are first
//! discovered by that walk.
//!
//! ```text
//! all   = web db
//! web   = w1 w2
//! db    = d1
//!
//! resolve(["all", "x"]) == ["x", "w1", "w2", "d1"]
//! ```

use crate::registry::Registry;
use std::collections::HashSet;
use tracing::debug;

/// Expand `seeds` into terminal hosts.
///
/// Names known to `registry` are replaced by their members; anything else is
/// taken as a literal host. The result has no duplicates and an empty `seeds`
/// yields an empty list.
pub fn resolve<S: AsRef<str>>(registry: &Registry, seeds: &[S]) -> Vec<String> {
    let mut handled: HashSet<String> = HashSet::new();
    let mut hosts = Vec::new();
    let mut queue: Vec<String> = seeds.iter().map(|s| s.as_ref().to_string()).collect();
    let mut round = 0usize;

    while !queue.is_empty() {
        let batch = std::mem::take(&mut queue);
        debug!(round, items = batch.len(), "expanding");

        for item in batch {
            if handled.contains(&item) {
                continue;
            }
            match registry.members(&item) {
                Some(members) => queue.extend(members.iter().cloned()),
                None => hosts.push(item.clone()),
            }
            handled.insert(item);
        }
        round += 1;
    }

    hosts
}

/// Remove every host reachable from `to_exclude` from `base`.
///
/// Exclusions are resolved through `registry` first, so cluster and tag names
/// are accepted. The order of the remaining hosts is preserved.
pub fn exclude<S: AsRef<str>>(registry: &Registry, base: &[String], to_exclude: &[S]) -> Vec<String> {
    if to_exclude.is_empty() {
        return base.to_vec();
    }
    let excluded: HashSet<String> = resolve(registry, to_exclude).into_iter().collect();
    base.iter()
        .filter(|h| !excluded.contains(*h))
        .cloned()
        .collect()
}

/// Split a whitespace separated host list, as given to `--exclude`.
pub fn split_hosts(list: &str) -> Vec<String> {
    list.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(defs: &[(&str, &[&str])]) -> Registry {
        let mut reg = Registry::new();
        for (name, members) in defs {
            let id = reg.define(name);
            reg.add_members(id, members.iter().copied());
        }
        reg
    }

    #[test]
    fn test_literal_host_passes_through() {
        let reg = registry(&[("web", &["w1"])]);
        assert_eq!(resolve(&reg, &["db.example.com"]), ["db.example.com"]);
    }

    #[test]
    fn test_empty_seeds() {
        let reg = registry(&[("web", &["w1"])]);
        let seeds: [&str; 0] = [];
        assert!(resolve(&reg, &seeds).is_empty());
    }

    #[test]
    fn test_dedup_across_branches() {
        let reg = registry(&[("a", &["b", "h1"]), ("b", &["h1", "h2"])]);
        assert_eq!(resolve(&reg, &["a"]), ["h1", "h2"]);
    }

    #[test]
    fn test_cycle_terminates() {
        let reg = registry(&[("a", &["b", "h1"]), ("b", &["a", "h2"])]);
        assert_eq!(resolve(&reg, &["a"]), ["h1", "h2"]);
    }

    #[test]
    fn test_self_reference() {
        let reg = registry(&[("a", &["a", "h1"])]);
        assert_eq!(resolve(&reg, &["a"]), ["h1"]);
    }

    #[test]
    fn test_breadth_first_order() {
        let reg = registry(&[
            ("all", &["web", "db"]),
            ("web", &["w1", "w2"]),
            ("db", &["d1"]),
        ]);
        assert_eq!(resolve(&reg, &["all", "x"]), ["x", "w1", "w2", "d1"]);
    }

    #[test]
    fn test_breadth_first_not_depth_first() {
        let reg = registry(&[
            ("top", &["deep", "h3"]),
            ("deep", &["deeper", "h2"]),
            ("deeper", &["h1"]),
        ]);
        assert_eq!(resolve(&reg, &["top"]), ["h3", "h2", "h1"]);
    }

    #[test]
    fn test_tag_reachable_from_cluster() {
        let mut reg = registry(&[("prod", &["web", "db1"])]);
        for host in ["w1", "w2"] {
            let id = reg.define("web");
            reg.add_members(id, [host]);
        }
        assert_eq!(resolve(&reg, &["prod"]), ["db1", "w1", "w2"]);
    }

    #[test]
    fn test_exclude_empty_is_identity() {
        let reg = Registry::new();
        let base = vec!["h3".to_string(), "h1".to_string(), "h2".to_string()];
        let none: [&str; 0] = [];
        assert_eq!(exclude(&reg, &base, &none), base);
    }

    #[test]
    fn test_exclude_preserves_order() {
        let reg = Registry::new();
        let base = vec!["h1".to_string(), "h2".to_string(), "h3".to_string()];
        assert_eq!(exclude(&reg, &base, &["h2"]), ["h1", "h3"]);
    }

    #[test]
    fn test_exclude_by_cluster_name() {
        let reg = registry(&[("all", &["web", "d1"]), ("web", &["w1", "w2"])]);
        let base = resolve(&reg, &["all"]);
        assert_eq!(exclude(&reg, &base, &["web", "absent"]), ["d1"]);
    }

    #[test]
    fn test_split_hosts() {
        assert_eq!(split_hosts("  a b\tc "), ["a", "b", "c"]);
        assert!(split_hosts("   ").is_empty());
    }
}
