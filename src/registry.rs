//! Cluster and tag definitions.
//!
//! The [`Registry`] maps every cluster or tag name to an ordered list of
//! members. Clusters and tags share one namespace: a tag line simply appends
//! its host to the definition named by the tag.
//!
//! Members are not classified when stored. Whether a member is a host or
//! another name is decided by the [`resolver`](crate::resolver) at expansion
//! time.

use std::collections::HashMap;

/// Stable identifier of a definition, assigned in first-seen order from 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DefinitionId(usize);

impl DefinitionId {
    /// The 0-based position of this definition in first-seen order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A named group of members.
#[derive(Debug, Clone, Default)]
pub struct Definition {
    /// The cluster or tag name.
    pub name: String,
    /// Hosts or names, in the order they were added. May contain duplicates.
    pub members: Vec<String>,
}

/// Mapping from cluster/tag name to its members.
///
/// Built once while loading configuration and then only read.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    definitions: Vec<Definition>,
    index: HashMap<String, DefinitionId>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the id for `name`, creating an empty definition if it is new.
    pub fn define(&mut self, name: &str) -> DefinitionId {
        if let Some(&id) = self.index.get(name) {
            return id;
        }
        let id = DefinitionId(self.definitions.len());
        self.definitions.push(Definition {
            name: name.to_string(),
            members: Vec::new(),
        });
        self.index.insert(name.to_string(), id);
        id
    }

    /// Append `members` to the definition `id`, keeping their order.
    ///
    /// Ids only come from [`Registry::define`] on this registry, so an
    /// unknown id is ignored.
    pub fn add_members<I, S>(&mut self, id: DefinitionId, members: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Some(def) = self.definitions.get_mut(id.0) {
            def.members.extend(members.into_iter().map(Into::into));
        }
    }

    /// Look up the id of `name` without defining it.
    pub fn lookup_id(&self, name: &str) -> Option<DefinitionId> {
        self.index.get(name).copied()
    }

    /// Members of the definition `id`.
    pub fn members_of(&self, id: DefinitionId) -> &[String] {
        self.definitions
            .get(id.0)
            .map(|d| d.members.as_slice())
            .unwrap_or(&[])
    }

    /// Members of `name`, or `None` if it is not a defined name.
    pub fn members(&self, name: &str) -> Option<&[String]> {
        self.lookup_id(name).map(|id| self.members_of(id))
    }

    /// Whether `name` is a cluster or tag.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All defined names in first-seen order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definitions.iter().map(|d| d.name.as_str())
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether no names are defined.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
