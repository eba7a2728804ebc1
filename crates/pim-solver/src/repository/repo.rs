//! Repository - an ordered, indexed collection of solvables.

use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::sync::Arc;

use crate::error::Result;
use crate::package::{compare_solvables, Package, Solvable, SolvableRef};

/// An ordered collection of solvables from one source.
///
/// The name index is rebuilt after every structural change, so it always
/// agrees with the member list.
#[derive(Debug, Clone)]
pub struct Repo {
    uri: String,
    priority: i32,
    enabled: bool,
    channels: Vec<String>,
    solvables: Vec<SolvableRef>,
    index: HashMap<String, Vec<SolvableRef>>,
}

impl Repo {
    /// Create a repository and index its members
    pub fn new(
        uri: impl Into<String>,
        priority: i32,
        enabled: bool,
        channels: Vec<String>,
        solvables: Vec<SolvableRef>,
    ) -> Self {
        let mut repo = Self {
            uri: uri.into(),
            priority,
            enabled,
            channels,
            solvables,
            index: HashMap::new(),
        };
        repo.index();
        repo
    }

    /// Create an enabled repository without channel filtering
    pub fn with_solvables(uri: impl Into<String>, priority: i32, solvables: Vec<SolvableRef>) -> Self {
        Self::new(uri, priority, true, Vec::new(), solvables)
    }

    /// Sort members with the global ordering and rebuild the name index
    pub fn index(&mut self) {
        self.solvables.sort_by(|a, b| compare_solvables(a.as_ref(), b.as_ref()));

        self.index.clear();
        for solvable in &self.solvables {
            self.index
                .entry(solvable.name().to_string())
                .or_default()
                .push(solvable.clone());
        }
    }

    /// Add packages, rejecting any whose exact version is already present.
    ///
    /// Returns the rejected packages.
    pub fn add(&mut self, packages: impl IntoIterator<Item = SolvableRef>) -> Vec<SolvableRef> {
        let mut rejected = Vec::new();

        for package in packages {
            if self.contains(package.as_ref()) {
                log::debug!("Rejecting {} from {}: version already present", package.id(), self.uri);
                rejected.push(package);
                continue;
            }
            self.index
                .entry(package.name().to_string())
                .or_default()
                .push(package.clone());
            self.solvables.push(package);
        }

        self.index();
        rejected
    }

    /// Check whether a solvable with the same name and exact version is present
    pub fn contains(&self, solvable: &dyn Solvable) -> bool {
        self.index
            .get(solvable.name())
            .map(|bucket| bucket.iter().any(|s| s.version().exq(solvable.version())))
            .unwrap_or(false)
    }

    /// Keep at most `count` members per name, evicting the lowest ranked.
    ///
    /// Returns the evicted members.
    pub fn prune(&mut self, count: usize) -> Result<Vec<SolvableRef>> {
        let mut buckets: BTreeMap<String, Vec<SolvableRef>> = self
            .index
            .iter()
            .map(|(name, bucket)| (name.clone(), bucket.clone()))
            .collect();

        let mut evicted = Vec::new();
        for bucket in buckets.values_mut() {
            while bucket.len() > count {
                if let Some(last) = bucket.pop() {
                    evicted.push(last);
                }
            }
        }

        self.solvables = buckets.into_values().flatten().collect();
        self.index();

        if !evicted.is_empty() {
            log::info!("Pruned {} packages from {}", evicted.len(), self.uri);
        }
        Ok(evicted)
    }

    /// Replace the members with the package manifests in a JSON array
    ///
    /// Returns the number of packages loaded.
    pub fn load<R: Read>(&mut self, reader: R) -> Result<usize> {
        let packages: Vec<Package> = serde_json::from_reader(reader)?;
        self.solvables = packages
            .into_iter()
            .map(|p| Arc::new(p) as SolvableRef)
            .collect();
        self.index();

        log::debug!("Loaded {} packages into {}", self.solvables.len(), self.uri);
        Ok(self.solvables.len())
    }

    /// Members visible through the configured channels.
    ///
    /// Without configured channels every member is visible.
    pub fn solvables(&self) -> Vec<SolvableRef> {
        if self.channels.is_empty() {
            return self.solvables.clone();
        }

        self.solvables
            .iter()
            .filter(|s| s.channels().iter().any(|c| self.channels.contains(c)))
            .cloned()
            .collect()
    }

    /// All members regardless of channel
    pub fn all(&self) -> &[SolvableRef] {
        &self.solvables
    }

    /// Members with the given name, newest first
    pub fn get(&self, name: &str) -> &[SolvableRef] {
        self.index.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn set_priority(&mut self, priority: i32) {
        self.priority = priority;
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn channels(&self) -> &[String] {
        &self.channels
    }

    pub fn len(&self) -> usize {
        self.solvables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solvables.is_empty()
    }
}
