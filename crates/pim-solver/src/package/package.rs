use std::fmt;
use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

use pim_version::{Requirement, Version, VersionError};

use super::solvable::Solvable;

/// A package as described by its manifest.
#[derive(Debug, Serialize, Deserialize)]
pub struct Package {
    /// Package name
    pub name: String,

    /// Version including build timestamp
    pub version: Version,

    /// Depends, provides and conflicts entries
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requirements: Vec<Requirement>,

    /// Target architecture
    #[serde(default = "default_platform")]
    pub arch: String,

    /// Target operating system
    #[serde(default = "default_platform")]
    pub os: String,

    /// Release channels this build is published to
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub channels: Vec<String>,

    /// Payload file name, derived from name/version/platform when absent
    #[serde(default, rename = "file", skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,

    #[serde(skip)]
    origin: Origin,
}

fn default_platform() -> String {
    "any".to_string()
}

/// Where the pool found a package
#[derive(Debug)]
struct Origin {
    priority: AtomicI32,
    location: AtomicUsize,
}

impl Default for Origin {
    fn default() -> Self {
        Self {
            priority: AtomicI32::new(0),
            location: AtomicUsize::new(0),
        }
    }
}

impl Package {
    pub fn new(name: impl Into<String>, version: Version) -> Self {
        Self {
            name: name.into(),
            version,
            requirements: Vec::new(),
            arch: default_platform(),
            os: default_platform(),
            channels: Vec::new(),
            file_name: None,
            origin: Origin::default(),
        }
    }

    /// Create a package from a version string such as `1.0.0:20200101T000000Z`
    pub fn parse(name: impl Into<String>, version: &str) -> Result<Self, VersionError> {
        Ok(Self::new(name, Version::parse(version)?))
    }

    pub fn with_requirement(mut self, requirement: Requirement) -> Self {
        self.requirements.push(requirement);
        self
    }

    pub fn with_arch(mut self, arch: impl Into<String>) -> Self {
        self.arch = arch.into();
        self
    }

    pub fn with_os(mut self, os: impl Into<String>) -> Self {
        self.os = os.into();
        self
    }

    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channels.push(channel.into());
        self
    }
}

impl Clone for Package {
    fn clone(&self) -> Self {
        let copy = Self {
            name: self.name.clone(),
            version: self.version.clone(),
            requirements: self.requirements.clone(),
            arch: self.arch.clone(),
            os: self.os.clone(),
            channels: self.channels.clone(),
            file_name: self.file_name.clone(),
            origin: Origin::default(),
        };
        copy.set_origin(self.priority(), self.location());
        copy
    }
}

impl Solvable for Package {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> &Version {
        &self.version
    }

    fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    fn arch(&self) -> &str {
        &self.arch
    }

    fn os(&self) -> &str {
        &self.os
    }

    fn file_name(&self) -> String {
        match &self.file_name {
            Some(file) => file.clone(),
            None => format!("{}-{}.{}-{}.pkg", self.name, self.version.short(), self.os, self.arch),
        }
    }

    fn channels(&self) -> &[String] {
        &self.channels
    }

    fn location(&self) -> usize {
        self.origin.location.load(Ordering::Relaxed)
    }

    fn priority(&self) -> i32 {
        self.origin.priority.load(Ordering::Relaxed)
    }

    fn set_origin(&self, priority: i32, location: usize) {
        self.origin.priority.store(priority, Ordering::Relaxed);
        self.origin.location.store(location, Ordering::Relaxed);
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}
