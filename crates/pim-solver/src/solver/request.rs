use std::fmt;

use pim_version::Requirement;

/// Kind of user intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobKind {
    Install,
    Remove,
    Update,
    Upgrade,
}

impl JobKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::Install => "install",
            JobKind::Remove => "remove",
            JobKind::Update => "update",
            JobKind::Upgrade => "upgrade",
        }
    }
}

/// A single user intent, optionally tied to a requirement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    kind: JobKind,
    requirement: Option<Requirement>,
}

impl Job {
    pub fn kind(&self) -> JobKind {
        self.kind
    }

    pub fn requirement(&self) -> Option<&Requirement> {
        self.requirement.as_ref()
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.requirement {
            Some(requirement) => write!(f, "{} {}", self.kind.as_str(), requirement),
            None => write!(f, "{}", self.kind.as_str()),
        }
    }
}

/// An ordered list of jobs to resolve.
///
/// Jobs can only be appended.
#[derive(Debug, Clone, Default)]
pub struct Request {
    jobs: Vec<Job>,
}

impl Request {
    /// Create a new empty request
    pub fn new() -> Self {
        Self { jobs: Vec::new() }
    }

    /// Install a package satisfying the requirement
    pub fn install(&mut self, requirement: Requirement) -> &mut Self {
        self.push(JobKind::Install, Some(requirement))
    }

    /// Remove the installed package satisfying the requirement
    pub fn remove(&mut self, requirement: Requirement) -> &mut Self {
        self.push(JobKind::Remove, Some(requirement))
    }

    /// Update the installed package satisfying the requirement
    pub fn update(&mut self, requirement: Requirement) -> &mut Self {
        self.push(JobKind::Update, Some(requirement))
    }

    /// Upgrade everything installed
    pub fn upgrade(&mut self) -> &mut Self {
        self.push(JobKind::Upgrade, None)
    }

    fn push(&mut self, kind: JobKind, requirement: Option<Requirement>) -> &mut Self {
        self.jobs.push(Job { kind, requirement });
        self
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let jobs: Vec<String> = self.jobs.iter().map(Job::to_string).collect();
        write!(f, "{}", jobs.join(", "))
    }
}
