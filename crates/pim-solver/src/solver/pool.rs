use std::collections::HashMap;

use pim_version::{Method, Requirement};

use crate::error::{PimError, Result};
use crate::package::{compare_solvables, Solvable, SolvableRef, INSTALLED_PRIORITY};
use crate::repository::Repo;

/// The set of everything the solver may choose from.
///
/// Merges the installed image with the configured repositories into a by-name
/// index and a reverse dependency index over the installed image. The pool
/// owns its repos, so members cannot change underneath the indices.
#[derive(Debug)]
pub struct Pool {
    /// Installed image first, then repos by ascending priority
    repos: Vec<Repo>,
    /// Every visible member, globally sorted
    solvables: Vec<SolvableRef>,
    /// Name (own or provided) -> members
    index: HashMap<String, Vec<SolvableRef>>,
    /// Name -> installed members that depend on it
    reverse_index: HashMap<String, Vec<SolvableRef>>,
}

impl Pool {
    /// Create a pool from the installed image and at least one repository.
    ///
    /// The image is always given [`INSTALLED_PRIORITY`], whatever priority it
    /// was created with.
    pub fn new(mut image: Repo, mut repos: Vec<Repo>) -> Result<Self> {
        if repos.is_empty() {
            return Err(PimError::NoRepos);
        }

        image.set_priority(INSTALLED_PRIORITY);
        repos.sort_by_key(|r| r.priority());

        let mut all = Vec::with_capacity(repos.len() + 1);
        all.push(image);
        all.extend(repos);

        let mut pool = Self {
            repos: all,
            solvables: Vec::new(),
            index: HashMap::new(),
            reverse_index: HashMap::new(),
        };
        pool.populate();
        Ok(pool)
    }

    fn populate(&mut self) {
        for (location, repo) in self.repos.iter().enumerate() {
            if !repo.enabled() {
                log::debug!("Skipping disabled repository {}", repo.uri());
                continue;
            }
            let is_image = location == 0;

            for solvable in repo.solvables() {
                solvable.set_origin(repo.priority(), location);

                self.solvables.push(solvable.clone());
                self.index
                    .entry(solvable.name().to_string())
                    .or_default()
                    .push(solvable.clone());

                for requirement in solvable.requirements() {
                    match requirement.method() {
                        Method::Depends if is_image => {
                            self.reverse_index
                                .entry(requirement.name().to_string())
                                .or_default()
                                .push(solvable.clone());
                        }
                        Method::Provides if requirement.name() != solvable.name() => {
                            self.index
                                .entry(requirement.name().to_string())
                                .or_default()
                                .push(solvable.clone());
                        }
                        _ => {}
                    }
                }
            }
        }

        self.solvables.sort_by(|a, b| compare_solvables(a.as_ref(), b.as_ref()));
        for bucket in self.index.values_mut() {
            bucket.sort_by(|a, b| compare_solvables(a.as_ref(), b.as_ref()));
        }

        log::debug!(
            "Pool populated with {} solvables from {} repositories ({} names)",
            self.solvables.len(),
            self.repos.len(),
            self.index.len()
        );
    }

    /// Check for a member with the same name and exact version
    pub fn contains(&self, solvable: &dyn Solvable) -> bool {
        self.index
            .get(solvable.name())
            .map(|bucket| bucket.iter().any(|s| s.same_version(solvable)))
            .unwrap_or(false)
    }

    /// First installed member satisfying `requirement`
    pub fn installed(&self, requirement: &Requirement) -> Option<SolvableRef> {
        self.index.get(requirement.name()).and_then(|bucket| {
            bucket
                .iter()
                .find(|s| s.is_installed() && s.satisfies(requirement))
                .cloned()
        })
    }

    /// Members of the installed image
    pub fn image(&self) -> Vec<SolvableRef> {
        self.solvables
            .iter()
            .filter(|s| s.is_installed())
            .cloned()
            .collect()
    }

    /// Every member satisfying `requirement`, in index order
    pub fn what_provides(&self, requirement: &Requirement) -> Vec<SolvableRef> {
        self.index
            .get(requirement.name())
            .map(|bucket| {
                bucket
                    .iter()
                    .filter(|s| s.satisfies(requirement))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Installed members that depend on `name`
    pub fn what_depends(&self, name: &str) -> &[SolvableRef] {
        self.reverse_index.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Repository at `location`; location 0 is the installed image
    pub fn location(&self, location: usize) -> Option<&Repo> {
        self.repos.get(location)
    }

    pub fn repos(&self) -> &[Repo] {
        &self.repos
    }

    pub fn solvables(&self) -> &[SolvableRef] {
        &self.solvables
    }

    pub fn len(&self) -> usize {
        self.solvables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solvables.is_empty()
    }
}

/// Builder for [`Pool`] when the installed image is supplied separately
#[derive(Debug, Default)]
pub struct PoolBuilder {
    image: Option<Repo>,
    repos: Vec<Repo>,
}

impl PoolBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the installed image repository
    pub fn image(mut self, image: Repo) -> Self {
        self.image = Some(image);
        self
    }

    /// Add a repository
    pub fn repo(mut self, repo: Repo) -> Self {
        self.repos.push(repo);
        self
    }

    pub fn build(self) -> Result<Pool> {
        let image = self.image.ok_or(PimError::NoImage)?;
        Pool::new(image, self.repos)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::package::Package;
    use pim_version::Version;

    fn pkg(name: &str, version: &str) -> Package {
        Package::parse(name, version).unwrap()
    }

    fn repo(uri: &str, priority: i32, packages: Vec<Package>) -> Repo {
        Repo::with_solvables(
            uri,
            priority,
            packages.into_iter().map(|p| Arc::new(p) as SolvableRef).collect(),
        )
    }

    fn ids(solvables: &[SolvableRef]) -> Vec<String> {
        solvables
            .iter()
            .map(|s| format!("{}@{}", s.name(), s.version().short()))
            .collect()
    }

    #[test]
    fn test_pool_requires_repo() {
        let image = repo("image", -1, vec![pkg("a", "1.0.0")]);
        assert!(matches!(Pool::new(image, Vec::new()), Err(PimError::NoRepos)));

        let image = repo("image", -1, vec![pkg("a", "1.0.0")]);
        assert!(Pool::new(image, vec![repo("empty", 0, Vec::new())]).is_ok());
    }

    #[test]
    fn test_pool_builder_requires_image() {
        let result = PoolBuilder::new().repo(repo("main", 0, Vec::new())).build();
        assert!(matches!(result, Err(PimError::NoImage)));

        let result = PoolBuilder::new()
            .image(repo("image", 5, Vec::new()))
            .build();
        assert!(matches!(result, Err(PimError::NoRepos)));
    }

    #[test]
    fn test_pool_forces_image_priority() {
        let image = repo("image", 7, vec![pkg("a", "1.0.0"), pkg("b", "1.0.0")]);
        let pool = Pool::new(
            image,
            vec![repo("one", 1, vec![pkg("a", "2.0.0")]), repo("zero", 0, vec![pkg("c", "1.0.0")])],
        )
        .unwrap();

        let image = pool.location(0).unwrap();
        assert_eq!(image.priority(), INSTALLED_PRIORITY);
        assert_eq!(image.uri(), "image");
        assert_eq!(pool.location(1).unwrap().uri(), "zero");
        assert_eq!(pool.location(2).unwrap().uri(), "one");
        assert!(pool.location(3).is_none());

        assert_eq!(ids(&pool.image()), vec!["a@1.0.0", "b@1.0.0"]);
        assert!(pool.image().iter().all(|s| s.priority() == -1 && s.location() == 0));
    }

    #[test]
    fn test_pool_global_order() {
        let image = repo("image", -1, vec![pkg("a", "1.0.0")]);
        let pool = Pool::new(
            image,
            vec![
                repo("one", 1, vec![pkg("a", "3.0.0")]),
                repo("zero", 0, vec![pkg("a", "2.0.0"), pkg("a", "1.5.0")]),
            ],
        )
        .unwrap();

        assert_eq!(ids(pool.solvables()), vec!["a@1.0.0", "a@2.0.0", "a@1.5.0", "a@3.0.0"]);
        assert_eq!(pool.len(), 4);
    }

    #[test]
    fn test_pool_disabled_repo_contributes_nothing() {
        let image = repo("image", -1, Vec::new());
        let mut disabled = repo("off", 0, vec![pkg("a", "1.0.0")]);
        disabled.set_enabled(false);

        let pool = Pool::new(image, vec![disabled]).unwrap();
        assert!(pool.is_empty());
        assert!(pool.what_provides(&Requirement::new("a")).is_empty());
    }

    #[test]
    fn test_what_provides_and_installed() {
        let image = repo("image", -1, vec![pkg("bacon", "0.1.1")]);
        let pool = Pool::new(
            image,
            vec![repo("main", 0, vec![pkg("bacon", "0.2.0"), pkg("bacon", "1.0.0")])],
        )
        .unwrap();

        let all = pool.what_provides(&Requirement::new("bacon"));
        assert_eq!(ids(&all), vec!["bacon@0.1.1", "bacon@1.0.0", "bacon@0.2.0"]);

        let newer = pool.what_provides(&Requirement::new("bacon").gte(Version::parse("0.2.0").unwrap()));
        assert_eq!(ids(&newer), vec!["bacon@1.0.0", "bacon@0.2.0"]);

        let installed = pool.installed(&Requirement::new("bacon")).unwrap();
        assert_eq!(installed.version().short(), "0.1.1");
        assert!(pool
            .installed(&Requirement::new("bacon").gte(Version::parse("0.2.0").unwrap()))
            .is_none());
        assert!(pool.installed(&Requirement::new("nacho")).is_none());
    }

    #[test]
    fn test_provides_index() {
        let image = repo("image", -1, Vec::new());
        let provider = pkg("bacon-ng", "2.0.0").with_requirement(Requirement::new("bacon").provides());
        let pool = Pool::new(image, vec![repo("main", 0, vec![provider, pkg("bacon", "1.0.0")])]).unwrap();

        let providers = pool.what_provides(&Requirement::new("bacon"));
        assert_eq!(ids(&providers), vec!["bacon@1.0.0", "bacon-ng@2.0.0"]);
    }

    #[test]
    fn test_reverse_index() {
        let image = repo(
            "image",
            -1,
            vec![
                pkg("genius", "1.0.0"),
                pkg("zealot", "1.0.0").with_requirement(Requirement::new("genius")),
                pkg("idiot", "1.0.0").with_requirement(Requirement::new("genius")),
            ],
        );
        let main = repo(
            "main",
            0,
            vec![pkg("fan", "1.0.0").with_requirement(Requirement::new("genius"))],
        );
        let pool = Pool::new(image, vec![main]).unwrap();

        let dependents = pool.what_depends("genius");
        assert_eq!(ids(dependents), vec!["idiot@1.0.0", "zealot@1.0.0"]);
        assert!(pool.what_depends("zealot").is_empty());
    }

    #[test]
    fn test_contains() {
        let image = repo("image", -1, vec![pkg("a", "1.0.0:20200101T000000Z")]);
        let pool = Pool::new(image, vec![repo("main", 0, vec![pkg("b", "1.0.0")])]).unwrap();

        assert!(pool.contains(&pkg("a", "1.0.0:20200101T000000Z")));
        assert!(pool.contains(&pkg("b", "1.0.0")));
        assert!(!pool.contains(&pkg("a", "1.0.0:20200102T000000Z")));
        assert!(!pool.contains(&pkg("c", "1.0.0")));
    }
}
