//! Entrypoint location and directory chain discovery
//!
//! The override loader walks every ancestor of the entrypoint directory. The
//! deepest ancestor carrying a version-control marker is the repository root,
//! used to anchor repository-relative paths.

use std::path::Path;

use crate::{Error, NormalizedPath, Result, VcsMarker};

/// Build the chain of directories from the outermost ancestor down to `start`.
///
/// The first element is the filesystem root (or the topmost relative
/// component), the last element is `start` itself.
pub fn directory_chain(start: &NormalizedPath) -> Vec<NormalizedPath> {
    let mut chain = vec![start.clone()];
    let mut current = start.clone();
    while let Some(parent) = current.parent() {
        if parent == current {
            break;
        }
        chain.push(parent.clone());
        current = parent;
    }
    chain.reverse();
    chain
}

/// Find the deepest directory in a root-first chain that contains a
/// version-control marker.
pub fn find_repository_root(chain: &[NormalizedPath]) -> Option<NormalizedPath> {
    chain
        .iter()
        .rev()
        .find(|dir| {
            VcsMarker::ALL
                .iter()
                .any(|marker| dir.join(marker.as_str()).is_dir())
        })
        .cloned()
}

/// Where the process runs from.
///
/// Supplies the directory whose ancestor chain is searched for configuration
/// files and the optional repository root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entrypoint {
    directory: NormalizedPath,
    name: Option<String>,
    repository_root: Option<NormalizedPath>,
}

impl Entrypoint {
    /// Use `dir` as the entrypoint directory.
    ///
    /// The directory is canonicalized when it exists so that the ancestor
    /// chain is absolute.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let resolved = dunce::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf());
        let directory = NormalizedPath::new(resolved);
        let repository_root = find_repository_root(&directory_chain(&directory));
        tracing::debug!(%directory, ?repository_root, "Located entrypoint");
        Self {
            directory,
            name: None,
            repository_root,
        }
    }

    /// Derive the entrypoint from an executable path: its directory, and its
    /// file stem as the entrypoint name.
    pub fn from_executable(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let dir = path.parent().unwrap_or(path);
        let mut entrypoint = Self::from_dir(dir);
        entrypoint.name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned());
        entrypoint
    }

    /// Entrypoint of the running process.
    pub fn current() -> Result<Self> {
        let exe = std::env::current_exe().map_err(|e| Error::io("<current executable>", e))?;
        Ok(Self::from_executable(exe))
    }

    pub fn directory(&self) -> &NormalizedPath {
        &self.directory
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn repository_root(&self) -> Option<&NormalizedPath> {
        self.repository_root.as_ref()
    }

    /// Root-first chain of directories searched for configuration files.
    pub fn chain(&self) -> Vec<NormalizedPath> {
        directory_chain(&self.directory)
    }

    /// Resolve a path against the repository root.
    ///
    /// Rooted paths are returned unchanged. Fails with
    /// [`Error::RepositoryNotFound`] when no repository root was found.
    pub fn combine_repository_path(&self, relative: &str) -> Result<NormalizedPath> {
        let candidate = NormalizedPath::new(relative);
        if candidate.is_absolute() {
            return Ok(candidate);
        }
        let root = self.repository_root.as_ref().ok_or(Error::RepositoryNotFound)?;
        Ok(root.join(relative))
    }

    /// Resolve a path against the repository root, falling back to the
    /// entrypoint directory. The first candidate that exists wins.
    pub fn combine_repository_or_entrypoint_path(&self, relative: &str) -> Result<NormalizedPath> {
        let candidate = NormalizedPath::new(relative);
        if candidate.is_absolute() {
            return Ok(candidate);
        }
        self.repository_root
            .iter()
            .chain(std::iter::once(&self.directory))
            .map(|base| base.join(relative))
            .find(|path| path.is_file())
            .ok_or_else(|| Error::NotFound {
                path: relative.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn chain_is_root_first() {
        let chain = directory_chain(&NormalizedPath::new("/srv/app/bin"));
        let names: Vec<&str> = chain.iter().map(|p| p.as_str()).collect();
        assert_eq!(names, vec!["/", "/srv", "/srv/app", "/srv/app/bin"]);
    }

    #[test]
    fn chain_of_root_is_just_root() {
        let chain = directory_chain(&NormalizedPath::new("/"));
        assert_eq!(chain, vec![NormalizedPath::new("/")]);
    }

    #[test]
    fn rooted_paths_bypass_repository_lookup() {
        let entrypoint = Entrypoint {
            directory: NormalizedPath::new("/nowhere"),
            name: None,
            repository_root: None,
        };
        let path = entrypoint.combine_repository_path("/etc/app.json").unwrap();
        assert_eq!(path.as_str(), "/etc/app.json");
    }

    #[test]
    fn relative_path_without_repository_fails() {
        let entrypoint = Entrypoint {
            directory: NormalizedPath::new("/nowhere"),
            name: None,
            repository_root: None,
        };
        let err = entrypoint.combine_repository_path("data/x.json").unwrap_err();
        assert!(matches!(err, Error::RepositoryNotFound));
    }
}
