//! Well-known file and directory names.

use std::path::Path;

/// Configuration files looked up at every level of the directory chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFile {
    /// `Configuration.json`, loaded root-first in the base pass
    Base,
    /// `Configuration.local.json`, machine-local overlay
    Local,
    /// `Configuration.curves.json`, curve overlay
    Curves,
}

impl ConfigFile {
    /// Files merged in the overlay pass, in merge order.
    pub const OVERLAYS: [ConfigFile; 2] = [ConfigFile::Local, ConfigFile::Curves];

    /// Get the string representation of the file name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Base => "Configuration.json",
            Self::Local => "Configuration.local.json",
            Self::Curves => "Configuration.curves.json",
        }
    }
}

impl AsRef<Path> for ConfigFile {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl std::fmt::Display for ConfigFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Version-control directories that mark a repository root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VcsMarker {
    /// The `.git` directory
    Git,
    /// The `.hg` directory
    Mercurial,
}

impl VcsMarker {
    pub const ALL: [VcsMarker; 2] = [VcsMarker::Mercurial, VcsMarker::Git];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Git => ".git",
            Self::Mercurial => ".hg",
        }
    }
}

impl std::fmt::Display for VcsMarker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
