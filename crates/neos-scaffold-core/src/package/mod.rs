//! Package discovery and resolution
//!
//! This module provides:
//! - The `PackageRegistry` trait queried by the generators
//! - A filesystem registry for Flow distributions (`Packages/<group>/<Key>`)
//! - A static registry for embedding and tests
//! - Destination package selection and `resource://` path resolution

pub mod flow;
pub mod resolver;

use crate::error::{Result, ScaffoldError};
use crate::paths::split_resource_uri;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub use flow::FlowPackageRegistry;
pub use resolver::{CandidateSource, PackageKeyCandidate, PackageKeyResolver};

/// Composer package type of site packages
pub const SITE_PACKAGE_TYPE: &str = "neos-site";

/// An installed package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageInfo {
    pub key: String,
    pub path: PathBuf,
    /// Composer manifest `type`
    pub package_type: Option<String>,
}

impl PackageInfo {
    pub fn is_site(&self) -> bool {
        self.package_type.as_deref() == Some(SITE_PACKAGE_TYPE)
    }
}

/// Read-only view of the installed packages
pub trait PackageRegistry {
    /// Whether the key is syntactically a package key
    fn is_package_key_valid(&self, key: &str) -> bool {
        is_valid_package_key(key)
    }

    fn is_package_available(&self, key: &str) -> bool;

    fn is_package_active(&self, key: &str) -> bool;

    /// Root directory of an available package
    fn package_path(&self, key: &str) -> Option<PathBuf>;

    /// Available packages in registry order
    fn available_packages(&self) -> Vec<PackageInfo>;

    /// Key of the detected site package: the last available package of type `neos-site`
    fn site_package_key(&self) -> Option<String> {
        self.available_packages()
            .into_iter()
            .rev()
            .find(PackageInfo::is_site)
            .map(|p| p.key)
    }
}

/// Check a package key against the `Vendor.Package[.Sub]` pattern
pub fn is_valid_package_key(key: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(r"(?i)^[a-z0-9]+\.(?:[a-z0-9][.a-z0-9]*)+$").expect("valid package key pattern")
        })
        .is_match(key)
}

/// Map a `resource://` or plain path to a location on disk
///
/// Relative plain paths are taken relative to `root`.
pub fn resolve_path<R: PackageRegistry + ?Sized>(
    registry: &R,
    root: &Path,
    path: &str,
) -> Result<PathBuf> {
    if let Some((key, rest)) = split_resource_uri(path) {
        let package_path = registry.package_path(key).ok_or_else(|| {
            ScaffoldError::config(format!("Unknown package '{}' in path {}", key, path))
        })?;
        let mut resolved = package_path.join("Resources");
        for segment in rest.split('/').filter(|s| !s.is_empty()) {
            resolved.push(segment);
        }
        return Ok(resolved);
    }

    let plain = PathBuf::from(path);
    if plain.is_absolute() {
        Ok(plain)
    } else {
        Ok(root.join(plain))
    }
}

/// Registry over a fixed package list
#[derive(Debug, Clone, Default)]
pub struct StaticPackageRegistry {
    packages: Vec<PackageInfo>,
    inactive: Vec<String>,
}

impl StaticPackageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_package(
        mut self,
        key: impl Into<String>,
        path: impl Into<PathBuf>,
        package_type: Option<&str>,
    ) -> Self {
        self.packages.push(PackageInfo {
            key: key.into(),
            path: path.into(),
            package_type: package_type.map(str::to_string),
        });
        self
    }

    /// Mark an available package as inactive
    pub fn with_inactive(mut self, key: impl Into<String>) -> Self {
        self.inactive.push(key.into());
        self
    }
}

impl PackageRegistry for StaticPackageRegistry {
    fn is_package_available(&self, key: &str) -> bool {
        self.packages.iter().any(|p| p.key == key)
    }

    fn is_package_active(&self, key: &str) -> bool {
        self.is_package_available(key) && !self.inactive.iter().any(|k| k == key)
    }

    fn package_path(&self, key: &str) -> Option<PathBuf> {
        self.packages
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.path.clone())
    }

    fn available_packages(&self) -> Vec<PackageInfo> {
        self.packages.clone()
    }
}
