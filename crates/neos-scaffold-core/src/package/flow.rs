//! Package registry backed by a Flow distribution on disk

use super::{PackageInfo, PackageRegistry};
use crate::error::{Result, ScaffoldError};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Directory holding the package groups of a distribution
const PACKAGES_DIR: &str = "Packages";

/// Subset of a composer manifest relevant for package discovery
#[derive(Debug, Default, Deserialize)]
struct ComposerManifest {
    #[serde(default, rename = "type")]
    package_type: Option<String>,

    #[serde(default)]
    extra: Option<ComposerExtra>,
}

#[derive(Debug, Default, Deserialize)]
struct ComposerExtra {
    #[serde(default)]
    neos: Option<NeosExtra>,
}

#[derive(Debug, Default, Deserialize)]
struct NeosExtra {
    #[serde(default, rename = "package-key")]
    package_key: Option<String>,
}

impl ComposerManifest {
    fn package_key(&self) -> Option<&str> {
        self.extra
            .as_ref()
            .and_then(|e| e.neos.as_ref())
            .and_then(|n| n.package_key.as_deref())
            .filter(|k| !k.is_empty())
    }
}

/// Packages found under `<root>/Packages/<group>/<Package>/composer.json`
///
/// Every installed package counts as active: Flow has no separate
/// activation state for installed packages.
#[derive(Debug, Clone, Default)]
pub struct FlowPackageRegistry {
    packages: Vec<PackageInfo>,
}

impl FlowPackageRegistry {
    /// Scan a distribution root for packages
    ///
    /// Packages are ordered by group and directory name, so site packages
    /// (in `Packages/Sites`) come last.
    pub fn discover(root: &Path) -> Result<Self> {
        let packages_dir = root.join(PACKAGES_DIR);
        if !packages_dir.is_dir() {
            debug!(path = %packages_dir.display(), "no packages directory found");
            return Ok(Self::default());
        }

        let mut packages = Vec::new();
        for entry in WalkDir::new(&packages_dir)
            .min_depth(2)
            .max_depth(2)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| packages_dir.clone());
                ScaffoldError::io(path, std::io::Error::other(e.to_string()))
            })?;
            if !entry.file_type().is_dir() {
                continue;
            }

            let package_path = entry.path().to_path_buf();
            let manifest_path = package_path.join("composer.json");
            if !manifest_path.is_file() {
                continue;
            }

            match read_manifest(&manifest_path) {
                Ok(manifest) => {
                    let key = manifest
                        .package_key()
                        .map(str::to_string)
                        .unwrap_or_else(|| entry.file_name().to_string_lossy().into_owned());
                    debug!(%key, path = %package_path.display(), "discovered package");
                    packages.push(PackageInfo {
                        key,
                        path: package_path,
                        package_type: manifest.package_type,
                    });
                }
                Err(e) => {
                    warn!(path = %manifest_path.display(), error = %e, "skipping package with unreadable composer.json");
                }
            }
        }

        Ok(Self { packages })
    }

    fn find(&self, key: &str) -> Option<&PackageInfo> {
        self.packages.iter().find(|p| p.key == key)
    }
}

fn read_manifest(path: &Path) -> std::result::Result<ComposerManifest, String> {
    let content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_json::from_str(&content).map_err(|e| e.to_string())
}

impl PackageRegistry for FlowPackageRegistry {
    fn is_package_available(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    fn is_package_active(&self, key: &str) -> bool {
        self.is_package_available(key)
    }

    fn package_path(&self, key: &str) -> Option<PathBuf> {
        self.find(key).map(|p| p.path.clone())
    }

    fn available_packages(&self) -> Vec<PackageInfo> {
        self.packages.clone()
    }
}
