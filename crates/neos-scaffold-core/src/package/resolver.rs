//! Destination package selection

use super::PackageRegistry;
use crate::error::{Result, ScaffoldError};
use std::fmt;
use tracing::debug;

/// Where a candidate package key came from, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateSource {
    CommandLine,
    Settings,
    SitePackage,
}

impl fmt::Display for CandidateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CandidateSource::CommandLine => "command line",
            CandidateSource::Settings => "settings",
            CandidateSource::SitePackage => "site package",
        };
        write!(f, "{}", name)
    }
}

/// A package key considered during resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageKeyCandidate {
    pub source: CandidateSource,
    pub key: String,
    pub valid: bool,
    pub available: bool,
    pub active: bool,
}

impl PackageKeyCandidate {
    pub fn qualifies(&self) -> bool {
        !self.key.is_empty() && self.valid && self.available && self.active
    }
}

/// Picks the destination package: command line, then settings, then site package
pub struct PackageKeyResolver<'a, R: PackageRegistry + ?Sized> {
    registry: &'a R,
}

impl<'a, R: PackageRegistry + ?Sized> PackageKeyResolver<'a, R> {
    pub fn new(registry: &'a R) -> Self {
        Self { registry }
    }

    /// Evaluate all candidates in priority order
    ///
    /// The key validity check is skipped for the detected site package.
    pub fn candidates(&self, settings_key: Option<&str>, cli_key: Option<&str>) -> Vec<PackageKeyCandidate> {
        let check = |source: CandidateSource, key: &str, check_validity: bool| PackageKeyCandidate {
            source,
            key: key.to_string(),
            valid: !check_validity || self.registry.is_package_key_valid(key),
            available: self.registry.is_package_available(key),
            active: self.registry.is_package_active(key),
        };

        let site_key = self.registry.site_package_key().unwrap_or_default();
        vec![
            check(CandidateSource::CommandLine, cli_key.unwrap_or_default(), true),
            check(CandidateSource::Settings, settings_key.unwrap_or_default(), true),
            check(CandidateSource::SitePackage, &site_key, false),
        ]
    }

    /// Resolve the destination package key
    pub fn resolve(&self, settings_key: Option<&str>, cli_key: Option<&str>) -> Result<String> {
        let candidates = self.candidates(settings_key, cli_key);

        if let Some(winner) = candidates.iter().find(|c| c.qualifies()) {
            debug!(key = %winner.key, source = %winner.source, "resolved package key");
            return Ok(winner.key.clone());
        }

        let key_of = |source: CandidateSource| {
            candidates
                .iter()
                .find(|c| c.source == source)
                .map(|c| c.key.clone())
                .unwrap_or_default()
        };
        Err(ScaffoldError::PackageResolution {
            cli: key_of(CandidateSource::CommandLine),
            settings: key_of(CandidateSource::Settings),
            site: key_of(CandidateSource::SitePackage),
        })
    }
}
