//! Three-tier settings resolution: command line, settings file, built-in default

use super::Settings;
use crate::artifact::{ArtifactKind, Profile};
use crate::error::{Result, ScaffoldError};
use tracing::debug;

/// Values given on the command line for a single artifact
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub target_path: Option<String>,
    pub template_path: Option<String>,
    pub suffix: Option<String>,
    pub name_appendix: Option<String>,
    /// A `--no-<kind>` flag was given
    pub suppress: bool,
}

/// Effective settings of one artifact kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSettings {
    pub kind: ArtifactKind,
    pub target_path: String,
    /// Override directory for templates; `None` uses the bundled ones
    pub template_path: Option<String>,
    pub suffix: String,
    pub name_appendix: String,
    /// Whether a cascade generates this kind
    pub auto_generate: bool,
}

/// Effective auto-generation flag for a cascade step
///
/// A set suppression flag always disables the step; an unset one defers
/// to the configured value.
pub fn effective_auto_generate(command_argument: bool, configured: bool) -> bool {
    if command_argument {
        !command_argument
    } else {
        configured
    }
}

/// Merges the settings tree with command line overrides
#[derive(Debug, Clone, Copy)]
pub struct ConfigResolver<'a> {
    settings: &'a Settings,
}

impl<'a> ConfigResolver<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &'a Settings {
        self.settings
    }

    /// Configured `autoGenerate` of a kind; unset or empty is an error
    pub fn configured_auto_generate(&self, profile: Profile, kind: ArtifactKind) -> Result<bool> {
        self.settings
            .profile(profile)
            .artifact(kind)
            .and_then(|section| section.auto_generate.as_ref())
            .and_then(|value| value.as_bool())
            .ok_or_else(|| {
                ScaffoldError::config(format!(
                    "Please specify {}.{}.autoGenerate in your settings",
                    profile.settings_key(),
                    kind.settings_key()
                ))
            })
    }

    /// Resolve every setting of a kind
    pub fn resolve(
        &self,
        profile: Profile,
        kind: ArtifactKind,
        overrides: &CliOverrides,
    ) -> Result<ResolvedSettings> {
        let configured = self.configured_auto_generate(profile, kind)?;
        let section = self.settings.profile(profile).artifact(kind);

        let target_path = pick(
            overrides.target_path.as_deref(),
            section.and_then(|s| s.target_path.as_deref()),
        )
        .unwrap_or_else(|| kind.default_target_path().to_string());

        let template_path = pick(
            overrides.template_path.as_deref(),
            section.and_then(|s| s.template_path.as_deref()),
        );

        let suffix = pick(
            overrides.suffix.as_deref(),
            section.and_then(|s| s.suffix.as_deref()),
        )
        .unwrap_or_else(|| kind.default_suffix().to_string());

        let name_appendix = pick(
            overrides.name_appendix.as_deref(),
            section.and_then(|s| s.name_appendix.as_deref()),
        )
        .unwrap_or_default();

        let resolved = ResolvedSettings {
            kind,
            target_path,
            template_path,
            suffix,
            name_appendix,
            auto_generate: effective_auto_generate(overrides.suppress, configured),
        };
        debug!(%profile, %kind, ?resolved, "resolved artifact settings");
        Ok(resolved)
    }
}

/// First non-empty value
fn pick(cli: Option<&str>, settings: Option<&str>) -> Option<String> {
    cli.filter(|v| !v.is_empty())
        .or_else(|| settings.filter(|v| !v.is_empty()))
        .map(str::to_string)
}
