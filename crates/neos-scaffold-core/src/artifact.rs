//! Artifact kinds, settings profiles and generation requests

use crate::error::{Result, ScaffoldError};
use std::fmt;

/// The kinds of files the scaffolder can emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// `NodeTypes.*.yaml` type definition
    NodeType,
    /// Fusion prototype binding the node type to its template
    Fusion,
    /// HTML view template
    Template,
    /// JavaScript file
    Javascript,
    /// Stylesheet
    Stylesheet,
    /// XLIFF source and target language files
    Translation,
}

impl ArtifactKind {
    /// Dependent kinds generated by a cascade, in generation order
    pub const DEPENDENTS: [ArtifactKind; 5] = [
        ArtifactKind::Fusion,
        ArtifactKind::Template,
        ArtifactKind::Javascript,
        ArtifactKind::Stylesheet,
        ArtifactKind::Translation,
    ];

    /// Key of this kind's section inside a settings profile
    pub fn settings_key(&self) -> &'static str {
        match self {
            ArtifactKind::NodeType => "nodeType",
            ArtifactKind::Fusion => "fusion",
            ArtifactKind::Template => "template",
            ArtifactKind::Javascript => "javascript",
            ArtifactKind::Stylesheet => "styles",
            ArtifactKind::Translation => "translation",
        }
    }

    /// Suffix used when neither the command line nor the settings provide one
    pub fn default_suffix(&self) -> &'static str {
        match self {
            ArtifactKind::NodeType => ".yaml",
            ArtifactKind::Fusion => ".fusion",
            ArtifactKind::Template => ".html",
            ArtifactKind::Javascript => ".js",
            ArtifactKind::Stylesheet => ".css",
            ArtifactKind::Translation => ".xlf",
        }
    }

    /// Target path used when neither the command line nor the settings provide one
    pub fn default_target_path(&self) -> &'static str {
        match self {
            ArtifactKind::Template => "Templates",
            ArtifactKind::Javascript => "Public/JavaScript",
            ArtifactKind::Stylesheet => "Public/Styles",
            ArtifactKind::NodeType | ArtifactKind::Fusion | ArtifactKind::Translation => "",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.settings_key())
    }
}

/// Which settings subtree a generation reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Profile {
    NodeType,
    Component,
}

impl Profile {
    pub fn settings_key(&self) -> &'static str {
        match self {
            Profile::NodeType => "nodeType",
            Profile::Component => "component",
        }
    }

    /// Parse a profile name as given on the command line
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "nodetype" | "node-type" | "node_type" => Some(Profile::NodeType),
            "component" => Some(Profile::Component),
            _ => None,
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.settings_key())
    }
}

/// Check an artifact name before it becomes a file or folder name
pub fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(ScaffoldError::config("Please specify a non-empty name"));
    }
    if name.contains(|c: char| c == '/' || c == '\\') || name == "." || name == ".." {
        return Err(ScaffoldError::config(format!(
            "Invalid name '{}': path separators are not allowed",
            name
        )));
    }
    Ok(())
}

/// A single artifact to generate, fully resolved
///
/// Built once per command or cascade step and consumed by the generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub kind: ArtifactKind,
    pub name: String,
    pub package_key: String,
    /// Place the file inside a folder named after the artifact
    pub sub_folder: bool,
    pub force: bool,
}

impl GenerationRequest {
    pub fn new(kind: ArtifactKind, name: impl Into<String>, package_key: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            package_key: package_key.into(),
            sub_folder: false,
            force: false,
        }
    }

    pub fn with_sub_folder(mut self, sub_folder: bool) -> Self {
        self.sub_folder = sub_folder;
        self
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}
