//! Settings file types and loading
//!
//! The settings file is YAML with camelCase keys:
//! - `packageKey` / `languages` at the top level
//! - one profile per root kind (`nodeType`, `component`)
//! - inside each profile, one section per artifact kind

pub mod resolver;

use crate::artifact::{ArtifactKind, Profile};
use crate::error::{Result, ScaffoldError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub use resolver::{effective_auto_generate, CliOverrides, ConfigResolver, ResolvedSettings};

/// Environment variable overriding the settings file location
pub const SETTINGS_ENV: &str = "NEOS_SCAFFOLD_SETTINGS";

/// Settings file name looked up in the project root
pub const SETTINGS_FILE_NAME: &str = "neos-scaffold.yaml";

/// Sample settings written by `init-settings`
pub const SAMPLE_SETTINGS: &str = include_str!("../../resources/Settings.yaml");

/// Top-level settings tree
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Default destination package
    #[serde(default)]
    pub package_key: Option<String>,

    /// Configured languages, the first one being the source language
    #[serde(default)]
    pub languages: Vec<String>,

    #[serde(default)]
    pub node_type: ProfileSettings,

    #[serde(default)]
    pub component: ProfileSettings,
}

impl Settings {
    /// Settings subtree for a profile
    pub fn profile(&self, profile: Profile) -> &ProfileSettings {
        match profile {
            Profile::NodeType => &self.node_type,
            Profile::Component => &self.component,
        }
    }

    /// Parse settings from YAML text; an empty document yields defaults
    pub fn from_yaml(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Load settings from a file; a missing file yields empty settings
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "settings file not found, using empty settings");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ScaffoldError::Settings {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Self::from_yaml(&content).map_err(|e| ScaffoldError::Settings {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Settings file location: explicit path, else `<root>/neos-scaffold.yaml`
    ///
    /// The binary fills `explicit` from `--settings` or [`SETTINGS_ENV`].
    pub fn locate(root: &Path, explicit: Option<&Path>) -> PathBuf {
        match explicit {
            Some(path) => path.to_path_buf(),
            None => root.join(SETTINGS_FILE_NAME),
        }
    }
}

/// Per-profile settings (`nodeType` or `component`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSettings {
    /// Super type added to every content node type
    #[serde(default)]
    pub default_content_node_type: Option<String>,

    /// Super type added to every document node type
    #[serde(default)]
    pub default_document_node_type: Option<String>,

    #[serde(default)]
    pub node_type_name_prefix: Option<NodeTypeNamePrefix>,

    /// Give each generated artifact its own folder
    #[serde(default)]
    pub sub_folder: bool,

    #[serde(default)]
    pub fusion: Option<ArtifactSettings>,

    #[serde(default)]
    pub template: Option<ArtifactSettings>,

    #[serde(default)]
    pub javascript: Option<ArtifactSettings>,

    #[serde(default)]
    pub styles: Option<ArtifactSettings>,

    #[serde(default)]
    pub translation: Option<ArtifactSettings>,
}

impl ProfileSettings {
    /// Section of an artifact kind; the node type itself has none
    pub fn artifact(&self, kind: ArtifactKind) -> Option<&ArtifactSettings> {
        match kind {
            ArtifactKind::NodeType => None,
            ArtifactKind::Fusion => self.fusion.as_ref(),
            ArtifactKind::Template => self.template.as_ref(),
            ArtifactKind::Javascript => self.javascript.as_ref(),
            ArtifactKind::Stylesheet => self.styles.as_ref(),
            ArtifactKind::Translation => self.translation.as_ref(),
        }
    }

    /// File name prefix for node type files, if prefixes are enabled
    pub fn node_type_prefix(&self, document: bool) -> Option<&str> {
        match &self.node_type_name_prefix {
            Some(NodeTypeNamePrefix::Prefixes {
                content_node_types,
                document_node_types,
            }) => {
                let prefix = if document {
                    document_node_types.as_deref()
                } else {
                    content_node_types.as_deref()
                };
                prefix.filter(|p| !p.is_empty())
            }
            Some(NodeTypeNamePrefix::Enabled(_)) | None => None,
        }
    }

    /// Default super type for content or document node types
    pub fn default_super_type(&self, document: bool) -> Option<&str> {
        let super_type = if document {
            self.default_document_node_type.as_deref()
        } else {
            self.default_content_node_type.as_deref()
        };
        super_type.filter(|s| !s.is_empty())
    }
}

/// `nodeTypeNamePrefix` is either `false` or a map of prefixes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeTypeNamePrefix {
    Enabled(bool),
    #[serde(rename_all = "camelCase")]
    Prefixes {
        #[serde(default)]
        content_node_types: Option<String>,
        #[serde(default)]
        document_node_types: Option<String>,
    },
}

/// Settings of one artifact kind inside a profile
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactSettings {
    /// Whether cascades generate this kind; must be set explicitly
    #[serde(default)]
    pub auto_generate: Option<AutoGenerate>,

    #[serde(default)]
    pub target_path: Option<String>,

    /// Directory holding `<Template>.tmpl` overrides
    #[serde(default)]
    pub template_path: Option<String>,

    #[serde(default)]
    pub suffix: Option<String>,

    #[serde(default)]
    pub name_appendix: Option<String>,

    /// Prototype a generated Fusion prototype extends
    #[serde(default)]
    pub default_prototype: Option<String>,
}

/// Raw `autoGenerate` value as written in the settings file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AutoGenerate {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl AutoGenerate {
    /// Interpret the value; `None` when it is empty and therefore unset
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AutoGenerate::Bool(b) => Some(*b),
            AutoGenerate::Int(i) => Some(*i != 0),
            AutoGenerate::Text(s) => {
                let s = s.trim();
                if s.is_empty() {
                    None
                } else {
                    Some(!matches!(s.to_lowercase().as_str(), "0" | "false" | "no" | "off"))
                }
            }
        }
    }
}
