//! Neos Scaffold Core
//!
//! Generates the files of Neos CMS node types and Fusion components: the
//! node type definition, its Fusion prototype, view template, JavaScript,
//! stylesheet and XLIFF translations.
//!
//! # Example
//!
//! ```ignore
//! use neos_scaffold_core::{
//!     ConsoleReporter, FlowPackageRegistry, HandlebarsRenderer, NodeTypeArgs, Scaffolder, Settings, XliffParser,
//! };
//!
//! let root = std::path::Path::new(".");
//! let settings = Settings::load(&Settings::locate(root, None))?;
//! let registry = FlowPackageRegistry::discover(root)?;
//! let renderer = HandlebarsRenderer::new()?;
//! let scaffolder = Scaffolder::new(root, &settings, &registry, &renderer, &XliffParser, &ConsoleReporter);
//!
//! scaffolder.node_type(&NodeTypeArgs { name: "Teaser".into(), ..Default::default() })?;
//! ```

pub mod artifact;
pub mod cascade;
pub mod error;
pub mod generator;
pub mod package;
pub mod paths;
pub mod render;
pub mod report;
pub mod scaffolder;
pub mod settings;
pub mod translation;
pub mod writer;

pub use artifact::{ArtifactKind, GenerationRequest, Profile};
pub use cascade::{CascadePlan, CascadeRoot, ComponentArgs, NodeTypeArgs, Suppressions};
pub use error::{Result, ScaffoldError};
pub use package::{FlowPackageRegistry, PackageKeyResolver, PackageRegistry, StaticPackageRegistry};
pub use render::{HandlebarsRenderer, TemplateRenderer};
pub use report::{status_line, ConsoleReporter, StatusReporter};
pub use scaffolder::{ArtifactArgs, Scaffolder, TranslationArgs};
pub use settings::{ConfigResolver, Settings};
pub use translation::{TranslationParser, XliffParser};
pub use writer::{FileRecord, FileStatus, FileWriter, GenerationReport};
