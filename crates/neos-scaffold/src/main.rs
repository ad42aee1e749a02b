//! neos-scaffold - Generate Neos node types, components and their files

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use neos_scaffold_core::settings::SETTINGS_ENV;
use neos_scaffold_core::{
    ArtifactArgs, ComponentArgs, ConsoleReporter, FlowPackageRegistry, HandlebarsRenderer, NodeTypeArgs, Profile,
    Scaffolder, Settings, Suppressions, TranslationArgs, XliffParser,
};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "neos-scaffold")]
#[command(about = "CLI for scaffolding Neos node types and components")]
#[command(version)]
pub struct Args {
    /// Root of the Neos distribution
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Settings file (defaults to <root>/neos-scaffold.yaml)
    #[arg(long, global = true, env = SETTINGS_ENV)]
    pub settings: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a node type with its Fusion, template, JavaScript, stylesheet and translations
    NodeType(NodeTypeCommand),
    /// Create a Fusion component with its template, JavaScript, stylesheet and translations
    Component(ComponentCommand),
    /// Create a Fusion prototype
    Fusion(FusionCommand),
    /// Create a view template
    Template(ArtifactCommand),
    /// Create a JavaScript file
    Javascript(ArtifactCommand),
    /// Create a stylesheet
    Stylesheet(ArtifactCommand),
    /// Create source and target language translation files
    Translation(TranslationCommand),
    /// Write a sample settings file
    InitSettings {
        /// Overwrite an existing settings file
        #[arg(short, long)]
        force: bool,
    },
}

/// `--no-<kind>` flags shared by the cascade commands
#[derive(Parser, Debug, Default)]
pub struct DependentFlags {
    /// Skip the view template
    #[arg(long = "no-template")]
    pub no_template: bool,

    /// Skip the JavaScript file
    #[arg(long = "no-js")]
    pub no_js: bool,

    /// Skip the stylesheet
    #[arg(long = "no-styles")]
    pub no_styles: bool,

    /// Skip the translation files
    #[arg(long = "no-translation")]
    pub no_translation: bool,
}

#[derive(Parser, Debug)]
pub struct NodeTypeCommand {
    /// Node type name, e.g. Teaser
    pub name: String,

    /// Icon shown in the Neos UI
    #[arg(long)]
    pub icon: Option<String>,

    /// Destination package key
    #[arg(short, long)]
    pub package: Option<String>,

    /// Additional super types (comma-separated)
    #[arg(long = "super-types", value_delimiter = ',')]
    pub super_types: Vec<String>,

    /// File name prefix, e.g. Content
    #[arg(long)]
    pub prefix: Option<String>,

    /// Skip the Fusion prototype
    #[arg(long = "no-fusion")]
    pub no_fusion: bool,

    #[command(flatten)]
    pub dependents: DependentFlags,

    /// Only write the node type definition
    #[arg(long = "type-only")]
    pub type_only: bool,

    /// Create a document node type instead of a content node type
    #[arg(long)]
    pub document: bool,

    /// Overwrite existing files
    #[arg(short, long)]
    pub force: bool,
}

impl From<NodeTypeCommand> for NodeTypeArgs {
    fn from(cmd: NodeTypeCommand) -> Self {
        NodeTypeArgs {
            name: cmd.name,
            icon: cmd.icon,
            package_key: cmd.package,
            super_types: cmd.super_types,
            prefix: cmd.prefix,
            document: cmd.document,
            type_only: cmd.type_only,
            suppressions: cmd.dependents.suppressions(cmd.no_fusion),
            force: cmd.force,
        }
    }
}

impl DependentFlags {
    fn suppressions(&self, no_fusion: bool) -> Suppressions {
        Suppressions {
            fusion: no_fusion,
            template: self.no_template,
            javascript: self.no_js,
            stylesheet: self.no_styles,
            translation: self.no_translation,
        }
    }
}

#[derive(Parser, Debug)]
pub struct ComponentCommand {
    /// Component name, e.g. Card
    pub name: String,

    /// Destination package key
    #[arg(short, long)]
    pub package: Option<String>,

    /// Prototype to extend (defaults to component.fusion.defaultPrototype)
    #[arg(long)]
    pub extends: Option<String>,

    #[command(flatten)]
    pub dependents: DependentFlags,

    /// Overwrite existing files
    #[arg(short, long)]
    pub force: bool,
}

impl From<ComponentCommand> for ComponentArgs {
    fn from(cmd: ComponentCommand) -> Self {
        ComponentArgs {
            name: cmd.name,
            package_key: cmd.package,
            extends: cmd.extends,
            suppressions: cmd.dependents.suppressions(false),
            force: cmd.force,
        }
    }
}

#[derive(Parser, Debug)]
pub struct ArtifactCommand {
    /// Settings profile: nodeType or component
    #[arg(value_parser = parse_profile)]
    pub profile: Profile,

    /// Artifact name
    pub name: String,

    /// Destination package key
    #[arg(short, long)]
    pub package: Option<String>,

    /// Put the file in a folder named after the artifact
    #[arg(long)]
    pub subfolder: bool,

    /// File suffix, e.g. .html
    #[arg(long)]
    pub suffix: Option<String>,

    /// Overwrite an existing file
    #[arg(short, long)]
    pub force: bool,
}

impl From<ArtifactCommand> for ArtifactArgs {
    fn from(cmd: ArtifactCommand) -> Self {
        let mut args = ArtifactArgs::new(cmd.profile, cmd.name);
        args.package_key = cmd.package;
        args.sub_folder = cmd.subfolder;
        args.suffix = cmd.suffix;
        args.force = cmd.force;
        args
    }
}

#[derive(Parser, Debug)]
pub struct FusionCommand {
    #[command(flatten)]
    pub artifact: ArtifactCommand,

    /// Prototype to extend
    #[arg(long)]
    pub extends: Option<String>,

    /// Appended to the file name, e.g. .Component
    #[arg(long = "name-appendix")]
    pub name_appendix: Option<String>,
}

impl From<FusionCommand> for ArtifactArgs {
    fn from(cmd: FusionCommand) -> Self {
        let mut args = ArtifactArgs::from(cmd.artifact);
        args.extends = cmd.extends;
        args.name_appendix = cmd.name_appendix;
        args
    }
}

#[derive(Parser, Debug)]
pub struct TranslationCommand {
    /// Settings profile: nodeType or component
    #[arg(value_parser = parse_profile)]
    pub profile: Profile,

    /// Artifact name
    pub name: String,

    /// Destination package key
    #[arg(short, long)]
    pub package: Option<String>,

    /// Source language (defaults to the first configured language)
    #[arg(long = "source-language")]
    pub source_language: Option<String>,

    /// Target languages, comma-separated (defaults to the other configured languages)
    #[arg(long = "target-languages", value_delimiter = ',')]
    pub target_languages: Vec<String>,

    /// Folder below each language folder
    #[arg(long = "target-path")]
    pub target_path: Option<String>,

    /// File suffix, e.g. .xlf
    #[arg(long)]
    pub suffix: Option<String>,

    /// Overwrite existing files
    #[arg(short, long)]
    pub force: bool,
}

impl From<TranslationCommand> for TranslationArgs {
    fn from(cmd: TranslationCommand) -> Self {
        let mut args = TranslationArgs::new(cmd.profile, cmd.name);
        args.package_key = cmd.package;
        args.source_language = cmd.source_language;
        args.target_languages = cmd.target_languages;
        args.target_path = cmd.target_path;
        args.suffix = cmd.suffix;
        args.force = cmd.force;
        args
    }
}

fn parse_profile(s: &str) -> std::result::Result<Profile, String> {
    Profile::parse(s).ok_or_else(|| format!("unknown profile '{}', expected nodeType or component", s))
}

/// Log to stderr; stdout carries the status report
fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Load settings for `command`; `init-settings` never reads the existing file
fn load_settings(command: &Command, path: &Path) -> Result<Settings> {
    if matches!(command, Command::InitSettings { .. }) {
        return Ok(Settings::default());
    }
    let settings =
        Settings::load(path).with_context(|| format!("Failed to load settings from {}", path.display()))?;
    debug!(path = %path.display(), "settings loaded");
    Ok(settings)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let root = args.root;
    let settings_path = Settings::locate(&root, args.settings.as_deref());
    let settings = load_settings(&args.command, &settings_path)?;
    let registry = FlowPackageRegistry::discover(&root)
        .with_context(|| format!("Failed to discover packages in {}", root.display()))?;
    let renderer = HandlebarsRenderer::new()?;

    let scaffolder = Scaffolder::new(&root, &settings, &registry, &renderer, &XliffParser, &ConsoleReporter);

    match args.command {
        Command::NodeType(cmd) => scaffolder.node_type(&cmd.into())?,
        Command::Component(cmd) => scaffolder.component(&cmd.into())?,
        Command::Fusion(cmd) => scaffolder.fusion(&cmd.into())?,
        Command::Template(cmd) => scaffolder.template(&cmd.into())?,
        Command::Javascript(cmd) => scaffolder.javascript(&cmd.into())?,
        Command::Stylesheet(cmd) => scaffolder.stylesheet(&cmd.into())?,
        Command::Translation(cmd) => scaffolder.translation(&cmd.into())?,
        Command::InitSettings { force } => scaffolder.init_settings(&settings_path, force)?,
    };

    Ok(())
}
