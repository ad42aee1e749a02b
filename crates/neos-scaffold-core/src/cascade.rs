//! Cascading generation: a root artifact followed by its dependents
//!
//! A node type is followed by Fusion, template, JavaScript, stylesheet and
//! translation files; a component (a Fusion prototype) by the same list minus
//! Fusion. Which dependents run is decided up front from the settings and
//! the `--no-<kind>` flags, so configuration errors surface before the first
//! file is written.

use crate::artifact::{validate_name, ArtifactKind, Profile};
use crate::error::Result;
use crate::generator::{collect_super_types, LanguageSelection, NodeTypeDefinition};
use crate::scaffolder::{ArtifactArgs, Invocation, Scaffolder, TranslationArgs};
use crate::settings::{CliOverrides, ConfigResolver, ResolvedSettings};
use crate::writer::GenerationReport;
use std::fmt;
use tracing::{debug, info};

/// The Fusion prototype is the component itself
const COMPONENT_DEPENDENTS: [ArtifactKind; 4] = [
    ArtifactKind::Template,
    ArtifactKind::Javascript,
    ArtifactKind::Stylesheet,
    ArtifactKind::Translation,
];

/// Artifact a cascade starts from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeRoot {
    NodeType,
    Component,
}

impl CascadeRoot {
    /// Settings subtree used by every step of the cascade
    pub fn profile(&self) -> Profile {
        match self {
            CascadeRoot::NodeType => Profile::NodeType,
            CascadeRoot::Component => Profile::Component,
        }
    }

    /// Dependent kinds in generation order
    pub fn dependents(&self) -> &'static [ArtifactKind] {
        match self {
            CascadeRoot::NodeType => &ArtifactKind::DEPENDENTS,
            CascadeRoot::Component => &COMPONENT_DEPENDENTS,
        }
    }
}

impl fmt::Display for CascadeRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CascadeRoot::NodeType => write!(f, "node type"),
            CascadeRoot::Component => write!(f, "component"),
        }
    }
}

/// `--no-<kind>` flags of a cascade command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Suppressions {
    pub fusion: bool,
    pub template: bool,
    pub javascript: bool,
    pub stylesheet: bool,
    pub translation: bool,
}

impl Suppressions {
    pub fn get(&self, kind: ArtifactKind) -> bool {
        match kind {
            ArtifactKind::NodeType => false,
            ArtifactKind::Fusion => self.fusion,
            ArtifactKind::Template => self.template,
            ArtifactKind::Javascript => self.javascript,
            ArtifactKind::Stylesheet => self.stylesheet,
            ArtifactKind::Translation => self.translation,
        }
    }
}

/// Dependent steps a cascade will run, with their resolved settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadePlan {
    pub root: CascadeRoot,
    pub steps: Vec<ResolvedSettings>,
}

impl CascadePlan {
    /// Decide the dependent steps of a cascade
    ///
    /// Every dependent's `autoGenerate` must be configured, even when a
    /// `--no-<kind>` flag disables it. `root_only` skips the dependents and
    /// their configuration entirely.
    pub fn build(
        config: &ConfigResolver<'_>,
        root: CascadeRoot,
        suppressions: &Suppressions,
        root_only: bool,
    ) -> Result<Self> {
        let mut steps = Vec::new();
        if !root_only {
            for &kind in root.dependents() {
                let overrides = CliOverrides {
                    suppress: suppressions.get(kind),
                    ..Default::default()
                };
                let resolved = config.resolve(root.profile(), kind, &overrides)?;
                if resolved.auto_generate {
                    steps.push(resolved);
                } else {
                    debug!(%root, %kind, "skipping dependent");
                }
            }
        }
        Ok(Self { root, steps })
    }

    pub fn kinds(&self) -> impl Iterator<Item = ArtifactKind> + '_ {
        self.steps.iter().map(|step| step.kind)
    }

    pub fn includes(&self, kind: ArtifactKind) -> bool {
        self.kinds().any(|k| k == kind)
    }
}

/// Arguments of the node type command
#[derive(Debug, Clone, Default)]
pub struct NodeTypeArgs {
    pub name: String,
    pub icon: Option<String>,
    pub package_key: Option<String>,
    pub super_types: Vec<String>,
    pub prefix: Option<String>,
    pub document: bool,
    /// Only write the node type definition
    pub type_only: bool,
    pub suppressions: Suppressions,
    pub force: bool,
}

/// Arguments of the component command
#[derive(Debug, Clone, Default)]
pub struct ComponentArgs {
    pub name: String,
    pub package_key: Option<String>,
    pub extends: Option<String>,
    /// `fusion` is ignored: the prototype is always written
    pub suppressions: Suppressions,
    pub force: bool,
}

/// Values shared by every step of one cascade
struct StepContext<'c> {
    profile: Profile,
    name: &'c str,
    package_key: &'c str,
    sub_folder: bool,
    extends: Option<&'c str>,
    force: bool,
}

impl<'a> Scaffolder<'a> {
    /// Generate a node type definition and its dependent files
    pub fn node_type(&self, args: &NodeTypeArgs) -> Result<GenerationReport> {
        let root = CascadeRoot::NodeType;
        validate_name(&args.name)?;
        let package_key = self.resolve_package_key(args.package_key.as_deref())?;
        let plan = CascadePlan::build(&self.config(), root, &args.suppressions, args.type_only)?;
        self.check_languages(&plan)?;

        let profile = self.settings.profile(root.profile());
        let prefix = args
            .prefix
            .as_deref()
            .filter(|p| !p.is_empty())
            .or_else(|| profile.node_type_prefix(args.document))
            .map(str::to_string);
        let definition = NodeTypeDefinition {
            name: args.name.clone(),
            package_key: package_key.clone(),
            icon: args.icon.clone().unwrap_or_default(),
            super_types: collect_super_types(&args.super_types, profile.default_super_type(args.document)),
            prefix,
        };

        let mut report = GenerationReport::new();
        let invocation = Invocation::top_level(&mut report);
        info!(name = %args.name, package = %package_key, "generating node type");
        self.generator().node_type(&definition, args.force, invocation.report)?;

        let context = StepContext {
            profile: root.profile(),
            name: &args.name,
            package_key: &package_key,
            sub_folder: profile.sub_folder,
            extends: None,
            force: args.force,
        };
        self.run_steps(&plan, &context, invocation.report)?;

        self.output_status(&invocation);
        Ok(report)
    }

    /// Generate a Fusion component and its dependent files
    pub fn component(&self, args: &ComponentArgs) -> Result<GenerationReport> {
        let root = CascadeRoot::Component;
        validate_name(&args.name)?;
        let package_key = self.resolve_package_key(args.package_key.as_deref())?;
        // Validates the root's own section as well
        self.config()
            .configured_auto_generate(root.profile(), ArtifactKind::Fusion)?;
        let plan = CascadePlan::build(&self.config(), root, &args.suppressions, false)?;
        self.check_languages(&plan)?;

        let profile = self.settings.profile(root.profile());
        let context = StepContext {
            profile: root.profile(),
            name: &args.name,
            package_key: &package_key,
            sub_folder: profile.sub_folder,
            extends: args.extends.as_deref(),
            force: args.force,
        };

        let mut report = GenerationReport::new();
        let invocation = Invocation::top_level(&mut report);
        info!(name = %args.name, package = %package_key, "generating component");
        self.run_step(ArtifactKind::Fusion, &context, Invocation::nested(invocation.report))?;
        self.run_steps(&plan, &context, invocation.report)?;

        self.output_status(&invocation);
        Ok(report)
    }

    /// Fail before writing anything when a planned translation has no languages
    fn check_languages(&self, plan: &CascadePlan) -> Result<()> {
        if plan.includes(ArtifactKind::Translation) {
            LanguageSelection::resolve(&self.settings.languages, None, &[])?;
        }
        Ok(())
    }

    fn run_steps(&self, plan: &CascadePlan, context: &StepContext<'_>, report: &mut GenerationReport) -> Result<()> {
        for kind in plan.kinds() {
            self.run_step(kind, context, Invocation::nested(report))?;
        }
        Ok(())
    }

    fn run_step(&self, kind: ArtifactKind, context: &StepContext<'_>, invocation: Invocation<'_>) -> Result<()> {
        debug!(%kind, name = context.name, "cascade step");
        match kind {
            ArtifactKind::Translation => {
                let mut args = TranslationArgs::new(context.profile, context.name);
                args.package_key = Some(context.package_key.to_string());
                args.force = context.force;
                self.run_translation(&args, invocation)
            }
            ArtifactKind::Fusion => {
                let mut args = self.step_args(context);
                args.extends = context.extends.map(str::to_string);
                self.run_fusion(&args, invocation)
            }
            ArtifactKind::NodeType => Ok(()),
            kind => self.run_simple(kind, &self.step_args(context), invocation),
        }
    }

    fn step_args(&self, context: &StepContext<'_>) -> ArtifactArgs {
        let mut args = ArtifactArgs::new(context.profile, context.name);
        args.package_key = Some(context.package_key.to_string());
        args.sub_folder = context.sub_folder;
        args.force = context.force;
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::StaticPackageRegistry;
    use crate::render::HandlebarsRenderer;
    use crate::report::StatusReporter;
    use crate::settings::{Settings, SAMPLE_SETTINGS};
    use crate::translation::XliffParser;
    use crate::writer::FileStatus;
    use std::cell::Cell;
    use std::path::Path;

    /// Counts how often a report is emitted
    #[derive(Default)]
    struct CountingReporter {
        emitted: Cell<usize>,
        lines: Cell<usize>,
    }

    impl StatusReporter for CountingReporter {
        fn report(&self, report: &GenerationReport) {
            self.emitted.set(self.emitted.get() + 1);
            self.lines.set(self.lines.get() + report.len());
        }
    }

    fn sample_settings() -> Settings {
        let mut settings = Settings::from_yaml(SAMPLE_SETTINGS).unwrap();
        settings.package_key = Some("Foo.Bar".to_string());
        settings
    }

    struct Fixture {
        dir: tempfile::TempDir,
        settings: Settings,
        registry: StaticPackageRegistry,
        renderer: HandlebarsRenderer,
        reporter: CountingReporter,
    }

    impl Fixture {
        fn new(settings: Settings) -> Self {
            let dir = tempfile::tempdir().unwrap();
            let registry = StaticPackageRegistry::new().with_package("Foo.Bar", dir.path().join("Foo.Bar"), None);
            Self {
                dir,
                settings,
                registry,
                renderer: HandlebarsRenderer::new().unwrap(),
                reporter: CountingReporter::default(),
            }
        }

        fn scaffolder(&self) -> Scaffolder<'_> {
            Scaffolder::new(
                self.dir.path(),
                &self.settings,
                &self.registry,
                &self.renderer,
                &XliffParser,
                &self.reporter,
            )
        }

        fn exists(&self, relative: &str) -> bool {
            self.dir.path().join("Foo.Bar").join(relative).is_file()
        }

        fn package_dir(&self) -> &Path {
            self.dir.path()
        }
    }

    fn node_type_args(name: &str) -> NodeTypeArgs {
        NodeTypeArgs {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_plan_follows_fixed_order() {
        let settings = sample_settings();
        let plan = CascadePlan::build(
            &ConfigResolver::new(&settings),
            CascadeRoot::NodeType,
            &Suppressions::default(),
            false,
        )
        .unwrap();
        assert_eq!(plan.kinds().collect::<Vec<_>>(), ArtifactKind::DEPENDENTS.to_vec());
    }

    #[test]
    fn test_plan_honours_suppressions() {
        let settings = sample_settings();
        let suppressions = Suppressions {
            template: true,
            translation: true,
            ..Default::default()
        };
        let plan = CascadePlan::build(&ConfigResolver::new(&settings), CascadeRoot::NodeType, &suppressions, false)
            .unwrap();
        assert_eq!(
            plan.kinds().collect::<Vec<_>>(),
            vec![ArtifactKind::Fusion, ArtifactKind::Javascript, ArtifactKind::Stylesheet]
        );
    }

    #[test]
    fn test_plan_skips_disabled_kinds() {
        let mut settings = sample_settings();
        settings.node_type.javascript.as_mut().unwrap().auto_generate =
            Some(crate::settings::AutoGenerate::Bool(false));
        let plan = CascadePlan::build(
            &ConfigResolver::new(&settings),
            CascadeRoot::NodeType,
            &Suppressions::default(),
            false,
        )
        .unwrap();
        assert!(!plan.includes(ArtifactKind::Javascript));
        assert_eq!(plan.steps.len(), 4);
    }

    #[test]
    fn test_plan_requires_configured_auto_generate() {
        let mut settings = sample_settings();
        settings.node_type.styles.as_mut().unwrap().auto_generate = None;
        let suppressions = Suppressions {
            stylesheet: true,
            ..Default::default()
        };
        let err = CascadePlan::build(&ConfigResolver::new(&settings), CascadeRoot::NodeType, &suppressions, false)
            .unwrap_err();
        assert!(err.is_config_error());
        assert!(err.to_string().contains("nodeType.styles.autoGenerate"));
    }

    #[test]
    fn test_plan_root_only_has_no_steps() {
        let plan = CascadePlan::build(
            &ConfigResolver::new(&Settings::default()),
            CascadeRoot::NodeType,
            &Suppressions::default(),
            true,
        )
        .unwrap();
        assert!(plan.steps.is_empty());
    }

    #[test]
    fn test_component_plan_excludes_fusion() {
        let settings = sample_settings();
        let plan = CascadePlan::build(
            &ConfigResolver::new(&settings),
            CascadeRoot::Component,
            &Suppressions::default(),
            false,
        )
        .unwrap();
        assert!(!plan.includes(ArtifactKind::Fusion));
        assert_eq!(plan.steps.len(), 4);
    }

    #[test]
    fn test_node_type_cascade_writes_all_files_and_reports_once() {
        let fixture = Fixture::new(sample_settings());
        let report = fixture.scaffolder().node_type(&node_type_args("Teaser")).unwrap();

        assert_eq!(report.len(), 7);
        assert_eq!(report.count(FileStatus::Created), 7);
        assert_eq!(fixture.reporter.emitted.get(), 1);
        assert_eq!(fixture.reporter.lines.get(), 7);

        assert!(fixture.exists("Configuration/NodeTypes.Content.Teaser.yaml"));
        assert!(fixture.exists("Resources/Private/Fusion/NodeTypes/Teaser.fusion"));
        assert!(fixture.exists("Resources/Private/Templates/NodeTypes/Teaser.html"));
        assert!(fixture.exists("Resources/Public/JavaScript/Teaser.js"));
        assert!(fixture.exists("Resources/Public/Styles/Teaser.css"));
        assert!(fixture.exists("Resources/Private/Translations/en/NodeTypes/Teaser.xlf"));
        assert!(fixture.exists("Resources/Private/Translations/de/NodeTypes/Teaser.xlf"));
    }

    #[test]
    fn test_node_type_report_order() {
        let fixture = Fixture::new(sample_settings());
        let report = fixture.scaffolder().node_type(&node_type_args("Teaser")).unwrap();
        let displays: Vec<&str> = report.records().iter().map(|r| r.display.as_str()).collect();
        assert_eq!(displays[0], "Foo.Bar/Configuration/NodeTypes.Content.Teaser.yaml");
        assert!(displays[1].ends_with("Teaser.fusion"));
        assert!(displays[2].ends_with("Teaser.html"));
        assert!(displays[3].ends_with("Teaser.js"));
        assert!(displays[4].ends_with("Teaser.css"));
        assert!(displays[5].contains("/en/"));
        assert!(displays[6].contains("/de/"));
    }

    #[test]
    fn test_type_only_writes_single_file() {
        let fixture = Fixture::new(sample_settings());
        let mut args = node_type_args("Teaser");
        args.type_only = true;
        let report = fixture.scaffolder().node_type(&args).unwrap();

        assert_eq!(report.len(), 1);
        assert_eq!(fixture.reporter.lines.get(), 1);
        assert!(!fixture.exists("Resources/Private/Fusion/NodeTypes/Teaser.fusion"));
    }

    #[test]
    fn test_document_node_type_prefix_and_super_type() {
        let fixture = Fixture::new(sample_settings());
        let mut args = node_type_args("Page");
        args.type_only = true;
        args.document = true;
        fixture.scaffolder().node_type(&args).unwrap();

        let content = std::fs::read_to_string(
            fixture
                .package_dir()
                .join("Foo.Bar/Configuration/NodeTypes.Document.Page.yaml"),
        )
        .unwrap();
        assert!(content.contains("Neos.Neos:Document"));
    }

    #[test]
    fn test_second_run_omits_existing_files() {
        let fixture = Fixture::new(sample_settings());
        fixture.scaffolder().node_type(&node_type_args("Teaser")).unwrap();
        let report = fixture.scaffolder().node_type(&node_type_args("Teaser")).unwrap();

        assert_eq!(report.count(FileStatus::Omitted), 7);
        assert_eq!(fixture.reporter.emitted.get(), 2);
    }

    #[test]
    fn test_force_propagates_to_dependents() {
        let fixture = Fixture::new(sample_settings());
        fixture.scaffolder().node_type(&node_type_args("Teaser")).unwrap();
        let mut args = node_type_args("Teaser");
        args.force = true;
        let report = fixture.scaffolder().node_type(&args).unwrap();

        assert_eq!(report.count(FileStatus::Created), 7);
    }

    #[test]
    fn test_config_error_aborts_before_writing() {
        let mut settings = sample_settings();
        settings.node_type.translation.as_mut().unwrap().auto_generate = None;
        let fixture = Fixture::new(settings);

        let err = fixture.scaffolder().node_type(&node_type_args("Teaser")).unwrap_err();
        assert!(err.is_config_error());
        assert!(!fixture.exists("Configuration/NodeTypes.Content.Teaser.yaml"));
        assert_eq!(fixture.reporter.emitted.get(), 0);
    }

    #[test]
    fn test_unresolvable_package_aborts_before_writing() {
        let mut settings = sample_settings();
        settings.package_key = None;
        let fixture = Fixture::new(settings);

        let err = fixture.scaffolder().node_type(&node_type_args("Teaser")).unwrap_err();
        assert!(err.is_config_error());
        assert!(!fixture.package_dir().join("Foo.Bar").exists());
    }

    #[test]
    fn test_invalid_name_aborts_before_writing() {
        let fixture = Fixture::new(sample_settings());

        let err = fixture.scaffolder().node_type(&node_type_args("")).unwrap_err();
        assert!(err.is_config_error());

        let args = ComponentArgs {
            name: "Cards/Card".to_string(),
            ..Default::default()
        };
        let err = fixture.scaffolder().component(&args).unwrap_err();
        assert!(err.is_config_error());

        assert!(!fixture.package_dir().join("Foo.Bar").exists());
        assert_eq!(fixture.reporter.emitted.get(), 0);
    }

    #[test]
    fn test_io_failure_stops_cascade_and_keeps_earlier_files() {
        let fixture = Fixture::new(sample_settings());
        let public = fixture.package_dir().join("Foo.Bar/Resources/Public");
        std::fs::create_dir_all(&public).unwrap();
        std::fs::write(public.join("Styles"), "not a directory").unwrap();

        let err = fixture.scaffolder().node_type(&node_type_args("Teaser")).unwrap_err();
        assert!(!err.is_config_error());

        assert!(fixture.exists("Configuration/NodeTypes.Content.Teaser.yaml"));
        assert!(fixture.exists("Resources/Private/Fusion/NodeTypes/Teaser.fusion"));
        assert!(fixture.exists("Resources/Private/Templates/NodeTypes/Teaser.html"));
        assert!(fixture.exists("Resources/Public/JavaScript/Teaser.js"));
        assert!(!fixture.exists("Resources/Private/Translations/en/NodeTypes/Teaser.xlf"));
        assert!(!fixture.exists("Resources/Private/Translations/de/NodeTypes/Teaser.xlf"));
        assert_eq!(fixture.reporter.emitted.get(), 0);
    }

    #[test]
    fn test_component_cascade() {
        let fixture = Fixture::new(sample_settings());
        let args = ComponentArgs {
            name: "Card".to_string(),
            ..Default::default()
        };
        let report = fixture.scaffolder().component(&args).unwrap();

        assert_eq!(report.len(), 6);
        assert_eq!(fixture.reporter.emitted.get(), 1);
        let fusion = std::fs::read_to_string(
            fixture
                .package_dir()
                .join("Foo.Bar/Resources/Private/Fusion/Components/Card/Card.fusion"),
        )
        .unwrap();
        assert!(fusion.contains("prototype(Foo.Bar:Card) < prototype(Neos.Fusion:Component)"));
        assert!(fixture.exists("Resources/Private/Templates/Components/Card/Card.html"));
    }

    #[test]
    fn test_component_suppressed_dependents() {
        let fixture = Fixture::new(sample_settings());
        let args = ComponentArgs {
            name: "Card".to_string(),
            extends: Some("Foo.Bar:Base".to_string()),
            suppressions: Suppressions {
                template: true,
                javascript: true,
                stylesheet: true,
                translation: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let report = fixture.scaffolder().component(&args).unwrap();

        assert_eq!(report.len(), 1);
        let fusion = std::fs::read_to_string(
            fixture
                .package_dir()
                .join("Foo.Bar/Resources/Private/Fusion/Components/Card/Card.fusion"),
        )
        .unwrap();
        assert!(fusion.contains("< prototype(Foo.Bar:Base)"));
    }
}
