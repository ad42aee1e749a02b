//! Command layer: single-artifact commands sharing one set of collaborators
//!
//! Every command returns the records of the files it attempted. Top-level
//! invocations hand their report to the [`StatusReporter`]; steps run by a
//! cascade are invoked with `suppress_report` set and report nothing.

use crate::artifact::{validate_name, ArtifactKind, GenerationRequest, Profile};
use crate::error::Result;
use crate::generator::{ArtifactGenerator, LanguageSelection};
use crate::package::{PackageKeyResolver, PackageRegistry};
use crate::render::TemplateRenderer;
use crate::report::StatusReporter;
use crate::settings::{CliOverrides, ConfigResolver, Settings, SAMPLE_SETTINGS};
use crate::translation::TranslationParser;
use crate::writer::{FileWriter, GenerationReport};
use std::path::Path;

/// Arguments of the fusion, template, javascript and stylesheet commands
#[derive(Debug, Clone)]
pub struct ArtifactArgs {
    pub profile: Profile,
    pub name: String,
    pub package_key: Option<String>,
    pub sub_folder: bool,
    /// Prototype to extend (fusion only)
    pub extends: Option<String>,
    /// Appended to the file name (fusion only)
    pub name_appendix: Option<String>,
    pub suffix: Option<String>,
    pub force: bool,
}

impl ArtifactArgs {
    pub fn new(profile: Profile, name: impl Into<String>) -> Self {
        Self {
            profile,
            name: name.into(),
            package_key: None,
            sub_folder: false,
            extends: None,
            name_appendix: None,
            suffix: None,
            force: false,
        }
    }
}

/// Arguments of the translation command
#[derive(Debug, Clone)]
pub struct TranslationArgs {
    pub profile: Profile,
    pub name: String,
    pub package_key: Option<String>,
    pub source_language: Option<String>,
    pub target_languages: Vec<String>,
    pub target_path: Option<String>,
    pub suffix: Option<String>,
    pub force: bool,
}

impl TranslationArgs {
    pub fn new(profile: Profile, name: impl Into<String>) -> Self {
        Self {
            profile,
            name: name.into(),
            package_key: None,
            source_language: None,
            target_languages: Vec::new(),
            target_path: None,
            suffix: None,
            force: false,
        }
    }
}

/// Report being filled by a command and whether the command prints it
pub(crate) struct Invocation<'r> {
    pub report: &'r mut GenerationReport,
    pub suppress_report: bool,
}

impl<'r> Invocation<'r> {
    pub fn top_level(report: &'r mut GenerationReport) -> Self {
        Self {
            report,
            suppress_report: false,
        }
    }

    pub fn nested(report: &'r mut GenerationReport) -> Self {
        Self {
            report,
            suppress_report: true,
        }
    }
}

/// Entry point for all generation commands
pub struct Scaffolder<'a> {
    pub(crate) root: &'a Path,
    pub(crate) settings: &'a Settings,
    pub(crate) registry: &'a dyn PackageRegistry,
    pub(crate) renderer: &'a dyn TemplateRenderer,
    pub(crate) parser: &'a dyn TranslationParser,
    pub(crate) reporter: &'a dyn StatusReporter,
}

impl<'a> Scaffolder<'a> {
    pub fn new(
        root: &'a Path,
        settings: &'a Settings,
        registry: &'a dyn PackageRegistry,
        renderer: &'a dyn TemplateRenderer,
        parser: &'a dyn TranslationParser,
        reporter: &'a dyn StatusReporter,
    ) -> Self {
        Self {
            root,
            settings,
            registry,
            renderer,
            parser,
            reporter,
        }
    }

    pub(crate) fn config(&self) -> ConfigResolver<'a> {
        ConfigResolver::new(self.settings)
    }

    pub(crate) fn generator(
        &self,
    ) -> ArtifactGenerator<'a, dyn PackageRegistry + 'a, dyn TemplateRenderer + 'a, dyn TranslationParser + 'a> {
        ArtifactGenerator::new(self.registry, self.renderer, self.parser, self.root)
    }

    /// Destination package: command line, then settings, then site package
    pub fn resolve_package_key(&self, cli_key: Option<&str>) -> Result<String> {
        PackageKeyResolver::new(self.registry).resolve(self.settings.package_key.as_deref(), cli_key)
    }

    /// Hand the report to the reporter unless the invocation is nested
    pub(crate) fn output_status(&self, invocation: &Invocation<'_>) {
        if !invocation.suppress_report {
            self.reporter.report(invocation.report);
        }
    }

    /// Generate a single Fusion prototype
    pub fn fusion(&self, args: &ArtifactArgs) -> Result<GenerationReport> {
        let mut report = GenerationReport::new();
        self.run_fusion(args, Invocation::top_level(&mut report))?;
        Ok(report)
    }

    /// Generate a single view template
    pub fn template(&self, args: &ArtifactArgs) -> Result<GenerationReport> {
        let mut report = GenerationReport::new();
        self.run_simple(ArtifactKind::Template, args, Invocation::top_level(&mut report))?;
        Ok(report)
    }

    /// Generate a single JavaScript file
    pub fn javascript(&self, args: &ArtifactArgs) -> Result<GenerationReport> {
        let mut report = GenerationReport::new();
        self.run_simple(ArtifactKind::Javascript, args, Invocation::top_level(&mut report))?;
        Ok(report)
    }

    /// Generate a single stylesheet
    pub fn stylesheet(&self, args: &ArtifactArgs) -> Result<GenerationReport> {
        let mut report = GenerationReport::new();
        self.run_simple(ArtifactKind::Stylesheet, args, Invocation::top_level(&mut report))?;
        Ok(report)
    }

    /// Generate source and target translation files
    pub fn translation(&self, args: &TranslationArgs) -> Result<GenerationReport> {
        let mut report = GenerationReport::new();
        self.run_translation(args, Invocation::top_level(&mut report))?;
        Ok(report)
    }

    /// Write the sample settings file to `path`, as returned by [`Settings::locate`]
    pub fn init_settings(&self, path: &Path, force: bool) -> Result<GenerationReport> {
        let mut report = GenerationReport::new();
        let invocation = Invocation::top_level(&mut report);
        FileWriter::new(self.registry, self.root).write_file(path, SAMPLE_SETTINGS, force, invocation.report)?;
        self.output_status(&invocation);
        Ok(report)
    }

    pub(crate) fn run_fusion(&self, args: &ArtifactArgs, invocation: Invocation<'_>) -> Result<()> {
        validate_name(&args.name)?;
        let package_key = self.resolve_package_key(args.package_key.as_deref())?;
        let overrides = CliOverrides {
            suffix: args.suffix.clone(),
            name_appendix: args.name_appendix.clone(),
            ..Default::default()
        };
        let settings = self
            .config()
            .resolve(args.profile, ArtifactKind::Fusion, &overrides)?;

        let default_prototype = self
            .settings
            .profile(args.profile)
            .fusion
            .as_ref()
            .and_then(|f| f.default_prototype.as_deref());
        let extends = args
            .extends
            .as_deref()
            .filter(|e| !e.is_empty())
            .or(default_prototype)
            .unwrap_or_default();

        let request = GenerationRequest::new(ArtifactKind::Fusion, &args.name, package_key)
            .with_sub_folder(args.sub_folder)
            .with_force(args.force);
        self.generator()
            .fusion(&request, &settings, extends, invocation.report)?;

        self.output_status(&invocation);
        Ok(())
    }

    /// Template, javascript and stylesheet share their argument handling
    pub(crate) fn run_simple(
        &self,
        kind: ArtifactKind,
        args: &ArtifactArgs,
        invocation: Invocation<'_>,
    ) -> Result<()> {
        validate_name(&args.name)?;
        let package_key = self.resolve_package_key(args.package_key.as_deref())?;
        let overrides = CliOverrides {
            suffix: args.suffix.clone(),
            ..Default::default()
        };
        let settings = self.config().resolve(args.profile, kind, &overrides)?;

        let request = GenerationRequest::new(kind, &args.name, package_key)
            .with_sub_folder(args.sub_folder)
            .with_force(args.force);
        let generator = self.generator();
        match kind {
            ArtifactKind::Template => generator.template(&request, &settings, invocation.report)?,
            ArtifactKind::Javascript => generator.javascript(&request, &settings, invocation.report)?,
            ArtifactKind::Stylesheet => generator.stylesheet(&request, &settings, invocation.report)?,
            other => unreachable!("{other} is not a simple artifact"),
        };

        self.output_status(&invocation);
        Ok(())
    }

    pub(crate) fn run_translation(&self, args: &TranslationArgs, invocation: Invocation<'_>) -> Result<()> {
        validate_name(&args.name)?;
        let package_key = self.resolve_package_key(args.package_key.as_deref())?;
        let overrides = CliOverrides {
            target_path: args.target_path.clone(),
            suffix: args.suffix.clone(),
            ..Default::default()
        };
        let settings = self
            .config()
            .resolve(args.profile, ArtifactKind::Translation, &overrides)?;
        let languages = LanguageSelection::resolve(
            &self.settings.languages,
            args.source_language.as_deref(),
            &args.target_languages,
        )?;

        let request = GenerationRequest::new(ArtifactKind::Translation, &args.name, package_key)
            .with_force(args.force);
        self.generator()
            .translation(&request, &settings, &languages, invocation.report)?;

        self.output_status(&invocation);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::StaticPackageRegistry;
    use crate::render::HandlebarsRenderer;
    use crate::translation::XliffParser;
    use crate::writer::FileStatus;
    use std::cell::Cell;
    use std::fs;

    #[derive(Default)]
    struct CountingReporter {
        emitted: Cell<usize>,
    }

    impl StatusReporter for CountingReporter {
        fn report(&self, _report: &GenerationReport) {
            self.emitted.set(self.emitted.get() + 1);
        }
    }

    struct Fixture {
        dir: tempfile::TempDir,
        settings: Settings,
        registry: StaticPackageRegistry,
        renderer: HandlebarsRenderer,
        reporter: CountingReporter,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let registry = StaticPackageRegistry::new()
                .with_package("Foo.Bar", dir.path().join("Foo.Bar"), None)
                .with_package("Foo.Site", dir.path().join("Foo.Site"), Some("neos-site"));
            Self {
                dir,
                settings: Settings::from_yaml(SAMPLE_SETTINGS).unwrap(),
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

        fn read(&self, relative: &str) -> String {
            fs::read_to_string(self.dir.path().join(relative)).unwrap()
        }
    }

    #[test]
    fn test_package_key_falls_back_to_site() {
        let fixture = Fixture::new();
        let scaffolder = fixture.scaffolder();
        assert_eq!(scaffolder.resolve_package_key(None).unwrap(), "Foo.Site");
        assert_eq!(scaffolder.resolve_package_key(Some("Foo.Bar")).unwrap(), "Foo.Bar");
    }

    #[test]
    fn test_fusion_uses_profile_default_prototype() {
        let fixture = Fixture::new();
        let args = ArtifactArgs::new(Profile::Component, "Card");
        let report = fixture.scaffolder().fusion(&args).unwrap();

        assert_eq!(report.len(), 1);
        assert_eq!(fixture.reporter.emitted.get(), 1);
        let content = fixture.read("Foo.Site/Resources/Private/Fusion/Components/Card.fusion");
        assert!(content.contains("prototype(Foo.Site:Card) < prototype(Neos.Fusion:Component)"));
    }

    #[test]
    fn test_fusion_command_line_overrides() {
        let fixture = Fixture::new();
        let mut args = ArtifactArgs::new(Profile::NodeType, "Teaser");
        args.package_key = Some("Foo.Bar".to_string());
        args.extends = Some("Foo.Bar:Base".to_string());
        args.name_appendix = Some(".Renderer".to_string());
        args.suffix = Some(".ts2".to_string());
        args.sub_folder = true;
        fixture.scaffolder().fusion(&args).unwrap();

        let content = fixture.read("Foo.Bar/Resources/Private/Fusion/NodeTypes/Teaser/Teaser.Renderer.ts2");
        assert!(content.contains("< prototype(Foo.Bar:Base)"));
    }

    #[test]
    fn test_single_commands_report_each_time() {
        let fixture = Fixture::new();
        let scaffolder = fixture.scaffolder();
        let args = ArtifactArgs::new(Profile::NodeType, "Teaser");

        scaffolder.template(&args).unwrap();
        scaffolder.javascript(&args).unwrap();
        scaffolder.stylesheet(&args).unwrap();

        assert_eq!(fixture.reporter.emitted.get(), 3);
        assert!(fixture.dir.path().join("Foo.Site/Resources/Public/Styles/Teaser.css").is_file());
    }

    #[test]
    fn test_single_command_validates_auto_generate() {
        let mut fixture = Fixture::new();
        fixture.settings.node_type.template.as_mut().unwrap().auto_generate = None;

        let err = fixture
            .scaffolder()
            .template(&ArtifactArgs::new(Profile::NodeType, "Teaser"))
            .unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_translation_explicit_languages() {
        let fixture = Fixture::new();
        let mut args = TranslationArgs::new(Profile::NodeType, "Teaser");
        args.source_language = Some("de".to_string());
        args.target_languages = vec!["fr".to_string(), "it".to_string()];
        args.target_path = Some("Custom".to_string());
        let report = fixture.scaffolder().translation(&args).unwrap();

        assert_eq!(report.count(FileStatus::Created), 3);
        for language in ["de", "fr", "it"] {
            let path = format!("Foo.Site/Resources/Private/Translations/{}/Custom/Teaser.xlf", language);
            assert!(fixture.dir.path().join(path).is_file());
        }
    }

    #[test]
    fn test_empty_name_is_rejected_before_writing() {
        let fixture = Fixture::new();
        let err = fixture
            .scaffolder()
            .fusion(&ArtifactArgs::new(Profile::NodeType, ""))
            .unwrap_err();

        assert!(err.is_config_error());
        assert!(!fixture.dir.path().join("Foo.Site").exists());
        assert_eq!(fixture.reporter.emitted.get(), 0);
    }

    #[test]
    fn test_name_with_separators_cannot_leave_package() {
        let fixture = Fixture::new();
        let scaffolder = fixture.scaffolder();

        let err = scaffolder
            .javascript(&ArtifactArgs::new(Profile::NodeType, "../../../../Escaped"))
            .unwrap_err();
        assert!(err.is_config_error());

        let err = scaffolder
            .translation(&TranslationArgs::new(Profile::NodeType, "Sub/Teaser"))
            .unwrap_err();
        assert!(err.is_config_error());

        assert!(!fixture.dir.path().join("Escaped.js").exists());
        assert!(!fixture.dir.path().join("Foo.Site").exists());
    }

    #[test]
    fn test_init_settings_writes_sample_once() {
        let fixture = Fixture::new();
        let path = fixture.dir.path().join("neos-scaffold.yaml");

        let first = fixture.scaffolder().init_settings(&path, false).unwrap();
        let second = fixture.scaffolder().init_settings(&path, false).unwrap();

        assert_eq!(first.records()[0].status, FileStatus::Created);
        assert_eq!(second.records()[0].status, FileStatus::Omitted);
        assert_eq!(fixture.read("neos-scaffold.yaml"), SAMPLE_SETTINGS);
    }
}
