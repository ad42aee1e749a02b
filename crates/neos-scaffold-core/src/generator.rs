//! Artifact generators
//!
//! Each generator composes the target path, renders its template and hands
//! the result to the [`FileWriter`].

use crate::artifact::GenerationRequest;
use crate::error::{Result, ScaffoldError};
use crate::package::{resolve_path, PackageRegistry};
use crate::paths::{compose, concatenate, resource_root};
use crate::render::{names, TemplateRef, TemplateRenderer, OVERRIDE_EXTENSION};
use crate::settings::ResolvedSettings;
use crate::translation::TranslationParser;
use crate::writer::{FileRecord, FileWriter, GenerationReport};
use convert_case::{Case, Casing};
use serde_json::json;
use serde_yaml::{Mapping, Value as YamlValue};
use std::path::Path;
use tracing::debug;

/// Node type definition to write
#[derive(Debug, Clone, Default)]
pub struct NodeTypeDefinition {
    pub name: String,
    pub package_key: String,
    pub icon: String,
    /// Super types in declaration order, without duplicates
    pub super_types: Vec<String>,
    /// File name prefix, e.g. `Content` for `NodeTypes.Content.Teaser.yaml`
    pub prefix: Option<String>,
}

impl NodeTypeDefinition {
    /// File name of the definition
    pub fn file_name(&self) -> String {
        match self.prefix.as_deref().filter(|p| !p.is_empty()) {
            Some(prefix) => format!("NodeTypes.{}.{}.yaml", prefix, self.name),
            None => format!("NodeTypes.{}.yaml", self.name),
        }
    }

    /// YAML body of the definition
    pub fn to_yaml(&self) -> Result<String> {
        let mut super_types = Mapping::new();
        for super_type in &self.super_types {
            super_types.insert(YamlValue::from(super_type.as_str()), YamlValue::Bool(true));
        }

        let mut ui = Mapping::new();
        ui.insert("label".into(), "i18n".into());
        ui.insert("icon".into(), self.icon.as_str().into());

        let mut definition = Mapping::new();
        definition.insert("superTypes".into(), YamlValue::Mapping(super_types));
        definition.insert("ui".into(), YamlValue::Mapping(ui));

        let mut root = Mapping::new();
        root.insert(
            format!("{}:{}", self.package_key, self.name).into(),
            YamlValue::Mapping(definition),
        );

        serde_yaml::to_string(&root).map_err(|e| ScaffoldError::TemplateRender {
            template: self.file_name(),
            message: e.to_string(),
        })
    }
}

/// Merge command line super types with the default one, dropping empties and duplicates
pub fn collect_super_types(from_cli: &[String], default: Option<&str>) -> Vec<String> {
    let mut super_types: Vec<String> = Vec::new();
    for super_type in from_cli.iter().map(String::as_str).chain(default) {
        let super_type = super_type.trim();
        if !super_type.is_empty() && !super_types.iter().any(|s| s == super_type) {
            super_types.push(super_type.to_string());
        }
    }
    super_types
}

/// Source and target languages of a translation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageSelection {
    pub source: String,
    pub targets: Vec<String>,
}

impl LanguageSelection {
    /// Pick languages from the command line, falling back to the configured list
    ///
    /// Without an explicit source the first configured language is the source.
    /// Without explicit targets every other configured language is a target.
    pub fn resolve(configured: &[String], source: Option<&str>, targets: &[String]) -> Result<Self> {
        let source = match source.filter(|s| !s.is_empty()) {
            Some(source) => source.to_string(),
            None => configured
                .first()
                .cloned()
                .ok_or_else(|| ScaffoldError::config("Please specify languages in your settings"))?,
        };

        let targets: Vec<String> = if targets.is_empty() {
            configured.iter().filter(|l| **l != source).cloned().collect()
        } else {
            targets.to_vec()
        };

        Ok(Self { source, targets })
    }
}

/// Renders and writes single artifacts
pub struct ArtifactGenerator<'a, R, T, P>
where
    R: PackageRegistry + ?Sized,
    T: TemplateRenderer + ?Sized,
    P: TranslationParser + ?Sized,
{
    registry: &'a R,
    renderer: &'a T,
    parser: &'a P,
    root: &'a Path,
}

impl<'a, R, T, P> ArtifactGenerator<'a, R, T, P>
where
    R: PackageRegistry + ?Sized,
    T: TemplateRenderer + ?Sized,
    P: TranslationParser + ?Sized,
{
    pub fn new(registry: &'a R, renderer: &'a T, parser: &'a P, root: &'a Path) -> Self {
        Self {
            registry,
            renderer,
            parser,
            root,
        }
    }

    fn writer(&self) -> FileWriter<'a, R> {
        FileWriter::new(self.registry, self.root)
    }

    /// Bundled template, or `<templatePath>/<name>.tmpl` when configured
    fn template_ref(&self, settings: &ResolvedSettings, name: &'static str) -> Result<TemplateRef> {
        match settings.template_path.as_deref() {
            Some(dir) => {
                let file = format!("{}.{}", name, OVERRIDE_EXTENSION);
                let path = resolve_path(self.registry, self.root, &concatenate(&[dir, file.as_str()]))?;
                Ok(TemplateRef::File(path))
            }
            None => Ok(TemplateRef::Bundled(name)),
        }
    }

    /// `Configuration/NodeTypes.<prefix>.<Name>.yaml`
    pub fn node_type(
        &self,
        definition: &NodeTypeDefinition,
        force: bool,
        report: &mut GenerationReport,
    ) -> Result<FileRecord> {
        let package_path = self.registry.package_path(&definition.package_key).ok_or_else(|| {
            ScaffoldError::config(format!("Package '{}' has no path", definition.package_key))
        })?;
        let target = package_path.join("Configuration").join(definition.file_name());

        let content = definition.to_yaml()?;
        debug!(path = %target.display(), "generating node type");
        self.writer().write_file(&target, &content, force, report)
    }

    /// Fusion prototype under `Resources/Private/Fusion`
    pub fn fusion(
        &self,
        request: &GenerationRequest,
        settings: &ResolvedSettings,
        extends: &str,
        report: &mut GenerationReport,
    ) -> Result<FileRecord> {
        let base = format!("{}Private/Fusion/", resource_root(&request.package_key));
        let target = compose(
            &base,
            &settings.target_path,
            request.sub_folder,
            &request.name,
            &settings.name_appendix,
            &settings.suffix,
        );

        let context = json!({
            "packageKey": request.package_key,
            "name": request.name,
            "extends": extends,
            "nameAppendix": settings.name_appendix,
        });
        let content = self
            .renderer
            .render(&self.template_ref(settings, names::FUSION)?, &context)?;

        debug!(path = %target, "generating fusion");
        self.writer().write(&target, &content, request.force, report)
    }

    /// View template under `Resources/Private`
    pub fn template(
        &self,
        request: &GenerationRequest,
        settings: &ResolvedSettings,
        report: &mut GenerationReport,
    ) -> Result<FileRecord> {
        let base = format!("{}Private/", resource_root(&request.package_key));
        let target = compose(&base, &settings.target_path, request.sub_folder, &request.name, "", &settings.suffix);

        let context = json!({ "name": request.name });
        let content = self
            .renderer
            .render(&self.template_ref(settings, names::VIEW)?, &context)?;

        debug!(path = %target, "generating template");
        self.writer().write(&target, &content, request.force, report)
    }

    /// JavaScript file under `Resources`
    pub fn javascript(
        &self,
        request: &GenerationRequest,
        settings: &ResolvedSettings,
        report: &mut GenerationReport,
    ) -> Result<FileRecord> {
        let base = resource_root(&request.package_key);
        let target = compose(&base, &settings.target_path, request.sub_folder, &request.name, "", &settings.suffix);

        let context = json!({ "name": request.name });
        let content = self
            .renderer
            .render(&self.template_ref(settings, names::JAVASCRIPT)?, &context)?;

        debug!(path = %target, "generating javascript");
        self.writer().write(&target, &content, request.force, report)
    }

    /// Stylesheet under `Resources`, with a kebab-case class named after the artifact
    pub fn stylesheet(
        &self,
        request: &GenerationRequest,
        settings: &ResolvedSettings,
        report: &mut GenerationReport,
    ) -> Result<FileRecord> {
        let base = resource_root(&request.package_key);
        let target = compose(&base, &settings.target_path, request.sub_folder, &request.name, "", &settings.suffix);

        let context = json!({ "class": request.name.to_case(Case::Kebab) });
        let content = self
            .renderer
            .render(&self.template_ref(settings, names::STYLESHEET)?, &context)?;

        debug!(path = %target, "generating stylesheet");
        self.writer().write(&target, &content, request.force, report)
    }

    /// Source language file plus one file per target language
    ///
    /// Target files are rendered from the units of the source file as it is
    /// on disk, so an existing source file is reused.
    pub fn translation(
        &self,
        request: &GenerationRequest,
        settings: &ResolvedSettings,
        languages: &LanguageSelection,
        report: &mut GenerationReport,
    ) -> Result<Vec<FileRecord>> {
        let base = format!("{}Private/Translations", resource_root(&request.package_key));
        let file_name = format!("{}{}", request.name, settings.suffix);
        let mut records = Vec::new();

        let source_target = concatenate(&[
            base.as_str(),
            languages.source.as_str(),
            settings.target_path.as_str(),
            file_name.as_str(),
        ]);
        let mut context = json!({
            "packageKey": request.package_key,
            "sourceLanguageKey": languages.source,
            "name": request.name,
        });
        let content = self
            .renderer
            .render(&self.template_ref(settings, names::SOURCE_LANGUAGE)?, &context)?;
        debug!(path = %source_target, "generating source translation");
        records.push(self.writer().write(&source_target, &content, request.force, report)?);

        if languages.targets.is_empty() {
            return Ok(records);
        }

        let source_path = resolve_path(self.registry, self.root, &source_target)?;
        let units = self.parser.parse(&source_path)?;
        context["translationUnits"] = json!(units);

        let target_template = self.template_ref(settings, names::TARGET_LANGUAGE)?;
        for language in &languages.targets {
            context["targetLanguageKey"] = json!(language);
            let content = self.renderer.render(&target_template, &context)?;
            let target = concatenate(&[
                base.as_str(),
                language.as_str(),
                settings.target_path.as_str(),
                file_name.as_str(),
            ]);
            debug!(path = %target, "generating target translation");
            records.push(self.writer().write(&target, &content, request.force, report)?);
        }

        Ok(records)
    }
}
