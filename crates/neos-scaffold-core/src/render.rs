//! Template rendering using Handlebars
//!
//! Bundled templates are compiled into the binary. A settings `templatePath`
//! replaces them with `<templatePath>/<Template>.tmpl` files read from disk.

use crate::error::{Result, ScaffoldError};
use handlebars::Handlebars;
use serde_json::Value;
use std::path::PathBuf;

/// Names of the templates used by the generators
pub mod names {
    pub const FUSION: &str = "FusionTemplate.fusion";
    pub const VIEW: &str = "ViewTemplate.html";
    pub const JAVASCRIPT: &str = "JavascriptTemplate.js";
    pub const STYLESHEET: &str = "StylesheetTemplate.css";
    pub const SOURCE_LANGUAGE: &str = "SourceLanguageTemplate.xlf";
    pub const TARGET_LANGUAGE: &str = "TargetLanguageTemplate.xlf";
}

/// File extension of template overrides on disk
pub const OVERRIDE_EXTENSION: &str = "tmpl";

const BUNDLED: &[(&str, &str)] = &[
    (names::FUSION, include_str!("../templates/FusionTemplate.fusion.hbs")),
    (names::VIEW, include_str!("../templates/ViewTemplate.html.hbs")),
    (names::JAVASCRIPT, include_str!("../templates/JavascriptTemplate.js.hbs")),
    (names::STYLESHEET, include_str!("../templates/StylesheetTemplate.css.hbs")),
    (
        names::SOURCE_LANGUAGE,
        include_str!("../templates/SourceLanguageTemplate.xlf.hbs"),
    ),
    (
        names::TARGET_LANGUAGE,
        include_str!("../templates/TargetLanguageTemplate.xlf.hbs"),
    ),
];

/// Which template to render
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateRef {
    /// A template compiled into the binary
    Bundled(&'static str),
    /// A template file on disk
    File(PathBuf),
}

impl TemplateRef {
    fn label(&self) -> String {
        match self {
            TemplateRef::Bundled(name) => (*name).to_string(),
            TemplateRef::File(path) => path.display().to_string(),
        }
    }
}

/// Renders a template with context variables
pub trait TemplateRenderer {
    fn render(&self, template: &TemplateRef, context: &Value) -> Result<String>;
}

/// Handlebars-backed renderer with the bundled templates registered
#[derive(Debug)]
pub struct HandlebarsRenderer {
    handlebars: Handlebars<'static>,
}

impl HandlebarsRenderer {
    /// Creates a renderer with all bundled templates registered.
    ///
    /// # Errors
    ///
    /// Returns error if a bundled template fails to compile.
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();

        // Strict mode: fail on missing variables
        handlebars.set_strict_mode(true);

        // Generated files are not HTML-escaped
        handlebars.register_escape_fn(handlebars::no_escape);

        for (name, source) in BUNDLED {
            handlebars
                .register_template_string(name, *source)
                .map_err(|e| ScaffoldError::TemplateRender {
                    template: (*name).to_string(),
                    message: e.to_string(),
                })?;
        }

        Ok(Self { handlebars })
    }
}

impl TemplateRenderer for HandlebarsRenderer {
    fn render(&self, template: &TemplateRef, context: &Value) -> Result<String> {
        let render_error = |message: String| ScaffoldError::TemplateRender {
            template: template.label(),
            message,
        };

        match template {
            TemplateRef::Bundled(name) => self
                .handlebars
                .render(name, context)
                .map_err(|e| render_error(e.to_string())),
            TemplateRef::File(path) => {
                let source = std::fs::read_to_string(path).map_err(|e| render_error(e.to_string()))?;
                self.handlebars
                    .render_template(&source, context)
                    .map_err(|e| render_error(e.to_string()))
            }
        }
    }
}
