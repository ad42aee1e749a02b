//! Translation unit extraction from XLIFF files

use crate::error::{Result, ScaffoldError};
use regex::Regex;
use serde::Serialize;
use std::path::Path;
use std::sync::OnceLock;

/// A `<trans-unit>` of a source language file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationUnit {
    pub id: String,
    pub source: String,
}

/// Reads the translation units of a translation file
pub trait TranslationParser {
    fn parse(&self, path: &Path) -> Result<Vec<TranslationUnit>>;
}

/// Extracts `<trans-unit id>` / `<source>` pairs from XLIFF 1.2 documents
#[derive(Debug, Clone, Copy, Default)]
pub struct XliffParser;

struct Patterns {
    unit: Regex,
    id: Regex,
    source: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        unit: Regex::new(r"(?s)<trans-unit\b([^>]*)>(.*?)</trans-unit>").expect("valid trans-unit pattern"),
        id: Regex::new(r#"\bid\s*=\s*"([^"]*)""#).expect("valid id pattern"),
        source: Regex::new(r"(?s)<source\b[^>]*>(.*?)</source>").expect("valid source pattern"),
    })
}

impl XliffParser {
    /// Parse XLIFF text
    pub fn parse_str(&self, content: &str) -> std::result::Result<Vec<TranslationUnit>, String> {
        if !content.contains("<xliff") {
            return Err("not an XLIFF document".to_string());
        }

        let patterns = patterns();
        let mut units = Vec::new();
        for unit in patterns.unit.captures_iter(content) {
            let attributes = &unit[1];
            let body = &unit[2];

            let id = patterns
                .id
                .captures(attributes)
                .map(|c| c[1].to_string())
                .ok_or_else(|| "trans-unit without id".to_string())?;
            let source = patterns
                .source
                .captures(body)
                .map(|c| c[1].trim().to_string())
                .unwrap_or_default();

            units.push(TranslationUnit { id, source });
        }
        Ok(units)
    }
}

impl TranslationParser for XliffParser {
    fn parse(&self, path: &Path) -> Result<Vec<TranslationUnit>> {
        let parse_error = |message: String| ScaffoldError::TranslationParse {
            path: path.to_path_buf(),
            message,
        };
        let content = std::fs::read_to_string(path).map_err(|e| parse_error(e.to_string()))?;
        self.parse_str(&content).map_err(parse_error)
    }
}
