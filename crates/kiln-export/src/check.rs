//! Syntax checks and minification for generated sources.

use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use oxc_allocator::Allocator;
use oxc_ast::ast::Statement;
use oxc_parser::Parser;
use oxc_span::SourceType;

use crate::builder::ExportError;

/// Parse a stylesheet, failing on syntax errors.
pub fn check_css(css: &str) -> Result<(), ExportError> {
    StyleSheet::parse(css, ParserOptions::default())
        .map(|_| ())
        .map_err(|e| ExportError::CssSyntax(e.to_string()))
}

/// Minify CSS using lightningcss.
pub fn minify_css(css: &str) -> Result<String, ExportError> {
    let stylesheet = StyleSheet::parse(css, ParserOptions::default())
        .map_err(|e| ExportError::CssSyntax(e.to_string()))?;

    let minified = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..Default::default()
        })
        .map_err(|e| ExportError::CssSyntax(format!("CSS minify error: {}", e)))?;

    Ok(minified.code)
}

/// Parse a TSX module and require a default export.
pub fn check_tsx(source: &str) -> Result<(), ExportError> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, SourceType::tsx()).parse();

    if ret.panicked || !ret.errors.is_empty() {
        let message = ret
            .errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(ExportError::TsxSyntax(if message.is_empty() {
            "parser aborted".to_string()
        } else {
            message
        }));
    }

    let has_default_export = ret
        .program
        .body
        .iter()
        .any(|stmt| matches!(stmt, Statement::ExportDefaultDeclaration(_)));
    if !has_default_export {
        return Err(ExportError::TsxSyntax("missing default export".to_string()));
    }

    Ok(())
}
