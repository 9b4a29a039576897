//! Renderer module — trait-based format dispatch.
//!
//! Renderers skip suppressed entries and emit the module entry first, then
//! command entries in tree order. A suppressed module renders as an empty
//! document.

pub mod json;
pub mod markdown;
pub mod rst;

use anyhow::{anyhow, Result};

use crate::model::Document;

/// Trait for rendering a Document into a specific output format.
pub trait Renderer {
    fn render(&self, doc: &Document) -> String;
    fn file_extension(&self) -> &str;
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str) -> Result<Box<dyn Renderer>> {
    match format {
        "rst" => Ok(Box::new(rst::RstRenderer::default())),
        "markdown" | "md" => Ok(Box::new(markdown::MarkdownRenderer)),
        "json" => Ok(Box::new(json::JsonRenderer)),
        _ => Err(anyhow!(
            "unknown format: {}. Use rst, markdown, or json",
            format
        )),
    }
}
