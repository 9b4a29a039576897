//! Parser pipeline: tokens → elements → resolved annotations → Document.

pub mod annotations;
pub mod builder;
pub mod elements;

use crate::config::Config;
use crate::error::{Error, Warning};
use crate::model::Document;

/// Result of parsing one source file: the documentation tree plus any
/// recoverable annotation warnings.
#[derive(Debug)]
pub struct Parsed {
    pub document: Document,
    pub warnings: Vec<Warning>,
}

/// Parse CMake source text into a documentation tree.
///
/// Lex and parse errors are fatal for the file and produce no partial
/// document; annotation problems degrade to warnings.
pub fn parse(input: &str, config: &Config) -> Result<Parsed, Error> {
    let elements = elements::parse_elements(input)?;
    let mut warnings = Vec::new();
    let document = builder::build(elements, config, &mut warnings);
    Ok(Parsed { document, warnings })
}
