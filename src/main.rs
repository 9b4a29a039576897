//! cmdoc — generate documentation from annotated CMake source files.
//!
//! Documentation lives in `#[[[` ... `#]]` doc-comments attached to the
//! command invocation that follows them. Two modes:
//!
//! - **stdin mode**: `cmdoc < module.cmake`
//! - **file mode**: `cmdoc -o docs/api cmake/*.cmake`

mod config;
mod error;
mod lexer;
mod model;
mod parser;
mod render;
mod toc;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use config::Config;

#[derive(Parser)]
#[command(
    name = "cmdoc",
    about = "Generate documentation from annotated CMake source files"
)]
struct Cli {
    /// Input files (glob patterns supported). If omitted, reads from stdin.
    files: Vec<String>,

    /// Output directory (required when files are given)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Output format: rst (default), markdown, json
    #[arg(short = 'f', long, default_value = "rst")]
    format: String,

    /// Module name used when no @module tag names one (stdin mode)
    #[arg(long)]
    module_name: Option<String>,

    /// Ignore dangling doc-comments instead of treating them as module docs
    #[arg(long)]
    ignore_dangling: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.files.is_empty() {
        return stdin_mode(&cli);
    }

    file_mode(&cli)
}

fn build_config(cli: &Cli) -> Config {
    Config {
        dangling_doc_to_module: !cli.ignore_dangling,
        ..Config::default()
    }
}

/// stdin mode: read from stdin, parse, write to stdout.
fn stdin_mode(cli: &Cli) -> Result<()> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    let config = build_config(cli);
    let mut parsed = parser::parse(&input, &config)
        .map_err(|e| anyhow::anyhow!("<stdin>: {}", e))?;
    for warning in &parsed.warnings {
        eprintln!("warning: <stdin>: {}", warning);
    }
    if parsed.document.module.name.is_none() {
        parsed.document.module.name = Some(
            cli.module_name
                .clone()
                .unwrap_or_else(|| "<stdin>".to_string()),
        );
    }

    let renderer = render::create_renderer(&cli.format)?;
    print!("{}", renderer.render(&parsed.document));
    Ok(())
}

/// file mode: process multiple files, write one output file each.
fn file_mode(cli: &Cli) -> Result<()> {
    let output_dir = cli
        .output
        .as_deref()
        .context("--output is required when files are given")?;

    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory: {}", output_dir.display()))?;

    let config = build_config(cli);
    let renderer = render::create_renderer(&cli.format)?;
    let ext = renderer.file_extension();

    let input_files = expand_globs(&cli.files)?;
    for path in &input_files {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        // lex/parse errors abort this file, never the whole run
        let mut parsed = match parser::parse(&content, &config) {
            Ok(parsed) => parsed,
            Err(e) => {
                eprintln!("warning: skipping {}: {}", path.display(), e);
                continue;
            }
        };
        for warning in &parsed.warnings {
            eprintln!("warning: {}: {}", path.display(), warning);
        }

        let name = derive_output_name(path);
        if parsed.document.module.name.is_none() {
            parsed.document.module.name = Some(name.clone());
        }

        let out_path = output_dir.join(format!("{}.{}", name, ext));
        fs::write(&out_path, renderer.render(&parsed.document))
            .with_context(|| format!("failed to write {}", out_path.display()))?;
    }

    Ok(())
}

/// Source files recognized when scanning directories.
fn is_source_file(path: &Path) -> bool {
    if path.extension().and_then(|e| e.to_str()) == Some("cmake") {
        return true;
    }
    path.file_name().and_then(|n| n.to_str()) == Some("CMakeLists.txt")
}

/// Expand glob patterns into a list of real file paths.
/// Also handles bare directory paths by scanning for source files.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            for entry in entries.flatten() {
                let p = entry.path();
                if p.is_file() && is_source_file(&p) {
                    files.push(p);
                }
            }
            continue;
        }
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            eprintln!("warning: no files matched: {}", pattern);
        }
        files.extend(matches);
    }
    // Sort for deterministic output
    files.sort();
    files.dedup();
    Ok(files)
}

/// Derive the output (and default module) name from a source path.
/// "cmake/widgets.cmake" → "widgets", "widgets/CMakeLists.txt" → "widgets"
fn derive_output_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("module");
    if stem == "CMakeLists" {
        if let Some(parent) = path
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
        {
            return parent.to_string();
        }
    }
    stem.to_string()
}
