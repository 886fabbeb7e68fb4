//! aid-extract
//!
//! Command-line front end: reads an annotated HTML page (or a JSON DOM),
//! extracts its semantic tree and prints it with the diagnostics.

use aid_semantics::{DomTree, ExtractOptions, Extraction, Extractor, NodeId, SchemaRegistry, Severity};
use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    /// Tree-shaped JSON with diagnostics (default)
    Json,
    /// One indented line per node, then the diagnostics
    Outline,
}

#[derive(Parser)]
#[command(name = "aid-extract")]
#[command(version)]
#[command(about = "Extract the aid-* semantic tree from an annotated HTML page", long_about = None)]
struct Cli {
    /// Input file (HTML, or a JSON DOM with --json)
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Treat the input as a JSON DOM instead of HTML
    #[arg(long)]
    json: bool,

    /// Schema configuration (JSON) extending the built-in vocabulary
    #[arg(long, short = 's', value_name = "FILE")]
    schema: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value = "json")]
    format: Format,

    /// Maximum DOM depth accepted (0 disables the limit)
    #[arg(long, default_value_t = aid_semantics::extract::DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Keep whitespace in text values as-is
    #[arg(long)]
    raw_whitespace: bool,

    /// Exit with a non-zero status when warnings were reported
    #[arg(long)]
    deny_warnings: bool,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let registry = match &cli.schema {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read schema {}", path.display()))?;
            SchemaRegistry::from_json(&json)?
        }
        None => SchemaRegistry::default(),
    };

    let input = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("Failed to read {}", cli.input.display()))?;
    let options = ExtractOptions::new()
        .max_depth((cli.max_depth > 0).then_some(cli.max_depth))
        .normalize_whitespace(!cli.raw_whitespace);

    let dom = if cli.json {
        DomTree::from_json_with(&input, &options)?
    } else {
        DomTree::from_html_with(&input, &options)?
    };
    let extraction = Extractor::new(&registry).with_options(options).extract(&dom)?;

    match cli.format {
        Format::Json => println!("{}", extraction.to_json()?),
        Format::Outline => print_outline(&extraction),
    }

    if cli.deny_warnings && extraction.has_warnings() {
        let count = extraction.diagnostics_with(Severity::Warning).count();
        bail!("{} warning diagnostic(s) reported", count);
    }

    Ok(())
}

fn print_outline(extraction: &Extraction) {
    let mut stack = vec![(NodeId::ROOT, 0usize)];
    while let Some((id, depth)) = stack.pop() {
        let Some(node) = extraction.node(id) else {
            continue;
        };

        println!("{}{} {}", "  ".repeat(depth), node.id, node.label());
        for fact in &node.facts {
            let marker = if fact.orphaned { " (orphaned)" } else { "" };
            println!("{}  - {}: {}{}", "  ".repeat(depth), fact.kind, fact.value, marker);
        }

        stack.extend(node.children.iter().rev().map(|c| (*c, depth + 1)));
    }

    if !extraction.diagnostics().is_empty() {
        println!();
        for diagnostic in extraction.diagnostics() {
            println!("{}", diagnostic);
        }
    }
}
