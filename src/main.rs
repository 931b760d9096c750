// stylescope: dump the statement tree of a C/C++ source file

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use stylescope::{tokenize, BuilderConfig, StructureParser};

/// Print the statement tree of a C or C++ source file.
#[derive(Debug, Parser)]
#[command(name = "stylescope", version)]
struct Args {
    /// Source file to parse
    file: PathBuf,

    /// JSON builder configuration (`max-depth`, `precedence`)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the maximum scope nesting depth
    #[arg(long)]
    max_depth: Option<usize>,

    /// Emit the tree as JSON instead of an indented outline
    #[arg(long)]
    json: bool,
}

fn load_config(args: &Args) -> Result<BuilderConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => BuilderConfig::default(),
    };
    if let Some(depth) = args.max_depth {
        config = config.with_max_depth(depth);
    }
    Ok(config)
}

fn main() -> Result<()> {
    // stdout carries the tree
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let parser = StructureParser::new(config).context("invalid builder configuration")?;

    let source = fs::read_to_string(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let tokens = tokenize(&source).with_context(|| format!("tokenizing {}", args.file.display()))?;
    let tree = parser
        .parse(&tokens)
        .with_context(|| format!("parsing {}", args.file.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&tree)?);
    } else {
        print!("{tree}");
    }

    tracing::info!(tokens = tokens.len(), statements = tree.iter().count(), "done");
    Ok(())
}
