mod resolve;
mod symbols;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use protoscope_api::SymbolKind;
use protoscope_core::{Context, ContextConfig};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "protoscope",
    version,
    about = "Inspect the symbols defined by compiled protobuf descriptor sets",
    long_about = "Protoscope loads serialized FileDescriptorSet files (as produced by \
                  `protoc --descriptor_set_out`) into a shared symbol context, then lists \
                  the registered symbols or resolves names the way protobuf scoping does."
)]
pub struct Cli {
    /// JSON file with context settings
    #[arg(long, global = true, value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    /// Print machine-readable JSON instead of a table
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List every symbol defined by the given descriptor sets
    #[command(
        long_about = "Registers each descriptor set in order, as one batch per file. \
                      Later files may refer to symbols from earlier ones."
    )]
    Symbols {
        #[arg(value_name = "DESCRIPTOR_SET", required = true)]
        paths: Vec<PathBuf>,

        /// Only list symbols of this kind (message, enum, service, extension)
        #[arg(long)]
        kind: Option<SymbolKind>,
    },
    /// Resolve a reference as written inside the scope of BASE
    Resolve {
        #[arg(value_name = "DESCRIPTOR_SET")]
        path: PathBuf,

        /// Fully-qualified name of the referring symbol
        base: String,

        /// Name as written; a leading '.' makes it fully qualified
        reference: String,
    },
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = protoscope_core::logging::init_logging("cli", true);

    let config = match &cli.config {
        Some(path) => ContextConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ContextConfig::default(),
    };

    match cli.command {
        Commands::Symbols { paths, kind } => {
            let ctx = load_context(config, &paths)?;
            symbols::run(&ctx, kind, cli.json)
        }
        Commands::Resolve {
            path,
            base,
            reference,
        } => {
            let ctx = load_context(config, std::slice::from_ref(&path))?;
            resolve::run(&ctx, &base, &reference, cli.json)
        }
    }
}

/// Creates a context and registers each file as its own batch.
pub fn load_context(config: ContextConfig, paths: &[PathBuf]) -> anyhow::Result<Context> {
    let ctx = Context::with_config(config);
    for path in paths {
        load_file(&ctx, path)?;
    }
    Ok(ctx)
}

fn load_file(ctx: &Context, path: &Path) -> anyhow::Result<()> {
    let report = ctx
        .parse_and_add_file(path)
        .with_context(|| format!("failed to load {}", path.display()))?;
    info!(
        "Loaded {}: {} files, {} symbols",
        path.display(),
        report.files,
        report.symbols()
    );
    Ok(())
}
