//! juv CLI - generates validating JSON unmarshalers
//!
//! ```bash
//! juv -o src/model/juv_gen.rs -p model src/model
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use juv_codegen::CodeGenerator;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "juv", version, about = "Generate validating JSON unmarshalers for Rust structs", long_about = None)]
struct Cli {
    /// Output file name
    #[arg(short, long, default_value = "juv_gen.rs")]
    output: PathBuf,

    /// Module the structs live in (default: current directory name)
    #[arg(short = 'p', long)]
    module: Option<String>,

    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Source files or directories to scan
    paths: Vec<PathBuf>,
}

/// Module name for the current directory: `my-model` becomes `my_model`.
fn module_from_dir_name(name: &str) -> String {
    name.replace('-', "_")
}

fn current_dir_module() -> Result<String> {
    let cwd = std::env::current_dir().context("couldn't get working directory")?;
    let name = cwd
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("couldn't derive a module name from {}", cwd.display()))?;
    Ok(module_from_dir_name(name))
}

fn run(cli: Cli) -> Result<()> {
    let module = match cli.module {
        Some(module) => module,
        None => current_dir_module()?,
    };
    tracing::debug!(%module, output = %cli.output.display(), "starting generation");

    let mut codegen = CodeGenerator::new(module);
    codegen
        .add_paths(&cli.paths)
        .context("couldn't collect structs")?;
    codegen
        .write_to_file(&cli.output)
        .context("couldn't generate output")?;

    tracing::info!(
        module = codegen.module(),
        records = codegen.records().len(),
        output = %cli.output.display(),
        "done"
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
