//! pipeline-compiler CLI entry point.
//!
//! Initializes logging, then validates, generates or runs pipeline scripts.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use pipeline_compiler::error::render_errors;
use pipeline_compiler::parse::types::WorkflowManifest;
use pipeline_compiler::sandbox::{DEFAULT_IMAGE, DockerExecutor, SandboxConfig, ScriptExecutor};
use pipeline_compiler::store::{Component, MemoryStore, component_code_for};
use pipeline_compiler::validate::check_definitions;

/// Compile exported ML workflow manifests into runnable Python scripts.
#[derive(Parser)]
#[command(name = "pipeline-compiler")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a manifest without generating anything.
    Validate {
        /// Workflow manifest JSON.
        manifest: PathBuf,
    },

    /// Generate the pipeline script.
    #[command(alias = "gen")]
    Generate(GenerateArgs),

    /// Generate the script and execute it in the Docker sandbox.
    Run {
        #[command(flatten)]
        generate: GenerateArgs,

        #[command(flatten)]
        sandbox: SandboxArgs,
    },
}

#[derive(Args)]
struct GenerateArgs {
    /// Workflow manifest JSON.
    #[arg(short, long)]
    manifest: PathBuf,

    /// Python file holding the component function bodies.
    #[arg(short, long, conflicts_with = "store")]
    components: Option<PathBuf>,

    /// JSON array of component records; node ids are looked up in it.
    #[arg(long)]
    store: Option<PathBuf>,

    /// Write the script here instead of stdout.
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Require every callable to be defined exactly once in the component code.
    #[arg(long)]
    check_definitions: bool,
}

#[derive(Args)]
struct SandboxArgs {
    /// Docker image the script runs in.
    #[arg(long, env = "PYTHON_DOCKER_IMAGE", default_value = DEFAULT_IMAGE)]
    image: String,

    /// Container memory limit.
    #[arg(long, default_value = "2g")]
    memory: String,

    /// Container CPU limit.
    #[arg(long, default_value = "2")]
    cpus: String,
}

impl From<SandboxArgs> for SandboxConfig {
    fn from(args: SandboxArgs) -> Self {
        SandboxConfig {
            image: args.image,
            memory: args.memory,
            cpus: args.cpus,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --log-level CLI arg > default "info"
    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| cli.log_level.clone());

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)))
        .init();

    match cli.command {
        Commands::Validate { manifest } => validate(&manifest),
        Commands::Generate(args) => {
            let script = generate(&args)?;
            match &args.out {
                Some(path) => {
                    fs::write(path, &script)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!(path = %path.display(), "script written");
                }
                None => print!("{}", script),
            }
            Ok(())
        }
        Commands::Run { generate: args, sandbox } => {
            let script = generate(&args)?;
            if let Some(path) = &args.out {
                fs::write(path, &script)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }
            let executor = DockerExecutor::new(sandbox.into());
            let report = executor.execute(&script)?;
            print!("{}", report.output);
            if let Some(failure) = report.failure {
                bail!("Script execution failed: {}", failure);
            }
            Ok(())
        }
    }
}

fn read_manifest(path: &Path) -> anyhow::Result<WorkflowManifest> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest {}", path.display()))?;
    pipeline_compiler::parse::parse(&json)
        .map_err(|errors| anyhow::anyhow!("{}", render_errors(&errors)))
}

fn validate(path: &Path) -> anyhow::Result<()> {
    let manifest = read_manifest(path)?;
    let ir = pipeline_compiler::build_ir(&manifest)
        .map_err(|errors| anyhow::anyhow!("{}", render_errors(&errors)))?;
    info!(
        nodes = ir.metadata.node_count,
        invocations = ir.invocations().count(),
        "manifest is valid"
    );
    Ok(())
}

fn generate(args: &GenerateArgs) -> anyhow::Result<String> {
    let manifest = read_manifest(&args.manifest)?;
    let component_code = load_component_code(args, &manifest)?;

    let ir = pipeline_compiler::build_ir(&manifest)
        .map_err(|errors| anyhow::anyhow!("{}", render_errors(&errors)))?;

    if args.check_definitions {
        let errors = check_definitions(&ir, &component_code);
        if !errors.is_empty() {
            bail!("{}", render_errors(&errors));
        }
    }

    Ok(pipeline_compiler::codegen::codegen(
        &ir,
        &component_code,
        chrono::Utc::now(),
    ))
}

fn load_component_code(args: &GenerateArgs, manifest: &WorkflowManifest) -> anyhow::Result<String> {
    if let Some(path) = &args.components {
        return fs::read_to_string(path)
            .with_context(|| format!("Failed to read component code {}", path.display()));
    }
    if let Some(path) = &args.store {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read component store {}", path.display()))?;
        let components: Vec<Component> = serde_json::from_str(&json)
            .with_context(|| format!("Invalid component store {}", path.display()))?;
        let store: MemoryStore = components.into_iter().collect();
        return Ok(component_code_for(manifest, &store)?);
    }
    warn!("no component code given; the script will only contain the pipeline skeleton");
    Ok(String::new())
}
