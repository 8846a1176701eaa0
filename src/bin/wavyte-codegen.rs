use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use wavyte_codegen::{
    CodegenOpts, GraphStats, SourceDef, Target, VariantDecisions, generate_source,
};

#[derive(Parser, Debug)]
#[command(name = "wavyte-codegen", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate source code for a JSON source definition.
    Generate(GenerateArgs),
    /// Print per-variant decision statistics and the decision fingerprint as JSON.
    Stats(StatsArgs),
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Input source JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output source file.
    #[arg(long)]
    out: PathBuf,

    /// Target language.
    #[arg(long, value_enum, default_value_t = TargetChoice::Csharp)]
    target: TargetChoice,

    /// Let commented objects take part in canonicalization.
    #[arg(long)]
    ignore_comments: bool,

    /// Always call factories; storing factories guard themselves.
    #[arg(long)]
    disable_field_optimization: bool,

    /// Process variants sequentially.
    #[arg(long)]
    no_parallel: bool,

    /// Debug logging to stderr.
    #[arg(long)]
    verbose: bool,
}

#[derive(Parser, Debug)]
struct StatsArgs {
    /// Input source JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Target language; resolutions do not depend on it.
    #[arg(long, value_enum, default_value_t = TargetChoice::Csharp)]
    target: TargetChoice,

    /// Include every factory and resolution, not only the counts.
    #[arg(long)]
    decisions: bool,

    /// Debug logging to stderr.
    #[arg(long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TargetChoice {
    Csharp,
    Cppwinrt,
}

impl From<TargetChoice> for Target {
    fn from(t: TargetChoice) -> Self {
        match t {
            TargetChoice::Csharp => Target::CSharp,
            TargetChoice::Cppwinrt => Target::Cppwinrt,
        }
    }
}

#[derive(Serialize)]
struct StatsReport<'a> {
    class_name: &'a str,
    fingerprint: String,
    variants: &'a [GraphStats],
    #[serde(skip_serializing_if = "Option::is_none")]
    decisions: Option<&'a [VariantDecisions]>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Generate(args) => cmd_generate(args),
        Command::Stats(args) => cmd_stats(args),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load(path: &PathBuf) -> anyhow::Result<SourceDef> {
    SourceDef::from_path(path).with_context(|| format!("load source '{}'", path.display()))
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    init_logging(args.verbose);
    let source = load(&args.in_path)?;
    let opts = CodegenOpts {
        target: args.target.into(),
        ignore_comments: args.ignore_comments,
        disable_field_optimization: args.disable_field_optimization,
        parallel: !args.no_parallel,
    };
    let out = generate_source(&source, &opts)
        .with_context(|| format!("generate '{}'", source.class_name))?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, &out.text)
        .with_context(|| format!("write '{}'", args.out.display()))?;

    eprintln!("wrote {} ({})", args.out.display(), out.fingerprint);
    Ok(())
}

fn cmd_stats(args: StatsArgs) -> anyhow::Result<()> {
    init_logging(args.verbose);
    let source = load(&args.in_path)?;
    let opts = CodegenOpts {
        target: args.target.into(),
        ..CodegenOpts::default()
    };
    let out = generate_source(&source, &opts)
        .with_context(|| format!("generate '{}'", source.class_name))?;

    let report = StatsReport {
        class_name: &source.class_name,
        fingerprint: out.fingerprint.to_string(),
        variants: &out.stats,
        decisions: args.decisions.then_some(out.decisions.as_slice()),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("serialize stats")?
    );
    Ok(())
}
