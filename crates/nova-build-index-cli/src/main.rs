use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use nova_build_index::{split_namespaced_path, CodeIndexReporter, TargetDescriptor, TargetKind};
use nova_build_index_cli::{init_tracing, BuildSnapshot, ToolConfig};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "nova-build-index",
    version,
    about = "Query Bazel build metadata snapshots (targets, artifacts, reports)"
)]
struct Cli {
    /// Build metadata snapshot (JSON) produced by the extraction step
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,
    /// Optional TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log level or `EnvFilter` directives (overrides the config file)
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a report over the artifact index
    Report(ReportArgs),
    /// Look up target descriptors
    Target(TargetArgs),
    /// Split a source file path into its source root and package-relative path
    SplitPath(SplitPathArgs),
}

#[derive(Args)]
struct ReportArgs {
    #[arg(value_enum)]
    kind: ReportKind,
    /// Leave out artifacts with deprecated labels
    #[arg(long)]
    suppress_deprecated: bool,
}

#[derive(Copy, Clone, ValueEnum)]
enum ReportKind {
    Text,
    ArtifactsCsv,
    AgeHistogram,
}

#[derive(Args)]
struct TargetArgs {
    #[command(subcommand)]
    query: TargetQuery,
    /// Emit JSON instead of one label per line
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum TargetQuery {
    /// Find the target with this exact label
    Label { label: String },
    /// List targets of the given rule kinds
    Kind {
        #[arg(required = true)]
        kinds: Vec<TargetKind>,
    },
    /// List targets whose sources live under this directory
    Root { prefix: String },
}

#[derive(Args)]
struct SplitPathArgs {
    /// Path of the source file
    file: String,
    /// Package path declared by the file (empty for the default package)
    #[arg(default_value = "")]
    namespace: String,
    /// Emit JSON
    #[arg(long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();
    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            2
        }
    };

    std::process::exit(exit_code);
}

fn run(cli: Cli) -> Result<i32> {
    let Cli {
        snapshot,
        config,
        log_level,
        command,
    } = cli;

    let mut config = match config {
        Some(path) => ToolConfig::load(&path)?,
        None => ToolConfig::default(),
    };
    if let Some(level) = log_level {
        config.logging.level = level;
    }
    init_tracing(&config.logging);

    match command {
        Command::SplitPath(args) => split_path(args),
        Command::Report(args) => {
            let snapshot = load_snapshot(snapshot.as_deref())?;
            report(&snapshot, &config, args)
        }
        Command::Target(args) => {
            let snapshot = load_snapshot(snapshot.as_deref())?;
            target(&snapshot, args)
        }
    }
}

fn load_snapshot(path: Option<&Path>) -> Result<BuildSnapshot> {
    let path = path.context("--snapshot is required for this command")?;
    BuildSnapshot::load(path)
}

fn report(snapshot: &BuildSnapshot, config: &ToolConfig, args: ReportArgs) -> Result<i32> {
    let index = snapshot.code_index(config.index);
    let reporter = CodeIndexReporter::new(&index);

    let mut options = config.report.clone();
    options.suppress_deprecated |= args.suppress_deprecated;

    let lines = match args.kind {
        ReportKind::Text => reporter.render_text(&options),
        ReportKind::ArtifactsCsv => reporter.render_artifacts_csv(&options),
        ReportKind::AgeHistogram => reporter.render_age_histogram_csv(),
    };
    for line in lines {
        println!("{line}");
    }
    Ok(0)
}

fn target(snapshot: &BuildSnapshot, args: TargetArgs) -> Result<i32> {
    let index = snapshot.target_index()?;

    let found: Vec<&TargetDescriptor> = match &args.query {
        TargetQuery::Label { label } => index.lookup_by_label(label).into_iter().collect(),
        TargetQuery::Kind { kinds } => index.lookup_by_kind(kinds),
        TargetQuery::Root { prefix } => index
            .lookup_by_root_source_path(prefix)
            .with_context(|| format!("root source path query for `{prefix}` failed"))?,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&found)?);
    } else {
        for target in &found {
            println!("{}\t{}", target.label, target.kind);
        }
    }

    // A label lookup that finds nothing is reported through the exit code.
    let missing = matches!(args.query, TargetQuery::Label { .. }) && found.is_empty();
    Ok(if missing { 1 } else { 0 })
}

fn split_path(args: SplitPathArgs) -> Result<i32> {
    let Some(split) = split_namespaced_path(&args.file, &args.namespace) else {
        eprintln!(
            "`{}` does not end with package path `{}`",
            args.file, args.namespace
        );
        return Ok(1);
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&split)?);
    } else {
        println!("{}\t{}", split.directory, split.file);
    }
    Ok(0)
}
