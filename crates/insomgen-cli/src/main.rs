use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use insomgen_core::config::{self, CONFIG_FILE_NAME, InsomgenConfig};
use insomgen_core::export::InsomniaExport;
use insomgen_core::generate::{self, output_file_name};
use insomgen_core::{GenerationContext, Watcher, parse};

#[derive(Parser)]
#[command(
    name = "insomgen",
    about = "Convert OpenAPI specs to Insomnia workspace files",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an Insomnia workspace from an OpenAPI spec
    Generate {
        /// Path to the OpenAPI spec file (YAML or JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output path (default: <name>-insomnia.yml in the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Watch OpenAPI specs and regenerate their workspaces on change
    Watch {
        /// Directory to scan for OpenAPI files
        #[arg(short, long, conflicts_with = "file")]
        dir: Option<PathBuf>,

        /// Specific OpenAPI file to watch
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Output file for the watched file
        #[arg(short, long, requires = "file")]
        output: Option<PathBuf>,

        /// Polling interval in seconds
        #[arg(long)]
        interval: Option<u64>,
    },

    /// Show the folders, requests and environments a spec converts to
    Inspect {
        /// Path to the OpenAPI spec file
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,
    },

    /// Initialize a new insomgen configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { input, output } => cmd_generate(input, output),

        Commands::Watch {
            dir,
            file,
            output,
            interval,
        } => cmd_watch(dir, file, output, interval),

        Commands::Inspect { input, format } => cmd_inspect(input, format),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "insomgen", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn load_config() -> Result<InsomgenConfig> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    Ok(config::load_config(&config_path)?.unwrap_or_default())
}

fn cmd_generate(input: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    let cfg = load_config()?;
    let Some(input) = input.or_else(|| cfg.input.as_ref().map(PathBuf::from)) else {
        anyhow::bail!("an OpenAPI spec file is required (--input or `input` in {CONFIG_FILE_NAME})");
    };
    if !input.exists() {
        anyhow::bail!("OpenAPI file does not exist: {}", input.display());
    }
    let output =
        output.unwrap_or_else(|| PathBuf::from(output_file_name(&input, &cfg.output_suffix)));

    eprintln!("Generating Insomnia file from OpenAPI spec...");
    eprintln!("  Input:  {}", input.display());
    eprintln!("  Output: {}", output.display());

    generate::generate_to_file(&input, &output)
        .with_context(|| format!("failed to generate {}", output.display()))?;

    eprintln!("Generated {}", output.display());
    Ok(())
}

fn cmd_watch(
    dir: Option<PathBuf>,
    file: Option<PathBuf>,
    output: Option<PathBuf>,
    interval: Option<u64>,
) -> Result<()> {
    let cfg = load_config()?;
    let interval = interval.map_or_else(|| cfg.watch.interval(), Duration::from_secs);
    let mut watcher = Watcher::new(interval).with_output_suffix(cfg.output_suffix.clone());

    eprintln!("Polling interval: {} seconds", interval.as_secs());
    eprintln!("Press Ctrl+C to stop watching...");

    if let Some(file) = file {
        let output = watcher
            .add_file(&file, output)
            .context("failed to add file to watcher")?;
        eprintln!("Watching {} -> {}", file.display(), output.display());
        watcher.run()
    }

    let dir = dir.unwrap_or_else(|| PathBuf::from(&cfg.watch.dir));
    if !dir.is_dir() {
        anyhow::bail!("directory does not exist: {}", dir.display());
    }
    eprintln!("Scanning {} for OpenAPI files", dir.display());
    watcher.auto_detect_and_watch(&dir)?;
    eprintln!("No OpenAPI files found in {}", dir.display());
    Ok(())
}

fn cmd_inspect(input: PathBuf, format: InspectFormat) -> Result<()> {
    let content = fs::read_to_string(&input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let parsed = parse::from_str(&content)?;

    eprintln!(
        "{} spec: {} {}",
        parsed.document.version_marker.as_deref().unwrap_or("unversioned"),
        parsed.document.info.title,
        parsed.document.info.version
    );
    eprintln!("  Paths: {}", parsed.document.paths.len());
    eprintln!("  Operations: {}", parsed.document.operation_count());

    let export = insomgen_core::transform::assemble(parsed, &GenerationContext::new());
    let summary = build_inspect_summary(&export);

    match format {
        InspectFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&summary)?;
            print!("{}", yaml);
        }
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn build_inspect_summary(export: &InsomniaExport) -> serde_json::Value {
    let folders: Vec<serde_json::Value> = export
        .collection
        .iter()
        .map(|folder| {
            let requests: Vec<serde_json::Value> = folder
                .children
                .iter()
                .map(|req| {
                    serde_json::json!({
                        "method": req.method,
                        "name": req.name,
                        "url": req.url,
                    })
                })
                .collect();
            serde_json::json!({
                "name": folder.name,
                "description": folder.meta.description,
                "requests": requests,
            })
        })
        .collect();

    let environments: Vec<serde_json::Value> = export
        .environments
        .sub_environments
        .iter()
        .map(|env| {
            serde_json::json!({
                "name": env.name,
                "scheme": env.data.scheme,
                "host": env.data.host,
                "base_path": env.data.base_path,
            })
        })
        .collect();

    serde_json::json!({
        "name": export.name,
        "folders": folders,
        "environments": environments,
    })
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
