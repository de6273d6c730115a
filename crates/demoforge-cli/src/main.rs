use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use demoforge_core::{Error as CoreError, load_config, validate_config};
use demoforge_generate::{GenerateOptions, GenerationEngine, GenerationError, output};

#[derive(Debug, Error)]
enum CliError {
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("config validation failed with {0} issue(s)")]
    Validation(usize),
}

#[derive(Parser, Debug)]
#[command(name = "demoforge", version, about = "Demoforge CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a dataset from a topic config.
    Generate(GenerateArgs),
    /// Lint a topic config and report every issue.
    Validate(ValidateArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Path to the topic YAML config file.
    #[arg(long)]
    config: PathBuf,
    /// Number of records to generate.
    #[arg(long, default_value_t = 10_000)]
    num_records: u64,
    /// Output file path; defaults to `<topic>.json` in the current directory.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Output file type; inferred from the output extension when not set.
    #[arg(long, value_enum)]
    output_type: Option<OutputType>,
    /// Comma-separated field names for the partition path, overriding the
    /// config's `s3_partition_fields`.
    #[arg(long)]
    s3_partition_fields: Option<String>,
    /// Seed for the deterministic record stream.
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    /// Path to the topic YAML config file.
    config: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputType {
    Json,
    Csv,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let outcome = match cli.command {
        Command::Generate(args) => generate(args),
        Command::Validate(args) => validate(args),
    };

    if let Err(err) = outcome {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn generate(args: GenerateArgs) -> Result<(), CliError> {
    let base_dir = config_base_dir(&args.config);
    let mut config = load_config(&args.config)?;

    let issues = validate_config(&config, &base_dir);
    if !issues.is_empty() {
        for issue in &issues {
            eprintln!("  - {issue}");
        }
        return Err(CliError::Validation(issues.len()));
    }

    if let Some(fields) = &args.s3_partition_fields {
        config.s3_partition_fields = fields
            .split(',')
            .map(str::trim)
            .filter(|field| !field.is_empty())
            .map(str::to_string)
            .collect();
    }

    let options = GenerateOptions {
        num_records: args.num_records,
        seed: args.seed,
        base_dir,
        ..GenerateOptions::default()
    };

    let engine = GenerationEngine::new(options);
    let result = engine.run(&config)?;

    let topic = config.topic.as_deref().unwrap_or("output");
    let output_path = args
        .output
        .unwrap_or_else(|| PathBuf::from(format!("{topic}.json")));
    let output_type = args.output_type.unwrap_or_else(|| infer_type(&output_path));

    let bytes = match output_type {
        OutputType::Json => output::write_records_json(&output_path, &result.records)?,
        OutputType::Csv => output::write_records_csv(&output_path, &result.records)?,
    };

    println!(
        "Generated {} records for topic '{}' in {} (type: {:?}, {} bytes)",
        result.records.len(),
        topic,
        output_path.display(),
        output_type,
        bytes
    );
    Ok(())
}

fn validate(args: ValidateArgs) -> Result<(), CliError> {
    let base_dir = config_base_dir(&args.config);
    let config = load_config(&args.config)?;
    let issues = validate_config(&config, &base_dir);

    if issues.is_empty() {
        println!("{} is valid.", args.config.display());
        Ok(())
    } else {
        println!("Validation failed for {}:", args.config.display());
        for issue in &issues {
            println!("  - {issue}");
        }
        Err(CliError::Validation(issues.len()))
    }
}

fn config_base_dir(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn infer_type(path: &Path) -> OutputType {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("csv") => OutputType::Csv,
        _ => OutputType::Json,
    }
}
