//! finstyle CLI - house-style formatter for DOCX financial reports

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;

use finstyle::detect::has_docx_extension;
use finstyle::process::{collect_docx_files, process_batch};
use finstyle::{
    default_output_path, process_document, validate_output, Error, ProcessOptions, StyleConfig,
};

#[derive(Parser)]
#[command(name = "finstyle")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Apply the house style to DOCX financial reports", long_about = None)]
struct Cli {
    /// Input .docx file
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output file (default: <name>_processed.docx next to the input)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Validate the formatted document
    #[arg(long)]
    validate: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a document without changing it
    Check {
        /// Input .docx file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print issues as JSON
        #[arg(long)]
        json: bool,
    },

    /// Format every .docx file in a directory
    Batch {
        /// Input directory
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Output directory (default: next to each input)
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Validate each formatted document
        #[arg(long)]
        validate: bool,
    },

    /// Print the house style settings
    Config,

    /// Show version information
    Version,
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {:<9} - {}",
                chrono::Local::now().format("%H:%M:%S"),
                format!("[{}]", record.level()),
                record.args()
            )
        })
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Check { input, json }) => cmd_check(&input, json),
        Some(Commands::Batch {
            dir,
            output_dir,
            validate,
        }) => cmd_batch(&dir, output_dir.as_deref(), validate),
        Some(Commands::Config) => cmd_config(),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            if let Some(input) = cli.input {
                cmd_process(&input, cli.output.as_deref(), cli.validate)
            } else {
                println!(
                    "{}",
                    "Usage: finstyle -i <FILE> [-o <OUTPUT>] [--validate]".yellow()
                );
                println!("       finstyle --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_process(
    input: &Path,
    output: Option<&Path>,
    validate: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !has_docx_extension(input) {
        return Err(Error::InvalidExtension(input.to_path_buf()).into());
    }

    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_path(input));
    let options = ProcessOptions::new().with_validation(validate);
    let outcome = process_document(input, &output, &options)?;

    if outcome.passed() {
        if let Some(path) = &outcome.output {
            println!("{} {}", "Saved to".green(), path.display());
        }
    } else {
        println!(
            "{} {} issues found",
            "Validation failed:".yellow().bold(),
            outcome.issues.len()
        );
        if let Some(path) = &outcome.output {
            println!("  {} {}", "├─".dimmed(), path.display());
        }
        if let Some(path) = &outcome.issues_path {
            println!("  {} {}", "└─".dimmed(), path.display());
        }
    }

    Ok(())
}

fn cmd_check(input: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let issues = validate_output(input);

    if json {
        println!("{}", serde_json::to_string_pretty(&issues)?);
    } else if issues.is_empty() {
        println!("{} {}", "PASS".green().bold(), input.display());
    } else {
        println!("{} {}", "FAIL".red().bold(), input.display());
        for issue in &issues {
            println!("  - {}", issue);
        }
    }

    if !issues.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}

fn cmd_batch(
    dir: &Path,
    output_dir: Option<&Path>,
    validate: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let files = collect_docx_files(dir)?;
    if files.is_empty() {
        println!("{} {}", "No .docx files found in".yellow(), dir.display());
        return Ok(());
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let options = ProcessOptions::new().with_validation(validate);
    let results = process_batch(&files, output_dir, &options, |path, _| {
        pb.set_message(
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        );
        pb.inc(1);
    });
    pb.finish_with_message("Done!");

    let mut passed = 0;
    let mut with_issues = 0;
    let mut failed = Vec::new();
    for (path, result) in &results {
        match result {
            Ok(outcome) if outcome.passed() => passed += 1,
            Ok(_) => with_issues += 1,
            Err(e) => failed.push((path, e)),
        }
    }

    println!("\n{}", "Summary".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Formatted".bold(), passed);
    println!("{}: {}", "With issues".bold(), with_issues);
    println!("{}: {}", "Failed".bold(), failed.len());
    for (path, e) in &failed {
        println!("  {} {}: {}", "✗".red(), path.display(), e);
    }

    if !failed.is_empty() {
        return Err(format!("{} of {} files failed", failed.len(), results.len()).into());
    }
    Ok(())
}

fn cmd_config() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(&StyleConfig::house())?);
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "finstyle".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("House-style formatter for DOCX financial reports");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/finstyle".dimmed());
    println!("License: MIT");
}
