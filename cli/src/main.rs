//! pdftoc CLI - PDF outline extraction tool

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdftoc::{batch, ExtractOptions, HeadingLevel};

mod serve;

#[derive(Parser)]
#[command(name = "pdftoc")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Extract a structured heading outline from PDF documents", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the outline of one PDF as JSON
    Extract {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,

        /// Maximum number of pages to read
        #[arg(long, value_name = "N")]
        max_pages: Option<u32>,

        /// Wall-clock budget in milliseconds; when it runs out the outline
        /// is built from the pages read so far
        #[arg(long, value_name = "MS")]
        time_budget_ms: Option<u64>,
    },

    /// Extract outlines for every PDF in a directory
    Batch {
        /// Directory containing *.pdf files
        #[arg(value_name = "INPUT_DIR")]
        input: PathBuf,

        /// Directory for the <stem>.json outputs
        #[arg(value_name = "OUTPUT_DIR")]
        output: PathBuf,

        /// Number of worker threads (rayon default when omitted)
        #[arg(short, long, value_name = "N")]
        jobs: Option<usize>,

        /// Maximum number of pages to read per file
        #[arg(long, value_name = "N")]
        max_pages: Option<u32>,

        /// Per-file wall-clock budget in milliseconds
        #[arg(long, value_name = "MS")]
        time_budget_ms: Option<u64>,
    },

    /// Run the HTTP extraction service
    Serve {
        /// Address to listen on
        #[arg(long, value_name = "ADDR", default_value = "0.0.0.0:8080")]
        addr: SocketAddr,
    },

    /// Show document information and font statistics
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Extract {
            input,
            output,
            pretty,
            max_pages,
            time_budget_ms,
        }) => cmd_extract(&input, output.as_deref(), pretty, max_pages, time_budget_ms),
        Some(Commands::Batch {
            input,
            output,
            jobs,
            max_pages,
            time_budget_ms,
        }) => cmd_batch(&input, &output, jobs, max_pages, time_budget_ms),
        Some(Commands::Serve { addr }) => cmd_serve(addr),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: extract if input is provided
            if let Some(input) = cli.input {
                cmd_extract(&input, None, true, None, None)
            } else {
                println!("{}", "Usage: pdftoc <FILE>".yellow());
                println!("       pdftoc --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn build_options(max_pages: Option<u32>, time_budget_ms: Option<u64>) -> ExtractOptions {
    let mut options = ExtractOptions::new();
    if let Some(pages) = max_pages {
        options = options.with_max_pages(pages);
    }
    if let Some(ms) = time_budget_ms {
        options = options.with_time_budget(Duration::from_millis(ms));
    }
    options
}

fn display_filename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from("document"))
}

fn cmd_extract(
    input: &Path,
    output: Option<&Path>,
    pretty: bool,
    max_pages: Option<u32>,
    time_budget_ms: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = build_options(max_pages, time_budget_ms);
    let data = fs::read(input)?;
    let filename = display_filename(input);
    let outline = pdftoc::extract_outline_with_options(&data, &filename, &options)?;

    let json = if pretty {
        serde_json::to_string_pretty(&outline)?
    } else {
        serde_json::to_string(&outline)?
    };

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_batch(
    input: &Path,
    output: &Path,
    jobs: Option<usize>,
    max_pages: Option<u32>,
    time_budget_ms: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = build_options(max_pages, time_budget_ms);
    fs::create_dir_all(output)?;

    let files = batch::pdf_files(input)?;
    if files.is_empty() {
        println!("{}", "No PDF files found".yellow());
        return Ok(());
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let run = || {
        batch::process_directory_with(input, &options, |outcome| {
            pb.set_message(display_filename(&outcome.path));
            pb.inc(1);
        })
    };
    let report = match jobs {
        Some(n) => rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build()?
            .install(run),
        None => run(),
    }?;

    pb.finish_with_message("Done!");

    for outcome in &report.outcomes {
        let stem = outcome.path.file_stem().unwrap_or_default().to_string_lossy();
        let json = serde_json::to_string_pretty(&outcome.outline)?;
        fs::write(output.join(format!("{}.json", stem)), json)?;
    }

    println!(
        "\n{} {} files in {:.1}s",
        "Processed".green().bold(),
        report.processed(),
        report.elapsed_ms / 1000.0
    );
    if report.recovered() > 0 {
        println!(
            "{} {} unreadable files got fallback outlines",
            "Note:".yellow().bold(),
            report.recovered()
        );
    }

    Ok(())
}

fn cmd_serve(addr: SocketAddr) -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(serve::run(addr))
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(input)?;
    let version = pdftoc::header_version(&data);
    let outline = pdftoc::extract_outline(&data, &display_filename(input))?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    if let Some(v) = version {
        println!("{}: PDF {}", "Format".bold(), v);
    }
    println!("{}: {}", "Pages".bold(), outline.metadata.total_pages);
    println!("{}: {}", "Title".bold(), outline.title);

    let h1 = count_level(&outline, HeadingLevel::H1);
    let h2 = count_level(&outline, HeadingLevel::H2);
    let h3 = count_level(&outline, HeadingLevel::H3);
    println!(
        "{}: {} (H1 {}, H2 {}, H3 {})",
        "Headings".bold(),
        outline.outline.len(),
        h1,
        h2,
        h3
    );
    if outline.metadata.truncated {
        println!("{}: yes", "Truncated".bold());
    }

    println!();
    println!("{}", "Font Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    for (name, profile) in &outline.metadata.font_metrics {
        println!(
            "  {:<28} {:>5} spans  avg {:>5.1}pt  range {:.1}-{:.1}pt",
            name, profile.count, profile.avg_size, profile.min_size, profile.max_size
        );
    }

    Ok(())
}

fn count_level(outline: &pdftoc::DocumentOutline, level: HeadingLevel) -> usize {
    outline.outline.iter().filter(|e| e.level == level).count()
}

fn cmd_version() {
    println!("{} {}", "pdftoc".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF outline extraction tool");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/pdftoc".dimmed());
    println!("License: MIT");
}
