//! pdfdump CLI - dump PDF text and embedded images to a directory

use std::error::Error as _;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfdump::options::{DEFAULT_INPUT, DEFAULT_OUTPUT_DIR};
use pdfdump::{
    ErrorKind, ExtractMode, ExtractOptions, Extraction, Extractor, LopdfBackend, Metadata,
    PdfBackend, Progress,
};

#[derive(Parser)]
#[command(name = "pdfdump")]
#[command(version)]
#[command(about = "Dump PDF text and embedded images to a directory", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_INPUT, global = true)]
    input: PathBuf,

    /// Output directory
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR, global = true)]
    output: PathBuf,

    /// Print only the run summary, as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract text and embedded images (default)
    Complete,

    /// Extract text only and print it
    Text,

    /// Show document information
    Info,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let options = ExtractOptions::new()
        .with_input(&cli.input)
        .with_output_dir(&cli.output);

    let result = match cli.command.unwrap_or(Commands::Complete) {
        Commands::Complete => cmd_complete(options, cli.json),
        Commands::Text => cmd_text(options.text_only(), cli.json),
        Commands::Info => cmd_info(&cli.input),
    };

    if let Err(e) = result {
        report_error(&e);
        std::process::exit(1);
    }
}

fn report_error(err: &pdfdump::Error) {
    match err.kind() {
        ErrorKind::NotFound => {
            eprintln!("{}", err.to_string().red());
        }
        ErrorKind::DependencyMissing => {
            eprintln!("{}: {}", "Error".red().bold(), err);
            eprintln!("Rebuild with image support: cargo install pdfdump-cli --features images");
            eprintln!("\nAlternatively, you can:");
            eprintln!("1. Install poppler: brew install poppler");
            eprintln!("2. Run: pdfimages <FILE> extracted/images/page");
            eprintln!("3. Or manually extract images from the PDF using a PDF viewer");
        }
        ErrorKind::Extraction => {
            eprintln!("{}: {}", "Error".red().bold(), err);
            let mut source = err.source();
            while let Some(cause) = source {
                eprintln!("  {} {}", "caused by:".dimmed(), cause);
                source = cause.source();
            }
        }
    }
}

fn print_metadata(metadata: &Metadata, with_details: bool) {
    println!("\n{}", "=== PDF METADATA ===".cyan().bold());
    println!("{}: {}", "Pages".bold(), metadata.page_count);
    if !with_details {
        return;
    }
    println!(
        "{}: {}",
        "Title".bold(),
        metadata.title.as_deref().unwrap_or("N/A")
    );
    println!(
        "{}: {}",
        "Author".bold(),
        metadata.author.as_deref().unwrap_or("N/A")
    );
}

fn page_bar(total: u32) -> ProgressBar {
    let pb = ProgressBar::new(u64::from(total));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb
}

/// Run the extractor, mirroring progress events on the console.
///
/// With `quiet` set nothing is printed, keeping stdout free for JSON.
fn run_extractor(options: ExtractOptions, quiet: bool) -> pdfdump::Result<Extraction> {
    let details = options.mode == ExtractMode::TextOnly;
    let mut bar: Option<ProgressBar> = None;

    let extraction = Extractor::new(options).run_with_progress(|event| match event {
        _ if quiet => {}
        Progress::Parsed { metadata } => {
            print_metadata(metadata, details);
            println!();
            bar = Some(page_bar(metadata.page_count));
        }
        Progress::PageStarted { page, total } => {
            if let Some(pb) = &bar {
                pb.set_position(u64::from(page - 1));
                pb.println(format!("Processing page {}/{}...", page, total));
            }
        }
        Progress::ImageWritten { path, .. } => {
            let line = format!("  {} {}", "Extracted image:".green(), path.display());
            match &bar {
                Some(pb) => pb.println(line),
                None => println!("{}", line),
            }
        }
        Progress::ImageSkipped { page, op_index, name } => {
            log::debug!("page {} op {}: image {} not resolved", page, op_index, name);
        }
    });

    if let Some(pb) = bar {
        pb.finish_and_clear();
    }

    extraction
}

fn print_json(extraction: &Extraction) -> pdfdump::Result<()> {
    println!("{}", extraction.summary.to_json()?);
    Ok(())
}

fn print_summary(extraction: &Extraction) {
    let summary = &extraction.summary;

    println!(
        "\n{} Text extracted and saved to: {}",
        "✅".green(),
        summary.text_path.display()
    );
    if let Some(ref dir) = summary.images_dir {
        println!("{} Images extracted to: {}", "✅".green(), dir.display());
    }

    println!("\n{}", "📋 Summary:".bold());
    println!("   - Pages processed: {}", summary.pages);
    println!("   - Text length: {} characters", summary.characters);
    if let Some(count) = summary.image_files {
        println!("   - Images found: {} files", count);
    }
}

fn cmd_complete(options: ExtractOptions, json: bool) -> pdfdump::Result<()> {
    if json {
        return print_json(&run_extractor(options, true)?);
    }

    println!("{}", "Reading PDF file...".cyan());
    let extraction = run_extractor(options, false)?;
    print_summary(&extraction);
    Ok(())
}

fn cmd_text(options: ExtractOptions, json: bool) -> pdfdump::Result<()> {
    if json {
        return print_json(&run_extractor(options, true)?);
    }

    println!("{}", "Reading PDF file...".cyan());
    let extraction = run_extractor(options, false)?;

    println!("\n{}", "=== EXTRACTED TEXT ===".cyan().bold());
    println!("---");
    println!("{}", extraction.result.text);
    println!("---");

    print_summary(&extraction);

    println!("\n{}", "📝 Note: Image extraction is not part of this command.".yellow());
    println!("   For images, you can:");
    println!("   1. Run: pdfdump complete");
    println!("   2. Use a PDF viewer to export images manually");
    println!("   3. Install poppler: brew install poppler (macOS)");
    println!("   4. Then run: pdfimages <FILE> extracted/images");

    Ok(())
}

fn cmd_info(input: &std::path::Path) -> pdfdump::Result<()> {
    let data = pdfdump::loader::load(input)?;
    let backend = LopdfBackend::load_bytes(&data)?;
    let metadata = backend.metadata();

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), metadata.pdf_version);
    println!("{}: {}", "Pages".bold(), metadata.page_count);
    println!(
        "{}: {}",
        "Encrypted".bold(),
        if metadata.encrypted { "Yes" } else { "No" }
    );

    let fields = [
        ("Title", &metadata.title),
        ("Author", &metadata.author),
        ("Subject", &metadata.subject),
        ("Keywords", &metadata.keywords),
        ("Creator", &metadata.creator),
        ("Producer", &metadata.producer),
    ];
    for (label, value) in fields {
        println!("{}: {}", label.bold(), value.as_deref().unwrap_or("N/A"));
    }
    if let Some(ref created) = metadata.created {
        println!("{}: {}", "Created".bold(), created);
    }
    if let Some(ref modified) = metadata.modified {
        println!("{}: {}", "Modified".bold(), modified);
    }

    Ok(())
}
