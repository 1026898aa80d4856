//! pdfair CLI - tagged output and fidelity evaluation from layout analysis

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfair::eval::evaluate_extracted_page;
use pdfair::layout::RawHeaderDetections;
use pdfair::metadata::read_native;
use pdfair::{
    CommandConverter, EvalOptions, JsonHeaderDetections, JsonLayoutFile, MetadataCatalog,
    MissDirection, PageSelection, Pdfair, PdfairResult, Pdftotext, RmlConverter, RunMode,
};

#[derive(Parser)]
#[command(name = "pdfair")]
#[command(version)]
#[command(about = "Build tagged HTML/PDF from layout analysis and score text fidelity", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a tagged PDF through RML
    Tag {
        #[command(flatten)]
        source: SourceArgs,

        /// Output PDF file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Write the RML here and skip conversion
        #[arg(long, value_name = "FILE")]
        rml: Option<PathBuf>,

        /// RML to PDF converter program
        #[arg(long, value_name = "PROG", default_value = "rml2pdf", env = "PDFAIR_CONVERTER")]
        converter: PathBuf,
    },

    /// Render accessible XHTML
    Html {
        #[command(flatten)]
        source: SourceArgs,

        /// Output HTML file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Compare generated text with pdftotext output, page by page
    #[command(alias = "eval")]
    Evaluate {
        /// Input PDF file
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Exported layout analysis (JSON)
        #[arg(long, value_name = "FILE")]
        layout: PathBuf,

        /// Precomputed header detections (JSON)
        #[arg(long, value_name = "FILE")]
        headers: Option<PathBuf>,

        /// Raw header-model output rows to post-process (JSON)
        #[arg(long, value_name = "FILE", conflicts_with = "headers")]
        raw_headers: Option<PathBuf>,

        /// N-gram window size
        #[arg(short, default_value = "4")]
        n: usize,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,

        /// Which side's n-grams are scored
        #[arg(long, value_enum, default_value = "both")]
        direction: Direction,

        /// Directory for the per-page visual diffs
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// pdftotext executable
        #[arg(long, value_name = "PROG", default_value = "pdftotext")]
        pdftotext: PathBuf,
    },

    /// Show embedded document metadata
    Info {
        /// Input PDF file
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

/// Arguments shared by the rendering commands.
#[derive(clap::Args)]
struct SourceArgs {
    /// Input PDF file
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    /// Exported layout analysis (JSON)
    #[arg(long, value_name = "FILE")]
    layout: PathBuf,

    /// Do not prompt; missing metadata becomes "Undefined"
    #[arg(short, long)]
    force: bool,

    /// Metadata catalog (CSV)
    #[arg(long, value_name = "FILE")]
    catalog: Option<PathBuf>,

    /// Catalog row id (defaults to the input file stem)
    #[arg(long, requires = "catalog")]
    id: Option<String>,

    /// Document language
    #[arg(long, default_value = "nl-NL")]
    lang: String,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Direction {
    /// Score generated n-grams against the reference
    Generated,
    /// Score reference n-grams against the generated text
    Reference,
    /// Score both sides
    Both,
}

impl From<Direction> for MissDirection {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Generated => MissDirection::GeneratedAgainstReference,
            Direction::Reference => MissDirection::ReferenceAgainstGenerated,
            Direction::Both => MissDirection::Both,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Tag {
            source,
            output,
            rml,
            converter,
        } => cmd_tag(&source, &output, rml.as_deref(), &converter),
        Commands::Html { source, output } => cmd_html(&source, output.as_deref()),
        Commands::Evaluate {
            input,
            layout,
            headers,
            raw_headers,
            n,
            pages,
            direction,
            output,
            pdftotext,
        } => cmd_evaluate(
            &input,
            &layout,
            headers.as_deref(),
            raw_headers.as_deref(),
            n,
            pages.as_deref(),
            direction,
            output.as_deref(),
            &pdftotext,
        ),
        Commands::Info { input } => cmd_info(&input),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn assemble(source: &SourceArgs) -> Result<PdfairResult, Box<dyn std::error::Error>> {
    let mut builder = Pdfair::new()
        .with_mode(RunMode::from_force_flag(source.force))
        .with_language(&source.lang);

    if let Some(path) = &source.catalog {
        let catalog = MetadataCatalog::from_csv(path)?;
        let id = match &source.id {
            Some(id) => id.clone(),
            None => source
                .input
                .file_stem()
                .unwrap_or_default()
                .to_string_lossy()
                .into_owned(),
        };
        match catalog.get(&id) {
            Some(row) => builder = builder.with_metadata(row.clone()),
            None => log::warn!("{}: no catalog row with id {}", path.display(), id),
        }
    }

    Ok(builder.assemble(&source.input, &JsonLayoutFile::new(&source.layout))?)
}

fn cmd_tag(
    source: &SourceArgs,
    output: &Path,
    rml: Option<&Path>,
    converter: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = assemble(source)?;
    let render = result.to_rml_with_stats()?;

    if let Some(path) = rml {
        fs::write(path, &render.content)?;
        println!("{} {}", "Saved RML to".green(), path.display());
    } else {
        CommandConverter::new(converter).convert(&render.content, output)?;
        println!("{} {}", "Saved to".green(), output.display());
    }

    let stats = &render.stats;
    println!(
        "{} pages, {} frames, {} blocks, {} unhandled",
        stats.page_count,
        stats.frame_count,
        stats.block_count(),
        stats.unhandled_count()
    );
    for (category, count) in &stats.unhandled {
        println!("  {} {} x{}", "└─".dimmed(), category.yellow(), count);
    }

    Ok(())
}

fn cmd_html(source: &SourceArgs, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let html = assemble(source)?.to_html()?;

    if let Some(path) = output {
        fs::write(path, &html)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", html);
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_evaluate(
    input: &Path,
    layout: &Path,
    headers: Option<&Path>,
    raw_headers: Option<&Path>,
    n: usize,
    pages: Option<&str>,
    direction: Direction,
    output: Option<&Path>,
    pdftotext: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let page_selection = if let Some(p) = pages {
        PageSelection::parse(p)?
    } else {
        PageSelection::All
    };

    let mut builder = Pdfair::new().forced();
    if let Some(path) = headers {
        builder = builder.with_header_detector(JsonHeaderDetections::open(path)?);
    } else if let Some(path) = raw_headers {
        builder = builder.with_header_detector(RawHeaderDetections::open(path)?);
    }
    let result = builder.assemble(input, &JsonLayoutFile::new(layout))?;
    let doc = result.document();

    let options = EvalOptions::new()
        .with_window(n)
        .with_direction(direction.into())
        .with_pages(page_selection.clone());

    let output_dir = output.map(|p| p.to_path_buf()).unwrap_or_else(|| {
        let stem = input.file_stem().unwrap_or_default().to_string_lossy();
        PathBuf::from(format!("{}_eval", stem))
    });
    fs::create_dir_all(&output_dir)?;

    let extractor = Pdftotext::new().with_program(pdftotext);
    let selected = page_selection.resolve(doc.page_count());

    let pb = ProgressBar::new(selected.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let mut rows = Vec::with_capacity(selected.len());
    for page in selected {
        pb.set_message(format!("page {}", page));
        let evaluation = evaluate_extracted_page(doc, input, page, &extractor, &options)?;

        let path = output_dir.join(format!("page_{:03}.html", page));
        fs::write(&path, evaluation.visualize(&doc.source)?)?;
        rows.push((
            page,
            evaluation.evaluation.coverage(),
            evaluation.evaluation.missing_generated.len() + evaluation.evaluation.missing_reference.len(),
        ));
        pb.inc(1);
    }
    pb.finish_with_message("Done!");

    println!("\n{}", "Coverage".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for (page, coverage, missing) in &rows {
        let pct = format!("{:5.1}%", coverage * 100.0);
        let pct = if *coverage >= 0.95 {
            pct.green()
        } else if *coverage >= 0.8 {
            pct.yellow()
        } else {
            pct.red()
        };
        println!("{} {:>4}: {}  {} missing n-grams", "Page".bold(), page, pct, missing);
    }
    if !rows.is_empty() {
        let mean = rows.iter().map(|(_, c, _)| c).sum::<f64>() / rows.len() as f64;
        println!("{}: {:.1}%", "Mean".bold(), mean * 100.0);
    }
    println!("\n{} {}", "Visual diffs in".green(), output_dir.display());

    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let native = read_native(input)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    let show = |label: &str, value: Option<&str>| {
        println!(
            "{}: {}",
            label.bold(),
            value.map(|v| v.normal()).unwrap_or_else(|| "(absent)".dimmed())
        );
    };
    show("Title", native.title.as_deref());
    show("Author", native.author.as_deref());
    show("Subject", native.subject.as_deref());
    show("Creator", native.creator.as_deref());
    show("Producer", native.producer.as_deref());
    show("Created", native.creation_date.as_deref());
    let modified = native.modification_date.map(|d| d.to_rfc3339());
    show("Modified", modified.as_deref());

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdfair".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Tagged HTML/PDF from layout analysis, with text-fidelity evaluation");
    println!();
    println!("License: MIT");
}
