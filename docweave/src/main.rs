//! docweave - edit Word documents as HTML markup
//!
//! A CLI front end for the import, export, and save stages of the editor.

#![deny(unsafe_code)]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::all))]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::pedantic))]
#![allow(clippy::module_name_repetitions)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use docweave::config::{EditorConfig, CONFIG_FILE_NAME};
use docweave::orchestrator::{validate_extension, DirectoryTarget, MemorySurface, Orchestrator};
use docweave::transcoder::ExportReport;
use docweave::{
    writer_for, BinaryToMarkup, ConversionError, DocxMarkupConverter, ExportTranscoder, MarkupTree,
};
use std::path::{Path, PathBuf};

/// Main entry point for the docweave CLI application
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
}

/// Run the CLI application
fn run() -> Result<()> {
    let cli = Cli::parse();

    // Import warnings are shown unless RUST_LOG says otherwise
    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.verbose {
        logger.filter_level(log::LevelFilter::Info);
    }
    logger.init();

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Import { input, output } => {
            handle_import_command(&config, &input, output.as_deref())?;
        }

        Commands::Export {
            input,
            output,
            engine,
            walk,
        } => {
            let mut config = config;
            if let Some(engine) = engine {
                config.engine = engine;
            }
            if let Some(walk) = walk {
                config.walk = walk;
            }
            handle_export_command(&config, &input, output, cli.verbose)?;
        }

        Commands::Inspect { input, walk } => {
            let transcoder = ExportTranscoder::new(walk.unwrap_or(config.walk));
            handle_inspect_command(transcoder, &input)?;
        }

        Commands::Edit { input, markup, dir } => {
            handle_edit_command(config, &input, markup.as_deref(), dir)?;
        }
    }

    Ok(())
}

/// Load the configuration from `--config`, or ./docweave.toml when present
fn load_config(path: Option<&Path>) -> Result<EditorConfig> {
    match path {
        Some(path) => EditorConfig::load(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => EditorConfig::load_or_default(".")
            .with_context(|| format!("Failed to load {}", CONFIG_FILE_NAME)),
    }
}

/// Handle the import command
fn handle_import_command(config: &EditorConfig, input: &Path, output: Option<&Path>) -> Result<()> {
    validate_extension(&display_name(input), &config.accepted_extensions)?;

    let bytes =
        std::fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;

    let conversion = DocxMarkupConverter
        .convert(&bytes)
        .with_context(|| format!("Failed to import {}", input.display()))?;

    for message in &conversion.messages {
        log::warn!("{}", message);
    }

    match output {
        Some(path) => {
            std::fs::write(path, &conversion.markup)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("✓ Successfully wrote: {}", path.display());
        }
        None => println!("{}", conversion.markup),
    }

    Ok(())
}

/// Handle the export command
fn handle_export_command(
    config: &EditorConfig,
    input: &Path,
    output: Option<PathBuf>,
    verbose: bool,
) -> Result<()> {
    let output = output.unwrap_or_else(|| PathBuf::from(&config.output_filename));

    println!("Exporting markup...");
    println!("Input: {}", input.display());
    println!("Output: {}", output.display());

    // Stage 1: Markup to structured document
    let transcoder = ExportTranscoder::new(config.walk);
    println!(
        "\n[Stage 1/2] Transcoding markup ({:?} walk)...",
        transcoder.walk_mode()
    );
    let report = transcoder.transcode(&read_markup_tree(input)?);

    println!("✓ Built {} paragraphs", report.document.len());
    print_dropped(&report);
    if verbose {
        println!("  - {} headings", report.document.heading_count());
        println!("  - {} words", report.document.word_count());
    }

    // Stage 2: Structured document to .docx
    println!("\n[Stage 2/2] Writing DOCX ({:?} engine)...", config.engine);
    let bytes = writer_for(config.engine)
        .serialize(&report.document)
        .context("Failed to generate the document")?;

    std::fs::write(&output, &bytes)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("✓ Successfully wrote: {}", output.display());

    Ok(())
}

/// Handle the inspect command
fn handle_inspect_command(transcoder: ExportTranscoder, input: &Path) -> Result<()> {
    let report = transcoder.transcode(&read_markup_tree(input)?);

    let rendered = toml::to_string_pretty(&report.document)
        .context("Failed to render the structured document")?;
    println!("{}", rendered);

    println!(
        "# {} paragraphs, {} headings, {} words",
        report.document.len(),
        report.document.heading_count(),
        report.document.word_count()
    );
    print_dropped(&report);

    Ok(())
}

/// Handle the edit command
fn handle_edit_command(
    config: EditorConfig,
    input: &Path,
    markup: Option<&Path>,
    dir: PathBuf,
) -> Result<()> {
    let bytes =
        std::fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;

    let mut orchestrator = Orchestrator::new(MemorySurface::new(), DirectoryTarget::new(dir), config);

    // The orchestrator has already reported the failure in full
    orchestrator
        .on_file_acquired(&display_name(input), &bytes)
        .map_err(|_| anyhow::anyhow!("Could not load {}", input.display()))?;
    println!("✓ Loaded {}", input.display());

    if let Some(path) = markup {
        let edited = read_markup_text(path)?;
        orchestrator.surface_mut().edit(&edited);
        println!("✓ Applied edits from {}", path.display());
    }

    let summary = orchestrator
        .on_export_requested()
        .map_err(|_| anyhow::anyhow!("Could not save the edited document"))?;

    println!(
        "✓ Saved {} paragraphs ({} bytes) to {}",
        summary.paragraphs,
        summary.bytes_written,
        summary.path.display()
    );
    if !summary.dropped.is_empty() {
        println!("  - {} unsupported nodes left out", summary.dropped.len());
    }

    Ok(())
}

/// Read and parse a markup file
fn read_markup_tree(path: &Path) -> Result<MarkupTree> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    MarkupTree::parse_bytes(&bytes)
        .with_context(|| format!("Failed to parse markup in {}", path.display()))
}

/// Read a markup file as text, rejecting invalid UTF-8
fn read_markup_text(path: &Path) -> Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let text = std::str::from_utf8(&bytes)
        .map_err(ConversionError::from)
        .with_context(|| format!("Failed to parse markup in {}", path.display()))?;
    Ok(text.to_string())
}

/// File name used for extension checks and messages
fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned())
}

/// Print the per-tag count of dropped nodes
fn print_dropped(report: &ExportReport) {
    for (tag, count) in report.dropped_counts() {
        println!("  - dropped {} <{}> node(s)", count, tag);
    }
}
