//! pdfdeck - Split, merge, preview and bundle PDF documents locally.

mod cli;

use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use pdfdeck::archive::{ArchiveEntry, ArchiveError, ArchivePackager};
use pdfdeck::config::{Command, Config, MANIFEST_FILE_NAME, OverwriteMode};
use pdfdeck::document::CandidateFile;
use pdfdeck::error::{ErrorKind, PdfDeckError};
use pdfdeck::io::{ArtifactWriter, PdfReader, WriteStatistics};
use pdfdeck::output::{
    Manifest, OutputFormatter, ProgressBar, ProgressStyle, display_document_info,
    display_memory_advisory, display_merge_statistics, display_write_statistics,
};
use pdfdeck::validation::Validator;
use pdfdeck::{Artifact, Outcome, Pipeline};

/// Exit status when an archive cannot be built.
const ARCHIVE_EXIT_CODE: i32 = 7;

/// Why a run failed.
#[derive(Debug, Error)]
enum CliError {
    /// A pipeline, input or output failure with its error kind.
    #[error(transparent)]
    Deck(#[from] PdfDeckError),

    /// Packaging failed. Shown as raised, without a kind or remedy.
    #[error(transparent)]
    Archive(#[from] ArchiveError),
}

impl CliError {
    fn exit_code(&self) -> i32 {
        match self {
            Self::Deck(err) => err.exit_code(),
            Self::Archive(_) => ARCHIVE_EXIT_CODE,
        }
    }

    fn report(&self, formatter: &OutputFormatter) {
        match self {
            Self::Deck(err) => formatter.failure(err),
            Self::Archive(err) => formatter.error(&err.to_string()),
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose(), cli.quiet());

    let formatter = OutputFormatter::new(cli.quiet(), cli.verbose());
    if let Err(err) = run(cli, &formatter).await {
        err.report(&formatter);
        process::exit(err.exit_code());
    }
}

fn init_tracing(verbose: bool, quiet: bool) {
    let default = if verbose {
        "pdfdeck=debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Main application logic.
async fn run(cli: Cli, formatter: &OutputFormatter) -> Result<(), CliError> {
    let config = cli.to_config()?;
    formatter.debug(&format!("{} v{}", pdfdeck::NAME, pdfdeck::VERSION));

    let pipeline_config = config.pipeline_config();
    let reader = PdfReader::with_limit(pipeline_config.limits.max_file_size);
    let pipeline = Pipeline::new(pipeline_config);

    if config.command == Command::Merge {
        check_merge_inputs(&reader, pipeline.validator(), &config.inputs).await?;
    }

    let candidates = reader.read_all(&config.inputs).await?;
    let sources: Vec<String> = candidates.iter().map(|c| c.name.clone()).collect();

    if config.command == Command::Zip {
        return bundle_inputs(&config, formatter, &candidates).await;
    }

    let mut outcomes = Vec::new();

    match config.command {
        Command::Merge => {
            let mut bar = progress_bar(&config, format!("Merging {} files", candidates.len()));
            let merged = pipeline.merge(candidates, &mut bar).await?;
            bar.finish();
            for advisory in &merged.memory_advisories {
                display_memory_advisory(formatter, "A merge input", advisory);
            }
            display_merge_statistics(formatter, &merged.statistics);
            outcomes.push(Outcome::Merge(merged));
        }
        _ => {
            for candidate in candidates {
                let mut bar = progress_bar(&config, format!("Splitting {}", candidate.name));
                let split = pipeline.split(candidate, &mut bar).await?;
                bar.finish();
                if let Some(advisory) = &split.memory_advisory {
                    display_memory_advisory(formatter, &split.source_name, advisory);
                }
                display_document_info(formatter, &split.info);
                formatter.info(&format!(
                    "Split {} into {} page(s)",
                    split.source_name,
                    split.pages.len()
                ));
                outcomes.push(Outcome::Split(split));
            }
        }
    }

    let artifacts: Vec<&dyn Artifact> = outcomes.iter().flat_map(Outcome::artifacts).collect();
    let missing_thumbnails = artifacts
        .iter()
        .filter(|a| a.thumbnail().is_empty())
        .count();
    if config.thumbnails && missing_thumbnails > 0 {
        formatter.warning(&format!(
            "{missing_thumbnails} thumbnail(s) could not be rendered"
        ));
    }

    let mut planned: Vec<String> = match &config.archive {
        Some(name) => vec![name.clone()],
        None => artifacts.iter().map(|a| a.file_name().to_string()).collect(),
    };
    if config.manifest {
        planned.push(MANIFEST_FILE_NAME.to_string());
    }
    let writer = prepare_writer(&config, formatter, &planned).await?;

    let mut written = Vec::new();
    match &config.archive {
        Some(name) => {
            let entries: Vec<_> = artifacts
                .iter()
                .map(|a| ArchiveEntry::from_artifact(*a))
                .collect();
            written.push(write_archive(&config, &writer, &entries, name).await?);
        }
        None => {
            formatter.section("Results");
            for artifact in &artifacts {
                formatter.debug(&format!("writing {}", artifact.file_name()));
                written.push(
                    writer
                        .write(&config.output_dir, artifact.file_name(), artifact.bytes())
                        .await?,
                );
            }
        }
    }

    if config.manifest {
        let mut manifest = Manifest::from_outcomes(&outcomes, sources);
        if let Some(name) = &config.archive {
            manifest = manifest.with_archive(name.as_str());
        }
        let json = manifest.to_json().map_err(|e| {
            PdfDeckError::classified(
                ErrorKind::ProcessingError,
                format!("Failed to encode manifest: {e}"),
            )
        })?;
        written.push(
            writer
                .write(&config.output_dir, MANIFEST_FILE_NAME, json.as_bytes())
                .await?,
        );
    }

    display_write_statistics(formatter, &written);
    Ok(())
}

/// Refuse a merge that cannot succeed before any input is read: fewer than
/// two inputs, or a combined on-disk size over the merge ceiling.
async fn check_merge_inputs(
    reader: &PdfReader,
    validator: &Validator,
    paths: &[PathBuf],
) -> Result<(), PdfDeckError> {
    if paths.len() < 2 {
        return Err(PdfDeckError::NotEnoughDocuments { count: paths.len() });
    }

    let mut sizes = Vec::with_capacity(paths.len());
    for path in paths {
        sizes.push(reader.probe(path).await?.size);
    }
    validator.check_merge_batch(sizes)
}

/// `zip` command: bundle the inputs as read.
async fn bundle_inputs(
    config: &Config,
    formatter: &OutputFormatter,
    candidates: &[CandidateFile],
) -> Result<(), CliError> {
    let name = config.archive.as_deref().unwrap_or_default();
    let writer = prepare_writer(config, formatter, &[name.to_string()]).await?;
    let entries: Vec<_> = candidates
        .iter()
        .map(|c| ArchiveEntry {
            name: &c.name,
            bytes: &c.bytes,
        })
        .collect();

    let stats = write_archive(config, &writer, &entries, name).await?;
    display_write_statistics(formatter, &[stats]);
    Ok(())
}

async fn write_archive(
    config: &Config,
    writer: &ArtifactWriter,
    entries: &[ArchiveEntry<'_>],
    name: &str,
) -> Result<WriteStatistics, CliError> {
    let archive = ArchivePackager::new().package_named(entries, Some(name))?;
    let stats = writer
        .write(&config.output_dir, &archive.name, &archive.bytes)
        .await?;
    Ok(stats)
}

fn progress_bar(config: &Config, message: String) -> ProgressBar {
    let mut bar = if config.should_print() {
        ProgressBar::new(ProgressStyle::Bar)
    } else {
        ProgressBar::disabled()
    };
    bar.set_message(message);
    bar
}

/// Create the output directory and pick a writer that may replace the
/// existing files among `planned` only if the user allowed it.
async fn prepare_writer(
    config: &Config,
    formatter: &OutputFormatter,
    planned: &[String],
) -> Result<ArtifactWriter, PdfDeckError> {
    let probe = ArtifactWriter::new();
    probe.ensure_dir(&config.output_dir).await?;
    let existing = probe
        .existing_outputs(&config.output_dir, planned.iter().map(String::as_str))
        .await;

    if handle_output_overwrite(config, formatter, existing)? {
        Ok(ArtifactWriter::overwriting())
    } else {
        Ok(probe)
    }
}

/// Decide what to do about output files that already exist.
///
/// Returns whether existing files may be replaced.
fn handle_output_overwrite(
    config: &Config,
    formatter: &OutputFormatter,
    existing: Vec<PathBuf>,
) -> Result<bool, PdfDeckError> {
    let Some(first) = existing.first().cloned() else {
        return Ok(false);
    };

    match config.overwrite_mode {
        OverwriteMode::Force => Ok(true),
        OverwriteMode::NoClobber => Err(PdfDeckError::OutputExists { path: first }),
        OverwriteMode::Prompt => {
            // Nobody to ask in quiet mode.
            if formatter.is_quiet() {
                return Err(PdfDeckError::OutputExists { path: first });
            }

            formatter.warning(&format!("{} output file(s) already exist:", existing.len()));
            for path in &existing {
                formatter.warning(&format!("  {}", path.display()));
            }
            print!("Overwrite? [y/N]: ");
            io::stdout().flush().ok();

            let mut response = String::new();
            io::stdin().read_line(&mut response)?;

            match response.trim().to_lowercase().as_str() {
                "y" | "yes" => Ok(true),
                _ => Err(PdfDeckError::Cancelled),
            }
        }
    }
}
