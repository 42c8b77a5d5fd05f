//! Command-line interface definition.
//!
//! Each subcommand takes its input files plus the shared output options and
//! turns them into a validated [`Config`].

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use pdfdeck::config::{Command, Config, DEFAULT_ARCHIVE_NAME, OverwriteMode};
use pdfdeck::error::{PdfDeckError, Result};

/// Split, merge, preview and bundle PDF documents locally.
#[derive(Parser, Debug)]
#[command(name = "pdfdeck")]
#[command(version)]
#[command(about = "Split, merge, preview and bundle PDF documents locally", long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Operation to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available operations.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write one PDF per page of each input
    ///
    /// Pages are named `<input>_page_NN.pdf`, padded to at least two digits.
    Split(TransformArgs),

    /// Concatenate the inputs, in order, into `<first input>_merged.pdf`
    ///
    /// At least two inputs are required.
    Merge(TransformArgs),

    /// Bundle the inputs, unchanged, into one ZIP archive
    Zip(ZipArgs),
}

/// Options of `split` and `merge`.
#[derive(Args, Debug)]
pub struct TransformArgs {
    /// Input PDF files
    #[arg(required = true, value_name = "FILE")]
    pub inputs: Vec<PathBuf>,

    /// Bundle the results into a ZIP archive instead of separate files
    ///
    /// Without a name the archive is called pdf_pages.zip.
    #[arg(
        long,
        value_name = "NAME",
        num_args = 0..=1,
        default_missing_value = DEFAULT_ARCHIVE_NAME
    )]
    pub zip: Option<String>,

    /// Render a JPEG thumbnail of every result (needs the pdfium library)
    #[arg(short, long)]
    pub thumbnails: bool,

    /// Write manifest.json describing the results
    #[arg(short, long)]
    pub manifest: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Options of `zip`.
#[derive(Args, Debug)]
pub struct ZipArgs {
    /// Input PDF files
    #[arg(required = true, value_name = "FILE")]
    pub inputs: Vec<PathBuf>,

    /// Archive file name
    #[arg(short, long, value_name = "NAME", default_value = DEFAULT_ARCHIVE_NAME)]
    pub name: String,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Where results go and how much is printed.
#[derive(Args, Debug)]
pub struct OutputArgs {
    /// Directory receiving the results
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Overwrite existing files without prompting
    #[arg(short, long)]
    pub force: bool,

    /// Never overwrite existing files
    #[arg(long, conflicts_with = "force")]
    pub no_clobber: bool,

    /// Show details and debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl OutputArgs {
    fn overwrite_mode(&self) -> OverwriteMode {
        if self.force {
            OverwriteMode::Force
        } else if self.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Prompt
        }
    }
}

impl Cli {
    fn output(&self) -> &OutputArgs {
        match &self.command {
            Commands::Split(args) | Commands::Merge(args) => &args.output,
            Commands::Zip(args) => &args.output,
        }
    }

    /// Whether `--verbose` was given.
    pub fn verbose(&self) -> bool {
        self.output().verbose
    }

    /// Whether `--quiet` was given.
    pub fn quiet(&self) -> bool {
        self.output().quiet
    }

    /// Build and validate the run configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the combination of options is invalid.
    pub fn to_config(&self) -> Result<Config> {
        let (command, inputs, archive, thumbnails, manifest) = match &self.command {
            Commands::Split(args) => (
                Command::Split,
                &args.inputs,
                args.zip.clone(),
                args.thumbnails,
                args.manifest,
            ),
            Commands::Merge(args) => (
                Command::Merge,
                &args.inputs,
                args.zip.clone(),
                args.thumbnails,
                args.manifest,
            ),
            Commands::Zip(args) => (
                Command::Zip,
                &args.inputs,
                Some(args.name.clone()),
                false,
                false,
            ),
        };
        let output = self.output();

        let config = Config {
            command,
            inputs: inputs.clone(),
            output_dir: output.output_dir.clone(),
            archive: archive.map(|name| name.trim().to_string()),
            thumbnails,
            manifest,
            overwrite_mode: output.overwrite_mode(),
            verbose: output.verbose,
            quiet: output.quiet,
        };

        config.validate().map_err(|e| {
            PdfDeckError::invalid_config(format!("Configuration validation failed: {e}"))
        })?;
        Ok(config)
    }
}
