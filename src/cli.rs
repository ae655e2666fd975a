//! Command-line interface implementation for stemplate.
//! Provides argument parsing and validation using clap.

use clap::{error::ErrorKind, CommandFactory, Parser};
use std::path::{Path, PathBuf};

use crate::constants::DEFAULT_EXTENSION;
use crate::dictionary::{split_names, DictionarySources};
use crate::error::{Error, Result};
use crate::processor::split_sources;
use crate::projector::RenderOptions;

/// Command-line arguments structure for stemplate.
#[derive(Parser, Debug)]
#[command(
    name = "stemplate",
    author,
    version,
    about = "stemplate: simple template renderer for the shell",
    long_about = None
)]
pub struct Args {
    /// Template file, directory, or comma-separated list of files and directories
    #[arg(value_name = "TEMPLATE")]
    pub template: String,

    /// Send results to this file or directory instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// File that contains the data structure (JSON, YAML or TOML)
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Comma-separated list of environment variable names that contain strings
    #[arg(short, long, value_name = "NAMES")]
    pub string: Option<String>,

    /// Comma-separated list of environment variable names that contain comma-separated strings
    #[arg(short, long, value_name = "NAMES")]
    pub list: Option<String>,

    /// Comma-separated list of environment variable names that contain
    /// comma-separated key=value pairs
    #[arg(short, long, value_name = "NAMES")]
    pub map: Option<String>,

    /// Extension of template files when the template input is a directory or a list
    #[arg(short = 't', long, default_value = DEFAULT_EXTENSION)]
    pub extension: String,

    /// Consider all files in a directory templates, regardless of extension
    #[arg(short, long)]
    pub all: bool,

    /// Import all environment variables for templates as strings
    #[arg(short, long)]
    pub env: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Checks the invocation before anything runs.
    ///
    /// # Errors
    /// * `Error::ArgumentError` if no data source is selected
    /// * `Error::SourceDoesNotExistError` if a template path or the config file is missing
    pub fn validate(&self) -> Result<()> {
        if self.sources().is_empty() {
            return Err(Error::ArgumentError(
                "at least one of --file, --string, --list, --env or --map is required".to_string(),
            ));
        }

        for item in split_sources(&self.template) {
            ensure_exists(Path::new(item))?;
        }

        if let Some(file) = &self.file {
            ensure_exists(file)?;
        }

        Ok(())
    }

    /// Data sources selected by the flags.
    pub fn sources(&self) -> DictionarySources {
        DictionarySources {
            env: self.env,
            file: self.file.clone(),
            strings: split_names(self.string.as_deref()),
            lists: split_names(self.list.as_deref()),
            maps: split_names(self.map.as_deref()),
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions::new(&self.extension, self.all)
    }
}

fn ensure_exists(path: &Path) -> Result<()> {
    std::fs::metadata(path).map(|_| ()).map_err(|_| Error::SourceDoesNotExistError {
        path: path.display().to_string(),
    })
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With status code 1 if required arguments are missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::MissingRequiredArgument {
                let _ = Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}
