//! Error handling for stemplate.
//! Defines the error type and result alias used throughout the crate.

use std::io;
use std::num::ParseIntError;
use thiserror::Error;

/// Custom error types for stemplate operations.
///
/// Every failure is fatal for the current invocation: nothing is retried and
/// files written before the failure are left in place.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// Represents errors raised while walking a source tree
    #[error("Walk error: {0}.")]
    WalkError(#[from] walkdir::Error),

    /// Invalid invocation, detected before anything runs
    #[error("Argument error: {0}.")]
    ArgumentError(String),

    #[error("Source path '{path}' does not exist.")]
    SourceDoesNotExistError { path: String },

    /// The config file could not be decoded in its (possibly fallback) format
    #[error("Cannot decode config file '{path}': {reason}.")]
    ConfigDecodeError { path: String, reason: String },

    /// A map source item without an `=` separator
    #[error("Missing =. {name} does not contain a map: {item}")]
    MalformedMapEntry { name: String, item: String },

    #[error("Cannot convert input to number: {value}.")]
    UnrepresentableNumber { value: String },

    #[error("Cannot parse '{value}' as a number: {source}.")]
    NumberParseError {
        value: String,
        #[source]
        source: ParseIntError,
    },

    /// A string slice reaching outside its input
    #[error("Index out of range: {index} is beyond length {length}.")]
    IndexOutOfRange { index: u64, length: usize },

    /// A directory-like source targeting an existing regular file
    #[error("Cannot copy template folder into file '{output}'.")]
    DestinationConflict { output: String },

    /// Represents errors that occur during template parsing or rendering
    #[error("Template error: {0}.")]
    MinijinjaError(#[from] minijinja::Error),
}

/// Convenience type alias for Results with Error as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The Error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(1);
}
