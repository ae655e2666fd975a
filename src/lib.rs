//! stemplate renders text templates from environment variables and config
//! files. It renders a single file, a directory tree, or a list of files and
//! directories, deciding per file whether to render it or copy it verbatim.

/// Command-line interface module for stemplate
pub mod cli;

/// Config file decoding
/// Supports JSON, YAML and TOML, falling back to TOML
pub mod config;

/// Common constants
pub mod constants;

/// The merged substitution dictionary and its builder
pub mod dictionary;

/// Error types and handling for stemplate
pub mod error;

/// Helper functions registered on the template engine
pub mod functions;

/// Logging setup for the binary
pub mod logger;

/// Conversion of dictionary values into unsigned integers
pub mod normalize;

/// Walks source roots and performs the projected file operations
pub mod processor;

/// Source/destination classification and per-entry projection
pub mod projector;

/// Template parsing and rendering
pub mod renderer;

/// Dictionary value type
pub mod value;

/// Source tree traversal
pub mod walk;
