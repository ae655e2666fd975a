//! Mapping of source entries onto destination paths.
//!
//! How an entry is projected depends on one of four modes, fixed before the
//! walk starts:
//!
//! - `Stdout`: no output path, everything is written to standard output
//! - `FileToFile`: a single file rendered to a file, or into a directory
//! - `DirToDir`: the *contents* of one directory mirrored under the output
//! - `MultiToDir`: a list of paths mirrored under the output with their full
//!   given paths, so unrelated roots do not collide
//!
//! Whether a file is rendered or copied is decided by its extension; see
//! [`Projector::project`].

use log::debug;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::constants::DEFAULT_EXTENSION;
use crate::error::{Error, Result};
use crate::walk::WalkEntry;

/// Classification of the positional source argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// A single existing regular file
    File,
    /// A single existing directory
    Directory,
    /// A list of paths, or anything that does not stat as one path
    Compound,
}

impl SourceKind {
    /// Classifies the whole source argument as given, commas included.
    pub fn classify(argument: &str) -> Self {
        match fs::metadata(argument) {
            Ok(metadata) if metadata.is_dir() => SourceKind::Directory,
            Ok(_) => SourceKind::File,
            Err(_) => SourceKind::Compound,
        }
    }

    /// Directory and compound sources select files by extension.
    pub fn is_tree(&self) -> bool {
        !matches!(self, SourceKind::File)
    }
}

/// What the output path pointed to before anything was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationKind {
    Missing,
    File,
    Directory,
}

impl DestinationKind {
    pub fn inspect<P: AsRef<Path>>(path: P) -> Self {
        match fs::metadata(path) {
            Ok(metadata) if metadata.is_dir() => DestinationKind::Directory,
            Ok(_) => DestinationKind::File,
            Err(_) => DestinationKind::Missing,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectionMode {
    Stdout { source: SourceKind },
    FileToFile { output: PathBuf, into_directory: bool },
    DirToDir { output: PathBuf },
    MultiToDir { output: PathBuf },
}

impl ProjectionMode {
    /// Derives the mode from the source classification and the output, if any.
    ///
    /// # Errors
    /// * `Error::DestinationConflict` if a directory or compound source targets an existing file
    pub fn resolve(
        source: SourceKind,
        output: Option<&Path>,
        destination: DestinationKind,
    ) -> Result<Self> {
        let Some(output) = output else {
            return Ok(ProjectionMode::Stdout { source });
        };
        let output = output.to_path_buf();

        if source.is_tree() && destination == DestinationKind::File {
            return Err(Error::DestinationConflict { output: output.display().to_string() });
        }

        Ok(match source {
            SourceKind::File => ProjectionMode::FileToFile {
                output,
                into_directory: destination == DestinationKind::Directory,
            },
            SourceKind::Directory => ProjectionMode::DirToDir { output },
            SourceKind::Compound => ProjectionMode::MultiToDir { output },
        })
    }

    /// Resolves the mode and creates the output directory when the mode needs one.
    pub fn prepare(source: SourceKind, output: Option<&Path>) -> Result<Self> {
        let destination = output.map(DestinationKind::inspect).unwrap_or(DestinationKind::Missing);
        let mode = Self::resolve(source, output, destination)?;

        if let Some(output) = output {
            if source.is_tree() && destination == DestinationKind::Missing {
                debug!("Creating output directory {}", output.display());
                fs::create_dir_all(output).map_err(Error::IoError)?;
            }
        }

        Ok(mode)
    }
}

/// Where rendered or copied content goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Stdout,
    Path(PathBuf),
}

/// What to do with one walked entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Skip,
    MakeDir(PathBuf),
    CopyVerbatim(Target),
    Render(Target),
}

/// Options that decide which files are templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Extension marking template files, leading dot included
    pub extension: String,
    /// Render every file regardless of its extension
    pub process_all: bool,
}

impl RenderOptions {
    pub fn new<S: AsRef<str>>(extension: S, process_all: bool) -> Self {
        let extension = extension.as_ref();
        let extension = if extension.is_empty() || extension.starts_with('.') {
            extension.to_string()
        } else {
            format!(".{extension}")
        };
        Self { extension, process_all }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSION, false)
    }
}

/// Returns the extension of the last path element, leading dot included.
///
/// Unlike [`Path::extension`], a dot file such as `.template` counts as all extension.
pub fn file_extension(path: &Path) -> &str {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.rfind('.').map(|index| &name[index..]))
        .unwrap_or_default()
}

/// Joins `path` under `base`, dropping root and prefix components and never
/// climbing above `base`.
fn join_confined(base: &Path, path: &Path) -> PathBuf {
    let mut relative = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::ParentDir => {
                relative.pop();
            }
            _ => {}
        }
    }
    base.join(relative)
}

/// Computes an [`Action`] for every walked entry.
#[derive(Debug, Clone)]
pub struct Projector {
    mode: ProjectionMode,
    options: RenderOptions,
}

impl Projector {
    pub fn new(mode: ProjectionMode, options: RenderOptions) -> Self {
        Self { mode, options }
    }

    /// Projects one entry.
    ///
    /// In directory-like modes a file is rendered when its extension equals the
    /// configured one, and the extension is then dropped from the destination
    /// name. Other files are copied unless `process_all` is set, in which case
    /// they are rendered under their unchanged name. A single-file source is
    /// always rendered; only the suffix rule applies to it.
    pub fn project(&self, entry: &WalkEntry) -> Action {
        match &self.mode {
            ProjectionMode::Stdout { source } => {
                if entry.is_dir {
                    Action::Skip
                } else if source.is_tree() && !self.is_template(&entry.path) {
                    Action::CopyVerbatim(Target::Stdout)
                } else {
                    Action::Render(Target::Stdout)
                }
            }
            ProjectionMode::FileToFile { output, into_directory } => {
                if entry.is_dir {
                    return Action::Skip;
                }
                let destination = match (*into_directory, entry.path.file_name()) {
                    (true, Some(name)) => output.join(name),
                    _ => output.clone(),
                };
                Action::Render(Target::Path(self.strip_extension(destination)))
            }
            ProjectionMode::DirToDir { output } => {
                if entry.is_root() {
                    return Action::Skip;
                }
                self.place(entry, output.join(entry.relative_path()))
            }
            ProjectionMode::MultiToDir { output } => {
                self.place(entry, join_confined(output, &entry.path))
            }
        }
    }

    fn place(&self, entry: &WalkEntry, destination: PathBuf) -> Action {
        if entry.is_dir {
            Action::MakeDir(destination)
        } else if self.is_template(&destination) {
            Action::Render(Target::Path(self.strip_extension(destination)))
        } else {
            Action::CopyVerbatim(Target::Path(destination))
        }
    }

    fn is_template(&self, path: &Path) -> bool {
        self.options.process_all || file_extension(path) == self.options.extension
    }

    fn strip_extension(&self, path: PathBuf) -> PathBuf {
        if file_extension(&path) != self.options.extension {
            return path;
        }
        let stem = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name.strip_suffix(self.options.extension.as_str()))
            .map(str::to_string);
        match stem {
            Some(stem) => path.with_file_name(stem),
            None => path,
        }
    }
}
