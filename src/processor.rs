//! Tree rendering.
//! Walks every source root, asks the [`Projector`] what to do with each
//! entry and performs the resulting file operation. The first failure stops
//! the whole run; output already written stays in place.

use log::debug;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::{
    constants::LIST_SEPARATOR,
    dictionary::Dictionary,
    error::{Error, Result},
    projector::{Action, Projector, Target},
    renderer::TemplateRenderer,
    walk::{walk, WalkEntry},
};

fn create_dir_all(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(Error::IoError)
}

fn create_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => create_dir_all(parent),
        _ => Ok(()),
    }
}

/// Creates `dest` with the permission bits of the `source` directory.
///
/// A directory that already exists keeps its permissions.
fn make_dir(source: &Path, dest: &Path) -> Result<()> {
    if dest.is_dir() {
        return Ok(());
    }
    create_dir_all(dest)?;
    let permissions = fs::metadata(source).map_err(Error::IoError)?.permissions();
    fs::set_permissions(dest, permissions).map_err(Error::IoError)
}

/// Copies content and permission bits.
fn copy_file(source: &Path, dest: &Path) -> Result<()> {
    create_parent(dest)?;
    fs::copy(source, dest).map(|_| ()).map_err(Error::IoError)
}

/// Splits the source argument into the roots to walk.
pub fn split_sources(source: &str) -> impl Iterator<Item = &str> {
    source.split(LIST_SEPARATOR)
}

pub struct Processor<'a> {
    renderer: &'a dyn TemplateRenderer,
    dictionary: &'a Dictionary,
    projector: &'a Projector,
}

impl<'a> Processor<'a> {
    pub fn new(
        renderer: &'a dyn TemplateRenderer,
        dictionary: &'a Dictionary,
        projector: &'a Projector,
    ) -> Self {
        Self { renderer, dictionary, projector }
    }

    /// Processes every comma-separated root of `source` in order.
    ///
    /// Anything projected to standard output is written to `stdout`.
    /// Output already written to `stdout` is flushed even when a root fails.
    pub fn run<W: Write>(&self, source: &str, stdout: &mut W) -> Result<()> {
        let result = split_sources(source).try_for_each(|root| {
            debug!("Processing source root '{}'", root);
            self.process_root(Path::new(root), stdout)
        });
        stdout.flush().map_err(Error::IoError)?;
        result
    }

    fn process_root<W: Write>(&self, root: &Path, stdout: &mut W) -> Result<()> {
        for entry in walk(root) {
            let entry = entry?;
            let action = self.projector.project(&entry);
            debug!("{} -> {:?}", entry.path.display(), action);
            self.apply(&entry, action, stdout)?;
        }
        Ok(())
    }

    /// Performs one projected action.
    pub fn apply<W: Write>(&self, entry: &WalkEntry, action: Action, stdout: &mut W) -> Result<()> {
        match action {
            Action::Skip => Ok(()),
            Action::MakeDir(path) => make_dir(&entry.path, &path),
            Action::CopyVerbatim(Target::Stdout) => {
                let content = fs::read(&entry.path).map_err(Error::IoError)?;
                stdout.write_all(&content).map_err(Error::IoError)
            }
            Action::CopyVerbatim(Target::Path(dest)) => copy_file(&entry.path, &dest),
            Action::Render(Target::Stdout) => self.render(entry, stdout),
            Action::Render(Target::Path(dest)) => {
                create_parent(&dest)?;
                let mut out = BufWriter::new(File::create(&dest).map_err(Error::IoError)?);
                self.render(entry, &mut out)?;
                out.flush().map_err(Error::IoError)
            }
        }
    }

    fn render<W: Write>(&self, entry: &WalkEntry, out: &mut W) -> Result<()> {
        let template = fs::read_to_string(&entry.path).map_err(Error::IoError)?;
        let name = entry
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| entry.path.display().to_string());
        self.renderer.render_to(&name, &template, self.dictionary, out)
    }
}
