//! Whole-file output through a temporary sibling and rename.
//!
//! Readers of the target path observe either the previous contents or the
//! complete new output, never a partially written file.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};

use camino::{Utf8Component, Utf8Path};
use cap_std::ambient_authority;
use cap_std::fs::{Dir, OpenOptions};

use crate::error::SinkError;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Writes `contents` to `path` inside `dir` atomically.
///
/// `path` must name a single file directly inside `dir`.
///
/// # Errors
///
/// Returns [`SinkError`] if the path is not a plain file name or any step of
/// the write fails. The temporary file is removed on failure.
///
/// # Example
///
/// ```no_run
/// use camino::Utf8Path;
/// use cap_std::{ambient_authority, fs::Dir};
/// use testdata::write_atomic;
///
/// let dir = Dir::open_ambient_dir("target", ambient_authority()).expect("open dir");
/// write_atomic(&dir, Utf8Path::new("persons.jsonl"), b"{}\n").expect("write output");
/// ```
pub fn write_atomic(dir: &Dir, path: &Utf8Path, contents: &[u8]) -> Result<(), SinkError> {
    let mut components = path.components();
    let (Some(Utf8Component::Normal(file_name)), None) = (components.next(), components.next())
    else {
        return Err(SinkError::new(format!(
            "output path '{path}' must be a file name"
        )));
    };

    let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let tmp_name = format!(".{file_name}.{}.{counter}.tmp", std::process::id());

    if let Err(err) = write_temp(dir, &tmp_name, contents) {
        discard(dir, &tmp_name);
        return Err(write_failed(path, &err));
    }
    if let Err(err) = replace(dir, &tmp_name, file_name) {
        discard(dir, &tmp_name);
        return Err(write_failed(path, &err));
    }
    if dir.open(".").and_then(|handle| handle.sync_all()).is_err() {
        // Directory sync is best effort.
    }
    Ok(())
}

/// Writes `contents` atomically to `target`, or to standard output when no
/// target is given.
///
/// # Errors
///
/// Returns [`SinkError`] if the parent directory cannot be opened or the
/// write fails.
pub fn write_output(target: Option<&Utf8Path>, contents: &[u8]) -> Result<(), SinkError> {
    target.map_or_else(
        || write_stdout(contents),
        |path| {
            let (dir, file_name) =
                open_parent(path).map_err(|err| write_failed(path, &err))?;
            write_atomic(&dir, Utf8Path::new(file_name), contents)
        },
    )
}

/// Opens the directory containing `path` and returns it with the file name.
pub(crate) fn open_parent(path: &Utf8Path) -> io::Result<(Dir, &str)> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("'{path}' has no file name"),
        )
    })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}

fn write_stdout(contents: &[u8]) -> Result<(), SinkError> {
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(contents)
        .and_then(|()| stdout.flush())
        .map_err(|err| SinkError::new(format!("failed to write to stdout: {err}")))
}

fn write_temp(dir: &Dir, tmp_name: &str, contents: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = dir.open_with(tmp_name, &options)?;
    file.write_all(contents)?;
    file.sync_all()
}

#[cfg(windows)]
fn replace(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    match dir.remove_file(target_name) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    dir.rename(tmp_name, dir, target_name)
}

#[cfg(not(windows))]
fn replace(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    dir.rename(tmp_name, dir, target_name)
}

fn discard(dir: &Dir, tmp_name: &str) {
    if dir.remove_file(tmp_name).is_err() {
        // Nothing left to clean up.
    }
}

fn write_failed(path: &Utf8Path, err: &io::Error) -> SinkError {
    SinkError::new(format!("failed to write '{path}': {err}"))
}
