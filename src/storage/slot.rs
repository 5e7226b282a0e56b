//! Single-file persistence slot
//!
//! The whole task list lives in one JSON file. Reads take a shared lock on
//! it. Writes take an exclusive lock on a `.lock` sidecar, go to a temp file
//! and are renamed over the slot, so readers never see a half-written list
//! and writers never interleave.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;

/// A named file holding the serialized task list
#[derive(Debug, Clone)]
pub struct Slot {
    path: PathBuf,
}

impl Slot {
    /// Creates a slot backed by the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of the slot file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the raw slot contents, or `None` if the slot was never written
    pub fn read(&self) -> Result<Option<String>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to open task file: {}", self.path.display()))
            }
        };

        file.lock_shared()
            .context("Failed to acquire read lock on task file")?;

        let mut contents = String::new();
        (&file)
            .read_to_string(&mut contents)
            .with_context(|| format!("Failed to read task file: {}", self.path.display()))?;

        // Lock is released when file is dropped
        Ok(Some(contents))
    }

    /// Replaces the slot contents
    ///
    /// Writers hold an exclusive lock on `<name>.lock` from before the temp
    /// file is created until after the rename, so concurrent writers take
    /// turns and never share a temp file.
    pub fn write(&self, contents: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
        }

        let lock_path = self.sibling(".lock");
        let lock = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("Failed to open lock file: {}", lock_path.display()))?;
        lock.lock_exclusive()
            .context("Failed to acquire write lock on task file")?;

        let temp_path = self.sibling(".tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            let mut writer = BufWriter::new(&file);
            writer
                .write_all(contents.as_bytes())
                .context("Failed to write tasks")?;
            writer.flush().context("Failed to flush task file")?;
        }

        fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                self.path.display()
            )
        })?;

        // Lock is released when `lock` is dropped
        Ok(())
    }

    /// Copies the current slot file aside as `<name>.corrupt`
    pub fn quarantine(&self) -> Result<PathBuf> {
        let backup = self.sibling(".corrupt");
        fs::copy(&self.path, &backup).with_context(|| {
            format!(
                "Failed to copy {} to {}",
                self.path.display(),
                backup.display()
            )
        })?;
        Ok(backup)
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| OsString::from("tasks.json"));
        name.push(suffix);
        self.path.with_file_name(name)
    }
}
