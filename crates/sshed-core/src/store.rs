use std::cell::RefCell;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::{ConfigError, Result};

/// Where the config text lives between operations.
pub trait Store {
    /// Current text, or `None` when nothing has been written yet.
    fn load(&self) -> Result<Option<String>>;

    /// Replace the whole text.
    fn save(&self, text: &str) -> Result<()>;
}

/// A config file on disk.
///
/// Saves go through a sibling temp file that is renamed over the target.
/// The containing directory is created owner-only when missing, and a file
/// created from scratch is `0600`; an existing file keeps its permissions.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Copy the file to `<file>.backup.<timestamp>` next to it.
    pub fn backup(&self) -> Result<PathBuf> {
        if !self.path.exists() {
            return Err(ConfigError::NoConfigFile(self.path.clone()));
        }

        let stamp = Local::now().format("%Y%m%d-%H%M%S");
        let target = sibling(&self.path, &format!("backup.{stamp}"));
        fs::copy(&self.path, &target).map_err(|e| ConfigError::io(&self.path, e))?;
        Ok(target)
    }

    /// The file that actually gets replaced; a symlinked config is written
    /// through to its target.
    fn write_target(&self) -> PathBuf {
        fs::canonicalize(&self.path).unwrap_or_else(|_| self.path.clone())
    }
}

impl Store for FileStore {
    fn load(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ConfigError::io(&self.path, e)),
        }
    }

    fn save(&self, text: &str) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            create_private_dir(dir).map_err(|e| ConfigError::io(dir, e))?;
        }

        let target = self.write_target();
        let previous = fs::metadata(&target).ok().map(|m| m.permissions());
        let tmp = sibling(&target, "tmp");

        let written = fs::write(&tmp, text)
            .and_then(|()| apply_permissions(&tmp, previous))
            .and_then(|()| fs::rename(&tmp, &target));

        if let Err(e) = written {
            let _ = fs::remove_file(&tmp);
            return Err(ConfigError::io(&target, e));
        }
        Ok(())
    }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(|| OsString::from("config"), ToOwned::to_owned);
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    if dir.is_dir() {
        return Ok(());
    }
    fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}

fn apply_permissions(path: &Path, previous: Option<fs::Permissions>) -> io::Result<()> {
    match previous {
        Some(permissions) => fs::set_permissions(path, permissions),
        None => restrict_new_file(path),
    }
}

#[cfg(unix)]
fn restrict_new_file(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_new_file(_path: &Path) -> io::Result<()> {
    Ok(())
}

/// In-process store, handy for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    text: RefCell<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: RefCell::new(Some(text.into())),
        }
    }

    pub fn text(&self) -> Option<String> {
        self.text.borrow().clone()
    }
}

impl Store for MemoryStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.text())
    }

    fn save(&self, text: &str) -> Result<()> {
        *self.text.borrow_mut() = Some(text.to_string());
        Ok(())
    }
}
