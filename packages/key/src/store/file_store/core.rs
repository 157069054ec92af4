//! Core Types for File-based Key Storage
//!
//! A [`FileKeyStore`] starts uninitialized and is bound to a directory and an
//! optional password exactly once by [`FileKeyStore::init`].

use crate::{KeyError, Result};
use parking_lot::RwLock;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use zeroize::Zeroizing;

/// Largest file, in bytes, the fallback scan will read
pub const FALLBACK_SCAN_MAX_FILE_SIZE: u64 = 1 << 16;

/// Directory-backed key store
///
/// Readers share the lock for a whole lookup, writers hold it exclusively
/// for a whole encode-write sequence. There is no locking across processes.
pub struct FileKeyStore {
    pub(super) state: RwLock<Option<OpenStore>>,
}

/// State of an initialized store
pub(super) struct OpenStore {
    pub(super) path: PathBuf,
    pub(super) password: Zeroizing<Vec<u8>>,
    pub(super) read_only: bool,
}

impl OpenStore {
    pub(super) fn key_path(&self, file_name: &str) -> PathBuf {
        self.path.join(file_name)
    }
}

pub(super) fn not_initialized() -> KeyError {
    KeyError::store_state("KeyStore not initialized")
}

impl FileKeyStore {
    /// Create an uninitialized store
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RwLock::new(None),
        }
    }

    /// Create a store and initialize it at `path`
    ///
    /// # Errors
    ///
    /// See [`FileKeyStore::init`].
    pub fn open(password: Option<&[u8]>, path: impl AsRef<Path>, read_only: bool) -> Result<Self> {
        let store = Self::new();
        store.init(password, path, read_only)?;
        Ok(store)
    }

    /// Bind the store to `path`, creating the directory if missing
    ///
    /// An existing non-empty directory is opened as is. With no password, or
    /// an empty one, records are written in plaintext.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty path, `StoreState` if the store is
    /// already initialized, and `Io` if `path` exists but is not a directory
    /// or cannot be created.
    pub fn init(
        &self,
        password: Option<&[u8]>,
        path: impl AsRef<Path>,
        read_only: bool,
    ) -> Result<()> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(KeyError::invalid_input(
                "an invalid KeyStore path provided. Path cannot be an empty string",
            ));
        }

        let mut state = self.state.write();
        if state.is_some() {
            return Err(KeyError::store_state("KeyStore already initialized"));
        }

        prepare_directory(path)?;

        let password = Zeroizing::new(password.unwrap_or_default().to_vec());
        tracing::debug!(
            path = %path.display(),
            read_only,
            sealed = !password.is_empty(),
            "Opened key store"
        );
        *state = Some(OpenStore {
            path: path.to_path_buf(),
            password,
            read_only,
        });
        Ok(())
    }

    /// Directory the store is bound to, if initialized
    #[must_use]
    pub fn path(&self) -> Option<PathBuf> {
        self.state.read().as_ref().map(|store| store.path.clone())
    }

    /// Whether [`FileKeyStore::init`] has succeeded
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state.read().is_some()
    }
}

impl Default for FileKeyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FileKeyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        let mut out = f.debug_struct("FileKeyStore");
        match state.as_ref() {
            Some(store) => out
                .field("path", &store.path)
                .field("sealed", &!store.password.is_empty())
                .field("read_only", &store.read_only),
            None => out.field("initialized", &false),
        };
        out.finish()
    }
}

/// Make sure `path` is a usable key directory
fn prepare_directory(path: &Path) -> Result<()> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => {
            if is_empty_dir(path)? {
                create_directory(path)
            } else {
                Ok(())
            }
        }
        Ok(_) => Err(KeyError::io(
            "open key store",
            path,
            io::Error::new(io::ErrorKind::NotADirectory, "path is not a directory"),
        )),
        Err(e) if e.kind() == io::ErrorKind::NotFound => create_directory(path),
        Err(e) => Err(KeyError::io("open key store", path, e)),
    }
}

fn is_empty_dir(path: &Path) -> Result<bool> {
    let mut entries = fs::read_dir(path).map_err(|e| KeyError::io("read directory", path, e))?;
    Ok(entries.next().is_none())
}

fn create_directory(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| KeyError::io("create directory", path, e))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = fs::Permissions::from_mode(0o755); // rwxr-xr-x
        fs::set_permissions(path, perms)
            .map_err(|e| KeyError::io("set directory permissions", path, e))?;
    }
    tracing::debug!(path = %path.display(), "Key store directory ready");
    Ok(())
}
