//! Key-value persistence for reading positions, bookmarks and preferences.
//!
//! Backends implement [`KeyValueStore`] and report failures. Everything above
//! the backend goes through [`PersistenceAdapter`], which swallows those
//! failures: reads degrade to "absent" and writes to no-ops.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

use log::warn;

use crate::error::StorageError;

/// Raw key-value backend.
///
/// Values are whole snapshots: a write replaces whatever was stored under the
/// key, there is no merge.
pub trait KeyValueStore {
    /// Load the value stored under `key`, `Ok(None)` when absent.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Rc<T> {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }
}

/// Fail-soft handle over a shared [`KeyValueStore`].
///
/// Cloning is cheap; every clone talks to the same backend. The reading
/// session, the bookmark store and the language preference all hold one.
#[derive(Clone)]
pub struct PersistenceAdapter {
    store: Rc<dyn KeyValueStore>,
}

impl PersistenceAdapter {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Rc::new(store),
        }
    }

    /// Wrap an already shared backend.
    pub fn from_shared(store: Rc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Value under `key`, or `None` when absent or unreadable.
    pub fn get(&self, key: &str) -> Option<String> {
        match self.store.read(key) {
            Ok(value) => value,
            Err(err) => {
                warn!("storage read failed for {}: {}", key, err);
                None
            }
        }
    }

    /// Store `value` under `key`. Failures are logged and dropped.
    pub fn set(&self, key: &str, value: &str) {
        if let Err(err) = self.store.write(key, value) {
            warn!("storage write failed for {}: {}", key, err);
        }
    }
}

impl fmt::Debug for PersistenceAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistenceAdapter").finish_non_exhaustive()
    }
}

/// In-process backend.
///
/// Supports an optional byte quota (sum of key and value lengths) and a
/// disabled mode, which mirror the two ways browser-style storage fails.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, String>>,
    quota_bytes: Option<usize>,
    disabled: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject writes that would push total stored bytes past `quota_bytes`.
    pub fn with_quota_bytes(mut self, quota_bytes: usize) -> Self {
        self.quota_bytes = Some(quota_bytes);
        self
    }

    /// Backend that fails every read and write.
    pub fn disabled() -> Self {
        let store = Self::default();
        store.disabled.set(true);
        store
    }

    pub fn set_disabled(&self, disabled: bool) {
        self.disabled.set(disabled);
    }

    /// Number of stored keys, regardless of disabled mode.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw stored value, bypassing disabled mode.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn used_bytes_excluding(&self, key: &str) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.disabled.get() {
            return Err(StorageError::Disabled);
        }
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.disabled.get() {
            return Err(StorageError::Disabled);
        }
        if let Some(quota) = self.quota_bytes {
            let available = quota.saturating_sub(self.used_bytes_excluding(key));
            let requested = key.len() + value.len();
            if requested > available {
                return Err(StorageError::QuotaExceeded {
                    requested,
                    available,
                });
            }
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

const DEFAULT_MAX_VALUE_FILE_BYTES: usize = 1024 * 1024;
static VALUE_WRITE_NONCE: AtomicUsize = AtomicUsize::new(0);

/// File-backed store, one file per key.
///
/// Value paths are deterministic: `<root>/<sanitized-key>.value`. Writes go
/// through a temp file and a rename so a crash never leaves a torn value.
/// `max_file_bytes` is enforced on both reads and writes.
#[derive(Clone, Debug)]
pub struct FileStore {
    root: PathBuf,
    max_file_bytes: usize,
}

impl FileStore {
    /// Create a store rooted at `root`. The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_file_bytes: DEFAULT_MAX_VALUE_FILE_BYTES,
        }
    }

    /// Set the maximum allowed value size in bytes.
    ///
    /// Values of `0` are treated as `1` to keep the cap explicit.
    pub fn with_max_file_bytes(mut self, max_file_bytes: usize) -> Self {
        self.max_file_bytes = max_file_bytes.max(1);
        self
    }

    /// Directory holding the value files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Largest value, in bytes, read or written by this store.
    pub fn max_file_bytes(&self) -> usize {
        self.max_file_bytes
    }

    /// Path holding the value for `key`.
    pub fn value_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.value", sanitize_key(key)))
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.value_path(key);
        let max_file_bytes = self.max_file_bytes as u64;
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let mut reader = file.take(max_file_bytes.saturating_add(1));
        let mut payload = String::new();
        reader.read_to_string(&mut payload)?;
        if payload.len() > self.max_file_bytes {
            return Err(StorageError::Io(format!(
                "{} exceeds max_file_bytes ({})",
                path.display(),
                self.max_file_bytes
            )));
        }
        Ok(Some(payload))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if value.len() > self.max_file_bytes {
            return Err(StorageError::QuotaExceeded {
                requested: value.len(),
                available: self.max_file_bytes,
            });
        }
        fs::create_dir_all(&self.root)?;

        let final_path = self.value_path(key);
        let nonce = VALUE_WRITE_NONCE.fetch_add(1, Ordering::Relaxed);
        let temp_path = self.root.join(format!(
            "{}.value.tmp-{}-{}",
            sanitize_key(key),
            std::process::id(),
            nonce
        ));

        let result = write_then_rename(&temp_path, &final_path, value.as_bytes());
        if result.is_err() {
            remove_file_quiet(&temp_path);
        }
        result.map_err(StorageError::from)
    }
}

fn write_then_rename(temp_path: &Path, final_path: &Path, payload: &[u8]) -> io::Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(temp_path)?;
    file.write_all(payload)?;
    file.sync_all()?;
    drop(file);
    fs::rename(temp_path, final_path)
}

fn remove_file_quiet(path: &Path) {
    let _ = fs::remove_file(path);
}

/// Escape `key` into a file name. ASCII alphanumerics and `-` pass through;
/// every other byte, `_` included, becomes `_xx` so distinct keys never share
/// a file.
fn sanitize_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            out.push(char::from(byte));
        } else {
            out.push_str(&format!("_{:02x}", byte));
        }
    }
    out
}
