//! Filesystem-based secret store.
//!
//! Stores each secret as `<root>/<namespace>/<name>.json`, a flat object of
//! base64 encoded values (the same encoding a cluster Secret uses for `data`).

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use base64::Engine;
use tracing::{debug, trace};

use super::SecretStore;
use crate::core::types::Payload;
use crate::error::{Result, StoreError};

/// Filesystem-based secret store.
#[derive(Debug, Clone)]
pub struct Filesystem {
    root: PathBuf,
}

impl Filesystem {
    /// Create a store rooted at `root`. The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of a secret under the root.
    ///
    /// Names and namespaces are single path components; anything that could
    /// leave the root is rejected.
    fn secret_path(&self, name: &str, namespace: &str) -> Result<PathBuf> {
        for part in [name, namespace] {
            if let Some(reason) = invalid_component(part) {
                return Err(StoreError::InvalidName {
                    name: name.to_string(),
                    namespace: namespace.to_string(),
                    reason: reason.to_string(),
                }
                .into());
            }
        }
        Ok(self.root.join(namespace).join(format!("{}.json", name)))
    }
}

fn invalid_component(part: &str) -> Option<&'static str> {
    if part.is_empty() {
        return Some("must not be empty");
    }
    if part.contains('/') || part.contains('\\') {
        return Some("must not contain path separators");
    }
    match Path::new(part).components().next() {
        Some(Component::Normal(_)) => None,
        _ => Some("must be a plain name"),
    }
}

/// Write `contents` to `path` through a sibling temp file created with mode 0600.
fn write_private(path: &Path, contents: &str) -> std::io::Result<()> {
    let tmp = path.with_extension("json.tmp");

    let written = (|| {
        let mut options = fs::OpenOptions::new();
        options.create(true).truncate(true).write(true);

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(&tmp)?;

        // A temp file left behind by an earlier crash keeps its old mode.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))?;
        }

        file.write_all(contents.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp, path)
    })();

    if written.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    written
}

impl SecretStore for Filesystem {
    fn get(&self, name: &str, namespace: &str) -> Result<Payload> {
        let path = self.secret_path(name, namespace)?;
        trace!(path = %path.display(), "reading secret");

        let read_failed = |reason: String| StoreError::ReadFailed {
            name: name.to_string(),
            namespace: namespace.to_string(),
            reason,
        };

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound {
                    name: name.to_string(),
                    namespace: namespace.to_string(),
                }
                .into());
            }
            Err(e) => return Err(read_failed(e.to_string()).into()),
        };

        let encoded: BTreeMap<String, String> =
            serde_json::from_str(&contents).map_err(|e| read_failed(e.to_string()))?;

        let mut data = Payload::new();
        for (key, value) in encoded {
            let decoded = base64::engine::general_purpose::STANDARD
                .decode(value.as_bytes())
                .map_err(|e| read_failed(format!("key {}: {}", key, e)))?;
            data.insert(key, decoded);
        }
        Ok(data)
    }

    fn put(&self, name: &str, namespace: &str, data: &Payload) -> Result<()> {
        let path = self.secret_path(name, namespace)?;
        debug!(path = %path.display(), keys = data.len(), "writing secret");

        let write_failed = |reason: String| StoreError::WriteFailed {
            name: name.to_string(),
            namespace: namespace.to_string(),
            reason,
        };

        let encoded: BTreeMap<&String, String> = data
            .iter()
            .map(|(k, v)| (k, base64::engine::general_purpose::STANDARD.encode(v)))
            .collect();
        let contents =
            serde_json::to_string_pretty(&encoded).map_err(|e| write_failed(e.to_string()))?;

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| write_failed(e.to_string()))?;
        }
        write_private(&path, &format!("{}\n", contents)).map_err(|e| write_failed(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use tempfile::TempDir;

    #[test]
    fn test_put_then_get() {
        let tmp = TempDir::new().unwrap();
        let store = Filesystem::new(tmp.path());
        let mut data = Payload::new();
        data.insert("password".to_string(), b"hunter2".to_vec());

        store.put("db", "jx", &data).unwrap();
        assert_eq!(store.get("db", "jx").unwrap(), data);
        assert!(tmp.path().join("jx").join("db.json").exists());
    }

    #[test]
    fn test_values_are_base64_on_disk() {
        let tmp = TempDir::new().unwrap();
        let store = Filesystem::new(tmp.path());
        let mut data = Payload::new();
        data.insert("user".to_string(), b"bob".to_vec());
        store.put("db", "jx", &data).unwrap();

        let raw = fs::read_to_string(tmp.path().join("jx/db.json")).unwrap();
        assert!(raw.contains("Ym9i"));
        assert!(!raw.contains("bob"));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let store = Filesystem::new(tmp.path());
        let err = store.get("db", "jx").unwrap_err();
        assert!(matches!(err, Error::Store(StoreError::NotFound { .. })));
    }

    #[test]
    fn test_corrupt_file_is_read_failure() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("jx")).unwrap();
        fs::write(tmp.path().join("jx/db.json"), "not json").unwrap();

        let store = Filesystem::new(tmp.path());
        let err = store.get("db", "jx").unwrap_err();
        assert!(matches!(err, Error::Store(StoreError::ReadFailed { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_secret_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let store = Filesystem::new(tmp.path());
        store.put("db", "jx", &Payload::new()).unwrap();

        let mode = fs::metadata(tmp.path().join("jx/db.json"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn test_overwrite_replaces_readable_file() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("jx/db.json");
        fs::create_dir_all(tmp.path().join("jx")).unwrap();
        fs::write(&path, "{}").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        let store = Filesystem::new(tmp.path());
        let mut data = Payload::new();
        data.insert("password".to_string(), b"hunter2".to_vec());
        store.put("db", "jx", &data).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(store.get("db", "jx").unwrap(), data);
        assert!(!tmp.path().join("jx/db.json.tmp").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_stale_temp_file_is_not_reused_readable() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("jx")).unwrap();
        let stale = tmp.path().join("jx/db.json.tmp");
        fs::write(&stale, "leftover").unwrap();
        fs::set_permissions(&stale, fs::Permissions::from_mode(0o644)).unwrap();

        let store = Filesystem::new(tmp.path());
        store.put("db", "jx", &Payload::new()).unwrap();

        let mode = fs::metadata(tmp.path().join("jx/db.json"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_names_cannot_escape_root() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("store");
        let store = Filesystem::new(&root);

        for (name, namespace) in [
            ("../outside", "jx"),
            ("db", ".."),
            ("..", "jx"),
            ("/etc/passwd", "jx"),
            ("db", "/tmp"),
            ("a/b", "jx"),
            ("", "jx"),
        ] {
            let err = store.put(name, namespace, &Payload::new()).unwrap_err();
            assert!(
                matches!(err, Error::Store(StoreError::InvalidName { .. })),
                "{name:?} in {namespace:?}: {err}"
            );
            assert!(store.get(name, namespace).is_err());
        }
        assert!(!tmp.path().join("outside.json").exists());
    }
}
