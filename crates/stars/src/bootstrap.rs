//! Cache file location and creation.

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};

/// Cache directory, relative to the user's home directory.
pub const CACHE_DIR: &str = ".cache";

/// Store file name inside [`CACHE_DIR`].
pub const CACHE_FILE: &str = "stars.db";

/// `<home>/.cache/stars.db`.
pub fn default_cache_path(home: &Path) -> PathBuf {
    home.join(CACHE_DIR).join(CACHE_FILE)
}

/// SeaORM connection URL for a SQLite file, created on first open.
pub fn sqlite_url(path: &Path) -> String {
    format!("sqlite://{}?mode=rwc", path.display())
}

fn create_cache_file(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map(drop)
}

/// Make sure the cache directory and file exist.
///
/// Failures are logged and otherwise ignored; opening the store reports
/// the real problem if the file is still unusable. Returns whether the
/// file exists afterwards.
pub fn ensure_cache_file(path: &Path) -> bool {
    match create_cache_file(path) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Could not create cache file");
            false
        }
    }
}

/// Remove the cache file. A missing file is not an error.
pub fn remove_cache_file(path: &Path) -> io::Result<()> {
    match std::fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cache_path() {
        let path = default_cache_path(Path::new("/home/me"));
        assert_eq!(path, PathBuf::from("/home/me/.cache/stars.db"));
    }

    #[test]
    fn test_sqlite_url() {
        assert_eq!(
            sqlite_url(Path::new("/home/me/.cache/stars.db")),
            "sqlite:///home/me/.cache/stars.db?mode=rwc"
        );
    }

    #[test]
    fn test_ensure_cache_file_creates_parents() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = default_cache_path(dir.path());

        assert!(ensure_cache_file(&path));
        assert!(path.exists());
        // Idempotent, and leaves existing content alone.
        std::fs::write(&path, b"data").expect("write");
        assert!(ensure_cache_file(&path));
        assert_eq!(std::fs::read(&path).expect("read"), b"data");
    }

    #[test]
    fn test_ensure_cache_file_reports_failure() {
        let dir = tempfile::tempdir().expect("tempdir");
        let blocker = dir.path().join(".cache");
        std::fs::write(&blocker, b"not a directory").expect("write");

        assert!(!ensure_cache_file(&default_cache_path(dir.path())));
    }

    #[test]
    fn test_remove_cache_file_tolerates_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("stars.db");
        remove_cache_file(&path).expect("missing file is fine");

        std::fs::write(&path, b"").expect("write");
        remove_cache_file(&path).expect("remove");
        assert!(!path.exists());
    }
}
