//! `WriteFileIfChanged`: compares to the existing file and
//! writes only on difference, so re-running the pipeline over an unchanged
//! IR never disturbs file mtimes. No temp-file rename is used — callers
//! must not depend on this being atomic.

use std::fs;
use std::io;
use std::path::Path;

/// Returns `true` if the file was written (new or changed), `false` if the
/// existing content already matched.
pub fn write_file_if_changed(path: &Path, contents: &[u8]) -> io::Result<bool> {
    if let Ok(existing) = fs::read(path) {
        if existing == contents {
            return Ok(false);
        }
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn writes_new_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a/b.txt");
        assert!(write_file_if_changed(&path, b"hello").unwrap());
        assert_eq!(fs::read(&path).unwrap(), b"hello");
    }

    #[test]
    fn does_not_rewrite_identical_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("b.txt");
        write_file_if_changed(&path, b"hello").unwrap();
        let before = fs::metadata(&path).unwrap().modified().unwrap();
        std::thread::sleep(std::time::Duration::from_millis(10));
        let changed = write_file_if_changed(&path, b"hello").unwrap();
        let after = fs::metadata(&path).unwrap().modified().unwrap();
        assert!(!changed);
        assert_eq!(before, after);
    }

    #[test]
    fn rewrites_on_difference() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("c.txt");
        write_file_if_changed(&path, b"hello").unwrap();
        assert!(write_file_if_changed(&path, b"world").unwrap());
        assert_eq!(fs::read(&path).unwrap(), b"world");
    }
}
