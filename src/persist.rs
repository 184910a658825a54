//! Writing the generated table to disk
//!
//! The table is staged in a temp file first and only copied over the
//! destination once it is completely written and synced.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::fstab::FstabLine;

/// Write `entries` to `path`, replacing any existing content
pub fn write_entries(entries: &[FstabLine], path: &Path) -> Result<(), PersistError> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }
    let file = options.open(path).map_err(|e| PersistError::io("open", path, e))?;

    let mut writer = BufWriter::new(file);
    for entry in entries {
        writeln!(writer, "{}", entry).map_err(|e| PersistError::io("write", path, e))?;
    }
    writer.flush().map_err(|e| PersistError::io("flush", path, e))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| PersistError::io("sync", path, e))?;

    log::debug!("Wrote {} entries to {}", entries.len(), path.display());
    Ok(())
}

/// Fail if `src` and `dst` name the same file
///
/// Neither path has to exist yet. Symlinks are resolved, and on unix two
/// existing paths sharing device and inode are also rejected.
pub fn ensure_distinct(src: &Path, dst: &Path) -> Result<(), PersistError> {
    let same_path = match (resolve_path(src), resolve_path(dst)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    };

    if same_path || same_inode(src, dst) {
        return Err(PersistError::SameFile(dst.to_path_buf()));
    }
    Ok(())
}

/// Canonical form of `path`, or of its parent joined with the file name
/// when `path` does not exist
fn resolve_path(path: &Path) -> Option<PathBuf> {
    if let Ok(resolved) = fs::canonicalize(path) {
        return Some(resolved);
    }
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    Some(fs::canonicalize(parent).ok()?.join(path.file_name()?))
}

#[cfg(unix)]
fn same_inode(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;
    match (fs::metadata(a), fs::metadata(b)) {
        (Ok(a), Ok(b)) => a.dev() == b.dev() && a.ino() == b.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn same_inode(_a: &Path, _b: &Path) -> bool {
    false
}

/// Copy a regular file from `src` to `dst`
pub fn copy_file(src: &Path, dst: &Path) -> Result<u64, PersistError> {
    ensure_distinct(src, dst)?;

    let meta = fs::metadata(src).map_err(|e| PersistError::io("stat", src, e))?;
    if !meta.is_file() {
        return Err(PersistError::NotRegularFile(src.to_path_buf()));
    }

    let mut source = File::open(src).map_err(|e| PersistError::io("open", src, e))?;
    let mut destination = File::create(dst).map_err(|e| PersistError::io("create", dst, e))?;

    let copied =
        io::copy(&mut source, &mut destination).map_err(|e| PersistError::io("copy to", dst, e))?;
    destination
        .sync_all()
        .map_err(|e| PersistError::io("sync", dst, e))?;

    Ok(copied)
}

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("Failed to {op} {}: {source}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is not a regular file", .0.display())]
    NotRegularFile(PathBuf),

    #[error("Staging file and destination are the same file: {}", .0.display())]
    SameFile(PathBuf),
}

impl PersistError {
    fn io(op: &'static str, path: &Path, source: io::Error) -> Self {
        Self::Io {
            op,
            path: path.to_path_buf(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entries() -> Vec<FstabLine> {
        vec![
            FstabLine::new("192.168.4.6:/var/nfs/home", "/home", "nfs", "noexec,nosuid", 0, 0),
            FstabLine::new("/dev/sda1", "/boot", "xfs", "defaults", 0, 0),
        ]
    }

    #[test]
    fn test_write_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fstab.temp");

        write_entries(&sample_entries(), &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "192.168.4.6:/var/nfs/home /home nfs noexec,nosuid 0 0\n/dev/sda1 /boot xfs defaults 0 0\n"
        );
    }

    #[test]
    fn test_write_entries_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fstab.temp");
        fs::write(&path, "stale content that is much longer than the new table\n".repeat(10)).unwrap();

        let entries = vec![FstabLine::new("/dev/sda1", "/", "ext4", "defaults", 0, 1)];
        write_entries(&entries, &path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "/dev/sda1 / ext4 defaults 0 1\n");
    }

    #[test]
    fn test_write_entries_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("fstab.temp");

        let err = write_entries(&sample_entries(), &path).unwrap_err();
        assert!(matches!(err, PersistError::Io { op: "open", .. }));
    }

    #[test]
    fn test_copy_file() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        let dst = dir.path().join("dst");
        fs::write(&src, "a b c d 0 0\n").unwrap();
        fs::write(&dst, "old\n").unwrap();

        let copied = copy_file(&src, &dst).unwrap();

        assert_eq!(copied, 12);
        assert_eq!(fs::read_to_string(&dst).unwrap(), "a b c d 0 0\n");
    }

    #[test]
    fn test_copy_file_rejects_directory() {
        let dir = tempfile::tempdir().unwrap();
        let dst = dir.path().join("dst");

        let err = copy_file(dir.path(), &dst).unwrap_err();
        assert!(matches!(err, PersistError::NotRegularFile(_)));
        assert!(!dst.exists());
    }

    #[test]
    fn test_copy_file_same_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fstab");
        fs::write(&path, "/dev/sda1 / ext4 defaults 0 1\n").unwrap();

        let err = copy_file(&path, &path).unwrap_err();
        assert!(matches!(err, PersistError::SameFile(_)));
        assert_eq!(fs::read_to_string(&path).unwrap(), "/dev/sda1 / ext4 defaults 0 1\n");
    }

    #[test]
    fn test_ensure_distinct() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");

        // neither exists yet
        assert!(ensure_distinct(&a, &b).is_ok());
        assert!(matches!(ensure_distinct(&a, &a), Err(PersistError::SameFile(_))));

        let dotted = dir.path().join(".").join("a");
        assert!(matches!(ensure_distinct(&a, &dotted), Err(PersistError::SameFile(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_ensure_distinct_symlink() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("fstab");
        let link = dir.path().join("fstab.link");
        fs::write(&target, "x\n").unwrap();
        std::os::unix::fs::symlink(&target, &link).unwrap();

        assert!(matches!(ensure_distinct(&link, &target), Err(PersistError::SameFile(_))));
    }

    #[test]
    fn test_copy_file_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let err = copy_file(&dir.path().join("nope"), &dir.path().join("dst")).unwrap_err();
        assert!(matches!(err, PersistError::Io { op: "stat", .. }));
    }
}
