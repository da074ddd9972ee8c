//! Filesystem utilities for Shortcut Tray

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const MAX_LINK_DEPTH: usize = 32;

/// Write `contents` to `path` without ever leaving a half-written file behind.
///
/// The data goes to a sibling temp file which is flushed to disk and then
/// renamed over the target. Parent directories are created as needed.
/// A symlink at `path` is followed, so the file it points to is replaced and
/// the link itself stays.
pub fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let resolved = resolve_links(path)?;
    let path = resolved.as_path();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp = temp_sibling(path);
    let result = (|| {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(contents)?;
        file.sync_all()?;
        fs::rename(&tmp, path)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

/// Move `path` aside to `<name>.<suffix>` and return the new location.
/// Symlinks are followed; the file they point to is moved.
pub fn move_aside(path: &Path, suffix: &str) -> io::Result<PathBuf> {
    let resolved = resolve_links(path)?;
    let path = resolved.as_path();
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".");
    name.push(suffix);
    let target = path.with_file_name(name);
    fs::rename(path, &target)?;
    Ok(target)
}

/// Follow symlinks at `path` until a regular file or a missing entry is reached
fn resolve_links(path: &Path) -> io::Result<PathBuf> {
    let mut current = path.to_path_buf();
    for _ in 0..MAX_LINK_DEPTH {
        match fs::symlink_metadata(&current) {
            Ok(meta) if meta.file_type().is_symlink() => {
                let target = fs::read_link(&current)?;
                // Relative targets are relative to the link's directory
                current = match current.parent() {
                    Some(parent) => parent.join(target),
                    None => target,
                };
            }
            Ok(_) => return Ok(current),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(current),
            Err(e) => return Err(e),
        }
    }
    Err(io::Error::new(
        io::ErrorKind::Other,
        format!("too many levels of symbolic links at {}", path.display()),
    ))
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(format!(".{}.tmp", std::process::id()));
    path.with_file_name(name)
}
