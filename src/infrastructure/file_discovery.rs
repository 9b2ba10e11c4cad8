//! Discovery of saved pages under an input directory

use crate::infrastructure::config::defaults::HTML_EXTENSION;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Recursively list files whose name ends in `.html` (any case).
///
/// Entries are visited depth-first with each directory's children sorted by
/// file name, so the result is stable across runs. A symlink is listed when it
/// resolves to a regular file; symlinked directories are not descended and
/// dangling links are skipped. A root that is missing or not a directory is
/// an error.
pub fn list_html_files(root: &Path) -> io::Result<Vec<PathBuf>> {
    let metadata = std::fs::metadata(root).map_err(|e| {
        io::Error::new(
            e.kind(),
            format!("input directory {} is not accessible: {e}", root.display()),
        )
    })?;
    if !metadata.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("input path {} is not a directory", root.display()),
        ));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(io::Error::from)?;
        if is_file_or_link_to_file(&entry) && has_html_extension(entry.file_name()) {
            files.push(entry.into_path());
        }
    }

    debug!("Discovered {} html files under {}", files.len(), root.display());
    Ok(files)
}

fn is_file_or_link_to_file(entry: &DirEntry) -> bool {
    if entry.path_is_symlink() {
        std::fs::metadata(entry.path()).is_ok_and(|m| m.is_file())
    } else {
        entry.file_type().is_file()
    }
}

fn has_html_extension(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy()
        .to_lowercase()
        .ends_with(HTML_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "<html></html>").unwrap();
    }

    #[test]
    fn test_lists_html_at_any_depth() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(&root.join("b.html"));
        touch(&root.join("a.HTML"));
        touch(&root.join("notes.txt"));
        touch(&root.join("page.htm"));
        touch(&root.join("deep/er/c.Html"));
        fs::create_dir_all(root.join("folder.html")).unwrap();

        let files = list_html_files(root).unwrap();
        let relative: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            relative,
            vec![
                PathBuf::from("a.HTML"),
                PathBuf::from("b.html"),
                PathBuf::from("deep/er/c.Html"),
            ]
        );
    }

    #[test]
    fn test_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        assert!(list_html_files(temp_dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_root_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let err = list_html_files(&temp_dir.path().join("missing")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_file_root_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("single.html");
        touch(&file);
        assert_eq!(list_html_files(&file).unwrap_err().kind(), io::ErrorKind::NotFound);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_page_is_listed() {
        use std::os::unix::fs::symlink;

        let outside = TempDir::new().unwrap();
        let target = outside.path().join("saved.html");
        touch(&target);
        touch(&outside.path().join("linked_dir/inner.html"));

        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        symlink(&target, root.join("link.html")).unwrap();
        symlink(outside.path().join("linked_dir"), root.join("linked_dir")).unwrap();
        symlink(outside.path().join("gone.html"), root.join("dangling.html")).unwrap();

        let files = list_html_files(root).unwrap();
        assert_eq!(files, vec![root.join("link.html")]);
    }
}
