use super::error::CoreError;
use super::release_note::{self, VersionStamp};
use super::{BodyPreview, FileEntry};
use chrono::{DateTime, Local};
use ignore::{DirEntry, WalkBuilder};
use std::fs;
use std::path::Path;

pub const RELEASE_NOTE_EXTENSION: &str = ".txt";

/// Fails with `InvalidPath` unless `dir` is an existing directory.
pub fn ensure_directory(dir: &Path) -> Result<(), CoreError> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(CoreError::InvalidPath(dir.to_path_buf()))
    }
}

/// Lists the release notes directly inside `dir`, sorted by file name.
///
/// Only regular files whose name ends in `.txt` are considered, and the walk
/// never descends. A file that cannot be read still appears, carrying an
/// `Unreadable` preview.
pub fn scan_directory(dir: &Path, preview_lines: usize) -> Result<Vec<FileEntry>, CoreError> {
    ensure_directory(dir)?;

    let walker = WalkBuilder::new(dir)
        .standard_filters(false)
        .follow_links(false)
        .max_depth(Some(1))
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut entries = Vec::new();
    for result in walker {
        // Walk errors here mean the listing itself failed, not a single note.
        let entry = result?;
        if entry.depth() == 0 {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.ends_with(RELEASE_NOTE_EXTENSION) {
            continue;
        }
        // Symlinks count when they resolve to a regular file.
        let Some(meta) = note_metadata(&entry) else {
            continue;
        };

        let modified: Option<DateTime<Local>> = meta.modified().ok().map(DateTime::from);

        entries.push(FileEntry {
            display_name: display_name(&name),
            body: preview_file(entry.path(), preview_lines),
            modified,
            name,
        });
    }

    tracing::info!("Scanned {:?}: {} release notes", dir, entries.len());
    Ok(entries)
}

fn note_metadata(entry: &DirEntry) -> Option<fs::Metadata> {
    let file_type = entry.file_type()?;
    let meta = if file_type.is_symlink() {
        fs::metadata(entry.path()).ok()?
    } else {
        entry.metadata().ok()?
    };
    meta.is_file().then_some(meta)
}

/// The name without its extension, e.g. `fep-batch` for `fep-batch.txt`.
pub fn display_name(name: &str) -> String {
    Path::new(name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string())
}

/// Builds the listing preview: body without header lines, limited to
/// `preview_lines` lines (0 keeps the whole body).
pub fn preview_file(path: &Path, preview_lines: usize) -> BodyPreview {
    match read_full(path) {
        Ok(content) => {
            let body = release_note::body_text(&content);
            let body = if preview_lines == 0 {
                body
            } else {
                body.lines().take(preview_lines).collect::<Vec<_>>().join("\n")
            };
            BodyPreview::Text {
                content: body,
                header_lines: release_note::header_block(&content).len(),
                current_version: release_note::latest_stamp(&content)
                    .as_ref()
                    .map(VersionStamp::to_string),
            }
        }
        Err(e) => {
            tracing::warn!("Preview degraded for {:?}: {}", path, e);
            BodyPreview::Unreadable {
                reason: e.to_string(),
            }
        }
    }
}

/// Reads a whole release note as UTF-8.
pub fn read_full(path: &Path) -> Result<String, CoreError> {
    fs::read_to_string(path).map_err(|e| CoreError::Read(e, path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_scan_lists_only_txt_files_sorted() {
        let dir = tempdir().unwrap();
        for name in ["other.txt", "fep-batch.txt", "fep-batch-task.txt", "notes.md"] {
            fs::write(dir.path().join(name), "body").unwrap();
        }
        fs::create_dir(dir.path().join("nested.txt")).unwrap();
        fs::write(dir.path().join("nested.txt").join("fep-deep.txt"), "x").unwrap();

        let entries = scan_directory(dir.path(), 0).unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();

        assert_eq!(names, vec!["fep-batch-task.txt", "fep-batch.txt", "other.txt"]);
        assert_eq!(entries[1].display_name, "fep-batch");
        assert!(entries[0].modified.is_some());
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_lists_symlinked_notes_but_not_dangling_links() {
        let dir = tempdir().unwrap();
        let outside = tempdir().unwrap();
        let real = outside.path().join("shared.txt");
        fs::write(&real, "# h\nshared body").unwrap();
        std::os::unix::fs::symlink(&real, dir.path().join("fep-shared.txt")).unwrap();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("fep-dir.txt")).unwrap();
        std::os::unix::fs::symlink(outside.path().join("gone.txt"), dir.path().join("fep-gone.txt"))
            .unwrap();

        let entries = scan_directory(dir.path(), 0).unwrap();

        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["fep-shared.txt"]);
        assert!(matches!(
            &entries[0].body,
            BodyPreview::Text { content, .. } if content == "shared body"
        ));
    }

    #[test]
    fn test_scan_rejects_missing_directory() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing");
        assert!(matches!(
            scan_directory(&missing, 0),
            Err(CoreError::InvalidPath(p)) if p == missing
        ));

        let file = dir.path().join("plain.txt");
        fs::write(&file, "x").unwrap();
        assert!(matches!(
            scan_directory(&file, 0),
            Err(CoreError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_preview_strips_header_and_limits_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fep-a.txt");
        fs::write(&path, "# head\n\n[1].[004].[P]\nline one\nline two\nline three\n").unwrap();

        match preview_file(&path, 2) {
            BodyPreview::Text {
                content,
                header_lines,
                current_version,
            } => {
                assert_eq!(content, "[1].[004].[P]\nline one");
                assert_eq!(header_lines, 1);
                assert_eq!(current_version.as_deref(), Some("[1].[004].[P]"));
            }
            other => panic!("expected text preview, got {other:?}"),
        }
    }

    #[test]
    fn test_unreadable_file_degrades_without_aborting_scan() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("fep-bad.txt"), [0xffu8, 0xfe, 0xfd]).unwrap();
        fs::write(dir.path().join("fep-good.txt"), "fine").unwrap();
        fs::write(dir.path().join("fep-empty.txt"), "").unwrap();

        let entries = scan_directory(dir.path(), 0).unwrap();

        assert_eq!(entries.len(), 3);
        assert!(matches!(entries[0].body, BodyPreview::Unreadable { .. }));
        assert!(matches!(
            &entries[1].body,
            BodyPreview::Text { content, .. } if content.is_empty()
        ));
        assert!(matches!(
            &entries[2].body,
            BodyPreview::Text { content, .. } if content == "fine"
        ));
    }
}
