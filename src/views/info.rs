#![forbid(unsafe_code)]

use std::fmt::Write;

use crate::views::dir::{FileEntry, format_mtime, mode_string};

/// Renders one entry's metadata as plain text for an info screen.
pub fn file_info(entry: &FileEntry) -> String {
    let mut s = String::new();
    let _ = writeln!(s, "Name:     {}", entry.name);
    let _ = writeln!(s, "Path:     {}", entry.path.display());
    let kind = if entry.is_dir { "directory" } else { "file" };
    let _ = writeln!(s, "Type:     {}", kind);
    match &entry.meta {
        Some(meta) => {
            let _ = writeln!(s, "Size:     {} bytes", meta.size);
            let _ = writeln!(s, "Mode:     {}", mode_string(entry.is_dir, meta.mode));
            let _ = writeln!(s, "User:     {}", meta.uid);
            let _ = writeln!(s, "Group:    {}", meta.gid);
            let _ = writeln!(s, "Modified: {}", format_mtime(meta.modified));
        }
        None => {
            let _ = writeln!(s, "Size:     unavailable");
        }
    }
    if !entry.is_dir {
        let mime = mime_guess::from_path(&entry.path)
            .first()
            .map(|m| m.to_string())
            .unwrap_or_else(|| String::from("unknown"));
        let _ = writeln!(s, "MIME:     {}", mime);
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::dir::Meta;
    use std::path::PathBuf;

    #[test]
    fn info_lists_name_size_and_mime() {
        let entry = FileEntry {
            name: String::from("notes.txt"),
            path: PathBuf::from("/tmp/notes.txt"),
            is_dir: false,
            meta: Some(Meta { size: 42, modified: None, mode: 0o644, uid: 1000, gid: 100 }),
        };
        let text = file_info(&entry);
        assert!(text.contains("Name:     notes.txt"));
        assert!(text.contains("Size:     42 bytes"));
        assert!(text.contains("Mode:     -rw-r--r--"));
        assert!(text.contains("User:     1000"));
        assert!(text.contains("Group:    100"));
        assert!(text.contains("MIME:     text/plain"));
    }

    #[test]
    fn info_degrades_when_stat_failed() {
        let entry = FileEntry {
            name: String::from("ghost"),
            path: PathBuf::from("/tmp/ghost"),
            is_dir: false,
            meta: None,
        };
        let text = file_info(&entry);
        assert!(text.contains("Size:     unavailable"));
    }
}
