#![forbid(unsafe_code)]

use std::cmp::Ordering;
use std::fs;
use std::io;
use std::os::unix::fs::{MetadataExt, PermissionsExt};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::scroll::{Provider, Row, Tone};

const TIME_FORMAT_OLD: &str = "[day]-[month]-[year]";
const TIME_FORMAT_NEW: &str = "[day]-[month] [hour]:[minute]";

/// Metadata captured at listing time. Kept separate so a failed stat
/// degrades to a placeholder row instead of dropping the entry.
#[derive(Debug, Clone)]
pub struct Meta {
    pub size: u64,
    pub modified: Option<SystemTime>,
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,
}

#[derive(Debug, Clone)]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    pub meta: Option<Meta>,
}

impl FileEntry {
    pub fn hidden(&self) -> bool {
        self.name.starts_with('.')
    }

    fn size(&self) -> u64 {
        self.meta.as_ref().map(|m| m.size).unwrap_or(0)
    }

    fn modified(&self) -> SystemTime {
        self.meta
            .as_ref()
            .and_then(|m| m.modified)
            .unwrap_or(SystemTime::UNIX_EPOCH)
    }

    fn ext(&self) -> &str {
        match self.name.rfind('.') {
            Some(i) if i > 0 => &self.name[i..],
            _ => "",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    NameAsc,
    NameDesc,
    ExtAsc,
    ExtDesc,
    SizeAsc,
    SizeDesc,
    DateAsc,
    DateDesc,
}

/// Orders two entries under one sort mode. Directories always sort
/// before files and alphabetically among themselves; the non-name modes
/// group dotfiles before visible files; name breaks all remaining ties.
pub fn entry_cmp(a: &FileEntry, b: &FileEntry, mode: SortMode) -> Ordering {
    if a.is_dir != b.is_dir {
        return if a.is_dir { Ordering::Less } else { Ordering::Greater };
    }
    if a.is_dir {
        return match mode {
            SortMode::NameDesc | SortMode::ExtDesc => b.name.cmp(&a.name),
            _ => a.name.cmp(&b.name),
        };
    }
    match mode {
        SortMode::NameAsc => a.name.cmp(&b.name),
        SortMode::NameDesc => b.name.cmp(&a.name),
        SortMode::ExtAsc => hidden_first(a, b)
            .then_with(|| a.ext().cmp(b.ext()))
            .then_with(|| a.name.cmp(&b.name)),
        SortMode::ExtDesc => hidden_first(a, b)
            .then_with(|| b.ext().cmp(a.ext()))
            .then_with(|| b.name.cmp(&a.name)),
        SortMode::SizeAsc => hidden_first(a, b)
            .then_with(|| a.size().cmp(&b.size()))
            .then_with(|| a.name.cmp(&b.name)),
        SortMode::SizeDesc => hidden_first(a, b)
            .then_with(|| b.size().cmp(&a.size()))
            .then_with(|| a.name.cmp(&b.name)),
        SortMode::DateAsc => hidden_first(a, b)
            .then_with(|| a.modified().cmp(&b.modified()))
            .then_with(|| a.name.cmp(&b.name)),
        SortMode::DateDesc => hidden_first(a, b)
            .then_with(|| b.modified().cmp(&a.modified()))
            .then_with(|| a.name.cmp(&b.name)),
    }
}

fn hidden_first(a: &FileEntry, b: &FileEntry) -> Ordering {
    match (a.hidden(), b.hidden()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

/// A directory listing plus a parallel per-entry selection flag array.
/// A refresh replaces the whole listing; selection never survives it.
#[derive(Debug)]
pub struct DirView {
    pub path: PathBuf,
    pub sort: SortMode,
    entries: Vec<FileEntry>,
    selected: Vec<bool>,
}

impl DirView {
    /// Reads one directory into a sorted listing. Fails with the
    /// underlying io error when the directory cannot be opened.
    pub fn list(path: &Path, sort: SortMode) -> io::Result<Self> {
        let mut entries = Vec::new();
        for item in fs::read_dir(path)? {
            let item = item?;
            let name = item.file_name().to_string_lossy().to_string();
            let is_dir = item.file_type().map(|t| t.is_dir()).unwrap_or(false);
            let meta = item.metadata().ok().map(|m| Meta {
                size: m.len(),
                modified: m.modified().ok(),
                mode: m.permissions().mode(),
                uid: m.uid(),
                gid: m.gid(),
            });
            entries.push(FileEntry { name, path: item.path(), is_dir, meta });
        }
        entries.sort_by(|a, b| entry_cmp(a, b, sort));
        let selected = vec![false; entries.len()];
        Ok(Self { path: path.to_path_buf(), sort, entries, selected })
    }

    pub fn entry(&self, i: usize) -> Option<&FileEntry> {
        self.entries.get(i)
    }

    pub fn selected(&self, i: usize) -> bool {
        self.selected.get(i).copied().unwrap_or(false)
    }

    pub fn set_selected(&mut self, i: usize, on: bool) {
        if let Some(flag) = self.selected.get_mut(i) {
            *flag = on;
        }
    }

    pub fn toggle_selected(&mut self, i: usize) {
        if let Some(flag) = self.selected.get_mut(i) {
            *flag = !*flag;
        }
    }

    pub fn select_all(&mut self) {
        self.selected.fill(true);
    }

    pub fn deselect_all(&mut self) {
        self.selected.fill(false);
    }

    pub fn selected_count(&self) -> usize {
        self.selected.iter().filter(|&&s| s).count()
    }
}

impl Provider for DirView {
    fn len(&self, _width: u16) -> usize {
        self.entries.len()
    }

    fn render_row(&self, index: usize, _width: u16) -> Row {
        let Some(entry) = self.entries.get(index) else {
            return Row::error(String::from("<out of range>"));
        };
        let mark = if self.selected(index) { '*' } else { ' ' };
        let tone = match (entry.is_dir, entry.hidden()) {
            (true, true) => Tone::HiddenDirectory,
            (true, false) => Tone::Directory,
            (false, true) => Tone::Hidden,
            (false, false) => Tone::Normal,
        };
        let text = match &entry.meta {
            Some(meta) => format!(
                "{} {:>11} {:>10} {:>12} {}",
                mark,
                mode_string(entry.is_dir, meta.mode),
                meta.size,
                format_mtime(meta.modified),
                entry.name
            ),
            // stat failed at listing time
            None => format!("{} {:>11} {:>10} {:>12} {}", mark, "?", 0, "", entry.name),
        };
        Row { text, tone }
    }

    fn footer(&self, cursor: usize, _width: u16) -> String {
        let mime = self
            .entries
            .get(cursor)
            .filter(|e| !e.is_dir)
            .and_then(|e| mime_guess::from_path(&e.path).first())
            .map(|m| m.to_string())
            .unwrap_or_default();
        format!(
            "{}    {} / {} selected",
            mime,
            self.selected_count(),
            self.entries.len()
        )
    }
}

/// ls-style mode string, e.g. `drwxr-xr-x`.
pub fn mode_string(is_dir: bool, mode: u32) -> String {
    let mut s = String::with_capacity(10);
    s.push(if is_dir { 'd' } else { '-' });
    for shift in [6, 3, 0] {
        let bits = (mode >> shift) & 0o7;
        s.push(if bits & 0o4 != 0 { 'r' } else { '-' });
        s.push(if bits & 0o2 != 0 { 'w' } else { '-' });
        s.push(if bits & 0o1 != 0 { 'x' } else { '-' });
    }
    s
}

/// Short modification timestamp; files from earlier years show the year
/// in place of the clock.
pub fn format_mtime(modified: Option<SystemTime>) -> String {
    let Some(modified) = modified else {
        return String::new();
    };
    let offset = time::UtcOffset::current_local_offset().unwrap_or(time::UtcOffset::UTC);
    let dt = time::OffsetDateTime::from(modified).to_offset(offset);
    let now = time::OffsetDateTime::now_utc().to_offset(offset);
    let format = if dt.year() < now.year() { TIME_FORMAT_OLD } else { TIME_FORMAT_NEW };
    let Ok(format) = time::format_description::parse(format) else {
        return String::new();
    };
    dt.format(&format).unwrap_or_default()
}
