#![forbid(unsafe_code)]

use std::cell::RefCell;
use std::fs;
use std::fs::File;
use std::io;
use std::io::Read;
use std::path::Path;

use content_inspector::{ContentType, inspect};

use crate::keymap;
use crate::scroll::{Provider, ViewState};
use crate::views::binary::HexView;
use crate::views::dir::{DirView, FileEntry, SortMode};
use crate::views::info::file_info;
use crate::views::text::TextView;

/// What one screen shows. The composer matches on this to route
/// directory-only actions; everything else goes through the provider.
pub enum Content {
    Dir(DirView),
    Text(TextView),
    Binary(HexView),
}

impl Content {
    pub fn as_provider(&self) -> &dyn Provider {
        match self {
            Content::Dir(view) => view,
            Content::Text(view) => view,
            Content::Binary(view) => view,
        }
    }

    pub fn as_dir(&self) -> Option<&DirView> {
        match self {
            Content::Dir(view) => Some(view),
            _ => None,
        }
    }

    pub fn as_dir_mut(&mut self) -> Option<&mut DirView> {
        match self {
            Content::Dir(view) => Some(view),
            _ => None,
        }
    }
}

/// One screen of the stack: content, its viewport state, and the screen
/// underneath it. The viewport lives in a RefCell because the draw pass
/// resyncs geometry on a shared reference.
pub struct Screen {
    pub title: String,
    pub content: Content,
    pub view: RefCell<ViewState>,
    pub prev: Option<Box<Screen>>,
}

impl Screen {
    fn new(title: String, content: Content) -> Self {
        Self { title, content, view: RefCell::new(ViewState::new()), prev: None }
    }

    pub fn dir(path: &Path, sort: SortMode) -> io::Result<Self> {
        let view = DirView::list(path, sort)?;
        Ok(Self::new(path.display().to_string(), Content::Dir(view)))
    }

    pub fn help() -> Self {
        Self::new(String::from("help"), Content::Text(TextView::from_str(&keymap::help_text())))
    }

    pub fn info(entry: &FileEntry) -> Self {
        Self::new(entry.name.clone(), Content::Text(TextView::from_str(&file_info(entry))))
    }

    pub fn binary_file(path: &Path) -> io::Result<Self> {
        let view = HexView::open(path)?;
        Ok(Self::new(path.display().to_string(), Content::Binary(view)))
    }

    pub fn text_file(path: &Path) -> io::Result<Self> {
        let data = fs::read(path)?;
        Ok(Self::new(path.display().to_string(), Content::Text(TextView::from_bytes(&data))))
    }

    /// Opens a path as the screen fitting its content: folders list,
    /// text-looking files view as lines, everything else as bytes.
    pub fn open_path(path: &Path, sort: SortMode) -> io::Result<Self> {
        if path.is_dir() {
            Self::dir(path, sort)
        } else if is_text_file(path)? {
            Self::text_file(path)
        } else {
            Self::binary_file(path)
        }
    }

    /// Pushes `next` on top of this screen. The new screen inherits the
    /// current geometry so its first clamp happens before the next draw.
    pub fn push(&mut self, mut next: Screen) {
        {
            let cur = self.view.borrow();
            let mut view = next.view.borrow_mut();
            view.width = cur.width;
            view.height = cur.height;
            let len = next.content.as_provider().len(view.width);
            view.fix_offset(len);
        }
        let prev = std::mem::replace(self, next);
        self.prev = Some(Box::new(prev));
    }

    /// Replaces this screen in place; the screen underneath survives.
    pub fn replace(&mut self, mut next: Screen) {
        next.prev = self.prev.take();
        {
            let cur = self.view.borrow();
            let mut view = next.view.borrow_mut();
            view.width = cur.width;
            view.height = cur.height;
            let len = next.content.as_provider().len(view.width);
            view.fix_offset(len);
        }
        *self = next;
    }

    /// Pops back to the screen underneath, restoring its cursor and
    /// offset exactly. A folder screen with nothing underneath steps to
    /// its parent folder instead, cursor on the folder it came from.
    /// Returns false when there is nowhere left to go.
    pub fn back(&mut self) -> io::Result<bool> {
        if let Some(prev) = self.prev.take() {
            *self = *prev;
            return Ok(true);
        }
        let Some(dir) = self.content.as_dir() else {
            return Ok(false);
        };
        let Some(parent) = dir.path.parent().map(Path::to_path_buf) else {
            return Ok(false);
        };
        let came_from = dir.path.file_name().map(|n| n.to_string_lossy().to_string());
        let listing = DirView::list(&parent, dir.sort)?;
        let mut view = ViewState::new();
        {
            let cur = self.view.borrow();
            view.width = cur.width;
            view.height = cur.height;
        }
        let len = listing.len(view.width);
        if let Some(name) = came_from {
            if let Some(i) = (0..len).find(|&i| listing.entry(i).is_some_and(|e| e.name == name)) {
                view.cursor = i;
            }
        }
        view.fix_offset(len);
        *self = Screen {
            title: parent.display().to_string(),
            content: Content::Dir(listing),
            view: RefCell::new(view),
            prev: None,
        };
        Ok(true)
    }

    /// Re-reads folder content in place, keeping cursor and offset
    /// clamped to the new listing. Selection does not survive. Screens
    /// without folder content are left alone.
    pub fn refresh(&mut self) -> io::Result<()> {
        let Some(dir) = self.content.as_dir() else {
            return Ok(());
        };
        let listing = DirView::list(&dir.path, dir.sort)?;
        let mut view = self.view.borrow_mut();
        let len = listing.len(view.width);
        view.fix_offset(len);
        drop(view);
        self.content = Content::Dir(listing);
        Ok(())
    }
}

/// Decides whether a file views as text: a `text/*` MIME guess from the
/// extension short-circuits, otherwise the first 512 bytes are sniffed.
pub fn is_text_file(path: &Path) -> io::Result<bool> {
    let guess = mime_guess::from_path(path).first();
    if guess.is_some_and(|m| m.type_() == mime_guess::mime::TEXT) {
        return Ok(true);
    }
    let mut file = File::open(path)?;
    let mut head = [0u8; 512];
    let mut filled = 0;
    while filled < head.len() {
        let n = file.read(&mut head[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(inspect(&head[..filled]) != ContentType::BINARY)
}
