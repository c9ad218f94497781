#![forbid(unsafe_code)]

use ftui::text::display_width;

/// Semantic tone of a rendered row. The theme maps tones to concrete
/// styles at draw time; providers never see colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Normal,
    Directory,
    Hidden,
    HiddenDirectory,
    Error,
}

/// One logical row of content. The text may contain newlines when a
/// provider renders a row as a multi-line block.
#[derive(Debug, Clone)]
pub struct Row {
    pub text: String,
    pub tone: Tone,
}

impl Row {
    pub fn normal(text: String) -> Self {
        Self { text, tone: Tone::Normal }
    }

    pub fn error(text: String) -> Self {
        Self { text, tone: Tone::Error }
    }
}

/// Anything the viewport can display: a directory listing, text lines,
/// or hex-rendered byte windows. The row count may depend on the view
/// width (the hex view packs more bytes into wider rows).
pub trait Provider {
    fn len(&self, width: u16) -> usize;
    fn render_row(&self, index: usize, width: u16) -> Row;
    fn footer(&self, cursor: usize, width: u16) -> String;

    /// Whether rows soft-wrap to the view width instead of being
    /// clipped. Only line-oriented text opts in.
    fn wrap(&self) -> bool {
        false
    }
}

/// One line of terminal output produced by the viewport. A row that
/// wraps expands into several of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleLine {
    pub row: usize,
    pub text: String,
    pub tone: Tone,
    pub is_cursor: bool,
}

/// Cursor, scroll offset, and last known geometry of one screen's body.
/// Width and height cover the body only; header and footer are drawn
/// outside of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    pub cursor: usize,
    pub offset: usize,
    pub width: u16,
    pub height: u16,
}

impl ViewState {
    pub fn new() -> Self {
        Self { cursor: 0, offset: 0, width: 0, height: 0 }
    }

    pub fn move_cursor(&mut self, delta: isize, len: usize) {
        if delta < 0 {
            self.cursor = self.cursor.saturating_sub(delta.unsigned_abs());
        } else {
            self.cursor = self.cursor.saturating_add(delta as usize);
        }
        self.fix_offset(len);
    }

    pub fn to_start(&mut self, len: usize) {
        self.cursor = 0;
        self.fix_offset(len);
    }

    pub fn to_end(&mut self, len: usize) {
        self.cursor = len.saturating_sub(1);
        self.fix_offset(len);
    }

    /// One page is the visible row count minus one row of overlap.
    pub fn page_up(&mut self, len: usize) {
        self.move_cursor(-(self.height.saturating_sub(1) as isize), len);
    }

    pub fn page_down(&mut self, len: usize) {
        self.move_cursor(self.height.saturating_sub(1) as isize, len);
    }

    /// Updates geometry and re-clamps. The provider is consulted because
    /// its row count may change with the new width.
    pub fn resize(&mut self, width: u16, height: u16, data: &dyn Provider) {
        self.width = width;
        self.height = height;
        self.fix_offset(data.len(width));
    }

    /// Re-establishes the invariants after any cursor, length, or
    /// geometry change: cursor within `[0, len)` and offset the minimal
    /// value keeping the cursor row inside the window. Scrolls just
    /// enough, never re-centering.
    pub fn fix_offset(&mut self, len: usize) {
        if self.cursor + 1 > len {
            self.cursor = len.saturating_sub(1);
        }
        if self.cursor < self.offset {
            self.offset = self.cursor;
        }
        let height = self.height as usize;
        if height > 0 && self.cursor >= self.offset + height {
            self.offset = self.cursor - height + 1;
        }
        if self.offset > self.cursor {
            self.offset = self.cursor;
        }
    }

    /// Produces at most `height` rendered lines starting at the scroll
    /// offset. Rows from a wrapping provider expand into multi-line
    /// blocks; when the total rendered height overflows the window the
    /// output is trimmed so the cursor's block stays fully visible:
    /// block past the bottom trims from the top, block past the top
    /// trims from the bottom, otherwise the excess is split between both
    /// ends with the smaller half (floor) taken from the top.
    pub fn visible(&self, data: &dyn Provider) -> Vec<VisibleLine> {
        let len = data.len(self.width);
        let height = self.height as usize;
        if len == 0 || height == 0 {
            return Vec::new();
        }

        let mut lines: Vec<VisibleLine> = Vec::new();
        let mut cursor_start = 0;
        let mut cursor_end = 0;
        let end = (self.offset + height).min(len);
        for row in self.offset..end {
            let rendered = data.render_row(row, self.width);
            let is_cursor = row == self.cursor;
            if is_cursor {
                cursor_start = lines.len();
            }
            for part in rendered.text.split('\n') {
                if data.wrap() {
                    for text in wrap_line(part, self.width) {
                        lines.push(VisibleLine { row, text, tone: rendered.tone, is_cursor });
                    }
                } else {
                    let text = clip_line(part, self.width);
                    lines.push(VisibleLine { row, text, tone: rendered.tone, is_cursor });
                }
            }
            if is_cursor {
                cursor_end = lines.len();
            }
            if lines.len() >= height && row >= self.cursor {
                break;
            }
        }

        let total = lines.len();
        if total <= height {
            return lines;
        }
        let excess = total - height;
        let block = cursor_end - cursor_start;
        let mut top = if cursor_end > height {
            excess
        } else {
            excess / 2
        };
        if cursor_start < top {
            top = cursor_start;
        }
        if block > height {
            top = cursor_start;
        }
        lines.drain(..top);
        lines.truncate(height);
        lines
    }
}

fn char_width(ch: char) -> usize {
    let mut buf = [0u8; 4];
    display_width(ch.encode_utf8(&mut buf))
}

/// Soft-wraps one line to the given display width. Always yields at
/// least one (possibly empty) line.
fn wrap_line(line: &str, width: u16) -> Vec<String> {
    let width = width as usize;
    if width == 0 || display_width(line) <= width {
        return vec![line.to_string()];
    }
    let mut out = Vec::new();
    let mut current = String::new();
    let mut used = 0;
    for ch in line.chars() {
        let w = char_width(ch);
        if used + w > width && !current.is_empty() {
            out.push(std::mem::take(&mut current));
            used = 0;
        }
        current.push(ch);
        used += w;
    }
    out.push(current);
    out
}

/// Clips one line to the given display width.
fn clip_line(line: &str, width: u16) -> String {
    let width = width as usize;
    if width == 0 || display_width(line) <= width {
        return line.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in line.chars() {
        let w = char_width(ch);
        if used + w > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out
}
