#![forbid(unsafe_code)]

use crate::scroll::{Provider, Row};

const TAB_STOP: usize = 8;

/// Line-oriented text. Construction normalizes the raw bytes once;
/// rendering is a plain indexed lookup.
#[derive(Debug, Clone)]
pub struct TextView {
    lines: Vec<String>,
}

impl TextView {
    /// Decodes bytes (lossily, so malformed UTF-8 degrades instead of
    /// failing), strips carriage returns, expands tabs, and splits into
    /// lines. A trailing newline yields a trailing empty line.
    pub fn from_bytes(data: &[u8]) -> Self {
        Self::from_str(&String::from_utf8_lossy(data))
    }

    pub fn from_str(text: &str) -> Self {
        let normalized = expand_tabs(&text.replace('\r', ""), TAB_STOP);
        let lines = normalized.split('\n').map(str::to_string).collect();
        Self { lines }
    }
}

impl Provider for TextView {
    fn len(&self, _width: u16) -> usize {
        self.lines.len()
    }

    fn render_row(&self, index: usize, _width: u16) -> Row {
        match self.lines.get(index) {
            Some(line) => Row::normal(line.clone()),
            None => Row::normal(String::new()),
        }
    }

    fn footer(&self, cursor: usize, _width: u16) -> String {
        format!("{} / {}", cursor + 1, self.lines.len())
    }

    fn wrap(&self) -> bool {
        true
    }
}

/// Expands tabs to the next tab stop, tracking the display column and
/// resetting it on newlines.
fn expand_tabs(text: &str, tab_stop: usize) -> String {
    let mut out = String::with_capacity(text.len());
    let mut column = 0;
    for ch in text.chars() {
        match ch {
            '\t' => {
                let pad = tab_stop - column % tab_stop;
                out.extend(std::iter::repeat_n(' ', pad));
                column += pad;
            }
            '\n' => {
                out.push('\n');
                column = 0;
            }
            _ => {
                out.push(ch);
                column += 1;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(view: &TextView) -> Vec<&str> {
        (0..view.len(80))
            .map(|i| view.lines[i].as_str())
            .collect()
    }

    #[test]
    fn strips_cr_expands_tabs_and_preserves_trailing_empty_line() {
        let view = TextView::from_bytes(b"a\tb\r\nc\n");
        assert_eq!(lines(&view), vec!["a       b", "c", ""]);
    }

    #[test]
    fn tab_stops_are_column_aware() {
        assert_eq!(expand_tabs("abc\tx", 8), "abc     x");
        assert_eq!(expand_tabs("\t.", 8), "        .");
        // a tab at a stop boundary advances a full stop
        assert_eq!(expand_tabs("12345678\tx", 8), "12345678        x");
        // columns reset per line
        assert_eq!(expand_tabs("abc\n\tx", 8), "abc\n        x");
    }

    #[test]
    fn no_trailing_newline_means_no_trailing_empty_line() {
        let view = TextView::from_str("one\ntwo");
        assert_eq!(lines(&view), vec!["one", "two"]);
    }

    #[test]
    fn empty_input_is_a_single_empty_line() {
        let view = TextView::from_str("");
        assert_eq!(lines(&view), vec![""]);
    }

    #[test]
    fn invalid_utf8_degrades_to_replacement_characters() {
        let view = TextView::from_bytes(b"ok\n\xff\xfe\n");
        assert_eq!(view.len(80), 3);
        assert_eq!(view.lines[0], "ok");
        assert!(view.lines[1].contains('\u{fffd}'));
    }

    #[test]
    fn footer_is_one_based_position() {
        let view = TextView::from_str("a\nb\nc");
        assert_eq!(view.footer(0, 80), "1 / 3");
        assert_eq!(view.footer(2, 80), "3 / 3");
    }
}
