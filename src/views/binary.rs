#![forbid(unsafe_code)]

use std::cell::RefCell;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use crate::scroll::{Provider, Row};

/// Hex-plus-ASCII view over a seekable file. Owns the handle for the
/// lifetime of its screen and reads one row's bytes on demand; the whole
/// file is never held in memory. Dropping the view closes the handle.
#[derive(Debug)]
pub struct HexView {
    file: RefCell<File>,
    size: u64,
}

impl HexView {
    pub fn open(path: &Path) -> io::Result<Self> {
        let mut file = File::open(path)?;
        let size = file.seek(SeekFrom::End(0))?;
        Ok(Self { file: RefCell::new(file), size })
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    fn read_row(&self, index: usize, bytes_per_row: usize) -> io::Result<Vec<u8>> {
        let mut file = self.file.borrow_mut();
        file.seek(SeekFrom::Start(index as u64 * bytes_per_row as u64))?;
        let mut buf = vec![0u8; bytes_per_row];
        let mut filled = 0;
        while filled < buf.len() {
            let n = file.read(&mut buf[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        buf.truncate(filled);
        Ok(buf)
    }
}

/// Bytes per row for a given view width: each byte costs three cells of
/// hex plus one of ASCII, rounded down to a multiple of 8 for alignment,
/// never less than one.
pub fn data_width(width: u16) -> usize {
    let w = width as usize;
    let per_row = w.saturating_sub(2) / 4;
    let aligned = per_row - per_row % 8;
    aligned.max(1)
}

/// Formats one row of bytes as `HH HH ..  ascii`, hex column padded to
/// the full row width.
pub fn format_row(bytes: &[u8], bytes_per_row: usize) -> String {
    let mut s = String::with_capacity(bytes_per_row * 4 + 2);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 {
            s.push(' ');
        }
        s.push_str(&format!("{b:02X}"));
    }
    for _ in bytes.len()..bytes_per_row {
        s.push_str("   ");
    }
    s.push_str("  ");
    for &b in bytes {
        let ch = b as char;
        if b.is_ascii_graphic() || b == b' ' {
            s.push(ch);
        } else {
            s.push('.');
        }
    }
    s
}

impl Provider for HexView {
    fn len(&self, width: u16) -> usize {
        let w = data_width(width) as u64;
        self.size.div_ceil(w) as usize
    }

    fn render_row(&self, index: usize, width: u16) -> Row {
        let w = data_width(width);
        match self.read_row(index, w) {
            Ok(bytes) => Row::normal(format_row(&bytes, w)),
            // a single unreadable row must not take down the frame
            Err(err) => Row::error(err.to_string()),
        }
    }

    fn footer(&self, cursor: usize, width: u16) -> String {
        let w = data_width(width);
        format!("{} / {} bytes ({} bytes per row)", cursor * w, self.size, w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn fixture(data: &[u8]) -> (tempfile::TempDir, HexView) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob");
        let mut f = File::create(&path).unwrap();
        f.write_all(data).unwrap();
        (dir, HexView::open(&path).unwrap())
    }

    #[test]
    fn data_width_rounds_down_to_a_multiple_of_eight() {
        assert_eq!(data_width(82), 16);
        assert_eq!(data_width(34), 8);
        assert_eq!(data_width(130), 32);
    }

    #[test]
    fn data_width_never_drops_below_one_byte() {
        assert_eq!(data_width(10), 1);
        assert_eq!(data_width(0), 1);
    }

    #[test]
    fn length_is_ceiling_of_size_over_row_width() {
        let (_dir, view) = fixture(&[0u8; 100]);
        // width 82 gives 16 bytes per row: ceil(100 / 16) == 7
        assert_eq!(view.len(82), 7);
        // exact multiple
        let (_dir, view) = fixture(&[0u8; 96]);
        assert_eq!(view.len(82), 6);
    }

    #[test]
    fn empty_file_has_no_rows() {
        let (_dir, view) = fixture(b"");
        assert_eq!(view.size(), 0);
        assert_eq!(view.len(82), 0);
    }

    #[test]
    fn rows_render_hex_and_ascii() {
        let (_dir, view) = fixture(b"AB\x00");
        // width 10 forces one byte per row
        assert_eq!(view.len(10), 3);
        assert_eq!(view.render_row(0, 10).text, "41  A");
        assert_eq!(view.render_row(1, 10).text, "42  B");
        assert_eq!(view.render_row(2, 10).text, "00  .");
    }

    #[test]
    fn short_final_row_pads_the_hex_column() {
        let (_dir, view) = fixture(b"0123456789");
        // 8 bytes per row at width 34: final row holds two bytes
        assert_eq!(view.len(34), 2);
        let last = view.render_row(1, 34).text;
        assert_eq!(last, "38 39                    89");
    }

    #[test]
    fn footer_reports_byte_position() {
        let (_dir, view) = fixture(&[0u8; 100]);
        assert_eq!(view.footer(2, 82), "32 / 100 bytes (16 bytes per row)");
    }

    #[test]
    fn format_row_matches_fixed_layout() {
        assert_eq!(format_row(b"\x00\xff", 2), "00 FF  ..");
        assert_eq!(format_row(b"a", 2), "61     a");
        assert_eq!(format_row(b"", 2), "        ");
    }
}
