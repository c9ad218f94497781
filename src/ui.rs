#![forbid(unsafe_code)]

use ftui::Frame;
use ftui::core::geometry::Rect;
use ftui::layout::{Constraint, Flex};
use ftui::render::cell::PackedRgba;
use ftui::style::Style;
use ftui::text::{Text, WrapMode};
use ftui::widgets::Widget;
use ftui::widgets::block::Block;
use ftui::widgets::paragraph::Paragraph;

use crate::screen::Screen;
use crate::scroll::Tone;

pub const HEADER_HEIGHT: u16 = 1;
pub const FOOTER_HEIGHT: u16 = 1;

#[derive(Clone, Copy)]
pub struct Theme {
    pub screen_bg: PackedRgba,
    pub bar_bg: PackedRgba,
    pub bar_fg: PackedRgba,
    pub cursor_bg: PackedRgba,
    pub normal_fg: PackedRgba,
    pub dir_fg: PackedRgba,
    pub hidden_fg: PackedRgba,
    pub hidden_dir_fg: PackedRgba,
    pub error_fg: PackedRgba,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            screen_bg: PackedRgba::rgb(0, 0, 0),
            bar_bg: PackedRgba::rgb(136, 139, 126),
            bar_fg: PackedRgba::rgb(0, 0, 0),
            cursor_bg: PackedRgba::rgb(125, 86, 244),
            normal_fg: PackedRgba::rgb(255, 255, 255),
            dir_fg: PackedRgba::rgb(170, 0, 170),
            hidden_fg: PackedRgba::rgb(170, 170, 170),
            hidden_dir_fg: PackedRgba::rgb(119, 0, 119),
            error_fg: PackedRgba::rgb(255, 85, 85),
        }
    }
}

fn tone_fg(theme: Theme, tone: Tone) -> PackedRgba {
    match tone {
        Tone::Normal => theme.normal_fg,
        Tone::Directory => theme.dir_fg,
        Tone::Hidden => theme.hidden_fg,
        Tone::HiddenDirectory => theme.hidden_dir_fg,
        Tone::Error => theme.error_fg,
    }
}

fn bar(frame: &mut Frame, area: Rect, text: &str, theme: Theme) {
    let style = Style::new().fg(theme.bar_fg).bg(theme.bar_bg);
    Block::new().style(style).render(area, frame);
    let paragraph = Paragraph::new(Text::from(text.to_string()))
        .wrap(WrapMode::None)
        .style(style);
    paragraph.render(area, frame);
}

/// Draws one full frame: title bar, screen body, footer. The body
/// geometry is pushed into the screen's viewport here, before any rows
/// are asked for, so the row count and clamping always match what ends
/// up on screen.
pub fn draw(frame: &mut Frame, screen: &Screen, status: Option<&str>, theme: Theme) {
    let full = Rect::new(0, 0, frame.width(), frame.height());
    frame.set_cursor(None);

    let background = Block::new().style(Style::new().fg(theme.normal_fg).bg(theme.screen_bg));
    background.render(full, frame);

    let layout = Flex::vertical().constraints([
        Constraint::Fixed(HEADER_HEIGHT),
        Constraint::Fill,
        Constraint::Fixed(FOOTER_HEIGHT),
    ]);
    let areas = layout.split(full);
    let header_area = areas[0];
    let body_area = areas[1];
    let footer_area = areas[2];

    let provider = screen.content.as_provider();
    {
        let mut view = screen.view.borrow_mut();
        view.resize(body_area.width, body_area.height, provider);
    }
    let view = screen.view.borrow();

    bar(frame, header_area, &screen.title, theme);

    for (i, line) in view.visible(provider).iter().enumerate() {
        let area = Rect::new(body_area.x, body_area.y + i as u16, body_area.width, 1);
        let mut style = Style::new().fg(tone_fg(theme, line.tone));
        if line.is_cursor {
            style = style.bg(theme.cursor_bg);
            Block::new().style(style).render(area, frame);
        }
        let paragraph = Paragraph::new(Text::from(line.text.clone()))
            .wrap(WrapMode::None)
            .style(style);
        paragraph.render(area, frame);
    }

    let footer = match status {
        Some(message) => message.to_string(),
        None => provider.footer(view.cursor, body_area.width),
    };
    bar(frame, footer_area, &footer, theme);
}
