use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::controller::{Effect, Phase};
use crate::models::PurchaseRecord;
use crate::theme::Theme;
use crate::utils::{flag_url, format_initials};

/// What is currently on screen. Applies controller effects; everything in
/// here is cosmetic and never feeds back into the cycle state. Content and
/// visibility are kept apart so the last record survives a hide.
#[derive(Default)]
pub struct PopupView {
    record: Option<PurchaseRecord>,
    visible: bool,
}

impl PopupView {
    pub fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Render(record) => self.record = Some(record),
                Effect::Show => self.visible = true,
                Effect::Hide => self.visible = false,
            }
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

pub const POPUP_WIDTH: u16 = 46;
/// Five content lines plus the border.
pub const POPUP_HEIGHT: u16 = 7;

/// Renders the footer line and, when visible, the bottom-right popup box.
pub fn draw(f: &mut Frame, view: &PopupView, phase: Phase) {
    let theme = Theme::default();
    let area = f.area();

    let hint = match phase {
        Phase::Visible => "←/→ previous/next · c close · q quit",
        Phase::Hidden => "next purchase shortly · q quit",
        Phase::Idle => "popup closed · r resume · q quit",
    };
    let footer = Paragraph::new(hint).style(theme.footer);
    let footer_area = Rect {
        x: area.x,
        y: area.bottom().saturating_sub(1),
        width: area.width,
        height: 1,
    };
    f.render_widget(footer, footer_area);

    if !view.visible {
        return;
    }
    let Some(record) = &view.record else { return };

    let lines = popup_lines(record, &theme);
    let popup = popup_rect(area, POPUP_WIDTH, POPUP_HEIGHT);
    f.render_widget(Clear, popup);
    let block = Block::default()
        .title(Span::styled(" Just bought ", theme.popup_title))
        .borders(Borders::ALL)
        .border_style(theme.popup_border);
    f.render_widget(Paragraph::new(lines).block(block), popup);
}

fn popup_lines(record: &PurchaseRecord, theme: &Theme) -> Vec<Line<'static>> {
    let mut header: Vec<Span> = vec![
        Span::styled(format_initials(&record.initials), theme.initials),
        Span::raw(" from "),
    ];
    // The terminal stand-in for the flag image; skipped when no flag exists.
    if flag_url(&record.country_code).is_some() {
        header.push(Span::styled(format!("[{}] ", record.country_code), theme.flag));
    }
    header.push(Span::styled(record.country.clone(), theme.country));
    header.push(Span::raw(" bought"));

    vec![
        Line::from(header),
        Line::from(Span::styled(record.product_name.clone(), theme.product)),
        Line::from(Span::styled(record.product_url.clone(), theme.link)),
        Line::from(Span::styled(record.product_image.clone(), theme.image)),
        Line::from(Span::styled(record.time_ago.clone(), theme.time)),
    ]
}

/// Bottom-right anchored rect with a one-cell margin, clamped to the frame
/// and kept clear of the footer line. Also the hit box for outside-click
/// dismissal.
pub fn popup_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height.saturating_sub(1));
    Rect {
        x: area.right().saturating_sub(width + 1).max(area.x),
        y: area
            .bottom()
            .saturating_sub(height + 1)
            .max(area.y),
        width,
        height,
    }
}
