use ratatui::style::{Color, Modifier, Style};

pub struct Theme {
    pub footer: Style,
    pub popup_border: Style,
    pub popup_title: Style,
    pub initials: Style,
    pub flag: Style,
    pub country: Style,
    pub product: Style,
    pub time: Style,
    pub link: Style,
    pub image: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            footer: Style::default().fg(Color::Gray).add_modifier(Modifier::DIM),
            popup_border: Style::default().fg(Color::Cyan),
            popup_title: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            initials: Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            flag: Style::default().fg(Color::Green),
            country: Style::default().fg(Color::Green),
            product: Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            time: Style::default().fg(Color::Gray).add_modifier(Modifier::DIM),
            link: Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
            image: Style::default().fg(Color::DarkGray),
        }
    }
}
