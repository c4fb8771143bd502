use lifeweeks::AgeColor;
use ratatui::style::{Color, Modifier, Style};

pub(crate) const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

pub(crate) const TITLE_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const AXIS_TITLE_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const LABEL_STYLE: Style = BASE_STYLE.fg(Color::Gray);

pub(crate) const FIELD_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

/// Checked cells when age coloring is off
pub(crate) const CHECKED_STYLE: Style = BASE_STYLE;

pub(crate) const UNCHECKED_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

pub(crate) const CURRENT_WEEK_MODIFIER: Modifier = Modifier::REVERSED;

pub(crate) fn age_style(color: AgeColor) -> Style {
    let (r, g, b) = color.rgb();
    BASE_STYLE.fg(Color::Rgb(r, g, b))
}

pub(crate) mod birthday {
    use super::*;

    pub(crate) const UNFILLED_CELL_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

    pub(crate) const READY_ENTER_STYLE: Style = BASE_STYLE.add_modifier(Modifier::UNDERLINED);
}
