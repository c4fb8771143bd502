use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Flex, Layout, Margin, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Widget},
};

/// Spaces between the longest key description and the text next to it
const KEY_GAP: usize = 2;

const DISMISS: &str = "Press the Any Key to dismiss.";

/// Centered overlay listing `(keys, description)` pairs in two columns
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Help {
    keys: &'static [(&'static str, &'static str)],
    style: Style,
}

impl Help {
    pub(crate) fn new(keys: &'static [(&'static str, &'static str)], style: Style) -> Help {
        Help { keys, style }
    }

    fn text(&self) -> Text<'static> {
        let key_width = self
            .keys
            .iter()
            .map(|(keys, _)| keys.chars().count())
            .max()
            .unwrap_or(0)
            + KEY_GAP;
        let mut lines = self
            .keys
            .iter()
            .map(|(keys, about)| Line::raw(format!("{keys:<key_width$}{about}")))
            .collect::<Vec<_>>();
        lines.push(Line::default());
        lines.push(Line::raw(DISMISS));
        Text::from(lines)
    }
}

impl Widget for Help {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text = self.text();
        // Border plus one column of padding on either side
        let height = u16::try_from(text.height())
            .unwrap_or(u16::MAX)
            .saturating_add(2);
        let width = u16::try_from(text.width())
            .unwrap_or(u16::MAX)
            .saturating_add(4);
        let [outer_area] = Layout::horizontal([width]).flex(Flex::Center).areas(area);
        let [outer_area] = Layout::vertical([height])
            .flex(Flex::Center)
            .areas(outer_area);
        Clear.render(outer_area, buf);
        Block::bordered()
            .title(" Commands ")
            .title_alignment(Alignment::Center)
            .style(self.style)
            .render(outer_area, buf);
        Paragraph::new(text)
            .style(self.style)
            .render(outer_area.inner(Margin::new(2, 1)), buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYS: &[(&str, &str)] = &[("a", "Do a thing"), ("b, B", "Do b")];

    #[test]
    fn test_columns_line_up() {
        let help = Help::new(KEYS, Style::new());
        let lines = help
            .text()
            .lines
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        assert_eq!(lines, ["a     Do a thing", "b, B  Do b", "", DISMISS]);
    }

    #[test]
    fn test_render_centered() {
        let area = Rect::new(0, 0, 41, 6);
        let mut buffer = Buffer::empty(area);
        Help::new(KEYS, Style::new()).render(area, &mut buffer);
        let rendered = (0..6)
            .map(|y| (0..41).map(|x| buffer[(x, y)].symbol()).collect::<String>())
            .collect::<Vec<_>>();
        assert!(rendered[0].contains("Commands"), "{:?}", rendered[0]);
        assert_eq!(rendered[1], "    │ a     Do a thing              │    ");
        assert_eq!(rendered[4], "    │ Press the Any Key to dismiss. │    ");
    }
}
