use crate::theme::{
    birthday::{READY_ENTER_STYLE, UNFILLED_CELL_STYLE},
    BASE_STYLE,
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Flex, Layout, Margin, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Clear, StatefulWidget, Widget},
};
use time::{Date, Month};

const OUTER_WIDTH: u16 = 18;
const OUTER_HEIGHT: u16 = 8;
const ENTER_POS: usize = 8;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct BirthdayEntry;

impl StatefulWidget for BirthdayEntry {
    type State = BirthdayState;

    /*
     * ..................
     * .┌── Birthday ──┐.
     * .│              │.
     * .│  YYYY-MM-DD  │.
     * .│              │.
     * .│   [ENTER]    │.
     * .└──────────────┘.
     * ..................
     */

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let [outer_area] = Layout::horizontal([OUTER_WIDTH])
            .flex(Flex::Center)
            .areas(area);
        let [outer_area] = Layout::vertical([OUTER_HEIGHT])
            .flex(Flex::Center)
            .areas(outer_area);
        Clear.render(outer_area, buf);
        Block::new().style(BASE_STYLE).render(outer_area, buf);
        let block_area = outer_area.inner(Margin::new(1, 1));
        Block::bordered()
            .title(" Birthday ")
            .title_alignment(Alignment::Center)
            .render(block_area, buf);
        let text_area = block_area.inner(Margin::new(1, 1));
        state.to_text().render(text_area, buf);
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct BirthdayState {
    year: [Option<u8>; 4],
    month: [Option<u8>; 2],
    day: [Option<u8>; 2],
    pos: usize,
}

impl BirthdayState {
    pub(crate) fn new() -> BirthdayState {
        BirthdayState::default()
    }

    fn to_text(self) -> Text<'static> {
        Text::from_iter([
            Line::styled("", BASE_STYLE),
            self.to_line(),
            Line::styled("", BASE_STYLE),
            // Only the "[ENTER]" text and not its centering padding gets
            // underlined
            Line::from(Span::styled(
                "[ENTER]",
                if self.pos == ENTER_POS {
                    READY_ENTER_STYLE
                } else {
                    BASE_STYLE
                },
            )),
        ])
        .centered()
    }

    fn to_line(self) -> Line<'static> {
        let mut spans = Vec::new();
        for (i, (fallback, digits)) in [
            ("Y", self.year.as_slice()),
            ("M", self.month.as_slice()),
            ("D", self.day.as_slice()),
        ]
        .into_iter()
        .enumerate()
        {
            if i > 0 {
                spans.push(Span::styled("-", BASE_STYLE));
            }
            for dg in digits {
                spans.push(match dg {
                    Some(d) => Span::styled(format!("{d}"), BASE_STYLE),
                    None => Span::styled(fallback, UNFILLED_CELL_STYLE),
                });
            }
        }
        Line::from_iter(spans)
    }

    fn slot(&mut self, pos: usize) -> Option<&mut Option<u8>> {
        match pos {
            0..4 => self.year.get_mut(pos),
            4..6 => self.month.get_mut(pos - 4),
            6..8 => self.day.get_mut(pos - 6),
            _ => None,
        }
    }

    fn date(&self) -> Option<Date> {
        let year = i32::try_from(number(&self.year)?).ok()?;
        let month = Month::try_from(u8::try_from(number(&self.month)?).ok()?).ok()?;
        let day = u8::try_from(number(&self.day)?).ok()?;
        Date::from_calendar_date(year, month, day).ok()
    }

    pub(crate) fn handle_input(&mut self, input: BirthdayInput) -> BirthdayOutput {
        match (input, self.pos) {
            (BirthdayInput::Digit(d), 0..ENTER_POS) if d < 10 => {
                if let Some(slot) = self.slot(self.pos) {
                    *slot = Some(d);
                }
                self.pos += 1;
                BirthdayOutput::Ok
            }
            (BirthdayInput::Backspace, 1..) => {
                self.pos -= 1;
                if let Some(slot) = self.slot(self.pos) {
                    *slot = None;
                }
                BirthdayOutput::Ok
            }
            (BirthdayInput::Enter, ENTER_POS) => match self.date() {
                Some(date) => BirthdayOutput::Set(date),
                None => BirthdayOutput::Invalid,
            },
            _ => BirthdayOutput::Invalid,
        }
    }
}

/// The decimal number spelled by `digits`, or `None` if any are missing
fn number(digits: &[Option<u8>]) -> Option<u32> {
    digits
        .iter()
        .try_fold(0u32, |acc, &d| Some(acc * 10 + u32::from(d?)))
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum BirthdayInput {
    Digit(u8),
    Backspace,
    Enter,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum BirthdayOutput {
    Ok,
    Invalid,
    Set(Date),
}
