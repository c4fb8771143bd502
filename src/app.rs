use crate::birthday::{BirthdayEntry, BirthdayInput, BirthdayOutput, BirthdayState};
use crate::help::Help;
use crate::theme::{BASE_STYLE, FIELD_STYLE, TITLE_STYLE};
use crate::view::{GridOffset, GridView, Viewport};
use crossterm::event::{read, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use lifeweeks::{
    build_grid, grid::MAX_LIFE_EXPECTANCY, input::YMD_FMT, Elapsed, Grid, GridOptions,
    Orientation, OrientationMode,
};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Paragraph, StatefulWidget, Widget, Wrap},
    Terminal,
};
use std::io::{self, Write};
use time::Date;

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f64 = 2.0;

/// Lines taken up by the header when it sits above the grid
const HEADER_HEIGHT: u16 = 4;

/// Columns taken up by the header when it sits beside the grid
const SIDEBAR_WIDTH: u16 = 24;

const TITLE: &str = "MY LIFE IN WEEKS";

/// Key bindings and what they do, as shown in the help overlay
pub(crate) const KEYS: &[(&str, &str)] = &[
    ("b", "Enter birthday"),
    ("+, =, UP", "Add a year of life expectancy"),
    ("-, DOWN", "Remove a year of life expectancy"),
    ("h, l, LEFT, RIGHT", "Scroll the grid sideways"),
    ("j, k", "Scroll the grid up and down"),
    ("0, HOME", "Scroll back to this week"),
    ("o", "Cycle orientation (auto/portrait/landscape)"),
    ("c", "Toggle age colors"),
    ("?", "Show this help"),
    ("q, ESC", "Quit"),
];

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct App {
    today: Date,
    birthday: Date,
    options: GridOptions,
    orientation: OrientationMode,
    /// Where the user scrolled the grid to; `None` keeps this week in view
    offset: Option<GridOffset>,
    /// What was shown on the last draw
    viewport: Viewport,
    state: AppState,
}

impl App {
    pub(crate) fn new(today: Date) -> App {
        App {
            today,
            birthday: today,
            options: GridOptions::default(),
            orientation: OrientationMode::default(),
            offset: None,
            viewport: Viewport::default(),
            state: AppState::Grid,
        }
    }

    pub(crate) fn birthday(mut self, date: Date) -> Self {
        self.birthday = date;
        self
    }

    pub(crate) fn life_expectancy(mut self, years: u32) -> Self {
        self.options.life_expectancy = years.min(MAX_LIFE_EXPECTANCY);
        self
    }

    pub(crate) fn weeks_per_year(mut self, weeks: u32) -> Self {
        self.options.weeks_per_year = weeks;
        self
    }

    pub(crate) fn orientation(mut self, mode: OrientationMode) -> Self {
        self.orientation = mode;
        self
    }

    pub(crate) fn colorize(mut self, colorize: bool) -> Self {
        self.options.colorize = colorize;
        self
    }

    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()> {
        while !self.quitting() {
            self.draw(&mut terminal)?;
            self.handle_input()?;
        }
        Ok(())
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(self, frame.area()))?;
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        match read()? {
            Event::Resize(width, height) => {
                log::debug!("Terminal resized to {width}x{height}");
            }
            Event::Key(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press,
                ..
            }) => {
                if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                    self.state = AppState::Quitting;
                } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                    self.beep()?;
                }
            }
            _ => (),
        }
        // Every event leads to a redraw, which rebuilds the grid for the
        // current terminal size.
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match &mut self.state {
            AppState::Grid => match key {
                KeyCode::Char('+' | '=') | KeyCode::Up => self.longer_life(),
                KeyCode::Char('-') | KeyCode::Down => self.shorter_life(),
                KeyCode::Char('h') | KeyCode::Left => self.scroll(0, -1),
                KeyCode::Char('l') | KeyCode::Right => self.scroll(0, 1),
                KeyCode::Char('k') => self.scroll(-1, 0),
                KeyCode::Char('j') => self.scroll(1, 0),
                KeyCode::Char('0') | KeyCode::Home => {
                    self.offset = None;
                    true
                }
                KeyCode::Char('o') => {
                    self.orientation = self.orientation.cycle();
                    self.offset = None;
                    log::debug!("Orientation mode set to {}", self.orientation);
                    true
                }
                KeyCode::Char('c') => {
                    self.options.colorize = !self.options.colorize;
                    true
                }
                KeyCode::Char('b') => {
                    self.state = AppState::EditingBirthday(BirthdayState::new());
                    true
                }
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.state = AppState::Quitting;
                    true
                }
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    true
                }
                _ => false,
            },
            AppState::Helping => {
                self.state = AppState::Grid;
                true
            }
            AppState::EditingBirthday(state) => {
                if matches!(key, KeyCode::Char('q' | 'b') | KeyCode::Esc) {
                    self.state = AppState::Grid;
                    return true;
                }
                let output = match key {
                    KeyCode::Char(ch) => match ch.to_digit(10).and_then(|d| u8::try_from(d).ok()) {
                        Some(d) => state.handle_input(BirthdayInput::Digit(d)),
                        None => BirthdayOutput::Invalid,
                    },
                    KeyCode::Backspace | KeyCode::Delete => {
                        state.handle_input(BirthdayInput::Backspace)
                    }
                    KeyCode::Enter => state.handle_input(BirthdayInput::Enter),
                    _ => BirthdayOutput::Invalid,
                };
                match output {
                    BirthdayOutput::Ok => true,
                    BirthdayOutput::Invalid => false,
                    BirthdayOutput::Set(date) => {
                        self.state = AppState::Grid;
                        self.set_birthday(date);
                        true
                    }
                }
            }
            AppState::Quitting => false,
        }
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }

    fn set_birthday(&mut self, date: Date) {
        log::info!("Birthday set to {date}");
        self.birthday = date;
        self.offset = None;
    }

    /// Moves the view of the grid by the given number of rows and columns.
    /// Returns `false` without moving if that would go past an edge.
    fn scroll(&mut self, rows: isize, columns: isize) -> bool {
        let limit = self.viewport.limit;
        let offset = self.offset.unwrap_or(self.viewport.offset);
        let row = offset.row.checked_add_signed(rows).filter(|&r| r <= limit.row);
        let column = offset
            .column
            .checked_add_signed(columns)
            .filter(|&c| c <= limit.column);
        match (row, column) {
            (Some(row), Some(column)) => {
                self.offset = Some(GridOffset { row, column });
                true
            }
            _ => false,
        }
    }

    fn longer_life(&mut self) -> bool {
        if self.options.life_expectancy < MAX_LIFE_EXPECTANCY {
            self.options.life_expectancy += 1;
            true
        } else {
            false
        }
    }

    fn shorter_life(&mut self) -> bool {
        match self.options.life_expectancy.checked_sub(1) {
            Some(years) => {
                self.options.life_expectancy = years;
                true
            }
            None => false,
        }
    }

    fn elapsed(&self) -> Elapsed {
        Elapsed::between(self.birthday, self.today)
    }

    fn grid(&self, orientation: Orientation) -> Grid {
        let options = GridOptions {
            orientation,
            ..self.options
        };
        build_grid(self.elapsed(), &options)
    }

    fn header(&self, orientation: Orientation, scale: f64) -> Text<'static> {
        let elapsed = self.elapsed();
        let birthday = self
            .birthday
            .format(&YMD_FMT)
            .unwrap_or_else(|_| self.birthday.to_string());
        let fields = [
            ("BIRTHDAY", birthday),
            (
                "LIFE EXPECTANCY",
                self.options.life_expectancy.to_string(),
            ),
            ("AGE", format!("{}y {}w", elapsed.years, elapsed.weeks)),
            ("SCALE", format!("{:.0}%", scale * 100.0)),
            ("LAYOUT", self.orientation.to_string()),
        ];
        let mut lines = vec![Line::styled(TITLE, TITLE_STYLE)];
        match orientation {
            Orientation::Portrait => {
                let mut spans = Vec::new();
                for (i, (name, value)) in fields.into_iter().enumerate() {
                    if i > 0 {
                        spans.push(Span::styled("   ", BASE_STYLE));
                    }
                    spans.push(Span::styled(format!("{name}: "), FIELD_STYLE));
                    spans.push(Span::styled(value, BASE_STYLE));
                }
                lines.push(Line::from(spans));
            }
            Orientation::Landscape => {
                lines.push(Line::default());
                for (name, value) in fields {
                    lines.push(Line::styled(format!("{name}:"), FIELD_STYLE));
                    lines.push(Line::styled(format!("  {value}"), BASE_STYLE));
                }
                lines.push(Line::default());
                lines.push(Line::styled("Press ? for help", BASE_STYLE));
            }
        }
        Text::from(lines)
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        let orientation = self
            .orientation
            .resolve(f64::from(area.width), f64::from(area.height) * CELL_ASPECT);
        let [header_area, grid_area] = match orientation {
            Orientation::Portrait => {
                Layout::vertical([Constraint::Length(HEADER_HEIGHT), Constraint::Min(0)])
                    .areas(area)
            }
            Orientation::Landscape => {
                Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
                    .areas(area)
            }
        };
        let grid = self.grid(orientation);
        let view = GridView::new(&grid).offset(self.offset);
        self.viewport = view.viewport(grid_area);
        if self.offset.is_some() {
            self.offset = Some(self.viewport.offset);
        }
        let scale = view.scale(grid_area);
        Paragraph::new(self.header(orientation, scale))
            .wrap(Wrap { trim: false })
            .render(header_area, buf);
        view.render(grid_area, buf);
        if self.state == AppState::Helping {
            Help::new(KEYS, BASE_STYLE).render(area, buf);
        } else if let AppState::EditingBirthday(ref mut state) = self.state {
            BirthdayEntry.render(area, buf, state);
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AppState {
    Grid,
    Helping,
    EditingBirthday(BirthdayState),
    Quitting,
}
