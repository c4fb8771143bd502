use crate::theme::{
    age_style, AXIS_TITLE_STYLE, CHECKED_STYLE, CURRENT_WEEK_MODIFIER, LABEL_STYLE,
    UNCHECKED_STYLE,
};
use lifeweeks::{fit_scale, Axis, Cell as GridCell, Grid, Size};
use ratatui::{
    buffer::{Buffer, Cell},
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// Number of lines above the first row: the column axis title and the column
/// labels
const HEADER_LINES: usize = 2;

/// Columns taken up by the row axis title, which is written vertically
const TITLE_WIDTH: usize = 2;

const ROW_LABEL_WIDTH: usize = 3;

/// Columns between the row labels and the first column of cells
const LABEL_GUTTER: usize = 1;

const LEFT_MARGIN: usize = TITLE_WIDTH + ROW_LABEL_WIDTH + LABEL_GUTTER;

const CHECKED: char = '■';
const UNCHECKED: char = '·';

/// Foreground is the upper row's week, background the lower row's
const UPPER_HALF: char = '▀';

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Density {
    /// Two columns per cell, with a blank line or column between groups
    Roomy,
    /// One column per cell and no group gaps
    Compact,
    /// One column per cell and two rows per line, drawn as half blocks
    Dense,
}

impl Density {
    fn cell_width(self) -> usize {
        match self {
            Density::Roomy => 2,
            Density::Compact | Density::Dense => 1,
        }
    }

    fn gaps(self) -> bool {
        self == Density::Roomy
    }

    fn rows_per_line(self) -> usize {
        match self {
            Density::Dense => 2,
            Density::Roomy | Density::Compact => 1,
        }
    }
}

/// Index of the first row and column of the grid that are drawn
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub(crate) struct GridOffset {
    pub(crate) row: usize,
    pub(crate) column: usize,
}

/// The part of the grid that a [`GridView`] shows in a given area
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct Viewport {
    pub(crate) offset: GridOffset,
    /// Largest offset that still leaves no space unused after the last row
    /// and column
    pub(crate) limit: GridOffset,
}

/// Positions of the rows or columns along one axis, relative to the first
#[derive(Clone, Debug, Eq, PartialEq)]
struct Track {
    offsets: Vec<usize>,
    step: usize,
    extent: usize,
}

impl Track {
    fn new(axis: &Axis, step: usize, gaps: bool) -> Track {
        let mut pos = 0;
        let mut offsets = Vec::with_capacity(axis.len());
        for tick in axis.ticks() {
            if gaps && tick.group_start {
                pos += 1;
            }
            offsets.push(pos);
            pos += step;
        }
        Track {
            offsets,
            step,
            extent: pos,
        }
    }

    fn position(&self, index: usize) -> usize {
        self.offsets.get(index).copied().unwrap_or(self.extent)
    }

    /// First index from which the rest of the track fits in `room`
    fn last_start(&self, room: usize) -> usize {
        self.offsets
            .iter()
            .position(|&pos| self.extent - pos <= room)
            .unwrap_or(self.offsets.len().saturating_sub(1))
    }

    /// First index that puts entry `focus` in the middle of `room`
    fn start_around(&self, focus: usize, room: usize) -> usize {
        let Some(&at) = self.offsets.get(focus) else {
            return 0;
        };
        let before = room.saturating_sub(self.step) / 2;
        self.offsets.partition_point(|&pos| pos + before < at)
    }

    fn start(&self, room: usize, wanted: Option<usize>, focus: Option<usize>) -> usize {
        let start = match (wanted, focus) {
            (Some(index), _) => index,
            (None, Some(index)) => self.start_around(index, room),
            (None, None) => 0,
        };
        start.min(self.last_start(room))
    }
}

/// Draws a [`Grid`] with its axis titles and labels, picking the roomiest
/// [`Density`] that fits.  Whatever still does not fit can be scrolled
/// through with [`GridView::offset`]; by default the view is scrolled so that
/// the current week is in the middle.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct GridView<'a> {
    grid: &'a Grid,
    offset: Option<GridOffset>,
}

impl<'a> GridView<'a> {
    pub(crate) fn new(grid: &'a Grid) -> Self {
        GridView { grid, offset: None }
    }

    pub(crate) fn offset(mut self, offset: Option<GridOffset>) -> Self {
        self.offset = offset;
        self
    }

    fn tracks(&self, density: Density) -> (Track, Track) {
        let rows = Track::new(self.grid.rows(), 1, density.gaps());
        let columns = Track::new(self.grid.columns(), density.cell_width(), density.gaps());
        (rows, columns)
    }

    /// Width and height of the grid drawn at `density`, labels included
    pub(crate) fn content_size(&self, density: Density) -> (u16, u16) {
        let (rows, columns) = self.tracks(density);
        (
            saturating_u16(LEFT_MARGIN + columns.extent),
            saturating_u16(HEADER_LINES + rows.extent.div_ceil(density.rows_per_line())),
        )
    }

    /// Factor by which the roomy layout would have to shrink to fit in `area`
    pub(crate) fn scale(&self, area: Rect) -> f64 {
        self.scale_at(Density::Roomy, area)
    }

    fn scale_at(&self, density: Density, area: Rect) -> f64 {
        fit_scale(
            Size::from(self.content_size(density)),
            Size::from((area.width, area.height)),
        )
    }

    pub(crate) fn density(&self, area: Rect) -> Density {
        [Density::Roomy, Density::Compact]
            .into_iter()
            .find(|&d| self.scale_at(d, area) >= 1.0)
            .unwrap_or(Density::Dense)
    }

    /// Room for cells in `area`, in rows and in columns
    fn room(area: Rect, density: Density) -> (usize, usize) {
        let lines = usize::from(area.height).saturating_sub(HEADER_LINES);
        let width = usize::from(area.width).saturating_sub(LEFT_MARGIN);
        (lines * density.rows_per_line(), width)
    }

    pub(crate) fn viewport(&self, area: Rect) -> Viewport {
        let density = self.density(area);
        let (rows, columns) = self.tracks(density);
        self.fit(&rows, &columns, Self::room(area, density))
    }

    fn fit(&self, rows: &Track, columns: &Track, room: (usize, usize)) -> Viewport {
        let (row_room, column_room) = room;
        let focus = self.grid.current_position();
        let offset = GridOffset {
            row: rows.start(
                row_room,
                self.offset.map(|o| o.row),
                focus.map(|(r, _)| r),
            ),
            column: columns.start(
                column_room,
                self.offset.map(|o| o.column),
                focus.map(|(_, c)| c),
            ),
        };
        Viewport {
            offset,
            limit: GridOffset {
                row: rows.last_start(row_room),
                column: columns.last_start(column_room),
            },
        }
    }
}

impl Widget for GridView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let density = self.density(area);
        let (rows, columns) = self.tracks(density);
        let room = Self::room(area, density);
        let Viewport { offset, .. } = self.fit(&rows, &columns, room);
        let row_base = rows.position(offset.row);
        let column_base = columns.position(offset.column);
        let mut canvas = BufferCanvas::new(area, buf);

        let title = self.grid.columns().title();
        let shown = (columns.extent - column_base).min(room.1);
        let title_x = LEFT_MARGIN + shown.saturating_sub(title.len()) / 2;
        canvas.mvprint(0, title_x, title, AXIS_TITLE_STYLE);
        let visible_columns = std::iter::zip(self.grid.columns().ticks(), &columns.offsets)
            .skip(offset.column);
        for (tick, &x) in visible_columns {
            if let Some(label) = tick.label {
                canvas.mvprint(1, LEFT_MARGIN + x - column_base, label.to_string(), LABEL_STYLE);
            }
        }
        for (i, ch) in self.grid.rows().title().chars().enumerate() {
            canvas.mvaddch(HEADER_LINES + i, 0, ch, AXIS_TITLE_STYLE);
        }

        let width = ROW_LABEL_WIDTH;
        let per_line = density.rows_per_line();
        let visible_rows = std::iter::zip(self.grid.rows().ticks(), &rows.offsets)
            .enumerate()
            .skip(offset.row);
        for (r, (tick, &pos)) in visible_rows {
            let unit = pos - row_base;
            let y = HEADER_LINES + unit / per_line;
            let lower = unit % per_line == 1;
            if let Some(label) = tick.label {
                canvas.mvprint(y, TITLE_WIDTH, format!("{label:>width$}"), LABEL_STYLE);
            }
            let cells = std::iter::zip(self.grid.row(r), &columns.offsets).skip(offset.column);
            for (cell, &x) in cells {
                let x = LEFT_MARGIN + x - column_base;
                let style = cell_style(cell);
                match density {
                    Density::Dense => canvas.mvhalf(y, x, lower, style),
                    Density::Roomy | Density::Compact => {
                        canvas.mvaddch(y, x, cell_symbol(cell), style);
                    }
                }
            }
        }
    }
}

fn cell_symbol(cell: &GridCell) -> char {
    if cell.checked {
        CHECKED
    } else {
        UNCHECKED
    }
}

fn cell_style(cell: &GridCell) -> Style {
    let style = if cell.checked {
        cell.color.map_or(CHECKED_STYLE, age_style)
    } else {
        UNCHECKED_STYLE
    };
    if cell.current {
        style.add_modifier(CURRENT_WEEK_MODIFIER)
    } else {
        style
    }
}

fn saturating_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// Draws into `area` of a buffer, silently dropping anything that falls
/// outside of it
#[derive(Debug, Eq, PartialEq)]
struct BufferCanvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl<'a> BufferCanvas<'a> {
    fn new(area: Rect, buf: &'a mut Buffer) -> Self {
        Self { area, buf }
    }

    fn point(&self, y: usize, x: usize) -> Option<(u16, u16)> {
        let x = u16::try_from(x).ok().filter(|&x| x < self.area.width)?;
        let y = u16::try_from(y).ok().filter(|&y| y < self.area.height)?;
        Some((x, y))
    }

    fn cell_mut(&mut self, y: usize, x: usize) -> Option<&mut Cell> {
        let (x, y) = self.point(y, x)?;
        self.buf.cell_mut((self.area.x + x, self.area.y + y))
    }

    fn mvaddch(&mut self, y: usize, x: usize, ch: char, style: Style) {
        if let Some(cell) = self.cell_mut(y, x) {
            cell.set_char(ch).set_style(style);
        }
    }

    /// Paints the upper or lower half of a cell in the foreground color of
    /// `style`
    fn mvhalf(&mut self, y: usize, x: usize, lower: bool, style: Style) {
        if let Some(cell) = self.cell_mut(y, x) {
            let color = style.fg.unwrap_or(Color::Reset);
            if lower {
                cell.set_bg(color);
            } else {
                cell.set_char(UPPER_HALF).set_fg(color);
            }
            cell.modifier.insert(style.add_modifier);
        }
    }

    fn mvprint<S: AsRef<str>>(&mut self, y: usize, x: usize, s: S, style: Style) {
        if let Some((x, y)) = self.point(y, x) {
            let room = usize::from(self.area.width - x);
            self.buf
                .set_stringn(self.area.x + x, self.area.y + y, s, room, style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifeweeks::{build_grid, Elapsed, GridOptions, Orientation};
    use ratatui::style::Modifier;

    fn small_grid(colorize: bool) -> Grid {
        build_grid(
            Elapsed { years: 1, weeks: 2 },
            &GridOptions {
                life_expectancy: 3,
                weeks_per_year: 4,
                orientation: Orientation::Portrait,
                colorize,
                ..GridOptions::default()
            },
        )
    }

    fn lines(buf: &Buffer) -> Vec<String> {
        let area = buf.area;
        (area.top()..area.bottom())
            .map(|y| {
                (area.left()..area.right())
                    .map(|x| buf[(x, y)].symbol())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_roomy() {
        let grid = small_grid(false);
        let view = GridView::new(&grid);
        assert_eq!(view.content_size(Density::Roomy), (14, 5));
        let area = Rect::new(0, 0, 14, 5);
        assert_eq!(view.density(area), Density::Roomy);
        let mut buffer = Buffer::empty(area);
        view.render(area, &mut buffer);
        assert_eq!(
            lines(&buffer),
            [
                "        WEEK  ",
                "      1     4 ",
                "A   0 ■ ■ ■ ■ ",
                "G     ■ ■ · · ",
                "E     · · · · ",
            ]
        );
        assert_eq!(buffer[(6, 2)].fg, Color::White);
        assert!(!buffer[(6, 3)].modifier.contains(Modifier::REVERSED));
        assert!(buffer[(8, 3)].modifier.contains(Modifier::REVERSED));
        assert_eq!(buffer[(10, 3)].fg, Color::DarkGray);
    }

    #[test]
    fn test_compact() {
        let grid = small_grid(true);
        let view = GridView::new(&grid);
        let area = Rect::new(0, 0, 10, 5);
        assert_eq!(view.density(area), Density::Compact);
        let mut buffer = Buffer::empty(area);
        view.render(area, &mut buffer);
        assert_eq!(
            lines(&buffer),
            [
                "      WEEK",
                "      1  4",
                "A   0 ■■■■",
                "G     ■■··",
                "E     ····",
            ]
        );
        assert_eq!(buffer[(6, 2)].fg, Color::Rgb(0xff, 0x69, 0x61));
        assert_eq!(buffer[(6, 3)].fg, Color::Rgb(0xfd, 0xfd, 0x96));
    }

    #[test]
    fn test_dense() {
        let grid = small_grid(false);
        let view = GridView::new(&grid);
        assert_eq!(view.content_size(Density::Dense), (10, 4));
        let area = Rect::new(0, 0, 10, 4);
        assert_eq!(view.density(area), Density::Dense);
        let mut buffer = Buffer::empty(area);
        view.render(area, &mut buffer);
        assert_eq!(
            lines(&buffer),
            ["      WEEK", "      1  4", "A   0 ▀▀▀▀", "G     ▀▀▀▀"]
        );
        assert_eq!((buffer[(6, 2)].fg, buffer[(6, 2)].bg), (Color::White, Color::White));
        assert!(buffer[(7, 2)].modifier.contains(Modifier::REVERSED));
        assert!(!buffer[(6, 2)].modifier.contains(Modifier::REVERSED));
        assert_eq!((buffer[(8, 2)].fg, buffer[(8, 2)].bg), (Color::White, Color::DarkGray));
        assert_eq!((buffer[(6, 3)].fg, buffer[(6, 3)].bg), (Color::DarkGray, Color::Reset));
    }

    #[test]
    fn test_clipped() {
        let grid = small_grid(false);
        let view = GridView::new(&grid);
        let area = Rect::new(0, 0, 8, 3);
        let mut buffer = Buffer::empty(area);
        view.render(area, &mut buffer);
        // Scrolled to the current week, the second of year 1
        assert_eq!(lines(&buffer), ["      WE", "        ", "A     ▀▀"]);
        assert!(buffer[(6, 2)].modifier.contains(Modifier::REVERSED));
    }

    fn long_life() -> Grid {
        build_grid(
            Elapsed { years: 60, weeks: 10 },
            &GridOptions {
                orientation: Orientation::Portrait,
                ..GridOptions::default()
            },
        )
    }

    #[test]
    fn test_follows_current_week() {
        let grid = long_life();
        let view = GridView::new(&grid);
        let area = Rect::new(0, 0, 60, 20);
        assert_eq!(view.density(area), Density::Dense);
        assert_eq!(
            view.viewport(area),
            Viewport {
                offset: GridOffset { row: 43, column: 0 },
                limit: GridOffset { row: 52, column: 0 },
            }
        );
        let mut buffer = Buffer::empty(area);
        view.render(area, &mut buffer);
        // Year 60 is the lower half of the ninth line of cells
        assert!(buffer[(15, 10)].modifier.contains(Modifier::REVERSED));
        assert_eq!(buffer[(15, 10)].bg, Color::Rgb(0xff, 0xb3, 0x47));
        let rendered = lines(&buffer);
        assert!(rendered[3].starts_with("G  45 ▀"), "{:?}", rendered[3]);
        assert!(rendered[10].starts_with("   60 ▀"), "{:?}", rendered[10]);
    }

    #[test]
    fn test_explicit_offset_is_clamped() {
        let grid = long_life();
        let area = Rect::new(0, 0, 60, 20);
        let view = GridView::new(&grid).offset(Some(GridOffset {
            row: 1000,
            column: 5,
        }));
        assert_eq!(
            view.viewport(area).offset,
            GridOffset { row: 52, column: 0 }
        );
        let view = GridView::new(&grid).offset(Some(GridOffset { row: 0, column: 0 }));
        assert_eq!(view.viewport(area).offset, GridOffset::default());
        let mut buffer = Buffer::empty(area);
        view.render(area, &mut buffer);
        let rendered = lines(&buffer);
        assert!(rendered[2].starts_with("A   0 ▀"), "{:?}", rendered[2]);
        assert!(!(0..60).any(|x| (0..20)
            .any(|y| buffer[(x, y)].modifier.contains(Modifier::REVERSED))));
    }

    #[test]
    fn test_offset_area() {
        let grid = small_grid(false);
        let view = GridView::new(&grid);
        let full = Rect::new(0, 0, 16, 6);
        let area = Rect::new(2, 1, 14, 5);
        let mut buffer = Buffer::empty(full);
        view.render(area, &mut buffer);
        let rendered = lines(&buffer);
        assert_eq!(rendered[0], " ".repeat(16));
        assert_eq!(rendered[3], "  A   0 ■ ■ ■ ■ ");
    }

    #[test]
    fn test_default_content_size() {
        let grid = build_grid(Elapsed::default(), &GridOptions::default());
        let view = GridView::new(&grid);
        assert_eq!(view.content_size(Density::Roomy), (190, 66));
        assert_eq!(view.content_size(Density::Compact), (94, 54));
        let scale = view.scale(Rect::new(0, 0, 95, 66));
        assert!((scale - 0.5).abs() < 1e-9, "scale = {scale}");
    }

    #[test]
    fn test_empty_grid() {
        let grid = build_grid(
            Elapsed { years: 24, weeks: 7 },
            &GridOptions {
                life_expectancy: 0,
                orientation: Orientation::Portrait,
                ..GridOptions::default()
            },
        );
        let view = GridView::new(&grid);
        let area = Rect::new(0, 0, 120, 4);
        let mut buffer = Buffer::empty(area);
        view.render(area, &mut buffer);
        let rendered = lines(&buffer);
        assert_eq!(rendered[2].trim(), "A");
        assert!(rendered[1].contains("52"));
        assert!(!rendered.iter().any(|l| l.contains(CHECKED) || l.contains(UNCHECKED)));
    }
}
