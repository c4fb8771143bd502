//! The logical "life in weeks" matrix.
//!
//! A [`Grid`] is rebuilt from scratch whenever the birth date, the life
//! expectancy, or the viewport changes; nothing in it is updated in place.
use crate::calendar::Elapsed;
use crate::color::AgeColor;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_LIFE_EXPECTANCY: u32 = 88;

pub const DEFAULT_WEEKS_PER_YEAR: u32 = 52;

/// Largest life expectancy that front ends accept; larger values are clamped
pub const MAX_LIFE_EXPECTANCY: u32 = 200;

/// ISO years have at most 53 weeks
pub const MAX_WEEKS_PER_YEAR: u32 = 53;

/// Which axis of the grid the years of life run along
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Orientation {
    /// One row per year, one column per week
    Portrait,
    /// One column per year, one row per week
    #[default]
    Landscape,
}

impl Orientation {
    /// Portrait when the viewport is taller than it is wide
    pub fn from_viewport(width: f64, height: f64) -> Orientation {
        if height > width {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        }
    }
}

/// How the orientation of the grid is chosen
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum OrientationMode {
    /// Follow the aspect ratio of the viewport
    #[default]
    Auto,
    Fixed(Orientation),
}

impl OrientationMode {
    /// The orientation to use for a viewport of the given size
    pub fn resolve(self, width: f64, height: f64) -> Orientation {
        match self {
            OrientationMode::Auto => Orientation::from_viewport(width, height),
            OrientationMode::Fixed(o) => o,
        }
    }

    /// Auto → portrait → landscape → auto
    pub fn cycle(self) -> OrientationMode {
        match self {
            OrientationMode::Auto => OrientationMode::Fixed(Orientation::Portrait),
            OrientationMode::Fixed(Orientation::Portrait) => {
                OrientationMode::Fixed(Orientation::Landscape)
            }
            OrientationMode::Fixed(Orientation::Landscape) => OrientationMode::Auto,
        }
    }
}

impl fmt::Display for OrientationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrientationMode::Auto => write!(f, "auto"),
            OrientationMode::Fixed(Orientation::Portrait) => write!(f, "portrait"),
            OrientationMode::Fixed(Orientation::Landscape) => write!(f, "landscape"),
        }
    }
}

impl FromStr for OrientationMode {
    type Err = ParseOrientationError;

    fn from_str(s: &str) -> Result<OrientationMode, ParseOrientationError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(OrientationMode::Auto),
            "portrait" => Ok(OrientationMode::Fixed(Orientation::Portrait)),
            "landscape" => Ok(OrientationMode::Fixed(Orientation::Landscape)),
            _ => Err(ParseOrientationError(s.to_owned())),
        }
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("invalid orientation {0:?}; expected \"auto\", \"portrait\", or \"landscape\"")]
pub struct ParseOrientationError(String);

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum AxisKind {
    Age,
    Week,
}

impl AxisKind {
    pub fn title(self) -> &'static str {
        match self {
            AxisKind::Age => "AGE",
            AxisKind::Week => "WEEK",
        }
    }

    /// The first value on the axis: ages count from 0, weeks from 1
    fn origin(self) -> u32 {
        match self {
            AxisKind::Age => 0,
            AxisKind::Week => 1,
        }
    }
}

/// Labeling and grouping policy for one axis
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct AxisRules {
    /// Label every value divisible by this.  The first value of the axis is
    /// always labeled; 0 labels only the first value.
    pub label_stride: u32,
    /// Number of consecutive values per visual group; 0 disables grouping
    pub group_size: u32,
}

impl AxisRules {
    pub const YEARS: AxisRules = AxisRules {
        label_stride: 5,
        group_size: 10,
    };

    pub const WEEKS: AxisRules = AxisRules {
        label_stride: 4,
        group_size: 4,
    };

    fn labels(&self, kind: AxisKind, value: u32) -> bool {
        value == kind.origin() || (self.label_stride != 0 && value % self.label_stride == 0)
    }

    fn starts_group(&self, kind: AxisKind, value: u32) -> bool {
        let offset = value - kind.origin();
        self.group_size != 0 && offset != 0 && offset % self.group_size == 0
    }
}

/// One position along an axis
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Tick {
    pub value: u32,
    /// Number to display next to this row or column, if any
    pub label: Option<u32>,
    /// Whether a visual gap belongs before this row or column
    pub group_start: bool,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Axis {
    kind: AxisKind,
    ticks: Vec<Tick>,
}

impl Axis {
    fn new(kind: AxisKind, len: u32, rules: AxisRules) -> Axis {
        let origin = kind.origin();
        let ticks = (origin..origin.saturating_add(len))
            .map(|value| Tick {
                value,
                label: rules.labels(kind, value).then_some(value),
                group_start: rules.starts_group(kind, value),
            })
            .collect();
        Axis { kind, ticks }
    }

    pub fn kind(&self) -> AxisKind {
        self.kind
    }

    pub fn title(&self) -> &'static str {
        self.kind.title()
    }

    pub fn ticks(&self) -> &[Tick] {
        &self.ticks
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    /// Number of group gaps inside the axis
    pub fn gap_count(&self) -> usize {
        self.ticks.iter().filter(|t| t.group_start).count()
    }
}

/// Configuration for [`build_grid`]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct GridOptions {
    /// The grid holds `life_expectancy × weeks_per_year` cells, so callers
    /// taking this from users should bound it by [`MAX_LIFE_EXPECTANCY`]
    pub life_expectancy: u32,
    pub weeks_per_year: u32,
    pub orientation: Orientation,
    pub year_rules: AxisRules,
    pub week_rules: AxisRules,
    /// Give checked cells the color of their age band
    pub colorize: bool,
}

impl Default for GridOptions {
    fn default() -> GridOptions {
        GridOptions {
            life_expectancy: DEFAULT_LIFE_EXPECTANCY,
            weeks_per_year: DEFAULT_WEEKS_PER_YEAR,
            orientation: Orientation::default(),
            year_rules: AxisRules::YEARS,
            week_rules: AxisRules::WEEKS,
            colorize: true,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Cell {
    /// Year of life, starting at 0
    pub year: u32,
    /// Week of the year, starting at 1
    pub week: u32,
    pub checked: bool,
    /// Set only on checked cells, and only when coloring is enabled
    pub color: Option<AgeColor>,
    /// Whether this is the week containing "today"
    pub current: bool,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Grid {
    orientation: Orientation,
    rows: Axis,
    columns: Axis,
    // Row-major
    cells: Vec<Cell>,
}

/// Lays out `options.life_expectancy` years of `options.weeks_per_year`
/// weeks each and checks every week up to and including `elapsed`
pub fn build_grid(elapsed: Elapsed, options: &GridOptions) -> Grid {
    let years = Axis::new(AxisKind::Age, options.life_expectancy, options.year_rules);
    let weeks = Axis::new(AxisKind::Week, options.weeks_per_year, options.week_rules);
    let (rows, columns) = match options.orientation {
        Orientation::Portrait => (years, weeks),
        Orientation::Landscape => (weeks, years),
    };
    let mut cells = Vec::with_capacity(rows.len().saturating_mul(columns.len()));
    for r in rows.ticks() {
        for c in columns.ticks() {
            let (year, week) = match options.orientation {
                Orientation::Portrait => (r.value, c.value),
                Orientation::Landscape => (c.value, r.value),
            };
            let checked = elapsed.covers(year, week);
            let color = (checked && options.colorize).then(|| AgeColor::for_age(year.into()));
            cells.push(Cell {
                year,
                week,
                checked,
                color,
                current: elapsed.is_at(year, week),
            });
        }
    }
    Grid {
        orientation: options.orientation,
        rows,
        columns,
        cells,
    }
}

impl Grid {
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn rows(&self) -> &Axis {
        &self.rows
    }

    pub fn columns(&self) -> &Axis {
        &self.columns
    }

    /// The cells of row `index`, or an empty slice if there is no such row
    pub fn row(&self, index: usize) -> &[Cell] {
        let width = self.columns.len();
        index
            .checked_mul(width)
            .and_then(|start| self.cells.get(start..start.checked_add(width)?))
            .unwrap_or_default()
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.row(row).get(column)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of checkable cells, not counting labels
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn checked_count(&self) -> usize {
        self.cells.iter().filter(|c| c.checked).count()
    }

    /// The cell for the week containing "today", if it lies on the grid
    pub fn current(&self) -> Option<&Cell> {
        self.cells.iter().find(|c| c.current)
    }

    /// Row and column of [`Grid::current`]
    pub fn current_position(&self) -> Option<(usize, usize)> {
        let width = self.columns.len();
        let index = self.cells.iter().position(|c| c.current)?;
        Some((index / width, index % width))
    }
}
