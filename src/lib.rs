//! Date arithmetic and grid model for a "life in weeks" calendar: one
//! checkbox per week of a person's life, checked up to today and colored by
//! age band.
pub mod calendar;
pub mod color;
pub mod grid;
pub mod input;
pub mod scale;
pub use crate::calendar::{elapsed_weeks, elapsed_years, week_number, Elapsed};
pub use crate::color::{color_for_age, AgeColor};
pub use crate::grid::{
    build_grid, Axis, AxisKind, AxisRules, Cell, Grid, GridOptions, Orientation, OrientationMode,
    Tick,
};
pub use crate::input::InputError;
pub use crate::scale::{fit_scale, Size};
