/// Width and height of a rectangular area, in whatever unit the caller
/// measures in (pixels, terminal cells, ...)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Size {
        Size { width, height }
    }

    fn is_measurable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

impl From<(u16, u16)> for Size {
    fn from((width, height): (u16, u16)) -> Size {
        Size::new(f64::from(width), f64::from(height))
    }
}

/// Returns the factor by which `content` must be scaled to fit inside
/// `available` while keeping its aspect ratio.
///
/// Content with no measurable area yields a neutral scale of `1.0`, as does
/// any computation that would otherwise produce NaN or infinity.  The result
/// is never negative.
pub fn fit_scale(content: Size, available: Size) -> f64 {
    if !content.is_measurable() {
        return 1.0;
    }
    let scale = (available.width / content.width).min(available.height / content.height);
    if scale.is_finite() {
        scale.max(0.0)
    } else {
        1.0
    }
}
