use plotters::style::{RGBColor, BLACK, WHITE};

/// How the end of the plotted range is chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlotSpan {
    /// Plot up to `end` seconds; `end <= 0` means the end of the material.
    Absolute { end: f64 },
    /// Plot `duration` seconds, starting at `start` when it is set and
    /// centred on the middle of the material otherwise.
    ZoomDuration { duration: f64 },
}

/// Settings for [`save_plot`](super::save_plot).
#[derive(Debug, Clone)]
pub struct PlotConfig {
    pub width: u32,
    pub height: u32,
    pub background_color: RGBColor,
    pub foreground_color: RGBColor,
    pub show_timestamp_axis: bool,
    pub hide_y_axis: bool,
    pub hide_x_axis: bool,
    pub title: String,
    pub start: f64,
    pub span: PlotSpan,
    /// Multiplier on `width` for the number of envelope pixels generated.
    pub resolution: f64,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 400,
            background_color: WHITE,
            foreground_color: RGBColor(0, 100, 200),
            show_timestamp_axis: true,
            hide_y_axis: false,
            hide_x_axis: false,
            title: String::new(),
            start: 0.0,
            span: PlotSpan::Absolute { end: 0.0 },
            resolution: 1.0,
        }
    }
}

impl PlotConfig {
    /// Set the resolution multiplier. Non-positive values are ignored.
    pub fn with_resolution(mut self, resolution: f64) -> Self {
        if resolution > 0.0 {
            self.resolution = resolution;
        }
        self
    }

    /// Time range to plot for material `total` seconds long.
    pub fn resolve_span(&self, total: f64) -> (f64, f64) {
        let (start, end) = match self.span {
            PlotSpan::Absolute { end } => (self.start, end),
            PlotSpan::ZoomDuration { duration } if self.start > 0.0 => {
                (self.start, self.start + duration)
            }
            PlotSpan::ZoomDuration { duration } => {
                let centre = total / 2.0;
                (centre - duration / 2.0, centre + duration / 2.0)
            }
        };

        let start = start.max(0.0);
        let end = if end > total || end <= 0.0 { total } else { end };
        if start >= end {
            (0.0, total)
        } else {
            (start, end)
        }
    }

    /// Envelope width to generate: `width * resolution`, at least 1.
    pub fn effective_width(&self) -> usize {
        let resolution = if self.resolution > 0.0 {
            self.resolution
        } else {
            1.0
        };
        ((f64::from(self.width) * resolution).floor() as usize).max(1)
    }

    pub(crate) fn x_axis_visible(&self) -> bool {
        self.show_timestamp_axis && !self.hide_x_axis
    }
}

/// Parse `#RGB`, `#RRGGBB`, `RGB` or `RRGGBB`. Anything else is black.
pub fn hex_to_color(hex: &str) -> RGBColor {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return BLACK;
    }

    let expanded = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect::<String>(),
        6 => digits.to_string(),
        _ => return BLACK,
    };

    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&expanded[range], 16);
    match (channel(0..2), channel(2..4), channel(4..6)) {
        (Ok(r), Ok(g), Ok(b)) => RGBColor(r, g, b),
        _ => BLACK,
    }
}
