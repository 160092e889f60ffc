//! Rendering an envelope as rows of block glyphs for a character terminal.
//!
//! Each character cell is split into eight vertical segments, so a frame
//! of `height` rows is drawn on a virtual grid `height * 8` segments tall.
//! Cells in the upper half use the upper-eighth block glyphs, cells in the
//! lower half use the lower-eighth ones.

use std::collections::BTreeMap;

use crate::peaks::Envelope;
use crate::ticks::tick_layout;

const SEGMENTS_PER_CELL: usize = 8;

const ANSI_RESET: &str = "\x1b[0m";
const ANSI_YELLOW: &str = "\x1b[33m";
const ANSI_CYAN: &str = "\x1b[36m";

/// Glyphs indexed by how many eighths of the cell are filled, minus one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphTable {
    pub upper: [char; 8],
    pub lower: [char; 8],
}

impl Default for GlyphTable {
    fn default() -> Self {
        Self {
            upper: [
                '\u{2594}',
                '\u{1FB02}',
                '\u{1FB03}',
                '\u{2580}',
                '\u{1FB04}',
                '\u{1FB05}',
                '\u{1FB06}',
                '\u{2588}',
            ],
            lower: [
                '\u{2581}', '\u{2582}', '\u{2583}', '\u{2584}', '\u{2585}', '\u{2586}', '\u{2587}',
                '\u{2588}',
            ],
        }
    }
}

impl GlyphTable {
    /// Glyph for `extent` eighths (1..=8) hanging from the top of a cell.
    pub fn upper_glyph(&self, extent: usize) -> char {
        self.upper[extent.clamp(1, SEGMENTS_PER_CELL) - 1]
    }

    /// Glyph for `extent` eighths (1..=8) rising from the bottom of a cell.
    pub fn lower_glyph(&self, extent: usize) -> char {
        self.lower[extent.clamp(1, SEGMENTS_PER_CELL) - 1]
    }
}

/// Highlight applied to a whole column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnMark {
    #[default]
    None,
    Marker,
    Selected,
}

/// Size of the frame and the time range the envelope covers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameLayout {
    pub width: usize,
    pub height: usize,
    pub start: f64,
    pub end: f64,
}

/// Two text lines drawn under the waveform: tick marks and their labels.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Ruler {
    pub ticks: String,
    pub labels: String,
}

/// A rendered waveform: `height` rows of `width` glyphs plus column marks.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveformFrame {
    pub width: usize,
    pub height: usize,
    pub rows: Vec<Vec<char>>,
    pub marks: Vec<ColumnMark>,
    pub ruler: Ruler,
}

impl WaveformFrame {
    pub fn row_text(&self, row: usize) -> String {
        self.rows
            .get(row)
            .map(|glyphs| glyphs.iter().collect())
            .unwrap_or_default()
    }

    pub fn mark(&self, column: usize) -> ColumnMark {
        self.marks.get(column).copied().unwrap_or_default()
    }

    /// The whole frame with ANSI colours on marked columns, ruler included.
    pub fn to_ansi_string(&self) -> String {
        let mut out = String::new();
        for row in &self.rows {
            for (column, glyph) in row.iter().enumerate() {
                match self.mark(column) {
                    ColumnMark::Selected => {
                        out.push_str(ANSI_CYAN);
                        out.push(*glyph);
                        out.push_str(ANSI_RESET);
                    }
                    ColumnMark::Marker => {
                        out.push_str(ANSI_YELLOW);
                        out.push(*glyph);
                        out.push_str(ANSI_RESET);
                    }
                    ColumnMark::None => out.push(*glyph),
                }
            }
            out.push('\n');
        }
        out.push_str(&self.ruler.ticks);
        out.push('\n');
        out.push_str(&self.ruler.labels);
        out.push('\n');
        out
    }
}

/// Draw `envelope` into a `layout.width` by `layout.height` glyph frame.
///
/// Amplitudes are scaled to the loudest value in the envelope. `markers`
/// are times in seconds; the one at index `selected` is tagged
/// [`ColumnMark::Selected`].
pub fn render_waveform(
    envelope: &Envelope,
    layout: &FrameLayout,
    markers: &[f64],
    selected: Option<usize>,
    glyphs: &GlyphTable,
) -> WaveformFrame {
    let width = layout.width;
    let height = layout.height;
    let grid = fill_grid(envelope, width, height * SEGMENTS_PER_CELL);

    let centre_row = height / 2;
    let rows = (0..height)
        .map(|row| {
            (0..width)
                .map(|column| {
                    if row < centre_row {
                        upper_cell(&grid, column, row, glyphs)
                    } else {
                        lower_cell(&grid, column, row, glyphs)
                    }
                })
                .collect()
        })
        .collect();

    WaveformFrame {
        width,
        height,
        rows,
        marks: marker_columns(width, layout.start, layout.end, markers, selected),
        ruler: timestamp_ruler(width, layout.start, layout.end),
    }
}

fn fill_grid(envelope: &Envelope, width: usize, virtual_height: usize) -> Vec<Vec<bool>> {
    let mut grid = vec![vec![false; width]; virtual_height];
    if virtual_height == 0 {
        return grid;
    }

    let max_abs = match envelope.max_abs() {
        0 => 1.0,
        value => f64::from(value),
    };
    let centre = (virtual_height / 2) as f64;
    let last = virtual_height as i64 - 1;
    let to_y = |value: i16| {
        let y = centre as i64 - (f64::from(value) / max_abs * centre) as i64;
        y.clamp(0, last) as usize
    };

    for (column, pair) in envelope.pairs().take(width).enumerate() {
        let mut top = to_y(pair.max);
        let mut bottom = to_y(pair.min);
        if top > bottom {
            std::mem::swap(&mut top, &mut bottom);
        }
        for row in grid.iter_mut().take(bottom + 1).skip(top) {
            row[column] = true;
        }
    }
    grid
}

fn upper_cell(grid: &[Vec<bool>], column: usize, row: usize, glyphs: &GlyphTable) -> char {
    let base = row * SEGMENTS_PER_CELL;
    // Lowest filled segment decides how far the glyph hangs down.
    let lowest = (0..SEGMENTS_PER_CELL)
        .rev()
        .find(|&segment| segment_filled(grid, base + segment, column));
    match lowest {
        Some(segment) => glyphs.upper_glyph(segment + 1),
        None => ' ',
    }
}

fn lower_cell(grid: &[Vec<bool>], column: usize, row: usize, glyphs: &GlyphTable) -> char {
    let base = row * SEGMENTS_PER_CELL;
    let highest =
        (0..SEGMENTS_PER_CELL).find(|&segment| segment_filled(grid, base + segment, column));
    match highest {
        Some(segment) => glyphs.lower_glyph(SEGMENTS_PER_CELL - segment),
        None => ' ',
    }
}

fn segment_filled(grid: &[Vec<bool>], y: usize, column: usize) -> bool {
    grid.get(y)
        .and_then(|row| row.get(column))
        .copied()
        .unwrap_or(false)
}

/// Column each marker falls in, or `None` if it is outside `start..=end`.
pub fn marker_column(width: usize, start: f64, end: f64, time: f64) -> Option<usize> {
    let duration = end - start;
    if width == 0 || duration <= 0.0 || time < start || time > end {
        return None;
    }
    let column = ((width - 1) as f64 * (time - start) / duration) as usize;
    (column < width).then_some(column)
}

fn marker_columns(
    width: usize,
    start: f64,
    end: f64,
    markers: &[f64],
    selected: Option<usize>,
) -> Vec<ColumnMark> {
    let mut marks = vec![ColumnMark::None; width];
    let mut selected_column = None;
    for (index, &time) in markers.iter().enumerate() {
        if let Some(column) = marker_column(width, start, end, time) {
            marks[column] = ColumnMark::Marker;
            if selected == Some(index) {
                selected_column = Some(column);
            }
        }
    }
    if let Some(column) = selected_column {
        marks[column] = ColumnMark::Selected;
    }
    marks
}

/// Tick and label lines for the time range `start..end` across `width` columns.
pub fn timestamp_ruler(width: usize, start: f64, end: f64) -> Ruler {
    let duration = end - start;
    let mut ticks = vec![' '; width];
    let mut labels = vec![' '; width];
    if width == 0 || !duration.is_finite() || duration <= 0.0 {
        return Ruler {
            ticks: ticks.into_iter().collect(),
            labels: labels.into_iter().collect(),
        };
    }

    let layout = tick_layout(duration);
    let mut placed = BTreeMap::new();
    for time in layout.times(start, end) {
        let position = ((width - 1) as f64 * (time - start) / duration) as usize;
        if position < width {
            ticks[position] = '|';
            placed.insert(position, layout.format(time));
        }
    }

    for (position, label) in placed {
        let len = label.chars().count();
        let mut begin = position.saturating_sub(len / 2);
        if begin + len > width {
            begin = width.saturating_sub(len);
        }
        for (offset, ch) in label.chars().enumerate() {
            if let Some(slot) = labels.get_mut(begin + offset) {
                *slot = ch;
            }
        }
    }

    Ruler {
        ticks: ticks.into_iter().collect(),
        labels: labels.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peaks::PeakPair;
    use crate::store::FormatMetadata;
    use crate::view::ResolvedWindow;

    fn envelope(pairs: &[PeakPair]) -> Envelope {
        let window = ResolvedWindow {
            start_frame: 0,
            end_frame: pairs.len(),
            samples_per_pixel: 1,
        };
        let format = FormatMetadata {
            sample_rate: 1,
            channel_count: 1,
            bits_per_sample: 16,
            frame_count: pairs.len(),
        };
        Envelope::assemble(&window, pairs, &format)
    }

    fn layout(width: usize, height: usize) -> FrameLayout {
        FrameLayout {
            width,
            height,
            start: 0.0,
            end: 10.0,
        }
    }

    #[test]
    fn full_scale_column_fills_both_halves() {
        let env = envelope(&[PeakPair::new(-100, 100)]);
        let frame = render_waveform(&env, &layout(1, 2), &[], None, &GlyphTable::default());
        assert_eq!(frame.row_text(0), "\u{2588}");
        assert_eq!(frame.row_text(1), "\u{2588}");
    }

    #[test]
    fn positive_excursion_uses_upper_glyphs() {
        // Loudest value 100 sets the scale; column 0 spans 50..100.
        let env = envelope(&[PeakPair::new(50, 100), PeakPair::new(-100, -50)]);
        let frame = render_waveform(&env, &layout(2, 2), &[], None, &GlyphTable::default());

        assert_eq!(frame.rows[0][0], '\u{1FB04}');
        assert_eq!(frame.rows[1][0], ' ');
        assert_eq!(frame.rows[0][1], ' ');
        assert_eq!(frame.rows[1][1], '\u{2584}');
    }

    #[test]
    fn columns_past_envelope_are_blank() {
        let env = envelope(&[PeakPair::new(-100, 100)]);
        let frame = render_waveform(&env, &layout(3, 2), &[], None, &GlyphTable::default());
        assert_eq!(frame.row_text(0), "\u{2588}  ");
    }

    #[test]
    fn custom_glyph_table_is_used() {
        let glyphs = GlyphTable {
            upper: ['1', '2', '3', '4', '5', '6', '7', '8'],
            lower: ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h'],
        };
        let env = envelope(&[PeakPair::new(50, 100)]);
        let frame = render_waveform(&env, &layout(1, 2), &[], None, &glyphs);
        assert_eq!(frame.row_text(0), "5");
    }

    #[test]
    fn markers_map_to_columns() {
        let env = envelope(&[PeakPair::SILENT; 11]);
        let frame = render_waveform(
            &env,
            &layout(11, 2),
            &[0.0, 5.0, 10.0, 12.0],
            Some(1),
            &GlyphTable::default(),
        );
        assert_eq!(frame.mark(0), ColumnMark::Marker);
        assert_eq!(frame.mark(5), ColumnMark::Selected);
        assert_eq!(frame.mark(10), ColumnMark::Marker);
        assert_eq!(frame.marks.iter().filter(|m| **m != ColumnMark::None).count(), 3);
        assert_eq!(marker_column(11, 0.0, 10.0, 12.0), None);
    }

    #[test]
    fn ansi_output_colours_marked_columns() {
        let env = envelope(&[PeakPair::SILENT; 4]);
        let frame = render_waveform(
            &env,
            &layout(4, 2),
            &[0.0, 10.0],
            Some(1),
            &GlyphTable::default(),
        );
        let text = frame.to_ansi_string();
        assert!(text.contains(ANSI_YELLOW));
        assert!(text.contains(ANSI_CYAN));
        assert_eq!(text.lines().count(), 4);
    }

    #[test]
    fn ruler_places_ticks_and_labels() {
        let ruler = timestamp_ruler(41, 0.0, 2.0);
        assert_eq!(ruler.ticks.chars().count(), 41);
        assert_eq!(ruler.ticks.matches('|').count(), 6);
        assert!(ruler.ticks.starts_with('|'));
        assert!(ruler.ticks.ends_with('|'));
        assert!(ruler.labels.starts_with("0.00"));
        assert!(ruler.labels.ends_with("2.00"));
    }

    #[test]
    fn ruler_for_empty_range_is_blank() {
        let ruler = timestamp_ruler(10, 3.0, 3.0);
        assert_eq!(ruler.ticks, " ".repeat(10));
        assert_eq!(ruler.labels, " ".repeat(10));
    }
}
