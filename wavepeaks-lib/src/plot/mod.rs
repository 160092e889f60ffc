//! Raster plots of a waveform view (PNG or JPEG).

mod config;

pub use config::{hex_to_color, PlotConfig, PlotSpan};

use std::path::Path;

use log::debug;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;

use crate::error::WaveformError;
use crate::peaks::Envelope;
use crate::store::SampleStore;
use crate::ticks::tick_layout;
use crate::view::ViewRequest;

type WaveformChart<'a, 'b> =
    ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Image encodings `save_plot` can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    /// Pick the encoding from the file extension, case-insensitively.
    ///
    /// # Errors
    /// Returns [`WaveformError::UnsupportedFormat`] for anything other than
    /// `.png`, `.jpg` or `.jpeg`.
    pub fn from_path(path: &Path) -> Result<Self, WaveformError> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            _ => Err(WaveformError::UnsupportedFormat(format!(
                "'.{}' (supported: .png, .jpg, .jpeg)",
                ext
            ))),
        }
    }
}

/// Outline of the filled waveform shape in (seconds, amplitude) space.
///
/// Upper edge left to right through every pixel's max, then the lower edge
/// right to left through every min. Amplitudes are scaled to `[-1, 1)`.
pub fn envelope_polygon(envelope: &Envelope, window_start_seconds: f64) -> Vec<(f64, f64)> {
    let pairs = envelope.pairs().collect::<Vec<_>>();
    let mut points = Vec::with_capacity(pairs.len() * 2);

    for (i, pair) in pairs.iter().enumerate() {
        points.push((
            envelope.pixel_time(i, window_start_seconds),
            Envelope::normalize(pair.max),
        ));
    }
    for (i, pair) in pairs.iter().enumerate().rev() {
        points.push((
            envelope.pixel_time(i, window_start_seconds),
            Envelope::normalize(pair.min),
        ));
    }
    points
}

/// Render the view described by `config` to an image at `path`.
///
/// The encoding is picked from the extension before anything is decoded
/// or written.
///
/// # Errors
/// Returns [`WaveformError::UnsupportedFormat`] for an unknown extension,
/// [`WaveformError::InvalidRange`] if the resolved span holds no frames,
/// and [`WaveformError::Render`] if drawing or encoding fails.
pub fn save_plot(
    store: &SampleStore,
    path: impl AsRef<Path>,
    config: &PlotConfig,
) -> Result<(), WaveformError> {
    let path = path.as_ref();
    let format = ImageFormat::from_path(path)?;
    if config.width == 0 || config.height == 0 {
        return Err(WaveformError::Render(format!(
            "image size must be non-zero (got {}x{})",
            config.width, config.height
        )));
    }

    let (start, end) = config.resolve_span(store.duration());
    let request = ViewRequest::with_width(start, end, config.effective_width());
    let window = store.resolve(&request)?;
    let envelope = store.generate_view(&request)?;
    let points = envelope_polygon(&envelope, window.start_seconds(envelope.sample_rate));

    debug!(
        "plotting {:.3}s..{:.3}s as {:?} ({} envelope pixels) to {}",
        start,
        end,
        format,
        envelope.length,
        path.display()
    );

    let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
    root.fill(&config.background_color).map_err(render_error)?;

    let mut builder = ChartBuilder::on(&root);
    builder.margin(10);
    #[cfg(feature = "plot-labels")]
    {
        if !config.title.is_empty() {
            builder.caption(&config.title, ("sans-serif", 20));
        }
        if config.x_axis_visible() {
            builder.x_label_area_size(40);
        }
        if !config.hide_y_axis {
            builder.y_label_area_size(50);
        }
    }
    let mut chart = builder
        .build_cartesian_2d(start..end, -1.0_f64..1.0_f64)
        .map_err(render_error)?;

    #[cfg(feature = "plot-labels")]
    draw_labelled_axes(&mut chart, config, start, end)?;
    #[cfg(not(feature = "plot-labels"))]
    draw_axis_lines(&mut chart, config, start, end)?;

    chart
        .draw_series(std::iter::once(Polygon::new(
            points,
            config.foreground_color.filled(),
        )))
        .map_err(render_error)?;

    root.present().map_err(render_error)?;
    Ok(())
}

#[cfg(not(feature = "plot-labels"))]
fn draw_axis_lines(
    chart: &mut WaveformChart<'_, '_>,
    config: &PlotConfig,
    start: f64,
    end: f64,
) -> Result<(), WaveformError> {
    let style = BLACK.stroke_width(1);
    let mut lines = Vec::new();

    if config.x_axis_visible() {
        lines.push(PathElement::new(vec![(start, -1.0), (end, -1.0)], style));
        for time in tick_layout(end - start).times(start, end) {
            lines.push(PathElement::new(vec![(time, -1.0), (time, -0.96)], style));
        }
    }
    if !config.hide_y_axis {
        let tick = (end - start) * 0.01;
        lines.push(PathElement::new(vec![(start, -1.0), (start, 1.0)], style));
        for level in [-1.0, -0.5, 0.0, 0.5, 1.0] {
            lines.push(PathElement::new(vec![(start, level), (start + tick, level)], style));
        }
    }

    chart.draw_series(lines).map_err(render_error)?;
    Ok(())
}

#[cfg(feature = "plot-labels")]
fn draw_labelled_axes(
    chart: &mut WaveformChart<'_, '_>,
    config: &PlotConfig,
    start: f64,
    end: f64,
) -> Result<(), WaveformError> {
    let ticks = tick_layout(end - start);
    let format_time = |seconds: &f64| ticks.format(*seconds);
    let format_amplitude = |value: &f64| format!("{:.1}", value);

    let mut mesh = chart.configure_mesh();
    mesh.disable_mesh();
    if config.x_axis_visible() {
        mesh.x_desc("Time (seconds)")
            .x_labels(ticks.count + 1)
            .x_label_formatter(&format_time);
    } else {
        mesh.disable_x_axis();
    }
    if config.hide_y_axis {
        mesh.disable_y_axis();
    } else {
        mesh.y_desc("Amplitude")
            .y_labels(5)
            .y_label_formatter(&format_amplitude);
    }
    mesh.draw().map_err(render_error)
}

fn render_error<E: std::fmt::Display>(err: E) -> WaveformError {
    WaveformError::Render(err.to_string())
}
