//! Navigation and marker state for the terminal viewer.

use wavepeaks_lib::{Envelope, SampleStore, ViewRequest, WaveformError};

/// Narrowest view zoom-in may reach, in frames.
const MIN_SPAN_FRAMES: f64 = 16.0;

const JOG_FRACTION: f64 = 0.005;
const FAST_JOG_FRACTION: f64 = 0.05;
const ZOOM_IN_FACTOR: f64 = 0.8;
const ZOOM_OUT_FACTOR: f64 = 1.25;

#[derive(Debug, Clone, PartialEq)]
pub struct ViewerState {
    pub start: f64,
    pub end: f64,
    pub total_duration: f64,
    /// Marker times in seconds, kept sorted.
    pub markers: Vec<f64>,
    pub selected: Option<usize>,
    min_span: f64,
}

impl ViewerState {
    pub fn new(total_duration: f64, sample_rate: u32) -> Self {
        let min_span = if sample_rate > 0 {
            (MIN_SPAN_FRAMES / f64::from(sample_rate)).min(total_duration)
        } else {
            total_duration
        };
        Self {
            start: 0.0,
            end: total_duration,
            total_duration,
            markers: Vec::new(),
            selected: None,
            min_span,
        }
    }

    pub fn span(&self) -> f64 {
        self.end - self.start
    }

    pub fn selected_time(&self) -> Option<f64> {
        self.selected.and_then(|index| self.markers.get(index).copied())
    }

    /// Drop a marker in the middle of the view and select it.
    pub fn add_marker(&mut self) {
        let midpoint = (self.start + self.end) / 2.0;
        let index = self.markers.partition_point(|&time| time < midpoint);
        self.markers.insert(index, midpoint);
        self.selected = Some(index);
    }

    /// Select the next marker inside the view, wrapping around.
    pub fn cycle_selection(&mut self) {
        let visible = self
            .markers
            .iter()
            .enumerate()
            .filter(|&(_, &time)| time >= self.start && time <= self.end)
            .map(|(index, _)| index)
            .collect::<Vec<_>>();

        self.selected = match (visible.first(), self.selected) {
            (None, _) => None,
            (Some(&first), None) => Some(first),
            (Some(&first), Some(current)) => match visible.iter().position(|&i| i == current) {
                Some(position) => Some(visible[(position + 1) % visible.len()]),
                None => Some(first),
            },
        };
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    pub fn delete_selected(&mut self) {
        let Some(index) = self.selected.filter(|&i| i < self.markers.len()) else {
            return;
        };
        self.markers.remove(index);
        self.selected = if self.markers.is_empty() {
            None
        } else {
            Some(index.min(self.markers.len() - 1))
        };
    }

    /// Arrow-key jog: moves the selected marker if there is one, else the view.
    pub fn jog(&mut self, direction: f64) {
        let step = self.span() * JOG_FRACTION * direction.signum();
        match self.selected.filter(|&i| i < self.markers.len()) {
            Some(index) => self.move_marker(index, step),
            None => self.shift_view(step),
        }
    }

    /// Shift-arrow jog: always moves the view.
    pub fn jog_fast(&mut self, direction: f64) {
        self.shift_view(self.span() * FAST_JOG_FRACTION * direction.signum());
    }

    pub fn zoom_in(&mut self) {
        self.zoom_to((self.span() * ZOOM_IN_FACTOR).max(self.min_span));
    }

    pub fn zoom_out(&mut self) {
        self.zoom_to((self.span() * ZOOM_OUT_FACTOR).min(self.total_duration));
    }

    fn move_marker(&mut self, index: usize, step: f64) {
        let time = (self.markers[index] + step).clamp(0.0, self.total_duration);
        self.markers.remove(index);
        let index = self.markers.partition_point(|&other| other < time);
        self.markers.insert(index, time);
        self.selected = Some(index);
    }

    fn shift_view(&mut self, step: f64) {
        let span = self.span();
        self.start += step;
        self.end += step;
        if self.start < 0.0 {
            self.start = 0.0;
            self.end = span;
        }
        if self.end > self.total_duration {
            self.end = self.total_duration;
            self.start = (self.end - span).max(0.0);
        }
    }

    fn zoom_to(&mut self, span: f64) {
        let centre = (self.start + self.end) / 2.0;
        self.start = centre - span / 2.0;
        self.end = centre + span / 2.0;
        if self.start < 0.0 {
            self.start = 0.0;
            self.end = span;
        }
        if self.end > self.total_duration {
            self.end = self.total_duration;
            self.start = (self.end - span).max(0.0);
        }
    }
}

/// The most recent envelope, regenerated only when the range or width moves.
#[derive(Debug, Default)]
pub struct CachedView {
    key: Option<(f64, f64, usize)>,
    envelope: Option<Envelope>,
}

impl CachedView {
    pub fn is_current(&self, state: &ViewerState, width: usize) -> bool {
        self.key == Some((state.start, state.end, width)) && self.envelope.is_some()
    }

    pub fn envelope(
        &mut self,
        store: &SampleStore,
        state: &ViewerState,
        width: usize,
    ) -> Result<&Envelope, WaveformError> {
        if !self.is_current(state, width) {
            let request = ViewRequest::with_width(state.start, state.end, width);
            self.envelope = Some(store.generate_view(&request)?);
            self.key = Some((state.start, state.end, width));
        }
        self.envelope
            .as_ref()
            .ok_or_else(|| WaveformError::Render("no envelope available".to_string()))
    }
}
