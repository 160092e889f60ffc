//! Tick spacing for time axes, shared by the terminal ruler and the plot.

/// How many ticks to place across a time range and how to label them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickLayout {
    /// Seconds between consecutive ticks.
    pub interval: f64,
    /// Decimal places used when formatting a tick label.
    pub precision: usize,
    /// Number of intervals; `count + 1` ticks are drawn.
    pub count: usize,
}

impl TickLayout {
    /// Tick times from `start`, never past `end`.
    pub fn times(&self, start: f64, end: f64) -> Vec<f64> {
        (0..=self.count)
            .map(|i| (start + i as f64 * self.interval).min(end))
            .collect()
    }

    pub fn format(&self, seconds: f64) -> String {
        format!("{:.*}", self.precision, seconds)
    }
}

/// Pick a tick interval for a range `duration` seconds long.
///
/// Aims for roughly 5 to 15 ticks; outside that band the range is split
/// evenly into 5 or 12 intervals instead.
pub fn tick_layout(duration: f64) -> TickLayout {
    let (interval, precision) = if duration < 0.1 {
        (0.01, 4)
    } else if duration < 1.0 {
        (0.05, 3)
    } else if duration < 10.0 {
        (0.5, 2)
    } else if duration < 60.0 {
        (2.0, 1)
    } else {
        (10.0, 0)
    };

    let count = (duration / interval).max(0.0) as usize;
    let (interval, count) = if count < 5 {
        (duration / 5.0, 5)
    } else if count > 15 {
        (duration / 12.0, 12)
    } else {
        (interval, count)
    };

    TickLayout {
        interval,
        precision,
        count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_ranges_are_split_into_five() {
        let layout = tick_layout(2.0);
        assert_eq!(layout.precision, 2);
        assert_eq!(layout.count, 5);
        assert!((layout.interval - 0.4).abs() < 1e-12);
        assert_eq!(layout.times(0.0, 2.0).len(), 6);
    }

    #[test]
    fn mid_ranges_keep_the_natural_interval() {
        let layout = tick_layout(100.0);
        assert_eq!(layout.precision, 0);
        assert_eq!(layout.count, 10);
        assert_eq!(layout.interval, 10.0);
        assert_eq!(layout.format(30.0), "30");
    }

    #[test]
    fn long_ranges_are_capped_at_twelve() {
        let layout = tick_layout(1_000.0);
        assert_eq!(layout.count, 12);
        let times = layout.times(0.0, 1_000.0);
        assert_eq!(times.first(), Some(&0.0));
        assert!((times[12] - 1_000.0).abs() < 1e-9);
    }

    #[test]
    fn precision_follows_duration() {
        assert_eq!(tick_layout(0.05).precision, 4);
        assert_eq!(tick_layout(0.5).precision, 3);
        assert_eq!(tick_layout(30.0).precision, 1);
        assert_eq!(tick_layout(0.5).format(0.125), "0.125");
    }
}
