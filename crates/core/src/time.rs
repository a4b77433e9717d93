/// The interval `[start, end]` integrated during one control step.
///
/// A window is identified by its step index `k` and covers
/// `[time_start + k·step_size, time_start + (k+1)·step_size]`. Deriving both
/// ends from the index keeps `end - start == step_size` without accumulating
/// rounding drift over long episodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    time_start: f64,
    step_size: f64,
    index: u64,
}

impl TimeWindow {
    /// Creates the first window of an episode, `[time_start, time_start + step_size]`.
    #[must_use]
    pub fn first(time_start: f64, step_size: f64) -> Self {
        Self {
            time_start,
            step_size,
            index: 0,
        }
    }

    /// Returns the window start.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn start(&self) -> f64 {
        self.time_start + self.index as f64 * self.step_size
    }

    /// Returns the window end.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn end(&self) -> f64 {
        self.time_start + (self.index + 1) as f64 * self.step_size
    }

    /// Returns the number of times this window has been advanced.
    #[must_use]
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Returns the window length.
    #[must_use]
    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    /// Moves the window forward by one step.
    pub fn advance(&mut self) {
        self.index += 1;
    }
}
