//! Visualization contract for recorded histories.
//!
//! The environment turns its history into [`PlotGroup`]s, one per column
//! group with at least one column chosen by a [`SeriesSelection`], and hands
//! them to a [`Visualizer`] backend. Backends only draw; they never read the
//! history directly.

mod selection;

pub use selection::{ColumnFilter, SelectionError, SeriesSelection};

use std::error::Error as StdError;

use crate::HistoryRecorder;

/// A boxed error returned by visualizer backends.
pub type VizError = Box<dyn StdError + Send + Sync>;

/// One named data series of `[time, value]` points.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub points: Vec<[f64; 2]>,
}

/// The series rendered together in a single plot.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotGroup {
    pub series: Vec<Series>,
}

impl PlotGroup {
    /// Builds one plot group per column group of `history`.
    ///
    /// Only columns accepted by `filter` are kept, and groups left without
    /// columns are skipped. The x value of each point is
    /// `row_index * step_size`; rows that lack a column contribute no point
    /// to that series.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn collect<H: HistoryRecorder + ?Sized>(
        history: &H,
        filter: &ColumnFilter,
        step_size: f64,
    ) -> Vec<PlotGroup> {
        let rows = history.rows();
        history
            .structured_cols()
            .iter()
            .filter_map(|group| {
                let series: Vec<Series> = group
                    .names()
                    .iter()
                    .filter(|name| filter.matches(name))
                    .map(|name| Series {
                        name: name.clone(),
                        points: rows
                            .iter()
                            .enumerate()
                            .filter_map(|(i, row)| row.get(name).map(|v| [i as f64 * step_size, v]))
                            .collect(),
                    })
                    .collect();
                (!series.is_empty()).then_some(PlotGroup { series })
            })
            .collect()
    }
}

/// A rendering backend for recorded plot groups.
pub trait Visualizer {
    /// Receives the plot groups after each step in step-wise mode.
    ///
    /// The default implementation does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`VizError`] if the backend fails to update.
    fn update(&mut self, _plots: &[PlotGroup]) -> Result<(), VizError> {
        Ok(())
    }

    /// Renders the final plot groups when the environment is closed.
    ///
    /// # Errors
    ///
    /// Returns [`VizError`] if rendering fails.
    fn render(&mut self, plots: &[PlotGroup]) -> Result<(), VizError>;
}
