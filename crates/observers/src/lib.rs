//! Visualizer backends for fmugym episode histories.
//!
//! # Backends
//!
//! - [`RecordingVisualizer`]: keeps the plot groups it receives, for headless
//!   runs and tests
//! - `PlotVisualizer`: opens a blocking egui window with one plot per column
//!   group (requires the `plot` feature)
//!
//! # Features
//!
//! - `plot`: Enables `PlotVisualizer`. This feature adds dependencies on
//!   `eframe` and `egui_plot`.

mod recording;

pub use recording::RecordingVisualizer;

#[cfg(feature = "plot")]
mod plot;

#[cfg(feature = "plot")]
pub use plot::PlotVisualizer;
