//! Core contracts and types for the fmugym framework.
//!
//! This crate defines the shared abstractions that the solver, environment,
//! and observer crates build on:
//!
//! - [`ModelAdapter`]: a stateful continuous-time model (typically an FMU)
//!   exposing its state and (directional) derivatives
//! - [`Row`]: a single structured record keyed by column name
//! - [`TimeWindow`]: the interval integrated during one control step
//! - [`HistoryRecorder`]: an append-only table whose column schema may grow
//!   by whole [`ColumnGroup`]s
//! - [`Visualizer`]: a rendering backend for recorded [`PlotGroup`]s, with
//!   columns chosen by a [`SeriesSelection`]

pub mod history;
mod model;
mod row;
mod time;
pub mod viz;

pub use history::{ColumnGroup, EmptyHistory, FullHistory, HistoryRecorder, SchemaConflict};
pub use model::{EventInfo, ModelAdapter, ValueRef};
pub use row::Row;
pub use time::TimeWindow;
pub use viz::{PlotGroup, Series, SeriesSelection, Visualizer};
