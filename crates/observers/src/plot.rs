//! Plotting backend for episode histories.
//!
//! See [`PlotVisualizer`] for usage.

use eframe::egui;
use egui_plot::{Legend, Line, Plot, PlotPoints};
use fmugym_core::{PlotGroup, Visualizer, viz::VizError};

/// Height of each plot in the window, in points.
const PLOT_HEIGHT: f32 = 240.0;

/// Draws one plot per column group, x being simulation time.
///
/// Step-wise updates only keep the latest groups; the window is opened when
/// the episode is rendered and blocks until the user closes it.
///
/// # Example
///
/// ```ignore
/// let config = EpisodeConfig::builder()
///     .viz_mode(Some(VizMode::Episode))
///     .visualizer(PlotVisualizer::new("Microgrid").with_legend())
///     // ..
///     .build()?;
/// ```
pub struct PlotVisualizer {
    title: String,
    legend: bool,
    latest: Vec<PlotGroup>,
}

impl PlotVisualizer {
    /// Creates a visualizer whose window is titled `title`.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            legend: false,
            latest: Vec::new(),
        }
    }

    /// Labels each series by its column name.
    #[must_use]
    pub fn with_legend(mut self) -> Self {
        self.legend = true;
        self
    }

    /// Returns the groups received by the most recent update.
    #[must_use]
    pub fn latest(&self) -> &[PlotGroup] {
        &self.latest
    }

    /// Opens a blocking egui window displaying `plots`.
    ///
    /// # Errors
    ///
    /// Returns an error if the native window cannot be created.
    pub fn show(&self, plots: &[PlotGroup]) -> Result<(), eframe::Error> {
        let app = PlotApp {
            plots: to_traces(plots),
            legend: self.legend,
        };

        eframe::run_native(
            &self.title,
            eframe::NativeOptions::default(),
            Box::new(move |_cc| Ok(Box::new(app))),
        )
    }
}

impl Visualizer for PlotVisualizer {
    fn update(&mut self, plots: &[PlotGroup]) -> Result<(), VizError> {
        self.latest = plots.to_vec();
        Ok(())
    }

    fn render(&mut self, plots: &[PlotGroup]) -> Result<(), VizError> {
        self.show(plots).map_err(|err| VizError::from(err.to_string()))
    }
}

type Traces = Vec<(String, Vec<[f64; 2]>)>;

fn to_traces(plots: &[PlotGroup]) -> Vec<Traces> {
    plots
        .iter()
        .map(|group| {
            group
                .series
                .iter()
                .map(|series| (series.name.clone(), series.points.clone()))
                .collect()
        })
        .collect()
}

/// The egui [`eframe::App`] that renders one plot per group.
struct PlotApp {
    plots: Vec<Traces>,
    legend: bool,
}

impl eframe::App for PlotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                for (i, traces) in self.plots.iter().enumerate() {
                    let mut plot = Plot::new(("episode_plot", i))
                        .height(PLOT_HEIGHT)
                        .x_axis_label("time [s]");
                    if self.legend {
                        plot = plot.legend(Legend::default());
                    }
                    plot.show(ui, |plot_ui| {
                        for (name, points) in traces {
                            let plot_points: PlotPoints = points.iter().copied().collect();
                            plot_ui.line(Line::new(plot_points).name(name));
                        }
                    });
                }
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use fmugym_core::Series;

    use super::*;

    fn group(series: &[(&str, &[[f64; 2]])]) -> PlotGroup {
        PlotGroup {
            series: series
                .iter()
                .map(|(name, points)| Series {
                    name: (*name).into(),
                    points: points.to_vec(),
                })
                .collect(),
        }
    }

    #[test]
    fn keeps_one_trace_list_per_group() {
        let plots = [
            group(&[("a", &[[0.0, 1.0]])]),
            group(&[("b", &[[0.0, 2.0]]), ("c", &[[0.0, 3.0], [0.1, 4.0]])]),
        ];

        let traces = to_traces(&plots);

        assert_eq!(traces.len(), 2);
        assert_eq!(traces[1][1].0, "c");
        assert_eq!(traces[1][1].1, [[0.0, 3.0], [0.1, 4.0]]);
    }

    #[test]
    fn update_keeps_latest_groups() {
        let mut viz = PlotVisualizer::new("episode").with_legend();
        viz.update(&[group(&[("a", &[])])]).unwrap();
        viz.update(&[]).unwrap();

        assert!(viz.latest().is_empty());
    }
}
