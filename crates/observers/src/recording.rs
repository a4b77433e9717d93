use std::{cell::RefCell, rc::Rc};

use fmugym_core::{PlotGroup, Visualizer, viz::VizError};

#[derive(Debug, Default)]
struct Recording {
    updates: usize,
    latest: Vec<PlotGroup>,
    renders: Vec<Vec<PlotGroup>>,
}

/// A visualizer that records what it is asked to draw.
///
/// Clones share one recording, so a clone kept by the caller can inspect what
/// the controller sent to the clone it owns.
///
/// ```ignore
/// let recorder = RecordingVisualizer::new();
/// let config = EpisodeConfig::builder().visualizer(recorder.clone()) /* .. */;
/// // run an episode, then:
/// assert_eq!(recorder.renders().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingVisualizer {
    inner: Rc<RefCell<Recording>>,
}

impl RecordingVisualizer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns how many step-wise updates were received.
    #[must_use]
    pub fn updates(&self) -> usize {
        self.inner.borrow().updates
    }

    /// Returns the plot groups of the most recent update or render.
    #[must_use]
    pub fn latest(&self) -> Vec<PlotGroup> {
        self.inner.borrow().latest.clone()
    }

    /// Returns the plot groups of every render, oldest first.
    #[must_use]
    pub fn renders(&self) -> Vec<Vec<PlotGroup>> {
        self.inner.borrow().renders.clone()
    }
}

impl Visualizer for RecordingVisualizer {
    fn update(&mut self, plots: &[PlotGroup]) -> Result<(), VizError> {
        let mut recording = self.inner.borrow_mut();
        recording.updates += 1;
        recording.latest = plots.to_vec();
        Ok(())
    }

    fn render(&mut self, plots: &[PlotGroup]) -> Result<(), VizError> {
        let mut recording = self.inner.borrow_mut();
        recording.latest = plots.to_vec();
        recording.renders.push(plots.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use fmugym_core::Series;

    use super::*;

    fn group(name: &str, points: Vec<[f64; 2]>) -> PlotGroup {
        PlotGroup {
            series: vec![Series {
                name: name.into(),
                points,
            }],
        }
    }

    #[test]
    fn clones_share_the_recording() {
        let recorder = RecordingVisualizer::new();
        let mut owned = recorder.clone();

        owned.update(&[group("x", vec![[0.0, 1.0]])]).unwrap();
        owned.update(&[group("x", vec![[0.0, 1.0], [0.1, 2.0]])]).unwrap();

        assert_eq!(recorder.updates(), 2);
        assert_eq!(recorder.latest()[0].series[0].points.len(), 2);
        assert!(recorder.renders().is_empty());
    }

    #[test]
    fn render_is_kept_per_call() {
        let mut recorder = RecordingVisualizer::new();

        recorder.render(&[group("a", vec![])]).unwrap();
        recorder.render(&[]).unwrap();

        let renders = recorder.renders();
        assert_eq!(renders.len(), 2);
        assert_eq!(renders[0][0].series[0].name, "a");
        assert!(recorder.latest().is_empty());
    }
}
