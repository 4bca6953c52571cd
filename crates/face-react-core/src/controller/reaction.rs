//! The capture → detect → classify → render loop.

use std::time::Duration;

use tracing::{debug, info, warn};

use super::policy::{next_display, Observation, DEFAULT_THRESHOLD};
use crate::domain::{EmotionLabel, FaceCrop};
use crate::ports::{DisplaySink, EmotionClassifier, FaceLocator, FrameSource};
use crate::render::ExpressionRenderer;
use crate::shutdown::Shutdown;

/// Default pause between cycles.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(800);

/// Tunables for [`ReactionController`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReactionConfig {
    /// Confidence a new label must strictly exceed to be shown.
    pub threshold: f32,
    /// Fixed sleep at the end of each cycle.
    pub interval: Duration,
    /// Stop after this many cycles. `None` runs until interrupted.
    pub max_cycles: Option<u64>,
}

impl Default for ReactionConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            interval: DEFAULT_INTERVAL,
            max_cycles: None,
        }
    }
}

/// What a single [`ReactionController::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The display changed to this label.
    Rendered(EmotionLabel),
    /// The display was left as it was.
    Unchanged,
    /// Capture or classification failed; the cycle was dropped.
    Abandoned,
}

/// Totals returned by [`ReactionController::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Cycles started.
    pub cycles: u64,
    /// Cycles that changed the display.
    pub renders: u64,
    /// Cycles dropped after a capture or classification error.
    pub abandoned: u64,
}

/// Drives the reaction loop and owns every collaborator.
///
/// Cleanup (clear, flush, release the source) happens exactly once, either at
/// the end of [`run`](Self::run), through [`finish`](Self::finish), or on drop.
pub struct ReactionController<S, L, C, D>
where
    S: FrameSource,
    L: FaceLocator,
    C: EmotionClassifier,
    D: DisplaySink,
{
    source: S,
    locator: L,
    classifier: C,
    renderer: ExpressionRenderer<D>,
    config: ReactionConfig,
    display_state: Option<EmotionLabel>,
    frame_count: u64,
    finished: bool,
}

impl<S, L, C, D> ReactionController<S, L, C, D>
where
    S: FrameSource,
    L: FaceLocator,
    C: EmotionClassifier,
    D: DisplaySink,
{
    /// Assembles a controller. Nothing is shown until the first cycle.
    pub fn new(
        source: S,
        locator: L,
        classifier: C,
        renderer: ExpressionRenderer<D>,
        config: ReactionConfig,
    ) -> Self {
        Self {
            source,
            locator,
            classifier,
            renderer,
            config,
            display_state: None,
            frame_count: 0,
            finished: false,
        }
    }

    /// Starts from a label already on screen, e.g. Neutral after the self-test.
    #[must_use]
    pub const fn with_display_state(mut self, label: Option<EmotionLabel>) -> Self {
        self.display_state = label;
        self
    }

    /// Runs one cycle without the trailing sleep.
    pub fn step(&mut self) -> CycleOutcome {
        self.frame_count += 1;
        let n = self.frame_count;

        let frame = match self.source.next_frame() {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Frame {n}: capture failed: {e}");
                return CycleOutcome::Abandoned;
            }
        };

        let faces = self.locator.locate(&frame);
        debug!("Frame {n}: {} face(s) found", faces.len());

        let observation = match faces.first() {
            Some(region) => {
                let crop = FaceCrop::from_frame(&frame, region);
                match self.classifier.classify(&crop) {
                    Ok(result) => {
                        debug!(
                            "Frame {n}: {} (confidence {:.2})",
                            result.label, result.confidence
                        );
                        Observation::Face(result)
                    }
                    Err(e) => {
                        warn!("Frame {n}: classification failed: {e}");
                        return CycleOutcome::Abandoned;
                    }
                }
            }
            None => Observation::NoFace,
        };

        let Some(label) = next_display(self.display_state, &observation, self.config.threshold)
        else {
            return CycleOutcome::Unchanged;
        };

        match observation {
            Observation::Face(result) => info!(
                "Frame {n}: {label} (confidence {:.2})",
                result.confidence
            ),
            Observation::NoFace => info!("Frame {n}: no face, back to {label}"),
        }
        self.renderer.render(label);
        self.display_state = Some(label);
        CycleOutcome::Rendered(label)
    }

    /// Loops until `shutdown` is requested or the cycle limit is reached, then
    /// cleans up.
    pub fn run(&mut self, shutdown: &Shutdown) -> RunSummary {
        let mut summary = RunSummary::default();
        info!("Starting reaction loop");

        while !shutdown.is_requested() {
            if self
                .config
                .max_cycles
                .is_some_and(|max| summary.cycles >= max)
            {
                break;
            }

            match self.step() {
                CycleOutcome::Rendered(_) => summary.renders += 1,
                CycleOutcome::Abandoned => summary.abandoned += 1,
                CycleOutcome::Unchanged => {}
            }
            summary.cycles += 1;

            let last = self.config.max_cycles == Some(summary.cycles);
            if last || !shutdown.sleep(self.config.interval) {
                break;
            }
        }

        info!(
            "Reaction loop stopped after {} cycle(s), {} render(s), {} abandoned",
            summary.cycles, summary.renders, summary.abandoned
        );
        self.finish();
        summary
    }

    /// Clears and flushes the display, then releases the frame source.
    /// Later calls do nothing.
    pub fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;

        info!("Cleaning up");
        self.renderer.clear();
        if let Err(e) = self.renderer.present() {
            warn!("Could not clear display: {e}");
        }
        self.source.release();
    }

    /// The label currently shown, if any.
    pub const fn display_state(&self) -> Option<EmotionLabel> {
        self.display_state
    }

    /// Cycles started so far.
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub const fn renderer(&self) -> &ExpressionRenderer<D> {
        &self.renderer
    }
}

impl<S, L, C, D> Drop for ReactionController<S, L, C, D>
where
    S: FrameSource,
    L: FaceLocator,
    C: EmotionClassifier,
    D: DisplaySink,
{
    fn drop(&mut self) {
        self.finish();
    }
}
