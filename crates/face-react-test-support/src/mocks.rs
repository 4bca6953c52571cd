//! Mock implementations of core port traits.
//!
//! Every mock keeps its bookkeeping behind `Arc<Mutex<_>>` so a test can hold
//! a clone after handing the mock to a controller.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use face_react_core::domain::{
    ClassificationResult, EmotionDistribution, EmotionLabel, FaceCrop, FaceRegion, Frame,
};
use face_react_core::error::{Error, Result};
use face_react_core::ports::{DisplaySink, EmotionClassifier, FaceLocator, FrameSource};
use image::RgbImage;

fn locked<T: Clone>(m: &Mutex<T>) -> T {
    m.lock().unwrap_or_else(PoisonError::into_inner).clone()
}

/// Mock implementation of `FrameSource`.
///
/// Cycles through its frames forever. Frame numbers listed with
/// [`failing_on`](Self::failing_on) return a capture error instead.
#[derive(Clone)]
pub struct MockFrameSource {
    frames: Vec<Frame>,
    fail_on: Vec<usize>,
    captures: Arc<Mutex<usize>>,
    releases: Arc<Mutex<usize>>,
}

impl MockFrameSource {
    /// Creates a source that yields `frames` in order, repeating.
    #[must_use]
    pub fn new(frames: Vec<Frame>) -> Self {
        Self {
            frames,
            fail_on: Vec::new(),
            captures: Arc::new(Mutex::new(0)),
            releases: Arc::new(Mutex::new(0)),
        }
    }

    /// Creates a source that yields one blank frame forever.
    #[must_use]
    pub fn blank() -> Self {
        Self::new(vec![Frame::new(RgbImage::new(320, 240))])
    }

    /// Makes the given 1-based capture attempts fail.
    #[must_use]
    pub fn failing_on(mut self, attempts: &[usize]) -> Self {
        self.fail_on = attempts.to_vec();
        self
    }

    /// Number of `next_frame` calls so far.
    #[must_use]
    pub fn capture_count(&self) -> usize {
        locked(&self.captures)
    }

    /// Number of `release` calls so far.
    #[must_use]
    pub fn release_count(&self) -> usize {
        locked(&self.releases)
    }
}

impl FrameSource for MockFrameSource {
    fn next_frame(&mut self) -> Result<Frame> {
        let attempt = {
            let mut n = self.captures.lock().unwrap_or_else(PoisonError::into_inner);
            *n += 1;
            *n
        };
        if self.fail_on.contains(&attempt) {
            return Err(Error::Capture(format!("mock capture {attempt} failed")));
        }
        if self.frames.is_empty() {
            return Err(Error::Capture("mock source has no frames".into()));
        }
        Ok(self.frames[(attempt - 1) % self.frames.len()].clone())
    }

    fn release(&mut self) {
        *self.releases.lock().unwrap_or_else(PoisonError::into_inner) += 1;
    }
}

/// Mock implementation of `FaceLocator`.
///
/// Returns scripted detections in order, then no faces once the script runs
/// out.
#[derive(Clone)]
pub struct MockFaceLocator {
    script: Arc<Mutex<VecDeque<Vec<FaceRegion>>>>,
    calls: Arc<Mutex<usize>>,
}

impl MockFaceLocator {
    /// Creates a locator that returns each entry of `script` on successive
    /// calls.
    #[must_use]
    pub fn new(script: Vec<Vec<FaceRegion>>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into())),
            calls: Arc::new(Mutex::new(0)),
        }
    }

    /// A locator that never finds anything.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Number of `locate` calls so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        locked(&self.calls)
    }
}

impl FaceLocator for MockFaceLocator {
    fn locate(&mut self, _frame: &Frame) -> Vec<FaceRegion> {
        *self.calls.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_default()
    }
}

/// Mock implementation of `EmotionClassifier`.
///
/// Pops one scripted answer per call; an exhausted script classifies as
/// Neutral with full confidence. Every crop it sees is recorded.
#[derive(Clone)]
pub struct MockClassifier {
    script: Arc<Mutex<VecDeque<Option<ClassificationResult>>>>,
    seen: Arc<Mutex<Vec<FaceCrop>>>,
}

impl MockClassifier {
    /// Creates a classifier answering `results` in order.
    #[must_use]
    pub fn new(results: Vec<ClassificationResult>) -> Self {
        Self::scripted(results.into_iter().map(Some).collect())
    }

    /// Creates a classifier from a script where `None` is a failure.
    #[must_use]
    pub fn scripted(script: Vec<Option<ClassificationResult>>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into())),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Crops passed to the classifier so far.
    #[must_use]
    pub fn seen(&self) -> Vec<FaceCrop> {
        locked(&self.seen)
    }

    fn next_result(&self, face: &FaceCrop) -> Result<ClassificationResult> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(face.clone());

        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or(Some(ClassificationResult::new(EmotionLabel::Neutral, 1.0)))
            .ok_or_else(|| Error::Classify("mock classifier failure".into()))
    }
}

impl EmotionClassifier for MockClassifier {
    #[allow(clippy::cast_precision_loss)]
    fn distribution(&self, face: &FaceCrop) -> Result<EmotionDistribution> {
        let result = self.next_result(face)?;
        let rest = (1.0 - result.confidence) / (EmotionLabel::COUNT - 1) as f32;
        let mut probabilities = [rest; EmotionLabel::COUNT];
        probabilities[result.label.index()] = result.confidence;
        Ok(EmotionDistribution::new(probabilities))
    }

    // Scripted answers are returned as-is, even when the confidence is too
    // low to be the top of a real distribution.
    fn classify(&self, face: &FaceCrop) -> Result<ClassificationResult> {
        self.next_result(face)
    }
}

/// Mock implementation of `DisplaySink`.
///
/// Records every bitmap pushed to it. With [`failing`](Self::failing) set,
/// writes return a render error and are still counted.
#[derive(Clone, Default)]
pub struct MockDisplay {
    shown: Arc<Mutex<Vec<RgbImage>>>,
    attempts: Arc<Mutex<usize>>,
    failing: bool,
}

impl MockDisplay {
    /// Creates a display that accepts every write.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a display that rejects every write.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Bitmaps successfully shown, oldest first.
    #[must_use]
    pub fn shown(&self) -> Vec<RgbImage> {
        locked(&self.shown)
    }

    /// Number of successful writes.
    #[must_use]
    pub fn show_count(&self) -> usize {
        self.shown.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Number of writes attempted, failed ones included.
    #[must_use]
    pub fn attempt_count(&self) -> usize {
        locked(&self.attempts)
    }
}

impl DisplaySink for MockDisplay {
    fn show(&mut self, bitmap: &RgbImage) -> Result<()> {
        *self.attempts.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        if self.failing {
            return Err(Error::Render("mock display write failed".into()));
        }
        self.shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(bitmap.clone());
        Ok(())
    }
}
