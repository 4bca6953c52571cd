//! Facial expression classifier.
//!
//! A compact fully-convolutional CNN in the style of mini-Xception: four
//! conv/pool stages over the 64×64 luma crop, a 1×1 conv producing one map per
//! emotion, global average pooling and softmax.

use std::path::Path;

use candle_core::{Device, Module, Tensor};
use candle_nn::{conv2d, Conv2d, Conv2dConfig, VarBuilder};
use tracing::{debug, info};

use super::{load_weights, select_device, to_distribution};
use crate::domain::{EmotionDistribution, EmotionLabel, FaceCrop, CROP_SIZE};
use crate::error::{Error, Result};
use crate::ports::EmotionClassifier;

/// Input/output channels of each conv stage.
const STAGES: [(usize, usize); 4] = [(1, 8), (8, 16), (16, 32), (32, 64)];

/// Network definition.
///
/// Weight names: `conv1`..`conv4` and `head`, each with `weight` and `bias`.
pub struct EmotionNet {
    stages: Vec<Conv2d>,
    head: Conv2d,
}

impl EmotionNet {
    /// Builds the network from weights.
    ///
    /// # Errors
    ///
    /// Fails if a tensor is missing or has the wrong shape.
    #[allow(clippy::needless_pass_by_value)]
    pub fn new(vb: VarBuilder) -> candle_core::Result<Self> {
        let same = Conv2dConfig {
            padding: 1,
            ..Conv2dConfig::default()
        };

        let stages = STAGES
            .iter()
            .enumerate()
            .map(|(i, (in_c, out_c))| {
                conv2d(*in_c, *out_c, 3, same, vb.pp(format!("conv{}", i + 1)))
            })
            .collect::<candle_core::Result<Vec<_>>>()?;

        let (_, last_c) = STAGES[STAGES.len() - 1];
        let head = conv2d(
            last_c,
            EmotionLabel::COUNT,
            1,
            Conv2dConfig::default(),
            vb.pp("head"),
        )?;

        Ok(Self { stages, head })
    }
}

impl Module for EmotionNet {
    fn forward(&self, x: &Tensor) -> candle_core::Result<Tensor> {
        // 64 -> 32 -> 16 -> 8 -> 4
        let mut h = x.clone();
        for stage in &self.stages {
            h = stage.forward(&h)?.relu()?.max_pool2d(2)?;
        }

        // (N, 7, 4, 4) -> (N, 7)
        let logits = self.head.forward(&h)?.mean((2, 3))?;
        candle_nn::ops::softmax_last_dim(&logits)
    }
}

/// [`EmotionClassifier`] backed by [`EmotionNet`].
pub struct CnnEmotionClassifier {
    net: EmotionNet,
    device: Device,
}

impl CnnEmotionClassifier {
    /// Loads the model artifact at `path` onto the best available device.
    ///
    /// The network is probed once with a blank crop so an incompatible
    /// artifact fails here rather than in the loop.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ModelLoad`] if the artifact is missing or does not fit
    /// the network.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading emotion model from {}", path.display());

        let device = select_device();
        let vb = load_weights(path, &device)?;
        let classifier = Self::from_var_builder(vb).map_err(|e| Error::model_load(path, e))?;

        classifier
            .distribution(&FaceCrop::zeros())
            .map_err(|e| Error::model_load(path, e))?;

        Ok(classifier)
    }

    /// Builds a classifier from an existing `VarBuilder`.
    ///
    /// # Errors
    ///
    /// Fails if a tensor is missing or has the wrong shape.
    pub fn from_var_builder(vb: VarBuilder) -> candle_core::Result<Self> {
        let device = vb.device().clone();
        let net = EmotionNet::new(vb)?;
        Ok(Self { net, device })
    }

    fn input(&self, face: &FaceCrop) -> candle_core::Result<Tensor> {
        Tensor::from_slice(face.pixels(), (1, 1, CROP_SIZE, CROP_SIZE), &self.device)
    }

    fn probabilities(&self, face: &FaceCrop) -> candle_core::Result<Vec<f32>> {
        let input = self.input(face)?;
        self.net.forward(&input)?.squeeze(0)?.to_vec1::<f32>()
    }
}

impl EmotionClassifier for CnnEmotionClassifier {
    fn distribution(&self, face: &FaceCrop) -> Result<EmotionDistribution> {
        let probabilities = self
            .probabilities(face)
            .map_err(|e| Error::Classify(e.to_string()))?;
        debug!("Emotion probabilities: {probabilities:?}");
        to_distribution(&probabilities)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use candle_core::DType;
    use candle_nn::VarMap;

    fn random_classifier() -> (CnnEmotionClassifier, VarMap) {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        let classifier = CnnEmotionClassifier::from_var_builder(vb).expect("build");
        (classifier, varmap)
    }

    #[test]
    fn test_pooling_reaches_four_by_four() {
        assert_eq!(CROP_SIZE >> STAGES.len(), 4);
    }

    #[test]
    fn test_distribution_sums_to_one() {
        let (classifier, _) = random_classifier();
        let dist = classifier
            .distribution(&FaceCrop::zeros())
            .expect("distribution");
        let total: f32 = dist.as_slice().iter().sum();
        assert!((total - 1.0).abs() < 1e-4);
        assert!(dist.as_slice().iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_zero_crop_is_deterministic() {
        let (classifier, _) = random_classifier();
        let first = classifier.classify(&FaceCrop::zeros()).expect("first");
        let second = classifier.classify(&FaceCrop::zeros()).expect("second");
        assert_eq!(first, second);
    }

    #[test]
    fn test_classify_matches_distribution_top() {
        let (classifier, _) = random_classifier();
        let crop = FaceCrop::from_pixels(vec![0.5; FaceCrop::LEN]).expect("crop");
        let dist = classifier.distribution(&crop).expect("distribution");
        let result = classifier.classify(&crop).expect("classify");
        assert_eq!(result, dist.top());
    }

    #[test]
    fn test_load_saved_weights() {
        let (original, varmap) = random_classifier();
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("emotion.safetensors");
        varmap.save(&path).expect("save");

        let loaded = CnnEmotionClassifier::load(&path).expect("load");
        let crop = FaceCrop::from_pixels(vec![0.25; FaceCrop::LEN]).expect("crop");
        let a = original.distribution(&crop).expect("original");
        let b = loaded.distribution(&crop).expect("loaded");
        for (x, y) in a.as_slice().iter().zip(b.as_slice()) {
            assert!((x - y).abs() < 1e-5);
        }
    }

    #[test]
    fn test_load_missing_artifact() {
        let result = CnnEmotionClassifier::load("/nonexistent/emotion_model.safetensors");
        assert!(matches!(result, Err(Error::ModelLoad { .. })));
    }

    #[test]
    fn test_load_incompatible_artifact() {
        // A model with a different first stage width
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        conv2d(1, 4, 3, Conv2dConfig::default(), vb.pp("conv1")).expect("conv");

        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("other.safetensors");
        varmap.save(&path).expect("save");

        let result = CnnEmotionClassifier::load(&path);
        assert!(matches!(result, Err(Error::ModelLoad { .. })));
    }
}
