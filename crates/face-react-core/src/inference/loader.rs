//! Weight loading for safetensors model artifacts.

use std::collections::HashMap;
use std::path::Path;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use safetensors::SafeTensors;
use tracing::debug;

use crate::error::{Error, Result};

/// Reads a safetensors artifact into a `VarBuilder`.
///
/// Every tensor is materialized on `device`; the builder hands them out as
/// `f32`.
///
/// # Errors
///
/// Returns [`Error::ModelLoad`] if the file is missing, is not valid
/// safetensors, or holds a tensor of an unsupported dtype.
pub fn load_weights(path: impl AsRef<Path>, device: &Device) -> Result<VarBuilder<'static>> {
    let path = path.as_ref();
    debug!("Loading weights from {}", path.display());

    let data = std::fs::read(path).map_err(|e| Error::model_load(path, e))?;
    let tensors = SafeTensors::deserialize(&data).map_err(|e| Error::model_load(path, e))?;

    let views = tensors.tensors();
    if views.is_empty() {
        return Err(Error::model_load(path, "artifact contains no tensors"));
    }

    let mut weights: HashMap<String, Tensor> = HashMap::with_capacity(views.len());
    for (name, view) in views {
        let dtype = candle_dtype(view.dtype()).ok_or_else(|| {
            Error::model_load(
                path,
                format!("tensor '{name}' has unsupported dtype {:?}", view.dtype()),
            )
        })?;

        let tensor = Tensor::from_raw_buffer(view.data(), dtype, view.shape(), device)
            .map_err(|e| Error::model_load(path, format!("tensor '{name}': {e}")))?;

        weights.insert(name, tensor);
    }

    debug!("Loaded {} tensors", weights.len());
    Ok(VarBuilder::from_tensors(weights, DType::F32, device))
}

fn candle_dtype(dtype: safetensors::Dtype) -> Option<DType> {
    use safetensors::Dtype as S;
    match dtype {
        S::F32 => Some(DType::F32),
        S::F64 => Some(DType::F64),
        S::F16 => Some(DType::F16),
        S::BF16 => Some(DType::BF16),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_safetensors(
        dtype: safetensors::Dtype,
        bytes: &[u8],
        shape: Vec<usize>,
    ) -> NamedTempFile {
        use safetensors::serialize;
        use safetensors::tensor::TensorView;

        let tensor = TensorView::new(dtype, shape, bytes).expect("valid tensor view");
        let tensors = HashMap::from([("head.weight".to_string(), tensor)]);
        let serialized = serialize(&tensors, &None).expect("serialize");

        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(&serialized).expect("write");
        file
    }

    #[test]
    fn test_load_weights() {
        let data: Vec<f32> = vec![1.0, 2.0, 3.0, 4.0];
        let file = write_safetensors(
            safetensors::Dtype::F32,
            bytemuck::cast_slice(&data),
            vec![2, 2],
        );

        let vb = load_weights(file.path(), &Device::Cpu).expect("load");
        let tensor = vb.get((2, 2), "head.weight").expect("tensor present");
        assert_eq!(tensor.to_vec2::<f32>().expect("vec"), vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
    }

    #[test]
    fn test_missing_file_is_model_load_error() {
        let err = load_weights("/nonexistent/emotion.safetensors", &Device::Cpu);
        assert!(matches!(err, Err(Error::ModelLoad { .. })));
    }

    #[test]
    fn test_garbage_file_is_model_load_error() {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(b"this is an hdf5 file, honest").expect("write");
        let err = load_weights(file.path(), &Device::Cpu);
        assert!(matches!(err, Err(Error::ModelLoad { .. })));
    }

    #[test]
    fn test_integer_tensor_rejected() {
        let data: Vec<i32> = vec![1, 2, 3, 4];
        let file =
            write_safetensors(safetensors::Dtype::I32, bytemuck::cast_slice(&data), vec![4]);
        let err = load_weights(file.path(), &Device::Cpu);
        assert!(matches!(
            err,
            Err(Error::ModelLoad { ref reason, .. }) if reason.contains("unsupported dtype")
        ));
    }
}
