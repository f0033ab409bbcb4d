//! Checkpoint persistence for the trained model and its label encoding.
//!
//! A checkpoint is a single SafeTensors file. Each linear layer's parameters
//! are stored as named F32 tensors (`hidden.{i}.weight`, `output.bias`, ...)
//! and the metadata block carries two JSON strings: `architecture` (the
//! [`PerceptronConfig`]) and `labels` (the phoneme category list). That is
//! everything needed to resume training or reuse the model for inference.

use crate::dataset::LabelEncoding;
use crate::error::DataError;
use crate::model::{Perceptron, PerceptronConfig};
use burn::module::Param;
use burn::nn::Linear;
use burn::tensor::backend::Backend;
use burn::tensor::{Tensor, TensorData};
use safetensors::tensor::TensorView;
use safetensors::{Dtype, SafeTensors};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const METADATA_ARCHITECTURE: &str = "architecture";
const METADATA_LABELS: &str = "labels";

/// How the trainer obtains its model: build fresh or resume a checkpoint.
///
/// The caller decides the variant explicitly; nothing in the training path
/// inspects the filesystem to choose.
#[derive(Debug, Clone)]
pub enum ModelSource {
    Fresh(PerceptronConfig),
    Resume(PathBuf),
}

/// Materialize a model from a [`ModelSource`].
pub fn load_or_init<B: Backend>(
    source: ModelSource,
    device: &B::Device,
) -> Result<(Perceptron<B>, PerceptronConfig), DataError> {
    match source {
        ModelSource::Fresh(config) => {
            let model = config.init(device)?;
            Ok((model, config))
        }
        ModelSource::Resume(path) => {
            let (model, config, _labels) = load_checkpoint(&path, device)?;
            Ok((model, config))
        }
    }
}

/// Write the model, its architecture, and the label encoding to one file.
pub fn save_checkpoint<B: Backend>(
    path: impl AsRef<Path>,
    model: &Perceptron<B>,
    config: &PerceptronConfig,
    labels: &LabelEncoding,
) -> Result<(), DataError> {
    let path = path.as_ref();
    let bad = |reason: String| DataError::BadCheckpoint {
        path: path.to_path_buf(),
        reason,
    };

    let mut buffers = Vec::new();
    for (name, shape, values) in model.export_tensors() {
        let mut bytes = Vec::with_capacity(values.len() * 4);
        for value in values {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        buffers.push((name, shape, bytes));
    }

    let mut views = Vec::with_capacity(buffers.len());
    for (name, shape, bytes) in &buffers {
        let view = TensorView::new(Dtype::F32, shape.clone(), bytes)
            .map_err(|e| bad(e.to_string()))?;
        views.push((name.clone(), view));
    }

    let mut metadata = HashMap::new();
    metadata.insert(
        METADATA_ARCHITECTURE.to_string(),
        serde_json::to_string(config).map_err(|e| bad(e.to_string()))?,
    );
    metadata.insert(
        METADATA_LABELS.to_string(),
        serde_json::to_string(labels.categories()).map_err(|e| bad(e.to_string()))?,
    );

    let serialized =
        safetensors::serialize(views, &Some(metadata)).map_err(|e| bad(e.to_string()))?;
    std::fs::write(path, serialized)?;
    Ok(())
}

/// Load a checkpoint back into a model, its architecture, and its labels.
pub fn load_checkpoint<B: Backend>(
    path: impl AsRef<Path>,
    device: &B::Device,
) -> Result<(Perceptron<B>, PerceptronConfig, LabelEncoding), DataError> {
    let path = path.as_ref();
    let bad = |reason: String| DataError::BadCheckpoint {
        path: path.to_path_buf(),
        reason,
    };

    let bytes = std::fs::read(path)?;
    let (_, header) = SafeTensors::read_metadata(&bytes).map_err(|e| bad(e.to_string()))?;
    let extra = header
        .metadata()
        .as_ref()
        .ok_or_else(|| bad("missing metadata block".to_string()))?;

    let config: PerceptronConfig = serde_json::from_str(
        extra
            .get(METADATA_ARCHITECTURE)
            .ok_or_else(|| bad("missing architecture metadata".to_string()))?,
    )
    .map_err(|e| bad(format!("bad architecture metadata: {e}")))?;
    let categories: Vec<String> = serde_json::from_str(
        extra
            .get(METADATA_LABELS)
            .ok_or_else(|| bad("missing labels metadata".to_string()))?,
    )
    .map_err(|e| bad(format!("bad labels metadata: {e}")))?;
    let labels = LabelEncoding::from_categories(categories);

    let tensors = SafeTensors::deserialize(&bytes).map_err(|e| bad(e.to_string()))?;
    let mut model = config
        .init::<B>(device)
        .map_err(|e| bad(format!("invalid architecture: {e}")))?;

    for (idx, layer) in model.hidden.iter_mut().enumerate() {
        load_linear(&tensors, &format!("hidden.{idx}"), layer, device, &bad)?;
    }
    load_linear(&tensors, "output", &mut model.output, device, &bad)?;

    Ok((model, config, labels))
}

fn load_linear<B: Backend>(
    tensors: &SafeTensors<'_>,
    prefix: &str,
    layer: &mut Linear<B>,
    device: &B::Device,
    bad: &impl Fn(String) -> DataError,
) -> Result<(), DataError> {
    let weight_dims = layer.weight.shape().dims::<2>();
    let weight = read_tensor(tensors, &format!("{prefix}.weight"), &weight_dims, bad)?;
    layer.weight = Param::from_tensor(Tensor::<B, 2>::from_data(
        TensorData::new(weight, weight_dims),
        device,
    ));

    if let Some(bias) = layer.bias.as_mut() {
        let bias_dims = bias.shape().dims::<1>();
        let values = read_tensor(tensors, &format!("{prefix}.bias"), &bias_dims, bad)?;
        *bias = Param::from_tensor(Tensor::<B, 1>::from_data(
            TensorData::new(values, bias_dims),
            device,
        ));
    }
    Ok(())
}

fn read_tensor(
    tensors: &SafeTensors<'_>,
    name: &str,
    expected_shape: &[usize],
    bad: &impl Fn(String) -> DataError,
) -> Result<Vec<f32>, DataError> {
    let view = tensors
        .tensor(name)
        .map_err(|e| bad(format!("missing tensor {name}: {e}")))?;
    if view.shape() != expected_shape {
        return Err(bad(format!(
            "tensor {name} has shape {:?}, expected {:?}",
            view.shape(),
            expected_shape
        )));
    }
    if view.dtype() != Dtype::F32 {
        return Err(bad(format!(
            "tensor {name} has dtype {:?}, expected F32",
            view.dtype()
        )));
    }

    let mut values = Vec::with_capacity(view.data().len() / 4);
    for chunk in view.data().chunks_exact(4) {
        values.push(f32::from_le_bytes(chunk.try_into().expect("f32 chunk")));
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::{load_checkpoint, load_or_init, save_checkpoint, ModelSource};
    use crate::dataset::LabelEncoding;
    use crate::model::PerceptronConfig;
    use burn_ndarray::{NdArray, NdArrayDevice};
    use tempfile::tempdir;

    type B = NdArray<f32>;

    #[test]
    fn checkpoint_roundtrip_preserves_everything() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("model.safetensors");
        let device = NdArrayDevice::default();

        let config = PerceptronConfig::uniform(6, 2, 4, true);
        let model = config.init::<B>(&device).expect("model");
        let labels =
            LabelEncoding::from_categories(vec!["ah".to_string(), "ee".to_string()]);

        save_checkpoint(&path, &model, &config, &labels).expect("save");
        let (loaded, loaded_config, loaded_labels) =
            load_checkpoint::<B>(&path, &device).expect("load");

        assert_eq!(loaded_config, config);
        assert_eq!(loaded_labels, labels);

        let before = model.export_tensors();
        let after = loaded.export_tensors();
        assert_eq!(before.len(), after.len());
        for ((name_a, shape_a, values_a), (name_b, shape_b, values_b)) in
            before.into_iter().zip(after)
        {
            assert_eq!(name_a, name_b);
            assert_eq!(shape_a, shape_b);
            assert_eq!(values_a, values_b);
        }
    }

    #[test]
    fn fresh_source_builds_from_config_without_touching_disk() {
        let device = NdArrayDevice::default();
        let config = PerceptronConfig::uniform(4, 1, 2, false);
        let (model, loaded_config) =
            load_or_init::<B>(ModelSource::Fresh(config.clone()), &device).expect("init");
        assert_eq!(loaded_config, config);
        assert_eq!(model.export_tensors().len(), 4);
    }

    #[test]
    fn resume_from_missing_file_fails() {
        let device = NdArrayDevice::default();
        let err = load_or_init::<B>(
            ModelSource::Resume("missing.safetensors".into()),
            &device,
        )
        .unwrap_err();
        assert!(matches!(err, crate::error::DataError::Io(_)));
    }

    #[test]
    fn fresh_source_with_a_bad_architecture_is_a_typed_error() {
        let device = NdArrayDevice::default();
        let config = PerceptronConfig {
            input_size: 4,
            output_size: 4,
            hidden_layers: 2,
            hidden_sizes: vec![3],
            bounded_output: false,
        };
        let err = load_or_init::<B>(ModelSource::Fresh(config), &device).unwrap_err();
        assert!(matches!(err, crate::error::DataError::Config(_)));
    }
}
