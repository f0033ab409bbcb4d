//! Minibatch training and evaluation over the waveform dataset.
//!
//! One epoch walks the dataset in index order, stacks each index range into a
//! `[batch, wave_size]` tensor, and runs forward / MSE loss / backward /
//! optimizer step per batch. The epoch's aggregate loss is the arithmetic
//! mean of the per-batch losses. Evaluation runs the same forward and loss
//! computation on the inner (non-autodiff) model without touching parameters.

use crate::dataset::AudioEncoderDataset;
use crate::error::TrainingError;
use crate::model::Perceptron;
use crate::perf::{self, Metric};
use burn::nn::loss::{MseLoss, Reduction};
use burn::optim::{GradientsParams, Optimizer};
use burn::tensor::backend::{AutodiffBackend, Backend};
use burn::tensor::{ElementConversion, Tensor, TensorData};
use std::ops::Range;

/// Split `0..len` into consecutive ranges of at most `batch_size` items.
pub fn batch_ranges(len: usize, batch_size: usize) -> Vec<Range<usize>> {
    let batch_size = batch_size.max(1);
    let mut ranges = Vec::with_capacity(len.div_ceil(batch_size));
    let mut start = 0;
    while start < len {
        let end = (start + batch_size).min(len);
        ranges.push(start..end);
        start = end;
    }
    ranges
}

fn batch_tensors<B: Backend>(
    dataset: &AudioEncoderDataset,
    range: Range<usize>,
    device: &B::Device,
) -> Result<(Tensor<B, 2>, Tensor<B, 2>), TrainingError> {
    let rows = range.len();
    let wave_size = dataset.wave_size();
    let mut inputs = Vec::with_capacity(rows * wave_size);
    let mut targets = Vec::with_capacity(rows * wave_size);
    for index in range {
        let pair = dataset.get(index)?;
        inputs.extend_from_slice(&pair.input);
        targets.extend_from_slice(&pair.target);
    }
    let inputs = Tensor::from_data(TensorData::new(inputs, [rows, wave_size]), device);
    let targets = Tensor::from_data(TensorData::new(targets, [rows, wave_size]), device);
    Ok((inputs, targets))
}

/// Run one training epoch; returns the updated model and the mean batch loss.
pub fn train_epoch<B, O>(
    dataset: &AudioEncoderDataset,
    mut model: Perceptron<B>,
    optimizer: &mut O,
    learning_rate: f64,
    batch_size: usize,
    device: &B::Device,
) -> Result<(Perceptron<B>, f32), TrainingError>
where
    B: AutodiffBackend,
    O: Optimizer<Perceptron<B>, B>,
{
    if dataset.is_empty() {
        return Err(TrainingError::EmptyDataset);
    }

    let _epoch_span = perf::span(Metric::TrainEpoch);
    let mut total_loss = 0.0f32;
    let ranges = batch_ranges(dataset.len(), batch_size);
    let batches = ranges.len();

    for range in ranges {
        let _step_span = perf::span(Metric::TrainStep);
        let (inputs, targets) = batch_tensors::<B>(dataset, range, device)?;
        let prediction = model.forward(inputs);
        let loss = MseLoss::new().forward(prediction, targets, Reduction::Mean);
        total_loss += loss.clone().into_scalar().elem::<f32>();

        let grads = GradientsParams::from_grads(loss.backward(), &model);
        model = optimizer.step(learning_rate, model, grads);
        perf::add_count(Metric::TrainBatches, 1);
    }

    Ok((model, total_loss / batches as f32))
}

/// Compute the mean batch loss over the dataset without updating parameters.
pub fn eval_epoch<B: Backend>(
    dataset: &AudioEncoderDataset,
    model: &Perceptron<B>,
    batch_size: usize,
    device: &B::Device,
) -> Result<f32, TrainingError> {
    if dataset.is_empty() {
        return Err(TrainingError::EmptyDataset);
    }

    let _span = perf::span(Metric::EvalEpoch);
    let mut total_loss = 0.0f32;
    let ranges = batch_ranges(dataset.len(), batch_size);
    let batches = ranges.len();

    for range in ranges {
        let (inputs, targets) = batch_tensors::<B>(dataset, range, device)?;
        let prediction = model.forward(inputs);
        let loss = MseLoss::new().forward(prediction, targets, Reduction::Mean);
        total_loss += loss.into_scalar().elem::<f32>();
    }

    Ok(total_loss / batches as f32)
}

#[cfg(test)]
mod tests {
    use super::batch_ranges;

    #[test]
    fn four_items_with_batch_size_two_give_two_batches() {
        let ranges = batch_ranges(4, 2);
        assert_eq!(ranges, vec![0..2, 2..4]);
    }

    #[test]
    fn trailing_partial_batch_is_kept() {
        let ranges = batch_ranges(5, 2);
        assert_eq!(ranges, vec![0..2, 2..4, 4..5]);
    }

    #[test]
    fn oversized_batch_covers_everything_at_once() {
        assert_eq!(batch_ranges(3, 100), vec![0..3]);
    }

    #[test]
    fn zero_batch_size_is_clamped_to_one() {
        assert_eq!(batch_ranges(2, 0), vec![0..1, 1..2]);
    }
}
