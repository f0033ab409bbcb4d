//! The feed-forward waveform autoencoder.
//!
//! A configurable stack of linear layers: the first maps the waveform into
//! the hidden widths, ReLU joins the hidden layers, and the output layer maps
//! back to waveform size with an optional sigmoid to bound amplitudes. The
//! forward pass is a pure function of (parameters, input).

use crate::error::ConfigError;
use burn::module::Module;
use burn::nn::{Linear, LinearConfig};
use burn::tensor::activation::{relu, sigmoid};
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;
use serde::{Deserialize, Serialize};

/// Architecture parameters for [`Perceptron`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerceptronConfig {
    /// Waveform sample count fed into the network.
    pub input_size: usize,
    /// Waveform sample count produced by the network.
    pub output_size: usize,
    /// Number of hidden layers.
    pub hidden_layers: usize,
    /// Width of each hidden layer; must have `hidden_layers` elements.
    pub hidden_sizes: Vec<usize>,
    /// Apply a sigmoid to the output layer to bound amplitudes.
    pub bounded_output: bool,
}

impl PerceptronConfig {
    /// Uniform architecture with `hidden_layers` layers of `hidden_size` each.
    pub fn uniform(
        wave_size: usize,
        hidden_layers: usize,
        hidden_size: usize,
        bounded_output: bool,
    ) -> Self {
        Self {
            input_size: wave_size,
            output_size: wave_size,
            hidden_layers,
            hidden_sizes: vec![hidden_size; hidden_layers],
            bounded_output,
        }
    }

    /// Check the architecture parameters for internal consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hidden_sizes.len() != self.hidden_layers {
            return Err(ConfigError::HiddenSizeMismatch {
                expected: self.hidden_layers,
                got: self.hidden_sizes.len(),
            });
        }
        if let Some(index) = self.hidden_sizes.iter().position(|&size| size == 0) {
            return Err(ConfigError::ZeroWidth { index });
        }
        Ok(())
    }

    /// Initialize a model with freshly sampled parameters.
    pub fn init<B: Backend>(&self, device: &B::Device) -> Result<Perceptron<B>, ConfigError> {
        self.validate()?;
        let mut hidden = Vec::with_capacity(self.hidden_sizes.len());
        let mut width = self.input_size;
        for &size in &self.hidden_sizes {
            hidden.push(LinearConfig::new(width, size).init(device));
            width = size;
        }
        let output = LinearConfig::new(width, self.output_size).init(device);
        Ok(Perceptron {
            hidden,
            output,
            bounded_output: self.bounded_output,
        })
    }
}

/// Feed-forward autoencoder over fixed-length waveforms.
#[derive(Module, Debug)]
pub struct Perceptron<B: Backend> {
    pub(crate) hidden: Vec<Linear<B>>,
    pub(crate) output: Linear<B>,
    pub(crate) bounded_output: bool,
}

impl<B: Backend> Perceptron<B> {
    /// Reconstruct a `[batch, wave_size]` tensor of waveforms.
    pub fn forward(&self, input: Tensor<B, 2>) -> Tensor<B, 2> {
        let mut value = input;
        for layer in &self.hidden {
            value = relu(layer.forward(value));
        }
        let output = self.output.forward(value);
        if self.bounded_output {
            sigmoid(output)
        } else {
            output
        }
    }

    /// Export every parameter as (name, shape, row-major values).
    ///
    /// Names follow the module layout: `hidden.{i}.weight`, `hidden.{i}.bias`,
    /// `output.weight`, `output.bias`.
    pub fn export_tensors(&self) -> Vec<(String, Vec<usize>, Vec<f32>)> {
        let mut tensors = Vec::with_capacity(2 * (self.hidden.len() + 1));
        for (idx, layer) in self.hidden.iter().enumerate() {
            export_linear(&mut tensors, &format!("hidden.{idx}"), layer);
        }
        export_linear(&mut tensors, "output", &self.output);
        tensors
    }
}

fn export_linear<B: Backend>(
    tensors: &mut Vec<(String, Vec<usize>, Vec<f32>)>,
    prefix: &str,
    layer: &Linear<B>,
) {
    let weight = layer.weight.val().to_data().convert::<f32>();
    tensors.push((
        format!("{prefix}.weight"),
        weight.shape.clone(),
        weight.to_vec::<f32>().expect("weight data"),
    ));
    if let Some(bias) = layer.bias.as_ref() {
        let bias = bias.val().to_data().convert::<f32>();
        tensors.push((
            format!("{prefix}.bias"),
            bias.shape.clone(),
            bias.to_vec::<f32>().expect("bias data"),
        ));
    }
}
