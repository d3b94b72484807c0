//! Collaborators of the pretrained-model adapter.
//!
//! The deep-learning framework is not embedded. A [`ModelHub`] resolves
//! pretrained configurations and weights, a [`PretrainedModel`] exposes its
//! parameters by name and samples forecast paths, and a [`Trainer`] runs the
//! training loop.

use super::config::{ModelConfig, TrainingArguments};
use super::dataset::WindowedDataset;
use crate::error::{EstimatorError, Result};
use rand::rngs::StdRng;
use std::collections::BTreeMap;

/// Value used to replace NaN weights of reinitialised parameters.
pub const REINIT_FILL: f64 = 0.001;

/// A named, shaped tensor of model weights.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: String,
    shape: Vec<usize>,
    values: Vec<f64>,
    requires_grad: bool,
}

impl Parameter {
    /// Create a trainable parameter. `values.len()` must equal the product
    /// of `shape`.
    pub fn new(name: impl Into<String>, shape: Vec<usize>, values: Vec<f64>) -> Result<Self> {
        let numel: usize = shape.iter().product();
        if numel != values.len() {
            return Err(EstimatorError::DimensionMismatch {
                expected: numel,
                got: values.len(),
            });
        }
        Ok(Self {
            name: name.into(),
            shape,
            values,
            requires_grad: true,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }

    pub fn numel(&self) -> usize {
        self.values.len()
    }

    pub fn requires_grad(&self) -> bool {
        self.requires_grad
    }

    pub fn set_requires_grad(&mut self, requires_grad: bool) {
        self.requires_grad = requires_grad;
    }

    /// Clamp values into `[min, max]`; NaN stays NaN.
    pub fn clamp(&mut self, min: f64, max: f64) -> Result<()> {
        check_clamp_bounds(min, max)?;
        for v in &mut self.values {
            *v = v.clamp(min, max);
        }
        Ok(())
    }

    /// Replace NaN values with `fill`.
    pub fn fill_nan(&mut self, fill: f64) {
        for v in &mut self.values {
            if v.is_nan() {
                *v = fill;
            }
        }
    }
}

/// Ordered collection of parameters addressed by dotted names such as
/// `model.encoder.layers.0.weight`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSet {
    params: Vec<Parameter>,
}

impl ParameterSet {
    pub fn new(params: Vec<Parameter>) -> Result<Self> {
        let mut set = Self::default();
        for p in params {
            set.push(p)?;
        }
        Ok(set)
    }

    /// Add a parameter; names must be unique.
    pub fn push(&mut self, param: Parameter) -> Result<()> {
        if self.get(param.name()).is_some() {
            return Err(EstimatorError::InvalidParameter(format!(
                "duplicate parameter name {}",
                param.name()
            )));
        }
        self.params.push(param);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Parameter> {
        self.params.iter_mut().find(|p| p.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Parameter> {
        self.params.iter_mut()
    }

    /// Parameters under `scope` (a dotted prefix without the trailing dot).
    pub fn scoped_mut<'a>(&'a mut self, scope: &'a str) -> impl Iterator<Item = &'a mut Parameter> {
        self.params.iter_mut().filter(move |p| in_scope(&p.name, scope))
    }

    pub fn freeze_all(&mut self) {
        self.params.iter_mut().for_each(|p| p.set_requires_grad(false));
    }

    pub fn unfreeze_all(&mut self) {
        self.params.iter_mut().for_each(|p| p.set_requires_grad(true));
    }

    /// Names of parameters that will be trained.
    pub fn trainable(&self) -> Vec<&str> {
        self.params
            .iter()
            .filter(|p| p.requires_grad)
            .map(|p| p.name())
            .collect()
    }

    /// Clamp every parameter under `scope`; returns how many were touched.
    pub fn clamp_scope(&mut self, scope: &str, min: f64, max: f64) -> Result<usize> {
        check_clamp_bounds(min, max)?;
        let mut count = 0;
        for p in self.scoped_mut(scope) {
            p.clamp(min, max)?;
            count += 1;
        }
        Ok(count)
    }

    /// Reinitialise the `weight` of the module owning the mismatched `key`:
    /// NaNs become [`REINIT_FILL`] and the weight becomes trainable.
    ///
    /// For `a.b.c` the weight is `a.b.weight`; a key without a dot refers to
    /// the top-level `weight`.
    pub fn reinit_mismatched(&mut self, key: &str) -> Result<&Parameter> {
        let target = match key.rsplit_once('.') {
            Some((parent, _)) => format!("{parent}.weight"),
            None => "weight".to_string(),
        };
        let param = self.get_mut(&target).ok_or_else(|| {
            EstimatorError::Model(format!(
                "mismatched key {key} has no sibling parameter {target}"
            ))
        })?;
        param.fill_nan(REINIT_FILL);
        param.set_requires_grad(true);
        Ok(param)
    }
}

fn in_scope(name: &str, scope: &str) -> bool {
    name.strip_prefix(scope)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
}

/// A parameter whose checkpoint shape differs from the configured model.
#[derive(Debug, Clone, PartialEq)]
pub struct MismatchedKey {
    pub key: String,
    pub checkpoint_shape: Vec<usize>,
    pub model_shape: Vec<usize>,
}

/// What happened while loading pretrained weights.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadInfo {
    pub mismatched_keys: Vec<MismatchedKey>,
    pub missing_keys: Vec<String>,
    pub unexpected_keys: Vec<String>,
}

/// Inputs for one call of [`PretrainedModel::generate`].
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateInputs {
    /// Full target history.
    pub past_values: Vec<f64>,
    /// Exogenous rows aligned with the end of the history.
    pub past_time_features: Vec<Vec<f64>>,
    /// Exogenous rows for the forecast steps.
    pub future_time_features: Vec<Vec<f64>>,
    /// `true` where `past_values` is observed.
    pub past_observed_mask: Vec<bool>,
    /// Steps to generate.
    pub prediction_length: usize,
}

/// Sample paths produced by a model, `sequences[sample][step]`.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateOutput {
    pub sequences: Vec<Vec<f64>>,
}

impl GenerateOutput {
    /// Mean over samples for each of the first `steps` steps.
    pub fn mean(&self, steps: usize) -> Result<Vec<f64>> {
        if self.sequences.is_empty() {
            return Err(EstimatorError::Model(
                "model generated no sample paths".to_string(),
            ));
        }
        if let Some(short) = self.sequences.iter().find(|s| s.len() < steps) {
            return Err(EstimatorError::DimensionMismatch {
                expected: steps,
                got: short.len(),
            });
        }
        let n = self.sequences.len() as f64;
        Ok((0..steps)
            .map(|h| self.sequences.iter().map(|s| s[h]).sum::<f64>() / n)
            .collect())
    }
}

/// Resolves pretrained configurations and weights.
pub trait ModelHub {
    /// Configuration stored with the pretrained model.
    fn load_config(&self, model_path: &str) -> Result<ModelConfig>;

    /// Instantiate `config.architectures[0]` with pretrained weights.
    /// Weights whose shapes do not fit `config` are left uninitialised and
    /// reported in [`LoadInfo::mismatched_keys`].
    fn load_model(
        &self,
        model_path: &str,
        config: &ModelConfig,
    ) -> Result<(Box<dyn PretrainedModel>, LoadInfo)>;
}

/// A pretrained probabilistic forecasting model.
pub trait PretrainedModel {
    fn config(&self) -> &ModelConfig;

    fn parameters(&self) -> &ParameterSet;

    fn parameters_mut(&mut self) -> &mut ParameterSet;

    /// Sample forecast paths of `inputs.prediction_length` steps.
    fn generate(&self, inputs: &GenerateInputs, rng: &mut StdRng) -> Result<GenerateOutput>;
}

/// Outcome of a training run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingSummary {
    pub steps: usize,
    pub train_loss: Option<f64>,
    pub eval_loss: Option<f64>,
    /// Metrics computed on the evaluation windows, keyed by metric name.
    pub metrics: BTreeMap<String, f64>,
}

/// Runs the optimisation loop over windowed datasets.
pub trait Trainer {
    fn train(
        &mut self,
        model: &mut dyn PretrainedModel,
        args: &TrainingArguments,
        train: &WindowedDataset,
        eval: Option<&WindowedDataset>,
    ) -> Result<TrainingSummary>;
}

fn check_clamp_bounds(min: f64, max: f64) -> Result<()> {
    if min.is_nan() || max.is_nan() || min > max {
        return Err(EstimatorError::InvalidParameter(format!(
            "clamp bounds must be ordered numbers, got [{min}, {max}]"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(name: &str, values: Vec<f64>) -> Parameter {
        Parameter::new(name, vec![values.len()], values).unwrap()
    }

    fn set() -> ParameterSet {
        ParameterSet::new(vec![
            param("model.encoder.value_embedding.weight", vec![f64::NAN, 2.0]),
            param("model.encoder.value_embedding.bias", vec![5000.0]),
            param("model.decoder.weight", vec![-2000.0, f64::NAN]),
            param("modelling.weight", vec![3000.0]),
            param("parameter_projection.weight", vec![1.0]),
        ])
        .unwrap()
    }

    #[test]
    fn parameter_shape_must_match_values() {
        assert!(Parameter::new("w", vec![2, 2], vec![0.0; 3]).is_err());
        assert_eq!(Parameter::new("w", vec![2, 2], vec![0.0; 4]).unwrap().numel(), 4);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        assert!(ParameterSet::new(vec![param("w", vec![1.0]), param("w", vec![2.0])]).is_err());
    }

    #[test]
    fn clamp_scope_only_touches_backbone() {
        let mut params = set();
        assert_eq!(params.clamp_scope("model", -1000.0, 1000.0).unwrap(), 3);

        assert_eq!(params.get("model.encoder.value_embedding.bias").unwrap().values(), &[1000.0]);
        let decoder = params.get("model.decoder.weight").unwrap().values();
        assert_eq!(decoder[0], -1000.0);
        assert!(decoder[1].is_nan());
        assert_eq!(params.get("modelling.weight").unwrap().values(), &[3000.0]);
    }

    #[test]
    fn clamp_rejects_unordered_or_nan_bounds() {
        let mut p = param("w", vec![5.0, -5.0]);
        assert!(matches!(p.clamp(1.0, -1.0), Err(EstimatorError::InvalidParameter(_))));
        assert!(matches!(p.clamp(f64::NAN, 1.0), Err(EstimatorError::InvalidParameter(_))));
        assert_eq!(p.values(), &[5.0, -5.0]);

        let mut params = set();
        assert!(params.clamp_scope("model", 10.0, f64::NAN).is_err());
        assert_eq!(params.get("model.encoder.value_embedding.bias").unwrap().values(), &[5000.0]);

        p.clamp(-1.0, 1.0).unwrap();
        assert_eq!(p.values(), &[1.0, -1.0]);
    }

    #[test]
    fn freeze_and_unfreeze() {
        let mut params = set();
        params.freeze_all();
        assert!(params.trainable().is_empty());
        params.unfreeze_all();
        assert_eq!(params.trainable().len(), params.len());
    }

    #[test]
    fn reinit_targets_sibling_weight() {
        let mut params = set();
        params.freeze_all();
        let weight = params
            .reinit_mismatched("model.encoder.value_embedding.bias")
            .unwrap();
        assert_eq!(weight.name(), "model.encoder.value_embedding.weight");
        assert_eq!(weight.values(), &[REINIT_FILL, 2.0]);
        assert!(weight.requires_grad());
        assert_eq!(params.trainable(), vec!["model.encoder.value_embedding.weight"]);
    }

    #[test]
    fn reinit_without_weight_fails() {
        let mut params = set();
        assert!(matches!(
            params.reinit_mismatched("model.missing.bias"),
            Err(EstimatorError::Model(_))
        ));
    }

    #[test]
    fn generate_output_mean() {
        let out = GenerateOutput {
            sequences: vec![vec![1.0, 2.0, 9.0], vec![3.0, 4.0, 9.0]],
        };
        assert_eq!(out.mean(2).unwrap(), vec![2.0, 3.0]);
        assert!(out.mean(4).is_err());
        assert!(GenerateOutput { sequences: vec![] }.mean(1).is_err());
    }
}
