//! Adapter that fine-tunes and forecasts with a pretrained model.

use super::config::{FitStrategy, ModelConfig, PretrainedForecasterConfig, TrainingArguments};
use super::dataset::WindowedDataset;
use super::model::{GenerateInputs, ModelHub, PretrainedModel, Trainer, TrainingSummary};
use crate::base::{FitState, ForecastContext, Forecaster, ForecasterCapabilities};
use crate::core::{ForecastingHorizon, TimePoint, TimeSeries};
use crate::error::{EstimatorError, Result};
use crate::utils::{check_horizon_out_of_sample, compute_metrics, Metric};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Seed used when the adapter is deterministic.
pub const DETERMINISTIC_SEED: u64 = 42;

/// Bound applied to backbone parameters after loading.
const BACKBONE_CLAMP: f64 = 1000.0;

/// Parameter scope of the backbone.
const BACKBONE_SCOPE: &str = "model";

struct PretrainedFit {
    context: ForecastContext,
    model: Box<dyn PretrainedModel>,
    model_config: ModelConfig,
    mismatched_keys: Vec<String>,
    summary: Option<TrainingSummary>,
}

type LoadedModel = (Box<dyn PretrainedModel>, ModelConfig, Vec<String>);

/// Forecaster backed by a pretrained probabilistic sequence model.
///
/// `fit` loads the model through a [`ModelHub`] with a configuration adapted
/// to the exogenous data, reinitialises weights whose shapes changed and,
/// depending on the fit strategy, fine-tunes with a [`Trainer`]. `predict`
/// averages sample paths produced by the model.
pub struct PretrainedForecaster {
    config: PretrainedForecasterConfig,
    hub: Box<dyn ModelHub>,
    trainer: Box<dyn Trainer>,
    state: FitState<PretrainedFit>,
}

impl PretrainedForecaster {
    pub fn new(
        config: PretrainedForecasterConfig,
        hub: Box<dyn ModelHub>,
        trainer: Box<dyn Trainer>,
    ) -> Self {
        Self {
            config,
            hub,
            trainer,
            state: FitState::Unfitted,
        }
    }

    pub fn config(&self) -> &PretrainedForecasterConfig {
        &self.config
    }

    /// Model configuration used in the last fit.
    pub fn model_config(&self) -> Option<&ModelConfig> {
        self.state.as_option().map(|f| &f.model_config)
    }

    /// The fitted model.
    pub fn model(&self) -> Option<&dyn PretrainedModel> {
        self.state.as_option().map(|f| f.model.as_ref())
    }

    /// Keys reported as mismatched when loading.
    pub fn mismatched_keys(&self) -> &[String] {
        self.state
            .as_option()
            .map(|f| f.mismatched_keys.as_slice())
            .unwrap_or(&[])
    }

    /// Whether the last fit ran the trainer.
    pub fn trained(&self) -> bool {
        self.training_summary().is_some()
    }

    pub fn training_summary(&self) -> Option<&TrainingSummary> {
        self.state.as_option().and_then(|f| f.summary.as_ref())
    }

    fn rng(&self) -> StdRng {
        if self.config.deterministic {
            StdRng::seed_from_u64(DETERMINISTIC_SEED)
        } else {
            StdRng::from_entropy()
        }
    }

    /// Load the model, freeze it and reinitialise mismatched weights.
    fn load(&self, x: Option<&TimeSeries>) -> Result<LoadedModel> {
        let path = &self.config.model_path;
        let pretrained = self.hub.load_config(path)?;
        let model_config = pretrained
            .merged(&self.config.config)?
            .for_exogenous(x.map_or(0, |x| x.dimensions()));
        debug!(
            model_path = %path,
            context_length = model_config.context_length,
            prediction_length = model_config.prediction_length,
            num_dynamic_real_features = model_config.num_dynamic_real_features,
            "merged model configuration"
        );

        let (mut model, load_info) = self.hub.load_model(path, &model_config)?;
        let mismatched: Vec<String> = load_info
            .mismatched_keys
            .iter()
            .map(|m| m.key.clone())
            .collect();
        info!(
            model_path = %path,
            mismatched = mismatched.len(),
            "loaded pretrained model"
        );

        let params = model.parameters_mut();
        params.freeze_all();
        params.clamp_scope(BACKBONE_SCOPE, -BACKBONE_CLAMP, BACKBONE_CLAMP)?;
        for m in &load_info.mismatched_keys {
            let weight = params.reinit_mismatched(&m.key)?;
            debug!(
                key = %m.key,
                weight = weight.name(),
                checkpoint_shape = ?m.checkpoint_shape,
                model_shape = ?m.model_shape,
                "reinitialised mismatched parameter"
            );
        }

        Ok((model, model_config, mismatched))
    }

    fn datasets(
        &self,
        y: &TimeSeries,
        x: Option<&TimeSeries>,
        model_config: &ModelConfig,
    ) -> Result<(WindowedDataset, Option<WindowedDataset>)> {
        let all = WindowedDataset::from_series(
            y,
            x,
            model_config.window_length(),
            model_config.prediction_length,
        )?;
        match self.config.validation_split {
            Some(split) => {
                let at = (y.len() as f64 * (1.0 - split)).floor() as usize;
                let (train, eval) = all.split_at(at)?;
                Ok((train, Some(eval)))
            }
            None => Ok((all, None)),
        }
    }

    /// Point forecasts for each window of `eval`, scored against its
    /// future values.
    fn evaluate(
        &self,
        model: &dyn PretrainedModel,
        eval: &WindowedDataset,
        metrics: &[Metric],
    ) -> Result<BTreeMap<String, f64>> {
        let mut rng = self.rng();
        let mut actual = Vec::new();
        let mut predicted = Vec::new();
        for window in eval {
            let inputs = GenerateInputs {
                past_values: window.past_values,
                past_time_features: window.past_time_features,
                future_time_features: window.future_time_features,
                past_observed_mask: window.past_observed_mask,
                prediction_length: eval.horizon(),
            };
            predicted.extend(model.generate(&inputs, &mut rng)?.mean(eval.horizon())?);
            actual.extend(window.future_values);
        }
        compute_metrics(metrics, &actual, &predicted)
    }

    fn future_features(
        &self,
        fitted: &PretrainedFit,
        x: Option<&TimeSeries>,
        prediction_length: usize,
    ) -> Result<Vec<Vec<f64>>> {
        let expected = fitted.context.x.as_ref().map(|x| x.dimensions());
        match (x, expected) {
            (None, None) => Ok(vec![Vec::new(); prediction_length]),
            (Some(x), Some(columns)) => {
                if x.dimensions() != columns {
                    return Err(EstimatorError::DimensionMismatch {
                        expected: columns,
                        got: x.dimensions(),
                    });
                }
                let rows = x.rows();
                if rows.is_empty() {
                    return Err(EstimatorError::EmptyData);
                }
                if rows.len() < prediction_length {
                    warn!(
                        supplied = rows.len(),
                        prediction_length,
                        "future exogenous data shorter than the horizon; repeating rows cyclically"
                    );
                }
                Ok(rows.iter().cycle().take(prediction_length).cloned().collect())
            }
            (None, Some(_)) => Err(EstimatorError::InvalidParameter(
                "exogenous data used in fit must also be passed to predict".to_string(),
            )),
            (Some(_), None) => Err(EstimatorError::InvalidParameter(
                "exogenous data passed to predict but not to fit".to_string(),
            )),
        }
    }
}

impl Forecaster for PretrainedForecaster {
    fn fit(
        &mut self,
        y: &TimeSeries,
        x: Option<&TimeSeries>,
        fh: Option<&ForecastingHorizon>,
    ) -> Result<()> {
        let strategy = self.config.validate()?;
        let context = ForecastContext::new(y, x, fh)?;
        if y.dimensions() != 1 {
            return Err(EstimatorError::DimensionMismatch {
                expected: 1,
                got: y.dimensions(),
            });
        }
        self.state.reset();

        let (mut model, model_config, mismatched_keys) = self.load(x)?;
        let (train, eval) = self.datasets(y, x, &model_config)?;
        let args = TrainingArguments::from_map(&self.config.training_args)?;

        let train_now = match strategy {
            FitStrategy::Minimal => !mismatched_keys.is_empty(),
            FitStrategy::Full => {
                model.parameters_mut().unfreeze_all();
                true
            }
        };
        info!(
            strategy = %strategy,
            train = train_now,
            train_windows = train.len(),
            eval_windows = eval.as_ref().map_or(0, |e| e.len()),
            "pretrained forecaster fit plan"
        );

        let summary = if train_now {
            let mut summary = self
                .trainer
                .train(model.as_mut(), &args, &train, eval.as_ref())?;
            if let Some(eval) = eval.as_ref().filter(|e| !e.is_empty()) {
                if !self.config.compute_metrics.is_empty() {
                    let metrics =
                        self.evaluate(model.as_ref(), eval, &self.config.compute_metrics)?;
                    summary.metrics.extend(metrics);
                }
            }
            info!(
                steps = summary.steps,
                train_loss = ?summary.train_loss,
                eval_loss = ?summary.eval_loss,
                metrics = ?summary.metrics,
                "training finished"
            );
            Some(summary)
        } else {
            None
        };

        self.state.set(PretrainedFit {
            context,
            model,
            model_config,
            mismatched_keys,
            summary,
        });
        Ok(())
    }

    fn predict(
        &self,
        fh: Option<&ForecastingHorizon>,
        x: Option<&TimeSeries>,
    ) -> Result<TimeSeries> {
        let fitted = self.state.get()?;
        let fh = fitted.context.resolve_fh(fh)?;
        check_horizon_out_of_sample(fh, self.name())?;

        let prediction_length = fh.max_step() as usize;
        let window = fitted.model_config.window_length();
        let history = &fitted.context.y;

        let past_time_features = match &fitted.context.x {
            Some(x) => {
                let rows = x.rows();
                let start = rows.len().saturating_sub(window);
                rows[start..].to_vec()
            }
            None => vec![Vec::new(); window],
        };

        let past_values = history.primary_values().to_vec();
        let inputs = GenerateInputs {
            past_observed_mask: past_values.iter().map(|v| !v.is_nan()).collect(),
            past_values,
            past_time_features,
            future_time_features: self.future_features(fitted, x, prediction_length)?,
            prediction_length,
        };

        let mut rng = self.rng();
        let output = fitted.model.generate(&inputs, &mut rng)?;
        let means = output.mean(prediction_length)?;
        debug!(
            prediction_length,
            samples = output.sequences.len(),
            "generated forecast paths"
        );
        fitted.context.select_horizon(fh, &means)
    }

    fn capabilities(&self) -> ForecasterCapabilities {
        ForecasterCapabilities {
            exogenous: true,
            ..Default::default()
        }
    }

    fn cutoff(&self) -> Option<TimePoint> {
        self.state.as_option().and_then(|f| f.context.y.cutoff())
    }

    fn name(&self) -> &str {
        "PretrainedForecaster"
    }
}
