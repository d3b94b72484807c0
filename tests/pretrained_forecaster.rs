//! Integration tests for the pretrained-model adapter with in-memory
//! collaborators standing in for the model hub, the model and the trainer.

use rand::rngs::StdRng;
use rand::Rng;
use std::cell::RefCell;
use std::rc::Rc;
use ts_estimators::base::Forecaster;
use ts_estimators::core::{ForecastingHorizon, TimeIndex, TimeSeries};
use ts_estimators::forecasting::pretrained::{
    GenerateInputs, GenerateOutput, LoadInfo, MismatchedKey, ModelConfig, ModelHub, Parameter,
    ParameterSet, PretrainedForecaster, PretrainedForecasterConfig, PretrainedModel, Trainer,
    TrainingArguments, TrainingSummary, WindowedDataset, REINIT_FILL,
};
use ts_estimators::utils::Metric;
use ts_estimators::{EstimatorError, Result};

const PROJECTION: &str = "model.encoder.value_embedding.value_projection.weight";
const DECODER: &str = "model.decoder.weight";
const HEAD: &str = "parameter_projection.proj.weight";

#[derive(Default)]
struct Recorder {
    loaded_configs: Vec<ModelConfig>,
    generated: Vec<GenerateInputs>,
    trainings: Vec<TrainingCall>,
}

struct TrainingCall {
    train_windows: usize,
    eval_windows: Option<usize>,
    args: TrainingArguments,
    trainable: Vec<String>,
}

struct MockModel {
    config: ModelConfig,
    params: ParameterSet,
    recorder: Rc<RefCell<Recorder>>,
}

impl PretrainedModel for MockModel {
    fn config(&self) -> &ModelConfig {
        &self.config
    }

    fn parameters(&self) -> &ParameterSet {
        &self.params
    }

    fn parameters_mut(&mut self) -> &mut ParameterSet {
        &mut self.params
    }

    fn generate(&self, inputs: &GenerateInputs, rng: &mut StdRng) -> Result<GenerateOutput> {
        self.recorder.borrow_mut().generated.push(inputs.clone());
        let last = inputs
            .past_values
            .iter()
            .rev()
            .find(|v| !v.is_nan())
            .copied()
            .unwrap_or(0.0);
        let sequences = (0..3)
            .map(|_| {
                (1..=inputs.prediction_length)
                    .map(|h| last + h as f64 + rng.gen::<f64>())
                    .collect()
            })
            .collect();
        Ok(GenerateOutput { sequences })
    }
}

/// Hub whose checkpoint was trained without exogenous features.
struct MockHub {
    pretrained: ModelConfig,
    recorder: Rc<RefCell<Recorder>>,
}

impl ModelHub for MockHub {
    fn load_config(&self, model_path: &str) -> Result<ModelConfig> {
        if model_path != "mock/tiny" {
            return Err(EstimatorError::Model(format!("unknown model {model_path}")));
        }
        Ok(self.pretrained.clone())
    }

    fn load_model(
        &self,
        _model_path: &str,
        config: &ModelConfig,
    ) -> Result<(Box<dyn PretrainedModel>, LoadInfo)> {
        self.recorder.borrow_mut().loaded_configs.push(config.clone());
        let features = 1 + config.num_dynamic_real_features;
        let mut load_info = LoadInfo::default();
        let same_inputs =
            config.num_dynamic_real_features == self.pretrained.num_dynamic_real_features;
        let projection = if same_inputs {
            vec![0.5; features]
        } else {
            load_info.mismatched_keys.push(MismatchedKey {
                key: PROJECTION.to_string(),
                checkpoint_shape: vec![1 + self.pretrained.num_dynamic_real_features],
                model_shape: vec![features],
            });
            vec![f64::NAN; features]
        };
        let params = ParameterSet::new(vec![
            Parameter::new(PROJECTION, vec![features], projection)?,
            Parameter::new(DECODER, vec![3], vec![5000.0, -3.0, -2500.0])?,
            Parameter::new(HEAD, vec![2], vec![0.1, 0.2])?,
        ])?;
        let model = MockModel {
            config: config.clone(),
            params,
            recorder: Rc::clone(&self.recorder),
        };
        Ok((Box::new(model), load_info))
    }
}

struct MockTrainer {
    recorder: Rc<RefCell<Recorder>>,
}

impl Trainer for MockTrainer {
    fn train(
        &mut self,
        model: &mut dyn PretrainedModel,
        args: &TrainingArguments,
        train: &WindowedDataset,
        eval: Option<&WindowedDataset>,
    ) -> Result<TrainingSummary> {
        let trainable = model
            .parameters()
            .trainable()
            .into_iter()
            .map(str::to_string)
            .collect();
        self.recorder.borrow_mut().trainings.push(TrainingCall {
            train_windows: train.len(),
            eval_windows: eval.map(|e| e.len()),
            args: args.clone(),
            trainable,
        });
        Ok(TrainingSummary {
            steps: train.len(),
            train_loss: Some(0.5),
            eval_loss: eval.map(|_| 0.75),
            ..Default::default()
        })
    }
}

fn forecaster(config: PretrainedForecasterConfig) -> (PretrainedForecaster, Rc<RefCell<Recorder>>) {
    let recorder = Rc::new(RefCell::new(Recorder::default()));
    let hub = MockHub {
        pretrained: ModelConfig::new(4, 2, vec![1, 2]),
        recorder: Rc::clone(&recorder),
    };
    let trainer = MockTrainer {
        recorder: Rc::clone(&recorder),
    };
    (
        PretrainedForecaster::new(config, Box::new(hub), Box::new(trainer)),
        recorder,
    )
}

fn target(n: usize) -> TimeSeries {
    TimeSeries::from_values((0..n).map(|i| 10.0 + (i as f64 * 0.3).sin()).collect())
}

fn exogenous(start: i64, n: usize) -> TimeSeries {
    TimeSeries::new(
        TimeIndex::range_from(start, n),
        vec![
            (0..n).map(|i| i as f64).collect(),
            (0..n).map(|i| (i % 7) as f64).collect(),
        ],
    )
    .unwrap()
}

#[test]
fn minimal_strategy_without_mismatches_never_trains() {
    let (mut f, recorder) = forecaster(PretrainedForecasterConfig::new("mock/tiny"));
    let fh = ForecastingHorizon::up_to(3).unwrap();
    f.fit(&target(30), None, Some(&fh)).unwrap();

    assert!(!f.trained());
    assert!(f.mismatched_keys().is_empty());
    assert!(recorder.borrow().trainings.is_empty());

    let params = f.model().unwrap().parameters();
    assert!(params.trainable().is_empty());
    assert_eq!(params.get(DECODER).unwrap().values(), &[1000.0, -3.0, -1000.0]);
    assert_eq!(params.get(HEAD).unwrap().values(), &[0.1, 0.2]);

    let pred = f.predict(None, None).unwrap();
    assert_eq!(pred.len(), 3);
    assert_eq!(pred.index(), &TimeIndex::range_from(30, 3));
    assert!(pred.primary_values().iter().all(|v| v.is_finite()));
}

#[test]
fn unknown_fit_strategy_is_rejected_before_loading() {
    let config = PretrainedForecasterConfig::new("mock/tiny").with_fit_strategy("partial");
    let (mut f, recorder) = forecaster(config);
    let err = f.fit(&target(30), None, None).unwrap_err();
    assert_eq!(err, EstimatorError::UnknownFitStrategy("partial".to_string()));
    assert!(recorder.borrow().loaded_configs.is_empty());
    assert!(!f.is_fitted());
}

#[test]
fn non_positive_steps_are_unsupported() {
    let (mut f, _) = forecaster(PretrainedForecasterConfig::new("mock/tiny"));
    f.fit(&target(30), None, None).unwrap();
    for steps in [vec![0, 1], vec![-2], vec![-1, 0, 3]] {
        let fh = ForecastingHorizon::new(steps).unwrap();
        assert!(matches!(
            f.predict(Some(&fh), None),
            Err(EstimatorError::UnsupportedCapability(_))
        ));
    }
}

#[test]
fn horizon_is_required_in_fit_or_predict() {
    let (mut f, _) = forecaster(PretrainedForecasterConfig::new("mock/tiny"));
    f.fit(&target(30), None, None).unwrap();
    assert_eq!(f.predict(None, None), Err(EstimatorError::HorizonRequired));
}

#[test]
fn unfitted_adapter_cannot_predict() {
    let (f, _) = forecaster(PretrainedForecasterConfig::new("mock/tiny"));
    let fh = ForecastingHorizon::up_to(1).unwrap();
    assert_eq!(f.predict(Some(&fh), None), Err(EstimatorError::NotFitted));
}

#[test]
fn deterministic_predictions_repeat() {
    let config = PretrainedForecasterConfig::new("mock/tiny").with_deterministic(true);
    let (mut f, _) = forecaster(config.clone());
    let (mut g, _) = forecaster(config);
    let fh = ForecastingHorizon::new(vec![1, 4]).unwrap();
    f.fit(&target(30), None, Some(&fh)).unwrap();
    g.fit(&target(30), None, Some(&fh)).unwrap();

    let first = f.predict(None, None).unwrap();
    assert_eq!(first, f.predict(None, None).unwrap());
    assert_eq!(first, g.predict(None, None).unwrap());
    assert_eq!(first.index(), &TimeIndex::Integer(vec![30, 33]));
}

#[test]
fn exogenous_features_reinitialise_mismatched_weights() {
    let (mut f, recorder) = forecaster(PretrainedForecasterConfig::new("mock/tiny"));
    f.fit(&target(30), Some(&exogenous(0, 30)), None).unwrap();

    let loaded = recorder.borrow().loaded_configs[0].clone();
    assert_eq!(loaded.num_dynamic_real_features, 2);
    assert_eq!(loaded.num_time_features, 0);
    assert_eq!(f.model_config().unwrap().num_dynamic_real_features, 2);

    assert_eq!(f.mismatched_keys(), &[PROJECTION.to_string()]);
    assert!(f.trained());
    let params = f.model().unwrap().parameters();
    assert_eq!(params.get(PROJECTION).unwrap().values(), &[REINIT_FILL; 3]);
    assert_eq!(params.trainable(), vec![PROJECTION]);

    let recorder = recorder.borrow();
    assert_eq!(recorder.trainings.len(), 1);
    let call = &recorder.trainings[0];
    assert_eq!(call.trainable, vec![PROJECTION.to_string()]);
    // 24 training observations, windows of 6 history and 2 future steps.
    assert_eq!(call.train_windows, 17);
    assert_eq!(call.eval_windows, Some(0));
}

#[test]
fn full_strategy_trains_every_parameter() {
    let config = PretrainedForecasterConfig::new("mock/tiny")
        .with_fit_strategy("full")
        .with_validation_split(None)
        .with_training_arg("learning_rate", serde_json::json!(1e-3))
        .with_training_arg("warmup_steps", serde_json::json!(10));
    let (mut f, recorder) = forecaster(config);
    f.fit(&target(30), None, None).unwrap();

    let recorder = recorder.borrow();
    let call = &recorder.trainings[0];
    assert_eq!(call.trainable.len(), 3);
    assert_eq!(call.train_windows, 23);
    assert_eq!(call.eval_windows, None);
    assert_eq!(call.args.learning_rate, 1e-3);
    assert_eq!(call.args.seed, 42);
    assert_eq!(call.args.extra.get("warmup_steps"), Some(&serde_json::json!(10)));

    let summary = f.training_summary().unwrap();
    assert_eq!(summary.steps, 23);
    assert_eq!(summary.eval_loss, None);
}

#[test]
fn metrics_are_computed_on_evaluation_windows() {
    let config = PretrainedForecasterConfig::new("mock/tiny")
        .with_fit_strategy("full")
        .with_metrics(vec![Metric::Mae, Metric::Rmse])
        .with_deterministic(true);
    let (mut f, _) = forecaster(config);
    f.fit(&target(60), None, None).unwrap();

    let summary = f.training_summary().unwrap();
    assert_eq!(summary.eval_loss, Some(0.75));
    let mae = summary.metrics["mae"];
    let rmse = summary.metrics["rmse"];
    assert!(mae > 0.0);
    assert!(rmse >= mae);
}

#[test]
fn config_overrides_reach_the_model() {
    let config = PretrainedForecasterConfig::new("mock/tiny")
        .with_config("prediction_length", serde_json::json!(5))
        .with_config("dropout", serde_json::json!(0.3));
    let (mut f, recorder) = forecaster(config);
    f.fit(&target(30), None, None).unwrap();

    let loaded = recorder.borrow().loaded_configs[0].clone();
    assert_eq!(loaded.prediction_length, 5);
    assert_eq!(loaded.context_length, 4);
    assert_eq!(loaded.extra.get("dropout"), Some(&serde_json::json!(0.3)));
}

#[test]
fn unknown_model_path_fails() {
    let (mut f, _) = forecaster(PretrainedForecasterConfig::new("mock/missing"));
    assert!(matches!(
        f.fit(&target(30), None, None),
        Err(EstimatorError::Model(_))
    ));
}

#[test]
fn short_future_exogenous_rows_are_repeated() {
    let (mut f, recorder) = forecaster(PretrainedForecasterConfig::new("mock/tiny"));
    f.fit(&target(30), Some(&exogenous(0, 30)), None).unwrap();

    let future = exogenous(30, 2);
    let fh = ForecastingHorizon::up_to(5).unwrap();
    let pred = f.predict(Some(&fh), Some(&future)).unwrap();
    assert_eq!(pred.len(), 5);

    let recorder = recorder.borrow();
    let inputs = recorder.generated.last().unwrap();
    assert_eq!(inputs.prediction_length, 5);
    assert_eq!(inputs.past_values.len(), 30);
    assert_eq!(inputs.past_time_features.len(), 6);
    assert_eq!(inputs.past_time_features[5], vec![29.0, 1.0]);
    let rows = future.rows();
    assert_eq!(
        inputs.future_time_features,
        vec![
            rows[0].clone(),
            rows[1].clone(),
            rows[0].clone(),
            rows[1].clone(),
            rows[0].clone()
        ]
    );
}

#[test]
fn long_future_exogenous_rows_are_truncated() {
    let (mut f, recorder) = forecaster(PretrainedForecasterConfig::new("mock/tiny"));
    f.fit(&target(30), Some(&exogenous(0, 30)), None).unwrap();
    let fh = ForecastingHorizon::up_to(2).unwrap();
    f.predict(Some(&fh), Some(&exogenous(30, 6))).unwrap();
    let recorder = recorder.borrow();
    assert_eq!(recorder.generated.last().unwrap().future_time_features.len(), 2);
}

#[test]
fn exogenous_must_be_passed_consistently() {
    let (mut f, _) = forecaster(PretrainedForecasterConfig::new("mock/tiny"));
    f.fit(&target(30), Some(&exogenous(0, 30)), None).unwrap();
    let fh = ForecastingHorizon::up_to(2).unwrap();
    assert!(matches!(
        f.predict(Some(&fh), None),
        Err(EstimatorError::InvalidParameter(_))
    ));

    let (mut g, _) = forecaster(PretrainedForecasterConfig::new("mock/tiny"));
    g.fit(&target(30), None, None).unwrap();
    assert!(matches!(
        g.predict(Some(&fh), Some(&exogenous(30, 2))),
        Err(EstimatorError::InvalidParameter(_))
    ));
}

#[test]
fn config_loads_from_json() {
    let config = PretrainedForecasterConfig::from_json(
        r#"{
            "model_path": "mock/tiny",
            "fit_strategy": "full",
            "validation_split": null,
            "compute_metrics": ["mae"],
            "deterministic": true
        }"#,
    )
    .unwrap();
    assert_eq!(config.validation_split, None);
    assert_eq!(config.compute_metrics, vec![Metric::Mae]);

    let (mut f, _) = forecaster(config);
    f.fit(&target(30), None, None).unwrap();
    assert!(f.trained());
}
