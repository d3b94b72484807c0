//! Fine-tuning and inference with pretrained deep-learning forecasters.
//!
//! [`PretrainedForecaster`] adapts a pretrained probabilistic sequence model
//! to a series with optional exogenous data. The model registry, the model
//! and the training loop are collaborators behind the [`ModelHub`],
//! [`PretrainedModel`] and [`Trainer`] traits.

mod config;
mod dataset;
mod forecaster;
mod model;

pub use config::{FitStrategy, ModelConfig, PretrainedForecasterConfig, TrainingArguments};
pub use dataset::{TrainingWindow, WindowedDataset, Windows};
pub use forecaster::{PretrainedForecaster, DETERMINISTIC_SEED};
pub use model::{
    GenerateInputs, GenerateOutput, LoadInfo, MismatchedKey, ModelHub, Parameter, ParameterSet,
    PretrainedModel, Trainer, TrainingSummary, REINIT_FILL,
};
