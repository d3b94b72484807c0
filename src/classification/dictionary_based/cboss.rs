//! Contractable BOSS (cBOSS).
//!
//! Instead of searching every parameter combination, cBOSS fits randomly
//! drawn combinations on random 70% subsamples of the training data and
//! keeps a fixed-size ensemble of the most accurate, weighting each vote by
//! its training accuracy to the fourth power. Training can be bounded by a
//! time contract.

use super::boss::{seeded_rng, window_sizes, IndividualBOSS, NORM_OPTIONS, WORD_LENGTHS};
use super::sfa::coefficient_count;
use crate::base::{check_classifier_input, Classifier, FitState};
use crate::core::Panel;
use crate::error::{EstimatorError, Result};
use rand::seq::index;
use rand::Rng;
use std::time::{Duration, Instant};
use tracing::debug;

/// Proportion of training instances each member is fitted on.
const SUBSAMPLE_PROPORTION: f64 = 0.7;

/// Weight of members with no positive training accuracy.
const MIN_WEIGHT: f64 = 1e-9;

#[derive(Debug, Clone)]
struct Member {
    boss: IndividualBOSS,
    accuracy: f64,
    weight: f64,
    /// Training instances the member was fitted on.
    subsample: Vec<usize>,
}

#[derive(Debug, Clone)]
struct CbossFit {
    members: Vec<Member>,
    classes: Vec<String>,
    n_parameter_samples: usize,
}

/// Contractable BOSS ensemble classifier.
#[derive(Debug, Clone)]
pub struct ContractableBOSS {
    n_parameter_samples: usize,
    max_ensemble_size: usize,
    max_win_len_prop: f64,
    min_window: usize,
    alphabet_size: usize,
    time_limit: Option<Duration>,
    contract_max_n_parameter_samples: Option<usize>,
    random_state: Option<u64>,
    state: FitState<CbossFit>,
}

impl Default for ContractableBOSS {
    fn default() -> Self {
        Self::new()
    }
}

impl ContractableBOSS {
    pub fn new() -> Self {
        Self {
            n_parameter_samples: 250,
            max_ensemble_size: 50,
            max_win_len_prop: 1.0,
            min_window: 10,
            alphabet_size: 4,
            time_limit: None,
            contract_max_n_parameter_samples: None,
            random_state: None,
            state: FitState::Unfitted,
        }
    }

    /// Number of parameter combinations to try without a time contract.
    pub fn with_n_parameter_samples(mut self, n: usize) -> Self {
        self.n_parameter_samples = n;
        self
    }

    pub fn with_max_ensemble_size(mut self, size: usize) -> Self {
        self.max_ensemble_size = size;
        self
    }

    pub fn with_max_win_len_prop(mut self, prop: f64) -> Self {
        self.max_win_len_prop = prop;
        self
    }

    pub fn with_min_window(mut self, min_window: usize) -> Self {
        self.min_window = min_window;
        self
    }

    pub fn with_alphabet_size(mut self, alphabet_size: usize) -> Self {
        self.alphabet_size = alphabet_size;
        self
    }

    /// Train until `limit` has elapsed instead of for a fixed number of
    /// parameter samples.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Upper bound on parameter samples under a time contract.
    pub fn with_contract_max_n_parameter_samples(mut self, n: usize) -> Self {
        self.contract_max_n_parameter_samples = Some(n);
        self
    }

    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    pub fn n_estimators(&self) -> usize {
        self.state.as_option().map_or(0, |f| f.members.len())
    }

    /// Vote weight of each member.
    pub fn weights(&self) -> Vec<f64> {
        self.state
            .as_option()
            .map(|f| f.members.iter().map(|m| m.weight).collect())
            .unwrap_or_default()
    }

    /// Training accuracy of each member on its subsample.
    pub fn accuracies(&self) -> Vec<f64> {
        self.state
            .as_option()
            .map(|f| f.members.iter().map(|m| m.accuracy).collect())
            .unwrap_or_default()
    }

    /// Training instances each member was fitted on.
    pub fn subsamples(&self) -> Vec<&[usize]> {
        self.state
            .as_option()
            .map(|f| f.members.iter().map(|m| m.subsample.as_slice()).collect())
            .unwrap_or_default()
    }

    /// Parameter combinations actually evaluated in fit.
    pub fn n_parameter_samples_evaluated(&self) -> usize {
        self.state.as_option().map_or(0, |f| f.n_parameter_samples)
    }

    fn keep_sampling(&self, evaluated: usize, start: Instant) -> bool {
        match self.time_limit {
            Some(limit) => {
                start.elapsed() < limit
                    && self
                        .contract_max_n_parameter_samples
                        .map_or(true, |max| evaluated < max)
            }
            None => evaluated < self.n_parameter_samples,
        }
    }
}

/// Lowest member accuracy and its position.
fn worst_member(members: &[Member]) -> (f64, usize) {
    members
        .iter()
        .enumerate()
        .fold((f64::INFINITY, 0), |(min_acc, min_idx), (i, m)| {
            if m.accuracy < min_acc {
                (m.accuracy, i)
            } else {
                (min_acc, min_idx)
            }
        })
}

impl Classifier for ContractableBOSS {
    fn fit(&mut self, x: &Panel, y: &[String]) -> Result<()> {
        let classes = check_classifier_input(x, y)?;
        if self.max_ensemble_size == 0 {
            return Err(EstimatorError::InvalidParameter(
                "max_ensemble_size must be positive".to_string(),
            ));
        }
        let windows = window_sizes(x.series_length(), self.min_window, self.max_win_len_prop)?;
        let subsample_size = (x.len() as f64 * SUBSAMPLE_PROPORTION) as usize;
        if subsample_size == 0 {
            return Err(EstimatorError::InsufficientData {
                needed: 2,
                got: x.len(),
            });
        }

        let mut parameters: Vec<(usize, usize, bool)> = Vec::new();
        for &window in &windows {
            for &word_length in &WORD_LENGTHS {
                for norm in NORM_OPTIONS {
                    if coefficient_count(window, norm) > 0 {
                        parameters.push((window, word_length, norm));
                    }
                }
            }
        }

        let mut rng = seeded_rng(self.random_state);
        let start = Instant::now();
        let mut members: Vec<Member> = Vec::with_capacity(self.max_ensemble_size);
        let mut lowest_acc = 1.0;
        let mut lowest_idx = 0;
        let mut evaluated = 0;

        while self.keep_sampling(evaluated, start) && !parameters.is_empty() {
            let (window, word_length, norm) = parameters.remove(rng.gen_range(0..parameters.len()));
            let subsample = index::sample(&mut rng, x.len(), subsample_size).into_vec();
            let sub_x = x.select(&subsample)?;
            let sub_y: Vec<String> = subsample.iter().map(|&i| y[i].clone()).collect();

            let mut boss = IndividualBOSS::new(window, word_length, norm)
                .with_alphabet_size(self.alphabet_size)
                .with_random_state_opt(self.random_state);
            boss.fit(&sub_x, &sub_y)?;

            let full = members.len() >= self.max_ensemble_size;
            let accuracy = boss.train_accuracy(if full { lowest_acc } else { 0.0 }, &mut rng)?;
            let weight = if accuracy > 0.0 {
                accuracy.powi(4)
            } else {
                MIN_WEIGHT
            };
            let member = Member {
                boss,
                accuracy,
                weight,
                subsample,
            };

            if !full {
                if accuracy < lowest_acc {
                    lowest_acc = accuracy;
                    lowest_idx = members.len();
                }
                debug!(window, word_length, norm, accuracy, "adding cBOSS member");
                members.push(member);
            } else if accuracy > lowest_acc {
                debug!(
                    window,
                    word_length,
                    norm,
                    accuracy,
                    replaced = lowest_acc,
                    "replacing worst cBOSS member"
                );
                members[lowest_idx] = member;
                (lowest_acc, lowest_idx) = worst_member(&members);
            }
            evaluated += 1;
        }

        if members.is_empty() {
            return Err(EstimatorError::ComputationError(
                "no cBOSS parameter sample was evaluated".to_string(),
            ));
        }
        debug!(
            n_estimators = members.len(),
            evaluated,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "fitted cBOSS ensemble"
        );
        self.state.set(CbossFit {
            members,
            classes,
            n_parameter_samples: evaluated,
        });
        Ok(())
    }

    fn predict_proba(&self, x: &Panel) -> Result<Vec<Vec<f64>>> {
        let fit = self.state.get()?;
        let mut sums = vec![vec![0.0; fit.classes.len()]; x.len()];
        for member in &fit.members {
            for (row, label) in sums.iter_mut().zip(member.boss.predict(x)?) {
                if let Ok(c) = fit.classes.binary_search(&label) {
                    row[c] += member.weight;
                }
            }
        }
        let total: f64 = fit.members.iter().map(|m| m.weight).sum();
        for row in &mut sums {
            row.iter_mut().for_each(|p| *p /= total);
        }
        Ok(sums)
    }

    fn classes(&self) -> &[String] {
        self.state
            .as_option()
            .map(|f| f.classes.as_slice())
            .unwrap_or(&[])
    }

    fn is_fitted(&self) -> bool {
        self.state.is_fitted()
    }

    fn name(&self) -> &str {
        "ContractableBOSS"
    }
}
