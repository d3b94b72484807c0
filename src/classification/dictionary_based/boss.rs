//! Bag of SFA Symbols (BOSS).
//!
//! [`IndividualBOSS`] is a 1-nearest-neighbour classifier over SFA bags.
//! [`BOSSEnsemble`] searches window sizes, word lengths and normalisation
//! and keeps every member within a fraction of the best leave-one-out
//! training accuracy.

use super::sfa::{coefficient_count, Bag, SFA};
use crate::base::{check_classifier_input, Classifier, FitState};
use crate::core::Panel;
use crate::error::{EstimatorError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Word lengths tried by the ensembles, longest first.
pub(crate) const WORD_LENGTHS: [usize; 5] = [16, 14, 12, 10, 8];

/// Normalisation options tried by the ensembles.
pub(crate) const NORM_OPTIONS: [bool; 2] = [true, false];

/// Non-symmetric BOSS distance: squared count differences over the words of
/// `first` only. Returns `f64::MAX` as soon as the running sum exceeds
/// `best`.
pub fn boss_distance(first: &Bag, second: &Bag, best: f64) -> f64 {
    let mut dist = 0.0;
    for (word, &count) in first {
        let other = second.get(word).copied().unwrap_or(0);
        let diff = count as f64 - other as f64;
        dist += diff * diff;
        if dist > best {
            return f64::MAX;
        }
    }
    dist
}

pub(crate) fn seeded_rng(random_state: Option<u64>) -> StdRng {
    match random_state {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Window range searched by the ensembles: `min_window..=max_window` with
/// an increment giving about `series_length / 4` sizes.
pub(crate) fn window_sizes(
    series_length: usize,
    min_window: usize,
    max_win_len_prop: f64,
) -> Result<Vec<usize>> {
    if !(max_win_len_prop > 0.0 && max_win_len_prop <= 1.0) {
        return Err(EstimatorError::InvalidParameter(format!(
            "max_win_len_prop must be in (0, 1], got {max_win_len_prop}"
        )));
    }
    let max_window = (series_length as f64 * max_win_len_prop) as usize;
    if min_window == 0 || min_window > max_window {
        return Err(EstimatorError::InvalidParameter(format!(
            "min_window ({min_window}) must be in 1..={max_window} for series of length {series_length}"
        )));
    }
    let max_window_searches = series_length as f64 / 4.0;
    let increment = (((max_window - min_window) as f64 / max_window_searches) as usize).max(1);
    Ok((min_window..=max_window).step_by(increment).collect())
}

#[derive(Debug, Clone)]
struct BossFit {
    sfa: SFA,
    bags: Vec<Bag>,
    /// Label of each training instance.
    labels: Vec<String>,
    classes: Vec<String>,
}

/// Single BOSS classifier.
#[derive(Debug, Clone)]
pub struct IndividualBOSS {
    window_size: usize,
    word_length: usize,
    norm: bool,
    alphabet_size: usize,
    save_words: bool,
    random_state: Option<u64>,
    state: FitState<BossFit>,
}

impl IndividualBOSS {
    pub fn new(window_size: usize, word_length: usize, norm: bool) -> Self {
        Self {
            window_size,
            word_length,
            norm,
            alphabet_size: 4,
            save_words: false,
            random_state: None,
            state: FitState::Unfitted,
        }
    }

    pub fn with_alphabet_size(mut self, alphabet_size: usize) -> Self {
        self.alphabet_size = alphabet_size;
        self
    }

    /// Keep SFA words so [`IndividualBOSS::shorten`] can be used.
    pub fn with_save_words(mut self, save: bool) -> Self {
        self.save_words = save;
        self
    }

    /// Seed for nearest-neighbour tie breaking.
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    pub(crate) fn with_random_state_opt(mut self, seed: Option<u64>) -> Self {
        self.random_state = seed;
        self
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Word length in use; capped at the window size once fitted.
    pub fn word_length(&self) -> usize {
        self.state
            .as_option()
            .map_or(self.word_length, |f| f.sfa.word_length())
    }

    pub fn norm(&self) -> bool {
        self.norm
    }

    /// Bags of the training instances.
    pub fn bags(&self) -> Option<&[Bag]> {
        self.state.as_option().map(|f| f.bags.as_slice())
    }

    /// Copy fitted on words shortened to `word_length` letters.
    pub fn shorten(&self, word_length: usize) -> Result<IndividualBOSS> {
        let fit = self.state.get()?;
        let (sfa, bags) = fit.sfa.shorten(word_length)?;
        let mut boss = self.clone();
        boss.word_length = word_length;
        boss.state.set(BossFit {
            sfa,
            bags,
            labels: fit.labels.clone(),
            classes: fit.classes.clone(),
        });
        Ok(boss)
    }

    /// Drop saved SFA words.
    pub fn clean(&mut self) {
        if let Ok(fit) = self.state.get_mut() {
            fit.sfa.clear_words();
        }
    }

    /// Index of the training bag nearest to `bag`, skipping `skip`.
    /// Ties are broken by a coin flip.
    fn nearest(&self, fit: &BossFit, bag: &Bag, skip: Option<usize>, rng: &mut StdRng) -> Option<usize> {
        let mut best_dist = f64::MAX;
        let mut nn = None;
        for (n, other) in fit.bags.iter().enumerate() {
            if Some(n) == skip {
                continue;
            }
            let dist = boss_distance(bag, other, best_dist);
            if dist < best_dist || (dist == best_dist && rng.gen::<f64>() < 0.5) {
                best_dist = dist;
                nn = Some(n);
            }
        }
        nn
    }

    /// Leave-one-out prediction for training instance `i`.
    pub(crate) fn train_predict(&self, i: usize, rng: &mut StdRng) -> Result<Option<&str>> {
        let fit = self.state.get()?;
        let bag = fit.bags.get(i).ok_or(EstimatorError::IndexOutOfBounds {
            index: i,
            size: fit.bags.len(),
        })?;
        Ok(self
            .nearest(fit, bag, Some(i), rng)
            .map(|n| fit.labels[n].as_str()))
    }

    /// Leave-one-out accuracy on the training data; `-1` once reaching
    /// `lowest_acc` has become impossible.
    pub(crate) fn train_accuracy(&self, lowest_acc: f64, rng: &mut StdRng) -> Result<f64> {
        let fit = self.state.get()?;
        let n = fit.labels.len();
        let required = (lowest_acc * n as f64) as usize;
        let mut correct = 0;
        for i in 0..n {
            if correct + n - i < required {
                return Ok(-1.0);
            }
            if self.train_predict(i, rng)? == Some(fit.labels[i].as_str()) {
                correct += 1;
            }
        }
        Ok(correct as f64 / n as f64)
    }
}

impl Classifier for IndividualBOSS {
    fn fit(&mut self, x: &Panel, y: &[String]) -> Result<()> {
        let classes = check_classifier_input(x, y)?;
        let mut sfa = SFA::new(self.word_length, self.alphabet_size, self.window_size)
            .with_norm(self.norm)
            .with_remove_repeat_words(true)
            .with_save_words(self.save_words);
        let bags = sfa.fit_transform(x)?;
        self.state.set(BossFit {
            sfa,
            bags,
            labels: y.to_vec(),
            classes,
        });
        Ok(())
    }

    fn predict_proba(&self, x: &Panel) -> Result<Vec<Vec<f64>>> {
        let classes = self.classes();
        Ok(self
            .predict(x)?
            .iter()
            .map(|label| {
                classes
                    .iter()
                    .map(|c| if c == label { 1.0 } else { 0.0 })
                    .collect()
            })
            .collect())
    }

    fn predict(&self, x: &Panel) -> Result<Vec<String>> {
        let fit = self.state.get()?;
        let mut rng = seeded_rng(self.random_state);
        fit.sfa
            .transform(x)?
            .iter()
            .map(|bag| {
                self.nearest(fit, bag, None, &mut rng)
                    .map(|n| fit.labels[n].clone())
                    .ok_or(EstimatorError::InsufficientData { needed: 1, got: 0 })
            })
            .collect()
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
        "IndividualBOSS"
    }
}

/// A fitted ensemble member and its leave-one-out accuracy.
#[derive(Debug, Clone)]
struct Member {
    boss: IndividualBOSS,
    accuracy: f64,
}

#[derive(Debug, Clone)]
struct EnsembleFit {
    members: Vec<Member>,
    classes: Vec<String>,
}

/// BOSS ensemble.
///
/// For each normalisation option and window size the best word length is
/// chosen by leave-one-out accuracy; members within `threshold` of the best
/// accuracy are kept, at most `max_ensemble_size` of them. Probabilities
/// are member vote fractions.
#[derive(Debug, Clone)]
pub struct BOSSEnsemble {
    threshold: f64,
    max_ensemble_size: usize,
    max_win_len_prop: f64,
    min_window: usize,
    alphabet_size: usize,
    random_state: Option<u64>,
    state: FitState<EnsembleFit>,
}

impl Default for BOSSEnsemble {
    fn default() -> Self {
        Self::new()
    }
}

impl BOSSEnsemble {
    pub fn new() -> Self {
        Self {
            threshold: 0.92,
            max_ensemble_size: 500,
            max_win_len_prop: 1.0,
            min_window: 10,
            alphabet_size: 4,
            random_state: None,
            state: FitState::Unfitted,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
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

    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    pub fn n_estimators(&self) -> usize {
        self.state.as_option().map_or(0, |f| f.members.len())
    }

    /// Fitted members.
    pub fn estimators(&self) -> impl Iterator<Item = &IndividualBOSS> {
        self.state
            .as_option()
            .into_iter()
            .flat_map(|f| f.members.iter().map(|m| &m.boss))
    }

    /// Leave-one-out accuracy of each member.
    pub fn accuracies(&self) -> Vec<f64> {
        self.state
            .as_option()
            .map(|f| f.members.iter().map(|m| m.accuracy).collect())
            .unwrap_or_default()
    }

    fn include(&self, accuracy: f64, max_acc: f64, min_max_acc: f64, size: usize) -> bool {
        if accuracy >= max_acc * self.threshold {
            if size >= self.max_ensemble_size {
                accuracy > min_max_acc
            } else {
                true
            }
        } else {
            false
        }
    }
}

/// Lowest member accuracy and its position.
fn worst_member(members: &[Member]) -> (f64, Option<usize>) {
    let mut min_acc = f64::INFINITY;
    let mut min_idx = None;
    for (i, m) in members.iter().enumerate() {
        if m.accuracy < min_acc {
            min_acc = m.accuracy;
            min_idx = Some(i);
        }
    }
    (min_acc, min_idx)
}

impl Classifier for BOSSEnsemble {
    fn fit(&mut self, x: &Panel, y: &[String]) -> Result<()> {
        let classes = check_classifier_input(x, y)?;
        if !(self.threshold > 0.0 && self.threshold <= 1.0) {
            return Err(EstimatorError::InvalidParameter(format!(
                "threshold must be in (0, 1], got {}",
                self.threshold
            )));
        }
        if self.max_ensemble_size == 0 {
            return Err(EstimatorError::InvalidParameter(
                "max_ensemble_size must be positive".to_string(),
            ));
        }
        let windows = window_sizes(x.series_length(), self.min_window, self.max_win_len_prop)?;
        let mut rng = seeded_rng(self.random_state);

        let mut members: Vec<Member> = Vec::new();
        let mut max_acc = -1.0;
        let mut min_max_acc = -1.0;

        for norm in NORM_OPTIONS {
            for &window in &windows {
                if coefficient_count(window, norm) == 0 {
                    continue;
                }
                let mut boss = IndividualBOSS::new(window, WORD_LENGTHS[0], norm)
                    .with_alphabet_size(self.alphabet_size)
                    .with_save_words(true)
                    .with_random_state_opt(self.random_state);
                boss.fit(x, y)?;

                let mut best: Option<Member> = None;
                let mut best_acc = -1.0;
                for (n, &word_length) in WORD_LENGTHS.iter().enumerate() {
                    if n > 0 {
                        if word_length >= boss.word_length() {
                            continue;
                        }
                        boss = boss.shorten(word_length)?;
                    }
                    let accuracy = boss.train_accuracy(best_acc, &mut rng)?;
                    if accuracy >= best_acc {
                        best_acc = accuracy;
                        best = Some(Member {
                            boss: boss.clone(),
                            accuracy,
                        });
                    }
                }

                let Some(mut member) = best else { continue };
                if !self.include(member.accuracy, max_acc, min_max_acc, members.len()) {
                    continue;
                }
                member.boss.clean();
                debug!(
                    window,
                    norm,
                    word_length = member.boss.word_length(),
                    accuracy = member.accuracy,
                    "adding BOSS ensemble member"
                );
                members.push(member);

                if best_acc > max_acc {
                    max_acc = best_acc;
                    let before = members.len();
                    members.retain(|m| m.accuracy >= max_acc * self.threshold);
                    if members.len() < before {
                        debug!(
                            removed = before - members.len(),
                            max_acc, "dropped members below accuracy threshold"
                        );
                    }
                }

                if members.len() > self.max_ensemble_size {
                    if let (_, Some(i)) = worst_member(&members) {
                        members.remove(i);
                    }
                }
                min_max_acc = worst_member(&members).0;
            }
        }

        if members.is_empty() {
            return Err(EstimatorError::ComputationError(
                "no BOSS configuration could be fitted".to_string(),
            ));
        }
        debug!(n_estimators = members.len(), max_acc, "fitted BOSS ensemble");
        self.state.set(EnsembleFit { members, classes });
        Ok(())
    }

    fn predict_proba(&self, x: &Panel) -> Result<Vec<Vec<f64>>> {
        let fit = self.state.get()?;
        let mut sums = vec![vec![0.0; fit.classes.len()]; x.len()];
        for member in &fit.members {
            for (row, label) in sums.iter_mut().zip(member.boss.predict(x)?) {
                if let Ok(c) = fit.classes.binary_search(&label) {
                    row[c] += 1.0;
                }
            }
        }
        let n = fit.members.len() as f64;
        for row in &mut sums {
            row.iter_mut().for_each(|p| *p /= n);
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
        "BOSSEnsemble"
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Slow and fast sine waves with varying phase.
    pub(crate) fn two_class_panel(n_per_class: usize, length: usize, phase: f64) -> (Panel, Vec<String>) {
        let mut instances = Vec::new();
        let mut labels = Vec::new();
        for i in 0..n_per_class {
            let shift = phase + i as f64 * 0.37;
            instances.push(
                (0..length)
                    .map(|t| (2.0 * std::f64::consts::PI * t as f64 / 16.0 + shift).sin())
                    .collect(),
            );
            labels.push("slow".to_string());
            instances.push(
                (0..length)
                    .map(|t| (2.0 * std::f64::consts::PI * t as f64 / 4.0 + shift).sin())
                    .collect(),
            );
            labels.push("fast".to_string());
        }
        (Panel::new(instances).unwrap(), labels)
    }

    fn accuracy(predicted: &[String], actual: &[String]) -> f64 {
        let correct = predicted.iter().zip(actual).filter(|(p, a)| p == a).count();
        correct as f64 / actual.len() as f64
    }

    #[test]
    fn boss_distance_is_non_symmetric() {
        let a: Bag = [(1, 2), (2, 1)].into_iter().collect();
        let b: Bag = [(1, 1), (3, 5)].into_iter().collect();
        assert_relative_eq!(boss_distance(&a, &b, f64::MAX), 2.0);
        assert_relative_eq!(boss_distance(&b, &a, f64::MAX), 26.0);
        assert_eq!(boss_distance(&b, &a, 10.0), f64::MAX);
    }

    #[test]
    fn window_sizes_follow_series_length() {
        assert_eq!(
            window_sizes(24, 10, 1.0).unwrap(),
            vec![10, 12, 14, 16, 18, 20, 22, 24]
        );
        assert_eq!(window_sizes(12, 10, 1.0).unwrap(), vec![10, 11, 12]);
        assert!(window_sizes(8, 10, 1.0).is_err());
    }

    #[test]
    fn individual_boss_recovers_training_labels() {
        let (x, y) = two_class_panel(5, 32, 0.0);
        let mut boss = IndividualBOSS::new(8, 8, false).with_random_state(0);
        boss.fit(&x, &y).unwrap();
        assert_eq!(boss.classes(), &["fast".to_string(), "slow".to_string()]);
        assert_eq!(boss.predict(&x).unwrap(), y);

        let proba = boss.predict_proba(&x).unwrap();
        for row in proba {
            assert_relative_eq!(row.iter().sum::<f64>(), 1.0);
        }
    }

    #[test]
    fn individual_boss_shorten_keeps_labels() {
        let (x, y) = two_class_panel(4, 32, 0.0);
        let mut boss = IndividualBOSS::new(16, 16, true).with_save_words(true);
        boss.fit(&x, &y).unwrap();
        let short = boss.shorten(8).unwrap();
        assert_eq!(short.word_length(), 8);
        assert_eq!(short.classes(), boss.classes());
        assert_eq!(short.bags().unwrap().len(), x.len());
    }

    #[test]
    fn ensemble_probabilities_are_vote_fractions() {
        let (x, y) = two_class_panel(6, 32, 0.0);
        let mut ensemble = BOSSEnsemble::new()
            .with_max_ensemble_size(5)
            .with_random_state(0);
        ensemble.fit(&x, &y).unwrap();

        assert!(ensemble.n_estimators() >= 1);
        assert!(ensemble.n_estimators() <= 5);
        let best = ensemble.accuracies().into_iter().fold(f64::MIN, f64::max);
        for acc in ensemble.accuracies() {
            assert!(acc >= best * 0.92);
        }

        let proba = ensemble.predict_proba(&x).unwrap();
        let n = ensemble.n_estimators() as f64;
        for row in &proba {
            assert_eq!(row.len(), 2);
            assert_relative_eq!(row.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
            for p in row {
                assert_relative_eq!((p * n).round(), p * n, epsilon = 1e-9);
            }
        }
        assert_eq!(ensemble.predict(&x).unwrap(), y);
    }

    #[test]
    fn ensemble_generalises_to_new_phases() {
        let (x, y) = two_class_panel(6, 32, 0.0);
        let (test_x, test_y) = two_class_panel(4, 32, 0.15);
        let mut ensemble = BOSSEnsemble::new().with_random_state(1);
        ensemble.fit(&x, &y).unwrap();
        assert!(accuracy(&ensemble.predict(&test_x).unwrap(), &test_y) >= 0.75);
    }

    #[test]
    fn unit_window_with_norm_is_rejected() {
        let (x, y) = two_class_panel(3, 12, 0.0);
        let mut boss = IndividualBOSS::new(1, 8, true);
        assert!(matches!(
            boss.fit(&x, &y),
            Err(EstimatorError::InvalidParameter(_))
        ));
    }

    #[test]
    fn ensemble_skips_unit_window_with_norm() {
        let (x, y) = two_class_panel(3, 12, 0.0);
        let mut ensemble = BOSSEnsemble::new()
            .with_min_window(1)
            .with_random_state(0);
        ensemble.fit(&x, &y).unwrap();
        assert!(ensemble.n_estimators() >= 1);
        assert!(ensemble.estimators().all(|b| !(b.norm() && b.window_size() == 1)));
    }

    #[test]
    fn ensemble_rejects_short_series() {
        let (x, y) = two_class_panel(2, 8, 0.0);
        assert!(matches!(
            BOSSEnsemble::new().fit(&x, &y),
            Err(EstimatorError::InvalidParameter(_))
        ));
    }

    #[test]
    fn unfitted_ensemble_fails() {
        let (x, _) = two_class_panel(1, 16, 0.0);
        assert_eq!(
            BOSSEnsemble::new().predict_proba(&x),
            Err(EstimatorError::NotFitted)
        );
    }
}
