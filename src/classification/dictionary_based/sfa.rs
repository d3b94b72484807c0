//! Symbolic Fourier Approximation (SFA).
//!
//! Each sliding window of a series is reduced to its first Fourier
//! coefficients, and every coefficient is discretised into a letter with
//! breakpoints learnt by multiple coefficient binning (MCB) on the training
//! data. Letters are packed into an integer word; a series becomes a bag of
//! word counts.

use crate::base::FitState;
use crate::core::Panel;
use crate::error::{EstimatorError, Result};
use rustfft::{num_complex::Complex64, Fft, FftPlanner};
use std::collections::HashMap;
use std::sync::Arc;

/// Word counts of one series.
pub type Bag = HashMap<u64, u32>;

/// How MCB places breakpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BinningMethod {
    /// Equal number of training values per bin.
    #[default]
    EquiDepth,
    /// Equal width between the smallest and largest training value.
    EquiWidth,
}

#[derive(Debug, Clone, PartialEq)]
struct SfaFit {
    /// `breakpoints[letter][bin]`; the last bin is unbounded.
    breakpoints: Vec<Vec<f64>>,
    word_length: usize,
    series_length: usize,
    /// All words of each training series, repeats included.
    words: Option<Vec<Vec<u64>>>,
}

/// Symbolic Fourier Approximation transformer.
#[derive(Debug, Clone)]
pub struct SFA {
    word_length: usize,
    alphabet_size: usize,
    window_size: usize,
    norm: bool,
    binning_method: BinningMethod,
    remove_repeat_words: bool,
    lower_bounding: bool,
    save_words: bool,
    state: FitState<SfaFit>,
}

impl SFA {
    pub fn new(word_length: usize, alphabet_size: usize, window_size: usize) -> Self {
        Self {
            word_length,
            alphabet_size,
            window_size,
            norm: false,
            binning_method: BinningMethod::EquiDepth,
            remove_repeat_words: false,
            lower_bounding: true,
            save_words: false,
            state: FitState::Unfitted,
        }
    }

    /// Drop the DC coefficient, making words invariant to the window mean.
    pub fn with_norm(mut self, norm: bool) -> Self {
        self.norm = norm;
        self
    }

    pub fn with_binning_method(mut self, method: BinningMethod) -> Self {
        self.binning_method = method;
        self
    }

    /// Count runs of the same word once.
    pub fn with_remove_repeat_words(mut self, remove: bool) -> Self {
        self.remove_repeat_words = remove;
        self
    }

    /// Scale by `1/sqrt(window_size)` and negate imaginary parts.
    pub fn with_lower_bounding(mut self, lower_bounding: bool) -> Self {
        self.lower_bounding = lower_bounding;
        self
    }

    /// Keep the training words so bags can be shortened later.
    pub fn with_save_words(mut self, save: bool) -> Self {
        self.save_words = save;
        self
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn alphabet_size(&self) -> usize {
        self.alphabet_size
    }

    pub fn norm(&self) -> bool {
        self.norm
    }

    /// Word length in use: once fitted, the configured one capped at the
    /// window size and at the number of Fourier values a window yields.
    pub fn word_length(&self) -> usize {
        self.state
            .as_option()
            .map_or(self.word_length, |f| f.word_length)
    }

    /// Bits used per letter.
    pub fn letter_bits(&self) -> u32 {
        letter_bits(self.alphabet_size)
    }

    pub fn breakpoints(&self) -> Option<&[Vec<f64>]> {
        self.state.as_option().map(|f| f.breakpoints.as_slice())
    }

    /// Saved training words, one sequence per training series.
    pub fn words(&self) -> Option<&[Vec<u64>]> {
        self.state.as_option().and_then(|f| f.words.as_deref())
    }

    pub fn is_fitted(&self) -> bool {
        self.state.is_fitted()
    }

    /// Forget saved training words.
    pub fn clear_words(&mut self) {
        if let Ok(fit) = self.state.get_mut() {
            fit.words = None;
        }
    }

    fn validate(&self, series_length: usize) -> Result<usize> {
        if self.alphabet_size < 2 {
            return Err(EstimatorError::InvalidParameter(format!(
                "alphabet_size must be at least 2, got {}",
                self.alphabet_size
            )));
        }
        if self.window_size == 0 || self.window_size > series_length {
            return Err(EstimatorError::InvalidParameter(format!(
                "window_size must be in 1..={series_length}, got {}",
                self.window_size
            )));
        }
        if self.word_length == 0 {
            return Err(EstimatorError::InvalidParameter(
                "word_length must be positive".to_string(),
            ));
        }
        let available = coefficient_count(self.window_size, self.norm);
        if available == 0 {
            return Err(EstimatorError::InvalidParameter(format!(
                "a window of {} with norm leaves no Fourier values",
                self.window_size
            )));
        }
        let word_length = self.word_length.min(self.window_size).min(available);
        if word_length as u32 * self.letter_bits() > u64::BITS {
            return Err(EstimatorError::InvalidParameter(format!(
                "{word_length} letters of {} bits do not fit a 64-bit word",
                self.letter_bits()
            )));
        }
        Ok(word_length)
    }

    /// Learn breakpoints from `x`.
    pub fn fit(&mut self, x: &Panel) -> Result<()> {
        self.fit_breakpoints(x)?;
        Ok(())
    }

    /// Learn breakpoints and return the bags of the training data.
    pub fn fit_transform(&mut self, x: &Panel) -> Result<Vec<Bag>> {
        self.fit_breakpoints(x)?;
        let words = self.transform_words(x)?;
        let bags = words.iter().map(|w| self.bag(w)).collect();
        if self.save_words {
            if let Ok(fit) = self.state.get_mut() {
                fit.words = Some(words);
            }
        }
        Ok(bags)
    }

    /// Bags of `x` with the fitted breakpoints.
    pub fn transform(&self, x: &Panel) -> Result<Vec<Bag>> {
        let words = self.transform_words(x)?;
        Ok(words.iter().map(|w| self.bag(w)).collect())
    }

    /// Copy with words shortened to `word_length` letters, and the bags of
    /// the shortened training words. Requires saved words.
    pub fn shorten(&self, word_length: usize) -> Result<(SFA, Vec<Bag>)> {
        let fit = self.state.get()?;
        let words = fit.words.as_ref().ok_or_else(|| {
            EstimatorError::InvalidParameter(
                "shortening requires an SFA fitted with saved words".to_string(),
            )
        })?;
        if word_length == 0 || word_length > fit.word_length {
            return Err(EstimatorError::InvalidParameter(format!(
                "cannot shorten {}-letter words to {word_length}",
                fit.word_length
            )));
        }
        let shift = self.letter_bits() * (fit.word_length - word_length) as u32;
        let short_words: Vec<Vec<u64>> = words
            .iter()
            .map(|ws| ws.iter().map(|w| shift_right(*w, shift)).collect())
            .collect();

        let mut sfa = self.clone();
        sfa.word_length = word_length;
        sfa.state = FitState::Fitted(SfaFit {
            breakpoints: fit.breakpoints[..word_length].to_vec(),
            word_length,
            series_length: fit.series_length,
            words: Some(short_words),
        });
        let bags = sfa
            .words()
            .unwrap_or(&[])
            .iter()
            .map(|w| sfa.bag(w))
            .collect();
        Ok((sfa, bags))
    }

    fn fit_breakpoints(&mut self, x: &Panel) -> Result<()> {
        if x.is_empty() {
            return Err(EstimatorError::EmptyData);
        }
        let series_length = x.series_length();
        let word_length = self.validate(series_length)?;
        let fft = FftPlanner::<f64>::new().plan_fft_forward(self.window_size);

        // MCB: non-overlapping windows, the last one aligned to the end.
        let num_windows = series_length.div_ceil(self.window_size);
        let starts: Vec<usize> = (0..num_windows)
            .map(|i| {
                if i + 1 == num_windows {
                    series_length - self.window_size
                } else {
                    i * self.window_size
                }
            })
            .collect();

        let mut columns = vec![Vec::with_capacity(x.len() * num_windows); word_length];
        for series in x.instances() {
            for &start in &starts {
                let coefs = self.dft(&series[start..start + self.window_size], &fft, word_length);
                for (column, c) in columns.iter_mut().zip(coefs) {
                    column.push(c);
                }
            }
        }

        let breakpoints = columns
            .iter_mut()
            .map(|column| self.column_breakpoints(column))
            .collect();

        self.state.set(SfaFit {
            breakpoints,
            word_length,
            series_length,
            words: None,
        });
        Ok(())
    }

    fn column_breakpoints(&self, column: &mut [f64]) -> Vec<f64> {
        if column.is_empty() {
            return vec![f64::MAX; self.alphabet_size];
        }
        column.sort_by(f64::total_cmp);
        let mut breakpoints = Vec::with_capacity(self.alphabet_size);
        match self.binning_method {
            BinningMethod::EquiDepth => {
                let depth = column.len() as f64 / self.alphabet_size as f64;
                let mut bin_index = 0.0;
                for _ in 0..self.alphabet_size - 1 {
                    bin_index += depth;
                    let i = (bin_index as usize).min(column.len() - 1);
                    breakpoints.push(column[i]);
                }
            }
            BinningMethod::EquiWidth => {
                let first = column[0];
                let width = (column[column.len() - 1] - first) / self.alphabet_size as f64;
                for bp in 0..self.alphabet_size - 1 {
                    breakpoints.push((bp + 1) as f64 * width + first);
                }
            }
        }
        breakpoints.push(f64::MAX);
        breakpoints
    }

    /// First `length` normalised Fourier values of `window`, real and
    /// imaginary parts interleaved.
    fn dft(&self, window: &[f64], fft: &Arc<dyn Fft<f64>>, length: usize) -> Vec<f64> {
        let w = window.len() as f64;
        let mean = window.iter().sum::<f64>() / w;
        let mut std = (window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / w).sqrt();
        if std == 0.0 {
            std = 1.0;
        }
        let scale = if self.lower_bounding { 1.0 / w.sqrt() } else { 1.0 };
        let factor = scale / std;

        let mut buffer: Vec<Complex64> = window.iter().map(|&v| Complex64::new(v, 0.0)).collect();
        fft.process(&mut buffer);

        let skip = usize::from(self.norm);
        let sign = if self.lower_bounding { -1.0 } else { 1.0 };
        buffer
            .iter()
            .skip(skip)
            .flat_map(|c| [c.re, sign * c.im])
            .take(length)
            .map(|v| v * factor)
            .collect()
    }

    fn transform_words(&self, x: &Panel) -> Result<Vec<Vec<u64>>> {
        let fit = self.state.get()?;
        if x.series_length() != fit.series_length && !x.is_empty() {
            return Err(EstimatorError::DimensionMismatch {
                expected: fit.series_length,
                got: x.series_length(),
            });
        }
        let fft = FftPlanner::<f64>::new().plan_fft_forward(self.window_size);
        let bits = self.letter_bits();
        Ok(x.instances()
            .iter()
            .map(|series| {
                series
                    .windows(self.window_size)
                    .map(|window| {
                        let coefs = self.dft(window, &fft, fit.word_length);
                        word(&coefs, &fit.breakpoints, bits)
                    })
                    .collect()
            })
            .collect())
    }

    fn bag(&self, words: &[u64]) -> Bag {
        let mut bag = Bag::new();
        let mut last = None;
        for &w in words {
            if self.remove_repeat_words && last == Some(w) {
                continue;
            }
            *bag.entry(w).or_insert(0) += 1;
            last = Some(w);
        }
        bag
    }
}

/// Number of real values a window DFT yields: real and imaginary parts of
/// every coefficient, without the DC term when `norm` is set.
pub(crate) fn coefficient_count(window_size: usize, norm: bool) -> usize {
    2 * window_size.saturating_sub(usize::from(norm))
}

fn letter_bits(alphabet_size: usize) -> u32 {
    usize::BITS - alphabet_size.saturating_sub(1).leading_zeros()
}

fn shift_right(word: u64, shift: u32) -> u64 {
    word.checked_shr(shift).unwrap_or(0)
}

/// Pack the letter of each coefficient, first coefficient in the highest bits.
fn word(coefs: &[f64], breakpoints: &[Vec<f64>], bits: u32) -> u64 {
    coefs
        .iter()
        .zip(breakpoints)
        .fold(0u64, |word, (&value, bps)| {
            let letter = bps.iter().position(|&bp| value <= bp).unwrap_or(bps.len() - 1);
            (word << bits) | letter as u64
        })
}
