//! Explicit fitted/unfitted state holder.

use crate::error::{EstimatorError, Result};

/// Fitted attributes of an estimator, or nothing before `fit`.
#[derive(Debug, Clone, PartialEq)]
pub enum FitState<T> {
    Unfitted,
    Fitted(T),
}

impl<T> Default for FitState<T> {
    fn default() -> Self {
        FitState::Unfitted
    }
}

impl<T> FitState<T> {
    pub fn is_fitted(&self) -> bool {
        matches!(self, FitState::Fitted(_))
    }

    /// Fitted attributes, or [`EstimatorError::NotFitted`].
    pub fn get(&self) -> Result<&T> {
        match self {
            FitState::Fitted(inner) => Ok(inner),
            FitState::Unfitted => Err(EstimatorError::NotFitted),
        }
    }

    pub fn get_mut(&mut self) -> Result<&mut T> {
        match self {
            FitState::Fitted(inner) => Ok(inner),
            FitState::Unfitted => Err(EstimatorError::NotFitted),
        }
    }

    pub fn as_option(&self) -> Option<&T> {
        match self {
            FitState::Fitted(inner) => Some(inner),
            FitState::Unfitted => None,
        }
    }

    /// Replace any previous fit.
    pub fn set(&mut self, fitted: T) {
        *self = FitState::Fitted(fitted);
    }

    pub fn reset(&mut self) {
        *self = FitState::Unfitted;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unfitted_state_reports_not_fitted() {
        let state: FitState<u8> = FitState::default();
        assert!(!state.is_fitted());
        assert_eq!(state.get(), Err(EstimatorError::NotFitted));
    }

    #[test]
    fn refit_overwrites_attributes() {
        let mut state = FitState::default();
        state.set(1);
        state.set(2);
        assert_eq!(state.get(), Ok(&2));
        state.reset();
        assert!(state.as_option().is_none());
    }
}
