//! Forecaster selection by series category.

use crate::base::{BoxedForecaster, Forecaster, ForecasterCapabilities};
use crate::core::{ForecastingHorizon, TimePoint, TimeSeries};
use crate::error::{EstimatorError, Result};
use crate::transform::{AdiCvTransformer, Categorizer};
use std::collections::HashMap;
use tracing::info;

/// Where the chosen forecaster lives after fit.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Selection {
    Category(String),
    Fallback,
}

/// Compositor that categorises the training series and delegates to the
/// forecaster registered for that category.
///
/// The default categorizer is [`AdiCvTransformer`], whose categories are
/// `"smooth"`, `"erratic"`, `"intermittent"` and `"lumpy"`.
pub struct CategoryCompositor {
    forecasters: HashMap<String, BoxedForecaster>,
    categorizer: Box<dyn Categorizer>,
    fallback: Option<BoxedForecaster>,
    category: Option<String>,
    selection: Option<Selection>,
}

impl CategoryCompositor {
    pub fn new(forecasters: HashMap<String, BoxedForecaster>) -> Self {
        Self {
            forecasters,
            categorizer: Box::new(AdiCvTransformer::new()),
            fallback: None,
            category: None,
            selection: None,
        }
    }

    /// Use a custom categorizer.
    pub fn with_categorizer(mut self, categorizer: Box<dyn Categorizer>) -> Self {
        self.categorizer = categorizer;
        self
    }

    /// Forecaster used when no forecaster matches the category.
    pub fn with_fallback(mut self, fallback: BoxedForecaster) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Category detected in the last fit.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Whether the fallback forecaster was chosen.
    pub fn used_fallback(&self) -> bool {
        self.selection == Some(Selection::Fallback)
    }

    /// Forecaster chosen in the last fit.
    pub fn chosen_forecaster(&self) -> Option<&dyn Forecaster> {
        match self.selection.as_ref()? {
            Selection::Category(c) => self.forecasters.get(c).map(|f| f.as_ref()),
            Selection::Fallback => self.fallback.as_deref(),
        }
    }

    fn chosen_mut(&mut self) -> Result<&mut BoxedForecaster> {
        let chosen = match self.selection.as_ref().ok_or(EstimatorError::NotFitted)? {
            Selection::Category(c) => self.forecasters.get_mut(c),
            Selection::Fallback => self.fallback.as_mut(),
        };
        chosen.ok_or(EstimatorError::NotFitted)
    }
}

impl Forecaster for CategoryCompositor {
    fn fit(
        &mut self,
        y: &TimeSeries,
        x: Option<&TimeSeries>,
        fh: Option<&ForecastingHorizon>,
    ) -> Result<()> {
        self.category = None;
        self.selection = None;

        let category = self.categorizer.categorize(y)?;
        let selection = if self.forecasters.contains_key(&category) {
            Selection::Category(category.clone())
        } else if self.fallback.is_some() {
            Selection::Fallback
        } else {
            return Err(EstimatorError::NoForecasterForCategory(category));
        };

        self.selection = Some(selection);
        let chosen = self.chosen_mut()?;
        info!(
            category = %category,
            forecaster = chosen.name(),
            "category compositor selected forecaster"
        );
        let fitted = chosen.fit(y, x, fh);
        if fitted.is_err() {
            self.selection = None;
            return fitted;
        }
        self.category = Some(category);
        Ok(())
    }

    fn predict(
        &self,
        fh: Option<&ForecastingHorizon>,
        x: Option<&TimeSeries>,
    ) -> Result<TimeSeries> {
        self.chosen_forecaster()
            .ok_or(EstimatorError::NotFitted)?
            .predict(fh, x)
    }

    fn update(&mut self, y: &TimeSeries, x: Option<&TimeSeries>) -> Result<()> {
        self.chosen_mut()?.update(y, x)
    }

    fn capabilities(&self) -> ForecasterCapabilities {
        match self.chosen_forecaster() {
            Some(f) => f.capabilities(),
            None => ForecasterCapabilities::default(),
        }
    }

    fn cutoff(&self) -> Option<TimePoint> {
        self.chosen_forecaster().and_then(|f| f.cutoff())
    }

    fn name(&self) -> &str {
        "CategoryCompositor"
    }
}
