//! Planner configuration.

use std::time::Duration;

use walk_spatial::GreenDiscount;

use crate::generator::CycleEnumerator;
use crate::{PlanError, PlanResult};

/// Tunables shared by every request a [`WalkPlanner`](crate::WalkPlanner)
/// serves.
///
/// | Field            | Default                  |
/// |------------------|--------------------------|
/// | `discount`       | 10 m / 0.5 / 0.7         |
/// | `max_expansions` | 2 000 000                |
/// | `time_limit_ms`  | 5 000                    |
/// | `budget_scale`   | 1.0                      |
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlannerConfig {
    /// Green-proximity discount applied to each session's weights.
    pub discount: GreenDiscount,

    /// Cap on search expansions per request (`None` = unbounded).
    pub max_expansions: Option<u64>,

    /// Wall-clock cap on the search per request, in milliseconds.
    pub time_limit_ms: Option<u64>,

    /// Multiplier applied to the estimated budget before searching.  The
    /// budget estimate is in abstract units (`minutes * speed class`); a
    /// scale of e.g. 60 turns it into metres at 1 km/h per speed class.
    pub budget_scale: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            discount:       GreenDiscount::default(),
            max_expansions: Some(2_000_000),
            time_limit_ms:  Some(5_000),
            budget_scale:   1.0,
        }
    }
}

impl PlannerConfig {
    /// # Errors
    ///
    /// [`PlanError::Spatial`] for an out-of-range discount,
    /// [`PlanError::Config`] for a budget scale that is not a positive
    /// finite number.
    pub fn validate(&self) -> PlanResult<()> {
        self.discount.validate()?;
        if !(self.budget_scale.is_finite() && self.budget_scale > 0.0) {
            return Err(PlanError::Config(format!(
                "budget_scale must be positive and finite, got {}",
                self.budget_scale
            )));
        }
        Ok(())
    }

    /// The default candidate generator for these limits.
    pub fn enumerator(&self) -> CycleEnumerator {
        CycleEnumerator::new(self.max_expansions, self.time_limit_ms.map(Duration::from_millis))
    }
}
