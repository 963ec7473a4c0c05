//! Scenario runner for batch and sensitivity projections
//!
//! Every projection is independent, so batches fan out across the rayon
//! thread pool. Results come back in input order.

use log::info;
use rayon::prelude::*;

use crate::error::RoiResult;
use crate::inputs::{RoiInputs, Scenario};
use crate::projection::{calculate_roi, CalculatedMetrics};

/// Result of one scenario in a batch
#[derive(Debug)]
pub struct ScenarioResult {
    pub scenario_id: String,
    pub metrics: RoiResult<CalculatedMetrics>,
}

/// One point of an appreciation sweep
#[derive(Debug, Clone)]
pub struct SensitivityPoint {
    /// Annual appreciation (%)
    pub appreciation: f64,
    pub metrics: CalculatedMetrics,
}

/// Runs many projections in parallel
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new();
/// let scenarios = load_scenarios("scenarios.csv")?;
/// for result in runner.run_batch(&scenarios) {
///     println!("{}: {:?}", result.scenario_id, result.metrics.map(|m| m.irr));
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    /// Run sequentially instead of on the thread pool
    sequential: bool,
}

impl ScenarioRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runner that stays on the calling thread
    pub fn sequential() -> Self {
        Self { sequential: true }
    }

    /// Run a single projection
    pub fn run(&self, inputs: &RoiInputs) -> RoiResult<CalculatedMetrics> {
        calculate_roi(inputs)
    }

    /// Run every scenario. A scenario with invalid inputs yields an error
    /// in its slot without stopping the rest of the batch.
    pub fn run_batch(&self, scenarios: &[Scenario]) -> Vec<ScenarioResult> {
        info!("running {} scenarios", scenarios.len());

        let run_one = |scenario: &Scenario| ScenarioResult {
            scenario_id: scenario.scenario_id.clone(),
            metrics: calculate_roi(&scenario.inputs),
        };

        if self.sequential {
            scenarios.iter().map(run_one).collect()
        } else {
            scenarios.par_iter().map(run_one).collect()
        }
    }

    /// Re-run `inputs` once per appreciation rate (%)
    pub fn appreciation_sensitivity(
        &self,
        inputs: &RoiInputs,
        rates: &[f64],
    ) -> RoiResult<Vec<SensitivityPoint>> {
        inputs.validate()?;

        let run_one = |&appreciation: &f64| {
            let mut shocked = inputs.clone();
            shocked.settings.property_appreciation = appreciation;
            calculate_roi(&shocked).map(|metrics| SensitivityPoint {
                appreciation,
                metrics,
            })
        };

        if self.sequential {
            rates.iter().map(run_one).collect()
        } else {
            rates.par_iter().map(run_one).collect()
        }
    }
}
