use super::retirement::accumulate;
use super::types::RetirementInputs;

#[derive(Debug, Clone, Copy)]
pub struct SolveConfig {
    pub max_iterations: u32,
    pub min_upper_bound: f64,
    pub expansion_cap: f64,
}

impl Default for SolveConfig {
    fn default() -> Self {
        Self {
            max_iterations: 60,
            min_upper_bound: 10_000.0,
            expansion_cap: 5_000_000.0,
        }
    }
}

/// Smallest extra monthly saving (rounded up to a whole unit) that lifts the
/// accumulation phase to `target`. Zero when the plan already gets there.
///
/// The upper bound stops doubling at `expansion_cap`; past that the bisection
/// still runs and the returned value may fall short of the target.
pub fn solve_extra_monthly(inputs: &RetirementInputs, target: f64, config: SolveConfig) -> f64 {
    let years = inputs.years_to_retire();
    let project_with = |extra: f64| {
        accumulate(
            inputs.existing_corpus,
            inputs.monthly_savings + extra,
            inputs.expected_return,
            years,
        )
    };

    let baseline = project_with(0.0);
    if baseline >= target {
        return 0.0;
    }

    let months = (years as f64 * 12.0).max(1.0);
    let mut lo = 0.0;
    let mut hi = config
        .min_upper_bound
        .max(((target - baseline) / months).ceil() * 2.0);
    while project_with(hi) < target && hi < config.expansion_cap {
        hi *= 2.0;
    }

    for _ in 0..config.max_iterations {
        let mid = (lo + hi) * 0.5;
        if project_with(mid) >= target {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    hi.ceil()
}
