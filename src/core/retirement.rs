use super::solver::{SolveConfig, solve_extra_monthly};
use super::types::{ProjectionPoint, RetirementAssessment, RetirementInputs, RetirementStatus};

const REAL_RETURN_EPSILON: f64 = 1e-6;
const SPREAD_EPSILON: f64 = 1e-9;

/// Corpus needed at the retirement date to fund inflation-growing annual
/// expenses for `years_in_retirement` years (growing annuity present value).
///
/// Falls back to `expense * years` when return and inflation cancel out.
pub fn required_corpus(
    monthly_expenses: f64,
    years_to_retire: u32,
    years_in_retirement: u32,
    expected_return_pct: f64,
    inflation_pct: f64,
) -> f64 {
    let r = expected_return_pct / 100.0;
    let g = inflation_pct / 100.0;
    let expense_at_retirement =
        monthly_expenses * 12.0 * (1.0 + g).powf(f64::from(years_to_retire));
    let years = years_in_retirement as f64;

    let real_return = (1.0 + r) / (1.0 + g) - 1.0;
    if real_return.abs() < REAL_RETURN_EPSILON {
        return expense_at_retirement * years;
    }
    let spread = r - g;
    if spread.abs() < SPREAD_EPSILON {
        return expense_at_retirement * years;
    }

    let factor = 1.0 - ((1.0 + g) / (1.0 + r)).powf(years);
    expense_at_retirement * factor / spread
}

/// Corpus after `years` of annual growth, with a year of savings added at
/// each year end.
pub fn accumulate(
    existing_corpus: f64,
    monthly_savings: f64,
    expected_return_pct: f64,
    years: u32,
) -> f64 {
    let r = expected_return_pct / 100.0;
    let mut corpus = existing_corpus;
    for _ in 0..years {
        corpus = corpus * (1.0 + r) + monthly_savings * 12.0;
    }
    corpus
}

/// Start-of-year corpus for every age from today through life expectancy.
///
/// Before retirement the corpus grows and takes a year of savings. From the
/// retirement age on it grows and pays out the annualized expense, escalated
/// by inflation over all years elapsed since today.
pub fn project_corpus(inputs: &RetirementInputs) -> Vec<ProjectionPoint> {
    let r = inputs.expected_return / 100.0;
    let g = inputs.inflation / 100.0;
    let years_to_retire = inputs.years_to_retire();
    let total_years = inputs.life_expectancy.saturating_sub(inputs.current_age);
    let annual_expense_today = inputs.monthly_expenses * 12.0;

    let mut corpus = inputs.existing_corpus;
    let mut points = Vec::with_capacity(total_years as usize + 1);
    for offset in 0..=total_years {
        let age = inputs.current_age + offset;
        points.push(ProjectionPoint { age, corpus });

        if age < inputs.retirement_age {
            corpus = corpus * (1.0 + r) + inputs.monthly_savings * 12.0;
        } else {
            let years_since_retirement = age - inputs.retirement_age;
            let exponent = f64::from(years_to_retire) + f64::from(years_since_retirement);
            let withdrawal = annual_expense_today * (1.0 + g).powf(exponent);
            corpus = corpus * (1.0 + r) - withdrawal;
        }
    }
    points
}

pub fn assess_retirement(inputs: &RetirementInputs) -> RetirementAssessment {
    let years_to_retire = inputs.years_to_retire();
    let years_in_retirement = inputs.years_in_retirement();

    let required = required_corpus(
        inputs.monthly_expenses,
        years_to_retire,
        years_in_retirement,
        inputs.expected_return,
        inputs.inflation,
    );
    let projected = accumulate(
        inputs.existing_corpus,
        inputs.monthly_savings,
        inputs.expected_return,
        years_to_retire,
    );

    let wealth_gap = projected - required;
    let status = if wealth_gap >= 0.0 {
        RetirementStatus::OnTrack
    } else {
        RetirementStatus::AtRisk
    };
    let shortfall = (required - projected).max(0.0);
    let extra_monthly_needed = if shortfall > 0.0 {
        solve_extra_monthly(inputs, required, SolveConfig::default())
    } else {
        0.0
    };

    RetirementAssessment {
        years_to_retire,
        years_in_retirement,
        required_corpus: required,
        projected_at_retirement: projected,
        wealth_gap,
        status,
        shortfall,
        extra_monthly_needed,
        projection: project_corpus(inputs),
    }
}
