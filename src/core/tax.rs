use super::error::CoreError;
use super::types::{Deductions, Regime, RegimeResult, TaxComparison};

/// One progressive band. `upto: None` marks the open-ended top band.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Slab {
    pub upto: Option<f64>,
    pub rate: f64,
}

impl Slab {
    pub const fn upto(upto: f64, rate: f64) -> Self {
        Self {
            upto: Some(upto),
            rate,
        }
    }

    pub const fn unbounded(rate: f64) -> Self {
        Self { upto: None, rate }
    }
}

/// Ordered bands partitioning `[0, inf)`.
#[derive(Clone, Debug, PartialEq)]
pub struct SlabSet {
    slabs: Vec<Slab>,
}

impl SlabSet {
    pub fn new(slabs: Vec<Slab>) -> Result<Self, CoreError> {
        if slabs.is_empty() {
            return Err(CoreError::EmptySlabSet);
        }
        let last = slabs.len() - 1;
        let mut lower = 0.0_f64;
        for (index, slab) in slabs.iter().enumerate() {
            if !slab.rate.is_finite() || slab.rate < 0.0 {
                return Err(CoreError::InvalidSlabRate { index });
            }
            match slab.upto {
                Some(upper) => {
                    if index == last {
                        return Err(CoreError::BoundedFinalSlab);
                    }
                    if !upper.is_finite() || upper <= lower {
                        return Err(CoreError::NonIncreasingSlab { index });
                    }
                    lower = upper;
                }
                None if index != last => {
                    return Err(CoreError::UnboundedSlabNotLast { index });
                }
                None => {}
            }
        }
        Ok(Self { slabs })
    }

    /// Old regime, individuals below 60.
    pub fn old_regime() -> Self {
        Self {
            slabs: vec![
                Slab::upto(250_000.0, 0.0),
                Slab::upto(500_000.0, 5.0),
                Slab::upto(1_000_000.0, 20.0),
                Slab::unbounded(30.0),
            ],
        }
    }

    pub fn new_regime() -> Self {
        Self {
            slabs: vec![
                Slab::upto(300_000.0, 0.0),
                Slab::upto(600_000.0, 5.0),
                Slab::upto(900_000.0, 10.0),
                Slab::upto(1_200_000.0, 15.0),
                Slab::upto(1_500_000.0, 20.0),
                Slab::unbounded(30.0),
            ],
        }
    }

    pub fn slabs(&self) -> &[Slab] {
        &self.slabs
    }
}

/// Tax owed on `taxable` under `slabs`, before rebate, cess and rounding.
///
/// An amount sitting exactly on a threshold is taxed entirely in the band
/// that ends there.
pub fn apply_slabs(taxable: f64, slabs: &SlabSet) -> f64 {
    let mut remaining = taxable.max(0.0);
    let mut lower = 0.0_f64;
    let mut tax = 0.0;

    for slab in &slabs.slabs {
        let upper = slab.upto.unwrap_or(f64::INFINITY);
        let band = (upper - lower).min(remaining).max(0.0);
        if band > 0.0 {
            tax += band * (slab.rate / 100.0);
            remaining -= band;
        }
        lower = upper;
        if remaining <= 0.0 {
            break;
        }
    }
    tax
}

/// Parameters of the modeled tax year.
#[derive(Clone, Debug, PartialEq)]
pub struct TaxRules {
    pub standard_deduction_old: f64,
    pub standard_deduction_new: f64,
    pub sec80c_cap: f64,
    pub rebate_income_limit: f64,
    pub rebate_cap: f64,
    pub cess_rate: f64,
    pub old_slabs: SlabSet,
    pub new_slabs: SlabSet,
}

impl Default for TaxRules {
    fn default() -> Self {
        Self {
            standard_deduction_old: 75_000.0,
            standard_deduction_new: 75_000.0,
            sec80c_cap: 150_000.0,
            rebate_income_limit: 500_000.0,
            rebate_cap: 12_500.0,
            cess_rate: 0.04,
            old_slabs: SlabSet::old_regime(),
            new_slabs: SlabSet::new_regime(),
        }
    }
}

pub fn calculate_indian_tax(gross_income: f64, deductions: &Deductions) -> TaxComparison {
    compare_regimes(gross_income, deductions, &TaxRules::default())
}

pub fn compare_regimes(
    gross_income: f64,
    deductions: &Deductions,
    rules: &TaxRules,
) -> TaxComparison {
    let sec80c_allowed = deductions.sec80c.min(rules.sec80c_cap);

    let total_old = (sec80c_allowed
        + deductions.sec80d
        + deductions.hra
        + deductions.other
        + rules.standard_deduction_old)
        .max(0.0);
    // The new regime only admits the standard deduction.
    let total_new = rules.standard_deduction_new.max(0.0);

    let old = regime_tax((gross_income - total_old).max(0.0), &rules.old_slabs, rules);
    let new = regime_tax((gross_income - total_new).max(0.0), &rules.new_slabs, rules);

    let recommended = if old.tax <= new.tax {
        Regime::Old
    } else {
        Regime::New
    };

    TaxComparison {
        gross_income,
        deductions: Deductions {
            sec80c: sec80c_allowed,
            ..*deductions
        },
        old,
        new,
        recommended,
        tax_saved: old.tax.abs_diff(new.tax),
    }
}

/// Flat 87A-style rebate: anyone at or under the limit gets up to
/// `rebate_cap` back. Not graduated; kept as the modeled behavior.
fn regime_tax(taxable_income: f64, slabs: &SlabSet, rules: &TaxRules) -> RegimeResult {
    let before_cess = apply_slabs(taxable_income, slabs);
    let rebate = if taxable_income <= rules.rebate_income_limit {
        before_cess.min(rules.rebate_cap)
    } else {
        0.0
    };
    let after_rebate = (before_cess - rebate).max(0.0);

    RegimeResult {
        taxable_income,
        tax_before_cess: round_currency(before_cess),
        rebate,
        tax: round_currency(after_rebate * (1.0 + rules.cess_rate)),
    }
}

fn round_currency(value: f64) -> u64 {
    value.max(0.0).round() as u64
}
