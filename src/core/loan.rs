use super::types::{AmortizationRow, LoanSummary, ScheduleTotals};

pub fn calculate_emi(principal: f64, annual_rate_pct: f64, months: u32) -> f64 {
    if principal == 0.0 || months == 0 {
        return 0.0;
    }
    let rate = annual_rate_pct / 12.0 / 100.0;
    if rate == 0.0 {
        return principal / months as f64;
    }
    let growth = (1.0 + rate).powf(f64::from(months));
    if !growth.is_finite() {
        // (1+r)^n / ((1+r)^n - 1) tends to 1 as the term grows.
        return principal * rate;
    }
    principal * rate * growth / (growth - 1.0)
}

pub fn amortization_schedule(
    principal: f64,
    annual_rate_pct: f64,
    months: u32,
) -> Vec<AmortizationRow> {
    if principal == 0.0 || months == 0 {
        return Vec::new();
    }
    let rate = annual_rate_pct / 12.0 / 100.0;
    let emi = calculate_emi(principal, annual_rate_pct, months);

    let mut balance = principal;
    let mut schedule = Vec::with_capacity(months as usize);
    for month in 1..=months {
        let interest = if rate == 0.0 { 0.0 } else { balance * rate };
        let principal_paid = emi - interest;
        balance = (balance - principal_paid).max(0.0);
        schedule.push(AmortizationRow {
            month,
            payment: emi,
            principal_paid: round_cents(principal_paid),
            interest_paid: round_cents(interest),
            remaining_balance: round_cents(balance),
        });
    }
    schedule
}

pub fn schedule_totals(schedule: &[AmortizationRow]) -> ScheduleTotals {
    schedule
        .iter()
        .fold(ScheduleTotals::default(), |mut acc, row| {
            acc.total_payment += row.payment;
            acc.total_principal += row.principal_paid;
            acc.total_interest += row.interest_paid;
            acc
        })
}

pub fn loan_summary(principal: f64, annual_rate_pct: f64, months: u32) -> LoanSummary {
    let schedule = amortization_schedule(principal, annual_rate_pct, months);
    LoanSummary {
        emi: calculate_emi(principal, annual_rate_pct, months),
        totals: schedule_totals(&schedule),
        schedule,
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
