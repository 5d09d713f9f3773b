use super::types::{SipPoint, SipSummary};

/// Monthly compounding of a fixed contribution, sampled at each year end.
///
/// Terms that never reach a full year still produce one sample at the final
/// month.
pub fn sip_series(monthly: f64, annual_rate_pct: f64, years: f64) -> Vec<SipPoint> {
    let rate = annual_rate_pct / 100.0 / 12.0;
    let months = (years * 12.0).round().max(0.0) as u32;

    let mut series = Vec::with_capacity((months / 12) as usize + 1);
    let mut value = 0.0;
    for month in 1..=months {
        value = value * (1.0 + rate) + monthly;
        if month % 12 == 0 {
            series.push(SipPoint { month, value });
        }
    }
    if series.is_empty() && months > 0 {
        series.push(SipPoint {
            month: months,
            value,
        });
    }
    series
}

/// Deflates every point by inflation compounded to that point's month, so the
/// result pairs one-to-one with `series`.
pub fn real_series(series: &[SipPoint], inflation_pct: f64) -> Vec<SipPoint> {
    let base = 1.0 + inflation_pct / 100.0;
    series
        .iter()
        .map(|p| SipPoint {
            month: p.month,
            value: p.value / base.powf(p.month as f64 / 12.0),
        })
        .collect()
}

pub fn sip_summary(
    monthly: f64,
    annual_rate_pct: f64,
    years: f64,
    inflation_pct: f64,
) -> SipSummary {
    let series = sip_series(monthly, annual_rate_pct, years);
    let real = real_series(&series, inflation_pct);
    let months = (years * 12.0).round().max(0.0);

    let invested = monthly * months;
    let final_nominal = series.last().map_or(0.0, |p| p.value);
    let final_real = final_nominal / (1.0 + inflation_pct / 100.0).powf(years);

    SipSummary {
        invested,
        final_nominal,
        final_real,
        estimated_gains: final_nominal - invested,
        series,
        real_series: real,
    }
}
