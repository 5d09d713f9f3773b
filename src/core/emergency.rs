use super::types::{CoverageZone, EmergencyFundInputs, EmergencyFundResult};

const DANGER_BELOW_MONTHS: f64 = 3.0;
const SAFE_FROM_MONTHS: f64 = 6.0;

pub fn emergency_fund(inputs: &EmergencyFundInputs) -> EmergencyFundResult {
    let months = inputs.target_months as f64;
    let survival_target = inputs.essential_monthly * months;
    let comfort_target = (inputs.essential_monthly + inputs.lifestyle_monthly) * months;

    let months_covered = if inputs.essential_monthly > 0.0 {
        inputs.savings / inputs.essential_monthly
    } else {
        0.0
    };

    let zone = if months_covered < DANGER_BELOW_MONTHS {
        CoverageZone::Danger
    } else if months_covered >= SAFE_FROM_MONTHS {
        CoverageZone::Safe
    } else {
        CoverageZone::Caution
    };

    EmergencyFundResult {
        survival_target,
        comfort_target,
        months_covered,
        percent_of_target_months: capped_percent(months_covered, months),
        percent_of_survival: capped_percent(inputs.savings, survival_target),
        percent_of_comfort: capped_percent(inputs.savings, comfort_target),
        zone,
    }
}

fn capped_percent(part: f64, whole: f64) -> u32 {
    if whole <= 0.0 {
        return 0;
    }
    (part / whole * 100.0).round().clamp(0.0, 100.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(essential: f64, lifestyle: f64, savings: f64, months: u32) -> EmergencyFundInputs {
        EmergencyFundInputs {
            essential_monthly: essential,
            lifestyle_monthly: lifestyle,
            savings,
            target_months: months,
        }
    }

    #[test]
    fn default_household_is_in_danger_zone() {
        // 30,000 essentials, 4,300 lifestyle, 50,000 saved, six month goal.
        let result = emergency_fund(&inputs(30_000.0, 4_300.0, 50_000.0, 6));
        assert_eq!(result.survival_target, 180_000.0);
        assert_eq!(result.comfort_target, 205_800.0);
        assert!((result.months_covered - 5.0 / 3.0).abs() < 1e-12);
        assert_eq!(result.percent_of_target_months, 28);
        assert_eq!(result.percent_of_survival, 28);
        assert_eq!(result.percent_of_comfort, 24);
        assert_eq!(result.zone, CoverageZone::Danger);
    }

    #[test]
    fn zone_boundaries() {
        assert_eq!(emergency_fund(&inputs(1_000.0, 0.0, 2_999.0, 6)).zone, CoverageZone::Danger);
        assert_eq!(emergency_fund(&inputs(1_000.0, 0.0, 3_000.0, 6)).zone, CoverageZone::Caution);
        assert_eq!(emergency_fund(&inputs(1_000.0, 0.0, 5_999.0, 6)).zone, CoverageZone::Caution);
        assert_eq!(emergency_fund(&inputs(1_000.0, 0.0, 6_000.0, 6)).zone, CoverageZone::Safe);
    }

    #[test]
    fn percentages_cap_at_one_hundred() {
        let result = emergency_fund(&inputs(1_000.0, 500.0, 100_000.0, 6));
        assert_eq!(result.percent_of_target_months, 100);
        assert_eq!(result.percent_of_survival, 100);
        assert_eq!(result.percent_of_comfort, 100);
    }

    #[test]
    fn zero_denominators_report_zero() {
        let result = emergency_fund(&inputs(0.0, 0.0, 10_000.0, 0));
        assert_eq!(result.months_covered, 0.0);
        assert_eq!(result.percent_of_target_months, 0);
        assert_eq!(result.percent_of_survival, 0);
        assert_eq!(result.percent_of_comfort, 0);
        assert_eq!(result.zone, CoverageZone::Danger);
    }
}
