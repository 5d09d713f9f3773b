use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Regime {
    Old,
    New,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Deductions {
    pub hra: f64,
    pub sec80c: f64,
    pub sec80d: f64,
    pub other: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegimeResult {
    pub taxable_income: f64,
    pub tax_before_cess: u64,
    pub rebate: f64,
    pub tax: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxComparison {
    pub gross_income: f64,
    /// Deductions as applied, with 80C already capped.
    pub deductions: Deductions,
    pub old: RegimeResult,
    pub new: RegimeResult,
    pub recommended: Regime,
    pub tax_saved: u64,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SipPoint {
    pub month: u32,
    pub value: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SipSummary {
    pub invested: f64,
    pub final_nominal: f64,
    pub final_real: f64,
    pub estimated_gains: f64,
    pub series: Vec<SipPoint>,
    pub real_series: Vec<SipPoint>,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmortizationRow {
    pub month: u32,
    pub payment: f64,
    pub principal_paid: f64,
    pub interest_paid: f64,
    pub remaining_balance: f64,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleTotals {
    pub total_payment: f64,
    pub total_principal: f64,
    pub total_interest: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanSummary {
    pub emi: f64,
    pub totals: ScheduleTotals,
    pub schedule: Vec<AmortizationRow>,
}

/// Rates are percentages, ages are whole years.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RetirementInputs {
    pub current_age: u32,
    pub retirement_age: u32,
    pub life_expectancy: u32,
    pub monthly_expenses: f64,
    pub existing_corpus: f64,
    pub monthly_savings: f64,
    pub expected_return: f64,
    pub inflation: f64,
}

impl RetirementInputs {
    pub fn years_to_retire(&self) -> u32 {
        self.retirement_age.saturating_sub(self.current_age)
    }

    pub fn years_in_retirement(&self) -> u32 {
        self.life_expectancy.saturating_sub(self.retirement_age)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionPoint {
    pub age: u32,
    pub corpus: f64,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RetirementStatus {
    OnTrack,
    AtRisk,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementAssessment {
    pub years_to_retire: u32,
    pub years_in_retirement: u32,
    pub required_corpus: f64,
    pub projected_at_retirement: f64,
    pub wealth_gap: f64,
    pub status: RetirementStatus,
    pub shortfall: f64,
    pub extra_monthly_needed: f64,
    pub projection: Vec<ProjectionPoint>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Expert,
}

impl Difficulty {
    /// Unrecognised labels rank as beginner.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "expert" => Difficulty::Expert,
            "intermediate" => Difficulty::Intermediate,
            _ => Difficulty::Beginner,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningModule {
    pub id: String,
    pub title: String,
    pub difficulty: String,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub lessons: u32,
    #[serde(default)]
    pub icon: String,
}

impl LearningModule {
    pub fn difficulty(&self) -> Difficulty {
        Difficulty::from_label(&self.difficulty)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyTask {
    pub id: String,
    pub title: String,
    pub xp: u32,
    pub icon: String,
    pub module_id: String,
    pub done: bool,
    pub generated: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyBatch {
    pub week_id: String,
    pub title: String,
    pub tasks: Vec<WeeklyTask>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub enum Rank {
    Novice,
    Apprentice,
    Expert,
    Master,
    Legendary,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankProgress {
    pub xp: u64,
    pub rank: Rank,
    pub min_xp: u64,
    pub next_rank: Option<Rank>,
    pub next_rank_min_xp: Option<u64>,
    pub progress_to_next: f64,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EmergencyFundInputs {
    pub essential_monthly: f64,
    pub lifestyle_monthly: f64,
    pub savings: f64,
    pub target_months: u32,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverageZone {
    Danger,
    Caution,
    Safe,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyFundResult {
    pub survival_target: f64,
    pub comfort_target: f64,
    pub months_covered: f64,
    pub percent_of_target_months: u32,
    pub percent_of_survival: u32,
    pub percent_of_comfort: u32,
    pub zone: CoverageZone,
}
