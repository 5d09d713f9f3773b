use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::api::{self, AppState};
use crate::core::{
    CoreError, DEFAULT_TASK_COUNT, Deductions, EmergencyFundInputs, EmergencyFundResult,
    FileTaskStore, LearningModule, LoanSummary, MemoryTaskStore, RankProgress,
    RetirementAssessment, RetirementInputs, Rng, SipSummary, TaskStore, TaxComparison, TaxRules,
    WeeklyTask, assess_retirement, builtin_catalog, compare_regimes, emergency_fund,
    generate_weekly_tasks, load_catalog, loan_summary, rank_for_xp, sanitize, sip_summary,
};

pub const DEFAULT_GROSS_INCOME: f64 = 1_200_000.0;
pub const DEFAULT_SEC80C: f64 = 150_000.0;
pub const DEFAULT_SEC80D: f64 = 5_000.0;

pub const DEFAULT_SIP_MONTHLY: f64 = 5_000.0;
pub const DEFAULT_SIP_RATE: f64 = 12.0;
pub const DEFAULT_SIP_YEARS: f64 = 10.0;
pub const DEFAULT_SIP_INFLATION: f64 = 6.0;

pub const DEFAULT_LOAN_PRINCIPAL: f64 = 1_000_000.0;
pub const DEFAULT_LOAN_RATE: f64 = 7.5;
pub const DEFAULT_LOAN_MONTHS: u32 = 120;

pub const DEFAULT_ESSENTIAL_MONTHLY: f64 = 30_000.0;
pub const DEFAULT_LIFESTYLE_MONTHLY: f64 = 4_300.0;
pub const DEFAULT_EMERGENCY_SAVINGS: f64 = 50_000.0;
pub const DEFAULT_TARGET_MONTHS: u32 = 6;

pub const MAX_AGE: u32 = 120;
pub const MAX_LOAN_MONTHS: u32 = 1_200;
pub const MAX_SIP_YEARS: f64 = 100.0;
pub const MAX_TARGET_MONTHS: u32 = 1_200;
pub const MAX_RATE_PCT: f64 = 100.0;
pub const MAX_AMOUNT: f64 = 1e12;

#[derive(Parser, Debug)]
#[command(
    name = "finquest",
    about = "Personal-finance calculators (Indian income tax, SIP, EMI, retirement) \
             and weekly learning tasks"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP API.
    Serve(ServeArgs),
    /// Compare old and new regime income tax.
    Tax(TaxArgs),
    /// Project a monthly SIP.
    Sip(SipArgs),
    /// Loan EMI with amortization schedule.
    Emi(EmiArgs),
    /// Retirement corpus sufficiency.
    Retirement(RetirementArgs),
    /// Emergency fund coverage.
    Emergency(EmergencyArgs),
    /// Generate a weekly task list.
    Tasks(TasksArgs),
    /// XP rank and progress to the next rank.
    Rank(RankArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long, env = "FINQUEST_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,
    #[arg(long, env = "FINQUEST_PORT", default_value_t = 8080)]
    pub port: u16,
    #[arg(
        long,
        env = "FINQUEST_DATA_DIR",
        help = "Directory for persisted weekly batches; in-memory when omitted"
    )]
    pub data_dir: Option<PathBuf>,
    #[arg(
        long,
        env = "FINQUEST_TASK_COUNT",
        default_value_t = DEFAULT_TASK_COUNT as i64,
        allow_negative_numbers = true
    )]
    pub task_count: i64,
    #[arg(long, help = "Learning-module catalog JSON; built-in catalog when omitted")]
    pub catalog: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct TaxArgs {
    #[arg(long, default_value_t = DEFAULT_GROSS_INCOME, allow_negative_numbers = true)]
    pub gross: f64,
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub hra: f64,
    #[arg(long, default_value_t = DEFAULT_SEC80C, allow_negative_numbers = true)]
    pub sec80c: f64,
    #[arg(long, default_value_t = DEFAULT_SEC80D, allow_negative_numbers = true)]
    pub sec80d: f64,
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub other: f64,
    #[arg(long, help = "Override the standard deduction applied in both regimes")]
    pub standard_deduction: Option<f64>,
}

impl Default for TaxArgs {
    fn default() -> Self {
        Self {
            gross: DEFAULT_GROSS_INCOME,
            hra: 0.0,
            sec80c: DEFAULT_SEC80C,
            sec80d: DEFAULT_SEC80D,
            other: 0.0,
            standard_deduction: None,
        }
    }
}

impl TaxArgs {
    pub fn deductions(&self) -> Result<Deductions, String> {
        Ok(Deductions {
            hra: checked_amount("hra", self.hra)?,
            sec80c: checked_amount("sec80c", self.sec80c)?,
            sec80d: checked_amount("sec80d", self.sec80d)?,
            other: checked_amount("other", self.other)?,
        })
    }

    pub fn rules(&self) -> Result<TaxRules, String> {
        let mut rules = TaxRules::default();
        if let Some(v) = self.standard_deduction {
            let v = checked_amount("standard-deduction", v)?;
            rules.standard_deduction_old = v;
            rules.standard_deduction_new = v;
        }
        Ok(rules)
    }

    pub fn run(&self) -> Result<TaxComparison, String> {
        let gross = checked_amount("gross", self.gross)?;
        Ok(compare_regimes(gross, &self.deductions()?, &self.rules()?))
    }
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct SipArgs {
    #[arg(long, default_value_t = DEFAULT_SIP_MONTHLY, allow_negative_numbers = true)]
    pub monthly: f64,
    #[arg(long, default_value_t = DEFAULT_SIP_RATE, help = "Expected annual return in percent")]
    pub rate: f64,
    #[arg(long, default_value_t = DEFAULT_SIP_YEARS)]
    pub years: f64,
    #[arg(long, default_value_t = DEFAULT_SIP_INFLATION, help = "Annual inflation in percent")]
    pub inflation: f64,
}

impl Default for SipArgs {
    fn default() -> Self {
        Self {
            monthly: DEFAULT_SIP_MONTHLY,
            rate: DEFAULT_SIP_RATE,
            years: DEFAULT_SIP_YEARS,
            inflation: DEFAULT_SIP_INFLATION,
        }
    }
}

impl SipArgs {
    pub fn run(&self) -> Result<SipSummary, String> {
        let years = sanitize::amount(self.years);
        if years > MAX_SIP_YEARS {
            return Err(format!("--years must be <= {MAX_SIP_YEARS}"));
        }
        Ok(sip_summary(
            checked_amount("monthly", self.monthly)?,
            checked_rate("rate", self.rate)?,
            years,
            checked_rate("inflation", self.inflation)?,
        ))
    }
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct EmiArgs {
    #[arg(long, default_value_t = DEFAULT_LOAN_PRINCIPAL)]
    pub principal: f64,
    #[arg(long, default_value_t = DEFAULT_LOAN_RATE, help = "Annual interest rate in percent")]
    pub rate: f64,
    #[arg(long, default_value_t = DEFAULT_LOAN_MONTHS)]
    pub months: u32,
}

impl Default for EmiArgs {
    fn default() -> Self {
        Self {
            principal: DEFAULT_LOAN_PRINCIPAL,
            rate: DEFAULT_LOAN_RATE,
            months: DEFAULT_LOAN_MONTHS,
        }
    }
}

impl EmiArgs {
    pub fn run(&self) -> Result<LoanSummary, String> {
        Ok(loan_summary(
            checked_amount("principal", self.principal)?,
            checked_rate("rate", self.rate)?,
            checked_at_most("months", self.months, MAX_LOAN_MONTHS)?,
        ))
    }
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct RetirementArgs {
    #[arg(long, default_value_t = 35)]
    pub current_age: u32,
    #[arg(long, default_value_t = 60)]
    pub retirement_age: u32,
    #[arg(long, default_value_t = 85)]
    pub life_expectancy: u32,
    #[arg(long, default_value_t = 40_000.0)]
    pub monthly_expenses: f64,
    #[arg(long, default_value_t = 2_000_000.0)]
    pub existing_corpus: f64,
    #[arg(long, default_value_t = 10_000.0)]
    pub monthly_savings: f64,
    #[arg(long, default_value_t = 8.0, help = "Expected annual return in percent")]
    pub expected_return: f64,
    #[arg(long, default_value_t = 5.0, help = "Annual inflation in percent")]
    pub inflation: f64,
}

impl Default for RetirementArgs {
    fn default() -> Self {
        Self {
            current_age: 35,
            retirement_age: 60,
            life_expectancy: 85,
            monthly_expenses: 40_000.0,
            existing_corpus: 2_000_000.0,
            monthly_savings: 10_000.0,
            expected_return: 8.0,
            inflation: 5.0,
        }
    }
}

impl RetirementArgs {
    /// Ages out of order are accepted; the model clamps those spans to zero.
    pub fn build_inputs(&self) -> Result<RetirementInputs, String> {
        Ok(RetirementInputs {
            current_age: checked_at_most("current-age", self.current_age, MAX_AGE)?,
            retirement_age: checked_at_most("retirement-age", self.retirement_age, MAX_AGE)?,
            life_expectancy: checked_at_most("life-expectancy", self.life_expectancy, MAX_AGE)?,
            monthly_expenses: checked_amount("monthly-expenses", self.monthly_expenses)?,
            existing_corpus: checked_amount("existing-corpus", self.existing_corpus)?,
            monthly_savings: checked_amount("monthly-savings", self.monthly_savings)?,
            expected_return: checked_rate("expected-return", self.expected_return)?,
            inflation: checked_rate("inflation", self.inflation)?,
        })
    }

    pub fn run(&self) -> Result<RetirementAssessment, String> {
        Ok(assess_retirement(&self.build_inputs()?))
    }
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct EmergencyArgs {
    #[arg(long, default_value_t = DEFAULT_ESSENTIAL_MONTHLY)]
    pub essential_monthly: f64,
    #[arg(long, default_value_t = DEFAULT_LIFESTYLE_MONTHLY)]
    pub lifestyle_monthly: f64,
    #[arg(long, default_value_t = DEFAULT_EMERGENCY_SAVINGS)]
    pub savings: f64,
    #[arg(long, default_value_t = DEFAULT_TARGET_MONTHS)]
    pub target_months: u32,
}

impl Default for EmergencyArgs {
    fn default() -> Self {
        Self {
            essential_monthly: DEFAULT_ESSENTIAL_MONTHLY,
            lifestyle_monthly: DEFAULT_LIFESTYLE_MONTHLY,
            savings: DEFAULT_EMERGENCY_SAVINGS,
            target_months: DEFAULT_TARGET_MONTHS,
        }
    }
}

impl EmergencyArgs {
    pub fn run(&self) -> Result<EmergencyFundResult, String> {
        Ok(emergency_fund(&EmergencyFundInputs {
            essential_monthly: checked_amount("essential-monthly", self.essential_monthly)?,
            lifestyle_monthly: checked_amount("lifestyle-monthly", self.lifestyle_monthly)?,
            savings: checked_amount("savings", self.savings)?,
            target_months: checked_at_most(
                "target-months",
                self.target_months,
                MAX_TARGET_MONTHS,
            )?,
        }))
    }
}

#[derive(Args, Debug, Clone)]
pub struct TasksArgs {
    #[arg(long, default_value_t = DEFAULT_TASK_COUNT as i64, allow_negative_numbers = true)]
    pub count: i64,
    #[arg(long, help = "Seed for a reproducible list; random when omitted")]
    pub seed: Option<u64>,
    #[arg(long, help = "Learning-module catalog JSON; built-in catalog when omitted")]
    pub catalog: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct RankArgs {
    #[arg(long, default_value_t = 0)]
    pub xp: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
    #[error("invalid input: {0}")]
    Invalid(String),
}

/// Coerces like [`sanitize::amount`], then rejects amounts too large to
/// compound without overflowing.
fn checked_amount(flag: &str, value: f64) -> Result<f64, String> {
    let value = sanitize::amount(value);
    if value > MAX_AMOUNT {
        return Err(format!("--{flag} must be <= {MAX_AMOUNT}"));
    }
    Ok(value)
}

fn checked_rate(flag: &str, value: f64) -> Result<f64, String> {
    let value = sanitize::amount(value);
    if value > MAX_RATE_PCT {
        return Err(format!("--{flag} must be <= {MAX_RATE_PCT} percent"));
    }
    Ok(value)
}

fn checked_at_most(flag: &str, value: u32, max: u32) -> Result<u32, String> {
    if value > max {
        return Err(format!("--{flag} must be <= {max}"));
    }
    Ok(value)
}

/// Negative counts mean "no tasks".
pub fn clamp_task_count(count: i64) -> usize {
    usize::try_from(count.max(0)).unwrap_or(usize::MAX)
}

pub fn resolve_catalog(path: Option<&PathBuf>) -> Result<Vec<LearningModule>, CoreError> {
    match path {
        Some(path) => load_catalog(path),
        None => builtin_catalog(),
    }
}

pub fn time_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

impl TasksArgs {
    pub fn run(&self) -> Result<Vec<WeeklyTask>, CoreError> {
        let catalog = resolve_catalog(self.catalog.as_ref())?;
        let mut rng = Rng::new(self.seed.unwrap_or_else(time_seed));
        Ok(generate_weekly_tasks(
            clamp_task_count(self.count),
            &catalog,
            &mut rng,
        ))
    }
}

impl RankArgs {
    pub fn run(&self) -> RankProgress {
        rank_for_xp(self.xp)
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Serve(args) => serve(args).await,
        Command::Tax(args) => print_json(&args.run().map_err(CliError::Invalid)?),
        Command::Sip(args) => print_json(&args.run().map_err(CliError::Invalid)?),
        Command::Emi(args) => print_json(&args.run().map_err(CliError::Invalid)?),
        Command::Retirement(args) => print_json(&args.run().map_err(CliError::Invalid)?),
        Command::Emergency(args) => print_json(&args.run().map_err(CliError::Invalid)?),
        Command::Tasks(args) => print_json(&args.run()?),
        Command::Rank(args) => print_json(&args.run()),
    }
}

async fn serve(args: ServeArgs) -> Result<(), CliError> {
    let catalog = resolve_catalog(args.catalog.as_ref())?;
    let store: Box<dyn TaskStore + Send> = match &args.data_dir {
        Some(dir) => {
            let store = FileTaskStore::open(dir.clone())?;
            tracing::info!("persisting weekly batches under {}", store.dir().display());
            Box::new(store)
        }
        None => {
            tracing::info!("persisting weekly batches in memory");
            Box::new(MemoryTaskStore::new())
        }
    };
    let state = AppState::new(catalog, store, clamp_task_count(args.task_count), time_seed());
    let addr = SocketAddr::new(args.host, args.port);
    api::run_http_server(addr, state).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Regime, RetirementStatus};

    #[test]
    fn parses_tax_flags_onto_defaults() {
        let cli = Cli::parse_from([
            "finquest", "tax", "--gross", "1800000", "--sec80d", "50000", "--hra", "100000",
        ]);
        let Command::Tax(args) = cli.command else {
            panic!("expected tax subcommand");
        };
        assert_eq!(args.sec80c, DEFAULT_SEC80C);
        let result = args.run().expect("valid tax inputs");
        assert_eq!(result.old.taxable_income, 1_425_000.0);
        assert_eq!(result.new.taxable_income, 1_725_000.0);
        assert_eq!(result.recommended, Regime::New);
    }

    #[test]
    fn clap_defaults_match_default_impls() {
        let cli = Cli::parse_from(["finquest", "sip"]);
        let Command::Sip(args) = cli.command else {
            panic!("expected sip subcommand");
        };
        assert_eq!(args, SipArgs::default());

        let cli = Cli::parse_from(["finquest", "retirement"]);
        let Command::Retirement(args) = cli.command else {
            panic!("expected retirement subcommand");
        };
        assert_eq!(args, RetirementArgs::default());

        let cli = Cli::parse_from(["finquest", "emi"]);
        let Command::Emi(args) = cli.command else {
            panic!("expected emi subcommand");
        };
        assert_eq!(args, EmiArgs::default());

        let cli = Cli::parse_from(["finquest", "emergency"]);
        let Command::Emergency(args) = cli.command else {
            panic!("expected emergency subcommand");
        };
        assert_eq!(args, EmergencyArgs::default());

        let cli = Cli::parse_from(["finquest", "tax"]);
        let Command::Tax(args) = cli.command else {
            panic!("expected tax subcommand");
        };
        assert_eq!(args, TaxArgs::default());
    }

    #[test]
    fn negative_amounts_are_coerced_to_zero() {
        let args = TaxArgs {
            gross: -10.0,
            hra: f64::NAN,
            ..TaxArgs::default()
        };
        let result = args.run().expect("valid tax inputs");
        assert_eq!(result.gross_income, 0.0);
        assert_eq!(result.deductions.hra, 0.0);
        assert_eq!(result.old.tax, 0);
        assert_eq!(result.new.tax, 0);
    }

    #[test]
    fn standard_deduction_override_applies_to_both_regimes() {
        let args = TaxArgs {
            gross: 1_000_000.0,
            sec80c: 0.0,
            sec80d: 0.0,
            standard_deduction: Some(0.0),
            ..TaxArgs::default()
        };
        let result = args.run().expect("valid tax inputs");
        assert_eq!(result.old.taxable_income, 1_000_000.0);
        assert_eq!(result.new.taxable_income, 1_000_000.0);
    }

    #[test]
    fn default_retirement_plan_runs() {
        let assessment = RetirementArgs::default().run().expect("default plan is valid");
        assert_eq!(assessment.years_to_retire, 25);
        assert_eq!(assessment.years_in_retirement, 25);
        assert_eq!(assessment.projection.len(), 51);
        if assessment.status == RetirementStatus::AtRisk {
            assert!(assessment.extra_monthly_needed > 0.0);
        }
    }

    #[test]
    fn loan_terms_beyond_a_century_are_rejected() {
        let args = EmiArgs {
            months: 4_000_000_000,
            ..EmiArgs::default()
        };
        let err = args.run().expect_err("months over the cap");
        assert_eq!(err, "--months must be <= 1200");

        let args = EmiArgs {
            months: MAX_LOAN_MONTHS,
            ..EmiArgs::default()
        };
        let summary = args.run().expect("cap itself is allowed");
        assert!(summary.emi.is_finite());
        assert_eq!(summary.schedule.len(), MAX_LOAN_MONTHS as usize);
    }

    #[test]
    fn retirement_ages_above_limit_are_rejected() {
        for args in [
            RetirementArgs {
                life_expectancy: 4_000_000_000,
                ..RetirementArgs::default()
            },
            RetirementArgs {
                current_age: 121,
                ..RetirementArgs::default()
            },
            RetirementArgs {
                retirement_age: u32::MAX,
                ..RetirementArgs::default()
            },
        ] {
            assert!(args.run().is_err(), "accepted {args:?}");
        }
    }

    #[test]
    fn inverted_ages_still_clamp_instead_of_failing() {
        let args = RetirementArgs {
            current_age: 70,
            retirement_age: 60,
            life_expectancy: 50,
            ..RetirementArgs::default()
        };
        let assessment = args.run().expect("inverted ages are clamped");
        assert_eq!(assessment.years_to_retire, 0);
        assert_eq!(assessment.years_in_retirement, 0);
    }

    #[test]
    fn sip_horizon_and_rates_are_bounded() {
        let args = SipArgs {
            years: 1e9,
            ..SipArgs::default()
        };
        assert_eq!(args.run().expect_err("years"), "--years must be <= 100");

        let args = SipArgs {
            rate: 1e6,
            ..SipArgs::default()
        };
        assert!(args.run().is_err());

        let args = EmiArgs {
            rate: 1e6,
            ..EmiArgs::default()
        };
        assert!(args.run().is_err());

        let args = SipArgs {
            years: MAX_SIP_YEARS,
            rate: MAX_RATE_PCT,
            monthly: MAX_AMOUNT,
            ..SipArgs::default()
        };
        let summary = args.run().expect("limits are inclusive");
        assert!(summary.final_nominal.is_finite());
        assert_eq!(summary.series.len(), 100);
    }

    #[test]
    fn oversized_amounts_are_rejected() {
        let args = TaxArgs {
            gross: 1e300,
            ..TaxArgs::default()
        };
        assert!(args.run().is_err());

        let args = EmergencyArgs {
            savings: f64::MAX,
            ..EmergencyArgs::default()
        };
        assert!(args.run().is_err());

        let args = EmergencyArgs {
            target_months: u32::MAX,
            ..EmergencyArgs::default()
        };
        assert!(args.run().is_err());
    }

    #[tokio::test]
    async fn invalid_subcommand_input_surfaces_as_cli_error() {
        let cli = Cli::parse_from(["finquest", "emi", "--months", "4000000000"]);
        let err = run(cli).await.expect_err("months over the cap");
        assert!(matches!(err, CliError::Invalid(_)));
        assert_eq!(err.to_string(), "invalid input: --months must be <= 1200");
    }

    #[test]
    fn task_count_clamps_negative_values() {
        assert_eq!(clamp_task_count(-3), 0);
        assert_eq!(clamp_task_count(0), 0);
        assert_eq!(clamp_task_count(6), 6);

        let cli = Cli::parse_from(["finquest", "tasks", "--count", "-2", "--seed", "1"]);
        let Command::Tasks(args) = cli.command else {
            panic!("expected tasks subcommand");
        };
        assert!(args.run().expect("builtin catalog").is_empty());
    }

    #[test]
    fn seeded_task_lists_repeat() {
        let args = TasksArgs {
            count: 6,
            seed: Some(99),
            catalog: None,
        };
        let first = args.run().expect("generate");
        let second = args.run().expect("generate");
        assert_eq!(first.len(), 6);
        assert_eq!(first, second);
    }

    #[test]
    fn serve_reads_flags() {
        let cli = Cli::parse_from(["finquest", "serve", "--port", "9000", "--task-count", "4"]);
        let Command::Serve(args) = cli.command else {
            panic!("expected serve subcommand");
        };
        assert_eq!(args.port, 9000);
        assert_eq!(clamp_task_count(args.task_count), 4);
        assert!(args.data_dir.is_none());
    }
}
