mod catalog;
mod emergency;
mod error;
mod loan;
mod random;
mod rank;
mod retirement;
pub mod sanitize;
mod sip;
mod solver;
mod store;
mod tasks;
mod tax;
mod types;

pub use catalog::{builtin_catalog, load_catalog, parse_catalog};
pub use emergency::emergency_fund;
pub use error::CoreError;
pub use loan::{amortization_schedule, calculate_emi, loan_summary, schedule_totals};
pub use random::{RandomSource, Rng, derive_seed};
pub use rank::{module_completion_xp, rank_for_xp};
pub use retirement::{accumulate, assess_retirement, project_corpus, required_corpus};
pub use sip::{real_series, sip_series, sip_summary};
pub use solver::{SolveConfig, solve_extra_monthly};
pub use store::{FileTaskStore, MemoryTaskStore, TaskStore};
pub use tasks::{
    ClaimReceipt, DEFAULT_TASK_COUNT, WEEKLY_BATCH_TITLE, batch_key, claim_all,
    claim_all_persisted, claim_persisted, claim_task, generate_weekly_tasks, load_batch,
    load_or_generate, save_batch, task_xp,
};
pub use tax::{Slab, SlabSet, TaxRules, apply_slabs, calculate_indian_tax, compare_regimes};
pub use types::{
    AmortizationRow, CoverageZone, Deductions, Difficulty, EmergencyFundInputs,
    EmergencyFundResult, LearningModule, LoanSummary, ProjectionPoint, Rank, RankProgress, Regime,
    RegimeResult, RetirementAssessment, RetirementInputs, RetirementStatus, ScheduleTotals,
    SipPoint, SipSummary, TaxComparison, WeeklyBatch, WeeklyTask,
};
