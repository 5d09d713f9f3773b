use finquest::core::{
    Deductions, FileTaskStore, MemoryTaskStore, Regime, RetirementInputs, RetirementStatus, Rng,
    SolveConfig, accumulate, assess_retirement, builtin_catalog, calculate_indian_tax,
    claim_all_persisted, claim_persisted, load_batch, load_or_generate, project_corpus,
    required_corpus, sip_summary, solve_extra_monthly,
};

#[test]
fn high_income_household_prefers_new_regime() {
    let deductions = Deductions {
        hra: 100_000.0,
        sec80c: 150_000.0,
        sec80d: 50_000.0,
        other: 0.0,
    };
    let result = calculate_indian_tax(1_800_000.0, &deductions);

    assert_eq!(result.old.taxable_income, 1_425_000.0);
    assert_eq!(result.new.taxable_income, 1_725_000.0);
    assert_eq!(result.old.tax, 249_600);
    assert_eq!(result.new.tax, 226_200);
    assert_eq!(result.recommended, Regime::New);
    assert_eq!(result.tax_saved, 23_400);
}

#[test]
fn sip_of_five_thousand_for_ten_years() {
    let summary = sip_summary(5_000.0, 12.0, 10.0, 6.0);
    assert_eq!(summary.series.len(), 10);
    assert_eq!(summary.real_series.len(), 10);
    assert!(summary.series.windows(2).all(|w| w[1].value >= w[0].value));
    assert!(summary.final_nominal > 600_000.0);
    assert_eq!(summary.invested, 600_000.0);
    assert!(summary.final_real < summary.final_nominal);
}

#[test]
fn retirement_projection_and_target_are_separate_models() {
    let inputs = RetirementInputs {
        current_age: 35,
        retirement_age: 60,
        life_expectancy: 85,
        monthly_expenses: 40_000.0,
        existing_corpus: 2_000_000.0,
        monthly_savings: 10_000.0,
        expected_return: 8.0,
        inflation: 5.0,
    };
    let assessment = assess_retirement(&inputs);
    let projection = project_corpus(&inputs);

    let at_retirement = projection
        .iter()
        .find(|p| p.age == 60)
        .map(|p| p.corpus)
        .expect("retirement age in projection");
    assert_eq!(at_retirement, assessment.projected_at_retirement);
    assert_eq!(
        assessment.required_corpus,
        required_corpus(40_000.0, 25, 25, 8.0, 5.0)
    );

    if assessment.status == RetirementStatus::AtRisk {
        let extra =
            solve_extra_monthly(&inputs, assessment.required_corpus, SolveConfig::default());
        assert_eq!(extra, assessment.extra_monthly_needed);
        let topped_up = accumulate(
            inputs.existing_corpus,
            inputs.monthly_savings + extra,
            inputs.expected_return,
            25,
        );
        assert!(topped_up >= assessment.required_corpus);
    }
}

#[test]
fn weekly_batch_lifecycle_in_memory() {
    let catalog = builtin_catalog().expect("builtin catalog parses");
    let mut store = MemoryTaskStore::new();
    let mut rng = Rng::new(2024);

    let batch = load_or_generate(&mut store, "gen-1700000000000", 6, &catalog, &mut rng)
        .expect("generate batch");
    assert_eq!(batch.tasks.len(), 6);
    assert!(batch.tasks.iter().all(|t| !t.done && t.generated));

    let first = batch.tasks[0].id.clone();
    let (after_one, receipt) =
        claim_persisted(&mut store, "gen-1700000000000", &first).expect("claim one");
    assert_eq!(receipt.claimed, 1);
    assert_eq!(receipt.xp_awarded, batch.tasks[0].xp);
    assert_eq!(after_one.tasks.iter().filter(|t| t.done).count(), 1);

    let (after_all, receipt) =
        claim_all_persisted(&mut store, "gen-1700000000000").expect("claim all");
    assert_eq!(receipt.claimed, 5);
    assert_eq!(after_all.tasks.len(), 6);
    assert!(after_all.tasks.iter().all(|t| t.done));

    // A persisted batch with tasks is never regenerated.
    let mut other_rng = Rng::new(7);
    let reloaded = load_or_generate(&mut store, "gen-1700000000000", 6, &catalog, &mut other_rng)
        .expect("reload batch");
    assert_eq!(reloaded, after_all);
}

#[test]
fn weekly_batch_survives_reopening_file_store() {
    let dir = tempfile::tempdir().expect("temp dir");
    let catalog = builtin_catalog().expect("builtin catalog parses");

    let generated = {
        let mut store = FileTaskStore::open(dir.path()).expect("open store");
        let mut rng = Rng::new(5);
        load_or_generate(&mut store, "gen-42", 3, &catalog, &mut rng).expect("generate batch")
    };

    let store = FileTaskStore::open(dir.path()).expect("reopen store");
    let loaded = load_batch(&store, "gen-42")
        .expect("read batch")
        .expect("batch present");
    assert_eq!(loaded, generated);
    assert_eq!(loaded.title, "Weekly Plan");
}
