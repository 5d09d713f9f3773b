use axum::{
    Router,
    extract::{
        Json, Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use crate::cli::{
    EmergencyArgs, EmiArgs, RankArgs, RetirementArgs, SipArgs, TaxArgs, clamp_task_count,
};
use crate::core::{
    ClaimReceipt, CoreError, LearningModule, Rng, TaskStore, WeeklyBatch, claim_all_persisted,
    claim_persisted, derive_seed, load_or_generate, module_completion_xp, task_xp,
};

type SharedStore = Arc<Mutex<Box<dyn TaskStore + Send>>>;

#[derive(Clone)]
pub struct AppState {
    catalog: Arc<Vec<LearningModule>>,
    store: SharedStore,
    task_count: usize,
    base_seed: u64,
    draws: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(
        catalog: Vec<LearningModule>,
        store: Box<dyn TaskStore + Send>,
        task_count: usize,
        base_seed: u64,
    ) -> Self {
        Self {
            catalog: Arc::new(catalog),
            store: Arc::new(Mutex::new(store)),
            task_count,
            base_seed,
            draws: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Fresh generator per request; every request gets a distinct stream.
    fn next_rng(&self) -> Rng {
        let draw = self.draws.fetch_add(1, Ordering::Relaxed);
        Rng::new(derive_seed(self.base_seed, draw))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct TaxPayload {
    gross_income: Option<f64>,
    hra: Option<f64>,
    sec80c: Option<f64>,
    sec80d: Option<f64>,
    other: Option<f64>,
    standard_deduction: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SipPayload {
    monthly: Option<f64>,
    rate: Option<f64>,
    years: Option<f64>,
    inflation: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct EmiPayload {
    principal: Option<f64>,
    rate: Option<f64>,
    months: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RetirementPayload {
    current_age: Option<u32>,
    retirement_age: Option<u32>,
    life_expectancy: Option<u32>,
    monthly_expenses: Option<f64>,
    existing_corpus: Option<f64>,
    monthly_savings: Option<f64>,
    expected_return: Option<f64>,
    inflation: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct EmergencyPayload {
    essential_monthly: Option<f64>,
    lifestyle_monthly: Option<f64>,
    savings: Option<f64>,
    target_months: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RankQuery {
    xp: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct WeeklyQuery {
    week_id: Option<String>,
    count: Option<i64>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ModuleView<'a> {
    #[serde(flatten)]
    module: &'a LearningModule,
    completion_xp: u32,
    task_xp: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClaimResponse {
    batch: WeeklyBatch,
    #[serde(flatten)]
    receipt: ClaimReceipt,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/tax", get(tax_get_handler).post(tax_post_handler))
        .route("/api/sip", get(sip_get_handler).post(sip_post_handler))
        .route("/api/emi", get(emi_get_handler).post(emi_post_handler))
        .route(
            "/api/retirement",
            get(retirement_get_handler).post(retirement_post_handler),
        )
        .route(
            "/api/emergency-fund",
            get(emergency_get_handler).post(emergency_post_handler),
        )
        .route("/api/rank", get(rank_handler))
        .route("/api/modules", get(modules_handler))
        .route("/api/tasks/weekly", get(weekly_tasks_handler))
        .route(
            "/api/tasks/weekly/:week_id/claim/:task_id",
            post(claim_task_handler),
        )
        .route(
            "/api/tasks/weekly/:week_id/claim-all",
            post(claim_all_handler),
        )
        .fallback(not_found_handler)
        .with_state(state)
}

pub async fn run_http_server(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let app = router(state);
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("finquest HTTP API listening on http://{addr}");

    axum::serve(listener, app).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn tax_get_handler(payload: Result<Query<TaxPayload>, QueryRejection>) -> Response {
    match payload {
        Ok(Query(payload)) => tax_response(payload),
        Err(rejection) => error_response(StatusCode::BAD_REQUEST, &rejection.body_text()),
    }
}

async fn tax_post_handler(payload: Result<Json<TaxPayload>, JsonRejection>) -> Response {
    match payload {
        Ok(Json(payload)) => tax_response(payload),
        Err(rejection) => error_response(StatusCode::BAD_REQUEST, &rejection.body_text()),
    }
}

fn tax_response(payload: TaxPayload) -> Response {
    let args = tax_args_from_payload(payload);
    tracing::debug!(gross = args.gross, "tax comparison");
    calculation_response(args.run())
}

async fn sip_get_handler(payload: Result<Query<SipPayload>, QueryRejection>) -> Response {
    match payload {
        Ok(Query(payload)) => sip_response(payload),
        Err(rejection) => error_response(StatusCode::BAD_REQUEST, &rejection.body_text()),
    }
}

async fn sip_post_handler(payload: Result<Json<SipPayload>, JsonRejection>) -> Response {
    match payload {
        Ok(Json(payload)) => sip_response(payload),
        Err(rejection) => error_response(StatusCode::BAD_REQUEST, &rejection.body_text()),
    }
}

fn sip_response(payload: SipPayload) -> Response {
    let args = sip_args_from_payload(payload);
    tracing::debug!(monthly = args.monthly, years = args.years, "sip projection");
    calculation_response(args.run())
}

async fn emi_get_handler(payload: Result<Query<EmiPayload>, QueryRejection>) -> Response {
    match payload {
        Ok(Query(payload)) => emi_response(payload),
        Err(rejection) => error_response(StatusCode::BAD_REQUEST, &rejection.body_text()),
    }
}

async fn emi_post_handler(payload: Result<Json<EmiPayload>, JsonRejection>) -> Response {
    match payload {
        Ok(Json(payload)) => emi_response(payload),
        Err(rejection) => error_response(StatusCode::BAD_REQUEST, &rejection.body_text()),
    }
}

fn emi_response(payload: EmiPayload) -> Response {
    let args = emi_args_from_payload(payload);
    tracing::debug!(principal = args.principal, months = args.months, "loan schedule");
    calculation_response(args.run())
}

async fn retirement_get_handler(
    payload: Result<Query<RetirementPayload>, QueryRejection>,
) -> Response {
    match payload {
        Ok(Query(payload)) => retirement_response(payload),
        Err(rejection) => error_response(StatusCode::BAD_REQUEST, &rejection.body_text()),
    }
}

async fn retirement_post_handler(
    payload: Result<Json<RetirementPayload>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(payload)) => retirement_response(payload),
        Err(rejection) => error_response(StatusCode::BAD_REQUEST, &rejection.body_text()),
    }
}

fn retirement_response(payload: RetirementPayload) -> Response {
    let args = retirement_args_from_payload(payload);
    tracing::debug!(
        current_age = args.current_age,
        retirement_age = args.retirement_age,
        "retirement assessment"
    );
    calculation_response(args.run())
}

async fn emergency_get_handler(
    payload: Result<Query<EmergencyPayload>, QueryRejection>,
) -> Response {
    match payload {
        Ok(Query(payload)) => emergency_response(payload),
        Err(rejection) => error_response(StatusCode::BAD_REQUEST, &rejection.body_text()),
    }
}

async fn emergency_post_handler(
    payload: Result<Json<EmergencyPayload>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(payload)) => emergency_response(payload),
        Err(rejection) => error_response(StatusCode::BAD_REQUEST, &rejection.body_text()),
    }
}

fn emergency_response(payload: EmergencyPayload) -> Response {
    let args = emergency_args_from_payload(payload);
    tracing::debug!(target_months = args.target_months, "emergency fund coverage");
    calculation_response(args.run())
}

async fn rank_handler(query: Result<Query<RankQuery>, QueryRejection>) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => {
            return error_response(StatusCode::BAD_REQUEST, &rejection.body_text());
        }
    };
    let args = RankArgs {
        xp: query.xp.unwrap_or(0),
    };
    json_response(StatusCode::OK, args.run())
}

async fn modules_handler(State(state): State<AppState>) -> Response {
    let modules: Vec<ModuleView<'_>> = state
        .catalog
        .iter()
        .map(|module| ModuleView {
            module,
            completion_xp: module_completion_xp(module.difficulty()),
            task_xp: task_xp(module.difficulty()),
        })
        .collect();
    json_response(StatusCode::OK, modules)
}

async fn weekly_tasks_handler(
    State(state): State<AppState>,
    query: Result<Query<WeeklyQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => {
            return error_response(StatusCode::BAD_REQUEST, &rejection.body_text());
        }
    };
    let week_id = match query.week_id {
        Some(id) if !id.trim().is_empty() => id,
        _ => new_week_id(),
    };
    let count = query
        .count
        .map(clamp_task_count)
        .unwrap_or(state.task_count);

    let mut rng = state.next_rng();
    let mut store = state.store.lock().await;
    match load_or_generate(&mut **store, &week_id, count, &state.catalog, &mut rng) {
        Ok(batch) => {
            tracing::debug!(week_id = %batch.week_id, tasks = batch.tasks.len(), "weekly batch");
            json_response(StatusCode::OK, batch)
        }
        Err(err) => core_error_response(&err),
    }
}

async fn claim_task_handler(
    State(state): State<AppState>,
    Path((week_id, task_id)): Path<(String, String)>,
) -> Response {
    let mut store = state.store.lock().await;
    match claim_persisted(&mut **store, &week_id, &task_id) {
        Ok((batch, receipt)) => {
            tracing::info!(%week_id, %task_id, xp = receipt.xp_awarded, "task claimed");
            json_response(StatusCode::OK, ClaimResponse { batch, receipt })
        }
        Err(err) => core_error_response(&err),
    }
}

async fn claim_all_handler(
    State(state): State<AppState>,
    Path(week_id): Path<String>,
) -> Response {
    let mut store = state.store.lock().await;
    match claim_all_persisted(&mut **store, &week_id) {
        Ok((batch, receipt)) => {
            tracing::info!(
                %week_id,
                claimed = receipt.claimed,
                xp = receipt.xp_awarded,
                "batch claimed"
            );
            json_response(StatusCode::OK, ClaimResponse { batch, receipt })
        }
        Err(err) => core_error_response(&err),
    }
}

fn new_week_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    format!("gen-{millis}")
}

fn tax_args_from_payload(payload: TaxPayload) -> TaxArgs {
    let mut args = TaxArgs::default();
    if let Some(v) = payload.gross_income {
        args.gross = v;
    }
    if let Some(v) = payload.hra {
        args.hra = v;
    }
    if let Some(v) = payload.sec80c {
        args.sec80c = v;
    }
    if let Some(v) = payload.sec80d {
        args.sec80d = v;
    }
    if let Some(v) = payload.other {
        args.other = v;
    }
    if payload.standard_deduction.is_some() {
        args.standard_deduction = payload.standard_deduction;
    }
    args
}

fn sip_args_from_payload(payload: SipPayload) -> SipArgs {
    let mut args = SipArgs::default();
    if let Some(v) = payload.monthly {
        args.monthly = v;
    }
    if let Some(v) = payload.rate {
        args.rate = v;
    }
    if let Some(v) = payload.years {
        args.years = v;
    }
    if let Some(v) = payload.inflation {
        args.inflation = v;
    }
    args
}

fn emi_args_from_payload(payload: EmiPayload) -> EmiArgs {
    let mut args = EmiArgs::default();
    if let Some(v) = payload.principal {
        args.principal = v;
    }
    if let Some(v) = payload.rate {
        args.rate = v;
    }
    if let Some(v) = payload.months {
        args.months = v;
    }
    args
}

fn retirement_args_from_payload(payload: RetirementPayload) -> RetirementArgs {
    let mut args = RetirementArgs::default();
    if let Some(v) = payload.current_age {
        args.current_age = v;
    }
    if let Some(v) = payload.retirement_age {
        args.retirement_age = v;
    }
    if let Some(v) = payload.life_expectancy {
        args.life_expectancy = v;
    }
    if let Some(v) = payload.monthly_expenses {
        args.monthly_expenses = v;
    }
    if let Some(v) = payload.existing_corpus {
        args.existing_corpus = v;
    }
    if let Some(v) = payload.monthly_savings {
        args.monthly_savings = v;
    }
    if let Some(v) = payload.expected_return {
        args.expected_return = v;
    }
    if let Some(v) = payload.inflation {
        args.inflation = v;
    }
    args
}

fn emergency_args_from_payload(payload: EmergencyPayload) -> EmergencyArgs {
    let mut args = EmergencyArgs::default();
    if let Some(v) = payload.essential_monthly {
        args.essential_monthly = v;
    }
    if let Some(v) = payload.lifestyle_monthly {
        args.lifestyle_monthly = v;
    }
    if let Some(v) = payload.savings {
        args.savings = v;
    }
    if let Some(v) = payload.target_months {
        args.target_months = v;
    }
    args
}

fn core_error_status(err: &CoreError) -> StatusCode {
    match err {
        CoreError::BatchNotFound(_) | CoreError::TaskNotFound { .. } => StatusCode::NOT_FOUND,
        CoreError::Io(_) | CoreError::StoreJson(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    }
}

fn core_error_response(err: &CoreError) -> Response {
    let status = core_error_status(err);
    if status.is_server_error() {
        tracing::error!("task store failure: {err}");
    } else {
        tracing::warn!("request rejected: {err}");
    }
    error_response(status, &err.to_string())
}

fn calculation_response<T: Serialize>(result: Result<T, String>) -> Response {
    match result {
        Ok(body) => json_response(StatusCode::OK, body),
        Err(msg) => {
            tracing::warn!("request rejected: {msg}");
            error_response(StatusCode::BAD_REQUEST, &msg)
        }
    }
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}
