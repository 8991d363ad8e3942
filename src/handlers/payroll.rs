// src/handlers/payroll.rs

use crate::{
    errors::AppResult,
    extract::AppJson,
    models::{GeneratePayrollRequest, PayrollRun, PayrollRunDetail},
    services::payroll,
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

/// Generate and persist a payroll run for a month, optionally limited to one pay segment
#[utoipa::path(
    post,
    path = "/api/v1/payroll-runs",
    request_body = GeneratePayrollRequest,
    responses(
        (status = 201, description = "Payroll run generated", body = PayrollRunDetail),
        (status = 400, description = "Invalid period or no active employees"),
        (status = 404, description = "Pay segment not found"),
    ),
    tag = "Payroll"
)]
pub async fn generate_payroll_run(
    State(state): State<AppState>,
    AppJson(body): AppJson<GeneratePayrollRequest>,
) -> AppResult<(StatusCode, Json<PayrollRunDetail>)> {
    let detail = payroll::generate_run(&state.db, &body).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// List payroll runs, newest first
#[utoipa::path(
    get,
    path = "/api/v1/payroll-runs",
    responses((status = 200, description = "Payroll run headers", body = Vec<PayrollRun>)),
    tag = "Payroll"
)]
pub async fn list_payroll_runs(State(state): State<AppState>) -> AppResult<Json<Vec<PayrollRun>>> {
    let runs = sqlx::query_as::<_, PayrollRun>(
        "SELECT * FROM payroll_runs ORDER BY created_at DESC",
    )
    .fetch_all(&state.db)
    .await?;

    Ok(Json(runs))
}

/// Payroll run with its employee lines and per-rule breakdown
#[utoipa::path(
    get,
    path = "/api/v1/payroll-runs/{run_id}",
    params(("run_id" = Uuid, Path, description = "Payroll run ID")),
    responses(
        (status = 200, description = "Payroll run detail", body = PayrollRunDetail),
        (status = 404, description = "Payroll run not found"),
    ),
    tag = "Payroll"
)]
pub async fn get_payroll_run(
    State(state): State<AppState>,
    Path(run_id): Path<Uuid>,
) -> AppResult<Json<PayrollRunDetail>> {
    Ok(Json(payroll::fetch_run_detail(&state.db, run_id).await?))
}
