// src/handlers/bonus.rs

use crate::{
    errors::AppResult,
    extract::AppJson,
    handlers::pay_rule,
    models::{
        AssignEmployeesRequest, AssignSegmentsRequest, AssignedEmployee, PayRuleRequest,
        PayRuleResponse, RuleKind, SetActiveRequest,
    },
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

/// List bonuses
#[utoipa::path(
    get,
    path = "/api/v1/bonuses",
    responses((status = 200, description = "Bonuses ordered by name", body = Vec<PayRuleResponse>)),
    tag = "Bonuses"
)]
pub async fn list_bonuses(State(state): State<AppState>) -> AppResult<Json<Vec<PayRuleResponse>>> {
    pay_rule::list_rules(state, RuleKind::Bonus).await
}

/// Create a bonus
#[utoipa::path(
    post,
    path = "/api/v1/bonuses",
    request_body = PayRuleRequest,
    responses(
        (status = 201, description = "Bonus created", body = PayRuleResponse),
        (status = 400, description = "Invalid bonus"),
    ),
    tag = "Bonuses"
)]
pub async fn create_bonus(
    State(state): State<AppState>,
    AppJson(body): AppJson<PayRuleRequest>,
) -> AppResult<(StatusCode, Json<PayRuleResponse>)> {
    pay_rule::create_rule(state, RuleKind::Bonus, body).await
}

/// Update a bonus
#[utoipa::path(
    put,
    path = "/api/v1/bonuses/{rule_id}",
    request_body = PayRuleRequest,
    params(("rule_id" = Uuid, Path, description = "Bonus ID")),
    responses(
        (status = 200, description = "Bonus updated", body = PayRuleResponse),
        (status = 400, description = "Invalid bonus"),
        (status = 404, description = "Bonus not found"),
    ),
    tag = "Bonuses"
)]
pub async fn update_bonus(
    State(state): State<AppState>,
    Path(rule_id): Path<Uuid>,
    AppJson(body): AppJson<PayRuleRequest>,
) -> AppResult<Json<PayRuleResponse>> {
    pay_rule::update_rule(state, RuleKind::Bonus, rule_id, body).await
}

/// Activate or deactivate a bonus
#[utoipa::path(
    patch,
    path = "/api/v1/bonuses/{rule_id}/active",
    request_body = SetActiveRequest,
    params(("rule_id" = Uuid, Path, description = "Bonus ID")),
    responses(
        (status = 200, description = "Bonus state changed", body = PayRuleResponse),
        (status = 404, description = "Bonus not found"),
    ),
    tag = "Bonuses"
)]
pub async fn set_bonus_active(
    State(state): State<AppState>,
    Path(rule_id): Path<Uuid>,
    AppJson(body): AppJson<SetActiveRequest>,
) -> AppResult<Json<PayRuleResponse>> {
    pay_rule::set_rule_active(state, RuleKind::Bonus, rule_id, body).await
}

/// Delete a bonus and its assignments
#[utoipa::path(
    delete,
    path = "/api/v1/bonuses/{rule_id}",
    params(("rule_id" = Uuid, Path, description = "Bonus ID")),
    responses(
        (status = 200, description = "Bonus deleted"),
        (status = 404, description = "Bonus not found"),
    ),
    tag = "Bonuses"
)]
pub async fn delete_bonus(
    State(state): State<AppState>,
    Path(rule_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    pay_rule::delete_rule(state, RuleKind::Bonus, rule_id).await
}

/// Pay segments a bonus is assigned to
#[utoipa::path(
    get,
    path = "/api/v1/bonuses/{rule_id}/pay-segments",
    params(("rule_id" = Uuid, Path, description = "Bonus ID")),
    responses(
        (status = 200, description = "Assigned pay segment IDs", body = Vec<Uuid>),
        (status = 404, description = "Bonus not found"),
    ),
    tag = "Bonuses"
)]
pub async fn bonus_pay_segments(
    State(state): State<AppState>,
    Path(rule_id): Path<Uuid>,
) -> AppResult<Json<Vec<Uuid>>> {
    pay_rule::rule_segments(state, RuleKind::Bonus, rule_id).await
}

/// Replace the pay segments a bonus is assigned to
#[utoipa::path(
    put,
    path = "/api/v1/bonuses/{rule_id}/pay-segments",
    request_body = AssignSegmentsRequest,
    params(("rule_id" = Uuid, Path, description = "Bonus ID")),
    responses(
        (status = 200, description = "Assigned pay segment IDs", body = Vec<Uuid>),
        (status = 400, description = "Unknown pay segment"),
        (status = 404, description = "Bonus not found"),
    ),
    tag = "Bonuses"
)]
pub async fn assign_bonus_pay_segments(
    State(state): State<AppState>,
    Path(rule_id): Path<Uuid>,
    AppJson(body): AppJson<AssignSegmentsRequest>,
) -> AppResult<Json<Vec<Uuid>>> {
    pay_rule::replace_rule_segments(state, RuleKind::Bonus, rule_id, body).await
}

/// Employees individually assigned to a bonus
#[utoipa::path(
    get,
    path = "/api/v1/bonuses/{rule_id}/employees",
    params(("rule_id" = Uuid, Path, description = "Bonus ID")),
    responses(
        (status = 200, description = "Assigned employees", body = Vec<AssignedEmployee>),
        (status = 404, description = "Bonus not found"),
    ),
    tag = "Bonuses"
)]
pub async fn bonus_employees(
    State(state): State<AppState>,
    Path(rule_id): Path<Uuid>,
) -> AppResult<Json<Vec<AssignedEmployee>>> {
    pay_rule::rule_employees(state, RuleKind::Bonus, rule_id).await
}

/// Replace the employees individually assigned to a bonus
#[utoipa::path(
    put,
    path = "/api/v1/bonuses/{rule_id}/employees",
    request_body = AssignEmployeesRequest,
    params(("rule_id" = Uuid, Path, description = "Bonus ID")),
    responses(
        (status = 200, description = "Assigned employees", body = Vec<AssignedEmployee>),
        (status = 400, description = "Unknown employee"),
        (status = 404, description = "Bonus not found"),
    ),
    tag = "Bonuses"
)]
pub async fn assign_bonus_employees(
    State(state): State<AppState>,
    Path(rule_id): Path<Uuid>,
    AppJson(body): AppJson<AssignEmployeesRequest>,
) -> AppResult<Json<Vec<AssignedEmployee>>> {
    pay_rule::replace_rule_employees(state, RuleKind::Bonus, rule_id, body).await
}
