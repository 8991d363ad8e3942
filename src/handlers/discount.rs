// src/handlers/discount.rs

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

/// List discounts
#[utoipa::path(
    get,
    path = "/api/v1/discounts",
    responses((status = 200, description = "Discounts ordered by name", body = Vec<PayRuleResponse>)),
    tag = "Discounts"
)]
pub async fn list_discounts(State(state): State<AppState>) -> AppResult<Json<Vec<PayRuleResponse>>> {
    pay_rule::list_rules(state, RuleKind::Discount).await
}

/// Create a discount
#[utoipa::path(
    post,
    path = "/api/v1/discounts",
    request_body = PayRuleRequest,
    responses(
        (status = 201, description = "Discount created", body = PayRuleResponse),
        (status = 400, description = "Invalid discount"),
    ),
    tag = "Discounts"
)]
pub async fn create_discount(
    State(state): State<AppState>,
    AppJson(body): AppJson<PayRuleRequest>,
) -> AppResult<(StatusCode, Json<PayRuleResponse>)> {
    pay_rule::create_rule(state, RuleKind::Discount, body).await
}

/// Update a discount
#[utoipa::path(
    put,
    path = "/api/v1/discounts/{rule_id}",
    request_body = PayRuleRequest,
    params(("rule_id" = Uuid, Path, description = "Discount ID")),
    responses(
        (status = 200, description = "Discount updated", body = PayRuleResponse),
        (status = 400, description = "Invalid discount"),
        (status = 404, description = "Discount not found"),
    ),
    tag = "Discounts"
)]
pub async fn update_discount(
    State(state): State<AppState>,
    Path(rule_id): Path<Uuid>,
    AppJson(body): AppJson<PayRuleRequest>,
) -> AppResult<Json<PayRuleResponse>> {
    pay_rule::update_rule(state, RuleKind::Discount, rule_id, body).await
}

/// Activate or deactivate a discount
#[utoipa::path(
    patch,
    path = "/api/v1/discounts/{rule_id}/active",
    request_body = SetActiveRequest,
    params(("rule_id" = Uuid, Path, description = "Discount ID")),
    responses(
        (status = 200, description = "Discount state changed", body = PayRuleResponse),
        (status = 404, description = "Discount not found"),
    ),
    tag = "Discounts"
)]
pub async fn set_discount_active(
    State(state): State<AppState>,
    Path(rule_id): Path<Uuid>,
    AppJson(body): AppJson<SetActiveRequest>,
) -> AppResult<Json<PayRuleResponse>> {
    pay_rule::set_rule_active(state, RuleKind::Discount, rule_id, body).await
}

/// Delete a discount and its assignments
#[utoipa::path(
    delete,
    path = "/api/v1/discounts/{rule_id}",
    params(("rule_id" = Uuid, Path, description = "Discount ID")),
    responses(
        (status = 200, description = "Discount deleted"),
        (status = 404, description = "Discount not found"),
    ),
    tag = "Discounts"
)]
pub async fn delete_discount(
    State(state): State<AppState>,
    Path(rule_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    pay_rule::delete_rule(state, RuleKind::Discount, rule_id).await
}

/// Pay segments a discount is assigned to
#[utoipa::path(
    get,
    path = "/api/v1/discounts/{rule_id}/pay-segments",
    params(("rule_id" = Uuid, Path, description = "Discount ID")),
    responses(
        (status = 200, description = "Assigned pay segment IDs", body = Vec<Uuid>),
        (status = 404, description = "Discount not found"),
    ),
    tag = "Discounts"
)]
pub async fn discount_pay_segments(
    State(state): State<AppState>,
    Path(rule_id): Path<Uuid>,
) -> AppResult<Json<Vec<Uuid>>> {
    pay_rule::rule_segments(state, RuleKind::Discount, rule_id).await
}

/// Replace the pay segments a discount is assigned to
#[utoipa::path(
    put,
    path = "/api/v1/discounts/{rule_id}/pay-segments",
    request_body = AssignSegmentsRequest,
    params(("rule_id" = Uuid, Path, description = "Discount ID")),
    responses(
        (status = 200, description = "Assigned pay segment IDs", body = Vec<Uuid>),
        (status = 400, description = "Unknown pay segment"),
        (status = 404, description = "Discount not found"),
    ),
    tag = "Discounts"
)]
pub async fn assign_discount_pay_segments(
    State(state): State<AppState>,
    Path(rule_id): Path<Uuid>,
    AppJson(body): AppJson<AssignSegmentsRequest>,
) -> AppResult<Json<Vec<Uuid>>> {
    pay_rule::replace_rule_segments(state, RuleKind::Discount, rule_id, body).await
}

/// Employees individually assigned to a discount
#[utoipa::path(
    get,
    path = "/api/v1/discounts/{rule_id}/employees",
    params(("rule_id" = Uuid, Path, description = "Discount ID")),
    responses(
        (status = 200, description = "Assigned employees", body = Vec<AssignedEmployee>),
        (status = 404, description = "Discount not found"),
    ),
    tag = "Discounts"
)]
pub async fn discount_employees(
    State(state): State<AppState>,
    Path(rule_id): Path<Uuid>,
) -> AppResult<Json<Vec<AssignedEmployee>>> {
    pay_rule::rule_employees(state, RuleKind::Discount, rule_id).await
}

/// Replace the employees individually assigned to a discount
#[utoipa::path(
    put,
    path = "/api/v1/discounts/{rule_id}/employees",
    request_body = AssignEmployeesRequest,
    params(("rule_id" = Uuid, Path, description = "Discount ID")),
    responses(
        (status = 200, description = "Assigned employees", body = Vec<AssignedEmployee>),
        (status = 400, description = "Unknown employee"),
        (status = 404, description = "Discount not found"),
    ),
    tag = "Discounts"
)]
pub async fn assign_discount_employees(
    State(state): State<AppState>,
    Path(rule_id): Path<Uuid>,
    AppJson(body): AppJson<AssignEmployeesRequest>,
) -> AppResult<Json<Vec<AssignedEmployee>>> {
    pay_rule::replace_rule_employees(state, RuleKind::Discount, rule_id, body).await
}
