// src/handlers/pay_rule.rs
//
// Shared implementation behind the /bonuses and /discounts endpoints. Both
// live in `pay_rules`, told apart by `kind`.

use crate::{
    errors::{AppError, AppResult},
    models::{
        AmountType, AssignEmployeesRequest, AssignSegmentsRequest, AssignedEmployee, PayRule,
        PayRuleRequest, PayRuleResponse, RuleKind, RuleTarget, SetActiveRequest,
    },
    services::payroll::validate_amount,
    state::AppState,
};
use axum::{Json, http::StatusCode};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sqlx::PgConnection;
use std::collections::BTreeSet;
use tracing::info;
use uuid::Uuid;

const RULE_COLUMNS: &str = r#"
    id, kind, name, amount_type, value, description,
    applies_to_all, applies_by_segment, applies_individually,
    active, created_at, updated_at"#;

#[derive(Debug)]
struct ValidRule {
    name: String,
    amount_type: AmountType,
    value: Decimal,
    description: Option<String>,
    applies_to_all: bool,
    applies_by_segment: bool,
    applies_individually: bool,
}

fn validate(body: &PayRuleRequest) -> AppResult<ValidRule> {
    let name = body.name.trim();
    let (Some(amount_type), Some(value), Some(target)) = (body.amount_type, body.value, body.target)
    else {
        return Err(AppError::Validation(
            "Name, amount type, value and target are required".to_string(),
        ));
    };
    if name.is_empty() {
        return Err(AppError::Validation(
            "Name, amount type, value and target are required".to_string(),
        ));
    }
    if value <= Decimal::ZERO {
        return Err(AppError::Validation("Value must be greater than zero".to_string()));
    }
    validate_amount(value, "Value")?;
    if amount_type == AmountType::Percentage && value > dec!(100) {
        return Err(AppError::Validation("A percentage cannot exceed 100".to_string()));
    }
    if target == RuleTarget::None {
        return Err(AppError::Validation(
            "Target must be 'all', 'pay_segment' or 'individual'".to_string(),
        ));
    }

    Ok(ValidRule {
        name: name.to_string(),
        amount_type,
        value,
        description: body
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string),
        applies_to_all: target == RuleTarget::All,
        applies_by_segment: target == RuleTarget::PaySegment,
        applies_individually: target == RuleTarget::Individual,
    })
}

fn not_found(kind: RuleKind, rule_id: Uuid) -> AppError {
    AppError::NotFound(format!("{} {} not found", kind.label(), rule_id))
}

async fn ensure_exists(conn: &mut PgConnection, kind: RuleKind, rule_id: Uuid) -> AppResult<()> {
    sqlx::query_scalar::<_, Uuid>("SELECT id FROM pay_rules WHERE id = $1 AND kind = $2")
        .bind(rule_id)
        .bind(kind)
        .fetch_optional(&mut *conn)
        .await?
        .map(|_| ())
        .ok_or_else(|| not_found(kind, rule_id))
}

pub async fn list_rules(state: AppState, kind: RuleKind) -> AppResult<Json<Vec<PayRuleResponse>>> {
    let rules = sqlx::query_as::<_, PayRule>(&format!(
        "SELECT {} FROM pay_rules WHERE kind = $1 ORDER BY name",
        RULE_COLUMNS
    ))
    .bind(kind)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(rules.into_iter().map(PayRuleResponse::from).collect()))
}

pub async fn create_rule(
    state: AppState,
    kind: RuleKind,
    body: PayRuleRequest,
) -> AppResult<(StatusCode, Json<PayRuleResponse>)> {
    let rule = validate(&body)?;

    let created = sqlx::query_as::<_, PayRule>(&format!(
        r#"INSERT INTO pay_rules (
            id, kind, name, amount_type, value, description,
            applies_to_all, applies_by_segment, applies_individually,
            active, created_at, updated_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,true,NOW(),NOW())
        RETURNING {}"#,
        RULE_COLUMNS
    ))
    .bind(Uuid::new_v4())
    .bind(kind)
    .bind(&rule.name)
    .bind(rule.amount_type)
    .bind(rule.value)
    .bind(&rule.description)
    .bind(rule.applies_to_all)
    .bind(rule.applies_by_segment)
    .bind(rule.applies_individually)
    .fetch_one(&state.db)
    .await?;

    info!("{} '{}' created ({})", kind.label(), created.name, created.id);
    Ok((StatusCode::CREATED, Json(created.into())))
}

pub async fn update_rule(
    state: AppState,
    kind: RuleKind,
    rule_id: Uuid,
    body: PayRuleRequest,
) -> AppResult<Json<PayRuleResponse>> {
    let rule = validate(&body)?;

    let updated = sqlx::query_as::<_, PayRule>(&format!(
        r#"UPDATE pay_rules SET
            name = $1,
            amount_type = $2,
            value = $3,
            description = $4,
            applies_to_all = $5,
            applies_by_segment = $6,
            applies_individually = $7,
            active = COALESCE($8, active),
            updated_at = NOW()
        WHERE id = $9 AND kind = $10
        RETURNING {}"#,
        RULE_COLUMNS
    ))
    .bind(&rule.name)
    .bind(rule.amount_type)
    .bind(rule.value)
    .bind(&rule.description)
    .bind(rule.applies_to_all)
    .bind(rule.applies_by_segment)
    .bind(rule.applies_individually)
    .bind(body.active)
    .bind(rule_id)
    .bind(kind)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| not_found(kind, rule_id))?;

    Ok(Json(updated.into()))
}

pub async fn set_rule_active(
    state: AppState,
    kind: RuleKind,
    rule_id: Uuid,
    body: SetActiveRequest,
) -> AppResult<Json<PayRuleResponse>> {
    let updated = sqlx::query_as::<_, PayRule>(&format!(
        r#"UPDATE pay_rules SET active = $1, updated_at = NOW()
           WHERE id = $2 AND kind = $3
           RETURNING {}"#,
        RULE_COLUMNS
    ))
    .bind(body.active)
    .bind(rule_id)
    .bind(kind)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| not_found(kind, rule_id))?;

    Ok(Json(updated.into()))
}

/// Assignments go with the rule through ON DELETE CASCADE
pub async fn delete_rule(
    state: AppState,
    kind: RuleKind,
    rule_id: Uuid,
) -> AppResult<Json<serde_json::Value>> {
    let result = sqlx::query("DELETE FROM pay_rules WHERE id = $1 AND kind = $2")
        .bind(rule_id)
        .bind(kind)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(not_found(kind, rule_id));
    }

    info!("{} {} deleted", kind.label(), rule_id);
    Ok(Json(serde_json::json!({ "message": format!("{} deleted", kind.label()) })))
}

async fn segment_ids(conn: &mut PgConnection, rule_id: Uuid) -> AppResult<Vec<Uuid>> {
    Ok(sqlx::query_scalar::<_, Uuid>(
        "SELECT pay_segment_id FROM pay_rule_segments WHERE rule_id = $1 ORDER BY pay_segment_id",
    )
    .bind(rule_id)
    .fetch_all(&mut *conn)
    .await?)
}

pub async fn rule_segments(state: AppState, kind: RuleKind, rule_id: Uuid) -> AppResult<Json<Vec<Uuid>>> {
    let mut conn = state.db.acquire().await?;
    ensure_exists(&mut conn, kind, rule_id).await?;
    Ok(Json(segment_ids(&mut conn, rule_id).await?))
}

/// Replace the whole segment list in one transaction
pub async fn replace_rule_segments(
    state: AppState,
    kind: RuleKind,
    rule_id: Uuid,
    body: AssignSegmentsRequest,
) -> AppResult<Json<Vec<Uuid>>> {
    let mut tx = state.db.begin().await?;
    ensure_exists(&mut tx, kind, rule_id).await?;

    sqlx::query("DELETE FROM pay_rule_segments WHERE rule_id = $1")
        .bind(rule_id)
        .execute(&mut *tx)
        .await?;

    let unique: BTreeSet<Uuid> = body.pay_segment_ids.into_iter().collect();
    for segment_id in &unique {
        sqlx::query("INSERT INTO pay_rule_segments (rule_id, pay_segment_id) VALUES ($1, $2)")
            .bind(rule_id)
            .bind(segment_id)
            .execute(&mut *tx)
            .await?;
    }

    let ids = segment_ids(&mut tx, rule_id).await?;
    tx.commit().await?;

    info!("{} {} assigned to {} pay segments", kind.label(), rule_id, ids.len());
    Ok(Json(ids))
}

async fn assigned_employees(conn: &mut PgConnection, rule_id: Uuid) -> AppResult<Vec<AssignedEmployee>> {
    Ok(sqlx::query_as::<_, AssignedEmployee>(
        r#"SELECT re.employee_id, e.employee_code,
                  CONCAT(e.first_names, ' ', e.last_names) AS full_name,
                  e.dpi, s.code AS pay_segment_code
           FROM pay_rule_employees re
           JOIN employees e ON e.id = re.employee_id
           JOIN pay_segments s ON s.id = e.pay_segment_id
           WHERE re.rule_id = $1
           ORDER BY e.employee_code"#,
    )
    .bind(rule_id)
    .fetch_all(&mut *conn)
    .await?)
}

pub async fn rule_employees(
    state: AppState,
    kind: RuleKind,
    rule_id: Uuid,
) -> AppResult<Json<Vec<AssignedEmployee>>> {
    let mut conn = state.db.acquire().await?;
    ensure_exists(&mut conn, kind, rule_id).await?;
    Ok(Json(assigned_employees(&mut conn, rule_id).await?))
}

/// Replace the whole individual assignment list in one transaction
pub async fn replace_rule_employees(
    state: AppState,
    kind: RuleKind,
    rule_id: Uuid,
    body: AssignEmployeesRequest,
) -> AppResult<Json<Vec<AssignedEmployee>>> {
    let mut tx = state.db.begin().await?;
    ensure_exists(&mut tx, kind, rule_id).await?;

    sqlx::query("DELETE FROM pay_rule_employees WHERE rule_id = $1")
        .bind(rule_id)
        .execute(&mut *tx)
        .await?;

    let unique: BTreeSet<Uuid> = body.employee_ids.into_iter().collect();
    for employee_id in &unique {
        sqlx::query("INSERT INTO pay_rule_employees (rule_id, employee_id) VALUES ($1, $2)")
            .bind(rule_id)
            .bind(employee_id)
            .execute(&mut *tx)
            .await?;
    }

    let employees = assigned_employees(&mut tx, rule_id).await?;
    tx.commit().await?;

    info!("{} {} assigned to {} employees", kind.label(), rule_id, employees.len());
    Ok(Json(employees))
}
