// src/handlers/pay_segment.rs

use crate::{
    errors::{AppError, AppResult},
    extract::AppJson,
    models::{PaySegment, PaySegmentRequest, SegmentEmployee},
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::info;
use uuid::Uuid;

const SEGMENT_COLUMNS: &str = r#"
    s.id, s.code, s.name, s.description, s.active,
    (SELECT COUNT(*) FROM employees e
      WHERE e.pay_segment_id = s.id AND e.status = 'active') AS assigned_employees,
    s.created_at, s.updated_at"#;

struct ValidSegment {
    code: String,
    name: String,
    description: Option<String>,
}

fn validate(body: &PaySegmentRequest) -> AppResult<ValidSegment> {
    let code = body.code.trim();
    let name = body.name.trim();
    if code.is_empty() || name.is_empty() {
        return Err(AppError::Validation("Code and name are required".to_string()));
    }
    if code.chars().count() > 10 {
        return Err(AppError::Validation(
            "Code must be at most 10 characters".to_string(),
        ));
    }
    Ok(ValidSegment {
        code: code.to_string(),
        name: name.to_string(),
        description: body
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string),
    })
}

async fn fetch_segment(state: &AppState, segment_id: Uuid) -> AppResult<PaySegment> {
    sqlx::query_as::<_, PaySegment>(&format!(
        "SELECT {} FROM pay_segments s WHERE s.id = $1",
        SEGMENT_COLUMNS
    ))
    .bind(segment_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Pay segment {} not found", segment_id)))
}

/// List active pay segments with their active employee count
#[utoipa::path(
    get,
    path = "/api/v1/pay-segments",
    responses((status = 200, description = "Active pay segments", body = Vec<PaySegment>)),
    tag = "Pay Segments"
)]
pub async fn list_pay_segments(State(state): State<AppState>) -> AppResult<Json<Vec<PaySegment>>> {
    let segments = sqlx::query_as::<_, PaySegment>(&format!(
        "SELECT {} FROM pay_segments s WHERE s.active = true ORDER BY s.code",
        SEGMENT_COLUMNS
    ))
    .fetch_all(&state.db)
    .await?;

    Ok(Json(segments))
}

/// Create a pay segment
#[utoipa::path(
    post,
    path = "/api/v1/pay-segments",
    request_body = PaySegmentRequest,
    responses(
        (status = 201, description = "Pay segment created", body = PaySegment),
        (status = 400, description = "Missing code or name"),
        (status = 409, description = "Code already in use"),
    ),
    tag = "Pay Segments"
)]
pub async fn create_pay_segment(
    State(state): State<AppState>,
    AppJson(body): AppJson<PaySegmentRequest>,
) -> AppResult<(StatusCode, Json<PaySegment>)> {
    let segment = validate(&body)?;
    let id = Uuid::new_v4();

    sqlx::query(
        r#"INSERT INTO pay_segments (id, code, name, description, active, created_at, updated_at)
           VALUES ($1, $2, $3, $4, true, NOW(), NOW())"#,
    )
    .bind(id)
    .bind(&segment.code)
    .bind(&segment.name)
    .bind(&segment.description)
    .execute(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(fetch_segment(&state, id).await?)))
}

/// Update a pay segment's code, name and description
#[utoipa::path(
    put,
    path = "/api/v1/pay-segments/{segment_id}",
    request_body = PaySegmentRequest,
    params(("segment_id" = Uuid, Path, description = "Pay segment ID")),
    responses(
        (status = 200, description = "Pay segment updated", body = PaySegment),
        (status = 404, description = "Pay segment not found"),
    ),
    tag = "Pay Segments"
)]
pub async fn update_pay_segment(
    State(state): State<AppState>,
    Path(segment_id): Path<Uuid>,
    AppJson(body): AppJson<PaySegmentRequest>,
) -> AppResult<Json<PaySegment>> {
    let segment = validate(&body)?;

    let result = sqlx::query(
        r#"UPDATE pay_segments
           SET code = $1, name = $2, description = $3, updated_at = NOW()
           WHERE id = $4"#,
    )
    .bind(&segment.code)
    .bind(&segment.name)
    .bind(&segment.description)
    .bind(segment_id)
    .execute(&state.db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Pay segment {} not found", segment_id)));
    }

    Ok(Json(fetch_segment(&state, segment_id).await?))
}

/// Delete a pay segment that has no employees
#[utoipa::path(
    delete,
    path = "/api/v1/pay-segments/{segment_id}",
    params(("segment_id" = Uuid, Path, description = "Pay segment ID")),
    responses(
        (status = 200, description = "Pay segment deleted"),
        (status = 400, description = "Pay segment still has employees"),
        (status = 404, description = "Pay segment not found"),
    ),
    tag = "Pay Segments"
)]
pub async fn delete_pay_segment(
    State(state): State<AppState>,
    Path(segment_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let assigned: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM employees WHERE pay_segment_id = $1")
            .bind(segment_id)
            .fetch_one(&state.db)
            .await?;

    if assigned > 0 {
        return Err(AppError::Validation(
            "The pay segment has employees assigned; reassign or deactivate them first"
                .to_string(),
        ));
    }

    let result = sqlx::query("DELETE FROM pay_segments WHERE id = $1")
        .bind(segment_id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Pay segment {} not found", segment_id)));
    }

    info!("Pay segment {} deleted", segment_id);
    Ok(Json(serde_json::json!({ "message": "Pay segment deleted" })))
}

/// Active employees classified under a pay segment
#[utoipa::path(
    get,
    path = "/api/v1/pay-segments/{segment_id}/employees",
    params(("segment_id" = Uuid, Path, description = "Pay segment ID")),
    responses((status = 200, description = "Employees in the segment", body = Vec<SegmentEmployee>)),
    tag = "Pay Segments"
)]
pub async fn list_segment_employees(
    State(state): State<AppState>,
    Path(segment_id): Path<Uuid>,
) -> AppResult<Json<Vec<SegmentEmployee>>> {
    let employees = sqlx::query_as::<_, SegmentEmployee>(
        r#"SELECT e.id, e.employee_code,
                  CONCAT(e.first_names, ' ', e.last_names) AS full_name,
                  e.dpi, p.name AS position, d.name AS department,
                  e.base_salary, e.status
           FROM employees e
           JOIN positions p ON p.id = e.position_id
           JOIN departments d ON d.id = e.department_id
           WHERE e.pay_segment_id = $1 AND e.status = 'active'
           ORDER BY e.employee_code"#,
    )
    .bind(segment_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(employees))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(code: &str, name: &str, description: Option<&str>) -> PaySegmentRequest {
        PaySegmentRequest {
            code: code.to_string(),
            name: name.to_string(),
            description: description.map(str::to_string),
        }
    }

    #[test]
    fn valid_segment_is_trimmed() {
        let v = validate(&request(" 011 ", "Personal permanente", Some("  "))).unwrap();
        assert_eq!(v.code, "011");
        assert_eq!(v.name, "Personal permanente");
        assert_eq!(v.description, None);
    }

    #[test]
    fn missing_code_or_long_code_rejected() {
        assert!(validate(&request("", "Personal", None)).is_err());
        assert!(validate(&request("029", " ", None)).is_err());
        assert!(validate(&request("01234567890", "Largo", None)).is_err());
    }
}
