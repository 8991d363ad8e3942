// src/handlers/vacation.rs

use crate::{
    errors::{AppError, AppResult},
    extract::AppJson,
    models::{
        AvailableDaysQuery, AvailableVacationDays, CreateVacationRequest, UpdateRequestStatus,
        VacationRequest,
    },
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{Datelike, NaiveDate, Utc};
use tracing::info;
use uuid::Uuid;

const VACATION_SELECT: &str = r#"
    SELECT v.id, v.employee_id, e.dpi,
           CONCAT(e.first_names, ' ', e.last_names) AS employee_name,
           v.start_date, v.end_date, v.days, v.reason,
           v.requested_on, v.status, e.photo_path
    FROM vacation_requests v
    JOIN employees e ON e.id = v.employee_id"#;

#[derive(Debug)]
struct ValidVacation<'a> {
    dpi: &'a str,
    start_date: NaiveDate,
    end_date: NaiveDate,
    days: i32,
    reason: Option<&'a str>,
}

fn validate(body: &CreateVacationRequest) -> AppResult<ValidVacation<'_>> {
    let dpi = body.dpi.trim();
    let (Some(start_date), Some(end_date)) = (body.start_date, body.end_date) else {
        return Err(AppError::Validation(
            "Missing required data (dpi, start_date, end_date)".to_string(),
        ));
    };
    if dpi.is_empty() {
        return Err(AppError::Validation("The employee DPI is required".to_string()));
    }
    if end_date < start_date {
        return Err(AppError::Validation(
            "End date cannot be before the start date".to_string(),
        ));
    }

    // Calendar days, both ends included
    let days = body
        .days
        .unwrap_or_else(|| (end_date - start_date).num_days() as i32 + 1);
    if days <= 0 {
        return Err(AppError::Validation(
            "Days must be greater than zero".to_string(),
        ));
    }

    Ok(ValidVacation {
        dpi,
        start_date,
        end_date,
        days,
        reason: body.reason.as_deref().map(str::trim).filter(|r| !r.is_empty()),
    })
}

/// Negative when more days were requested than the allowance
fn remaining_days(allowance: i64, taken: i64) -> i64 {
    allowance - taken
}

fn with_photo(state: &AppState, mut vacation: VacationRequest) -> VacationRequest {
    vacation.photo_url = vacation
        .photo_path
        .as_deref()
        .map(|p| state.config.photo_url(p));
    vacation
}

async fn fetch_vacation(state: &AppState, vacation_id: Uuid) -> AppResult<VacationRequest> {
    let vacation =
        sqlx::query_as::<_, VacationRequest>(&format!("{} WHERE v.id = $1", VACATION_SELECT))
            .bind(vacation_id)
            .fetch_optional(&state.db)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Vacation request {} not found", vacation_id))
            })?;
    Ok(with_photo(state, vacation))
}

/// List vacation requests, newest first
#[utoipa::path(
    get,
    path = "/api/v1/vacation-requests",
    responses((status = 200, description = "Vacation requests", body = Vec<VacationRequest>)),
    tag = "Vacation Requests"
)]
pub async fn list_vacation_requests(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<VacationRequest>>> {
    let vacations = sqlx::query_as::<_, VacationRequest>(&format!(
        "{} ORDER BY v.requested_on DESC, v.created_at DESC",
        VACATION_SELECT
    ))
    .fetch_all(&state.db)
    .await?;

    Ok(Json(
        vacations.into_iter().map(|v| with_photo(&state, v)).collect(),
    ))
}

/// File a vacation request for the employee with the given DPI
#[utoipa::path(
    post,
    path = "/api/v1/vacation-requests",
    request_body = CreateVacationRequest,
    responses(
        (status = 201, description = "Vacation request created", body = VacationRequest),
        (status = 400, description = "Invalid dates, days or unknown DPI"),
    ),
    tag = "Vacation Requests"
)]
pub async fn create_vacation_request(
    State(state): State<AppState>,
    AppJson(body): AppJson<CreateVacationRequest>,
) -> AppResult<(StatusCode, Json<VacationRequest>)> {
    let vacation = validate(&body)?;

    let employee_id = sqlx::query_scalar::<_, Uuid>("SELECT id FROM employees WHERE dpi = $1")
        .bind(vacation.dpi)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::Validation("No employee found with that DPI".to_string()))?;

    let id = Uuid::new_v4();
    sqlx::query(
        r#"INSERT INTO vacation_requests (
            id, employee_id, start_date, end_date, days, reason,
            requested_on, status, created_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, 'pending', NOW())"#,
    )
    .bind(id)
    .bind(employee_id)
    .bind(vacation.start_date)
    .bind(vacation.end_date)
    .bind(vacation.days)
    .bind(vacation.reason)
    .bind(Utc::now().date_naive())
    .execute(&state.db)
    .await?;

    info!(
        "Vacation request {} filed for employee {} ({} days)",
        id, employee_id, vacation.days
    );
    Ok((StatusCode::CREATED, Json(fetch_vacation(&state, id).await?)))
}

/// Approve, reject or reset a vacation request
#[utoipa::path(
    put,
    path = "/api/v1/vacation-requests/{vacation_id}",
    request_body = UpdateRequestStatus,
    params(("vacation_id" = Uuid, Path, description = "Vacation request ID")),
    responses(
        (status = 200, description = "Status updated", body = VacationRequest),
        (status = 404, description = "Vacation request not found"),
    ),
    tag = "Vacation Requests"
)]
pub async fn update_vacation_status(
    State(state): State<AppState>,
    Path(vacation_id): Path<Uuid>,
    AppJson(body): AppJson<UpdateRequestStatus>,
) -> AppResult<Json<VacationRequest>> {
    let result = sqlx::query("UPDATE vacation_requests SET status = $1 WHERE id = $2")
        .bind(body.status)
        .bind(vacation_id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "Vacation request {} not found",
            vacation_id
        )));
    }

    Ok(Json(fetch_vacation(&state, vacation_id).await?))
}

/// Remaining vacation days per active employee for a year
#[utoipa::path(
    get,
    path = "/api/v1/vacation-requests/available-days",
    params(AvailableDaysQuery),
    responses((status = 200, description = "Remaining days per employee", body = Vec<AvailableVacationDays>)),
    tag = "Vacation Requests"
)]
pub async fn available_days(
    State(state): State<AppState>,
    Query(query): Query<AvailableDaysQuery>,
) -> AppResult<Json<Vec<AvailableVacationDays>>> {
    let year = query.year.unwrap_or_else(|| Utc::now().year());

    let rows = sqlx::query_as::<_, AvailableVacationDays>(
        r#"SELECT e.id AS employee_id, e.employee_code,
                  CONCAT(e.first_names, ' ', e.last_names) AS full_name,
                  e.dpi, e.photo_path,
                  COALESCE(SUM(v.days), 0)::BIGINT AS days_taken
           FROM employees e
           LEFT JOIN vacation_requests v
             ON v.employee_id = e.id
            AND v.status <> 'rejected'
            AND (EXTRACT(YEAR FROM v.start_date)::INT = $1 OR EXTRACT(YEAR FROM v.end_date)::INT = $1)
           WHERE e.status = 'active'
           GROUP BY e.id, e.employee_code, e.first_names, e.last_names, e.dpi, e.photo_path
           ORDER BY e.last_names, e.first_names"#,
    )
    .bind(year)
    .fetch_all(&state.db)
    .await?;

    let allowance = state.config.vacation_days_per_year;
    let rows = rows
        .into_iter()
        .map(|mut row| {
            row.available_days = remaining_days(allowance, row.days_taken);
            row.photo_url = row.photo_path.as_deref().map(|p| state.config.photo_url(p));
            row
        })
        .collect();

    Ok(Json(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(days: Option<i32>) -> CreateVacationRequest {
        CreateVacationRequest {
            dpi: "1987654320101".to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 12, 21),
            end_date: NaiveDate::from_ymd_opt(2026, 12, 31),
            days,
            reason: Some("   ".to_string()),
        }
    }

    #[test]
    fn days_default_to_inclusive_range() {
        let b = body(None);
        let v = validate(&b).unwrap();
        assert_eq!(v.days, 11);
        assert_eq!(v.reason, None);
    }

    #[test]
    fn explicit_days_are_kept() {
        let b = body(Some(8));
        assert_eq!(validate(&b).unwrap().days, 8);
    }

    #[test]
    fn zero_days_rejected() {
        let b = body(Some(0));
        assert!(matches!(validate(&b), Err(AppError::Validation(_))));
    }

    #[test]
    fn reversed_dates_rejected() {
        let mut b = body(Some(3));
        b.end_date = NaiveDate::from_ymd_opt(2026, 12, 1);
        assert!(validate(&b).is_err());
    }

    #[test]
    fn remaining_days_can_go_negative() {
        assert_eq!(remaining_days(20, 5), 15);
        assert_eq!(remaining_days(20, 26), -6);
    }
}
