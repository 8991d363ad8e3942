// src/handlers/leave.rs

use crate::{
    errors::{AppError, AppResult},
    extract::AppJson,
    models::{
        CreateLeaveRequest, LeaveRequest, SignedDocumentForm, SignedDocumentResponse,
        UpdateRequestStatus,
    },
    services::uploads::{self, MultipartForm},
    state::AppState,
};
use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use chrono::{NaiveDate, Utc};
use tracing::info;
use uuid::Uuid;

const LEAVE_SELECT: &str = r#"
    SELECT l.id, l.employee_id, e.dpi,
           CONCAT(e.first_names, ' ', e.last_names) AS employee_name,
           d.name AS department,
           l.leave_type, l.start_date, l.end_date, l.reason,
           l.requested_on, l.status, l.signed_document
    FROM leave_requests l
    JOIN employees e ON e.id = l.employee_id
    LEFT JOIN departments d ON d.id = e.department_id"#;

struct ValidLeave<'a> {
    dpi: &'a str,
    leave_type: &'a str,
    start_date: NaiveDate,
    end_date: NaiveDate,
    reason: &'a str,
}

fn validate(body: &CreateLeaveRequest) -> AppResult<ValidLeave<'_>> {
    let dpi = body.dpi.trim();
    let leave_type = body.leave_type.trim();
    let reason = body.reason.trim();

    let Some(start_date) = body.start_date else {
        return Err(missing());
    };
    if dpi.is_empty() || leave_type.is_empty() || reason.is_empty() {
        return Err(missing());
    }

    let end_date = body.end_date.unwrap_or(start_date);
    if end_date < start_date {
        return Err(AppError::Validation(
            "End date cannot be before the start date".to_string(),
        ));
    }

    Ok(ValidLeave {
        dpi,
        leave_type,
        start_date,
        end_date,
        reason,
    })
}

fn missing() -> AppError {
    AppError::Validation(
        "Missing required data (dpi, leave_type, start_date, reason)".to_string(),
    )
}

fn with_url(state: &AppState, mut leave: LeaveRequest) -> LeaveRequest {
    leave.signed_document_url = leave
        .signed_document
        .as_deref()
        .map(|f| state.config.leave_document_url(f));
    leave
}

async fn fetch_leave(state: &AppState, leave_id: Uuid) -> AppResult<LeaveRequest> {
    let leave = sqlx::query_as::<_, LeaveRequest>(&format!("{} WHERE l.id = $1", LEAVE_SELECT))
        .bind(leave_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Leave request {} not found", leave_id)))?;
    Ok(with_url(state, leave))
}

/// List leave requests, newest first
#[utoipa::path(
    get,
    path = "/api/v1/leave-requests",
    responses((status = 200, description = "Leave requests", body = Vec<LeaveRequest>)),
    tag = "Leave Requests"
)]
pub async fn list_leave_requests(State(state): State<AppState>) -> AppResult<Json<Vec<LeaveRequest>>> {
    let leaves = sqlx::query_as::<_, LeaveRequest>(&format!(
        "{} ORDER BY l.requested_on DESC, l.created_at DESC",
        LEAVE_SELECT
    ))
    .fetch_all(&state.db)
    .await?;

    Ok(Json(leaves.into_iter().map(|l| with_url(&state, l)).collect()))
}

/// File a leave request for the employee with the given DPI
#[utoipa::path(
    post,
    path = "/api/v1/leave-requests",
    request_body = CreateLeaveRequest,
    responses(
        (status = 201, description = "Leave request created", body = LeaveRequest),
        (status = 400, description = "Missing data or unknown DPI"),
    ),
    tag = "Leave Requests"
)]
pub async fn create_leave_request(
    State(state): State<AppState>,
    AppJson(body): AppJson<CreateLeaveRequest>,
) -> AppResult<(StatusCode, Json<LeaveRequest>)> {
    let leave = validate(&body)?;

    let employee_id = sqlx::query_scalar::<_, Uuid>("SELECT id FROM employees WHERE dpi = $1")
        .bind(leave.dpi)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::Validation("No employee found with that DPI".to_string()))?;

    let id = Uuid::new_v4();
    sqlx::query(
        r#"INSERT INTO leave_requests (
            id, employee_id, leave_type, start_date, end_date, reason,
            requested_on, status, signed_document, created_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, 'pending', NULL, NOW())"#,
    )
    .bind(id)
    .bind(employee_id)
    .bind(leave.leave_type)
    .bind(leave.start_date)
    .bind(leave.end_date)
    .bind(leave.reason)
    .bind(Utc::now().date_naive())
    .execute(&state.db)
    .await?;

    info!("Leave request {} filed for employee {}", id, employee_id);
    Ok((StatusCode::CREATED, Json(fetch_leave(&state, id).await?)))
}

/// Approve, reject or reset a leave request
#[utoipa::path(
    put,
    path = "/api/v1/leave-requests/{leave_id}",
    request_body = UpdateRequestStatus,
    params(("leave_id" = Uuid, Path, description = "Leave request ID")),
    responses(
        (status = 200, description = "Status updated", body = LeaveRequest),
        (status = 404, description = "Leave request not found"),
    ),
    tag = "Leave Requests"
)]
pub async fn update_leave_status(
    State(state): State<AppState>,
    Path(leave_id): Path<Uuid>,
    AppJson(body): AppJson<UpdateRequestStatus>,
) -> AppResult<Json<LeaveRequest>> {
    let result = sqlx::query("UPDATE leave_requests SET status = $1 WHERE id = $2")
        .bind(body.status)
        .bind(leave_id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Leave request {} not found", leave_id)));
    }

    Ok(Json(fetch_leave(&state, leave_id).await?))
}

/// Attach the signed leave document (multipart field `file`)
#[utoipa::path(
    post,
    path = "/api/v1/leave-requests/{leave_id}/signed-document",
    request_body(content = SignedDocumentForm, content_type = "multipart/form-data"),
    params(("leave_id" = Uuid, Path, description = "Leave request ID")),
    responses(
        (status = 200, description = "Document stored", body = SignedDocumentResponse),
        (status = 400, description = "No file received"),
        (status = 404, description = "Leave request not found"),
    ),
    tag = "Leave Requests"
)]
pub async fn upload_signed_document(
    State(state): State<AppState>,
    Path(leave_id): Path<Uuid>,
    multipart: Multipart,
) -> AppResult<Json<SignedDocumentResponse>> {
    let dpi = sqlx::query_scalar::<_, String>(
        r#"SELECT e.dpi FROM leave_requests l
           JOIN employees e ON e.id = l.employee_id
           WHERE l.id = $1"#,
    )
    .bind(leave_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Leave request {} not found", leave_id)))?;

    let form = MultipartForm::read(multipart).await?;
    let file = form
        .file("file")
        .ok_or_else(|| AppError::Validation("No file was received".to_string()))?;

    let file_name = uploads::generated_name(
        &signed_document_prefix(&dpi),
        file.original_name.as_deref(),
        ".pdf",
    );
    uploads::store(&state.config.leave_documents_dir(), &file_name, &file.bytes).await?;

    let saved = sqlx::query("UPDATE leave_requests SET signed_document = $1 WHERE id = $2")
        .bind(&file_name)
        .bind(leave_id)
        .execute(&state.db)
        .await;
    if let Err(e) = saved {
        uploads::remove(&state.config.leave_documents_dir(), &file_name).await;
        return Err(e.into());
    }

    info!("Signed document {} stored for leave request {}", file_name, leave_id);
    Ok(Json(SignedDocumentResponse {
        id: leave_id,
        url: state.config.leave_document_url(&file_name),
        signed_document: file_name,
    }))
}

fn signed_document_prefix(dpi: &str) -> String {
    let digits = uploads::digits_only(dpi);
    if digits.is_empty() {
        "no_dpi_leave".to_string()
    } else {
        format!("{}_leave", digits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(end: Option<NaiveDate>) -> CreateLeaveRequest {
        CreateLeaveRequest {
            dpi: "2456789010101".to_string(),
            leave_type: "Personal".to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 3, 10),
            end_date: end,
            reason: "Trámite en el RENAP".to_string(),
        }
    }

    #[test]
    fn end_date_defaults_to_start() {
        let b = body(None);
        let leave = validate(&b).unwrap();
        assert_eq!(leave.end_date, leave.start_date);
    }

    #[test]
    fn end_before_start_rejected() {
        let b = body(NaiveDate::from_ymd_opt(2026, 3, 9));
        assert!(matches!(validate(&b), Err(AppError::Validation(_))));
    }

    #[test]
    fn blank_reason_rejected() {
        let mut b = body(None);
        b.reason = "  ".to_string();
        assert!(validate(&b).is_err());

        let mut b = body(None);
        b.start_date = None;
        assert!(validate(&b).is_err());
    }

    #[test]
    fn document_prefix_uses_dpi_digits() {
        assert_eq!(signed_document_prefix("2456 78901 0101"), "2456789010101_leave");
        assert_eq!(signed_document_prefix("n/a"), "no_dpi_leave");
    }
}
