// src/routes/mod.rs

use crate::{
    handlers::{
        bonus::{
            assign_bonus_employees, assign_bonus_pay_segments, bonus_employees,
            bonus_pay_segments, create_bonus, delete_bonus, list_bonuses, set_bonus_active,
            update_bonus,
        },
        catalog::{create_department, create_position, list_departments, list_positions},
        discount::{
            assign_discount_employees, assign_discount_pay_segments, create_discount,
            delete_discount, discount_employees, discount_pay_segments, list_discounts,
            set_discount_active, update_discount,
        },
        employee::{
            create_employee, deactivate_employee, get_employee, list_employees,
            search_employees, update_employee,
        },
        general::{health_handler, root_handler},
        leave::{
            create_leave_request, list_leave_requests, update_leave_status,
            upload_signed_document,
        },
        pay_segment::{
            create_pay_segment, delete_pay_segment, list_pay_segments, list_segment_employees,
            update_pay_segment,
        },
        payroll::{generate_payroll_run, get_payroll_run, list_payroll_runs},
        vacation::{
            available_days, create_vacation_request, list_vacation_requests,
            update_vacation_status,
        },
    },
    openapi::ApiDoc,
    state::AppState,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, patch, post, put},
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // ─── Catalogs ─────────────────────────────────────────
        .route("/departments", get(list_departments).post(create_department))
        .route("/positions", get(list_positions).post(create_position))
        // ─── Pay Segments ─────────────────────────────────────
        .route("/pay-segments", get(list_pay_segments).post(create_pay_segment))
        .route(
            "/pay-segments/{segment_id}",
            put(update_pay_segment).delete(delete_pay_segment),
        )
        .route(
            "/pay-segments/{segment_id}/employees",
            get(list_segment_employees),
        )
        // ─── Employees ────────────────────────────────────────
        .route("/employees", get(list_employees).post(create_employee))
        .route("/employees/search", get(search_employees))
        .route(
            "/employees/{employee_id}",
            get(get_employee)
                .put(update_employee)
                .delete(deactivate_employee),
        )
        // ─── Bonuses ──────────────────────────────────────────
        .route("/bonuses", get(list_bonuses).post(create_bonus))
        .route("/bonuses/{rule_id}", put(update_bonus).delete(delete_bonus))
        .route("/bonuses/{rule_id}/active", patch(set_bonus_active))
        .route(
            "/bonuses/{rule_id}/pay-segments",
            get(bonus_pay_segments).put(assign_bonus_pay_segments),
        )
        .route(
            "/bonuses/{rule_id}/employees",
            get(bonus_employees).put(assign_bonus_employees),
        )
        // ─── Discounts ────────────────────────────────────────
        .route("/discounts", get(list_discounts).post(create_discount))
        .route(
            "/discounts/{rule_id}",
            put(update_discount).delete(delete_discount),
        )
        .route("/discounts/{rule_id}/active", patch(set_discount_active))
        .route(
            "/discounts/{rule_id}/pay-segments",
            get(discount_pay_segments).put(assign_discount_pay_segments),
        )
        .route(
            "/discounts/{rule_id}/employees",
            get(discount_employees).put(assign_discount_employees),
        )
        // ─── Leave Requests ───────────────────────────────────
        .route(
            "/leave-requests",
            get(list_leave_requests).post(create_leave_request),
        )
        .route("/leave-requests/{leave_id}", put(update_leave_status))
        .route(
            "/leave-requests/{leave_id}/signed-document",
            post(upload_signed_document),
        )
        // ─── Vacation Requests ────────────────────────────────
        .route(
            "/vacation-requests",
            get(list_vacation_requests).post(create_vacation_request),
        )
        .route("/vacation-requests/available-days", get(available_days))
        .route("/vacation-requests/{vacation_id}", put(update_vacation_status))
        // ─── Payroll ──────────────────────────────────────────
        .route(
            "/payroll-runs",
            get(list_payroll_runs).post(generate_payroll_run),
        )
        .route("/payroll-runs/{run_id}", get(get_payroll_run))
}

/// Full application: API, docs, uploaded files and middleware.
pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .nest("/api/v1", api_routes())
        .nest_service("/uploads/employee-photos", ServeDir::new(config.photos_dir()))
        .nest_service("/uploads/employee-dpi", ServeDir::new(config.dpi_scans_dir()))
        .nest_service(
            "/uploads/leave-documents",
            ServeDir::new(config.leave_documents_dir()),
        )
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn send(method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let app = app(AppState::for_tests());
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = app.oneshot(request.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn landing_page_is_served() {
        let app = app(AppState::for_tests());
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn blank_department_name_is_rejected() {
        let (status, body) = send(
            Method::POST,
            "/api/v1/departments",
            Some(json!({ "name": "   " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], 400);
    }

    #[tokio::test]
    async fn payroll_month_out_of_range_is_rejected() {
        let (status, _) = send(
            Method::POST,
            "/api/v1/payroll-runs",
            Some(json!({ "month": 13, "year": 2026 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_payroll_body_gets_error_envelope() {
        for body in [
            json!({ "year": 2026 }),
            json!({ "month": "3", "year": 2026 }),
        ] {
            let (status, body) = send(Method::POST, "/api/v1/payroll-runs", Some(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"]["code"], 400);
        }
    }

    #[tokio::test]
    async fn unknown_amount_type_gets_error_envelope() {
        let (status, body) = send(
            Method::POST,
            "/api/v1/bonuses",
            Some(json!({
                "name": "Bono 14",
                "amount_type": "fixed",
                "value": "100",
                "target": "all"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], 400);
        assert!(body["error"]["message"].is_string());
    }

    #[tokio::test]
    async fn bonus_value_with_three_decimals_is_rejected() {
        let (status, body) = send(
            Method::POST,
            "/api/v1/bonuses",
            Some(json!({
                "name": "Bono incentivo",
                "amount_type": "percentage",
                "value": "4.835",
                "target": "all"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], 400);
    }

    #[tokio::test]
    async fn bonus_with_zero_value_is_rejected() {
        let (status, _) = send(
            Method::POST,
            "/api/v1/bonuses",
            Some(json!({
                "name": "Bono 14",
                "amount_type": "flat",
                "value": "0",
                "target": "all"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn discount_percentage_over_hundred_is_rejected() {
        let (status, _) = send(
            Method::POST,
            "/api/v1/discounts",
            Some(json!({
                "name": "IGSS",
                "amount_type": "percentage",
                "value": "150",
                "target": "pay_segment"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn leave_request_without_reason_is_rejected() {
        let (status, _) = send(
            Method::POST,
            "/api/v1/leave-requests",
            Some(json!({ "dpi": "2456789010101", "leave_type": "Personal", "start_date": "2026-03-10" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn vacation_request_with_reversed_dates_is_rejected() {
        let (status, _) = send(
            Method::POST,
            "/api/v1/vacation-requests",
            Some(json!({
                "dpi": "2456789010101",
                "start_date": "2026-12-20",
                "end_date": "2026-12-01",
                "days": 5
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn blank_search_returns_empty_list() {
        let (status, body) = send(Method::GET, "/api/v1/employees/search?q=%20", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let (status, body) = send(Method::GET, "/api-docs/openapi.json", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["info"]["title"], "Municipal HR API");
    }
}
