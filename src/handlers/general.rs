// src/handlers/general.rs

use crate::state::AppState;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
};
use serde_json::json;

/// (method, path, description) grouped by section for the landing page
const ROUTE_GROUPS: &[(&str, &[(&str, &str, &str)])] = &[
    (
        "Catalogs",
        &[
            ("GET", "/api/v1/departments", "List departments"),
            ("POST", "/api/v1/departments", "Create a department"),
            ("GET", "/api/v1/positions", "List job positions"),
            ("POST", "/api/v1/positions", "Create a job position"),
        ],
    ),
    (
        "Pay Segments",
        &[
            ("GET", "/api/v1/pay-segments", "Active segments with employee counts"),
            ("POST", "/api/v1/pay-segments", "Create a segment"),
            ("PUT", "/api/v1/pay-segments/{id}", "Update a segment"),
            ("DELETE", "/api/v1/pay-segments/{id}", "Delete an empty segment"),
            ("GET", "/api/v1/pay-segments/{id}/employees", "Employees in a segment"),
        ],
    ),
    (
        "Employees",
        &[
            ("GET", "/api/v1/employees", "List employees"),
            ("GET", "/api/v1/employees/search?q=", "Search by name, code or DPI"),
            ("POST", "/api/v1/employees", "Register an employee (multipart)"),
            ("GET", "/api/v1/employees/{id}", "Employee detail"),
            ("PUT", "/api/v1/employees/{id}", "Update an employee (multipart)"),
            ("DELETE", "/api/v1/employees/{id}", "Deactivate an employee"),
        ],
    ),
    (
        "Bonuses and Discounts",
        &[
            ("GET", "/api/v1/bonuses", "List bonuses"),
            ("POST", "/api/v1/bonuses", "Create a bonus"),
            ("PUT", "/api/v1/bonuses/{id}", "Update a bonus"),
            ("PATCH", "/api/v1/bonuses/{id}/active", "Activate or deactivate"),
            ("DELETE", "/api/v1/bonuses/{id}", "Delete a bonus"),
            ("PUT", "/api/v1/bonuses/{id}/pay-segments", "Replace segment assignments"),
            ("PUT", "/api/v1/bonuses/{id}/employees", "Replace employee assignments"),
            ("*", "/api/v1/discounts/...", "Same operations for discounts"),
        ],
    ),
    (
        "Leave and Vacation",
        &[
            ("GET", "/api/v1/leave-requests", "List leave requests"),
            ("POST", "/api/v1/leave-requests", "File a leave request by DPI"),
            ("PUT", "/api/v1/leave-requests/{id}", "Change leave status"),
            ("POST", "/api/v1/leave-requests/{id}/signed-document", "Upload the signed document"),
            ("GET", "/api/v1/vacation-requests", "List vacation requests"),
            ("POST", "/api/v1/vacation-requests", "File a vacation request by DPI"),
            ("PUT", "/api/v1/vacation-requests/{id}", "Change vacation status"),
            ("GET", "/api/v1/vacation-requests/available-days?year=", "Remaining days per employee"),
        ],
    ),
    (
        "Payroll",
        &[
            ("POST", "/api/v1/payroll-runs", "Generate a monthly payroll run"),
            ("GET", "/api/v1/payroll-runs", "List payroll runs"),
            ("GET", "/api/v1/payroll-runs/{id}", "Run detail with breakdown"),
        ],
    ),
];

fn render_routes() -> String {
    let mut html = String::new();
    for (group, routes) in ROUTE_GROUPS {
        html.push_str(&format!("<h4>{}</h4>\n<table>\n", group));
        for (method, path, description) in *routes {
            html.push_str(&format!(
                "<tr><td class=\"method\">{}</td><td><code>{}</code></td><td>{}</td></tr>\n",
                method, path, description
            ));
        }
        html.push_str("</table>\n");
    }
    html
}

/// Root handler: HTML landing page with links and the route map
pub async fn root_handler() -> impl IntoResponse {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <title>Municipal HR API</title>
  <style>
    body {{ font-family: system-ui, sans-serif; background: #0f172a; color: #e2e8f0; padding: 40px 20px; }}
    .container {{ max-width: 860px; margin: 0 auto; }}
    a {{ color: #38bdf8; }}
    h4 {{ color: #64748b; text-transform: uppercase; letter-spacing: 0.1em; margin-top: 24px; }}
    table {{ width: 100%; border-collapse: collapse; }}
    td {{ padding: 6px 8px; border-bottom: 1px solid #1e293b; font-size: 0.875rem; }}
    .method {{ font-family: monospace; font-weight: 700; color: #34d399; width: 70px; }}
  </style>
</head>
<body>
<div class="container">
  <h1>Municipal HR API</h1>
  <p>Employees, pay segments, bonuses, discounts, leave, vacations and payroll.</p>
  <p><a href="/docs">Swagger UI</a> · <a href="/health">Health</a></p>
  {}
</div>
</body>
</html>"#,
        render_routes()
    ))
}

/// Health check endpoint
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    match sqlx::query("SELECT 1").fetch_one(&state.db).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "database": "connected",
                "service": "muni-hr",
                "version": env!("CARGO_PKG_VERSION")
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "unhealthy",
                "database": "disconnected",
                "error": e.to_string()
            })),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_map_lists_payroll_runs() {
        let html = render_routes();
        assert!(html.contains("/api/v1/payroll-runs"));
        assert!(html.contains("<h4>Pay Segments</h4>"));
    }
}
