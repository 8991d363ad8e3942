use crate::{
    config::Config,
    errors::{AppError, AppResult},
    models::{
        Employee, EmployeeDetail, EmployeeForm, EmployeeListItem, EmployeeSearchResult,
        EmployeeStatus, SearchQuery,
    },
    services::{
        payroll::validate_amount,
        uploads::{self, MultipartForm},
    },
    state::AppState,
};
use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::info;
use uuid::Uuid;

const EMPLOYEE_COLUMNS: &str = r#"
    id, employee_code, first_names, last_names, dpi, birth_date, phone, address,
    pay_segment_id, department_id, position_id, status, hire_date, base_salary,
    photo_path, dpi_scan_path, created_at, updated_at"#;

/// Parsed and validated multipart employee fields
#[derive(Debug)]
struct EmployeeInput {
    employee_code: String,
    first_names: String,
    last_names: String,
    dpi: String,
    birth_date: Option<NaiveDate>,
    phone: Option<String>,
    address: Option<String>,
    pay_segment_id: Uuid,
    department_id: Uuid,
    position_id: Uuid,
    status: EmployeeStatus,
    hire_date: Option<NaiveDate>,
    base_salary: Decimal,
}

fn required<'a>(form: &'a MultipartForm, name: &str) -> AppResult<&'a str> {
    form.text(name)
        .ok_or_else(|| AppError::Validation(format!("Field '{}' is required", name)))
}

fn parse_uuid(form: &MultipartForm, name: &str) -> AppResult<Uuid> {
    Uuid::parse_str(required(form, name)?)
        .map_err(|_| AppError::Validation(format!("Field '{}' must be a valid id", name)))
}

fn parse_date(form: &MultipartForm, name: &str) -> AppResult<Option<NaiveDate>> {
    form.text(name)
        .map(|v| {
            NaiveDate::parse_from_str(v, "%Y-%m-%d").map_err(|_| {
                AppError::Validation(format!("Field '{}' must be a date (YYYY-MM-DD)", name))
            })
        })
        .transpose()
}

impl EmployeeInput {
    fn from_form(form: &MultipartForm) -> AppResult<Self> {
        let base_salary = match form.text("base_salary") {
            Some(v) => Decimal::from_str(v).map_err(|_| {
                AppError::Validation("Field 'base_salary' must be a number".to_string())
            })?,
            None => Decimal::ZERO,
        };
        if base_salary < Decimal::ZERO {
            return Err(AppError::Validation("Base salary cannot be negative".to_string()));
        }
        validate_amount(base_salary, "Base salary")?;

        let status = match form.text("status") {
            Some(v) => EmployeeStatus::parse(v).ok_or_else(|| {
                AppError::Validation("Field 'status' must be 'active' or 'inactive'".to_string())
            })?,
            None => EmployeeStatus::Active,
        };

        Ok(EmployeeInput {
            employee_code: required(form, "employee_code")?.to_string(),
            first_names: required(form, "first_names")?.to_string(),
            last_names: required(form, "last_names")?.to_string(),
            dpi: required(form, "dpi")?.to_string(),
            birth_date: parse_date(form, "birth_date")?,
            phone: form.text("phone").map(str::to_string),
            address: form.text("address").map(str::to_string),
            pay_segment_id: parse_uuid(form, "pay_segment_id")?,
            department_id: parse_uuid(form, "department_id")?,
            position_id: parse_uuid(form, "position_id")?,
            status,
            hire_date: parse_date(form, "hire_date")?,
            base_salary,
        })
    }
}

/// Stored names of the files uploaded with the form, if any
#[derive(Debug, Default)]
struct StoredFiles {
    photo: Option<String>,
    dpi_scan: Option<String>,
}

impl StoredFiles {
    /// Delete what was written for a request whose row never got saved
    async fn discard(&self, config: &Config) {
        if let Some(name) = &self.photo {
            uploads::remove(&config.photos_dir(), name).await;
        }
        if let Some(name) = &self.dpi_scan {
            uploads::remove(&config.dpi_scans_dir(), name).await;
        }
    }
}

async fn store_files(config: &Config, form: &MultipartForm) -> AppResult<StoredFiles> {
    let mut stored = StoredFiles::default();

    if let Some(file) = form.file("photo") {
        let name = uploads::generated_name("photo", file.original_name.as_deref(), ".jpg");
        uploads::store(&config.photos_dir(), &name, &file.bytes).await?;
        stored.photo = Some(name);
    }
    if let Some(file) = form.file("dpi_scan") {
        let name = uploads::generated_name("dpi", file.original_name.as_deref(), ".pdf");
        if let Err(e) = uploads::store(&config.dpi_scans_dir(), &name, &file.bytes).await {
            stored.discard(config).await;
            return Err(e);
        }
        stored.dpi_scan = Some(name);
    }

    Ok(stored)
}

fn detail(config: &Config, employee: Employee) -> EmployeeDetail {
    EmployeeDetail {
        photo_url: employee.photo_path.as_deref().map(|p| config.photo_url(p)),
        dpi_url: employee.dpi_scan_path.as_deref().map(|p| config.dpi_scan_url(p)),
        employee,
    }
}

/// List employees with their position, department and pay segment
#[utoipa::path(
    get,
    path = "/api/v1/employees",
    responses((status = 200, description = "List of employees", body = Vec<EmployeeListItem>)),
    tag = "Employees"
)]
pub async fn list_employees(State(state): State<AppState>) -> AppResult<Json<Vec<EmployeeListItem>>> {
    let mut employees = sqlx::query_as::<_, EmployeeListItem>(
        r#"SELECT e.id, e.employee_code,
                  CONCAT(e.first_names, ' ', e.last_names) AS full_name,
                  e.dpi, p.name AS position, d.name AS department,
                  s.code AS pay_segment_code, e.status, e.phone, e.hire_date,
                  e.base_salary, e.photo_path, e.dpi_scan_path
           FROM employees e
           JOIN pay_segments s ON s.id = e.pay_segment_id
           JOIN departments d ON d.id = e.department_id
           JOIN positions p ON p.id = e.position_id
           ORDER BY e.employee_code"#,
    )
    .fetch_all(&state.db)
    .await?;

    for employee in &mut employees {
        employee.photo_url = employee.photo_path.as_deref().map(|p| state.config.photo_url(p));
        employee.dpi_url = employee
            .dpi_scan_path
            .as_deref()
            .map(|p| state.config.dpi_scan_url(p));
    }

    Ok(Json(employees))
}

/// Search employees by DPI, employee code or name
#[utoipa::path(
    get,
    path = "/api/v1/employees/search",
    params(SearchQuery),
    responses((status = 200, description = "Up to 20 matches", body = Vec<EmployeeSearchResult>)),
    tag = "Employees"
)]
pub async fn search_employees(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<EmployeeSearchResult>>> {
    let term = query.q.as_deref().map(str::trim).unwrap_or_default();
    if term.is_empty() {
        return Ok(Json(vec![]));
    }

    let pattern = format!("%{}%", escape_like(term));
    let results = sqlx::query_as::<_, EmployeeSearchResult>(
        r#"SELECT e.id, e.employee_code,
                  CONCAT(e.first_names, ' ', e.last_names) AS full_name,
                  e.dpi, s.code AS pay_segment_code
           FROM employees e
           JOIN pay_segments s ON s.id = e.pay_segment_id
           WHERE e.dpi ILIKE $1
              OR e.employee_code ILIKE $1
              OR CONCAT(e.first_names, ' ', e.last_names) ILIKE $1
           ORDER BY e.employee_code
           LIMIT 20"#,
    )
    .bind(pattern)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(results))
}

fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Get a single employee
#[utoipa::path(
    get,
    path = "/api/v1/employees/{employee_id}",
    params(("employee_id" = Uuid, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee detail", body = EmployeeDetail),
        (status = 404, description = "Employee not found"),
    ),
    tag = "Employees"
)]
pub async fn get_employee(
    State(state): State<AppState>,
    Path(employee_id): Path<Uuid>,
) -> AppResult<Json<EmployeeDetail>> {
    let employee = sqlx::query_as::<_, Employee>(&format!(
        "SELECT {} FROM employees WHERE id = $1",
        EMPLOYEE_COLUMNS
    ))
    .bind(employee_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", employee_id)))?;

    Ok(Json(detail(&state.config, employee)))
}

/// Register a new employee (multipart, optional `photo` and `dpi_scan` files)
#[utoipa::path(
    post,
    path = "/api/v1/employees",
    request_body(content = EmployeeForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Employee created", body = EmployeeDetail),
        (status = 400, description = "Invalid or missing fields"),
        (status = 409, description = "Employee code or DPI already registered"),
    ),
    tag = "Employees"
)]
pub async fn create_employee(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<EmployeeDetail>)> {
    let form = MultipartForm::read(multipart).await?;
    let input = EmployeeInput::from_form(&form)?;
    let files = store_files(&state.config, &form).await?;

    let saved = sqlx::query_as::<_, Employee>(&format!(
        r#"INSERT INTO employees (
            id, employee_code, first_names, last_names, dpi, birth_date, phone, address,
            pay_segment_id, department_id, position_id, status, hire_date, base_salary,
            photo_path, dpi_scan_path, created_at, updated_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14,$15,$16,NOW(),NOW())
        RETURNING {}"#,
        EMPLOYEE_COLUMNS
    ))
    .bind(Uuid::new_v4())
    .bind(&input.employee_code)
    .bind(&input.first_names)
    .bind(&input.last_names)
    .bind(&input.dpi)
    .bind(input.birth_date)
    .bind(&input.phone)
    .bind(&input.address)
    .bind(input.pay_segment_id)
    .bind(input.department_id)
    .bind(input.position_id)
    .bind(input.status)
    .bind(input.hire_date)
    .bind(input.base_salary)
    .bind(&files.photo)
    .bind(&files.dpi_scan)
    .fetch_one(&state.db)
    .await;

    let employee = match saved {
        Ok(employee) => employee,
        Err(e) => {
            files.discard(&state.config).await;
            return Err(e.into());
        }
    };

    info!("Employee {} ({}) registered", employee.id, employee.employee_code);
    Ok((StatusCode::CREATED, Json(detail(&state.config, employee))))
}

/// Update an employee; files already on record are kept unless replaced
#[utoipa::path(
    put,
    path = "/api/v1/employees/{employee_id}",
    request_body(content = EmployeeForm, content_type = "multipart/form-data"),
    params(("employee_id" = Uuid, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee updated", body = EmployeeDetail),
        (status = 400, description = "Invalid or missing fields"),
        (status = 404, description = "Employee not found"),
    ),
    tag = "Employees"
)]
pub async fn update_employee(
    State(state): State<AppState>,
    Path(employee_id): Path<Uuid>,
    multipart: Multipart,
) -> AppResult<Json<EmployeeDetail>> {
    let form = MultipartForm::read(multipart).await?;
    let input = EmployeeInput::from_form(&form)?;
    let files = store_files(&state.config, &form).await?;

    let saved = sqlx::query_as::<_, Employee>(&format!(
        r#"UPDATE employees SET
            employee_code  = $1,
            first_names    = $2,
            last_names     = $3,
            dpi            = $4,
            birth_date     = $5,
            phone          = $6,
            address        = $7,
            pay_segment_id = $8,
            department_id  = $9,
            position_id    = $10,
            status         = $11,
            hire_date      = $12,
            base_salary    = $13,
            photo_path     = COALESCE($14, photo_path),
            dpi_scan_path  = COALESCE($15, dpi_scan_path),
            updated_at     = NOW()
        WHERE id = $16
        RETURNING {}"#,
        EMPLOYEE_COLUMNS
    ))
    .bind(&input.employee_code)
    .bind(&input.first_names)
    .bind(&input.last_names)
    .bind(&input.dpi)
    .bind(input.birth_date)
    .bind(&input.phone)
    .bind(&input.address)
    .bind(input.pay_segment_id)
    .bind(input.department_id)
    .bind(input.position_id)
    .bind(input.status)
    .bind(input.hire_date)
    .bind(input.base_salary)
    .bind(&files.photo)
    .bind(&files.dpi_scan)
    .bind(employee_id)
    .fetch_optional(&state.db)
    .await
    .map_err(AppError::from)
    .and_then(|row| {
        row.ok_or_else(|| AppError::NotFound(format!("Employee {} not found", employee_id)))
    });

    let employee = match saved {
        Ok(employee) => employee,
        Err(e) => {
            files.discard(&state.config).await;
            return Err(e);
        }
    };

    Ok(Json(detail(&state.config, employee)))
}

/// Deactivate an employee
#[utoipa::path(
    delete,
    path = "/api/v1/employees/{employee_id}",
    params(("employee_id" = Uuid, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee deactivated"),
        (status = 404, description = "Employee not found"),
    ),
    tag = "Employees"
)]
pub async fn deactivate_employee(
    State(state): State<AppState>,
    Path(employee_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let result = sqlx::query(
        "UPDATE employees SET status = 'inactive', updated_at = NOW() WHERE id = $1",
    )
    .bind(employee_id)
    .execute(&state.db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Employee {} not found", employee_id)));
    }

    Ok(Json(serde_json::json!({ "message": "Employee deactivated successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn form(pairs: &[(&str, &str)]) -> MultipartForm {
        let mut form = MultipartForm::default();
        for (k, v) in pairs {
            form.fields.insert(k.to_string(), v.to_string());
        }
        form
    }

    fn complete() -> Vec<(&'static str, &'static str)> {
        vec![
            ("employee_code", "EMP-010"),
            ("first_names", "María José"),
            ("last_names", "García Pérez"),
            ("dpi", "2456789010101"),
            ("pay_segment_id", "6f1c1f0e-3c55-4c3a-9a36-7b1f6b0a8c01"),
            ("department_id", "0b8f3d4e-3b1a-4a52-8d44-2f0a6f1d2e03"),
            ("position_id", "a2b9c8d7-1e2f-4a5b-9c8d-7e6f5a4b3c02"),
        ]
    }

    #[tokio::test]
    async fn discard_removes_written_files() {
        let config = Config::for_tests();
        let mut form = MultipartForm::default();
        for (field, name) in [("photo", "cara.jpg"), ("dpi_scan", "dpi.pdf")] {
            form.files.push(uploads::UploadedFile {
                field: field.to_string(),
                original_name: Some(name.to_string()),
                bytes: axum::body::Bytes::from_static(b"data"),
            });
        }

        let files = store_files(&config, &form).await.unwrap();
        let photo = config.photos_dir().join(files.photo.as_deref().unwrap());
        let dpi_scan = config.dpi_scans_dir().join(files.dpi_scan.as_deref().unwrap());
        assert!(photo.exists());
        assert!(dpi_scan.exists());

        files.discard(&config).await;
        assert!(!photo.exists());
        assert!(!dpi_scan.exists());
    }

    #[test]
    fn minimal_form_uses_defaults() {
        let input = EmployeeInput::from_form(&form(&complete())).unwrap();
        assert_eq!(input.status, EmployeeStatus::Active);
        assert_eq!(input.base_salary, Decimal::ZERO);
        assert_eq!(input.birth_date, None);
        assert_eq!(input.first_names, "María José");
    }

    #[test]
    fn optional_fields_are_parsed() {
        let mut pairs = complete();
        pairs.push(("base_salary", "4500.45"));
        pairs.push(("hire_date", "2024-02-01"));
        pairs.push(("status", "INACTIVO"));
        let input = EmployeeInput::from_form(&form(&pairs)).unwrap();
        assert_eq!(input.base_salary, dec!(4500.45));
        assert_eq!(input.hire_date, NaiveDate::from_ymd_opt(2024, 2, 1));
        assert_eq!(input.status, EmployeeStatus::Inactive);
    }

    #[test]
    fn missing_required_field_is_a_validation_error() {
        let pairs: Vec<_> = complete().into_iter().filter(|(k, _)| *k != "dpi").collect();
        let err = EmployeeInput::from_form(&form(&pairs)).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("dpi")));
    }

    #[test]
    fn malformed_values_are_rejected() {
        for (key, bad) in [
            ("base_salary", "mil"),
            ("base_salary", "-1"),
            ("base_salary", "4500.456"),
            ("base_salary", "100000000000"),
            ("hire_date", "01/02/2024"),
            ("pay_segment_id", "7"),
            ("status", "retired"),
        ] {
            let mut pairs: Vec<_> = complete().into_iter().filter(|(k, _)| *k != key).collect();
            pairs.push((key, bad));
            assert!(
                EmployeeInput::from_form(&form(&pairs)).is_err(),
                "{}={} should fail",
                key,
                bad
            );
        }
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_a"), "50\\%\\_a");
    }

    #[test]
    fn detail_builds_file_urls() {
        let config = Config::for_tests();
        let input = EmployeeInput::from_form(&form(&complete())).unwrap();
        let employee = Employee {
            id: Uuid::new_v4(),
            employee_code: input.employee_code,
            first_names: input.first_names,
            last_names: input.last_names,
            dpi: input.dpi,
            birth_date: None,
            phone: None,
            address: None,
            pay_segment_id: input.pay_segment_id,
            department_id: input.department_id,
            position_id: input.position_id,
            status: input.status,
            hire_date: None,
            base_salary: input.base_salary,
            photo_path: Some("photo-1.jpg".to_string()),
            dpi_scan_path: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        let d = detail(&config, employee);
        assert_eq!(
            d.photo_url.as_deref(),
            Some("http://localhost:4000/uploads/employee-photos/photo-1.jpg")
        );
        assert_eq!(d.dpi_url, None);
    }
}
