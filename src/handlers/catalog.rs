// src/handlers/catalog.rs

use crate::{
    errors::{AppError, AppResult},
    extract::AppJson,
    models::{CreateCatalogItemRequest, Department, Position},
    state::AppState,
};
use axum::{Json, extract::State, http::StatusCode};
use uuid::Uuid;

fn required_name(body: &CreateCatalogItemRequest, what: &str) -> AppResult<String> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation(format!("The {} name is required", what)));
    }
    if name.chars().count() > 100 {
        return Err(AppError::Validation(format!(
            "The {} name must be at most 100 characters",
            what
        )));
    }
    Ok(name.to_string())
}

/// List departments
#[utoipa::path(
    get,
    path = "/api/v1/departments",
    responses((status = 200, description = "Departments ordered by name", body = Vec<Department>)),
    tag = "Catalogs"
)]
pub async fn list_departments(State(state): State<AppState>) -> AppResult<Json<Vec<Department>>> {
    let departments =
        sqlx::query_as::<_, Department>("SELECT id, name, created_at FROM departments ORDER BY name")
            .fetch_all(&state.db)
            .await?;

    Ok(Json(departments))
}

/// Create a department
#[utoipa::path(
    post,
    path = "/api/v1/departments",
    request_body = CreateCatalogItemRequest,
    responses(
        (status = 201, description = "Department created", body = Department),
        (status = 400, description = "Missing name"),
    ),
    tag = "Catalogs"
)]
pub async fn create_department(
    State(state): State<AppState>,
    AppJson(body): AppJson<CreateCatalogItemRequest>,
) -> AppResult<(StatusCode, Json<Department>)> {
    let name = required_name(&body, "department")?;

    let department = sqlx::query_as::<_, Department>(
        "INSERT INTO departments (id, name, created_at) VALUES ($1, $2, NOW()) RETURNING id, name, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(department)))
}

/// List job positions
#[utoipa::path(
    get,
    path = "/api/v1/positions",
    responses((status = 200, description = "Positions ordered by name", body = Vec<Position>)),
    tag = "Catalogs"
)]
pub async fn list_positions(State(state): State<AppState>) -> AppResult<Json<Vec<Position>>> {
    let positions =
        sqlx::query_as::<_, Position>("SELECT id, name, created_at FROM positions ORDER BY name")
            .fetch_all(&state.db)
            .await?;

    Ok(Json(positions))
}

/// Create a job position
#[utoipa::path(
    post,
    path = "/api/v1/positions",
    request_body = CreateCatalogItemRequest,
    responses(
        (status = 201, description = "Position created", body = Position),
        (status = 400, description = "Missing name"),
    ),
    tag = "Catalogs"
)]
pub async fn create_position(
    State(state): State<AppState>,
    AppJson(body): AppJson<CreateCatalogItemRequest>,
) -> AppResult<(StatusCode, Json<Position>)> {
    let name = required_name(&body, "position")?;

    let position = sqlx::query_as::<_, Position>(
        "INSERT INTO positions (id, name, created_at) VALUES ($1, $2, NOW()) RETURNING id, name, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(position)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_trimmed() {
        let body = CreateCatalogItemRequest {
            name: "  Recursos Humanos ".to_string(),
        };
        assert_eq!(required_name(&body, "department").unwrap(), "Recursos Humanos");
    }

    #[test]
    fn blank_name_is_rejected() {
        let body = CreateCatalogItemRequest {
            name: "   ".to_string(),
        };
        assert!(matches!(
            required_name(&body, "position"),
            Err(AppError::Validation(_))
        ));
    }
}
