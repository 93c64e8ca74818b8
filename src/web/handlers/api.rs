use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

use crate::db::employee::{Employee, NewEmployee};
use crate::db::store::DeleteOutcome;
use crate::nlq::{self, AskError, AskOutcome};
use crate::nlq::shape::Presentable;
use crate::notify::{Notice, NoticeLog, Notifier};
use crate::web::state::AppState;

// Request and response types

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sql: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<Presentable>,
    pub notices: Vec<Notice>,
}

#[derive(Debug, Deserialize)]
pub struct NameFilter {
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EmployeeResponse {
    pub employee: Employee,
    pub notices: Vec<Notice>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    #[serde(flatten)]
    pub outcome: DeleteOutcome,
    pub notices: Vec<Notice>,
}

// System status

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: String,
    pub uptime_seconds: i64,
    pub employee_count: i64,
    pub model: String,
}

// API Implementations

pub async fn create_employee(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewEmployee>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if let Err(e) = payload.validate() {
        return Err((StatusCode::BAD_REQUEST, e.to_string()));
    }

    let log = NoticeLog::new();
    let store = state.store.clone();
    let employee = tokio::task::spawn_blocking(move || store.insert(&payload))
        .await
        .map_err(|e| {
            error!("Database task failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database task failed: {}", e),
            )
        })?
        .map_err(|e| {
            error!("Error adding employee: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error adding employee: {}", e),
            )
        })?;

    log.success(format!("Employee '{}' added successfully!", employee.name));

    Ok((
        StatusCode::CREATED,
        Json(EmployeeResponse {
            employee,
            notices: log.take(),
        }),
    ))
}

pub async fn list_employees(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<NameFilter>,
) -> Result<Json<Vec<Employee>>, (StatusCode, String)> {
    let store = state.store.clone();
    let employees = tokio::task::spawn_blocking(move || match filter.name {
        Some(name) => store.find_by_name(&name),
        None => store.list(),
    })
    .await
    .map_err(|e| {
        error!("Database task failed: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Database task failed: {}", e),
        )
    })?
    .map_err(|e| {
        error!("Error retrieving data: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Error retrieving data: {}", e),
        )
    })?;

    Ok(Json(employees))
}

pub async fn get_employee(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Employee>, (StatusCode, String)> {
    let store = state.store.clone();
    let employee = tokio::task::spawn_blocking(move || store.get(id))
        .await
        .map_err(|e| {
            error!("Database task failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database task failed: {}", e),
            )
        })?
        .map_err(|e| {
            error!("Error searching employee: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error searching employee: {}", e),
            )
        })?;

    match employee {
        Some(employee) => Ok(Json(employee)),
        None => Err((
            StatusCode::NOT_FOUND,
            format!("No employee found with ID '{}'.", id),
        )),
    }
}

pub async fn delete_employee(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>, (StatusCode, String)> {
    let store = state.store.clone();
    let outcome = tokio::task::spawn_blocking(move || store.delete_by_id(id))
        .await
        .map_err(|e| {
            error!("Database task failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database task failed: {}", e),
            )
        })?
        .map_err(|e| {
            error!("Error deleting employee: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error deleting employee: {}", e),
            )
        })?;

    let log = NoticeLog::new();
    match outcome {
        DeleteOutcome::Deleted { .. } => {
            log.success(format!("Employee with ID '{}' removed successfully!", id));
        }
        DeleteOutcome::NotFound => {
            log.warning(format!("No employee found with ID '{}'.", id));
        }
    }

    Ok(Json(DeleteResponse {
        outcome,
        notices: log.take(),
    }))
}

pub async fn delete_employee_by_name(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<NameFilter>,
) -> Result<Json<DeleteResponse>, (StatusCode, String)> {
    let name = match filter.name {
        Some(name) if !name.trim().is_empty() => name,
        _ => {
            return Err((
                StatusCode::BAD_REQUEST,
                "Please provide a name for deletion.".to_string(),
            ));
        }
    };

    let store = state.store.clone();
    let task_name = name.clone();
    let outcome = tokio::task::spawn_blocking(move || store.delete_by_name(&task_name))
        .await
        .map_err(|e| {
            error!("Database task failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database task failed: {}", e),
            )
        })?
        .map_err(|e| {
            error!("Error deleting employee: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error deleting employee: {}", e),
            )
        })?;

    let log = NoticeLog::new();
    match outcome {
        DeleteOutcome::Deleted { count } => {
            log.success(format!(
                "Removed {} record(s) with name '{}'.",
                count, name
            ));
        }
        DeleteOutcome::NotFound => {
            log.warning(format!("No employee found with name '{}'.", name));
        }
    }

    Ok(Json(DeleteResponse {
        outcome,
        notices: log.take(),
    }))
}

// Natural language query

pub async fn ask(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AskRequest>,
) -> Result<Json<AskResponse>, (StatusCode, String)> {
    info!("Question: {}", payload.question);

    let log = NoticeLog::new();
    let outcome = nlq::answer_question(&state.store, &state.llm, &payload.question, &log).await;

    match outcome {
        Ok(AskOutcome::Answered { sql, answer }) => {
            match &answer {
                Presentable::NoData => {
                    log.info("No data found for your query.".to_string());
                }
                Presentable::Scalar { value } => {
                    log.success(format!("The answer is: {}", value));
                }
                Presentable::Table { .. } => {}
            }

            Ok(Json(AskResponse {
                sql: Some(sql),
                answer: Some(answer),
                notices: log.take(),
            }))
        }
        Ok(AskOutcome::Refine { reason }) => {
            log.warning(reason);
            Ok(Json(AskResponse {
                sql: None,
                answer: None,
                notices: log.take(),
            }))
        }
        Err(AskError::EmptyQuestion) => {
            Err((StatusCode::BAD_REQUEST, AskError::EmptyQuestion.to_string()))
        }
        Err(e @ AskError::Execution(_)) => {
            error!("Query execution failed: {}", e);
            Err((StatusCode::BAD_REQUEST, e.to_string()))
        }
        Err(e) => {
            error!("Ask flow failed: {}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

// System status

pub async fn system_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SystemStatus>, (StatusCode, String)> {
    let now = chrono::Utc::now();
    let uptime = now.signed_duration_since(state.startup_time).num_seconds();

    let store = state.store.clone();
    let employee_count = tokio::task::spawn_blocking(move || store.count())
        .await
        .map_err(|e| {
            error!("Database task failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database task failed: {}", e),
            )
        })?
        .map_err(|e| {
            error!("Error counting employees: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error counting employees: {}", e),
            )
        })?;

    Ok(Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: uptime,
        employee_count,
        model: state.config.llm.model.clone(),
    }))
}
