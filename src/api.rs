//! REST API handlers for Shift Scheduling.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use crate::config::AppConfig;
use crate::constraints::validate_assignments;
use crate::demo_data::{self, DemoData};
use crate::domain::{SavedSchedule, WorkRules};
use crate::dto::{AnalyzeRequest, SaveScheduleRequest, ScheduleInputDto, StaffPresetRequest};
use crate::engine::GeneratedSchedule;
use crate::export::ExportKind;
use crate::planner::{plan, PlanError};
use crate::scoring::RandomTieBreak;
use crate::store::{ScheduleStore, ScheduleSummary, StaffPreset, StoreError};
use crate::validation::{validate_inputs, validate_preset, validate_work_rules};

/// Application state shared across handlers.
pub struct AppState {
    pub store: ScheduleStore,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(config: AppConfig, store: ScheduleStore) -> Self {
        Self { store, config }
    }

    /// State with an in-memory store, mainly for tests.
    pub fn in_memory(config: AppConfig) -> Self {
        let store = ScheduleStore::in_memory(config.work_rules);
        Self::new(config, store)
    }

    /// Fresh tie-break source for one generation run.
    fn tie_break(&self) -> RandomTieBreak {
        match self.config.random_seed {
            Some(seed) => RandomTieBreak::seeded(seed),
            None => RandomTieBreak::from_entropy(),
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Error body: one message per problem, plus the rejected schedule when
/// generation ran but broke hard constraints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<GeneratedSchedule>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(status: StatusCode, errors: Vec<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            errors,
            preview: None,
        }),
    )
}

fn plan_error(err: PlanError) -> ApiError {
    let errors = err.messages();
    match err {
        PlanError::InvalidInput(_) => error_response(StatusCode::BAD_REQUEST, errors),
        PlanError::Infeasible { preview, .. } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse {
                errors,
                preview: Some(preview),
            }),
        ),
    }
}

fn store_error(err: StoreError) -> ApiError {
    error!(error = %err, "Schedule store write failed");
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        vec!["could not persist schedules".to_string()],
    )
}

// ============================================================================
// Router and Handlers
// ============================================================================

/// Creates the API router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health & Info
        .route("/health", get(health))
        .route("/info", get(info))
        // Demo data
        .route("/demo-data", get(list_demo_data))
        .route("/demo-data/{id}", get(get_demo_data))
        // Schedules
        .route("/schedules", get(list_schedules).post(create_schedule))
        .route("/schedules/validate", post(validate_schedule))
        .route("/schedules/preview", post(preview_schedule))
        .route("/schedules/analyze", put(analyze_schedule))
        .route("/schedules/{id}", get(get_schedule).delete(delete_schedule))
        .route("/schedules/{id}/export/{kind}", get(export_schedule))
        // Work rules
        .route("/work-rules", get(get_work_rules).put(put_work_rules))
        // Staff presets
        .route("/staff-presets", get(list_staff_presets).post(save_staff_preset))
        .route("/staff-presets/{id}", get(get_staff_preset).delete(delete_staff_preset))
        .with_state(state)
}

// ============================================================================
// Health & Info
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET /health - Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "UP" })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub engine: &'static str,
}

/// GET /info - Application info endpoint.
async fn info() -> Json<InfoResponse> {
    Json(InfoResponse {
        name: "Shift Scheduling",
        version: env!("CARGO_PKG_VERSION"),
        engine: "greedy score-fill",
    })
}

/// GET /demo-data - List available demo data sets.
async fn list_demo_data() -> Json<Vec<&'static str>> {
    Json(demo_data::list_demo_data())
}

/// GET /demo-data/{id} - Get a specific demo input.
async fn get_demo_data(Path(id): Path<String>) -> Result<Json<ScheduleInputDto>, StatusCode> {
    match id.parse::<DemoData>() {
        Ok(demo) => Ok(Json(ScheduleInputDto::from_input(&demo_data::generate(demo)))),
        Err(_) => Err(StatusCode::NOT_FOUND),
    }
}

// ============================================================================
// Schedules
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResponse {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// POST /schedules/validate - Check an input without generating.
async fn validate_schedule(
    State(state): State<Arc<AppState>>,
    Json(dto): Json<ScheduleInputDto>,
) -> Json<ValidationResponse> {
    let input = dto.to_input(state.store.work_rules());
    let errors: Vec<String> = validate_inputs(&input).iter().map(ToString::to_string).collect();
    Json(ValidationResponse {
        valid: errors.is_empty(),
        errors,
    })
}

/// POST /schedules/preview - Generate without saving.
async fn preview_schedule(
    State(state): State<Arc<AppState>>,
    Json(dto): Json<ScheduleInputDto>,
) -> Result<Json<GeneratedSchedule>, ApiError> {
    let input = dto.to_input(state.store.work_rules());
    let generated = plan(&input, &mut state.tie_break()).map_err(plan_error)?;
    Ok(Json(generated))
}

/// POST /schedules - Generate and save a schedule.
///
/// With `editSourceScheduleId` the saved schedule replaces that one and keeps
/// its creation time. The input's work rules become the saved defaults.
async fn create_schedule(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SaveScheduleRequest>,
) -> Result<(StatusCode, Json<SavedSchedule>), ApiError> {
    let input = body.input.to_input(state.store.work_rules());
    let start = Instant::now();
    let generated = plan(&input, &mut state.tie_break()).map_err(plan_error)?;

    let id = body
        .edit_source_schedule_id
        .clone()
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let saved = SavedSchedule::new(
        id,
        &input,
        generated.assignments,
        generated.stats,
        body.edit_source_schedule_id,
    )
    .ok_or_else(|| {
        error_response(StatusCode::BAD_REQUEST, vec!["period is malformed".to_string()])
    })?;

    let saved = state
        .store
        .save_schedule(saved, input.work_rules)
        .map_err(store_error)?;

    info!(
        schedule_id = %saved.id,
        days = saved.assignments.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Saved schedule"
    );
    Ok((StatusCode::CREATED, Json(saved)))
}

/// GET /schedules - List saved schedules, newest first.
async fn list_schedules(State(state): State<Arc<AppState>>) -> Json<Vec<ScheduleSummary>> {
    Json(state.store.list())
}

/// GET /schedules/{id} - Get a saved schedule.
async fn get_schedule(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SavedSchedule>, StatusCode> {
    state.store.get(&id).map(Json).ok_or(StatusCode::NOT_FOUND)
}

/// DELETE /schedules/{id} - Remove a saved schedule.
async fn delete_schedule(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    match state.store.delete(&id).map_err(store_error)? {
        true => Ok(StatusCode::NO_CONTENT),
        false => Err(error_response(
            StatusCode::NOT_FOUND,
            vec![format!("no schedule with id '{}'", id)],
        )),
    }
}

/// GET /schedules/{id}/export/{kind} - Download a saved schedule as CSV.
///
/// Refused with 409 if the stored assignments no longer pass the hard
/// constraint check.
async fn export_schedule(
    State(state): State<Arc<AppState>>,
    Path((id, kind)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let not_found = |what: String| error_response(StatusCode::NOT_FOUND, vec![what]);
    let kind: ExportKind = kind
        .parse()
        .map_err(|_| not_found(format!("unknown export kind '{}'", kind)))?;
    let schedule = state
        .store
        .get(&id)
        .ok_or_else(|| not_found(format!("no schedule with id '{}'", id)))?;

    let violations = validate_assignments(&schedule.to_input(), &schedule.assignments);
    if !violations.is_empty() {
        return Err(error_response(
            StatusCode::CONFLICT,
            violations.iter().map(ToString::to_string).collect(),
        ));
    }

    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", kind.filename(&schedule)),
        ),
    ];
    Ok((headers, kind.render(&schedule)).into_response())
}

/// One hard-constraint violation found by analysis.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationDto {
    #[serde(rename = "dateISO")]
    pub date: NaiveDate,
    pub message: String,
}

/// Response for schedule analysis.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub feasible: bool,
    pub violations: Vec<ViolationDto>,
}

/// PUT /schedules/analyze - Re-check edited assignments against their input.
async fn analyze_schedule(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let input = body.input.to_input(state.store.work_rules());
    let errors = validate_inputs(&input);
    if !errors.is_empty() {
        return Err(plan_error(PlanError::InvalidInput(errors)));
    }

    let violations: Vec<ViolationDto> = validate_assignments(&input, &body.assignments)
        .iter()
        .map(|v| ViolationDto {
            date: v.date(),
            message: v.to_string(),
        })
        .collect();
    Ok(Json(AnalyzeResponse {
        feasible: violations.is_empty(),
        violations,
    }))
}

// ============================================================================
// Work rules
// ============================================================================

/// GET /work-rules - Saved rules, or the configured defaults.
async fn get_work_rules(State(state): State<Arc<AppState>>) -> Json<WorkRules> {
    Json(state.store.work_rules())
}

/// PUT /work-rules - Replace the saved rules.
async fn put_work_rules(
    State(state): State<Arc<AppState>>,
    Json(rules): Json<WorkRules>,
) -> Result<Json<WorkRules>, ApiError> {
    let errors = validate_work_rules(&rules);
    if !errors.is_empty() {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            errors.iter().map(ToString::to_string).collect(),
        ));
    }
    state.store.save_work_rules(rules).map_err(store_error)?;
    Ok(Json(rules))
}

// ============================================================================
// Staff presets
// ============================================================================

/// GET /staff-presets - Saved rosters, newest first.
async fn list_staff_presets(State(state): State<Arc<AppState>>) -> Json<Vec<StaffPreset>> {
    Json(state.store.staff_presets())
}

/// POST /staff-presets - Save a named roster.
async fn save_staff_preset(
    State(state): State<Arc<AppState>>,
    Json(body): Json<StaffPresetRequest>,
) -> Result<(StatusCode, Json<StaffPreset>), ApiError> {
    let errors = validate_preset(&body.name, &body.staff);
    if !errors.is_empty() {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            errors.iter().map(ToString::to_string).collect(),
        ));
    }
    let preset = StaffPreset {
        id: body.id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
        name: body.name.trim().to_string(),
        staff: body.staff,
        updated_at: chrono::Utc::now(),
    };
    let preset = state
        .store
        .upsert_staff_preset(preset)
        .map_err(store_error)?;
    info!(preset_id = %preset.id, staff = preset.staff.len(), "Saved staff preset");
    Ok((StatusCode::CREATED, Json(preset)))
}

/// GET /staff-presets/{id} - Get a saved roster.
async fn get_staff_preset(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<StaffPreset>, StatusCode> {
    state.store.staff_preset(&id).map(Json).ok_or(StatusCode::NOT_FOUND)
}

/// DELETE /staff-presets/{id} - Remove a saved roster.
async fn delete_staff_preset(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    match state.store.delete_staff_preset(&id).map_err(store_error)? {
        true => Ok(StatusCode::NO_CONTENT),
        false => Err(error_response(
            StatusCode::NOT_FOUND,
            vec![format!("no staff preset with id '{}'", id)],
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        let config = AppConfig {
            random_seed: Some(1),
            ..AppConfig::default()
        };
        router(Arc::new(AppState::in_memory(config)))
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Vec<u8>) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    async fn send_json(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let (status, bytes) = send(app, method, uri, body).await;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn feasible_input() -> Value {
        json!({
            "startDateISO": "2025-05-05",
            "endDateISO": "2025-05-11",
            "staff": [
                {"id": "o", "name": "Olive", "availableShifts": ["open", "middle"], "priority": {"open": 2}},
                {"id": "c", "name": "Cara", "availableShifts": ["close"], "priority": {"close": 2}},
                {"id": "f", "name": "Finn", "availableShifts": ["open", "middle", "close"]}
            ],
            "requests": [
                {"dateISO": "2025-05-06", "offStaffIds": ["o"]},
                {"dateISO": "2025-05-07", "needBoost": true}
            ]
        })
    }

    fn infeasible_input() -> Value {
        json!({
            "startDateISO": "2025-05-05",
            "endDateISO": "2025-05-05",
            "staff": [
                {"id": "o", "name": "Olive", "availableShifts": ["open"]},
                {"id": "c", "name": "Cara", "availableShifts": ["close"]}
            ],
            "requests": [{"dateISO": "2025-05-05", "offStaffIds": ["o"]}]
        })
    }

    #[tokio::test]
    async fn test_health_and_info() {
        let app = app();
        let (status, body) = send_json(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "UP");

        let (_, body) = send_json(&app, "GET", "/info", None).await;
        assert_eq!(body["name"], "Shift Scheduling");
    }

    #[tokio::test]
    async fn test_demo_data_routes() {
        let app = app();
        let (_, body) = send_json(&app, "GET", "/demo-data", None).await;
        assert_eq!(body, json!(["SMALL", "LARGE"]));

        let (status, body) = send_json(&app, "GET", "/demo-data/SMALL", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["staff"].as_array().unwrap().len(), 5);
        assert_eq!(body["startDateISO"], "2025-03-03");

        let (status, _) = send_json(&app, "GET", "/demo-data/HUGE", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_validate_reports_all_errors() {
        let app = app();
        let body = json!({"startDateISO": "2025-05-10", "endDateISO": "2025-05-01", "staff": []});
        let (status, body) = send_json(&app, "POST", "/schedules/validate", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["valid"], false);
        assert_eq!(body["errors"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_preview() {
        let app = app();
        let (status, body) =
            send_json(&app, "POST", "/schedules/preview", Some(feasible_input())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["assignments"].as_array().unwrap().len(), 7);
        assert_eq!(body["stats"].as_array().unwrap().len(), 3);
        // needBoost on 05-07 raises the target from 2 to 3.
        let boosted = &body["assignments"][2]["byShift"];
        let units: f64 = ["open", "middle", "close"]
            .iter()
            .flat_map(|s| boosted[*s].as_array().unwrap().iter())
            .map(|slot| slot["unit"].as_f64().unwrap())
            .sum();
        assert_eq!(units, 3.0);

        let (list_status, list) = send_json(&app, "GET", "/schedules", None).await;
        assert_eq!(list_status, StatusCode::OK);
        assert_eq!(list, json!([]));
    }

    #[tokio::test]
    async fn test_infeasible_preview_returns_violations() {
        let app = app();
        let (status, body) =
            send_json(&app, "POST", "/schedules/preview", Some(infeasible_input())).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let errors = body["errors"].as_array().unwrap();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].as_str().unwrap().contains("2025-05-05"));
        assert_eq!(body["preview"]["assignments"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_infeasible_schedule_is_not_saved() {
        let app = app();
        let (status, _) = send_json(&app, "POST", "/schedules", Some(infeasible_input())).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let (_, list) = send_json(&app, "GET", "/schedules", None).await;
        assert_eq!(list, json!([]));
    }

    #[tokio::test]
    async fn test_schedule_lifecycle() {
        let app = app();
        let (status, saved) = send_json(&app, "POST", "/schedules", Some(feasible_input())).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = saved["id"].as_str().unwrap().to_string();
        assert_eq!(saved["year"], 2025);
        assert_eq!(saved["month"], 5);

        let (status, fetched) = send_json(&app, "GET", &format!("/schedules/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["assignments"], saved["assignments"]);

        let (status, csv) =
            send(&app, "GET", &format!("/schedules/{}/export/grid", id), None).await;
        assert_eq!(status, StatusCode::OK);
        let csv = String::from_utf8(csv).unwrap();
        assert!(csv.contains("Name,2025-05-05"));
        assert!(csv.contains("Olive,"));

        let (status, _) = send(&app, "GET", &format!("/schedules/{}/export/pdf", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        // Regenerating from the saved one replaces it in place.
        let mut edit = feasible_input();
        edit["editSourceScheduleId"] = json!(id);
        let (status, edited) = send_json(&app, "POST", "/schedules", Some(edit)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(edited["id"], json!(id));
        assert_eq!(edited["editSourceScheduleId"], json!(id));
        assert_eq!(edited["createdAtISO"], saved["createdAtISO"]);
        let (_, list) = send_json(&app, "GET", "/schedules", None).await;
        assert_eq!(list.as_array().unwrap().len(), 1);

        let (status, _) = send(&app, "DELETE", &format!("/schedules/{}", id), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, "DELETE", &format!("/schedules/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, "GET", &format!("/schedules/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_export_refuses_broken_schedule() {
        let state = Arc::new(AppState::in_memory(AppConfig::default()));
        let input = demo_data::generate(DemoData::Small);
        let broken = SavedSchedule::new("broken", &input, Vec::new(), Vec::new(), None).unwrap();
        state.store.upsert(broken).unwrap();
        let app = router(state);

        let (status, body) = send_json(&app, "GET", "/schedules/broken/export/daily", None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["errors"].as_array().unwrap().len(), 28);
    }

    #[tokio::test]
    async fn test_analyze() {
        let app = app();
        let mut body = infeasible_input();
        body["assignments"] = json!([{
            "dateISO": "2025-05-05",
            "byShift": {"open": [{"staffId": "o", "unit": 1}], "middle": [], "close": [{"staffId": "c", "unit": 0.5}]}
        }]);
        let (status, result) = send_json(&app, "PUT", "/schedules/analyze", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(result["feasible"], false);
        let violations = result["violations"].as_array().unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0]["dateISO"], "2025-05-05");
    }

    #[tokio::test]
    async fn test_work_rules() {
        let app = app();
        let (_, rules) = send_json(&app, "GET", "/work-rules", None).await;
        assert_eq!(rules["dailyStaffBase"], 2.0);

        let bad = json!({"dailyStaffBase": 3, "dailyStaffMax": 2, "workHours": 8, "breakHours": 1});
        let (status, body) = send_json(&app, "PUT", "/work-rules", Some(bad)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"].as_array().unwrap().len(), 1);

        let good = json!({"DAILY_STAFF_BASE": 1.5, "DAILY_STAFF_MAX": 2, "WORK_HOURS": 8, "BREAK_HOURS": 1});
        let (status, _) = send_json(&app, "PUT", "/work-rules", Some(good)).await;
        assert_eq!(status, StatusCode::OK);
        let (_, rules) = send_json(&app, "GET", "/work-rules", None).await;
        assert_eq!(rules["dailyStaffBase"], 1.5);
    }

    #[tokio::test]
    async fn test_staff_presets() {
        let app = app();
        let blank = json!({"name": " ", "staff": []});
        let (status, body) = send_json(&app, "POST", "/staff-presets", Some(blank)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"].as_array().unwrap().len(), 2);

        let roster = feasible_input()["staff"].clone();
        let body = json!({"name": "Core team", "staff": roster});
        let (status, saved) = send_json(&app, "POST", "/staff-presets", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = saved["id"].as_str().unwrap().to_string();
        assert_eq!(saved["staff"].as_array().unwrap().len(), 3);

        let rename = json!({"id": id, "name": "Core team v2", "staff": roster});
        send_json(&app, "POST", "/staff-presets", Some(rename)).await;
        let (_, list) = send_json(&app, "GET", "/staff-presets", None).await;
        assert_eq!(list.as_array().unwrap().len(), 1);
        assert_eq!(list[0]["name"], "Core team v2");

        let uri = format!("/staff-presets/{}", id);
        let (status, fetched) = send_json(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["staff"][1]["name"], "Cara");

        let (status, _) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_failed_save_stores_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();
        let config = AppConfig {
            random_seed: Some(1),
            ..AppConfig::default()
        };
        let store = ScheduleStore::open(blocker.join("schedules.json"), config.work_rules);
        let app = router(Arc::new(AppState::new(config, store)));

        let mut input = feasible_input();
        input["workRules"] =
            json!({"dailyStaffBase": 1.5, "dailyStaffMax": 2, "workHours": 8, "breakHours": 1});
        let (status, _) = send_json(&app, "POST", "/schedules", Some(input)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let (_, list) = send_json(&app, "GET", "/schedules", None).await;
        assert_eq!(list, json!([]));
        let (_, rules) = send_json(&app, "GET", "/work-rules", None).await;
        assert_eq!(rules["dailyStaffBase"], 2.0);
    }
}
