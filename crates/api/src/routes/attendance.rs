use axum::{
    Json,
    extract::{Path, State},
};
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, state::AppState};
use aula_db::models::{Activity, AttendanceRecord, SessionEvent};
use aula_services::attendance::{AttendanceUpdate, BatchReport, MarkUpdate, NewAttendance};

#[derive(Debug, Deserialize)]
pub struct CreateAttendanceRequest {
    pub classroom_id: String,
    pub account_id: String,
    pub date: String,
}

/// `Option` distinguishes "field omitted" from "set to a falsy value";
/// `present: false` and `duration: 0` are honored assignments.
#[derive(Debug, Deserialize)]
pub struct UpdateAttendanceRequest {
    pub present: Option<bool>,
    pub duration: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct AppendSessionRequest {
    pub activity: Activity,
}

#[derive(Debug, Deserialize)]
pub struct MarkBatchRequest {
    pub attendances: Vec<MarkItem>,
}

#[derive(Debug, Deserialize)]
pub struct MarkItem {
    pub id: String,
    pub present: bool,
}

#[derive(Debug, Serialize)]
pub struct AttendanceResponse {
    pub id: String,
    pub classroom_id: String,
    pub account_id: String,
    pub date: String,
    pub present: bool,
    pub duration: u64,
    pub session: Vec<SessionEvent>,
}

fn parse_id(raw: &str, what: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("Invalid {what}")))
}

fn to_response(r: AttendanceRecord) -> AttendanceResponse {
    AttendanceResponse {
        id: r.id.map(|id| id.to_hex()).unwrap_or_default(),
        classroom_id: r.classroom_id.to_hex(),
        account_id: r.account_id,
        date: r.date,
        present: r.present,
        duration: r.duration,
        session: r.session,
    }
}

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateAttendanceRequest>,
) -> Result<Json<AttendanceResponse>, ApiError> {
    let classroom_id = parse_id(&body.classroom_id, "classroom_id")?;

    let record = state
        .attendance
        .create(NewAttendance {
            classroom_id,
            account_id: body.account_id,
            date: body.date,
        })
        .await?;

    Ok(Json(to_response(record)))
}

pub async fn get(
    State(state): State<AppState>,
    Path(attendance_id): Path<String>,
) -> Result<Json<AttendanceResponse>, ApiError> {
    let id = parse_id(&attendance_id, "attendance_id")?;
    let record = state.attendance.get(id).await?;
    Ok(Json(to_response(record)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(attendance_id): Path<String>,
    Json(body): Json<UpdateAttendanceRequest>,
) -> Result<Json<AttendanceResponse>, ApiError> {
    let id = parse_id(&attendance_id, "attendance_id")?;

    let record = state
        .attendance
        .update_fields(
            id,
            AttendanceUpdate {
                present: body.present,
                duration: body.duration,
            },
        )
        .await?;

    Ok(Json(to_response(record)))
}

pub async fn append_session(
    State(state): State<AppState>,
    Path(attendance_id): Path<String>,
    Json(body): Json<AppendSessionRequest>,
) -> Result<Json<AttendanceResponse>, ApiError> {
    let id = parse_id(&attendance_id, "attendance_id")?;
    let record = state.attendance.append_event(id, body.activity).await?;
    Ok(Json(to_response(record)))
}

pub async fn mark_batch(
    State(state): State<AppState>,
    Json(body): Json<MarkBatchRequest>,
) -> Result<Json<BatchReport>, ApiError> {
    let mut updates = Vec::with_capacity(body.attendances.len());
    for item in body.attendances {
        updates.push(MarkUpdate {
            id: parse_id(&item.id, "attendance id")?,
            present: item.present,
        });
    }

    let report = state.attendance.mark_batch(updates).await;
    Ok(Json(report))
}

pub async fn list_by_classroom(
    State(state): State<AppState>,
    Path(classroom_id): Path<String>,
) -> Result<Json<Vec<AttendanceResponse>>, ApiError> {
    let id = parse_id(&classroom_id, "classroom_id")?;
    let records = state.attendance.list_by_classroom(id).await?;
    Ok(Json(records.into_iter().map(to_response).collect()))
}

pub async fn list_by_classroom_and_date(
    State(state): State<AppState>,
    Path((classroom_id, date)): Path<(String, String)>,
) -> Result<Json<Vec<AttendanceResponse>>, ApiError> {
    let id = parse_id(&classroom_id, "classroom_id")?;
    let records = state.attendance.list_by_classroom_and_date(id, &date).await?;
    Ok(Json(records.into_iter().map(to_response).collect()))
}

pub async fn get_by_triple(
    State(state): State<AppState>,
    Path((classroom_id, date, account_id)): Path<(String, String, String)>,
) -> Result<Json<AttendanceResponse>, ApiError> {
    let id = parse_id(&classroom_id, "classroom_id")?;
    let record = state.attendance.get_by_triple(id, &account_id, &date).await?;
    Ok(Json(to_response(record)))
}
