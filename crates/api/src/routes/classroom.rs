use axum::{
    Json,
    extract::{Path, State},
};
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{error::ApiError, state::AppState};
use aula_db::models::{Classroom, ClassroomStatus, ScheduleSlot};
use aula_services::classroom::{ClassroomUpdate, NewClassroom};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateClassroomRequest {
    #[validate(length(min = 1))]
    pub room_name: String,
    #[validate(length(min = 1))]
    pub university_id: String,
    #[validate(length(min = 1))]
    pub account_id: String,
    pub privilege: i32,
    pub teacher_id: Option<String>,
    pub mark_attendance: Option<bool>,
    #[serde(default)]
    pub schedule: Vec<ScheduleSlot>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateClassroomRequest {
    pub privilege: i32,
    pub room_name: Option<String>,
    pub status: Option<ClassroomStatus>,
    pub teacher_id: Option<String>,
    pub mark_attendance: Option<bool>,
    pub weight_age: Option<f64>,
    pub schedule: Option<Vec<ScheduleSlot>>,
}

#[derive(Debug, Deserialize)]
pub struct EndClassroomRequest {
    pub privilege: i32,
}

#[derive(Debug, Deserialize)]
pub struct MemberListRequest {
    pub account_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct MemberResponse {
    pub account_id: String,
    pub final_grade: f64,
}

#[derive(Debug, Serialize)]
pub struct ClassroomResponse {
    pub id: String,
    pub unique_name: String,
    pub university_id: String,
    pub creator_account_id: String,
    pub status: ClassroomStatus,
    pub external_session_id: Option<String>,
    pub teacher_id: Option<String>,
    pub mark_attendance: Option<bool>,
    pub weight_age: f64,
    pub members: Vec<MemberResponse>,
}

fn parse_id(raw: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(raw).map_err(|_| ApiError::BadRequest("Invalid classroom_id".to_string()))
}

fn to_response(c: Classroom) -> ClassroomResponse {
    ClassroomResponse {
        id: c.id.map(|id| id.to_hex()).unwrap_or_default(),
        unique_name: c.unique_name,
        university_id: c.university_id,
        creator_account_id: c.creator_account_id,
        status: c.status,
        external_session_id: c.external_session_id,
        teacher_id: c.teacher_id,
        mark_attendance: c.mark_attendance,
        weight_age: c.weight_age,
        members: c
            .members
            .into_iter()
            .map(|m| MemberResponse {
                account_id: m.account_id,
                final_grade: m.final_grade,
            })
            .collect(),
    }
}

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateClassroomRequest>,
) -> Result<Json<ClassroomResponse>, ApiError> {
    body.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let classroom = state
        .classrooms
        .create(
            body.privilege,
            NewClassroom {
                unique_name: body.room_name,
                university_id: body.university_id,
                creator_account_id: body.account_id,
                teacher_id: body.teacher_id,
                mark_attendance: body.mark_attendance,
                schedule: body.schedule,
                status_callback: Some(state.room_callback_url()),
            },
        )
        .await?;

    Ok(Json(to_response(classroom)))
}

pub async fn get(
    State(state): State<AppState>,
    Path(classroom_id): Path<String>,
) -> Result<Json<ClassroomResponse>, ApiError> {
    let id = parse_id(&classroom_id)?;
    let classroom = state.classrooms.get(id).await?;
    Ok(Json(to_response(classroom)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(classroom_id): Path<String>,
    Json(body): Json<UpdateClassroomRequest>,
) -> Result<Json<ClassroomResponse>, ApiError> {
    let id = parse_id(&classroom_id)?;

    let classroom = state
        .classrooms
        .update(
            body.privilege,
            id,
            ClassroomUpdate {
                unique_name: body.room_name,
                status: body.status,
                teacher_id: body.teacher_id,
                mark_attendance: body.mark_attendance,
                weight_age: body.weight_age,
                schedule: body.schedule,
            },
        )
        .await?;

    Ok(Json(to_response(classroom)))
}

pub async fn list_by_university(
    State(state): State<AppState>,
    Path(university_id): Path<String>,
) -> Result<Json<Vec<ClassroomResponse>>, ApiError> {
    let classrooms = state.classrooms.list_by_university(&university_id).await?;
    Ok(Json(classrooms.into_iter().map(to_response).collect()))
}

pub async fn list_by_admin(
    State(state): State<AppState>,
    Path((university_id, account_id)): Path<(String, String)>,
) -> Result<Json<Vec<ClassroomResponse>>, ApiError> {
    let classrooms = state
        .classrooms
        .list_by_creator(&account_id, &university_id)
        .await?;
    Ok(Json(classrooms.into_iter().map(to_response).collect()))
}

pub async fn provision(
    State(state): State<AppState>,
    Path(classroom_id): Path<String>,
) -> Result<Json<ClassroomResponse>, ApiError> {
    let id = parse_id(&classroom_id)?;
    let classroom = state.classrooms.provision(id).await?;
    Ok(Json(to_response(classroom)))
}

pub async fn end(
    State(state): State<AppState>,
    Path(classroom_id): Path<String>,
    Json(body): Json<EndClassroomRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_id(&classroom_id)?;
    state.classrooms.end(body.privilege, id).await?;
    Ok(Json(serde_json::json!({ "ended": true })))
}

pub async fn add_members(
    State(state): State<AppState>,
    Path(classroom_id): Path<String>,
    Json(body): Json<MemberListRequest>,
) -> Result<Json<ClassroomResponse>, ApiError> {
    let id = parse_id(&classroom_id)?;
    let classroom = state.classrooms.add_members(id, &body.account_ids).await?;
    Ok(Json(to_response(classroom)))
}

pub async fn remove_members(
    State(state): State<AppState>,
    Path(classroom_id): Path<String>,
    Json(body): Json<MemberListRequest>,
) -> Result<Json<ClassroomResponse>, ApiError> {
    let id = parse_id(&classroom_id)?;
    let classroom = state
        .classrooms
        .remove_members(id, &body.account_ids)
        .await?;
    Ok(Json(to_response(classroom)))
}

pub async fn participants(
    State(state): State<AppState>,
    Path(classroom_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_id(&classroom_id)?;
    let participants = state.classrooms.participants(id).await?;
    Ok(Json(serde_json::json!({ "participants": participants })))
}
