use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classroom {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub unique_name: String,
    pub university_id: String,
    /// Account of the administrator who created the room.
    pub creator_account_id: String,
    #[serde(default)]
    pub status: ClassroomStatus,
    /// Identifier of the room at the external session provider. Assigned once
    /// when provisioning succeeds, never reassigned afterwards.
    pub external_session_id: Option<String>,
    /// URL the provider posts room events to.
    pub status_callback: Option<String>,
    /// Minimum privilege required to join. Currently 0: anyone logged in.
    #[serde(default)]
    pub min_privilege: i32,
    pub teacher_id: Option<String>,
    pub mark_attendance: Option<bool>,
    #[serde(default)]
    pub schedule: Vec<ScheduleSlot>,
    #[serde(default)]
    pub weight_age: f64,
    #[serde(default)]
    pub members: Vec<Member>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClassroomStatus {
    Active,
    #[default]
    Inactive,
}

/// One enrolled participant. `account_id` is unique within a classroom.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub account_id: String,
    #[serde(default)]
    pub final_grade: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSlot {
    pub days: String,
    pub start_time: Option<DateTime>,
    pub end_time: Option<DateTime>,
}

impl Classroom {
    pub const COLLECTION: &'static str = "classrooms";
}
