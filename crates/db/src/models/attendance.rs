use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// One participant's attendance for one classroom on one day.
/// Unique per `(classroom_id, account_id, date)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceRecord {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub classroom_id: ObjectId,
    pub account_id: String,
    /// Calendar day, `YYYY-MM-DD`.
    pub date: String,
    #[serde(default)]
    pub present: bool,
    /// Accumulated milliseconds over all closed JOIN -> LEAVE intervals in
    /// `session`. Never decreases.
    #[serde(default)]
    pub duration: u64,
    /// Append-only activity log. Activities strictly alternate.
    #[serde(default)]
    pub session: Vec<SessionEvent>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEvent {
    pub activity: Activity,
    /// Server-assigned; clients only ever supply the activity.
    pub time: DateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Activity {
    Join,
    Leave,
}

impl AttendanceRecord {
    pub const COLLECTION: &'static str = "attendances";
}
