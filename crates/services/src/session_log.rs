//! Attendance session state machine: folds a stream of JOIN/LEAVE activity
//! events into a duration credit. Pure validation + arithmetic, no I/O.

use aula_db::models::{Activity, SessionEvent};
use bson::DateTime;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionLogError {
    #[error("activity of two neighbouring session events must differ")]
    InvalidTransition,
    #[error("session is not started yet")]
    NoOpenSession,
}

/// Validates `activity` against the tail of `events` and returns the event to
/// append together with the duration credit in milliseconds.
///
/// A JOIN credits nothing; the open interval counts only once the matching
/// LEAVE arrives. A LEAVE credits the elapsed wall-clock time since the last
/// event. Appending is not idempotent: delivering the same activity twice is
/// rejected as `InvalidTransition`, never silently absorbed.
pub fn append(
    events: &[SessionEvent],
    activity: Activity,
    now: DateTime,
) -> Result<(SessionEvent, u64), SessionLogError> {
    let last = events.last();

    if let Some(last) = last {
        if last.activity == activity {
            return Err(SessionLogError::InvalidTransition);
        }
    }

    match activity {
        Activity::Join => Ok((SessionEvent { activity, time: now }, 0)),
        Activity::Leave => {
            let last = last.ok_or(SessionLogError::NoOpenSession)?;
            let delta = now
                .timestamp_millis()
                .abs_diff(last.time.timestamp_millis());
            Ok((SessionEvent { activity, time: now }, delta))
        }
    }
}
