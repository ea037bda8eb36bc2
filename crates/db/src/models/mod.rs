pub mod attendance;
pub mod classroom;

pub use attendance::{Activity, AttendanceRecord, SessionEvent};
pub use classroom::{Classroom, ClassroomStatus, Member, ScheduleSlot};
