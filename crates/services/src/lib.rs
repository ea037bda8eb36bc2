pub mod attendance;
pub mod classroom;
pub mod error;
pub mod locks;
pub mod provider;
pub mod roster;
pub mod session_log;
pub mod store;

pub use attendance::AttendanceService;
pub use classroom::ClassroomService;
pub use error::{CoreError, CoreResult};
